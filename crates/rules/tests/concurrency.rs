//! Sharing validators and plans across threads.

use std::sync::Arc;
use std::thread;

use nebula_rules::prelude::*;
use nebula_rules::record;

record! {
    #[derive(Debug, Default)]
    pub struct Event {
        pub name: String => "required,max=32",
        pub starts: u64,
        pub ends: u64 => "gtefield=starts",
    }
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn public_types_are_send_and_sync() {
    assert_send_sync::<Validator>();
    assert_send_sync::<Plan<Event>>();
    assert_send_sync::<CompiledPlan>();
    assert_send_sync::<CompileError>();
    assert_send_sync::<ValidationErrors>();
    assert_send_sync::<LeafRegistry>();
}

#[test]
fn concurrent_compiles_share_one_plan() {
    let validator = Arc::new(Validator::new());

    let plans: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| validator.compile::<Event>().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let first = plans[0].compiled();
    assert!(plans.iter().all(|plan| Arc::ptr_eq(plan.compiled(), first)));
    assert_eq!(validator.cached_plans(), 1);
}

#[test]
fn concurrent_evaluation_is_independent() {
    let plan = Validator::new().compile::<Event>().unwrap();

    thread::scope(|scope| {
        for i in 0..8u64 {
            let plan = plan.clone();
            scope.spawn(move || {
                let event = Event {
                    name: if i % 2 == 0 { "launch".into() } else { String::new() },
                    starts: 10,
                    ends: i,
                };
                let errors = plan.evaluate(&event);
                let expected = usize::from(i % 2 == 1) + usize::from(i < 10);
                assert_eq!(errors.len(), expected, "event {i}");
            });
        }
    });
}
