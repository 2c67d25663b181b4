//! Property-based tests for nebula-rules.

use std::sync::LazyLock;

use nebula_rules::compare::{CompareOp, compare};
use nebula_rules::prelude::*;
use nebula_rules::record;
use proptest::prelude::*;

record! {
    #[derive(Debug, Default, Clone)]
    pub struct Account {
        pub handle: String => "required,alphanum,min=3,max=16",
        pub email: String => "omitempty,email",
        pub color: String => "omitempty,hexcolor|rgb",
        pub age: i64 => "gte=0,lte=150",
        pub referrer: String => "required_with=email,nefield=handle",
    }
}

static VALIDATOR: LazyLock<Validator> = LazyLock::new(Validator::new);

fn number() -> impl Strategy<Value = Value<'static>> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<u64>().prop_map(Value::Uint),
        (-1.0e12f64..1.0e12).prop_map(Value::Float),
    ]
}

// ============================================================================
// IDEMPOTENCY: evaluate(x) == evaluate(x)
// ============================================================================

proptest! {
    #[test]
    fn evaluation_is_idempotent(
        handle in ".{0,20}",
        email in "[a-z@.]{0,12}",
        color in "(#[0-9a-f]{3,6})|(rgb\\([0-9]{1,3},[0-9]{1,3},[0-9]{1,3}\\))|[a-z]{0,4}",
        age in any::<i64>(),
        referrer in "[a-z]{0,6}",
    ) {
        let plan = VALIDATOR.compile::<Account>().unwrap();
        let account = Account { handle, email, color, age, referrer };

        let first = plan.evaluate(&account);
        let second = plan.evaluate(&account);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn alternative_passes_iff_a_branch_passes(color in "(#[0-9a-fA-F]{1,8})|(rgb\\([0-9]{1,3},[0-9]{1,3},[0-9]{1,3}\\))|[a-z#(),0-9]{1,10}") {
        let plan = VALIDATOR.compile::<Account>().unwrap();
        let account = Account {
            handle: "ferris".into(),
            color: color.clone(),
            ..Account::default()
        };

        let registry = VALIDATOR.registry();
        let hex = registry.build("hexcolor", None).unwrap();
        let rgb = registry.build("rgb", None).unwrap();
        let value = Value::Str(&color);
        let expected = hex.check(&value).is_ok() || rgb.check(&value).is_ok();

        let group_failed = plan.evaluate(&account).iter().any(|e| e.code == "hexcolor|rgb");
        prop_assert_eq!(!group_failed, expected);
    }
}

// ============================================================================
// COMPARATOR LAWS
// ============================================================================

proptest! {
    #[test]
    fn eq_is_the_negation_of_ne(a in number(), b in number()) {
        let eq = compare(CompareOp::Eq, &a, &b).unwrap();
        let ne = compare(CompareOp::Ne, &a, &b).unwrap();
        prop_assert_eq!(eq, !ne);
    }

    #[test]
    fn exactly_one_of_lt_eq_gt(a in number(), b in number()) {
        let held = [CompareOp::Lt, CompareOp::Eq, CompareOp::Gt]
            .into_iter()
            .filter(|op| compare(*op, &a, &b).unwrap())
            .count();
        prop_assert_eq!(held, 1);
    }

    #[test]
    fn gte_is_gt_or_eq(a in number(), b in number()) {
        let gte = compare(CompareOp::Gte, &a, &b).unwrap();
        let gt = compare(CompareOp::Gt, &a, &b).unwrap();
        let eq = compare(CompareOp::Eq, &a, &b).unwrap();
        prop_assert_eq!(gte, gt || eq);
    }

    #[test]
    fn integers_compare_exactly(a in any::<i64>(), b in any::<u64>()) {
        let lt = compare(CompareOp::Lt, &Value::Int(a), &Value::Uint(b)).unwrap();
        prop_assert_eq!(lt, i128::from(a) < i128::from(b));
    }

    #[test]
    fn strings_follow_byte_order(a in ".{0,8}", b in ".{0,8}") {
        let lt = compare(CompareOp::Lt, &Value::Str(&a), &Value::Str(&b)).unwrap();
        prop_assert_eq!(lt, a < b);
    }

    #[test]
    fn nil_only_equals_nil(a in number()) {
        prop_assert!(compare(CompareOp::Eq, &Value::Nil, &a).is_err());
        prop_assert!(compare(CompareOp::Ne, &a, &Value::Nil).is_err());
        prop_assert_eq!(compare(CompareOp::Eq, &Value::Nil, &Value::Nil), Ok(true));
    }
}
