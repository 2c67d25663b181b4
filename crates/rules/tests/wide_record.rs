//! Records with many fields.

use nebula_rules::prelude::*;
use nebula_rules::record;

record! {
    #[derive(Debug, Default)]
    pub struct Wide {
        pub f000: u32,
        pub f001: u32,
        pub f002: u32,
        pub f003: u32,
        pub f004: u32,
        pub f005: u32,
        pub f006: u32,
        pub f007: u32,
        pub f008: u32,
        pub f009: u32,
        pub f010: u32,
        pub f011: u32,
        pub f012: u32,
        pub f013: u32,
        pub f014: u32,
        pub f015: u32,
        pub f016: u32,
        pub f017: u32,
        pub f018: u32,
        pub f019: u32,
        pub f020: u32,
        pub f021: u32,
        pub f022: u32,
        pub f023: u32,
        pub f024: u32,
        pub f025: u32,
        pub f026: u32,
        pub f027: u32,
        pub f028: u32,
        pub f029: u32,
        pub f030: u32,
        pub f031: u32,
        pub f032: u32,
        pub f033: u32,
        pub f034: u32,
        pub f035: u32,
        pub f036: u32,
        pub f037: u32,
        pub f038: u32,
        pub f039: u32,
        pub f040: u32,
        pub f041: u32,
        pub f042: u32,
        pub f043: u32,
        pub f044: u32,
        pub f045: u32,
        pub f046: u32,
        pub f047: u32,
        pub f048: u32,
        pub f049: u32,
        pub f050: u32,
        pub f051: u32,
        pub f052: u32,
        pub f053: u32,
        pub f054: u32,
        pub f055: u32,
        pub f056: u32,
        pub f057: u32,
        pub f058: u32,
        pub f059: u32,
        pub f060: u32,
        pub f061: u32,
        pub f062: u32,
        pub f063: u32,
        pub f064: u32,
        pub f065: u32,
        pub f066: u32,
        pub f067: u32,
        pub f068: u32,
        pub f069: u32,
        pub f070: u32,
        pub f071: u32,
        pub f072: u32,
        pub f073: u32,
        pub f074: u32,
        pub f075: u32,
        pub f076: u32,
        pub f077: u32,
        pub f078: u32,
        pub f079: u32,
        pub f080: u32,
        pub f081: u32,
        pub f082: u32,
        pub f083: u32,
        pub f084: u32,
        pub f085: u32,
        pub f086: u32,
        pub f087: u32,
        pub f088: u32,
        pub f089: u32,
        pub f090: u32,
        pub f091: u32,
        pub f092: u32,
        pub f093: u32,
        pub f094: u32,
        pub f095: u32,
        pub f096: u32,
        pub f097: u32,
        pub f098: u32,
        pub f099: u32,
        pub f100: u32,
        pub f101: u32,
        pub f102: u32,
        pub f103: u32,
        pub f104: u32,
        pub f105: u32,
        pub f106: u32,
        pub f107: u32,
        pub f108: u32,
        pub f109: u32,
        pub f110: u32,
        pub f111: u32,
        pub f112: u32,
        pub f113: u32,
        pub f114: u32,
        pub f115: u32,
        pub f116: u32,
        pub f117: u32,
        pub f118: u32,
        pub f119: u32,
        pub f120: u32,
        pub f121: u32,
        pub f122: u32,
        pub f123: u32,
        pub f124: u32,
        pub f125: u32,
        pub f126: u32,
        pub f127: u32,
        pub f128: u32,
        pub f129: u32,
        pub f130: u32,
        pub f131: u32,
        pub f132: u32,
        pub f133: u32,
        pub f134: u32,
        pub f135: u32,
        pub f136: u32,
        pub f137: u32,
        pub f138: u32,
        pub f139: u32,
        pub f140: u32,
        pub f141: u32,
        pub f142: u32,
        pub f143: u32,
        pub f144: u32,
        pub f145: u32,
        pub f146: u32,
        pub f147: u32,
        pub f148: u32,
        pub f149: u32,
        pub f150: u32,
        pub f151: u32,
        pub f152: u32,
        pub f153: u32,
        pub f154: u32,
        pub f155: u32,
        pub f156: u32,
        pub f157: u32,
        pub f158: u32,
        pub last: u32 => "gtfield=f000",
    }
}

#[test]
fn every_field_is_reachable() {
    let wide = Wide {
        f100: 7,
        last: 9,
        ..Wide::default()
    };
    assert_eq!(Wide::schema().fields().len(), 160);
    assert!(matches!(wide.field(100), Value::Uint(7)));
    assert!(matches!(wide.field(159), Value::Uint(9)));
    assert!(wide.field(160).is_nil());
}

#[test]
fn wide_record_compiles_and_evaluates() {
    let plan = Validator::new().compile::<Wide>().unwrap();
    assert!(plan.validate(&Wide {
        last: 1,
        ..Wide::default()
    })
    .is_ok());

    let errors = plan.evaluate(&Wide::default());
    let codes: Vec<_> = errors.iter().map(|e| e.code.as_ref()).collect();
    assert_eq!(codes, ["gtfield"]);
}
