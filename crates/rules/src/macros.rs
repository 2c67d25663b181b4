//! Macros for declaring records and leaf validators with minimal boilerplate.
//!
//! # Available Macros
//!
//! - [`record!`]: Declare a record (struct + `Record`/`Describe`/`AsValue` impls)
//! - [`validator!`]: Create a typed leaf validator (struct + `Validate` impl + factory fn)
//!
//! # Examples
//!
//! ```rust,ignore
//! use nebula_rules::record;
//!
//! record! {
//!     #[derive(Debug, Default)]
//!     pub struct Address {
//!         pub country: String => "required",
//!         pub state: String => "required_if=country:US",
//!         pub zip: Option<String>,
//!     }
//! }
//! ```

// ============================================================================
// RECORD MACRO
// ============================================================================

/// Declares a record type together with its rule annotations.
///
/// Each field may carry a rule string after `=>`. Fields declared with any
/// visibility (`pub`, `pub(crate)`, ...) are exported and can be referenced
/// by cross-field rules; private fields cannot. Record-level checks follow
/// the struct as `check "path" => "rules";`.
///
/// ```rust,ignore
/// record! {
///     #[derive(Debug, Default)]
///     pub struct Account {
///         pub password: String => "required,min=8",
///         pub confirm: String => "eqfield=password",
///         pub profile: Option<Box<Profile>>,
///     }
///     check "profile.name" => "required";
/// }
/// ```
#[macro_export]
macro_rules! record {
    (@rules $rules:literal) => { $rules };
    (@rules) => { "" };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty $(=> $rules:literal)?
            ),* $(,)?
        }
        $(check $anchor:literal => $crules:literal;)*
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::schema::Record for $name {
            fn schema() -> &'static $crate::schema::RecordType {
                static SCHEMA: ::std::sync::OnceLock<$crate::schema::RecordType> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::schema::RecordType::builder::<$name>(stringify!($name))
                        $(
                            .field(
                                stringify!($field),
                                <$fty as $crate::schema::Describe>::describe(),
                                $crate::record!(@rules $($rules)?),
                                !stringify!($fvis).is_empty(),
                            )
                        )*
                        $(.check($anchor, $crules))*
                        .build()
                })
            }

            fn record_type(&self) -> &'static $crate::schema::RecordType {
                <Self as $crate::schema::Record>::schema()
            }

            fn field(&self, index: usize) -> $crate::value::Value<'_> {
                const FIELDS: &[fn(&$name) -> $crate::value::Value<'_>] = &[
                    $(|this| $crate::value::AsValue::as_value(&this.$field),)*
                ];
                FIELDS.get(index).map_or($crate::value::Value::Nil, |get| get(self))
            }
        }

        impl $crate::schema::Describe for $name {
            fn describe() -> $crate::schema::TypeDesc {
                $crate::schema::TypeDesc::Record(<$name as $crate::schema::Record>::schema)
            }
        }

        impl $crate::value::AsValue for $name {
            fn as_value(&self) -> $crate::value::Value<'_> {
                $crate::value::Value::Record(self)
            }
        }
    };
}

// ============================================================================
// VALIDATOR MACRO
// ============================================================================

/// Creates a complete leaf validator: struct definition, `Validate`
/// implementation, constructor, and factory function.
///
/// # Variants
///
/// **Unit validator** (zero-sized, no fields):
/// ```rust,ignore
/// validator! {
///     pub Lowercase for str;
///     rule(input) { input.chars().all(|c| !c.is_uppercase()) }
///     error(input) { ValidationError::invalid_format("lowercase string") }
///     fn lowercase();
/// }
/// ```
///
/// **Struct with fields** and a constructor:
/// ```rust,ignore
/// validator! {
///     pub Contains { needle: String } for str;
///     rule(self, input) { input.contains(self.needle.as_str()) }
///     error(self, input) { ValidationError::new("contains", "missing substring") }
///     new(needle: impl Into<String>) { Self { needle: needle.into() } }
///     fn contains(needle: impl Into<String>);
/// }
/// ```
///
/// A fallible constructor is written `new(..) -> Error { .. }` and makes the
/// factory return `Result<Self, Error>`.
#[macro_export]
macro_rules! validator {
    (@impl $name:ident, $input:ty, $self_:ident, $inp:ident, $einp:ident, $rule:block, $err:block) => {
        impl $crate::foundation::Validate for $name {
            type Input = $input;

            #[allow(unused_variables)]
            fn validate(&$self_, $inp: &Self::Input) -> ::std::result::Result<(), $crate::foundation::ValidationError> {
                if $rule {
                    Ok(())
                } else {
                    let $einp = $inp;
                    Err($err)
                }
            }
        }
    };

    // ── Unit validator (no fields) + factory fn ───────────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident for $input:ty;
        rule($inp:ident) $rule:block
        error($einp:ident) $err:block
        fn $factory:ident();
    ) => {
        $crate::validator! {
            $(#[$meta])*
            $vis $name for $input;
            rule($inp) $rule
            error($einp) $err
        }

        #[must_use]
        $vis const fn $factory() -> $name { $name }
    };

    // ── Unit validator (no fields), no factory ────────────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident for $input:ty;
        rule($inp:ident) $rule:block
        error($einp:ident) $err:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::foundation::Validate for $name {
            type Input = $input;

            #[allow(unused_variables)]
            fn validate(&self, $inp: &Self::Input) -> Result<(), $crate::foundation::ValidationError> {
                if $rule {
                    Ok(())
                } else {
                    let $einp = $inp;
                    Err($err)
                }
            }
        }
    };

    // ── Struct with fields + custom new + factory fn ──────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? } for $input:ty;
        rule($self_:ident, $inp:ident) $rule:block
        error($self2:ident, $einp:ident) $err:block
        new($($narg:ident: $naty:ty),* $(,)?) $new_body:block
        fn $factory:ident($($farg:ident: $faty:ty),* $(,)?);
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(pub $field: $fty,)+
        }

        #[allow(clippy::new_without_default)]
        impl $name {
            #[must_use]
            pub fn new($($narg: $naty),*) -> Self $new_body
        }

        $crate::validator!(@impl $name, $input, $self_, $inp, $einp, $rule, $err);

        #[must_use]
        $vis fn $factory($($farg: $faty),*) -> $name {
            $name::new($($farg),*)
        }
    };

    // ── Struct with fields + fallible new + fallible factory ──────────────
    //
    // The type after `->` is the error type; the macro wraps it in Result.
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident { $($field:ident: $fty:ty),+ $(,)? } for $input:ty;
        rule($self_:ident, $inp:ident) $rule:block
        error($self2:ident, $einp:ident) $err:block
        new($($narg:ident: $naty:ty),* $(,)?) -> $ety:ty $new_body:block
        fn $factory:ident($($farg:ident: $faty:ty),* $(,)?) -> $efty:ty;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(pub $field: $fty,)+
        }

        impl $name {
            pub fn new($($narg: $naty),*) -> ::std::result::Result<Self, $ety> $new_body
        }

        $crate::validator!(@impl $name, $input, $self_, $inp, $einp, $rule, $err);

        $vis fn $factory($($farg: $faty),*) -> ::std::result::Result<$name, $efty> {
            $name::new($($farg),*)
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::foundation::{Validate, ValidationError};
    use crate::schema::{FieldDef, Record};
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    crate::record! {
        #[derive(Debug, Default)]
        struct Sample {
            pub name: String => "required",
            pub(crate) count: u32,
            note: Option<String>,
        }
        check "name" => "min=2";
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct Bare {}
    }

    #[test]
    fn test_record_schema() {
        let schema = Sample::schema();
        assert_eq!(schema.name(), "Sample");

        let names: Vec<_> = schema.fields().iter().map(FieldDef::name).collect();
        assert_eq!(names, ["name", "count", "note"]);
        assert_eq!(schema.fields()[0].rules(), "required");
        assert_eq!(schema.fields()[1].rules(), "");
        assert!(schema.fields()[1].is_exported());
        assert!(!schema.fields()[2].is_exported());
        assert!(schema.fields()[2].ty().is_optional());
        assert_eq!(schema.checks().len(), 1);

        assert!(Bare::schema().fields().is_empty());
    }

    #[test]
    fn test_record_field_access() {
        let sample = Sample {
            name: "ada".into(),
            count: 3,
            note: None,
        };
        assert_eq!(sample.field(0).as_str(), Some("ada"));
        assert!(matches!(sample.field(1), Value::Uint(3)));
        assert!(sample.field(2).is_nil());
        assert!(sample.field(3).is_nil());
        assert!(Bare::default().field(0).is_nil());
        assert!(std::ptr::eq(sample.record_type(), Sample::schema()));
    }

    crate::validator! {
        Short for str;
        rule(input) { input.len() <= 3 }
        error(input) { ValidationError::new("short", "too long") }
        fn short();
    }

    crate::validator! {
        Prefixed { prefix: String } for str;
        rule(self, input) { input.starts_with(self.prefix.as_str()) }
        error(self, input) {
            ValidationError::new("prefixed", "missing prefix").with_param("prefix", self.prefix.clone())
        }
        new(prefix: &str) { Self { prefix: prefix.to_owned() } }
        fn prefixed(prefix: &str);
    }

    crate::validator! {
        Digits { width: usize } for str;
        rule(self, input) { input.len() == self.width && input.bytes().all(|b| b.is_ascii_digit()) }
        error(self, input) { ValidationError::new("digits", "wrong digit count") }
        new(width: &str) -> std::num::ParseIntError { Ok(Self { width: width.parse()? }) }
        fn digits(width: &str) -> std::num::ParseIntError;
    }

    #[test]
    fn test_unit_validator() {
        assert!(short().validate("abc").is_ok());
        assert_eq!(short().validate("abcd").unwrap_err().code, "short");
    }

    #[test]
    fn test_validator_with_constructor() {
        let check = prefixed("nb-");
        assert!(check.validate("nb-1").is_ok());
        assert_eq!(check.validate("x").unwrap_err().param("prefix"), Some("nb-"));
    }

    #[test]
    fn test_validator_with_fallible_constructor() {
        let check = digits("3").unwrap();
        assert!(check.validate("042").is_ok());
        assert!(check.validate("42").is_err());
        assert!(digits("three").is_err());
    }
}
