//! Kind-aware checks
//!
//! These look at the runtime value as a whole rather than its text: the
//! emptiness checks, numeric bounds (length for strings and sequences, value
//! for numbers), and comparisons against a rule literal through the value's
//! string form.

use crate::compare::{CompareOp, Number};
use crate::error::CompileErrorKind;
use crate::foundation::ValidationError;
use crate::registry::ValueCheck;
use crate::value::Value;

// ============================================================================
// PRESENCE
// ============================================================================

/// `required`: the value must not be the zero value of its type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Required;

impl ValueCheck for Required {
    fn check(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        if value.is_empty() {
            Err(ValidationError::required())
        } else {
            Ok(())
        }
    }
}

/// `isdefault`: the value must be the zero value of its type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsDefault;

impl ValueCheck for IsDefault {
    fn check(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        if value.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new("isdefault", "Must be the default value"))
        }
    }
}

// ============================================================================
// BOUNDS
// ============================================================================

/// `min`, `max`, `len`, `gt`, `gte`, `lt`, `lte`.
///
/// Strings are measured in characters and sequences by length; numbers by
/// value. Integer limits compare exactly against integer values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    op: CompareOp,
    limit: Number,
}

impl Bound {
    /// Creates a bound `measure op limit`.
    #[must_use]
    pub fn new(op: CompareOp, limit: impl Into<Number>) -> Self {
        Self {
            op,
            limit: limit.into(),
        }
    }

    /// Parses the numeric parameter of `rule`.
    pub fn parse(rule: &str, op: CompareOp, param: &str) -> Result<Self, CompileErrorKind> {
        match Number::parse(param) {
            Some(limit) => Ok(Self::new(op, limit)),
            None => Err(CompileErrorKind::InvalidParameter {
                rule: rule.to_owned(),
                param: param.to_owned(),
                reason: "expected a number".into(),
            }),
        }
    }

    /// The comparison applied.
    #[must_use]
    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// The limit.
    #[must_use]
    pub fn limit(&self) -> Number {
        self.limit
    }

    fn phrase(&self) -> &'static str {
        match self.op {
            CompareOp::Eq => "exactly",
            CompareOp::Ne => "other than",
            CompareOp::Gt => "greater than",
            CompareOp::Gte => "at least",
            CompareOp::Lt => "less than",
            CompareOp::Lte => "at most",
        }
    }
}

impl ValueCheck for Bound {
    fn check(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        let (subject, measure) = match *value {
            Value::Str(s) => ("Length", Number::Integer(s.chars().count() as i128)),
            Value::Seq(len) => ("Length", Number::Integer(len as i128)),
            other => match Number::of(&other) {
                Some(number) => ("Value", number),
                None => {
                    return Err(ValidationError::type_mismatch(
                        "string, sequence or number",
                        other.kind().as_str(),
                    ));
                }
            },
        };

        let holds = measure
            .compare(self.limit)
            .is_some_and(|ordering| self.op.holds(ordering));
        if holds {
            Ok(())
        } else {
            Err(ValidationError::new(
                "bound",
                format!("{subject} must be {} {}", self.phrase(), self.limit),
            )
            .with_param("limit", self.limit.to_string())
            .with_param("actual", measure.to_string()))
        }
    }
}

// ============================================================================
// LITERALS
// ============================================================================

/// `eq`, `ne`: compares the value's string form with a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    expect_equal: bool,
    literal: String,
}

impl Literal {
    /// `eq=literal`.
    pub fn equal(literal: impl Into<String>) -> Self {
        Self {
            expect_equal: true,
            literal: literal.into(),
        }
    }

    /// `ne=literal`.
    pub fn not_equal(literal: impl Into<String>) -> Self {
        Self {
            expect_equal: false,
            literal: literal.into(),
        }
    }
}

impl ValueCheck for Literal {
    fn check(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        let equal = value
            .string_form()
            .is_some_and(|form| form == self.literal.as_str());
        if equal == self.expect_equal {
            Ok(())
        } else if self.expect_equal {
            Err(ValidationError::new("eq", format!("Must be '{}'", self.literal)))
        } else {
            Err(ValidationError::new("ne", format!("Must not be '{}'", self.literal)))
        }
    }
}

/// `oneof=a b c`: the value's string form must be one of the options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneOf {
    options: Vec<String>,
}

impl OneOf {
    /// Splits a space separated option list.
    pub fn parse(param: &str) -> Self {
        Self {
            options: param.split_whitespace().map(str::to_owned).collect(),
        }
    }

    /// The accepted options.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

impl ValueCheck for OneOf {
    fn check(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        let found = value
            .string_form()
            .is_some_and(|form| self.options.iter().any(|option| *option == form));
        if found {
            Ok(())
        } else {
            Err(ValidationError::new(
                "oneof",
                format!("Must be one of [{}]", self.options.join(", ")),
            ))
        }
    }
}

/// `boolean`: a `bool`, or a string that spells one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BooleanLike;

const BOOLEAN_SPELLINGS: &[&str] = &[
    "1", "t", "T", "true", "TRUE", "True", "0", "f", "F", "false", "FALSE", "False",
];

impl ValueCheck for BooleanLike {
    fn check(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        match *value {
            Value::Bool(_) => Ok(()),
            Value::Str(s) if BOOLEAN_SPELLINGS.iter().any(|spelling| *spelling == s) => Ok(()),
            Value::Str(_) => Err(ValidationError::invalid_format("boolean")),
            other => Err(ValidationError::type_mismatch("bool or string", other.kind().as_str())),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
