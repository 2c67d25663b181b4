//! Value comparison
//!
//! [`compare`] evaluates one of six operators over two [`Value`]s. All
//! integer, unsigned and float values form a single numeric domain; text is
//! ordered lexicographically, timestamps chronologically and sequences by
//! length. Anything else is an error, never a silent `false`.
//!
//! Nil handling is asymmetric: two nils are equal (and unordered), while nil
//! against a present value is an error for every operator.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::value::{Value, ValueKind};

// ============================================================================
// OPERATOR
// ============================================================================

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
}

impl CompareOp {
    /// All operators, in canonical order.
    pub const ALL: [Self; 6] = [Self::Eq, Self::Ne, Self::Gt, Self::Gte, Self::Lt, Self::Lte];

    /// The operator name as written in rules.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        }
    }

    /// True for `gt`, `gte`, `lt` and `lte`.
    #[must_use]
    pub fn is_ordering(self) -> bool {
        !matches!(self, Self::Eq | Self::Ne)
    }

    /// Whether the operator holds for an established ordering.
    #[must_use]
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
            Self::Gt => ordering == Ordering::Greater,
            Self::Gte => ordering != Ordering::Less,
            Self::Lt => ordering == Ordering::Less,
            Self::Lte => ordering != Ordering::Greater,
        }
    }
}

impl FromStr for CompareOp {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| CompareError::UnknownOperator(s.to_owned()))
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ERROR
// ============================================================================

/// Why two values could not be compared.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompareError {
    /// The operator name is not one of `eq|ne|gt|gte|lt|lte`.
    #[error("unknown comparison operator `{0}`")]
    UnknownOperator(String),

    /// One side is nil and the other holds a value.
    #[error("cannot compare nil with a {0} value")]
    NilOperand(ValueKind),

    /// The two values belong to different domains.
    #[error("cannot compare a {left} value with a {right} value")]
    Incompatible {
        /// Kind of the left operand.
        left: ValueKind,
        /// Kind of the right operand.
        right: ValueKind,
    },

    /// An ordering operator was applied to a domain without an order.
    #[error("{0} values have no ordering")]
    Unordered(ValueKind),
}

// ============================================================================
// COMPARE
// ============================================================================

/// Compares `left` against `right` under `op`.
///
/// # Errors
///
/// Returns a [`CompareError`] when exactly one side is nil, when the values
/// belong to different domains, or when an ordering operator is applied to
/// booleans or records.
///
/// # Examples
///
/// ```rust,ignore
/// use nebula_rules::compare::{compare, CompareOp};
/// use nebula_rules::value::Value;
///
/// assert_eq!(compare(CompareOp::Lt, &Value::Int(-1), &Value::Uint(1)), Ok(true));
/// assert_eq!(compare(CompareOp::Eq, &Value::Nil, &Value::Nil), Ok(true));
/// assert!(compare(CompareOp::Eq, &Value::Nil, &Value::Int(0)).is_err());
/// ```
pub fn compare(op: CompareOp, left: &Value<'_>, right: &Value<'_>) -> Result<bool, CompareError> {
    match (*left, *right) {
        (Value::Nil, Value::Nil) => Ok(op == CompareOp::Eq),
        (Value::Nil, other) | (other, Value::Nil) => Err(CompareError::NilOperand(other.kind())),
        (Value::Bool(a), Value::Bool(b)) => {
            if op.is_ordering() {
                Err(CompareError::Unordered(ValueKind::Bool))
            } else {
                Ok(op.holds(a.cmp(&b)))
            }
        }
        (Value::Str(a), Value::Str(b)) => Ok(op.holds(a.cmp(b))),
        (Value::Time(a), Value::Time(b)) => Ok(op.holds(a.cmp(&b))),
        (Value::Seq(a), Value::Seq(b)) => Ok(op.holds(a.cmp(&b))),
        (a, b) => match (Number::of(&a), Number::of(&b)) {
            (Some(x), Some(y)) => Ok(x.compare(y).map_or(op == CompareOp::Ne, |ord| op.holds(ord))),
            _ => Err(CompareError::Incompatible {
                left: a.kind(),
                right: b.kind(),
            }),
        },
    }
}

/// A value from the numeric domain, widened.
///
/// Integers of every width share one exact representation; a float on
/// either side switches the comparison to `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Any signed or unsigned integer.
    Integer(i128),
    /// A float.
    Float(f64),
}

impl Number {
    /// The numeric reading of `value`, if it has one.
    #[must_use]
    pub fn of(value: &Value<'_>) -> Option<Self> {
        match *value {
            Value::Int(n) => Some(Self::Integer(i128::from(n))),
            Value::Uint(n) => Some(Self::Integer(i128::from(n))),
            Value::Float(n) => Some(Self::Float(n)),
            _ => None,
        }
    }

    /// Parses an integer exactly, or a finite float.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(n) = text.parse::<i128>() {
            return Some(Self::Integer(n));
        }
        text.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Self::Float)
    }

    /// The value as a float.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(n) => n as f64,
            Self::Float(n) => n,
        }
    }

    /// Orders two numbers; `None` when either side is NaN.
    #[must_use]
    pub fn compare(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::Integer(i128::from(n))
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Self::Integer(i128::from(n))
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    #[rstest]
    #[case("eq", CompareOp::Eq)]
    #[case("ne", CompareOp::Ne)]
    #[case("gt", CompareOp::Gt)]
    #[case("gte", CompareOp::Gte)]
    #[case("lt", CompareOp::Lt)]
    #[case("lte", CompareOp::Lte)]
    fn test_operator_parse(#[case] name: &str, #[case] op: CompareOp) {
        assert_eq!(name.parse::<CompareOp>(), Ok(op));
        assert_eq!(op.to_string(), name);
    }

    #[test]
    fn test_unknown_operator() {
        assert_eq!(
            "between".parse::<CompareOp>(),
            Err(CompareError::UnknownOperator("between".into()))
        );
        assert!("EQ".parse::<CompareOp>().is_err());
    }

    #[rstest]
    #[case(CompareOp::Eq, true)]
    #[case(CompareOp::Ne, false)]
    #[case(CompareOp::Gt, false)]
    #[case(CompareOp::Gte, false)]
    #[case(CompareOp::Lt, false)]
    #[case(CompareOp::Lte, false)]
    fn test_nil_nil_is_error_free(#[case] op: CompareOp, #[case] expected: bool) {
        assert_eq!(compare(op, &Value::Nil, &Value::Nil), Ok(expected));
    }

    #[rstest]
    #[case(CompareOp::Eq)]
    #[case(CompareOp::Ne)]
    #[case(CompareOp::Gt)]
    #[case(CompareOp::Lte)]
    fn test_nil_against_value_is_error(#[case] op: CompareOp) {
        assert_eq!(
            compare(op, &Value::Nil, &Value::Int(0)),
            Err(CompareError::NilOperand(ValueKind::Int))
        );
        assert_eq!(
            compare(op, &Value::Str("x"), &Value::Nil),
            Err(CompareError::NilOperand(ValueKind::Str))
        );
    }

    #[test]
    fn test_mixed_numeric_widening() {
        assert_eq!(compare(CompareOp::Lt, &Value::Int(-1), &Value::Uint(u64::MAX)), Ok(true));
        assert_eq!(compare(CompareOp::Eq, &Value::Uint(3), &Value::Float(3.0)), Ok(true));
        assert_eq!(compare(CompareOp::Gt, &Value::Float(2.5), &Value::Int(2)), Ok(true));
        assert_eq!(compare(CompareOp::Gte, &Value::Int(7), &Value::Int(7)), Ok(true));
    }

    #[test]
    fn test_nan_is_unordered() {
        let nan = Value::Float(f64::NAN);
        assert_eq!(compare(CompareOp::Eq, &nan, &nan), Ok(false));
        assert_eq!(compare(CompareOp::Ne, &nan, &Value::Int(1)), Ok(true));
        assert_eq!(compare(CompareOp::Lt, &nan, &Value::Int(1)), Ok(false));
        assert_eq!(compare(CompareOp::Gte, &nan, &Value::Int(1)), Ok(false));
    }

    #[test]
    fn test_strings_are_lexicographic() {
        assert_eq!(compare(CompareOp::Lt, &Value::Str("apple"), &Value::Str("banana")), Ok(true));
        assert_eq!(compare(CompareOp::Lt, &Value::Str("Z"), &Value::Str("a")), Ok(true));
        assert_eq!(compare(CompareOp::Eq, &Value::Str("a"), &Value::Str("a")), Ok(true));
    }

    #[test]
    fn test_timestamps_are_chronological() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(compare(CompareOp::Gt, &Value::Time(later), &Value::Time(earlier)), Ok(true));
        assert_eq!(compare(CompareOp::Eq, &Value::Time(later), &Value::Time(later)), Ok(true));
    }

    #[test]
    fn test_booleans_only_equate() {
        assert_eq!(compare(CompareOp::Ne, &Value::Bool(true), &Value::Bool(false)), Ok(true));
        assert_eq!(
            compare(CompareOp::Gt, &Value::Bool(true), &Value::Bool(false)),
            Err(CompareError::Unordered(ValueKind::Bool))
        );
    }

    #[test]
    fn test_sequences_compare_by_length() {
        assert_eq!(compare(CompareOp::Lt, &Value::Seq(1), &Value::Seq(2)), Ok(true));
    }

    #[test]
    fn test_cross_domain_is_error() {
        assert_eq!(
            compare(CompareOp::Eq, &Value::Str("1"), &Value::Int(1)),
            Err(CompareError::Incompatible {
                left: ValueKind::Str,
                right: ValueKind::Int,
            })
        );
        assert!(compare(CompareOp::Eq, &Value::Seq(1), &Value::Int(1)).is_err());
        assert!(compare(CompareOp::Eq, &Value::Bool(true), &Value::Int(1)).is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CompareError::NilOperand(ValueKind::Str).to_string(),
            "cannot compare nil with a string value"
        );
    }
}
