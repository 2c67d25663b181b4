//! Runtime field values
//!
//! A [`Value`] is a borrowed, type-erased view of one field of a record.
//! Accessors produce it through [`AsValue`], which also dereferences
//! `Option`, `Box` and `Arc` links so constraints only ever see the
//! pointed-to data (or [`Value::Nil`] for an unset link).

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::schema::Record;

// ============================================================================
// VALUE
// ============================================================================

/// A borrowed field value.
#[derive(Clone, Copy)]
pub enum Value<'a> {
    /// An unset optional link.
    Nil,
    /// A boolean.
    Bool(bool),
    /// Any signed integer, widened.
    Int(i64),
    /// Any unsigned integer, widened.
    Uint(u64),
    /// Any float, widened.
    Float(f64),
    /// Text.
    Str(&'a str),
    /// A UTC timestamp.
    Time(DateTime<Utc>),
    /// A sequence or map, represented by its length.
    Seq(usize),
    /// A nested record.
    Record(&'a dyn Record),
}

/// The domain a [`Value`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Nil`]
    Nil,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Int`]
    Int,
    /// [`Value::Uint`]
    Uint,
    /// [`Value::Float`]
    Float,
    /// [`Value::Str`]
    Str,
    /// [`Value::Time`]
    Time,
    /// [`Value::Seq`]
    Seq,
    /// [`Value::Record`]
    Record,
}

impl ValueKind {
    /// A short name used in messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool => "bool",
            Self::Int => "integer",
            Self::Uint => "unsigned integer",
            Self::Float => "float",
            Self::Str => "string",
            Self::Time => "timestamp",
            Self::Seq => "sequence",
            Self::Record => "record",
        }
    }

    /// True for the integer, unsigned and float kinds.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Uint | Self::Float)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'a> Value<'a> {
    /// Returns the domain of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Nil => ValueKind::Nil,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Uint(_) => ValueKind::Uint,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::Time(_) => ValueKind::Time,
            Self::Seq(_) => ValueKind::Seq,
            Self::Record(_) => ValueKind::Record,
        }
    }

    /// Returns true for [`Value::Nil`].
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns true when the value is the zero value of its type.
    ///
    /// Records are never empty; an unset optional link is.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match *self {
            Self::Nil => true,
            Self::Bool(b) => !b,
            Self::Int(n) => n == 0,
            Self::Uint(n) => n == 0,
            Self::Float(n) => n == 0.0,
            Self::Str(s) => s.is_empty(),
            Self::Time(t) => t == DateTime::<Utc>::default(),
            Self::Seq(len) => len == 0,
            Self::Record(_) => false,
        }
    }

    /// The textual form used when a value is matched against a rule literal.
    ///
    /// Returns `None` for `Nil` and records, which never match a literal.
    #[must_use]
    pub fn string_form(&self) -> Option<Cow<'a, str>> {
        match *self {
            Self::Nil | Self::Record(_) => None,
            Self::Bool(b) => Some(Cow::Borrowed(if b { "true" } else { "false" })),
            Self::Int(n) => Some(Cow::Owned(n.to_string())),
            Self::Uint(n) => Some(Cow::Owned(n.to_string())),
            Self::Float(n) => Some(Cow::Owned(n.to_string())),
            Self::Str(s) => Some(Cow::Borrowed(s)),
            Self::Time(t) => Some(Cow::Owned(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))),
            Self::Seq(len) => Some(Cow::Owned(len.to_string())),
        }
    }

    /// Returns the text, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested record, if this is one.
    #[must_use]
    pub fn as_record(&self) -> Option<&'a dyn Record> {
        match *self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("Nil"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Self::Uint(n) => f.debug_tuple("Uint").field(n).finish(),
            Self::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Time(t) => f.debug_tuple("Time").field(t).finish(),
            Self::Seq(len) => f.debug_tuple("Seq").field(len).finish(),
            Self::Record(r) => f.debug_tuple("Record").field(&r.record_type().name()).finish(),
        }
    }
}

// ============================================================================
// AS VALUE
// ============================================================================

/// Conversion of a field into a [`Value`].
///
/// Implemented for the primitive types, `String`, `DateTime<Utc>`, the std
/// collections, every record declared with [`record!`](crate::record), and
/// any `Option`/`Box`/`Arc` wrapping of those.
pub trait AsValue {
    /// Borrows the value.
    fn as_value(&self) -> Value<'_>;
}

macro_rules! as_value_int {
    ($variant:ident => $($ty:ty),+) => {
        $(
            impl AsValue for $ty {
                #[inline]
                fn as_value(&self) -> Value<'_> {
                    Value::$variant((*self).into())
                }
            }
        )+
    };
}

as_value_int!(Int => i8, i16, i32, i64);
as_value_int!(Uint => u8, u16, u32, u64);

impl AsValue for isize {
    #[inline]
    fn as_value(&self) -> Value<'_> {
        Value::Int(*self as i64)
    }
}

impl AsValue for usize {
    #[inline]
    fn as_value(&self) -> Value<'_> {
        Value::Uint(*self as u64)
    }
}

impl AsValue for f32 {
    #[inline]
    fn as_value(&self) -> Value<'_> {
        Value::Float(f64::from(*self))
    }
}

impl AsValue for f64 {
    #[inline]
    fn as_value(&self) -> Value<'_> {
        Value::Float(*self)
    }
}

impl AsValue for bool {
    #[inline]
    fn as_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl AsValue for String {
    #[inline]
    fn as_value(&self) -> Value<'_> {
        Value::Str(self.as_str())
    }
}

impl AsValue for &'static str {
    #[inline]
    fn as_value(&self) -> Value<'_> {
        Value::Str(self)
    }
}

impl AsValue for DateTime<Utc> {
    #[inline]
    fn as_value(&self) -> Value<'_> {
        Value::Time(*self)
    }
}

impl<T> AsValue for Vec<T> {
    #[inline]
    fn as_value(&self) -> Value<'_> {
        Value::Seq(self.len())
    }
}

impl<K, V, S> AsValue for HashMap<K, V, S> {
    #[inline]
    fn as_value(&self) -> Value<'_> {
        Value::Seq(self.len())
    }
}

impl<K, V> AsValue for BTreeMap<K, V> {
    #[inline]
    fn as_value(&self) -> Value<'_> {
        Value::Seq(self.len())
    }
}

impl<T: AsValue> AsValue for Option<T> {
    #[inline]
    fn as_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.as_value(),
            None => Value::Nil,
        }
    }
}

impl<T: AsValue + ?Sized> AsValue for Box<T> {
    #[inline]
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue + ?Sized> AsValue for Arc<T> {
    #[inline]
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_widen() {
        assert!(matches!(7u8.as_value(), Value::Uint(7)));
        assert!(matches!((-7i16).as_value(), Value::Int(-7)));
        assert!(matches!(7usize.as_value(), Value::Uint(7)));
        assert!(matches!(1.5f32.as_value(), Value::Float(f) if f == 1.5));
    }

    #[test]
    fn test_optional_links_dereference() {
        let set: Option<Box<Option<u32>>> = Some(Box::new(Some(3)));
        assert!(matches!(set.as_value(), Value::Uint(3)));

        let inner_unset: Option<Box<Option<u32>>> = Some(Box::new(None));
        assert!(inner_unset.as_value().is_nil());

        let unset: Option<Arc<String>> = None;
        assert!(unset.as_value().is_nil());
    }

    #[test]
    fn test_emptiness() {
        assert!(Value::Nil.is_empty());
        assert!(Value::Str("").is_empty());
        assert!(Value::Int(0).is_empty());
        assert!(Value::Float(0.0).is_empty());
        assert!(Value::Bool(false).is_empty());
        assert!(Value::Seq(0).is_empty());
        assert!(Value::Time(DateTime::<Utc>::default()).is_empty());

        assert!(!Value::Str("x").is_empty());
        assert!(!Value::Uint(1).is_empty());
        assert!(!Value::Bool(true).is_empty());
        assert!(!vec![1].as_value().is_empty());
    }

    #[test]
    fn test_string_form() {
        assert_eq!(Value::Str("US").string_form().as_deref(), Some("US"));
        assert_eq!(Value::Int(-3).string_form().as_deref(), Some("-3"));
        assert_eq!(Value::Bool(true).string_form().as_deref(), Some("true"));
        assert_eq!(Value::Float(2.5).string_form().as_deref(), Some("2.5"));
        assert_eq!(Value::Seq(4).string_form().as_deref(), Some("4"));
        assert_eq!(Value::Nil.string_form(), None);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Str("a").kind().as_str(), "string");
        assert!(ValueKind::Float.is_numeric());
        assert!(!ValueKind::Str.is_numeric());
    }
}
