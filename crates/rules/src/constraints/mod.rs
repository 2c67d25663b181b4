//! Executable constraints
//!
//! A [`Constraint`] is built once from a parsed rule and evaluated many
//! times. Every variant shares one contract: given the record being
//! validated and the already-resolved value of the field the rule is
//! declared on, return `Ok(())` or a single [`ValidationError`].
//!
//! - [`LeafConstraint`] looks at the field value only.
//! - [`CrossField`] also reads sibling fields through resolved paths.
//! - [`AnyOf`] accepts the value if one of its branches does.

pub mod any;
pub mod cross_field;
pub mod leaf;

pub use any::AnyOf;
pub use cross_field::{Condition, ConditionalKind, CrossField, PresenceKind};
pub use leaf::LeafConstraint;

use crate::foundation::ValidationError;
use crate::schema::Record;
use crate::value::Value;

/// A compiled, immutable rule.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// A single-field check.
    Leaf(LeafConstraint),
    /// A check relating the field to other fields.
    CrossField(CrossField),
    /// An alternative group.
    Any(AnyOf),
}

impl Constraint {
    /// The rule tag, used as the violation code.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Leaf(leaf) => leaf.name(),
            Self::CrossField(cross) => cross.tag(),
            Self::Any(any) => any.tag(),
        }
    }

    /// True for the cross-field variant.
    #[must_use]
    pub fn is_cross_field(&self) -> bool {
        matches!(self, Self::CrossField(_))
    }

    /// Evaluates the constraint for `value`, the anchor field of `record`.
    pub fn evaluate(&self, record: &dyn Record, value: &Value<'_>) -> Result<(), ValidationError> {
        match self {
            Self::Leaf(leaf) => leaf.evaluate(value),
            Self::CrossField(cross) => cross.evaluate(record, value),
            Self::Any(any) => any.evaluate(record, value),
        }
    }
}

impl From<LeafConstraint> for Constraint {
    fn from(leaf: LeafConstraint) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<CrossField> for Constraint {
    fn from(cross: CrossField) -> Self {
        Self::CrossField(cross)
    }
}

impl From<AnyOf> for Constraint {
    fn from(any: AnyOf) -> Self {
        Self::Any(any)
    }
}
