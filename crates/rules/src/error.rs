//! Configuration errors
//!
//! Everything that can go wrong while turning rule strings into a plan.
//! These never surface as violations: compilation returns them and the host
//! is expected to abort startup.

use crate::path::PathError;
use crate::schema::TypeKind;

/// A rule that could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CompileErrorKind {
    /// An empty segment, such as `required,,min=1` or `a|`.
    #[error("empty rule")]
    EmptyRule,

    /// The name is neither a leaf rule, a cross-field rule nor an alias.
    #[error("unknown rule `{0}`")]
    UnknownRule(String),

    /// The rule needs a parameter and has none.
    #[error("rule `{0}` requires a parameter")]
    MissingParameter(String),

    /// The rule takes no parameter but one was given.
    #[error("rule `{0}` does not take a parameter")]
    UnexpectedParameter(String),

    /// The parameter is malformed.
    #[error("invalid parameter `{param}` for rule `{rule}`: {reason}")]
    InvalidParameter {
        /// Rule name.
        rule: String,
        /// The raw parameter.
        param: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A field reference does not resolve.
    #[error(transparent)]
    Path(#[from] PathError),

    /// A cross-field rule references the field it is declared on.
    #[error("rule `{rule}` references its own field `{field}`")]
    SelfReference {
        /// Rule tag.
        rule: String,
        /// The field.
        field: String,
    },

    /// A relational rule compares fields from different domains.
    #[error("rule `{rule}` cannot compare a {anchor} field with {target} field `{field}`")]
    IncompatibleTypes {
        /// Rule tag.
        rule: String,
        /// Target field.
        field: String,
        /// Domain of the anchor.
        anchor: TypeKind,
        /// Domain of the target.
        target: TypeKind,
    },

    /// The rule cannot be used as a branch of an alternative group.
    #[error("rule `{0}` cannot be used inside an alternative group")]
    NotAlternative(String),
}

/// A record type whose rules could not be compiled.
///
/// Names the record and the field (or record-level check anchor) that
/// carries the offending rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid rules on `{record}.{field}`: {kind}")]
pub struct CompileError {
    /// Record name.
    pub record: &'static str,
    /// Field or check anchor path.
    pub field: String,
    /// What went wrong.
    #[source]
    pub kind: CompileErrorKind,
}

impl CompileError {
    /// Creates a compile error.
    pub fn new(record: &'static str, field: impl Into<String>, kind: CompileErrorKind) -> Self {
        Self {
            record,
            field: field.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_location() {
        let error = CompileError::new(
            "Account",
            "confirm",
            CompileErrorKind::SelfReference {
                rule: "eqfield".into(),
                field: "confirm".into(),
            },
        );
        assert_eq!(
            error.to_string(),
            "invalid rules on `Account.confirm`: rule `eqfield` references its own field `confirm`"
        );
    }

    #[test]
    fn test_path_error_is_transparent() {
        let kind = CompileErrorKind::from(PathError::NotFound {
            record: "Account",
            segment: "Pasword".into(),
        });
        assert_eq!(kind.to_string(), "`Account` has no field `Pasword`");
    }
}
