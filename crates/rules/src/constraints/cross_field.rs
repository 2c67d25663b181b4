//! Cross-field constraints
//!
//! Rules that relate the anchor field (the one the rule is declared on) to
//! one or more target fields reached through resolved [`FieldPath`]s.
//!
//! | Family | Passes when |
//! |---|---|
//! | `eqfield` .. `ltefield` | `anchor op target` holds |
//! | `required_if` | anchor is set, or some pair does not match |
//! | `required_unless` | anchor is set, or some pair matches |
//! | `required_with[_all]` | anchor is set, or no/not every target is set |
//! | `required_without[_all]` | anchor is set, or no/not every target is empty |
//! | `excluded_with[_all]` | anchor is empty, or no/not every target is set |
//! | `excluded_without[_all]` | anchor is empty, or no/not every target is empty |
//!
//! A target behind an unset optional link counts as empty. For relational
//! rules it cannot be compared, which is a violation carrying
//! `cause=nil_in_path`.

use std::borrow::Cow;
use std::fmt;

use crate::compare::{CompareOp, compare};
use crate::foundation::ValidationError;
use crate::path::{FieldPath, ResolveError};
use crate::rules::relational_tag;
use crate::schema::Record;
use crate::value::Value;

// ============================================================================
// RULE FAMILIES
// ============================================================================

/// The presence-conditioned and exclusion rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresenceKind {
    /// `required_with`
    RequiredWith,
    /// `required_with_all`
    RequiredWithAll,
    /// `required_without`
    RequiredWithout,
    /// `required_without_all`
    RequiredWithoutAll,
    /// `excluded_with`
    ExcludedWith,
    /// `excluded_with_all`
    ExcludedWithAll,
    /// `excluded_without`
    ExcludedWithout,
    /// `excluded_without_all`
    ExcludedWithoutAll,
}

impl PresenceKind {
    /// Every member of the family.
    pub const ALL: [Self; 8] = [
        Self::RequiredWith,
        Self::RequiredWithAll,
        Self::RequiredWithout,
        Self::RequiredWithoutAll,
        Self::ExcludedWith,
        Self::ExcludedWithAll,
        Self::ExcludedWithout,
        Self::ExcludedWithoutAll,
    ];

    /// The rule tag.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::RequiredWith => "required_with",
            Self::RequiredWithAll => "required_with_all",
            Self::RequiredWithout => "required_without",
            Self::RequiredWithoutAll => "required_without_all",
            Self::ExcludedWith => "excluded_with",
            Self::ExcludedWithAll => "excluded_with_all",
            Self::ExcludedWithout => "excluded_without",
            Self::ExcludedWithoutAll => "excluded_without_all",
        }
    }

    /// Looks a member up by tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// `required_*` demands a value; `excluded_*` demands its absence.
    #[must_use]
    pub fn requires_value(self) -> bool {
        matches!(
            self,
            Self::RequiredWith | Self::RequiredWithAll | Self::RequiredWithout | Self::RequiredWithoutAll
        )
    }

    /// `*_with*` triggers on set targets, `*_without*` on empty ones.
    fn watches_set_targets(self) -> bool {
        matches!(
            self,
            Self::RequiredWith | Self::RequiredWithAll | Self::ExcludedWith | Self::ExcludedWithAll
        )
    }

    fn needs_all(self) -> bool {
        matches!(
            self,
            Self::RequiredWithAll
                | Self::RequiredWithoutAll
                | Self::ExcludedWithAll
                | Self::ExcludedWithoutAll
        )
    }

    /// Whether the rule applies, given whether each target is set.
    pub fn triggered(self, mut targets_set: impl Iterator<Item = bool>) -> bool {
        let watched = self.watches_set_targets();
        if self.needs_all() {
            targets_set.all(|set| set == watched)
        } else {
            targets_set.any(|set| set == watched)
        }
    }
}

impl fmt::Display for PresenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The literal-conditioned requirement rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionalKind {
    /// `required_if`: required when every pair matches.
    RequiredIf,
    /// `required_unless`: required unless some pair matches.
    RequiredUnless,
}

impl ConditionalKind {
    /// The rule tag.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::RequiredIf => "required_if",
            Self::RequiredUnless => "required_unless",
        }
    }

    /// Looks a member up by tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        [Self::RequiredIf, Self::RequiredUnless]
            .into_iter()
            .find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for ConditionalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ============================================================================
// CONDITION
// ============================================================================

/// A `Field:literal` pair.
///
/// Matches when the target's string form equals the literal. A target behind
/// an unset link, or one without a string form, never matches.
#[derive(Debug, Clone)]
pub struct Condition {
    target: FieldPath,
    literal: String,
}

impl Condition {
    /// Creates a condition.
    pub fn new(target: FieldPath, literal: impl Into<String>) -> Self {
        Self {
            target,
            literal: literal.into(),
        }
    }

    /// The target field.
    #[must_use]
    pub fn target(&self) -> &FieldPath {
        &self.target
    }

    /// The expected string form.
    #[must_use]
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Evaluates the pair against `record`.
    #[must_use]
    pub fn matches(&self, record: &dyn Record) -> bool {
        self.target
            .resolve_value(record)
            .ok()
            .and_then(|value| value.string_form())
            .is_some_and(|form| form == self.literal)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is {:?}", self.target, self.literal)
    }
}

// ============================================================================
// CROSS FIELD
// ============================================================================

/// A constraint over the anchor field and one or more targets.
#[derive(Debug, Clone)]
pub enum CrossField {
    /// `anchor op target`.
    Relational {
        /// The comparison.
        op: CompareOp,
        /// The field compared against.
        target: FieldPath,
    },
    /// Presence-conditioned requirement or exclusion.
    Presence {
        /// Family member.
        kind: PresenceKind,
        /// Watched fields.
        targets: Vec<FieldPath>,
    },
    /// Literal-conditioned requirement.
    Conditional {
        /// Family member.
        kind: ConditionalKind,
        /// The pairs.
        conditions: Vec<Condition>,
    },
}

impl CrossField {
    /// The rule tag.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Relational { op, .. } => relational_tag(*op),
            Self::Presence { kind, .. } => kind.tag(),
            Self::Conditional { kind, .. } => kind.tag(),
        }
    }

    /// Every field the rule reads besides its anchor.
    #[must_use]
    pub fn targets(&self) -> Vec<&FieldPath> {
        match self {
            Self::Relational { target, .. } => vec![target],
            Self::Presence { targets, .. } => targets.iter().collect(),
            Self::Conditional { conditions, .. } => conditions.iter().map(Condition::target).collect(),
        }
    }

    fn target_names(&self) -> String {
        self.targets()
            .iter()
            .map(|path| path.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Evaluates the rule for `value`, the anchor field of `record`.
    pub fn evaluate(&self, record: &dyn Record, value: &Value<'_>) -> Result<(), ValidationError> {
        match self {
            Self::Relational { op, target } => self.relational(*op, target, record, value),
            Self::Presence { kind, targets } => {
                let triggered = kind.triggered(targets.iter().map(|path| is_set(path, record)));
                if !triggered || value.is_empty() != kind.requires_value() {
                    return Ok(());
                }
                let verb = if kind.requires_value() {
                    "This field is required"
                } else {
                    "This field must be empty"
                };
                let quantifier = if kind.needs_all() { "all of" } else { "any of" };
                let state = if kind.watches_set_targets() { "set" } else { "empty" };
                Err(self.violation(format!(
                    "{verb} when {quantifier} [{}] {state}",
                    self.target_names()
                )))
            }
            Self::Conditional { kind, conditions } => {
                let required = match kind {
                    ConditionalKind::RequiredIf => conditions.iter().all(|c| c.matches(record)),
                    ConditionalKind::RequiredUnless => !conditions.iter().any(|c| c.matches(record)),
                };
                if !required || !value.is_empty() {
                    return Ok(());
                }
                let joined = conditions
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>();
                let message = match kind {
                    ConditionalKind::RequiredIf => {
                        format!("This field is required when {}", joined.join(" and "))
                    }
                    ConditionalKind::RequiredUnless => {
                        format!("This field is required unless {}", joined.join(" or "))
                    }
                };
                Err(self.violation(message))
            }
        }
    }

    fn relational(
        &self,
        op: CompareOp,
        target: &FieldPath,
        record: &dyn Record,
        value: &Value<'_>,
    ) -> Result<(), ValidationError> {
        let other = match target.resolve_value(record) {
            Ok(other) => other,
            Err(error @ ResolveError::NilLink { .. }) => {
                return Err(self
                    .violation(format!("Cannot compare with field `{target}`: {error}"))
                    .with_param("cause", "nil_in_path"));
            }
            Err(error) => {
                return Err(self
                    .violation(format!("Cannot compare with field `{target}`: {error}"))
                    .with_param("cause", "incomparable"));
            }
        };

        match compare(op, value, &other) {
            Ok(true) => Ok(()),
            Ok(false) => Err(self.violation(format!(
                "Must be {} field `{target}`",
                relation(op)
            ))),
            Err(error) => Err(self
                .violation(format!("Cannot compare with field `{target}`: {error}"))
                .with_param("cause", "incomparable")),
        }
    }

    fn violation(&self, message: String) -> ValidationError {
        ValidationError::new(self.tag(), message).with_param("field", Cow::Owned(self.target_names()))
    }
}

fn is_set(path: &FieldPath, record: &dyn Record) -> bool {
    path.resolve_value(record)
        .is_ok_and(|value| !value.is_empty())
}

fn relation(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Eq => "equal to",
        CompareOp::Ne => "different from",
        CompareOp::Gt => "greater than",
        CompareOp::Gte => "greater than or equal to",
        CompareOp::Lt => "less than",
        CompareOp::Lte => "less than or equal to",
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    crate::record! {
        #[derive(Debug, Default)]
        struct Inner {
            pub name: String,
        }
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct Form {
            pub a: String,
            pub b: String,
            pub count: u32,
            pub limit: i64,
            pub inner: Option<Box<Inner>>,
        }
    }

    fn path(dotted: &str) -> FieldPath {
        FieldPath::resolve(Form::schema(), dotted).unwrap()
    }

    fn presence(kind: PresenceKind) -> CrossField {
        CrossField::Presence {
            kind,
            targets: vec![path("a"), path("b")],
        }
    }

    #[rstest]
    // (a set, b set, anchor set) -> passes
    #[case(PresenceKind::RequiredWith, true, false, false, false)]
    #[case(PresenceKind::RequiredWith, false, false, false, true)]
    #[case(PresenceKind::RequiredWithAll, true, false, false, true)]
    #[case(PresenceKind::RequiredWithAll, true, true, false, false)]
    #[case(PresenceKind::RequiredWithAll, true, true, true, true)]
    #[case(PresenceKind::RequiredWithout, true, false, false, false)]
    #[case(PresenceKind::RequiredWithout, true, true, false, true)]
    #[case(PresenceKind::RequiredWithoutAll, true, false, false, true)]
    #[case(PresenceKind::RequiredWithoutAll, false, false, false, false)]
    #[case(PresenceKind::ExcludedWith, true, false, true, false)]
    #[case(PresenceKind::ExcludedWith, true, false, false, true)]
    #[case(PresenceKind::ExcludedWithAll, true, false, true, true)]
    #[case(PresenceKind::ExcludedWithAll, true, true, true, false)]
    #[case(PresenceKind::ExcludedWithout, false, true, true, false)]
    #[case(PresenceKind::ExcludedWithoutAll, false, true, true, true)]
    #[case(PresenceKind::ExcludedWithoutAll, false, false, true, false)]
    fn test_presence_table(
        #[case] kind: PresenceKind,
        #[case] a_set: bool,
        #[case] b_set: bool,
        #[case] anchor_set: bool,
        #[case] passes: bool,
    ) {
        let form = Form {
            a: if a_set { "x".into() } else { String::new() },
            b: if b_set { "y".into() } else { String::new() },
            ..Form::default()
        };
        let anchor = if anchor_set { Value::Uint(1) } else { Value::Uint(0) };
        let result = presence(kind).evaluate(&form, &anchor);
        assert_eq!(result.is_ok(), passes, "{kind} a={a_set} b={b_set} anchor={anchor_set}");
        if let Err(error) = result {
            assert_eq!(error.code, kind.tag());
            assert_eq!(error.param("field"), Some("a b"));
        }
    }

    #[test]
    fn test_relational_against_sibling() {
        let rule = CrossField::Relational {
            op: CompareOp::Lte,
            target: path("limit"),
        };
        let form = Form {
            limit: 10,
            ..Form::default()
        };
        assert!(rule.evaluate(&form, &Value::Uint(10)).is_ok());

        let error = rule.evaluate(&form, &Value::Uint(11)).unwrap_err();
        assert_eq!(error.code, "ltefield");
        assert_eq!(error.param("field"), Some("limit"));
        assert_eq!(error.param("cause"), None);
    }

    #[test]
    fn test_relational_nil_in_path() {
        let rule = CrossField::Relational {
            op: CompareOp::Eq,
            target: path("inner.name"),
        };
        let error = rule.evaluate(&Form::default(), &Value::Str("x")).unwrap_err();
        assert_eq!(error.param("cause"), Some("nil_in_path"));
        assert!(error.message.contains("nil encountered at `inner`"));
    }

    #[test]
    fn test_relational_incomparable() {
        let rule = CrossField::Relational {
            op: CompareOp::Eq,
            target: path("inner"),
        };
        let form = Form::default();
        assert!(rule.evaluate(&form, &Value::Nil).is_ok());
        let error = rule.evaluate(&form, &Value::Str("x")).unwrap_err();
        assert_eq!(error.param("cause"), Some("incomparable"));
    }

    #[test]
    fn test_conditional() {
        let rule = CrossField::Conditional {
            kind: ConditionalKind::RequiredUnless,
            conditions: vec![Condition::new(path("a"), "skip"), Condition::new(path("count"), "0")],
        };
        let form = Form {
            a: "keep".into(),
            count: 3,
            ..Form::default()
        };
        assert!(rule.evaluate(&form, &Value::Str("")).is_err());
        assert!(rule.evaluate(&Form::default(), &Value::Str("")).is_ok());
    }

    #[test]
    fn test_condition_through_nil_never_matches() {
        let condition = Condition::new(path("inner.name"), "");
        assert!(!condition.matches(&Form::default()));
    }
}
