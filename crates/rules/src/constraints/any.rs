//! Alternative groups (`a|b|c`).

use crate::constraints::Constraint;
use crate::foundation::ValidationError;
use crate::schema::Record;
use crate::value::Value;

/// Accepts a value if any branch accepts it.
///
/// Branches run in declaration order and evaluation stops at the first
/// success. If every branch fails, one violation is reported under the
/// joined tag (`hexcolor|rgb`) with the branch errors nested. Empty values
/// pass without running any branch.
#[derive(Debug, Clone)]
pub struct AnyOf {
    tag: String,
    branches: Vec<Constraint>,
}

impl AnyOf {
    /// Creates a group from its branches.
    pub fn new(branches: Vec<Constraint>) -> Self {
        let tag = branches
            .iter()
            .map(Constraint::tag)
            .collect::<Vec<_>>()
            .join("|");
        Self { tag, branches }
    }

    /// The joined tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The branches in order.
    #[must_use]
    pub fn branches(&self) -> &[Constraint] {
        &self.branches
    }

    /// Evaluates the group.
    pub fn evaluate(&self, record: &dyn Record, value: &Value<'_>) -> Result<(), ValidationError> {
        if value.is_empty() {
            return Ok(());
        }

        let mut errors = Vec::with_capacity(self.branches.len());
        for branch in &self.branches {
            match branch.evaluate(record, value) {
                Ok(()) => return Ok(()),
                Err(e) => errors.push(e),
            }
        }

        Err(
            ValidationError::new(self.tag.clone(), format!("Must satisfy one of `{}`", self.tag))
                .with_nested(errors),
        )
    }
}
