//! Single-field constraints backed by the leaf registry.

use std::fmt;
use std::sync::Arc;

use crate::foundation::ValidationError;
use crate::registry::ValueCheck;
use crate::value::Value;

/// A registry check bound to the rule that requested it.
///
/// Failures are reported under the rule name, whatever code the check used.
#[derive(Clone)]
pub struct LeafConstraint {
    name: String,
    param: Option<String>,
    check: Arc<dyn ValueCheck>,
}

impl LeafConstraint {
    /// Binds `check` to the rule `name` and its parameter.
    pub fn new(name: impl Into<String>, param: Option<String>, check: Arc<dyn ValueCheck>) -> Self {
        Self {
            name: name.into(),
            param,
            check,
        }
    }

    /// The rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rule parameter, if any.
    #[must_use]
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    /// Runs the check.
    pub fn evaluate(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        self.check.check(value).map_err(|error| {
            let error = error.with_code(self.name.clone());
            match &self.param {
                Some(param) if error.param("param").is_none() => {
                    error.with_param("param", param.clone())
                }
                _ => error,
            }
        })
    }
}

impl fmt::Debug for LeafConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafConstraint")
            .field("name", &self.name)
            .field("param", &self.param)
            .finish_non_exhaustive()
    }
}
