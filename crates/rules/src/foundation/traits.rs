//! The leaf validation trait
//!
//! [`Validate`] is implemented by the typed format checks (`str` inputs for
//! colors, emails, patterns). The registry lifts them onto runtime values
//! through [`Text`](crate::validators::Text).

/// A typed validation check.
///
/// # Examples
///
/// ```rust,ignore
/// use nebula_rules::foundation::{Validate, ValidationError};
///
/// struct MinLength {
///     min: usize,
/// }
///
/// impl Validate for MinLength {
///     type Input = str;
///
///     fn validate(&self, input: &Self::Input) -> Result<(), ValidationError> {
///         if input.len() >= self.min {
///             Ok(())
///         } else {
///             Err(ValidationError::new("min_length", "too short"))
///         }
///     }
/// }
/// ```
pub trait Validate {
    /// The type of input being validated.
    ///
    /// Use `?Sized` to allow validation of unsized types like `str`.
    type Input: ?Sized;

    /// Validates the input value.
    fn validate(&self, input: &Self::Input) -> Result<(), crate::foundation::ValidationError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::ValidationError;

    struct AlwaysValid;

    impl Validate for AlwaysValid {
        type Input = str;

        fn validate(&self, _input: &Self::Input) -> Result<(), ValidationError> {
            Ok(())
        }
    }

    #[test]
    fn test_validator_trait() {
        assert!(AlwaysValid.validate("test").is_ok());
    }
}
