//! String validators
//!
//! Typed checks over `str` and the [`Text`] adapter that applies them to
//! runtime values.

use std::net::IpAddr;

use regex::Regex;

use crate::foundation::{Validate, ValidationError};
use crate::registry::ValueCheck;
use crate::validators::Patterns;
use crate::value::Value;

// ============================================================================
// ADAPTER
// ============================================================================

/// Applies a `str` validator to a [`Value`].
///
/// Non-string values are reported as a type mismatch.
#[derive(Debug, Clone)]
pub struct Text<V>(pub V);

impl<V> ValueCheck for Text<V>
where
    V: Validate<Input = str> + Send + Sync,
{
    fn check(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        match value.as_str() {
            Some(text) => self.0.validate(text),
            None => Err(ValidationError::type_mismatch("string", value.kind().as_str())),
        }
    }
}

// ============================================================================
// FORMATS
// ============================================================================

crate::validator! {
    /// Validates email format.
    pub Email { pattern: Regex } for str;
    rule(self, input) { self.pattern.is_match(input) }
    error(self, input) { ValidationError::invalid_format("email address") }
    new(patterns: &Patterns) { Self { pattern: patterns.email.clone() } }
    fn email(patterns: &Patterns);
}

crate::validator! {
    /// Validates URL format.
    pub Url { pattern: Regex } for str;
    rule(self, input) { self.pattern.is_match(input) }
    error(self, input) { ValidationError::invalid_format("url") }
    new(patterns: &Patterns) { Self { pattern: patterns.url.clone() } }
    fn url(patterns: &Patterns);
}

crate::validator! {
    /// Validates a hyphenated UUID.
    pub Uuid { pattern: Regex } for str;
    rule(self, input) { self.pattern.is_match(input) }
    error(self, input) { ValidationError::invalid_format("uuid") }
    new(patterns: &Patterns) { Self { pattern: patterns.uuid.clone() } }
    fn uuid(patterns: &Patterns);
}

crate::validator! {
    /// Validates that a string matches a caller-supplied regular expression.
    pub MatchesRegex { pattern: Regex } for str;
    rule(self, input) { self.pattern.is_match(input) }
    error(self, input) {
        ValidationError::invalid_format("pattern match")
            .with_param("pattern", self.pattern.as_str().to_owned())
    }
    new(pattern: &str) -> regex::Error {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
    fn matches_regex(pattern: &str) -> regex::Error;
}

// ============================================================================
// CHARACTER CLASSES
// ============================================================================

crate::validator! {
    /// Validates that a string contains only ASCII letters.
    pub Alpha { pattern: Regex } for str;
    rule(self, input) { self.pattern.is_match(input) }
    error(self, input) { ValidationError::new("alpha", "String must contain only letters") }
    new(patterns: &Patterns) { Self { pattern: patterns.alpha.clone() } }
    fn alpha(patterns: &Patterns);
}

crate::validator! {
    /// Validates that a string contains only ASCII letters and digits.
    pub Alphanum { pattern: Regex } for str;
    rule(self, input) { self.pattern.is_match(input) }
    error(self, input) { ValidationError::new("alphanum", "String must contain only letters and numbers") }
    new(patterns: &Patterns) { Self { pattern: patterns.alphanum.clone() } }
    fn alphanum(patterns: &Patterns);
}

crate::validator! {
    /// Validates that a string is a decimal number.
    pub Numeric { pattern: Regex } for str;
    rule(self, input) { self.pattern.is_match(input) }
    error(self, input) { ValidationError::new("numeric", "String must be a number") }
    new(patterns: &Patterns) { Self { pattern: patterns.numeric.clone() } }
    fn numeric(patterns: &Patterns);
}

crate::validator! {
    /// Validates that a string is lowercase.
    pub Lowercase for str;
    rule(input) { input.chars().all(|c| !c.is_alphabetic() || c.is_lowercase()) }
    error(input) { ValidationError::new("lowercase", "String must be lowercase") }
    fn lowercase();
}

crate::validator! {
    /// Validates that a string is uppercase.
    pub Uppercase for str;
    rule(input) { input.chars().all(|c| !c.is_alphabetic() || c.is_uppercase()) }
    error(input) { ValidationError::new("uppercase", "String must be uppercase") }
    fn uppercase();
}

// ============================================================================
// SUBSTRINGS
// ============================================================================

crate::validator! {
    /// Validates that a string contains a substring.
    #[derive(PartialEq, Eq, Hash)]
    pub Contains { substring: String } for str;
    rule(self, input) { input.contains(self.substring.as_str()) }
    error(self, input) {
        ValidationError::new("contains", format!("String must contain '{}'", self.substring))
            .with_param("substring", self.substring.clone())
    }
    new(substring: impl Into<String>) { Self { substring: substring.into() } }
    fn contains(substring: impl Into<String>);
}

crate::validator! {
    /// Validates that a string does not contain a substring.
    #[derive(PartialEq, Eq, Hash)]
    pub Excludes { substring: String } for str;
    rule(self, input) { !input.contains(self.substring.as_str()) }
    error(self, input) {
        ValidationError::new("excludes", format!("String must not contain '{}'", self.substring))
            .with_param("substring", self.substring.clone())
    }
    new(substring: impl Into<String>) { Self { substring: substring.into() } }
    fn excludes(substring: impl Into<String>);
}

crate::validator! {
    /// Validates that a string starts with a prefix.
    #[derive(PartialEq, Eq, Hash)]
    pub StartsWith { prefix: String } for str;
    rule(self, input) { input.starts_with(self.prefix.as_str()) }
    error(self, input) {
        ValidationError::new("startswith", format!("String must start with '{}'", self.prefix))
            .with_param("prefix", self.prefix.clone())
    }
    new(prefix: impl Into<String>) { Self { prefix: prefix.into() } }
    fn starts_with(prefix: impl Into<String>);
}

crate::validator! {
    /// Validates that a string ends with a suffix.
    #[derive(PartialEq, Eq, Hash)]
    pub EndsWith { suffix: String } for str;
    rule(self, input) { input.ends_with(self.suffix.as_str()) }
    error(self, input) {
        ValidationError::new("endswith", format!("String must end with '{}'", self.suffix))
            .with_param("suffix", self.suffix.clone())
    }
    new(suffix: impl Into<String>) { Self { suffix: suffix.into() } }
    fn ends_with(suffix: impl Into<String>);
}

// ============================================================================
// NETWORK
// ============================================================================

crate::validator! {
    /// Validates an IPv4 or IPv6 address.
    pub Ip for str;
    rule(input) { input.parse::<IpAddr>().is_ok() }
    error(input) { ValidationError::invalid_format("ip address") }
    fn ip();
}

crate::validator! {
    /// Validates an IPv4 address.
    pub Ipv4 for str;
    rule(input) { input.parse::<IpAddr>().is_ok_and(|addr| addr.is_ipv4()) }
    error(input) { ValidationError::invalid_format("ipv4 address") }
    fn ipv4();
}

crate::validator! {
    /// Validates an IPv6 address.
    pub Ipv6 for str;
    rule(input) { input.parse::<IpAddr>().is_ok_and(|addr| addr.is_ipv6()) }
    error(input) { ValidationError::invalid_format("ipv6 address") }
    fn ipv6();
}

// ============================================================================
// TESTS
// ============================================================================
