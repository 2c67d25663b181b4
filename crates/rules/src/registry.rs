//! Leaf-validator registry
//!
//! Maps rule names to factories. A factory receives the rule parameter and
//! returns a shared [`ValueCheck`], or a [`CompileErrorKind`] when the
//! parameter is missing, unexpected or malformed. The registry owns the
//! compiled [`Patterns`] that the built-in format checks share.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::compare::CompareOp;
use crate::error::CompileErrorKind;
use crate::foundation::ValidationError;
use crate::rules::is_reserved;
use crate::validators::{
    BooleanLike, Bound, IsDefault, Literal, OneOf, Patterns, Required, Text, color, text,
};
use crate::value::Value;

// ============================================================================
// VALUE CHECK
// ============================================================================

/// A single-value predicate usable as a leaf rule.
pub trait ValueCheck: Send + Sync {
    /// Checks `value`, returning the violation if it fails.
    fn check(&self, value: &Value<'_>) -> Result<(), ValidationError>;
}

/// A [`ValueCheck`] backed by a closure.
pub struct FnCheck<F>(F);

impl<F> ValueCheck for FnCheck<F>
where
    F: Fn(&Value<'_>) -> Result<(), ValidationError> + Send + Sync,
{
    fn check(&self, value: &Value<'_>) -> Result<(), ValidationError> {
        (self.0)(value)
    }
}

impl<F> fmt::Debug for FnCheck<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnCheck")
    }
}

/// Wraps a closure as a [`ValueCheck`].
pub fn from_fn<F>(check: F) -> FnCheck<F>
where
    F: Fn(&Value<'_>) -> Result<(), ValidationError> + Send + Sync,
{
    FnCheck(check)
}

/// Builds a check from an optional rule parameter.
pub type LeafFactory =
    Arc<dyn Fn(Option<&str>) -> Result<Arc<dyn ValueCheck>, CompileErrorKind> + Send + Sync>;

fn shared(check: impl ValueCheck + 'static) -> Arc<dyn ValueCheck> {
    Arc::new(check)
}

fn factory<F>(build: F) -> LeafFactory
where
    F: Fn(Option<&str>) -> Result<Arc<dyn ValueCheck>, CompileErrorKind> + Send + Sync + 'static,
{
    Arc::new(build)
}

/// A factory for a rule without a parameter.
fn fixed(name: &'static str, check: impl ValueCheck + 'static) -> LeafFactory {
    let check = shared(check);
    factory(move |param| match param {
        Some(_) => Err(CompileErrorKind::UnexpectedParameter(name.to_owned())),
        None => Ok(Arc::clone(&check)),
    })
}

/// A factory for a rule with a mandatory parameter.
fn with_param<F>(name: &'static str, build: F) -> LeafFactory
where
    F: Fn(&str) -> Result<Arc<dyn ValueCheck>, CompileErrorKind> + Send + Sync + 'static,
{
    factory(move |param| match param {
        Some(param) if !param.is_empty() => build(param),
        _ => Err(CompileErrorKind::MissingParameter(name.to_owned())),
    })
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Rule name to factory map.
#[derive(Clone)]
pub struct LeafRegistry {
    factories: HashMap<String, LeafFactory>,
    patterns: Arc<Patterns>,
}

impl LeafRegistry {
    /// A registry holding the built-in rules.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.install_builtins();
        registry
    }

    /// A registry without any rules.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
            patterns: Arc::new(Patterns::compile()),
        }
    }

    /// Registers a parameterised rule, replacing any previous one.
    ///
    /// Names reserved by the gates and the cross-field rules are refused;
    /// the call logs a warning and returns `false`.
    pub fn register<F>(&mut self, name: impl Into<String>, build: F) -> bool
    where
        F: Fn(Option<&str>) -> Result<Arc<dyn ValueCheck>, CompileErrorKind> + Send + Sync + 'static,
    {
        self.insert(name.into(), factory(build))
    }

    /// Registers a rule that takes no parameter.
    pub fn register_check(&mut self, name: impl Into<String>, check: impl ValueCheck + 'static) -> bool {
        let name = name.into();
        let check = shared(check);
        let owned = name.clone();
        self.insert(
            name,
            factory(move |param| match param {
                Some(_) => Err(CompileErrorKind::UnexpectedParameter(owned.clone())),
                None => Ok(Arc::clone(&check)),
            }),
        )
    }

    fn insert(&mut self, name: String, factory: LeafFactory) -> bool {
        if is_reserved(&name) || name.is_empty() || name.contains(['|', ',', '=']) {
            tracing::warn!(rule = %name, "ignoring leaf registration for a reserved or malformed name");
            return false;
        }
        self.factories.insert(name, factory);
        true
    }

    /// Whether a rule with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Builds the check for `name` with its parameter.
    ///
    /// # Errors
    ///
    /// [`CompileErrorKind::UnknownRule`] for unregistered names, otherwise
    /// whatever the factory reports about the parameter.
    pub fn build(&self, name: &str, param: Option<&str>) -> Result<Arc<dyn ValueCheck>, CompileErrorKind> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| CompileErrorKind::UnknownRule(name.to_owned()))?;
        factory(param)
    }

    /// Registered rule names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// The shared compiled patterns.
    #[must_use]
    pub fn patterns(&self) -> &Patterns {
        &self.patterns
    }

    fn install_builtins(&mut self) {
        let p = Arc::clone(&self.patterns);

        let builtins: Vec<(&'static str, LeafFactory)> = vec![
            // presence
            ("required", fixed("required", Required)),
            ("isdefault", fixed("isdefault", IsDefault)),
            ("boolean", fixed("boolean", BooleanLike)),
            // literals
            ("eq", with_param("eq", |param| Ok(shared(Literal::equal(param))))),
            ("ne", with_param("ne", |param| Ok(shared(Literal::not_equal(param))))),
            ("oneof", with_param("oneof", |param| Ok(shared(OneOf::parse(param))))),
            // colors
            ("hexcolor", fixed("hexcolor", Text(color::hex_color(&p)))),
            ("rgb", fixed("rgb", Text(color::rgb(&p)))),
            ("rgba", fixed("rgba", Text(color::rgba(&p)))),
            ("hsl", fixed("hsl", Text(color::hsl(&p)))),
            ("hsla", fixed("hsla", Text(color::hsla(&p)))),
            // formats
            ("email", fixed("email", Text(text::email(&p)))),
            ("url", fixed("url", Text(text::url(&p)))),
            ("uuid", fixed("uuid", Text(text::uuid(&p)))),
            ("alpha", fixed("alpha", Text(text::alpha(&p)))),
            ("alphanum", fixed("alphanum", Text(text::alphanum(&p)))),
            ("numeric", fixed("numeric", Text(text::numeric(&p)))),
            ("lowercase", fixed("lowercase", Text(text::lowercase()))),
            ("uppercase", fixed("uppercase", Text(text::uppercase()))),
            ("ip", fixed("ip", Text(text::ip()))),
            ("ipv4", fixed("ipv4", Text(text::ipv4()))),
            ("ipv6", fixed("ipv6", Text(text::ipv6()))),
            // substrings
            ("contains", with_param("contains", |param| Ok(shared(Text(text::contains(param)))))),
            ("excludes", with_param("excludes", |param| Ok(shared(Text(text::excludes(param)))))),
            ("startswith", with_param("startswith", |param| Ok(shared(Text(text::starts_with(param)))))),
            ("endswith", with_param("endswith", |param| Ok(shared(Text(text::ends_with(param)))))),
            (
                "regexp",
                with_param("regexp", |param| {
                    text::matches_regex(param)
                        .map(|check| shared(Text(check)))
                        .map_err(|e| CompileErrorKind::InvalidParameter {
                            rule: "regexp".into(),
                            param: param.to_owned(),
                            reason: e.to_string(),
                        })
                }),
            ),
        ];

        let bounds = [
            ("min", CompareOp::Gte),
            ("max", CompareOp::Lte),
            ("len", CompareOp::Eq),
            ("gt", CompareOp::Gt),
            ("gte", CompareOp::Gte),
            ("lt", CompareOp::Lt),
            ("lte", CompareOp::Lte),
        ];

        for (name, factory) in builtins {
            self.factories.insert(name.to_owned(), factory);
        }
        for (name, op) in bounds {
            let factory = with_param(name, move |param| {
                Bound::parse(name, op, param).map(shared)
            });
            self.factories.insert(name.to_owned(), factory);
        }
    }
}

impl Default for LeafRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LeafRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafRegistry")
            .field("rules", &self.names())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("hexcolor", None, "#fff", true)]
    #[case("rgb", None, "rgb(1,2,3)", true)]
    #[case("email", None, "a@b.co", true)]
    #[case("min", Some("3"), "ab", false)]
    #[case("len", Some("2"), "ab", true)]
    #[case("oneof", Some("a b"), "b", true)]
    #[case("contains", Some("x"), "axb", true)]
    #[case("regexp", Some("^a+$"), "aaa", true)]
    #[case("regexp", Some("^a+$"), "aab", false)]
    fn test_builtins(
        #[case] name: &str,
        #[case] param: Option<&str>,
        #[case] input: &str,
        #[case] passes: bool,
    ) {
        let registry = LeafRegistry::new();
        let check = registry.build(name, param).unwrap();
        assert_eq!(check.check(&Value::Str(input)).is_ok(), passes);
    }

    #[rstest]
    #[case("nosuch", None, CompileErrorKind::UnknownRule("nosuch".into()))]
    #[case("min", None, CompileErrorKind::MissingParameter("min".into()))]
    #[case("email", Some("x"), CompileErrorKind::UnexpectedParameter("email".into()))]
    fn test_build_errors(
        #[case] name: &str,
        #[case] param: Option<&str>,
        #[case] expected: CompileErrorKind,
    ) {
        assert_eq!(LeafRegistry::new().build(name, param).err(), Some(expected));
    }

    #[test]
    fn test_invalid_parameters() {
        let registry = LeafRegistry::new();
        assert!(matches!(
            registry.build("min", Some("abc")).err(),
            Some(CompileErrorKind::InvalidParameter { rule, .. }) if rule == "min"
        ));
        assert!(matches!(
            registry.build("regexp", Some("(")).err(),
            Some(CompileErrorKind::InvalidParameter { rule, .. }) if rule == "regexp"
        ));
    }

    #[test]
    fn test_register_custom_and_reserved() {
        let mut registry = LeafRegistry::new();
        assert!(registry.register_check(
            "even",
            from_fn(|value| match value {
                Value::Uint(n) if n % 2 == 0 => Ok(()),
                _ => Err(ValidationError::new("even", "Must be even")),
            })
        ));
        let even = registry.build("even", None).unwrap();
        assert!(even.check(&Value::Uint(4)).is_ok());
        assert!(even.check(&Value::Uint(3)).is_err());

        assert!(!registry.register_check("eqfield", Required));
        assert!(!registry.contains("eqfield"));
        assert!(!registry.register_check("a|b", Required));
    }

    #[test]
    fn test_names_are_sorted() {
        let registry = LeafRegistry::new();
        let names = registry.names();
        assert!(names.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(names.contains(&"hsla"));
        assert!(LeafRegistry::empty().is_empty());
    }
}
