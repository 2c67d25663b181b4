//! The validator entry point
//!
//! A [`Validator`] owns the leaf registry, the configuration and a cache of
//! compiled plans keyed by record type. Compiling is the only operation that
//! can fail and the only one that takes the write lock; once a type is
//! compiled every later call is a read-locked lookup.
//!
//! ```
//! use nebula_rules::prelude::*;
//!
//! nebula_rules::record! {
//!     #[derive(Debug, Default)]
//!     pub struct Signup {
//!         pub password: String => "required,min=8",
//!         pub confirm: String => "eqfield=password",
//!     }
//! }
//!
//! let validator = Validator::new();
//! let plan = validator.compile::<Signup>().unwrap();
//!
//! let signup = Signup {
//!     password: "correct horse".into(),
//!     confirm: "correct hose".into(),
//! };
//! let errors = plan.evaluate(&signup);
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors.errors()[0].code, "eqfield");
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::compiler::Compiler;
use crate::config::ValidatorConfig;
use crate::error::{CompileError, CompileErrorKind};
use crate::plan::{CompiledPlan, Plan, PlanSlot};
use crate::registry::{LeafRegistry, ValueCheck};
use crate::rules::is_reserved;
use crate::schema::{Record, RecordType};

// ============================================================================
// VALIDATOR
// ============================================================================

/// Compiles and caches validation plans.
///
/// `Validator` is `Send + Sync`; share it behind an `Arc` or a `static`.
pub struct Validator {
    config: ValidatorConfig,
    registry: LeafRegistry,
    cache: RwLock<HashMap<TypeId, PlanSlot>>,
}

impl Validator {
    /// A validator with the built-in rules and default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// A validator with the built-in rules and the given configuration.
    #[must_use]
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Starts configuring a validator.
    #[must_use]
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// The leaf rules available to rule strings.
    #[must_use]
    pub fn registry(&self) -> &LeafRegistry {
        &self.registry
    }

    /// Compiles the plan for `T`, or returns the cached one.
    ///
    /// # Errors
    ///
    /// Returns the first [`CompileError`] found in `T` or any record type
    /// reachable from it. Nothing is cached on failure.
    pub fn compile<T: Record + 'static>(&self) -> Result<Plan<T>, CompileError> {
        self.compile_record(T::schema()).map(Plan::new)
    }

    /// Compiles the plan for a record type described at runtime.
    ///
    /// # Errors
    ///
    /// See [`compile`](Self::compile).
    pub fn compile_record(&self, record: &'static RecordType) -> Result<Arc<CompiledPlan>, CompileError> {
        let type_id = record.type_id();
        if let Some(plan) = lookup(&self.cache.read(), type_id) {
            tracing::debug!(record = record.name(), "validation plan cache hit");
            return Ok(plan);
        }

        let mut cache = self.cache.write();
        if let Some(plan) = lookup(&cache, type_id) {
            tracing::debug!(record = record.name(), "validation plan cache hit");
            return Ok(plan);
        }
        Compiler::new(&self.registry, &self.config, &mut cache).compile(record)
    }

    /// Number of record types with a compiled plan.
    #[must_use]
    pub fn cached_plans(&self) -> usize {
        self.cache
            .read()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }
}

fn lookup(cache: &HashMap<TypeId, PlanSlot>, type_id: TypeId) -> Option<Arc<CompiledPlan>> {
    cache.get(&type_id)?.get().cloned()
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("cached_plans", &self.cached_plans())
            .finish()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`Validator`].
#[derive(Debug, Clone)]
#[must_use = "builder does nothing until .build() is called"]
pub struct ValidatorBuilder {
    config: ValidatorConfig,
    registry: LeafRegistry,
}

impl ValidatorBuilder {
    /// Starts from the built-in rules and the default configuration.
    pub fn new() -> Self {
        Self {
            config: ValidatorConfig::default(),
            registry: LeafRegistry::new(),
        }
    }

    /// Replaces the configuration, keeping aliases added so far.
    pub fn config(mut self, config: ValidatorConfig) -> Self {
        let mut aliases = std::mem::take(&mut self.config.aliases);
        aliases.extend(config.aliases);
        self.config = ValidatorConfig { aliases, ..config };
        self
    }

    /// Makes `name` stand for the rule string `rules`.
    ///
    /// Names reserved by the gates and cross-field rules are ignored with a
    /// warning.
    pub fn alias(mut self, name: impl Into<String>, rules: impl Into<String>) -> Self {
        let name = name.into();
        if is_reserved(&name) {
            tracing::warn!(alias = %name, "ignoring alias that shadows a reserved rule");
            return self;
        }
        self.config.aliases.insert(name, rules.into());
        self
    }

    /// Enables or disables evaluation of nested record fields.
    pub fn recurse_nested(mut self, recurse: bool) -> Self {
        self.config.recurse_nested = recurse;
        self
    }

    /// Registers a parameterised leaf rule.
    ///
    /// Reserved names are ignored with a warning.
    pub fn register<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(Option<&str>) -> Result<Arc<dyn ValueCheck>, CompileErrorKind> + Send + Sync + 'static,
    {
        self.registry.register(name, factory);
        self
    }

    /// Registers a leaf rule without a parameter.
    ///
    /// Reserved names are ignored with a warning.
    pub fn register_check(mut self, name: impl Into<String>, check: impl ValueCheck + 'static) -> Self {
        self.registry.register_check(name, check);
        self
    }

    /// Builds the validator.
    #[must_use]
    pub fn build(self) -> Validator {
        Validator {
            config: self.config,
            registry: self.registry,
            cache: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for ValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
