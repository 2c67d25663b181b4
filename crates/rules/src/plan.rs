//! Compiled validation plans
//!
//! A [`CompiledPlan`] is the immutable result of compiling one record type:
//! per field, the anchor path, the gates and constraints in declaration
//! order, and the plan of the nested record if the field holds one. It
//! shares nothing mutable, so evaluation is a pure function of the plan and
//! the instance, and any number of threads can evaluate concurrently.

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::constraints::{Condition, Constraint};
use crate::foundation::ValidationErrors;
use crate::path::FieldPath;
use crate::schema::Record;
use crate::value::Value;

/// A plan that is published once compilation of its type completes.
///
/// Recursive types point back at their own slot.
pub(crate) type PlanSlot = Arc<OnceLock<Arc<CompiledPlan>>>;

// ============================================================================
// RULES
// ============================================================================

/// Stops the remaining rules of a field from running.
#[derive(Debug, Clone)]
pub enum Gate {
    /// `omitempty`: admits non-empty values only.
    OmitEmpty,
    /// `skip_unless`: admits when every condition matches.
    SkipUnless(Vec<Condition>),
}

impl Gate {
    /// Whether the rules after this gate run.
    #[must_use]
    pub fn admits(&self, record: &dyn Record, value: &Value<'_>) -> bool {
        match self {
            Self::OmitEmpty => !value.is_empty(),
            Self::SkipUnless(conditions) => conditions.iter().all(|c| c.matches(record)),
        }
    }
}

/// One step of a field's rule list.
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// A gate.
    Gate(Gate),
    /// A constraint.
    Check(Constraint),
}

// ============================================================================
// FIELD PLAN
// ============================================================================

/// Everything evaluated for one anchor.
#[derive(Clone)]
pub struct FieldPlan {
    anchor: FieldPath,
    rules: Vec<FieldRule>,
    nested: Option<PlanSlot>,
}

impl FieldPlan {
    pub(crate) fn new(anchor: FieldPath, rules: Vec<FieldRule>, nested: Option<PlanSlot>) -> Self {
        Self {
            anchor,
            rules,
            nested,
        }
    }

    /// The path violations are reported against.
    #[must_use]
    pub fn anchor(&self) -> &FieldPath {
        &self.anchor
    }

    /// Gates and constraints in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// The constraints only.
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.rules.iter().filter_map(|rule| match rule {
            FieldRule::Check(constraint) => Some(constraint),
            FieldRule::Gate(_) => None,
        })
    }

    /// The plan of the nested record, if the field holds one.
    #[must_use]
    pub fn nested(&self) -> Option<&CompiledPlan> {
        self.nested.as_ref()?.get().map(Arc::as_ref)
    }

    fn evaluate(&self, record: &dyn Record, errors: &mut ValidationErrors) {
        let value = match self.anchor.resolve_value(record) {
            Ok(value) => value,
            Err(error) => {
                tracing::trace!(anchor = %self.anchor, %error, "anchor unreachable, skipping");
                return;
            }
        };

        for rule in &self.rules {
            match rule {
                FieldRule::Gate(gate) => {
                    if !gate.admits(record, &value) {
                        break;
                    }
                }
                FieldRule::Check(constraint) => {
                    if let Err(error) = constraint.evaluate(record, &value) {
                        errors.add(error.with_field(self.anchor.as_str().to_owned()));
                    }
                }
            }
        }

        if let (Some(inner), Some(plan)) = (value.as_record(), self.nested()) {
            let mut nested = ValidationErrors::new();
            plan.evaluate_into(inner, &mut nested);
            errors.extend(
                nested
                    .into_iter()
                    .map(|error| error.with_field_prefix(self.anchor.as_str())),
            );
        }
    }
}

impl fmt::Debug for FieldPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPlan")
            .field("anchor", &self.anchor)
            .field("rules", &self.rules)
            .field("nested", &self.nested().map(CompiledPlan::record))
            .finish()
    }
}

// ============================================================================
// COMPILED PLAN
// ============================================================================

/// The compiled rules of one record type.
#[derive(Debug)]
pub struct CompiledPlan {
    record: &'static str,
    type_id: TypeId,
    fields: IndexMap<&'static str, FieldPlan>,
    record_rules: Vec<FieldPlan>,
}

impl CompiledPlan {
    pub(crate) fn new(
        record: &'static str,
        type_id: TypeId,
        fields: IndexMap<&'static str, FieldPlan>,
        record_rules: Vec<FieldPlan>,
    ) -> Self {
        Self {
            record,
            type_id,
            fields,
            record_rules,
        }
    }

    /// Name of the compiled record type.
    #[must_use]
    pub fn record(&self) -> &'static str {
        self.record
    }

    /// Identity of the compiled record type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Field plans in declaration order. Fields marked `-` are absent.
    #[must_use]
    pub fn fields(&self) -> &IndexMap<&'static str, FieldPlan> {
        &self.fields
    }

    /// The plan for one field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldPlan> {
        self.fields.get(name)
    }

    /// Record-level checks in declaration order.
    #[must_use]
    pub fn record_rules(&self) -> &[FieldPlan] {
        &self.record_rules
    }

    /// Number of constraints, not counting gates or nested plans.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.fields
            .values()
            .chain(&self.record_rules)
            .map(|field| field.constraints().count())
            .sum()
    }

    /// Evaluates every field, nested plan and record-level check.
    ///
    /// The instance must be of the compiled type; fields of any other type
    /// read as unreachable and are skipped.
    #[must_use]
    pub fn evaluate(&self, record: &dyn Record) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        self.evaluate_into(record, &mut errors);
        errors
    }

    fn evaluate_into(&self, record: &dyn Record, errors: &mut ValidationErrors) {
        for field in self.fields.values() {
            field.evaluate(record, errors);
        }
        for check in &self.record_rules {
            check.evaluate(record, errors);
        }
    }
}

// ============================================================================
// TYPED PLAN
// ============================================================================

/// A compiled plan bound to the record type it was compiled for.
///
/// Cheap to clone; clones share the compiled plan.
pub struct Plan<T> {
    inner: Arc<CompiledPlan>,
    _marker: PhantomData<fn(&T)>,
}

impl<T> Clone for Plan<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Plan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Plan").field(&self.inner.record).finish()
    }
}

impl<T: Record + 'static> Plan<T> {
    pub(crate) fn new(inner: Arc<CompiledPlan>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    /// Collects every violation of `value`, in plan order.
    #[must_use]
    pub fn evaluate(&self, value: &T) -> ValidationErrors {
        let errors = self.inner.evaluate(value);
        tracing::trace!(
            record = self.inner.record,
            violations = errors.len(),
            "evaluated plan"
        );
        errors
    }

    /// Like [`evaluate`](Self::evaluate), as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the violations if there are any.
    pub fn validate(&self, value: &T) -> Result<(), ValidationErrors> {
        self.evaluate(value).into_result(())
    }

    /// The shared compiled plan.
    #[must_use]
    pub fn compiled(&self) -> &Arc<CompiledPlan> {
        &self.inner
    }
}
