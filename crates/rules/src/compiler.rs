//! Rule compilation
//!
//! Turns the rule strings of a record type into a [`CompiledPlan`]. Every
//! field reference is resolved and type-checked here, so the first problem
//! aborts compilation and nothing is left to fail at evaluation time.
//!
//! Plans are published into slots keyed by `TypeId` before their fields are
//! compiled. A nested field whose type is already being compiled (directly
//! or through a cycle) links to the pending slot instead of recursing.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::compare::CompareOp;
use crate::config::ValidatorConfig;
use crate::constraints::{AnyOf, Condition, Constraint, CrossField, LeafConstraint};
use crate::error::{CompileError, CompileErrorKind};
use crate::path::FieldPath;
use crate::plan::{CompiledPlan, FieldPlan, FieldRule, Gate, PlanSlot};
use crate::registry::LeafRegistry;
use crate::rules::{RuleParser, RuleSpec, SKIP_UNLESS, relational_tag};
use crate::schema::{RecordType, TypeKind};

pub(crate) struct Compiler<'a> {
    registry: &'a LeafRegistry,
    parser: RuleParser<'a>,
    config: &'a ValidatorConfig,
    cache: &'a mut HashMap<TypeId, PlanSlot>,
    inserted: Vec<TypeId>,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(
        registry: &'a LeafRegistry,
        config: &'a ValidatorConfig,
        cache: &'a mut HashMap<TypeId, PlanSlot>,
    ) -> Self {
        Self {
            registry,
            parser: RuleParser::new(&config.aliases),
            config,
            cache,
            inserted: Vec::new(),
        }
    }

    /// Compiles `root` and every record type reachable from it.
    ///
    /// On failure no slot created by this run stays in the cache.
    pub(crate) fn compile(mut self, root: &'static RecordType) -> Result<Arc<CompiledPlan>, CompileError> {
        match self.build(root) {
            Ok(plan) => Ok(plan),
            Err(error) => {
                for type_id in self.inserted.drain(..) {
                    self.cache.remove(&type_id);
                }
                tracing::debug!(record = root.name(), %error, "plan compilation failed");
                Err(error)
            }
        }
    }

    fn build(&mut self, root: &'static RecordType) -> Result<Arc<CompiledPlan>, CompileError> {
        let slot = PlanSlot::default();
        self.cache.insert(root.type_id(), Arc::clone(&slot));
        self.inserted.push(root.type_id());

        let mut fields = IndexMap::with_capacity(root.fields().len());
        for (index, def) in root.fields().iter().enumerate() {
            let fail = |kind: CompileErrorKind| CompileError::new(root.name(), def.name(), kind);

            let specs = self.parser.parse(def.rules()).map_err(fail)?;
            if specs.contains(&RuleSpec::Skip) {
                continue;
            }

            let anchor = FieldPath::declared(root, index, def);
            let rules = self.build_rules(&anchor, specs).map_err(fail)?;
            let nested = match def.ty().record() {
                Some(inner) if self.config.recurse_nested && def.is_exported() => {
                    Some(self.nested(inner)?)
                }
                _ => None,
            };

            if !rules.is_empty() || nested.is_some() {
                fields.insert(def.name(), FieldPlan::new(anchor, rules, nested));
            }
        }

        let mut record_rules = Vec::with_capacity(root.checks().len());
        for check in root.checks() {
            let fail = |kind: CompileErrorKind| CompileError::new(root.name(), check.anchor, kind);

            let anchor = FieldPath::resolve(root, check.anchor).map_err(|e| fail(e.into()))?;
            let specs = self.parser.parse(check.rules).map_err(fail)?;
            if specs.contains(&RuleSpec::Skip) {
                continue;
            }
            let rules = self.build_rules(&anchor, specs).map_err(fail)?;
            record_rules.push(FieldPlan::new(anchor, rules, None));
        }

        let plan = Arc::new(CompiledPlan::new(
            root.name(),
            root.type_id(),
            fields,
            record_rules,
        ));
        // The slot was created above and nothing else sets it.
        let _ = slot.set(Arc::clone(&plan));

        tracing::debug!(
            record = root.name(),
            fields = plan.fields().len(),
            rules = plan.rule_count(),
            "compiled validation plan"
        );
        Ok(plan)
    }

    fn nested(&mut self, record: &'static RecordType) -> Result<PlanSlot, CompileError> {
        if let Some(slot) = self.cache.get(&record.type_id()) {
            return Ok(Arc::clone(slot));
        }
        let plan = self.build(record)?;
        Ok(Arc::new(OnceLock::from(plan)))
    }

    fn build_rules(&self, anchor: &FieldPath, specs: Vec<RuleSpec>) -> Result<Vec<FieldRule>, CompileErrorKind> {
        specs
            .into_iter()
            .map(|spec| match spec {
                RuleSpec::OmitEmpty => Ok(FieldRule::Gate(Gate::OmitEmpty)),
                RuleSpec::SkipUnless(pairs) => {
                    let conditions = resolve_conditions(anchor, SKIP_UNLESS, pairs)?;
                    Ok(FieldRule::Gate(Gate::SkipUnless(conditions)))
                }
                spec => self.build_constraint(anchor, spec).map(FieldRule::Check),
            })
            .collect()
    }

    fn build_constraint(&self, anchor: &FieldPath, spec: RuleSpec) -> Result<Constraint, CompileErrorKind> {
        match spec {
            RuleSpec::Leaf { name, param } => {
                let check = self.registry.build(&name, param.as_deref())?;
                Ok(LeafConstraint::new(name, param, check).into())
            }
            RuleSpec::Relational { op, target } => {
                let tag = relational_tag(op);
                let target = target_path(anchor, tag, &target)?;
                ensure_comparable(tag, op, anchor, &target)?;
                Ok(CrossField::Relational { op, target }.into())
            }
            RuleSpec::Presence { kind, targets } => {
                let targets = targets
                    .iter()
                    .map(|target| target_path(anchor, kind.tag(), target))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CrossField::Presence { kind, targets }.into())
            }
            RuleSpec::Conditional { kind, pairs } => {
                let conditions = resolve_conditions(anchor, kind.tag(), pairs)?;
                Ok(CrossField::Conditional { kind, conditions }.into())
            }
            RuleSpec::Any(branches) => {
                let branches = branches
                    .into_iter()
                    .map(|branch| match branch {
                        RuleSpec::Leaf { .. } | RuleSpec::Relational { .. } => {
                            self.build_constraint(anchor, branch)
                        }
                        other => Err(CompileErrorKind::NotAlternative(other.tag())),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(AnyOf::new(branches).into())
            }
            gate => Err(CompileErrorKind::NotAlternative(gate.tag())),
        }
    }
}

/// Resolves `Field:literal` pairs. Only `skip_unless` may name its own field.
fn resolve_conditions(
    anchor: &FieldPath,
    rule: &str,
    pairs: Vec<(String, String)>,
) -> Result<Vec<Condition>, CompileErrorKind> {
    pairs
        .into_iter()
        .map(|(field, literal)| {
            let target = if rule == SKIP_UNLESS {
                FieldPath::resolve(anchor.root(), &field)?
            } else {
                target_path(anchor, rule, &field)?
            };
            Ok(Condition::new(target, literal))
        })
        .collect()
}

/// Resolves a cross-field target from the anchor's root.
fn target_path(anchor: &FieldPath, rule: &str, dotted: &str) -> Result<FieldPath, CompileErrorKind> {
    let target = FieldPath::resolve(anchor.root(), dotted)?;
    if target.same_field(anchor) {
        return Err(CompileErrorKind::SelfReference {
            rule: rule.to_owned(),
            field: dotted.to_owned(),
        });
    }
    Ok(target)
}

/// Relational rules need both sides in one comparison domain.
fn ensure_comparable(
    rule: &str,
    op: CompareOp,
    anchor: &FieldPath,
    target: &FieldPath,
) -> Result<(), CompileErrorKind> {
    let (Some(anchor_ty), Some(target_ty)) = (anchor.target_type(), target.target_type()) else {
        return Ok(());
    };
    let (left, right) = (anchor_ty.kind(), target_ty.kind());
    let comparable = left == right
        && left != TypeKind::Record
        && !(left == TypeKind::Bool && op.is_ordering());
    if comparable {
        Ok(())
    } else {
        Err(CompileErrorKind::IncompatibleTypes {
            rule: rule.to_owned(),
            field: target.as_str().to_owned(),
            anchor: left,
            target: right,
        })
    }
}
