//! Prelude module for convenient imports.
//!
//! `use nebula_rules::prelude::*;` brings in the validator, the plan types,
//! both error tiers and the traits needed to describe records.

// ============================================================================
// ENTRY POINTS
// ============================================================================

pub use crate::config::ValidatorConfig;
pub use crate::plan::{CompiledPlan, FieldPlan, Plan};
pub use crate::validator::{Validator, ValidatorBuilder};

// ============================================================================
// ERRORS
// ============================================================================

pub use crate::error::{CompileError, CompileErrorKind};
pub use crate::foundation::{Validate, ValidationError, ValidationErrors};
pub use crate::path::PathError;

// ============================================================================
// RECORDS AND VALUES
// ============================================================================

pub use crate::schema::{Describe, Record, RecordType, TypeDesc};
pub use crate::value::{AsValue, Value};

// ============================================================================
// EXTENSION
// ============================================================================

pub use crate::registry::{LeafRegistry, ValueCheck, from_fn};
