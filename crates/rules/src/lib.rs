//! # nebula-rules
//!
//! Declarative, tag-driven validation of records for the Nebula workflow
//! engine.
//!
//! Rules are attached to fields as strings (`"required,min=3"`,
//! `"eqfield=password"`, `"omitempty,hexcolor|rgb"`). A [`Validator`]
//! compiles the rules of a record type once into an immutable
//! [`Plan`](plan::Plan), resolving and type-checking every field reference up
//! front. Evaluating a plan never fails; it returns every violation found.
//!
//! ## Quick Start
//!
//! ```rust
//! use nebula_rules::prelude::*;
//!
//! nebula_rules::record! {
//!     #[derive(Debug, Default)]
//!     pub struct Address {
//!         pub country: String => "required",
//!         pub state: String => "required_if=country:US",
//!     }
//! }
//!
//! let plan = Validator::new().compile::<Address>().unwrap();
//! let errors = plan.evaluate(&Address {
//!     country: "US".into(),
//!     state: String::new(),
//! });
//! assert_eq!(errors.errors()[0].code, "required_if");
//! assert_eq!(errors.errors()[0].field_name(), Some("state"));
//! ```
//!
//! ## Rule families
//!
//! - **Leaf rules** look at one value: `required`, `min`, `email`, `hexcolor`,
//!   and anything registered through [`ValidatorBuilder`].
//! - **Cross-field rules** relate a field to others by path:
//!   `eqfield`, `gtfield`, `required_if`, `required_with_all`,
//!   `excluded_without`, ...
//! - **Alternatives** (`a|b|c`) pass when any branch passes.
//! - **Gates** (`-`, `omitempty`, `skip_unless`) control whether the rest of
//!   a field's rules run.
//!
//! ## Errors
//!
//! Broken rule strings are configuration errors: [`Validator::compile`]
//! returns a [`CompileError`](error::CompileError). Invalid data is reported
//! as [`ValidationErrors`](foundation::ValidationErrors).

// ValidationError is the violation type for every rule and is returned by
// value throughout.
#![allow(clippy::result_large_err)]
// Factory signatures spell out the boxed closure types they accept.
#![allow(clippy::type_complexity)]

pub mod compare;
mod compiler;
pub mod config;
pub mod constraints;
pub mod error;
pub mod foundation;
mod macros;
pub mod path;
pub mod plan;
pub mod prelude;
pub mod registry;
pub mod rules;
pub mod schema;
pub mod validator;
pub mod validators;
pub mod value;

pub use validator::{Validator, ValidatorBuilder};
