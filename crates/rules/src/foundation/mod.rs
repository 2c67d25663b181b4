//! Violation types and the typed validation trait
//!
//! - **Traits**: [`Validate`]
//! - **Errors**: [`ValidationError`], [`ValidationErrors`]
//!
//! Violations are the recoverable tier: they describe bad data and are always
//! collected. Misconfigured rules never show up here; they fail compilation
//! with a [`CompileError`](crate::error::CompileError).

pub mod error;
pub mod traits;

pub use error::{ValidationError, ValidationErrors};
pub use traits::Validate;
