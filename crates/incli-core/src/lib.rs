//! Core domain layer for incli.
//!
//! Holds the record model, the error taxonomy, command-line settings and
//! selector validation, client-side filtering and link formatting shared by
//! every other crate in the workspace.

pub mod error;
pub mod filter;
pub mod formatting;
pub mod models;
pub mod query;
pub mod settings;

pub use error::{IncliError, Result};
