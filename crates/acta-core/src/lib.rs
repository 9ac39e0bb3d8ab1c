//! # acta-core
//!
//! Core crate for the Acta document portal. Contains the unified error
//! system, the `AppResult` alias, and the configuration schemas shared by
//! every other crate.
//!
//! This crate has **no** internal dependencies on other Acta crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
