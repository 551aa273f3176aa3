//! # bloodbridge-core
//!
//! Core crate for the BloodBridge directory client. Contains configuration
//! schemas, typed identifiers, the server page envelope, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other BloodBridge crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
