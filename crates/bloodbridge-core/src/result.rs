//! Convenience result type alias for BloodBridge.

use crate::error::AppError;

/// A specialized `Result` type for BloodBridge operations.
pub type AppResult<T> = Result<T, AppError>;
