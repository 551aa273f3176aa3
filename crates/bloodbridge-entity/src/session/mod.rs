//! The authenticated donor's session record.

pub mod model;

pub use model::{LoginResponse, Session};
