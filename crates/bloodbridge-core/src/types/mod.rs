//! Core type definitions used across the BloodBridge workspace.

pub mod id;
pub mod pagination;
pub mod response;

pub use id::*;
pub use pagination::Page;
pub use response::server_message;
