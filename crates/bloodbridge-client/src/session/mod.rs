//! The authenticated donor record and its persistence.

pub mod manager;
pub mod store;

pub use manager::{LOGIN_REQUIRED_MESSAGE, SessionManager};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
