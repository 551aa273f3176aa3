//! Blood request entities.

pub mod model;
pub mod status;
pub mod urgency;

pub use model::{BloodRequest, BloodRequestForm, CreateBloodRequest};
pub use status::RequestStatus;
pub use urgency::Urgency;
