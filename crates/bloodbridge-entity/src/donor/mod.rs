//! Donor entities.

pub mod availability;
pub mod model;
pub mod profile;

pub use availability::Availability;
pub use model::Donor;
pub use profile::{CreateDonor, ProfileUpdate, RegistrationForm};
