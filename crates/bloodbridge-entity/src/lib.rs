//! # bloodbridge-entity
//!
//! Domain models for BloodBridge: blood requests, donors, the authenticated
//! session record, donation receipts, and the canonical blood group and
//! urgency vocabularies.

pub mod blood_group;
pub mod de;
pub mod donation;
pub mod donor;
pub mod request;
pub mod rules;
pub mod session;
pub mod stats;

pub use blood_group::BloodGroup;
pub use donation::{Donation, DonationReceipt, DonationSubmission, DonorStats};
pub use donor::{Availability, CreateDonor, Donor, ProfileUpdate, RegistrationForm};
pub use request::{BloodRequest, BloodRequestForm, CreateBloodRequest, RequestStatus, Urgency};
pub use session::{LoginResponse, Session};
pub use stats::CommunityStats;
