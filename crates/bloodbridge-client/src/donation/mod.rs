//! The donation transaction: pick a request, choose units, confirm, settle.

pub mod flow;
pub mod state;

pub use flow::DonationFlow;
pub use state::{DonationOutcome, DonationState, units_label};
