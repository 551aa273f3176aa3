//! Donation records and receipts.

pub mod model;

pub use model::{Donation, DonationReceipt, DonationSubmission, DonorStats};
