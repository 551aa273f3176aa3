//! Community totals and personal donation history.

use serde::Serialize;
use tabled::Tabled;

use bloodbridge_core::error::AppError;
use bloodbridge_entity::Donation;

use super::Context;
use crate::output::{self, or_dash};

/// Donation display row for table output
#[derive(Debug, Serialize, Tabled)]
struct DonationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Units")]
    units: u32,
    #[tabled(rename = "Hospital")]
    hospital: String,
    #[tabled(rename = "Location")]
    location: String,
}

impl From<&Donation> for DonationRow {
    fn from(d: &Donation) -> Self {
        Self {
            id: d.id.to_string(),
            date: or_dash(d.donation_date),
            units: d.units_donated,
            hospital: d.hospital.clone(),
            location: d.location.clone(),
        }
    }
}

pub async fn community(ctx: &Context) -> Result<(), AppError> {
    let stats = ctx.client.stats().await?;
    output::print_record(
        &stats,
        &[
            ("Donations", stats.total_donations.to_string()),
            ("Donors", stats.total_donors.to_string()),
            ("Requests", stats.total_requests.to_string()),
        ],
        ctx.format,
    );
    Ok(())
}

pub async fn donations(ctx: &Context) -> Result<(), AppError> {
    let donations = ctx.client.my_donations().await?;
    let rows: Vec<DonationRow> = donations.iter().map(DonationRow::from).collect();
    output::print_list(&rows, ctx.format);
    Ok(())
}
