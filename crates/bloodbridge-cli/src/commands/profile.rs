//! Profile commands for the logged-in donor.

use chrono::NaiveDate;
use clap::{Args, Subcommand};

use bloodbridge_core::error::AppError;
use bloodbridge_entity::{Availability, Donor, ProfileUpdate};

use super::Context;
use crate::output::{self, OutputFormat, or_dash};

/// Arguments for profile commands
#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Profile subcommand
    #[command(subcommand)]
    pub command: ProfileCommand,
}

/// Profile subcommands
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the cached profile
    Show,
    /// Re-read the profile from the server
    Refresh,
    /// Change editable profile fields
    Edit(EditArgs),
}

/// Editable profile fields; unset flags are left unchanged
#[derive(Debug, Args)]
pub struct EditArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub age: Option<u32>,
    #[arg(long)]
    pub weight: Option<String>,
    #[arg(long)]
    pub blood_pressure: Option<String>,
    /// "Available" or any other status text
    #[arg(long)]
    pub availability: Option<String>,
    #[arg(long)]
    pub emergency_contact: Option<String>,
    #[arg(long)]
    pub medical_history: Option<String>,
    #[arg(long)]
    pub preferred_time: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Last checkup date (YYYY-MM-DD)
    #[arg(long)]
    pub last_checkup: Option<NaiveDate>,
}

impl From<&EditArgs> for ProfileUpdate {
    fn from(a: &EditArgs) -> Self {
        Self {
            name: a.name.clone(),
            contact: a.contact.clone(),
            location: a.location.clone(),
            age: a.age,
            weight: a.weight.clone(),
            blood_pressure: a.blood_pressure.clone(),
            availability: a.availability.clone().map(Availability::from),
            emergency_contact: a.emergency_contact.clone(),
            medical_history: a.medical_history.clone(),
            preferred_time: a.preferred_time.clone(),
            notes: a.notes.clone(),
            last_checkup: a.last_checkup,
        }
    }
}

/// Execute profile commands
pub async fn execute(args: &ProfileArgs, ctx: &Context) -> Result<(), AppError> {
    match &args.command {
        ProfileCommand::Show => {
            let session = ctx.client.session().require().await?;
            print_donor(&session.donor, ctx.format);
        }
        ProfileCommand::Refresh => {
            ctx.client.session().require().await?;
            if let Some(donor) = ctx.client.refresh().await {
                print_donor(&donor, ctx.format);
            }
        }
        ProfileCommand::Edit(edit) => {
            let donor = ctx.client.update_profile(ProfileUpdate::from(edit)).await?;
            output::print_success("Profile updated");
            print_donor(&donor, ctx.format);
        }
    }
    Ok(())
}

pub(crate) fn print_donor(d: &Donor, format: OutputFormat) {
    output::print_record(
        d,
        &[
            ("ID", d.id.to_string()),
            ("Name", d.name.clone()),
            ("Blood group", d.blood_group.to_string()),
            ("Location", d.location.clone()),
            ("Contact", d.contact.clone()),
            ("Age", or_dash(d.age)),
            ("Weight", or_dash(d.weight.as_deref())),
            ("Blood pressure", or_dash(d.blood_pressure.as_deref())),
            ("Donations", d.donation_count.to_string()),
            ("Last donated", or_dash(d.last_donated)),
            ("Availability", d.availability.to_string()),
            ("Verified", if d.verified { "yes" } else { "no" }.to_string()),
            ("Emergency contact", or_dash(d.emergency_contact.as_deref())),
            ("Preferred time", or_dash(d.preferred_time.as_deref())),
            ("Last checkup", or_dash(d.last_checkup)),
        ],
        format,
    );
}
