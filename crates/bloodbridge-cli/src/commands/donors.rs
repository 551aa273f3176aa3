//! Donor directory commands.

use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use bloodbridge_client::directory::{Filter, PagedFetcher};
use bloodbridge_core::error::AppError;
use bloodbridge_core::types::DonorId;
use bloodbridge_entity::Donor;

use super::Context;
use super::profile::print_donor;
use crate::output::{self, OutputFormat, or_dash};

/// Arguments for donor commands
#[derive(Debug, Args)]
pub struct DonorsArgs {
    /// Donor subcommand
    #[command(subcommand)]
    pub command: DonorsCommand,
}

/// Donor subcommands
#[derive(Debug, Subcommand)]
pub enum DonorsCommand {
    /// Search donors by blood group and location
    Search {
        /// Blood group, or "all"
        #[arg(short, long)]
        blood_group: Option<String>,
        /// Location substring
        #[arg(short, long)]
        location: Option<String>,
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Show one donor
    Show {
        /// Donor ID
        id: String,
    },
}

/// Donor display row for table output
#[derive(Debug, Serialize, Tabled)]
struct DonorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Blood")]
    blood_group: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Donations")]
    donations: u32,
    #[tabled(rename = "Last donated")]
    last_donated: String,
    #[tabled(rename = "Availability")]
    availability: String,
}

impl From<&Donor> for DonorRow {
    fn from(d: &Donor) -> Self {
        Self {
            id: d.id.to_string(),
            name: d.name.clone(),
            blood_group: d.blood_group.to_string(),
            location: d.location.clone(),
            donations: d.donation_count,
            last_donated: or_dash(d.last_donated),
            availability: d.availability.to_string(),
        }
    }
}

/// Execute donor commands
pub async fn execute(args: &DonorsArgs, ctx: &Context) -> Result<(), AppError> {
    match &args.command {
        DonorsCommand::Search {
            blood_group,
            location,
            pages,
        } => {
            let mut filter = Filter::donors();
            if let Some(group) = blood_group {
                filter.set_blood_group_label(group)?;
            }
            if let Some(location) = location {
                filter.set_location(location);
            }

            let fetcher = PagedFetcher::<Donor>::new(Arc::new(ctx.client.clone()));
            fetcher.reset(filter).await?;
            for _ in 1..*pages {
                if !fetcher.load_more().await?.is_loaded() {
                    break;
                }
            }

            let rows: Vec<DonorRow> = fetcher.items().iter().map(DonorRow::from).collect();
            output::print_list(&rows, ctx.format);
            if ctx.format == OutputFormat::Table && !fetcher.is_exhausted() {
                println!("More donors available (use --pages).");
            }
        }
        DonorsCommand::Show { id } => {
            let donor = ctx.client.get_donor(&DonorId::new(id.as_str())).await?;
            print_donor(&donor, ctx.format);
        }
    }
    Ok(())
}
