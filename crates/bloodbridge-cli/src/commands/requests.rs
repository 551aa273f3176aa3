//! Blood request commands: list, show, create, and the interactive browser.

use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use bloodbridge_client::directory::{Filter, LoadOutcome, PagedFetcher, SearchController, SearchEvent, SkipReason};
use bloodbridge_core::error::AppError;
use bloodbridge_core::types::RequestId;
use bloodbridge_entity::{BloodRequest, BloodRequestForm, Urgency};

use super::auth::{ask_optional, pick_blood_group};
use super::{Context, ask, value_or_ask};
use crate::output::{self, OutputFormat, or_dash};

/// Arguments for request commands
#[derive(Debug, Args)]
pub struct RequestsArgs {
    /// Request subcommand
    #[command(subcommand)]
    pub command: RequestsCommand,
}

/// Filter flags shared by `list` and `browse`
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Blood group, or "all"
    #[arg(short, long)]
    pub blood_group: Option<String>,
    /// Location substring
    #[arg(short, long)]
    pub location: Option<String>,
    /// Urgency label, or "all"
    #[arg(short, long)]
    pub urgency: Option<String>,
}

/// Request subcommands
#[derive(Debug, Subcommand)]
pub enum RequestsCommand {
    /// List active requests
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
        /// Most urgent first
        #[arg(long)]
        by_urgency: bool,
    },
    /// Show one request
    Show {
        /// Request ID
        id: String,
    },
    /// Post a new request
    Create {
        /// Patient name
        #[arg(long)]
        name: Option<String>,
        /// Phone number
        #[arg(long)]
        contact: Option<String>,
        /// Hospital
        #[arg(long)]
        hospital: Option<String>,
        /// Location
        #[arg(long)]
        location: Option<String>,
        /// Units needed
        #[arg(long)]
        units: Option<u32>,
        /// Urgency label (Medium unless given)
        #[arg(long)]
        urgency: Option<Urgency>,
        /// Patient age
        #[arg(long)]
        age: Option<u32>,
        /// Needed by (YYYY-MM-DD)
        #[arg(long)]
        required_by: Option<NaiveDate>,
        /// Notes for donors
        #[arg(long)]
        notes: Option<String>,
    },
    /// Browse requests interactively with live filtering
    Browse {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

/// Request display row for table output
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct RequestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Patient")]
    name: String,
    #[tabled(rename = "Blood")]
    blood_group: String,
    #[tabled(rename = "Units")]
    units: u32,
    #[tabled(rename = "Urgency")]
    urgency: String,
    #[tabled(rename = "Hospital")]
    hospital: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Needed by")]
    required_by: String,
}

impl From<&BloodRequest> for RequestRow {
    fn from(r: &BloodRequest) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.name.clone(),
            blood_group: r.blood_group.to_string(),
            units: r.units_needed,
            urgency: r.urgency.to_string(),
            hospital: r.hospital.clone(),
            location: r.location.clone(),
            required_by: or_dash(r.required_by),
        }
    }
}

/// Execute request commands
pub async fn execute(args: &RequestsArgs, ctx: &Context) -> Result<(), AppError> {
    match &args.command {
        RequestsCommand::List {
            filter,
            pages,
            by_urgency,
        } => list(ctx, filter, *pages, *by_urgency).await,
        RequestsCommand::Show { id } => {
            let request = ctx.client.get_request(&RequestId::new(id.as_str())).await?;
            print_request(&request, ctx.format);
            Ok(())
        }
        RequestsCommand::Create {
            name,
            contact,
            hospital,
            location,
            units,
            urgency,
            age,
            required_by,
            notes,
        } => {
            let units_needed = match units {
                Some(u) => Some(*u),
                None => ask("Units needed".to_string(), false).await?.trim().parse().ok(),
            };
            let form = BloodRequestForm {
                name: value_or_ask(name, "Patient name").await?,
                blood_group: Some(pick_blood_group().await?),
                contact: value_or_ask(contact, "Phone").await?,
                hospital: value_or_ask(hospital, "Hospital").await?,
                location: match location {
                    Some(l) => l.clone(),
                    None => ask_optional("Location").await?.unwrap_or_default(),
                },
                patient_age: *age,
                units_needed,
                urgency: urgency.unwrap_or_default(),
                required_by: *required_by,
                notes: notes.clone().unwrap_or_default(),
            };
            let created = ctx.client.create_request(form).await?;
            output::print_success(&format!("Request {} posted", created.id));
            Ok(())
        }
        RequestsCommand::Browse { filter } => browse(ctx, filter).await,
    }
}

/// Build the starting filter: session defaults, then explicit flags.
async fn build_filter(ctx: &Context, args: &FilterArgs) -> Result<Filter, AppError> {
    let mut filter = ctx.request_filter().await;
    if let Some(group) = &args.blood_group {
        filter.set_blood_group_label(group)?;
    }
    if let Some(location) = &args.location {
        filter.set_location(location);
    }
    if let Some(urgency) = &args.urgency {
        filter.set_urgency_label(urgency)?;
    }
    Ok(filter)
}

async fn list(ctx: &Context, args: &FilterArgs, pages: u32, by_urgency: bool) -> Result<(), AppError> {
    let filter = build_filter(ctx, args).await?;
    let fetcher = PagedFetcher::<BloodRequest>::new(Arc::new(ctx.client.clone()));

    fetcher.reset(filter).await?;
    for _ in 1..pages {
        if !fetcher.load_more().await?.is_loaded() {
            break;
        }
    }

    let mut requests = fetcher.items();
    if by_urgency {
        requests.sort_by(|a, b| b.urgency.cmp_rank(&a.urgency));
    }
    let rows: Vec<RequestRow> = requests.iter().map(RequestRow::from).collect();
    output::print_list(&rows, ctx.format);
    if ctx.format == OutputFormat::Table && !fetcher.is_exhausted() {
        println!("More requests available (use --pages).");
    }
    Ok(())
}

pub(crate) fn print_request(r: &BloodRequest, format: OutputFormat) {
    output::print_record(
        r,
        &[
            ("ID", r.id.to_string()),
            ("Patient", r.name.clone()),
            ("Blood group", r.blood_group.to_string()),
            ("Units needed", r.units_needed.to_string()),
            ("Urgency", r.urgency.to_string()),
            ("Status", r.status.to_string()),
            ("Hospital", r.hospital.clone()),
            ("Location", r.location.clone()),
            ("Contact", r.contact.clone()),
            ("Patient age", or_dash(r.patient_age)),
            ("Needed by", or_dash(r.required_by)),
            ("Notes", or_dash(r.notes.as_deref())),
            ("Posted", or_dash(r.requested_at.map(|t| t.format("%Y-%m-%d %H:%M")))),
        ],
        format,
    );
}

const BROWSE_HELP: &str = "Commands (join several with ';'):
  group <G|all>      location <text>     urgency <U|all>
  clear              more                refresh
  show <id>          donate <id>         quit";

/// Interactive list: immediate first load, debounced filter edits.
async fn browse(ctx: &Context, args: &FilterArgs) -> Result<(), AppError> {
    let filter = build_filter(ctx, args).await?;
    let fetcher = Arc::new(PagedFetcher::<BloodRequest>::new(Arc::new(ctx.client.clone())));
    let (search, mut events) =
        SearchController::new(fetcher.clone(), filter, ctx.config.search.quiet_period());

    search.refresh().await?;
    show_list(&fetcher, &search.filter(), ctx.format);
    println!("{BROWSE_HELP}");

    loop {
        let line = ask("requests".to_string(), true).await?;
        let mut scheduled = false;
        let mut quit = false;

        for command in line.split(';').map(str::trim).filter(|c| !c.is_empty()) {
            let (verb, rest) = command.split_once(' ').unwrap_or((command, ""));
            let rest = rest.trim();
            match verb {
                "group" => {
                    let mut next = search.filter();
                    match next.set_blood_group_label(rest) {
                        Ok(()) => scheduled |= search.set_filter(next),
                        Err(e) => output::print_error(e.user_message()),
                    }
                }
                "urgency" => {
                    let mut next = search.filter();
                    match next.set_urgency_label(rest) {
                        Ok(()) => scheduled |= search.set_filter(next),
                        Err(e) => output::print_error(e.user_message()),
                    }
                }
                "location" => scheduled |= search.update(|f| f.set_location(rest)),
                "clear" => {
                    let donor = ctx.client.session().donor().await;
                    scheduled |= search.update(|f| f.clear(donor.as_ref()));
                }
                "more" => match search.load_more().await {
                    Ok(LoadOutcome::Loaded { .. }) => show_list(&fetcher, &search.filter(), ctx.format),
                    Ok(LoadOutcome::Skipped(SkipReason::Exhausted)) => {
                        output::print_warning("No more requests")
                    }
                    Ok(_) => {}
                    Err(e) => output::print_error(e.user_message()),
                },
                "refresh" => {
                    // Runs the pending edit now, so no debounced event follows.
                    scheduled = false;
                    match search.refresh().await {
                        Ok(_) => show_list(&fetcher, &search.filter(), ctx.format),
                        Err(e) => output::print_error(e.user_message()),
                    }
                }
                "show" => match find(&fetcher, rest) {
                    Some(request) => print_request(&request, ctx.format),
                    None => output::print_warning(&format!("No request {rest} in the list")),
                },
                "donate" => match find(&fetcher, rest) {
                    Some(request) => {
                        if let Err(e) =
                            super::donate::run(ctx, request, Some(fetcher.clone()), None, false).await
                        {
                            output::print_error(e.user_message());
                        }
                    }
                    None => output::print_warning(&format!("No request {rest} in the list")),
                },
                "quit" | "q" | "exit" => quit = true,
                "help" | "?" => println!("{BROWSE_HELP}"),
                other => output::print_warning(&format!("Unknown command '{other}'")),
            }
        }

        if quit {
            break;
        }
        // A later edit back to the list on screen cancels the reset.
        let event = if !scheduled {
            None
        } else if search.is_pending() {
            match events.recv().await {
                Some(event) => Some(event),
                None => break,
            }
        } else {
            events.try_recv().ok()
        };
        match event {
            Some(SearchEvent::Loaded { .. }) => show_list(&fetcher, &search.filter(), ctx.format),
            Some(SearchEvent::Failed { error, .. }) => output::print_error(error.user_message()),
            None => {}
        }
    }

    search.dispose();
    Ok(())
}

fn find(fetcher: &PagedFetcher<BloodRequest>, id: &str) -> Option<BloodRequest> {
    fetcher.items().into_iter().find(|r| r.id.as_str() == id)
}

fn show_list(fetcher: &PagedFetcher<BloodRequest>, filter: &Filter, format: OutputFormat) {
    let rows: Vec<RequestRow> = fetcher.items().iter().map(RequestRow::from).collect();
    if format == OutputFormat::Table {
        println!("Filter: {filter}");
    }
    output::print_list(&rows, format);
    if format == OutputFormat::Table && !fetcher.is_exhausted() {
        println!("Type 'more' to load the next page.");
    }
}
