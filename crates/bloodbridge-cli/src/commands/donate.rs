//! The `donate` command and the interactive donation dialog.

use std::sync::Arc;

use clap::Args;

use bloodbridge_client::directory::PagedFetcher;
use bloodbridge_client::{DonationFlow, DonationOutcome};
use bloodbridge_core::error::AppError;
use bloodbridge_core::types::RequestId;
use bloodbridge_entity::BloodRequest;

use super::{Context, ask, confirm};
use crate::output;

/// Arguments for `donate`
#[derive(Debug, Args)]
pub struct DonateArgs {
    /// Request ID
    pub request_id: String,
    /// Units to donate (will prompt if not provided)
    #[arg(short, long)]
    pub units: Option<u32>,
    /// Skip the confirmation question
    #[arg(short, long)]
    pub yes: bool,
}

/// Execute `donate`
pub async fn execute(args: &DonateArgs, ctx: &Context) -> Result<(), AppError> {
    let request = ctx
        .client
        .get_request(&RequestId::new(args.request_id.as_str()))
        .await?;
    run(ctx, request, None, args.units, args.yes).await
}

/// Walk the donor through one donation to `request`.
///
/// With `units` set the amount is not prompted for, and a bad amount is an
/// error. Otherwise the prompt repeats until the amount is valid or left
/// empty.
pub(crate) async fn run(
    ctx: &Context,
    request: BloodRequest,
    list: Option<Arc<PagedFetcher<BloodRequest>>>,
    units: Option<u32>,
    yes: bool,
) -> Result<(), AppError> {
    let mut flow = DonationFlow::new(ctx.client.clone());
    if let Some(list) = list {
        flow = flow.with_list(list);
    }

    let max_units = match flow.select(request).await? {
        DonationOutcome::LoginRequired { message } => {
            return Err(AppError::authentication(message));
        }
        DonationOutcome::UnitsPrompt { max_units } => max_units,
        other => return Err(AppError::internal(format!("Unexpected step: {other:?}"))),
    };

    let question = match units {
        Some(units) => flow.enter_units(&units.to_string())?,
        None => loop {
            let input = ask(format!("How many units? (max {max_units}, empty to cancel)"), true).await?;
            if input.trim().is_empty() {
                flow.cancel();
                output::print_warning("Donation cancelled");
                return Ok(());
            }
            match flow.enter_units(&input) {
                Ok(question) => break question,
                Err(e) if e.is_validation() => output::print_error(e.user_message()),
                Err(e) => return Err(e),
            }
        },
    };

    let DonationOutcome::Confirm { prompt, .. } = question else {
        return Err(AppError::internal("Expected a confirmation step"));
    };
    let accept = yes || confirm(prompt).await?;

    match flow.confirm(accept).await? {
        DonationOutcome::Declined => output::print_warning("Donation cancelled"),
        DonationOutcome::Settled { message, donor } => {
            output::print_success(&message);
            if let Some(donor) = donor {
                output::print_kv("Total donations", &donor.donation_count.to_string());
                output::print_kv("Last donated", &output::or_dash(donor.last_donated));
            }
        }
        other => return Err(AppError::internal(format!("Unexpected step: {other:?}"))),
    }
    Ok(())
}
