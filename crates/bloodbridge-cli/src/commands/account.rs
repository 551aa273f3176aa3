//! Account management.

use clap::{Args, Subcommand};

use bloodbridge_core::error::AppError;

use super::{Context, confirm};
use crate::output;

/// Arguments for account commands
#[derive(Debug, Args)]
pub struct AccountArgs {
    /// Account subcommand
    #[command(subcommand)]
    pub command: AccountCommand,
}

/// Account subcommands
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Permanently delete your donor account
    Delete {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Execute account commands
pub async fn execute(args: &AccountArgs, ctx: &Context) -> Result<(), AppError> {
    match &args.command {
        AccountCommand::Delete { yes } => {
            let session = ctx.client.session().require().await?;
            if !yes {
                let accepted = confirm(format!(
                    "Delete the account of {}? This cannot be undone.",
                    session.donor.name
                ))
                .await?;
                if !accepted {
                    output::print_warning("Aborted.");
                    return Ok(());
                }
            }
            ctx.client.delete_account().await?;
            output::print_success("Account deleted");
        }
    }
    Ok(())
}
