//! Login, logout, registration, and whoami.

use chrono::NaiveDate;
use clap::Args;

use bloodbridge_core::error::AppError;
use bloodbridge_entity::{BloodGroup, RegistrationForm};

use super::{Context, ask, ask_password, choose, value_or_ask};
use crate::output;
use crate::commands::profile::print_donor;

/// Arguments for `login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Phone number
    #[arg(long)]
    pub contact: Option<String>,
    /// Password (will prompt if not provided)
    #[arg(long)]
    pub password: Option<String>,
}

/// Arguments for `register`
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Full name
    #[arg(long)]
    pub name: Option<String>,
    /// Phone number
    #[arg(long)]
    pub contact: Option<String>,
    /// Blood group, e.g. O+
    #[arg(long)]
    pub blood_group: Option<BloodGroup>,
    /// Location
    #[arg(long)]
    pub location: Option<String>,
    /// Age
    #[arg(long)]
    pub age: Option<u32>,
    /// Last donation date (YYYY-MM-DD)
    #[arg(long)]
    pub last_donated: Option<NaiveDate>,
}

pub async fn login(args: &LoginArgs, ctx: &Context) -> Result<(), AppError> {
    let contact = value_or_ask(&args.contact, "Phone").await?;
    let password = match &args.password {
        Some(p) => p.clone(),
        None => ask_password("Password".to_string()).await?,
    };

    let session = ctx.client.login(&contact, &password).await?;
    output::print_success(&format!("Logged in as {}", session.donor.name));
    Ok(())
}

pub async fn logout(ctx: &Context) -> Result<(), AppError> {
    ctx.client.logout().await;
    output::print_success("Logged out");
    Ok(())
}

pub async fn register(args: &RegisterArgs, ctx: &Context) -> Result<(), AppError> {
    let name = value_or_ask(&args.name, "Full name").await?;
    let contact = value_or_ask(&args.contact, "Phone").await?;
    let blood_group = match args.blood_group {
        Some(group) => group,
        None => pick_blood_group().await?,
    };
    let location = value_or_ask(&args.location, "Location").await?;
    let password = ask_password("Password".to_string()).await?;
    let confirm_password = ask_password("Confirm password".to_string()).await?;

    let form = RegistrationForm {
        name,
        contact,
        password,
        confirm_password,
        blood_group: Some(blood_group),
        location,
        age: args.age,
        last_donated: args.last_donated,
    };
    let donor = ctx.client.register(form).await?;
    output::print_success(&format!(
        "Registered {} ({}). You can now log in.",
        donor.name, donor.blood_group
    ));
    Ok(())
}

pub async fn whoami(ctx: &Context) -> Result<(), AppError> {
    match ctx.client.session().donor().await {
        Some(donor) => print_donor(&donor, ctx.format),
        None => output::print_warning("Not logged in"),
    }
    Ok(())
}

pub(crate) async fn pick_blood_group() -> Result<BloodGroup, AppError> {
    let labels = BloodGroup::ALL.iter().map(|g| g.to_string()).collect();
    let index = choose("Blood group".to_string(), labels).await?;
    BloodGroup::ALL
        .get(index)
        .copied()
        .ok_or_else(|| AppError::internal("Blood group selection out of range"))
}

pub(crate) async fn ask_optional(prompt: &str) -> Result<Option<String>, AppError> {
    let value = ask(format!("{prompt} (optional)"), true).await?;
    Ok(Some(value.trim().to_string()).filter(|v| !v.is_empty()))
}
