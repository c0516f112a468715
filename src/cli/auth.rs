//! Login, logout, registration and identity commands

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};
use serde_json::json;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::output;

/// Use the given credentials or prompt for the missing ones
fn credentials(username: Option<String>, password: Option<String>) -> Result<(String, String)> {
    let username = match username {
        Some(u) => u,
        None => Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Username")
            .interact_text()?,
    };
    let password = match password {
        Some(p) => p,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()?,
    };
    Ok((username, password))
}

/// Run the login command
pub async fn login(
    ctx: &CommandContext,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let (username, password) = credentials(username, password)?;
    let user = ctx.session().login(&username, &password).await?;

    match ctx.format {
        OutputFormat::Json => output::print_json(&user),
        _ => {
            println!("{} Logged in as {}", "✓".green(), user.username.bold());
            if user.is_admin {
                println!("  {}", "administrator".dimmed());
            }
            Ok(())
        }
    }
}

/// Run the logout command
pub async fn logout(ctx: &CommandContext) -> Result<()> {
    ctx.session().logout().await?;

    match ctx.format {
        OutputFormat::Json => output::print_json(&json!({ "logged_out": true })),
        _ => {
            println!("{} Logged out", "✓".green());
            Ok(())
        }
    }
}

/// Run the register command
pub async fn register(
    ctx: &CommandContext,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let (username, password) = credentials(username, password)?;
    let message = ctx.session().register(&username, &password).await?;

    match ctx.format {
        OutputFormat::Json => {
            output::print_json(&json!({ "username": username, "message": message }))
        }
        _ => {
            println!("{} {}", "✓".green(), message);
            Ok(())
        }
    }
}

/// Show who the backend thinks we are
pub async fn whoami(ctx: &CommandContext) -> Result<()> {
    let session = ctx.session();
    let info = session.current_user().await?;

    match ctx.format {
        OutputFormat::Json => output::print_json(&info),
        _ => {
            println!("Username:  {}", info.username.bold());
            println!("Approved:  {}", if info.is_approved { "yes" } else { "no" });
            println!("Admin:     {}", if info.is_admin { "yes" } else { "no" });
            if session.flag().user().is_none() {
                println!(
                    "{}",
                    "⚠ No local login recorded; protected routes will ask you to log in.".yellow()
                );
            }
            Ok(())
        }
    }
}
