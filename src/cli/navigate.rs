//! Route listing and guarded navigation commands

use colored::Colorize;
use tabled::Tabled;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::Result;
use crate::output::{self, table};
use crate::router::{NavigationOutcome, ROUTES, Route};

/// Route for table display
#[derive(Tabled)]
struct RouteDisplay {
    #[tabled(rename = "PATH")]
    path: &'static str,
    #[tabled(rename = "NAME")]
    name: &'static str,
    #[tabled(rename = "VIEW")]
    view: String,
    #[tabled(rename = "AUTH")]
    auth: &'static str,
}

impl From<&Route> for RouteDisplay {
    fn from(route: &Route) -> Self {
        Self {
            path: route.path,
            name: route.name,
            view: route.view.to_string(),
            auth: if route.requires_auth { "required" } else { "-" },
        }
    }
}

/// List the route table
pub fn routes(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => output::print_json(ROUTES),
        _ => {
            let rows: Vec<RouteDisplay> = ROUTES.iter().map(RouteDisplay::from).collect();
            println!("{}", table::format_table(&rows, "No routes defined."));
            Ok(())
        }
    }
}

/// Navigate to `path` through the guard and report where we landed
pub async fn run(ctx: &CommandContext, path: &str) -> Result<()> {
    let mut router = ctx.router();
    let outcome = router.navigate(path).await;

    match ctx.format {
        OutputFormat::Json => output::print_json(&outcome),
        _ => {
            match outcome {
                NavigationOutcome::Completed { route, redirects } => {
                    for hop in &redirects {
                        println!(
                            "{} {}",
                            "↪".yellow(),
                            format!("redirected from {}", hop).dimmed()
                        );
                    }
                    println!(
                        "{} {} ({})",
                        "✓".green(),
                        route.path.bold(),
                        route.view
                    );
                }
                NavigationOutcome::Aborted { path, reason } => {
                    println!("{} {}: {}", "✗".red(), path.bold(), reason);
                }
            }
            Ok(())
        }
    }
}
