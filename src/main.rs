//! vidhub - command-line client for the video platform

use clap::{CommandFactory, Parser};

mod cache;
mod cli;
mod client;
mod config;
mod error;
mod output;
mod router;
mod session;
mod store;
mod videos;

use cli::{
    CacheCommands, Cli, CommandContext, Commands, ConfigCommands, GlobalOptions, VideoCommands,
};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);
    log::debug!("Running {:?} with origin {}", cli.command, opts.origin_or_default());

    let ctx = || CommandContext::new(&opts);

    match cli.command {
        Commands::Config(ConfigCommands::Show) => cli::config::show(&opts),
        Commands::Routes => cli::navigate::routes(opts.format),
        Commands::Navigate { path } => cli::navigate::run(&ctx()?, &path).await,
        Commands::Login { username, password } => {
            cli::auth::login(&ctx()?, username, password).await
        }
        Commands::Logout => cli::auth::logout(&ctx()?).await,
        Commands::Register { username, password } => {
            cli::auth::register(&ctx()?, username, password).await
        }
        Commands::Whoami => cli::auth::whoami(&ctx()?).await,
        Commands::Videos(VideoCommands::List {
            page,
            page_size,
            all_formats,
        }) => cli::videos::list(&ctx()?, page, page_size, all_formats).await,
        Commands::Fetch {
            identifier,
            url,
            long,
        } => cli::videos::fetch(&ctx()?, &identifier, &url, long).await,
        Commands::Cache(cache_cmd) => {
            let ctx = ctx()?;
            match cache_cmd {
                CacheCommands::Status => cli::cache::status(&ctx),
                CacheCommands::Clear { pattern } => cli::cache::clear(&ctx, &pattern),
                CacheCommands::Path => cli::cache::path(&ctx),
            }
        }
        Commands::Completion { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "vidhub", &mut std::io::stdout());
            Ok(())
        }
    }
}
