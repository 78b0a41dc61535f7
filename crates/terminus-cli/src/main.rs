mod app;
mod cmd;
mod output;
mod prompt;

use app::App;
use clap::{Parser, Subcommand};
use cmd::upstream::FilterArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "terminus",
    about = "Manage hosted sites and their upstreams from the command line",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: ~/.terminus/config.yml)
    #[arg(long, global = true, env = "TERMINUS_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Answer yes to every confirmation prompt
    #[arg(long, global = true, short = 'y')]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Change the upstream of a site (experimental)
    #[command(name = "site:upstream:set")]
    SiteUpstreamSet {
        /// Site name
        site: String,
        /// Upstream id, taken from upstream:list
        upstream: String,
    },

    /// List the upstreams available to the current user
    #[command(name = "upstream:list")]
    UpstreamList {
        /// Only upstreams owned by this organization (id, name or machine name)
        #[arg(long)]
        org: Option<String>,
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show one upstream
    #[command(name = "upstream:info")]
    UpstreamInfo {
        /// Upstream id
        upstream: String,
    },

    /// List the upstreams owned by an organization
    #[command(name = "org:upstream:list")]
    OrgUpstreamList {
        /// Organization id, name or machine name
        organization: String,
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show the user the saved session belongs to
    #[command(name = "auth:whoami")]
    AuthWhoami,

    /// Delete the saved session
    #[command(name = "auth:logout")]
    AuthLogout,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = App::load(cli.config.as_deref(), cli.json, cli.yes).and_then(|app| {
        match &cli.command {
            Commands::SiteUpstreamSet { site, upstream } => {
                cmd::site_upstream::run(&app, site, upstream)
            }
            Commands::UpstreamList { org, filters } => {
                cmd::upstream::list(&app, org.as_deref(), filters)
            }
            Commands::UpstreamInfo { upstream } => cmd::upstream::info(&app, upstream),
            Commands::OrgUpstreamList {
                organization,
                filters,
            } => cmd::org_upstream::list(&app, organization, filters),
            Commands::AuthWhoami => cmd::auth::whoami(&app),
            Commands::AuthLogout => cmd::auth::logout(&app),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
