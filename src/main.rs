//! CLI entry point for folio

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Load and render the Markdown posts of a portfolio blog", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List posts, newest first
    #[command(alias = "ls")]
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List post slugs
    Slugs,

    /// Show a single post
    Show {
        slug: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a post body to HTML
    Render { slug: String },

    /// Serve posts as a JSON API
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine site directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let load = || -> Result<folio::Folio> {
        let folio = folio::Folio::new(&base_dir)?;
        tracing::debug!("Posts directory: {:?}", folio.posts_dir);
        Ok(folio)
    };

    match cli.command {
        Commands::List { json } => folio::commands::list::run(&load()?, json).await?,
        Commands::Slugs => folio::commands::list::slugs(&load()?).await?,
        Commands::Show { slug, json } => {
            folio::commands::show::run(&load()?, &slug, json).await?
        }
        Commands::Render { slug } => folio::commands::render::run(&load()?, &slug).await?,
        Commands::Serve { port, ip } => {
            let folio = load()?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio::server::start(&folio, &ip, port).await?;
        }
        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
