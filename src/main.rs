//! rustgrab - media link resolver
//!
//! Serves the `/analyze` API, or resolves a single URL from the command line.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rustgrab::app;
use rustgrab::utils::Settings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rustgrab", version, about = "Resolve media URLs into downloadable streams")]
struct Args {
    /// JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Allow borrowing a logged-in browser's cookies
    #[arg(long, global = true)]
    trusted: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Resolve one URL and print the JSON response
    Analyze { url: String },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if args.trusted {
        settings.trusted_environment = true;
    }
    if let Some(level) = args.log_level {
        settings.log_level = level;
    }

    // Initialize logging
    app::init_logging(&settings.log_level);

    let rt = tokio::runtime::Runtime::new()?;
    match args.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.host = host;
            }
            if let Some(port) = port {
                settings.port = port;
            }
            settings.validate();
            rt.block_on(app::run_server(settings))
        }
        Command::Analyze { url } => {
            let response = rt.block_on(app::analyze_once(&settings, &url))?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}
