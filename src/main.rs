//! QuakeMap - interactive earthquake maps from your terminal.
//!
//! Fetches earthquake events from the USGS query service, maps each
//! one through a deterministic depth-to-color encoding, and emits a
//! Leaflet map page (to a file or over HTTP) or the raw encodings.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

mod cli;
mod client;
mod encode;
mod errors;
mod map;
mod models;
mod output;
mod query;
mod server;

use cli::{Cli, Command};
use client::FdsnClient;
use errors::QuakeMapError;
use models::FeatureCollection;
use query::QuerySpec;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Render(args) => cmd_render(args),
        Command::Encode(args) => cmd_encode(args),
        Command::Serve(args) => cmd_serve(args),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Fetch the events matching a query spec.
fn fetch(spec: &QuerySpec) -> Result<FeatureCollection> {
    let client = FdsnClient::new().context("failed to create USGS client")?;
    let collection = client
        .fetch_events(spec)
        .context("failed to fetch earthquake events")?;

    tracing::info!(
        "fetched {} events ({} to {})",
        collection.features.len(),
        spec.start.format("%Y-%m-%d %H:%M"),
        spec.end.format("%Y-%m-%d %H:%M")
    );

    Ok(collection)
}

/// Execute the `render` command - fetch and write a standalone map page.
fn cmd_render(args: cli::RenderArgs) -> Result<()> {
    let collection = fetch(&args.query.to_spec())?;

    let page = map::render_page(&collection.features, &args.view.to_options());
    std::fs::write(&args.output, page).map_err(|source| QuakeMapError::Write {
        path: args.output.clone(),
        source,
    })?;

    println!(
        "wrote map of {} events to {}",
        collection.features.len(),
        args.output
    );
    Ok(())
}

/// Execute the `encode` command - fetch and print visual encodings.
fn cmd_encode(args: cli::EncodeArgs) -> Result<()> {
    let collection = fetch(&args.query.to_spec())?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_events(&mut handle, &collection.features, args.format)?;

    Ok(())
}

/// Execute the `serve` command - fetch once, then serve the map.
fn cmd_serve(args: cli::ServeArgs) -> Result<()> {
    // The one network fetch happens up front; the server only ever
    // hands out the snapshot taken here.
    let collection = fetch(&args.query.to_spec())?;

    let config = server::ServerConfig {
        host: args.host.clone(),
        port: args.port,
        options: args.view.to_options(),
    };

    let url = format!("http://{}:{}", args.host, args.port);
    println!("\x1b[1m🌍 QuakeMap\x1b[0m");
    println!("  Local:  \x1b[96m{url}\x1b[0m");
    println!("  Events: {}", collection.features.len());
    println!("\x1b[2mPress Ctrl+C to stop\x1b[0m\n");

    // Open browser if requested (using xdg-open/open command)
    if args.open {
        #[cfg(target_os = "linux")]
        let _ = std::process::Command::new("xdg-open").arg(&url).spawn();
        #[cfg(target_os = "macos")]
        let _ = std::process::Command::new("open").arg(&url).spawn();
        #[cfg(target_os = "windows")]
        let _ = std::process::Command::new("cmd").args(["/c", "start", &url]).spawn();
    }

    // Run the async server on tokio runtime
    tokio::runtime::Runtime::new()
        .context("failed to create tokio runtime")?
        .block_on(server::run_server(config, collection))
}
