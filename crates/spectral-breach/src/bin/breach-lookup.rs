//! Look up email addresses in the Dehashed breach database.
//!
//! Reads the Dehashed account from `~/.config/spectral/config.toml` or the
//! `SPECTRAL_DEHASHED_*` environment variables and prints every emitted
//! event as one JSON line on stdout. Ctrl-C stops after the current input.

use anyhow::Context;
use clap::Parser;
use spectral_breach::{
    ChannelSink, DehashedModule, EventKind, HandleOutcome, ModuleOptions, ScanEvent,
};
use spectral_core::{AppConfig, EmailAddress};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "breach-lookup", version, about)]
struct Cli {
    /// Email addresses to look up
    #[arg(required = true)]
    emails: Vec<String>,

    /// Maximum number of pages to query per address
    #[arg(long)]
    max_pages: Option<u32>,

    /// Search endpoint to use instead of the configured one
    #[arg(long)]
    endpoint: Option<String>,
}

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,spectral=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    info!("Starting breach-lookup v{}", env!("CARGO_PKG_VERSION"));

    let mut config = AppConfig::load_with_env().context("failed to load configuration")?;
    if let Some(pages) = cli.max_pages {
        config.breach.max_pages = Some(pages);
    }
    if let Some(endpoint) = cli.endpoint {
        config.breach.endpoint = endpoint;
    }

    let options = ModuleOptions::from_config(&config).context("invalid Dehashed options")?;

    let (tx, mut rx) = mpsc::unbounded_channel::<ScanEvent>();
    let mut module = DehashedModule::connect(options, ChannelSink::new(tx))
        .context("failed to create Dehashed client")?;

    let cancel = module.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, finishing current lookup");
            cancel.cancel();
        }
    });

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!("Could not serialize {} event: {}", event.kind, e),
            }
        }
    });

    for raw in cli.emails {
        let email = match EmailAddress::new(raw.as_str()) {
            Ok(email) => email,
            Err(e) => {
                warn!("Skipping {}: {}", raw, e);
                continue;
            }
        };

        let event = ScanEvent::root(EventKind::EmailAddr, email.as_str(), "breach-lookup");
        match module.handle_event(&event).await {
            HandleOutcome::Dispatched(summary) => info!(
                "{}: {} records over {} pages ({:?})",
                email, summary.raw_records, summary.pages_fetched, summary.stop
            ),
            HandleOutcome::Halted => {
                anyhow::bail!("Dehashed account email and API key must both be configured")
            }
            HandleOutcome::Cancelled => break,
            HandleOutcome::AlreadySeen | HandleOutcome::Ignored => {}
        }
    }

    // Dropping the module closes the channel so the printer can drain and exit.
    drop(module);
    printer.await.context("event printer task failed")?;

    Ok(())
}
