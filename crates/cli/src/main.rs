mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use tracksync_core::{
    create_order_filter, load_config, validate_config, MeyerClient, OrderFilter, OrdoroClient,
    PlatformGateway, Reconciler, RunMode, SanitizedConfig, SyncReport, TawClient, TrackingSource,
};

/// Copy supplier tracking numbers onto Ordoro orders awaiting tracking.
#[derive(Debug, Parser)]
#[command(name = "get-tracking", version)]
struct Args {
    /// Run mode: -t/t/test or -p/p/prod/production (defaults to test)
    #[arg(allow_hyphen_values = true)]
    mode: Option<String>,

    /// Path to the TOML configuration file
    #[arg(long, env = "TRACKSYNC_CONFIG", default_value = "tracksync.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Args::parse()).await {
        error!("Fatal error: {:#}", e);
        eprintln!("get-tracking: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    // The mode is checked before anything touches the config file.
    let mode = RunMode::from_arg(args.mode.as_deref())
        .context("Unsupported argument passed in")?;

    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    validate_config(&config).context("Configuration validation failed")?;

    let (_log_guard, log_path) = logging::init_logging(&config.logging)?;
    info!("Logging to {:?}", log_path);

    if args.mode.is_none() {
        info!("No argument passed, defaulting to TEST mode.");
    }
    info!(mode = %mode, "Running in {} mode", mode);

    let sanitized = SanitizedConfig::from(&config);
    info!(
        "Configuration: {}",
        serde_json::to_string(&sanitized).unwrap_or_default()
    );

    let platform: Arc<dyn PlatformGateway> = Arc::new(
        OrdoroClient::new(config.platform.clone()).context("Failed to create Ordoro client")?,
    );
    let filter: Arc<dyn OrderFilter> = Arc::from(create_order_filter(mode, &config.mode));
    info!("Using {} order filter", filter.policy_name());

    let taw = TawClient::new(config.taw.clone()).context("Failed to create TAW client")?;
    let meyer = MeyerClient::new(config.meyer.clone()).context("Failed to create Meyer client")?;

    let engine = Reconciler::new(platform, filter);

    // TAW first, then Meyer. A listing failure for one supplier does not
    // stop the other.
    let sources: [&dyn TrackingSource; 2] = [&taw, &meyer];
    for source in sources {
        sync_source(&engine, source).await;
    }

    info!("Done.");
    Ok(())
}

async fn sync_source(engine: &Reconciler, source: &dyn TrackingSource) {
    let run_id = Uuid::new_v4();
    let span = info_span!("sync", supplier = %source.name(), run_id = %run_id);

    async {
        match engine.sync_supplier(source).await {
            Ok(report) => log_report(&report),
            Err(e) => error!(error = %e, "Could not list orders awaiting tracking"),
        }
    }
    .instrument(span)
    .await
}

fn log_report(report: &SyncReport) {
    info!(
        orders = report.orders_found,
        not_listed = report.orders_not_listed,
        reconciled = report.reconciled(),
        skipped = report.skipped(),
        no_records = report.without_records(),
        failed = report.failed(),
        shipping_writes = report.shipping_writes(),
        comment_writes = report.comment_writes(),
        "{} run complete",
        report.supplier
    );

    if report.failed() > 0 {
        warn!(
            "{} of {} {} orders need manual attention",
            report.failed(),
            report.orders_found,
            report.supplier
        );
    }
}
