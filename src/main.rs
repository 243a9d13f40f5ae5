use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gcp_inventory::config::ConfigFile;
use gcp_inventory::error::error_chain;
use gcp_inventory::{Collected, Inventory, InventoryConfig, InventoryError, RequestContext, ResourceKind};
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Inventory GCP resources across regions
#[derive(Parser, Debug)]
#[command(name = "gcp-inventory", version, about, long_about = None)]
struct Args {
    /// GCP project to inventory
    #[arg(short, long)]
    project: Option<String>,

    /// Region to inventory (repeatable)
    #[arg(short, long = "region")]
    regions: Vec<String>,

    /// Service account key file
    #[arg(long)]
    credentials_file: Option<PathBuf>,

    /// Resource kinds to collect (repeatable, default: all)
    #[arg(short, long = "kind")]
    kinds: Vec<ResourceKind>,

    /// Maximum zone calls in flight
    #[arg(long)]
    concurrency: Option<usize>,

    /// Overall deadline in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the full inventory as JSON
    #[arg(long)]
    json: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gcp-inventory started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("gcp-inventory").join("gcp-inventory.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".gcp-inventory").join("gcp-inventory.log");
    }
    PathBuf::from("gcp-inventory.log")
}

/// One line of the report: a kind, optionally in one region
#[derive(Debug, Serialize)]
struct Entry {
    kind: ResourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    collected: Option<Collected>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct Report {
    project: String,
    regions: Vec<String>,
    entries: Vec<Entry>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let file = ConfigFile::load();
    let project = file
        .effective_project(args.project.as_deref())
        .context("No GCP project configured. Set GOOGLE_CLOUD_PROJECT or use --project")?;
    let regions = file.effective_regions(&args.regions);

    let mut config = InventoryConfig::new(&project, regions)?.with_env_access_token();
    if let Some(path) = args.credentials_file.clone().or_else(|| file.credentials_file.clone()) {
        config = config.with_credentials_file(path);
    }
    if let Some(limit) = args.concurrency.or(file.max_concurrent_zones) {
        config = config.with_max_concurrent_zones(limit);
    }

    tracing::info!("Using project: {}, regions: {:?}", project, config.regions());

    let root = RequestContext::new();
    let ctx = match args.timeout {
        Some(secs) => root.with_timeout(Duration::from_secs(secs)),
        None => root.child(),
    };

    let token = root.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling in-flight calls");
            token.cancel();
        }
    });

    let inventory = Inventory::connect(&config).await?;

    let kinds = if args.kinds.is_empty() {
        ResourceKind::ALL.to_vec()
    } else {
        args.kinds.clone()
    };

    let report = collect_report(&inventory, &ctx, &config, &kinds).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

async fn collect_report(
    inventory: &Inventory,
    ctx: &RequestContext,
    config: &InventoryConfig,
    kinds: &[ResourceKind],
) -> Result<Report> {
    let project = config.project_id();
    let mut entries = Vec::new();

    for &kind in kinds {
        let regions: Vec<Option<&str>> = if kind.is_regional() {
            config.regions().iter().map(|r| Some(r.as_str())).collect()
        } else {
            vec![None]
        };

        for region in regions {
            let outcome = inventory.collect(ctx, kind, project, region).await;
            let (collected, error) = match outcome {
                Ok(collected) => (Some(collected), None),
                Err(e @ (InventoryError::Cancelled | InventoryError::DeadlineExceeded)) => {
                    return Err(e.into());
                }
                Err(e) => (None, Some(error_chain(&e))),
            };
            entries.push(Entry {
                kind,
                region: region.map(str::to_string),
                collected,
                error,
            });
        }
    }

    Ok(Report {
        project: project.to_string(),
        regions: config.regions().to_vec(),
        entries,
    })
}

fn print_report(report: &Report) {
    println!("Inventory for project {}", report.project);
    println!();

    for entry in &report.entries {
        let label = match &entry.region {
            Some(region) => format!("{} ({})", entry.kind, region),
            None => entry.kind.to_string(),
        };

        match (&entry.collected, &entry.error) {
            (_, Some(error)) => println!("  [FAIL] {}: {}", label, error),
            (Some(Collected::NotImplemented), _) => println!("  [-]    {}: not implemented", label),
            (Some(Collected::Partial(partial)), _) => {
                let marker = if partial.is_complete() { "[OK]  " } else { "[WARN]" };
                println!(
                    "  {} {}: {} ({}/{} zones)",
                    marker,
                    label,
                    partial.items.len(),
                    partial.zones_succeeded(),
                    partial.zones_attempted.len()
                );
                for failure in &partial.failures {
                    println!("           {} skipped: {}", failure.zone, failure.reason);
                }
            }
            (Some(Collected::Complete { items }), _) => {
                println!("  [OK]   {}: {}", label, items.len())
            }
            (None, None) => {}
        }
    }
}
