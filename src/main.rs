use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::{info, warn};

use epic_sync::catalog::{Catalog, Mirror};
use epic_sync::config::SyncConfig;
use epic_sync::reconcile;
use epic_sync::resize;
use epic_sync::sync_plan::SyncPlan;

#[derive(Parser, Debug)]
#[command(name = "epic-sync", version, about = "Sync a local mirror with the NASA EPIC image archive")]
struct Args {
    /// TOML configuration file; built-in defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory downloaded images are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Process at most this many missing dates per run
    #[arg(long)]
    max_dates: Option<usize>,

    /// Catalog API key; falls back to the NASAAPIKEY environment variable
    #[arg(long)]
    api_key: Option<String>,

    /// Also produce a {size}x{size} JPEG for every downloaded image
    #[arg(long)]
    resize: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SyncConfig::read(path)?,
        None => SyncConfig::from_template(&SyncConfig::template()),
    };
    if args.output_dir.is_some() {
        config.output_dir = args.output_dir.clone();
    }
    if args.max_dates.is_some() {
        config.max_dates = args.max_dates;
    }

    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    // The credential is read once here and threaded through explicitly. An
    // absent key is not validated up front; the catalog rejects it upstream.
    let api_key = args
        .api_key
        .or_else(|| env::var("NASAAPIKEY").ok())
        .unwrap_or_default();

    let catalog = Catalog::new(
        &config.catalog_url,
        &config.collection,
        &api_key,
        config.timeout(),
    )?;
    let mirror = Mirror::new(&config.mirror_url, config.timeout())?;

    let missing = reconcile::fetch_missing(&catalog, &mirror).await?;
    info!("{} dates missing from the mirror", missing.len());
    if missing.is_empty() {
        return Ok(());
    }

    let output_dir = config.output_dir();
    fs::create_dir_all(&output_dir)?;

    let plan = SyncPlan::generate(&catalog, &missing, &output_dir, config.max_dates).await?;
    info!("{} images to download", plan.len());
    plan.write(output_dir.join("sync_plan.json"))?;

    let summary = plan.execute(catalog.http_client(), config.concurrency).await;
    info!(
        "downloaded {}, skipped {}, failed {}",
        summary.downloaded.len(),
        summary.skipped,
        summary.failed.len()
    );
    for (output, error) in &summary.failed {
        warn!("{output}: {error}");
    }

    if let Some(size) = args.resize {
        for path in &summary.downloaded {
            match resize::resize(path, size) {
                Ok(out) => info!("resized {} -> {}", path.display(), out.display()),
                Err(err) => warn!("resize {}: {err}", path.display()),
            }
        }
    }

    Ok(())
}
