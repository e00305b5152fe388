use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Import modules
mod catalog;
mod constants;
mod generator;
mod html_template;
mod popup;
mod resolver;
mod settings;

use resolver::{HttpProbe, RepairRules, UrlResolver};
use settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("🗺️  Case Study Map v{} starting...", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load()?;
    info!("⚙️  Output: {}", settings.output_path);
    info!("⚙️  Probe timeout: {} s", settings.probe_timeout_secs);

    let sites = catalog::damage_sites().context("Failed to build site catalog")?;

    let probe = HttpProbe::new(settings.probe_timeout()).context("Failed to create HTTP client")?;
    let resolver = UrlResolver::new(
        probe,
        RepairRules {
            canonical_owner: settings.canonical_owner.clone(),
            placeholder_url: settings.placeholder_url.clone(),
        },
    );

    generator::run(&sites, &resolver, &settings, Path::new(&settings.output_path)).await?;

    Ok(())
}
