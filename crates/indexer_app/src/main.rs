//! Interactive console binary for the keyword-indexing engine.
mod config;
mod console;

use std::path::Path;

use anyhow::Result;

use indexer_engine::Engine;

fn main() -> Result<()> {
    indexer_logging::initialize(log::LevelFilter::Info)?;
    log::info!("initializing...");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "indexer.ron".to_string());
    let config = config::load(Path::new(&config_path));
    if config.keywords.is_empty() {
        log::warn!("no keywords configured; every scan will report empty counts");
    }

    let engine = Engine::start(config.engine_settings())?;
    console::run(&engine);

    // The console has finished; tear the pipeline down in order.
    engine.stop();
    log::info!("stopping main...");
    Ok(())
}
