use std::path::PathBuf;

use anyhow::{Context, Result};

use versalog::{Config, Logger};

fn main() -> Result<()> {
    // Diagnostics from the logger itself go to stderr
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "versalog=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    let logger = Logger::new(config).context("Invalid logger configuration")?;
    tracing::debug!("Logger settings: {:?}", logger.settings());

    logger.info("ok");
    logger.error("err");
    logger.warning("war");
    logger.debug("deb");
    logger.critical("cri");

    logger.shutdown();
    Ok(())
}
