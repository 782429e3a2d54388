mod cli;
mod commands;
mod errors;
mod output;
mod runtime;

use app::{AppBuilder, Application};
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use portal_client::ClientConfig;

use crate::cli::Cli;
use crate::runtime::Runtime;

struct Examiner;

impl Application for Examiner {
    const APP_ID: &'static str = "examiner";
}

#[tokio::main]
pub async fn main() -> Result<()> {
    errors::init()?;
    let args = Cli::parse();

    // Configuration decides the log level, so it is read before logging starts.
    let paths = app::path_context::<Examiner>();
    let config = ClientConfig::load(&paths.config_dir())?;

    let level = args.log_level.as_deref().or(config.log_level.as_deref());
    let ctx = AppBuilder::<Examiner>::new(env!("CARGO_PKG_VERSION"))
        .log_level(level)
        .build()
        .map_err(|e| eyre!("initialisation failed: {e}"))?;
    tracing::info!(version = ctx.version(), api = %config.api_base_url, "examiner started");

    let runtime = Runtime::new(ctx, config, args.json);
    commands::run(args.cmd, &runtime).await
}
