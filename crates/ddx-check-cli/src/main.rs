mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use clap::Parser;
use ddxcheck::driver::DriverError;
use tracing::{debug, error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run_app().await {
        if let CliError::Driver(DriverError::Failed { stdout, stderr, .. }) = &e {
            println!("{}", stdout);
            eprintln!("{}", stderr);
        }
        eprintln!("❌ Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("ddx-check v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let app_config = config::build_config(&cli)?;
    let result = commands::check::run(&app_config, cli.quiet).await;

    match &result {
        Ok(_) => info!("✅ Check passed."),
        Err(e) => error!("❌ Check failed: {}", e),
    }
    result
}
