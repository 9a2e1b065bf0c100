use anyhow::Context;
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::fmt;
use vex2doc::cli::{run_cli, Cli};

fn main() {
    let cli = Cli::parse();
    let settings = cli.settings();

    // Initialize logging; a settings file or VEX2DOC_DEBUG can enable debug too
    let debug = settings.as_ref().map_or(cli.debug, |s| s.debug);
    let level = if debug { Level::DEBUG } else { Level::WARN };
    fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting vex2doc");

    let result = settings
        .and_then(|settings| run_cli(&settings))
        .context("vex2doc failed");
    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Application error: {:#}", e);
            std::process::exit(1);
        }
    }
}
