use anyhow::Result;
use clap::Parser;

use netspam::{
    app::ScanApp,
    cli::{Cli, Command},
    config,
    infrastructure::{directories, logging, shutdown},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths)?;

    let app = ScanApp::initialize(config, paths).await?;
    match cli.command {
        Command::Scan { json } => app.scan_once(json).await,
        Command::Report { json } => app.show_report(json).await,
        Command::Daemon => {
            let (signal, _) = shutdown::Shutdown::new();
            shutdown::install_signal_handlers(signal.clone());
            app.run_daemon(signal).await
        }
    }
}
