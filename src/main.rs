//! Rangeweb main entry point

use clap::Parser;
use rangeweb_api::start_server;
use rangeweb_client::HttpTransactionSource;
use rangeweb_config::Config;
use rangeweb_core::{MockTimezoneProvider, Session};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::RwLock;

#[derive(Parser, Debug)]
#[command(name = "rangeweb")]
#[command(author = "Rangeweb Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight, timezone-aware date-range transaction explorer", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let rt = Runtime::new()?;

    rt.block_on(async {
        let config = Config::load(args.config.clone())
            .expect("Failed to load configuration");

        eprintln!("[INFO] Config loaded: endpoint={}, default timezone={}",
            config.source.endpoint_url, config.defaults.timezone);

        let source = Arc::new(HttpTransactionSource::new(config.source.endpoint_url.clone()));
        let mut session = Session::new(&config, source)
            .expect("Failed to initialize session");

        // The provider replaces the seeded single-entry list; a failure here
        // is logged and the seeded default stays active.
        let provider = MockTimezoneProvider::default();
        session.load_timezones(&provider).await;
        eprintln!("[INFO] {} timezone option(s) available", session.timezones().options().len());

        // Initial fetch for the default look-back window. A failure leaves
        // the table empty with the fetch-failure message set.
        session.refresh().await;
        match session.error() {
            None => eprintln!("[INFO] Initial fetch complete: {} record(s)", session.table().data().len()),
            Some(message) => eprintln!("[WARN] Initial fetch failed: {}", message),
        }

        let session = Arc::new(RwLock::new(session));
        start_server(config, session).await
    });

    Ok(())
}
