//! # Histopedia
//!
//! Console entry point: logging, configuration, then the menus.
//!
//! ## Environment
//! - `HISTOPEDIA_DB_PATH` - database file (default: platform data directory)
//! - `HISTOPEDIA_LOAN_DAYS` - loan period in days (default: 7)
//! - `HISTOPEDIA_LIBRARY_NAME` - name shown in menu banners
//! - `RUST_LOG` - log filter (default: warn)

use std::process::ExitCode;

use tracing::error;

use histopedia_cli::config::AppConfig;
use histopedia_cli::{init_tracing, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Histopedia stopped");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
