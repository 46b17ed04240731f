//! # Histopedia Console Library
//!
//! Everything behind the `histopedia` binary. Split out of `main.rs` so the
//! menus can be driven from tests with scripted input.
//!
//! ## Module Organization
//! ```text
//! histopedia_cli/
//! ├── lib.rs            ◄─── You are here (logging setup & run)
//! ├── config.rs         ◄─── Environment configuration
//! ├── console.rs        ◄─── Prompt/response over any reader and writer
//! ├── error.rs          ◄─── AppError and user-facing messages
//! ├── commands/
//! │   ├── auth.rs       ◄─── Register, login
//! │   ├── catalog.rs    ◄─── Search, add, edit, remove books
//! │   └── circulation.rs◄─── Borrow, process borrowing records
//! └── menus/
//!     ├── mod.rs        ◄─── Context, shared handlers
//!     ├── render.rs     ◄─── Book / record layouts
//!     ├── authentication.rs
//!     ├── librarian.rs
//!     └── patron.rs
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging                                                 │
//! │     • tracing-subscriber with env filter, written to stderr            │
//! │     • Default: WARN, can be overridden with RUST_LOG                   │
//! │                                                                         │
//! │  2. Load Configuration (HISTOPEDIA_* variables)                        │
//! │                                                                         │
//! │  3. Connect to Database                                                │
//! │     • SQLite with WAL mode                                             │
//! │     • Run pending migrations                                           │
//! │                                                                         │
//! │  4. Run the Authentication menu over stdin / stdout                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod menus;

use std::io;

use tracing::info;
use tracing_subscriber::EnvFilter;

use histopedia_db::{Database, DbConfig};

use crate::config::AppConfig;
use crate::console::Console;
use crate::error::AppResult;
use crate::menus::{AuthenticationMenu, Context};

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so they never interleave with the menus on stdout.
///
/// ## Log Levels
/// - `RUST_LOG=info` - Logins, loans, catalog changes
/// - `RUST_LOG=histopedia_db=debug` - Every query the repositories run
/// - Default: WARN
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Opens the library database and runs the menus on the terminal.
pub async fn run(config: AppConfig) -> AppResult<()> {
    info!(db_path = ?config.database_path, "Starting Histopedia");

    let db = Database::new(DbConfig::new(config.database_path.clone())).await?;
    info!("Database connected and migrations applied");

    let stdin = io::stdin();
    let console = Console::new(stdin.lock(), io::stdout());
    let mut ctx = Context::new(&db, &config, console);

    let outcome = AuthenticationMenu::run(&mut ctx).await;

    db.close().await;
    outcome
}
