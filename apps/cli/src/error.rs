//! # Application Errors
//!
//! One error type for everything a menu step can hit.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Menu Error Handling                                  │
//! │                                                                         │
//! │  Menu handler                                                          │
//! │       │                                                                 │
//! │       ├── DbError ─────────┐                                            │
//! │       ├── CoreError ───────┤                                            │
//! │       ├── ValidationError ─┼──► AppError                                │
//! │       └── io::Error ───────┘        │                                   │
//! │                                     ▼                                   │
//! │                       Menu loop: tracing::error!(..)                    │
//! │                                  print user_message()                   │
//! │                                  show the menu again                    │
//! │                                                                         │
//! │  EndOfInput is the exception: it ends every menu quietly.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io;

use histopedia_core::{CoreError, ValidationError};
use histopedia_db::DbError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by commands and menus.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Console I/O failed: {0}")]
    Io(#[from] io::Error),

    /// An entity the user named does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Registration with an email that already has an account.
    #[error("Email address already registered: {0}")]
    EmailTaken(String),

    /// Input stream closed (Ctrl-D or end of a scripted session).
    #[error("End of input")]
    EndOfInput,
}

impl AppError {
    /// The message shown to the user at the console.
    ///
    /// Storage details stay in the log; the user gets a short sentence.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Core(CoreError::BookNotAvailable { .. }) => {
                "Book is not available for borrowing.".to_string()
            }
            AppError::Core(CoreError::Validation(e)) | AppError::Validation(e) => e.to_string(),
            AppError::Core(e) => e.to_string(),
            AppError::Db(DbError::Domain(CoreError::BookNotAvailable { .. })) => {
                "Book is not available for borrowing.".to_string()
            }
            AppError::Db(DbError::NotFound { entity, id }) => {
                format!("{} not found with ID '{}'.", entity, id)
            }
            AppError::Db(DbError::UniqueViolation { field, .. }) => {
                format!("That {} is already in use.", field)
            }
            AppError::Db(DbError::ConnectionFailed(_)) | AppError::Db(DbError::PoolExhausted) => {
                "The library database is unavailable.".to_string()
            }
            AppError::Db(_) => "The operation could not be completed.".to_string(),
            AppError::Config(e) => e.to_string(),
            AppError::Io(_) => "Console input could not be read.".to_string(),
            AppError::NotFound { entity, id } => format!("{} not found with ID '{}'.", entity, id),
            AppError::EmailTaken(email) => {
                format!("An account with the email address '{}' already exists.", email)
            }
            AppError::EndOfInput => "Exiting the program...".to_string(),
        }
    }
}

/// Result type for commands and menus.
pub type AppResult<T> = Result<T, AppError>;
