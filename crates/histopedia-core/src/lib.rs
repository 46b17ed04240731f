//! # histopedia-core: Pure Domain Logic for Histopedia
//!
//! This crate holds the catalog and circulation model of the Histopedia
//! library system as plain data and pure functions.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Histopedia Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Console Menus (apps/cli)                       │   │
//! │  │   Authentication ──► Librarian Menu / Patron Menu              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ histopedia-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  factory  │  │    ids    │  │ validation│  │   │
//! │  │   │   Book    │  │ BookFact. │  │  BID0001  │  │   rules   │  │   │
//! │  │   │   User    │  │ UserFact. │  │  UID0001  │  │  checks   │  │   │
//! │  │   │  Record   │  │ RecFact.  │  │  RID0001  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CONSOLE • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                histopedia-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Book, User, BorrowingRecord) and their enums
//! - [`factory`] - Discriminant-driven entity construction
//! - [`ids`] - `UID`/`BID`/`RID` identifier arithmetic
//! - [`validation`] - Input rules applied by the menus
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use histopedia_core::ids::{next_id, IdKind};
//! use histopedia_core::Genre;
//!
//! // Genres are parsed case-insensitively into their canonical form
//! let genre: Genre = "military history".parse().unwrap();
//! assert_eq!(genre.as_str(), "Military History");
//!
//! // Identifiers continue from the latest stored one
//! assert_eq!(next_id(IdKind::Book, Some("BID0001")).unwrap(), "BID0002");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod factory;
pub mod ids;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use factory::{BookFactory, BorrowingRecordFactory, UserFactory};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default loan period for a new borrowing record.
///
/// A patron keeps a book for one week unless the deployment overrides it.
pub const DEFAULT_LOAN_DAYS: i64 = 7;

/// Minimum length of titles, authors and publishers.
pub const MIN_TEXT_FIELD_CHARS: usize = 5;

/// Minimum number of words in a book description.
pub const MIN_DESCRIPTION_WORDS: usize = 5;

/// Minimum length of a book id typed at a prompt (`BID` + at least 3 digits).
pub const MIN_BOOK_ID_INPUT_CHARS: usize = 6;

/// Username length bounds (inclusive).
pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 20;

/// Minimum length of email addresses and passwords.
pub const MIN_CREDENTIAL_CHARS: usize = 5;
