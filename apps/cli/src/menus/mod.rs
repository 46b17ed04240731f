//! # Menus
//!
//! The interactive state machines.
//!
//! ## Navigation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────────────────┐   login (access level 0)  ┌──────────────┐  │
//! │   │  AuthenticationMenu  │ ─────────────────────────►│ LibrarianMenu│  │
//! │   │  1 Login             │ ◄──────── 0 log out ──────│  1..6        │  │
//! │   │  2 Register          │                           └──────────────┘  │
//! │   │  0 Exit              │   login (access level 1)  ┌──────────────┐  │
//! │   │                      │ ─────────────────────────►│  PatronMenu  │  │
//! │   └──────────────────────┘ ◄──────── 0 log out ──────│  1..5        │  │
//! │            │                                         └──────────────┘  │
//! │            ▼ 0 / end of input                                          │
//! │          exit                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every menu loops `{read choice → dispatch → report}`. A failing handler
//! never ends a menu: the error is logged, its user message printed, and the
//! menu shown again. Only end of input unwinds all the way out.

pub mod authentication;
pub mod librarian;
pub mod patron;
pub mod render;

use std::io::{BufRead, Write};

use chrono::{Datelike, Local, NaiveDate};
use tracing::error;

use histopedia_core::validation::{
    parse_year, validate_keyword, validate_publication_year, ValidationResult,
};
use histopedia_db::Database;

use crate::commands::catalog::{search_books, SearchKind};
use crate::config::AppConfig;
use crate::console::Console;
use crate::error::{AppError, AppResult};

pub use authentication::AuthenticationMenu;
pub use librarian::LibrarianMenu;
pub use patron::PatronMenu;

/// Printed for a choice no handler matches.
pub const INVALID_CHOICE: &str = "Invalid choice. Please try again.";

/// Everything a menu step needs.
pub struct Context<'a, R, W> {
    pub db: &'a Database,
    pub config: &'a AppConfig,
    pub console: Console<R, W>,
    clock: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl<'a, R: BufRead, W: Write> Context<'a, R, W> {
    pub fn new(db: &'a Database, config: &'a AppConfig, console: Console<R, W>) -> Self {
        Context {
            db,
            config,
            console,
            clock: local_today,
        }
    }

    /// Replaces the wall clock (tests pin the date).
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn current_year(&self) -> i32 {
        self.today().year()
    }

    /// Settles the outcome of one handler.
    ///
    /// End of input and console failures propagate; every other error is
    /// logged and shown to the user.
    pub fn report(&mut self, result: AppResult<()>) -> AppResult<()> {
        match result {
            Ok(()) => Ok(()),
            Err(e @ (AppError::EndOfInput | AppError::Io(_))) => Err(e),
            Err(e) => {
                error!(error = %e, "Menu action failed");
                self.console.line(e.user_message())
            }
        }
    }
}

// =============================================================================
// Handlers shared by both role menus
// =============================================================================

/// Option "View books": the whole catalog.
pub(crate) async fn view_books<R: BufRead, W: Write>(ctx: &mut Context<'_, R, W>) -> AppResult<()> {
    let books = ctx.db.books().list_all().await?;

    render::write_books(&mut ctx.console, &books)?;

    ctx.console.blank()?;
    ctx.console.pause()
}

/// Option "Browse books by title / genre / author".
pub(crate) async fn browse_books<R: BufRead, W: Write>(
    ctx: &mut Context<'_, R, W>,
) -> AppResult<()> {
    let kind = ctx.console.prompt_until(
        "Enter the type of search (1 -> Title, 2 -> Genre, 3 -> Author): ",
        |answer| {
            answer
                .trim()
                .parse()
                .ok()
                .and_then(SearchKind::from_choice)
                .ok_or("Please enter 1, 2 or 3")
        },
    )?;
    let keyword = ctx
        .console
        .prompt_until("Enter the keyword to search for: ", validate_keyword)?;

    let books = search_books(ctx.db, kind, &keyword).await?;

    render::write_keyword_results(&mut ctx.console, &books, &keyword)?;

    ctx.console.blank()?;
    ctx.console.pause()
}

// =============================================================================
// Prompt parsers
// =============================================================================

/// Answer that leaves a field unchanged when editing.
pub const SKIP: &str = "-";

/// Turns a field rule into a prompt parser that keeps the answer.
pub(crate) fn accept(
    validate: fn(&str) -> ValidationResult<()>,
) -> impl FnMut(&str) -> ValidationResult<String> {
    move |answer: &str| validate(answer).map(|()| answer.to_string())
}

/// Wraps a prompt parser so that [`SKIP`] yields `None`.
pub(crate) fn skippable<T, E>(
    mut parse: impl FnMut(&str) -> Result<T, E>,
) -> impl FnMut(&str) -> Result<Option<T>, E> {
    move |answer: &str| {
        if answer.trim() == SKIP {
            Ok(None)
        } else {
            parse(answer).map(Some)
        }
    }
}

/// Parses a publication year no earlier than `current_year`.
pub(crate) fn publication_year(current_year: i32) -> impl FnMut(&str) -> Result<i32, String> {
    move |answer: &str| {
        let year = parse_year(answer).map_err(|e| e.to_string())?;
        validate_publication_year(year, current_year)
            .map_err(|_| format!("Publication year must be {} or later", current_year))?;
        Ok(year)
    }
}

/// Shared "log out" epilogue.
pub(crate) fn log_out<R: BufRead, W: Write>(ctx: &mut Context<'_, R, W>) -> AppResult<()> {
    ctx.console.line("Logged out successfully.")?;
    ctx.console.pause()
}

// =============================================================================
// Test Support
// =============================================================================
