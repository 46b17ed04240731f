//! # Librarian Menu
//!
//! Catalog management and borrowing record processing.
//!
//! ## Update Record Status
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Enter patron ID ──► list that patron's records                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Enter record ID ── not one of the listed ──► "not found"              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Enter status (exact spelling, retried)                                │
//! │  Enter request state (-1 / 0 / 1, or '-' to keep)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  process_record ──► record + book status saved together                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::{BufRead, Write};

use histopedia_core::validation::{
    validate_author, validate_book_id_input, validate_description, validate_publisher,
    validate_title,
};
use histopedia_core::{Genre, RecordStatus, RequestState, User};

use super::{
    accept, browse_books, log_out, publication_year, render, skippable, view_books, Context,
    INVALID_CHOICE,
};
use crate::commands::catalog::{add_book, edit_book, remove_book, BookDraft, BookEdit};
use crate::commands::circulation::process_record;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LibrarianOption {
    LogOut,
    ViewBooks,
    BrowseBooks,
    AddBook,
    EditBook,
    RemoveBook,
    UpdateRecordStatus,
}

impl LibrarianOption {
    fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            0 => Some(LibrarianOption::LogOut),
            1 => Some(LibrarianOption::ViewBooks),
            2 => Some(LibrarianOption::BrowseBooks),
            3 => Some(LibrarianOption::AddBook),
            4 => Some(LibrarianOption::EditBook),
            5 => Some(LibrarianOption::RemoveBook),
            6 => Some(LibrarianOption::UpdateRecordStatus),
            _ => None,
        }
    }
}

fn parse_genre(answer: &str) -> Result<Genre, String> {
    answer.parse().map_err(|e: histopedia_core::CoreError| e.to_string())
}

fn parse_request_state(answer: &str) -> Result<RequestState, String> {
    let value: i64 = answer
        .trim()
        .parse()
        .map_err(|_| "Request state must be -1, 0 or 1".to_string())?;
    RequestState::try_from(value).map_err(|e| e.to_string())
}

/// Menu of a logged-in librarian.
pub struct LibrarianMenu<'u> {
    librarian: &'u User,
}

impl<'u> LibrarianMenu<'u> {
    pub fn new(librarian: &'u User) -> Self {
        LibrarianMenu { librarian }
    }

    /// Runs until the librarian logs out.
    pub async fn run<R: BufRead, W: Write>(&self, ctx: &mut Context<'_, R, W>) -> AppResult<()> {
        loop {
            ctx.console.line(format!(
                "Welcome to {}, {}! You're currently logged in as a Librarian.",
                ctx.config.library_name, self.librarian.username
            ))?;
            for option in [
                "1. View books",
                "2. Browse books by title / genre / author",
                "3. Add book",
                "4. Edit book",
                "5. Remove book",
                "6. Update borrowing record status",
            ] {
                ctx.console.line(option)?;
            }

            let choice = ctx.console.choice("Enter your choice ('0' to log out) >> ")?;
            let outcome = match choice.and_then(LibrarianOption::from_choice) {
                Some(LibrarianOption::LogOut) => return log_out(ctx),
                Some(LibrarianOption::ViewBooks) => view_books(ctx).await,
                Some(LibrarianOption::BrowseBooks) => browse_books(ctx).await,
                Some(LibrarianOption::AddBook) => Self::add_book(ctx).await,
                Some(LibrarianOption::EditBook) => Self::edit_book(ctx).await,
                Some(LibrarianOption::RemoveBook) => Self::remove_book(ctx).await,
                Some(LibrarianOption::UpdateRecordStatus) => self.update_record_status(ctx).await,
                None => ctx.console.line(INVALID_CHOICE),
            };
            ctx.report(outcome)?;
            ctx.console.blank()?;
        }
    }

    async fn add_book<R: BufRead, W: Write>(ctx: &mut Context<'_, R, W>) -> AppResult<()> {
        let current_year = ctx.current_year();
        let console = &mut ctx.console;

        let title = console.prompt_until(
            "Enter book title (at least 5 characters): ",
            accept(validate_title),
        )?;
        let genre = console.prompt_until(
            "Enter book genre (Biography, Military History, Revolution): ",
            parse_genre,
        )?;
        let description = console.prompt_until(
            "Enter book description (at least 5 words): ",
            accept(validate_description),
        )?;
        let publication_year = console.prompt_until(
            format!("Enter publication year (must be {} or later): ", current_year),
            publication_year(current_year),
        )?;
        let author = console.prompt_until(
            "Enter book author (at least 5 characters): ",
            accept(validate_author),
        )?;
        let publisher = console.prompt_until(
            "Enter book publisher (at least 5 characters): ",
            accept(validate_publisher),
        )?;
        let isbn = console.prompt("Enter book ISBN: ")?;

        let draft = BookDraft {
            title,
            genre,
            description,
            publication_year,
            author,
            publisher,
            isbn: isbn.trim().to_string(),
        };
        let book = add_book(ctx.db, draft, current_year).await?;

        ctx.console
            .line(format!("Book with ID {} added successfully.", book.id))?;
        ctx.console.pause()
    }

    /// Shows the catalog so the librarian can pick an id from it.
    async fn list_catalog<R: BufRead, W: Write>(ctx: &mut Context<'_, R, W>) -> AppResult<()> {
        let books = ctx.db.books().list_all().await?;
        render::write_books(&mut ctx.console, &books)?;
        ctx.console.blank()
    }

    async fn edit_book<R: BufRead, W: Write>(ctx: &mut Context<'_, R, W>) -> AppResult<()> {
        let current_year = ctx.current_year();

        Self::list_catalog(ctx).await?;
        let id = ctx.console.prompt_until(
            "Enter the ID of the book to edit: ",
            accept(validate_book_id_input),
        )?;
        let id = id.trim();
        if ctx.db.books().find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound {
                entity: "Book",
                id: id.to_string(),
            });
        }

        let console = &mut ctx.console;
        let edit = BookEdit {
            title: console.prompt_until(
                "Enter new title (at least 5 characters, or '-' to skip): ",
                skippable(accept(validate_title)),
            )?,
            genre: console.prompt_until(
                "Enter new genre (Biography, Military History, Revolution, or '-' to skip): ",
                skippable(parse_genre),
            )?,
            description: console.prompt_until(
                "Enter new description (at least 5 words, or '-' to skip): ",
                skippable(accept(validate_description)),
            )?,
            publication_year: console.prompt_until(
                format!(
                    "Enter new publication year (must be {} or later, or '-' to skip): ",
                    current_year
                ),
                skippable(publication_year(current_year)),
            )?,
            author: console.prompt_until(
                "Enter new author (at least 5 characters, or '-' to skip): ",
                skippable(accept(validate_author)),
            )?,
            publisher: console.prompt_until(
                "Enter new publisher (at least 5 characters, or '-' to skip): ",
                skippable(accept(validate_publisher)),
            )?,
            isbn: console.prompt_until(
                "Enter new ISBN (or '-' to skip): ",
                skippable(|answer: &str| Ok::<_, String>(answer.trim().to_string())),
            )?,
        };

        let book = edit_book(ctx.db, id, edit, current_year).await?;

        ctx.console
            .line(format!("Book with ID {} has been updated.", book.id))?;
        ctx.console.pause()
    }

    async fn remove_book<R: BufRead, W: Write>(ctx: &mut Context<'_, R, W>) -> AppResult<()> {
        Self::list_catalog(ctx).await?;
        let id = ctx.console.prompt_until(
            "Enter the ID of the book to delete: ",
            accept(validate_book_id_input),
        )?;
        let id = id.trim();

        if remove_book(ctx.db, id).await? {
            ctx.console.line(format!("Book with ID {} has been removed.", id))?;
        } else {
            ctx.console.line(format!("Book with ID {} not found.", id))?;
        }
        ctx.console.pause()
    }

    async fn update_record_status<R: BufRead, W: Write>(
        &self,
        ctx: &mut Context<'_, R, W>,
    ) -> AppResult<()> {
        let patron_id = ctx.console.prompt("Enter patron ID: ")?;
        let patron_id = patron_id.trim();

        let records = ctx.db.records().find_by_patron_id(patron_id).await?;
        render::write_records(
            &mut ctx.console,
            &records,
            format!("Borrowing records of patron with ID {}:", patron_id),
            &format!("No borrowing records found for patron with ID {}.", patron_id),
        )?;
        if records.is_empty() {
            return ctx.console.pause();
        }

        let record_id = ctx.console.prompt("Enter borrowing record ID to edit: ")?;
        let record_id = record_id.trim();
        if !records.iter().any(|record| record.id == record_id) {
            ctx.console
                .line(format!("Borrowing record with ID {} not found.", record_id))?;
            return ctx.console.pause();
        }

        let status = ctx.console.prompt_until(
            "Enter new status (Active, Returned, Returned Overdue, Overdue): ",
            |answer| answer.trim().parse::<RecordStatus>(),
        )?;
        let request_state = ctx.console.prompt_until(
            "Enter new request state (-1 -> Unset, 0 -> Rejected, 1 -> Accepted, or '-' to skip): ",
            skippable(parse_request_state),
        )?;

        process_record(
            ctx.db,
            self.librarian,
            record_id,
            status,
            request_state,
            ctx.today(),
        )
        .await?;

        ctx.console
            .line("Borrowing record status updated successfully.")?;
        ctx.console.pause()
    }
}
