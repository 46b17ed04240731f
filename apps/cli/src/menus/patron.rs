//! Patron menu: catalog, own loans and borrowing.

use std::io::{BufRead, Write};

use histopedia_core::validation::validate_book_id_input;
use histopedia_core::User;

use super::{accept, browse_books, log_out, render, view_books, Context, INVALID_CHOICE};
use crate::commands::circulation::borrow_book;
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatronOption {
    LogOut,
    ViewBooks,
    ViewBorrowedBooks,
    ViewRecords,
    BrowseBooks,
    BorrowBook,
}

impl PatronOption {
    fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            0 => Some(PatronOption::LogOut),
            1 => Some(PatronOption::ViewBooks),
            2 => Some(PatronOption::ViewBorrowedBooks),
            3 => Some(PatronOption::ViewRecords),
            4 => Some(PatronOption::BrowseBooks),
            5 => Some(PatronOption::BorrowBook),
            _ => None,
        }
    }
}

/// Menu of a logged-in patron.
pub struct PatronMenu<'u> {
    patron: &'u User,
}

impl<'u> PatronMenu<'u> {
    pub fn new(patron: &'u User) -> Self {
        PatronMenu { patron }
    }

    /// Runs until the patron logs out.
    pub async fn run<R: BufRead, W: Write>(&self, ctx: &mut Context<'_, R, W>) -> AppResult<()> {
        loop {
            ctx.console.line(format!(
                "Welcome to {}, {}! You're currently logged in as a Patron.",
                ctx.config.library_name, self.patron.username
            ))?;
            for option in [
                "1. View books",
                "2. View currently borrowed books",
                "3. See borrowing records with status",
                "4. Browse books by title / genre / author",
                "5. Borrow book",
            ] {
                ctx.console.line(option)?;
            }

            let choice = ctx.console.choice("Enter your choice ('0' to log out) >> ")?;
            let outcome = match choice.and_then(PatronOption::from_choice) {
                Some(PatronOption::LogOut) => return log_out(ctx),
                Some(PatronOption::ViewBooks) => view_books(ctx).await,
                Some(PatronOption::ViewBorrowedBooks) => self.view_borrowed_books(ctx).await,
                Some(PatronOption::ViewRecords) => self.view_records(ctx).await,
                Some(PatronOption::BrowseBooks) => browse_books(ctx).await,
                Some(PatronOption::BorrowBook) => self.borrow_book(ctx).await,
                None => ctx.console.line(INVALID_CHOICE),
            };
            ctx.report(outcome)?;
            ctx.console.blank()?;
        }
    }

    async fn view_borrowed_books<R: BufRead, W: Write>(
        &self,
        ctx: &mut Context<'_, R, W>,
    ) -> AppResult<()> {
        let books = ctx
            .db
            .books()
            .find_borrowed_by_patron_id(&self.patron.id)
            .await?;

        render::write_book_list(
            &mut ctx.console,
            &books,
            format!(
                "{} book(s) currently borrowed by {}:",
                books.len(),
                self.patron.username
            ),
            "You currently have no books being borrowed yet.",
        )?;

        ctx.console.blank()?;
        ctx.console.pause()
    }

    async fn view_records<R: BufRead, W: Write>(&self, ctx: &mut Context<'_, R, W>) -> AppResult<()> {
        let records = ctx.db.records().find_by_patron_id(&self.patron.id).await?;

        render::write_records(
            &mut ctx.console,
            &records,
            format!("Borrowing records of {}:", self.patron.username),
            "You have no borrowing records yet.",
        )?;

        let today = ctx.today();
        let overdue = records.iter().filter(|r| r.is_overdue_on(today)).count();
        if overdue > 0 {
            ctx.console.line(format!(
                "{} borrowed book(s) are past their due date.",
                overdue
            ))?;
        }

        ctx.console.blank()?;
        ctx.console.pause()
    }

    async fn borrow_book<R: BufRead, W: Write>(&self, ctx: &mut Context<'_, R, W>) -> AppResult<()> {
        let book_id = ctx.console.prompt_until(
            "Enter the ID of the book you want to borrow: ",
            accept(validate_book_id_input),
        )?;

        let record = borrow_book(
            ctx.db,
            self.patron,
            book_id.trim(),
            ctx.today(),
            ctx.config.loan_days,
        )
        .await?;

        ctx.console.line("Book borrowed successfully.")?;
        ctx.console
            .line(format!("Please return it by {}.", record.due_date))?;
        ctx.console.pause()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{fixed_today, library, output, scripted, test_config};
    use super::*;
    use chrono::Duration;
    use histopedia_core::{BookStatus, RecordStatus};

    #[tokio::test]
    async fn test_borrow_then_view_loans() {
        let (db, _, patron) = library().await;
        let config = test_config();
        let mut ctx = scripted(&db, &config, &["5", "BID0001", "", "2", "", "3", "", "0", ""]);

        PatronMenu::new(&patron).run(&mut ctx).await.unwrap();

        let out = output(ctx);
        assert!(out.contains("Book borrowed successfully."));
        assert!(out.contains("Please return it by 2026-06-22."));
        assert!(out.contains("1 book(s) currently borrowed by herodotus:"));
        assert!(out.contains("    Title: Napoleon: A Life"));
        assert!(out.contains("Borrowing records of herodotus:"));
        assert!(out.contains("    Record Status: Active"));
        assert!(!out.contains("past their due date"));

        let book = db.books().find_by_id("BID0001").await.unwrap().unwrap();
        assert_eq!(book.status, BookStatus::Borrowed);
        let records = db.records().find_by_patron_id(&patron.id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record_status, RecordStatus::Active);
    }

    #[tokio::test]
    async fn test_borrow_unavailable_book() {
        let (db, _, patron) = library().await;
        db.books()
            .update_status("BID0002", BookStatus::Unavailable)
            .await
            .unwrap();
        let config = test_config();
        let mut ctx = scripted(&db, &config, &["5", "BID0002", "5", "BID0404", "0", ""]);

        PatronMenu::new(&patron).run(&mut ctx).await.unwrap();

        let out = output(ctx);
        assert!(out.contains("Book is not available for borrowing."));
        assert!(out.contains("Book not found with ID 'BID0404'."));
        assert!(db.records().list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_views() {
        let (db, _, patron) = library().await;
        let config = test_config();
        let mut ctx = scripted(&db, &config, &["2", "", "3", "", "0", ""]);

        PatronMenu::new(&patron).run(&mut ctx).await.unwrap();

        let out = output(ctx);
        assert!(out.contains("You currently have no books being borrowed yet."));
        assert!(out.contains("You have no borrowing records yet."));
    }

    #[tokio::test]
    async fn test_records_flag_overdue_loans() {
        let (db, _, patron) = library().await;
        let borrowed = fixed_today() - Duration::days(30);
        crate::commands::circulation::borrow_book(&db, &patron, "BID0002", borrowed, 7)
            .await
            .unwrap();
        let config = test_config();
        let mut ctx = scripted(&db, &config, &["3", "", "0", ""]);

        PatronMenu::new(&patron).run(&mut ctx).await.unwrap();

        assert!(output(ctx).contains("1 borrowed book(s) are past their due date."));
    }

    #[tokio::test]
    async fn test_view_all_books() {
        let (db, _, patron) = library().await;
        let config = test_config();
        let mut ctx = scripted(&db, &config, &["1", "", "0", ""]);

        PatronMenu::new(&patron).run(&mut ctx).await.unwrap();

        let out = output(ctx);
        assert!(out.contains("2 book(s) found:"));
        assert!(out.contains("[Biography Book]"));
        assert!(out.contains("[Military History Book]"));
    }
}
