//! Text layouts for books, borrowing records and listings.

use std::fmt::Display;
use std::io::{BufRead, Write};

use histopedia_core::{Book, BorrowingRecord};

use crate::console::{Console, SEPARATOR};
use crate::error::AppResult;

/// A book's genre header followed by its indented fields.
pub fn book_details(book: &Book) -> String {
    format!(
        "{}\n    ID: {}\n    Title: {}\n    Genre: {}\n    Description: {}\n    Author: {}\n    Publisher: {}\n    Publication Year: {}\n    ISBN: {}\n    Status: {}",
        book.genre.header(),
        book.id,
        book.title,
        book.genre,
        book.description,
        book.author,
        book.publisher,
        book.publication_year,
        book.isbn,
        book.status,
    )
}

fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// A borrowing record's header followed by its indented fields.
pub fn record_details(record: &BorrowingRecord) -> String {
    format!(
        "[Borrowing Record Details #{}]\n    Book ID: {}\n    Patron ID: {}\n    Librarian ID: {}\n    Borrowing Date: {}\n    Due Date: {}\n    Return Date: {}\n    Request State: {}\n    Record Status: {}",
        record.id,
        record.book_id,
        record.patron_id,
        or_dash(record.librarian_id.as_deref()),
        record.borrowing_date,
        record.due_date,
        or_dash(record.return_date),
        record.request_state,
        record.record_status,
    )
}

fn write_framed<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    heading: impl Display,
    entries: impl IntoIterator<Item = String>,
) -> AppResult<()> {
    console.line(heading)?;
    console.line(SEPARATOR)?;
    for entry in entries {
        console.line(entry)?;
    }
    console.line(SEPARATOR)
}

/// The full catalog listing.
pub fn write_books<R: BufRead, W: Write>(console: &mut Console<R, W>, books: &[Book]) -> AppResult<()> {
    if books.is_empty() {
        return console.line("No books found.");
    }
    write_framed(
        console,
        format!("{} book(s) found:", books.len()),
        books.iter().map(book_details),
    )
}

/// Results of a Browse search.
pub fn write_keyword_results<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    books: &[Book],
    keyword: &str,
) -> AppResult<()> {
    if books.is_empty() {
        return console.line(format!("No books found with the keyword '{}'.", keyword));
    }
    write_framed(
        console,
        format!("{} book(s) found with the keyword '{}':", books.len(), keyword),
        books.iter().map(book_details),
    )
}

/// A book list under `heading`, or `empty` when there is nothing to show.
pub fn write_book_list<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    books: &[Book],
    heading: impl Display,
    empty: &str,
) -> AppResult<()> {
    if books.is_empty() {
        return console.line(empty);
    }
    write_framed(console, heading, books.iter().map(book_details))
}

/// A record list under `heading`, or `empty` when there is nothing to show.
pub fn write_records<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    records: &[BorrowingRecord],
    heading: impl Display,
    empty: &str,
) -> AppResult<()> {
    if records.is_empty() {
        return console.line(empty);
    }
    write_framed(console, heading, records.iter().map(record_details))
}
