//! # Entity Factories
//!
//! Construction of entities from their discriminants.
//!
//! ## Dispatch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Discriminant → Factory                             │
//! │                                                                         │
//! │  "Military History" ──parse──► Genre::MilitaryHistory                  │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                         BookFactory::MilitaryHistory                   │
//! │                                     │ create(fields)                    │
//! │                                     ▼                                   │
//! │                         Book { genre: MilitaryHistory, .. }            │
//! │                                                                         │
//! │  access_level = 1 ──try_from──► AccessLevel::Patron                    │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                         UserFactory::Patron ──► User { Patron, .. }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Factories never validate field contents; the menus do that before a
//! factory is reached. Parsing the discriminant is the only fallible step and
//! it happens before a factory exists, so `create` itself cannot fail.

use chrono::{Duration, NaiveDate};

use crate::error::CoreResult;
use crate::types::{
    AccessLevel, Book, BookStatus, BorrowingRecord, Genre, RecordStatus, RequestState, User,
};

// =============================================================================
// Book Factory
// =============================================================================

/// Every book field except the genre, which the factory supplies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub publisher: String,
    pub publication_year: i32,
    pub isbn: String,
    pub status: BookStatus,
}

/// Builds books of one genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookFactory {
    Biography,
    MilitaryHistory,
    Revolution,
}

impl BookFactory {
    /// Selects the factory for a genre.
    pub const fn for_genre(genre: Genre) -> Self {
        match genre {
            Genre::Biography => BookFactory::Biography,
            Genre::MilitaryHistory => BookFactory::MilitaryHistory,
            Genre::Revolution => BookFactory::Revolution,
        }
    }

    /// Selects the factory from raw genre text (case-insensitive).
    pub fn for_genre_name(name: &str) -> CoreResult<Self> {
        Ok(Self::for_genre(name.parse()?))
    }

    /// Genre of the books this factory produces.
    pub const fn genre(&self) -> Genre {
        match self {
            BookFactory::Biography => Genre::Biography,
            BookFactory::MilitaryHistory => Genre::MilitaryHistory,
            BookFactory::Revolution => Genre::Revolution,
        }
    }

    pub fn create(&self, fields: BookFields) -> Book {
        Book {
            id: fields.id,
            title: fields.title,
            genre: self.genre(),
            description: fields.description,
            author: fields.author,
            publisher: fields.publisher,
            publication_year: fields.publication_year,
            isbn: fields.isbn,
            status: fields.status,
        }
    }
}

// =============================================================================
// User Factory
// =============================================================================

/// Builds accounts of one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFactory {
    Librarian,
    Patron,
}

impl UserFactory {
    pub const fn for_access_level(level: AccessLevel) -> Self {
        match level {
            AccessLevel::Librarian => UserFactory::Librarian,
            AccessLevel::Patron => UserFactory::Patron,
        }
    }

    /// Selects the factory from the stored integer discriminant.
    pub fn for_discriminant(level: i64) -> CoreResult<Self> {
        Ok(Self::for_access_level(AccessLevel::try_from(level)?))
    }

    pub const fn access_level(&self) -> AccessLevel {
        match self {
            UserFactory::Librarian => AccessLevel::Librarian,
            UserFactory::Patron => AccessLevel::Patron,
        }
    }

    /// Creates a user. `password_hash` must already be hashed.
    pub fn create(
        &self,
        id: impl Into<String>,
        username: impl Into<String>,
        email_address: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> User {
        User {
            id: id.into(),
            access_level: self.access_level(),
            username: username.into(),
            email_address: email_address.into(),
            password_hash: password_hash.into(),
        }
    }
}

// =============================================================================
// Borrowing Record Factory
// =============================================================================

/// Builds borrowing records.
pub struct BorrowingRecordFactory;

impl BorrowingRecordFactory {
    /// Opens a fresh loan.
    ///
    /// The record starts Active, with no librarian, no return date, an unset
    /// request state, and a due date `loan_days` after `borrowed_on`.
    pub fn open(
        id: impl Into<String>,
        book_id: impl Into<String>,
        patron_id: impl Into<String>,
        borrowed_on: NaiveDate,
        loan_days: i64,
    ) -> BorrowingRecord {
        BorrowingRecord {
            id: id.into(),
            book_id: book_id.into(),
            patron_id: patron_id.into(),
            librarian_id: None,
            borrowing_date: borrowed_on,
            due_date: borrowed_on + Duration::days(loan_days),
            return_date: None,
            request_state: RequestState::Unset,
            record_status: RecordStatus::Active,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_LOAN_DAYS;

    fn fields(id: &str) -> BookFields {
        BookFields {
            id: id.to_string(),
            title: "The Guns of August".to_string(),
            description: "The first month of the Great War".to_string(),
            author: "Barbara Tuchman".to_string(),
            publisher: "Macmillan".to_string(),
            publication_year: 2026,
            isbn: "978-0345476098".to_string(),
            status: BookStatus::Available,
        }
    }

    #[test]
    fn test_book_factory_sets_genre() {
        for genre in Genre::ALL {
            let book = BookFactory::for_genre(genre).create(fields("BID0001"));
            assert_eq!(book.genre, genre);
        }
    }

    #[test]
    fn test_book_factory_from_name() {
        let factory = BookFactory::for_genre_name("military history").unwrap();
        assert_eq!(factory, BookFactory::MilitaryHistory);

        assert!(BookFactory::for_genre_name("Poetry").is_err());
    }

    #[test]
    fn test_user_factory_from_discriminant() {
        let librarian = UserFactory::for_discriminant(0)
            .unwrap()
            .create("UID0001", "alice", "alice@lib.org", "hash");
        assert!(librarian.is_librarian());

        let patron = UserFactory::for_discriminant(1)
            .unwrap()
            .create("UID0002", "bob", "bob@lib.org", "hash");
        assert!(patron.is_patron());

        assert!(UserFactory::for_discriminant(-1).is_err());
    }

    #[test]
    fn test_open_loan_is_due_in_a_week() {
        let today = NaiveDate::from_ymd_opt(2026, 12, 28).unwrap();
        let record =
            BorrowingRecordFactory::open("RID0001", "BID0001", "UID0002", today, DEFAULT_LOAN_DAYS);

        assert_eq!(record.record_status, RecordStatus::Active);
        assert_eq!(record.request_state, RequestState::Unset);
        assert_eq!(record.due_date, NaiveDate::from_ymd_opt(2027, 1, 4).unwrap());
        assert!(record.librarian_id.is_none());
        assert!(record.return_date.is_none());
    }
}
