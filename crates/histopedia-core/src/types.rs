//! # Domain Types
//!
//! Core domain types used throughout Histopedia.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │      User       │   │ BorrowingRecord │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (BID####)   │   │  id (UID####)   │   │  id (RID####)   │       │
//! │  │  genre ◄─ tag   │   │  access_level◄─ │   │  book_id (FK)   │       │
//! │  │  status         │   │  password_hash  │   │  patron_id (FK) │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Genre       │   │  AccessLevel    │   │  RecordStatus   │       │
//! │  │  Biography      │   │  Librarian (0)  │   │  Active         │       │
//! │  │  MilitaryHist.  │   │  Patron    (1)  │   │  Returned       │       │
//! │  │  Revolution     │   └─────────────────┘   │  ReturnedOverdue│       │
//! │  └─────────────────┘                         │  Overdue        │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Closed Variants
//! A book's genre and a user's access level select their kind. Both are
//! closed enums, so every `match` on them is exhaustive and a book can never
//! carry a genre that disagrees with its kind.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// =============================================================================
// Genre
// =============================================================================

/// Catalog genre of a book.
///
/// Stored and displayed with its canonical spelling (`"Military History"`),
/// parsed case-insensitively from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Biography,
    #[serde(rename = "Military History")]
    MilitaryHistory,
    Revolution,
}

impl Genre {
    /// All genres in menu order.
    pub const ALL: [Genre; 3] = [Genre::Biography, Genre::MilitaryHistory, Genre::Revolution];

    /// Canonical spelling, as stored in `books.genre`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Genre::Biography => "Biography",
            Genre::MilitaryHistory => "Military History",
            Genre::Revolution => "Revolution",
        }
    }

    /// Header line printed above a book's details.
    pub const fn header(&self) -> &'static str {
        match self {
            Genre::Biography => "[Biography Book]",
            Genre::MilitaryHistory => "[Military History Book]",
            Genre::Revolution => "[Revolution Book]",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = CoreError;

    /// Parses a genre, ignoring case and extra whitespace.
    ///
    /// `"military   HISTORY"` and `"Military History"` both yield
    /// [`Genre::MilitaryHistory`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");

        Genre::ALL
            .into_iter()
            .find(|genre| genre.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| CoreError::UnknownGenre(s.to_string()))
    }
}

// =============================================================================
// Book Status
// =============================================================================

/// Shelf status of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BookStatus {
    /// On the shelf, can be borrowed.
    #[default]
    Available,
    /// Out with a patron.
    Borrowed,
    /// Withdrawn from circulation (damaged, lost, under repair).
    Unavailable,
}

impl BookStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Borrowed => "Borrowed",
            BookStatus::Unavailable => "Unavailable",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(BookStatus::Available),
            "Borrowed" => Ok(BookStatus::Borrowed),
            "Unavailable" => Ok(BookStatus::Unavailable),
            other => Err(CoreError::UnknownBookStatus(other.to_string())),
        }
    }
}

// =============================================================================
// Book
// =============================================================================

/// A book in the catalog.
///
/// `genre` is the variant tag: it selects the book's kind (see
/// [`crate::factory::BookFactory`]) and its display header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Business identifier, `BID####`. Immutable.
    pub id: String,
    pub title: String,
    pub genre: Genre,
    pub description: String,
    pub author: String,
    pub publisher: String,
    pub publication_year: i32,
    /// Not validated; libraries receive books with missing or legacy ISBNs.
    pub isbn: String,
    pub status: BookStatus,
}

impl Book {
    /// Checks if the book can be lent out right now.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }
}

// =============================================================================
// Access Level
// =============================================================================

/// Role of a user account.
///
/// Persisted as the integer discriminant (`users.access_level`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessLevel {
    /// Catalog management privileges.
    Librarian = 0,
    /// Borrowing privileges.
    Patron = 1,
}

impl AccessLevel {
    #[inline]
    pub const fn as_i64(&self) -> i64 {
        *self as i64
    }

    pub const fn role_name(&self) -> &'static str {
        match self {
            AccessLevel::Librarian => "Librarian",
            AccessLevel::Patron => "Patron",
        }
    }
}

impl TryFrom<i64> for AccessLevel {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccessLevel::Librarian),
            1 => Ok(AccessLevel::Patron),
            other => Err(CoreError::UnknownAccessLevel(other)),
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role_name())
    }
}

// =============================================================================
// User
// =============================================================================

/// A librarian or patron account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Business identifier, `UID####`. Immutable.
    pub id: String,
    pub access_level: AccessLevel,
    pub username: String,
    pub email_address: String,
    /// Argon2 PHC string. Never the plaintext password.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    #[inline]
    pub fn is_librarian(&self) -> bool {
        self.access_level == AccessLevel::Librarian
    }

    #[inline]
    pub fn is_patron(&self) -> bool {
        self.access_level == AccessLevel::Patron
    }
}

// =============================================================================
// Request State
// =============================================================================

/// Librarian disposition of a borrowing record.
///
/// Independent of [`RecordStatus`]: a record can be Active with the request
/// still unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestState {
    /// No librarian decision yet (`-1`).
    #[default]
    Unset = -1,
    Rejected = 0,
    Accepted = 1,
}

impl RequestState {
    #[inline]
    pub const fn as_i64(&self) -> i64 {
        *self as i64
    }

    pub const fn label(&self) -> &'static str {
        match self {
            RequestState::Unset => "Unset",
            RequestState::Rejected => "Rejected",
            RequestState::Accepted => "Accepted",
        }
    }
}

impl TryFrom<i64> for RequestState {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(RequestState::Unset),
            0 => Ok(RequestState::Rejected),
            1 => Ok(RequestState::Accepted),
            other => Err(CoreError::UnknownRequestState(other)),
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_i64(), self.label())
    }
}

// =============================================================================
// Record Status
// =============================================================================

/// Lifecycle status of a borrowing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecordStatus {
    /// Book is out with the patron.
    #[default]
    Active,
    /// Book came back on time.
    Returned,
    /// Book came back after the due date.
    #[serde(rename = "Returned Overdue")]
    ReturnedOverdue,
    /// Book is still out and past the due date.
    Overdue,
}

impl RecordStatus {
    pub const ALL: [RecordStatus; 4] = [
        RecordStatus::Active,
        RecordStatus::Returned,
        RecordStatus::ReturnedOverdue,
        RecordStatus::Overdue,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "Active",
            RecordStatus::Returned => "Returned",
            RecordStatus::ReturnedOverdue => "Returned Overdue",
            RecordStatus::Overdue => "Overdue",
        }
    }

    /// Whether the book is back in the library.
    #[inline]
    pub const fn is_returned(&self) -> bool {
        matches!(self, RecordStatus::Returned | RecordStatus::ReturnedOverdue)
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = CoreError;

    /// Exact, case-sensitive match on the canonical spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::UnknownRecordStatus(s.to_string()))
    }
}

// =============================================================================
// Borrowing Record
// =============================================================================

/// A loan of one book to one patron.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowingRecord {
    /// Business identifier, `RID####`. Immutable.
    pub id: String,
    /// Borrowed book. Immutable after creation.
    pub book_id: String,
    /// Borrowing patron. Immutable after creation.
    pub patron_id: String,
    /// Librarian who last processed the record.
    pub librarian_id: Option<String>,
    pub borrowing_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub request_state: RequestState,
    pub record_status: RecordStatus,
}

impl BorrowingRecord {
    /// True when the book is still out and `today` is past the due date.
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        !self.record_status.is_returned() && today > self.due_date
    }

    /// Applies a librarian's status decision.
    ///
    /// Records the processing librarian. Moving into a returned status stamps
    /// `return_date` with `today` (an existing stamp is kept); moving back out
    /// of a returned status clears it.
    pub fn apply_status(&mut self, status: RecordStatus, librarian_id: &str, today: NaiveDate) {
        self.librarian_id = Some(librarian_id.to_string());
        self.record_status = status;

        if status.is_returned() {
            self.return_date.get_or_insert(today);
        } else {
            self.return_date = None;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
