//! # Circulation Commands
//!
//! Borrowing a book and processing a borrowing record.
//!
//! ## Borrow Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Patron enters BID0003                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  books.find_by_id ── None ──► AppError::NotFound                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  is_available()? ── no ──► CoreError::BookNotAvailable (no record)     │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  BorrowingRecordFactory::open(next RID, today, loan_days)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  records.open_loan ── book Borrowed + record Active, one transaction   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use tracing::info;

use histopedia_core::{
    BorrowingRecord, BorrowingRecordFactory, CoreError, RecordStatus, RequestState, User,
};
use histopedia_db::Database;

use crate::error::{AppError, AppResult};

/// Lends a book to a patron.
///
/// ## Errors
/// * `AppError::NotFound` - no book with this id
/// * `AppError::Core(CoreError::BookNotAvailable)` - the book is Borrowed or
///   Unavailable; no record is created
pub async fn borrow_book(
    db: &Database,
    patron: &User,
    book_id: &str,
    today: NaiveDate,
    loan_days: i64,
) -> AppResult<BorrowingRecord> {
    let book = db
        .books()
        .find_by_id(book_id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            entity: "Book",
            id: book_id.to_string(),
        })?;

    if !book.is_available() {
        return Err(CoreError::BookNotAvailable {
            id: book.id,
            status: book.status.to_string(),
        }
        .into());
    }

    let records = db.records();
    let id = records.next_id().await?;
    let record = BorrowingRecordFactory::open(id, &book.id, &patron.id, today, loan_days);
    records.open_loan(&record).await?;

    info!(
        record_id = %record.id,
        book_id = %book.id,
        patron_id = %patron.id,
        "Book borrowed"
    );
    Ok(record)
}

/// Records a librarian's decision on a borrowing record.
///
/// The librarian's id is stored on the record. A returned status stamps the
/// return date and puts the book back on the shelf; `request_state` of
/// `None` keeps the current one.
pub async fn process_record(
    db: &Database,
    librarian: &User,
    record_id: &str,
    status: RecordStatus,
    request_state: Option<RequestState>,
    today: NaiveDate,
) -> AppResult<BorrowingRecord> {
    let records = db.records();
    let mut record = records
        .find_by_id(record_id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            entity: "Borrowing record",
            id: record_id.to_string(),
        })?;

    record.apply_status(status, &librarian.id, today);
    if let Some(state) = request_state {
        record.request_state = state;
    }

    if !records.save_processed(&record).await? {
        return Err(AppError::NotFound {
            entity: "Borrowing record",
            id: record.id,
        });
    }

    Ok(record)
}

// =============================================================================
// Unit Tests
// =============================================================================
