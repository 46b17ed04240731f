//! # Borrowing Record Repository
//!
//! Database operations for loans.
//!
//! ## Loan Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Patron borrows BID0003                                                │
//! │       │                                                                 │
//! │       ▼  open_loan()  ── one transaction ──                             │
//! │  ┌────────────────────────────────────────────┐                        │
//! │  │ UPDATE books SET status = 'Borrowed'        │  only if Available    │
//! │  │ INSERT INTO borrowing_records (.. Active ..)│                        │
//! │  └────────────────────────────────────────────┘                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Librarian marks the record Returned                                   │
//! │       │                                                                 │
//! │       ▼  save_processed()  ── one transaction ──                        │
//! │  ┌────────────────────────────────────────────┐                        │
//! │  │ UPDATE borrowing_records SET ..             │                        │
//! │  │ UPDATE books SET status = ..                │  follows the record   │
//! │  └────────────────────────────────────────────┘                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use histopedia_core::ids::{self, IdKind};
use histopedia_core::{BookStatus, BorrowingRecord, CoreError, RecordStatus, RequestState};

use crate::error::{DbError, DbResult};

const SELECT_RECORD: &str = "SELECT id, book_id, patron_id, librarian_id, borrowing_date, \
     due_date, return_date, request_state, record_status FROM borrowing_records";

#[derive(Debug, sqlx::FromRow)]
struct RecordRow {
    id: String,
    book_id: String,
    patron_id: String,
    librarian_id: Option<String>,
    borrowing_date: NaiveDate,
    due_date: NaiveDate,
    return_date: Option<NaiveDate>,
    request_state: i64,
    record_status: String,
}

impl TryFrom<RecordRow> for BorrowingRecord {
    type Error = DbError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let request_state = RequestState::try_from(row.request_state)
            .map_err(|e| DbError::corrupt_row("borrowing_records", &row.id, e))?;
        let record_status: RecordStatus = row
            .record_status
            .parse()
            .map_err(|e| DbError::corrupt_row("borrowing_records", &row.id, e))?;

        Ok(BorrowingRecord {
            id: row.id,
            book_id: row.book_id,
            patron_id: row.patron_id,
            librarian_id: row.librarian_id,
            borrowing_date: row.borrowing_date,
            due_date: row.due_date,
            return_date: row.return_date,
            request_state,
            record_status,
        })
    }
}

/// Repository for borrowing record operations.
#[derive(Debug, Clone)]
pub struct BorrowingRecordRepository {
    pool: SqlitePool,
}

impl BorrowingRecordRepository {
    /// Creates a new BorrowingRecordRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BorrowingRecordRepository { pool }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn list_all(&self) -> DbResult<Vec<BorrowingRecord>> {
        debug!("Listing all borrowing records");

        let rows = sqlx::query_as::<_, RecordRow>(&format!(
            "{} ORDER BY LENGTH(id), id",
            SELECT_RECORD
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BorrowingRecord::try_from).collect()
    }

    /// Every record of one patron, oldest first.
    pub async fn find_by_patron_id(&self, patron_id: &str) -> DbResult<Vec<BorrowingRecord>> {
        debug!(patron_id = %patron_id, "Finding borrowing records by patron");

        let rows = sqlx::query_as::<_, RecordRow>(&format!(
            "{} WHERE patron_id = ?1 ORDER BY LENGTH(id), id",
            SELECT_RECORD
        ))
        .bind(patron_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BorrowingRecord::try_from).collect()
    }

    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<BorrowingRecord>> {
        debug!(id = %id, "Finding borrowing record by id");

        let row = sqlx::query_as::<_, RecordRow>(&format!("{} WHERE id = ?1", SELECT_RECORD))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(BorrowingRecord::try_from).transpose()
    }

    /// The record with the numerically greatest id.
    pub async fn find_latest(&self) -> DbResult<Option<BorrowingRecord>> {
        let row = sqlx::query_as::<_, RecordRow>(&format!(
            "{} ORDER BY LENGTH(id) DESC, id DESC LIMIT 1",
            SELECT_RECORD
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.map(BorrowingRecord::try_from).transpose()
    }

    pub async fn next_id(&self) -> DbResult<String> {
        let latest = self.find_latest().await?;
        Ok(ids::next_id(
            IdKind::BorrowingRecord,
            latest.as_ref().map(|r| r.id.as_str()),
        )?)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Inserts a record as-is, without touching the book.
    pub async fn insert(&self, record: &BorrowingRecord) -> DbResult<bool> {
        debug!(id = %record.id, book_id = %record.book_id, "Inserting borrowing record");

        let mut conn = self.pool.acquire().await?;
        let rows = insert_record(&mut *conn, record).await?;
        Ok(rows > 0)
    }

    /// Writes every mutable column of an existing record.
    ///
    /// ## Returns
    /// `false` when no record has `record.id`.
    pub async fn update(&self, record: &BorrowingRecord) -> DbResult<bool> {
        debug!(id = %record.id, status = %record.record_status, "Updating borrowing record");

        let mut conn = self.pool.acquire().await?;
        let rows = update_record(&mut *conn, record).await?;
        Ok(rows > 0)
    }

    /// Opens a loan: marks the book Borrowed and inserts the record, in one
    /// transaction.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - the book does not exist
    /// * `DbError::Domain(CoreError::BookNotAvailable)` - the book is not
    ///   Available; nothing is written
    pub async fn open_loan(&self, record: &BorrowingRecord) -> DbResult<()> {
        debug!(id = %record.id, book_id = %record.book_id, "Opening loan");

        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query("UPDATE books SET status = ?1 WHERE id = ?2 AND status = ?3")
            .bind(BookStatus::Borrowed.as_str())
            .bind(&record.book_id)
            .bind(BookStatus::Available.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if claimed == 0 {
            let status: Option<String> = sqlx::query_scalar("SELECT status FROM books WHERE id = ?1")
                .bind(&record.book_id)
                .fetch_optional(&mut *tx)
                .await?;
            tx.rollback().await?;

            return Err(match status {
                None => DbError::not_found("Book", &record.book_id),
                Some(status) => CoreError::BookNotAvailable {
                    id: record.book_id.clone(),
                    status,
                }
                .into(),
            });
        }

        insert_record(&mut *tx, record).await?;
        commit(tx).await?;

        info!(
            record_id = %record.id,
            book_id = %record.book_id,
            patron_id = %record.patron_id,
            due = %record.due_date,
            "Loan opened"
        );
        Ok(())
    }

    /// Saves a librarian's decision on a record and brings the book's status
    /// in line with it, in one transaction.
    ///
    /// | Record status               | Book status                               |
    /// |-----------------------------|-------------------------------------------|
    /// | Returned / Returned Overdue | Available, unless another loan is out     |
    /// | Active / Overdue            | Borrowed                                  |
    ///
    /// ## Returns
    /// `false` when no record has `record.id`; nothing is written then.
    ///
    /// ## Errors
    /// * `DbError::Domain(CoreError::BookNotAvailable)` - the record is put
    ///   back out (Active / Overdue) while another loan of the same book is
    ///   outstanding; nothing is written
    pub async fn save_processed(&self, record: &BorrowingRecord) -> DbResult<bool> {
        debug!(id = %record.id, status = %record.record_status, "Saving processed record");

        let mut tx = self.pool.begin().await?;

        if update_record(&mut *tx, record).await? == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        let other_loans = count_outstanding_loans(&mut *tx, &record.book_id, &record.id).await?;

        let book_status = if record.record_status.is_returned() {
            if other_loans > 0 {
                None
            } else {
                Some(BookStatus::Available)
            }
        } else if other_loans > 0 {
            tx.rollback().await?;
            return Err(CoreError::BookNotAvailable {
                id: record.book_id.clone(),
                status: BookStatus::Borrowed.to_string(),
            }
            .into());
        } else {
            Some(BookStatus::Borrowed)
        };

        if let Some(status) = book_status {
            sqlx::query("UPDATE books SET status = ?1 WHERE id = ?2")
                .bind(status.as_str())
                .bind(&record.book_id)
                .execute(&mut *tx)
                .await?;
        }

        commit(tx).await?;

        info!(
            record_id = %record.id,
            status = %record.record_status,
            librarian_id = record.librarian_id.as_deref().unwrap_or("-"),
            "Borrowing record processed"
        );
        Ok(true)
    }
}

// =============================================================================
// Statement helpers (shared by pool and transaction callers)
// =============================================================================

async fn insert_record(
    conn: &mut sqlx::SqliteConnection,
    record: &BorrowingRecord,
) -> DbResult<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO borrowing_records (
            id, book_id, patron_id, librarian_id, borrowing_date,
            due_date, return_date, request_state, record_status
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&record.id)
    .bind(&record.book_id)
    .bind(&record.patron_id)
    .bind(&record.librarian_id)
    .bind(record.borrowing_date)
    .bind(record.due_date)
    .bind(record.return_date)
    .bind(record.request_state.as_i64())
    .bind(record.record_status.as_str())
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

async fn update_record(
    conn: &mut sqlx::SqliteConnection,
    record: &BorrowingRecord,
) -> DbResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE borrowing_records SET
            librarian_id = ?1,
            borrowing_date = ?2,
            due_date = ?3,
            return_date = ?4,
            request_state = ?5,
            record_status = ?6
        WHERE id = ?7
        "#,
    )
    .bind(&record.librarian_id)
    .bind(record.borrowing_date)
    .bind(record.due_date)
    .bind(record.return_date)
    .bind(record.request_state.as_i64())
    .bind(record.record_status.as_str())
    .bind(&record.id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// Loans of `book_id` other than `record_id` that still have the book out.
async fn count_outstanding_loans(
    conn: &mut sqlx::SqliteConnection,
    book_id: &str,
    record_id: &str,
) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM borrowing_records \
         WHERE book_id = ?1 AND id != ?2 AND record_status IN (?3, ?4)",
    )
    .bind(book_id)
    .bind(record_id)
    .bind(RecordStatus::Active.as_str())
    .bind(RecordStatus::Overdue.as_str())
    .fetch_one(conn)
    .await?;

    Ok(count)
}

async fn commit(tx: Transaction<'_, Sqlite>) -> DbResult<()> {
    tx.commit()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{date, sample_book, sample_user, test_db};
    use crate::Database;
    use histopedia_core::{AccessLevel, BorrowingRecordFactory, Genre, DEFAULT_LOAN_DAYS};

    async fn seeded_db() -> Database {
        let db = test_db().await;
        db.users()
            .insert(&sample_user("UID0001", AccessLevel::Librarian))
            .await
            .unwrap();
        db.users()
            .insert(&sample_user("UID0002", AccessLevel::Patron))
            .await
            .unwrap();
        db.books()
            .insert(&sample_book("BID0001", "Stalingrad", Genre::MilitaryHistory))
            .await
            .unwrap();
        db
    }

    fn loan(id: &str) -> BorrowingRecord {
        BorrowingRecordFactory::open(id, "BID0001", "UID0002", date(2026, 3, 1), DEFAULT_LOAN_DAYS)
    }

    #[tokio::test]
    async fn test_open_loan_marks_book_borrowed() {
        let db = seeded_db().await;
        let record = loan("RID0001");

        db.records().open_loan(&record).await.unwrap();

        let stored = db.records().find_by_id("RID0001").await.unwrap().unwrap();
        assert_eq!(stored, record);
        assert_eq!(stored.record_status, RecordStatus::Active);
        assert_eq!(stored.due_date, date(2026, 3, 8));

        let book = db.books().find_by_id("BID0001").await.unwrap().unwrap();
        assert_eq!(book.status, BookStatus::Borrowed);
    }

    #[tokio::test]
    async fn test_open_loan_rejects_unavailable_book() {
        let db = seeded_db().await;
        db.records().open_loan(&loan("RID0001")).await.unwrap();

        let err = db.records().open_loan(&loan("RID0002")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::BookNotAvailable { ref status, .. }) if status == "Borrowed"
        ));
        assert!(db.records().find_by_id("RID0002").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_loan_missing_book() {
        let db = seeded_db().await;
        let mut record = loan("RID0001");
        record.book_id = "BID0404".to_string();

        let err = db.records().open_loan(&record).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(db.records().list_all().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_update_persists_every_column() {
        let db = seeded_db().await;
        let mut record = loan("RID0001");
        db.records().insert(&record).await.unwrap();

        record.librarian_id = Some("UID0001".to_string());
        record.borrowing_date = date(2026, 3, 2);
        record.due_date = date(2026, 3, 20);
        record.return_date = Some(date(2026, 3, 19));
        record.request_state = RequestState::Accepted;
        record.record_status = RecordStatus::Returned;
        assert!(db.records().update(&record).await.unwrap());

        let stored = db.records().find_by_id("RID0001").await.unwrap().unwrap();
        assert_eq!(stored, record);

        assert!(!db.records().update(&loan("RID0404")).await.unwrap());
    }

    #[tokio::test]
    async fn test_save_processed_returns_book() {
        let db = seeded_db().await;
        let mut record = loan("RID0001");
        db.records().open_loan(&record).await.unwrap();

        record.apply_status(RecordStatus::Returned, "UID0001", date(2026, 3, 5));
        assert!(db.records().save_processed(&record).await.unwrap());

        let stored = db.records().find_by_id("RID0001").await.unwrap().unwrap();
        assert_eq!(stored.return_date, Some(date(2026, 3, 5)));
        assert_eq!(stored.librarian_id.as_deref(), Some("UID0001"));

        let book = db.books().find_by_id("BID0001").await.unwrap().unwrap();
        assert_eq!(book.status, BookStatus::Available);
    }

    #[tokio::test]
    async fn test_save_processed_overdue_keeps_book_out() {
        let db = seeded_db().await;
        let mut record = loan("RID0001");
        db.records().open_loan(&record).await.unwrap();

        record.apply_status(RecordStatus::Overdue, "UID0001", date(2026, 3, 10));
        assert!(db.records().save_processed(&record).await.unwrap());

        let book = db.books().find_by_id("BID0001").await.unwrap().unwrap();
        assert_eq!(book.status, BookStatus::Borrowed);
    }

    async fn second_patron(db: &Database) {
        db.users()
            .insert(&sample_user("UID0003", AccessLevel::Patron))
            .await
            .unwrap();
    }

    fn outstanding(records: &[BorrowingRecord]) -> usize {
        records
            .iter()
            .filter(|r| !r.record_status.is_returned())
            .count()
    }

    #[tokio::test]
    async fn test_save_processed_reactivated_record_takes_book_back_out() {
        let db = seeded_db().await;
        second_patron(&db).await;
        let mut record = loan("RID0001");
        db.records().open_loan(&record).await.unwrap();

        record.apply_status(RecordStatus::Returned, "UID0001", date(2026, 3, 5));
        assert!(db.records().save_processed(&record).await.unwrap());
        record.apply_status(RecordStatus::Active, "UID0001", date(2026, 3, 6));
        assert!(db.records().save_processed(&record).await.unwrap());

        let book = db.books().find_by_id("BID0001").await.unwrap().unwrap();
        assert_eq!(book.status, BookStatus::Borrowed);

        let mut other = loan("RID0002");
        other.patron_id = "UID0003".to_string();
        let err = db.records().open_loan(&other).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::BookNotAvailable { .. })));

        let records = db.records().list_all().await.unwrap();
        assert_eq!(outstanding(&records), 1);
    }

    #[tokio::test]
    async fn test_save_processed_stale_record_leaves_newer_loan_alone() {
        let db = seeded_db().await;
        second_patron(&db).await;
        let mut first = loan("RID0001");
        db.records().open_loan(&first).await.unwrap();
        first.apply_status(RecordStatus::Returned, "UID0001", date(2026, 3, 5));
        db.records().save_processed(&first).await.unwrap();

        let mut second = loan("RID0002");
        second.patron_id = "UID0003".to_string();
        db.records().open_loan(&second).await.unwrap();

        first.apply_status(RecordStatus::ReturnedOverdue, "UID0001", date(2026, 3, 9));
        assert!(db.records().save_processed(&first).await.unwrap());
        let book = db.books().find_by_id("BID0001").await.unwrap().unwrap();
        assert_eq!(book.status, BookStatus::Borrowed);

        first.apply_status(RecordStatus::Active, "UID0001", date(2026, 3, 9));
        let err = db.records().save_processed(&first).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::BookNotAvailable { .. })));

        let stored = db.records().find_by_id("RID0001").await.unwrap().unwrap();
        assert_eq!(stored.record_status, RecordStatus::ReturnedOverdue);
        assert_eq!(outstanding(&db.records().list_all().await.unwrap()), 1);
    }

    #[tokio::test]
    async fn test_find_by_patron_and_next_id() {
        let db = seeded_db().await;
        assert_eq!(db.records().next_id().await.unwrap(), "RID0001");

        db.records().insert(&loan("RID0001")).await.unwrap();
        db.records().insert(&loan("RID0002")).await.unwrap();

        let records = db.records().find_by_patron_id("UID0002").await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(db.records().find_by_patron_id("UID0001").await.unwrap().is_empty());
        assert_eq!(db.records().next_id().await.unwrap(), "RID0003");
    }

    #[tokio::test]
    async fn test_deleting_book_cascades_to_records() {
        let db = seeded_db().await;
        db.records().insert(&loan("RID0001")).await.unwrap();

        assert!(db.books().delete("BID0001").await.unwrap());
        assert!(db.records().find_by_id("RID0001").await.unwrap().is_none());
    }
}
