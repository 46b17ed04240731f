//! # Book Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Browsing by title, genre or author
//! - Lookup by id or ISBN
//! - A patron's currently borrowed books
//! - Add / edit / remove
//!
//! ## Row Conversion
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  books row                                                              │
//! │  ┌──────────┬─────────────────┬──────────────────┬───────────┐         │
//! │  │ BID0003  │ Guns of August  │ Military History │ Available │         │
//! │  └──────────┴─────────────────┴──────────────────┴───────────┘         │
//! │       │                                                                 │
//! │       ▼  BookRow (sqlx::FromRow)                                        │
//! │       │                                                                 │
//! │       ├── genre  ──parse──► Genre::MilitaryHistory ──► BookFactory     │
//! │       └── status ──parse──► BookStatus::Available                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Book { genre: MilitaryHistory, status: Available, .. }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use histopedia_core::factory::BookFields;
use histopedia_core::ids::{self, IdKind};
use histopedia_core::{Book, BookFactory, BookStatus, Genre, RecordStatus};

use crate::error::{DbError, DbResult};
use crate::repository::contains_pattern;

const SELECT_BOOK: &str = "SELECT b.id, b.title, b.genre, b.description, b.author, \
     b.publisher, b.publication_year, b.isbn, b.status FROM books b";

/// A `books` row as stored.
#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    id: String,
    title: String,
    genre: String,
    description: String,
    author: String,
    publisher: String,
    publication_year: i32,
    isbn: String,
    status: String,
}

impl TryFrom<BookRow> for Book {
    type Error = DbError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let factory = BookFactory::for_genre_name(&row.genre)
            .map_err(|e| DbError::corrupt_row("books", &row.id, e))?;
        let status: BookStatus = row
            .status
            .parse()
            .map_err(|e| DbError::corrupt_row("books", &row.id, e))?;

        Ok(factory.create(BookFields {
            id: row.id,
            title: row.title,
            description: row.description,
            author: row.author,
            publisher: row.publisher,
            publication_year: row.publication_year,
            isbn: row.isbn,
            status,
        }))
    }
}

fn into_books(rows: Vec<BookRow>) -> DbResult<Vec<Book>> {
    rows.into_iter().map(Book::try_from).collect()
}

/// Repository for book database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.books();
///
/// let found = repo.find_by_author("tuchman").await?;
/// let book = repo.find_by_id("BID0001").await?;
/// ```
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lists every book, ordered by id.
    pub async fn list_all(&self) -> DbResult<Vec<Book>> {
        debug!("Listing all books");

        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "{} ORDER BY LENGTH(b.id), b.id",
            SELECT_BOOK
        ))
        .fetch_all(&self.pool)
        .await?;

        into_books(rows)
    }

    /// Finds books whose title contains `title` (case-insensitive).
    pub async fn find_by_title(&self, title: &str) -> DbResult<Vec<Book>> {
        debug!(title = %title, "Finding books by title");
        self.find_containing("title", title).await
    }

    /// Finds books whose author contains `author` (case-insensitive).
    pub async fn find_by_author(&self, author: &str) -> DbResult<Vec<Book>> {
        debug!(author = %author, "Finding books by author");
        self.find_containing("author", author).await
    }

    /// Substring search on one text column.
    ///
    /// `column` is always one of our own literals, never user input.
    async fn find_containing(&self, column: &'static str, term: &str) -> DbResult<Vec<Book>> {
        let sql = format!(
            r"{} WHERE b.{} LIKE ?1 ESCAPE '\' ORDER BY LENGTH(b.id), b.id",
            SELECT_BOOK, column
        );

        let rows = sqlx::query_as::<_, BookRow>(&sql)
            .bind(contains_pattern(term))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Search returned books");
        into_books(rows)
    }

    /// Finds all books of one genre.
    pub async fn find_by_genre(&self, genre: Genre) -> DbResult<Vec<Book>> {
        debug!(genre = %genre, "Finding books by genre");

        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "{} WHERE b.genre = ?1 ORDER BY LENGTH(b.id), b.id",
            SELECT_BOOK
        ))
        .bind(genre.as_str())
        .fetch_all(&self.pool)
        .await?;

        into_books(rows)
    }

    /// Gets a book by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Book))` - Book found
    /// * `Ok(None)` - No such id
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Book>> {
        debug!(id = %id, "Finding book by id");

        let row = sqlx::query_as::<_, BookRow>(&format!("{} WHERE b.id = ?1", SELECT_BOOK))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Book::try_from).transpose()
    }

    /// Gets a book by its ISBN. With duplicate ISBNs the lowest id wins.
    pub async fn find_by_isbn(&self, isbn: &str) -> DbResult<Option<Book>> {
        debug!(isbn = %isbn, "Finding book by ISBN");

        let row = sqlx::query_as::<_, BookRow>(&format!(
            "{} WHERE b.isbn = ?1 ORDER BY LENGTH(b.id), b.id LIMIT 1",
            SELECT_BOOK
        ))
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Book::try_from).transpose()
    }

    /// Books the patron currently has out (Active records only).
    pub async fn find_borrowed_by_patron_id(&self, patron_id: &str) -> DbResult<Vec<Book>> {
        debug!(patron_id = %patron_id, "Finding borrowed books by patron id");

        let sql = format!(
            "{} INNER JOIN borrowing_records r ON r.book_id = b.id \
             WHERE r.patron_id = ?1 AND r.record_status = ?2 \
             GROUP BY b.id ORDER BY LENGTH(b.id), b.id",
            SELECT_BOOK
        );

        let rows = sqlx::query_as::<_, BookRow>(&sql)
            .bind(patron_id)
            .bind(RecordStatus::Active.as_str())
            .fetch_all(&self.pool)
            .await?;

        into_books(rows)
    }

    /// Books the patron with this email currently has out.
    pub async fn find_borrowed_by_patron_email(&self, email: &str) -> DbResult<Vec<Book>> {
        debug!(email = %email, "Finding borrowed books by patron email");

        let sql = format!(
            "{} INNER JOIN borrowing_records r ON r.book_id = b.id \
             INNER JOIN users u ON u.id = r.patron_id \
             WHERE u.email_address = ?1 AND r.record_status = ?2 \
             GROUP BY b.id ORDER BY LENGTH(b.id), b.id",
            SELECT_BOOK
        );

        let rows = sqlx::query_as::<_, BookRow>(&sql)
            .bind(email)
            .bind(RecordStatus::Active.as_str())
            .fetch_all(&self.pool)
            .await?;

        into_books(rows)
    }

    /// The book with the numerically greatest id.
    pub async fn find_latest(&self) -> DbResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "{} ORDER BY LENGTH(b.id) DESC, b.id DESC LIMIT 1",
            SELECT_BOOK
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Book::try_from).transpose()
    }

    /// The id the next inserted book should get (`BID0001` when empty).
    pub async fn next_id(&self) -> DbResult<String> {
        let latest = self.find_latest().await?;
        let next = ids::next_id(IdKind::Book, latest.as_ref().map(|b| b.id.as_str()))?;

        debug!(next_id = %next, "Generated book id");
        Ok(next)
    }

    /// Number of books in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Inserts a new book.
    ///
    /// ## Returns
    /// `true` when a row was written.
    pub async fn insert(&self, book: &Book) -> DbResult<bool> {
        debug!(id = %book.id, genre = %book.genre, "Inserting book");

        let result = sqlx::query(
            r#"
            INSERT INTO books (
                id, title, genre, description, author,
                publisher, publication_year, isbn, status
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&book.id)
        .bind(&book.title)
        .bind(book.genre.as_str())
        .bind(&book.description)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(book.publication_year)
        .bind(&book.isbn)
        .bind(book.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replaces every field of an existing book.
    ///
    /// ## Returns
    /// `false` when no book has `book.id`.
    pub async fn update(&self, book: &Book) -> DbResult<bool> {
        debug!(id = %book.id, "Updating book");

        let result = sqlx::query(
            r#"
            UPDATE books SET
                title = ?1,
                genre = ?2,
                description = ?3,
                author = ?4,
                publisher = ?5,
                publication_year = ?6,
                isbn = ?7,
                status = ?8
            WHERE id = ?9
            "#,
        )
        .bind(&book.title)
        .bind(book.genre.as_str())
        .bind(&book.description)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(book.publication_year)
        .bind(&book.isbn)
        .bind(book.status.as_str())
        .bind(&book.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Changes only the shelf status of a book.
    pub async fn update_status(&self, id: &str, status: BookStatus) -> DbResult<bool> {
        debug!(id = %id, status = %status, "Updating book status");

        let result = sqlx::query("UPDATE books SET status = ?1 WHERE id = ?2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes a book. Its borrowing records go with it.
    ///
    /// ## Returns
    /// `false` when no book has this id.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting book");

        let result = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{date, sample_book, sample_user, test_db};
    use histopedia_core::{AccessLevel, BorrowingRecordFactory, DEFAULT_LOAN_DAYS};

    #[tokio::test]
    async fn test_insert_then_find_by_id() {
        let db = test_db().await;
        let repo = db.books();
        let book = sample_book("BID0001", "The Guns of August", Genre::MilitaryHistory);

        assert!(repo.insert(&book).await.unwrap());

        let found = repo.find_by_id("BID0001").await.unwrap().unwrap();
        assert_eq!(found, book);
        assert_eq!(found.genre, Genre::MilitaryHistory);
        assert!(repo.find_by_id("BID0404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_and_next_id() {
        let db = test_db().await;
        let repo = db.books();

        assert!(repo.find_latest().await.unwrap().is_none());
        assert_eq!(repo.next_id().await.unwrap(), "BID0001");

        repo.insert(&sample_book("BID0001", "The Guns of August", Genre::MilitaryHistory))
            .await
            .unwrap();

        let latest = repo.find_latest().await.unwrap().unwrap();
        assert_eq!(latest.id, "BID0001");
        assert_eq!(repo.next_id().await.unwrap(), "BID0002");
    }

    #[tokio::test]
    async fn test_latest_orders_numerically() {
        let db = test_db().await;
        let repo = db.books();

        repo.insert(&sample_book("BID9999", "Citizens Chronicle", Genre::Revolution))
            .await
            .unwrap();
        repo.insert(&sample_book("BID10000", "Ten Days That Shook", Genre::Revolution))
            .await
            .unwrap();

        assert_eq!(repo.find_latest().await.unwrap().unwrap().id, "BID10000");
        assert_eq!(repo.next_id().await.unwrap(), "BID10001");
    }

    #[tokio::test]
    async fn test_find_by_genre_filters() {
        let db = test_db().await;
        let repo = db.books();

        repo.insert(&sample_book("BID0001", "Napoleon the Great", Genre::Biography))
            .await
            .unwrap();
        repo.insert(&sample_book("BID0002", "Stalingrad", Genre::MilitaryHistory))
            .await
            .unwrap();
        repo.insert(&sample_book("BID0003", "Alexander Hamilton", Genre::Biography))
            .await
            .unwrap();

        let found = repo.find_by_genre(Genre::Biography).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|b| b.genre == Genre::Biography));

        assert!(repo.find_by_genre(Genre::Revolution).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_title_and_author_search_is_case_insensitive() {
        let db = test_db().await;
        let repo = db.books();

        repo.insert(&sample_book("BID0001", "Napoleon the Great", Genre::Biography))
            .await
            .unwrap();
        repo.insert(&sample_book("BID0002", "Stalingrad", Genre::MilitaryHistory))
            .await
            .unwrap();

        let found = repo.find_by_title("NAPOLEON").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "BID0001");

        assert_eq!(repo.find_by_author("hobsbawm").await.unwrap().len(), 2);
        assert!(repo.find_by_title("%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_isbn() {
        let db = test_db().await;
        let repo = db.books();
        let mut book = sample_book("BID0001", "Stalingrad", Genre::MilitaryHistory);
        book.isbn = "978-0140247855".to_string();
        repo.insert(&book).await.unwrap();

        assert_eq!(
            repo.find_by_isbn("978-0140247855").await.unwrap().unwrap().id,
            "BID0001"
        );
        assert!(repo.find_by_isbn("000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let db = test_db().await;
        let repo = db.books();
        let mut book = sample_book("BID0001", "Stalingrad", Genre::MilitaryHistory);
        repo.insert(&book).await.unwrap();

        book.title = "Stalingrad: The Fateful Siege".to_string();
        book.genre = Genre::Biography;
        book.status = BookStatus::Unavailable;
        assert!(repo.update(&book).await.unwrap());

        assert_eq!(repo.find_by_id("BID0001").await.unwrap().unwrap(), book);

        let ghost = sample_book("BID0404", "Nothing Here", Genre::Biography);
        assert!(!repo.update(&ghost).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_status() {
        let db = test_db().await;
        let repo = db.books();
        repo.insert(&sample_book("BID0001", "Stalingrad", Genre::MilitaryHistory))
            .await
            .unwrap();

        assert!(repo.update_status("BID0001", BookStatus::Borrowed).await.unwrap());
        let book = repo.find_by_id("BID0001").await.unwrap().unwrap();
        assert_eq!(book.status, BookStatus::Borrowed);

        assert!(!repo.update_status("BID0404", BookStatus::Borrowed).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.books();
        repo.insert(&sample_book("BID0001", "Stalingrad", Genre::MilitaryHistory))
            .await
            .unwrap();

        assert!(!repo.delete("BID0404").await.unwrap());
        assert!(repo.delete("BID0001").await.unwrap());
        assert!(repo.find_by_id("BID0001").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_borrowed_books_for_patron() {
        let db = test_db().await;
        let patron = sample_user("UID0002", AccessLevel::Patron);
        db.users().insert(&patron).await.unwrap();

        let books = db.books();
        books
            .insert(&sample_book("BID0001", "Stalingrad", Genre::MilitaryHistory))
            .await
            .unwrap();
        books
            .insert(&sample_book("BID0002", "Napoleon the Great", Genre::Biography))
            .await
            .unwrap();

        let loan = BorrowingRecordFactory::open(
            "RID0001",
            "BID0001",
            "UID0002",
            date(2026, 3, 1),
            DEFAULT_LOAN_DAYS,
        );
        db.records().open_loan(&loan).await.unwrap();

        let mut returned = BorrowingRecordFactory::open(
            "RID0002",
            "BID0002",
            "UID0002",
            date(2026, 2, 1),
            DEFAULT_LOAN_DAYS,
        );
        returned.record_status = RecordStatus::Returned;
        db.records().insert(&returned).await.unwrap();

        let by_id = books.find_borrowed_by_patron_id("UID0002").await.unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].id, "BID0001");

        let by_email = books
            .find_borrowed_by_patron_email(&patron.email_address)
            .await
            .unwrap();
        assert_eq!(by_email, by_id);

        assert!(books
            .find_borrowed_by_patron_email("nobody@histopedia.org")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_unknown_genre_in_storage_is_corrupt_row() {
        let db = test_db().await;

        // Bypass the CHECK constraint the way an older schema would have.
        sqlx::query("PRAGMA ignore_check_constraints = ON")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO books VALUES ('BID0001', 'Odes', 'Poetry', 'd', 'a', 'p', 2026, 'i', 'Available')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = db.books().find_by_id("BID0001").await.unwrap_err();
        assert!(matches!(err, DbError::CorruptRow { table: "books", .. }));
    }
}
