//! # Catalog Commands
//!
//! Search, add, edit and remove books.
//!
//! ## Add / Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Librarian menu                                                        │
//! │       │ prompts (retry until each field is valid)                       │
//! │       ▼                                                                 │
//! │  BookDraft / BookEdit                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  add_book / edit_book  ← re-check every rule, assign id                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BookFactory::for_genre(genre).create(..) ──► books.insert / update    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::info;

use histopedia_core::factory::BookFields;
use histopedia_core::validation::{
    validate_author, validate_description, validate_publication_year, validate_publisher,
    validate_title,
};
use histopedia_core::{Book, BookFactory, BookStatus, Genre};
use histopedia_db::Database;

use crate::error::{AppError, AppResult};

// =============================================================================
// Search
// =============================================================================

/// What the Browse option searches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Title,
    Genre,
    Author,
}

impl SearchKind {
    /// Maps the menu answer (1 → Title, 2 → Genre, 3 → Author).
    pub fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            1 => Some(SearchKind::Title),
            2 => Some(SearchKind::Genre),
            3 => Some(SearchKind::Author),
            _ => None,
        }
    }
}

/// Runs a catalog search.
///
/// Title and author match substrings, ignoring case. A genre keyword is
/// parsed into a [`Genre`]; a keyword naming no genre finds nothing.
pub async fn search_books(db: &Database, kind: SearchKind, keyword: &str) -> AppResult<Vec<Book>> {
    let books = db.books();

    let found = match kind {
        SearchKind::Title => books.find_by_title(keyword).await?,
        SearchKind::Author => books.find_by_author(keyword).await?,
        SearchKind::Genre => match keyword.parse::<Genre>() {
            Ok(genre) => books.find_by_genre(genre).await?,
            Err(_) => Vec::new(),
        },
    };

    Ok(found)
}

// =============================================================================
// Add
// =============================================================================

/// Every field a librarian enters for a new book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub genre: Genre,
    pub description: String,
    pub publication_year: i32,
    pub author: String,
    pub publisher: String,
    pub isbn: String,
}

fn check_fields(
    title: &str,
    description: &str,
    publication_year: i32,
    author: &str,
    publisher: &str,
    current_year: i32,
) -> AppResult<()> {
    validate_title(title)?;
    validate_description(description)?;
    validate_publication_year(publication_year, current_year)?;
    validate_author(author)?;
    validate_publisher(publisher)?;
    Ok(())
}

/// Adds a book to the catalog as Available, under the next free id.
pub async fn add_book(db: &Database, draft: BookDraft, current_year: i32) -> AppResult<Book> {
    check_fields(
        &draft.title,
        &draft.description,
        draft.publication_year,
        &draft.author,
        &draft.publisher,
        current_year,
    )?;

    let books = db.books();
    let id = books.next_id().await?;

    let book = BookFactory::for_genre(draft.genre).create(BookFields {
        id,
        title: draft.title,
        description: draft.description,
        author: draft.author,
        publisher: draft.publisher,
        publication_year: draft.publication_year,
        isbn: draft.isbn,
        status: BookStatus::Available,
    });
    books.insert(&book).await?;

    info!(book_id = %book.id, genre = %book.genre, "Book added");
    Ok(book)
}

// =============================================================================
// Edit
// =============================================================================

/// Changes to apply to a book. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookEdit {
    pub title: Option<String>,
    pub genre: Option<Genre>,
    pub description: Option<String>,
    pub publication_year: Option<i32>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
}

/// Applies an edit to an existing book.
///
/// A new genre rebuilds the book through that genre's factory. Only the
/// fields being changed are checked, so a book stored before the current
/// year keeps its old publication year untouched.
pub async fn edit_book(
    db: &Database,
    id: &str,
    edit: BookEdit,
    current_year: i32,
) -> AppResult<Book> {
    let books = db.books();
    let current = books.find_by_id(id).await?.ok_or_else(|| AppError::NotFound {
        entity: "Book",
        id: id.to_string(),
    })?;

    if let Some(title) = &edit.title {
        validate_title(title)?;
    }
    if let Some(description) = &edit.description {
        validate_description(description)?;
    }
    if let Some(year) = edit.publication_year {
        validate_publication_year(year, current_year)?;
    }
    if let Some(author) = &edit.author {
        validate_author(author)?;
    }
    if let Some(publisher) = &edit.publisher {
        validate_publisher(publisher)?;
    }

    let genre = edit.genre.unwrap_or(current.genre);
    let book = BookFactory::for_genre(genre).create(BookFields {
        id: current.id,
        title: edit.title.unwrap_or(current.title),
        description: edit.description.unwrap_or(current.description),
        author: edit.author.unwrap_or(current.author),
        publisher: edit.publisher.unwrap_or(current.publisher),
        publication_year: edit.publication_year.unwrap_or(current.publication_year),
        isbn: edit.isbn.unwrap_or(current.isbn),
        status: current.status,
    });

    if !books.update(&book).await? {
        return Err(AppError::NotFound {
            entity: "Book",
            id: book.id,
        });
    }

    info!(book_id = %book.id, "Book updated");
    Ok(book)
}

// =============================================================================
// Remove
// =============================================================================

/// Removes a book and its borrowing records. `false` when the id is unknown.
pub async fn remove_book(db: &Database, id: &str) -> AppResult<bool> {
    let removed = db.books().delete(id).await?;
    if removed {
        info!(book_id = %id, "Book removed");
    }
    Ok(removed)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use histopedia_db::DbConfig;

    const YEAR: i32 = 2026;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn draft(title: &str, genre: Genre) -> BookDraft {
        BookDraft {
            title: title.to_string(),
            genre,
            description: "An account of the years that changed everything".to_string(),
            publication_year: YEAR,
            author: "Mike Duncan".to_string(),
            publisher: "PublicAffairs".to_string(),
            isbn: "978-1541773721".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_assigns_sequential_ids() {
        let db = test_db().await;

        let first = add_book(&db, draft("Hero of Two Worlds", Genre::Biography), YEAR)
            .await
            .unwrap();
        let second = add_book(&db, draft("The Storm Before", Genre::Revolution), YEAR)
            .await
            .unwrap();

        assert_eq!(first.id, "BID0001");
        assert_eq!(second.id, "BID0002");
        assert_eq!(second.status, BookStatus::Available);
        assert_eq!(db.books().find_by_id("BID0002").await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_fields() {
        let db = test_db().await;

        let mut old = draft("Hero of Two Worlds", Genre::Biography);
        old.publication_year = YEAR - 1;
        assert!(matches!(
            add_book(&db, old, YEAR).await,
            Err(AppError::Validation(_))
        ));

        let mut short = draft("Hero", Genre::Biography);
        short.description = "Too short".to_string();
        assert!(add_book(&db, short, YEAR).await.is_err());

        assert_eq!(db.books().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_by_each_kind() {
        let db = test_db().await;
        add_book(&db, draft("Hero of Two Worlds", Genre::Biography), YEAR)
            .await
            .unwrap();
        add_book(&db, draft("The Storm Before", Genre::Revolution), YEAR)
            .await
            .unwrap();

        let by_title = search_books(&db, SearchKind::Title, "storm").await.unwrap();
        assert_eq!(by_title.len(), 1);

        let by_genre = search_books(&db, SearchKind::Genre, "BIOGRAPHY").await.unwrap();
        assert_eq!(by_genre.len(), 1);
        assert_eq!(by_genre[0].genre, Genre::Biography);

        let unknown = search_books(&db, SearchKind::Genre, "Poetry").await.unwrap();
        assert!(unknown.is_empty());

        let by_author = search_books(&db, SearchKind::Author, "duncan").await.unwrap();
        assert_eq!(by_author.len(), 2);
    }

    #[tokio::test]
    async fn test_edit_keeps_skipped_fields() {
        let db = test_db().await;
        let book = add_book(&db, draft("Hero of Two Worlds", Genre::Biography), YEAR)
            .await
            .unwrap();

        let edit = BookEdit {
            title: Some("Hero of Two Worlds: Lafayette".to_string()),
            genre: Some(Genre::Revolution),
            ..BookEdit::default()
        };
        let edited = edit_book(&db, &book.id, edit, YEAR).await.unwrap();

        assert_eq!(edited.title, "Hero of Two Worlds: Lafayette");
        assert_eq!(edited.genre, Genre::Revolution);
        assert_eq!(edited.author, book.author);
        assert_eq!(edited.isbn, book.isbn);
        assert_eq!(db.books().find_by_id(&book.id).await.unwrap(), Some(edited));
    }

    #[tokio::test]
    async fn test_edit_unknown_book() {
        let db = test_db().await;
        let err = edit_book(&db, "BID0404", BookEdit::default(), YEAR)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "Book", .. }));
    }

    #[tokio::test]
    async fn test_remove() {
        let db = test_db().await;
        let book = add_book(&db, draft("Hero of Two Worlds", Genre::Biography), YEAR)
            .await
            .unwrap();

        assert!(!remove_book(&db, "BID0404").await.unwrap());
        assert!(remove_book(&db, &book.id).await.unwrap());
        assert!(db.books().find_by_id(&book.id).await.unwrap().is_none());
    }
}
