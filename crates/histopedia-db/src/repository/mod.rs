//! # Repository Module
//!
//! Record controllers for Histopedia.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Menu / Command                                                        │
//! │       │                                                                 │
//! │       │  db.books().find_by_title("napoleon")                          │
//! │       ▼                                                                 │
//! │  BookRepository                                                        │
//! │  ├── compose parameterized SQL                                         │
//! │  ├── fetch BookRow (sqlx::FromRow)                                     │
//! │  └── BookRow ──BookFactory──► Book                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every row is converted through the entity factories, so a stored
//! discriminant the domain does not know surfaces as
//! [`DbError::CorruptRow`](crate::DbError::CorruptRow) instead of a
//! half-built entity.
//!
//! ## Available Repositories
//!
//! - [`BookRepository`](book::BookRepository) - Catalog queries and edits
//! - [`UserRepository`](user::UserRepository) - Accounts and login
//! - [`BorrowingRecordRepository`](record::BorrowingRecordRepository) - Loans

pub mod book;
pub mod record;
pub mod user;

/// Builds a `LIKE` pattern matching `term` anywhere, with `\` as the escape
/// character. Use together with `ESCAPE '\'`.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use histopedia_core::factory::BookFields;
    use histopedia_core::{
        AccessLevel, Book, BookFactory, BookStatus, Genre, User, UserFactory,
    };

    use crate::{Database, DbConfig};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub fn sample_book(id: &str, title: &str, genre: Genre) -> Book {
        BookFactory::for_genre(genre).create(BookFields {
            id: id.to_string(),
            title: title.to_string(),
            description: "A long look at a short and violent century".to_string(),
            author: "Eric Hobsbawm".to_string(),
            publisher: "Abacus Books".to_string(),
            publication_year: 2026,
            isbn: "978-0349106717".to_string(),
            status: BookStatus::Available,
        })
    }

    /// A user whose stored hash is a placeholder; only for foreign keys.
    pub fn sample_user(id: &str, level: AccessLevel) -> User {
        UserFactory::for_access_level(level).create(
            id,
            format!("user{}", id),
            format!("{}@histopedia.org", id.to_lowercase()),
            "not-a-hash",
        )
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("war"), "%war%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
    }
}
