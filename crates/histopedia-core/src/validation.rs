//! # Validation Module
//!
//! Input rules for the add/edit/register/browse flows.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console prompt (apps/cli)                                    │
//! │  ├── Reads one line                                                    │
//! │  └── Calls THIS MODULE; on error prints the message and asks again     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Discriminant parsing (types.rs)                              │
//! │  └── Genre / status text → closed enum                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE email                                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use histopedia_core::validation::{validate_title, validate_publication_year};
//!
//! assert!(validate_title("Team of Rivals").is_ok());
//! assert!(validate_title("Ike").is_err());
//! assert!(validate_publication_year(2025, 2026).is_err());
//! ```
//!
//! Lengths are counted in characters, not bytes.

use crate::error::ValidationError;
use crate::{
    MIN_BOOK_ID_INPUT_CHARS, MIN_CREDENTIAL_CHARS, MIN_DESCRIPTION_WORDS, MIN_TEXT_FIELD_CHARS,
    USERNAME_MAX_CHARS, USERNAME_MIN_CHARS,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Helpers
// =============================================================================

fn min_chars(field: &str, value: &str, min: usize) -> ValidationResult<()> {
    if value.chars().count() < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    Ok(())
}

// =============================================================================
// Book Validators
// =============================================================================

/// Validates a book title.
///
/// ## Rules
/// - At least 5 characters
pub fn validate_title(title: &str) -> ValidationResult<()> {
    min_chars("Title", title, MIN_TEXT_FIELD_CHARS)
}

/// Validates a book description.
///
/// ## Rules
/// - At least 5 whitespace-separated words
///
/// ## Example
/// ```rust
/// use histopedia_core::validation::validate_description;
///
/// assert!(validate_description("A life of the first emperor").is_ok());
/// assert!(validate_description("Too   short  really").is_err());
/// ```
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.split_whitespace().count() < MIN_DESCRIPTION_WORDS {
        return Err(ValidationError::TooFewWords {
            field: "Description".to_string(),
            min: MIN_DESCRIPTION_WORDS,
        });
    }
    Ok(())
}

/// Validates a book author.
pub fn validate_author(author: &str) -> ValidationResult<()> {
    min_chars("Author", author, MIN_TEXT_FIELD_CHARS)
}

/// Validates a book publisher.
pub fn validate_publisher(publisher: &str) -> ValidationResult<()> {
    min_chars("Publisher", publisher, MIN_TEXT_FIELD_CHARS)
}

/// Parses a year typed at a prompt.
pub fn parse_year(input: &str) -> ValidationResult<i32> {
    input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "Publication year".to_string(),
            reason: "must be a whole number".to_string(),
        })
}

/// Validates a publication year against the current year.
///
/// ## Rules
/// - Must be `current_year` or later (the catalog only takes upcoming and
///   current releases)
///
/// The caller supplies `current_year` so this stays free of clock reads.
pub fn validate_publication_year(year: i32, current_year: i32) -> ValidationResult<()> {
    if year < current_year {
        return Err(ValidationError::OutOfRange {
            field: "Publication year".to_string(),
            min: i64::from(current_year),
            max: i64::from(i32::MAX),
        });
    }
    Ok(())
}

/// Validates a book id typed at a prompt before it is looked up.
pub fn validate_book_id_input(id: &str) -> ValidationResult<()> {
    min_chars("ID", id, MIN_BOOK_ID_INPUT_CHARS)
}

/// Validates a search keyword.
///
/// ## Returns
/// The trimmed keyword.
pub fn validate_keyword(keyword: &str) -> ValidationResult<String> {
    let keyword = keyword.trim();

    if keyword.is_empty() {
        return Err(ValidationError::Required {
            field: "Keyword".to_string(),
        });
    }

    Ok(keyword.to_string())
}

// =============================================================================
// Account Validators
// =============================================================================

/// Validates a username.
///
/// ## Rules
/// - Between 3 and 20 characters (inclusive)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Register                                                               │
/// │                                                                         │
/// │  User enters username: "al"                                            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_username("al") ← THIS FUNCTION                               │
/// │       │                                                                 │
/// │       ├── < 3 chars?  → "Username must be at least 3 characters long"  │
/// │       ├── > 20 chars? → "Username must be at most 20 characters long"  │
/// │       └── OK → ask for email                                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_username(username: &str) -> ValidationResult<()> {
    min_chars("Username", username, USERNAME_MIN_CHARS)?;

    if username.chars().count() > USERNAME_MAX_CHARS {
        return Err(ValidationError::TooLong {
            field: "Username".to_string(),
            max: USERNAME_MAX_CHARS,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - At least 5 characters
/// - Contains `@` with text on both sides
pub fn validate_email(email: &str) -> ValidationResult<()> {
    min_chars("Email address", email, MIN_CREDENTIAL_CHARS)?;

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "Email address".to_string(),
            reason: "must look like name@domain".to_string(),
        }),
    }
}

/// Validates a password.
///
/// ## Rules
/// - At least 5 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    min_chars("Password", password, MIN_CREDENTIAL_CHARS)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Napoleon").is_ok());
        assert!(validate_title("Lenin").is_ok());
        assert!(validate_title("Mao").is_err());
        assert!(validate_title("").is_err());
    }

    #[test]
    fn test_validate_description_counts_words() {
        assert!(validate_description("one two three four five").is_ok());
        assert!(validate_description("one two three four").is_err());
        assert!(validate_description("   ").is_err());
        assert!(validate_description("one\ttwo\nthree  four five").is_ok());
    }

    #[test]
    fn test_validate_author_and_publisher() {
        assert!(validate_author("Antony Beevor").is_ok());
        assert!(validate_author("Bob").is_err());
        assert!(validate_publisher("Penguin").is_ok());
        assert!(validate_publisher("DK").is_err());
    }

    #[test]
    fn test_publication_year() {
        assert!(validate_publication_year(2026, 2026).is_ok());
        assert!(validate_publication_year(2030, 2026).is_ok());
        assert!(validate_publication_year(1999, 2026).is_err());

        assert_eq!(parse_year(" 2027 ").unwrap(), 2027);
        assert!(parse_year("next year").is_err());
    }

    #[test]
    fn test_validate_book_id_input() {
        assert!(validate_book_id_input("BID0001").is_ok());
        assert!(validate_book_id_input("BID01").is_err());
    }

    #[test]
    fn test_validate_keyword() {
        assert_eq!(validate_keyword("  Caesar ").unwrap(), "Caesar");
        assert!(validate_keyword("   ").is_err());
    }

    #[test]
    fn test_validate_username_bounds() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"a".repeat(20)).is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.c").is_ok());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("plainaddress").is_err());
        assert!(validate_email("@lib.org").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("hunter2").is_ok());
        assert!(validate_password("1234").is_err());
    }
}
