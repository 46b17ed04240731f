//! # Error Types
//!
//! Domain-specific error types for histopedia-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  histopedia-core errors (this file)                                    │
//! │  ├── CoreError        - Domain rule / discriminant failures            │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  histopedia-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  console app errors                                                    │
//! │  └── AppError         - What the menus report to the user              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → AppError → Console      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
///
/// Most variants come from turning a raw discriminant (a genre string, an
/// access-level integer, a status column) into its typed form. Because every
/// such conversion goes through a closed enum, an unrecognised value is
/// reported here instead of producing a half-built entity.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Genre text that is not one of the three catalog genres.
    #[error("Unknown genre '{0}': expected Biography, Military History or Revolution")]
    UnknownGenre(String),

    /// Access level other than 0 (Librarian) or 1 (Patron).
    #[error("Unknown access level {0}: expected 0 (Librarian) or 1 (Patron)")]
    UnknownAccessLevel(i64),

    #[error("Unknown book status '{0}'")]
    UnknownBookStatus(String),

    #[error("Unknown record status '{0}'")]
    UnknownRecordStatus(String),

    #[error("Unknown request state {0}: expected -1, 0 or 1")]
    UnknownRequestState(i64),

    /// Identifier that does not follow the `PPP####` convention.
    #[error("Invalid {kind} id '{id}'")]
    InvalidId { kind: &'static str, id: String },

    /// Borrow attempted on a book that is not on the shelf.
    ///
    /// ## User Workflow
    /// ```text
    /// Patron enters BID0003
    ///      │
    ///      ▼
    /// Book status = Borrowed
    ///      │
    ///      ▼
    /// BookNotAvailable { id: "BID0003", status: "Borrowed" }
    ///      │
    ///      ▼
    /// Console: "Book is not available for borrowing."
    /// ```
    #[error("Book {id} is {status}, not Available")]
    BookNotAvailable { id: String, status: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by [`crate::validation`] before anything reaches the database.
/// The menus print the message and ask again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters long")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters long")]
    TooLong { field: String, max: usize },

    /// Free text with too few words.
    #[error("{field} must contain at least {min} words")]
    TooFewWords { field: String, min: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., not a number, not an email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {}", .allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::BookNotAvailable {
            id: "BID0003".to_string(),
            status: "Borrowed".to_string(),
        };
        assert_eq!(err.to_string(), "Book BID0003 is Borrowed, not Available");

        let err = CoreError::UnknownAccessLevel(7);
        assert!(err.to_string().contains("expected 0 (Librarian) or 1 (Patron)"));
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::TooShort {
            field: "Title".to_string(),
            min: 5,
        };
        assert_eq!(err.to_string(), "Title must be at least 5 characters long");

        let err = ValidationError::NotAllowed {
            field: "Status".to_string(),
            allowed: vec!["Active".to_string(), "Returned".to_string()],
        };
        assert_eq!(err.to_string(), "Status must be one of: Active, Returned");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "keyword".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
