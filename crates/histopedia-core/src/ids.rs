//! # Identifiers
//!
//! Business identifiers are a three-letter prefix followed by a zero-padded
//! sequence number: `UID0001`, `BID0042`, `RID0137`.
//!
//! New ids are derived from the latest stored id of the same kind, so they
//! are only unique for a single writer.

use crate::error::{CoreError, CoreResult};

/// Width of the zero-padded sequence number.
const SEQUENCE_WIDTH: usize = 4;

/// Entity kind an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    User,
    Book,
    BorrowingRecord,
}

impl IdKind {
    pub const fn prefix(&self) -> &'static str {
        match self {
            IdKind::User => "UID",
            IdKind::Book => "BID",
            IdKind::BorrowingRecord => "RID",
        }
    }

    const fn label(&self) -> &'static str {
        match self {
            IdKind::User => "user",
            IdKind::Book => "book",
            IdKind::BorrowingRecord => "borrowing record",
        }
    }
}

/// Formats a sequence number as an id, e.g. `(Book, 7)` → `BID0007`.
///
/// Numbers wider than four digits are printed in full (`BID10000`).
pub fn format_id(kind: IdKind, sequence: u32) -> String {
    format!("{}{:0width$}", kind.prefix(), sequence, width = SEQUENCE_WIDTH)
}

/// Extracts the sequence number from an id of the given kind.
pub fn parse_sequence(kind: IdKind, id: &str) -> CoreResult<u32> {
    let invalid = || CoreError::InvalidId {
        kind: kind.label(),
        id: id.to_string(),
    };

    let digits = id.strip_prefix(kind.prefix()).ok_or_else(invalid)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    digits.parse().map_err(|_| invalid())
}

/// Returns the id that follows `latest`, or the first id when nothing is
/// stored yet.
///
/// ## Example
/// ```rust
/// use histopedia_core::ids::{next_id, IdKind};
///
/// assert_eq!(next_id(IdKind::User, None).unwrap(), "UID0001");
/// assert_eq!(next_id(IdKind::Book, Some("BID0009")).unwrap(), "BID0010");
/// ```
pub fn next_id(kind: IdKind, latest: Option<&str>) -> CoreResult<String> {
    let sequence = match latest {
        Some(id) => parse_sequence(kind, id)?,
        None => 0,
    };

    let next = sequence.checked_add(1).ok_or_else(|| CoreError::InvalidId {
        kind: kind.label(),
        id: latest.unwrap_or_default().to_string(),
    })?;

    Ok(format_id(kind, next))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_id_pads_to_four_digits() {
        assert_eq!(format_id(IdKind::Book, 1), "BID0001");
        assert_eq!(format_id(IdKind::User, 42), "UID0042");
        assert_eq!(format_id(IdKind::BorrowingRecord, 12345), "RID12345");
    }

    #[test]
    fn test_next_id_after_latest() {
        assert_eq!(next_id(IdKind::Book, Some("BID0001")).unwrap(), "BID0002");
        assert_eq!(next_id(IdKind::Book, Some("BID9999")).unwrap(), "BID10000");
        assert_eq!(next_id(IdKind::BorrowingRecord, None).unwrap(), "RID0001");
    }

    #[test]
    fn test_parse_sequence_rejects_foreign_ids() {
        assert!(parse_sequence(IdKind::Book, "UID0001").is_err());
        assert!(parse_sequence(IdKind::Book, "BID").is_err());
        assert!(parse_sequence(IdKind::Book, "BID00x1").is_err());
        assert!(parse_sequence(IdKind::Book, "BID-001").is_err());
        assert_eq!(parse_sequence(IdKind::Book, "BID0100").unwrap(), 100);
    }
}
