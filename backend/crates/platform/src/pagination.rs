//! Cursor Pagination
//!
//! Every list endpoint pages through a `(timestamp, id)` ordering, newest first.
//! The position of the last returned item is handed to the client as an
//! opaque cursor: URL-safe base64 of `"<ticks>|<uuid>"`.
//!
//! ## Protocol
//! 1. Limit is normalized: `<= 0` becomes [`DEFAULT_PAGE_LIMIT`], anything
//!    above [`MAX_PAGE_LIMIT`] is clamped.
//! 2. Candidates are ordered by ticks descending, then id descending.
//! 3. With a cursor, only positions strictly after it are kept.
//! 4. `limit + 1` candidates are taken; if the extra one exists, the
//!    `limit`-th item becomes the next cursor.

use std::num::ParseIntError;
use std::string::FromUtf8Error;

use uuid::Uuid;

use crate::crypto::{from_base64_url, to_base64_url};

/// Page size used when the caller asks for zero or a negative number of items
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Upper bound on page size
pub const MAX_PAGE_LIMIT: usize = 100;

/// Clamp a requested page size into `1..=MAX_PAGE_LIMIT`
pub fn normalize_limit(limit: i64) -> usize {
    if limit <= 0 {
        DEFAULT_PAGE_LIMIT
    } else if limit > MAX_PAGE_LIMIT as i64 {
        MAX_PAGE_LIMIT
    } else {
        limit as usize
    }
}

/// Error decoding a client-supplied cursor
#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    #[error("cursor is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("cursor is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    #[error("cursor has no '|' separator")]
    MissingSeparator,

    #[error("cursor timestamp is not an integer: {0}")]
    Ticks(#[from] ParseIntError),

    #[error("cursor id is not a UUID: {0}")]
    Id(#[from] uuid::Error),
}

impl CursorError {
    /// Stable name of the failure, safe to echo back to clients
    pub fn kind(&self) -> &'static str {
        match self {
            CursorError::Encoding(_) => "InvalidEncoding",
            CursorError::Utf8(_) => "InvalidUtf8",
            CursorError::MissingSeparator => "MissingSeparator",
            CursorError::Ticks(_) => "InvalidTicks",
            CursorError::Id(_) => "InvalidId",
        }
    }
}

/// Position in a `(ticks desc, id desc)` ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub ticks: i64,
    pub id: Uuid,
}

impl Cursor {
    pub fn new(ticks: i64, id: Uuid) -> Self {
        Self { ticks, id }
    }

    /// Opaque, URL-safe representation
    pub fn encode(&self) -> String {
        to_base64_url(format!("{}|{}", self.ticks, self.id).as_bytes())
    }

    /// Decode an optional client cursor
    ///
    /// Absent, empty and whitespace-only input all mean "start of list".
    /// Any other malformed input is an error.
    pub fn decode(raw: Option<&str>) -> Result<Option<Self>, CursorError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Self::parse(raw).map(Some),
        }
    }

    fn parse(raw: &str) -> Result<Self, CursorError> {
        let decoded = String::from_utf8(from_base64_url(raw)?)?;
        let (ticks, id) = decoded
            .split_once('|')
            .ok_or(CursorError::MissingSeparator)?;

        Ok(Self {
            ticks: ticks.parse()?,
            id: Uuid::parse_str(id)?,
        })
    }

    /// Whether `(ticks, id)` lies strictly past this cursor in listing order
    pub fn is_past(&self, ticks: i64, id: &Uuid) -> bool {
        ticks < self.ticks || (ticks == self.ticks && *id < self.id)
    }
}

/// One page of results plus the cursor for the next one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Cut a page out of candidates already sorted and filtered past the cursor
    ///
    /// `candidates` should hold at most `limit + 1` items; anything beyond the
    /// first `limit` only signals that more data exists.
    pub fn from_candidates(
        mut candidates: Vec<T>,
        limit: usize,
        position: impl Fn(&T) -> Cursor,
    ) -> Self {
        let next_cursor = if candidates.len() > limit {
            candidates.truncate(limit);
            candidates.last().map(|last| position(last).encode())
        } else {
            None
        };

        Self {
            items: candidates,
            next_cursor,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_limit() {
        assert_eq!(normalize_limit(0), 20);
        assert_eq!(normalize_limit(-5), 20);
        assert_eq!(normalize_limit(1), 1);
        assert_eq!(normalize_limit(57), 57);
        assert_eq!(normalize_limit(100), 100);
        assert_eq!(normalize_limit(101), 100);
        assert_eq!(normalize_limit(i64::MAX), 100);
    }

    #[test]
    fn test_cursor_roundtrip() {
        let cursor = Cursor::new(638_400_000_000_000_000, Uuid::new_v4());
        let decoded = Cursor::decode(Some(&cursor.encode())).unwrap();
        assert_eq!(decoded, Some(cursor));

        let negative = Cursor::new(-1, Uuid::nil());
        assert_eq!(
            Cursor::decode(Some(&negative.encode())).unwrap(),
            Some(negative)
        );
    }

    #[test]
    fn test_cursor_is_url_safe() {
        let encoded = Cursor::new(i64::MAX, Uuid::from_u128(u128::MAX)).encode();
        assert!(
            encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_blank_cursor_means_start() {
        assert_eq!(Cursor::decode(None).unwrap(), None);
        assert_eq!(Cursor::decode(Some("")).unwrap(), None);
        assert_eq!(Cursor::decode(Some("   ")).unwrap(), None);
    }

    #[test]
    fn test_malformed_cursor_kinds() {
        let err = Cursor::decode(Some("***")).unwrap_err();
        assert_eq!(err.kind(), "InvalidEncoding");

        let no_sep = to_base64_url(b"12345");
        assert_eq!(
            Cursor::decode(Some(&no_sep)).unwrap_err().kind(),
            "MissingSeparator"
        );

        let bad_ticks = to_base64_url(format!("abc|{}", Uuid::nil()).as_bytes());
        assert_eq!(
            Cursor::decode(Some(&bad_ticks)).unwrap_err().kind(),
            "InvalidTicks"
        );

        let bad_id = to_base64_url(b"42|not-a-uuid");
        assert_eq!(
            Cursor::decode(Some(&bad_id)).unwrap_err().kind(),
            "InvalidId"
        );

        let bad_utf8 = to_base64_url(&[0xff, 0xfe, b'|']);
        assert_eq!(
            Cursor::decode(Some(&bad_utf8)).unwrap_err().kind(),
            "InvalidUtf8"
        );
    }

    #[test]
    fn test_is_past() {
        let mid = Uuid::from_u128(5);
        let cursor = Cursor::new(100, mid);

        assert!(cursor.is_past(99, &Uuid::from_u128(9)));
        assert!(cursor.is_past(100, &Uuid::from_u128(4)));
        assert!(!cursor.is_past(100, &mid));
        assert!(!cursor.is_past(100, &Uuid::from_u128(6)));
        assert!(!cursor.is_past(101, &Uuid::from_u128(0)));
    }

    #[test]
    fn test_page_from_candidates() {
        let position = |n: &u128| Cursor::new(*n as i64, Uuid::from_u128(*n));

        let page = Page::from_candidates(vec![9u128, 8, 7], 2, position);
        assert_eq!(page.items, vec![9, 8]);
        assert_eq!(
            page.next_cursor,
            Some(Cursor::new(8, Uuid::from_u128(8)).encode())
        );

        let last = Page::from_candidates(vec![3u128, 2], 2, position);
        assert_eq!(last.items, vec![3, 2]);
        assert!(last.next_cursor.is_none());
    }
}
