//! Raw response shapes and the FETCH response decoder.
//!
//! The underlying connection hands back command results as an ordered
//! sequence of parts with exactly two shapes: an opaque terminal string, or
//! a nested sequence of sub-parts carrying one data item's payload
//! interleaved with literal segments from the wire. No further structure is
//! assumed; the decoder recovers message boundaries purely from content
//! markers within that stream.

mod fetch;

pub use fetch::decode;

use crate::{Error, Result};

/// One part of a raw command response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPart {
    /// Opaque terminal string (a data line or a section terminator).
    Line(String),
    /// Nested sub-parts carrying one data item's payload.
    Chunk(Vec<String>),
}

impl RawPart {
    /// Builds a terminal string part.
    #[must_use]
    pub fn line(s: impl Into<String>) -> Self {
        Self::Line(s.into())
    }

    /// Builds a nested chunk part from its sub-parts.
    #[must_use]
    pub fn chunk<I, S>(subs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Chunk(subs.into_iter().map(Into::into).collect())
    }

    /// Returns the content of a terminal string part.
    #[must_use]
    pub fn as_line(&self) -> Option<&str> {
        match self {
            Self::Line(s) => Some(s),
            Self::Chunk(_) => None,
        }
    }
}

/// Protocol-level status of a completed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Command succeeded.
    Ok,
    /// Command executed but the server refused it.
    No,
    /// Command was malformed or inappropriate for the current state.
    Bad,
}

/// Raw result of one IMAP command.
///
/// Non-OK results still carry their data parts: mailbox deletion, for
/// example, judges success by a literal status string rather than by
/// protocol status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// Protocol-level status.
    pub status: Status,
    /// Human-readable text from the tagged status line.
    pub info: String,
    /// Ordered data parts.
    pub parts: Vec<RawPart>,
}

impl RawResponse {
    /// Builds a successful response from its parts.
    #[must_use]
    pub fn ok(parts: Vec<RawPart>) -> Self {
        Self {
            status: Status::Ok,
            info: String::new(),
            parts,
        }
    }

    /// Builds a NO response.
    #[must_use]
    pub fn no(info: impl Into<String>, parts: Vec<RawPart>) -> Self {
        Self {
            status: Status::No,
            info: info.into(),
            parts,
        }
    }

    /// Builds a BAD response.
    #[must_use]
    pub fn bad(info: impl Into<String>) -> Self {
        Self {
            status: Status::Bad,
            info: info.into(),
            parts: Vec::new(),
        }
    }

    /// Returns the parts if the command succeeded, or the status converted
    /// to a typed error otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::No`] or [`Error::Bad`] for non-OK responses.
    pub fn into_ok(self) -> Result<Vec<RawPart>> {
        match self.status {
            Status::Ok => Ok(self.parts),
            Status::No => Err(Error::No(self.info)),
            Status::Bad => Err(Error::Bad(self.info)),
        }
    }

    /// Returns the first terminal data line, if any.
    #[must_use]
    pub fn first_line(&self) -> Option<&str> {
        self.parts.iter().find_map(RawPart::as_line)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn into_ok_passes_parts_through() {
        let response = RawResponse::ok(vec![RawPart::line("1 2 3")]);
        let parts = response.into_ok().unwrap();
        assert_eq!(parts, vec![RawPart::line("1 2 3")]);
    }

    #[test]
    fn into_ok_converts_no() {
        let response = RawResponse::no("mailbox unavailable", Vec::new());
        match response.into_ok() {
            Err(Error::No(info)) => assert_eq!(info, "mailbox unavailable"),
            other => panic!("expected NO error, got {other:?}"),
        }
    }

    #[test]
    fn into_ok_converts_bad() {
        let response = RawResponse::bad("unknown command");
        assert!(matches!(response.into_ok(), Err(Error::Bad(_))));
    }

    #[test]
    fn first_line_skips_chunks() {
        let response = RawResponse::ok(vec![
            RawPart::chunk(["meta", "headers"]),
            RawPart::line(")"),
        ]);
        assert_eq!(response.first_line(), Some(")"));
    }
}
