//! Message records produced by the fetch-response decoder.
//!
//! Every content-carrying record keeps the metadata block exactly as the
//! server sent it; only the header/body payload differs by fetch mode.
//! Records are immutable once constructed and owned by the caller.

use super::GmId;

/// Raw per-message attributes (flags, internal date, UID, Gmail id, labels)
/// plus the payload for the requested fetch mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageRecord {
    /// Only the persistent Gmail id was requested.
    GmId(GmId),
    /// Metadata and the raw header block.
    Headers(HeaderRecord),
    /// Metadata, headers, and a bounded first-body-part fragment.
    Teaser(TeaserRecord),
    /// Metadata, headers, and the complete body text.
    Full(FullRecord),
}

impl MessageRecord {
    /// Returns the raw metadata block, if this record carries one.
    #[must_use]
    pub fn metadata(&self) -> Option<&str> {
        match self {
            Self::GmId(_) => None,
            Self::Headers(r) => Some(&r.metadata),
            Self::Teaser(r) => Some(&r.metadata),
            Self::Full(r) => Some(&r.metadata),
        }
    }

    /// Returns the Gmail id for an id-only record.
    #[must_use]
    pub const fn gm_id(&self) -> Option<GmId> {
        match self {
            Self::GmId(id) => Some(*id),
            _ => None,
        }
    }
}

/// Header-mode record: metadata plus the raw header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRecord {
    /// Raw metadata block.
    pub metadata: String,
    /// Raw message headers.
    pub headers: String,
}

/// Teaser-mode record: metadata, headers, and the first body part only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeaserRecord {
    /// Raw metadata block.
    pub metadata: String,
    /// Raw message headers.
    pub headers: String,
    /// First body part; empty when the server reported no body.
    pub body: String,
}

/// Full-mode record: metadata plus the complete message text.
///
/// The full message text carries its headers inline, so `headers` and
/// `body` refer to the same raw segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullRecord {
    /// Raw metadata block.
    pub metadata: String,
    /// Raw message headers (the combined text).
    pub headers: String,
    /// Complete body (the combined text).
    pub body: String,
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
    fn metadata_accessor() {
        let record = MessageRecord::Headers(HeaderRecord {
            metadata: "12 (UID 34".to_string(),
            headers: "Subject: hi\r\n".to_string(),
        });
        assert_eq!(record.metadata(), Some("12 (UID 34"));
        assert!(record.gm_id().is_none());
    }

    #[test]
    fn gm_id_accessor() {
        let record = MessageRecord::GmId(GmId::new(77));
        assert_eq!(record.gm_id(), Some(GmId::new(77)));
        assert!(record.metadata().is_none());
    }
}
