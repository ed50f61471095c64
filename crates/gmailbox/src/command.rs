//! Fetch data-item templates and Gmail search criteria.
//!
//! Each fetch mode maps to a fixed IMAP data-item set. The metadata
//! attributes (`INTERNALDATE X-GM-MSGID X-GM-LABELS UID FLAGS`) are common
//! to every content-carrying mode; only the body items vary.

use crate::types::GmId;

/// Data items for the uid-only fetch path, parsed positionally rather than
/// through the record decoder.
pub const UID_ITEMS: &str = "(X-GM-MSGID UID)";

/// Granularity of a message fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Only the persistent Gmail id.
    GmId,
    /// Metadata and the raw header block.
    #[default]
    Headers,
    /// Metadata, headers, and the first body part.
    Teaser,
    /// Metadata and the complete message text.
    Full,
}

impl FetchMode {
    /// Returns the IMAP data-item set to request for this mode.
    #[must_use]
    pub const fn items(self) -> &'static str {
        match self {
            Self::GmId => "(X-GM-MSGID)",
            Self::Headers => {
                "(INTERNALDATE X-GM-MSGID X-GM-LABELS UID FLAGS BODY.PEEK[HEADER])"
            }
            Self::Teaser => {
                "(INTERNALDATE X-GM-MSGID X-GM-LABELS UID FLAGS BODYSTRUCTURE \
                 BODY.PEEK[HEADER] BODY.PEEK[1])"
            }
            Self::Full => "(INTERNALDATE X-GM-MSGID X-GM-LABELS UID FLAGS BODY.PEEK[])",
        }
    }
}

/// A SEARCH criterion string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria(String);

impl SearchCriteria {
    /// Matches every message in the mailbox.
    #[must_use]
    pub fn all() -> Self {
        Self("ALL".to_string())
    }

    /// Server-side Gmail search over the `X-GM-RAW` extension.
    ///
    /// The term falls through to Google's own search rather than a literal
    /// string match against message text.
    #[must_use]
    pub fn gmail_raw(term: &str) -> Self {
        Self(format!("X-GM-RAW \"{term}\""))
    }

    /// Looks up a message by its persistent Gmail id.
    #[must_use]
    pub fn gmail_id(id: GmId) -> Self {
        Self(format!("X-GM-MSGID {id}"))
    }

    /// Looks up a message by its globally-unique `Message-ID` header.
    ///
    /// Used by the delete protocol, where a UID is useless across the
    /// source/trash mailbox boundary.
    #[must_use]
    pub fn header_message_id(message_id: &str) -> Self {
        Self(format!("X-GM-RAW \"rfc822msgid:{message_id}\""))
    }

    /// Returns the criterion as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchCriteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
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
    fn gm_id_items() {
        assert_eq!(FetchMode::GmId.items(), "(X-GM-MSGID)");
    }

    #[test]
    fn uid_items() {
        assert_eq!(UID_ITEMS, "(X-GM-MSGID UID)");
    }

    #[test]
    fn header_items() {
        assert_eq!(
            FetchMode::Headers.items(),
            "(INTERNALDATE X-GM-MSGID X-GM-LABELS UID FLAGS BODY.PEEK[HEADER])"
        );
    }

    #[test]
    fn teaser_items() {
        assert_eq!(
            FetchMode::Teaser.items(),
            "(INTERNALDATE X-GM-MSGID X-GM-LABELS UID FLAGS BODYSTRUCTURE \
             BODY.PEEK[HEADER] BODY.PEEK[1])"
        );
    }

    #[test]
    fn full_items() {
        assert_eq!(
            FetchMode::Full.items(),
            "(INTERNALDATE X-GM-MSGID X-GM-LABELS UID FLAGS BODY.PEEK[])"
        );
    }

    #[test]
    fn criteria_all() {
        assert_eq!(SearchCriteria::all().as_str(), "ALL");
    }

    #[test]
    fn criteria_gmail_raw_is_quoted() {
        assert_eq!(
            SearchCriteria::gmail_raw("from:alice has:attachment").as_str(),
            "X-GM-RAW \"from:alice has:attachment\""
        );
    }

    #[test]
    fn criteria_gmail_id() {
        assert_eq!(
            SearchCriteria::gmail_id(GmId::new(1278455344230334865)).as_str(),
            "X-GM-MSGID 1278455344230334865"
        );
    }

    #[test]
    fn criteria_header_message_id() {
        assert_eq!(
            SearchCriteria::header_message_id("abc@mail.example.com").as_str(),
            "X-GM-RAW \"rfc822msgid:abc@mail.example.com\""
        );
    }
}
