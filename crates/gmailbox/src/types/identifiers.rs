//! Message identifiers.
//!
//! Types for sequence numbers, UIDs, and Gmail's persistent message id.

use std::num::NonZeroU32;

/// Message sequence number.
///
/// Sequence numbers are assigned to messages in a mailbox starting from 1.
/// They are ephemeral and change when messages are expunged; SEARCH results
/// are reported in this space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeqNum(pub NonZeroU32);

impl SeqNum {
    /// Creates a new sequence number.
    ///
    /// Returns `None` if the value is 0.
    #[must_use]
    pub fn new(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(Self)
    }

    /// Parses a sequence number from a decimal token.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok().and_then(Self::new)
    }

    /// Returns the underlying value.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl std::fmt::Display for SeqNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a message within a mailbox.
///
/// UIDs survive expunges but are mailbox-scoped: copying a message into
/// another mailbox assigns it a fresh UID there. Use [`GmId`] for an
/// identifier that is stable across copies and moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uid(pub NonZeroU32);

impl Uid {
    /// Creates a new UID.
    ///
    /// Returns `None` if the value is 0.
    #[must_use]
    pub fn new(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(Self)
    }

    /// Parses a UID from a decimal token.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok().and_then(Self::new)
    }

    /// Returns the underlying value.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gmail's persistent message identifier (`X-GM-MSGID`).
///
/// Unlike a [`Uid`], this value is global to the account and stable across
/// copies and moves between labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GmId(pub u64);

impl GmId {
    /// Creates a new Gmail message id.
    #[must_use]
    pub const fn new(n: u64) -> Self {
        Self(n)
    }

    /// Parses a Gmail message id from a decimal token.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok().map(Self)
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GmId {
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

    mod seq_num_tests {
        use super::*;

        #[test]
        fn new_valid() {
            let seq = SeqNum::new(1);
            assert!(seq.is_some());
            assert_eq!(seq.unwrap().get(), 1);
        }

        #[test]
        fn new_zero_returns_none() {
            assert!(SeqNum::new(0).is_none());
        }

        #[test]
        fn parse_token() {
            assert_eq!(SeqNum::parse("42").unwrap().get(), 42);
            assert!(SeqNum::parse("0").is_none());
            assert!(SeqNum::parse("x42").is_none());
        }

        #[test]
        fn display() {
            let seq = SeqNum::new(42).unwrap();
            assert_eq!(format!("{seq}"), "42");
        }
    }

    mod uid_tests {
        use super::*;

        #[test]
        fn new_valid() {
            let uid = Uid::new(100);
            assert!(uid.is_some());
            assert_eq!(uid.unwrap().get(), 100);
        }

        #[test]
        fn new_zero_returns_none() {
            assert!(Uid::new(0).is_none());
        }

        #[test]
        fn parse_rejects_garbage() {
            assert!(Uid::parse("").is_none());
            assert!(Uid::parse("12)").is_none());
            assert_eq!(Uid::parse("12").unwrap().get(), 12);
        }

        #[test]
        fn ordering() {
            let uid1 = Uid::new(100).unwrap();
            let uid2 = Uid::new(200).unwrap();
            assert!(uid1 < uid2);
        }
    }

    mod gm_id_tests {
        use super::*;

        #[test]
        fn round_trip() {
            let id = GmId::new(1278455344230334865);
            assert_eq!(id.get(), 1278455344230334865);
            assert_eq!(format!("{id}"), "1278455344230334865");
        }

        #[test]
        fn parse_token() {
            assert_eq!(
                GmId::parse("1278455344230334865").unwrap().get(),
                1278455344230334865
            );
            assert!(GmId::parse("not-a-number").is_none());
        }
    }
}
