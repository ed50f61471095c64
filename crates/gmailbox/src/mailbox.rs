//! Mailbox operations: the command pipeline and the delete retry protocol.
//!
//! A [`Mailbox`] names one Gmail label. Every operation follows the same
//! shape: make sure this mailbox is the connection's active context
//! (SELECT, memoized in the [`Session`]), issue one or more commands,
//! validate the protocol status, decode, return. Operations are written as
//! linear awaited steps guarded by `?` rather than nested continuations.

use crate::command::{FetchMode, SearchCriteria, UID_ITEMS};
use crate::page::{Limit, page};
use crate::parser::{RawPart, decode};
use crate::session::Session;
use crate::transport::Transport;
use crate::types::{GmId, MessageRecord, SeqNum, Uid};
use crate::{Error, Result};

/// Options for listing and searching messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Maximum number of messages to return.
    pub limit: Limit,
    /// Index of the first message to return.
    pub offset: usize,
    /// Granularity of the records fetched for each match.
    pub mode: FetchMode,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: Limit::Max(100),
            offset: 0,
            mode: FetchMode::Headers,
        }
    }
}

impl ListOptions {
    /// Creates the default options (first 100 matches, header records).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page limit.
    #[must_use]
    pub const fn limit(mut self, limit: Limit) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the page offset.
    #[must_use]
    pub const fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the fetch mode.
    #[must_use]
    pub const fn mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }
}

/// One mailbox (Gmail label) within an account.
///
/// Built from a LIST response line; the server-canonical `full_name` is
/// kept alongside the human-readable `name` actually passed to SELECT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    full_name: String,
    name: String,
    attributes: Vec<String>,
    delimiter: String,
}

impl Mailbox {
    /// Parses a mailbox from a LIST response line of the form
    /// `(\Attributes) "/" "Name"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the line does not follow the
    /// three-group shape.
    pub fn from_list_line(full_name: &str) -> Result<Self> {
        let bad = || Error::Parse(format!("malformed LIST line: {full_name}"));

        let rest = full_name.strip_prefix('(').ok_or_else(bad)?;
        let close = rest.find(')').ok_or_else(bad)?;
        let attributes = rest[..close]
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let rest = rest[close + 1..].trim_start();
        let rest = rest.strip_prefix('"').ok_or_else(bad)?;
        let quote = rest.find('"').ok_or_else(bad)?;
        let delimiter = rest[..quote].to_string();

        let name = rest[quote + 1..].trim_start();
        if name.is_empty() {
            return Err(bad());
        }
        // Quoted names keep their quotes in full_name; strip them for the
        // human-readable form.
        let name = name
            .strip_prefix('"')
            .and_then(|n| n.strip_suffix('"'))
            .unwrap_or(name)
            .to_string();

        Ok(Self {
            full_name: full_name.to_string(),
            name,
            attributes,
            delimiter,
        })
    }

    /// The server-canonical, IMAP-quoted LIST line this mailbox came from.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The human-readable mailbox name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// LIST attributes, as raw `\Flag` strings.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// The hierarchy delimiter from the LIST line.
    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Counts the messages in this mailbox.
    ///
    /// Always issues SELECT (the count is a by-product of selection) and
    /// records this mailbox as the session's active one.
    ///
    /// # Errors
    ///
    /// Returns a state or response error from the connection, or
    /// [`Error::Parse`] if the SELECT response carries no count.
    pub async fn count<T: Transport>(&self, session: &mut Session<T>) -> Result<u32> {
        let response = session.transport().select(&self.name).await?;
        let parts = response.into_ok()?;
        let line = parts
            .iter()
            .find_map(RawPart::as_line)
            .ok_or_else(|| Error::Parse("SELECT response carried no data line".to_string()))?;
        let digits: String = line.chars().filter(char::is_ascii_digit).collect();
        let count = digits
            .parse()
            .map_err(|_| Error::Parse(format!("no message count in SELECT data: {line}")))?;
        session.set_selected(&self.name);
        Ok(count)
    }

    /// Makes this mailbox the connection's active context.
    ///
    /// The session remembers which mailbox was last selected, so repeated
    /// operations against the same mailbox issue no redundant SELECTs.
    /// Returns whether a SELECT was actually issued.
    ///
    /// # Errors
    ///
    /// Returns a state or response error from the connection.
    pub async fn select<T: Transport>(&self, session: &mut Session<T>) -> Result<bool> {
        if session.selected_mailbox() == Some(self.name.as_str()) {
            tracing::debug!(mailbox = %self.name, "mailbox already selected");
            return Ok(false);
        }
        self.count(session).await?;
        Ok(true)
    }

    /// Searches this mailbox with a server-side Gmail query.
    ///
    /// The term falls through to Google's search rather than matching
    /// message text literally. Matches are paged, then resolved to records
    /// at the requested granularity.
    ///
    /// # Errors
    ///
    /// Returns a state or response error from the connection.
    pub async fn search<T: Transport>(
        &self,
        session: &mut Session<T>,
        term: &str,
        options: ListOptions,
    ) -> Result<Vec<MessageRecord>> {
        let seqs = self
            .seqs_matching(session, &SearchCriteria::gmail_raw(term), options)
            .await?;
        self.records_by_seq(session, &seqs, options.mode).await
    }

    /// Lists messages in this mailbox, paged.
    ///
    /// # Errors
    ///
    /// Returns a state or response error from the connection.
    pub async fn messages<T: Transport>(
        &self,
        session: &mut Session<T>,
        options: ListOptions,
    ) -> Result<Vec<MessageRecord>> {
        let seqs = self
            .seqs_matching(session, &SearchCriteria::all(), options)
            .await?;
        self.records_by_seq(session, &seqs, options.mode).await
    }

    /// Like [`Mailbox::search`], but resolves matches to UIDs only.
    ///
    /// # Errors
    ///
    /// Returns a state or response error from the connection, or
    /// [`Error::Parse`] if a UID line is malformed.
    pub async fn search_uids<T: Transport>(
        &self,
        session: &mut Session<T>,
        term: &str,
        options: ListOptions,
    ) -> Result<Vec<Uid>> {
        let seqs = self
            .seqs_matching(session, &SearchCriteria::gmail_raw(term), options)
            .await?;
        self.uids_by_seq(session, &seqs).await
    }

    /// Like [`Mailbox::messages`], but resolves matches to UIDs only.
    ///
    /// # Errors
    ///
    /// Returns a state or response error from the connection, or
    /// [`Error::Parse`] if a UID line is malformed.
    pub async fn message_uids<T: Transport>(
        &self,
        session: &mut Session<T>,
        options: ListOptions,
    ) -> Result<Vec<Uid>> {
        let seqs = self
            .seqs_matching(session, &SearchCriteria::all(), options)
            .await?;
        self.uids_by_seq(session, &seqs).await
    }

    /// Fetches records for messages named by sequence number.
    ///
    /// An empty input short-circuits to an empty result with no network
    /// round trip.
    ///
    /// # Errors
    ///
    /// Returns a state or response error from the connection.
    pub async fn records_by_seq<T: Transport>(
        &self,
        session: &mut Session<T>,
        seqs: &[SeqNum],
        mode: FetchMode,
    ) -> Result<Vec<MessageRecord>> {
        if seqs.is_empty() {
            return Ok(Vec::new());
        }
        self.select(session).await?;
        let response = session
            .transport()
            .fetch(&join_set(seqs), mode.items())
            .await?;
        Ok(decode(&response.into_ok()?, mode))
    }

    /// Resolves sequence numbers to UIDs.
    ///
    /// This is a deliberately narrow parse path: the response lines have a
    /// fixed shape and the UID is extracted positionally rather than going
    /// through the record decoder.
    ///
    /// # Errors
    ///
    /// Returns a state or response error from the connection, or
    /// [`Error::Parse`] if a line does not follow the fixed shape.
    pub async fn uids_by_seq<T: Transport>(
        &self,
        session: &mut Session<T>,
        seqs: &[SeqNum],
    ) -> Result<Vec<Uid>> {
        if seqs.is_empty() {
            return Ok(Vec::new());
        }
        self.select(session).await?;
        let response = session.transport().fetch(&join_set(seqs), UID_ITEMS).await?;
        response
            .into_ok()?
            .iter()
            .filter_map(RawPart::as_line)
            .map(parse_uid_line)
            .collect()
    }

    /// Fetches a single message by UID.
    ///
    /// Returns `None` when no message in this mailbox has that UID.
    ///
    /// # Errors
    ///
    /// Returns a state or response error from the connection.
    pub async fn fetch<T: Transport>(
        &self,
        session: &mut Session<T>,
        uid: Uid,
        mode: FetchMode,
    ) -> Result<Option<MessageRecord>> {
        let mut records = self.fetch_all(session, &[uid], mode).await?;
        if records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(records.swap_remove(0)))
        }
    }

    /// Fetches messages by UID.
    ///
    /// UIDs with no matching message are silently absent from the result.
    ///
    /// # Errors
    ///
    /// Returns a state or response error from the connection.
    pub async fn fetch_all<T: Transport>(
        &self,
        session: &mut Session<T>,
        uids: &[Uid],
        mode: FetchMode,
    ) -> Result<Vec<MessageRecord>> {
        if uids.is_empty() {
            return Ok(Vec::new());
        }
        self.select(session).await?;
        let response = session
            .transport()
            .uid_fetch(&join_set(uids), mode.items())
            .await?;
        Ok(decode(&response.into_ok()?, mode))
    }

    /// Fetches a single message by its persistent Gmail id.
    ///
    /// The id is first resolved to a UID with UID SEARCH; returns `None`
    /// when the search yields nothing.
    ///
    /// # Errors
    ///
    /// Returns a state or response error from the connection.
    pub async fn fetch_gm_id<T: Transport>(
        &self,
        session: &mut Session<T>,
        gm_id: GmId,
        mode: FetchMode,
    ) -> Result<Option<MessageRecord>> {
        self.select(session).await?;
        let response = session
            .transport()
            .uid_search(SearchCriteria::gmail_id(gm_id).as_str())
            .await?;
        let parts = response.into_ok()?;
        let Some(uid) = parts
            .iter()
            .find_map(RawPart::as_line)
            .and_then(first_uid_token)
        else {
            return Ok(None);
        };
        self.fetch(session, uid, mode).await
    }

    /// Deletes one message: copy to trash, poll until the server has
    /// indexed the copy, mark it deleted, expunge, and restore the prior
    /// selection.
    ///
    /// Gmail may take several seconds to show a copied message in the
    /// trash label, so the search is retried on a fixed delay up to the
    /// session's [`crate::RetryPolicy`] ceiling. The lookup uses the
    /// `Message-ID` header, not the UID — UIDs are mailbox-scoped and
    /// reassigned on copy.
    ///
    /// Returns `false` when the copy never appeared within the retry
    /// budget; that is an expected outcome of indexing lag, not an error.
    ///
    /// # Errors
    ///
    /// Returns a state or response error from the connection; any
    /// protocol-level failure at any step aborts immediately.
    pub async fn delete_message<T: Transport>(
        &self,
        session: &mut Session<T>,
        uid: Uid,
        message_id: &str,
        trash_folder: &str,
    ) -> Result<bool> {
        self.select(session).await?;

        session
            .transport()
            .uid_copy(&uid.to_string(), trash_folder)
            .await?
            .into_ok()?;

        session.transport().select(trash_folder).await?.into_ok()?;
        session.set_selected(trash_folder);

        let criteria = SearchCriteria::header_message_id(message_id);
        let policy = session.retry();

        for attempt in 1..=policy.attempts {
            let parts = session
                .transport()
                .uid_search(criteria.as_str())
                .await?
                .into_ok()?;
            let found = parts
                .iter()
                .find_map(RawPart::as_line)
                .and_then(last_uid_token);

            match found {
                Some(trash_uid) => {
                    session
                        .transport()
                        .uid_store(&trash_uid.to_string(), "FLAGS", "\\Deleted")
                        .await?
                        .into_ok()?;
                    session.transport().expunge().await?.into_ok()?;
                    session.transport().select(&self.name).await?.into_ok()?;
                    session.set_selected(&self.name);
                    return Ok(true);
                }
                None if attempt == policy.attempts => {
                    tracing::warn!(
                        attempt,
                        message_id,
                        "giving up waiting for copied message to appear in trash"
                    );
                    return Ok(false);
                }
                None => {
                    tracing::warn!(
                        attempt,
                        message_id,
                        "copied message not yet indexed in trash, retrying"
                    );
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }

        Ok(false)
    }

    /// Removes this mailbox (label) from the account.
    ///
    /// Success is judged by the literal `Success` status datum, not by
    /// protocol-OK alone: deleting a label that does not exist comes back
    /// as a well-formed non-OK response and reports `false` rather than
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns a state error if the connection cannot carry commands.
    pub async fn delete<T: Transport>(&self, session: &mut Session<T>) -> Result<bool> {
        let response = session.transport().delete_mailbox(&self.name).await?;
        Ok(response.first_line() == Some("Success"))
    }

    /// SELECT-if-needed, SEARCH, split the id list, page it.
    async fn seqs_matching<T: Transport>(
        &self,
        session: &mut Session<T>,
        criteria: &SearchCriteria,
        options: ListOptions,
    ) -> Result<Vec<SeqNum>> {
        self.select(session).await?;
        let response = session.transport().search(criteria.as_str()).await?;
        let parts = response.into_ok()?;
        let seqs = parts
            .first()
            .and_then(RawPart::as_line)
            .map(split_seq_list)
            .unwrap_or_default();
        Ok(page(&seqs, options.limit, options.offset).to_vec())
    }
}

impl std::fmt::Display for Mailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Splits the space-delimited id list of a SEARCH data line.
fn split_seq_list(line: &str) -> Vec<SeqNum> {
    line.split_whitespace().filter_map(SeqNum::parse).collect()
}

/// Joins identifiers into an IMAP set string (`"1,2,3"`).
fn join_set<D: std::fmt::Display>(items: &[D]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Extracts the UID from a fixed-shape `n (X-GM-MSGID id UID uid)` line.
fn parse_uid_line(line: &str) -> Result<Uid> {
    let token = line
        .split_whitespace()
        .nth(4)
        .ok_or_else(|| Error::Parse(format!("short UID fetch line: {line}")))?;
    Uid::parse(token.trim_end_matches(')'))
        .ok_or_else(|| Error::Parse(format!("bad UID token in line: {line}")))
}

/// First token of a UID SEARCH data line.
fn first_uid_token(line: &str) -> Option<Uid> {
    line.split_whitespace().next().and_then(Uid::parse)
}

/// Last token of a UID SEARCH data line.
fn last_uid_token(line: &str) -> Option<Uid> {
    line.split_whitespace().next_back().and_then(Uid::parse)
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

    mod list_line_tests {
        use super::*;

        #[test]
        fn plain_name() {
            let mb = Mailbox::from_list_line("(\\HasNoChildren) \"/\" INBOX").unwrap();
            assert_eq!(mb.name(), "INBOX");
            assert_eq!(mb.delimiter(), "/");
            assert_eq!(mb.attributes(), ["\\HasNoChildren"]);
        }

        #[test]
        fn quoted_name_is_unquoted() {
            let mb =
                Mailbox::from_list_line("(\\HasNoChildren \\Trash) \"/\" \"[Gmail]/Trash\"")
                    .unwrap();
            assert_eq!(mb.name(), "[Gmail]/Trash");
            assert_eq!(mb.attributes().len(), 2);
            assert_eq!(
                mb.full_name(),
                "(\\HasNoChildren \\Trash) \"/\" \"[Gmail]/Trash\""
            );
        }

        #[test]
        fn empty_attribute_list() {
            let mb = Mailbox::from_list_line("() \"/\" Receipts").unwrap();
            assert!(mb.attributes().is_empty());
            assert_eq!(mb.name(), "Receipts");
        }

        #[test]
        fn display_is_the_short_name() {
            let mb = Mailbox::from_list_line("() \"/\" \"Work/Projects\"").unwrap();
            assert_eq!(format!("{mb}"), "Work/Projects");
        }

        #[test]
        fn malformed_lines_are_rejected() {
            assert!(matches!(
                Mailbox::from_list_line("INBOX"),
                Err(Error::Parse(_))
            ));
            assert!(Mailbox::from_list_line("(\\X) INBOX").is_err());
            assert!(Mailbox::from_list_line("(\\X) \"/\"").is_err());
        }
    }

    mod token_tests {
        use super::*;

        #[test]
        fn split_seq_list_basic() {
            let seqs = split_seq_list("1 2 30");
            assert_eq!(seqs.len(), 3);
            assert_eq!(seqs[2].get(), 30);
        }

        #[test]
        fn split_seq_list_empty_line() {
            assert!(split_seq_list("").is_empty());
        }

        #[test]
        fn join_set_basic() {
            let uids: Vec<Uid> = [4, 8, 15].iter().filter_map(|&n| Uid::new(n)).collect();
            assert_eq!(join_set(&uids), "4,8,15");
        }

        #[test]
        fn parse_uid_line_fixed_shape() {
            let uid = parse_uid_line("3 (X-GM-MSGID 1278455344230334865 UID 42)").unwrap();
            assert_eq!(uid.get(), 42);
        }

        #[test]
        fn parse_uid_line_short_line_is_error() {
            assert!(matches!(
                parse_uid_line("3 (X-GM-MSGID 99)"),
                Err(Error::Parse(_))
            ));
        }

        #[test]
        fn last_uid_token_takes_final_match() {
            assert_eq!(last_uid_token("12 15 99").unwrap().get(), 99);
            assert!(last_uid_token("").is_none());
        }

        #[test]
        fn first_uid_token_takes_first_match() {
            assert_eq!(first_uid_token("12 15 99").unwrap().get(), 12);
        }
    }
}
