//! Connection seam: the command surface of the underlying IMAP client.
//!
//! Implementations own the socket, TLS, line framing, command tagging, and
//! authentication; this layer only issues commands and interprets the raw
//! responses. Commands against one transport are strictly serialized —
//! IMAP multiplexes one command at a time per connection, and a mailbox
//! must be selected as shared context before acting on it, so every
//! operation runs as a linear chain through `&mut self`.

use crate::Result;
use crate::parser::RawResponse;

/// Command methods provided by an IMAP connection.
///
/// State errors (not authenticated, connection dropped) surface as `Err`.
/// Commands the server executed but refused come back as `Ok` with a
/// non-OK [`crate::Status`], so each operation can apply its own policy —
/// most convert it to an error via [`RawResponse::into_ok`], but mailbox
/// deletion inspects the raw non-OK response.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Issues SELECT for the given mailbox.
    ///
    /// # Errors
    /// Returns a state error if the connection cannot carry commands.
    async fn select(&mut self, mailbox: &str) -> Result<RawResponse>;

    /// Issues SEARCH with the given criteria, in sequence-number space.
    ///
    /// # Errors
    /// Returns a state error if the connection cannot carry commands.
    async fn search(&mut self, criteria: &str) -> Result<RawResponse>;

    /// Issues UID SEARCH with the given criteria.
    ///
    /// # Errors
    /// Returns a state error if the connection cannot carry commands.
    async fn uid_search(&mut self, criteria: &str) -> Result<RawResponse>;

    /// Issues FETCH for a sequence-number set with the given data items.
    ///
    /// # Errors
    /// Returns a state error if the connection cannot carry commands.
    async fn fetch(&mut self, set: &str, items: &str) -> Result<RawResponse>;

    /// Issues UID FETCH for a UID set with the given data items.
    ///
    /// # Errors
    /// Returns a state error if the connection cannot carry commands.
    async fn uid_fetch(&mut self, set: &str, items: &str) -> Result<RawResponse>;

    /// Issues UID STORE for a UID set, e.g. `FLAGS \Deleted`.
    ///
    /// # Errors
    /// Returns a state error if the connection cannot carry commands.
    async fn uid_store(&mut self, set: &str, item: &str, value: &str) -> Result<RawResponse>;

    /// Issues UID COPY of a UID set into the given mailbox.
    ///
    /// # Errors
    /// Returns a state error if the connection cannot carry commands.
    async fn uid_copy(&mut self, set: &str, mailbox: &str) -> Result<RawResponse>;

    /// Issues EXPUNGE for the selected mailbox.
    ///
    /// # Errors
    /// Returns a state error if the connection cannot carry commands.
    async fn expunge(&mut self) -> Result<RawResponse>;

    /// Issues the server-level DELETE of a mailbox (a Gmail label).
    ///
    /// # Errors
    /// Returns a state error if the connection cannot carry commands.
    async fn delete_mailbox(&mut self, mailbox: &str) -> Result<RawResponse>;
}
