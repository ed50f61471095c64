//! Account-level session state.
//!
//! A [`Session`] owns the single shared connection plus the "currently
//! selected mailbox" memo. The memo is explicit session state passed by
//! reference into each mailbox operation — at most one mailbox is active
//! on a connection at a time, and every command except SELECT assumes the
//! target mailbox is active. Serializing operations through `&mut Session`
//! encodes that there is no concurrent mutation target, so no locks are
//! needed.

use std::time::Duration;

use crate::transport::Transport;

/// Default retry budget for the delete-message protocol.
pub const DEFAULT_DELETE_ATTEMPTS: u32 = 5;

/// Default wait between delete-message retries.
pub const DEFAULT_DELETE_DELAY: Duration = Duration::from_secs(2);

/// Retry policy for the eventually-consistent delete protocol.
///
/// Gmail indexes a copied message into the trash label asynchronously, so
/// the delete protocol polls with a fixed delay and a fixed attempt
/// ceiling, bounding both latency and resource use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of trash searches before giving up.
    pub attempts: u32,
    /// Wait between consecutive searches.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_DELETE_ATTEMPTS,
            delay: DEFAULT_DELETE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Creates the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the attempt ceiling.
    #[must_use]
    pub const fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Sets the wait between attempts.
    #[must_use]
    pub const fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// The shared connection and selection memo for one account.
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    /// Name of the mailbox the connection currently has selected.
    selected: Option<String>,
    retry: RetryPolicy,
}

impl<T: Transport> Session<T> {
    /// Creates a session over the given connection.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            selected: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Replaces the delete retry policy.
    #[must_use]
    pub const fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the name of the currently selected mailbox, if any.
    #[must_use]
    pub fn selected_mailbox(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Consumes the session, returning the underlying connection.
    pub fn into_transport(self) -> T {
        self.transport
    }

    pub(crate) fn transport(&mut self) -> &mut T {
        &mut self.transport
    }

    pub(crate) fn set_selected(&mut self, mailbox: &str) {
        self.selected = Some(mailbox.to_string());
    }

    pub(crate) const fn retry(&self) -> RetryPolicy {
        self.retry
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
    fn retry_policy_defaults_match_protocol_constants() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 5);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[test]
    fn retry_policy_builder() {
        let policy = RetryPolicy::new()
            .attempts(3)
            .delay(Duration::from_millis(100));
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.delay, Duration::from_millis(100));
    }
}
