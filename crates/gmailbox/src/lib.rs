//! Gmail-specialized mailbox layer over IMAP.
//!
//! Gmail's IMAP bridge is IMAP in the details and Gmail in the semantics:
//! mailboxes are labels, searches fall through to Google's search engine
//! via `X-GM-RAW`, messages carry an account-wide persistent `X-GM-MSGID`,
//! and deletion is an eventually-consistent move into the trash label.
//! This crate models those semantics directly instead of leaving each
//! caller to rediscover them.
//!
//! The connection itself — socket, TLS, authentication, command tagging —
//! lives behind the [`Transport`] trait. This layer owns everything above
//! it: the select-before-act pipeline with its selection memo, the fetch
//! query templates, the marker-driven FETCH response decoder, pagination,
//! and the retrying delete protocol.
//!
//! # Quick start
//!
//! ```ignore
//! use gmailbox::{FetchMode, Limit, ListOptions, Mailbox, Session};
//!
//! let mut session = Session::new(transport);
//! let inbox = Mailbox::from_list_line("(\\HasNoChildren) \"/\" INBOX")?;
//!
//! let unread = inbox
//!     .search(
//!         &mut session,
//!         "is:unread",
//!         ListOptions::new().limit(Limit::Max(25)).mode(FetchMode::Teaser),
//!     )
//!     .await?;
//!
//! for record in unread {
//!     println!("{record:?}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod command;
mod error;
mod mailbox;
mod page;
mod parser;
mod session;
pub mod transport;
mod types;

pub use command::{FetchMode, SearchCriteria, UID_ITEMS};
pub use error::{Error, Result};
pub use mailbox::{ListOptions, Mailbox};
pub use page::{Limit, page};
pub use parser::{RawPart, RawResponse, Status, decode};
pub use session::{DEFAULT_DELETE_ATTEMPTS, DEFAULT_DELETE_DELAY, RetryPolicy, Session};
pub use transport::Transport;
pub use types::{FullRecord, GmId, HeaderRecord, MessageRecord, SeqNum, TeaserRecord, Uid};
