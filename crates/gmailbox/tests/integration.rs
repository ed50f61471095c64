//! Integration tests for the mailbox command pipeline.
//!
//! These tests use a mock transport that replays scripted responses and
//! records every command issued, so each test can assert both the result
//! and the exact command sequence that produced it.

#![allow(clippy::unwrap_used, clippy::unreadable_literal)]

use std::collections::VecDeque;

use gmailbox::{
    Error, FetchMode, GmId, Limit, ListOptions, Mailbox, MessageRecord, RawPart, RawResponse,
    Result, RetryPolicy, Session, Transport, Uid,
};

const HEADER_ITEMS: &str = "(INTERNALDATE X-GM-MSGID X-GM-LABELS UID FLAGS BODY.PEEK[HEADER])";

/// Mock transport that replays scripted responses in order.
struct MockTransport {
    /// Responses to return (in order).
    responses: VecDeque<Result<RawResponse>>,
    /// Rendered commands, in the order they were issued.
    sent: Vec<String>,
}

impl MockTransport {
    fn new(responses: Vec<Result<RawResponse>>) -> Self {
        Self {
            responses: responses.into(),
            sent: Vec::new(),
        }
    }

    fn reply(&mut self, command: String) -> Result<RawResponse> {
        let response = self
            .responses
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted response for: {command}"));
        self.sent.push(command);
        response
    }
}

impl Transport for MockTransport {
    async fn select(&mut self, mailbox: &str) -> Result<RawResponse> {
        self.reply(format!("SELECT {mailbox}"))
    }

    async fn search(&mut self, criteria: &str) -> Result<RawResponse> {
        self.reply(format!("SEARCH {criteria}"))
    }

    async fn uid_search(&mut self, criteria: &str) -> Result<RawResponse> {
        self.reply(format!("UID SEARCH {criteria}"))
    }

    async fn fetch(&mut self, set: &str, items: &str) -> Result<RawResponse> {
        self.reply(format!("FETCH {set} {items}"))
    }

    async fn uid_fetch(&mut self, set: &str, items: &str) -> Result<RawResponse> {
        self.reply(format!("UID FETCH {set} {items}"))
    }

    async fn uid_store(&mut self, set: &str, item: &str, value: &str) -> Result<RawResponse> {
        self.reply(format!("UID STORE {set} {item} {value}"))
    }

    async fn uid_copy(&mut self, set: &str, mailbox: &str) -> Result<RawResponse> {
        self.reply(format!("UID COPY {set} {mailbox}"))
    }

    async fn expunge(&mut self) -> Result<RawResponse> {
        self.reply("EXPUNGE".to_string())
    }

    async fn delete_mailbox(&mut self, mailbox: &str) -> Result<RawResponse> {
        self.reply(format!("DELETE {mailbox}"))
    }
}

fn inbox() -> Mailbox {
    Mailbox::from_list_line("(\\HasNoChildren) \"/\" INBOX").unwrap()
}

fn select_ok(count: u32) -> Result<RawResponse> {
    Ok(RawResponse::ok(vec![RawPart::line(count.to_string())]))
}

fn ok_empty() -> Result<RawResponse> {
    Ok(RawResponse::ok(Vec::new()))
}

fn search_ok(ids: &str) -> Result<RawResponse> {
    Ok(RawResponse::ok(vec![RawPart::line(ids)]))
}

fn header_chunk(gm_id: u64, headers: &str) -> RawPart {
    RawPart::chunk([
        format!("1 (X-GM-MSGID {gm_id} UID 9 FLAGS () BODY[HEADER] {{64}}"),
        headers.to_string(),
    ])
}

#[tokio::test]
async fn count_parses_the_select_data_line() {
    let mut session = Session::new(MockTransport::new(vec![select_ok(42)]));

    let count = inbox().count(&mut session).await.unwrap();

    assert_eq!(count, 42);
    assert_eq!(session.selected_mailbox(), Some("INBOX"));
    assert_eq!(session.into_transport().sent, ["SELECT INBOX"]);
}

#[tokio::test]
async fn select_is_memoized_per_mailbox() {
    let mut session = Session::new(MockTransport::new(vec![
        select_ok(3),
        select_ok(1),
        select_ok(3),
    ]));
    let inbox = inbox();
    let receipts = Mailbox::from_list_line("() \"/\" Receipts").unwrap();

    assert!(inbox.select(&mut session).await.unwrap());
    assert!(!inbox.select(&mut session).await.unwrap());
    assert!(receipts.select(&mut session).await.unwrap());
    assert!(inbox.select(&mut session).await.unwrap());

    assert_eq!(
        session.into_transport().sent,
        ["SELECT INBOX", "SELECT Receipts", "SELECT INBOX"]
    );
}

#[tokio::test]
async fn search_pages_matches_then_fetches_records() {
    let headers = "Subject: hello\r\n\r\n";
    let mut session = Session::new(MockTransport::new(vec![
        select_ok(5),
        search_ok("1 2 3 4 5"),
        Ok(RawResponse::ok(vec![
            header_chunk(1278455344230334865, headers),
            RawPart::line(")"),
            header_chunk(1278455344230334866, headers),
            RawPart::line(")"),
        ])),
    ]));

    let options = ListOptions::new()
        .limit(Limit::Max(2))
        .offset(1)
        .mode(FetchMode::Headers);
    let records = inbox()
        .search(&mut session, "is:unread", options)
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert!(matches!(records[0], MessageRecord::Headers(_)));
    assert_eq!(
        session.into_transport().sent,
        [
            "SELECT INBOX".to_string(),
            "SEARCH X-GM-RAW \"is:unread\"".to_string(),
            format!("FETCH 2,3 {HEADER_ITEMS}"),
        ]
    );
}

#[tokio::test]
async fn empty_search_result_skips_the_fetch() {
    let mut session = Session::new(MockTransport::new(vec![select_ok(0), search_ok("")]));

    let records = inbox()
        .messages(&mut session, ListOptions::new())
        .await
        .unwrap();

    assert!(records.is_empty());
    assert_eq!(session.into_transport().sent.len(), 2);
}

#[tokio::test]
async fn message_uids_resolves_seqs_positionally() {
    let mut session = Session::new(MockTransport::new(vec![
        select_ok(2),
        search_ok("1 2"),
        Ok(RawResponse::ok(vec![
            RawPart::line("1 (X-GM-MSGID 1278455344230334865 UID 101)"),
            RawPart::line("2 (X-GM-MSGID 1278455344230334866 UID 102)"),
        ])),
    ]));

    let uids = inbox()
        .message_uids(&mut session, ListOptions::new())
        .await
        .unwrap();

    assert_eq!(uids, [Uid::new(101).unwrap(), Uid::new(102).unwrap()]);
    assert_eq!(
        session.into_transport().sent[2],
        "FETCH 1,2 (X-GM-MSGID UID)"
    );
}

#[tokio::test]
async fn fetch_all_with_no_uids_issues_no_commands() {
    let mut session = Session::new(MockTransport::new(Vec::new()));

    let records = inbox()
        .fetch_all(&mut session, &[], FetchMode::Full)
        .await
        .unwrap();

    assert!(records.is_empty());
    assert!(session.into_transport().sent.is_empty());
}

#[tokio::test]
async fn fetch_gm_id_resolves_through_uid_search() {
    let mut session = Session::new(MockTransport::new(vec![
        select_ok(1),
        search_ok("77"),
        Ok(RawResponse::ok(vec![
            RawPart::line("1 (X-GM-MSGID 1278455344230334865)"),
        ])),
    ]));

    let record = inbox()
        .fetch_gm_id(&mut session, GmId::new(1278455344230334865), FetchMode::GmId)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(record.gm_id(), Some(GmId::new(1278455344230334865)));
    let sent = session.into_transport().sent;
    assert_eq!(sent[1], "UID SEARCH X-GM-MSGID 1278455344230334865");
    assert_eq!(sent[2], "UID FETCH 77 (X-GM-MSGID)");
}

#[tokio::test]
async fn fetch_gm_id_with_no_match_is_none() {
    let mut session = Session::new(MockTransport::new(vec![select_ok(1), search_ok("")]));

    let record = inbox()
        .fetch_gm_id(&mut session, GmId::new(5), FetchMode::Headers)
        .await
        .unwrap();

    assert!(record.is_none());
}

#[tokio::test(start_paused = true)]
async fn delete_message_retries_until_the_copy_is_indexed() {
    let mut responses = vec![
        select_ok(9),                 // SELECT INBOX
        ok_empty(),                   // UID COPY
        select_ok(1),                 // SELECT trash
    ];
    for _ in 0..4 {
        responses.push(search_ok("")); // not yet indexed
    }
    responses.push(search_ok("12 21")); // indexed on the fifth attempt
    responses.push(ok_empty()); // UID STORE
    responses.push(ok_empty()); // EXPUNGE
    responses.push(select_ok(8)); // reselect INBOX
    let mut session = Session::new(MockTransport::new(responses));

    let start = tokio::time::Instant::now();
    let deleted = inbox()
        .delete_message(
            &mut session,
            Uid::new(4).unwrap(),
            "abc123@mail.example.com",
            "[Gmail]/Trash",
        )
        .await
        .unwrap();

    assert!(deleted);
    // Four waits of two seconds each before the fifth search succeeds.
    assert_eq!(start.elapsed(), std::time::Duration::from_secs(8));
    assert_eq!(session.selected_mailbox(), Some("INBOX"));

    let sent = session.into_transport().sent;
    assert_eq!(sent[0], "SELECT INBOX");
    assert_eq!(sent[1], "UID COPY 4 [Gmail]/Trash");
    assert_eq!(sent[2], "SELECT [Gmail]/Trash");
    for command in &sent[3..8] {
        assert_eq!(
            command,
            "UID SEARCH X-GM-RAW \"rfc822msgid:abc123@mail.example.com\""
        );
    }
    // Last UID of the search data wins.
    assert_eq!(sent[8], "UID STORE 21 FLAGS \\Deleted");
    assert_eq!(sent[9], "EXPUNGE");
    assert_eq!(sent[10], "SELECT INBOX");
    assert_eq!(sent.len(), 11);
}

#[tokio::test(start_paused = true)]
async fn delete_message_gives_up_after_the_retry_budget() {
    let mut responses = vec![select_ok(9), ok_empty(), select_ok(1)];
    for _ in 0..5 {
        responses.push(search_ok(""));
    }
    let mut session = Session::new(MockTransport::new(responses));

    let deleted = inbox()
        .delete_message(
            &mut session,
            Uid::new(4).unwrap(),
            "abc123@mail.example.com",
            "[Gmail]/Trash",
        )
        .await
        .unwrap();

    assert!(!deleted);
    // Selection stays on the trash mailbox when the copy never appears.
    assert_eq!(session.selected_mailbox(), Some("[Gmail]/Trash"));
    let sent = session.into_transport().sent;
    assert_eq!(sent.len(), 8);
    assert!(!sent.iter().any(|c| c.starts_with("UID STORE")));
    assert!(!sent.iter().any(|c| c == "EXPUNGE"));
}

#[tokio::test(start_paused = true)]
async fn delete_message_retry_policy_is_configurable() {
    let mut session = Session::new(MockTransport::new(vec![
        select_ok(9),
        ok_empty(),
        select_ok(1),
        search_ok(""),
        search_ok(""),
    ]))
    .retry_policy(
        RetryPolicy::new()
            .attempts(2)
            .delay(std::time::Duration::from_millis(50)),
    );

    let start = tokio::time::Instant::now();
    let deleted = inbox()
        .delete_message(&mut session, Uid::new(1).unwrap(), "x@y", "[Gmail]/Trash")
        .await
        .unwrap();

    assert!(!deleted);
    assert_eq!(start.elapsed(), std::time::Duration::from_millis(50));
}

#[tokio::test]
async fn delete_mailbox_judges_the_literal_status_string() {
    let mut session = Session::new(MockTransport::new(vec![Ok(RawResponse::ok(vec![
        RawPart::line("Success"),
    ]))]));
    let receipts = Mailbox::from_list_line("() \"/\" Receipts").unwrap();

    assert!(receipts.delete(&mut session).await.unwrap());
    assert_eq!(session.into_transport().sent, ["DELETE Receipts"]);
}

#[tokio::test]
async fn delete_mailbox_reports_refusal_as_false() {
    let mut session = Session::new(MockTransport::new(vec![Ok(RawResponse::no(
        "nonexistent mailbox",
        Vec::new(),
    ))]));
    let receipts = Mailbox::from_list_line("() \"/\" Receipts").unwrap();

    assert!(!receipts.delete(&mut session).await.unwrap());
}

#[tokio::test]
async fn refused_select_surfaces_as_a_typed_error() {
    let mut session = Session::new(MockTransport::new(vec![Ok(RawResponse::no(
        "mailbox unavailable",
        Vec::new(),
    ))]));

    match inbox().count(&mut session).await {
        Err(Error::No(info)) => assert_eq!(info, "mailbox unavailable"),
        other => panic!("expected NO error, got {other:?}"),
    }
}

#[tokio::test]
async fn state_errors_propagate_unchanged() {
    let mut session = Session::new(MockTransport::new(vec![Err(Error::ConnectionLost(
        "broken pipe".to_string(),
    ))]));

    assert!(matches!(
        inbox().count(&mut session).await,
        Err(Error::ConnectionLost(_))
    ));
}
