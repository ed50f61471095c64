//! Decoding FETCH responses into typed message records.
//!
//! Message boundaries are not delimited structurally; they are recovered
//! from content markers inside the part stream, and the grouping rules
//! differ per fetch mode. The decoder is a pure transformation with no
//! network or session access.

use crate::command::FetchMode;
use crate::types::{FullRecord, GmId, HeaderRecord, MessageRecord, TeaserRecord};

use super::RawPart;

/// Decodes a raw FETCH response into message records, in response order.
///
/// An empty or missing response decodes to an empty list for every mode.
/// Malformed or partial parts are skipped rather than aborting the scan.
#[must_use]
pub fn decode(parts: &[RawPart], mode: FetchMode) -> Vec<MessageRecord> {
    if parts.is_empty() {
        return Vec::new();
    }
    match mode {
        FetchMode::GmId => decode_gm_ids(parts),
        FetchMode::Headers => decode_headers(parts),
        FetchMode::Full => decode_full(parts),
        FetchMode::Teaser => decode_teasers(parts),
    }
}

/// Scans every terminal string for the `<n> (X-GM-MSGID <id>)` shape.
fn decode_gm_ids(parts: &[RawPart]) -> Vec<MessageRecord> {
    parts
        .iter()
        .filter_map(RawPart::as_line)
        .filter_map(parse_gm_id_line)
        .map(MessageRecord::GmId)
        .collect()
}

/// Extracts the Gmail id from a `<n> (X-GM-MSGID <id>)` line.
///
/// Anchored at the start of the line only; trailing content after the
/// closing parenthesis is ignored.
fn parse_gm_id_line(line: &str) -> Option<GmId> {
    let seq_len = line.bytes().take_while(u8::is_ascii_digit).count();
    if seq_len == 0 {
        return None;
    }
    let rest = line[seq_len..].strip_prefix(" (X-GM-MSGID ")?;
    let id_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if id_len == 0 || !rest[id_len..].starts_with(')') {
        return None;
    }
    GmId::parse(&rest[..id_len])
}

/// Header mode: each message group is one chunk of exactly two sub-parts
/// (metadata, header block), closed by the next top-level part.
fn decode_headers(parts: &[RawPart]) -> Vec<MessageRecord> {
    let mut records = Vec::new();
    let mut pending: Option<(String, String)> = None;

    for part in parts {
        // The part after an accumulated group is its section terminator;
        // it closes the group and carries no message data.
        if let Some((metadata, headers)) = pending.take() {
            records.push(MessageRecord::Headers(HeaderRecord { metadata, headers }));
            continue;
        }
        if let RawPart::Chunk(subs) = part
            && let [metadata, headers, ..] = subs.as_slice()
        {
            pending = Some((metadata.clone(), headers.clone()));
        }
    }

    records
}

/// Full mode: like header mode, but the second sub-part is the complete
/// message text, which fills both the header and body slots.
fn decode_full(parts: &[RawPart]) -> Vec<MessageRecord> {
    let mut records = Vec::new();
    let mut pending: Option<(String, String)> = None;

    for part in parts {
        if let Some((metadata, text)) = pending.take() {
            records.push(MessageRecord::Full(FullRecord {
                metadata,
                headers: text.clone(),
                body: text,
            }));
            continue;
        }
        if let RawPart::Chunk(subs) = part
            && let [metadata, text, ..] = subs.as_slice()
        {
            pending = Some((metadata.clone(), text.clone()));
        }
    }

    records
}

/// Section currently being accumulated while decoding a teaser group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TeaserSection {
    Metadata,
    Header,
    Body,
}

/// The metadata section ends with the sub-part naming the header data item.
fn starts_header_section(sub: &str) -> bool {
    sub.contains("BODY[HEADER]")
}

/// The header section ends at the sub-part naming the first body part.
fn starts_body_section(sub: &str) -> bool {
    sub.contains("BODY[1]")
}

/// A NIL first body part completes the message inline, with an empty body.
fn marks_empty_body(sub: &str) -> bool {
    sub.contains("BODY[1] NIL)")
}

/// Teaser mode: one message group spreads across many parts because body
/// fragments can be chunked by the server.
///
/// A group is complete either at a bare terminal string, or when the
/// header/body boundary marker carries the empty-body marker in the same
/// sub-part. Servers use one or the other depending on whether the body
/// part is absent entirely or present but empty, so both exits stay.
fn decode_teasers(parts: &[RawPart]) -> Vec<MessageRecord> {
    let mut records = Vec::new();
    let mut section = TeaserSection::Metadata;
    let mut metadata = String::new();
    let mut headers = String::new();
    let mut body = String::new();
    let mut complete = false;

    for part in parts {
        match part {
            RawPart::Line(_) => complete = true,
            RawPart::Chunk(subs) => {
                for sub in subs {
                    match section {
                        TeaserSection::Metadata => {
                            metadata.push_str(sub);
                            if starts_header_section(sub) {
                                section = TeaserSection::Header;
                            }
                        }
                        TeaserSection::Header => {
                            if starts_body_section(sub) {
                                section = TeaserSection::Body;
                            } else {
                                headers.push_str(sub);
                            }
                            if marks_empty_body(sub) {
                                complete = true;
                            }
                        }
                        TeaserSection::Body => body.push_str(sub),
                    }
                }
            }
        }

        if complete {
            records.push(MessageRecord::Teaser(TeaserRecord {
                metadata: std::mem::take(&mut metadata),
                headers: std::mem::take(&mut headers),
                body: std::mem::take(&mut body),
            }));
            section = TeaserSection::Metadata;
            complete = false;
        }
    }

    records
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

    const META: &str =
        "1 (X-GM-MSGID 1278455344230334865 X-GM-LABELS (\"\\\\Inbox\") UID 4 FLAGS (\\Seen) \
         BODY[HEADER] {342}";

    #[test]
    fn empty_input_decodes_to_nothing_in_every_mode() {
        for mode in [
            FetchMode::GmId,
            FetchMode::Headers,
            FetchMode::Teaser,
            FetchMode::Full,
        ] {
            assert!(decode(&[], mode).is_empty());
        }
    }

    mod gm_id_mode {
        use super::*;

        #[test]
        fn matching_and_non_matching_lines() {
            let parts = [
                RawPart::line("4 (X-GM-MSGID 1278455344230334865)"),
                RawPart::line(")"),
                RawPart::line("garbage without a marker"),
                RawPart::line("7 (X-GM-MSGID 99)"),
            ];
            let records = decode(&parts, FetchMode::GmId);
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].gm_id(), Some(GmId::new(1278455344230334865)));
            assert_eq!(records[1].gm_id(), Some(GmId::new(99)));
        }

        #[test]
        fn marker_must_be_anchored_at_start() {
            let parts = [RawPart::line("x 4 (X-GM-MSGID 99)")];
            assert!(decode(&parts, FetchMode::GmId).is_empty());
        }

        #[test]
        fn trailing_content_after_marker_is_ignored() {
            let parts = [RawPart::line("4 (X-GM-MSGID 99) UID 12)")];
            let records = decode(&parts, FetchMode::GmId);
            assert_eq!(records[0].gm_id(), Some(GmId::new(99)));
        }

        #[test]
        fn chunks_are_not_scanned() {
            let parts = [RawPart::chunk(["4 (X-GM-MSGID 99)"])];
            assert!(decode(&parts, FetchMode::GmId).is_empty());
        }
    }

    mod header_mode {
        use super::*;

        #[test]
        fn n_groups_decode_to_n_records_in_order() {
            let mut parts = Vec::new();
            for i in 0..3 {
                parts.push(RawPart::chunk([
                    format!("meta-{i}"),
                    format!("Subject: msg {i}\r\n\r\n"),
                ]));
                parts.push(RawPart::line(")"));
            }
            let records = decode(&parts, FetchMode::Headers);
            assert_eq!(records.len(), 3);
            for (i, record) in records.iter().enumerate() {
                let MessageRecord::Headers(header) = record else {
                    panic!("expected header record, got {record:?}");
                };
                assert_eq!(header.metadata, format!("meta-{i}"));
                assert_eq!(header.headers, format!("Subject: msg {i}\r\n\r\n"));
            }
        }

        #[test]
        fn group_without_terminator_is_not_emitted() {
            let parts = [RawPart::chunk(["meta", "headers"])];
            assert!(decode(&parts, FetchMode::Headers).is_empty());
        }

        #[test]
        fn leading_malformed_parts_are_skipped() {
            let parts = [
                RawPart::line("noise"),
                RawPart::chunk(["only-one-sub-part"]),
                RawPart::chunk(["meta", "headers"]),
                RawPart::line(")"),
            ];
            let records = decode(&parts, FetchMode::Headers);
            assert_eq!(records.len(), 1);
        }
    }

    mod full_mode {
        use super::*;

        #[test]
        fn header_and_body_share_the_combined_text() {
            let text = "Subject: hi\r\n\r\nthe body";
            let parts = [RawPart::chunk(["meta", text]), RawPart::line(")")];
            let records = decode(&parts, FetchMode::Full);
            assert_eq!(records.len(), 1);
            let MessageRecord::Full(full) = &records[0] else {
                panic!("expected full record");
            };
            assert_eq!(full.metadata, "meta");
            assert_eq!(full.headers, text);
            assert_eq!(full.body, text);
        }

        #[test]
        fn two_full_messages() {
            let parts = [
                RawPart::chunk(["m1", "text one"]),
                RawPart::line(")"),
                RawPart::chunk(["m2", "text two"]),
                RawPart::line(")"),
            ];
            let records = decode(&parts, FetchMode::Full);
            assert_eq!(records.len(), 2);
            assert_eq!(records[1].metadata(), Some("m2"));
        }
    }

    mod teaser_mode {
        use super::*;

        #[test]
        fn sections_split_at_markers() {
            let parts = [
                RawPart::chunk([
                    META,
                    "Subject: hello\r\n\r\n",
                    " BODY[1] {11}",
                    "hello world",
                ]),
                RawPart::line(")"),
            ];
            let records = decode(&parts, FetchMode::Teaser);
            assert_eq!(records.len(), 1);
            let MessageRecord::Teaser(teaser) = &records[0] else {
                panic!("expected teaser record");
            };
            assert_eq!(teaser.metadata, META);
            assert_eq!(teaser.headers, "Subject: hello\r\n\r\n");
            assert_eq!(teaser.body, "hello world");
        }

        #[test]
        fn chunked_body_fragments_accumulate() {
            let parts = [
                RawPart::chunk([META, "Subject: hi\r\n", " BODY[1] {10}", "part one "]),
                RawPart::chunk(["part two"]),
                RawPart::line(")"),
            ];
            let records = decode(&parts, FetchMode::Teaser);
            assert_eq!(records.len(), 1);
            let MessageRecord::Teaser(teaser) = &records[0] else {
                panic!("expected teaser record");
            };
            assert_eq!(teaser.body, "part one part two");
        }

        #[test]
        fn inline_empty_body_marker_completes_with_empty_body() {
            let parts = [RawPart::chunk([META, "Subject: hi\r\n", " BODY[1] NIL)"])];
            let records = decode(&parts, FetchMode::Teaser);
            assert_eq!(records.len(), 1);
            let MessageRecord::Teaser(teaser) = &records[0] else {
                panic!("expected teaser record");
            };
            assert!(teaser.body.is_empty());
            assert_eq!(teaser.headers, "Subject: hi\r\n");
        }

        #[test]
        fn boundary_marker_is_not_part_of_headers() {
            let parts = [
                RawPart::chunk([META, "Subject: x\r\n", " BODY[1] {3}", "abc"]),
                RawPart::line(")"),
            ];
            let records = decode(&parts, FetchMode::Teaser);
            let MessageRecord::Teaser(teaser) = &records[0] else {
                panic!("expected teaser record");
            };
            assert!(!teaser.headers.contains("BODY[1]"));
        }

        #[test]
        fn two_teasers_reset_state_between_groups() {
            let parts = [
                RawPart::chunk([META, "Subject: a\r\n", " BODY[1] {1}", "a"]),
                RawPart::line(")"),
                RawPart::chunk([META, "Subject: b\r\n", " BODY[1] {1}", "b"]),
                RawPart::line(")"),
            ];
            let records = decode(&parts, FetchMode::Teaser);
            assert_eq!(records.len(), 2);
            let MessageRecord::Teaser(second) = &records[1] else {
                panic!("expected teaser record");
            };
            assert_eq!(second.headers, "Subject: b\r\n");
            assert_eq!(second.body, "b");
        }

        #[test]
        fn metadata_includes_its_boundary_sub_part() {
            // The sub-part naming BODY[HEADER] belongs to the metadata
            // section; only later sub-parts are headers.
            let parts = [
                RawPart::chunk([META, "Subject: x\r\n", " BODY[1] NIL)"]),
            ];
            let records = decode(&parts, FetchMode::Teaser);
            let MessageRecord::Teaser(teaser) = &records[0] else {
                panic!("expected teaser record");
            };
            assert!(teaser.metadata.contains("BODY[HEADER]"));
        }
    }
}
