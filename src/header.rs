use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::topic::Visibility;

/// Layout of the `Time` header field.
pub const TIME_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Why a header block was rejected.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    #[error("header is not a valid JSON object: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid timestamp {value:?}, expected YYYY/MM/DD HH:MM")]
    InvalidTimestamp { value: String },
}

/// The validated metadata block of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicHeader {
    /// Value of the `URL` field.
    pub id: String,
    pub timestamp: NaiveDateTime,
    /// Raw `Tag` field, comma separated.
    pub tags: String,
    pub visibility: Visibility,
}

impl TopicHeader {
    /// Tag names exactly as written, split on `,`.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.split(',')
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawHeader {
    #[serde(rename = "URL", alias = "url", alias = "Url", default)]
    url: Option<String>,
    #[serde(rename = "Time", alias = "time", default)]
    time: Option<String>,
    #[serde(rename = "Tag", alias = "tag", default)]
    tag: Option<String>,
    #[serde(rename = "public", alias = "Public", default)]
    public: Option<String>,
}

/// Split a document into its header block and the unrendered body.
///
/// The header is every line up to and including the first empty one. A
/// document without an empty line is all header and has an empty body.
pub fn split_header(raw: &str) -> (String, &str) {
    let mut lines = Vec::new();
    let mut offset = 0;

    for line in raw.split_inclusive('\n') {
        offset += line.len();
        let line = line.trim_end_matches('\n').trim_end_matches('\r');
        if line.is_empty() {
            break;
        }
        lines.push(line);
    }

    (lines.join("\n"), &raw[offset..])
}

/// Parse a document's header and return it along with the body text.
pub fn parse(raw: &str) -> Result<(TopicHeader, &str), HeaderError> {
    let (block, body) = split_header(raw);
    let fields: RawHeader = serde_json::from_str(strip_fence(&block))?;

    let timestamp = parse_timestamp(fields.time.as_deref().unwrap_or(""))?;
    let visibility = match fields.public.as_deref() {
        Some("no") => Visibility::Protected,
        _ => Visibility::Public,
    };

    let header = TopicHeader {
        id: fields.url.unwrap_or_default(),
        timestamp,
        tags: fields.tag.unwrap_or_default(),
        visibility,
    };
    Ok((header, body))
}

/// Parse a `YYYY/MM/DD HH:MM` timestamp, rejecting anything that does not
/// print back to the same text.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, HeaderError> {
    NaiveDateTime::parse_from_str(value, TIME_FORMAT)
        .ok()
        .filter(|ts| ts.format(TIME_FORMAT).to_string() == value)
        .ok_or_else(|| HeaderError::InvalidTimestamp {
            value: value.to_string(),
        })
}

// Drops surrounding backticks and a fence info string such as `json`.
fn strip_fence(block: &str) -> &str {
    let trimmed = block.trim();
    let inner = trimmed.trim_matches('`');
    if !trimmed.starts_with('`') {
        return inner;
    }
    match inner.split_once('\n') {
        Some((info, rest)) if is_info_string(info) => rest,
        _ => inner,
    }
}

fn is_info_string(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    const DOC: &str = "{\"URL\":\"hello\",\"Time\":\"2021/01/10 10:00\",\"Tag\":\"go,rust\"}\n\n# Hello\n\nBody text.\n";

    #[test]
    fn splits_at_first_empty_line() {
        let (block, body) = split_header("{\n\"URL\": \"a\"\n}\n\nfirst\n\nsecond\n");
        assert_eq!(block, "{\n\"URL\": \"a\"\n}");
        assert_eq!(body, "first\n\nsecond\n");
    }

    #[test]
    fn header_without_empty_line_takes_everything() {
        let (block, body) = split_header("{\"URL\":\"a\"}\n");
        assert_eq!(block, "{\"URL\":\"a\"}");
        assert_eq!(body, "");
    }

    #[test]
    fn crlf_lines_are_recognised() {
        let (block, body) = split_header("{\"URL\":\"a\"}\r\n\r\nbody\r\n");
        assert_eq!(block, "{\"URL\":\"a\"}");
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn parses_all_fields() {
        let (header, body) = parse(DOC).unwrap();
        assert_eq!(header.id, "hello");
        assert_eq!(header.timestamp.year(), 2021);
        assert_eq!(header.timestamp.month(), 1);
        assert_eq!(header.timestamp.day(), 10);
        assert_eq!(header.timestamp.hour(), 10);
        assert_eq!(header.tag_names().collect::<Vec<_>>(), vec!["go", "rust"]);
        assert_eq!(header.visibility, Visibility::Public);
        assert_eq!(body, "# Hello\n\nBody text.\n");
    }

    #[test]
    fn strips_fence_markers() {
        let doc = "```\n{\"URL\":\"a\",\"Time\":\"2020/05/01 09:00\"}\n```\n\nbody";
        let (header, body) = parse(doc).unwrap();
        assert_eq!(header.id, "a");
        assert_eq!(body, "body");
    }

    #[test]
    fn strips_fence_with_info_string() {
        let doc = "```json\n{\"URL\":\"a\",\"Time\":\"2020/05/01 09:00\"}\n```\n\nbody";
        let (header, _) = parse(doc).unwrap();
        assert_eq!(header.id, "a");
    }

    #[test]
    fn public_no_marks_protected() {
        let doc = "{\"URL\":\"a\",\"Time\":\"2020/05/01 09:00\",\"public\":\"no\"}\n\n";
        let (header, _) = parse(doc).unwrap();
        assert_eq!(header.visibility, Visibility::Protected);
    }

    #[test]
    fn other_public_values_stay_public() {
        for value in ["yes", "No", "", "false"] {
            let doc = format!(
                "{{\"URL\":\"a\",\"Time\":\"2020/05/01 09:00\",\"public\":\"{value}\"}}\n\n"
            );
            let (header, _) = parse(&doc).unwrap();
            assert_eq!(header.visibility, Visibility::Public, "{value}");
        }
    }

    #[test]
    fn lowercase_field_names_are_accepted() {
        let doc = "{\"url\":\"a\",\"time\":\"2020/05/01 09:00\",\"tag\":\"go\"}\n\n";
        let (header, _) = parse(doc).unwrap();
        assert_eq!(header.id, "a");
        assert_eq!(header.tags, "go");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let doc = "{\"URL\":\"a\",\"Time\":\"2020/05/01 09:00\",\"Author\":\"x\"}\n\n";
        assert!(parse(doc).is_ok());
    }

    #[test]
    fn non_json_header_is_malformed() {
        let err = parse("Title: hello\nTime: 2020/05/01 09:00\n\nbody").unwrap_err();
        assert!(matches!(err, HeaderError::Malformed(_)));
    }

    #[test]
    fn empty_header_is_malformed() {
        let err = parse("\nbody").unwrap_err();
        assert!(matches!(err, HeaderError::Malformed(_)));
    }

    #[test]
    fn non_string_field_is_malformed() {
        let doc = "{\"URL\":\"a\",\"Time\":\"2020/05/01 09:00\",\"public\":false}\n\n";
        assert!(matches!(parse(doc).unwrap_err(), HeaderError::Malformed(_)));
    }

    #[test]
    fn missing_time_is_invalid_timestamp() {
        let err = parse("{\"URL\":\"a\",\"Tag\":\"go\"}\n\nbody").unwrap_err();
        match err {
            HeaderError::InvalidTimestamp { value } => assert_eq!(value, ""),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn timestamp_must_match_layout_exactly() {
        assert!(parse_timestamp("2021/01/10 10:00").is_ok());
        for bad in [
            "2021-01-10 10:00",
            "2021/1/10 10:00",
            "2021/01/10 10:00:00",
            "2021/01/10",
            " 2021/01/10 10:00",
            "2021/13/10 10:00",
        ] {
            assert!(parse_timestamp(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn plural_tags_key_is_not_a_tag_field() {
        let doc = "{\"URL\":\"a\",\"Time\":\"2020/05/01 09:00\",\"Tags\":\"go\"}\n\n";
        let (header, _) = parse(doc).unwrap();
        assert_eq!(header.tags, "");
    }

    #[test]
    fn same_field_under_two_spellings_is_malformed() {
        let doc = "{\"URL\":\"a\",\"url\":\"b\",\"Time\":\"2020/05/01 09:00\"}\n\n";
        assert!(matches!(parse(doc).unwrap_err(), HeaderError::Malformed(_)));
    }
}
