//! Reply parsing and filename sanitization.
//!
//! Two strategies reduce a raw chat reply to a JSON payload plus a
//! filesystem-safe name: a single JSON object carrying `question.en`, or a
//! numbered list of questions one per line.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::domain::errors::ParseError;
use crate::domain::models::{ParseStrategy, ParsedResponse};

/// Characters of the serialized list used to name an enumerated-list artifact.
const LIST_FILENAME_PREFIX_CHARS: usize = 40;

/// Byte budget for a derived filename; the store appends `.json` and the
/// common filesystem limit is 255 bytes per name.
const FILENAME_MAX_BYTES: usize = 250 - ".json".len();

static BAD_FILENAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\s\w_. -]").unwrap_or_else(|e| unreachable!("invalid filename regex: {e}"))
});

static BAD_SEGMENT_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\s.-]").unwrap_or_else(|e| unreachable!("invalid segment regex: {e}"))
});

/// Make a string usable as a filename.
///
/// Spaces become underscores, then everything outside word characters,
/// whitespace, `_`, `.`, and `-` is removed. Idempotent.
pub fn sanitize_filename(input: &str) -> String {
    BAD_FILENAME_CHARS
        .replace_all(&input.replace(' ', "_"), "")
        .into_owned()
}

/// Make a category or subcategory name usable as a single path segment.
///
/// Separators and other unsafe characters are removed; a segment that ends
/// up empty, `.` or `..` becomes `_`.
pub fn sanitize_path_segment(name: &str) -> String {
    let cleaned = BAD_SEGMENT_CHARS.replace_all(name, "");
    let cleaned = cleaned.trim();
    match cleaned {
        "" | "." | ".." => "_".to_string(),
        other => other.to_string(),
    }
}

/// Longest prefix of `s` that fits in `max_bytes` without splitting a char.
fn truncate_to_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let end = s
        .char_indices()
        .map(|(start, c)| start + c.len_utf8())
        .take_while(|&end| end <= max_bytes)
        .last()
        .unwrap_or(0);
    &s[..end]
}

fn derive_filename(source: &str) -> String {
    let sanitized = sanitize_filename(source);
    let name = truncate_to_bytes(&sanitized, FILENAME_MAX_BYTES);
    if name.trim().is_empty() {
        Uuid::new_v4().to_string()
    } else {
        name.to_string()
    }
}

/// Parses raw replies with a fixed strategy.
#[derive(Debug, Clone, Copy)]
pub struct ResponseParser {
    strategy: ParseStrategy,
    min_items: usize,
}

impl ResponseParser {
    /// `min_items` only applies to the enumerated-list strategy.
    pub const fn new(strategy: ParseStrategy, min_items: usize) -> Self {
        Self {
            strategy,
            min_items,
        }
    }

    pub const fn strategy(&self) -> ParseStrategy {
        self.strategy
    }

    pub fn parse(&self, raw: &str) -> Result<ParsedResponse, ParseError> {
        match self.strategy {
            ParseStrategy::SingleObject => parse_single_object(raw),
            ParseStrategy::EnumeratedList => parse_enumerated_list(raw, self.min_items),
        }
    }
}

/// Parse the outermost `{ ... }` span of `raw` as an object with `question.en`.
pub fn parse_single_object(raw: &str) -> Result<ParsedResponse, ParseError> {
    let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
        return Err(ParseError::new("no JSON object in response"));
    };
    if end < start {
        return Err(ParseError::new("no JSON object in response"));
    }

    let object: Value = serde_json::from_str(&raw[start..=end])?;
    let question = object
        .get("question")
        .and_then(|q| q.get("en"))
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::new("missing string field question.en"))?;

    // Compact separators with UTF-8 kept as is, unlike Python's json.dumps default.
    Ok(ParsedResponse {
        filename: derive_filename(question),
        payload: serde_json::to_string(&object)?,
    })
}

/// Collect digit-led lines as questions, keeping the text from the first letter.
pub fn parse_enumerated_list(raw: &str, min_items: usize) -> Result<ParsedResponse, ParseError> {
    let questions: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(|c: char| c.is_ascii_digit()))
        .filter_map(|line| {
            line.find(|c: char| c.is_ascii_alphabetic())
                .map(|first_letter| &line[first_letter..])
        })
        .collect();

    if questions.len() < min_items {
        return Err(ParseError::new(format!(
            "found {} numbered questions, expected at least {min_items}",
            questions.len()
        )));
    }

    // Compact form, so `["a b","c"]` names the file `a_bc` rather than `a_b_c`.
    let payload = serde_json::to_string(&questions)?;
    let prefix: String = payload.chars().take(LIST_FILENAME_PREFIX_CHARS).collect();

    Ok(ParsedResponse {
        filename: derive_filename(&prefix),
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(c: char) -> bool {
        c.is_whitespace() || c.is_alphanumeric() || matches!(c, '_' | '.' | '-')
    }

    #[test]
    fn test_sanitize_filename_replaces_spaces_and_strips() {
        assert_eq!(sanitize_filename("What is gravity?"), "What_is_gravity");
        assert_eq!(sanitize_filename("a/b\\c:d*e"), "abcde");
        assert_eq!(sanitize_filename("v1.2-final_x"), "v1.2-final_x");
    }

    #[test]
    fn test_sanitize_filename_is_idempotent_on_examples() {
        for input in ["Who's there?", "[\"a b\", \"c\"]", "tab\there", "ünïcödé ok"] {
            let once = sanitize_filename(input);
            assert_eq!(sanitize_filename(&once), once);
        }
    }

    #[test]
    fn test_sanitize_path_segment() {
        assert_eq!(sanitize_path_segment("Science"), "Science");
        assert_eq!(sanitize_path_segment("World History"), "World History");
        assert_eq!(sanitize_path_segment("../etc"), "..etc");
        assert_eq!(sanitize_path_segment(".."), "_");
        assert_eq!(sanitize_path_segment("///"), "_");
        assert_eq!(sanitize_path_segment("Arts & Crafts"), "Arts  Crafts");
    }

    #[test]
    fn test_single_object_extracts_embedded_json() {
        let raw = r#"Sure! Here it is:
{"question": {"en": "What is the speed of light?", "de": "Wie schnell ist Licht?"}, "answers": ["c"]}
Hope that helps."#;

        let parsed = parse_single_object(raw).unwrap();

        assert_eq!(parsed.filename, "What_is_the_speed_of_light");
        assert_eq!(
            parsed.payload,
            r#"{"question":{"en":"What is the speed of light?","de":"Wie schnell ist Licht?"},"answers":["c"]}"#
        );
        let original: Value = serde_json::from_str(&raw[raw.find('{').unwrap()..=raw.rfind('}').unwrap()]).unwrap();
        let round: Value = serde_json::from_str(&parsed.payload).unwrap();
        assert_eq!(original, round);
    }

    #[test]
    fn test_single_object_filename_uses_allowed_chars() {
        let parsed = parse_single_object(r#"{"question": {"en": "Is 2+2=4? (yes/no) *really*"}}"#).unwrap();
        assert!(parsed.filename.chars().all(allowed));
        assert_eq!(parsed.filename, "Is_224_yesno_really");
    }

    #[test]
    fn test_single_object_failures() {
        assert!(parse_single_object("no braces here").is_err());
        assert!(parse_single_object("} backwards {").is_err());
        assert!(parse_single_object(r#"{"question": {"en": "unterminated"}"#).is_err());
        assert!(parse_single_object(r#"{"question": {"fr": "Bonjour"}}"#).is_err());
        assert!(parse_single_object(r#"{"question": {"en": 42}}"#).is_err());
    }

    #[test]
    fn test_single_object_empty_question_falls_back_to_uuid() {
        let parsed = parse_single_object(r#"{"question": {"en": "???"}}"#).unwrap();
        assert!(Uuid::parse_str(&parsed.filename).is_ok());
    }

    #[test]
    fn test_truncate_to_bytes_respects_char_boundaries() {
        assert_eq!(truncate_to_bytes("short", 10), "short");
        assert_eq!(truncate_to_bytes("abcdef", 4), "abcd");
        // Each Cyrillic letter is two bytes.
        assert_eq!(truncate_to_bytes("жжж", 5), "жж");
        assert_eq!(truncate_to_bytes("ж", 1), "");
    }

    #[tokio::test]
    async fn test_long_non_ascii_question_is_saveable() {
        use crate::adapters::storage::FsArtifactStore;
        use crate::domain::ports::ArtifactStore;

        let question = "Какой химический элемент ".repeat(20);
        assert!(question.chars().count() > 200);
        let raw = serde_json::json!({"question": {"en": question}}).to_string();

        let parsed = parse_single_object(&raw).unwrap();
        assert!(parsed.filename.len() <= FILENAME_MAX_BYTES);
        assert!(parsed.filename.len() + ".json".len() <= 255);
        assert!(parsed.filename.starts_with("Какой_химический"));

        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = FsArtifactStore::new(temp_dir.path());
        let path = store
            .save(std::path::Path::new("Science/Chemistry"), &parsed.filename, &parsed.payload)
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), parsed.payload);
    }

    #[test]
    fn test_enumerated_list_example() {
        let parsed =
            parse_enumerated_list("3 What is gravity?\n1 Define force\n2 Name a unit", 3).unwrap();

        assert_eq!(parsed.payload, r#"["What is gravity?","Define force","Name a unit"]"#);
        assert_eq!(parsed.filename, "What_is_gravityDefine_forceName");
    }

    #[test]
    fn test_enumerated_list_skips_non_question_lines() {
        let raw = "Here are your questions:\n\n  1. What is a noun?  \n2) Which planet is red?\n3.\n4 ...\nThanks!";
        let parsed = parse_enumerated_list(raw, 2).unwrap();

        let questions: Vec<String> = serde_json::from_str(&parsed.payload).unwrap();
        assert_eq!(questions, vec!["What is a noun?", "Which planet is red?"]);
    }

    #[test]
    fn test_enumerated_list_accepts_more_than_required() {
        let parsed = parse_enumerated_list("1 a\n2 b\n3 c\n4 d", 2).unwrap();
        let questions: Vec<String> = serde_json::from_str(&parsed.payload).unwrap();
        assert_eq!(questions.len(), 4);
    }

    #[test]
    fn test_enumerated_list_too_few_items() {
        let err = parse_enumerated_list("1 Only one\nnot numbered", 2).unwrap_err();
        assert!(err.reason.contains("found 1"));
    }

    #[test]
    fn test_parser_dispatches_on_strategy() {
        let list = ResponseParser::new(ParseStrategy::EnumeratedList, 1);
        assert_eq!(list.strategy(), ParseStrategy::EnumeratedList);
        assert!(list.parse("1 Question").is_ok());
        assert!(list.parse(r#"{"question": {"en": "Q"}}"#).is_err());

        let object = ResponseParser::new(ParseStrategy::SingleObject, 1);
        assert!(object.parse(r#"{"question": {"en": "Q"}}"#).is_ok());
        assert!(object.parse("1 Question").is_err());
    }
}
