//! Character record domain model.
//!
//! A [`CharacterRecord`] is one vocabulary entry: the glyph, its pinyin
//! pronunciation, its meaning, and an optional usage example. Records travel
//! over the host channel unchanged, so field names follow the wire schema
//! (`example_meaning`, not `exampleMeaning`).

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque identifier of a character record.
///
/// The host may assign numeric or textual ids; both are accepted and echoed
/// back in `delete_character` exactly as received. Locally created records get
/// a numeric id derived from the wall clock (see [`CharacterIdGenerator`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacterId {
    /// Integer id (host-assigned or locally generated).
    Number(i64),
    /// Any other JSON number, such as `1.5` or a value past `i64::MAX`.
    Decimal(serde_json::Number),
    /// Textual id (host-assigned).
    Text(String),
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Decimal(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for CharacterId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CharacterId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One saved vocabulary entry.
///
/// Records are never mutated in place; a change replaces the whole record.
/// Host records are taken as they come: a missing or `null` text field reads
/// as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub id: CharacterId,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub character: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub pinyin: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub meaning: String,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub example_meaning: Option<String>,
}

impl CharacterRecord {
    /// Builds a record from validated form input and a fresh local id.
    #[must_use]
    pub fn from_fields(id: CharacterId, fields: CharacterFields) -> Self {
        Self {
            id,
            character: fields.character,
            pinyin: fields.pinyin,
            meaning: fields.meaning,
            example: fields.example,
            example_meaning: fields.example_meaning,
        }
    }

    /// The record's content without its id.
    #[must_use]
    pub fn fields(&self) -> CharacterFields {
        CharacterFields {
            character: self.character.clone(),
            pinyin: self.pinyin.clone(),
            meaning: self.meaning.clone(),
            example: self.example.clone(),
            example_meaning: self.example_meaning.clone(),
        }
    }

    /// Returns `true` if any text field contains `needle`.
    ///
    /// `needle` must already be lowercased; each field is lowercased before
    /// comparing. Missing optional fields never match.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        let contains = |text: &str| text.to_lowercase().contains(needle);

        contains(&self.character)
            || contains(&self.pinyin)
            || contains(&self.meaning)
            || self.example.as_deref().is_some_and(contains)
            || self.example_meaning.as_deref().is_some_and(contains)
    }
}

fn text_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Validated content of a new character, before it has an id.
///
/// Required fields are trimmed and non-empty; optional fields are `None`
/// rather than empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterFields {
    pub character: String,
    pub pinyin: String,
    pub meaning: String,
    pub example: Option<String>,
    pub example_meaning: Option<String>,
}

/// Generates session-unique ids for optimistically added records.
///
/// Ids are millisecond timestamps, bumped by one whenever two records are
/// created within the same millisecond. They are never reconciled with ids
/// the host assigns later.
#[derive(Debug, Clone, Default)]
pub struct CharacterIdGenerator {
    last: i64,
}

impl CharacterIdGenerator {
    /// Returns the next id, strictly greater than every id handed out before.
    pub fn next_id(&mut self) -> CharacterId {
        let now = chrono::Utc::now().timestamp_millis();
        self.last = now.max(self.last.saturating_add(1));
        CharacterId::Number(self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(example: Option<&str>) -> CharacterRecord {
        CharacterRecord {
            id: CharacterId::Number(1),
            character: "好".to_string(),
            pinyin: "hǎo".to_string(),
            meaning: "Good".to_string(),
            example: example.map(String::from),
            example_meaning: None,
        }
    }

    #[test]
    fn id_accepts_numbers_and_strings() {
        let numeric: CharacterId = serde_json::from_str("42").unwrap();
        let textual: CharacterId = serde_json::from_str("\"abc\"").unwrap();

        assert_eq!(numeric, CharacterId::Number(42));
        assert_eq!(textual, CharacterId::Text("abc".to_string()));
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "42");
    }

    #[test]
    fn id_keeps_floats_and_huge_numbers_verbatim() {
        let float: CharacterId = serde_json::from_str("1.5").unwrap();
        let huge: CharacterId = serde_json::from_str("18446744073709551615").unwrap();

        assert!(matches!(float, CharacterId::Decimal(_)));
        assert!(matches!(huge, CharacterId::Decimal(_)));
        assert_eq!(serde_json::to_string(&float).unwrap(), "1.5");
        assert_eq!(huge.to_string(), "18446744073709551615");
    }

    #[test]
    fn record_with_missing_or_null_text_reads_as_empty() {
        let json = r#"{"id": 7, "character": "爱", "pinyin": null}"#;
        let parsed: CharacterRecord = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.pinyin, "");
        assert_eq!(parsed.meaning, "");
    }

    #[test]
    fn record_without_optional_fields_deserializes() {
        let json = r#"{"id": 7, "character": "爱", "pinyin": "ài", "meaning": "love"}"#;
        let parsed: CharacterRecord = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.example, None);
        assert_eq!(parsed.example_meaning, None);
    }

    #[test]
    fn matching_is_case_insensitive_and_skips_missing_fields() {
        let with_example = record(Some("你好"));
        let without_example = record(None);

        assert!(with_example.matches_lowercase("good"));
        assert!(with_example.matches_lowercase("你"));
        assert!(!without_example.matches_lowercase("你"));
    }

    #[test]
    fn generated_ids_are_strictly_increasing() {
        let mut ids = CharacterIdGenerator::default();
        let first = ids.next_id();
        let second = ids.next_id();

        match (first, second) {
            (CharacterId::Number(a), CharacterId::Number(b)) => assert!(b > a),
            other => panic!("unexpected ids: {other:?}"),
        }
    }
}
