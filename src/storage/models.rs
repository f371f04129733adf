//! Storage record types.
//!
//! [`StoredCharacter`] is what lands in the JSON file. It carries the
//! creation timestamp on top of the wire fields; the timestamp never leaves
//! the worker.

use crate::domain::{CharacterFields, CharacterId, CharacterRecord};
use serde::{Deserialize, Serialize};

/// A persisted character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCharacter {
    /// Storage-assigned id, unique across all users.
    pub id: i64,

    pub character: String,
    pub pinyin: String,
    pub meaning: String,

    #[serde(default)]
    pub example: Option<String>,

    #[serde(default)]
    pub example_meaning: Option<String>,

    /// Unix timestamp (seconds) of when the character was added.
    pub created_at: i64,
}

impl StoredCharacter {
    #[must_use]
    pub fn new(id: i64, fields: CharacterFields, created_at: i64) -> Self {
        Self {
            id,
            character: fields.character,
            pinyin: fields.pinyin,
            meaning: fields.meaning,
            example: fields.example,
            example_meaning: fields.example_meaning,
            created_at,
        }
    }

    /// Converts to the record shape sent in a `characters` reply.
    #[must_use]
    pub fn into_record(self) -> CharacterRecord {
        CharacterRecord {
            id: CharacterId::Number(self.id),
            character: self.character,
            pinyin: self.pinyin,
            meaning: self.meaning,
            example: self.example,
            example_meaning: self.example_meaning,
        }
    }

    /// Returns `true` if `id` refers to this character.
    ///
    /// Textual ids match when they parse to the same number.
    #[must_use]
    pub fn has_id(&self, id: &CharacterId) -> bool {
        match id {
            CharacterId::Number(n) => *n == self.id,
            CharacterId::Decimal(n) => n.as_i64() == Some(self.id),
            CharacterId::Text(text) => text.trim().parse::<i64>().is_ok_and(|n| n == self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(id: i64) -> StoredCharacter {
        StoredCharacter::new(
            id,
            CharacterFields {
                character: "水".to_string(),
                pinyin: "shuǐ".to_string(),
                meaning: "water".to_string(),
                example: None,
                example_meaning: None,
            },
            1_700_000_000,
        )
    }

    #[test]
    fn has_id_accepts_numeric_and_textual_ids() {
        let record = stored(7);
        assert!(record.has_id(&CharacterId::Number(7)));
        assert!(record.has_id(&CharacterId::from("7")));
        assert!(!record.has_id(&CharacterId::Number(8)));
        assert!(!record.has_id(&CharacterId::from("seven")));
        assert!(!record.has_id(&CharacterId::Decimal(serde_json::Number::from_f64(7.5).unwrap())));
    }

    #[test]
    fn into_record_drops_timestamp() {
        let record = stored(3).into_record();
        assert_eq!(record.id, CharacterId::Number(3));
        assert_eq!(record.character, "水");
        assert_eq!(record.example, None);
    }
}
