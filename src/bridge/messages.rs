//! Wire messages exchanged over the host channel.
//!
//! Outgoing messages are flat JSON objects tagged by an `action` field;
//! the single incoming reply carries a `characters` array. The companion
//! worker decodes the same types, so both directions round-trip through
//! `serde_json` without hand-written field mapping.

use crate::domain::{CharacterFields, CharacterId, CharacterRecord, HanziError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Actions sent from the plugin to the host.
///
/// Serialized as `{"action": "<snake_case name>", ...fields}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HostMessage {
    /// Persist a new character for the current user.
    AddCharacter {
        character: String,
        pinyin: String,
        meaning: String,
        /// Serialized as `null` when absent.
        example: Option<String>,
        /// Serialized as `null` when absent.
        example_meaning: Option<String>,
    },

    /// Delete a character by id.
    DeleteCharacter {
        character_id: CharacterId,
    },

    /// Ask for the user's saved characters.
    GetCharacters {
        user_id: String,
    },
}

impl HostMessage {
    /// Builds an `add_character` message from validated form input.
    #[must_use]
    pub fn add_character(fields: &CharacterFields) -> Self {
        Self::AddCharacter {
            character: fields.character.clone(),
            pinyin: fields.pinyin.clone(),
            meaning: fields.meaning.clone(),
            example: fields.example.clone(),
            example_meaning: fields.example_meaning.clone(),
        }
    }

    /// Builds a `delete_character` message.
    #[must_use]
    pub const fn delete_character(character_id: CharacterId) -> Self {
        Self::DeleteCharacter { character_id }
    }

    /// Builds a `get_characters` message.
    #[must_use]
    pub fn get_characters(user_id: impl Into<String>) -> Self {
        Self::GetCharacters {
            user_id: user_id.into(),
        }
    }

    /// Wire name of the action, for logging.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::AddCharacter { .. } => "add_character",
            Self::DeleteCharacter { .. } => "delete_character",
            Self::GetCharacters { .. } => "get_characters",
        }
    }
}

/// Reply to `get_characters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostReply {
    pub characters: Vec<CharacterRecord>,
}

impl HostReply {
    /// Parses a raw payload received from the host.
    ///
    /// Entries are decoded one at a time; an entry that is not a character
    /// record is logged and skipped so the rest of the list still loads.
    ///
    /// # Errors
    ///
    /// Returns [`HanziError::MalformedResponse`] if the payload is not JSON,
    /// lacks the `characters` field, or `characters` is not a list.
    pub fn parse(payload: &str) -> Result<Self> {
        let mut reply: Value = serde_json::from_str(payload)
            .map_err(|e| HanziError::MalformedResponse(format!("reply is not valid JSON: {e}")))?;

        let entries = match reply.get_mut("characters").map(Value::take) {
            Some(Value::Array(entries)) => entries,
            None | Some(Value::Null) => {
                return Err(HanziError::MalformedResponse("no character list in reply".to_string()));
            }
            Some(other) => {
                return Err(HanziError::MalformedResponse(format!(
                    "`characters` is not a list: {other}"
                )));
            }
        };

        let characters = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                serde_json::from_value::<CharacterRecord>(entry)
                    .inspect_err(|e| tracing::warn!(index, error = %e, "skipping unreadable character record"))
                    .ok()
            })
            .collect();

        Ok(Self { characters })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_character_serializes_missing_examples_as_null() {
        let fields = CharacterFields {
            character: "谢".to_string(),
            pinyin: "xiè".to_string(),
            meaning: "thank".to_string(),
            example: None,
            example_meaning: Some("thanks".to_string()),
        };

        let value = serde_json::to_value(HostMessage::add_character(&fields)).unwrap();

        assert_eq!(
            value,
            json!({
                "action": "add_character",
                "character": "谢",
                "pinyin": "xiè",
                "meaning": "thank",
                "example": null,
                "example_meaning": "thanks",
            })
        );
    }

    #[test]
    fn delete_and_get_use_wire_field_names() {
        let delete = serde_json::to_value(HostMessage::delete_character(CharacterId::Number(3))).unwrap();
        let get = serde_json::to_value(HostMessage::get_characters("u-1")).unwrap();

        assert_eq!(delete, json!({"action": "delete_character", "character_id": 3}));
        assert_eq!(get, json!({"action": "get_characters", "user_id": "u-1"}));
    }

    #[test]
    fn reply_without_characters_is_malformed() {
        let err = HostReply::parse(r#"{"status": "ok"}"#).unwrap_err();
        assert!(matches!(err, HanziError::MalformedResponse(_)));
    }

    #[test]
    fn reply_with_non_list_characters_names_the_field() {
        let err = HostReply::parse(r#"{"characters": "none"}"#).unwrap_err();
        assert!(err.to_string().contains("`characters` is not a list"));

        let missing = HostReply::parse(r#"{"characters": null}"#).unwrap_err();
        assert!(missing.to_string().contains("no character list"));
    }

    #[test]
    fn reply_that_is_not_json_is_malformed() {
        let err = HostReply::parse("characters: none").unwrap_err();
        assert!(matches!(err, HanziError::MalformedResponse(_)));
    }

    #[test]
    fn reply_keeps_host_order() {
        let reply = HostReply::parse(
            r#"{"characters": [
                {"id": 2, "character": "谢", "pinyin": "xiè", "meaning": "thank"},
                {"id": "a", "character": "好", "pinyin": "hǎo", "meaning": "good", "example": "你好"}
            ]}"#,
        )
        .unwrap();

        let glyphs: Vec<&str> = reply.characters.iter().map(|c| c.character.as_str()).collect();
        assert_eq!(glyphs, vec!["谢", "好"]);
        assert_eq!(reply.characters[1].id, CharacterId::Text("a".to_string()));
    }

    #[test]
    fn reply_tolerates_loose_records_and_skips_unreadable_ones() {
        let reply = HostReply::parse(
            r#"{"characters": [
                {"id": 1.0, "character": "水", "pinyin": "shuǐ", "meaning": "water"},
                {"id": 18446744073709551615, "character": "火", "pinyin": "huǒ", "meaning": "fire"},
                {"id": 3, "character": "山", "pinyin": "shān"},
                "not a record",
                {"id": 4, "character": "谢", "pinyin": "xiè", "meaning": "thank"}
            ]}"#,
        )
        .unwrap();

        let glyphs: Vec<&str> = reply.characters.iter().map(|c| c.character.as_str()).collect();
        assert_eq!(glyphs, vec!["水", "火", "山", "谢"]);
        assert_eq!(reply.characters[2].meaning, "");

        let echoed = serde_json::to_value(HostMessage::delete_character(reply.characters[0].id.clone())).unwrap();
        assert_eq!(echoed, json!({"action": "delete_character", "character_id": 1.0}));
    }
}
