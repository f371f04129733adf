//! Worker message processing.
//!
//! [`CharacterWorker`] is the storage-side half of the host channel. It is free
//! of Zellij APIs; `main.rs` wraps it in the `ZellijWorker` shim that receives
//! payloads and posts replies back to the plugin.

use crate::bridge::{HostMessage, HostReply};
use crate::domain::error::{HanziError, Result};
use crate::domain::CharacterFields;
use crate::storage::CharacterStorage;
use serde::Serialize;

/// Reply sent instead of a character list when storage fails.
///
/// It deliberately has no `characters` field, so the plugin treats it as a
/// failed load.
#[derive(Debug, Serialize)]
struct FailureReply {
    error: String,
}

/// Dispatches host messages to a storage backend.
///
/// Adds are filed under the user of the most recent `get_characters`, since
/// `add_character` itself carries no user id.
pub struct CharacterWorker<S: CharacterStorage> {
    storage: S,
    current_user: String,
}

impl<S: CharacterStorage> CharacterWorker<S> {
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            current_user: crate::DEFAULT_USER_ID.to_string(),
        }
    }

    /// User that new characters are currently saved for.
    #[must_use]
    pub fn current_user(&self) -> &str {
        &self.current_user
    }

    /// Processes one message. Only `get_characters` produces a reply.
    ///
    /// # Errors
    ///
    /// Returns the storage error of a failed `get_characters`. Failed adds and
    /// deletes are logged and swallowed; the plugin has already applied them
    /// optimistically and expects no answer.
    pub fn handle_message(&mut self, message: HostMessage) -> Option<Result<HostReply>> {
        let _span = tracing::debug_span!("worker_handle_message", action = message.action_name()).entered();

        match message {
            HostMessage::AddCharacter {
                character,
                pinyin,
                meaning,
                example,
                example_meaning,
            } => {
                let fields = CharacterFields {
                    character: character.trim().to_string(),
                    pinyin: pinyin.trim().to_string(),
                    meaning: meaning.trim().to_string(),
                    example: non_empty(example),
                    example_meaning: non_empty(example_meaning),
                };
                if fields.character.is_empty() || fields.pinyin.is_empty() || fields.meaning.is_empty() {
                    tracing::warn!("ignoring add_character with empty required fields");
                    return None;
                }
                match self.storage.add_character(&self.current_user, fields) {
                    Ok(stored) => tracing::debug!(character_id = stored.id, "character stored"),
                    Err(e) => tracing::error!(error = %e, "failed to store character"),
                }
                None
            }

            HostMessage::DeleteCharacter { character_id } => {
                match self.storage.delete_character(&character_id) {
                    Ok(true) => tracing::debug!(character_id = %character_id, "character deleted"),
                    Ok(false) => tracing::debug!(character_id = %character_id, "no stored character with this id"),
                    Err(e) => tracing::error!(error = %e, "failed to delete character"),
                }
                None
            }

            HostMessage::GetCharacters { user_id } => {
                self.current_user = user_id;
                let reply = self.storage.characters_for(&self.current_user).map(|stored| HostReply {
                    characters: stored.into_iter().map(|c| c.into_record()).collect(),
                });
                if let Ok(reply) = &reply {
                    tracing::debug!(count = reply.characters.len(), "characters loaded");
                }
                Some(reply)
            }
        }
    }

    /// Decodes a raw payload, handles it, and encodes the reply.
    ///
    /// Returns `None` when there is nothing to send back, including for
    /// payloads that are not host messages.
    pub fn handle_payload(&mut self, payload: &str) -> Option<String> {
        let message: HostMessage = match serde_json::from_str(payload) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "failed to decode host message");
                return None;
            }
        };

        let encoded = match self.handle_message(message)? {
            Ok(reply) => serde_json::to_string(&reply),
            Err(e) => {
                tracing::error!(error = %e, "failed to load characters");
                serde_json::to_string(&FailureReply { error: e.to_string() })
            }
        };

        encoded
            .map_err(|e| HanziError::Storage(format!("failed to encode reply: {e}")))
            .inspect_err(|e| tracing::error!(error = %e, "dropping reply"))
            .ok()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CharacterId;
    use crate::storage::{JsonStorage, StoredCharacter};

    /// Storage whose reads always fail.
    struct BrokenStorage;

    impl CharacterStorage for BrokenStorage {
        fn add_character(&mut self, _user_id: &str, _fields: CharacterFields) -> Result<StoredCharacter> {
            Err(HanziError::Storage("disk full".to_string()))
        }

        fn delete_character(&mut self, _id: &CharacterId) -> Result<bool> {
            Err(HanziError::Storage("disk full".to_string()))
        }

        fn characters_for(&self, _user_id: &str) -> Result<Vec<StoredCharacter>> {
            Err(HanziError::Storage("disk full".to_string()))
        }
    }

    fn worker() -> (tempfile::TempDir, CharacterWorker<JsonStorage>) {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path().join("characters.json")).unwrap();
        (dir, CharacterWorker::new(storage))
    }

    fn add(worker: &mut CharacterWorker<JsonStorage>, character: &str) -> Option<String> {
        let fields = CharacterFields {
            character: character.to_string(),
            pinyin: "pīn".to_string(),
            meaning: "meaning".to_string(),
            example: None,
            example_meaning: None,
        };
        let payload = serde_json::to_string(&HostMessage::add_character(&fields)).unwrap();
        worker.handle_payload(&payload)
    }

    fn get(worker: &mut CharacterWorker<JsonStorage>, user: &str) -> HostReply {
        let payload = serde_json::to_string(&HostMessage::get_characters(user)).unwrap();
        HostReply::parse(&worker.handle_payload(&payload).unwrap()).unwrap()
    }

    #[test]
    fn add_and_delete_produce_no_reply() {
        let (_dir, mut worker) = worker();

        assert!(add(&mut worker, "好").is_none());
        let id = get(&mut worker, "local").characters[0].id.clone();
        let delete = serde_json::to_string(&HostMessage::delete_character(id)).unwrap();

        assert!(worker.handle_payload(&delete).is_none());
        assert!(get(&mut worker, "local").characters.is_empty());
    }

    #[test]
    fn adds_follow_the_last_requested_user() {
        let (_dir, mut worker) = worker();
        assert_eq!(worker.current_user(), "local");

        get(&mut worker, "alice");
        add(&mut worker, "火");
        get(&mut worker, "bob");
        add(&mut worker, "山");

        let alice = get(&mut worker, "alice");
        assert_eq!(alice.characters.len(), 1);
        assert_eq!(alice.characters[0].character, "火");
    }

    #[test]
    fn add_with_blank_required_field_is_ignored() {
        let (_dir, mut worker) = worker();
        add(&mut worker, "   ");
        assert!(get(&mut worker, "local").characters.is_empty());
    }

    #[test]
    fn unknown_payload_is_ignored() {
        let (_dir, mut worker) = worker();
        assert!(worker.handle_payload(r#"{"action": "rename_character"}"#).is_none());
        assert!(worker.handle_payload("not json").is_none());
    }

    #[test]
    fn storage_failure_yields_a_malformed_reply() {
        let mut worker = CharacterWorker::new(BrokenStorage);
        let payload = serde_json::to_string(&HostMessage::get_characters("local")).unwrap();

        let reply = worker.handle_payload(&payload).unwrap();

        assert!(matches!(HostReply::parse(&reply), Err(HanziError::MalformedResponse(_))));
    }
}
