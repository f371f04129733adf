//! JSON file-based storage backend.
//!
//! Keeps every user's characters in one human-readable file, rewritten with an
//! atomic write (write-to-temp + rename) after each change.

use crate::domain::error::{HanziError, Result};
use crate::domain::{CharacterFields, CharacterId};
use crate::storage::backend::CharacterStorage;
use crate::storage::models::StoredCharacter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    /// Next id to hand out. Never reused, even after deletes.
    #[serde(default = "first_id")]
    next_id: i64,

    /// Characters keyed by user id, oldest first.
    #[serde(default)]
    users: BTreeMap<String, Vec<StoredCharacter>>,
}

const fn first_id() -> i64 {
    1
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: 1,
            next_id: first_id(),
            users: BTreeMap::new(),
        }
    }
}

impl StorageData {
    fn character_count(&self) -> usize {
        self.users.values().map(Vec::len).sum()
    }
}

/// JSON file storage backend.
///
/// The whole dataset lives in memory and is persisted on every modification.
/// `Send` but not `Sync`: it is owned by the single worker thread.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "next_id": 3,
///   "users": {
///     "local": [
///       {
///         "id": 1,
///         "character": "好",
///         "pinyin": "hǎo",
///         "meaning": "good",
///         "example": null,
///         "example_meaning": null,
///         "created_at": 1700000000
///       }
///     ]
///   }
/// }
/// ```
pub struct JsonStorage {
    file_path: PathBuf,
    data: StorageData,
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens a JSON storage file.
    ///
    /// Loads existing data if the file exists; parent directories are created
    /// automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty storage");
            StorageData::default()
        };

        tracing::debug!(
            user_count = data.users.len(),
            character_count = data.character_count(),
            "storage initialized"
        );

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let mut data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| HanziError::Storage(format!("failed to parse JSON: {e}")))?;

        // Hand-edited files may lag behind the stored ids.
        let max_id = data.users.values().flatten().map(|c| c.id).max().unwrap_or(0);
        data.next_id = data.next_id.max(max_id.saturating_add(1));

        tracing::debug!(version = data.version, next_id = data.next_id, "loaded storage data");
        Ok(data)
    }

    /// Writes to a temporary file, then renames it over the target.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| HanziError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "storage saved");
        Ok(())
    }
}

impl CharacterStorage for JsonStorage {
    fn add_character(&mut self, user_id: &str, fields: CharacterFields) -> Result<StoredCharacter> {
        let _span = tracing::debug_span!("json_add_character",
            user_id = %user_id,
            character = %fields.character
        ).entered();

        let id = self.data.next_id;
        self.data.next_id = id.saturating_add(1);

        let stored = StoredCharacter::new(id, fields, chrono::Utc::now().timestamp());
        self.data
            .users
            .entry(user_id.to_string())
            .or_default()
            .push(stored.clone());

        self.dirty = true;
        self.save_to_file()?;

        tracing::debug!(character_id = id, "character added");
        Ok(stored)
    }

    fn delete_character(&mut self, id: &CharacterId) -> Result<bool> {
        let _span = tracing::debug_span!("json_delete_character", character_id = %id).entered();

        let mut removed = false;
        for characters in self.data.users.values_mut() {
            let before = characters.len();
            characters.retain(|c| !c.has_id(id));
            removed |= characters.len() != before;
        }

        if removed {
            self.dirty = true;
            self.save_to_file()?;
        }

        tracing::debug!(removed = removed, "delete processed");
        Ok(removed)
    }

    fn characters_for(&self, user_id: &str) -> Result<Vec<StoredCharacter>> {
        let _span = tracing::debug_span!("json_characters_for", user_id = %user_id).entered();

        let characters: Vec<StoredCharacter> = self
            .data
            .users
            .get(user_id)
            .map(|list| list.iter().rev().cloned().collect())
            .unwrap_or_default();

        tracing::debug!(count = characters.len(), "retrieved characters");
        Ok(characters)
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(character: &str, meaning: &str) -> CharacterFields {
        CharacterFields {
            character: character.to_string(),
            pinyin: "pīn".to_string(),
            meaning: meaning.to_string(),
            example: None,
            example_meaning: None,
        }
    }

    #[test]
    fn new_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("characters.json");

        let storage = JsonStorage::new(path.clone()).unwrap();
        assert_eq!(storage.path(), path.as_path());
        assert!(path.parent().unwrap().is_dir());
        assert!(storage.characters_for("local").unwrap().is_empty());
    }

    #[test]
    fn add_persists_and_lists_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("characters.json");

        {
            let mut storage = JsonStorage::new(path.clone()).unwrap();
            let first = storage.add_character("local", fields("好", "good")).unwrap();
            let second = storage.add_character("local", fields("水", "water")).unwrap();
            assert!(second.id > first.id);
        }

        let reopened = JsonStorage::new(path).unwrap();
        let characters = reopened.characters_for("local").unwrap();
        let glyphs: Vec<&str> = characters.iter().map(|c| c.character.as_str()).collect();
        assert_eq!(glyphs, ["水", "好"]);
    }

    #[test]
    fn characters_are_scoped_per_user() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("characters.json")).unwrap();

        storage.add_character("alice", fields("火", "fire")).unwrap();
        storage.add_character("bob", fields("山", "mountain")).unwrap();

        let alice = storage.characters_for("alice").unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].character, "火");
        assert!(storage.characters_for("carol").unwrap().is_empty());
    }

    #[test]
    fn delete_unknown_id_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("characters.json")).unwrap();
        let kept = storage.add_character("local", fields("好", "good")).unwrap();

        assert!(!storage.delete_character(&CharacterId::Number(kept.id + 100)).unwrap());
        assert_eq!(storage.characters_for("local").unwrap().len(), 1);
    }

    #[test]
    fn delete_accepts_textual_id_and_ids_are_not_reused() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("characters.json")).unwrap();
        let first = storage.add_character("local", fields("好", "good")).unwrap();

        assert!(storage.delete_character(&CharacterId::Text(first.id.to_string())).unwrap());
        assert!(storage.characters_for("local").unwrap().is_empty());

        let next = storage.add_character("local", fields("水", "water")).unwrap();
        assert!(next.id > first.id);
    }

    #[test]
    fn invalid_json_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("characters.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = JsonStorage::new(path);
        assert!(matches!(result, Err(HanziError::Storage(_))));
    }

    #[test]
    fn next_id_recovers_from_stale_counter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("characters.json");
        std::fs::write(
            &path,
            r#"{"version":1,"next_id":1,"users":{"local":[
                {"id":5,"character":"好","pinyin":"hǎo","meaning":"good","created_at":0}
            ]}}"#,
        )
        .unwrap();

        let mut storage = JsonStorage::new(path).unwrap();
        let added = storage.add_character("local", fields("水", "water")).unwrap();
        assert_eq!(added.id, 6);
    }
}
