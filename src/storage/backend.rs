//! Storage backend abstraction.
//!
//! [`CharacterStorage`] covers exactly the three operations the host channel
//! exposes: add, delete and list. Each method maps to one action message.

use crate::domain::error::Result;
use crate::domain::{CharacterFields, CharacterId};
use crate::storage::models::StoredCharacter;

/// Abstraction over persistent character storage.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes
///
/// # Examples
///
/// ```no_run
/// use hanzi_cards::storage::{CharacterStorage, JsonStorage};
/// use std::path::PathBuf;
///
/// let storage = JsonStorage::new(PathBuf::from("/tmp/characters.json"))?;
/// let saved = storage.characters_for("local")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait CharacterStorage: Send {
    /// Stores a new character for `user_id` and returns it with its
    /// storage-assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn add_character(&mut self, user_id: &str, fields: CharacterFields) -> Result<StoredCharacter>;

    /// Deletes the character with `id`, whichever user owns it.
    ///
    /// Returns `Ok(false)` when no stored character has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn delete_character(&mut self, id: &CharacterId) -> Result<bool>;

    /// Returns the characters saved by `user_id`, most recently added first.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn characters_for(&self, user_id: &str) -> Result<Vec<StoredCharacter>>;
}
