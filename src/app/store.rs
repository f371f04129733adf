//! In-memory character store for the current session.
//!
//! The store exclusively owns the ordered list of records; views borrow
//! slices or filtered references for the duration of a render and never keep
//! copies. The front of the list is the most recently added record.

use crate::domain::{CharacterId, CharacterRecord};

/// Ordered list of character records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterStore {
    records: Vec<CharacterRecord>,
}

impl CharacterStore {
    #[must_use]
    pub const fn new(records: Vec<CharacterRecord>) -> Self {
        Self { records }
    }

    /// Current records, most recent first.
    #[must_use]
    pub fn get_all(&self) -> &[CharacterRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &CharacterId) -> Option<&CharacterRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Replaces the whole list, as after the initial load.
    pub fn replace_all(&mut self, records: Vec<CharacterRecord>) {
        tracing::debug!(count = records.len(), "store replaced");
        self.records = records;
    }

    /// Prepends a record.
    pub fn add(&mut self, record: CharacterRecord) {
        tracing::debug!(id = %record.id, character = %record.character, "store add");
        self.records.insert(0, record);
    }

    /// Removes the record with `id`, returning it. No-op if absent.
    pub fn remove_by_id(&mut self, id: &CharacterId) -> Option<CharacterRecord> {
        let position = self.records.iter().position(|record| &record.id == id)?;
        let removed = self.records.remove(position);
        tracing::debug!(id = %removed.id, remaining = self.records.len(), "store remove");
        Some(removed)
    }

    /// Records matching `query`, in store order.
    ///
    /// See [`filter_records`] for the matching rules.
    #[must_use]
    pub fn filter(&self, query: &str) -> Vec<&CharacterRecord> {
        filter_records(&self.records, query)
    }
}

/// Case-insensitive substring filter over every text field of a record.
///
/// The query is trimmed first; an empty query returns every record. A record
/// matches if any of character, pinyin, meaning, example or example meaning
/// contains the query.
pub fn filter_records<'a, I>(records: I, query: &str) -> Vec<&'a CharacterRecord>
where
    I: IntoIterator<Item = &'a CharacterRecord>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.into_iter().collect();
    }

    records
        .into_iter()
        .filter(|record| record.matches_lowercase(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(id: i64, character: &str, pinyin: &str, meaning: &str) -> CharacterRecord {
        CharacterRecord {
            id: CharacterId::Number(id),
            character: character.to_string(),
            pinyin: pinyin.to_string(),
            meaning: meaning.to_string(),
            example: None,
            example_meaning: None,
        }
    }

    fn sample_store() -> CharacterStore {
        CharacterStore::new(vec![
            record(1, "好", "hǎo", "хороший"),
            record(2, "谢", "xiè", "благодарить"),
            record(3, "爱", "ài", "любовь"),
        ])
    }

    #[test]
    fn add_prepends() {
        let mut store = sample_store();
        store.add(record(4, "水", "shuǐ", "water"));

        assert_eq!(store.get_all()[0].character, "水");
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn remove_by_id_removes_exactly_one() {
        let mut store = sample_store();

        let removed = store.remove_by_id(&CharacterId::Number(2));

        assert_eq!(removed.map(|r| r.character), Some("谢".to_string()));
        assert_eq!(store.len(), 2);
        assert!(store.get(&CharacterId::Number(1)).is_some());
        assert!(store.get(&CharacterId::Number(3)).is_some());
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let mut store = sample_store();
        assert!(store.remove_by_id(&CharacterId::Number(99)).is_none());
        assert_eq!(store, sample_store());
    }

    #[test]
    fn empty_query_returns_everything() {
        let store = sample_store();
        assert_eq!(store.filter("").len(), 3);
        assert_eq!(store.filter("   ").len(), 3);
    }

    #[test]
    fn filter_is_case_insensitive_across_fields() {
        let store = sample_store();

        assert_eq!(store.filter("XIÈ").len(), 1);
        assert_eq!(store.filter("ЛЮБ")[0].character, "爱");
        assert!(store.filter("water").is_empty());
    }

    proptest! {
        #[test]
        fn filter_is_idempotent(query in "[a-zа-яǎè ]{0,4}") {
            let store = sample_store();
            let once = store.filter(&query);
            let twice = filter_records(once.iter().copied(), &query);
            prop_assert_eq!(once, twice);
        }
    }
}
