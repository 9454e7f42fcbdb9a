use std::sync::{PoisonError, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::state::word_db::{StoredWord, WordDb, WordMap};

// Every mutation is a single map call, so a poisoned lock still guards a
// consistent map.
pub(crate) fn read(db: &WordDb) -> RwLockReadGuard<'_, WordMap> {
    db.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write(db: &WordDb) -> RwLockWriteGuard<'_, WordMap> {
    db.write().unwrap_or_else(PoisonError::into_inner)
}

/// Set `word` to `definition`, stamping the current time.
pub fn set(db: &WordDb, word: String, definition: String) {
    let entry = StoredWord {
        definition,
        created_at: Utc::now().timestamp(),
    };

    let replaced = write(db).insert(word.clone(), entry).is_some();
    tracing::debug!(word = %word, replaced, "word stored");
}

/// Look up a word.
pub fn get(db: &WordDb, word: &str) -> Option<StoredWord> {
    read(db).get(word).cloned()
}

/// Delete a word. Returns whether it existed.
pub fn delete(db: &WordDb, word: &str) -> bool {
    let existed = write(db).remove(word).is_some();
    tracing::debug!(word = %word, existed, "word deleted");
    existed
}

/// All words with their stored entries, sorted by word.
pub fn list(db: &WordDb) -> Vec<(String, StoredWord)> {
    let mut words: Vec<_> = read(db)
        .iter()
        .map(|(w, entry)| (w.clone(), entry.clone()))
        .collect();

    words.sort_by(|a, b| a.0.cmp(&b.0));
    words
}

/// Number of stored words.
pub fn count(db: &WordDb) -> usize {
    read(db).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::word_db::new_db;

    #[test]
    fn set_then_get() {
        let db = new_db();
        set(&db, "java".into(), "a programming language".into());

        let stored = get(&db, "java").unwrap();
        assert_eq!(stored.definition, "a programming language");
        assert!((Utc::now().timestamp() - stored.created_at).abs() < 5);
    }

    #[test]
    fn set_overwrites() {
        let db = new_db();
        set(&db, "w".into(), "d1".into());
        set(&db, "w".into(), "d2".into());

        assert_eq!(get(&db, "w").unwrap().definition, "d2");
        assert_eq!(count(&db), 1);
    }

    #[test]
    fn delete_reports_existence() {
        let db = new_db();
        set(&db, "w".into(), "d".into());

        assert!(delete(&db, "w"));
        assert!(!delete(&db, "w"));
        assert!(get(&db, "w").is_none());
    }

    #[test]
    fn list_is_sorted() {
        let db = new_db();
        for word in ["pear", "apple", "mango"] {
            set(&db, word.into(), format!("a {word}"));
        }

        let words: Vec<_> = list(&db).into_iter().map(|(w, _)| w).collect();
        assert_eq!(words, vec!["apple", "mango", "pear"]);
    }
}
