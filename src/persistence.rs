use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use chrono::Utc;
use serde_json::Value;
use tokio::fs;
use tokio::time::{sleep, Duration};

use crate::errors::PersistenceError;
use crate::services::word_service;
use crate::state::word_db::{StoredWord, WordDb, WordMap};

/// Load the snapshot at `path` into `db`, replacing its content.
///
/// `retention_seconds`:
/// - If `Some`, words older than `now - retention_seconds` are dropped.
/// - If `None`, everything in the snapshot is loaded.
///
/// A missing file is not an error: the database simply stays empty.
/// On a parse error the database is left untouched.
pub async fn load_snapshot(
    path: &str,
    db: &WordDb,
    retention_seconds: Option<u64>,
) -> Result<usize, PersistenceError> {
    let data = match fs::read_to_string(path).await {
        Ok(d) => d,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("No snapshot found at startup (path = {})", path);
            return Ok(0);
        }
        Err(e) => return Err(e.into()),
    };

    let json: Value = serde_json::from_str(&data)?;
    let obj = json.as_object().ok_or(PersistenceError::NotAnObject)?;

    let now = Utc::now().timestamp();
    let max_age = retention_seconds.map(max_age_seconds);

    let mut loaded = WordMap::with_capacity(obj.len());

    for (word, v) in obj {
        let entry = match v {
            // { "definition": "...", "created_at": 1700000000 }
            Value::Object(fields) => StoredWord {
                definition: fields
                    .get("definition")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                created_at: fields
                    .get("created_at")
                    .and_then(Value::as_i64)
                    .unwrap_or(now),
            },
            // "definition" with no metadata
            Value::String(s) => StoredWord {
                definition: s.clone(),
                created_at: now,
            },
            other => {
                tracing::warn!("Skipping word {word:?}: unexpected snapshot value {other}");
                continue;
            }
        };

        if let Some(max_age_sec) = max_age {
            if is_expired(entry.created_at, now, max_age_sec) {
                continue;
            }
        }

        loaded.insert(word.clone(), entry);
    }

    let count = loaded.len();
    *word_service::write(db) = loaded;

    tracing::info!("Loaded snapshot: {} words", count);
    Ok(count)
}

/// Write every word in `db` to `path` as pretty JSON.
///
/// The parent directory is created when missing. The lock is released
/// before any I/O happens.
pub async fn save_snapshot(path: &str, db: &WordDb) -> Result<(), PersistenceError> {
    let json = {
        let map = word_service::read(db);
        let sorted: BTreeMap<&String, &StoredWord> = map.iter().collect();
        serde_json::to_string_pretty(&sorted)?
    };

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    fs::write(path, json).await?;
    tracing::debug!("Snapshot saved to {}", path);
    Ok(())
}

/// Background task that periodically saves the snapshot.
pub async fn autosave_loop(path: String, db: WordDb, every_sec: u64) {
    loop {
        sleep(Duration::from_secs(every_sec)).await;
        if let Err(e) = save_snapshot(&path, &db).await {
            tracing::warn!("Autosave failed: {e}");
        }
    }
}

/// Background task that periodically removes words older than
/// `retention_seconds`.
///
/// If `retention_seconds` is `0`, everything is immediately expired.
pub async fn cleanup_loop(db: WordDb, retention_seconds: u64, every_sec: u64) {
    if retention_seconds == 0 {
        tracing::warn!("cleanup_loop started with retention_seconds = 0; all words will be removed");
    }

    loop {
        sleep(Duration::from_secs(every_sec)).await;

        let removed = purge_expired(&db, retention_seconds, Utc::now().timestamp());
        if removed > 0 {
            tracing::info!(
                "Cleanup: removed {} expired words ({} remaining)",
                removed,
                word_service::count(&db)
            );
        }
    }
}

/// Delete words whose age at `now` exceeds `retention_seconds`.
/// Returns how many were removed.
pub fn purge_expired(db: &WordDb, retention_seconds: u64, now: i64) -> usize {
    let max_age = max_age_seconds(retention_seconds);

    let mut map = word_service::write(db);
    let before = map.len();
    map.retain(|_w, entry| !is_expired(entry.created_at, now, max_age));

    before - map.len()
}

/// Retention windows past `i64::MAX` seconds are treated as unbounded.
fn max_age_seconds(retention_seconds: u64) -> i64 {
    i64::try_from(retention_seconds).unwrap_or(i64::MAX)
}

// `created_at` comes from the snapshot file unchecked, so the age saturates.
fn is_expired(created_at: i64, now: i64, max_age: i64) -> bool {
    now.saturating_sub(created_at) > max_age
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::word_db::new_db;
    use tempfile::TempDir;

    fn snapshot_path(dir: &TempDir) -> String {
        dir.path().join("db").join("words.json").to_string_lossy().into_owned()
    }

    fn insert(db: &WordDb, word: &str, definition: &str, created_at: i64) {
        word_service::write(db).insert(
            word.to_string(),
            StoredWord {
                definition: definition.to_string(),
                created_at,
            },
        );
    }

    #[tokio::test]
    async fn save_then_load_restores_every_word() {
        let dir = TempDir::new().unwrap();
        let path = snapshot_path(&dir);

        let db = new_db();
        word_service::set(&db, "java".into(), "a programming language".into());
        word_service::set(&db, "rust".into(), "another one".into());
        save_snapshot(&path, &db).await.unwrap();

        let restored = new_db();
        let loaded = load_snapshot(&path, &restored, None).await.unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(word_service::get(&restored, "java"), word_service::get(&db, "java"));
        assert_eq!(word_service::get(&restored, "rust"), word_service::get(&db, "rust"));
    }

    #[tokio::test]
    async fn missing_snapshot_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let db = new_db();

        let loaded = load_snapshot(&snapshot_path(&dir), &db, None).await.unwrap();
        assert_eq!(loaded, 0);
        assert_eq!(word_service::count(&db), 0);
    }

    #[tokio::test]
    async fn invalid_snapshot_leaves_db_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("words.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let db = new_db();
        word_service::set(&db, "keep".into(), "me".into());

        let err = load_snapshot(path.to_str().unwrap(), &db, None).await.unwrap_err();
        assert!(matches!(err, PersistenceError::NotAnObject));

        std::fs::write(&path, "{ not json").unwrap();
        let err = load_snapshot(path.to_str().unwrap(), &db, None).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Json(_)));

        assert_eq!(word_service::get(&db, "keep").unwrap().definition, "me");
    }

    #[tokio::test]
    async fn load_accepts_plain_string_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("words.json");
        std::fs::write(&path, r#"{ "java": "a programming language", "bad": 42 }"#).unwrap();

        let db = new_db();
        let loaded = load_snapshot(path.to_str().unwrap(), &db, Some(60)).await.unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(
            word_service::get(&db, "java").unwrap().definition,
            "a programming language"
        );
    }

    #[tokio::test]
    async fn load_skips_words_past_retention() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("words.json");
        let now = Utc::now().timestamp();
        std::fs::write(
            &path,
            format!(
                r#"{{
                    "old": {{ "definition": "stale", "created_at": {} }},
                    "new": {{ "definition": "fresh", "created_at": {} }}
                }}"#,
                now - 3600,
                now
            ),
        )
        .unwrap();

        let db = new_db();
        let loaded = load_snapshot(path.to_str().unwrap(), &db, Some(60)).await.unwrap();

        assert_eq!(loaded, 1);
        assert!(word_service::get(&db, "old").is_none());
        assert_eq!(word_service::get(&db, "new").unwrap().definition, "fresh");
    }

    #[test]
    fn purge_expired_drops_only_stale_words() {
        let db = new_db();
        insert(&db, "old", "stale", 1_000);
        insert(&db, "edge", "exactly at the limit", 1_040);
        insert(&db, "new", "fresh", 1_090);

        let removed = purge_expired(&db, 60, 1_100);

        assert_eq!(removed, 1);
        assert!(word_service::get(&db, "old").is_none());
        assert!(word_service::get(&db, "edge").is_some());
        assert!(word_service::get(&db, "new").is_some());
    }

    #[tokio::test]
    async fn load_survives_extreme_timestamps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("words.json");
        std::fs::write(
            &path,
            format!(
                r#"{{
                    "ancient": {{ "definition": "x", "created_at": {} }},
                    "future": {{ "definition": "y", "created_at": {} }}
                }}"#,
                i64::MIN,
                i64::MAX
            ),
        )
        .unwrap();

        let db = new_db();
        let loaded = load_snapshot(path.to_str().unwrap(), &db, Some(60)).await.unwrap();

        assert_eq!(loaded, 1);
        assert!(word_service::get(&db, "ancient").is_none());
        assert!(word_service::get(&db, "future").is_some());
    }

    #[test]
    fn purge_handles_extreme_timestamps() {
        let db = new_db();
        insert(&db, "ancient", "x", i64::MIN);
        insert(&db, "future", "y", i64::MAX);

        assert_eq!(purge_expired(&db, 60, i64::MAX), 1);
        assert!(word_service::get(&db, "ancient").is_none());
        assert!(word_service::get(&db, "future").is_some());
    }

    #[test]
    fn maximal_retention_keeps_every_word() {
        let db = new_db();
        let now = Utc::now().timestamp();
        insert(&db, "fresh", "just written", now - 1);
        insert(&db, "epoch", "old but kept", 0);

        assert_eq!(purge_expired(&db, u64::MAX, now), 0);
        assert_eq!(word_service::count(&db), 2);
    }

    #[tokio::test]
    async fn load_with_maximal_retention_keeps_every_word() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("words.json");
        std::fs::write(&path, r#"{ "epoch": { "definition": "old", "created_at": 0 } }"#).unwrap();

        let db = new_db();
        let loaded = load_snapshot(path.to_str().unwrap(), &db, Some(u64::MAX)).await.unwrap();

        assert_eq!(loaded, 1);
    }

    #[test]
    fn purge_with_zero_retention_clears_older_words() {
        let db = new_db();
        insert(&db, "a", "1", 10);
        insert(&db, "b", "2", 20);

        assert_eq!(purge_expired(&db, 0, 21), 2);
        assert_eq!(word_service::count(&db), 0);
    }
}
