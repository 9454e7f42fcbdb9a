use super::dictionary::SharedDictionary;
use super::word_db::WordDb;

/// State handed to the word routes.
#[derive(Clone)]
pub struct AppState {
    /// Durable database behind every HTTP route.
    pub db: WordDb,

    /// In-memory dictionary the CLI works on. Only `POST /word` writes to it.
    pub dictionary: SharedDictionary,
}

impl AppState {
    pub fn new(db: WordDb, dictionary: SharedDictionary) -> Self {
        Self { db, dictionary }
    }
}
