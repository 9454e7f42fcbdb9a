use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;

/// A word as kept in the durable database.
///
/// `created_at` is the Unix timestamp (seconds since epoch) at which
/// the word was last written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredWord {
    pub definition: String,
    pub created_at: i64,
}

/// Internal HashMap type.
pub type WordMap = HashMap<String, StoredWord>;

/// Shared word database handle used by the HTTP layer and persistence tasks.
pub type WordDb = Arc<RwLock<WordMap>>;

/// Create a new, empty database.
pub fn new_db() -> WordDb {
    Arc::new(RwLock::new(HashMap::new()))
}
