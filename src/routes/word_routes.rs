use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::services::word_service;
use crate::state::app::AppState;

/// Form body of `POST /word`. Missing fields read as empty strings.
#[derive(Debug, Deserialize)]
pub struct AddWordForm {
    #[serde(default)]
    pub mot: String,
    #[serde(default)]
    pub definition: String,
}

/// Form body of `POST /update/:name`.
#[derive(Debug, Deserialize)]
pub struct UpdateWordForm {
    #[serde(default)]
    pub definition: String,
}

/// Build all word routes.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/list", get(list_words))
        .route("/word", post(add_word))
        .route("/word/:name", get(get_word))
        .route("/delete/:name", delete(delete_word))
        .route("/update/:name", post(update_word))
        .with_state(state)
}

fn word_json(word: &str, definition: &str) -> Value {
    json!({
        "mot": word,
        "définition": definition,
    })
}

//
// ─────────────────────────────────────────────────────────────
// GET /list
// Every stored word with its definition, sorted by word
// ─────────────────────────────────────────────────────────────
//
async fn list_words(State(state): State<AppState>) -> Json<Vec<Value>> {
    let words = word_service::list(&state.db)
        .iter()
        .map(|(word, stored)| word_json(word, &stored.definition))
        .collect();

    Json(words)
}

//
// ─────────────────────────────────────────────────────────────
// GET /word/{name}
// Definition of one word, or 404
// ─────────────────────────────────────────────────────────────
//
async fn get_word(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> (StatusCode, Json<Value>) {
    match word_service::get(&state.db, &name) {
        Some(stored) => (StatusCode::OK, Json(word_json(&name, &stored.definition))),
        None => {
            tracing::warn!("Error retrieving word {name:?}: not found");
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Error retrieving word" })),
            )
        }
    }
}

//
// ─────────────────────────────────────────────────────────────
// POST /word  (form: mot, definition)
// Store a word in the database and in the CLI dictionary
// ─────────────────────────────────────────────────────────────
//
async fn add_word(
    State(state): State<AppState>,
    Form(form): Form<AddWordForm>,
) -> Json<Value> {
    word_service::set(&state.db, form.mot.clone(), form.definition.clone());
    state.dictionary.add(form.mot, form.definition);

    Json(json!({ "message": "Word added successfully" }))
}

//
// ─────────────────────────────────────────────────────────────
// DELETE /delete/{name}
// Remove a word from the database; absent words are fine
// ─────────────────────────────────────────────────────────────
//
async fn delete_word(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> Json<Value> {
    word_service::delete(&state.db, &name);
    Json(json!({ "msg": "Word deleted" }))
}

//
// ─────────────────────────────────────────────────────────────
// POST /update/{name}  (form: definition)
// Overwrite a word in the database only
// ─────────────────────────────────────────────────────────────
//
async fn update_word(
    Path(name): Path<String>,
    State(state): State<AppState>,
    Form(form): Form<UpdateWordForm>,
) -> Json<Value> {
    word_service::set(&state.db, name, form.definition);
    Json(json!({ "msg": "Word updated" }))
}
