pub mod app;
pub mod dictionary;
pub mod word_db;
