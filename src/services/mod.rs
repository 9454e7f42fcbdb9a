pub mod word_service;
