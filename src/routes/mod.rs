pub mod system_routes;
pub mod word_routes;
