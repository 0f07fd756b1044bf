pub mod jina_service;
pub mod open_ai_service;
