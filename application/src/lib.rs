pub mod chat_service;
pub mod prompt;
pub mod providers;
