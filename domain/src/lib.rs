pub mod conversation;
pub mod models;
