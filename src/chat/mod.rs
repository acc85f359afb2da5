//! Chat module
//!
//! Handles user and chat-turn storage using a SQLite database.

pub mod db;
pub mod models;

pub use db::ChatDb;
pub use models::{ChatTurn, User};
