//! Chat Relay Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod chat;
pub mod completion;
pub mod config;
pub mod error;
pub mod platform;
pub mod relay;
/// Application state management
///
/// Holds the process-wide client handles injected into handlers.
pub mod state;
