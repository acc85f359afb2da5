// State management module
// Shared handles passed to the request handlers

pub mod app_state;

pub use app_state::AppState;
