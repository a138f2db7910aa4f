// Library entry so integration tests and external tools can reference internal modules.
// Re-export the same modules used by the binary (`main.rs`).
pub mod commands;
pub mod config;
pub mod constants;
pub mod handler;
pub mod interactions;
pub mod model;
pub mod profile;
pub mod services;
pub mod ui;

pub use model::AppState;
