//! Storage layer for the companion worker.
//!
//! Characters are persisted per user in a single JSON file. Only the worker
//! thread touches storage; the plugin itself keeps everything in memory.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage implementation
//! - `models`: Stored record type, separate from the wire record

pub mod backend;
pub mod json;
pub mod models;

pub use backend::CharacterStorage;
pub use json::JsonStorage;
pub use models::StoredCharacter;
