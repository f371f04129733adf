//! Companion worker that answers the plugin's host messages.
//!
//! Inside Zellij the plugin's host channel posts to this worker, which runs on
//! its own thread and owns the storage file. The worker decodes the same
//! [`HostMessage`](crate::bridge::HostMessage) the plugin encodes, so the
//! protocol has a single definition.
//!
//! - `handler`: Message dispatch over a [`CharacterStorage`](crate::storage::CharacterStorage)

pub mod handler;

pub use handler::CharacterWorker;

/// Name the worker is registered under.
pub const WORKER_NAME: &str = "character";

/// Message name used in both directions between plugin and worker.
pub const MESSAGE_NAME: &str = "hanzi_cards";
