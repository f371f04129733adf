//! Host bridge between the plugin and its counterpart.
//!
//! - `messages`: Wire types (`add_character`, `delete_character`,
//!   `get_characters`, and the `characters` reply)
//! - `channel`: The [`HostChannel`] send primitive and the standalone
//!   [`PreviewChannel`]
//! - `host`: [`HostBridge`], which serializes actions and correlates the
//!   single outstanding load request

pub mod channel;
pub mod host;
pub mod messages;

pub use channel::{HostChannel, LocalReply, PreviewChannel, PREVIEW_REPLY_DELAY};
pub use host::HostBridge;
pub use messages::{HostMessage, HostReply};
