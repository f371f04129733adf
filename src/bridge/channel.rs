//! Host channel abstraction and the standalone preview channel.
//!
//! The plugin never talks to its counterpart directly; it hands serialized
//! payloads to a [`HostChannel`]. Inside Zellij the channel posts to the
//! companion worker (see `main.rs`). For standalone previews the
//! [`PreviewChannel`] answers `get_characters` itself with a canned list, after
//! a fixed delay, so both modes look identical to the rest of the plugin.

use crate::bridge::messages::{HostMessage, HostReply};
use crate::domain::{CharacterId, CharacterRecord, Result};
use std::collections::VecDeque;
use std::time::Duration;

/// Delay before the preview channel delivers its canned reply.
pub const PREVIEW_REPLY_DELAY: Duration = Duration::from_millis(500);

/// A payload produced by the channel itself rather than the remote host.
///
/// The runtime delivers it through the regular receive path once `delay` has
/// elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalReply {
    pub delay: Duration,
    pub payload: String,
}

/// Opaque send primitive of the enclosing host.
pub trait HostChannel: std::fmt::Debug {
    /// Hands a serialized message to the host.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HanziError::HostUnavailable`] if the host cannot accept
    /// messages right now.
    fn send_data(&mut self, payload: &str) -> Result<()>;

    /// Takes the next reply the channel generated locally, if any.
    fn take_local_reply(&mut self) -> Option<LocalReply> {
        None
    }
}

/// Channel used outside the host environment.
///
/// Outgoing `add_character` and `delete_character` payloads are dropped (they
/// are only logged); `get_characters` queues the canned three-record reply.
#[derive(Debug, Default)]
pub struct PreviewChannel {
    queued: VecDeque<LocalReply>,
}

impl PreviewChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The example records served in preview mode.
    #[must_use]
    pub fn canned_characters() -> Vec<CharacterRecord> {
        let entry = |id: i64, character: &str, pinyin: &str, meaning: &str, example: &str, example_meaning: &str| {
            CharacterRecord {
                id: CharacterId::Number(id),
                character: character.to_string(),
                pinyin: pinyin.to_string(),
                meaning: meaning.to_string(),
                example: Some(example.to_string()),
                example_meaning: Some(example_meaning.to_string()),
            }
        };

        vec![
            entry(1, "好", "hǎo", "good", "你好", "hello"),
            entry(2, "谢", "xiè", "to thank", "谢谢", "thank you"),
            entry(3, "爱", "ài", "love", "我爱你", "I love you"),
        ]
    }
}

impl HostChannel for PreviewChannel {
    fn send_data(&mut self, payload: &str) -> Result<()> {
        match serde_json::from_str::<HostMessage>(payload) {
            Ok(HostMessage::GetCharacters { user_id }) => {
                tracing::debug!(user_id = %user_id, "preview channel queuing canned characters");
                let reply = HostReply {
                    characters: Self::canned_characters(),
                };
                let payload = serde_json::to_string(&reply)
                    .map_err(|e| crate::HanziError::HostUnavailable(format!("preview reply: {e}")))?;
                self.queued.push_back(LocalReply {
                    delay: PREVIEW_REPLY_DELAY,
                    payload,
                });
            }
            Ok(other) => {
                tracing::debug!(action = other.action_name(), "preview channel dropping action");
            }
            Err(e) => {
                tracing::debug!(error = %e, "preview channel received unknown payload");
            }
        }
        Ok(())
    }

    fn take_local_reply(&mut self) -> Option<LocalReply> {
        self.queued.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_characters_queues_a_delayed_canned_reply() {
        let mut channel = PreviewChannel::new();
        let request = serde_json::to_string(&HostMessage::get_characters("local")).unwrap();

        channel.send_data(&request).unwrap();
        let reply = channel.take_local_reply().unwrap();

        assert_eq!(reply.delay, PREVIEW_REPLY_DELAY);
        let parsed = HostReply::parse(&reply.payload).unwrap();
        assert_eq!(parsed.characters.len(), 3);
        assert!(channel.take_local_reply().is_none());
    }

    #[test]
    fn mutations_produce_no_reply() {
        let mut channel = PreviewChannel::new();
        let delete = serde_json::to_string(&HostMessage::delete_character(CharacterId::Number(1))).unwrap();

        channel.send_data(&delete).unwrap();

        assert!(channel.take_local_reply().is_none());
    }
}
