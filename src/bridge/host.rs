//! Host bridge: outgoing actions and the single outstanding load request.
//!
//! The host channel has no request ids, so the bridge supports exactly one
//! pending `get_characters` at a time. The first reply resolves the pending
//! request; anything arriving while nothing is pending is ignored.

use crate::bridge::channel::{HostChannel, LocalReply};
use crate::bridge::messages::{HostMessage, HostReply};
use crate::domain::{CharacterRecord, HanziError, Result};

/// Bookkeeping for the outstanding `get_characters` request.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingLoad {
    user_id: String,
}

/// Wraps a [`HostChannel`] with serialization and reply correlation.
#[derive(Debug)]
pub struct HostBridge<C: HostChannel> {
    channel: C,
    pending: Option<PendingLoad>,
}

impl<C: HostChannel> HostBridge<C> {
    pub const fn new(channel: C) -> Self {
        Self {
            channel,
            pending: None,
        }
    }

    /// Returns `true` while a `get_characters` request awaits its reply.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Asks the host for the user's saved characters.
    ///
    /// The result is delivered later through [`Self::receive`]. A new request
    /// replaces any request still pending; the stale reply, if it ever
    /// arrives, resolves the new one.
    ///
    /// # Errors
    ///
    /// Returns [`HanziError::HostUnavailable`] if the channel refuses the
    /// message; no request is left pending in that case.
    pub fn request_initial_characters(&mut self, user_id: &str) -> Result<()> {
        let _span = tracing::debug_span!("request_initial_characters", user_id = %user_id).entered();

        let payload = Self::serialize(&HostMessage::get_characters(user_id))?;
        self.channel.send_data(&payload)?;

        if self.pending.is_some() {
            tracing::debug!("replacing pending character request");
        }
        self.pending = Some(PendingLoad {
            user_id: user_id.to_string(),
        });
        Ok(())
    }

    /// Sends a fire-and-forget action.
    ///
    /// Failures are logged and otherwise swallowed; callers apply their
    /// optimistic updates regardless.
    pub fn send_action(&mut self, message: &HostMessage) {
        let _span = tracing::debug_span!("send_action", action = message.action_name()).entered();

        let result = Self::serialize(message).and_then(|payload| self.channel.send_data(&payload));
        match result {
            Ok(()) => tracing::debug!("action handed to host"),
            Err(e) => tracing::warn!(error = %e, "failed to hand action to host"),
        }
    }

    /// Routes a payload received from the host.
    ///
    /// Returns `None` if no request is pending (the payload is ignored),
    /// otherwise resolves the pending request with the parsed characters or
    /// the parse failure.
    pub fn receive(&mut self, payload: &str) -> Option<Result<Vec<CharacterRecord>>> {
        let Some(pending) = self.pending.take() else {
            tracing::debug!(payload_len = payload.len(), "ignoring host message with no pending request");
            return None;
        };

        let outcome = HostReply::parse(payload).map(|reply| reply.characters);
        match &outcome {
            Ok(characters) => tracing::debug!(
                user_id = %pending.user_id,
                count = characters.len(),
                "initial characters received"
            ),
            Err(e) => tracing::warn!(user_id = %pending.user_id, error = %e, "initial character load failed"),
        }
        Some(outcome)
    }

    /// Takes the next locally generated reply from the channel.
    pub fn take_local_reply(&mut self) -> Option<LocalReply> {
        self.channel.take_local_reply()
    }

    /// Mutable access to the underlying channel.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    fn serialize(message: &HostMessage) -> Result<String> {
        serde_json::to_string(message)
            .map_err(|e| HanziError::HostUnavailable(format!("failed to serialize {}: {e}", message.action_name())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::channel::PreviewChannel;
    use crate::domain::CharacterId;

    /// Channel that records payloads and can be switched off.
    #[derive(Debug, Default)]
    struct RecordingChannel {
        sent: Vec<String>,
        refuse: bool,
    }

    impl HostChannel for RecordingChannel {
        fn send_data(&mut self, payload: &str) -> Result<()> {
            if self.refuse {
                return Err(HanziError::HostUnavailable("not ready".to_string()));
            }
            self.sent.push(payload.to_string());
            Ok(())
        }
    }

    const REPLY: &str = r#"{"characters": [{"id": 1, "character": "好", "pinyin": "hǎo", "meaning": "good"}]}"#;

    #[test]
    fn request_sends_get_characters_and_waits() {
        let mut bridge = HostBridge::new(RecordingChannel::default());

        bridge.request_initial_characters("u-9").unwrap();

        assert!(bridge.is_loading());
        assert_eq!(
            bridge.channel_mut().sent,
            vec![r#"{"action":"get_characters","user_id":"u-9"}"#.to_string()]
        );
    }

    #[test]
    fn first_reply_resolves_and_second_is_ignored() {
        let mut bridge = HostBridge::new(RecordingChannel::default());
        bridge.request_initial_characters("u").unwrap();

        let first = bridge.receive(REPLY).unwrap().unwrap();
        let second = bridge.receive(REPLY);

        assert_eq!(first.len(), 1);
        assert!(second.is_none());
        assert!(!bridge.is_loading());
    }

    #[test]
    fn unsolicited_reply_is_ignored() {
        let mut bridge = HostBridge::new(RecordingChannel::default());
        assert!(bridge.receive(REPLY).is_none());
    }

    #[test]
    fn malformed_reply_fails_the_pending_request() {
        let mut bridge = HostBridge::new(RecordingChannel::default());
        bridge.request_initial_characters("u").unwrap();

        let outcome = bridge.receive(r#"{"items": []}"#).unwrap();

        assert!(matches!(outcome, Err(HanziError::MalformedResponse(_))));
        assert!(!bridge.is_loading());
    }

    #[test]
    fn refused_request_is_host_unavailable_and_not_pending() {
        let mut bridge = HostBridge::new(RecordingChannel {
            refuse: true,
            ..RecordingChannel::default()
        });

        let err = bridge.request_initial_characters("u").unwrap_err();

        assert!(matches!(err, HanziError::HostUnavailable(_)));
        assert!(!bridge.is_loading());
    }

    #[test]
    fn send_action_serializes_flat_object() {
        let mut bridge = HostBridge::new(RecordingChannel::default());

        bridge.send_action(&HostMessage::delete_character(CharacterId::Number(5)));

        assert_eq!(
            bridge.channel_mut().sent,
            vec![r#"{"action":"delete_character","character_id":5}"#.to_string()]
        );
    }

    #[test]
    fn preview_channel_reply_flows_through_receive() {
        let mut bridge = HostBridge::new(PreviewChannel::new());
        bridge.request_initial_characters("local").unwrap();

        let reply = bridge.take_local_reply().unwrap();
        let characters = bridge.receive(&reply.payload).unwrap().unwrap();

        assert_eq!(characters, PreviewChannel::canned_characters());
    }
}
