//! Side effects requested by the event handler.
//!
//! The handler never touches the host directly. It returns a `Vec<Action>`
//! which the plugin runtime executes in order after each event.
//!
//! # Example
//!
//! ```rust
//! use hanzi_cards::app::Action;
//! use hanzi_cards::bridge::HostMessage;
//! use hanzi_cards::domain::CharacterId;
//!
//! let actions = vec![
//!     Action::SendToHost(HostMessage::delete_character(CharacterId::Number(3))),
//! ];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::bridge::HostMessage;
use std::time::Duration;

/// Commands executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Asks the host bridge for the user's saved characters.
    RequestCharacters {
        user_id: String,
    },

    /// Hands a fire-and-forget message to the host bridge.
    SendToHost(HostMessage),

    /// Arms a timer that dismisses notice `seq` once it fires.
    ScheduleNoticeDismiss {
        seq: u64,
        after: Duration,
    },
}
