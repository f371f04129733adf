//! Zellij plugin wrapper and entry point.
//!
//! Thin integration layer between the `hanzi_cards` library and Zellij. It
//! implements `ZellijPlugin` for the UI and `ZellijWorker` for the storage
//! side, and is the only place that calls Zellij host functions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │
//! │  │  State (plugin)  │   │  ← UI state, event handling
//! │  └──────────────────┘   │
//! │          │ HostMessage  │
//! │          ▼ (JSON)       │
//! │  ┌──────────────────┐   │
//! │  │  StorageWorker   │   │  ← Owns characters.json
//! │  │ (worker thread)  │   │
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`, pick the
//!    worker or preview channel
//! 2. **Subscribe**: Register for Key, Timer, `CustomMessage` and permission events
//! 3. **Host Ready**: After permissions are granted (immediately in preview
//!    mode) send `get_characters`
//! 4. **Update**: Map Zellij events to library events, execute returned actions
//! 5. **Render**: Call library render function
//!
//! # Timers
//!
//! Zellij reports every timer as the same `Timer` event. Notice dismissals
//! and preview replies are queued in a `TimerQueue` and matched to firings
//! in deadline order.
//!
//! # Keybindings
//!
//! Global (outside text input):
//! - `1`/`2`/`3` or `Tab`: Switch tab
//! - `q`: Hide plugin
//!
//! Characters tab:
//! - Arrows or `h`/`j`/`k`/`l`: Move selection (`Ctrl+n`/`Ctrl+p` also move)
//! - `Enter`: Open detail, `d` then `y`/`n` to delete
//! - `/`: Search, `Enter` to apply, `Esc` to clear
//!
//! Add tab:
//! - Type into the focused field, `Tab`/`Shift+Tab` to move, `Enter` to save,
//!   `Esc` back to the list
//!
//! Practice tab:
//! - `1`-`4`: Answer, `Enter`/`n`: Next, `m`: Switch direction, `r`: Restart

#![allow(clippy::multiple_crate_versions)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use zellij_tile::prelude::*;
use zellij_tile::shim::{post_message_to, post_message_to_plugin};

use hanzi_cards::bridge::{HostBridge, HostChannel, LocalReply, PreviewChannel};
use hanzi_cards::infrastructure::{paths, TimerPurpose, TimerQueue};
use hanzi_cards::storage::JsonStorage;
use hanzi_cards::worker::{CharacterWorker, MESSAGE_NAME, WORKER_NAME};
use hanzi_cards::{handle_event, Action, Config, Event, HanziError, KeyInput};

register_plugin!(State);
register_worker!(StorageWorker, character_worker, CHARACTER_WORKER);

/// Host channel backed by the companion worker.
///
/// Refuses messages until Zellij has granted the plugin's permissions.
#[derive(Debug, Default)]
struct WorkerChannel {
    ready: bool,
}

impl HostChannel for WorkerChannel {
    fn send_data(&mut self, payload: &str) -> hanzi_cards::Result<()> {
        if !self.ready {
            return Err(HanziError::HostUnavailable(
                "worker not reachable before permissions are granted".to_string(),
            ));
        }

        tracing::debug!(payload_len = payload.len(), "posting message to worker");
        post_message_to(PluginMessage {
            worker_name: Some(WORKER_NAME.to_string()),
            name: MESSAGE_NAME.to_string(),
            payload: payload.to_string(),
        });
        Ok(())
    }
}

/// The two channel flavours, chosen at load time.
#[derive(Debug)]
enum Channel {
    Worker(WorkerChannel),
    Preview(PreviewChannel),
}

impl HostChannel for Channel {
    fn send_data(&mut self, payload: &str) -> hanzi_cards::Result<()> {
        match self {
            Self::Worker(channel) => channel.send_data(payload),
            Self::Preview(channel) => channel.send_data(payload),
        }
    }

    fn take_local_reply(&mut self) -> Option<LocalReply> {
        match self {
            Self::Worker(channel) => channel.take_local_reply(),
            Self::Preview(channel) => channel.take_local_reply(),
        }
    }
}

/// Plugin state wrapper.
///
/// Wraps the library's `AppState` with the Zellij-specific host channel and
/// timer bookkeeping.
struct State {
    /// Core application state from library layer.
    app: hanzi_cards::AppState,

    bridge: HostBridge<Channel>,

    timers: TimerQueue<TimerPurpose>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            app: hanzi_cards::initialize(&Config::default()),
            bridge: HostBridge::new(Channel::Worker(WorkerChannel::default())),
            timers: TimerQueue::new(),
        }
    }
}

impl ZellijPlugin for State {
    /// Initializes the plugin on load.
    ///
    /// # Permissions
    ///
    /// - `ChangeApplicationState`: Hide the plugin pane
    /// - `FullHdAccess`: Let the worker write under `~/.local/share/zellij`
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        hanzi_cards::observability::init_tracing(&config);

        let _span = tracing::debug_span!("plugin_load").entered();
        tracing::debug!(user_id = %config.user_id, preview = config.preview, "parsed configuration");

        self.app = hanzi_cards::initialize(&config);

        request_permission(&[PermissionType::ChangeApplicationState, PermissionType::FullHdAccess]);
        subscribe(&[
            EventType::Key,
            EventType::Timer,
            EventType::CustomMessage,
            EventType::PermissionRequestResult,
        ]);

        if config.preview {
            tracing::info!("running in preview mode, changes are not persisted");
            self.bridge = HostBridge::new(Channel::Preview(PreviewChannel::new()));
            self.dispatch(&Event::HostReady);
        }

        tracing::debug!("plugin load complete");
    }

    /// Translates Zellij events to library events. Returns `true` if the UI
    /// should re-render.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let _span = tracing::debug_span!("plugin_update_event", event_type = %event_name).entered();

        match event {
            zellij_tile::prelude::Event::Key(ref key) => match Self::map_key_event(key) {
                Some(key) => self.dispatch(&Event::Key(key)),
                None => false,
            },
            zellij_tile::prelude::Event::Timer(elapsed) => self.handle_timer(elapsed),
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                if message == MESSAGE_NAME {
                    self.receive(&payload)
                } else {
                    tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
                    false
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(permissions) => {
                self.handle_permission_result(permissions)
            }
            _ => false,
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        self.app.set_viewport(rows, cols);
        hanzi_cards::ui::render(&self.app, rows, cols);
    }
}

impl State {
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::Timer(_) => "Timer".to_string(),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Other".to_string(),
        }
    }

    /// Maps Zellij keys to library keys. Ctrl combinations other than
    /// `Ctrl+n`/`Ctrl+p` are ignored so they never end up in text input.
    fn map_key_event(key: &KeyWithModifier) -> Option<KeyInput> {
        tracing::trace!(bare_key = ?key.bare_key, "key event");

        if key.has_modifiers(&[KeyModifier::Ctrl]) {
            return match key.bare_key {
                BareKey::Char('n') => Some(KeyInput::Down),
                BareKey::Char('p') => Some(KeyInput::Up),
                _ => None,
            };
        }

        Some(match key.bare_key {
            BareKey::Tab if key.has_modifiers(&[KeyModifier::Shift]) => KeyInput::BackTab,
            BareKey::Tab => KeyInput::Tab,
            BareKey::Enter => KeyInput::Enter,
            BareKey::Esc => KeyInput::Esc,
            BareKey::Backspace => KeyInput::Backspace,
            BareKey::Up => KeyInput::Up,
            BareKey::Down => KeyInput::Down,
            BareKey::Left => KeyInput::Left,
            BareKey::Right => KeyInput::Right,
            BareKey::Char(c) => KeyInput::Char(c),
            _ => return None,
        })
    }

    fn handle_permission_result(&mut self, permissions: PermissionStatus) -> bool {
        if !matches!(self.bridge.channel_mut(), Channel::Worker(_)) {
            return false;
        }

        match permissions {
            PermissionStatus::Granted => {
                tracing::debug!("permissions granted, loading characters");
                if let Channel::Worker(channel) = self.bridge.channel_mut() {
                    channel.ready = true;
                }
                self.dispatch(&Event::HostReady)
            }
            PermissionStatus::Denied => {
                tracing::warn!("permissions denied, worker unavailable");
                self.dispatch(&Event::CharactersLoadFailed {
                    reason: "permissions denied".to_string(),
                })
            }
        }
    }

    fn handle_timer(&mut self, elapsed: f64) -> bool {
        match self.timers.fire() {
            Some(TimerPurpose::DismissNotice(seq)) => self.dispatch(&Event::NoticeExpired { seq }),
            Some(TimerPurpose::DeliverLocalReply(payload)) => self.receive(&payload),
            None => {
                tracing::debug!(elapsed = elapsed, "timer fired with nothing pending");
                false
            }
        }
    }

    /// Routes a host payload through the bridge into the application.
    fn receive(&mut self, payload: &str) -> bool {
        match self.bridge.receive(payload) {
            Some(Ok(characters)) => self.dispatch(&Event::CharactersLoaded(characters)),
            Some(Err(e)) => self.dispatch(&Event::CharactersLoadFailed { reason: e.to_string() }),
            None => false,
        }
    }

    /// Runs the library event handler and executes the resulting actions.
    fn dispatch(&mut self, event: &Event) -> bool {
        match handle_event(&mut self.app, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render = should_render,
                    "event handled successfully"
                );
                let mut render = should_render;
                for action in actions {
                    render |= self.execute_action(action);
                }
                render
            }
            Err(e) => {
                tracing::error!(error = %e, "error handling event");
                false
            }
        }
    }

    /// Executes an action returned from event handling. Returns `true` if
    /// executing it changed state that needs a render.
    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&mut self, action: Action) -> bool {
        match action {
            Action::CloseFocus => {
                hide_self();
                false
            }
            Action::RequestCharacters { user_id } => {
                match self.bridge.request_initial_characters(&user_id) {
                    Ok(()) => {
                        self.arm_local_replies();
                        false
                    }
                    Err(e) => self.dispatch(&Event::CharactersLoadFailed { reason: e.to_string() }),
                }
            }
            Action::SendToHost(message) => {
                self.bridge.send_action(&message);
                self.arm_local_replies();
                false
            }
            Action::ScheduleNoticeDismiss { seq, after } => {
                self.schedule(after, TimerPurpose::DismissNotice(seq));
                false
            }
        }
    }

    fn arm_local_replies(&mut self) {
        while let Some(reply) = self.bridge.take_local_reply() {
            self.schedule(reply.delay, TimerPurpose::DeliverLocalReply(reply.payload));
        }
    }

    fn schedule(&mut self, after: std::time::Duration, purpose: TimerPurpose) {
        tracing::trace!(after_ms = after.as_millis(), purpose = ?purpose, "arming timer");
        self.timers.schedule(Instant::now(), after, purpose);
        set_timeout(after.as_secs_f64());
    }
}

/// Worker thread entry point.
///
/// Storage is opened lazily on the first message, since the worker is
/// constructed before the plugin's permissions are settled.
#[derive(Default, Serialize, Deserialize)]
struct StorageWorker {
    #[serde(skip)]
    worker: Option<CharacterWorker<JsonStorage>>,
}

impl StorageWorker {
    fn worker(&mut self) -> Option<&mut CharacterWorker<JsonStorage>> {
        if self.worker.is_none() {
            hanzi_cards::observability::init_tracing(&Config::default());
            match JsonStorage::new(paths::storage_file()) {
                Ok(storage) => self.worker = Some(CharacterWorker::new(storage)),
                Err(e) => {
                    tracing::error!(error = %e, "failed to open character storage");
                    return None;
                }
            }
        }
        self.worker.as_mut()
    }
}

impl ZellijWorker<'_> for StorageWorker {
    fn on_message(&mut self, message: String, payload: String) {
        if message != MESSAGE_NAME {
            return;
        }

        let reply = match self.worker() {
            Some(worker) => worker.handle_payload(&payload),
            None => Some(
                serde_json::json!({ "error": "character storage unavailable" }).to_string(),
            ),
        };

        if let Some(payload) = reply {
            post_message_to_plugin(PluginMessage {
                name: message,
                payload,
                worker_name: None,
            });
        }
    }
}
