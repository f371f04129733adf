//! hanzi-cards: a Zellij plugin for studying Chinese characters.
//!
//! The plugin keeps a personal collection of characters and offers:
//! - A card grid of saved characters with substring search and a detail view
//! - A form for adding characters (glyph, pinyin, meaning, optional example)
//! - Multiple-choice practice in two directions with a final accuracy score
//! - Persistence through a companion worker that owns a JSON file

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling and key routing                   │
//! │  - Store, form, search, quiz                        │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Host Bridge   │   │ Worker Layer  │
//! │ (ui/)         │   │ (bridge/)     │   │ (worker/)     │
//! │ - Rendering   │   │ - Wire schema │   │ - Dispatch    │
//! │ - Theming     │   │ - Load reply  │   │ - Storage     │
//! │ - Components  │   │ - Preview     │   │   (storage/)  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Sandbox paths, timer queue (infrastructure/)     │
//! │  - Character records, errors (domain/)              │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing-subscriber to a rotating log file        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`bridge`]: Messages to and from the host, and the preview channel
//! - [`domain`]: Character records and errors
//! - [`infrastructure`]: Sandbox paths and timer demultiplexing
//! - [`storage`]: JSON persistence used by the worker
//! - [`worker`]: Storage-side message dispatch
//! - [`ui`]: Terminal rendering with theme support
//! - [`observability`]: Log file setup
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/hanzi-cards.wasm" {
//!         user_id "local"
//!         notice_seconds "3"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! Set `preview "true"` to run without the worker: the plugin then shows three
//! built-in example characters and discards changes.
//!
//! # Initialization Flow
//!
//! 1. **Plugin Load** (`main.rs`): parse configuration, initialize tracing,
//!    build `AppState`, request permissions, subscribe to events.
//! 2. **Host Ready**: once permissions are granted (or immediately in preview
//!    mode) the plugin sends `get_characters` and shows its loading state.
//! 3. **Worker Processing**: the worker answers with the user's characters,
//!    newest first; adds and deletes are applied locally first and only
//!    forwarded.
//! 4. **UI Rendering**: compute the view model, render header, tabs, body,
//!    notice and footer.
//!
//! # Example
//!
//! ```rust
//! use hanzi_cards::{handle_event, initialize, Config, Event, KeyInput};
//!
//! let mut state = initialize(&Config::default());
//! handle_event(&mut state, &Event::HostReady)?;
//! handle_event(&mut state, &Event::CharactersLoaded(vec![]))?;
//! let (_render, actions) = handle_event(&mut state, &Event::Key(KeyInput::Char('q')))?;
//! assert_eq!(actions, vec![hanzi_cards::Action::CloseFocus]);
//! # Ok::<(), hanzi_cards::HanziError>(())
//! ```

pub mod app;
pub mod bridge;
pub mod domain;
pub mod infrastructure;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, KeyInput, Tab};
pub use domain::{CharacterId, CharacterRecord, HanziError, Result};
pub use ui::Theme;

use std::collections::BTreeMap;
use std::time::Duration;

/// User id sent with `get_characters` when none is configured.
pub const DEFAULT_USER_ID: &str = "local";

/// Plugin configuration parsed from Zellij's configuration system.
///
/// # Example
///
/// ```kdl
/// plugin location="file:/path/to/hanzi-cards.wasm" {
///     user_id "mei"
///     preview "false"
///     notice_seconds "5"
///     theme_file "~/.config/hanzi-cards/theme.toml"
///     trace_level "debug"
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Whose characters to load. Default: `"local"`
    pub user_id: String,

    /// Serve built-in example characters instead of talking to the worker.
    pub preview: bool,

    /// How long success and error notices stay on screen. Default: 3 seconds
    pub notice_lifetime: Duration,

    /// Built-in theme name to use.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`, `catppuccin-frappe`,
    /// `catppuccin-macchiato`. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. `~` refers to the host home.
    ///
    /// Takes precedence over `theme_name`. See [`ui::theme`] for format.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive for the log file. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER_ID.to_string(),
            preview: false,
            notice_lifetime: app::state::DEFAULT_NOTICE_LIFETIME,
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// # Parsing Rules
    ///
    /// - `user_id`: trimmed; blank falls back to `"local"`
    /// - `preview`: `true`/`yes`/`1` (any case) enable it
    /// - `notice_seconds`: positive integer, falls back to 3 on parse error
    /// - `theme`, `theme_file`, `trace_level`: taken as-is
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use std::time::Duration;
    /// use hanzi_cards::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("user_id".to_string(), "mei".to_string());
    /// map.insert("notice_seconds".to_string(), "5".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.user_id, "mei");
    /// assert_eq!(config.notice_lifetime, Duration::from_secs(5));
    /// assert!(!config.preview);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();

        let user_id = config
            .get("user_id")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.user_id);

        let preview = config
            .get("preview")
            .is_some_and(|s| matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"));

        let notice_lifetime = config.get("notice_seconds").map_or(defaults.notice_lifetime, |raw| {
            parse_notice_seconds(raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "using default notice lifetime");
                defaults.notice_lifetime
            })
        });

        Self {
            user_id,
            preview,
            notice_lifetime,
            theme_name: config.get("theme").cloned(),
            theme_file: config.get("theme_file").cloned(),
            trace_level: config.get("trace_level").cloned(),
        }
    }

    /// Resolves the configured theme, falling back to the default theme
    /// when the file or name cannot be loaded.
    #[must_use]
    pub fn load_theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            let path = infrastructure::expand_tilde(theme_file);
            return Theme::from_file(&path).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %path, error = %e, "failed to load theme from file, using default");
                Theme::default()
            });
        }

        self.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
            Theme::from_name(theme_name).unwrap_or_else(|| {
                tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                Theme::default()
            })
        })
    }
}

fn parse_notice_seconds(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(HanziError::Config(format!(
            "notice_seconds must be a positive whole number, got {raw:?}"
        ))),
    }
}

/// Builds the initial application state from configuration.
///
/// The store starts empty and not loading; the runtime sends
/// [`Event::HostReady`] once the host channel can accept messages.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(user_id = %config.user_id, preview = config.preview, "initializing hanzi-cards");

    AppState::new(config.user_id.clone(), config.load_theme()).with_notice_lifetime(config.notice_lifetime)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        assert_eq!(Config::from_zellij(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn blank_user_and_bad_seconds_fall_back() {
        let config = Config::from_zellij(&map(&[("user_id", "   "), ("notice_seconds", "soon")]));
        assert_eq!(config.user_id, DEFAULT_USER_ID);
        assert_eq!(config.notice_lifetime, Duration::from_secs(3));

        let zero = Config::from_zellij(&map(&[("notice_seconds", "0")]));
        assert_eq!(zero.notice_lifetime, Duration::from_secs(3));
    }

    #[test]
    fn notice_seconds_error_names_the_key() {
        let err = parse_notice_seconds("-1").unwrap_err();
        assert!(matches!(err, HanziError::Config(_)));
        assert!(err.to_string().contains("notice_seconds"));
        assert_eq!(parse_notice_seconds(" 7 ").unwrap(), Duration::from_secs(7));
    }

    #[test]
    fn preview_flag_variants() {
        for value in ["true", "TRUE", "yes", "1"] {
            assert!(Config::from_zellij(&map(&[("preview", value)])).preview, "{value}");
        }
        for value in ["false", "no", ""] {
            assert!(!Config::from_zellij(&map(&[("preview", value)])).preview, "{value}");
        }
    }

    #[test]
    fn theme_file_wins_over_name_and_falls_back_when_missing() {
        let config = Config::from_zellij(&map(&[
            ("theme", "catppuccin-latte"),
            ("theme_file", "/nonexistent/theme.toml"),
        ]));
        assert_eq!(config.load_theme().name, Theme::default().name);

        let named = Config::from_zellij(&map(&[("theme", "catppuccin-latte")]));
        assert_eq!(named.load_theme().name, "catppuccin-latte");
    }

    #[test]
    fn initialize_uses_configured_user() {
        let config = Config::from_zellij(&map(&[("user_id", "mei")]));
        let state = initialize(&config);
        assert_eq!(state.user_id, "mei");
        assert!(!state.loading);
        assert!(state.store.is_empty());
    }
}
