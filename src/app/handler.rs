//! Event handling and state transitions.
//!
//! [`handle_event`] is the only place where [`AppState`] changes in response to
//! the outside world. It routes keys by the active tab and overlay, applies
//! host results, and returns the side effects for the runtime to execute.
//!
//! # Key routing
//!
//! 1. Detail overlay (delete confirmation first)
//! 2. Search input while typing
//! 3. The active tab's own keys
//! 4. Global keys (`1`-`3`, `Tab`, `q`), except on the add tab where
//!    printable keys belong to the form
//!
//! # Example
//!
//! ```rust
//! use hanzi_cards::app::{handle_event, Action, AppState, Event};
//! use hanzi_cards::ui::Theme;
//!
//! let mut state = AppState::new("local", Theme::default());
//! let (_render, actions) = handle_event(&mut state, &Event::HostReady)?;
//! assert_eq!(actions, vec![Action::RequestCharacters { user_id: "local".to_string() }]);
//! # Ok::<(), hanzi_cards::HanziError>(())
//! ```

use super::modes::{KeyInput, Overlay, SearchFocus, Tab};
use super::quiz::QuizPhase;
use super::state::NoticeKind;
use super::{Action, AppState};
use crate::bridge::HostMessage;
use crate::domain::{CharacterRecord, Result};

/// Message shown when the initial load fails.
pub const LOAD_FAILED_NOTICE: &str = "Could not load your characters";

/// Events delivered to the application by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press, already mapped from the host's key type.
    Key(KeyInput),

    /// The host channel can accept messages; time to load characters.
    HostReady,

    /// The initial load resolved with the user's characters.
    CharactersLoaded(Vec<CharacterRecord>),

    /// The initial load failed (host unavailable or malformed reply).
    CharactersLoadFailed {
        reason: String,
    },

    /// The dismissal timer for notice `seq` fired.
    NoticeExpired {
        seq: u64,
    },
}

/// Processes one event and returns `(needs_render, actions)`.
///
/// # Errors
///
/// Reserved for failures the runtime must see. Every recoverable condition
/// (validation, insufficient data, misplaced quiz keys) is handled here and
/// reported through notices or guidance text instead.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event_kind(event)).entered();

    match event {
        Event::Key(key) => Ok(handle_key(state, *key)),
        Event::HostReady => {
            state.loading = true;
            Ok((
                true,
                vec![Action::RequestCharacters {
                    user_id: state.user_id.clone(),
                }],
            ))
        }
        Event::CharactersLoaded(records) => {
            tracing::debug!(count = records.len(), "characters loaded");
            state.load_characters(records.clone());
            if state.tab == Tab::Practice && state.quiz.phase() == QuizPhase::Idle {
                if let Err(e) = state.start_practice() {
                    tracing::debug!(error = %e, "practice still unavailable after load");
                }
            }
            Ok((true, vec![]))
        }
        Event::CharactersLoadFailed { reason } => {
            tracing::warn!(reason = %reason, "initial character load failed");
            state.loading = false;
            let dismiss = state.notify(NoticeKind::Error, LOAD_FAILED_NOTICE);
            Ok((true, vec![dismiss]))
        }
        Event::NoticeExpired { seq } => Ok((state.dismiss_notice(*seq), vec![])),
    }
}

const fn event_kind(event: &Event) -> &'static str {
    match event {
        Event::Key(_) => "key",
        Event::HostReady => "host_ready",
        Event::CharactersLoaded(_) => "characters_loaded",
        Event::CharactersLoadFailed { .. } => "characters_load_failed",
        Event::NoticeExpired { .. } => "notice_expired",
    }
}

fn handle_key(state: &mut AppState, key: KeyInput) -> (bool, Vec<Action>) {
    if state.tab == Tab::Characters {
        if let Some(overlay) = state.overlay.clone() {
            return handle_overlay_key(state, &overlay, key);
        }
        if state.search_focus == SearchFocus::Typing {
            return handle_search_key(state, key);
        }
    }

    let handled = match state.tab {
        Tab::Characters => handle_grid_key(state, key),
        Tab::Add => return handle_form_key(state, key),
        Tab::Practice => handle_practice_key(state, key),
    };

    handled.unwrap_or_else(|| handle_global_key(state, key))
}

fn handle_global_key(state: &mut AppState, key: KeyInput) -> (bool, Vec<Action>) {
    match key {
        KeyInput::Char('q') => (false, vec![Action::CloseFocus]),
        KeyInput::Tab => {
            state.switch_tab(state.tab.next());
            (true, vec![])
        }
        KeyInput::Char(c) => Tab::from_digit(c).map_or((false, vec![]), |tab| {
            state.switch_tab(tab);
            (true, vec![])
        }),
        _ => (false, vec![]),
    }
}

fn handle_overlay_key(state: &mut AppState, overlay: &Overlay, key: KeyInput) -> (bool, Vec<Action>) {
    let Overlay::Detail { confirming_delete, .. } = overlay;

    if *confirming_delete {
        return match key {
            KeyInput::Char('y' | 'Y') => match state.confirm_delete() {
                Some(removed) => {
                    tracing::debug!(id = %removed.id, character = %removed.character, "character deleted");
                    let dismiss = state.notify(NoticeKind::Info, format!("Deleted {}", removed.character));
                    (
                        true,
                        vec![Action::SendToHost(HostMessage::delete_character(removed.id)), dismiss],
                    )
                }
                None => (true, vec![]),
            },
            KeyInput::Char('n' | 'N') | KeyInput::Esc => {
                state.cancel_delete();
                (true, vec![])
            }
            _ => (false, vec![]),
        };
    }

    match key {
        KeyInput::Char('d') => (state.begin_delete(), vec![]),
        KeyInput::Esc | KeyInput::Enter | KeyInput::Char('q') => {
            state.close_overlay();
            (true, vec![])
        }
        _ => (false, vec![]),
    }
}

fn handle_search_key(state: &mut AppState, key: KeyInput) -> (bool, Vec<Action>) {
    match key {
        KeyInput::Char(c) => {
            state.search_input.push(c);
            tracing::trace!(query = %state.search_input, "search input updated");
        }
        KeyInput::Backspace => {
            state.search_input.pop();
        }
        KeyInput::Enter => state.apply_search(),
        KeyInput::Esc => state.clear_search(),
        _ => return (false, vec![]),
    }
    (true, vec![])
}

fn handle_grid_key(state: &mut AppState, key: KeyInput) -> Option<(bool, Vec<Action>)> {
    match key {
        KeyInput::Left | KeyInput::Char('h') => state.move_selection(-1),
        KeyInput::Right | KeyInput::Char('l') => state.move_selection(1),
        KeyInput::Up | KeyInput::Char('k') => state.move_selection_rows(-1),
        KeyInput::Down | KeyInput::Char('j') => state.move_selection_rows(1),
        KeyInput::Enter => return Some((state.open_detail(), vec![])),
        KeyInput::Char('/') => state.focus_search(),
        KeyInput::Esc if !state.applied_query.is_empty() => state.clear_search(),
        _ => return None,
    }
    Some((true, vec![]))
}

fn handle_form_key(state: &mut AppState, key: KeyInput) -> (bool, Vec<Action>) {
    match key {
        KeyInput::Char(c) => state.form.push_char(c),
        KeyInput::Backspace => state.form.pop_char(),
        KeyInput::Tab | KeyInput::Down => state.form.focus_next(),
        KeyInput::BackTab | KeyInput::Up => state.form.focus_previous(),
        KeyInput::Esc => state.switch_tab(Tab::Characters),
        KeyInput::Enter => return submit_form(state),
        KeyInput::Left | KeyInput::Right => return (false, vec![]),
    }
    (true, vec![])
}

fn submit_form(state: &mut AppState) -> (bool, Vec<Action>) {
    match state.submit_form() {
        Ok(record) => {
            let message = HostMessage::add_character(&record.fields());
            let dismiss = state.notify(NoticeKind::Success, format!("Added {}", record.character));
            (true, vec![Action::SendToHost(message), dismiss])
        }
        Err(e) => {
            tracing::debug!(error = %e, "form rejected");
            let dismiss = state.notify(NoticeKind::Error, e.to_string());
            (true, vec![dismiss])
        }
    }
}

fn handle_practice_key(state: &mut AppState, key: KeyInput) -> Option<(bool, Vec<Action>)> {
    match key {
        KeyInput::Char(c @ '1'..='4') if state.quiz.phase() == QuizPhase::InProgress => {
            let index = c as usize - '1' as usize;
            if let Err(e) = state.quiz.submit_answer(index) {
                tracing::debug!(error = %e, "answer ignored");
                return Some((false, vec![]));
            }
        }
        KeyInput::Enter | KeyInput::Char('n') if state.quiz.answer().is_some() => {
            if let Err(e) = state.quiz.next() {
                tracing::debug!(error = %e, "cannot advance");
                return Some((false, vec![]));
            }
        }
        KeyInput::Char('m') => {
            if let Err(e) = state.toggle_practice_mode() {
                tracing::debug!(error = %e, "mode switched without a round");
            }
        }
        KeyInput::Char('r') => {
            if let Err(e) = state.start_practice() {
                tracing::debug!(error = %e, "restart refused");
            }
        }
        _ => return None,
    }
    Some((true, vec![]))
}
