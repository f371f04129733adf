//! Application layer: state, events and actions.
//!
//! Sits between the plugin runtime (`main.rs`) and the domain and bridge
//! layers. Data flows one way:
//!
//! ```text
//! Key / host result → Event → handle_event → AppState mutation → Actions
//!                                   ↑                                │
//!                                   └──────── Host Bridge ◀──────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects returned by the handler
//! - [`handler`]: Event routing and state transitions
//! - [`modes`]: Tabs, search focus, overlay and key input types
//! - [`state`]: [`AppState`] and view model computation
//! - [`store`]: In-memory character store and search filter
//! - [`form`]: Add-character form and validation
//! - [`quiz`]: Practice question generation and scoring

pub mod actions;
pub mod form;
pub mod handler;
pub mod modes;
pub mod quiz;
pub mod state;
pub mod store;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{KeyInput, Overlay, SearchFocus, Tab};
pub use quiz::{PracticeMode, QuizEngine, QuizPhase, QuizSummary};
pub use state::{AppState, Notice, NoticeKind};
pub use store::CharacterStore;
