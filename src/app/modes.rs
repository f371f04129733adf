//! Tab, focus, overlay and key input types.
//!
//! # State machine
//!
//! Exactly one [`Tab`] is active. On the characters tab the search input may
//! hold the keyboard ([`SearchFocus::Typing`]), and a detail [`Overlay`] may
//! sit on top of the grid. The add tab always routes printable keys into the
//! form; the practice tab routes digits to the quiz.
//!
//! # Example
//!
//! ```rust
//! use hanzi_cards::app::modes::{KeyInput, Tab};
//!
//! assert_eq!(Tab::Characters.next(), Tab::Add);
//! assert_eq!(Tab::from_digit('3'), Some(Tab::Practice));
//! assert_ne!(KeyInput::Char('q'), KeyInput::Esc);
//! ```

use crate::domain::CharacterId;

/// Top-level tabs, in display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    /// Saved character grid.
    #[default]
    Characters,
    /// Add-character form.
    Add,
    /// Multiple-choice practice.
    Practice,
}

impl Tab {
    pub const ALL: [Self; 3] = [Self::Characters, Self::Add, Self::Practice];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Characters => "Characters",
            Self::Add => "Add",
            Self::Practice => "Practice",
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Characters => Self::Add,
            Self::Add => Self::Practice,
            Self::Practice => Self::Characters,
        }
    }

    /// Maps the `1`/`2`/`3` shortcuts to a tab.
    #[must_use]
    pub const fn from_digit(c: char) -> Option<Self> {
        match c {
            '1' => Some(Self::Characters),
            '2' => Some(Self::Add),
            '3' => Some(Self::Practice),
            _ => None,
        }
    }
}

/// Focus state of the search input on the characters tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchFocus {
    /// Keys move the grid selection.
    #[default]
    Grid,

    /// Keys edit the pending query; `Enter` applies it, `Esc` clears it.
    Typing,
}

/// Modal layer drawn above the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    /// Full record view; `confirming_delete` shows the y/n prompt.
    Detail {
        id: CharacterId,
        confirming_delete: bool,
    },
}

/// Keys the plugin reacts to, decoupled from the host's key types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
}
