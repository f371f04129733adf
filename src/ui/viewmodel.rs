//! View model types representing renderable UI state.
//!
//! View models are computed by `AppState::compute_viewmodel()` and consumed by
//! the renderer. They hold display-ready strings and flags only; the renderer
//! never looks at [`crate::app::AppState`] beyond the theme.
//!
//! Layout constants for the card grid live here as well, because both the
//! view model (windowing) and the handler (row navigation) depend on them.

use crate::app::quiz::{OptionMark, QuizSummary};
use crate::app::state::NoticeKind;

/// Width of one card including its border.
pub const CARD_WIDTH: usize = 14;

/// Height of one card including its border.
pub const CARD_HEIGHT: usize = 4;

/// Gap between two cards on the same row.
pub const CARD_GAP: usize = 1;

/// Horizontal margin left and right of the grid.
pub const GRID_MARGIN: usize = 2;

/// Rows taken by the header block (blank, title, tabs, border).
pub const HEADER_ROWS: usize = 4;

/// Rows taken by the footer block (notice, border, keybindings).
pub const FOOTER_ROWS: usize = 3;

/// Rows taken by the search box.
pub const SEARCH_ROWS: usize = 3;

/// Number of card columns that fit in `cols`.
#[must_use]
pub const fn grid_columns(cols: usize) -> usize {
    let usable = cols.saturating_sub(GRID_MARGIN * 2) + CARD_GAP;
    let columns = usable / (CARD_WIDTH + CARD_GAP);
    if columns == 0 {
        1
    } else {
        columns
    }
}

/// Number of card rows that fit in `rows`.
#[must_use]
pub const fn visible_card_rows(rows: usize, with_search: bool) -> usize {
    let search = if with_search { SEARCH_ROWS } else { 0 };
    let available = rows.saturating_sub(HEADER_ROWS + FOOTER_ROWS + search);
    let card_rows = available / CARD_HEIGHT;
    if card_rows == 0 {
        1
    } else {
        card_rows
    }
}

/// Complete UI view model for one frame.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    pub header: HeaderInfo,
    pub tabs: Vec<TabInfo>,
    pub body: BodyView,
    /// Detail overlay drawn above the body.
    pub overlay: Option<DetailView>,
    pub notice: Option<NoticeInfo>,
    pub footer: FooterInfo,
}

#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub title: String,
    /// Shown right-aligned next to the title.
    pub user: String,
}

#[derive(Debug, Clone)]
pub struct TabInfo {
    /// Digit shortcut for the tab.
    pub key: usize,
    pub title: String,
    pub is_active: bool,
}

/// Content of the active tab.
#[derive(Debug, Clone)]
pub enum BodyView {
    Grid(GridView),
    Form(FormView),
    Practice(PracticeView),
}

#[derive(Debug, Clone)]
pub struct GridView {
    pub search_bar: Option<SearchBarInfo>,
    /// Cards of the visible window, row-major.
    pub cards: Vec<CardItem>,
    pub columns: usize,
    pub empty_state: Option<EmptyState>,
}

#[derive(Debug, Clone)]
pub struct CardItem {
    pub character: String,
    pub pinyin: String,
    pub is_selected: bool,
}

#[derive(Debug, Clone)]
pub struct SearchBarInfo {
    /// Typed query while editing, applied query otherwise.
    pub query: String,
    pub is_typing: bool,
    /// Number of records matching the applied query.
    pub match_count: usize,
}

/// Placeholder shown instead of an empty grid.
#[derive(Debug, Clone)]
pub struct EmptyState {
    pub message: String,
    /// May be empty.
    pub subtitle: String,
}

/// Every field of one record; missing optionals are already `—`.
#[derive(Debug, Clone)]
pub struct DetailView {
    pub character: String,
    pub pinyin: String,
    pub meaning: String,
    pub example: String,
    pub example_meaning: String,
    pub confirm_prompt: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FormView {
    pub fields: Vec<FormFieldView>,
}

#[derive(Debug, Clone)]
pub struct FormFieldView {
    pub label: String,
    pub value: String,
    pub is_required: bool,
    pub is_focused: bool,
}

#[derive(Debug, Clone)]
pub struct PracticeView {
    pub mode_label: String,
    pub body: PracticeBody,
}

#[derive(Debug, Clone)]
pub enum PracticeBody {
    /// Practice cannot run right now (too few characters, or not started).
    Guidance { message: String, subtitle: String },
    Question {
        prompt: String,
        pinyin_hint: Option<String>,
        options: Vec<OptionView>,
        /// `(answered, total)`.
        progress: (usize, usize),
        correct_so_far: usize,
        feedback: Option<String>,
    },
    Complete { summary: QuizSummary },
}

#[derive(Debug, Clone)]
pub struct OptionView {
    pub key: usize,
    pub text: String,
    pub mark: OptionMark,
}

#[derive(Debug, Clone)]
pub struct NoticeInfo {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct FooterInfo {
    pub keybindings: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_columns_never_zero() {
        assert_eq!(grid_columns(0), 1);
        assert_eq!(grid_columns(10), 1);
    }

    #[test]
    fn grid_columns_fit_width() {
        // 4 + 3 * 14 + 2 gaps = 48
        assert_eq!(grid_columns(48), 3);
        assert_eq!(grid_columns(47), 2);
    }

    #[test]
    fn search_bar_reduces_card_rows() {
        assert_eq!(visible_card_rows(24, false), 4);
        assert_eq!(visible_card_rows(24, true), 3);
    }
}
