//! Application state and view model computation.
//!
//! [`AppState`] is the single owner of everything the plugin shows: the
//! character store, the active tab, search, form and quiz state, the detail
//! overlay and the transient notice. It is built once in `load` and passed by
//! `&mut` to [`crate::app::handle_event`]; nothing else holds session state.
//!
//! The filtered grid is never cached. It is recomputed from the store and the
//! applied query whenever it is needed, so store mutations can never leave a
//! stale filter behind.
//!
//! # Example
//!
//! ```rust
//! use hanzi_cards::app::AppState;
//! use hanzi_cards::ui::Theme;
//!
//! let mut state = AppState::new("local", Theme::default());
//! state.set_viewport(24, 80);
//! let viewmodel = state.compute_viewmodel(24, 80);
//! assert_eq!(viewmodel.tabs.len(), 3);
//! ```

use super::form::{FormField, FormState};
use super::modes::{Overlay, SearchFocus, Tab};
use super::quiz::{PracticeMode, QuizEngine, QuizPhase, MIN_RECORDS};
use super::store::CharacterStore;
use super::Action;
use crate::domain::{CharacterIdGenerator, CharacterRecord, HanziError, Result};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    self, BodyView, CardItem, DetailView, EmptyState, FooterInfo, FormFieldView, FormView, GridView, HeaderInfo,
    NoticeInfo, OptionView, PracticeBody, PracticeView, SearchBarInfo, TabInfo, UIViewModel,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// Default lifetime of a transient notice.
pub const DEFAULT_NOTICE_LIFETIME: Duration = Duration::from_secs(3);

/// Placeholder for missing optional fields in the detail overlay.
pub const MISSING_FIELD: &str = "—";

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

/// A transient message shown above the footer.
///
/// `seq` identifies the notice so that a dismissal timer armed for an older
/// notice never removes a newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub seq: u64,
    pub kind: NoticeKind,
    pub text: String,
}

/// Central application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Saved characters, most recent first.
    pub store: CharacterStore,

    pub tab: Tab,

    /// Keyboard focus of the search input on the characters tab.
    pub search_focus: SearchFocus,

    /// Query being typed. Not applied until `Enter`.
    pub search_input: String,

    /// Query the grid is currently filtered by.
    pub applied_query: String,

    /// Index of the selected card within the filtered grid.
    pub selected_index: usize,

    pub overlay: Option<Overlay>,

    pub form: FormState,

    pub quiz: QuizEngine,

    /// `true` until the initial load resolves either way.
    pub loading: bool,

    pub notice: Option<Notice>,

    /// User whose characters are requested from the host.
    pub user_id: String,

    pub theme: Theme,

    notice_seq: u64,
    notice_lifetime: Duration,
    viewport_cols: usize,
    ids: CharacterIdGenerator,
    rng: StdRng,
}

impl AppState {
    #[must_use]
    pub fn new(user_id: impl Into<String>, theme: Theme) -> Self {
        Self {
            store: CharacterStore::default(),
            tab: Tab::default(),
            search_focus: SearchFocus::default(),
            search_input: String::new(),
            applied_query: String::new(),
            selected_index: 0,
            overlay: None,
            form: FormState::default(),
            quiz: QuizEngine::new(),
            loading: false,
            notice: None,
            user_id: user_id.into(),
            theme,
            notice_seq: 0,
            notice_lifetime: DEFAULT_NOTICE_LIFETIME,
            viewport_cols: 80,
            ids: CharacterIdGenerator::default(),
            rng: StdRng::from_os_rng(),
        }
    }

    #[must_use]
    pub const fn with_notice_lifetime(mut self, lifetime: Duration) -> Self {
        self.notice_lifetime = lifetime;
        self
    }

    /// Replaces the random source used for question generation.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Records the pane size so grid navigation knows the column count.
    pub fn set_viewport(&mut self, _rows: usize, cols: usize) {
        self.viewport_cols = cols;
    }

    /// Number of card columns at the current pane width.
    #[must_use]
    pub const fn grid_columns(&self) -> usize {
        viewmodel::grid_columns(self.viewport_cols)
    }

    // ---- notices -------------------------------------------------------

    /// Shows a notice and returns the action that will dismiss it.
    pub fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) -> Action {
        self.notice_seq += 1;
        let notice = Notice {
            seq: self.notice_seq,
            kind,
            text: text.into(),
        };
        tracing::debug!(seq = notice.seq, kind = ?notice.kind, text = %notice.text, "notice shown");
        self.notice = Some(notice);

        Action::ScheduleNoticeDismiss {
            seq: self.notice_seq,
            after: self.notice_lifetime,
        }
    }

    /// Clears the notice if it is still notice `seq`. Returns whether it was.
    pub fn dismiss_notice(&mut self, seq: u64) -> bool {
        if self.notice.as_ref().is_some_and(|notice| notice.seq == seq) {
            self.notice = None;
            true
        } else {
            false
        }
    }

    // ---- list view -----------------------------------------------------

    /// Replaces the store with the host's characters.
    ///
    /// A detail overlay whose record is not in the new list is closed.
    pub fn load_characters(&mut self, records: Vec<CharacterRecord>) {
        self.loading = false;
        self.store.replace_all(records);
        if let Some(Overlay::Detail { id, .. }) = &self.overlay {
            if self.store.get(id).is_none() {
                tracing::debug!(character_id = %id, "closing detail of a record the host did not return");
                self.overlay = None;
            }
        }
        self.clamp_selection();
    }

    /// Records currently shown in the grid.
    #[must_use]
    pub fn visible_records(&self) -> Vec<&CharacterRecord> {
        self.store.filter(&self.applied_query)
    }

    #[must_use]
    pub fn selected_record(&self) -> Option<&CharacterRecord> {
        self.visible_records().get(self.selected_index).copied()
    }

    /// Moves the grid selection by `delta` cards, stopping at either end.
    pub fn move_selection(&mut self, delta: isize) {
        let count = self.visible_records().len();
        if count == 0 {
            self.selected_index = 0;
            return;
        }
        self.selected_index = self.selected_index.saturating_add_signed(delta).min(count - 1);
    }

    /// Moves the selection one grid row up or down.
    pub fn move_selection_rows(&mut self, rows: isize) {
        let columns = isize::try_from(self.grid_columns()).unwrap_or(1);
        self.move_selection(rows.saturating_mul(columns));
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_records().len();
        self.selected_index = self.selected_index.min(count.saturating_sub(1));
    }

    /// Opens the detail overlay for the selected card.
    pub fn open_detail(&mut self) -> bool {
        let Some(id) = self.selected_record().map(|record| record.id.clone()) else {
            return false;
        };
        tracing::debug!(id = %id, "opening detail");
        self.overlay = Some(Overlay::Detail {
            id,
            confirming_delete: false,
        });
        true
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    /// Switches the open detail overlay to its delete confirmation.
    pub fn begin_delete(&mut self) -> bool {
        match &mut self.overlay {
            Some(Overlay::Detail { confirming_delete, .. }) => {
                *confirming_delete = true;
                true
            }
            None => false,
        }
    }

    pub fn cancel_delete(&mut self) {
        if let Some(Overlay::Detail { confirming_delete, .. }) = &mut self.overlay {
            *confirming_delete = false;
        }
    }

    /// Removes the record shown in the overlay and closes it.
    ///
    /// Returns the removed record, or `None` if nothing was awaiting
    /// confirmation.
    pub fn confirm_delete(&mut self) -> Option<CharacterRecord> {
        let Some(Overlay::Detail {
            id,
            confirming_delete: true,
        }) = self.overlay.take()
        else {
            return None;
        };

        let removed = self.store.remove_by_id(&id);
        self.clamp_selection();
        removed
    }

    // ---- search --------------------------------------------------------

    pub fn focus_search(&mut self) {
        self.search_focus = SearchFocus::Typing;
        self.search_input.clone_from(&self.applied_query);
    }

    /// Filters the grid by the typed query.
    pub fn apply_search(&mut self) {
        self.search_focus = SearchFocus::Grid;
        self.applied_query = self.search_input.trim().to_string();
        self.selected_index = 0;
        tracing::debug!(
            query = %self.applied_query,
            matches = self.visible_records().len(),
            "search applied"
        );
    }

    /// Clears both the typed and the applied query.
    pub fn clear_search(&mut self) {
        self.search_focus = SearchFocus::Grid;
        self.search_input.clear();
        self.applied_query.clear();
        self.clamp_selection();
    }

    // ---- form ----------------------------------------------------------

    /// Validates the form and prepends the new record with a local id.
    ///
    /// On success the form and any search are cleared and the characters tab
    /// becomes active, so the new card is first in the grid.
    ///
    /// # Errors
    ///
    /// Returns [`HanziError::Validation`] when a required field is empty; the
    /// store and the form are left untouched.
    pub fn submit_form(&mut self) -> Result<CharacterRecord> {
        let fields = self.form.validate()?;
        let record = CharacterRecord::from_fields(self.ids.next_id(), fields);

        self.store.add(record.clone());
        self.form.reset();
        self.switch_tab(Tab::Characters);
        self.clear_search();
        self.selected_index = 0;
        Ok(record)
    }

    // ---- tabs and practice ---------------------------------------------

    /// Activates `tab`, leaving any overlay or search input.
    ///
    /// Entering the practice tab always starts a fresh round; when there are
    /// too few characters the quiz stays idle and shows guidance instead.
    pub fn switch_tab(&mut self, tab: Tab) {
        tracing::debug!(from = ?self.tab, to = ?tab, "switching tab");
        self.tab = tab;
        self.overlay = None;
        self.search_focus = SearchFocus::Grid;

        if tab == Tab::Practice {
            if let Err(e) = self.start_practice() {
                tracing::debug!(error = %e, "practice not started");
            }
        }
    }

    /// Starts a new practice round from the current store.
    ///
    /// # Errors
    ///
    /// Returns [`HanziError::InsufficientData`] with fewer than two records.
    pub fn start_practice(&mut self) -> Result<()> {
        self.quiz.start(self.store.get_all(), &mut self.rng)
    }

    /// Flips the question direction and restarts the round.
    ///
    /// # Errors
    ///
    /// Same as [`Self::start_practice`].
    pub fn toggle_practice_mode(&mut self) -> Result<()> {
        let mode = self.quiz.mode().toggled();
        self.quiz.set_mode(mode, self.store.get_all(), &mut self.rng)
    }

    // ---- view model ----------------------------------------------------

    /// Computes the renderable snapshot for a pane of `rows` x `cols`.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let body = match self.tab {
            Tab::Characters => BodyView::Grid(self.compute_grid(rows, cols)),
            Tab::Add => BodyView::Form(self.compute_form()),
            Tab::Practice => BodyView::Practice(self.compute_practice()),
        };

        UIViewModel {
            header: HeaderInfo {
                title: " 汉字 Cards ".to_string(),
                user: self.user_id.clone(),
            },
            tabs: Tab::ALL
                .iter()
                .enumerate()
                .map(|(index, tab)| TabInfo {
                    key: index + 1,
                    title: tab.title().to_string(),
                    is_active: *tab == self.tab,
                })
                .collect(),
            body,
            overlay: self.compute_detail(),
            notice: self.notice.as_ref().map(|notice| NoticeInfo {
                kind: notice.kind,
                text: notice.text.clone(),
            }),
            footer: self.compute_footer(),
        }
    }

    fn compute_grid(&self, rows: usize, cols: usize) -> GridView {
        let records = self.visible_records();
        let columns = viewmodel::grid_columns(cols);

        let search_bar = (self.search_focus == SearchFocus::Typing || !self.applied_query.is_empty()).then(|| {
            SearchBarInfo {
                query: if self.search_focus == SearchFocus::Typing {
                    self.search_input.clone()
                } else {
                    self.applied_query.clone()
                },
                is_typing: self.search_focus == SearchFocus::Typing,
                match_count: records.len(),
            }
        });

        if records.is_empty() {
            let empty_state = if self.loading {
                EmptyState {
                    message: "Loading your characters…".to_string(),
                    subtitle: String::new(),
                }
            } else if self.store.is_empty() {
                EmptyState {
                    message: "No characters yet".to_string(),
                    subtitle: "Press 2 to add your first character".to_string(),
                }
            } else {
                EmptyState {
                    message: format!("No characters match \"{}\"", self.applied_query),
                    subtitle: "Press Esc to clear the search".to_string(),
                }
            };
            return GridView {
                search_bar,
                cards: vec![],
                columns,
                empty_state: Some(empty_state),
            };
        }

        let visible_rows = viewmodel::visible_card_rows(rows, search_bar.is_some());
        let total_rows = records.len().div_ceil(columns);
        let selected_row = self.selected_index / columns;

        let mut first_row = selected_row.saturating_sub(visible_rows / 2);
        if first_row + visible_rows > total_rows {
            first_row = total_rows.saturating_sub(visible_rows);
        }
        let start = first_row * columns;
        let end = ((first_row + visible_rows) * columns).min(records.len());

        let cards = records[start..end]
            .iter()
            .enumerate()
            .map(|(offset, record)| CardItem {
                character: record.character.clone(),
                pinyin: record.pinyin.clone(),
                is_selected: start + offset == self.selected_index,
            })
            .collect();

        GridView {
            search_bar,
            cards,
            columns,
            empty_state: None,
        }
    }

    fn compute_detail(&self) -> Option<DetailView> {
        let Some(Overlay::Detail { id, confirming_delete }) = &self.overlay else {
            return None;
        };
        let record = self.store.get(id)?;
        let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| MISSING_FIELD.to_string());

        Some(DetailView {
            character: record.character.clone(),
            pinyin: record.pinyin.clone(),
            meaning: record.meaning.clone(),
            example: optional(&record.example),
            example_meaning: optional(&record.example_meaning),
            confirm_prompt: confirming_delete.then(|| format!("Delete {}? (y/n)", record.character)),
        })
    }

    fn compute_form(&self) -> FormView {
        FormView {
            fields: FormField::ALL
                .iter()
                .map(|field| FormFieldView {
                    label: field.label().to_string(),
                    value: self.form.value(*field).to_string(),
                    is_required: field.is_required(),
                    is_focused: *field == self.form.focus,
                })
                .collect(),
        }
    }

    fn compute_practice(&self) -> PracticeView {
        let body = match self.quiz.phase() {
            QuizPhase::Idle if self.store.len() < MIN_RECORDS => PracticeBody::Guidance {
                message: HanziError::InsufficientData {
                    available: self.store.len(),
                }
                .to_string(),
                subtitle: "Add more characters on the Add tab".to_string(),
            },
            QuizPhase::Idle => PracticeBody::Guidance {
                message: "Ready to practice".to_string(),
                subtitle: "Press r to start".to_string(),
            },
            QuizPhase::Complete(summary) => PracticeBody::Complete { summary },
            QuizPhase::InProgress => self.compute_question(),
        };

        PracticeView {
            mode_label: self.quiz.mode().label().to_string(),
            body,
        }
    }

    fn compute_question(&self) -> PracticeBody {
        let Some(question) = self.quiz.current_question() else {
            return PracticeBody::Guidance {
                message: "No question available".to_string(),
                subtitle: "Press r to restart".to_string(),
            };
        };
        let marks = self.quiz.option_marks();

        let feedback = self.quiz.answer().map(|outcome| {
            if outcome.is_correct() {
                "Correct!".to_string()
            } else {
                format!("Wrong. The answer is {}", question.correct_answer)
            }
        });

        PracticeBody::Question {
            prompt: question.prompt.clone(),
            pinyin_hint: question.pinyin_hint.clone(),
            options: question
                .options
                .iter()
                .zip(marks)
                .enumerate()
                .map(|(index, (text, mark))| OptionView {
                    key: index + 1,
                    text: text.clone(),
                    mark,
                })
                .collect(),
            progress: self.quiz.progress(),
            correct_so_far: self.quiz.correct_count(),
            feedback,
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.tab, &self.overlay, self.search_focus) {
            (Tab::Characters, Some(Overlay::Detail { confirming_delete: true, .. }), _) => {
                "y: delete  n/ESC: cancel"
            }
            (Tab::Characters, Some(_), _) => "d: delete  ESC: close",
            (Tab::Characters, None, SearchFocus::Typing) => "Type to edit  Enter: search  ESC: clear",
            (Tab::Characters, None, SearchFocus::Grid) => {
                "←↓↑→/hjkl: move  Enter: details  /: search  1-3/Tab: tabs  q: quit"
            }
            (Tab::Add, _, _) => "Tab/↓: next field  Shift+Tab/↑: previous  Enter: save  ESC: back",
            (Tab::Practice, _, _) => match self.quiz.phase() {
                QuizPhase::InProgress if self.quiz.answer().is_some() => {
                    "Enter/n: next  m: switch mode  r: restart  Tab: tabs  q: quit"
                }
                QuizPhase::InProgress => "1-4: answer  m: switch mode  r: restart  Tab: tabs  q: quit",
                QuizPhase::Idle | QuizPhase::Complete(_) => {
                    "r: restart  m: switch mode  1-3/Tab: tabs  q: quit"
                }
            },
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }

    /// Current practice direction.
    #[must_use]
    pub const fn practice_mode(&self) -> PracticeMode {
        self.quiz.mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CharacterId;

    fn record(id: i64, character: &str, pinyin: &str, meaning: &str) -> CharacterRecord {
        CharacterRecord {
            id: CharacterId::Number(id),
            character: character.to_string(),
            pinyin: pinyin.to_string(),
            meaning: meaning.to_string(),
            example: None,
            example_meaning: None,
        }
    }

    fn state() -> AppState {
        let mut state = AppState::new("tester", Theme::default()).with_rng(StdRng::seed_from_u64(9));
        state.set_viewport(24, 80);
        state.load_characters(vec![
            record(1, "好", "hǎo", "good"),
            record(2, "谢", "xiè", "to thank"),
            record(3, "爱", "ài", "love"),
        ]);
        state
    }

    #[test]
    fn newer_notice_survives_older_timer() {
        let mut state = state();
        let first = state.notify(NoticeKind::Info, "one");
        let _second = state.notify(NoticeKind::Info, "two");

        let Action::ScheduleNoticeDismiss { seq, after } = first else {
            panic!("expected a dismiss action");
        };
        assert_eq!(after, DEFAULT_NOTICE_LIFETIME);
        assert!(!state.dismiss_notice(seq));
        assert_eq!(state.notice.as_ref().map(|n| n.text.as_str()), Some("two"));
    }

    #[test]
    fn applied_filter_survives_store_mutation() {
        let mut state = state();
        state.search_input = " TH ".to_string();
        state.apply_search();
        assert_eq!(state.visible_records().len(), 1);

        state.store.add(record(4, "水", "shuǐ", "water"));
        assert_eq!(state.visible_records().len(), 1);

        state.store.add(record(5, "感", "gǎn", "thankful"));
        assert_eq!(state.visible_records().len(), 2);
        assert_eq!(state.applied_query, "TH");
    }

    #[test]
    fn submitted_character_is_visible_despite_active_search() {
        let mut state = state();
        state.search_input = "love".to_string();
        state.apply_search();
        state.switch_tab(Tab::Add);
        state.form.set_value(FormField::Character, "水");
        state.form.set_value(FormField::Pinyin, "shuǐ");
        state.form.set_value(FormField::Meaning, "water");

        state.submit_form().unwrap();

        assert!(state.applied_query.is_empty());
        assert_eq!(state.visible_records().len(), 4);
        assert_eq!(state.visible_records()[0].character, "水");
    }

    #[test]
    fn reload_without_the_open_record_closes_its_detail() {
        let mut state = state();
        assert!(state.open_detail());

        state.load_characters(vec![record(2, "谢", "xiè", "to thank")]);
        assert!(state.overlay.is_none());

        assert!(state.open_detail());
        state.load_characters(vec![record(2, "谢", "xiè", "to thank"), record(9, "山", "shān", "mountain")]);
        assert!(state.overlay.is_some());
    }

    #[test]
    fn typing_does_not_filter_until_applied() {
        let mut state = state();
        state.focus_search();
        state.search_input.push_str("love");

        assert_eq!(state.visible_records().len(), 3);
        state.apply_search();
        assert_eq!(state.visible_records()[0].character, "爱");
    }

    #[test]
    fn confirm_delete_removes_only_the_shown_record() {
        let mut state = state();
        state.move_selection(1);
        assert!(state.open_detail());
        assert!(state.begin_delete());

        let removed = state.confirm_delete().unwrap();

        assert_eq!(removed.id, CharacterId::Number(2));
        assert_eq!(state.store.len(), 2);
        assert!(state.overlay.is_none());
    }

    #[test]
    fn confirm_without_prompt_does_nothing() {
        let mut state = state();
        state.open_detail();

        assert!(state.confirm_delete().is_none());
        assert_eq!(state.store.len(), 3);
    }

    #[test]
    fn selection_stops_at_the_ends() {
        let mut state = state();
        state.move_selection(-1);
        assert_eq!(state.selected_index, 0);
        state.move_selection(10);
        assert_eq!(state.selected_index, 2);
    }

    #[test]
    fn detail_shows_placeholder_for_missing_example() {
        let mut state = state();
        state.open_detail();

        let detail = state.compute_viewmodel(24, 80).overlay.unwrap();

        assert_eq!(detail.example, MISSING_FIELD);
        assert!(detail.confirm_prompt.is_none());
    }

    #[test]
    fn practice_tab_with_one_record_shows_guidance() {
        let mut state = AppState::new("tester", Theme::default());
        state.load_characters(vec![record(1, "好", "hǎo", "good")]);

        state.switch_tab(Tab::Practice);

        assert_eq!(state.quiz.phase(), QuizPhase::Idle);
        let BodyView::Practice(view) = state.compute_viewmodel(24, 80).body else {
            panic!("expected practice body");
        };
        assert!(matches!(view.body, PracticeBody::Guidance { ref message, .. } if message.contains("at least 2")));
    }

    #[test]
    fn grid_window_keeps_selection_visible() {
        let mut state = AppState::new("tester", Theme::default());
        state.set_viewport(12, 40);
        state.load_characters((0..40).map(|i| record(i, "字", "zì", "character")).collect());
        state.move_selection(39);

        let BodyView::Grid(grid) = state.compute_viewmodel(12, 40).body else {
            panic!("expected grid body");
        };

        assert!(grid.cards.iter().any(|card| card.is_selected));
    }
}
