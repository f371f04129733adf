//! Multiple-choice practice over the saved characters.
//!
//! # State machine
//!
//! ```text
//! Idle ──start──▶ InProgress ──next (last)──▶ Complete
//!                  ▲      │                      │
//!                  └──────┴──── start / mode ────┘
//! ```
//!
//! Every `start` regenerates the questions from a fresh snapshot of the
//! records, so changing the mode or restarting never resumes earlier progress.
//! Answers are checked by option index against the question's typed values.

use crate::domain::{CharacterRecord, HanziError, Result};
use rand::Rng;

/// Maximum number of options shown per question.
pub const MAX_OPTIONS: usize = 4;

/// Fewest records a practice round can be built from.
pub const MIN_RECORDS: usize = 2;

/// Direction of a practice question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PracticeMode {
    /// Shows the meaning, asks for the character.
    #[default]
    MeaningToCharacter,
    /// Shows the character, asks for the meaning.
    CharacterToMeaning,
}

impl PracticeMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::MeaningToCharacter => Self::CharacterToMeaning,
            Self::CharacterToMeaning => Self::MeaningToCharacter,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MeaningToCharacter => "Meaning → Character",
            Self::CharacterToMeaning => "Character → Meaning",
        }
    }

    /// The field a question in this mode asks for.
    fn answer_of(self, record: &CharacterRecord) -> &str {
        match self {
            Self::MeaningToCharacter => &record.character,
            Self::CharacterToMeaning => &record.meaning,
        }
    }
}

/// One generated question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeQuestion {
    pub mode: PracticeMode,
    pub prompt: String,
    /// Pinyin shown under the prompt in meaning-to-character mode.
    pub pinyin_hint: Option<String>,
    pub correct_answer: String,
    /// Distinct option texts; `correct_answer` appears exactly once.
    pub options: Vec<String>,
}

impl PracticeQuestion {
    /// Index of the correct answer within `options`.
    #[must_use]
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|option| option == &self.correct_answer)
    }
}

/// Unbiased in-place shuffle.
///
/// Walks `i` from the last index down to 1 and swaps with a uniformly chosen
/// `j` in `0..=i`.
pub fn fisher_yates_shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Builds one question per record, in a shuffled order.
///
/// Distractors are the distinct values of the asked-for field that differ from
/// the correct answer, so two records sharing a meaning never appear as
/// options for each other.
pub fn generate_questions<R: Rng + ?Sized>(
    records: &[CharacterRecord],
    mode: PracticeMode,
    rng: &mut R,
) -> Vec<PracticeQuestion> {
    let mut order: Vec<&CharacterRecord> = records.iter().collect();
    fisher_yates_shuffle(&mut order, rng);

    let mut distinct_values: Vec<&str> = Vec::with_capacity(records.len());
    for record in records {
        let value = mode.answer_of(record);
        if !distinct_values.contains(&value) {
            distinct_values.push(value);
        }
    }

    order
        .into_iter()
        .map(|record| build_question(record, mode, &distinct_values, rng))
        .collect()
}

fn build_question<R: Rng + ?Sized>(
    record: &CharacterRecord,
    mode: PracticeMode,
    distinct_values: &[&str],
    rng: &mut R,
) -> PracticeQuestion {
    let correct_answer = mode.answer_of(record).to_string();

    let mut options: Vec<String> = distinct_values
        .iter()
        .filter(|value| **value != correct_answer)
        .map(|value| (*value).to_string())
        .collect();
    fisher_yates_shuffle(&mut options, rng);
    options.truncate(MAX_OPTIONS - 1);
    options.push(correct_answer.clone());
    fisher_yates_shuffle(&mut options, rng);

    let (prompt, pinyin_hint) = match mode {
        PracticeMode::MeaningToCharacter => (
            format!("Which character means \"{}\"?", record.meaning),
            Some(record.pinyin.clone()),
        ),
        PracticeMode::CharacterToMeaning => (format!("What does {} mean?", record.character), None),
    };

    PracticeQuestion {
        mode,
        prompt,
        pinyin_hint,
        correct_answer,
        options,
    }
}

/// Final score of a completed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSummary {
    pub correct: usize,
    pub total: usize,
    /// `correct / total` as a percentage, rounded half up.
    pub accuracy_percent: usize,
}

impl QuizSummary {
    #[must_use]
    pub const fn new(correct: usize, total: usize) -> Self {
        let accuracy_percent = if total == 0 {
            0
        } else {
            (correct * 200 + total) / (total * 2)
        };
        Self {
            correct,
            total,
            accuracy_percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Idle,
    InProgress,
    Complete(QuizSummary),
}

/// Result of answering the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub selected: usize,
    pub correct_index: usize,
}

impl AnswerOutcome {
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        self.selected == self.correct_index
    }
}

/// Display mark of an option once the question has been answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Open,
    Correct,
    Incorrect,
    Frozen,
}

/// Drives one practice round.
#[derive(Debug, Clone, Default)]
pub struct QuizEngine {
    mode: PracticeMode,
    questions: Vec<PracticeQuestion>,
    current: usize,
    correct: usize,
    answer: Option<AnswerOutcome>,
    summary: Option<QuizSummary>,
}

impl QuizEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn mode(&self) -> PracticeMode {
        self.mode
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        match (self.summary, self.questions.is_empty()) {
            (Some(summary), _) => QuizPhase::Complete(summary),
            (None, true) => QuizPhase::Idle,
            (None, false) => QuizPhase::InProgress,
        }
    }

    /// Starts a fresh round over `records`.
    ///
    /// Any earlier progress is discarded first, so a refused start leaves the
    /// engine `Idle`.
    ///
    /// # Errors
    ///
    /// Returns [`HanziError::InsufficientData`] when fewer than two records
    /// are available.
    pub fn start<R: Rng + ?Sized>(&mut self, records: &[CharacterRecord], rng: &mut R) -> Result<()> {
        let _span = tracing::debug_span!("quiz_start", mode = ?self.mode, records = records.len()).entered();

        self.reset();
        if records.len() < MIN_RECORDS {
            tracing::debug!("not enough characters to practice");
            return Err(HanziError::InsufficientData {
                available: records.len(),
            });
        }

        self.questions = generate_questions(records, self.mode, rng);
        tracing::debug!(questions = self.questions.len(), "practice round started");
        Ok(())
    }

    /// Switches the question direction and restarts.
    ///
    /// # Errors
    ///
    /// Same as [`Self::start`].
    pub fn set_mode<R: Rng + ?Sized>(
        &mut self,
        mode: PracticeMode,
        records: &[CharacterRecord],
        rng: &mut R,
    ) -> Result<()> {
        self.mode = mode;
        self.start(records, rng)
    }

    /// Drops all questions and returns to `Idle`.
    pub fn reset(&mut self) {
        self.questions.clear();
        self.current = 0;
        self.correct = 0;
        self.answer = None;
        self.summary = None;
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&PracticeQuestion> {
        if self.summary.is_some() {
            return None;
        }
        self.questions.get(self.current)
    }

    /// Outcome of the current question, once answered.
    #[must_use]
    pub const fn answer(&self) -> Option<AnswerOutcome> {
        self.answer
    }

    /// Answers the current question with the option at `selected`.
    ///
    /// # Errors
    ///
    /// Returns [`HanziError::QuizState`] when no question is open, the
    /// question was already answered, or `selected` is not an option.
    pub fn submit_answer(&mut self, selected: usize) -> Result<AnswerOutcome> {
        if self.answer.is_some() {
            return Err(HanziError::QuizState("question already answered".to_string()));
        }
        let question = self
            .current_question()
            .ok_or_else(|| HanziError::QuizState("no question in progress".to_string()))?;
        if selected >= question.options.len() {
            return Err(HanziError::QuizState(format!(
                "option {} does not exist (question has {})",
                selected + 1,
                question.options.len()
            )));
        }
        let correct_index = question
            .correct_index()
            .ok_or_else(|| HanziError::QuizState("question has no correct option".to_string()))?;

        let outcome = AnswerOutcome {
            selected,
            correct_index,
        };
        if outcome.is_correct() {
            self.correct += 1;
        }
        self.answer = Some(outcome);

        tracing::debug!(
            question = self.current,
            correct = outcome.is_correct(),
            running_correct = self.correct,
            "answer submitted"
        );
        Ok(outcome)
    }

    /// Moves past the answered question, completing the round after the last.
    ///
    /// # Errors
    ///
    /// Returns [`HanziError::QuizState`] when the current question has not
    /// been answered yet.
    pub fn next(&mut self) -> Result<QuizPhase> {
        if self.answer.is_none() {
            return Err(HanziError::QuizState("answer the question first".to_string()));
        }

        self.answer = None;
        self.current += 1;
        if self.current >= self.questions.len() {
            let summary = QuizSummary::new(self.correct, self.questions.len());
            tracing::debug!(?summary, "practice round complete");
            self.summary = Some(summary);
        }
        Ok(self.phase())
    }

    /// `(answered, total)` for the current round.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        let answered = self.current + usize::from(self.answer.is_some());
        (answered.min(self.questions.len()), self.questions.len())
    }

    /// Running number of correct answers.
    #[must_use]
    pub const fn correct_count(&self) -> usize {
        self.correct
    }

    /// Marks for each option of the current question.
    ///
    /// All options are `Open` before answering. Afterwards the correct option
    /// is `Correct`, a wrong selection is `Incorrect` and the rest are `Frozen`.
    #[must_use]
    pub fn option_marks(&self) -> Vec<OptionMark> {
        let Some(question) = self.current_question() else {
            return Vec::new();
        };

        (0..question.options.len())
            .map(|index| match self.answer {
                None => OptionMark::Open,
                Some(outcome) if index == outcome.correct_index => OptionMark::Correct,
                Some(outcome) if index == outcome.selected => OptionMark::Incorrect,
                Some(_) => OptionMark::Frozen,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CharacterId;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

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

    fn three_records() -> Vec<CharacterRecord> {
        vec![
            record(1, "好", "hǎo", "хороший"),
            record(2, "谢", "xiè", "благодарить"),
            record(3, "爱", "ài", "любовь"),
        ]
    }

    fn many_records(n: usize) -> Vec<CharacterRecord> {
        (0..n)
            .map(|i| record(i as i64, &format!("字{i}"), &format!("zi{i}"), &format!("meaning {}", i % 5)))
            .collect()
    }

    #[test]
    fn answering_all_correctly_scores_full_marks() {
        let records = three_records();
        let mut rng = StdRng::seed_from_u64(7);
        let mut engine = QuizEngine::new();
        assert_eq!(engine.mode(), PracticeMode::MeaningToCharacter);

        engine.start(&records, &mut rng).unwrap();
        assert_eq!(engine.progress(), (0, 3));

        while let Some(question) = engine.current_question() {
            let correct = question.correct_index().unwrap();
            engine.submit_answer(correct).unwrap();
            engine.next().unwrap();
        }

        assert_eq!(
            engine.phase(),
            QuizPhase::Complete(QuizSummary {
                correct: 3,
                total: 3,
                accuracy_percent: 100
            })
        );
    }

    #[test]
    fn single_record_stays_idle() {
        let mut engine = QuizEngine::new();
        let err = engine
            .start(&[record(1, "好", "hǎo", "good")], &mut StdRng::seed_from_u64(1))
            .unwrap_err();

        assert!(matches!(err, HanziError::InsufficientData { available: 1 }));
        assert_eq!(engine.phase(), QuizPhase::Idle);
    }

    #[test]
    fn second_submission_is_rejected_and_counts_once() {
        let mut engine = QuizEngine::new();
        engine.start(&three_records(), &mut StdRng::seed_from_u64(3)).unwrap();
        let correct = engine.current_question().unwrap().correct_index().unwrap();

        engine.submit_answer(correct).unwrap();
        let again = engine.submit_answer(correct);

        assert!(matches!(again, Err(HanziError::QuizState(_))));
        assert_eq!(engine.correct_count(), 1);
        assert_eq!(engine.progress(), (1, 3));
    }

    #[test]
    fn next_requires_an_answer() {
        let mut engine = QuizEngine::new();
        engine.start(&three_records(), &mut StdRng::seed_from_u64(3)).unwrap();

        assert!(engine.next().is_err());
        assert_eq!(engine.progress(), (0, 3));
    }

    #[test]
    fn wrong_answer_marks_both_options() {
        let mut engine = QuizEngine::new();
        engine.start(&three_records(), &mut StdRng::seed_from_u64(11)).unwrap();
        let correct = engine.current_question().unwrap().correct_index().unwrap();
        let wrong = (correct + 1) % engine.current_question().unwrap().options.len();

        let outcome = engine.submit_answer(wrong).unwrap();
        let marks = engine.option_marks();

        assert!(!outcome.is_correct());
        assert_eq!(marks[correct], OptionMark::Correct);
        assert_eq!(marks[wrong], OptionMark::Incorrect);
        assert_eq!(engine.correct_count(), 0);
    }

    #[test]
    fn out_of_range_option_is_rejected() {
        let mut engine = QuizEngine::new();
        engine.start(&three_records(), &mut StdRng::seed_from_u64(5)).unwrap();

        assert!(engine.submit_answer(9).is_err());
        assert!(engine.answer().is_none());
    }

    #[test]
    fn mode_switch_restarts_progress() {
        let records = three_records();
        let mut rng = StdRng::seed_from_u64(2);
        let mut engine = QuizEngine::new();
        engine.start(&records, &mut rng).unwrap();
        engine.submit_answer(0).unwrap();

        engine
            .set_mode(PracticeMode::CharacterToMeaning, &records, &mut rng)
            .unwrap();

        assert_eq!(engine.progress(), (0, 3));
        let question = engine.current_question().unwrap();
        assert!(question.prompt.starts_with("What does "));
        assert!(question.pinyin_hint.is_none());
    }

    #[test]
    fn prompts_follow_the_templates() {
        let records = vec![record(1, "好", "hǎo", "good"), record(2, "谢", "xiè", "to thank")];
        let questions = generate_questions(&records, PracticeMode::MeaningToCharacter, &mut StdRng::seed_from_u64(0));

        let good = questions.iter().find(|q| q.correct_answer == "好").unwrap();
        assert_eq!(good.prompt, "Which character means \"good\"?");
        assert_eq!(good.pinyin_hint.as_deref(), Some("hǎo"));
    }

    #[test]
    fn shared_meanings_are_not_distractors_for_each_other() {
        let records = vec![
            record(1, "好", "hǎo", "good"),
            record(2, "佳", "jiā", "good"),
            record(3, "爱", "ài", "love"),
        ];

        let questions = generate_questions(&records, PracticeMode::CharacterToMeaning, &mut StdRng::seed_from_u64(4));

        for question in questions {
            assert_eq!(question.options.len(), 2);
            assert_eq!(question.options.iter().filter(|o| *o == &question.correct_answer).count(), 1);
        }
    }

    #[test]
    fn summary_rounds_half_up() {
        assert_eq!(QuizSummary::new(2, 3).accuracy_percent, 67);
        assert_eq!(QuizSummary::new(1, 3).accuracy_percent, 33);
        assert_eq!(QuizSummary::new(1, 8).accuracy_percent, 13);
    }

    proptest! {
        #[test]
        fn shuffle_is_a_permutation(mut items in prop::collection::vec(any::<u16>(), 0..40), seed in any::<u64>()) {
            let mut expected = items.clone();
            fisher_yates_shuffle(&mut items, &mut StdRng::seed_from_u64(seed));
            expected.sort_unstable();
            items.sort_unstable();
            prop_assert_eq!(items, expected);
        }

        #[test]
        fn one_question_per_record_with_valid_options(n in 2usize..12, seed in any::<u64>(), flip in any::<bool>()) {
            let records = many_records(n);
            let mode = if flip { PracticeMode::CharacterToMeaning } else { PracticeMode::MeaningToCharacter };

            let questions = generate_questions(&records, mode, &mut StdRng::seed_from_u64(seed));

            prop_assert_eq!(questions.len(), n);
            let answers: HashSet<&str> = questions.iter().map(|q| q.correct_answer.as_str()).collect();
            let expected: HashSet<&str> = records.iter().map(|r| mode.answer_of(r)).collect();
            let option_count = MAX_OPTIONS.min(expected.len());
            prop_assert_eq!(answers, expected);

            for question in &questions {
                prop_assert_eq!(question.options.len(), option_count);
                prop_assert_eq!(question.options.iter().filter(|o| *o == &question.correct_answer).count(), 1);
                let distinct: HashSet<&String> = question.options.iter().collect();
                prop_assert_eq!(distinct.len(), question.options.len());
            }
        }
    }
}
