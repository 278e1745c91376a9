//! Phase content provider: the fixed question, code and riddle sets, plus
//! per-item answer checking. Correctness keys stay private to this module
//! tree; clients only ever see the stripped projections built by the DTO
//! layer.

mod datasets;

pub use datasets::{DEBUG_ANSWER, DEBUG_ANSWER_ALIAS};

/// A multiple-choice item, optionally carrying a code snippet to read.
#[derive(Debug)]
pub struct ChoiceItem {
    /// Stable item identifier within its phase.
    pub id: u32,
    /// Code snippet shown above the question (code-reading phase only).
    pub code: Option<&'static str>,
    /// The question text.
    pub question: &'static str,
    /// Answer options, indexed from zero.
    pub options: &'static [&'static str],
    /// Index of the correct option. Never serialized.
    pub(crate) correct: usize,
}

impl ChoiceItem {
    /// Strict index equality; no fuzzing, no off-by-one forgiveness.
    pub fn is_correct(&self, submitted: usize) -> bool {
        submitted == self.correct
    }

    /// Index of the correct option, for the one surface that deliberately
    /// reveals it (the code-quiz review echo).
    pub fn correct_answer(&self) -> usize {
        self.correct
    }
}

/// A free-text riddle with a set of accepted normalized answers.
#[derive(Debug)]
pub struct RiddleItem {
    /// Stable riddle identifier.
    pub id: &'static str,
    /// The riddle text.
    pub riddle: &'static str,
    /// Accepted answers, already normalized. Never serialized.
    pub(crate) accepted: &'static [&'static str],
}

impl RiddleItem {
    /// Membership of the trimmed, lowercased submission in the accepted set.
    pub fn accepts(&self, submitted: &str) -> bool {
        let normalized = normalize_answer(submitted);
        self.accepted.iter().any(|answer| *answer == normalized)
    }
}

/// The single debugging challenge of phase 4.
#[derive(Debug)]
pub struct DebugChallenge {
    /// Stable item identifier.
    pub id: u32,
    /// The buggy snippet under scrutiny.
    pub code: &'static str,
    /// The question text.
    pub question: &'static str,
}

impl DebugChallenge {
    /// Accepts the canonical phrase or its numeric alias, normalized.
    pub fn accepts(&self, submitted: &str) -> bool {
        let normalized = normalize_answer(submitted);
        normalized == DEBUG_ANSWER || normalized == DEBUG_ANSWER_ALIAS
    }
}

/// Normalization applied to every free-text submission before comparison.
pub fn normalize_answer(submitted: &str) -> String {
    submitted.trim().to_lowercase()
}

/// The ordered quiz set for phase 2.
pub fn quiz_items() -> &'static [ChoiceItem] {
    &datasets::QUIZ_ITEMS
}

/// The ordered code-reading set for phase 3.
pub fn code_quiz_items() -> &'static [ChoiceItem] {
    &datasets::CODE_QUIZ_ITEMS
}

/// The phase 4 debugging challenge.
pub fn debug_challenge() -> &'static DebugChallenge {
    &datasets::DEBUG_CHALLENGE
}

/// The ordered riddle set for phase 5.
pub fn riddle_items() -> &'static [RiddleItem] {
    &datasets::RIDDLE_ITEMS
}

/// Per-item feedback for the phase 2 quiz; `None` for an unknown index.
pub fn check_quiz_answer(question_index: usize, submitted: usize) -> Option<bool> {
    quiz_items()
        .get(question_index)
        .map(|item| item.is_correct(submitted))
}

/// Per-item feedback for a phase 5 riddle; `None` for an unknown riddle id.
pub fn check_riddle_answer(riddle_id: &str, submitted: &str) -> Option<bool> {
    riddle_items()
        .iter()
        .find(|item| item.id == riddle_id)
        .map(|item| item.accepts(submitted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_checking_is_strict_index_equality() {
        let item = &quiz_items()[0];
        assert!(item.is_correct(item.correct));
        assert!(!item.is_correct(item.correct + 1));
    }

    #[test]
    fn riddle_checking_trims_and_folds_case() {
        assert_eq!(check_riddle_answer("keys", "  KeyBoard  "), Some(true));
        assert_eq!(check_riddle_answer("keys", "a keyboard"), Some(true));
        assert_eq!(check_riddle_answer("keys", "piano"), Some(false));
        assert_eq!(check_riddle_answer("vault", "keyboard"), None);
    }

    #[test]
    fn quiz_index_out_of_range_is_not_found() {
        assert!(check_quiz_answer(0, 1).is_some());
        assert_eq!(check_quiz_answer(99, 0), None);
    }

    #[test]
    fn debug_challenge_accepts_canonical_and_alias() {
        let challenge = debug_challenge();
        assert!(challenge.accepts("Twenty Five"));
        assert!(challenge.accepts(" 25 "));
        assert!(!challenge.accepts("55"));
        assert!(!challenge.accepts("twentyfive"));
    }

    #[test]
    fn datasets_have_expected_sizes() {
        assert_eq!(quiz_items().len(), 5);
        assert_eq!(code_quiz_items().len(), 5);
        assert_eq!(riddle_items().len(), 4);
        // Every correctness key points at a real option.
        for item in quiz_items().iter().chain(code_quiz_items()) {
            assert!(item.correct < item.options.len());
        }
    }
}
