//! Score aggregation.
//!
//! Sums option weights across all answers into a [`ScoreVector`]. An answer
//! with more than one selected option contributes half of every weight.

use crate::bank::QuestionBank;
use crate::model::{Answer, ScoreVector};

/// Factor applied to every weight of a multi-select answer.
pub const MULTI_SELECT_FACTOR: f64 = 0.5;

/// Aggregate `answers` against `bank`.
///
/// Answers for unknown questions and out-of-range option indices are
/// skipped rather than treated as errors.
pub fn aggregate(answers: &[Answer], bank: &QuestionBank) -> ScoreVector {
    let mut scores = ScoreVector::zeroed();

    for answer in answers {
        let Some(question) = bank.question(answer.question_id) else {
            tracing::debug!(question_id = answer.question_id, "skipping answer for unknown question");
            continue;
        };

        let factor = if answer.is_multi_select() {
            MULTI_SELECT_FACTOR
        } else {
            1.0
        };

        for &index in &answer.selected {
            let Some(option) = question.options.get(index) else {
                continue;
            };
            for (category, weight) in &option.scores {
                scores.add(*category, weight * factor);
            }
        }
    }

    scores
}
