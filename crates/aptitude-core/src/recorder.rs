//! Bounded answer recording.
//!
//! Each question accepts at most [`MAX_SELECTIONS`] options. Selecting past
//! the cap evicts the earliest-selected option, never the one just clicked.

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::{Answer, Question};

/// Most options a single answer may hold.
pub const MAX_SELECTIONS: usize = 2;

/// What a toggle did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Selected(usize),
    Deselected(usize),
    /// `selected` was added after `evicted` was dropped to respect the cap.
    Replaced { selected: usize, evicted: usize },
}

/// Toggle `index` in a selection kept in selection order.
pub fn toggle(selection: &mut Vec<usize>, index: usize) -> Toggle {
    if let Some(pos) = selection.iter().position(|i| *i == index) {
        selection.remove(pos);
        return Toggle::Deselected(index);
    }

    if selection.len() >= MAX_SELECTIONS {
        let evicted = selection.remove(0);
        selection.push(index);
        return Toggle::Replaced {
            selected: index,
            evicted,
        };
    }

    selection.push(index);
    Toggle::Selected(index)
}

/// The ordered answer collection for a quiz run, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet {
    answers: Vec<Answer>,
}

impl AnswerSheet {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self { answers }
    }

    /// Toggle an option on `question` and update the sheet.
    ///
    /// An existing answer is replaced in place; a new one is appended; an
    /// answer whose selection becomes empty is removed.
    pub fn record(&mut self, question: &Question, index: usize) -> Result<Toggle, QuizError> {
        if index >= question.options.len() {
            return Err(QuizError::OptionOutOfRange {
                question_id: question.id,
                index,
                count: question.options.len(),
            });
        }

        let pos = self
            .answers
            .iter()
            .position(|a| a.question_id == question.id);

        let mut selection = pos
            .map(|p| self.answers[p].selected.clone())
            .unwrap_or_default();
        let outcome = toggle(&mut selection, index);

        match (pos, selection.is_empty()) {
            (Some(p), true) => {
                self.answers.remove(p);
            }
            (Some(p), false) => self.answers[p].selected = selection,
            (None, false) => self.answers.push(Answer {
                question_id: question.id,
                selected: selection,
            }),
            (None, true) => {}
        }

        Ok(outcome)
    }

    /// Options currently selected for `question_id`, in selection order.
    pub fn selection(&self, question_id: u32) -> &[usize] {
        self.answers
            .iter()
            .find(|a| a.question_id == question_id)
            .map(|a| a.selected.as_slice())
            .unwrap_or(&[])
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn into_answers(self) -> Vec<Answer> {
        self.answers
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuizOption;
    use std::collections::BTreeMap;

    fn question(id: u32, options: usize) -> Question {
        Question {
            id,
            text: format!("Question {id}"),
            hint: String::new(),
            options: (0..options)
                .map(|i| QuizOption {
                    letter: crate::bank::letter_for(i),
                    text: format!("option {i}"),
                    scores: BTreeMap::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn third_selection_evicts_first_selected() {
        let mut selection = Vec::new();
        toggle(&mut selection, 2);
        toggle(&mut selection, 0);
        let outcome = toggle(&mut selection, 3);

        assert_eq!(
            outcome,
            Toggle::Replaced {
                selected: 3,
                evicted: 2
            }
        );
        assert_eq!(selection, vec![0, 3]);
    }

    #[test]
    fn eviction_follows_selection_order_not_position() {
        let mut selection = Vec::new();
        toggle(&mut selection, 0);
        toggle(&mut selection, 3);
        toggle(&mut selection, 1);
        assert_eq!(selection, vec![3, 1]);

        toggle(&mut selection, 2);
        assert_eq!(selection, vec![1, 2]);
    }

    #[test]
    fn toggling_selected_option_deselects() {
        let mut selection = vec![1, 2];
        assert_eq!(toggle(&mut selection, 1), Toggle::Deselected(1));
        assert_eq!(selection, vec![2]);
    }

    #[test]
    fn record_replaces_in_place_and_removes_empty() {
        let q1 = question(1, 4);
        let q2 = question(2, 4);
        let mut sheet = AnswerSheet::default();

        sheet.record(&q1, 0).unwrap();
        sheet.record(&q2, 1).unwrap();
        sheet.record(&q1, 2).unwrap();

        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.answers()[0].question_id, 1);
        assert_eq!(sheet.selection(1), &[0, 2]);

        sheet.record(&q1, 0).unwrap();
        sheet.record(&q1, 2).unwrap();
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.answers()[0].question_id, 2);
        assert!(sheet.selection(1).is_empty());
    }

    #[test]
    fn record_rejects_out_of_range_option() {
        let q = question(7, 3);
        let mut sheet = AnswerSheet::default();
        let err = sheet.record(&q, 3).unwrap_err();
        assert!(matches!(
            err,
            QuizError::OptionOutOfRange {
                question_id: 7,
                index: 3,
                count: 3
            }
        ));
        assert!(sheet.is_empty());
    }

    #[test]
    fn sheet_serializes_as_plain_list() {
        let mut sheet = AnswerSheet::default();
        sheet.record(&question(4, 2), 1).unwrap();
        let json = serde_json::to_value(&sheet).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["question_id"], 4);
        assert_eq!(json[0]["selected"][0], 1);
    }
}
