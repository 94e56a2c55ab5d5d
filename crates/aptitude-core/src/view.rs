//! View descriptions.
//!
//! Pure mappings from quiz state to what a screen should show. Renderers in
//! `aptitude-report` and the CLI consume these; nothing here does I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bank::QuestionBank;
use crate::lifecycle::QuizState;
use crate::model::{Category, CategoryProfile, QuizResult};
use crate::ranking::{RankedCategory, Ranking};

/// Label of the forward button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvanceLabel {
    Next,
    SeeResults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionView {
    pub index: usize,
    pub letter: String,
    pub text: String,
    pub selected: bool,
}

/// One question screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizView {
    pub question_id: u32,
    /// 1-based position in the bank.
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub hint: String,
    pub options: Vec<OptionView>,
    pub can_go_back: bool,
    pub can_advance: bool,
    pub advance_label: AdvanceLabel,
    pub progress_percent: f64,
}

/// Describe the question at `state.index`, or `None` past the last one.
pub fn quiz_view(bank: &QuestionBank, state: &QuizState) -> Option<QuizView> {
    let question = bank.question_at(state.index)?;
    let selection = state.sheet.selection(question.id);
    let total = bank.len();

    Some(QuizView {
        question_id: question.id,
        number: state.index + 1,
        total,
        text: question.text.clone(),
        hint: question.hint.clone(),
        options: question
            .options
            .iter()
            .enumerate()
            .map(|(index, o)| OptionView {
                index,
                letter: o.letter.clone(),
                text: o.text.clone(),
                selected: selection.contains(&index),
            })
            .collect(),
        can_go_back: state.index > 0,
        can_advance: !selection.is_empty(),
        advance_label: if state.index + 1 == total {
            AdvanceLabel::SeeResults
        } else {
            AdvanceLabel::Next
        },
        progress_percent: (state.index + 1) as f64 / total as f64 * 100.0,
    })
}

/// A category as shown in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCard {
    pub category: Category,
    pub name: String,
    pub emoji: String,
    pub description: String,
    pub careers: Vec<String>,
    pub suggestions: Vec<String>,
    pub score: f64,
    pub percentage: u32,
}

/// A runner-up line: `emoji name (percentage%)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryView {
    pub category: Category,
    pub name: String,
    pub emoji: String,
    pub percentage: u32,
}

/// One axis of the radar chart, in ranked order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarPoint {
    pub category: Category,
    pub label: String,
    pub emoji: String,
    pub percentage: u32,
}

/// Everything the report screen shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportView {
    pub display_name: String,
    pub primary: CategoryCard,
    pub secondary: Vec<SecondaryView>,
    pub radar: Vec<RadarPoint>,
    pub completed_at: DateTime<Utc>,
}

fn profile_or_default(bank: &QuestionBank, category: Category) -> CategoryProfile {
    bank.profile(category).cloned().unwrap_or_else(|| CategoryProfile {
        name: category.to_string(),
        emoji: String::new(),
        description: String::new(),
        careers: Vec::new(),
        suggestions: Vec::new(),
    })
}

fn card(bank: &QuestionBank, ranked: &RankedCategory) -> CategoryCard {
    let profile = profile_or_default(bank, ranked.category);
    CategoryCard {
        category: ranked.category,
        name: profile.name,
        emoji: profile.emoji,
        description: profile.description,
        careers: profile.careers,
        suggestions: profile.suggestions,
        score: ranked.score,
        percentage: ranked.percentage,
    }
}

/// Describe the report for a completed quiz.
pub fn report_view(bank: &QuestionBank, result: &QuizResult) -> ReportView {
    let ranking = Ranking::resolve(&result.scores);

    let secondary = ranking
        .secondary()
        .iter()
        .map(|r| {
            let profile = profile_or_default(bank, r.category);
            SecondaryView {
                category: r.category,
                name: profile.name,
                emoji: profile.emoji,
                percentage: r.percentage,
            }
        })
        .collect();

    let radar = ranking
        .ranked
        .iter()
        .map(|r| {
            let profile = profile_or_default(bank, r.category);
            RadarPoint {
                category: r.category,
                label: profile.name,
                emoji: profile.emoji,
                percentage: r.percentage,
            }
        })
        .collect();

    ReportView {
        display_name: result.session.display_name.clone(),
        primary: card(bank, ranking.primary()),
        secondary,
        radar,
        completed_at: result.completed_at,
    }
}

/// Short text for sharing the headline result.
pub fn share_text(view: &ReportView) -> String {
    format!(
        "I found out that {} is a {} {}! Take the aptitude quiz to discover yours.",
        view.display_name, view.primary.emoji, view.primary.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::tests::two_question_bank;
    use crate::model::{Answer, ScoreVector, Session};
    use crate::recorder::AnswerSheet;

    fn state(index: usize, answers: Vec<Answer>) -> QuizState {
        QuizState {
            session: Session::new("Mia", "Baby"),
            sheet: AnswerSheet::new(answers),
            index,
        }
    }

    #[test]
    fn first_question_view() {
        let bank = two_question_bank();
        let view = quiz_view(&bank, &state(0, vec![])).unwrap();
        assert_eq!(view.number, 1);
        assert_eq!(view.total, 2);
        assert_eq!(view.options.len(), 2);
        assert_eq!(view.options[1].letter, "B");
        assert!(!view.can_go_back);
        assert!(!view.can_advance);
        assert_eq!(view.advance_label, AdvanceLabel::Next);
        assert_eq!(view.progress_percent, 50.0);
    }

    #[test]
    fn last_question_marks_selection_and_label() {
        let bank = two_question_bank();
        let answers = vec![
            Answer {
                question_id: 1,
                selected: vec![0],
            },
            Answer {
                question_id: 2,
                selected: vec![2, 0],
            },
        ];
        let view = quiz_view(&bank, &state(1, answers)).unwrap();
        assert!(view.can_go_back);
        assert!(view.can_advance);
        assert_eq!(view.advance_label, AdvanceLabel::SeeResults);
        let selected: Vec<usize> = view
            .options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.index)
            .collect();
        assert_eq!(selected, vec![0, 2]);
        assert_eq!(view.progress_percent, 100.0);
    }

    #[test]
    fn past_end_has_no_view() {
        let bank = two_question_bank();
        assert!(quiz_view(&bank, &state(2, vec![])).is_none());
    }

    #[test]
    fn report_view_uses_profiles_and_ranking() {
        let bank = two_question_bank();
        let mut scores = ScoreVector::zeroed();
        scores.add(Category::Artist, 4.0);
        scores.add(Category::Musician, 2.0);
        let result = QuizResult {
            scores,
            session: Session::new("Mia", "Baby"),
            answers: vec![],
            completed_at: Utc::now(),
        };

        let view = report_view(&bank, &result);
        assert_eq!(view.display_name, "Mia");
        assert_eq!(view.primary.category, Category::Artist);
        assert_eq!(view.primary.name, "Artist");
        assert_eq!(view.primary.percentage, 100);
        assert_eq!(view.secondary.len(), 1);
        assert_eq!(view.secondary[0].percentage, 50);
        assert_eq!(view.radar.len(), 8);
        assert_eq!(view.radar[1].category, Category::Musician);

        let text = share_text(&view);
        assert!(text.contains("Mia is a A Artist"));
    }
}
