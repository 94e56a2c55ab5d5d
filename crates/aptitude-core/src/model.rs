//! Core data model types for aptitude.
//!
//! Categories, questions and profiles are static reference data; sessions,
//! answers and results are the records a quiz run produces.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One of the eight fixed aptitude categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Artist,
    Musician,
    Scientist,
    Athlete,
    Writer,
    Diplomat,
    Logician,
    Naturalist,
}

impl Category {
    /// All categories in their canonical order.
    pub const ALL: [Category; 8] = [
        Category::Artist,
        Category::Musician,
        Category::Scientist,
        Category::Athlete,
        Category::Writer,
        Category::Diplomat,
        Category::Logician,
        Category::Naturalist,
    ];

    /// Fixed ordering used only to break ties between equal scores.
    /// Earlier entries win.
    pub const TIE_BREAK_PRIORITY: [Category; 8] = [
        Category::Artist,
        Category::Musician,
        Category::Diplomat,
        Category::Scientist,
        Category::Writer,
        Category::Athlete,
        Category::Logician,
        Category::Naturalist,
    ];

    /// Position in [`Category::TIE_BREAK_PRIORITY`]; lower ranks first.
    pub fn priority(self) -> usize {
        Self::TIE_BREAK_PRIORITY
            .iter()
            .position(|c| *c == self)
            .unwrap_or(Self::TIE_BREAK_PRIORITY.len())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Artist => "artist",
            Category::Musician => "musician",
            Category::Scientist => "scientist",
            Category::Athlete => "athlete",
            Category::Writer => "writer",
            Category::Diplomat => "diplomat",
            Category::Logician => "logician",
            Category::Naturalist => "naturalist",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "artist" => Ok(Category::Artist),
            "musician" => Ok(Category::Musician),
            "scientist" => Ok(Category::Scientist),
            "athlete" => Ok(Category::Athlete),
            "writer" => Ok(Category::Writer),
            "diplomat" => Ok(Category::Diplomat),
            "logician" => Ok(Category::Logician),
            "naturalist" => Ok(Category::Naturalist),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// The person taking the quiz, captured at intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session, falling back to `default_name` when `name` is blank.
    pub fn new(name: &str, default_name: &str) -> Self {
        let trimmed = name.trim();
        let display_name = if trimmed.is_empty() {
            default_name.trim().to_string()
        } else {
            trimmed.to_string()
        };
        Self {
            id: Uuid::new_v4(),
            display_name,
            created_at: Utc::now(),
        }
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub hint: String,
    pub options: Vec<QuizOption>,
}

/// One selectable option and the category weights it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    pub letter: String,
    pub text: String,
    #[serde(default)]
    pub scores: BTreeMap<Category, f64>,
}

/// Descriptive metadata shown in the report for a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub name: String,
    pub emoji: String,
    pub description: String,
    #[serde(default)]
    pub careers: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// The options picked for one question, in the order they were picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: u32,
    pub selected: Vec<usize>,
}

impl Answer {
    /// More than one option picked; contributions are halved.
    pub fn is_multi_select(&self) -> bool {
        self.selected.len() > 1
    }
}

/// Accumulated score for every category. Always holds all eight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, f64>",
    into = "BTreeMap<String, f64>"
)]
pub struct ScoreVector {
    scores: BTreeMap<Category, f64>,
}

impl ScoreVector {
    /// A vector with every category at zero.
    pub fn zeroed() -> Self {
        Self {
            scores: Category::ALL.iter().map(|c| (*c, 0.0)).collect(),
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        self.scores.get(&category).copied().unwrap_or(0.0)
    }

    pub fn add(&mut self, category: Category, amount: f64) {
        *self.scores.entry(category).or_insert(0.0) += amount;
    }

    /// Largest score across all categories.
    pub fn max(&self) -> f64 {
        self.scores.values().copied().fold(0.0_f64, f64::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.scores.iter().map(|(c, s)| (*c, *s))
    }
}

impl Default for ScoreVector {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl TryFrom<BTreeMap<String, f64>> for ScoreVector {
    type Error = String;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut vector = ScoreVector::zeroed();
        for (name, score) in raw {
            let category: Category = name.parse()?;
            vector.scores.insert(category, score);
        }
        Ok(vector)
    }
}

impl From<ScoreVector> for BTreeMap<String, f64> {
    fn from(vector: ScoreVector) -> Self {
        vector
            .scores
            .into_iter()
            .map(|(c, s)| (c.as_str().to_string(), s))
            .collect()
    }
}

/// Everything the report stage needs, written once when the quiz completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub scores: ScoreVector,
    pub session: Session,
    pub answers: Vec<Answer>,
    pub completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_display_and_parse() {
        assert_eq!(Category::Diplomat.to_string(), "diplomat");
        assert_eq!("Artist".parse::<Category>().unwrap(), Category::Artist);
        assert_eq!(
            " naturalist ".parse::<Category>().unwrap(),
            Category::Naturalist
        );
        assert!("astronaut".parse::<Category>().is_err());
    }

    #[test]
    fn tie_break_priority_covers_every_category() {
        for category in Category::ALL {
            assert!(category.priority() < Category::ALL.len());
        }
        assert_eq!(Category::Artist.priority(), 0);
        assert_eq!(Category::Diplomat.priority(), 2);
        assert_eq!(Category::Naturalist.priority(), 7);
    }

    #[test]
    fn session_falls_back_to_default_name() {
        assert_eq!(Session::new("   ", "Baby").display_name, "Baby");
        assert_eq!(Session::new("  Mia ", "Baby").display_name, "Mia");
    }

    #[test]
    fn score_vector_always_has_all_categories() {
        let json = r#"{"artist": 2.5}"#;
        let vector: ScoreVector = serde_json::from_str(json).unwrap();
        assert_eq!(vector.get(Category::Artist), 2.5);
        assert_eq!(vector.get(Category::Writer), 0.0);
        assert_eq!(vector.iter().count(), 8);

        let out = serde_json::to_value(&vector).unwrap();
        assert_eq!(out["musician"], 0.0);
        assert_eq!(out["artist"], 2.5);
    }

    #[test]
    fn score_vector_rejects_unknown_category() {
        let json = r#"{"astronaut": 1.0}"#;
        assert!(serde_json::from_str::<ScoreVector>(json).is_err());
    }

    #[test]
    fn multi_select_flag() {
        let single = Answer {
            question_id: 1,
            selected: vec![2],
        };
        let multi = Answer {
            question_id: 1,
            selected: vec![2, 0],
        };
        assert!(!single.is_multi_select());
        assert!(multi.is_multi_select());
    }
}
