//! TOML question bank loader.
//!
//! Loads the ordered question list and the per-category profiles from TOML,
//! either the bank embedded in the binary or a custom file, and validates it.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::BankError;
use crate::model::{Category, CategoryProfile, Question, QuizOption};

const BUILTIN_BANK: &str = include_str!("../data/default_bank.toml");

/// Static reference data for one quiz: questions in order plus a profile
/// for every category.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    pub id: String,
    pub name: String,
    pub questions: Vec<Question>,
    pub profiles: BTreeMap<Category, CategoryProfile>,
}

impl QuestionBank {
    /// The bank shipped with the binary.
    pub fn builtin() -> Result<Self, BankError> {
        parse_bank_str(BUILTIN_BANK)
    }

    /// Raw TOML of the built-in bank, used by `aptitude init`.
    pub fn builtin_source() -> &'static str {
        BUILTIN_BANK
    }

    /// Load a bank from a TOML file.
    pub fn load(path: &Path) -> Result<Self, BankError> {
        let content = std::fs::read_to_string(path).map_err(|source| BankError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_bank_str(&content)
    }

    pub fn question(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn question_at(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn profile(&self, category: Category) -> Option<&CategoryProfile> {
        self.profiles.get(&category)
    }
}

/// Intermediate TOML structure for bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    #[serde(default)]
    bank: TomlBankHeader,
    #[serde(default)]
    profiles: BTreeMap<String, CategoryProfile>,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    #[serde(default = "default_bank_id")]
    id: String,
    #[serde(default = "default_bank_name")]
    name: String,
}

impl Default for TomlBankHeader {
    fn default() -> Self {
        Self {
            id: default_bank_id(),
            name: default_bank_name(),
        }
    }
}

fn default_bank_id() -> String {
    "custom".to_string()
}

fn default_bank_name() -> String {
    "Custom question bank".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: u32,
    text: String,
    #[serde(default)]
    hint: String,
    #[serde(default)]
    options: Vec<TomlOption>,
}

#[derive(Debug, Deserialize)]
struct TomlOption {
    #[serde(default)]
    letter: Option<String>,
    text: String,
    #[serde(default)]
    scores: BTreeMap<String, f64>,
}

/// Letter for the option at `index` when the file does not name one.
pub fn letter_for(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}

/// Parse a TOML string into a `QuestionBank`.
pub fn parse_bank_str(content: &str) -> Result<QuestionBank, BankError> {
    let parsed: TomlBankFile = toml::from_str(content)?;

    let mut profiles = BTreeMap::new();
    for (name, profile) in parsed.profiles {
        let category: Category = name.parse().map_err(|_| BankError::UnknownCategory {
            name: name.clone(),
            context: "profiles".to_string(),
        })?;
        profiles.insert(category, profile);
    }
    if let Some(missing) = Category::ALL.iter().find(|c| !profiles.contains_key(c)) {
        return Err(BankError::MissingProfile(*missing));
    }

    if parsed.questions.is_empty() {
        return Err(BankError::Empty);
    }

    let mut seen = HashSet::new();
    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            if !seen.insert(q.id) {
                return Err(BankError::DuplicateQuestionId(q.id));
            }
            if q.options.is_empty() {
                return Err(BankError::NoOptions(q.id));
            }
            let options = q
                .options
                .into_iter()
                .enumerate()
                .map(|(i, o)| {
                    let letter = o.letter.unwrap_or_else(|| letter_for(i));
                    let mut scores = BTreeMap::new();
                    for (name, weight) in o.scores {
                        let category: Category =
                            name.parse().map_err(|_| BankError::UnknownCategory {
                                name: name.clone(),
                                context: format!("question {} option {}", q.id, i + 1),
                            })?;
                        if !weight.is_finite() {
                            return Err(BankError::NonFiniteWeight {
                                question_id: q.id,
                                letter,
                                category,
                            });
                        }
                        scores.insert(category, weight);
                    }
                    Ok(QuizOption {
                        letter,
                        text: o.text,
                        scores,
                    })
                })
                .collect::<Result<Vec<_>, BankError>>()?;
            Ok(Question {
                id: q.id,
                text: q.text,
                hint: q.hint,
                options,
            })
        })
        .collect::<Result<Vec<_>, BankError>>()?;

    tracing::debug!(questions = questions.len(), "question bank loaded");

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        questions,
        profiles,
    })
}

/// A non-fatal problem found in a question bank.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub question_id: Option<u32>,
    pub message: String,
}

/// Check a parsed bank for problems that do not stop it from loading.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for q in &bank.questions {
        if q.text.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(q.id),
                message: "question text is empty".into(),
            });
        }
        if q.options.len() > 26 {
            warnings.push(ValidationWarning {
                question_id: Some(q.id),
                message: format!("{} options, letters run out after 26", q.options.len()),
            });
        }
        if q.options.len() < 2 {
            warnings.push(ValidationWarning {
                question_id: Some(q.id),
                message: "only one option to choose from".into(),
            });
        }
        for option in &q.options {
            if option.scores.is_empty() {
                warnings.push(ValidationWarning {
                    question_id: Some(q.id),
                    message: format!("option {} carries no category weights", option.letter),
                });
            }
        }
    }

    for category in Category::ALL {
        let scored = bank
            .questions
            .iter()
            .flat_map(|q| &q.options)
            .any(|o| o.scores.get(&category).is_some_and(|w| *w > 0.0));
        if !scored {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("no option scores category '{category}'"),
            });
        }
    }

    warnings
}
