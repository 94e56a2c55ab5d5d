//! Category ranking and percentage normalisation.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{Category, ScoreVector};

/// How many runner-up categories the report shows at most.
pub const MAX_SECONDARY: usize = 3;

/// A category with its raw score and its share of the top score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedCategory {
    pub category: Category,
    pub score: f64,
    pub percentage: u32,
}

/// Percentage of `score` relative to `max`, rounded; 0 when `max` is not
/// positive.
pub fn percentage(score: f64, max: f64) -> u32 {
    if max > 0.0 {
        ((score / max) * 100.0).round().max(0.0) as u32
    } else {
        0
    }
}

/// All eight categories ordered by descending score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub ranked: Vec<RankedCategory>,
}

impl Ranking {
    /// Rank `scores`, breaking ties with [`Category::TIE_BREAK_PRIORITY`].
    pub fn resolve(scores: &ScoreVector) -> Self {
        let max = scores.max();
        let mut ranked: Vec<RankedCategory> = scores
            .iter()
            .map(|(category, score)| RankedCategory {
                category,
                score,
                percentage: percentage(score, max),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.category.priority().cmp(&b.category.priority()))
        });

        Self { ranked }
    }

    /// The top-ranked category. There is always one.
    pub fn primary(&self) -> &RankedCategory {
        &self.ranked[0]
    }

    /// Up to three runner-up categories with a non-zero score.
    pub fn secondary(&self) -> Vec<RankedCategory> {
        self.ranked
            .iter()
            .skip(1)
            .take(MAX_SECONDARY)
            .filter(|r| r.score > 0.0)
            .copied()
            .collect()
    }

    pub fn percentage_of(&self, category: Category) -> u32 {
        self.ranked
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.percentage)
            .unwrap_or(0)
    }
}
