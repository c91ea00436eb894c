// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grade items and the averaging methods.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::warn;

/// How an evaluation method reduces its evaluations to one average.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AverageMethod {
    /// Each graded score counts proportionally to its weight.
    Weighted,
    /// Every graded score counts once, ignoring weights.
    Simple,
    /// Weighted, with substitute evaluations replacing the lowest regular score.
    Substitution,
    /// Institution-specific formula. Computed as weighted.
    Custom,
}

impl AverageMethod {
    /// Whether stored weights are honored when averaging.
    pub fn honors_weights(self) -> bool {
        !matches!(self, AverageMethod::Simple)
    }
}

/// One gradable item as seen by the calculation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeItem {
    /// Stable identifier, used by [`crate::simulate`] for exact matching.
    pub id: Option<String>,
    /// Display name, matched case-insensitively by [`crate::simulate`].
    pub name: Option<String>,
    pub weight: f64,
    /// Obtained score; `None` until the item is graded.
    pub score: Option<f64>,
    /// Substitute (make-up) evaluation under [`AverageMethod::Substitution`].
    #[serde(default)]
    pub substitute: bool,
}

impl GradeItem {
    pub fn new(weight: f64, score: Option<f64>) -> Self {
        Self {
            id: None,
            name: None,
            weight,
            score,
            substitute: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn as_substitute(mut self) -> Self {
        self.substitute = true;
        self
    }

    /// The obtained score, if the item is graded.
    pub fn graded_score(&self) -> Option<f64> {
        self.score.filter(|s| s.is_finite())
    }
}

/// An item is graded when it carries a numeric obtained score.
///
/// Ungraded items are excluded from every average: they contribute neither to
/// the sum of scores nor to the sum of weights.
pub fn is_graded(item: &GradeItem) -> bool {
    item.graded_score().is_some()
}

fn has_usable_weight(item: &GradeItem) -> bool {
    item.weight.is_finite() && item.weight > 0.0
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Weighted mean of graded items, skipping non-positive or non-numeric weights.
///
/// Returns 0 when nothing contributes.
pub fn weighted_average(items: &[GradeItem]) -> f64 {
    let (sum, weights) = items
        .iter()
        .filter(|item| has_usable_weight(item))
        .filter_map(|item| item.graded_score().map(|score| (score, item.weight)))
        .fold((0.0, 0.0), |(sum, weights), (score, weight)| {
            (sum + score * weight, weights + weight)
        });

    if weights == 0.0 {
        return 0.0;
    }
    round2(sum / weights)
}

/// Arithmetic mean of graded scores; stored weights are ignored.
pub fn simple_average(items: &[GradeItem]) -> f64 {
    let scores: Vec<f64> = items.iter().filter_map(GradeItem::graded_score).collect();
    if scores.is_empty() {
        return 0.0;
    }
    round2(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Regular items with the best graded substitute standing in for the lowest
/// graded regular score, when the substitute is higher.
///
/// Substitute items themselves are dropped from the result.
pub fn apply_substitution(items: &[GradeItem]) -> Vec<GradeItem> {
    let best_substitute = items
        .iter()
        .filter(|item| item.substitute)
        .filter_map(GradeItem::graded_score)
        .fold(None, |best: Option<f64>, score| {
            Some(best.map_or(score, |b| b.max(score)))
        });

    let mut regular: Vec<GradeItem> = items
        .iter()
        .filter(|item| !item.substitute)
        .cloned()
        .collect();

    if let Some(substitute) = best_substitute {
        let lowest = regular
            .iter_mut()
            .filter(|item| has_usable_weight(item))
            .filter(|item| is_graded(item))
            .min_by(|a, b| {
                let a = a.graded_score().unwrap_or(f64::INFINITY);
                let b = b.graded_score().unwrap_or(f64::INFINITY);
                a.total_cmp(&b)
            });
        if let Some(lowest) = lowest
            && lowest.graded_score().is_some_and(|s| s < substitute)
        {
            lowest.score = Some(substitute);
        }
    }

    regular
}

/// Weighted mean after [`apply_substitution`].
pub fn substitution_average(items: &[GradeItem]) -> f64 {
    weighted_average(&apply_substitution(items))
}

/// Average of `items` under `method`.
pub fn average_for(method: AverageMethod, items: &[GradeItem]) -> f64 {
    match method {
        AverageMethod::Weighted => weighted_average(items),
        AverageMethod::Simple => simple_average(items),
        AverageMethod::Substitution => substitution_average(items),
        AverageMethod::Custom => {
            warn!("custom evaluation formula is computed as a weighted average");
            weighted_average(items)
        }
    }
}

/// Whether every required item has a score.
///
/// Substitute items are optional. A method with no required items is never
/// considered fully graded.
pub fn all_graded(items: &[GradeItem]) -> bool {
    let mut required = items.iter().filter(|item| !item.substitute).peekable();
    required.peek().is_some() && required.all(is_graded)
}
