// SPDX-FileCopyrightText: 2026 Aula Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! "What-if" computations: required score projection and score simulation.

use serde::{Deserialize, Serialize};

use crate::MAX_SCORE;
use crate::grades::{AverageMethod, GradeItem, apply_substitution, average_for, round2};

/// Result of [`projection`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Score needed on every pending evaluation to reach the desired average.
    pub required_score: f64,
    /// Whether `required_score` is within the grading scale.
    pub achievable: bool,
    /// Total weight still pending.
    pub remaining_weight: f64,
    /// Average over the graded items, reported when nothing is pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_average: Option<f64>,
}

fn effective_weight(item: &GradeItem, method: AverageMethod) -> Option<f64> {
    if !method.honors_weights() {
        return Some(1.0);
    }
    item.weight.is_finite().then_some(item.weight)
}

/// Score needed on the pending evaluations to reach `desired_average`.
///
/// With `S` the weighted sum and `W` the weight of the graded items and `R` the
/// weight still pending, the required score is `(desired * (W + R) - S) / R`.
/// Under [`AverageMethod::Simple`] every weight is taken as 1. Under
/// [`AverageMethod::Substitution`] graded substitutes are folded in with
/// [`apply_substitution`] first, and pending substitutes are not counted.
pub fn projection(
    graded: &[GradeItem],
    pending: &[GradeItem],
    desired_average: f64,
    method: AverageMethod,
) -> Projection {
    let substitution = method == AverageMethod::Substitution;
    let substituted;
    let graded = if substitution {
        substituted = apply_substitution(graded);
        substituted.as_slice()
    } else {
        graded
    };

    let (sum, weight) = graded
        .iter()
        .filter_map(|item| Some((item.graded_score()?, effective_weight(item, method)?)))
        .fold((0.0, 0.0), |(s, w), (score, weight)| (s + score * weight, w + weight));

    let remaining: f64 = pending
        .iter()
        .filter(|item| !(substitution && item.substitute))
        .filter_map(|item| effective_weight(item, method))
        .sum();

    if remaining == 0.0 {
        let divisor = if weight == 0.0 { 1.0 } else { weight };
        return Projection {
            required_score: 0.0,
            achievable: false,
            remaining_weight: 0.0,
            current_average: Some(round2(sum / divisor)),
        };
    }

    let required = round2((desired_average * (weight + remaining) - sum) / remaining);
    Projection {
        required_score: required,
        achievable: (0.0..=MAX_SCORE).contains(&required),
        remaining_weight: remaining,
        current_average: None,
    }
}

/// Average after replacing the score of the evaluation identified by `target`.
///
/// `target` matches an item id exactly or an item name case-insensitively.
/// Both ungraded (fill-in) and graded (override) items can be targeted. When
/// nothing matches, the average of the unmodified items is returned.
pub fn simulate(
    items: &[GradeItem],
    target: &str,
    simulated_score: f64,
    method: AverageMethod,
) -> f64 {
    let wanted = target.to_lowercase();
    let simulated: Vec<GradeItem> = items
        .iter()
        .map(|item| {
            let by_id = item.id.as_deref() == Some(target);
            let by_name = item
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase() == wanted);
            if by_id || by_name {
                GradeItem {
                    score: Some(simulated_score),
                    ..item.clone()
                }
            } else {
                item.clone()
            }
        })
        .collect();

    average_for(method, &simulated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graded(weight: f64, score: f64) -> GradeItem {
        GradeItem::new(weight, Some(score))
    }

    fn pending(weight: f64) -> GradeItem {
        GradeItem::new(weight, None)
    }

    #[test]
    fn simple_projection_spreads_over_pending_items() {
        let result = projection(
            &[graded(1.0, 4.0)],
            &[pending(1.0), pending(1.0)],
            6.0,
            AverageMethod::Simple,
        );
        assert_eq!(result.required_score, 7.0);
        assert!(result.achievable);
        assert_eq!(result.remaining_weight, 2.0);
        assert_eq!(result.current_average, None);
    }

    #[test]
    fn simple_projection_ignores_stored_weights() {
        let result = projection(
            &[graded(4.0, 4.0)],
            &[pending(3.0), pending(9.0)],
            6.0,
            AverageMethod::Simple,
        );
        assert_eq!(result.required_score, 7.0);
        assert_eq!(result.remaining_weight, 2.0);
    }

    #[test]
    fn weighted_projection_uses_weights() {
        // (7 * 4 - 2 * 4) / 2 = 10
        let result = projection(
            &[graded(2.0, 4.0)],
            &[pending(2.0)],
            7.0,
            AverageMethod::Weighted,
        );
        assert_eq!(result.required_score, 10.0);
        assert!(result.achievable);
    }

    #[test]
    fn unreachable_target_is_not_achievable() {
        let result = projection(
            &[graded(1.0, 0.0), graded(1.0, 0.0)],
            &[pending(1.0)],
            7.0,
            AverageMethod::Weighted,
        );
        assert_eq!(result.required_score, 21.0);
        assert!(!result.achievable);
    }

    #[test]
    fn already_secured_target_needs_negative_score() {
        let result = projection(
            &[graded(3.0, 10.0)],
            &[pending(1.0)],
            5.0,
            AverageMethod::Weighted,
        );
        assert!(result.required_score < 0.0);
        assert!(!result.achievable);
    }

    #[test]
    fn substitution_projection_folds_in_the_substitute() {
        // P1 = 3 is replaced by the make-up 8: (5 * 3 - (8 + 6)) / 1
        let result = projection(
            &[
                graded(1.0, 3.0),
                graded(1.0, 6.0),
                graded(1.0, 8.0).as_substitute(),
            ],
            &[pending(1.0)],
            5.0,
            AverageMethod::Substitution,
        );
        assert_eq!(result.required_score, 1.0);
        assert_eq!(result.remaining_weight, 1.0);
    }

    #[test]
    fn pending_substitute_adds_no_weight() {
        let result = projection(
            &[graded(1.0, 4.0)],
            &[pending(1.0), pending(1.0).as_substitute()],
            6.0,
            AverageMethod::Substitution,
        );
        assert_eq!(result.required_score, 8.0);
        assert_eq!(result.remaining_weight, 1.0);
    }

    #[test]
    fn nothing_pending_reports_current_average() {
        let result = projection(
            &[graded(1.0, 6.0), graded(1.0, 9.0)],
            &[],
            6.0,
            AverageMethod::Weighted,
        );
        assert_eq!(result.required_score, 0.0);
        assert!(!result.achievable);
        assert_eq!(result.remaining_weight, 0.0);
        assert_eq!(result.current_average, Some(7.5));
    }

    #[test]
    fn simulate_by_name_is_case_insensitive() {
        let items = [
            graded(1.0, 6.0).with_name("Prova 1"),
            pending(1.0).with_name("Prova 2"),
        ];
        assert_eq!(
            simulate(&items, "prova 2", 8.0, AverageMethod::Weighted),
            7.0
        );
    }

    #[test]
    fn simulate_by_id_overrides_existing_score() {
        let items = [
            graded(1.0, 2.0).with_id("ev-1"),
            graded(1.0, 8.0).with_id("ev-2"),
        ];
        assert_eq!(simulate(&items, "ev-1", 10.0, AverageMethod::Simple), 9.0);
    }

    #[test]
    fn simulate_without_match_keeps_items() {
        let items = [graded(1.0, 6.0).with_name("P1"), pending(1.0).with_name("P2")];
        assert_eq!(
            simulate(&items, "final exam", 10.0, AverageMethod::Weighted),
            6.0
        );
    }

    #[test]
    fn simulate_id_match_is_exact() {
        let items = [graded(1.0, 6.0).with_id("EV-1"), pending(1.0).with_id("ev-2")];
        // Ids are not matched case-insensitively.
        assert_eq!(simulate(&items, "ev-1", 10.0, AverageMethod::Weighted), 6.0);
    }
}
