//! Validation report and weighted score aggregation

use crate::requirement::{Judgment, Requirement};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which scoring protocol a run used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// Structure sent once, requirements scored in one shared conversation
    Context,
    /// Context setup failed; structure repeated in every scoring prompt
    Fallback,
}

/// Complete result of one validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Identifier of the validated file
    pub source_path: String,

    /// One judgment per requirement, in requirement order
    pub judgments: Vec<Judgment>,

    /// Number of requirements checked
    pub total_count: usize,

    /// Number of passed requirements
    pub passed_count: usize,

    /// `total_count - passed_count`
    pub failed_count: usize,

    /// Sum of all requirement weights
    pub total_weight: f64,

    /// Sum of the weights of passed requirements
    pub achieved_weight: f64,

    /// `achieved_weight / total_weight`, or 0.0 when `total_weight <= 0`
    pub normalized_score: f64,

    /// Scoring protocol used for this run
    pub mode: ScoringMode,
}

impl Report {
    /// Aggregate judgments into a report
    ///
    /// Judgments are matched to requirements by name; a requirement without a
    /// matching judgment counts as failed. Requirement names are expected to
    /// be unique.
    pub fn aggregate(
        source_path: impl Into<String>,
        requirements: &[Requirement],
        judgments: Vec<Judgment>,
        mode: ScoringMode,
    ) -> Self {
        let verdicts: HashMap<&str, bool> = judgments
            .iter()
            .map(|j| (j.requirement_name.as_str(), j.passed))
            .collect();

        let total_count = requirements.len();
        let mut passed_count = 0;
        let mut total_weight = 0.0;
        let mut achieved_weight = 0.0;

        for requirement in requirements {
            total_weight += requirement.score;
            if verdicts.get(requirement.name.as_str()).copied().unwrap_or(false) {
                passed_count += 1;
                achieved_weight += requirement.score;
            }
        }

        // Weights may cancel through penalties; the ratio is undefined then
        let normalized_score = if total_weight > 0.0 {
            achieved_weight / total_weight
        } else {
            0.0
        };

        Self {
            source_path: source_path.into(),
            judgments,
            total_count,
            passed_count,
            failed_count: total_count - passed_count,
            total_weight,
            achieved_weight,
            normalized_score,
            mode,
        }
    }

    /// True when every requirement passed
    pub fn all_passed(&self) -> bool {
        self.failed_count == 0
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn run(weights: &[f64], verdicts: &[bool]) -> Report {
        let requirements: Vec<_> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| Requirement::new(format!("req{}", i), "check").with_score(*w))
            .collect();
        let judgments = requirements
            .iter()
            .zip(verdicts)
            .map(|(r, passed)| Judgment {
                requirement_name: r.name.clone(),
                passed: *passed,
                confidence: 0.8,
                reasoning: None,
            })
            .collect();
        Report::aggregate("doc", &requirements, judgments, ScoringMode::Context)
    }

    proptest! {
        /// Property: counts always partition the requirement list
        #[test]
        fn test_counts_partition(
            cases in prop::collection::vec((-5.0f64..5.0, any::<bool>()), 0..20)
        ) {
            let (weights, verdicts): (Vec<_>, Vec<_>) = cases.into_iter().unzip();
            let report = run(&weights, &verdicts);

            prop_assert_eq!(report.total_count, weights.len());
            prop_assert_eq!(report.passed_count + report.failed_count, report.total_count);
            prop_assert_eq!(report.judgments.len(), report.total_count);
        }

        /// Property: with default weights the score is the pass ratio
        #[test]
        fn test_default_weights_score_is_pass_ratio(
            verdicts in prop::collection::vec(any::<bool>(), 1..20)
        ) {
            let weights = vec![1.0; verdicts.len()];
            let report = run(&weights, &verdicts);
            let expected = report.passed_count as f64 / report.total_count as f64;

            prop_assert!((report.normalized_score - expected).abs() < 1e-9);
        }

        /// Property: non-positive total weight always yields a zero score
        #[test]
        fn test_non_positive_total_scores_zero(
            cases in prop::collection::vec((-5.0f64..0.0, any::<bool>()), 0..20)
        ) {
            let (weights, verdicts): (Vec<_>, Vec<_>) = cases.into_iter().unzip();
            let report = run(&weights, &verdicts);

            prop_assert!(report.total_weight <= 0.0);
            prop_assert_eq!(report.normalized_score, 0.0);
        }
    }
}
