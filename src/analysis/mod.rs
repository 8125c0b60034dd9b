//! Cohort classification and the statistics computed over loaded patients.
//!
//! Everything here reads a `&[PatientRecord]` and returns a value; nothing
//! mutates the records, so the operations can run in any order and repeat
//! with identical results.

pub mod cohort;
pub mod descriptive;
pub mod regression;
pub mod welch;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};
use thiserror::Error;

use crate::data::model::PatientRecord;

pub use cohort::{classify, CohortLabel};
pub use descriptive::{summarize_cohorts, CohortSummaries, CohortSummary};
pub use regression::{linear_regression, regress_onset_on_education, Regression};
pub use welch::{compare_onset, welch_t_test, CohortComparison, WelchTest, SIGNIFICANCE_LEVEL};

/// Conditions under which a statistic cannot be computed. None of these are
/// fatal; callers report them instead of a number.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "condition", rename_all = "snake_case")]
pub enum AnalysisError {
    #[error(
        "not enough data to compare groups (E4 Present n={present}, E4 Not Present n={not_present})"
    )]
    InsufficientCohortData { present: usize, not_present: usize },

    #[error("not enough points for regression (need at least 2, have {points})")]
    InsufficientRegressionData { points: usize },

    #[error("predictor and response lengths differ ({x} vs {y})")]
    MismatchedLengths { x: usize, y: usize },

    #[error("every predictor value is identical; the slope is undefined")]
    ConstantPredictor,

    #[error("both cohorts have zero variance; the t statistic is undefined")]
    ZeroVariance,

    #[error("t distribution with {df} degrees of freedom: {reason}")]
    Distribution { df: f64, reason: String },
}

/// Two-sided tail probability of `t` under Student's t with `df` degrees of
/// freedom.
pub(crate) fn two_sided_p(t: f64, df: f64) -> Result<f64, AnalysisError> {
    if t.is_infinite() {
        return Ok(0.0);
    }
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| AnalysisError::Distribution {
        df,
        reason: e.to_string(),
    })?;
    Ok((2.0 * dist.sf(t.abs())).min(1.0))
}

// ---------------------------------------------------------------------------
// Onset rows – the per-patient view handed to the presentation layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnsetRow {
    pub donor_id: Option<String>,
    pub cohort: CohortLabel,
    pub age_of_onset: f64,
}

/// `(donor id, cohort, onset age)` for every patient, in load order.
pub fn onset_rows(records: &[PatientRecord]) -> Vec<OnsetRow> {
    records
        .iter()
        .map(|p| OnsetRow {
            donor_id: p.donor_id.clone(),
            cohort: classify(p.genotype.as_deref()),
            age_of_onset: p.age_of_onset,
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::testutil::patient;
    use super::*;

    #[test]
    fn onset_rows_keep_order_and_label_cohorts() {
        let mut a = patient(Some("4/4"), 61.0, None);
        a.donor_id = Some("A".to_string());
        let b = patient(None, 77.0, None);
        let rows = onset_rows(&[a, b]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].donor_id.as_deref(), Some("A"));
        assert_eq!(rows[0].cohort, CohortLabel::E4Present);
        assert_eq!(rows[1].cohort, CohortLabel::E4NotPresent);
        assert_eq!(rows[1].age_of_onset, 77.0);
    }

    #[test]
    fn two_sided_p_is_symmetric_and_bounded() {
        let p_pos = two_sided_p(2.0, 10.0).unwrap();
        let p_neg = two_sided_p(-2.0, 10.0).unwrap();
        assert!((p_pos - p_neg).abs() < 1e-12);
        assert!((two_sided_p(0.0, 5.0).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(two_sided_p(f64::INFINITY, 3.0).unwrap(), 0.0);
        assert!(two_sided_p(1.0, 0.0).is_err());
    }
}
