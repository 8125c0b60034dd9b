use serde::Serialize;

use super::descriptive::{mean, sample_variance, summarize_samples, CohortSamples, CohortSummaries};
use super::{two_sided_p, AnalysisError};
use crate::data::model::PatientRecord;

/// p-values below this are reported as significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Welch's unequal-variance two-sample t-test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WelchTest {
    pub t: f64,
    /// Welch–Satterthwaite degrees of freedom.
    pub df: f64,
    /// Two-sided.
    pub p_value: f64,
    pub n_a: usize,
    pub n_b: usize,
    pub significant: bool,
}

/// Compare the means of `a` and `b`. Each sample needs at least two values
/// for its variance to exist.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Result<WelchTest, AnalysisError> {
    let insufficient = || AnalysisError::InsufficientCohortData {
        present: a.len(),
        not_present: b.len(),
    };
    let (Some(var_a), Some(var_b)) = (sample_variance(a), sample_variance(b)) else {
        return Err(insufficient());
    };
    let (Some(mean_a), Some(mean_b)) = (mean(a), mean(b)) else {
        return Err(insufficient());
    };

    let n_a = a.len() as f64;
    let n_b = b.len() as f64;
    let se_a = var_a / n_a;
    let se_b = var_b / n_b;
    let se2 = se_a + se_b;
    if se2 == 0.0 {
        return Err(AnalysisError::ZeroVariance);
    }

    let t = (mean_a - mean_b) / se2.sqrt();
    let df = se2.powi(2) / (se_a.powi(2) / (n_a - 1.0) + se_b.powi(2) / (n_b - 1.0));
    let p_value = two_sided_p(t, df)?;

    log::debug!("Welch t-test: t={t:.4}, df={df:.2}, p={p_value:.6}");
    Ok(WelchTest {
        t,
        df,
        p_value,
        n_a: a.len(),
        n_b: b.len(),
        significant: p_value < SIGNIFICANCE_LEVEL,
    })
}

// ---------------------------------------------------------------------------
// Cohort comparison – E4 Present is sample `a`, E4 Not Present is `b`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortComparison {
    pub summaries: CohortSummaries,
    pub test: WelchTest,
}

/// Summaries plus the Welch test of onset age between the two cohorts.
pub fn compare_onset(records: &[PatientRecord]) -> Result<CohortComparison, AnalysisError> {
    let samples = CohortSamples::from_records(records);
    let summaries = summarize_samples(&samples)?;
    let test = welch_t_test(&samples.present, &samples.not_present)?;
    Ok(CohortComparison { summaries, test })
}
