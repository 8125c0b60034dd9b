use serde::Serialize;

use super::cohort::{classify, CohortLabel};
use super::AnalysisError;
use crate::data::model::PatientRecord;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Bessel-corrected (n − 1) variance; needs at least two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

pub fn sample_sd(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

// ---------------------------------------------------------------------------
// Cohort partition
// ---------------------------------------------------------------------------

/// Onset ages split by cohort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CohortSamples {
    pub present: Vec<f64>,
    pub not_present: Vec<f64>,
    /// Patients in `not_present` only because their genotype is missing.
    pub missing_genotype: usize,
}

impl CohortSamples {
    pub fn from_records(records: &[PatientRecord]) -> Self {
        let mut samples = CohortSamples::default();
        for p in records {
            match classify(p.genotype.as_deref()) {
                CohortLabel::E4Present => samples.present.push(p.age_of_onset),
                CohortLabel::E4NotPresent => {
                    if p.genotype.is_none() {
                        samples.missing_genotype += 1;
                    }
                    samples.not_present.push(p.age_of_onset);
                }
            }
        }
        samples
    }

    pub fn get(&self, label: CohortLabel) -> &[f64] {
        match label {
            CohortLabel::E4Present => &self.present,
            CohortLabel::E4NotPresent => &self.not_present,
        }
    }

    fn insufficient(&self) -> AnalysisError {
        AnalysisError::InsufficientCohortData {
            present: self.present.len(),
            not_present: self.not_present.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSummary {
    pub cohort: CohortLabel,
    pub n: usize,
    pub mean: f64,
    /// `None` for a single-patient cohort.
    pub sd: Option<f64>,
    /// Members counted here because the genotype was missing.
    pub missing_genotype: usize,
}

impl CohortSummary {
    fn new(cohort: CohortLabel, values: &[f64], missing_genotype: usize) -> Option<Self> {
        Some(CohortSummary {
            cohort,
            n: values.len(),
            mean: mean(values)?,
            sd: sample_sd(values),
            missing_genotype,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSummaries {
    pub present: CohortSummary,
    pub not_present: CohortSummary,
}

impl CohortSummaries {
    pub fn get(&self, label: CohortLabel) -> &CohortSummary {
        match label {
            CohortLabel::E4Present => &self.present,
            CohortLabel::E4NotPresent => &self.not_present,
        }
    }
}

/// Mean and SD of onset age per cohort. Fails when either cohort is empty.
pub fn summarize_cohorts(records: &[PatientRecord]) -> Result<CohortSummaries, AnalysisError> {
    summarize_samples(&CohortSamples::from_records(records))
}

pub(crate) fn summarize_samples(samples: &CohortSamples) -> Result<CohortSummaries, AnalysisError> {
    let present = CohortSummary::new(CohortLabel::E4Present, &samples.present, 0);
    let not_present = CohortSummary::new(
        CohortLabel::E4NotPresent,
        &samples.not_present,
        samples.missing_genotype,
    );
    match (present, not_present) {
        (Some(present), Some(not_present)) => Ok(CohortSummaries {
            present,
            not_present,
        }),
        _ => Err(samples.insufficient()),
    }
}
