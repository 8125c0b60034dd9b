use std::fmt::Write as _;

use serde::Serialize;

use crate::analysis::{
    compare_onset, onset_rows, regress_onset_on_education, summarize_cohorts, AnalysisError,
    CohortLabel, CohortSummaries, OnsetRow, Regression, WelchTest, SIGNIFICANCE_LEVEL,
};
use crate::data::model::PatientRecord;

// ---------------------------------------------------------------------------
// Outcome – a statistic or the reason it could not be computed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome<T> {
    Computed(T),
    Unavailable(AnalysisError),
}

impl<T> From<Result<T, AnalysisError>> for Outcome<T> {
    fn from(r: Result<T, AnalysisError>) -> Self {
        match r {
            Ok(v) => Outcome::Computed(v),
            Err(e) => Outcome::Unavailable(e),
        }
    }
}

impl<T> Outcome<T> {
    pub fn computed(&self) -> Option<&T> {
        match self {
            Outcome::Computed(v) => Some(v),
            Outcome::Unavailable(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisReport – everything the console and JSON output show
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub rows: Vec<OnsetRow>,
    pub cohorts: Outcome<CohortSummaries>,
    pub comparison: Outcome<WelchTest>,
    pub regression: Outcome<Regression>,
}

impl AnalysisReport {
    pub fn build(records: &[PatientRecord]) -> Self {
        AnalysisReport {
            rows: onset_rows(records),
            cohorts: summarize_cohorts(records).into(),
            comparison: compare_onset(records).map(|c| c.test).into(),
            regression: regress_onset_on_education(records).into(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Tab-separated patient listing followed by the three analyses.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "DonorID\tGroup\t\tAgeOnset")?;
        for row in &self.rows {
            writeln!(
                out,
                "{}\t{}\t{}",
                row.donor_id.as_deref().unwrap_or(""),
                row.cohort,
                format_age(row.age_of_onset)
            )?;
        }

        writeln!(out, "\n--- Cohort Summary ---")?;
        match &self.cohorts {
            Outcome::Computed(s) => {
                for label in CohortLabel::ALL {
                    let c = s.get(label);
                    let sd = c.sd.map_or_else(|| "n/a".to_string(), |sd| format!("{sd:.2}"));
                    write!(out, "{:<15} n={:<4} mean={:.2}  sd={sd}", c.cohort.label(), c.n, c.mean)?;
                    if c.missing_genotype > 0 {
                        write!(out, "  ({} without genotype)", c.missing_genotype)?;
                    }
                    writeln!(out)?;
                }
            }
            Outcome::Unavailable(e) => writeln!(out, "{e}")?,
        }

        writeln!(out, "\n--- Statistical Comparison (Welch's t-test) ---")?;
        match (&self.comparison, &self.cohorts) {
            (Outcome::Computed(t), Outcome::Computed(s)) => {
                writeln!(
                    out,
                    "Group sizes: E4 Present n={}, E4 Not Present n={}",
                    t.n_a, t.n_b
                )?;
                writeln!(
                    out,
                    "Means: E4 Present = {:.2}, E4 Not Present = {:.2}",
                    s.present.mean, s.not_present.mean
                )?;
                writeln!(out, "t-value = {:.4}", t.t)?;
                writeln!(out, "p-value = {:.6}", t.p_value)?;
                if t.significant {
                    writeln!(
                        out,
                        "Result: Statistically significant difference at α = {SIGNIFICANCE_LEVEL}"
                    )?;
                } else {
                    writeln!(out, "Result: Not statistically significant at α = {SIGNIFICANCE_LEVEL}")?;
                }
            }
            (Outcome::Unavailable(e), _) | (_, Outcome::Unavailable(e)) => writeln!(out, "{e}")?,
        }

        writeln!(out, "\n--- Linear Regression: Education vs. Age of Onset ---")?;
        match &self.regression {
            Outcome::Computed(r) => {
                writeln!(out, "Points = {}", r.n)?;
                writeln!(out, "Slope = {:.4}", r.slope)?;
                writeln!(out, "Intercept = {:.4}", r.intercept)?;
                writeln!(out, "R-squared = {:.4}", r.r_squared)?;
                writeln!(out, "p-value = {:.6}", r.p_value)?;
                writeln!(out, "Std. error = {:.4}", r.std_err)?;
            }
            Outcome::Unavailable(e) => writeln!(out, "{e}")?,
        }
        Ok(())
    }
}

/// Whole ages print without a decimal point (`81.0` → `81`).
pub fn format_age(age: f64) -> String {
    if age.fract() == 0.0 && age.abs() < 1e15 {
        format!("{}", age as i64)
    } else {
        format!("{age}")
    }
}
