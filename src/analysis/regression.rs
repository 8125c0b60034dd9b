use serde::Serialize;

use super::{two_sided_p, AnalysisError};
use crate::data::model::PatientRecord;

/// Keeps the t statistic finite when the fit is perfect (r = ±1).
const TINY: f64 = 1.0e-20;

/// Ordinary least-squares fit `y = slope · x + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient.
    pub r: f64,
    pub r_squared: f64,
    /// Two-sided p-value for the null hypothesis that the slope is zero.
    pub p_value: f64,
    /// Standard error of the slope.
    pub std_err: f64,
    pub intercept_std_err: f64,
    pub n: usize,
}

impl Regression {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit `y` on `x`. Both slices must have the same length, with at least two
/// points and some spread in `x`.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<Regression, AnalysisError> {
    if x.len() != y.len() {
        return Err(AnalysisError::MismatchedLengths {
            x: x.len(),
            y: y.len(),
        });
    }
    let n = x.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientRegressionData { points: n });
    }
    let nf = n as f64;

    let x_mean = x.iter().sum::<f64>() / nf;
    let y_mean = y.iter().sum::<f64>() / nf;

    // Biased (divide by n) second moments.
    let mut ssxm = 0.0;
    let mut ssym = 0.0;
    let mut ssxym = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        ssxm += dx * dx;
        ssym += dy * dy;
        ssxym += dx * dy;
    }
    ssxm /= nf;
    ssym /= nf;
    ssxym /= nf;

    if ssxm == 0.0 {
        return Err(AnalysisError::ConstantPredictor);
    }

    let r_den = (ssxm * ssym).sqrt();
    let r = if r_den == 0.0 {
        0.0
    } else {
        (ssxym / r_den).clamp(-1.0, 1.0)
    };

    let slope = ssxym / ssxm;
    let intercept = y_mean - slope * x_mean;

    let (p_value, std_err) = if n == 2 {
        // A line through two points is exact; nothing is left to estimate.
        (if y[0] == y[1] { 1.0 } else { 0.0 }, 0.0)
    } else {
        let df = nf - 2.0;
        let t = r * (df / ((1.0 - r) * (1.0 + r) + TINY)).sqrt();
        let p = two_sided_p(t, df)?;
        let se = ((1.0 - r * r).max(0.0) * ssym / ssxm / df).sqrt();
        (p, se)
    };
    let intercept_std_err = std_err * (ssxm + x_mean * x_mean).sqrt();

    log::debug!("Regression over {n} points: slope={slope:.4}, intercept={intercept:.4}, r={r:.4}");
    Ok(Regression {
        slope,
        intercept,
        r,
        r_squared: r * r,
        p_value,
        std_err,
        intercept_std_err,
        n,
    })
}

/// Regress onset age (response) on years of education (predictor), using
/// only patients with both values.
pub fn regress_onset_on_education(records: &[PatientRecord]) -> Result<Regression, AnalysisError> {
    let (x, y): (Vec<f64>, Vec<f64>) = education_onset_pairs(records).into_iter().unzip();
    linear_regression(&x, &y)
}

/// `(years of education, onset age)` for every patient with an education value.
pub fn education_onset_pairs(records: &[PatientRecord]) -> Vec<(f64, f64)> {
    records
        .iter()
        .filter_map(|p| p.years_education.map(|e| (e, p.age_of_onset)))
        .collect()
}
