//! Ordinary least-squares regression of one column on another.

use polars::prelude::DataFrame;
use statrs::distribution::StudentsT;

use crate::error::{Result, StatsError};
use crate::options::Alternative;
use crate::sample::paired_values;

const TEST: &str = "linear regression";

/// Guards the t statistic against `r == ±1`.
const TINY: f64 = 1.0e-20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    pub r_value: f64,
    /// p-value of the test that the slope is zero.
    pub p_value: f64,
    pub slope_stderr: f64,
    pub intercept_stderr: f64,
    pub pairs: usize,
}

/// Regresses `y` on `x`, dropping rows where either is missing.
pub fn linear_regression(
    df: &DataFrame,
    x: &str,
    y: &str,
    alternative: Alternative,
) -> Result<RegressionResult> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = paired_values(df, x, y)?.into_iter().unzip();
    linregress(&xs, &ys, alternative)
}

/// Regression on raw pairs.
pub fn linregress(x: &[f64], y: &[f64], alternative: Alternative) -> Result<RegressionResult> {
    let n = x.len().min(y.len());
    if n < 2 {
        return Err(StatsError::InsufficientData {
            test: TEST,
            unit: "pairs",
            needed: 2,
            found: n,
        });
    }
    let (x, y) = (&x[..n], &y[..n]);
    let nf = n as f64;
    let x_mean = x.iter().sum::<f64>() / nf;
    let y_mean = y.iter().sum::<f64>() / nf;
    // Population (co)variances.
    let (mut ssxm, mut ssym, mut ssxym) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        ssxm += (a - x_mean) * (a - x_mean);
        ssym += (b - y_mean) * (b - y_mean);
        ssxym += (a - x_mean) * (b - y_mean);
    }
    ssxm /= nf;
    ssym /= nf;
    ssxym /= nf;
    if ssxm == 0.0 {
        return Err(StatsError::Degenerate {
            test: TEST,
            reason: "all x values are identical".to_string(),
        });
    }

    let r_den = (ssxm * ssym).sqrt();
    let r_value = if r_den == 0.0 {
        0.0
    } else {
        (ssxym / r_den).clamp(-1.0, 1.0)
    };
    let slope = ssxym / ssxm;
    let intercept = y_mean - slope * x_mean;

    if n == 2 {
        return Ok(RegressionResult {
            slope,
            intercept,
            r_value,
            p_value: if y[0] == y[1] { 1.0 } else { 0.0 },
            slope_stderr: 0.0,
            intercept_stderr: 0.0,
            pairs: n,
        });
    }

    let df = (n - 2) as f64;
    let t = r_value * (df / ((1.0 - r_value + TINY) * (1.0 + r_value + TINY))).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Distribution {
        message: e.to_string(),
    })?;
    let p_value = alternative.symmetric_p_value(&dist, t);
    let slope_stderr = ((1.0 - r_value * r_value) * ssym / ssxm / df).sqrt();
    let intercept_stderr = slope_stderr * (ssxm + x_mean * x_mean).sqrt();

    Ok(RegressionResult {
        slope,
        intercept,
        r_value,
        p_value,
        slope_stderr,
        intercept_stderr,
        pairs: n,
    })
}
