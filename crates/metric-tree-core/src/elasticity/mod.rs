//! Elasticity estimation: how strongly each child metric drives its parent.
//!
//! Given a parent time series `y` and an ordered set of child series `x_i`,
//! fit `y ≈ Σ β_i x_i` (optionally with an intercept) by ordinary least
//! squares, then turn the coefficients into non-negative weights that sum to
//! one. The pipeline is:
//!
//! 1. Stack children column-wise in declared order, prepending a ones column
//!    when an intercept is requested.
//! 2. Solve least squares through an SVD ([`ols::fit`]).
//! 3. Report R², optional 95% confidence intervals, then clamp and normalize.
//!
//! Numerical degeneracies (collinear children, constant parent, all-zero
//! weights) never fail. They resolve to a pseudo-inverse, `R² = 0`, or an
//! equal split, and the last two leave an advisory note on the output.

mod ols;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::ordered_map::OrderedMap;

pub use ols::OlsFit;

/// Two-sided 95% normal quantile.
pub const Z_95: f64 = 1.96;

/// Sums at or below this are treated as zero.
pub const WEIGHT_SUM_EPS: f64 = 1e-12;

const NOTE_CLAMPED: &str = "Clamped negative weights to 0.";
const NOTE_EQUAL_WEIGHTS: &str = "All weights ~0; using equal weights.";

/// Estimator switches.
///
/// The default matches what callers get when they omit every flag: no
/// intercept, clamped, normalized, with intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateOptions {
    pub add_intercept: bool,
    pub non_negative: bool,
    pub normalize: bool,
    pub compute_ci: bool,
}

impl Default for EstimateOptions {
    fn default() -> Self {
        Self {
            add_intercept: false,
            non_negative: true,
            normalize: true,
            compute_ci: true,
        }
    }
}

/// Result of an elasticity fit.
///
/// `weights` and `ci95` are keyed by child name in the caller's order. The
/// intervals describe the raw coefficients, before clamping or normalizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticityOutput {
    pub weights: OrderedMap<f64>,
    pub ci95: Option<OrderedMap<(f64, f64)>>,
    pub r2: f64,
    pub n: usize,
    pub notes: Option<String>,
}

/// Estimate child-to-parent elasticities.
///
/// # Errors
///
/// - `CoreError::ValidationError` when `children` is empty, the parent is
///   empty, any series length differs from the parent's, or a value is not
///   finite.
pub fn estimate(
    parent: &[f64],
    children: &OrderedMap<Vec<f64>>,
    options: EstimateOptions,
) -> CoreResult<ElasticityOutput> {
    validate_inputs(parent, children)?;

    let n = parent.len();
    let columns: Vec<&[f64]> = children.values().map(Vec::as_slice).collect();
    let fit = ols::fit(parent, &columns, options.add_intercept)?;

    let offset = usize::from(options.add_intercept);
    let raw: Vec<f64> = fit.beta[offset..].to_vec();
    let names: Vec<&str> = children.keys().collect();

    let ci95 = options.compute_ci.then(|| {
        names
            .iter()
            .zip(&raw)
            .zip(&fit.std_errors[offset..])
            .map(|((name, beta), se)| (*name, (beta - Z_95 * se, beta + Z_95 * se)))
            .collect::<OrderedMap<(f64, f64)>>()
    });

    let mut notes = Vec::new();
    let mut weights = raw;

    if options.non_negative {
        if weights.iter().any(|w| *w < 0.0) {
            notes.push(NOTE_CLAMPED);
        }
        for w in weights.iter_mut() {
            *w = w.max(0.0);
        }
    }

    if options.normalize {
        let sum: f64 = weights.iter().sum();
        if sum <= WEIGHT_SUM_EPS {
            notes.push(NOTE_EQUAL_WEIGHTS);
            let equal = 1.0 / weights.len() as f64;
            weights.iter_mut().for_each(|w| *w = equal);
        } else {
            weights.iter_mut().for_each(|w| *w /= sum);
        }
    }

    debug!(
        n,
        children = names.len(),
        r2 = fit.r2,
        notes = notes.len(),
        "Elasticity fit complete"
    );

    Ok(ElasticityOutput {
        weights: names.into_iter().zip(weights).collect(),
        ci95,
        r2: fit.r2,
        n,
        notes: if notes.is_empty() {
            None
        } else {
            Some(notes.join(" "))
        },
    })
}

fn validate_inputs(parent: &[f64], children: &OrderedMap<Vec<f64>>) -> CoreResult<()> {
    if children.is_empty() {
        return Err(CoreError::validation(
            "children",
            "children cannot be empty",
        ));
    }
    if parent.is_empty() {
        return Err(CoreError::validation(
            "parent",
            "parent series cannot be empty",
        ));
    }
    if parent.iter().any(|v| !v.is_finite()) {
        return Err(CoreError::validation(
            "parent",
            "parent series contains non-finite values",
        ));
    }

    let n = parent.len();
    for (name, series) in children.iter() {
        if series.len() != n {
            return Err(CoreError::validation(
                "children",
                format!(
                    "Length mismatch for child '{}': expected {}, got {}",
                    name,
                    n,
                    series.len()
                ),
            ));
        }
        if series.iter().any(|v| !v.is_finite()) {
            return Err(CoreError::validation(
                "children",
                format!("Child '{}' contains non-finite values", name),
            ));
        }
    }
    Ok(())
}
