//! Linear trend forecast over weekly series.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const DEFAULT_HORIZON: usize = 8;

const DAYS_PER_STEP: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// ISO date (`YYYY-MM-DD`); a trailing time component is ignored
    pub t: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub t: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub slope: f64,
    pub intercept: f64,
    pub horizon: usize,
    pub fcst: Vec<ForecastPoint>,
}

fn parse_date(raw: &str) -> CoreResult<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| CoreError::validation("series", format!("Invalid date '{}': {}", raw, e)))
}

/// Least-squares line over the point index, projected `horizon` weeks past
/// the last observation.
///
/// A single point (or constant index) gives slope 0.
pub fn linreg_forecast(series: &[SeriesPoint], horizon: usize) -> CoreResult<Forecast> {
    let last = series
        .last()
        .ok_or_else(|| CoreError::validation("series", "Series must not be empty"))?;
    if let Some(p) = series.iter().find(|p| !p.y.is_finite()) {
        return Err(CoreError::validation(
            "series",
            format!("Non-finite value at {}", p.t),
        ));
    }
    let last_date = parse_date(&last.t)?;

    let n = series.len() as f64;
    let xbar = (n - 1.0) / 2.0;
    let ybar = series.iter().map(|p| p.y).sum::<f64>() / n;
    let (mut num, mut den) = (0.0, 0.0);
    for (i, p) in series.iter().enumerate() {
        let dx = i as f64 - xbar;
        num += dx * (p.y - ybar);
        den += dx * dx;
    }
    let slope = if den == 0.0 { 0.0 } else { num / den };
    let intercept = ybar - slope * xbar;

    let fcst = (1..=horizon)
        .map(|h| {
            let x = n - 1.0 + h as f64;
            let date = last_date + Duration::days(DAYS_PER_STEP * h as i64);
            ForecastPoint {
                t: date.format("%Y-%m-%d").to_string(),
                y: intercept + slope * x,
            }
        })
        .collect();

    Ok(Forecast {
        slope,
        intercept,
        horizon,
        fcst,
    })
}

/// Relative change from `b` to `a`; 0 when `b` is zero.
pub fn pct_change(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        0.0
    } else {
        (a - b) / b.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<SeriesPoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, y)| SeriesPoint {
                t: (start + Duration::days(7 * i as i64))
                    .format("%Y-%m-%d")
                    .to_string(),
                y: *y,
            })
            .collect()
    }

    #[test]
    fn test_perfect_line() {
        let out = linreg_forecast(&series(&[1.0, 3.0, 5.0, 7.0]), 2).unwrap();
        assert!((out.slope - 2.0).abs() < 1e-12);
        assert!((out.intercept - 1.0).abs() < 1e-12);
        assert_eq!(out.fcst.len(), 2);
        assert_eq!(out.fcst[0].t, "2024-01-29");
        assert!((out.fcst[0].y - 9.0).abs() < 1e-12);
        assert_eq!(out.fcst[1].t, "2024-02-05");
    }

    #[test]
    fn test_single_point_is_flat() {
        let out = linreg_forecast(&series(&[4.0]), DEFAULT_HORIZON).unwrap();
        assert_eq!(out.slope, 0.0);
        assert_eq!(out.fcst.len(), 8);
        assert!(out.fcst.iter().all(|p| p.y == 4.0));
    }

    #[test]
    fn test_timestamp_suffix_accepted() {
        let pts = vec![SeriesPoint {
            t: "2024-03-01T00:00:00Z".into(),
            y: 1.0,
        }];
        assert_eq!(linreg_forecast(&pts, 1).unwrap().fcst[0].t, "2024-03-08");
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(linreg_forecast(&[], 8).is_err());
        let bad = vec![SeriesPoint {
            t: "yesterday".into(),
            y: 1.0,
        }];
        assert!(linreg_forecast(&bad, 8).is_err());
        assert!(linreg_forecast(&series(&[1.0, f64::NAN]), 8).is_err());
    }

    #[test]
    fn test_pct_change() {
        assert_eq!(pct_change(5.0, 0.0), 0.0);
        assert!((pct_change(110.0, 100.0) - 0.1).abs() < 1e-12);
        assert!((pct_change(-1.0, -2.0) - 0.5).abs() < 1e-12);
    }
}
