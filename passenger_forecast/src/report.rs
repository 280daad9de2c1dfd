//! Presentation collaborator: per-step forecast lines

use crate::data::{add_months, Observation};
use crate::error::{ForecastError, Result};
use crate::models::ForecastResult;
use chrono::NaiveDate;
use serde::Serialize;

/// Passenger counts cannot be negative
pub const PASSENGER_FLOOR: f64 = 0.0;

/// One forecast step ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastLine {
    /// Forecasted month
    pub month: NaiveDate,
    /// Observed value for the month, when known
    pub actual: Option<f64>,
    /// Lower estimate, clamped at [`PASSENGER_FLOOR`]
    pub lower: f64,
    /// Point forecast
    pub point: f64,
    /// Upper estimate
    pub upper: f64,
}

impl std::fmt::Display for ForecastLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Date: {}", self.month.format("%Y-%m"))?;
        match self.actual {
            Some(actual) => writeln!(f, "Actual Passengers: {}", actual)?,
            None => writeln!(f, "Actual Passengers: n/a")?,
        }
        writeln!(f, "Lower Estimate: {:.2}", self.lower)?;
        writeln!(f, "Forecast: {:.2}", self.point)?;
        writeln!(f, "Upper Estimate: {:.2}", self.upper)?;
        Ok(())
    }
}

/// Pair each forecast step with its month and any matching actual value.
///
/// Step `k` (0-based) is dated `first_month + k` months.
pub fn render_forecast(
    result: &ForecastResult,
    first_month: NaiveDate,
    actuals: &[Observation],
) -> Result<Vec<ForecastLine>> {
    let lower = result.clamped_lower_bound(PASSENGER_FLOOR);

    (0..result.horizon())
        .map(|k| -> Result<ForecastLine> {
            let month = add_months(first_month, k as u32).ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Month overflow {} steps after {}",
                    k, first_month
                ))
            })?;
            let actual = actuals
                .iter()
                .find(|o| o.timestamp() == month)
                .map(Observation::value);

            Ok(ForecastLine {
                month,
                actual,
                lower: lower[k],
                point: result.point_forecast()[k],
                upper: result.upper_bound()[k],
            })
        })
        .collect()
}

/// Render lines under a heading, one blank line apart
pub fn format_lines(lines: &[ForecastLine]) -> String {
    let mut out = String::from(" > Passenger Forecast\n\n");
    for line in lines {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}
