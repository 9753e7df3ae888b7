//! Reduces the 3-hourly forecast to one representative sample per day.

use chrono::{NaiveDateTime, Timelike};
use tracing::debug;

use crate::model::ForecastSample;

/// Number of daily entries shown.
pub const FORECAST_DAYS: usize = 5;

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Whether the sample's textual timestamp is the 12:00:00 slot.
pub fn is_midday(sample: &ForecastSample) -> bool {
    match NaiveDateTime::parse_from_str(&sample.dt_txt, DT_TXT_FORMAT) {
        Ok(ts) => ts.hour() == 12 && ts.minute() == 0 && ts.second() == 0,
        Err(_) => {
            debug!(dt_txt = %sample.dt_txt, "skipping forecast sample with unparseable timestamp");
            false
        }
    }
}

/// Keep midday samples in chronological order, then truncate to
/// [`FORECAST_DAYS`]. Days without a midday sample are simply absent.
pub fn select_daily(samples: &[ForecastSample]) -> Vec<ForecastSample> {
    let daily: Vec<ForecastSample> = samples
        .iter()
        .filter(|s| is_midday(s))
        .take(FORECAST_DAYS)
        .cloned()
        .collect();

    debug!(raw = samples.len(), selected = daily.len(), "reduced forecast");
    daily
}
