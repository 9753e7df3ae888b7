use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::error::ValidationError;

const ICON_URL_BASE: &str = "https://openweathermap.org/img/wn";

/// Minimum number of characters a city query must have after trimming.
pub const MIN_CITY_CHARS: usize = 2;

/// A trimmed, validated city name as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery(String);

impl CityQuery {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let city = raw.trim();

        if city.is_empty() {
            return Err(ValidationError::Empty);
        }
        if city.chars().count() < MIN_CITY_CHARS {
            return Err(ValidationError::TooShort);
        }

        Ok(Self(city.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CityQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unit system sent to the API and used for the temperature suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial, standard."
            )),
        }
    }
}

/// Current conditions for a resolved city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
}

/// One 3-hourly sample of the raw forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Unix seconds.
    pub timestamp: i64,
    /// Textual UTC timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub dt_txt: String,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
}

impl ForecastSample {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Short English weekday name ("Mon".."Sun"), in UTC.
    pub fn weekday(&self) -> String {
        self.observed_at()
            .map(|dt| dt.format("%a").to_string())
            .unwrap_or_default()
    }
}

/// The raw forecast response: ~40 samples over 5 days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastPayload {
    pub samples: Vec<ForecastSample>,
}

pub fn icon_url(icon: &str) -> String {
    format!("{ICON_URL_BASE}/{icon}@2x.png")
}

/// Temperature as shown on the page: rounded half away from zero.
pub fn display_temperature(value: f64) -> i64 {
    value.round() as i64
}
