use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{
    Config,
    error::GatewayError,
    gateway::openweather::OpenWeatherGateway,
    model::{CurrentWeather, ForecastPayload},
};

pub mod openweather;

/// Remote source of current conditions and the 5-day/3-hour forecast.
///
/// Both calls are single-shot: no retries, no caching.
#[async_trait]
pub trait WeatherGateway: Send + Sync + Debug {
    async fn fetch_current(&self, city: &str) -> Result<CurrentWeather, GatewayError>;

    async fn fetch_forecast(&self, city: &str) -> Result<ForecastPayload, GatewayError>;
}

/// Construct the OpenWeather gateway from config.
pub fn gateway_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherGateway>> {
    let gateway = OpenWeatherGateway::from_config(config)?;
    Ok(Arc::new(gateway))
}
