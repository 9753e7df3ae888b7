//! Fan-out/fan-in of the two gateway calls behind one search.
//!
//! Both tasks start together; the pair completes only if both succeed.

use std::sync::Arc;

use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

use crate::{
    error::GatewayError,
    gateway::WeatherGateway,
    model::{CurrentWeather, ForecastPayload},
};

/// Both halves of a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherBundle {
    pub current: CurrentWeather,
    pub forecast: ForecastPayload,
}

#[derive(Debug)]
pub struct FetchPair {
    current: JoinHandle<Result<CurrentWeather, GatewayError>>,
    forecast: JoinHandle<Result<ForecastPayload, GatewayError>>,
}

impl FetchPair {
    /// Issue both requests for `city` on the tokio runtime.
    pub fn spawn(gateway: Arc<dyn WeatherGateway>, city: &str) -> Self {
        debug!(city, "spawning current and forecast requests");

        let current = {
            let gateway = Arc::clone(&gateway);
            let city = city.to_string();
            tokio::spawn(async move { gateway.fetch_current(&city).await })
        };
        let forecast = {
            let city = city.to_string();
            tokio::spawn(async move { gateway.fetch_forecast(&city).await })
        };

        Self { current, forecast }
    }

    /// Wait for both tasks. The first failure observed wins and the other
    /// task is aborted; no partial result is returned.
    pub async fn join(self) -> Result<WeatherBundle, GatewayError> {
        let Self { current, forecast } = self;

        let current = match current.await.map_err(task_failure).and_then(|r| r) {
            Ok(current) => current,
            Err(e) => {
                forecast.abort();
                return Err(e);
            }
        };

        let forecast = forecast.await.map_err(task_failure).and_then(|r| r)?;

        Ok(WeatherBundle { current, forecast })
    }

    /// Cancel both requests.
    pub fn abort(&self) {
        self.current.abort();
        self.forecast.abort();
    }
}

fn task_failure(err: JoinError) -> GatewayError {
    if err.is_cancelled() {
        GatewayError::Transient("weather request was cancelled".to_string())
    } else {
        GatewayError::Transient(format!("weather request task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct ScriptedGateway {
        current_fails: bool,
        forecast_fails: bool,
        forecast_delay: Option<Duration>,
        forecast_finished: AtomicBool,
    }

    #[async_trait]
    impl WeatherGateway for ScriptedGateway {
        async fn fetch_current(&self, city: &str) -> Result<CurrentWeather, GatewayError> {
            if self.current_fails {
                return Err(GatewayError::NotFound(city.to_string()));
            }
            Ok(CurrentWeather {
                city: city.to_string(),
                temperature: 1.0,
                description: "mist".into(),
                icon: "50d".into(),
            })
        }

        async fn fetch_forecast(&self, _city: &str) -> Result<ForecastPayload, GatewayError> {
            if let Some(delay) = self.forecast_delay {
                tokio::time::sleep(delay).await;
            }
            self.forecast_finished.store(true, Ordering::SeqCst);
            if self.forecast_fails {
                return Err(GatewayError::Transient("boom".into()));
            }
            Ok(ForecastPayload::default())
        }
    }

    #[tokio::test]
    async fn join_returns_both_halves() {
        let gateway = Arc::new(ScriptedGateway::default());
        let bundle = FetchPair::spawn(gateway, "Oslo").join().await.expect("success");

        assert_eq!(bundle.current.city, "Oslo");
        assert!(bundle.forecast.samples.is_empty());
    }

    #[tokio::test]
    async fn current_failure_fails_the_pair_and_aborts_forecast() {
        let gateway = Arc::new(ScriptedGateway {
            current_fails: true,
            forecast_delay: Some(Duration::from_secs(30)),
            ..Default::default()
        });

        let err = FetchPair::spawn(gateway.clone(), "Atlantis").join().await.unwrap_err();

        assert!(err.is_not_found());
        assert!(!gateway.forecast_finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn forecast_failure_discards_successful_current() {
        let gateway = Arc::new(ScriptedGateway {
            forecast_fails: true,
            ..Default::default()
        });

        let err = FetchPair::spawn(gateway, "Oslo").join().await.unwrap_err();
        assert_eq!(err, GatewayError::Transient("boom".into()));
    }

    #[tokio::test]
    async fn aborted_pair_reports_transient() {
        let gateway = Arc::new(ScriptedGateway {
            forecast_delay: Some(Duration::from_secs(30)),
            ..Default::default()
        });

        let pair = FetchPair::spawn(gateway, "Oslo");
        pair.abort();

        let err = pair.join().await.unwrap_err();
        assert!(matches!(err, GatewayError::Transient(_)));
    }
}
