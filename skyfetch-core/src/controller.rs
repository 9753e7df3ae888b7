//! Search state machine: intents in, display commands out.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::{
    Config,
    display::{DisplayCommand, DisplaySink},
    error::{GatewayError, ValidationError},
    fetch::FetchPair,
    forecast::select_daily,
    gateway::{WeatherGateway, gateway_from_config},
    history::{Confirm, SearchHistory},
    model::CityQuery,
    store::{self, FileStore, KeyValueStore},
};

/// Everything a controller needs from the outside world.
pub struct AppContext {
    pub gateway: Arc<dyn WeatherGateway>,
    pub store: Box<dyn KeyValueStore>,
    pub config: Config,
}

impl AppContext {
    pub fn new(
        gateway: Arc<dyn WeatherGateway>,
        store: Box<dyn KeyValueStore>,
        config: Config,
    ) -> Self {
        Self { gateway, store, config }
    }

    /// OpenWeather gateway plus the file-backed store named by `config`.
    pub fn from_config(config: Config) -> Result<Self> {
        let gateway = gateway_from_config(&config)?;
        let store = FileStore::open(config.store_file_path()?);
        Ok(Self::new(gateway, Box::new(store), config))
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("gateway", &self.gateway)
            .field("units", &self.config.units)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Validating,
    Loading,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Search for the text currently in the input.
    Submit(String),
    /// Search for a recent-search chip, bypassing the input.
    ChipClicked(String),
    ClearHistory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Startup found no last city and showed the welcome state.
    Welcomed,
    /// Weather for this city was rendered.
    Rendered(String),
    Rejected(ValidationError),
    Failed(GatewayError),
    HistoryCleared,
    HistoryKept,
}

pub struct Controller<S: DisplaySink> {
    ctx: AppContext,
    history: SearchHistory,
    sink: S,
    confirm: Box<dyn Confirm>,
    state: ControllerState,
}

impl<S: DisplaySink> Controller<S> {
    pub fn new(ctx: AppContext, sink: S, confirm: Box<dyn Confirm>) -> Self {
        Self {
            ctx,
            history: SearchHistory::new(),
            sink,
            confirm,
            state: ControllerState::Idle,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Load persisted history, then either repeat the last successful
    /// search or show the welcome state.
    pub async fn start(&mut self) -> Outcome {
        self.history = SearchHistory::load(self.ctx.store.as_ref());
        self.emit_history();

        match store::last_city(self.ctx.store.as_ref()) {
            Some(city) => {
                info!(%city, "restoring last searched city");
                self.handle(Intent::Submit(city)).await
            }
            None => {
                self.sink.apply(DisplayCommand::Welcome);
                Outcome::Welcomed
            }
        }
    }

    /// Process one intent to completion. Intents are serialized by the
    /// exclusive borrow; the controller is `Idle` again on return.
    pub async fn handle(&mut self, intent: Intent) -> Outcome {
        let outcome = match intent {
            Intent::Submit(raw) => self.submit(&raw, true).await,
            Intent::ChipClicked(city) => self.submit(&city, false).await,
            Intent::ClearHistory => self.clear_history(),
        };
        self.state = ControllerState::Idle;
        outcome
    }

    async fn submit(&mut self, raw: &str, from_input: bool) -> Outcome {
        self.state = ControllerState::Validating;

        let city = match CityQuery::parse(raw) {
            Ok(city) => city,
            Err(e) => {
                self.sink.apply(DisplayCommand::Error(e.to_string()));
                return Outcome::Rejected(e);
            }
        };

        if from_input {
            self.sink.apply(DisplayCommand::ClearInput);
        }

        let outcome = self.search(city).await;
        self.sink.apply(DisplayCommand::SubmitEnabled(true));
        outcome
    }

    async fn search(&mut self, city: CityQuery) -> Outcome {
        self.state = ControllerState::Loading;
        self.sink.apply(DisplayCommand::SubmitEnabled(false));
        self.sink.apply(DisplayCommand::Loading);

        let pair = FetchPair::spawn(Arc::clone(&self.ctx.gateway), city.as_str());

        match pair.join().await {
            Ok(bundle) => {
                self.state = ControllerState::Success;

                let forecast = select_daily(&bundle.forecast.samples);
                info!(%city, resolved = %bundle.current.city, days = forecast.len(), "weather rendered");

                self.sink.apply(DisplayCommand::Weather {
                    current: bundle.current,
                    forecast,
                });
                self.sink.apply(DisplayCommand::FocusInput);

                self.history.record(city.as_str(), self.ctx.store.as_mut());
                store::set_last_city(self.ctx.store.as_mut(), city.as_str());
                self.emit_history();

                Outcome::Rendered(city.into_inner())
            }
            Err(e) => {
                self.state = ControllerState::Failed;
                warn!(%city, error = %e, "weather search failed");

                self.sink.apply(DisplayCommand::Error(e.user_message().to_string()));
                Outcome::Failed(e)
            }
        }
    }

    fn clear_history(&mut self) -> Outcome {
        if self.history.clear(self.confirm.as_mut(), self.ctx.store.as_mut()) {
            self.emit_history();
            Outcome::HistoryCleared
        } else {
            Outcome::HistoryKept
        }
    }

    fn emit_history(&mut self) {
        self.sink
            .apply(DisplayCommand::RecentSearches(self.history.entries().to_vec()));
    }
}
