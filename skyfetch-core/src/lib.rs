//! Core library for the SkyFetch weather client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather gateway and the two-call fetch pair
//! - Forecast reduction and HTML rendering
//! - Recent-search history over a key-value store
//! - The controller state machine that ties them together
//!
//! It is used by `skyfetch-cli`, but any surface implementing
//! [`DisplaySink`] can drive the controller.

pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod fetch;
pub mod forecast;
pub mod gateway;
pub mod history;
pub mod model;
pub mod render;
pub mod store;

pub use config::Config;
pub use controller::{AppContext, Controller, ControllerState, Intent, Outcome};
pub use display::{DisplayCommand, DisplaySink, HtmlSurface, RecordingSink};
pub use error::{GatewayError, StoreError, ValidationError};
pub use gateway::{WeatherGateway, gateway_from_config};
pub use history::{Confirm, SearchHistory};
pub use model::{CityQuery, CurrentWeather, ForecastPayload, ForecastSample, Units};
pub use store::{FileStore, KeyValueStore, MemoryStore};
