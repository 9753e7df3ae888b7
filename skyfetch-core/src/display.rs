//! Abstract display commands and the surfaces that consume them.

use crate::{
    model::{CurrentWeather, ForecastSample, Units},
    render::{self, Markup},
};

pub const SUBMIT_LABEL: &str = "🔍 Search";
pub const SUBMIT_BUSY_LABEL: &str = "Searching...";

/// What the controller wants shown. Surfaces decide how.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    Welcome,
    Loading,
    /// Current conditions plus the already-reduced daily forecast.
    Weather {
        current: CurrentWeather,
        forecast: Vec<ForecastSample>,
    },
    Error(String),
    /// Most-recent-first; an empty list hides the section.
    RecentSearches(Vec<String>),
    SubmitEnabled(bool),
    ClearInput,
    FocusInput,
}

pub trait DisplaySink {
    fn apply(&mut self, command: DisplayCommand);
}

/// Keeps every command it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    commands: Vec<DisplayCommand>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    pub fn take(&mut self) -> Vec<DisplayCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl DisplaySink for RecordingSink {
    fn apply(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }
}

/// In-memory model of the page: one display region, the chip row, the
/// search input and its submit control.
#[derive(Debug)]
pub struct HtmlSurface {
    units: Units,
    region: Markup,
    chips: Markup,
    chips_visible: bool,
    submit_enabled: bool,
    input: String,
    input_focused: bool,
}

impl HtmlSurface {
    pub fn new(units: Units) -> Self {
        Self {
            units,
            region: Markup::default(),
            chips: Markup::default(),
            chips_visible: false,
            submit_enabled: true,
            input: String::new(),
            input_focused: false,
        }
    }

    pub fn region(&self) -> &Markup {
        &self.region
    }

    pub fn chips(&self) -> &Markup {
        &self.chips
    }

    pub fn chips_visible(&self) -> bool {
        self.chips_visible
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submit_enabled { SUBMIT_LABEL } else { SUBMIT_BUSY_LABEL }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: &str) {
        self.input = value.to_string();
        self.input_focused = false;
    }

    pub fn input_focused(&self) -> bool {
        self.input_focused
    }
}

impl DisplaySink for HtmlSurface {
    fn apply(&mut self, command: DisplayCommand) {
        match command {
            DisplayCommand::Welcome => self.region = render::welcome(),
            DisplayCommand::Loading => self.region = render::loading(),
            DisplayCommand::Weather { current, forecast } => {
                self.region = render::current_weather(&current, self.units);
                self.region.append(&render::forecast_list(&forecast, self.units));
            }
            DisplayCommand::Error(message) => self.region = render::error(&message),
            DisplayCommand::RecentSearches(cities) => {
                self.chips = render::recent_chips(&cities);
                self.chips_visible = !cities.is_empty();
            }
            DisplayCommand::SubmitEnabled(enabled) => self.submit_enabled = enabled,
            DisplayCommand::ClearInput => self.input.clear(),
            DisplayCommand::FocusInput => self.input_focused = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather() -> DisplayCommand {
        DisplayCommand::Weather {
            current: CurrentWeather {
                city: "Paris".into(),
                temperature: 18.6,
                description: "clear sky".into(),
                icon: "01d".into(),
            },
            forecast: vec![ForecastSample {
                timestamp: 1_717_416_000,
                dt_txt: "2024-06-03 12:00:00".into(),
                temperature: 20.0,
                description: "sunny".into(),
                icon: "01d".into(),
            }],
        }
    }

    #[test]
    fn weather_replaces_region_and_appends_forecast() {
        let mut surface = HtmlSurface::new(Units::Metric);
        surface.apply(DisplayCommand::Loading);
        surface.apply(weather());

        let html = surface.region().as_str();
        assert!(!html.contains("loading-container"));
        assert!(html.contains("19°C"));
        assert!(html.contains("<p>20°C</p>"));
        assert!(html.find("weather-info") < html.find("forecast-section"));
    }

    #[test]
    fn error_replaces_whole_region() {
        let mut surface = HtmlSurface::new(Units::Metric);
        surface.apply(weather());
        surface.apply(DisplayCommand::Error("City not found. Please check spelling.".into()));

        let html = surface.region().as_str();
        assert!(html.contains("City not found"));
        assert!(!html.contains("forecast-section"));
    }

    #[test]
    fn chip_row_hides_when_empty() {
        let mut surface = HtmlSurface::new(Units::Metric);
        surface.apply(DisplayCommand::RecentSearches(vec!["Paris".into()]));
        assert!(surface.chips_visible());

        surface.apply(DisplayCommand::RecentSearches(Vec::new()));
        assert!(!surface.chips_visible());
        assert!(surface.chips().is_empty());
    }

    #[test]
    fn submit_control_and_input_follow_commands() {
        let mut surface = HtmlSurface::new(Units::Metric);
        surface.set_input("Paris");

        surface.apply(DisplayCommand::ClearInput);
        surface.apply(DisplayCommand::SubmitEnabled(false));
        assert_eq!(surface.input(), "");
        assert_eq!(surface.submit_label(), SUBMIT_BUSY_LABEL);

        surface.apply(DisplayCommand::SubmitEnabled(true));
        surface.apply(DisplayCommand::FocusInput);
        assert!(surface.submit_enabled());
        assert_eq!(surface.submit_label(), SUBMIT_LABEL);
        assert!(surface.input_focused());
    }

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.apply(DisplayCommand::Welcome);
        sink.apply(DisplayCommand::Loading);

        assert_eq!(sink.commands(), &[DisplayCommand::Welcome, DisplayCommand::Loading]);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.commands().is_empty());
    }
}
