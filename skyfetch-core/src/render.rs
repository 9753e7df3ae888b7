//! Pure mapping from display data to HTML fragments.
//!
//! Nothing here touches the network or the store; every function is a
//! function of its arguments.

use crate::model::{CurrentWeather, ForecastSample, Units, display_temperature, icon_url};

/// An opaque HTML fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append `other` below this fragment.
    pub fn append(&mut self, other: &Markup) {
        self.0.push_str(&other.0);
    }
}

impl std::fmt::Display for Markup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn temperature(value: f64, units: Units) -> String {
    format!("{}{}", display_temperature(value), units.symbol())
}

pub fn welcome() -> Markup {
    Markup(
        "<div class=\"welcome-message\">\
         <h2>🌤️ Welcome to SkyFetch</h2>\
         <p>Enter a city name above to get started!</p>\
         </div>"
            .to_string(),
    )
}

pub fn loading() -> Markup {
    Markup(
        "<div class=\"loading-container\">\
         <div class=\"spinner\"></div>\
         <p>Loading weather data...</p>\
         </div>"
            .to_string(),
    )
}

pub fn current_weather(current: &CurrentWeather, units: Units) -> Markup {
    let description = escape(&current.description);
    Markup(format!(
        "<div class=\"weather-info\">\
         <h2 class=\"city-name\">{city}</h2>\
         <img src=\"{icon}\" alt=\"{description}\" class=\"weather-icon\">\
         <div class=\"temperature\">{temp}</div>\
         <p class=\"description\">{description}</p>\
         </div>",
        city = escape(&current.city),
        icon = escape(&icon_url(&current.icon)),
        temp = temperature(current.temperature, units),
    ))
}

pub fn forecast_list(samples: &[ForecastSample], units: Units) -> Markup {
    let cards: String = samples
        .iter()
        .map(|day| {
            let description = escape(&day.description);
            format!(
                "<div class=\"forecast-card\">\
                 <h4>{weekday}</h4>\
                 <img src=\"{icon}\" alt=\"{description}\">\
                 <p>{temp}</p>\
                 <p>{description}</p>\
                 </div>",
                weekday = day.weekday(),
                icon = escape(&icon_url(&day.icon)),
                temp = temperature(day.temperature, units),
            )
        })
        .collect();

    Markup(format!(
        "<div class=\"forecast-section\">\
         <h3 class=\"forecast-title\">5-Day Forecast</h3>\
         <div class=\"forecast-container\">{cards}</div>\
         </div>"
    ))
}

pub fn error(message: &str) -> Markup {
    Markup(format!(
        "<div class=\"error-message\">\
         <h3>⚠️ Oops!</h3>\
         <p>{}</p>\
         </div>",
        escape(message)
    ))
}

/// Chip row for recent searches; empty input renders nothing.
pub fn recent_chips(cities: &[String]) -> Markup {
    if cities.is_empty() {
        return Markup::default();
    }

    let chips: String = cities
        .iter()
        .map(|city| {
            let city = escape(city);
            format!("<button class=\"recent-chip\" data-city=\"{city}\">{city}</button>")
        })
        .collect();

    Markup(format!(
        "<div class=\"recent-searches\">\
         <h4>Recent Searches</h4>\
         <div class=\"recent-chips\">{chips}</div>\
         </div>"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> CurrentWeather {
        CurrentWeather {
            city: "Paris".into(),
            temperature: 18.6,
            description: "clear sky".into(),
            icon: "01d".into(),
        }
    }

    #[test]
    fn current_weather_rounds_temperature_and_links_icon() {
        let html = current_weather(&paris(), Units::Metric);

        assert!(html.as_str().contains("<h2 class=\"city-name\">Paris</h2>"));
        assert!(html.as_str().contains("<div class=\"temperature\">19°C</div>"));
        assert!(html.as_str().contains("https://openweathermap.org/img/wn/01d@2x.png"));
        assert!(html.as_str().contains("alt=\"clear sky\""));
    }

    #[test]
    fn forecast_list_renders_one_card_per_sample() {
        let samples = vec![
            ForecastSample {
                timestamp: 1_717_416_000,
                dt_txt: "2024-06-03 12:00:00".into(),
                temperature: 20.0,
                description: "light rain".into(),
                icon: "10d".into(),
            },
            ForecastSample {
                timestamp: 1_717_502_400,
                dt_txt: "2024-06-04 12:00:00".into(),
                temperature: 71.4,
                description: "clouds".into(),
                icon: "03d".into(),
            },
        ];

        let html = forecast_list(&samples, Units::Imperial);

        assert_eq!(html.as_str().matches("forecast-card").count(), 2);
        assert!(html.as_str().contains("<h4>Mon</h4>"));
        assert!(html.as_str().contains("<h4>Tue</h4>"));
        assert!(html.as_str().contains("<p>20°F</p>"));
        assert!(html.as_str().contains("<p>71°F</p>"));
        assert!(html.as_str().contains("5-Day Forecast"));
    }

    #[test]
    fn error_escapes_message() {
        let html = error("<b>bad</b> & worse");
        assert!(html.as_str().contains("&lt;b&gt;bad&lt;/b&gt; &amp; worse"));
        assert!(html.as_str().contains("error-message"));
    }

    #[test]
    fn recent_chips_empty_list_renders_nothing() {
        assert!(recent_chips(&[]).is_empty());
    }

    #[test]
    fn recent_chips_keep_order() {
        let html = recent_chips(&["Paris".to_string(), "Oslo".to_string()]);
        let s = html.as_str();

        let paris = s.find("data-city=\"Paris\"").expect("paris chip");
        let oslo = s.find("data-city=\"Oslo\"").expect("oslo chip");
        assert!(paris < oslo);
    }

    #[test]
    fn static_states_have_their_classes() {
        assert!(welcome().as_str().contains("welcome-message"));
        assert!(loading().as_str().contains("Loading weather data..."));
    }

    #[test]
    fn append_keeps_both_fragments() {
        let mut page = current_weather(&paris(), Units::Metric);
        page.append(&forecast_list(&[], Units::Metric));

        let s = page.as_str();
        assert!(s.find("weather-info").expect("current") < s.find("forecast-section").expect("forecast"));
    }
}
