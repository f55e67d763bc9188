//! OpenWeather current-conditions client
//!
//! Maps the provider's numeric condition codes onto the wallet's small
//! discrete weather vocabulary. The lookup is total: an unconfigured key
//! yields the generic default, a failed lookup yields the "not available"
//! sentinel, and the two stay distinguishable by the temperature string.

use serde::Deserialize;
use skywallet_common::model::{WeatherKind, WeatherReport};
use std::time::Duration;
use tracing::{debug, warn};

const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const USER_AGENT: &str = "SkyWallet/0.1.0 (https://github.com/skywallet/skywallet)";

/// Default report when no API key is configured
fn unconfigured_report() -> WeatherReport {
    WeatherReport {
        weather: WeatherKind::Sun,
        temp: "72°".to_string(),
    }
}

/// Default report when the lookup itself failed (city unknown, network down)
fn unavailable_report() -> WeatherReport {
    WeatherReport {
        weather: WeatherKind::Sun,
        temp: "N/A".to_string(),
    }
}

/// OpenWeather current-weather response (the fields we read)
#[derive(Debug, Deserialize)]
struct WeatherResponse {
    weather: Vec<Condition>,
    main: Conditions,
}

#[derive(Debug, Deserialize)]
struct Condition {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct Conditions {
    temp: f64,
}

/// Map a provider condition code onto the wallet vocabulary:
/// [200,600) is rain (thunderstorm/drizzle/rain bands), >= 801 is
/// cloudy, everything else (clear and atmosphere bands) is sun.
pub fn kind_for_condition(code: i64) -> WeatherKind {
    if (200..600).contains(&code) {
        WeatherKind::Rain
    } else if code >= 801 {
        WeatherKind::Cloudy
    } else {
        WeatherKind::Sun
    }
}

/// Per-city current-conditions client
pub struct WeatherClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(api_key: Option<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            base_url: OPENWEATHER_BASE_URL.to_string(),
            api_key,
        }
    }

    /// Point the client at a different endpoint (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Current conditions for a city. Never fails; degradation is encoded in
    /// the returned report.
    pub async fn fetch_weather(&self, city: &str) -> WeatherReport {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => return unconfigured_report(),
        };

        let url = format!("{}/weather", self.base_url);
        debug!(city = %city, "Querying OpenWeather");

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", city), ("appid", api_key), ("units", "imperial")])
            .send()
            .await;

        let response = match response {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!(city = %city, status = %response.status(), "Weather lookup failed");
                return unavailable_report();
            }
            Err(e) => {
                warn!(city = %city, error = %e, "Weather request failed");
                return unavailable_report();
            }
        };

        let body: WeatherResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(city = %city, error = %e, "Weather response unparsable");
                return unavailable_report();
            }
        };

        let Some(condition) = body.weather.first() else {
            warn!(city = %city, "Weather response carried no conditions");
            return unavailable_report();
        };

        WeatherReport {
            weather: kind_for_condition(condition.id),
            temp: format!("{}°", body.main.temp.round() as i64),
        }
    }
}
