//! One-call weather client
//!
//! Fetches current conditions plus the daily forecast from the
//! OpenWeatherMap one-call endpoint, parameterized by the unit preference.

use std::sync::Arc;

use serde::Deserialize;

use super::{decode, ApiError, Fetched};
use crate::stores::Units;
use crate::worker::{FetchGateway, FetchRequest, Fetcher};

/// One-call weather endpoint
const ONECALL_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";

/// Host serving the weather condition icons
const ICON_URL: &str = "https://openweathermap.org/img/wn";

/// One-call API response: current conditions plus daily forecast.
///
/// Fields the app does not display (hourly, minutely, alerts) are ignored
/// during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct OneCall {
    pub lat: f64,
    pub lon: f64,
    /// IANA timezone name of the location
    #[serde(default)]
    pub timezone: String,
    /// Offset from UTC in seconds, used to render local times
    #[serde(default)]
    pub timezone_offset: i64,
    pub current: CurrentConditions,
    #[serde(default)]
    pub daily: Vec<DailyForecast>,
}

/// Current conditions block of the one-call response
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    /// Observation time, Unix seconds
    pub dt: i64,
    #[serde(default)]
    pub sunrise: Option<i64>,
    #[serde(default)]
    pub sunset: Option<i64>,
    /// Temperature in the requested units
    pub temp: f64,
    pub feels_like: f64,
    /// Pressure in hPa
    #[serde(default)]
    pub pressure: u32,
    /// Relative humidity percentage
    #[serde(default)]
    pub humidity: u8,
    /// Cloud cover percentage
    #[serde(default)]
    pub clouds: u8,
    /// UV index
    #[serde(default)]
    pub uvi: Option<f64>,
    #[serde(default)]
    pub wind_speed: f64,
    /// Wind direction in degrees
    #[serde(default)]
    pub wind_deg: f64,
    /// Rainfall, present only when it is raining
    #[serde(default)]
    pub rain: Option<Precipitation>,
    #[serde(default)]
    pub weather: Vec<WeatherSummary>,
}

/// Precipitation volume block; the API keys it by accumulation window
#[derive(Debug, Clone, Deserialize)]
pub struct Precipitation {
    /// Volume for the last hour, millimeters
    #[serde(rename = "1h", default)]
    pub one_hour: Option<f64>,
}

/// Condition summary (description and icon code)
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherSummary {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// A single day of the daily forecast
#[derive(Debug, Clone, Deserialize)]
pub struct DailyForecast {
    /// Forecast day, Unix seconds
    pub dt: i64,
    pub temp: DailyTemp,
    #[serde(default)]
    pub humidity: u8,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(default)]
    pub wind_deg: f64,
    /// Forecast rainfall for the day, millimeters
    #[serde(default)]
    pub rain: Option<f64>,
    /// Probability of precipitation, 0..1
    #[serde(default)]
    pub pop: Option<f64>,
    #[serde(default)]
    pub weather: Vec<WeatherSummary>,
}

/// Daily temperature range
#[derive(Debug, Clone, Deserialize)]
pub struct DailyTemp {
    #[serde(default)]
    pub day: f64,
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
}

/// Client for the one-call weather endpoint
pub struct WeatherClient<F: Fetcher> {
    gateway: Arc<FetchGateway<F>>,
    api_key: String,
}

impl<F: Fetcher> WeatherClient<F> {
    pub fn new(gateway: Arc<FetchGateway<F>>, api_key: impl Into<String>) -> Self {
        Self {
            gateway,
            api_key: api_key.into(),
        }
    }

    /// Fetches weather for a coordinate pair in the given units
    pub async fn one_call(
        &self,
        lat: f64,
        lon: f64,
        units: Units,
    ) -> Result<Fetched<OneCall>, ApiError> {
        let url = format!(
            "{}?lat={}&lon={}&appid={}&units={}",
            ONECALL_URL,
            lat,
            lon,
            self.api_key,
            units.as_str()
        );
        let response = self.gateway.handle_fetch(&FetchRequest::get(url)).await;
        decode(response)
    }
}

/// URL of the icon image for an icon code (e.g. `10d`)
pub fn icon_url(icon: &str) -> String {
    format!("{ICON_URL}/{icon}@2x.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Trimmed one-call response covering the fields the app displays
    pub(crate) const SAMPLE_ONECALL: &str = r#"{
        "lat": 59.9133,
        "lon": 10.739,
        "timezone": "Europe/Oslo",
        "timezone_offset": 7200,
        "current": {
            "dt": 1717586400,
            "sunrise": 1717556022,
            "sunset": 1717622760,
            "temp": 18.4,
            "feels_like": 17.9,
            "pressure": 1012,
            "humidity": 62,
            "clouds": 40,
            "uvi": 4.3,
            "wind_speed": 3.6,
            "wind_deg": 220,
            "rain": {"1h": 0.5},
            "weather": [
                {"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}
            ]
        },
        "daily": [
            {
                "dt": 1717581600,
                "temp": {"day": 18.4, "min": 11.2, "max": 19.8},
                "humidity": 60,
                "wind_speed": 4.1,
                "wind_deg": 210,
                "rain": 1.2,
                "pop": 0.6,
                "weather": [
                    {"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}
                ]
            },
            {
                "dt": 1717668000,
                "temp": {"day": 21.0, "min": 12.5, "max": 22.3},
                "humidity": 55,
                "wind_speed": 2.8,
                "wind_deg": 180,
                "pop": 0.1,
                "weather": [
                    {"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_onecall_response() {
        let onecall: OneCall = serde_json::from_str(SAMPLE_ONECALL).expect("parse");

        assert_eq!(onecall.timezone, "Europe/Oslo");
        assert_eq!(onecall.timezone_offset, 7200);
        assert!((onecall.current.temp - 18.4).abs() < 0.01);
        assert_eq!(onecall.current.humidity, 62);
        assert_eq!(onecall.current.pressure, 1012);
        assert!((onecall.current.wind_deg - 220.0).abs() < f64::EPSILON);
        assert_eq!(onecall.current.weather[0].description, "light rain");
        assert_eq!(onecall.current.weather[0].icon, "10d");
        assert_eq!(
            onecall.current.rain.as_ref().and_then(|r| r.one_hour),
            Some(0.5)
        );
    }

    #[test]
    fn test_parse_daily_forecast() {
        let onecall: OneCall = serde_json::from_str(SAMPLE_ONECALL).expect("parse");

        assert_eq!(onecall.daily.len(), 2);
        let today = &onecall.daily[0];
        assert!((today.temp.min - 11.2).abs() < 0.01);
        assert!((today.temp.max - 19.8).abs() < 0.01);
        assert_eq!(today.rain, Some(1.2));

        let tomorrow = &onecall.daily[1];
        assert!(tomorrow.rain.is_none());
        assert_eq!(tomorrow.weather[0].main, "Clear");
    }

    #[test]
    fn test_parse_minimal_response_without_optionals() {
        let minimal = r#"{
            "lat": 0.0,
            "lon": 0.0,
            "current": {"dt": 1717586400, "temp": 20.0, "feels_like": 19.0}
        }"#;
        let onecall: OneCall = serde_json::from_str(minimal).expect("parse");

        assert!(onecall.daily.is_empty());
        assert!(onecall.current.rain.is_none());
        assert!(onecall.current.weather.is_empty());
        assert_eq!(onecall.timezone_offset, 0);
    }

    #[test]
    fn test_icon_url_format() {
        assert_eq!(
            icon_url("10d"),
            "https://openweathermap.org/img/wn/10d@2x.png"
        );
    }
}
