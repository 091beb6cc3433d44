//! Display formatting helpers
//!
//! Small pure functions turning raw API values into display strings:
//! timestamps rendered in the location's local time, wind degrees mapped
//! to cardinal directions, and rainfall amounts in the active units.

use chrono::{DateTime, FixedOffset, Utc};

use crate::api::weather::OneCall;
use crate::stores::Units;

/// Formats a Unix timestamp as e.g. `Wed, 5 Jun 14:00` in the location's
/// local time. `tz_offset` is the location's offset from UTC in seconds.
pub fn format_timestamp(timestamp: i64, tz_offset: i64) -> String {
    match local_time(timestamp, tz_offset) {
        Some(time) => time.format("%a, %-d %b %H:%M").to_string(),
        None => String::from("--"),
    }
}

/// Three-letter weekday abbreviation for a Unix timestamp in local time
pub fn day_abbrev(timestamp: i64, tz_offset: i64) -> String {
    match local_time(timestamp, tz_offset) {
        Some(time) => time.format("%a").to_string(),
        None => String::from("--"),
    }
}

/// Time of day as `HH:MM` in the location's local time
pub fn time_of_day(timestamp: i64, tz_offset: i64) -> String {
    match local_time(timestamp, tz_offset) {
        Some(time) => time.format("%H:%M").to_string(),
        None => String::from("--"),
    }
}

fn local_time(timestamp: i64, tz_offset: i64) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(i32::try_from(tz_offset).ok()?)?;
    let utc = DateTime::<Utc>::from_timestamp(timestamp, 0)?;
    Some(utc.with_timezone(&offset))
}

/// Maps wind degrees to an eight-point cardinal direction.
///
/// The bands are half-open in mixed directions; 45 and 90 both read NE,
/// matching the ranges the forecast display has always used.
pub fn wind_direction(degrees: f64) -> &'static str {
    if degrees >= 0.0 && degrees < 45.0 {
        "N"
    } else if degrees >= 45.0 && degrees <= 90.0 {
        "NE"
    } else if degrees > 90.0 && degrees <= 135.0 {
        "E"
    } else if degrees > 135.0 && degrees <= 180.0 {
        "SE"
    } else if degrees > 180.0 && degrees <= 225.0 {
        "S"
    } else if degrees > 225.0 && degrees <= 270.0 {
        "SW"
    } else if degrees > 270.0 && degrees <= 315.0 {
        "W"
    } else if degrees > 315.0 && degrees <= 360.0 {
        "NW"
    } else {
        "Invalid degrees"
    }
}

/// Current rainfall in the active units, as a display string with unit
/// suffix. Prefers the last-hour reading, falls back to today's forecast
/// total, and reads 0 when neither is present.
pub fn rain_amount(onecall: &OneCall, units: Units) -> String {
    let millimeters = onecall
        .current
        .rain
        .as_ref()
        .and_then(|rain| rain.one_hour)
        .or_else(|| onecall.daily.first().and_then(|day| day.rain))
        .unwrap_or(0.0);
    format!(
        "{} {}",
        units.convert_rainfall(millimeters),
        units.rainfall_unit()
    )
}

/// Temperature with the unit symbol, rounded to the nearest degree
pub fn temperature(value: f64, units: Units) -> String {
    format!("{}{}", value.round() as i64, units.symbol())
}

/// Wind speed with the unit suffix for the active units
pub fn wind_speed(value: f64, units: Units) -> String {
    format!("{:.1} {}", value, units.wind_speed_unit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::weather::{CurrentConditions, DailyForecast, DailyTemp, Precipitation};

    fn onecall_with_rain(one_hour: Option<f64>, daily_rain: Option<f64>) -> OneCall {
        OneCall {
            lat: 0.0,
            lon: 0.0,
            timezone: String::new(),
            timezone_offset: 0,
            current: CurrentConditions {
                dt: 0,
                sunrise: None,
                sunset: None,
                temp: 20.0,
                feels_like: 20.0,
                pressure: 1013,
                humidity: 50,
                clouds: 0,
                uvi: None,
                wind_speed: 0.0,
                wind_deg: 0.0,
                rain: one_hour.map(|mm| Precipitation { one_hour: Some(mm) }),
                weather: Vec::new(),
            },
            daily: vec![DailyForecast {
                dt: 0,
                temp: DailyTemp {
                    day: 20.0,
                    min: 10.0,
                    max: 25.0,
                },
                humidity: 50,
                wind_speed: 0.0,
                wind_deg: 0.0,
                rain: daily_rain,
                pop: None,
                weather: Vec::new(),
            }],
        }
    }

    #[test]
    fn test_format_timestamp_applies_timezone_offset() {
        // 2024-06-05 12:00:00 UTC, offset +2h
        assert_eq!(format_timestamp(1717588800, 7200), "Wed, 5 Jun 14:00");
    }

    #[test]
    fn test_format_timestamp_utc() {
        assert_eq!(format_timestamp(1717588800, 0), "Wed, 5 Jun 12:00");
    }

    #[test]
    fn test_day_abbrev() {
        assert_eq!(day_abbrev(1717588800, 0), "Wed");
        // Offset pushing past midnight changes the day
        assert_eq!(day_abbrev(1717588800, 12 * 3600 + 3600), "Thu");
    }

    #[test]
    fn test_timestamp_rejects_out_of_range_offset() {
        assert_eq!(format_timestamp(1717588800, i64::MAX), "--");
        assert_eq!(format_timestamp(1717588800, i64::MIN), "--");
        assert_eq!(day_abbrev(1717588800, i64::from(i32::MAX) + 1), "--");
    }

    #[test]
    fn test_wind_direction_cardinal_points() {
        assert_eq!(wind_direction(0.0), "N");
        assert_eq!(wind_direction(44.9), "N");
        assert_eq!(wind_direction(45.0), "NE");
        assert_eq!(wind_direction(90.0), "NE");
        assert_eq!(wind_direction(90.1), "E");
        assert_eq!(wind_direction(135.0), "E");
        assert_eq!(wind_direction(180.0), "SE");
        assert_eq!(wind_direction(225.0), "S");
        assert_eq!(wind_direction(270.0), "SW");
        assert_eq!(wind_direction(315.0), "W");
        assert_eq!(wind_direction(360.0), "NW");
    }

    #[test]
    fn test_wind_direction_out_of_range() {
        assert_eq!(wind_direction(-1.0), "Invalid degrees");
        assert_eq!(wind_direction(360.1), "Invalid degrees");
    }

    #[test]
    fn test_rain_amount_prefers_hourly_reading() {
        let onecall = onecall_with_rain(Some(0.5), Some(3.0));
        assert_eq!(rain_amount(&onecall, Units::Metric), "0.5 mm");
    }

    #[test]
    fn test_rain_amount_falls_back_to_daily() {
        let onecall = onecall_with_rain(None, Some(3.0));
        assert_eq!(rain_amount(&onecall, Units::Metric), "3 mm");
    }

    #[test]
    fn test_rain_amount_defaults_to_zero() {
        let onecall = onecall_with_rain(None, None);
        assert_eq!(rain_amount(&onecall, Units::Metric), "0 mm");
    }

    #[test]
    fn test_rain_amount_imperial_conversion() {
        let onecall = onecall_with_rain(Some(25.4), None);
        assert_eq!(rain_amount(&onecall, Units::Imperial), "1 in");
    }

    #[test]
    fn test_temperature_rounds() {
        assert_eq!(temperature(18.6, Units::Metric), "19°C");
        assert_eq!(temperature(64.2, Units::Imperial), "64°F");
    }

    #[test]
    fn test_wind_speed_suffix() {
        assert_eq!(wind_speed(3.6, Units::Metric), "3.6 km/h");
        assert_eq!(wind_speed(8.1, Units::Imperial), "8.1 mph");
    }
}
