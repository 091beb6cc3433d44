//! Current conditions tab rendering
//!
//! Renders weather at the saved location: temperature, conditions,
//! wind, rainfall and sun times, with an offline banner when the
//! data was served from the cache.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{condition_icon, temperature_color};
use crate::app::CurrentTab;
use crate::format;
use crate::stores::Units;

pub fn render(frame: &mut Frame, area: Rect, tab: &CurrentTab, units: Units) {
    let block = Block::default()
        .title(" Current Conditions ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if tab.loading {
        let paragraph = Paragraph::new("Loading weather...")
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(error) = &tab.error {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )))
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let Some(weather) = &tab.weather else {
        let paragraph = Paragraph::new("No weather data")
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    };

    let current = &weather.current;
    let tz = weather.timezone_offset;
    let mut lines = Vec::new();

    if tab.from_cache {
        lines.push(Line::from(Span::styled(
            "Offline - showing cached data",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        format::format_timestamp(current.dt, tz),
        Style::default().fg(Color::White),
    )));
    lines.push(Line::from(""));

    let description = current
        .weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_default();
    let icon = current
        .weather
        .first()
        .map(|w| condition_icon(&w.main))
        .unwrap_or("?");

    lines.push(Line::from(vec![
        Span::styled(
            format::temperature(current.temp, units),
            Style::default()
                .fg(temp_color(current.temp, units))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(icon),
        Span::raw(" "),
        Span::styled(description, Style::default().fg(Color::Gray)),
    ]));
    lines.push(Line::from(Span::styled(
        format!(
            "Feels like {}",
            format::temperature(current.feels_like, units)
        ),
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(""));

    lines.push(detail_line(
        "Humidity",
        format!("{}%", current.humidity),
    ));
    lines.push(detail_line(
        "Pressure",
        format!("{} hPa", current.pressure),
    ));
    lines.push(detail_line(
        "Wind",
        format!(
            "{} {}",
            format::wind_speed(current.wind_speed, units),
            format::wind_direction(current.wind_deg)
        ),
    ));
    lines.push(detail_line("Rain", format::rain_amount(weather, units)));
    lines.push(detail_line("Clouds", format!("{}%", current.clouds)));

    if let (Some(sunrise), Some(sunset)) = (current.sunrise, current.sunset) {
        lines.push(Line::from(""));
        lines.push(detail_line("Sunrise", format::time_of_day(sunrise, tz)));
        lines.push(detail_line("Sunset", format::time_of_day(sunset, tz)));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn detail_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:<10}", label),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

/// Temperature color works on Celsius, so imperial readings are
/// converted before the lookup.
fn temp_color(value: f64, units: Units) -> Color {
    match units {
        Units::Metric => temperature_color(value),
        Units::Imperial => temperature_color((value - 32.0) * 5.0 / 9.0),
    }
}
