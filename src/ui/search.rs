//! Search tab rendering
//!
//! Renders the city query input and, once a search has resolved, the
//! place's current conditions with a daily forecast table.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::condition_icon;
use crate::app::{InputMode, SearchTab};
use crate::format;
use crate::stores::Units;

/// Days of forecast shown below the current conditions
const FORECAST_DAYS: usize = 7;

pub fn render(frame: &mut Frame, area: Rect, tab: &SearchTab, units: Units) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query input
            Constraint::Min(3),    // Results
        ])
        .split(area);

    render_query(frame, chunks[0], tab);
    render_results(frame, chunks[1], tab, units);
}

fn render_query(frame: &mut Frame, area: Rect, tab: &SearchTab) {
    let editing = tab.input_mode == InputMode::Editing;

    let border_color = if editing { Color::Yellow } else { Color::Cyan };
    let block = Block::default()
        .title(" City ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let mut spans = vec![Span::styled(
        tab.query.clone(),
        Style::default().fg(Color::White),
    )];
    if editing {
        // Block cursor at the end of the query
        spans.push(Span::styled(
            "\u{2588}",
            Style::default().fg(Color::Yellow),
        ));
    } else if tab.query.is_empty() {
        spans = vec![Span::styled(
            "Press / to search for a city",
            Style::default().fg(Color::DarkGray),
        )];
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_results(frame: &mut Frame, area: Rect, tab: &SearchTab, units: Units) {
    let title = match &tab.place {
        Some(place) => format!(" {} ", place_label(place)),
        None => " Forecast ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if tab.loading {
        let paragraph = Paragraph::new("Searching...").block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(error) = &tab.error {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let Some(weather) = &tab.weather else {
        let paragraph = Paragraph::new(Span::styled(
            "Search for a city to see its forecast",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let tz = weather.timezone_offset;
    let mut lines = Vec::new();

    if tab.from_cache {
        lines.push(Line::from(Span::styled(
            "Offline - showing cached data",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
    }

    let current = &weather.current;
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
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(icon),
        Span::raw(" "),
        Span::styled(description, Style::default().fg(Color::Gray)),
        Span::raw("   "),
        Span::styled(
            format!(
                "{} {}",
                format::wind_speed(current.wind_speed, units),
                format::wind_direction(current.wind_deg)
            ),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("   "),
        Span::styled(
            format::rain_amount(weather, units),
            Style::default().fg(Color::Gray),
        ),
    ]));
    lines.push(Line::from(""));

    // Daily forecast rows: day, range, rain chance, conditions
    for day in weather.daily.iter().take(FORECAST_DAYS) {
        let day_description = day
            .weather
            .first()
            .map(|w| w.description.as_str())
            .unwrap_or("");
        let day_icon = day
            .weather
            .first()
            .map(|w| condition_icon(&w.main))
            .unwrap_or("?");
        let pop = (day.pop.unwrap_or(0.0) * 100.0).round() as u32;

        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<4}", format::day_abbrev(day.dt, tz)),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!(
                    "{:>6} / {:<6}",
                    format::temperature(day.temp.min, units),
                    format::temperature(day.temp.max, units)
                ),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(format!("  {:>3}% ", pop), Style::default().fg(Color::Cyan)),
            Span::raw(format!(" {} ", day_icon)),
            Span::styled(
                day_description.to_string(),
                Style::default().fg(Color::Gray),
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Place title including country and state when known
fn place_label(place: &crate::api::geocoding::GeoPlace) -> String {
    let mut label = place.name.clone();
    if let Some(state) = &place.state {
        label.push_str(", ");
        label.push_str(state);
    }
    if let Some(country) = &place.country {
        label.push_str(", ");
        label.push_str(country);
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::geocoding::GeoPlace;
    use crate::api::weather::{
        CurrentConditions, DailyForecast, DailyTemp, OneCall, WeatherSummary,
    };
    use ratatui::{backend::TestBackend, Terminal};

    fn sample_weather() -> OneCall {
        OneCall {
            lat: 59.91,
            lon: 10.74,
            timezone: String::new(),
            timezone_offset: 0,
            current: CurrentConditions {
                dt: 1717588800,
                sunrise: None,
                sunset: None,
                temp: 18.4,
                feels_like: 17.9,
                pressure: 1012,
                humidity: 62,
                clouds: 40,
                uvi: None,
                wind_speed: 3.6,
                wind_deg: 220.0,
                rain: None,
                weather: vec![WeatherSummary {
                    main: "Clear".to_string(),
                    description: "clear sky".to_string(),
                    icon: "01d".to_string(),
                }],
            },
            daily: vec![DailyForecast {
                dt: 1717588800,
                temp: DailyTemp {
                    day: 18.0,
                    min: 11.2,
                    max: 19.8,
                },
                humidity: 60,
                wind_speed: 4.1,
                wind_deg: 210.0,
                rain: None,
                pop: Some(0.6),
                weather: vec![WeatherSummary {
                    main: "Rain".to_string(),
                    description: "light rain".to_string(),
                    icon: "10d".to_string(),
                }],
            }],
        }
    }

    fn render_to_string(tab: &SearchTab) -> String {
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), tab, Units::Metric))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_empty_query_shows_prompt() {
        let tab = SearchTab::default();
        let content = render_to_string(&tab);
        assert!(content.contains("Press / to search"));
        assert!(content.contains("Search for a city to see its forecast"));
    }

    #[test]
    fn test_editing_shows_cursor() {
        let tab = SearchTab {
            query: "Osl".to_string(),
            input_mode: InputMode::Editing,
            ..SearchTab::default()
        };
        let content = render_to_string(&tab);
        assert!(content.contains("Osl\u{2588}"));
    }

    #[test]
    fn test_results_show_place_and_forecast() {
        let tab = SearchTab {
            query: "Oslo".to_string(),
            place: Some(GeoPlace {
                name: "Oslo".to_string(),
                lat: 59.91,
                lon: 10.74,
                country: Some("NO".to_string()),
                state: None,
            }),
            weather: Some(sample_weather()),
            ..SearchTab::default()
        };
        let content = render_to_string(&tab);
        assert!(content.contains("Oslo, NO"));
        assert!(content.contains("18°C"));
        assert!(content.contains("clear sky"));
        assert!(content.contains("60%"), "rain chance shown as percent");
        assert!(content.contains("light rain"));
    }

    #[test]
    fn test_error_shown_in_results_block() {
        let tab = SearchTab {
            query: "Xyzzy".to_string(),
            error: Some("Check your input.".to_string()),
            ..SearchTab::default()
        };
        assert!(render_to_string(&tab).contains("Check your input."));
    }

    #[test]
    fn test_place_label_includes_state_and_country() {
        let place = GeoPlace {
            name: "Portland".to_string(),
            lat: 45.5,
            lon: -122.6,
            country: Some("US".to_string()),
            state: Some("Oregon".to_string()),
        };
        assert_eq!(place_label(&place), "Portland, Oregon, US");
    }
}
