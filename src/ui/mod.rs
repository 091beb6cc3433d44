//! UI rendering module for Skycast
//!
//! This module contains all the rendering logic for the terminal user
//! interface, using the ratatui library for TUI components.

pub mod current;
pub mod help;
pub mod search;
pub mod settings;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame,
};

use crate::app::{App, InputMode, Tab};
use crate::worker::Fetcher;

/// OpenWeatherMap condition group to icon mapping
pub(crate) fn condition_icon(main: &str) -> &'static str {
    match main {
        "Clear" => "\u{2600}",        // ☀
        "Clouds" => "\u{2601}",       // ☁
        "Rain" => "\u{1F327}",        // 🌧
        "Drizzle" => "\u{1F326}",     // 🌦
        "Thunderstorm" => "\u{26C8}", // ⛈
        "Snow" => "\u{2744}",         // ❄
        "Mist" | "Fog" | "Haze" => "\u{1F32B}", // 🌫
        _ => "\u{26C5}",              // ⛅
    }
}

/// Color for temperature in Celsius (warmer = more red, cooler = more blue)
pub(crate) fn temperature_color(celsius: f64) -> Color {
    if celsius >= 30.0 {
        Color::Red
    } else if celsius >= 25.0 {
        Color::LightRed
    } else if celsius >= 20.0 {
        Color::Yellow
    } else if celsius >= 15.0 {
        Color::Green
    } else if celsius >= 10.0 {
        Color::Cyan
    } else {
        Color::Blue
    }
}

/// Renders the full application: tab bar, active tab, help footer,
/// and the help overlay when toggled.
pub fn render_app<F: Fetcher>(frame: &mut Frame, app: &App<F>) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(3),    // Active tab content
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_tab_bar(frame, app, chunks[0]);

    match app.tab {
        Tab::Current => current::render(frame, chunks[1], &app.current, app.units()),
        Tab::Search => search::render(frame, chunks[1], &app.search, app.units()),
        Tab::Settings => settings::render(
            frame,
            chunks[1],
            &app.settings_tab,
            app.units(),
            app.locations.location(),
        ),
    }

    render_help_footer(frame, app, chunks[2]);

    if app.show_help {
        help::render(frame);
    }
}

fn render_tab_bar<F: Fetcher>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!(" {} {} ", i + 1, tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Renders the keybinding hints for the active tab
fn render_help_footer<F: Fetcher>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let mut spans = vec![
        Span::styled("1-3/Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Switch  "),
    ];

    match app.tab {
        Tab::Current => {
            spans.push(Span::styled("r", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Refresh  "));
        }
        Tab::Search => {
            if app.search.input_mode == InputMode::Editing {
                spans = vec![
                    Span::styled("Enter", Style::default().fg(Color::Yellow)),
                    Span::raw(" Search  "),
                    Span::styled("Esc", Style::default().fg(Color::Yellow)),
                    Span::raw(" Cancel"),
                ];
                let paragraph =
                    Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
                frame.render_widget(paragraph, area);
                return;
            }
            spans.push(Span::styled("/", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Edit query  "));
            spans.push(Span::styled("s", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Save default  "));
            spans.push(Span::styled("o", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Saved place  "));
            spans.push(Span::styled("r", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Refresh  "));
        }
        Tab::Settings => {
            spans.push(Span::styled("j/k", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Select  "));
            spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(" Apply  "));
        }
    }

    spans.push(Span::styled("?", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Help  "));
    spans.push(Span::styled("q", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Quit"));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
