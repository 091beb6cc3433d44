//! Settings tab rendering
//!
//! Shows the unit preference and the saved default location with a
//! selectable row for each action.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::SettingsTab;
use crate::stores::{Location, Units};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    tab: &SettingsTab,
    units: Units,
    saved: Option<&Location>,
) {
    let block = Block::default()
        .title(" Settings ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let units_label = match units {
        Units::Metric => "Metric (°C, km/h, mm)",
        Units::Imperial => "Imperial (°F, mph, in)",
    };
    let location_label = match saved {
        Some(location) => format!("{} ({:.2}, {:.2})", location.name, location.lat, location.lon),
        None => "none".to_string(),
    };

    let lines = vec![
        Line::from(""),
        row(tab.selected == 0, "Units", units_label),
        Line::from(Span::styled(
            "             Enter toggles between metric and imperial",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        row(tab.selected == 1, "Location", &location_label),
        Line::from(Span::styled(
            "             Enter clears the saved default location",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn row(selected: bool, label: &str, value: &str) -> Line<'static> {
    let cursor = if selected { "\u{25B8} " } else { "  " }; // ▸ or space
    let value_style = if selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(vec![
        Span::styled(cursor.to_string(), Style::default().fg(Color::Cyan)),
        Span::styled(format!("{:<11}", label), Style::default().fg(Color::Gray)),
        Span::styled(value.to_string(), value_style),
    ])
}
