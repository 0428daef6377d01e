use ratatui::style::{Color, Modifier, Style};

use crate::data::Trend;

#[inline]
pub fn header() -> Style {
    Style::default().fg(Color::Gray)
}

#[inline]
pub fn gray() -> Style {
    Style::default().fg(Color::Gray)
}

#[inline]
pub fn dark_gray() -> Style {
    Style::default().fg(Color::DarkGray)
}

#[inline]
pub fn text() -> Style {
    Style::default().fg(Color::Reset)
}

#[inline]
pub fn popup() -> Style {
    text()
}

#[inline]
pub fn title() -> Style {
    text().add_modifier(Modifier::BOLD)
}

#[inline]
pub fn border() -> Style {
    Style::default().fg(Color::DarkGray)
}

#[inline]
pub fn border_focused() -> Style {
    Style::default().fg(Color::Gray)
}

/// `(bull, bear)`: green up, red down
#[inline]
pub fn bull_bear() -> (Style, Style) {
    (
        Style::default().fg(Color::LightGreen),
        Style::default().fg(Color::LightRed),
    )
}

#[inline]
pub fn trend(trend: Trend) -> Style {
    let (bull, bear) = bull_bear();
    match trend {
        Trend::Up => bull,
        Trend::Down => bear,
        Trend::Neutral => text(),
    }
}

pub fn online() -> Style {
    Style::default().fg(Color::Green)
}

pub fn offline() -> Style {
    Style::default().fg(Color::DarkGray)
}
