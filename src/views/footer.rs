use std::time::Duration;

use ratatui::{
    prelude::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::styles;

/// What the status line reports
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status {
    pub symbols: usize,
    /// Refresh period while the scheduler runs
    pub refresh: Option<Duration>,
}

pub fn render(frame: &mut Frame, rect: Rect, status: &Status) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rect);

    let dark_gray_style = styles::dark_gray();
    let keys = [
        t!("Keyboard.Add"),
        t!("Keyboard.Move"),
        t!("Keyboard.Select"),
        t!("Keyboard.FullView"),
    ]
    .into_iter()
    .map(|key| Span::styled(format!("{key}  "), dark_gray_style))
    .collect::<Vec<_>>();
    frame.render_widget(Paragraph::new(Line::from(keys)), chunks[0]);

    let (text, style) = match status.refresh {
        Some(period) => (
            format!(
                "■ {}",
                t!(
                    "Footer.refreshing",
                    count = status.symbols,
                    secs = format_period(period)
                )
            ),
            styles::online(),
        ),
        None => (format!("□ {}", t!("Footer.paused")), styles::offline()),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(text, style)).alignment(Alignment::Right),
        chunks[1],
    );
}

/// Seconds with at most one decimal: `5`, `2.5`
fn format_period(period: Duration) -> String {
    let secs = period.as_secs_f64();
    if (secs - secs.round()).abs() < 0.05 {
        format!("{secs:.0}")
    } else {
        format!("{secs:.1}")
    }
}
