use ratatui::{
    prelude::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::styles;

pub fn render(frame: &mut Frame, rect: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rect);

    let title = Line::from(vec![
        Span::styled(format!(" {} ", t!("App.title")), styles::title()),
        Span::styled(concat!("v", env!("CARGO_PKG_VERSION")), styles::dark_gray()),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);

    let dark_gray_style = styles::dark_gray();
    let keys = Paragraph::new(Line::from(vec![
        Span::styled(t!("Keyboard.Help"), dark_gray_style),
        Span::styled(" ", dark_gray_style),
        Span::styled(t!("Keyboard.Quit"), dark_gray_style),
    ]))
    .alignment(Alignment::Right);
    frame.render_widget(keys, chunks[1]);
}
