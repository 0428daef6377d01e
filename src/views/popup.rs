use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{POPUP_HELP, POPUP_INPUT};
use crate::ui::styles;
use crate::widgets::SymbolInput;

pub fn render(frame: &mut Frame, rect: Rect, popup: u8, input: &SymbolInput) {
    if popup == POPUP_HELP {
        crate::views::help::render(frame, rect);
    } else if popup == POPUP_INPUT {
        add_symbol(frame, rect, input);
    }
}

fn safe_cursor_x(chunk_x: u16, visual_cursor: usize) -> u16 {
    let offset = u16::try_from(visual_cursor).unwrap_or(u16::MAX - 1);
    chunk_x.saturating_add(offset).saturating_add(1)
}

fn add_symbol(frame: &mut Frame, rect: Rect, input: &SymbolInput) {
    const MAX_SIZE: (u16, u16) = (50, 6);
    let rect = crate::ui::rect::centered(MAX_SIZE.0, MAX_SIZE.1, rect);
    frame.render_widget(Clear, rect);

    let chunks = Layout::default()
        .margin(1)
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(rect);

    // one line, without scroll
    let paragraph = Paragraph::new(input.value()).style(styles::popup()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_focused())
            .title(Span::styled(t!("AddSymbol.title"), styles::title())),
    );
    frame.render_widget(paragraph, chunks[0]);
    frame.render_widget(
        Paragraph::new(Line::styled(t!("AddSymbol.hint"), styles::dark_gray())),
        chunks[1],
    );
    frame.set_cursor(
        // Put cursor past the end of the input text
        safe_cursor_x(chunks[0].x, input.visual_cursor()),
        // Move one line down, from the border to the input line
        chunks[0].y + 1,
    );
}
