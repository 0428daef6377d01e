use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::data::TrackedSymbol;
use crate::ui::{styles, text};

const NAME_WIDTH: u16 = 18;
const SYMBOL_WIDTH: u16 = 10;
const PRICE_WIDTH: u16 = 12;

pub fn render(
    frame: &mut Frame,
    rect: Rect,
    entries: &[TrackedSymbol],
    selected: Option<&str>,
    table: &mut TableState,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border())
        .title(Span::styled(
            format!(" {} ({}) ", t!("Watchlist.title"), entries.len()),
            styles::title(),
        ));

    if entries.is_empty() {
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        let hint = Paragraph::new(Line::styled(t!("Watchlist.empty"), styles::gray()))
            .alignment(ratatui::layout::Alignment::Center);
        frame.render_widget(hint, crate::ui::rect::centered(0, 1, inner));
        return;
    }

    let header = Row::new(vec![
        Cell::from(t!("Watchlist.Name")),
        Cell::from(t!("Watchlist.Symbol")),
        Cell::from(text::align_right(
            &t!("Watchlist.Price"),
            usize::from(PRICE_WIDTH),
        )),
    ])
    .style(styles::header());

    let rows = entries
        .iter()
        .map(|entry| {
            // the series on screen belongs to this row
            let marker = if selected == Some(entry.symbol.as_str()) {
                "▸ "
            } else {
                "  "
            };
            let name = text::truncate(&entry.name, usize::from(NAME_WIDTH) - 2);
            Row::new(vec![
                Cell::from(format!("{marker}{name}")),
                Cell::from(text::truncate(&entry.symbol, usize::from(SYMBOL_WIDTH))),
                Cell::from(Span::styled(
                    text::align_right(entry.price.as_str(), usize::from(PRICE_WIDTH)),
                    styles::trend(entry.trend),
                )),
            ])
        })
        .collect::<Vec<_>>();

    let widths = [
        Constraint::Length(NAME_WIDTH),
        Constraint::Length(SYMBOL_WIDTH),
        Constraint::Length(PRICE_WIDTH),
    ];
    let table_widget = Table::new(rows)
        .header(header)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .widths(&widths)
        .column_spacing(2);

    frame.render_stateful_widget(table_widget, rect, table);
}
