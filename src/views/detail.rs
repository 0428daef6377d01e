use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::selector::DetailView;
use crate::ui::styles;
use crate::widgets::{Candlestick, Loading, LoadingWidget};

pub fn render(frame: &mut Frame, rect: Rect, view: &DetailView, loading: &Loading) {
    let full_view_key = if view.full_view {
        t!("Chart.exit_full_view")
    } else {
        t!("Chart.full_view")
    };
    let title = view
        .chart_title()
        .or_else(|| view.selected.as_ref().map(|s| s.name.clone()))
        .unwrap_or_else(|| t!("Chart.placeholder_title"));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if view.full_view {
            styles::border_focused()
        } else {
            styles::border()
        })
        .title(Span::styled(format!(" {title} "), styles::title()))
        .title(
            ratatui::widgets::block::Title::from(Span::styled(
                format!(" {full_view_key} "),
                styles::dark_gray(),
            ))
            .alignment(Alignment::Right),
        );

    let Some(series) = view.series() else {
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        if view.is_loading() {
            frame.render_widget(LoadingWidget::from(loading), inner);
        } else {
            let hint = if view.selected.is_some() {
                t!("Chart.empty")
            } else {
                t!("Chart.select_hint")
            };
            let hint = Paragraph::new(Line::styled(hint, styles::gray()))
                .alignment(Alignment::Center);
            frame.render_widget(hint, crate::ui::rect::centered(0, 1, inner));
        }
        return;
    };

    let empty_text = t!("Chart.empty");
    let inner = block.inner(rect);
    // legend carries the symbol, the title carries the display name
    frame.render_widget(
        Candlestick::new(&series.klines)
            .name(&series.symbol)
            .empty_text(&empty_text)
            .block(block),
        rect,
    );

    // previous chart stays visible while the new one loads
    if view.is_loading() {
        let corner = Rect {
            x: inner.right().saturating_sub(12),
            width: inner.width.min(12),
            height: inner.height.min(1),
            ..inner
        };
        frame.render_widget(LoadingWidget::from(loading), corner);
    }
}
