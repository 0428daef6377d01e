use std::sync::atomic::{AtomicU8, Ordering};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Paragraph, Widget},
};

/// Frame counter for the loading indicator; advances once per draw
#[derive(Debug, Default)]
pub struct Loading {
    index: AtomicU8,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct LoadingWidget {
    index: u8,
}

impl From<&Loading> for LoadingWidget {
    fn from(loading: &Loading) -> Self {
        Self {
            index: loading.index.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl LoadingWidget {
    fn text(self) -> &'static str {
        match (self.index / 4) % 6 {
            1 => "◰ LOADING.  ",
            2 => "◳ LOADING.. ",
            3 => "◲ LOADING...",
            4 => "◲ LOADING ..",
            5 => "◱ LOADING  .",
            _ => "◰ LOADING   ",
        }
    }
}

impl Widget for LoadingWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = crate::ui::rect::centered(12, 1, area);
        Paragraph::new(self.text())
            .style(crate::ui::styles::gray())
            .render(area, buf);
    }
}
