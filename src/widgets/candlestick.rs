use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Paragraph, Widget},
};
use time::macros::format_description;

use crate::data::Kline;
use crate::ui::styles;

const VOID: char = ' ';
const BODY: char = '┃';
const HALF_BODY_BOTTOM: char = '╻';
const HALF_BODY_TOP: char = '╹';
const WICK: char = '│';
const TOP: char = '╽';
const BOTTOM: char = '╿';
const UPPER_WICK: char = '╷';
const LOWER_WICK: char = '╵';

/// `{:>9.2} │ `
pub const Y_AXIS_WIDTH: u16 = 12;
/// Price label every this many rows
const Y_LABEL_EVERY: u16 = 4;
/// `MM-DD` plus a gap
const X_LABEL_SPACING: usize = 7;

/// OHLC candles drawn with box-drawing characters, one column per bar.
///
/// Layout: a legend row on top (series name and the latest bar), the plot with
/// a price axis on the left, and a date row at the bottom. Bars that are not
/// drawable (NaN or inconsistent prices) are skipped.
pub struct Candlestick<'a> {
    klines: &'a [Kline],
    name: Option<&'a str>,
    block: Option<Block<'a>>,
    empty_text: &'a str,
}

impl<'a> Candlestick<'a> {
    pub fn new(klines: &'a [Kline]) -> Self {
        Self {
            klines,
            name: None,
            block: None,
            empty_text: "",
        }
    }

    #[must_use]
    pub fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Shown centered when there is nothing to draw
    #[must_use]
    pub fn empty_text(mut self, text: &'a str) -> Self {
        self.empty_text = text;
        self
    }
}

impl Widget for Candlestick<'_> {
    fn render(mut self, area: Rect, buf: &mut Buffer) {
        let area = match self.block.take() {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        let candles: Vec<&Kline> = self.klines.iter().filter(|k| k.is_drawable()).collect();
        let plot = Plot::new(&candles, area);
        let Some(plot) = plot else {
            if !self.empty_text.is_empty() {
                let rect = crate::ui::rect::centered(0, 1, area);
                Paragraph::new(self.empty_text)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(styles::gray())
                    .render(rect, buf);
            }
            return;
        };

        render_legend(self.name, plot.candles.last().copied(), area, buf);
        plot.render(buf);
    }
}

fn render_legend(name: Option<&str>, last: Option<&Kline>, area: Rect, buf: &mut Buffer) {
    let width = area.width as usize;
    let mut x = area.x;
    if let Some(name) = name {
        let (next, _) = buf.set_stringn(x, area.y, name, width, styles::title());
        x = next.saturating_add(2);
    }
    if let Some(last) = last {
        let text = format!(
            "O {:.2}  H {:.2}  L {:.2}  C {:.2}",
            last.open, last.high, last.low, last.close
        );
        let remaining = (area.x + area.width).saturating_sub(x) as usize;
        buf.set_stringn(x, area.y, text, remaining, candle_style(last));
    }
}

fn candle_style(kline: &Kline) -> Style {
    let (bull, bear) = styles::bull_bear();
    if kline.is_bullish() {
        bull
    } else {
        bear
    }
}

/// Geometry of the drawable part; only built when at least one bar fits
struct Plot<'k> {
    candles: &'k [&'k Kline],
    columns: Vec<u16>,
    min: f64,
    max: f64,
    /// top-left of the candle area
    x: u16,
    y: u16,
    width: u16,
    height: u16,
}

impl<'k> Plot<'k> {
    fn new(candles: &'k [&'k Kline], area: Rect) -> Option<Self> {
        // legend row + date row
        let height = area.height.checked_sub(2).filter(|h| *h > 0)?;
        let width = area.width.checked_sub(Y_AXIS_WIDTH).filter(|w| *w > 0)?;
        if candles.is_empty() {
            return None;
        }

        // newest bars win when the plot is too narrow
        let visible = candles.len().min(width as usize);
        let candles = &candles[candles.len() - visible..];

        let (min, max) = price_bounds(candles);
        Some(Self {
            candles,
            columns: columns(width, candles.len()),
            min,
            max,
            x: area.x + Y_AXIS_WIDTH,
            y: area.y + 1,
            width,
            height,
        })
    }

    #[allow(clippy::cast_sign_loss)]
    fn render(&self, buf: &mut Buffer) {
        let axis_x = self.x - Y_AXIS_WIDTH;
        for level in 1..=self.height {
            buf.set_string(axis_x, self.row(level), self.axis_label(level), styles::gray());
        }

        for (candle, column) in self.candles.iter().zip(&self.columns) {
            let style = candle_style(candle);
            let x = self.x + column;
            let mut drawn = false;
            for level in 1..=self.height {
                let ch = self.glyph(candle, level);
                if ch != VOID {
                    buf.get_mut(x, self.row(level)).set_char(ch).set_style(style);
                    drawn = true;
                }
            }
            if !drawn {
                // zero-range bar sitting exactly on a row boundary
                let level = self
                    .height_of(candle.close)
                    .round()
                    .clamp(1.0, f64::from(self.height)) as u16;
                buf.get_mut(x, self.row(level))
                    .set_char(BODY)
                    .set_style(style);
            }
        }

        self.render_dates(buf);
    }

    /// Buffer row of `level` (1 = bottom row of the plot)
    fn row(&self, level: u16) -> u16 {
        self.y + (self.height - level)
    }

    fn axis_label(&self, level: u16) -> String {
        if level % Y_LABEL_EVERY == 0 {
            let price = self.min + f64::from(level) * (self.max - self.min) / f64::from(self.height);
            format!("{price:>9.2} │ ")
        } else {
            format!("{:>9} │ ", "")
        }
    }

    fn render_dates(&self, buf: &mut Buffer) {
        let row = self.y + self.height;
        let mut next_free = 0usize;
        for (candle, column) in self.candles.iter().zip(&self.columns) {
            let column = *column as usize;
            if column < next_free {
                continue;
            }
            let Some(label) = candle.timestamp.and_then(date_label) else {
                continue;
            };
            if column + label.len() > self.width as usize {
                break;
            }
            buf.set_string(self.x + column as u16, row, &label, styles::gray());
            next_free = column + X_LABEL_SPACING;
        }
    }

    fn height_of(&self, price: f64) -> f64 {
        let height = f64::from(self.height);
        if (self.max - self.min).abs() < f64::EPSILON {
            return height / 2.0;
        }
        (price - self.min) / (self.max - self.min) * height
    }

    /// Character for `candle` on the row at `level` (1 = bottom row)
    fn glyph(&self, candle: &Kline, level: u16) -> char {
        let level = f64::from(level);
        let high = self.height_of(candle.high);
        let low = self.height_of(candle.low);
        let body_top = self.height_of(candle.open.max(candle.close));
        let body_bottom = self.height_of(candle.open.min(candle.close));

        if high.ceil() >= level && level >= body_top.floor() {
            // upper wick
            if body_top - level > 0.75 {
                BODY
            } else if body_top - level > 0.25 {
                if high - level > 0.75 {
                    TOP
                } else {
                    HALF_BODY_BOTTOM
                }
            } else if high - level > 0.75 {
                WICK
            } else if high - level > 0.25 {
                UPPER_WICK
            } else {
                VOID
            }
        } else if body_top.floor() >= level && level >= body_bottom.ceil() {
            BODY
        } else if body_bottom.ceil() >= level && level >= low.floor() {
            // lower wick
            if body_bottom - level < 0.25 {
                BODY
            } else if body_bottom - level < 0.75 {
                if low - level < 0.25 {
                    BOTTOM
                } else {
                    HALF_BODY_TOP
                }
            } else if low - level < 0.25 {
                WICK
            } else if low - level < 0.75 {
                LOWER_WICK
            } else {
                VOID
            }
        } else {
            VOID
        }
    }
}

fn price_bounds(candles: &[&Kline]) -> (f64, f64) {
    let max = candles.iter().fold(f64::NEG_INFINITY, |acc, c| acc.max(c.high));
    let min = candles.iter().fold(f64::INFINITY, |acc, c| acc.min(c.low));
    let margin = (max - min) * 0.02;
    ((min - margin).max(0.0), max + margin)
}

/// Column of each candle, computed from its index so rounding never drifts
#[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
fn columns(width: u16, count: usize) -> Vec<u16> {
    match count {
        0 => vec![],
        1 => vec![width / 2],
        _ => {
            let spacing = f64::from(width) / count as f64;
            (0..count)
                .map(|i| ((i as f64 * spacing).round() as u16).min(width - 1))
                .collect()
        }
    }
}

fn date_label(timestamp_ms: i64) -> Option<String> {
    let at = time::OffsetDateTime::from_unix_timestamp(timestamp_ms.div_euclid(1000)).ok()?;
    at.format(format_description!("[month]-[day]")).ok()
}
