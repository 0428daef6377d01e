use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

use crate::market::RawBar;

/// One OHLC bar, timestamp in milliseconds since the Unix epoch
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    /// `None` when the provider datetime does not parse
    pub timestamp: Option<i64>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

pub type Klines = Vec<Kline>;

impl Kline {
    /// All prices finite and consistent with each other
    pub fn is_drawable(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        prices.iter().all(|v| v.is_finite())
            && self.high >= self.low
            && self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    fn from_raw(raw: &RawBar) -> Self {
        let timestamp = parse_datetime_ms(&raw.datetime);
        if timestamp.is_none() {
            tracing::warn!(datetime = %raw.datetime, "K 线时间无法解析");
        }
        Self {
            timestamp,
            open: parse_number(&raw.open),
            high: parse_number(&raw.high),
            low: parse_number(&raw.low),
            close: parse_number(&raw.close),
        }
    }
}

/// Recent bars for one symbol, ascending by time
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub symbol: String,
    pub klines: Klines,
}

impl HistoricalSeries {
    /// Build from provider bars, one kline per bar, oldest first.
    ///
    /// Providers answer newest-first, so the sequence is reversed unless its
    /// readable timestamps already ascend. Bars keep their position even when
    /// a field does not parse.
    pub fn from_raw(symbol: impl Into<String>, raw: &[RawBar]) -> Self {
        let mut klines: Klines = raw.iter().map(Kline::from_raw).collect();
        let mut known = klines.iter().filter_map(|k| k.timestamp);
        let ascending = known
            .next()
            .is_some_and(|first| known.last().is_some_and(|last| last > first));
        if !ascending {
            klines.reverse();
        }
        Self {
            symbol: symbol.into(),
            klines,
        }
    }

    pub fn len(&self) -> usize {
        self.klines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.klines.is_empty()
    }
}

/// Parse a provider decimal string, NaN when it does not parse
pub fn parse_number(text: &str) -> f64 {
    text.trim().parse().unwrap_or(f64::NAN)
}

/// `YYYY-MM-DD` or `YYYY-MM-DD hh:mm:ss`, read as UTC
pub fn parse_datetime_ms(text: &str) -> Option<i64> {
    let text = text.trim();
    let at = PrimitiveDateTime::parse(
        text,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .ok()
    .or_else(|| {
        Date::parse(text, format_description!("[year]-[month]-[day]"))
            .ok()
            .map(Date::midnight)
    })?;
    Some(at.assume_utc().unix_timestamp() * 1000)
}
