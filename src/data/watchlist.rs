use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Price keyed by symbol, as returned by a batched price request
pub type PriceMap = HashMap<String, String>;

/// Watchlist shared between the UI loop and the refresh scheduler
pub type SharedWatchlist = Arc<RwLock<Watchlist>>;

/// Last known price of a tracked symbol
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Price {
    /// No successful refresh yet
    #[default]
    Unknown,
    /// Decimal string exactly as the market-data provider returned it
    Quoted(String),
}

impl Price {
    pub const UNKNOWN_TEXT: &'static str = "-";

    pub fn as_str(&self) -> &str {
        match self {
            Self::Unknown => Self::UNKNOWN_TEXT,
            Self::Quoted(text) => text,
        }
    }

    /// Numeric value, `None` for the sentinel or anything that does not parse
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Unknown => None,
            Self::Quoted(text) => parse_price(text),
        }
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of the last price change
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Neutral,
}

impl Trend {
    /// An unchanged price counts as up.
    pub fn between(previous: f64, current: f64) -> Self {
        if current >= previous {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// One watchlist entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedSymbol {
    pub symbol: String,
    pub name: String,
    pub price: Price,
    pub trend: Trend,
    /// Sequence number of the price request that last updated this entry
    pub as_of: u64,
}

impl TrackedSymbol {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            price: Price::Unknown,
            trend: Trend::Neutral,
            as_of: 0,
        }
    }
}

/// Ordered set of tracked symbols, unique by symbol, in insertion order
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Watchlist {
    entries: Vec<TrackedSymbol>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedWatchlist {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Append a symbol. Returns `false` (and changes nothing) if it is already tracked.
    ///
    /// The symbol is stored as given; callers normalize case before adding.
    pub fn add(&mut self, symbol: impl Into<String>, name: impl Into<String>) -> bool {
        let symbol = symbol.into();
        if self.contains(&symbol) {
            return false;
        }
        self.entries.push(TrackedSymbol::new(symbol, name));
        true
    }

    /// Merge a price response into the tracked entries.
    ///
    /// Only entries present in `prices` are touched. A response never overwrites
    /// an entry that a more recently issued request (`seq`) already updated, and a
    /// price that does not parse is treated like a missing one. Returns the number
    /// of entries updated.
    pub fn merge_prices(&mut self, prices: &PriceMap, seq: u64) -> usize {
        let mut updated = 0;

        for entry in &mut self.entries {
            let Some(raw) = prices.get(&entry.symbol) else {
                continue;
            };
            if entry.as_of >= seq {
                tracing::debug!(
                    symbol = %entry.symbol,
                    seq,
                    as_of = entry.as_of,
                    "skip stale price"
                );
                continue;
            }
            let Some(current) = parse_price(raw) else {
                tracing::warn!(symbol = %entry.symbol, price = %raw, "unparseable price ignored");
                continue;
            };

            // no baseline before the first comparable price, trend stays as is
            if let Some(previous) = entry.price.value() {
                entry.trend = Trend::between(previous, current);
            }
            entry.price = Price::Quoted(raw.trim().to_string());
            entry.as_of = seq;
            updated += 1;
        }

        updated
    }

    pub fn entries(&self) -> &[TrackedSymbol] {
        &self.entries
    }

    /// Symbols in display order, as sent in a batched price request
    pub fn symbols(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.symbol.clone()).collect()
    }

    pub fn get(&self, symbol: &str) -> Option<&TrackedSymbol> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_price(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(items: &[(&str, &str)]) -> PriceMap {
        items
            .iter()
            .map(|(symbol, price)| ((*symbol).to_string(), (*price).to_string()))
            .collect()
    }

    fn quoted(list: &mut Watchlist, symbol: &str, price: &str) {
        list.add(symbol, symbol);
        list.merge_prices(&prices(&[(symbol, price)]), 1);
    }

    #[test]
    fn add_is_idempotent() {
        let mut list = Watchlist::new();
        assert!(list.add("AAPL", "Apple"));
        assert!(!list.add("AAPL", "Apple again"));

        assert_eq!(list.len(), 1);
        assert_eq!(list.entries()[0].name, "Apple");
    }

    #[test]
    fn add_appends_in_insertion_order_with_unknown_price() {
        let mut list = Watchlist::new();
        list.add("MSFT", "Microsoft");
        list.add("AAPL", "Apple");

        assert_eq!(list.symbols(), vec!["MSFT", "AAPL"]);
        let entry = &list.entries()[1];
        assert_eq!(entry.price, Price::Unknown);
        assert_eq!(entry.price.to_string(), "-");
        assert_eq!(entry.trend, Trend::Neutral);
    }

    #[test]
    fn store_keys_are_case_sensitive() {
        let mut list = Watchlist::new();
        list.add("AAPL", "Apple");
        assert!(list.add("aapl", "Apple"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn higher_price_trends_up() {
        let mut list = Watchlist::new();
        quoted(&mut list, "AAPL", "140.00");

        let updated = list.merge_prices(&prices(&[("AAPL", "150.00")]), 2);

        assert_eq!(updated, 1);
        let entry = list.get("AAPL").unwrap();
        assert_eq!(entry.price, Price::Quoted("150.00".to_string()));
        assert_eq!(entry.trend, Trend::Up);
    }

    #[test]
    fn lower_price_trends_down_and_equal_trends_up() {
        let mut list = Watchlist::new();
        quoted(&mut list, "AAPL", "140.00");

        list.merge_prices(&prices(&[("AAPL", "139.99")]), 2);
        assert_eq!(list.get("AAPL").unwrap().trend, Trend::Down);

        list.merge_prices(&prices(&[("AAPL", "139.990")]), 3);
        assert_eq!(list.get("AAPL").unwrap().trend, Trend::Up);
    }

    #[test]
    fn comparison_is_numeric_not_lexical() {
        let mut list = Watchlist::new();
        quoted(&mut list, "BRK.A", "9.50");

        list.merge_prices(&prices(&[("BRK.A", "10.25")]), 2);
        assert_eq!(list.get("BRK.A").unwrap().trend, Trend::Up);
    }

    #[test]
    fn first_quote_keeps_neutral_trend() {
        let mut list = Watchlist::new();
        list.add("AAPL", "Apple");

        list.merge_prices(&prices(&[("AAPL", "150.00")]), 1);

        let entry = list.get("AAPL").unwrap();
        assert_eq!(entry.price.as_str(), "150.00");
        assert_eq!(entry.trend, Trend::Neutral);
    }

    #[test]
    fn absent_symbols_are_left_unchanged() {
        let mut list = Watchlist::new();
        quoted(&mut list, "AAPL", "140.00");
        list.merge_prices(&prices(&[("AAPL", "141.00")]), 2);
        list.add("MSFT", "Microsoft");

        let updated = list.merge_prices(&prices(&[("MSFT", "400.00")]), 3);

        assert_eq!(updated, 1);
        let aapl = list.get("AAPL").unwrap();
        assert_eq!(aapl.price.as_str(), "141.00");
        assert_eq!(aapl.trend, Trend::Up);
    }

    #[test]
    fn unparseable_price_is_not_an_update() {
        let mut list = Watchlist::new();
        quoted(&mut list, "AAPL", "140.00");

        let updated = list.merge_prices(&prices(&[("AAPL", "n/a")]), 2);
        list.merge_prices(&prices(&[("AAPL", "")]), 3);

        assert_eq!(updated, 0);
        let entry = list.get("AAPL").unwrap();
        assert_eq!(entry.price.as_str(), "140.00");
        assert_eq!(entry.trend, Trend::Neutral);
        assert_eq!(entry.as_of, 1);
    }

    #[test]
    fn merge_never_changes_order_or_cardinality() {
        let mut list = Watchlist::new();
        for symbol in ["TSLA", "AAPL", "MSFT"] {
            list.add(symbol, symbol);
        }

        list.merge_prices(
            &prices(&[("MSFT", "1"), ("AAPL", "2"), ("NVDA", "3"), ("TSLA", "4")]),
            1,
        );

        assert_eq!(list.symbols(), vec!["TSLA", "AAPL", "MSFT"]);
        assert!(!list.contains("NVDA"));
    }

    #[test]
    fn older_response_does_not_overwrite_newer_one() {
        let mut list = Watchlist::new();
        quoted(&mut list, "AAPL", "140.00");

        // request 3 answered before request 2
        list.merge_prices(&prices(&[("AAPL", "150.00")]), 3);
        let updated = list.merge_prices(&prices(&[("AAPL", "120.00")]), 2);

        assert_eq!(updated, 0);
        let entry = list.get("AAPL").unwrap();
        assert_eq!(entry.price.as_str(), "150.00");
        assert_eq!(entry.trend, Trend::Up);
        assert_eq!(entry.as_of, 3);
    }

    #[test]
    fn trend_display_is_lowercase() {
        assert_eq!(Trend::Up.to_string(), "up");
        assert_eq!(Trend::Down.to_string(), "down");
        assert_eq!(Trend::Neutral.to_string(), "neutral");
    }
}
