//! Market-data collaborators: batched live prices and daily history.

pub mod error;
pub mod twelvedata;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::data::PriceMap;

pub use error::{MarketError, Result};
pub use twelvedata::TwelveData;

/// One history bar as the provider sends it (all prices are strings)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBar {
    pub datetime: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    #[serde(default)]
    pub volume: Option<String>,
}

/// Parameters of a historical-series request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeriesRequest {
    pub symbol: String,
    /// Bar size in provider notation, e.g. `1day`
    pub interval: String,
    /// Number of most recent bars
    pub outputsize: u32,
}

#[async_trait]
pub trait MarketData: Send + Sync {
    /// Latest price for every symbol in one request. Symbols the provider does
    /// not know are simply missing from the result.
    async fn prices(&self, symbols: &[String]) -> Result<PriceMap>;

    /// Most recent bars for one symbol, in provider order (newest first).
    async fn time_series(&self, request: &SeriesRequest) -> Result<Vec<RawBar>>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{MarketData, MarketError, RawBar, Result, SeriesRequest};
    use crate::data::PriceMap;

    type SeriesReply = (Duration, Result<Vec<RawBar>>);

    /// In-memory provider answering from scripted replies
    #[derive(Default)]
    pub struct ScriptedMarket {
        prices: Mutex<VecDeque<Result<PriceMap>>>,
        price_calls: Mutex<Vec<Vec<String>>>,
        series: Mutex<HashMap<String, VecDeque<SeriesReply>>>,
        series_calls: Mutex<Vec<SeriesRequest>>,
    }

    impl ScriptedMarket {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_prices(&self, items: &[(&str, &str)]) {
            let map = items
                .iter()
                .map(|(symbol, price)| ((*symbol).to_string(), (*price).to_string()))
                .collect();
            self.prices.lock().unwrap().push_back(Ok(map));
        }

        pub fn push_price_error(&self, message: &str) {
            self.prices.lock().unwrap().push_back(Err(MarketError::Api {
                code: 500,
                message: message.to_string(),
            }));
        }

        pub fn push_series(&self, symbol: &str, delay: Duration, bars: Vec<RawBar>) {
            self.series
                .lock()
                .unwrap()
                .entry(symbol.to_string())
                .or_default()
                .push_back((delay, Ok(bars)));
        }

        pub fn push_series_error(&self, symbol: &str, delay: Duration, message: &str) {
            self.series
                .lock()
                .unwrap()
                .entry(symbol.to_string())
                .or_default()
                .push_back((
                    delay,
                    Err(MarketError::Api {
                        code: 404,
                        message: message.to_string(),
                    }),
                ));
        }

        pub fn price_calls(&self) -> Vec<Vec<String>> {
            self.price_calls.lock().unwrap().clone()
        }

        pub fn series_calls(&self) -> Vec<SeriesRequest> {
            self.series_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MarketData for ScriptedMarket {
        async fn prices(&self, symbols: &[String]) -> Result<PriceMap> {
            self.price_calls.lock().unwrap().push(symbols.to_vec());
            let reply = self.prices.lock().unwrap().pop_front();
            reply.unwrap_or_else(|| Ok(PriceMap::new()))
        }

        async fn time_series(&self, request: &SeriesRequest) -> Result<Vec<RawBar>> {
            self.series_calls.lock().unwrap().push(request.clone());
            let reply = self
                .series
                .lock()
                .unwrap()
                .get_mut(&request.symbol)
                .and_then(VecDeque::pop_front);
            let Some((delay, result)) = reply else {
                return Ok(vec![]);
            };
            tokio::time::sleep(delay).await;
            result
        }
    }

    /// Daily bars, newest first, closing at `closes` in chronological order
    pub fn daily_bars(closes: &[f64]) -> Vec<RawBar> {
        closes
            .iter()
            .enumerate()
            .rev()
            .map(|(day, close)| RawBar {
                datetime: format!("2024-01-{:02}", day + 1),
                open: format!("{:.2}", close - 1.0),
                high: format!("{:.2}", close + 2.0),
                low: format!("{:.2}", close - 2.0),
                close: format!("{close:.2}"),
                volume: Some("1000".to_string()),
            })
            .collect()
    }
}
