use std::time::Duration;

use async_trait::async_trait;
use itertools::Itertools;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{MarketData, MarketError, RawBar, Result, SeriesRequest};
use crate::data::PriceMap;

pub const DEFAULT_BASE_URL: &str = "https://api.twelvedata.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ERROR_BODY: usize = 200;

/// Twelve Data REST client. The API key travels as the `apikey` query parameter.
pub struct TwelveData {
    base_url: String,
    api_key: String,
    client: Client,
}

#[derive(Deserialize)]
struct TimeSeriesResponse {
    #[serde(default)]
    values: Vec<RawBar>,
}

impl TwelveData {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}/{endpoint}", self.base_url);
        tracing::debug!(%url, ?query, "GET");

        let resp = self
            .client
            .get(&url)
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(MarketError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let value: Value = serde_json::from_str(&body)?;
        check_api_error(&value)?;
        Ok(value)
    }
}

#[async_trait]
impl MarketData for TwelveData {
    async fn prices(&self, symbols: &[String]) -> Result<PriceMap> {
        let joined = symbols.iter().join(",");
        let value = self.get("price", &[("symbol", joined.as_str())]).await?;
        Ok(decode_prices(symbols, &value))
    }

    async fn time_series(&self, request: &SeriesRequest) -> Result<Vec<RawBar>> {
        let outputsize = request.outputsize.to_string();
        let value = self
            .get(
                "time_series",
                &[
                    ("symbol", request.symbol.as_str()),
                    ("interval", request.interval.as_str()),
                    ("outputsize", outputsize.as_str()),
                ],
            )
            .await?;
        let resp: TimeSeriesResponse = serde_json::from_value(value)?;
        Ok(resp.values)
    }
}

/// Top-level `{"status": "error", "code": .., "message": ..}` payloads
fn check_api_error(value: &Value) -> Result<()> {
    if value.get("status").and_then(Value::as_str) != Some("error") {
        return Ok(());
    }
    Err(MarketError::Api {
        code: value.get("code").and_then(Value::as_i64).unwrap_or_default(),
        message: value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string(),
    })
}

/// The price endpoint answers a single symbol with a bare `{"price": ..}` and
/// a batch with a symbol-keyed map. Unknown tickers in a batch come back as
/// per-symbol error objects and are left out.
fn decode_prices(symbols: &[String], value: &Value) -> PriceMap {
    let mut prices = PriceMap::new();

    if let [symbol] = symbols {
        if let Some(price) = value.get("price").and_then(price_text) {
            prices.insert(symbol.clone(), price);
            return prices;
        }
    }

    let Some(map) = value.as_object() else {
        return prices;
    };
    for (symbol, item) in map {
        match item.get("price").and_then(price_text) {
            Some(price) => {
                prices.insert(symbol.clone(), price);
            }
            None => {
                let reason = item
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                tracing::warn!(symbol = %symbol, reason, "行情缺少价格");
            }
        }
    }
    prices
}

fn price_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
