use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::app::AppEvent;
use crate::data::SharedWatchlist;
use crate::market::MarketData;

/// Polls batched prices for the whole watchlist while it is non-empty.
///
/// Each tick reads the symbols at that moment and spawns its own fetch, so a
/// slow response never delays the next tick. Every fetch carries a sequence
/// number; the watchlist drops a response older than the one it already holds.
pub struct RefreshScheduler {
    watchlist: SharedWatchlist,
    market: Arc<dyn MarketData>,
    events: UnboundedSender<AppEvent>,
    period: Duration,
    sequence: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn new(
        watchlist: SharedWatchlist,
        market: Arc<dyn MarketData>,
        events: UnboundedSender<AppEvent>,
        period: Duration,
    ) -> Self {
        Self {
            watchlist,
            market,
            events,
            period,
            sequence: Arc::new(AtomicU64::new(0)),
            task: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Start or stop the timer to match the watchlist. Call after every mutation.
    pub fn sync(&mut self) {
        let empty = self
            .watchlist
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty();

        if empty {
            self.stop();
        } else if !self.is_running() {
            self.start();
        }
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::info!("报价刷新已停止");
        }
    }

    fn start(&mut self) {
        let watchlist = self.watchlist.clone();
        let market = self.market.clone();
        let events = self.events.clone();
        let sequence = self.sequence.clone();
        let period = self.period;

        tracing::info!(period_ms = period.as_millis(), "报价刷新已启动");
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let symbols = watchlist
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .symbols();
                if symbols.is_empty() {
                    continue;
                }

                let seq = sequence.fetch_add(1, Ordering::SeqCst) + 1;
                tokio::spawn(refresh(
                    watchlist.clone(),
                    market.clone(),
                    events.clone(),
                    symbols,
                    seq,
                ));
            }
        }));
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn refresh(
    watchlist: SharedWatchlist,
    market: Arc<dyn MarketData>,
    events: UnboundedSender<AppEvent>,
    symbols: Vec<String>,
    seq: u64,
) {
    tracing::debug!(seq, count = symbols.len(), "请求批量报价");
    match market.prices(&symbols).await {
        Ok(prices) => {
            let updated = watchlist
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .merge_prices(&prices, seq);
            tracing::debug!(seq, received = prices.len(), updated, "报价已合并");
            _ = events.send(AppEvent::PricesUpdated);
        }
        Err(err) => {
            tracing::error!(seq, "获取报价失败：{err}");
        }
    }
}
