use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppEvent;
use crate::config::SeriesOptions;
use crate::data::{HistoricalSeries, TrackedSymbol};
use crate::market::{MarketData, SeriesRequest};

/// The symbol whose history is requested
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub symbol: String,
    pub name: String,
}

impl From<&TrackedSymbol> for Selection {
    fn from(entry: &TrackedSymbol) -> Self {
        Self {
            symbol: entry.symbol.clone(),
            name: entry.name.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DetailState {
    /// Nothing in flight. `stale` is whatever was on screen before.
    Idle { stale: Option<HistoricalSeries> },
    /// Waiting for the response of request `generation`
    Loading {
        generation: u64,
        previous: Option<HistoricalSeries>,
    },
    Ready(HistoricalSeries),
}

impl Default for DetailState {
    fn default() -> Self {
        Self::Idle { stale: None }
    }
}

impl DetailState {
    /// The series currently on screen
    pub fn series(&self) -> Option<&HistoricalSeries> {
        match self {
            Self::Idle { stale } => stale.as_ref(),
            Self::Loading { previous, .. } => previous.as_ref(),
            Self::Ready(series) => Some(series),
        }
    }

    fn take_series(&mut self) -> Option<HistoricalSeries> {
        match std::mem::take(self) {
            Self::Idle { stale } => stale,
            Self::Loading { previous, .. } => previous,
            Self::Ready(series) => Some(series),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    selected: Option<Selection>,
    generation: u64,
    state: DetailState,
    full_view: bool,
}

/// Render-side copy of the selector state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetailView {
    pub selected: Option<Selection>,
    pub state: DetailState,
    pub full_view: bool,
}

impl DetailView {
    pub fn series(&self) -> Option<&HistoricalSeries> {
        self.state.series()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, DetailState::Loading { .. })
    }

    /// Name shown in the title: the selected name when it matches the series
    /// on screen, otherwise the symbol the series belongs to.
    fn series_name(&self) -> Option<&str> {
        let series = self.series()?;
        match &self.selected {
            Some(selection) if selection.symbol == series.symbol => Some(&selection.name),
            _ => Some(&series.symbol),
        }
    }

    pub fn chart_title(&self) -> Option<String> {
        self.series_name()
            .map(|name| t!("Chart.title", name = name))
    }
}

/// Tracks the selected symbol and loads its history once per selection.
///
/// Responses are tagged with the generation current when their request was
/// issued; anything answering an earlier selection is dropped.
pub struct DetailSelector {
    inner: Arc<Mutex<Inner>>,
    market: Arc<dyn MarketData>,
    events: UnboundedSender<AppEvent>,
    options: SeriesOptions,
}

impl DetailSelector {
    pub fn new(
        market: Arc<dyn MarketData>,
        events: UnboundedSender<AppEvent>,
        options: SeriesOptions,
    ) -> Self {
        Self {
            inner: Arc::default(),
            market,
            events,
            options,
        }
    }

    pub fn select(&self, entry: Option<&TrackedSymbol>) {
        let mut inner = lock(&self.inner);
        inner.full_view = false;

        let Some(entry) = entry else {
            if inner.selected.take().is_some() {
                tracing::debug!("取消选中");
            }
            if let DetailState::Loading { .. } = inner.state {
                // the in-flight response must not land after deselect
                inner.generation += 1;
                let stale = inner.state.take_series();
                inner.state = DetailState::Idle { stale };
            }
            return;
        };

        let selection = Selection::from(entry);
        let unchanged = inner.selected.as_ref() == Some(&selection);
        if unchanged && !matches!(inner.state, DetailState::Idle { .. }) {
            return;
        }

        inner.generation += 1;
        let generation = inner.generation;
        let previous = inner.state.take_series();
        inner.state = DetailState::Loading {
            generation,
            previous,
        };
        inner.selected = Some(selection.clone());
        drop(inner);

        let request = SeriesRequest {
            symbol: selection.symbol,
            interval: self.options.interval.clone(),
            outputsize: self.options.outputsize,
        };
        tracing::info!(symbol = %request.symbol, generation, "加载历史 K 线");
        tokio::spawn(load(
            self.inner.clone(),
            self.market.clone(),
            self.events.clone(),
            request,
            generation,
        ));
    }

    pub fn toggle_full_view(&self) -> bool {
        let mut inner = lock(&self.inner);
        inner.full_view = !inner.full_view;
        inner.full_view
    }

    pub fn snapshot(&self) -> DetailView {
        let inner = lock(&self.inner);
        DetailView {
            selected: inner.selected.clone(),
            state: inner.state.clone(),
            full_view: inner.full_view,
        }
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn load(
    inner: Arc<Mutex<Inner>>,
    market: Arc<dyn MarketData>,
    events: UnboundedSender<AppEvent>,
    request: SeriesRequest,
    generation: u64,
) {
    let result = market.time_series(&request).await;

    let mut inner = lock(&inner);
    if inner.generation != generation {
        tracing::debug!(
            symbol = %request.symbol,
            generation,
            current = inner.generation,
            "丢弃过期的 K 线响应"
        );
        return;
    }

    match result {
        Ok(bars) => {
            let series = HistoricalSeries::from_raw(&request.symbol, &bars);
            tracing::debug!(symbol = %request.symbol, bars = series.len(), "K 线已更新");
            inner.state = DetailState::Ready(series);
        }
        Err(err) => {
            tracing::error!(symbol = %request.symbol, "获取历史 K 线失败：{err}");
            let stale = inner.state.take_series();
            inner.state = DetailState::Idle { stale };
        }
    }
    drop(inner);

    _ = events.send(AppEvent::SeriesUpdated);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::testing::{daily_bars, ScriptedMarket};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn selector(
        market: &Arc<ScriptedMarket>,
    ) -> (DetailSelector, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let selector = DetailSelector::new(market.clone(), tx, SeriesOptions::default());
        (selector, rx)
    }

    fn entry(symbol: &str, name: &str) -> TrackedSymbol {
        TrackedSymbol::new(symbol, name)
    }

    #[tokio::test(start_paused = true)]
    async fn select_loads_series_once() {
        let market = Arc::new(ScriptedMarket::new());
        market.push_series("AAPL", Duration::from_millis(100), daily_bars(&[1.0, 2.0, 3.0]));
        let (selector, mut rx) = selector(&market);

        selector.select(Some(&entry("AAPL", "Apple")));
        let view = selector.snapshot();
        assert!(view.is_loading());
        assert!(view.series().is_none());

        assert_eq!(rx.recv().await, Some(AppEvent::SeriesUpdated));
        let view = selector.snapshot();
        let series = view.series().unwrap();
        assert_eq!(series.symbol, "AAPL");
        assert_eq!(series.len(), 3);
        assert!(series.klines.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert_eq!(series.klines[2].close, 3.0);
        assert_eq!(view.chart_title().as_deref(), Some("Apple Candlestick Chart"));

        assert_eq!(
            market.series_calls(),
            vec![SeriesRequest {
                symbol: "AAPL".to_string(),
                interval: "1day".to_string(),
                outputsize: 30,
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_for_earlier_selection_is_discarded() {
        let market = Arc::new(ScriptedMarket::new());
        market.push_series("AAPL", Duration::from_millis(500), daily_bars(&[1.0]));
        market.push_series("MSFT", Duration::from_millis(100), daily_bars(&[4.0, 5.0]));
        let (selector, mut rx) = selector(&market);

        selector.select(Some(&entry("AAPL", "Apple")));
        selector.select(Some(&entry("MSFT", "Microsoft")));

        assert_eq!(rx.recv().await, Some(AppEvent::SeriesUpdated));
        tokio::time::sleep(Duration::from_secs(1)).await;

        let view = selector.snapshot();
        assert_eq!(view.series().unwrap().symbol, "MSFT");
        assert!(matches!(view.state, DetailState::Ready(_)));
        assert!(rx.try_recv().is_err());
        assert_eq!(market.series_calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_load_keeps_previous_series() {
        let market = Arc::new(ScriptedMarket::new());
        market.push_series("AAPL", Duration::ZERO, daily_bars(&[1.0, 2.0]));
        market.push_series_error("MSFT", Duration::ZERO, "symbol not found");
        let (selector, mut rx) = selector(&market);

        selector.select(Some(&entry("AAPL", "Apple")));
        rx.recv().await;
        selector.select(Some(&entry("MSFT", "Microsoft")));
        assert_eq!(
            selector.snapshot().series().map(|s| s.symbol.as_str()),
            Some("AAPL")
        );
        rx.recv().await;

        let view = selector.snapshot();
        assert!(matches!(view.state, DetailState::Idle { .. }));
        assert_eq!(view.series().unwrap().symbol, "AAPL");
        assert_eq!(view.series_name(), Some("AAPL"));
    }

    #[tokio::test(start_paused = true)]
    async fn deselect_fetches_nothing_and_keeps_series() {
        let market = Arc::new(ScriptedMarket::new());
        market.push_series("AAPL", Duration::ZERO, daily_bars(&[1.0]));
        let (selector, mut rx) = selector(&market);

        selector.select(Some(&entry("AAPL", "Apple")));
        rx.recv().await;
        selector.select(None);

        let view = selector.snapshot();
        assert!(view.selected.is_none());
        assert_eq!(view.series().unwrap().symbol, "AAPL");
        assert_eq!(market.series_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn deselect_while_loading_drops_the_response() {
        let market = Arc::new(ScriptedMarket::new());
        market.push_series("AAPL", Duration::from_millis(100), daily_bars(&[1.0]));
        let (selector, mut rx) = selector(&market);

        selector.select(Some(&entry("AAPL", "Apple")));
        selector.select(None);
        tokio::time::sleep(Duration::from_secs(1)).await;

        let view = selector.snapshot();
        assert_eq!(view.state, DetailState::Idle { stale: None });
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn reselecting_the_shown_symbol_does_not_refetch() {
        let market = Arc::new(ScriptedMarket::new());
        market.push_series("AAPL", Duration::ZERO, daily_bars(&[1.0]));
        let (selector, mut rx) = selector(&market);

        selector.select(Some(&entry("AAPL", "Apple")));
        rx.recv().await;
        selector.select(Some(&entry("AAPL", "Apple")));

        assert_eq!(market.series_calls().len(), 1);
        assert!(matches!(selector.snapshot().state, DetailState::Ready(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn select_collapses_full_view() {
        let market = Arc::new(ScriptedMarket::new());
        let (selector, _rx) = selector(&market);

        assert!(selector.toggle_full_view());
        assert!(selector.snapshot().full_view);

        selector.select(Some(&entry("AAPL", "Apple")));
        assert!(!selector.snapshot().full_view);

        assert!(selector.toggle_full_view());
        assert!(!selector.toggle_full_view());
    }
}
