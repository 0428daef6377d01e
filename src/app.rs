use std::sync::{Arc, PoisonError};
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent};
use ratatui::prelude::{Constraint, Direction, Layout};
use ratatui::widgets::TableState;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::data::{SharedWatchlist, TrackedSymbol, Watchlist};
use crate::helper::cycle;
use crate::market::MarketData;
use crate::render::{DirtyFlags, RenderState};
use crate::scheduler::RefreshScheduler;
use crate::selector::DetailSelector;
use crate::widgets::{InputAction, Loading, SymbolInput, Terminal};

pub const POPUP_HELP: u8 = 0b1;
pub const POPUP_INPUT: u8 = 0b10;

/// Background work finished; the UI loop redraws the affected panels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppEvent {
    PricesUpdated,
    SeriesUpdated,
}

impl AppEvent {
    pub fn dirty_flags(self) -> DirtyFlags {
        match self {
            Self::PricesUpdated => DirtyFlags::NONE.mark_prices_update(),
            Self::SeriesUpdated => DirtyFlags::DETAIL,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue(DirtyFlags),
    Quit,
}

/// Split `SYMBOL [NAME...]` into an uppercase symbol and a display name.
/// The name falls back to the symbol.
pub fn parse_entry(raw: &str) -> Option<(String, String)> {
    let mut words = raw.split_whitespace();
    let symbol = words.next()?.to_uppercase();
    let name = words.collect::<Vec<_>>().join(" ");
    let name = if name.is_empty() { symbol.clone() } else { name };
    Some((symbol, name))
}

pub struct App {
    watchlist: SharedWatchlist,
    scheduler: RefreshScheduler,
    selector: DetailSelector,
    input: SymbolInput,
    table: TableState,
    popup: u8,
    loading: Loading,
}

impl App {
    pub fn new(
        config: &Config,
        market: Arc<dyn MarketData>,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let watchlist = Watchlist::shared();
        let scheduler = RefreshScheduler::new(
            watchlist.clone(),
            market.clone(),
            events.clone(),
            config.refresh_interval,
        );
        let selector = DetailSelector::new(market, events, config.series.clone());
        Self {
            watchlist,
            scheduler,
            selector,
            input: SymbolInput::default(),
            table: TableState::default(),
            popup: 0,
            loading: Loading::default(),
        }
    }

    /// Add from user text. `None` when there is no symbol in it, otherwise
    /// whether a new entry was inserted.
    pub fn add_entry(&mut self, raw: &str) -> Option<bool> {
        let (symbol, name) = parse_entry(raw)?;
        let inserted = self
            .watchlist
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add(symbol.clone(), name);
        if inserted {
            tracing::info!(symbol = %symbol, "添加自选");
            if self.table.selected().is_none() {
                self.table.select(Some(0));
            }
        } else {
            tracing::debug!(symbol = %symbol, "已在自选中");
        }
        self.scheduler.sync();
        Some(inserted)
    }

    fn entry_at(&self, index: usize) -> Option<TrackedSymbol> {
        self.watchlist
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries()
            .get(index)
            .cloned()
    }

    fn len(&self) -> usize {
        self.watchlist
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_loading(&self) -> bool {
        self.selector.snapshot().is_loading()
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> Flow {
        if event == ctrl!('c') {
            return Flow::Quit;
        }

        match self.popup {
            POPUP_INPUT => return Flow::Continue(self.handle_input_key(event)),
            POPUP_HELP => {
                self.popup = 0;
                return Flow::Continue(DirtyFlags::ALL);
            }
            _ => (),
        }

        let flags = match event {
            key!('q') => return Flow::Quit,
            key!('a') | key!('/') => {
                self.popup = POPUP_INPUT;
                DirtyFlags::NONE.mark_popup_change(POPUP_INPUT)
            }
            key!('?') => {
                self.popup = POPUP_HELP;
                DirtyFlags::NONE.mark_popup_change(POPUP_HELP)
            }
            key!(Up) | key!('k') => {
                self.table.select(cycle::prev(self.table.selected(), self.len()));
                DirtyFlags::WATCHLIST
            }
            key!(Down) | key!('j') => {
                self.table.select(cycle::next(self.table.selected(), self.len()));
                DirtyFlags::WATCHLIST
            }
            key!(Enter) => {
                let entry = self.table.selected().and_then(|idx| self.entry_at(idx));
                if entry.is_none() {
                    return Flow::Continue(DirtyFlags::NONE);
                }
                self.selector.select(entry.as_ref());
                DirtyFlags::WATCHLIST | DirtyFlags::DETAIL
            }
            key!(Esc) => {
                self.selector.select(None);
                DirtyFlags::WATCHLIST | DirtyFlags::DETAIL
            }
            key!('f') => {
                self.selector.toggle_full_view();
                DirtyFlags::ALL
            }
            _ => DirtyFlags::NONE,
        };
        Flow::Continue(flags)
    }

    fn handle_input_key(&mut self, event: KeyEvent) -> DirtyFlags {
        match self.input.handle_key(event) {
            InputAction::Submit(text) => {
                self.popup = 0;
                if self.add_entry(&text).is_none() {
                    tracing::debug!("空输入，未添加");
                }
                DirtyFlags::POPUP_INPUT.mark_watchlist_change()
            }
            InputAction::Cancel => {
                self.popup = 0;
                DirtyFlags::ALL
            }
            InputAction::Edited => DirtyFlags::POPUP_INPUT,
            InputAction::Ignored => DirtyFlags::NONE,
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let (top, body, bottom) = crate::ui::rect::frame_rows(frame.size());
        let detail = self.selector.snapshot();
        let entries = self
            .watchlist
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries()
            .to_vec();

        crate::views::navbar::render(frame, top);
        crate::views::footer::render(
            frame,
            bottom,
            &crate::views::footer::Status {
                symbols: entries.len(),
                refresh: self.scheduler.is_running().then_some(self.scheduler.period()),
            },
        );

        if detail.full_view {
            crate::views::detail::render(frame, body, &detail, &self.loading);
        } else {
            let chunks = Layout::default()
                .constraints([Constraint::Length(48), Constraint::Min(20)])
                .direction(Direction::Horizontal)
                .split(body);
            let selected = detail.selected.as_ref().map(|s| s.symbol.as_str());
            crate::views::watchlist::render(frame, chunks[0], &entries, selected, &mut self.table);
            crate::views::detail::render(frame, chunks[1], &detail, &self.loading);
        }

        crate::views::popup::render(frame, body, self.popup, &self.input);
    }
}

const RENDER_INTERVAL: Duration = Duration::from_millis(33); // ~30 FPS

pub async fn run(
    args: crate::Args,
    config: Config,
    market: Arc<dyn MarketData>,
) -> anyhow::Result<()> {
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let mut app = App::new(&config, market, update_tx);
    for symbol in &args.symbols {
        app.add_entry(symbol);
    }

    let mut terminal = Terminal::new()?;
    let mut render_tick = tokio::time::interval(RENDER_INTERVAL);
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut events = EventStream::new();
    let mut render_state = RenderState::new();
    // Initial render to display UI
    render_state.mark_all_dirty();

    loop {
        tokio::select! {
            _ = render_tick.tick() => {
                if app.is_loading() {
                    // spinner frames
                    render_state.mark_dirty(DirtyFlags::DETAIL);
                }
                if render_state.needs_render() {
                    terminal.draw(|frame| app.render(frame))?;
                    render_state.clear();
                } else {
                    render_state.skip();
                }
            }
            Some(event) = update_rx.recv() => {
                render_state.mark_dirty(event.dirty_flags());
            }
            Some(event) = tokio_stream::StreamExt::next(&mut events) => {
                match event {
                    Ok(Event::Key(key)) => match app.handle_key(key) {
                        Flow::Continue(flags) => render_state.mark_dirty(flags),
                        Flow::Quit => break,
                    },
                    Ok(Event::Resize(..)) => render_state.mark_all_dirty(),
                    Ok(_) => (),
                    Err(err) => {
                        tracing::error!("接收事件失败：{err}");
                        return Err(err.into());
                    }
                }
            }
        }
    }

    tracing::info!("{}", render_state.stats());
    Ok(())
}
