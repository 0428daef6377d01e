pub mod series;
pub mod watchlist;

pub use series::{HistoricalSeries, Kline, Klines};
pub use watchlist::*;
