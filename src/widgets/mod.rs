mod candlestick;
mod input;
mod loading;
mod terminal;

pub use candlestick::Candlestick;
pub use input::{InputAction, SymbolInput};
pub use loading::{Loading, LoadingWidget};
pub use terminal::Terminal;
