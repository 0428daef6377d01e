pub mod detail;
pub mod footer;
pub mod help;
pub mod navbar;
pub mod popup;
pub mod watchlist;
