//! Service layer for business logic
//!
//! HTTP handlers stay thin and delegate here.

mod click_tracker;
mod shortener;

pub use click_tracker::ClickTracker;
pub use shortener::{ShortenResult, ShortenerService};
