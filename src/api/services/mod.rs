#[cfg(feature = "metrics")]
pub mod metrics;
pub mod redirect;
pub mod routes;
pub mod shorten;
pub mod stats;

#[cfg(feature = "metrics")]
pub use metrics::MetricsService;
pub use redirect::RedirectService;
pub use routes::{app_routes, not_found};
pub use shorten::ShortenService;
pub use stats::StatsService;
