//! Market scanner: builds queries, retrieves and filters search hits, extracts
//! structured alerts, and keeps the latest alerts per scan category.

pub mod error;
pub mod pipeline;
pub mod queries;
pub mod report;
pub mod session;
pub mod store;

pub use error::ScanError;
pub use pipeline::{run_market_scan, MarketScanner};
pub use queries::{build_category_queries, build_queries, MAX_QUERIES, MAX_QUERY_LEN};
pub use report::{ExtractionPath, ScanReport, ScanWarning};
pub use session::ScanSession;
pub use store::AlertStore;
