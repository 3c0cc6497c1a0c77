pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http::HttpTransport, storage::LocalStorage};
pub use config::BatchConfig;
pub use core::escalation::{parse_payload, ResultsPipeline};
pub use core::scraper::{BatchSummary, EventScraper};
pub use domain::model::{
    EventSpec, FailureMode, ParsePolicy, RawResponse, ResultRow, RowBatch, CANONICAL_FIELDS,
};
pub use utils::error::{Result, ScrapeError};
