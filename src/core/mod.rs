pub mod csv_rows;
pub mod decode;
pub mod endpoint;
pub mod escalation;
pub mod json_rows;
pub mod rows;
pub mod scraper;
pub mod sniff;
pub mod writer;
pub mod xml_rows;

pub use crate::domain::model::{
    EventSpec, FailureMode, ParsePolicy, RawResponse, ResultRow, RowBatch, CANONICAL_FIELDS,
};
pub use crate::domain::ports::{PageRenderer, Storage, Transport};
pub use crate::utils::error::Result;
