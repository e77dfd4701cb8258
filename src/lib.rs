pub mod client;
pub mod decoder;
pub mod error;
pub mod iterator;
pub mod structs;

pub use client::{Client, Job, LEGACY_SQL_MARKER};
pub use decoder::Value;
pub use error::BigQueryError;
pub use iterator::{
    QueryConfig, QueryResultInfo, QueryResultsIterator, QueryResultsService, ResultPager,
    DEFAULT_PAGE_SIZE,
};
