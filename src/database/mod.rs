//! Database access layer.
//!
//! A thin client over the ClickHouse HTTP interface behind the
//! [`DatabaseClient`] trait. One long-lived client is constructed at startup
//! and shared by every request; access is already serialized by the stdio
//! request loop, so there is no pooling and no locking discipline here.

pub mod client;
#[cfg(test)]
pub mod mock;
pub mod result;
pub mod traits;

pub use client::{ClickHouseClient, quote_identifier};
pub use result::{ColumnDescriptor, Row, decode_json_each_row, extract_string_column};
pub use traits::DatabaseClient;
