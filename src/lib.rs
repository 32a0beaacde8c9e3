//! Xson encodes value graphs into a JSON superset that can express
//! cycles and sharing: a revisited object renders as a reference-path
//! expression (`_.$.wife`) instead of being encoded again, and an
//! optional extended mode extracts chosen object types into deduplicated
//! top-level buckets referenced as `_.foos[0]`.
//!
//! Core concepts:
//! - **Value**: the encoder input; arrays and tables are inline, only
//!   objects carry identity
//! - **Tracker**: revisit detection, with an exhaustive, bounded or
//!   scoped strategy
//! - **Mapper**: picks which objects land in which bucket (extended mode)
//! - **Provider**: classifies a value into scalar/sequence/mapping shape
//! - **Format**: dense, light or pretty layout
//!
//! # Example
//!
//! ```
//! use xson::{Encoder, Value};
//!
//! let mut table = indexmap::IndexMap::new();
//! table.insert("greeting".to_string(), Value::from("hello"));
//!
//! let out = Encoder::new().encode(&Value::Table(table)).unwrap();
//! assert_eq!(out, r#"{"greeting":"hello"}"#);
//! ```
//!
//! Encoding is synchronous and all-or-nothing; per-call state never
//! leaks between calls, so independent calls may run concurrently on
//! separate encoder instances.

mod buffer;
mod encoder;
mod error;
mod format;
mod mapper;
mod provider;
pub mod reference;
mod tracker;
mod value;

pub use encoder::Encoder;
pub use error::XsonError;
pub use format::{Format, XsonFormat};
pub use mapper::{Mapper, StaticMapper};
pub use provider::{Provider, StdProvider};
pub use reference::Key;
pub use tracker::{Snapshot, Strategy, Tracker};
pub use value::{Node, ObjectId, Value, XObject};
