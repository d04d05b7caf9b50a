//! Minnow: a small in-memory TF-IDF text search engine.
//!
//! Documents tagged with an id, a status and integer ratings go into a
//! mutable [`SearchIndex`]; free-text queries with `-`-prefixed
//! exclusion words come back as the top ranked matches. Query
//! evaluation has a sequential and a thread-parallel path, batches of
//! queries run on the rayon pool, and [`RequestTracker`] keeps a
//! rolling window of requests that returned nothing.

pub mod batch;
pub mod concurrent_map;
pub mod config;
pub mod error;
pub mod index;
pub mod models;
pub mod pagination;
pub mod query;
pub mod rate_window;
pub mod tokenizer;

pub use batch::{process_queries, process_queries_joined};
pub use concurrent_map::ConcurrentMap;
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use index::{ExecutionMode, SearchIndex};
pub use models::{Document, DocumentId, DocumentStatus, RELEVANCE_EPS};
pub use pagination::paginate;
pub use query::{Query, QueryParser};
pub use rate_window::RequestTracker;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
