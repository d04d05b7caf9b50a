pub mod document;

pub use document::{Document, DocumentId, DocumentStatus, RELEVANCE_EPS};
