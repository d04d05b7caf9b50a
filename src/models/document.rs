use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique document identifier
pub type DocumentId = i32;

/// Two relevances closer than this are considered equal
pub const RELEVANCE_EPS: f64 = 1e-6;

/// Publication state of an indexed document
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[default]
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

/// Ranked search hit
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub relevance: f64,
    pub rating: i32,
}

impl Document {
    pub fn new(id: DocumentId, relevance: f64, rating: i32) -> Self {
        Self {
            id,
            relevance,
            rating,
        }
    }
}

impl PartialEq for Document {
    /// Ids and ratings compare exactly; relevances within [`RELEVANCE_EPS`]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && (self.relevance - other.relevance).abs() < RELEVANCE_EPS
            && self.rating == other.rating
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}
