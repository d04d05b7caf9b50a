//! Mutable inverted index
//!
//! Documents are tokenized on spaces, stripped of stop words and
//! deduplicated; each distinct word of a document carries a term
//! frequency of `1 / |distinct words|`. The index keeps the inverted
//! and forward directions in lockstep so removal is proportional to the
//! document's own word count.
//!
//! The index has no internal locking. Additions and removals take
//! `&mut self` and therefore exclude every reader; all query paths take
//! `&self` and may run from any number of threads at once.

mod ranking;
mod terms;

pub use ranking::ExecutionMode;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::thread;

use roaring::RoaringBitmap;
use tracing::debug;

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::models::{DocumentId, DocumentStatus};
use crate::query::QueryParser;
use crate::tokenizer::{is_valid_word, split_words};
use terms::{TermId, TermPool};

/// Per-document bookkeeping
#[derive(Clone, Debug)]
struct DocumentRecord {
    words: BTreeSet<TermId>,
    rating: i32,
    status: DocumentStatus,
}

/// In-memory TF-IDF search index
pub struct SearchIndex {
    config: SearchConfig,
    parser: QueryParser,
    terms: TermPool,
    /// term -> document -> term frequency
    postings: HashMap<TermId, BTreeMap<DocumentId, f64>>,
    /// document -> term -> term frequency; inverse of `postings`
    doc_words: BTreeMap<DocumentId, HashMap<TermId, f64>>,
    documents: BTreeMap<DocumentId, DocumentRecord>,
    doc_ids: RoaringBitmap,
}

impl SearchIndex {
    /// Create an index from a collection of stop words
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(stop_words, SearchConfig::default())
    }

    /// Create an index from a whitespace-separated stop-word string
    pub fn from_text(stop_words_text: &str) -> Result<Self> {
        Self::new(split_words(stop_words_text))
    }

    /// Create an index with explicit tunables
    pub fn with_config<I, S>(stop_words: I, config: SearchConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            config,
            parser: QueryParser::new(stop_words)?,
            terms: TermPool::new(),
            postings: HashMap::new(),
            doc_words: BTreeMap::new(),
            documents: BTreeMap::new(),
            doc_ids: RoaringBitmap::new(),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Ingest a document.
    ///
    /// Fails with `InvalidArgument` on a negative or already-used id and
    /// on any word containing a control byte; a failed call leaves the
    /// index unchanged. The stored rating is the integer-truncated mean
    /// of `ratings` (zero when empty).
    pub fn add_document(
        &mut self,
        id: DocumentId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if id < 0 {
            return Err(SearchError::InvalidArgument(format!(
                "document id {} is negative",
                id
            )));
        }
        if self.documents.contains_key(&id) {
            return Err(SearchError::InvalidArgument(format!(
                "document id {} is already in the index",
                id
            )));
        }

        // Validate and deduplicate before touching any index structure
        let mut distinct = BTreeSet::new();
        for word in split_words(text) {
            if !is_valid_word(word) {
                return Err(SearchError::InvalidArgument(format!(
                    "word {:?} contains a control character",
                    word
                )));
            }
            if !self.parser.is_stop_word(word) {
                distinct.insert(word);
            }
        }

        let tf = if distinct.is_empty() {
            0.0
        } else {
            1.0 / distinct.len() as f64
        };
        let mut words = BTreeSet::new();
        let mut frequencies = HashMap::with_capacity(distinct.len());
        for word in distinct {
            let term = self.terms.intern(word);
            self.postings.entry(term).or_default().insert(id, tf);
            frequencies.insert(term, tf);
            words.insert(term);
        }
        self.doc_words.insert(id, frequencies);
        self.documents.insert(
            id,
            DocumentRecord {
                words,
                rating: average_rating(ratings),
                status,
            },
        );
        self.doc_ids.insert(id as u32);
        debug!(document_id = id, words = self.documents[&id].words.len(), "indexed document");
        Ok(())
    }

    /// Drop a document and all of its postings; no-op for unknown ids
    pub fn remove_document(&mut self, id: DocumentId) {
        let Some(frequencies) = self.doc_words.remove(&id) else {
            return;
        };
        for term in frequencies.keys() {
            self.remove_posting(*term, id);
        }
        self.documents.remove(&id);
        self.doc_ids.remove(id as u32);
        debug!(document_id = id, "removed document");
    }

    /// Same as [`SearchIndex::remove_document`], with the per-term
    /// posting erasures fanned out across worker threads
    pub fn remove_document_parallel(&mut self, id: DocumentId) {
        let Some(frequencies) = self.doc_words.remove(&id) else {
            return;
        };

        let mut rows: Vec<&mut BTreeMap<DocumentId, f64>> = self
            .postings
            .iter_mut()
            .filter(|(term, _)| frequencies.contains_key(*term))
            .map(|(_, row)| row)
            .collect();

        let chunk_len = chunk_len(rows.len(), self.config.minus_workers);
        thread::scope(|scope| {
            for rows in rows.chunks_mut(chunk_len) {
                scope.spawn(move || {
                    for row in rows.iter_mut() {
                        row.remove(&id);
                    }
                });
            }
        });

        self.postings.retain(|_, row| !row.is_empty());
        self.documents.remove(&id);
        self.doc_ids.remove(id as u32);
        debug!(document_id = id, "removed document");
    }

    /// Which plus words of `raw_query` occur in document `id`.
    ///
    /// A single matching minus word empties the result. The document's
    /// status is returned alongside; an unknown id fails with
    /// `DocumentNotFound`.
    pub fn match_document(
        &self,
        raw_query: &str,
        id: DocumentId,
    ) -> Result<(Vec<&str>, DocumentStatus)> {
        let query = self.parser.parse(raw_query)?;
        let record = self
            .documents
            .get(&id)
            .ok_or(SearchError::DocumentNotFound(id))?;

        for word in &query.minus_words {
            if self.has_posting(word, id) {
                return Ok((Vec::new(), record.status));
            }
        }
        let mut matched = Vec::new();
        for word in &query.plus_words {
            if let Some(term) = self.terms.get(word) {
                if record.words.contains(&term) {
                    matched.push(self.terms.resolve(term));
                }
            }
        }
        Ok((matched, record.status))
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Live document ids in ascending order
    pub fn document_ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.doc_ids.iter().map(|id| id as DocumentId)
    }

    /// The forward-index row of a document: word -> term frequency.
    ///
    /// Unknown ids yield an empty row.
    pub fn word_frequencies(&self, id: DocumentId) -> BTreeMap<&str, f64> {
        let mut row = BTreeMap::new();
        if let Some(frequencies) = self.doc_words.get(&id) {
            for (term, tf) in frequencies {
                row.insert(self.terms.resolve(*term), *tf);
            }
        }
        row
    }

    /// `ln(N / df)` for a word, or `None` when no live document contains it
    pub fn inverse_document_frequency(&self, word: &str) -> Option<f64> {
        let row = self.posting_row(word)?;
        Some(self.idf_for(row.len()))
    }

    fn idf_for(&self, document_frequency: usize) -> f64 {
        (self.document_count() as f64 / document_frequency as f64).ln()
    }

    fn posting_row(&self, word: &str) -> Option<&BTreeMap<DocumentId, f64>> {
        let term = self.terms.get(word)?;
        self.postings.get(&term)
    }

    fn has_posting(&self, word: &str, id: DocumentId) -> bool {
        self.posting_row(word)
            .is_some_and(|row| row.contains_key(&id))
    }

    fn remove_posting(&mut self, term: TermId, id: DocumentId) {
        if let Some(row) = self.postings.get_mut(&term) {
            row.remove(&id);
            // Keeping an empty row would leave a phantom document
            // frequency of zero behind
            if row.is_empty() {
                self.postings.remove(&term);
            }
        }
    }
}

fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}

fn chunk_len(items: usize, workers: usize) -> usize {
    items.div_ceil(workers.max(1)).max(1)
}
