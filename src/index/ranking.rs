//! Query ranking
//!
//! Both evaluation paths accumulate `tf * idf` per document over the
//! query's plus words, drop every document posted under a minus word,
//! and keep the best `max_results` hits. The parallel path fans the
//! plus and minus sets out over worker threads that meet at a shared
//! sharded map; each phase is joined before the next starts.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};
use std::thread;

use ordered_float::OrderedFloat;
use tracing::trace;

use super::SearchIndex;
use crate::concurrent_map::ConcurrentMap;
use crate::error::Result;
use crate::models::{Document, DocumentId, DocumentStatus, RELEVANCE_EPS};
use crate::query::Query;

/// How a query is evaluated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    /// Fan plus and minus words out over the configured worker counts
    Parallel,
}

/// Heap ordering for ranked results: ascending by relevance, ratings
/// breaking ties closer than [`RELEVANCE_EPS`]
#[derive(Clone, Copy, Debug)]
struct RankedEntry(Document);

impl PartialEq for RankedEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankedEntry {}

impl PartialOrd for RankedEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        if (self.0.relevance - other.0.relevance).abs() < RELEVANCE_EPS {
            self.0.rating.cmp(&other.0.rating)
        } else {
            OrderedFloat(self.0.relevance).cmp(&OrderedFloat(other.0.relevance))
        }
    }
}

impl SearchIndex {
    /// Top matches among documents with `Actual` status
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with_mode(raw_query, ExecutionMode::Sequential)
    }

    /// Top matches among documents with `Actual` status, explicit mode
    pub fn find_top_documents_with_mode(
        &self,
        raw_query: &str,
        mode: ExecutionMode,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by_with_mode(
            raw_query,
            |_, status, _| status == DocumentStatus::Actual,
            mode,
        )
    }

    /// Top matches among documents carrying the given status
    pub fn find_top_documents_with_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_with_status_and_mode(raw_query, status, ExecutionMode::Sequential)
    }

    /// Top matches among documents carrying the given status, explicit mode
    pub fn find_top_documents_with_status_and_mode(
        &self,
        raw_query: &str,
        status: DocumentStatus,
        mode: ExecutionMode,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by_with_mode(
            raw_query,
            move |_, document_status, _| document_status == status,
            mode,
        )
    }

    /// Top matches among documents satisfying an arbitrary predicate
    /// over `(id, status, rating)`
    pub fn find_top_documents_by<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_by_with_mode(raw_query, predicate, ExecutionMode::Sequential)
    }

    /// Predicate-filtered top matches with an explicit evaluation mode
    pub fn find_top_documents_by_with_mode<P>(
        &self,
        raw_query: &str,
        predicate: P,
        mode: ExecutionMode,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = self.parser.parse(raw_query)?;
        trace!(
            plus_words = query.plus_words.len(),
            minus_words = query.minus_words.len(),
            ?mode,
            "evaluating query"
        );
        let relevance = match mode {
            ExecutionMode::Sequential => self.accumulate_relevance(&query, &predicate),
            ExecutionMode::Parallel => self.accumulate_relevance_parallel(&query, &predicate),
        };
        Ok(self.select_top(relevance))
    }

    fn accumulate_relevance<P>(&self, query: &Query, predicate: &P) -> BTreeMap<DocumentId, f64>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let mut relevance = BTreeMap::new();
        for word in &query.plus_words {
            let Some(row) = self.posting_row(word) else {
                continue;
            };
            let idf = self.idf_for(row.len());
            for (&id, &tf) in row {
                let Some(record) = self.documents.get(&id) else {
                    continue;
                };
                if predicate(id, record.status, record.rating) {
                    *relevance.entry(id).or_insert(0.0) += tf * idf;
                }
            }
        }
        for word in &query.minus_words {
            let Some(row) = self.posting_row(word) else {
                continue;
            };
            for id in row.keys() {
                relevance.remove(id);
            }
        }
        relevance
    }

    fn accumulate_relevance_parallel<P>(
        &self,
        query: &Query,
        predicate: &P,
    ) -> BTreeMap<DocumentId, f64>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let map: ConcurrentMap<f64> = ConcurrentMap::new(self.config.shard_count);

        let plus: Vec<&String> = query.plus_words.iter().collect();
        thread::scope(|scope| {
            for words in partition(&plus, self.config.plus_workers) {
                let map = &map;
                scope.spawn(move || {
                    for word in words {
                        let Some(row) = self.posting_row(word) else {
                            continue;
                        };
                        let idf = self.idf_for(row.len());
                        for (&id, &tf) in row {
                            let Some(record) = self.documents.get(&id) else {
                                continue;
                            };
                            if predicate(id, record.status, record.rating) {
                                *map.at(id).value() += tf * idf;
                            }
                        }
                    }
                });
            }
        });

        // The scope above joined every plus worker; the erasures below
        // cannot race the accumulation.
        let minus: Vec<&String> = query.minus_words.iter().collect();
        thread::scope(|scope| {
            for words in partition(&minus, self.config.minus_workers) {
                let map = &map;
                scope.spawn(move || {
                    for word in words {
                        let Some(row) = self.posting_row(word) else {
                            continue;
                        };
                        for &id in row.keys() {
                            map.erase(id);
                        }
                    }
                });
            }
        });

        map.build_ordinary_map()
    }

    /// Keep the best `max_results` entries with a bounded min-heap
    fn select_top(&self, relevance: BTreeMap<DocumentId, f64>) -> Vec<Document> {
        let mut heap = BinaryHeap::with_capacity(self.config.max_results + 1);
        for (id, relevance) in relevance {
            let Some(record) = self.documents.get(&id) else {
                continue;
            };
            heap.push(Reverse(RankedEntry(Document::new(
                id,
                relevance,
                record.rating,
            ))));
            if heap.len() > self.config.max_results {
                heap.pop();
            }
        }
        heap.into_sorted_vec()
            .into_iter()
            .map(|Reverse(entry)| entry.0)
            .collect()
    }
}

/// Split `items` into at most `workers` contiguous ranges
fn partition<T>(items: &[T], workers: usize) -> impl Iterator<Item = &[T]> {
    let chunk_len = items.len().div_ceil(workers.max(1)).max(1);
    items.chunks(chunk_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> SearchIndex {
        let mut index = SearchIndex::from_text("and in on").unwrap();
        index
            .add_document(1, "white cat and fancy collar", DocumentStatus::Actual, &[8, -3])
            .unwrap();
        index
            .add_document(2, "fluffy cat fluffy tail", DocumentStatus::Actual, &[7, 2, 7])
            .unwrap();
        index
            .add_document(3, "groomed dog expressive eyes", DocumentStatus::Banned, &[5, -12, 2, 1])
            .unwrap();
        index
    }

    #[test]
    fn test_ranking_order_and_scores() {
        let index = populated();
        let results = index.find_top_documents("fluffy groomed cat").unwrap();

        // Document 3 is banned; 2 outranks 1 on relevance.
        // idf(fluffy) = ln(3/1), idf(cat) = ln(3/2) with three documents.
        let tf = 1.0 / 3.0;
        let expected_2 = tf * 3.0f64.ln() + tf * (3.0f64 / 2.0).ln();
        let expected_1 = 0.25 * (3.0f64 / 2.0).ln();
        assert_eq!(
            results,
            vec![
                Document::new(2, expected_2, 5),
                Document::new(1, expected_1, 2),
            ]
        );
    }

    #[test]
    fn test_minus_words_exclude() {
        let index = populated();
        let results = index.find_top_documents("fluffy white -cat").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_status_filter() {
        let index = populated();
        let banned = index
            .find_top_documents_with_status("groomed cat", DocumentStatus::Banned)
            .unwrap();
        assert_eq!(banned.len(), 1);
        assert_eq!(banned[0].id, 3);

        let actual = index.find_top_documents("groomed cat").unwrap();
        assert!(actual.iter().all(|doc| doc.id != 3));
    }

    #[test]
    fn test_predicate_filter() {
        let index = populated();
        let even = index
            .find_top_documents_by("fluffy white cat", |id, _, _| id % 2 == 0)
            .unwrap();
        assert_eq!(even.len(), 1);
        assert_eq!(even[0].id, 2);
    }

    #[test]
    fn test_truncates_to_max_results() {
        let mut index = SearchIndex::from_text("").unwrap();
        for id in 0..20 {
            index
                .add_document(id, "shared word", DocumentStatus::Actual, &[id])
                .unwrap();
        }
        let results = index.find_top_documents("shared").unwrap();
        assert_eq!(results.len(), 5);
        // Equal relevance everywhere: ratings decide, descending
        let ratings: Vec<i32> = results.iter().map(|doc| doc.rating).collect();
        assert_eq!(ratings, vec![19, 18, 17, 16, 15]);
    }

    #[test]
    fn test_rating_breaks_relevance_ties() {
        let mut index = SearchIndex::from_text("").unwrap();
        index
            .add_document(1, "cat dog", DocumentStatus::Actual, &[1])
            .unwrap();
        index
            .add_document(2, "cat bird", DocumentStatus::Actual, &[9])
            .unwrap();
        let results = index.find_top_documents("cat").unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 2);
        assert_eq!(results[1].id, 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let index = populated();
        for query in ["fluffy groomed cat", "white -tail", "dog -nothing", "cat"] {
            let sequential = index.find_top_documents(query).unwrap();
            let parallel = index
                .find_top_documents_with_mode(query, ExecutionMode::Parallel)
                .unwrap();
            assert_eq!(sequential, parallel, "query {:?}", query);
        }
    }

    #[test]
    fn test_unknown_words_are_ignored() {
        let index = populated();
        let results = index.find_top_documents("crocodile -unicorn").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_partition_covers_all_items() {
        let items: Vec<i32> = (0..10).collect();
        let chunks: Vec<&[i32]> = partition(&items, 4).collect();
        assert!(chunks.len() <= 4);
        let flattened: Vec<i32> = chunks.into_iter().flatten().copied().collect();
        assert_eq!(flattened, items);

        assert_eq!(partition(&items, 0).count(), 1);
        let empty: Vec<i32> = Vec::new();
        assert_eq!(partition(&empty, 4).count(), 0);
    }
}
