//! Parallel batch query driver
//!
//! Runs many queries against one index on the rayon pool. The shared
//! borrow of the index keeps writers out for the whole batch.

use rayon::prelude::*;
use tracing::debug;

use crate::index::SearchIndex;
use crate::models::Document;

/// Evaluate each query in parallel; output order matches input order.
///
/// A query that fails to parse contributes an empty slot so the output
/// stays positionally aligned with the input.
pub fn process_queries<Q>(index: &SearchIndex, queries: &[Q]) -> Vec<Vec<Document>>
where
    Q: AsRef<str> + Sync,
{
    queries
        .par_iter()
        .map(|query| {
            let query = query.as_ref();
            match index.find_top_documents(query) {
                Ok(documents) => documents,
                Err(error) => {
                    debug!(%error, query, "query skipped");
                    Vec::new()
                }
            }
        })
        .collect()
}

/// Same as [`process_queries`], flattened in input order
pub fn process_queries_joined<Q>(index: &SearchIndex, queries: &[Q]) -> Vec<Document>
where
    Q: AsRef<str> + Sync,
{
    process_queries(index, queries).into_iter().flatten().collect()
}
