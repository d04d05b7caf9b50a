//! Empty-result request bookkeeping
//!
//! Tracks how many of the most recent requests produced no results.
//! The window is driven by a virtual clock that advances one tick per
//! request; there is no wall-clock coupling.

use std::collections::VecDeque;

use crate::error::Result;
use crate::index::SearchIndex;
use crate::models::{Document, DocumentId, DocumentStatus};

/// Rolling window over the outcomes of the most recent requests
pub struct RequestTracker<'a> {
    index: &'a SearchIndex,
    window: VecDeque<bool>,
    window_size: usize,
    current_tick: u64,
    empty_count: usize,
}

impl<'a> RequestTracker<'a> {
    /// Track requests against `index`, window width taken from its config
    pub fn new(index: &'a SearchIndex) -> Self {
        Self {
            index,
            window: VecDeque::new(),
            window_size: index.config().window_size,
            current_tick: 0,
            empty_count: 0,
        }
    }

    /// Evaluate a query with the default (`Actual`) filter and record
    /// whether it came back empty.
    ///
    /// A query that fails to parse surfaces the error and consumes no
    /// tick; the window only accounts for evaluated requests.
    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        let result = self.index.find_top_documents(raw_query)?;
        self.record(result.is_empty());
        Ok(result)
    }

    /// Evaluate a status-filtered query and record the outcome
    pub fn add_find_request_with_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        let result = self.index.find_top_documents_with_status(raw_query, status)?;
        self.record(result.is_empty());
        Ok(result)
    }

    /// Evaluate a predicate-filtered query and record the outcome
    pub fn add_find_request_by<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let result = self.index.find_top_documents_by(raw_query, predicate)?;
        self.record(result.is_empty());
        Ok(result)
    }

    /// How many requests inside the window produced no results
    pub fn no_result_requests(&self) -> usize {
        self.empty_count
    }

    fn record(&mut self, is_empty: bool) {
        self.current_tick += 1;
        // Once the clock passes the window width, the head falls out
        // before the new outcome is enqueued
        if self.current_tick > self.window_size as u64 {
            if let Some(oldest) = self.window.pop_front() {
                if oldest {
                    self.empty_count -= 1;
                }
            }
        }
        self.window.push_back(is_empty);
        if is_empty {
            self.empty_count += 1;
        }
    }
}
