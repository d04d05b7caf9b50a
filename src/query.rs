//! Free-text query parsing
//!
//! A query is a space-separated list of words. A `-` prefix marks an
//! exclusion word; stop words are dropped whichever side they fall on.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::error::{Result, SearchError};
use crate::tokenizer::{is_valid_word, split_words};

/// Parsed query: disjoint sets of required and excluding words
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pub plus_words: BTreeSet<String>,
    pub minus_words: BTreeSet<String>,
}

impl Query {
    pub fn is_empty(&self) -> bool {
        self.plus_words.is_empty() && self.minus_words.is_empty()
    }
}

impl fmt::Display for Query {
    /// Renders `"plus… -minus…"`; the output re-parses to an equal query
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for word in &self.plus_words {
            write!(f, "{}{}", sep, word)?;
            sep = " ";
        }
        for word in &self.minus_words {
            write!(f, "{}-{}", sep, word)?;
            sep = " ";
        }
        Ok(())
    }
}

/// One classified query token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct QueryWord<'a> {
    body: &'a str,
    is_minus: bool,
    is_stop: bool,
}

/// Splits raw query text into plus and minus word sets
#[derive(Clone, Debug, Default)]
pub struct QueryParser {
    stop_words: HashSet<String>,
}

impl QueryParser {
    /// Build a parser from a collection of stop words.
    ///
    /// Empty entries are skipped; a stop word containing a control byte
    /// fails with `InvalidArgument`.
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HashSet::new();
        for word in stop_words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::InvalidArgument(format!(
                    "stop word {:?} contains a control character",
                    word
                )));
            }
            set.insert(word.to_string());
        }
        Ok(Self { stop_words: set })
    }

    /// Build a parser from a whitespace-separated stop-word string
    pub fn from_text(stop_words_text: &str) -> Result<Self> {
        Self::new(split_words(stop_words_text))
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Parse raw query text.
    ///
    /// Tokens are the `' '`-separated pieces of the input, so an empty
    /// query or doubled spaces produce an empty token, which is an
    /// error like any other malformed token.
    pub fn parse(&self, text: &str) -> Result<Query> {
        let mut query = Query::default();
        for token in text.split(' ') {
            let word = self.parse_query_word(token)?;
            if word.is_stop {
                continue;
            }
            if word.is_minus {
                query.minus_words.insert(word.body.to_string());
            } else {
                query.plus_words.insert(word.body.to_string());
            }
        }
        Ok(query)
    }

    fn parse_query_word<'a>(&self, token: &'a str) -> Result<QueryWord<'a>> {
        if token.is_empty() {
            return Err(SearchError::InvalidArgument(
                "query word is empty".to_string(),
            ));
        }
        let (body, is_minus) = match token.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (token, false),
        };
        if body.is_empty() || body.starts_with('-') || !is_valid_word(body) {
            return Err(SearchError::InvalidArgument(format!(
                "query word {:?} is invalid",
                token
            )));
        }
        Ok(QueryWord {
            body,
            is_minus,
            is_stop: self.is_stop_word(body),
        })
    }
}
