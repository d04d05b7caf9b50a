//! Whitespace tokenizer
//!
//! Input is treated as opaque bytes: ASCII space is the only separator
//! and no case folding, stemming or Unicode normalization is applied.

use std::collections::BTreeSet;

/// Split text into maximal non-empty runs of non-space bytes
pub fn split_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|word| !word.is_empty()).collect()
}

/// Same as [`split_words`] with duplicates collapsed into a set
pub fn split_words_unique(text: &str) -> BTreeSet<&str> {
    text.split(' ').filter(|word| !word.is_empty()).collect()
}

/// A word is valid iff it contains no byte in `[0x00, 0x20)`
pub fn is_valid_word(word: &str) -> bool {
    !word.bytes().any(|b| b < 0x20)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_single_spaces() {
        assert_eq!(split_words("cat and dog"), vec!["cat", "and", "dog"]);
    }

    #[test]
    fn test_split_skips_empty_runs() {
        assert_eq!(split_words("  cat   dog "), vec!["cat", "dog"]);
        assert!(split_words("").is_empty());
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn test_only_space_is_a_separator() {
        // Tabs and newlines are ordinary (invalid) bytes, not separators
        assert_eq!(split_words("cat\tdog"), vec!["cat\tdog"]);
        assert_eq!(split_words("cat\ndog"), vec!["cat\ndog"]);
    }

    #[test]
    fn test_unique_split_collapses_duplicates() {
        let words = split_words_unique("fluffy cat fluffy tail");
        assert_eq!(words.len(), 3);
        assert!(words.contains("fluffy"));
        assert!(words.contains("cat"));
        assert!(words.contains("tail"));
    }

    #[test]
    fn test_word_validity() {
        assert!(is_valid_word("cat"));
        assert!(is_valid_word("white-cat"));
        assert!(is_valid_word("кот"));
        assert!(!is_valid_word("ca\tt"));
        assert!(!is_valid_word("ca\nt"));
        assert!(!is_valid_word("\u{1}cat"));
    }
}
