//! Word/count pairs, frequency statistics, and rank-ordered word lists.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;

use crate::Error;

/// A word and how many times it occurred. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    word: String,
    count: usize,
}

impl WordCount {
    pub fn new(word: impl Into<String>, count: usize) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Summary of a word/count collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreqStats {
    pub unique: usize,
    pub sum: usize,
    pub min: usize,
    pub max: usize,
    pub average: usize,
    pub median: usize,
    pub stddev: usize,
    /// Formatted "prefix count word" lines for the top entries.
    pub freqs: Vec<String>,
}

pub struct Statistics;

impl Statistics {
    /// Sorts `word_counts` descending by count and summarizes it.
    ///
    /// `freq_list_length` caps how many formatted frequency lines are
    /// produced, each prefixed with `freq_list_prefix`.
    pub fn calculate(
        word_counts: &mut [WordCount],
        freq_list_prefix: &str,
        freq_list_length: usize,
    ) -> FreqStats {
        if word_counts.is_empty() {
            return FreqStats::default();
        }

        word_counts.sort_by(|a, b| b.count.cmp(&a.count));

        let mut min = word_counts[0].count;
        let mut max = min;
        let mut sum = 0usize;
        for word_count in word_counts.iter() {
            min = min.min(word_count.count);
            max = max.max(word_count.count);
            sum += word_count.count;
        }

        let average = sum / word_counts.len();

        let stddev = if word_counts.len() > 1 {
            let deviation_sum: f64 = word_counts
                .iter()
                .map(|wc| (wc.count as f64 - average as f64).powi(2))
                .sum();
            (deviation_sum / word_counts.len() as f64).sqrt() as usize
        } else {
            0
        };

        let median = word_counts[word_counts.len() / 2].count;

        let freqs = word_counts
            .iter()
            .take(freq_list_length)
            .map(|wc| format!("{freq_list_prefix}{} {}", wc.count, wc.word))
            .collect();

        FreqStats {
            unique: word_counts.len(),
            sum,
            min,
            max,
            average,
            median,
            stddev,
            freqs,
        }
    }
}

/// Words loaded from reference list files, queryable by order of appearance.
///
/// Order numbers start at 1, so [`WordList::order`] returns zero for words
/// that are absent.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    count: usize,
    order: HashMap<String, usize>,
}

impl WordList {
    /// Loads one or more whitespace-separated word list files. Words are
    /// lowercased and stripped of commas and surrounding punctuation; the
    /// rank of a word is its position within its file.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, Error> {
        let mut list = Self::default();

        for path in paths {
            let path = path.as_ref();
            if path.as_os_str().is_empty() {
                continue;
            }

            let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

            let mut order_num = 0usize;
            for token in contents.split_whitespace() {
                let word = normalize_list_word(token);
                if !word.is_empty() {
                    order_num += 1;
                    list.order.insert(word, order_num);
                    list.count += 1;
                }
            }
            debug!("loaded {order_num} words from {}", path.display());
        }

        Ok(list)
    }

    /// Builds a list directly from words in rank order.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::default();
        for word in words {
            list.count += 1;
            list.order.insert(word.into(), list.count);
        }
        list
    }

    /// Rank of `word` in the reference ordering, or zero if absent.
    pub fn order(&self, word: &str) -> usize {
        if self.count == 0 {
            0
        } else {
            self.order.get(word).copied().unwrap_or(0)
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.order(word) != 0
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

fn normalize_list_word(token: &str) -> String {
    token
        .to_lowercase()
        .replace(',', "")
        .trim_matches(|c: char| c.is_whitespace())
        .to_string()
}
