use std::collections::{BTreeMap, BTreeSet};

/// Occurrence count per configured keyword. Every completed scan result
/// carries an entry for every configured keyword, zero if absent.
pub type KeywordCounts = BTreeMap<String, u64>;

/// Per-corpus (or per-domain) breakdown produced by summary aggregation.
pub type SummaryCounts = BTreeMap<String, KeywordCounts>;

/// The immutable set of keywords a scan counts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordSet {
    words: BTreeSet<String>,
}

impl KeywordSet {
    /// Builds a keyword set, trimming entries and dropping empty ones.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// A count map holding every keyword at zero.
    pub fn seeded_counts(&self) -> KeywordCounts {
        self.words.iter().map(|w| (w.clone(), 0)).collect()
    }

    /// Counts keyword occurrences in a word stream. Words are stripped of
    /// punctuation before matching; non-keywords are ignored.
    pub fn count_words<'a, I>(&self, words: I) -> KeywordCounts
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts = self.seeded_counts();
        self.tally(&mut counts, words);
        counts
    }

    /// Adds keyword occurrences from a word stream into an existing count
    /// map. Only configured keywords are counted.
    pub fn tally<'a, I>(&self, counts: &mut KeywordCounts, words: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for word in words {
            let cleaned = strip_punctuation(word);
            if let Some(count) = counts.get_mut(cleaned.as_str()) {
                *count += 1;
            }
        }
    }

    /// Sums partial count maps into one map seeded with every keyword.
    /// Merge order does not affect the result.
    pub fn merge_counts<I>(&self, parts: I) -> KeywordCounts
    where
        I: IntoIterator<Item = KeywordCounts>,
    {
        let mut merged = self.seeded_counts();
        for part in parts {
            for (word, count) in part {
                *merged.entry(word).or_insert(0) += count;
            }
        }
        merged
    }
}

/// Removes ASCII punctuation from a word, leaving the rest intact.
pub fn strip_punctuation(word: &str) -> String {
    word.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}
