//! BM25 scoring for the lexical pre-filter.
//!
//! # Algorithm
//!
//! ```ascii
//! score = Σ IDF(q) × f(q,D)×(k1+1) / (f(q,D) + k1×(1-b+b×|D|/avgdl))
//!
//! IDF(q) = ln((N - n(q) + 0.5) / (n(q) + 0.5) + 1)
//! ```
//!
//! The `+1` inside ln() keeps IDF non-negative, so every score is `>= 0`
//! and the default Stage 1 threshold of `0.0` keeps the whole pool.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;

/// Configuration for the BM25 tokenizer.
///
/// ```ascii
/// ┌────────────────────────────────────────────────────┐
/// │              TokenizerConfig                        │
/// ├────────────────────────────────────────────────────┤
/// │ fold_accents: bool      ──► NFKD + strip marks     │
/// │ split_alphanumeric      ──► split on punctuation   │
/// │ enable_stop_words: bool ──► Filter common words    │
/// │ enable_stemming: bool   ──► Porter2 stemming       │
/// └────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Fold accented characters to their base form.
    pub fold_accents: bool,
    /// Split on any non-alphanumeric character instead of whitespace only.
    pub split_alphanumeric: bool,
    /// Enable stop word filtering.
    pub enable_stop_words: bool,
    /// Enable stemming.
    pub enable_stemming: bool,
    /// Stemmer algorithm to use.
    pub stemmer_algorithm: Algorithm,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self::whitespace()
    }
}

impl TokenizerConfig {
    /// Lower-case and split on whitespace. No other processing.
    pub fn whitespace() -> Self {
        Self {
            fold_accents: false,
            split_alphanumeric: false,
            enable_stop_words: false,
            enable_stemming: false,
            stemmer_algorithm: Algorithm::English,
        }
    }

    /// Accent folding, punctuation splitting, stop words and stemming.
    pub fn enhanced() -> Self {
        Self {
            fold_accents: true,
            split_alphanumeric: true,
            enable_stop_words: true,
            enable_stemming: true,
            stemmer_algorithm: Algorithm::English,
        }
    }
}

/// Common English stop words. Sorted for binary search.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "all", "also", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can", "could",
    "did", "do", "does", "for", "from", "had", "has", "have", "he", "if", "in", "is", "it", "its",
    "just", "may", "might", "must", "no", "not", "of", "on", "or", "our", "out", "should", "so",
    "than", "that", "the", "their", "then", "there", "they", "this", "to", "too", "up", "very",
    "was", "we", "were", "what", "when", "where", "which", "who", "will", "with", "would", "you",
    "your",
];

/// BM25 scorer over an in-memory corpus.
///
/// # Example
///
/// ```
/// use cascade_rank::lexical::Bm25Scorer;
///
/// let scorer = Bm25Scorer::new();
/// let docs = vec!["rust async runtime".to_string(), "python asyncio".to_string()];
/// let scores = scorer.score("rust", &docs);
/// assert!(scores[0] > scores[1]);
/// ```
#[derive(Debug, Clone)]
pub struct Bm25Scorer {
    /// Term frequency saturation parameter (k1).
    pub k1: f64,
    /// Length normalization parameter (b).
    pub b: f64,
    /// Tokenizer configuration.
    pub tokenizer_config: TokenizerConfig,
}

impl Default for Bm25Scorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Bm25Scorer {
    /// Create with default parameters (k1=1.5, b=0.75, whitespace tokens).
    pub fn new() -> Self {
        Self {
            k1: 1.5,
            b: 0.75,
            tokenizer_config: TokenizerConfig::whitespace(),
        }
    }

    /// Create with custom k1 and b parameters.
    pub fn with_params(k1: f64, b: f64) -> Self {
        Self {
            k1: k1.clamp(0.0, 3.0),
            b: b.clamp(0.0, 1.0),
            tokenizer_config: TokenizerConfig::whitespace(),
        }
    }

    /// Set custom tokenizer configuration.
    pub fn with_tokenizer_config(mut self, config: TokenizerConfig) -> Self {
        self.tokenizer_config = config;
        self
    }

    fn is_stop_word(word: &str) -> bool {
        ENGLISH_STOP_WORDS.binary_search(&word).is_ok()
    }

    /// Tokenize with the configured settings.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let normalized: String = if self.tokenizer_config.fold_accents {
            lowered
                .nfkd()
                .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
                .collect()
        } else {
            lowered
        };

        let tokens: Vec<String> = if self.tokenizer_config.split_alphanumeric {
            normalized
                .split(|c: char| !c.is_alphanumeric())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            normalized.split_whitespace().map(str::to_string).collect()
        };

        let filtered: Vec<String> = if self.tokenizer_config.enable_stop_words {
            tokens
                .into_iter()
                .filter(|t| !Self::is_stop_word(t))
                .collect()
        } else {
            tokens
        };

        if self.tokenizer_config.enable_stemming {
            let stemmer = Stemmer::create(self.tokenizer_config.stemmer_algorithm);
            filtered
                .into_iter()
                .map(|t| stemmer.stem(&t).to_string())
                .collect()
        } else {
            filtered
        }
    }

    /// Compute IDF from pre-computed document frequency.
    #[inline]
    pub(crate) fn compute_idf_from_df(n: f64, df: f64) -> f64 {
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    fn compute_document_frequencies(doc_terms_list: &[Vec<String>]) -> HashMap<&str, usize> {
        let mut df_map: HashMap<&str, usize> = HashMap::new();
        for doc_terms in doc_terms_list {
            let unique_terms: HashSet<&str> = doc_terms.iter().map(String::as_str).collect();
            for term in unique_terms {
                *df_map.entry(term).or_insert(0) += 1;
            }
        }
        df_map
    }

    fn compute_bm25_score(
        &self,
        query_terms: &[String],
        doc_terms: &[String],
        avgdl: f64,
        idf_cache: &HashMap<&str, f64>,
    ) -> f64 {
        let doc_len = doc_terms.len() as f64;
        let length_norm = 1.0 - self.b + self.b * (doc_len / avgdl);

        let mut score = 0.0;
        for term in query_terms {
            let tf = doc_terms.iter().filter(|t| *t == term).count() as f64;
            if tf > 0.0 {
                let idf = idf_cache.get(term.as_str()).copied().unwrap_or(0.0);
                score += idf * (tf * (self.k1 + 1.0)) / (tf + self.k1 * length_norm);
            }
        }
        score
    }

    /// Score every document against the query.
    ///
    /// Returns one score per document, aligned with the input. An empty
    /// query (or one that tokenizes to nothing) scores every document `0.0`.
    pub fn score(&self, query: &str, documents: &[String]) -> Vec<f64> {
        if documents.is_empty() {
            return Vec::new();
        }

        let query_terms = self.tokenize(query);
        if query_terms.is_empty() {
            return vec![0.0; documents.len()];
        }

        let doc_terms_list: Vec<Vec<String>> =
            documents.iter().map(|d| self.tokenize(d)).collect();

        let avgdl = doc_terms_list.iter().map(Vec::len).sum::<usize>() as f64
            / doc_terms_list.len().max(1) as f64;
        let avgdl = avgdl.max(1.0);

        let df_map = Self::compute_document_frequencies(&doc_terms_list);
        let n = doc_terms_list.len() as f64;

        let idf_cache: HashMap<&str, f64> = query_terms
            .iter()
            .map(|term| {
                let df = df_map.get(term.as_str()).copied().unwrap_or(0) as f64;
                (term.as_str(), Self::compute_idf_from_df(n, df))
            })
            .collect();

        doc_terms_list
            .iter()
            .map(|doc_terms| self.compute_bm25_score(&query_terms, doc_terms, avgdl, &idf_cache))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_stop_words_sorted() {
        let mut sorted = ENGLISH_STOP_WORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, ENGLISH_STOP_WORDS);
    }

    #[test]
    fn test_whitespace_tokenizer() {
        let scorer = Bm25Scorer::new();
        assert_eq!(
            scorer.tokenize("Hello,  World\tRust"),
            vec!["hello,", "world", "rust"]
        );
    }

    #[test]
    fn test_enhanced_tokenizer() {
        let scorer = Bm25Scorer::new().with_tokenizer_config(TokenizerConfig::enhanced());
        let tokens = scorer.tokenize("The véhicules are running");
        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].starts_with("vehicul"));
        assert_eq!(tokens[1], "run");
    }

    #[test]
    fn test_basic_ranking() {
        let scorer = Bm25Scorer::new();
        let documents = docs(&[
            "the capital of france is paris",
            "tokyo is the capital of japan",
            "london is the capital of england",
        ]);
        let scores = scorer.score("capital of france", &documents);
        assert_eq!(scores.len(), 3);
        assert!(scores[0] > scores[1]);
        assert!(scores[0] > scores[2]);
    }

    #[test]
    fn test_idf_weighting() {
        let scorer = Bm25Scorer::new();
        let documents = docs(&[
            "the peugeot 2008 envy is a great car",
            "peugeot makes many cars",
            "peugeot 208 is also available",
        ]);
        let scores = scorer.score("peugeot envy", &documents);
        assert!(scores[0] > scores[1] * 1.5);
    }

    #[test]
    fn test_scores_non_negative() {
        let scorer = Bm25Scorer::new();
        let documents = docs(&["common word", "common word", "common word"]);
        let scores = scorer.score("common", &documents);
        assert!(scores.iter().all(|s| *s >= 0.0));
    }

    #[test]
    fn test_empty_documents() {
        let scorer = Bm25Scorer::new();
        assert!(scorer.score("test", &[]).is_empty());
    }

    #[test]
    fn test_empty_query() {
        let scorer = Bm25Scorer::new();
        let scores = scorer.score("   ", &docs(&["some document"]));
        assert_eq!(scores, vec![0.0]);
    }

    #[test]
    fn test_all_stop_word_query_is_uniform() {
        let scorer = Bm25Scorer::new().with_tokenizer_config(TokenizerConfig::enhanced());
        let scores = scorer.score("the of and", &docs(&["alpha", "beta"]));
        assert_eq!(scores, vec![0.0, 0.0]);
    }

    #[test]
    fn test_idf_formula() {
        let idf = Bm25Scorer::compute_idf_from_df(10.0, 1.0);
        let expected = ((10.0 - 1.0 + 0.5) / (1.0 + 0.5) + 1.0_f64).ln();
        assert!((idf - expected).abs() < 1e-12);
        assert!(Bm25Scorer::compute_idf_from_df(3.0, 3.0) > 0.0);
    }

    #[test]
    fn test_with_params_clamps() {
        let scorer = Bm25Scorer::with_params(10.0, -1.0);
        assert_eq!(scorer.k1, 3.0);
        assert_eq!(scorer.b, 0.0);
    }
}
