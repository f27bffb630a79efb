//! Near-duplicate detection with MinHash signatures.
//!
//! # Algorithm
//!
//! ```ascii
//! content ──► lower-case words ──► 3-word shingles ──► 64-bit hash per shingle
//!                                                            │
//!                        128 × ((a_i · h + b_i) mod (2^61 − 1))
//!                                                            │
//!                                                            ▼
//!                                    signature[i] = min over shingles
//!
//! Jaccard(A, B) ≈ |{ i : sig_A[i] == sig_B[i] }| / 128
//! novelty       = 1 − max Jaccard against earlier candidates
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Number of hash functions per signature.
pub const NUM_PERMUTATIONS: usize = 128;

/// Words per shingle.
pub const SHINGLE_SIZE: usize = 3;

/// Score when content is missing.
pub const MISSING_CONTENT_NOVELTY: f64 = 0.5;

const MERSENNE_PRIME: u64 = (1 << 61) - 1;
const DEFAULT_SEED: u64 = 0x5EED_CA5C_ADE0_0001;

/// A MinHash signature.
pub type Signature = [u64; NUM_PERMUTATIONS];

/// Fixed family of 128 universal hash permutations.
#[derive(Debug, Clone)]
pub struct MinHasher {
    permutations: Vec<(u64, u64)>,
}

impl Default for MinHasher {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl MinHasher {
    /// Create a hasher with the default seed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hasher whose permutations derive from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        let mut state = seed;
        let permutations = (0..NUM_PERMUTATIONS)
            .map(|_| {
                let a = splitmix64(&mut state) % (MERSENNE_PRIME - 1) + 1;
                let b = splitmix64(&mut state) % MERSENNE_PRIME;
                (a, b)
            })
            .collect();
        Self { permutations }
    }

    /// Signature of `text`, or `None` when it has no words.
    pub fn signature(&self, text: &str) -> Option<Signature> {
        let shingles = shingle_hashes(text);
        if shingles.is_empty() {
            return None;
        }

        let mut signature = [u64::MAX; NUM_PERMUTATIONS];
        for hash in shingles {
            let h = hash % MERSENNE_PRIME;
            for (slot, &(a, b)) in signature.iter_mut().zip(&self.permutations) {
                let permuted = ((a as u128 * h as u128 + b as u128) % MERSENNE_PRIME as u128) as u64;
                if permuted < *slot {
                    *slot = permuted;
                }
            }
        }
        Some(signature)
    }
}

/// Estimated Jaccard similarity of two signatures.
pub fn similarity(a: &Signature, b: &Signature) -> f64 {
    let matching = a.iter().zip(b.iter()).filter(|(x, y)| x == y).count();
    matching as f64 / NUM_PERMUTATIONS as f64
}

/// Hash every overlapping 3-word span. Texts shorter than three words form
/// a single shingle.
fn shingle_hashes(text: &str) -> Vec<u64> {
    let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    if words.is_empty() {
        return Vec::new();
    }
    if words.len() < SHINGLE_SIZE {
        return vec![hash_words(&words)];
    }
    words.windows(SHINGLE_SIZE).map(hash_words).collect()
}

fn hash_words(words: &[String]) -> u64 {
    let mut hasher = DefaultHasher::new();
    words.hash(&mut hasher);
    hasher.finish()
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Running novelty over one linear pass.
#[derive(Debug, Clone, Default)]
pub struct NoveltyTracker {
    hasher: MinHasher,
    seen: Vec<Signature>,
}

impl NoveltyTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Novelty of `content` against everything observed so far, then remember it.
    ///
    /// Missing content scores [`MISSING_CONTENT_NOVELTY`] and is not remembered.
    pub fn observe(&mut self, content: &str) -> f64 {
        let Some(signature) = self.hasher.signature(content) else {
            return MISSING_CONTENT_NOVELTY;
        };

        let max_similarity = self
            .seen
            .iter()
            .map(|prev| similarity(prev, &signature))
            .fold(0.0_f64, f64::max);

        self.seen.push(signature);
        (1.0 - max_similarity).clamp(0.0, 1.0)
    }

    /// Number of remembered signatures.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True when nothing has been remembered yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
