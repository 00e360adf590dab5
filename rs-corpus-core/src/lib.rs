//! Corpus-driven n-gram language model.
//!
//! This crate provides a word-level n-gram system including:
//! - Corpus loading and normalizing tokenization
//! - Unigram and adjacent-pair frequency tables
//! - Fixed-order n-gram models with frequency-weighted sampling
//! - Sentence generation (fixed length or terminator driven)
//! - Pointwise Mutual Information scoring of word pairs
//!
//! Everything is built once and immutable afterwards, so a `Corpus` and an
//! `NGramModel` can be shared read-only between any number of callers.
//! Random sources are always passed in by the caller.

/// Corpus loading, tokenization, frequency tables and association scores.
pub mod corpus;

/// N-gram models and sentence generation.
pub mod model;

/// Error taxonomy shared by the whole crate.
pub mod error;

/// I/O utilities (file loading, decoding).
///
/// Not exposed
pub(crate) mod io;

pub use corpus::Corpus;
pub use corpus::association::{Association, DEFAULT_MIN_FREQUENCY};
pub use corpus::tokenizer::{TokenizerConfig, TokenizerPreset};
pub use error::{CorpusError, Result};
pub use io::Encoding;
pub use model::generator::{GeneratorConfig, SentenceGenerator};
pub use model::ngram_model::NGramModel;
pub use model::quotify::quotify;

/// Loads and tokenizes the corpus file at `path`.
///
/// `encoding` accepts `utf-8` or `latin-1`.
///
/// # Errors
/// - `UnsupportedEncoding` for any other encoding name
/// - `FileNotFound`, `Io` or `Decode` if the file cannot be read
pub fn load_corpus<P: AsRef<std::path::Path>>(path: P, encoding: &str, config: TokenizerConfig) -> Result<Corpus> {
	Corpus::load(path, encoding.parse()?, config)
}

/// Builds an n-gram model of order `order` from the corpus token sequence.
///
/// # Errors
/// See [`NGramModel::new`].
pub fn build_model(corpus: &Corpus, order: usize) -> Result<NGramModel> {
	NGramModel::new(corpus.tokens(), order)
}

/// Generates exactly `word_count` space-joined tokens.
///
/// Convenience wrapper over [`SentenceGenerator::fixed_length`] with the
/// default generator configuration and the thread-local random source.
pub fn generate_fixed_length(model: &NGramModel, word_count: usize, seed: Option<&str>) -> Result<String> {
	SentenceGenerator::new(model).fixed_length(word_count, seed, &mut rand::rng())
}

/// Generates until a terminator is sampled past `min_words` tokens.
///
/// `None` defaults the minimum to the model order.
pub fn generate_until_terminator(model: &NGramModel, min_words: Option<usize>, seed: Option<&str>) -> Result<String> {
	SentenceGenerator::new(model).until_terminator(min_words, seed, &mut rand::rng())
}

/// PMI of `first` directly followed by `second` in `corpus`.
///
/// # Errors
/// Returns `KeyMissing` if the pair was never observed.
pub fn pmi(corpus: &Corpus, first: &str, second: &str) -> Result<f64> {
	corpus.pmi(first, second)
}

/// Scores of every pair whose unigrams reach `min_frequency`, best first.
pub fn ranked_associations(corpus: &Corpus, min_frequency: usize) -> Vec<Association> {
	corpus.ranked_associations(min_frequency)
}
