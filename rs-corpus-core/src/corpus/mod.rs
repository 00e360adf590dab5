//! Corpus side of the pipeline.
//!
//! - Normalizing tokenization (`tokenizer`)
//! - Unigram / adjacent-pair counting (`frequency`)
//! - Pointwise Mutual Information scoring (`association`)
//! - The `Corpus` value owning the token sequence and its tables

pub mod association;
pub mod frequency;
pub mod tokenizer;

use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;
use crate::io::{read_text, Encoding};
use association::{Association, AssociationScorer};
use frequency::FrequencyTables;
use tokenizer::{Tokenizer, TokenizerConfig};

/// A tokenized text corpus and the frequency tables derived from it.
///
/// Built once, never mutated afterwards.
///
/// # Invariants
/// - `tables` are derived from exactly `tokens`
/// - Token order is the left-to-right order of the source text
#[derive(Debug, Clone)]
pub struct Corpus {
	source: Option<PathBuf>,
	config: TokenizerConfig,
	tokens: Vec<String>,
	tables: FrequencyTables,
}

impl Corpus {
	/// Reads, decodes and tokenizes the file at `path`.
	///
	/// # Errors
	/// - `FileNotFound` / `Io` if the file cannot be read
	/// - `Decode` if its bytes are not valid for `encoding`
	pub fn load<P: AsRef<Path>>(path: P, encoding: Encoding, config: TokenizerConfig) -> Result<Self> {
		let path = path.as_ref();
		let raw = read_text(path, encoding)?;
		let mut corpus = Self::from_text(&raw, config)?;
		corpus.source = Some(path.to_path_buf());

		info!(
			"Loaded corpus {}: {} tokens, {} distinct, {} distinct pairs",
			path.display(),
			corpus.tokens.len(),
			corpus.tables.unigrams.len(),
			corpus.tables.bigrams.len()
		);
		Ok(corpus)
	}

	/// Builds a corpus from text already in memory.
	pub fn from_text(raw: &str, config: TokenizerConfig) -> Result<Self> {
		let tokenizer = Tokenizer::new(config)?;
		let tokens = tokenizer.tokenize(raw);
		let tables = FrequencyTables::build(&tokens);

		Ok(Self { source: None, config: tokenizer.config().clone(), tokens, tables })
	}

	/// File the corpus was loaded from, if any.
	pub fn source(&self) -> Option<&Path> {
		self.source.as_deref()
	}

	pub fn tokenizer_config(&self) -> &TokenizerConfig {
		&self.config
	}

	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	pub fn tables(&self) -> &FrequencyTables {
		&self.tables
	}

	pub fn scorer(&self) -> AssociationScorer<'_> {
		AssociationScorer::new(&self.tables)
	}

	/// PMI of `first` directly followed by `second`.
	///
	/// # Errors
	/// Returns `KeyMissing` if the pair never occurs adjacently.
	pub fn pmi(&self, first: &str, second: &str) -> Result<f64> {
		self.scorer().pmi(first, second)
	}

	/// Every pair whose unigrams both reach `min_frequency`, best score first.
	pub fn ranked_associations(&self, min_frequency: usize) -> Vec<Association> {
		self.scorer().ranked_associations(min_frequency)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn from_text_tokenizes_and_counts() {
		let corpus = Corpus::from_text("The cat sat on the mat. The cat ran.", TokenizerConfig::word_stream()).unwrap();

		assert_eq!(corpus.len(), 9);
		assert_eq!(corpus.tables().unigrams.get("the"), Some(3));
		assert_eq!(corpus.tables().bigrams.get("the", "cat"), Some(2));
		assert!(corpus.source().is_none());
	}

	#[test]
	fn sentences_config_keeps_terminators() {
		let corpus = Corpus::from_text("One. Two.", TokenizerConfig::sentences()).unwrap();
		assert_eq!(corpus.tokens(), ["one", ".", "two", "."]);
	}

	#[test]
	fn pmi_delegates_to_scorer() {
		let corpus = Corpus::from_text("a b a b", TokenizerConfig::word_stream()).unwrap();
		let expected = (2.0_f64 * 4.0 / (2.0 * 2.0)).ln();
		assert!((corpus.pmi("a", "b").unwrap() - expected).abs() < 1e-12);
		assert!(corpus.pmi("b", "b").is_err());
	}
}
