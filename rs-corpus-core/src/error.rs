use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Every failure the corpus and model layers can report.
///
/// Two classes exist:
/// - input and configuration errors, fatal to the call that raised them
/// - lookups against data never observed in training (`UnknownContext`,
///   `KeyMissing`), which callers usually turn into a friendly message
#[derive(Error, Debug)]
pub enum CorpusError {
	#[error("corpus file not found: {}", path.display())]
	FileNotFound { path: PathBuf },

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("could not decode {} as {encoding}", path.display())]
	Decode { path: PathBuf, encoding: String },

	#[error("unsupported encoding: {0}")]
	UnsupportedEncoding(String),

	#[error("n-gram order must be >= 2, got {0}")]
	InvalidOrder(usize),

	#[error("corpus of {tokens} tokens is too short for an order {order} model")]
	CorpusTooShort { tokens: usize, order: usize },

	#[error("unknown context: {}", context.join(" "))]
	UnknownContext { context: Vec<String> },

	#[error("word pair never observed: ({first}, {second})")]
	KeyMissing { first: String, second: String },

	#[error("generation exceeded bound of {limit} tokens")]
	GenerationBoundExceeded { limit: usize },

	#[error("invalid tokenizer pattern: {0}")]
	InvalidPattern(#[from] regex::Error),

	#[error("unknown tokenizer preset: {0}")]
	UnknownPreset(String),
}

impl CorpusError {
	/// Returns `true` for lookups of data the corpus never contained.
	///
	/// These are expected during normal use and will succeed only once the
	/// corpus or the query changes.
	pub fn is_recoverable(&self) -> bool {
		matches!(self, CorpusError::UnknownContext { .. } | CorpusError::KeyMissing { .. })
	}
}
