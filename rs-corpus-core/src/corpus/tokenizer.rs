use std::str::FromStr;

use regex::Regex;

use crate::error::{CorpusError, Result};

/// Normalization rules applied before a corpus is split into tokens.
///
/// Steps always run in this order:
/// 1. lower-case the whole text
/// 2. optionally collapse runs of newlines into a single space
/// 3. drop every character that is not a word character, whitespace,
///    or an allowed punctuation mark
/// 4. split into word tokens, dotted abbreviations (`u.s.`) and single
///    punctuation tokens
/// 5. optionally strip digits from every token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerConfig {
	/// Rewrites newline runs as spaces before filtering. Token output is the
	/// same either way since splitting already treats newlines as
	/// whitespace; the flag only changes the intermediate text.
	pub collapse_newlines: bool,
	pub keep_commas: bool,
	pub keep_periods: bool,
	pub strip_digits: bool,
}

impl Default for TokenizerConfig {
	fn default() -> Self {
		Self::word_stream()
	}
}

impl TokenizerConfig {
	/// Plain word stream, suited to fixed-length generation.
	///
	/// Newlines are collapsed, periods dropped, commas kept.
	pub fn word_stream() -> Self {
		Self { collapse_newlines: true, keep_commas: true, keep_periods: false, strip_digits: false }
	}

	/// Keeps periods as their own tokens and strips digits.
	///
	/// Needed by terminator-driven generation and by `quotify`.
	pub fn sentences() -> Self {
		Self { collapse_newlines: false, keep_commas: true, keep_periods: true, strip_digits: true }
	}
}

/// Named tokenizer configurations, parsed from front-end arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerPreset {
	WordStream,
	Sentences,
}

impl TokenizerPreset {
	pub fn config(self) -> TokenizerConfig {
		match self {
			TokenizerPreset::WordStream => TokenizerConfig::word_stream(),
			TokenizerPreset::Sentences => TokenizerConfig::sentences(),
		}
	}
}

impl FromStr for TokenizerPreset {
	type Err = CorpusError;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"word-stream" | "stream" => Ok(TokenizerPreset::WordStream),
			"sentences" => Ok(TokenizerPreset::Sentences),
			_ => Err(CorpusError::UnknownPreset(s.to_owned())),
		}
	}
}

/// Compiled tokenizer for one `TokenizerConfig`.
#[derive(Debug, Clone)]
pub struct Tokenizer {
	config: TokenizerConfig,
	newlines: Regex,
	excluded: Regex,
	tokens: Regex,
	digits: Regex,
}

impl Tokenizer {
	/// Compiles the patterns for `config`.
	///
	/// # Errors
	/// Returns `InvalidPattern` if a pattern fails to compile.
	pub fn new(config: TokenizerConfig) -> Result<Self> {
		let mut keep = String::from(r"\w\s");
		if config.keep_commas {
			keep.push(',');
		}
		if config.keep_periods {
			keep.push('.');
		}

		Ok(Self {
			newlines: Regex::new(r"\n+")?,
			excluded: Regex::new(&format!("[^{keep}]"))?,
			// Dotted abbreviations keep their periods, other punctuation
			// marks become tokens of their own
			tokens: Regex::new(r"\w+(?:\.\w+)+\.?|\w+|[^\w\s]")?,
			digits: Regex::new("[0-9]")?,
			config,
		})
	}

	pub fn config(&self) -> &TokenizerConfig {
		&self.config
	}

	/// Normalizes `raw` and splits it into tokens, in corpus order.
	///
	/// Tokens left without any word character by digit stripping are
	/// dropped, so `1984` and `3.5` vanish instead of leaving `""` or `.`.
	pub fn tokenize(&self, raw: &str) -> Vec<String> {
		let mut text = raw.to_lowercase();
		if self.config.collapse_newlines {
			text = self.newlines.replace_all(&text, " ").into_owned();
		}
		let text = self.excluded.replace_all(&text, "");

		self.tokens
			.find_iter(&text)
			.map(|m| m.as_str())
			.filter_map(|token| {
				if self.config.strip_digits {
					let stripped = self.digits.replace_all(token, "");
					let had_word = token.chars().any(is_word_char);
					let keeps_word = stripped.chars().any(is_word_char);
					(!stripped.is_empty() && (keeps_word || !had_word)).then(|| stripped.into_owned())
				} else {
					Some(token.to_owned())
				}
			})
			.collect()
	}
}

fn is_word_char(c: char) -> bool {
	c.is_alphanumeric() || c == '_'
}
