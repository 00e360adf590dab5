use log::{debug, warn};
use rand::Rng;

use super::ngram_model::NGramModel;
use crate::error::{CorpusError, Result};

/// Default terminator token for terminator-driven generation.
pub const TERMINATOR: &str = ".";

/// Default bound on tokens sampled by a single terminator-driven call.
pub const DEFAULT_MAX_TOKENS: usize = 10_000;

/// Settings shared by every generation call of a `SentenceGenerator`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
	/// Token marking a sentence boundary.
	pub terminator: String,

	/// Maximum number of tokens sampled before `until_terminator` gives up.
	pub max_tokens: usize,
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self { terminator: TERMINATOR.to_owned(), max_tokens: DEFAULT_MAX_TOKENS }
	}
}

impl GeneratorConfig {
	pub fn with_terminator(mut self, terminator: impl Into<String>) -> Self {
		self.terminator = terminator.into();
		self
	}

	pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
		self.max_tokens = max_tokens;
		self
	}
}

/// Drives an `NGramModel` to produce token sequences.
///
/// Both policies run the same loop: pick a starting context, sample the
/// next token, slide the window by one, repeat. The current context is
/// always the last `n-1` tokens of the output.
///
/// # Policies
/// - [`fixed_length`](Self::fixed_length): stop once the output holds `w` tokens
/// - [`until_terminator`](Self::until_terminator): stop once a terminator is
///   sampled while the output is already longer than the minimum
///
/// A generation call never modifies the model; the random source is
/// supplied by the caller.
#[derive(Debug, Clone)]
pub struct SentenceGenerator<'m> {
	model: &'m NGramModel,
	config: GeneratorConfig,
}

impl<'m> SentenceGenerator<'m> {
	pub fn new(model: &'m NGramModel) -> Self {
		Self::with_config(model, GeneratorConfig::default())
	}

	pub fn with_config(model: &'m NGramModel, config: GeneratorConfig) -> Self {
		Self { model, config }
	}

	pub fn config(&self) -> &GeneratorConfig {
		&self.config
	}

	/// Initial output: the whole seed, or a random context if there is none.
	///
	/// A blank seed counts as no seed.
	///
	/// # Errors
	/// Returns `UnknownContext` if the seed is shorter than a context.
	fn start<R: Rng + ?Sized>(&self, seed: Option<&str>, rng: &mut R) -> Result<Vec<String>> {
		let seed: Vec<String> = seed
			.map(|s| s.split_whitespace().map(str::to_owned).collect())
			.unwrap_or_default();

		if seed.is_empty() {
			let context = self
				.model
				.random_context(rng)
				.ok_or_else(|| CorpusError::UnknownContext { context: Vec::new() })?;
			debug!("Seeding with random context '{}'", context.join(" "));
			return Ok(context.to_vec());
		}

		if seed.len() < self.model.context_size() {
			return Err(CorpusError::UnknownContext { context: seed });
		}
		debug!("Seeding with '{}'", seed.join(" "));
		Ok(seed)
	}

	/// Samples the token following the last `n-1` tokens of `output`.
	fn next<R: Rng + ?Sized>(&self, output: &[String], rng: &mut R) -> Result<&'m str> {
		let context = &output[output.len() - self.model.context_size()..];
		self.model.sample(context, rng)
	}

	/// Policy A: generates tokens until the output holds `word_count` of them.
	///
	/// The seed, if any, is kept whole at the front of the output and its
	/// last `n-1` tokens form the first context. An output that starts
	/// longer than `word_count` is returned as is.
	///
	/// # Errors
	/// Returns `UnknownContext` when the sliding window reaches a context
	/// never observed in the corpus. This is an expected outcome for rare
	/// sequences and seeds.
	pub fn fixed_length_tokens<R: Rng + ?Sized>(&self, word_count: usize, seed: Option<&str>, rng: &mut R) -> Result<Vec<String>> {
		let mut output = self.start(seed, rng)?;

		while output.len() < word_count {
			let next = self.next(&output, rng)?;
			output.push(next.to_owned());
		}

		debug!("Generated {} tokens (fixed length {})", output.len(), word_count);
		Ok(output)
	}

	/// Policy A, space-joined.
	pub fn fixed_length<R: Rng + ?Sized>(&self, word_count: usize, seed: Option<&str>, rng: &mut R) -> Result<String> {
		Ok(self.fixed_length_tokens(word_count, seed, rng)?.join(" "))
	}

	/// Policy B: generates until a terminator is sampled past `min_words`.
	///
	/// Sampling continues while the last sampled token is not the terminator
	/// **or** the output holds `min_words` tokens or fewer. A terminator drawn
	/// before the minimum is reached is therefore kept and generation goes on,
	/// so short minimums can yield several sentences. The final terminator
	/// is included in the output.
	///
	/// `None` defaults the minimum to the model order.
	///
	/// # Errors
	/// - `UnknownContext` if the window reaches an unseen context
	/// - `GenerationBoundExceeded` after `max_tokens` sampled tokens
	pub fn until_terminator_tokens<R: Rng + ?Sized>(&self, min_words: Option<usize>, seed: Option<&str>, rng: &mut R) -> Result<Vec<String>> {
		let min_words = min_words.unwrap_or(self.model.order());
		let terminator = self.config.terminator.as_str();
		let limit = self.config.max_tokens;

		let mut output = self.start(seed, rng)?;
		let mut sampled = 1;
		let mut next = self.next(&output, rng)?;

		while next != terminator || output.len() <= min_words {
			if sampled >= limit {
				warn!("Generation stopped after {} sampled tokens without a terminator", sampled);
				return Err(CorpusError::GenerationBoundExceeded { limit });
			}
			output.push(next.to_owned());
			next = self.next(&output, rng)?;
			sampled += 1;
		}
		output.push(next.to_owned());

		debug!("Generated {} tokens (minimum {})", output.len(), min_words);
		Ok(output)
	}

	/// Policy B, space-joined.
	pub fn until_terminator<R: Rng + ?Sized>(&self, min_words: Option<usize>, seed: Option<&str>, rng: &mut R) -> Result<String> {
		Ok(self.until_terminator_tokens(min_words, seed, rng)?.join(" "))
	}
}
