use std::collections::HashMap;

use log::info;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::distribution::ConditionalDistribution;
use crate::error::{CorpusError, Result};

/// Word-level n-gram model of a fixed order.
///
/// The `NGramModel` maps every context of `n-1` consecutive corpus tokens
/// to the distribution of tokens observed right after it.
///
/// # Responsibilities
/// - Slide a window of width `n` over the token sequence and count continuations
/// - Keep the discovery-ordered list of contexts, used for random seeding
/// - Sample the next token of a context proportionally to its observed frequency
///
/// # Invariants
/// - `n` is always >= 2
/// - Every key of `states` has exactly `n-1` tokens and appears once in `contexts`
/// - Contexts that never start a complete window (the corpus tail) are absent
/// - Immutable once built
#[derive(Clone, Debug)]
pub struct NGramModel {
	/// The order of the model (number of tokens in one window)
	n: usize,

	/// Contexts in the order they were first seen
	contexts: Vec<Vec<String>>,

	/// Mapping from a context (length n-1) to its continuations
	states: HashMap<Vec<String>, ConditionalDistribution>,
}

impl NGramModel {
	/// Builds an order-`n` model from `tokens`.
	///
	/// # Errors
	/// - `InvalidOrder` if `n < 2`
	/// - `CorpusTooShort` if `tokens` cannot fill a single window
	pub fn new(tokens: &[String], n: usize) -> Result<Self> {
		if n < 2 {
			return Err(CorpusError::InvalidOrder(n));
		}
		if tokens.len() < n {
			return Err(CorpusError::CorpusTooShort { tokens: tokens.len(), order: n });
		}

		let mut contexts = Vec::new();
		let mut states: HashMap<Vec<String>, ConditionalDistribution> = HashMap::new();

		for window in tokens.windows(n) {
			let (context, next) = window.split_at(n - 1);
			let next = &next[0];

			match states.get_mut(context) {
				Some(state) => state.add_transition(next),
				None => {
					contexts.push(context.to_vec());
					states.insert(context.to_vec(), ConditionalDistribution::new(next));
				}
			}
		}

		info!("Built {}-gram model: {} contexts from {} tokens", n, contexts.len(), tokens.len());
		Ok(Self { n, contexts, states })
	}

	/// The order `n` of the model.
	pub fn order(&self) -> usize {
		self.n
	}

	/// Number of tokens in a context (`n - 1`).
	pub fn context_size(&self) -> usize {
		self.n - 1
	}

	/// Every observed context, in discovery order.
	pub fn contexts(&self) -> &[Vec<String>] {
		&self.contexts
	}

	pub fn contains(&self, context: &[String]) -> bool {
		self.states.contains_key(context)
	}

	/// Picks a context uniformly at random.
	///
	/// Never `None` for a built model, which always holds one window.
	pub fn random_context<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&[String]> {
		self.contexts.choose(rng).map(Vec::as_slice)
	}

	/// Continuations observed after `context`.
	///
	/// # Errors
	/// Returns `UnknownContext` if `context` never occurs in the corpus.
	pub fn distribution(&self, context: &[String]) -> Result<&ConditionalDistribution> {
		self.states
			.get(context)
			.ok_or_else(|| CorpusError::UnknownContext { context: context.to_vec() })
	}

	/// Draws the token following `context`, weighted by observed frequency.
	///
	/// # Errors
	/// Returns `UnknownContext` if `context` never occurs in the corpus.
	pub fn sample<R: Rng + ?Sized>(&self, context: &[String], rng: &mut R) -> Result<&str> {
		self.distribution(context)?
			.sample(rng)
			.ok_or_else(|| CorpusError::UnknownContext { context: context.to_vec() })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn tokens(text: &str) -> Vec<String> {
		text.split_whitespace().map(str::to_owned).collect()
	}

	#[test]
	fn rejects_invalid_order_and_short_corpus() {
		let t = tokens("a b c");
		assert!(matches!(NGramModel::new(&t, 1), Err(CorpusError::InvalidOrder(1))));
		assert!(matches!(NGramModel::new(&t, 4), Err(CorpusError::CorpusTooShort { tokens: 3, order: 4 })));
		assert!(NGramModel::new(&t, 3).is_ok());
	}

	#[test]
	fn bigram_continuations_of_the() {
		let model = NGramModel::new(&tokens("the cat sat on the mat the cat ran"), 2).unwrap();
		let the = model.distribution(&tokens("the")).unwrap();

		assert_eq!(the.count("cat"), 2);
		assert_eq!(the.count("mat"), 1);
		assert_eq!(the.len(), 2);
	}

	#[test]
	fn corpus_tail_is_not_a_context() {
		let model = NGramModel::new(&tokens("the cat sat on the mat the cat ran"), 2).unwrap();

		assert!(!model.contains(&tokens("ran")));
		assert!(matches!(
			model.distribution(&tokens("ran")),
			Err(CorpusError::UnknownContext { context }) if context == ["ran"]
		));
		assert_eq!(model.contexts().len(), 5);
		assert_eq!(model.contexts()[0], ["the"]);
	}

	#[test]
	fn every_distribution_normalizes() {
		let model = NGramModel::new(&tokens("a b a c a b b c a a b c c b a"), 3).unwrap();
		for context in model.contexts() {
			assert_eq!(context.len(), model.context_size());
			let distribution = model.distribution(context).unwrap();
			assert!(!distribution.is_empty());
			let sum: f64 = distribution.normalized().iter().map(|(_, p)| p).sum();
			assert!((sum - 1.0).abs() < 1e-9);
		}
	}

	#[test]
	fn sampling_is_proportional_to_frequency() {
		let model = NGramModel::new(&tokens("the cat sat on the mat the cat ran"), 2).unwrap();
		let context = tokens("the");
		let mut rng = StdRng::seed_from_u64(1234);

		let (mut cat, mut mat) = (0usize, 0usize);
		for _ in 0..3000 {
			match model.sample(&context, &mut rng).unwrap() {
				"cat" => cat += 1,
				"mat" => mat += 1,
				other => panic!("unexpected continuation {other}"),
			}
		}
		let ratio = cat as f64 / mat as f64;
		assert!((1.6..2.5).contains(&ratio), "cat/mat ratio {ratio}");
	}

	#[test]
	fn random_context_is_known() {
		let model = NGramModel::new(&tokens("one two three four five"), 3).unwrap();
		let mut rng = StdRng::seed_from_u64(3);
		for _ in 0..20 {
			let context = model.random_context(&mut rng).unwrap();
			assert!(model.contains(context));
		}
	}
}
