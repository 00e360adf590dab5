use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Ordered pair of adjacent tokens, `first` directly followed by `second`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Bigram {
	pub first: String,
	pub second: String,
}

impl Bigram {
	pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
		Self { first: first.into(), second: second.into() }
	}
}

impl fmt::Display for Bigram {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({}, {})", self.first, self.second)
	}
}

/// Occurrence count of every distinct token.
///
/// # Invariants
/// - The sum of all counts equals the length of the source token sequence
/// - Every stored count is >= 1
#[derive(Debug, Clone, Default)]
pub struct UnigramCounts {
	counts: HashMap<String, usize>,
	total: usize,
}

impl UnigramCounts {
	/// Count for `token`, `None` if it never occurs.
	pub fn get(&self, token: &str) -> Option<usize> {
		self.counts.get(token).copied()
	}

	/// Number of distinct tokens.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Sum of all counts.
	pub fn total(&self) -> usize {
		self.total
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.counts.iter().map(|(k, v)| (k.as_str(), *v))
	}

	/// Tokens sorted by descending frequency (rank/frequency data).
	///
	/// Equal counts are ordered alphabetically so the ranking is stable.
	pub fn ranked(&self) -> Vec<(&str, usize)> {
		let mut ranked: Vec<(&str, usize)> = self.iter().collect();
		ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
		ranked
	}
}

/// Occurrence count of every adjacent ordered token pair.
///
/// Pairs are kept in the order they were first observed, which is the
/// order `iter` yields them in.
///
/// # Invariants
/// - The sum of all counts equals the token sequence length minus one
/// - `(a, b)` and `(b, a)` are distinct keys
#[derive(Debug, Clone, Default)]
pub struct BigramCounts {
	entries: Vec<(Bigram, usize)>,
	index: HashMap<Bigram, usize>,
}

impl BigramCounts {
	fn add(&mut self, first: &str, second: &str) {
		let key = Bigram::new(first, second);
		match self.index.get(&key) {
			Some(&i) => self.entries[i].1 += 1,
			None => {
				self.index.insert(key.clone(), self.entries.len());
				self.entries.push((key, 1));
			}
		}
	}

	/// Count for `first` directly followed by `second`, `None` if never seen.
	pub fn get(&self, first: &str, second: &str) -> Option<usize> {
		self.index
			.get(&Bigram::new(first, second))
			.map(|&i| self.entries[i].1)
	}

	/// Number of distinct pairs.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn total(&self) -> usize {
		self.entries.iter().map(|(_, count)| count).sum()
	}

	/// Pairs in discovery order.
	pub fn iter(&self) -> impl Iterator<Item = (&Bigram, usize)> {
		self.entries.iter().map(|(k, v)| (k, *v))
	}
}

/// Unigram and bigram tables derived from one token sequence.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTables {
	pub unigrams: UnigramCounts,
	pub bigrams: BigramCounts,
}

impl FrequencyTables {
	/// Builds both tables in a single pass over `tokens`.
	///
	/// No smoothing is applied: unseen tokens and pairs are absent.
	pub fn build(tokens: &[String]) -> Self {
		let mut unigrams = UnigramCounts::default();
		let mut bigrams = BigramCounts::default();

		for (i, token) in tokens.iter().enumerate() {
			*unigrams.counts.entry(token.clone()).or_insert(0) += 1;
			if let Some(next) = tokens.get(i + 1) {
				bigrams.add(token, next);
			}
		}
		unigrams.total = tokens.len();

		Self { unigrams, bigrams }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tokens(text: &str) -> Vec<String> {
		text.split_whitespace().map(str::to_owned).collect()
	}

	#[test]
	fn counts_sum_to_sequence_lengths() {
		let tokens = tokens("the cat sat on the mat the cat ran");
		let tables = FrequencyTables::build(&tokens);

		assert_eq!(tables.unigrams.iter().map(|(_, c)| c).sum::<usize>(), tokens.len());
		assert_eq!(tables.unigrams.total(), 9);
		assert_eq!(tables.bigrams.total(), tokens.len() - 1);
	}

	#[test]
	fn bigrams_are_directional() {
		let tables = FrequencyTables::build(&tokens("the cat sat on the mat the cat ran"));

		assert_eq!(tables.bigrams.get("the", "cat"), Some(2));
		assert_eq!(tables.bigrams.get("cat", "the"), None);
		assert_eq!(tables.bigrams.get("mat", "the"), Some(1));
		assert_eq!(tables.unigrams.get("the"), Some(3));
		assert_eq!(tables.unigrams.get("dog"), None);
	}

	#[test]
	fn bigrams_keep_discovery_order() {
		let tables = FrequencyTables::build(&tokens("b a b a c"));
		let pairs: Vec<String> = tables.bigrams.iter().map(|(k, _)| k.to_string()).collect();
		assert_eq!(pairs, ["(b, a)", "(a, b)", "(a, c)"]);
	}

	#[test]
	fn empty_and_single_token_sequences() {
		let empty = FrequencyTables::build(&[]);
		assert!(empty.unigrams.is_empty());
		assert!(empty.bigrams.is_empty());

		let single = FrequencyTables::build(&tokens("alone"));
		assert_eq!(single.unigrams.total(), 1);
		assert_eq!(single.bigrams.total(), 0);
	}

	#[test]
	fn ranked_orders_by_frequency_then_token() {
		let tables = FrequencyTables::build(&tokens("b a c a b a"));
		assert_eq!(tables.unigrams.ranked(), [("a", 3), ("b", 2), ("c", 1)]);
	}
}
