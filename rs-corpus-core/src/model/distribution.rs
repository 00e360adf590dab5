use std::collections::BTreeMap;

use rand::Rng;

/// Observed continuations of one context.
///
/// A `ConditionalDistribution` belongs to a fixed (n-1)-token context and
/// stores every token seen directly after it, with its number of
/// observations. Relative frequencies are computed lazily from the raw counts.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Invariants
/// - At least one continuation is stored (built from a first observation)
/// - Each continuation count is strictly positive
/// - `total` is the sum of all counts
#[derive(Clone, Debug)]
pub struct ConditionalDistribution {
	/// Continuation counts, ordered by token so sampling is reproducible
	/// under a seeded random source.
	/// Example: { "cat" => 2, "mat" => 1 }
	transitions: BTreeMap<String, usize>,
	total: usize,
}

impl ConditionalDistribution {
	/// Creates a distribution from its first observed continuation.
	pub(crate) fn new(first: &str) -> Self {
		let mut distribution = Self { transitions: BTreeMap::new(), total: 0 };
		distribution.add_transition(first);
		distribution
	}

	/// Records one more occurrence of `next`.
	pub(crate) fn add_transition(&mut self, next: &str) {
		match self.transitions.get_mut(next) {
			Some(occurrence) => *occurrence += 1,
			None => {
				self.transitions.insert(next.to_owned(), 1);
			}
		}
		self.total += 1;
	}

	/// Raw count of `next` after this context (0 if never observed).
	pub fn count(&self, next: &str) -> usize {
		self.transitions.get(next).copied().unwrap_or(0)
	}

	/// Number of observations of the context.
	pub fn total(&self) -> usize {
		self.total
	}

	/// Number of distinct candidates.
	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Relative frequency of `next` among all continuations.
	pub fn probability(&self, next: &str) -> f64 {
		if self.total == 0 {
			return 0.0;
		}
		self.count(next) as f64 / self.total as f64
	}

	/// `(token, count)` pairs, ordered by token.
	pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.transitions.iter().map(|(k, v)| (k.as_str(), *v))
	}

	/// `(token, relative frequency)` pairs; the frequencies sum to 1.
	pub fn normalized(&self) -> Vec<(&str, f64)> {
		self.iter().map(|(token, count)| (token, count as f64 / self.total as f64)).collect()
	}

	/// Draws a continuation with probability proportional to its count.
	///
	/// Performs an O(n) scan with a cumulative subtraction to select a bucket.
	/// Returns `None` only if the distribution is empty.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		if self.total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..self.total);
		for (next, occurrence) in &self.transitions {
			if r < *occurrence {
				return Some(next.as_str());
			}
			r -= occurrence;
		}

		// Unreachable while `total` matches the counts
		self.transitions.keys().next_back().map(String::as_str)
	}
}
