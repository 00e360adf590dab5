use serde::Serialize;

use super::frequency::{Bigram, FrequencyTables};
use crate::error::{CorpusError, Result};

/// Default unigram frequency threshold for corpus-wide scoring.
pub const DEFAULT_MIN_FREQUENCY: usize = 10;

/// A scored word pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Association {
	pub pair: Bigram,
	pub score: f64,
}

/// Pointwise Mutual Information over the adjacent-pair tables of a corpus.
///
/// ```text
///              C(w1 w2) * N
/// PMI = ln( ---------------- )
///             C(w1) * C(w2)
/// ```
///
/// where `N` is the corpus token count. Pairs are directional: `(w1, w2)`
/// means `w1` immediately followed by `w2`.
pub struct AssociationScorer<'a> {
	tables: &'a FrequencyTables,
}

impl<'a> AssociationScorer<'a> {
	pub fn new(tables: &'a FrequencyTables) -> Self {
		Self { tables }
	}

	/// PMI of `first` directly followed by `second`.
	///
	/// # Errors
	/// Returns `KeyMissing` if the pair was never observed adjacently.
	pub fn pmi(&self, first: &str, second: &str) -> Result<f64> {
		let missing = || CorpusError::KeyMissing { first: first.to_owned(), second: second.to_owned() };

		let joint = self.tables.bigrams.get(first, second).ok_or_else(missing)?;
		// An observed pair implies both unigrams exist
		let f1 = self.tables.unigrams.get(first).ok_or_else(missing)?;
		let f2 = self.tables.unigrams.get(second).ok_or_else(missing)?;
		let n = self.tables.unigrams.total();

		Ok(pmi_score(joint, f1, f2, n))
	}

	/// Scores every observed pair, in discovery order.
	///
	/// A pair is skipped when either of its unigram frequencies is below
	/// `min_frequency`.
	pub fn associations(&self, min_frequency: usize) -> Vec<Association> {
		let unigrams = &self.tables.unigrams;
		let n = unigrams.total();

		self.tables
			.bigrams
			.iter()
			.filter_map(|(pair, joint)| {
				let f1 = unigrams.get(&pair.first)?;
				let f2 = unigrams.get(&pair.second)?;
				if f1 < min_frequency || f2 < min_frequency {
					return None;
				}
				Some(Association { pair: pair.clone(), score: pmi_score(joint, f1, f2, n) })
			})
			.collect()
	}

	/// Same as [`associations`](Self::associations), sorted by descending score.
	///
	/// The sort is stable, so equal scores stay in discovery order.
	pub fn ranked_associations(&self, min_frequency: usize) -> Vec<Association> {
		let mut ranked = self.associations(min_frequency);
		ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
		ranked
	}
}

/// `ln(joint * n / (f1 * f2))`, computed in floating point.
fn pmi_score(joint: usize, f1: usize, f2: usize, n: usize) -> f64 {
	(joint as f64 * n as f64 / (f1 as f64 * f2 as f64)).ln()
}
