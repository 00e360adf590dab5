//! Top-level module for word-level n-gram generation.
//!
//! This module provides:
//! - Fixed-order n-gram models (`NGramModel`)
//! - Per-context continuation counts (`ConditionalDistribution`)
//! - Fixed-length and terminator-driven generation (`SentenceGenerator`)
//! - Display formatting of generated text (`quotify`)

/// Sentence generation policies over an `NGramModel`.
///
/// Exposes fixed-length and terminator-driven generation with an
/// injected random source and an optional seed.
pub mod generator;

/// Fixed-order n-gram model (`n >= 2`).
///
/// Handles window sliding over a token sequence, continuation counting,
/// context lookup and frequency-weighted sampling.
pub mod ngram_model;

/// Continuations observed after a single context.
///
/// Tracks raw counts and supports weighted random sampling.
pub mod distribution;

/// Capitalization and punctuation clean-up of generated text.
pub mod quotify;
