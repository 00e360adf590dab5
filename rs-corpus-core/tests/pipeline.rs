use std::io::Write;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rs_corpus_core::{
	build_model, generate_fixed_length, generate_until_terminator, load_corpus, pmi, quotify, ranked_associations, Corpus,
	CorpusError, SentenceGenerator, TokenizerConfig,
};

const CORPUS: &str = "The cat sat on the mat. The cat ran.\n\
	The dog sat on the cat. The dog ran, and the cat sat.\n";

fn corpus_file(text: &str) -> tempfile::NamedTempFile {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	file.write_all(text.as_bytes()).unwrap();
	file
}

#[test]
fn load_corpus_from_disk() {
	let file = corpus_file(CORPUS);
	let corpus = load_corpus(file.path(), "utf-8", TokenizerConfig::sentences()).unwrap();

	assert_eq!(corpus.source(), Some(file.path()));
	assert_eq!(corpus.tokens()[..4], ["the", "cat", "sat", "on"]);
	assert_eq!(corpus.tables().unigrams.total(), corpus.len());
	assert_eq!(corpus.tables().bigrams.total(), corpus.len() - 1);
}

#[test]
fn load_corpus_errors() {
	assert!(matches!(
		load_corpus("/no/such/corpus.txt", "utf-8", TokenizerConfig::default()),
		Err(CorpusError::FileNotFound { .. })
	));

	let file = corpus_file(CORPUS);
	assert!(matches!(
		load_corpus(file.path(), "klingon", TokenizerConfig::default()),
		Err(CorpusError::UnsupportedEncoding(_))
	));
}

#[test]
fn order_two_scenario() {
	let corpus = Corpus::from_text("the cat sat on the mat the cat ran", TokenizerConfig::word_stream()).unwrap();
	assert_eq!(corpus.len(), 9);

	let model = build_model(&corpus, 2).unwrap();
	let the = model.distribution(&["the".to_owned()]).unwrap();
	assert_eq!(the.count("cat"), 2);
	assert_eq!(the.count("mat"), 1);
	assert_eq!(the.total(), 3);
}

#[test]
fn terminator_generation_then_quotify() {
	let corpus = Corpus::from_text(CORPUS, TokenizerConfig::sentences()).unwrap();
	let model = build_model(&corpus, 2).unwrap();
	let generator = SentenceGenerator::new(&model);
	let mut rng = StdRng::seed_from_u64(2024);

	for _ in 0..20 {
		match generator.until_terminator(Some(4), Some("the"), &mut rng) {
			Ok(raw) => {
				assert!(raw.ends_with(" ."));
				let quoted = quotify(&raw);
				assert!(quoted.starts_with("The "));
				assert!(quoted.ends_with('.'));
				assert!(!quoted.contains(" .") && !quoted.contains(" ,"));
			}
			// Only the corpus tail leads nowhere
			Err(e) => assert!(e.is_recoverable(), "unexpected error {e}"),
		}
	}
}

#[test]
fn pmi_and_rankings() {
	let corpus = Corpus::from_text(CORPUS, TokenizerConfig::sentences()).unwrap();
	let tables = corpus.tables();

	let joint = tables.bigrams.get("the", "cat").unwrap() as f64;
	let f1 = tables.unigrams.get("the").unwrap() as f64;
	let f2 = tables.unigrams.get("cat").unwrap() as f64;
	let expected = (joint * corpus.len() as f64 / (f1 * f2)).ln();
	assert!((pmi(&corpus, "the", "cat").unwrap() - expected).abs() < 1e-12);

	assert!(matches!(pmi(&corpus, "cat", "dog"), Err(CorpusError::KeyMissing { .. })));

	let min = 3;
	let ranked = ranked_associations(&corpus, min);
	assert!(!ranked.is_empty());
	for association in &ranked {
		assert!(tables.unigrams.get(&association.pair.first).unwrap() >= min);
		assert!(tables.unigrams.get(&association.pair.second).unwrap() >= min);
	}
	assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn generate_fixed_length_entry_point() {
	let corpus = Corpus::from_text(CORPUS, TokenizerConfig::sentences()).unwrap();
	let model = build_model(&corpus, 2).unwrap();

	for _ in 0..10 {
		match generate_fixed_length(&model, 6, Some("the")) {
			Ok(sentence) => {
				let words: Vec<&str> = sentence.split(' ').collect();
				assert_eq!(words.len(), 6);
				assert_eq!(words[0], "the");
			}
			Err(e) => assert!(e.is_recoverable(), "unexpected error {e}"),
		}
	}
	assert!(generate_fixed_length(&model, 6, Some("zebra")).unwrap_err().is_recoverable());
}

#[test]
fn generate_until_terminator_entry_point() {
	let corpus = Corpus::from_text(CORPUS, TokenizerConfig::sentences()).unwrap();
	let model = build_model(&corpus, 3).unwrap();

	for _ in 0..10 {
		match generate_until_terminator(&model, None, None) {
			// Default minimum is the model order
			Ok(sentence) => {
				assert!(sentence.ends_with(" ."));
				assert!(sentence.split(' ').count() > model.order() + 1);
			}
			Err(e) => assert!(e.is_recoverable(), "unexpected error {e}"),
		}
	}
}
