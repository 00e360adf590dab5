use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use log::{info, LevelFilter};
use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_corpus_core::{
	build_model, quotify, Corpus, Encoding, GeneratorConfig, SentenceGenerator, TokenizerPreset,
	DEFAULT_MIN_FREQUENCY,
};

const UNSEEN_PATTERN: &str = "I've never said that before.";

#[derive(Parser, Debug)]
#[command(author, version, about = "Corpus n-gram generator and word association toolkit", long_about = None)]
struct Cli {
	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, global = true, action = ArgAction::Count)]
	verbose: u8,

	/// Decrease verbosity (-q, -qq)
	#[arg(short = 'q', long, global = true, action = ArgAction::Count)]
	quiet: u8,

	#[command(flatten)]
	corpus: CorpusArgs,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Args, Debug)]
struct CorpusArgs {
	/// Plain text corpus file
	#[arg(short, long, global = true, value_name = "PATH", default_value = "corpus.txt")]
	corpus: PathBuf,

	/// Corpus encoding (utf-8, latin-1)
	#[arg(long, global = true, default_value = "utf-8")]
	encoding: Encoding,

	/// Tokenizer preset (word-stream, sentences)
	#[arg(long, global = true, default_value = "sentences")]
	tokenizer: TokenizerPreset,

	/// Fixed seed for the random source, for reproducible output
	#[arg(long, global = true, value_name = "SEED")]
	rng_seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Generate a fixed number of words
	Quote(QuoteArgs),
	/// Generate until a period past a minimum length
	Sentence(SentenceArgs),
	/// PMI of one adjacent word pair
	Pmi(PmiArgs),
	/// Score every word pair of the corpus
	Associations(AssociationsArgs),
	/// Rank words by frequency
	Frequencies(FrequenciesArgs),
}

#[derive(Args, Debug)]
struct QuoteArgs {
	/// Number of words to generate
	words: usize,

	/// Starting words (their last n-1 form the first context)
	#[arg(short, long)]
	seed: Option<String>,

	/// Model order
	#[arg(short, long, default_value_t = 4)]
	order: usize,
}

#[derive(Args, Debug)]
struct SentenceArgs {
	/// Minimum number of words (defaults to the model order)
	#[arg(short, long)]
	min_words: Option<usize>,

	/// Starting words (their last n-1 form the first context)
	#[arg(short, long)]
	seed: Option<String>,

	/// Model order
	#[arg(short, long, default_value_t = 4)]
	order: usize,

	/// Maximum number of sampled words before giving up
	#[arg(long, default_value_t = rs_corpus_core::model::generator::DEFAULT_MAX_TOKENS)]
	max_tokens: usize,

	/// Also print the unformatted token stream
	#[arg(long)]
	raw: bool,
}

#[derive(Args, Debug)]
struct PmiArgs {
	first: String,
	second: String,
}

#[derive(Args, Debug)]
struct AssociationsArgs {
	/// Skip pairs where either word occurs less often than this
	#[arg(long, default_value_t = DEFAULT_MIN_FREQUENCY)]
	min_frequency: usize,

	/// Number of pairs to print (0 = all)
	#[arg(short, long, default_value_t = 20)]
	limit: usize,

	/// Keep discovery order instead of sorting by score
	#[arg(long)]
	unsorted: bool,
}

#[derive(Args, Debug)]
struct FrequenciesArgs {
	/// Number of words to print (0 = all)
	#[arg(short, long, default_value_t = 20)]
	top: usize,

	/// Add log10 rank and frequency columns
	#[arg(long)]
	log: bool,
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	let corpus = Corpus::load(&cli.corpus.corpus, cli.corpus.encoding, cli.corpus.tokenizer.config())
		.with_context(|| format!("unable to load corpus {}", cli.corpus.corpus.display()))?;
	let mut rng = match cli.corpus.rng_seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};

	match cli.command {
		Commands::Quote(args) => run_quote(&corpus, args, &mut rng),
		Commands::Sentence(args) => run_sentence(&corpus, args, &mut rng),
		Commands::Pmi(args) => run_pmi(&corpus, args),
		Commands::Associations(args) => run_associations(&corpus, args),
		Commands::Frequencies(args) => run_frequencies(&corpus, args),
	}
}

fn init_logging(verbose: u8, quiet: u8) {
	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
	builder.format_timestamp_millis();
	// RUST_LOG stays in charge unless -v / -q is given
	if let Some(level) = flag_level(verbose, quiet) {
		builder.filter_level(level);
	}
	let _ = builder.try_init();
}

/// Level requested by the counting flags, `None` when neither was used.
fn flag_level(verbose: u8, quiet: u8) -> Option<LevelFilter> {
	match (verbose, quiet) {
		(0, 0) => None,
		(_, 1) => Some(LevelFilter::Warn),
		(_, q) if q > 1 => Some(LevelFilter::Error),
		(1, _) => Some(LevelFilter::Debug),
		_ => Some(LevelFilter::Trace),
	}
}

/// Prints the friendly message for lookups of unseen data, propagates the rest.
fn report_unseen(result: rs_corpus_core::Result<()>, message: &str) -> Result<()> {
	match result {
		Err(e) if e.is_recoverable() => {
			info!("{e}");
			println!("{message}");
			Ok(())
		}
		other => Ok(other?),
	}
}

fn run_quote(corpus: &Corpus, args: QuoteArgs, rng: &mut StdRng) -> Result<()> {
	let model = build_model(corpus, args.order).context("unable to build model")?;
	let generator = SentenceGenerator::new(&model);
	let seed = args.seed.map(|s| s.to_lowercase());

	let result = generator.fixed_length(args.words, seed.as_deref(), rng).map(|sentence| {
		println!("{}", format_quote(&sentence));
	});
	report_unseen(result, UNSEEN_PATTERN)
}

/// Capitalized, quoted and closed with exactly one period.
fn format_quote(sentence: &str) -> String {
	let quoted = quotify(sentence);
	format!("\"{}.\"", quoted.trim_end_matches(['.', ',']))
}

fn run_sentence(corpus: &Corpus, args: SentenceArgs, rng: &mut StdRng) -> Result<()> {
	let model = build_model(corpus, args.order).context("unable to build model")?;
	let generator = SentenceGenerator::with_config(&model, GeneratorConfig::default().with_max_tokens(args.max_tokens));
	let seed = args.seed.map(|s| s.to_lowercase());

	let result = generator.until_terminator(args.min_words, seed.as_deref(), rng).map(|sentence| {
		if args.raw {
			println!("{sentence}");
		}
		println!("{}", quotify(&sentence));
	});
	report_unseen(result, UNSEEN_PATTERN)
}

fn run_pmi(corpus: &Corpus, args: PmiArgs) -> Result<()> {
	let (first, second) = (args.first.to_lowercase(), args.second.to_lowercase());
	let result = corpus.pmi(&first, &second).map(|score| {
		println!("PMI({first}, {second}) = {score:.6}");
	});
	report_unseen(result, &format!("'{first} {second}' never occurs in the corpus."))
}

fn run_associations(corpus: &Corpus, args: AssociationsArgs) -> Result<()> {
	let scorer = corpus.scorer();
	let associations = if args.unsorted {
		scorer.associations(args.min_frequency)
	} else {
		scorer.ranked_associations(args.min_frequency)
	};
	info!("{} pairs pass a minimum frequency of {}", associations.len(), args.min_frequency);

	let limit = if args.limit == 0 { associations.len() } else { args.limit };
	for association in associations.iter().take(limit) {
		println!("{}\t{:.6}", association.pair, association.score);
	}
	Ok(())
}

fn run_frequencies(corpus: &Corpus, args: FrequenciesArgs) -> Result<()> {
	let ranked = corpus.tables().unigrams.ranked();
	let top = if args.top == 0 { ranked.len() } else { args.top };

	for (rank, (token, count)) in ranked.iter().take(top).enumerate() {
		let rank = rank + 1;
		if args.log {
			println!("{rank}\t{token}\t{count}\t{:.4}\t{:.4}", (rank as f64).log10(), (*count as f64).log10());
		} else {
			println!("{rank}\t{token}\t{count}");
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rs_corpus_core::CorpusError;

	#[test]
	fn parses_global_corpus_options() {
		let cli = Cli::try_parse_from([
			"rs-corpus-cli", "--corpus", "books.txt", "--tokenizer", "word-stream", "--rng-seed", "7", "quote", "12",
		])
		.unwrap();

		assert_eq!(cli.corpus.corpus, PathBuf::from("books.txt"));
		assert_eq!(cli.corpus.tokenizer, TokenizerPreset::WordStream);
		assert_eq!(cli.corpus.rng_seed, Some(7));
		assert!(matches!(cli.command, Commands::Quote(QuoteArgs { words: 12, order: 4, .. })));
	}

	#[test]
	fn quotes_end_with_one_period() {
		assert_eq!(format_quote("the mind is a system"), "\"The mind is a system.\"");
		assert_eq!(format_quote("it was , so ."), "\"It was, so.\"");
	}

	#[test]
	fn log_level_flags_only_override_when_given() {
		assert_eq!(flag_level(0, 0), None);
		assert_eq!(flag_level(1, 0), Some(LevelFilter::Debug));
		assert_eq!(flag_level(3, 0), Some(LevelFilter::Trace));
		assert_eq!(flag_level(0, 1), Some(LevelFilter::Warn));
		assert_eq!(flag_level(2, 2), Some(LevelFilter::Error));
	}

	#[test]
	fn rejects_unknown_encoding() {
		assert!(Cli::try_parse_from(["rs-corpus-cli", "--encoding", "klingon", "frequencies"]).is_err());
	}

	#[test]
	fn recoverable_errors_become_messages() {
		let unseen: rs_corpus_core::Result<()> = Err(CorpusError::UnknownContext { context: vec!["x".into()] });
		assert!(report_unseen(unseen, UNSEEN_PATTERN).is_ok());

		let fatal: rs_corpus_core::Result<()> = Err(CorpusError::GenerationBoundExceeded { limit: 1 });
		assert!(report_unseen(fatal, UNSEEN_PATTERN).is_err());
	}
}
