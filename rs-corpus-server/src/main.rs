use std::path::PathBuf;

use actix_web::middleware::Logger;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{error, info};
use serde::{Deserialize, Serialize};

use rs_corpus_core::corpus::association::Association;
use rs_corpus_core::model::generator::DEFAULT_MAX_TOKENS;
use rs_corpus_core::{
	build_model, quotify, Corpus, CorpusError, Encoding, GeneratorConfig, NGramModel, SentenceGenerator,
	TokenizerPreset, DEFAULT_MIN_FREQUENCY,
};

/// Reply for generation requests that walk into unseen data.
const UNSEEN_PATTERN: &str = "I've never said that before.";

#[derive(Parser, Debug)]
#[command(author, version, about = "HTTP front end for the corpus n-gram model", long_about = None)]
struct ServerArgs {
	/// Plain text corpus file
	#[arg(short, long, value_name = "PATH", default_value = "corpus.txt")]
	corpus: PathBuf,

	/// Corpus encoding (utf-8, latin-1)
	#[arg(long, default_value = "utf-8")]
	encoding: Encoding,

	/// Tokenizer preset (word-stream, sentences)
	#[arg(long, default_value = "sentences")]
	tokenizer: TokenizerPreset,

	/// Model order
	#[arg(short, long, default_value_t = 4)]
	order: usize,

	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	#[arg(short, long, default_value_t = 5000)]
	port: u16,

	/// Upper bound on words sampled by one `/v1/sentence` request
	#[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
	max_tokens: usize,
}

/// Query parameters for the `/v1/quote` endpoint
#[derive(Deserialize)]
struct QuoteParams {
	words: Option<usize>,
	seed: Option<String>,
}

/// Query parameters for the `/v1/sentence` endpoint
#[derive(Deserialize)]
struct SentenceParams {
	min_words: Option<usize>,
	seed: Option<String>,
	max_tokens: Option<usize>,
}

#[derive(Deserialize)]
struct PmiParams {
	first: Option<String>,
	second: Option<String>,
}

#[derive(Deserialize)]
struct AssociationParams {
	min_frequency: Option<usize>,
	limit: Option<usize>,
}

#[derive(Serialize)]
struct CorpusSummary {
	tokens: usize,
	distinct_tokens: usize,
	distinct_pairs: usize,
	order: usize,
	contexts: usize,
}

/// Corpus and model, built once at startup and only read afterwards.
struct SharedData {
	corpus: Corpus,
	model: NGramModel,
	/// Server-wide cap; requests may only lower it
	max_tokens: usize,
}

/// Normalizes an optional seed the way the corpus was normalized.
fn normalize_seed(seed: Option<&str>) -> Option<String> {
	seed.map(str::trim).filter(|s| !s.is_empty()).map(str::to_lowercase)
}

/// Bound for one request: the requested value, never above `cap`.
fn sentence_bound(requested: Option<usize>, cap: usize) -> usize {
	requested.map_or(cap, |n| n.min(cap))
}

/// Maps generation failures to a response.
///
/// Unseen patterns are an expected outcome and answered with a friendly text.
fn generation_error(e: CorpusError) -> HttpResponse {
	if e.is_recoverable() {
		info!("{e}");
		HttpResponse::Ok().body(UNSEEN_PATTERN)
	} else {
		error!("Generation failed: {e}");
		HttpResponse::InternalServerError().body(e.to_string())
	}
}

/// HTTP GET endpoint `/v1/quote`
///
/// Generates a fixed number of words (default 20) and returns them
/// capitalized, quoted and closed with a period.
#[get("/v1/quote")]
async fn get_quote(data: web::Data<SharedData>, query: web::Query<QuoteParams>) -> impl Responder {
	let words = query.words.unwrap_or(20);
	let seed = normalize_seed(query.seed.as_deref());

	let generator = SentenceGenerator::new(&data.model);
	match generator.fixed_length(words, seed.as_deref(), &mut rand::rng()) {
		Ok(sentence) => {
			let quoted = quotify(&sentence);
			HttpResponse::Ok().body(format!("\"{}.\"", quoted.trim_end_matches(['.', ','])))
		}
		Err(e) => generation_error(e),
	}
}

/// HTTP GET endpoint `/v1/sentence`
///
/// Generates until a period is sampled past `min_words` words.
/// A `max_tokens` parameter above the server cap is clamped to it.
#[get("/v1/sentence")]
async fn get_sentence(data: web::Data<SharedData>, query: web::Query<SentenceParams>) -> impl Responder {
	let seed = normalize_seed(query.seed.as_deref());
	let config = GeneratorConfig::default().with_max_tokens(sentence_bound(query.max_tokens, data.max_tokens));

	let generator = SentenceGenerator::with_config(&data.model, config);
	match generator.until_terminator(query.min_words, seed.as_deref(), &mut rand::rng()) {
		Ok(sentence) => HttpResponse::Ok().body(quotify(&sentence)),
		Err(e) => generation_error(e),
	}
}

/// HTTP GET endpoint `/v1/pmi`
///
/// Returns the PMI of `first` directly followed by `second` as JSON,
/// or 404 if the pair never occurs.
#[get("/v1/pmi")]
async fn get_pmi(data: web::Data<SharedData>, query: web::Query<PmiParams>) -> impl Responder {
	let (first, second) = match (&query.first, &query.second) {
		(Some(f), Some(s)) if !f.trim().is_empty() && !s.trim().is_empty() => {
			(f.trim().to_lowercase(), s.trim().to_lowercase())
		}
		_ => return HttpResponse::BadRequest().body("Both 'first' and 'second' are required"),
	};

	match data.corpus.pmi(&first, &second) {
		Ok(score) => HttpResponse::Ok().json(Association {
			pair: rs_corpus_core::corpus::frequency::Bigram::new(first, second),
			score,
		}),
		Err(e @ CorpusError::KeyMissing { .. }) => HttpResponse::NotFound().body(e.to_string()),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/associations`
///
/// Ranked PMI scores, best first, as a JSON array.
#[get("/v1/associations")]
async fn get_associations(data: web::Data<SharedData>, query: web::Query<AssociationParams>) -> impl Responder {
	let min_frequency = query.min_frequency.unwrap_or(DEFAULT_MIN_FREQUENCY);
	let mut ranked = data.corpus.ranked_associations(min_frequency);
	if let Some(limit) = query.limit {
		ranked.truncate(limit);
	}
	HttpResponse::Ok().json(ranked)
}

#[get("/v1/corpus")]
async fn get_corpus(data: web::Data<SharedData>) -> impl Responder {
	let tables = data.corpus.tables();
	HttpResponse::Ok().json(CorpusSummary {
		tokens: data.corpus.len(),
		distinct_tokens: tables.unigrams.len(),
		distinct_pairs: tables.bigrams.len(),
		order: data.model.order(),
		contexts: data.model.contexts().len(),
	})
}

fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_quote)
		.service(get_sentence)
		.service(get_pmi)
		.service(get_associations)
		.service(get_corpus);
}

/// Main entry point for the server.
///
/// Loads the corpus and builds the model once, then serves them read-only
/// from every worker.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
	let args = ServerArgs::parse();

	let corpus = Corpus::load(&args.corpus, args.encoding, args.tokenizer.config())
		.with_context(|| format!("unable to load corpus {}", args.corpus.display()))?;
	let model = build_model(&corpus, args.order).context("unable to build model")?;
	let shared_data = web::Data::new(SharedData { corpus, model, max_tokens: args.max_tokens });

	info!("Listening on {}:{}", args.host, args.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.app_data(shared_data.clone())
			.configure(configure)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await?;

	Ok(())
}
