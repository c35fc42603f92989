use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use sift_core::{
    load_documents, search_scored, tokenize_with, EmptyDocumentPolicy, IdfMode, IndexBuilder, IndexConfig,
    QueryTermMode, SearchConfig, StopwordMatch,
};
use std::io::{self, Write};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build an in-memory TF-IDF index and rank documents against queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IndexArgs {
    /// Input path (JSON/JSONL file or directory)
    #[arg(long)]
    input: String,
    /// Stop-word matching: exact (case-sensitive, reference) or case-insensitive
    #[arg(long, default_value_t = StopwordMatch::Exact)]
    stopwords: StopwordMatch,
    /// IDF denominator: raw-occurrence (reference) or document-frequency
    #[arg(long, default_value_t = IdfMode::RawOccurrence)]
    idf: IdfMode,
    /// Documents with no terms: reject (fail the build) or skip
    #[arg(long, default_value_t = EmptyDocumentPolicy::Reject)]
    empty_docs: EmptyDocumentPolicy,
}

impl IndexArgs {
    fn config(&self) -> IndexConfig {
        IndexConfig { stopwords: self.stopwords, idf: self.idf, empty_documents: self.empty_docs }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the terms a piece of text tokenizes to
    Tokenize {
        #[arg(long)]
        text: String,
        #[arg(long, default_value_t = StopwordMatch::Exact)]
        stopwords: StopwordMatch,
    },
    /// Build the index and report its size
    Build {
        #[command(flatten)]
        index: IndexArgs,
        /// Write the term weights as JSON to stdout
        #[arg(long, default_value_t = false)]
        dump: bool,
    },
    /// Build the index and rank every document against a query
    Search {
        #[command(flatten)]
        index: IndexArgs,
        #[arg(long)]
        query: String,
        /// Repeated query terms: distinct (count once) or repeated (count every occurrence)
        #[arg(long, default_value_t = QueryTermMode::Distinct)]
        terms: QueryTermMode,
        /// Print at most this many results
        #[arg(long)]
        limit: Option<usize>,
        /// Print the score next to each id
        #[arg(long, default_value_t = false)]
        scores: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Tokenize { text, stopwords } => {
            let mut out = io::stdout().lock();
            for term in tokenize_with(&text, stopwords) {
                writeln!(out, "{term}")?;
            }
            Ok(())
        }
        Commands::Build { index, dump } => build(&index, dump, io::stdout().lock()),
        Commands::Search { index, query, terms, limit, scores } => {
            let config = SearchConfig { query_terms: terms };
            run_search(&index, &query, config, limit, scores, io::stdout().lock())
        }
    }
}

fn build(args: &IndexArgs, dump: bool, mut out: impl Write) -> Result<()> {
    let docs = load_documents(&args.input)?;
    let index = IndexBuilder::new(args.config()).build(&docs)?;
    tracing::info!(num_docs = index.num_docs(), num_terms = index.num_terms(), input = %args.input, "index build complete");
    if dump {
        serde_json::to_writer_pretty(&mut out, &index)?;
        writeln!(out)?;
    }
    Ok(())
}

fn run_search(
    args: &IndexArgs,
    query: &str,
    config: SearchConfig,
    limit: Option<usize>,
    scores: bool,
    mut out: impl Write,
) -> Result<()> {
    let docs = load_documents(&args.input)?;
    let index = IndexBuilder::new(args.config()).build(&docs)?;
    let ranked = search_scored(query, &docs, &index, &config);

    // limit only trims what is printed; ranking always covers the whole collection
    for (id, score) in ranked.into_iter().take(limit.unwrap_or(usize::MAX)) {
        if scores {
            writeln!(out, "{id}\t{score:.6}")?;
        } else {
            writeln!(out, "{id}")?;
        }
    }
    Ok(())
}
