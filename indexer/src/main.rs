use anyhow::Result;
use clap::{Parser, Subcommand};
use indexer::{build_index, query_index, run, search_index, Config};
use std::path::PathBuf;
use tabdex_core::DuplicatePolicy;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query a token -> document-set inverted index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a tab-delimited corpus
    Build {
        /// Corpus file, one `<id>\t<text>` record per line
        #[arg(long, env = "TABDEX_CORPUS")]
        corpus: PathBuf,
        /// Output index file (JSON)
        #[arg(long, env = "TABDEX_INDEX")]
        output: PathBuf,
        /// Indent the JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,
        /// Fail on a repeated document id instead of keeping the later line
        #[arg(long, default_value_t = false)]
        reject_duplicates: bool,
    },
    /// Return the documents containing every term
    Query {
        /// Index file written by `build`
        #[arg(long, env = "TABDEX_INDEX")]
        index: PathBuf,
        /// Free text, tokenized like the corpus, instead of exact terms
        #[arg(long, conflicts_with = "terms")]
        text: Option<String>,
        /// Exact terms, matched as given
        terms: Vec<String>,
    },
    /// Load, build, save, reload and run one query
    Demo {
        #[arg(long, env = "TABDEX_CORPUS")]
        corpus: PathBuf,
        #[arg(long, env = "TABDEX_INDEX", default_value = "inverted_index.json")]
        output: PathBuf,
        /// Terms to query after reloading
        #[arg(default_values_t = ["two".to_string(), "words".to_string()])]
        terms: Vec<String>,
    },
}

fn duplicate_policy(reject: bool) -> DuplicatePolicy {
    if reject { DuplicatePolicy::Reject } else { DuplicatePolicy::Overwrite }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { corpus, output, pretty, reject_duplicates } => {
            let (num_docs, stats) = build_index(&corpus, &output, pretty, duplicate_policy(reject_duplicates))?;
            tracing::info!(num_docs, num_terms = stats.num_terms, output = %output.display(), "index build complete");
            Ok(())
        }
        Commands::Query { index, text, terms } => {
            let ids = match text {
                Some(text) => search_index(&index, &text)?,
                None => query_index(&index, &terms)?,
            };
            println!("{}", serde_json::to_string(&ids)?);
            Ok(())
        }
        Commands::Demo { corpus, output, terms } => {
            let report = run(&Config::new(corpus, output, terms))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}
