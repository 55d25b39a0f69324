//! Word Filter - CLI
//!
//! Operator tool for the word collection: queries, validated additions,
//! removals and collection maintenance against the configured backend.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use word_filter::{
    commands::{
        DEFAULT_PAGE_LIMIT, INTERACTIVE_RESULT_CAP, cancel_on_ctrl_c, cleanup, collect_words,
        validate_collection,
    },
    config::{Config, LogFormat, StorageKind},
    core::FilterCriteria,
    output::{
        print_add_outcome, print_backup, print_batch_add_report, print_cache_stats,
        print_cleanup_report, print_filter_result, print_health, print_json, print_match_result,
        print_remove_report, print_screen_findings, print_stats, print_validation_record,
        print_validation_summary, print_word_page,
    },
    service::WordService,
};

#[derive(Parser)]
#[command(
    name = "word_filter",
    about = "Word collection with filter queries and dictionary-backed cleanup",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: word-filter.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log line format: text or json
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Use a local word file instead of the configured backend
    #[arg(short = 'w', long, global = true)]
    words_file: Option<PathBuf>,

    /// Dictionary lookup base URL
    #[arg(long, global = true)]
    dictionary_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter words by substring, affixes and length
    Filter {
        #[arg(long)]
        contains: Option<String>,
        #[arg(long)]
        starts_with: Option<String>,
        #[arg(long)]
        ends_with: Option<String>,
        #[arg(long)]
        exact_length: Option<usize>,
        #[arg(long)]
        min_length: Option<usize>,
        #[arg(long)]
        max_length: Option<usize>,
        /// Maximum words to show
        #[arg(short, long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: usize,
    },

    /// Collection size and length statistics
    Stats,

    /// Wildcard search: `?` matches any letter
    Interactive {
        /// Word length
        length: usize,
        /// Pattern such as `?a?`
        pattern: String,
        /// Maximum matches to show
        #[arg(short, long, default_value_t = INTERACTIVE_RESULT_CAP)]
        limit: usize,
    },

    /// Check whether a word is in the collection
    Check { word: String },

    /// Look a word up in the dictionary
    Validate { word: String },

    /// Add a word, validating it first
    Add {
        word: String,
        /// Add without a dictionary lookup
        #[arg(long)]
        skip_validation: bool,
    },

    /// Add many words without validation
    AddBatch {
        words: Vec<String>,
        /// Newline-delimited file of words
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Remove one or more words
    Remove {
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Validate every word in the collection
    ValidateCollection,

    /// Find invalid words and optionally remove them
    Cleanup {
        /// Remove the invalid words (default is a dry run)
        #[arg(long)]
        auto_remove: bool,
    },

    /// Reload the collection from storage
    Reload,

    /// All words of one length
    ByLength { length: usize },

    /// List words in store order
    All {
        #[arg(short, long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: usize,
    },

    /// Storage and collection health
    Health,

    /// Write a timestamped backup of the collection
    Backup,

    /// Validation cache counters for this process
    CacheStats,

    /// Flag words unsuitable for puzzles
    Screen {
        /// Words to screen (default: whole collection)
        words: Vec<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_process_env();
    if let Some(path) = &cli.words_file {
        config.storage.kind = StorageKind::File;
        config.storage.path.clone_from(path);
    }
    if let Some(url) = &cli.dictionary_url {
        config.dictionary.base_url.clone_from(url);
    }
    if let Some(level) = &cli.log_level {
        config.log_level.clone_from(level);
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    init_tracing(&config);

    let service = config
        .build_service()
        .context("failed to set up word service")?;

    // Reads degrade to an empty mirror; mutations fail on their own.
    if let Err(e) = service.reload().await {
        tracing::warn!(error = %e, "starting without stored words");
    }

    run(&cli, &service).await
}

#[allow(clippy::too_many_lines)] // One arm per command
async fn run(cli: &Cli, service: &WordService) -> Result<()> {
    let json = cli.json;
    match &cli.command {
        Commands::Filter {
            contains,
            starts_with,
            ends_with,
            exact_length,
            min_length,
            max_length,
            limit,
        } => {
            let criteria = FilterCriteria {
                contains: contains.clone(),
                starts_with: starts_with.clone(),
                ends_with: ends_with.clone(),
                exact_length: *exact_length,
                min_length: *min_length,
                max_length: *max_length,
                limit: Some(*limit),
            };
            let result = service.filter(&criteria);
            if json {
                print_json(&result)?;
            } else {
                print_filter_result(&result);
            }
        }
        Commands::Stats => {
            let stats = service.stats();
            if json {
                print_json(&stats)?;
            } else {
                print_stats(&stats);
            }
        }
        Commands::Interactive {
            length,
            pattern,
            limit,
        } => {
            let mut words = service.interactive(*length, pattern)?;
            let total = words.len();
            words.truncate(*limit);
            if json {
                print_json(&serde_json::json!({ "words": words, "total_matches": total }))?;
            } else {
                print_match_result(pattern, &words, total);
            }
        }
        Commands::Check { word } => {
            let exists = service.check(word);
            if json {
                print_json(&serde_json::json!({ "word": word, "exists": exists }))?;
            } else if exists {
                println!("'{word}' is in the collection");
            } else {
                println!("'{word}' is not in the collection");
            }
        }
        Commands::Validate { word } => {
            let record = service.validate(word).await;
            if json {
                print_json(&record)?;
            } else {
                print_validation_record(&record);
            }
        }
        Commands::Add {
            word,
            skip_validation,
        } => {
            let outcome = service.add(word, *skip_validation).await?;
            if json {
                print_json(&outcome)?;
            } else {
                print_add_outcome(&outcome);
            }
        }
        Commands::AddBatch { words, file } => {
            let words = collect_words(words, file.as_deref())?;
            let report = service.add_batch(words.as_slice()).await?;
            if json {
                print_json(&report)?;
            } else {
                print_batch_add_report(&report);
            }
        }
        Commands::Remove { words } => {
            let report = service.remove_batch(words.as_slice()).await?;
            if json {
                print_json(&report)?;
            } else {
                print_remove_report(&report);
            }
        }
        Commands::ValidateCollection => {
            let summary = validate_collection(service, &cancel_on_ctrl_c()).await;
            if json {
                print_json(&summary)?;
            } else {
                print_validation_summary(&summary);
            }
        }
        Commands::Cleanup { auto_remove } => {
            let report = cleanup(service, *auto_remove, &cancel_on_ctrl_c()).await?;
            if json {
                print_json(&report)?;
            } else {
                print_cleanup_report(&report);
            }
        }
        Commands::Reload => {
            let count = service.reload().await?;
            if json {
                print_json(&serde_json::json!({ "total_words": count }))?;
            } else {
                println!("Reloaded {count} words");
            }
        }
        Commands::ByLength { length } => {
            let words = service.by_length(*length)?;
            if json {
                print_json(&words)?;
            } else {
                print_match_result(&"?".repeat(*length), &words, words.len());
            }
        }
        Commands::All { limit } => {
            let page = service.all(Some(*limit));
            if json {
                print_json(&page)?;
            } else {
                print_word_page(&page);
            }
        }
        Commands::Health => {
            let health = service.health().await;
            if json {
                print_json(&health)?;
            } else {
                print_health(&health);
            }
        }
        Commands::Backup => {
            let report = service.backup().await?;
            if json {
                print_json(&report)?;
            } else {
                print_backup(&report);
            }
        }
        Commands::CacheStats => {
            let stats = service.cache_stats().await;
            if json {
                print_json(&stats)?;
            } else {
                print_cache_stats(&stats);
            }
        }
        Commands::Screen { words, file } => {
            let words = collect_words(words, file.as_deref())?;
            let cancel = cancel_on_ctrl_c();
            let findings = if words.is_empty() {
                service.screen(None, &cancel).await?
            } else {
                service.screen(Some(words.as_slice()), &cancel).await?
            };
            if json {
                print_json(&findings)?;
            } else {
                print_screen_findings(&findings);
            }
        }
    }
    Ok(())
}
