use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::style::Stylize;
use freqdict_core::config::Config;
use freqdict_core::editing::EditOutcome;
use freqdict_core::query::{Direction, SortOrder, SortedView};
use freqdict_core::{CreateOutcome, DictionaryError, FrequencyDictionary, Language};
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "freqdict", about = "Per-language word frequency dictionaries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build dictionaries from the corpus directory
    Create {
        /// Language id, or "all"
        #[arg(long, default_value = "all")]
        language: String,
        /// Rebuild even if a snapshot exists
        #[arg(long)]
        force: bool,
    },
    /// Show total and unique word counts
    Stats { language: String },
    /// List words alphabetically or by frequency
    List {
        language: String,
        #[arg(long, value_enum, default_value_t = OrderArg::Freq)]
        order: OrderArg,
        /// Reverse the default direction
        #[arg(long)]
        reverse: bool,
    },
    /// Find words by prefix, most frequent first
    Search { language: String, prefix: String },
    /// Add a word with count 0
    Add { language: String, word: String },
    /// Delete a word and its count
    Delete {
        language: String,
        word: String,
        #[arg(long)]
        yes: bool,
    },
    /// Move a word's count onto another word
    Rename {
        language: String,
        wrong: String,
        correct: String,
    },
    /// Add the words of a text file
    Ingest { language: String, path: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Alpha,
    Freq,
}

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("freqdict_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let dictionary = FrequencyDictionary::new(config);

    match cli.command {
        Command::Create { language, force } => create(&dictionary, &language, force),
        Command::Stats { language } => {
            let language = Language::from_id(&language)?;
            let session = open(&dictionary, language)?;
            let summary = session.stats();
            println!("{}", format!("=== {} ===", language.native_name()).bold());
            println!("Total words:  {}", summary.total_words);
            println!("Unique words: {}", summary.unique_words);
            Ok(())
        }
        Command::List { language, order, reverse } => {
            let session = open(&dictionary, Language::from_id(&language)?)?;
            let (order, direction) = match (order, reverse) {
                (OrderArg::Alpha, false) => (SortOrder::Alphabetic, Direction::Ascending),
                (OrderArg::Alpha, true) => (SortOrder::Alphabetic, Direction::Descending),
                (OrderArg::Freq, false) => (SortOrder::Frequency, Direction::Descending),
                (OrderArg::Freq, true) => (SortOrder::Frequency, Direction::Ascending),
            };
            let view = session.list_sorted(order, direction);
            print_words(&view, dictionary.config().max_display_words);
            Ok(())
        }
        Command::Search { language, prefix } => {
            let session = open(&dictionary, Language::from_id(&language)?)?;
            let view = session.search_prefix(&prefix);
            println!("Words starting with '{}': {}", prefix.trim().to_lowercase(), view.len());
            print_words(&view, dictionary.config().max_search_results);
            Ok(())
        }
        Command::Add { language, word } => {
            let mut session = open(&dictionary, Language::from_id(&language)?)?;
            report(session.add(&word)?);
            Ok(())
        }
        Command::Delete { language, word, yes } => {
            let mut session = open(&dictionary, Language::from_id(&language)?)?;
            if !yes && !confirm(&format!("Delete '{}'? (y/N): ", word))? {
                println!("{}", "Cancelled".yellow());
                return Ok(());
            }
            report(session.delete(&word)?);
            Ok(())
        }
        Command::Rename { language, wrong, correct } => {
            let mut session = open(&dictionary, Language::from_id(&language)?)?;
            report(session.rename(&wrong, &correct)?);
            Ok(())
        }
        Command::Ingest { language, path } => {
            let mut session = open(&dictionary, Language::from_id(&language)?)?;
            let stats = session
                .ingest_file(&path)
                .with_context(|| format!("failed to ingest {}", path.display()))?;
            println!("{}", "=== Dictionary updated ===".green());
            println!("Words added:      {}", stats.words_added);
            println!("New unique words: {}", stats.new_unique_words);
            println!("Total:  {} -> {}", stats.total_before, stats.total_after);
            println!("Unique: {} -> {}", stats.unique_before, stats.unique_after);
            Ok(())
        }
    }
}

fn open(
    dictionary: &FrequencyDictionary,
    language: Language,
) -> Result<freqdict_core::DictionarySession<'_>> {
    with_create_hint(dictionary.open(language), language)
}

/// Points at `freqdict create` only when the snapshot is missing; every
/// other failure keeps its own message.
fn with_create_hint<T>(
    result: std::result::Result<T, DictionaryError>,
    language: Language,
) -> Result<T> {
    match result {
        Err(e @ DictionaryError::SnapshotNotFound(_)) => Err(e).with_context(|| {
            format!("run `freqdict create --language {}` first", language.id())
        }),
        other => Ok(other?),
    }
}

fn create(dictionary: &FrequencyDictionary, language: &str, force: bool) -> Result<()> {
    let results = if language.eq_ignore_ascii_case("all") {
        dictionary.create_all(force)
    } else {
        let language = Language::from_id(language)?;
        vec![(language, dictionary.create(language, force))]
    };

    let mut failures = 0;
    for (language, result) in results {
        match result {
            Ok(CreateOutcome::Created { summary, files_ingested, skipped }) => {
                println!(
                    "{:12}: {:>10} words ({:>8} unique) from {} files",
                    language.native_name().green(),
                    summary.total_words,
                    summary.unique_words,
                    files_ingested
                );
                for file in skipped {
                    println!("  {} {}", "skipped".yellow(), file.error);
                }
            }
            Ok(CreateOutcome::AlreadyPresent) => {
                println!("{:12}: already exists", language.native_name().dim());
            }
            Err(e) => {
                failures += 1;
                eprintln!("{:12}: {}", language.native_name().red(), e);
            }
        }
    }
    if failures > 0 {
        bail!("{} dictionaries could not be created", failures);
    }
    Ok(())
}

fn print_words(view: &SortedView<'_>, limit: usize) {
    for (i, (word, count)) in view.iter().take(limit).enumerate() {
        println!("{:3}. {:20} : {:>8}", i + 1, word, count);
    }
    if view.len() > limit {
        println!("{}", format!("... and {} more", view.len() - limit).dim());
    }
}

fn report(outcome: EditOutcome) {
    let message = match outcome {
        EditOutcome::Added { word } => format!("Added '{}'", word),
        EditOutcome::Deleted { word, count } => format!("Deleted '{}' ({} occurrences)", word, count),
        EditOutcome::Renamed { from, to, moved, merged: true } => {
            format!("'{}' merged into '{}' (count: {})", from, to, moved)
        }
        EditOutcome::Renamed { from, to, moved, merged: false } => {
            format!("'{}' -> '{}' (count: {})", from, to, moved)
        }
    };
    println!("{}", message.green());
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    stdout().flush()?;
    let mut input = String::new();
    stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
