//! Lexis CLI
//!
//! Translate strings against the vocabularies configured in lexis.toml.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use lexis::{EnvLocale, Source, Translator};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::LexisConfig;

#[derive(Parser)]
#[command(name = "lexis")]
#[command(author, version, about = "Translate literal strings against vocabulary files", long_about = None)]
struct Cli {
    /// Config file, or a directory containing lexis.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured language
    #[arg(short, long, global = true)]
    language: Option<String>,

    /// Switch to the vocabulary matching the host locale, if any
    #[arg(long, global = true)]
    detect: bool,

    /// With --detect, use the host language even if no vocabulary matches it
    #[arg(long, global = true, requires = "detect")]
    force: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate one or more strings, printing one result per line
    Translate {
        /// Strings to translate
        #[arg(required = true)]
        text: Vec<String>,

        /// Uppercase the first letter of every result
        #[arg(long, conflicts_with = "lowercase")]
        capitalize: bool,

        /// Lowercase the first letter of every result
        #[arg(long)]
        lowercase: bool,

        /// Pass numeric arguments through as numbers
        #[arg(long)]
        numbers: bool,
    },

    /// List the loaded vocabularies
    Languages,

    /// Print one vocabulary as JSON
    Show {
        /// Collection key of the vocabulary
        tag: String,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = LexisConfig::discover(cli.config.as_deref())?;
    let mut translator = config.build(cli.language.as_deref())?;

    if cli.detect {
        if let Some(key) = translator.use_host_language(&EnvLocale, cli.force)? {
            info!("Using host language {}", key);
        }
    }

    match cli.command {
        Commands::Translate {
            text,
            capitalize,
            lowercase,
            numbers,
        } => {
            let cap = match (capitalize, lowercase) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            for line in translate_all(&translator, &text, cap, numbers)? {
                println!("{line}");
            }
        }
        Commands::Languages => {
            for line in list_languages(&translator)? {
                println!("{line}");
            }
        }
        Commands::Show { tag } => {
            let vocab = translator
                .get_dictionary(&tag)?
                .with_context(|| format!("No vocabulary named `{tag}`"))?;
            println!("{}", serde_json::to_string_pretty(vocab)?);
        }
    }

    Ok(())
}

fn translate_all(
    translator: &Translator,
    text: &[String],
    capitalize: Option<bool>,
    numbers: bool,
) -> Result<Vec<String>> {
    text.iter()
        .map(|s| {
            let source = match s.parse::<f64>() {
                Ok(n) if numbers => Source::from(n),
                _ => Source::from(s),
            };
            translator
                .translate(source, capitalize)
                .with_context(|| format!("Failed to translate `{s}`"))
        })
        .collect()
}

fn list_languages(translator: &Translator) -> Result<Vec<String>> {
    let active = translator.language()?.as_str().to_string();
    let mut out = Vec::new();
    for key in translator.available_languages()? {
        let Some(vocab) = translator.get_dictionary(key)? else {
            continue;
        };
        let marker = if key == active { "*" } else { " " };
        out.push(format!(
            "{marker} {key}\t{}\t{}\t{} pairs",
            vocab.name,
            vocab.tag,
            vocab.len()
        ));
    }
    Ok(out)
}
