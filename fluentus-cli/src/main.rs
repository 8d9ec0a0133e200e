mod check;
mod edit;
mod stats;
mod view;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use fluentus::TranslationStore;
use fluentus_cli::config::load_config;
use fluentus_cli::validation::{ValidationContext, validate_context};
use tracing_subscriber::EnvFilter;

use crate::check::run_check_command;
use crate::edit::{SetTarget, run_format_command, run_set_command};
use crate::stats::print_stats;
use crate::view::print_view;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The project folder holding one directory per locale
    #[arg(short, long, global = true, default_value = ".")]
    project: String,

    /// Settings file (defaults to fluentus.toml inside the project)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the locales of the project.
    Locales,

    /// View translations.
    View {
        /// Optional language code to filter entries by
        #[arg(short, long)]
        lang: Option<String>,

        /// Optional key to show alone
        #[arg(short, long)]
        key: Option<String>,

        /// Display full value without truncation (even in terminal)
        #[arg(long)]
        full: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Change one field of one translation and save.
    Set {
        /// The key to edit (`-name` for terms)
        #[arg(short, long)]
        key: String,

        /// The locale to edit
        #[arg(short, long)]
        lang: String,

        /// New value text
        #[arg(short, long)]
        value: Option<String>,

        /// New attribute value, as NAME=VALUE
        #[arg(short, long)]
        attribute: Option<String>,

        /// New comment; an empty string removes it
        #[arg(short, long)]
        comment: Option<String>,

        /// Set or clear the review flag
        #[arg(long, value_parser = clap::builder::BoolishValueParser::new())]
        needs_review: Option<bool>,

        /// Write the project under this folder instead of in place
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show translation statistics per locale.
    Stats {
        /// Optional language code to filter by
        #[arg(short, long)]
        lang: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Report text that does not parse. Fails if any is found.
    Check,

    /// Rewrite all files in the canonical layout.
    Format {
        /// Write the project under this folder instead of in place
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FLUENTUS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_project(project: &str, config: Option<&Path>) -> Result<TranslationStore, String> {
    let config = load_config(Path::new(project), config)?;
    TranslationStore::open(project, config).map_err(|e| format!("Failed to load project: {}", e))
}

fn run(args: Args) -> Result<(), String> {
    let mut context = ValidationContext::new().with_project(args.project.clone());
    match &args.commands {
        Commands::View { lang, key, .. } => {
            if let Some(lang) = lang {
                context = context.with_language_code(lang.clone());
            }
            if let Some(key) = key {
                context = context.with_key(key.clone());
            }
        }
        Commands::Set {
            key, lang, output, ..
        } => {
            context = context
                .with_key(key.clone())
                .with_language_code(lang.clone());
            if let Some(output) = output {
                context = context.with_output_dir(output.clone());
            }
        }
        Commands::Stats { lang: Some(lang), .. } => {
            context = context.with_language_code(lang.clone());
        }
        Commands::Format {
            output: Some(output),
        } => {
            context = context.with_output_dir(output.clone());
        }
        _ => {}
    }
    validate_context(&context)?;

    let mut store = open_project(&args.project, args.config.as_deref())?;

    match args.commands {
        Commands::Locales => {
            for locale in store.locales() {
                println!("{}", locale);
            }
            Ok(())
        }
        Commands::View {
            lang,
            key,
            full,
            json,
        } => print_view(&store, &lang, &key, full, json),
        Commands::Set {
            key,
            lang,
            value,
            attribute,
            comment,
            needs_review,
            output,
        } => {
            let target = SetTarget {
                value,
                attribute,
                comment,
                needs_review,
            };
            run_set_command(&mut store, &key, &lang, target, &output)
        }
        Commands::Stats { lang, json } => {
            print_stats(&store, &lang, json);
            Ok(())
        }
        Commands::Check => run_check_command(&store),
        Commands::Format { output } => run_format_command(&mut store, &output),
    }
}

fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}
