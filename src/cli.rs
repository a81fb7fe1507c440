// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use recipe_config::ModelConfig;

/// Output format for headless runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormatArg {
    /// The rendered history: "**You:**" query followed by "**Model:**" recipe.
    #[default]
    Markdown,
    /// JSON object with the query, raw reply, formatted reply and history.
    Json,
    /// Only the formatted recipe.
    Compact,
}

#[derive(Parser, Debug)]
#[command(
    name = "recipe-maker",
    about = "Suggest a recipe for some ingredients or a dish",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Ingredients or dish name, e.g. "chicken, rice" or "chocolate cake".
    /// Multiple words are joined with spaces.
    #[arg(value_name = "QUERY")]
    pub query: Vec<String>,

    /// Run one query and exit; the query comes from QUERY or stdin
    #[arg(long, short = 'H')]
    pub headless: bool,

    /// Model to use, e.g. "gemini-1.5-flash", "google/gemini-pro" or "mock"
    #[arg(long, short = 'M', env = "RECIPE_MAKER_MODEL")]
    pub model: Option<String>,

    /// Path to config file (overrides auto-discovery)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Replies shorter than this many words get an expansion sentence appended
    #[arg(long, value_name = "N")]
    pub min_words: Option<usize>,

    /// Output format for headless runs (markdown | json | compact)
    #[arg(long, value_enum, default_value = "markdown")]
    pub output_format: OutputFormatArg,

    /// Write the formatted recipe to a file after a headless run.
    /// Intermediate directories are created if needed.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print the effective configuration and exit
    ShowConfig,
}

impl Cli {
    /// Headless is triggered by --headless or when stdin is not a terminal.
    pub fn is_headless(&self) -> bool {
        self.headless || !std::io::stdin().is_terminal()
    }

    /// The positional query words joined with single spaces, if any.
    pub fn query_text(&self) -> Option<String> {
        let q = self.query.join(" ");
        if q.trim().is_empty() {
            None
        } else {
            Some(q)
        }
    }
}

/// Apply a `--model` value to a model config.
///
/// `provider/model` sets both, a bare provider keyword switches provider,
/// anything else is taken as a model name.
pub fn apply_model_override(cfg: &mut ModelConfig, value: &str) {
    const PROVIDER_KEYWORDS: &[&str] = &["mock", "google", "gemini"];
    if let Some((provider, model)) = value.split_once('/') {
        cfg.provider = provider.to_string();
        cfg.name = model.to_string();
    } else if PROVIDER_KEYWORDS.contains(&value) {
        cfg.provider = value.to_string();
    } else {
        cfg.name = value.to_string();
    }
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "recipe-maker", &mut std::io::stdout());
}
