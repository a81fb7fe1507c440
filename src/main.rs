mod cli;
mod output;
mod render;
mod shell;

use std::io::{self, Read};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands, OutputFormatArg};
use output::{finalise_stdout, write_stdout};
use recipe_config::Config;
use recipe_core::{History, RecipeMaker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env before logging so RUST_LOG may come from it.
    let dotenv = dotenvy::dotenv();
    init_logging(cli.verbose);
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring .env: {e}"),
    }

    // Handle subcommands first
    if let Some(cmd) = &cli.command {
        match cmd {
            Commands::Completions { shell } => {
                cli::print_completions(*shell);
                return Ok(());
            }
            Commands::ShowConfig => {
                let config = load_config(&cli)?;
                println!("{}", serde_yaml::to_string(&config)?);
                return Ok(());
            }
        }
    }

    let config = load_config(&cli)?;
    let provider = recipe_model::from_config(&config.model)
        .context("failed to initialise model provider")?;
    debug!(provider = provider.name(), model = provider.model_name(), "model ready");
    let maker = RecipeMaker::new(Arc::from(provider), &config.recipe);

    if cli.is_headless() {
        run_headless(cli, maker).await
    } else {
        shell::run_interactive(cli.query_text(), &config, maker).await
    }
}

/// Config files merged with command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = recipe_config::load(cli.config.as_deref())?;
    if let Some(model) = &cli.model {
        cli::apply_model_override(&mut config.model, model);
    }
    if let Some(n) = cli.min_words {
        config.recipe.min_words = n;
    }
    Ok(config)
}

async fn run_headless(cli: Cli, mut maker: RecipeMaker) -> anyhow::Result<()> {
    let query = match cli.query_text() {
        Some(q) => q,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    if query.trim().is_empty() {
        anyhow::bail!("no query given: pass ingredients or a dish name as arguments or on stdin");
    }

    let mut history = History::new();
    let submission = maker.submit(&mut history, &query).await?;

    let text = match cli.output_format {
        OutputFormatArg::Markdown => render::render_history(&history),
        OutputFormatArg::Compact => submission.formatted_response.clone(),
        OutputFormatArg::Json => render::render_json(&submission, &history)?,
    };
    write_stdout(&text);
    finalise_stdout(&text);

    if let Some(path) = &cli.output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(path, &submission.formatted_response)
            .with_context(|| format!("writing recipe to {}", path.display()))?;
        debug!(path = %path.display(), "recipe written");
    }
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
