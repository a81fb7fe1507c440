// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Interactive line-oriented shell.
//!
//! One query is read, submitted and rendered before the next is read.  Ctrl-C
//! abandons an in-flight request; Ctrl-C at the prompt, `quit`, or end of
//! input leaves the shell.

use anyhow::Context;
use recipe_config::Config;
use recipe_core::{History, RecipeMaker};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::output::{write_progress, write_stderr, write_stdout};
use crate::render;

/// What a line typed at the prompt asks for.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Skip,
    Quit,
    Query(&'a str),
}

/// Blank and quit checks look at the trimmed line; a query is passed on
/// exactly as typed.
fn classify(line: &str) -> Input<'_> {
    match line.trim() {
        "" => Input::Skip,
        "quit" | "exit" | ":q" => Input::Quit,
        _ => Input::Query(line),
    }
}

pub async fn run_interactive(
    initial_query: Option<String>,
    config: &Config,
    mut maker: RecipeMaker,
) -> anyhow::Result<()> {
    if config.display.banner {
        write_stdout(&render::banner());
        write_stdout("\n");
    }

    let mut history = History::new();
    if let Some(q) = initial_query {
        submit_and_render(&mut maker, &mut history, &q, config).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write_stdout(render::INPUT_PROMPT);
        let line = tokio::select! {
            line = lines.next_line() => line.context("reading stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            write_stdout("\n");
            break;
        };
        match classify(&line) {
            Input::Skip => continue,
            Input::Quit => break,
            Input::Query(q) => submit_and_render(&mut maker, &mut history, q, config).await,
        }
    }
    debug!("interactive session ended");
    Ok(())
}

async fn submit_and_render(
    maker: &mut RecipeMaker,
    history: &mut History,
    query: &str,
    config: &Config,
) {
    write_progress("Fetching your recipe...");
    let outcome = tokio::select! {
        res = maker.submit_with(&mut *history, query, |_| write_progress(".")) => Some(res),
        _ = tokio::signal::ctrl_c() => None,
    };
    write_progress("\n");

    match outcome {
        Some(Ok(_)) => {
            write_stderr("Recipe fetched successfully! 🎉");
            write_stdout(&render::render_history(history));
            if config.display.footer {
                write_stdout("\n");
                write_stdout(render::footer());
            }
            write_stdout("\n");
        }
        Some(Err(e)) => write_stderr(&format!("[recipe-maker:error] {e}")),
        None => write_stderr("[recipe-maker] request cancelled"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(classify(""), Input::Skip);
        assert_eq!(classify("   \t"), Input::Skip);
    }

    #[test]
    fn quit_words_end_the_session() {
        for w in ["quit", "exit", ":q", "  quit  "] {
            assert_eq!(classify(w), Input::Quit);
        }
    }

    #[test]
    fn queries_are_passed_as_typed() {
        assert_eq!(classify("  chicken, rice "), Input::Query("  chicken, rice "));
        assert_eq!(classify("chocolate cake"), Input::Query("chocolate cake"));
    }
}
