// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::io::Write;

/// Write clean output to stdout.
pub fn write_stdout(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

/// Write a final newline to stdout if the text didn't already end with one.
pub fn finalise_stdout(text: &str) {
    if !text.ends_with('\n') {
        println!();
    }
}

/// Write a diagnostic / error message to stderr (never pollutes stdout).
pub fn write_stderr(msg: &str) {
    eprintln!("{msg}");
}

/// Write a progress fragment to stderr without a newline.
pub fn write_progress(msg: &str) {
    eprint!("{msg}");
    let _ = std::io::stderr().flush();
}
