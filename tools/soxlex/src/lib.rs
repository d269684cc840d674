//! `soxlex`: tokenize SDP, SIP and `SoX` documents from the command line.
//!
//! The binary is a thin wrapper over [`parse_args`] and [`run`]; everything
//! is exposed here so it can be tested without spawning a process.

mod error;
mod options;
mod output;

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Once};

use sox_lexer_core::{coverage_gap, Lexer, Token};
use sox_lexers::{all_lexers, find_lexer_by_name, find_lexer_for_filename};

pub use error::CliError;
pub use options::{parse_args, Command, Input, LexOptions, OutputFormat, USAGE};
pub use output::{write_lexer_list, write_stats, write_tokens};

static TRACING_INIT: Once = Once::new();

/// Install a stderr `tracing` subscriber, once, if `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

/// Execute a parsed command, writing its report to `out`.
pub fn execute(command: &Command, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        Command::Help => writeln!(out, "{USAGE}").map_err(CliError::Output),
        Command::List => write_lexer_list(out, &all_lexers()).map_err(CliError::Output),
        Command::Lex(options) => run(options, out),
    }
}

/// Tokenize the document described by `options` and write the report.
pub fn run(options: &LexOptions, out: &mut impl Write) -> Result<(), CliError> {
    let lexer = select_lexer(options)?;
    let text = read_input(&options.input)?;
    report(lexer.as_ref(), &text, options, out)
}

/// Explicit `--lexer` first, then the input's file name.
fn select_lexer(options: &LexOptions) -> Result<Arc<dyn Lexer>, CliError> {
    if let Some(name) = &options.lexer {
        return find_lexer_by_name(name).ok_or_else(|| CliError::UnknownLexer(name.clone()));
    }
    match &options.input {
        Input::Path(path) => find_lexer_for_filename(&path.to_string_lossy())
            .ok_or_else(|| CliError::NoLexerForFile(path.clone())),
        Input::Stdin => Err(CliError::Usage("reading from stdin requires --lexer".to_owned())),
    }
}

fn read_input(input: &Input) -> Result<String, CliError> {
    match input {
        Input::Path(path) => std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        }),
        Input::Stdin => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| CliError::Io {
                    path: PathBuf::from("-"),
                    source,
                })?;
            Ok(text)
        }
    }
}

fn report(
    lexer: &dyn Lexer,
    text: &str,
    options: &LexOptions,
    out: &mut impl Write,
) -> Result<(), CliError> {
    tracing::debug!(lexer = lexer.info().name, bytes = text.len(), "tokenizing");
    let mut tokens: Vec<Token<'_>> = lexer.tokens(text).collect();

    if options.check {
        if let Some(gap) = coverage_gap(text, 0, &tokens) {
            return Err(CliError::Coverage {
                expected: gap.expected,
                found: gap.found,
            });
        }
    }
    if let Some(kind) = options.only {
        tokens.retain(|token| token.kind.is_a(kind));
    }

    write_tokens(out, options.format, &tokens).map_err(CliError::Output)?;
    if options.stats {
        write_stats(out, &tokens).map_err(CliError::Output)?;
    }
    Ok(())
}
