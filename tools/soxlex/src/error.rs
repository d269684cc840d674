//! CLI errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("unknown lexer `{0}` (try --list)")]
    UnknownLexer(String),

    #[error("no lexer matches `{}`; choose one with --lexer", .0.display())]
    NoLexerForFile(PathBuf),

    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write output: {0}")]
    Output(#[source] io::Error),

    /// `found` is the offset of the offending token, `None` if the tokens
    /// stop short of the end of input.
    #[error("tokens do not cover the input at byte {expected}")]
    Coverage { expected: usize, found: Option<usize> },
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            _ => 1,
        }
    }
}
