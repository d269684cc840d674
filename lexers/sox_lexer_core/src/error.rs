//! Lexer definition errors.
//!
//! These are faults in a rule table, found when a [`RuleSet`](crate::RuleSet)
//! is built. Tokenizing itself never fails.

use thiserror::Error;

/// A rule table that cannot be turned into a working lexer.
#[derive(Debug, Error)]
pub enum LexerDefError {
    #[error("{lexer}: rule {index} of state `{state}` has an invalid pattern")]
    InvalidPattern {
        lexer: &'static str,
        state: &'static str,
        index: usize,
        #[source]
        source: regex::Error,
    },

    #[error("{lexer}: state `{state}` pushes undeclared state `{target}`")]
    UnknownState {
        lexer: &'static str,
        state: &'static str,
        target: &'static str,
    },

    #[error("{lexer}: state `{state}` is declared twice")]
    DuplicateState {
        lexer: &'static str,
        state: &'static str,
    },

    #[error("{lexer}: no `root` state declared")]
    MissingRoot { lexer: &'static str },
}
