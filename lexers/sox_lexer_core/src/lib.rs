//! State-stack regex rule engine.
//!
//! This crate is the substrate the SDP, SIP and `SoX` lexers are built on. It
//! has no knowledge of any protocol.
//!
//! # Architecture
//!
//! ```text
//! RuleSet::builder() → RuleSet<C> (static) → RuleStream<'t, C> → Token<'t>
//!                                                 │
//!                                                 └─ Emitter::delegate → dyn Lexer → Tokens<'t>
//! ```
//!
//! - [`RuleSet`]: named states of ordered `(regex, action, transition)` rules.
//! - [`RuleStream`]: lazy iterator with a state stack and a per-stream
//!   context `C`, written by rule callbacks and readable afterwards.
//! - [`Lexer`]: object-safe wrapper so lexers can be chosen at run time and
//!   nested inside each other.
//! - [`LexerRegistry`]: MIME type → lexer lookup, injected by the caller.
//!
//! Tokenizing never fails. Every token sequence partitions its input; see
//! [`coverage_gap`].

mod coverage;
mod error;
mod lexer;
mod rule;
mod stream;
mod token;

pub use coverage::{concat_text, coverage_gap, CoverageGap};
pub use error::LexerDefError;
pub use lexer::{Lexer, LexerInfo, LexerRegistry, NoLexers, Tokens};
pub use rule::{Action, Callback, Rule, RuleFlags, RuleSet, RuleSetBuilder, Transition, ROOT};
pub use stream::{Emitter, RuleMatch, RuleStream};
pub use token::{Token, TokenKind};
