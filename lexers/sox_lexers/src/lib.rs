//! SDP, SIP and `SoX` lexers.
//!
//! Each lexer is a `static` [`RuleSet`](sox_lexer_core::RuleSet) behind a small
//! type implementing [`Lexer`]. They compose by delegation:
//!
//! ```text
//! SoX ── <sox> body ──▶ SIP ── header values ──▶ MIME header value
//!                         └── body, by Content-Type ──▶ LexerRegistry ──▶ SDP, ...
//! ```
//!
//! The SIP body lexer is looked up at run time through a [`LexerRegistry`];
//! [`MimeRegistry::standard`] knows `application/sdp`. Use the [`catalog`]
//! functions to pick a lexer by alias or file name.

mod catalog;
mod header_value;
mod registry;
mod sdp;
mod sip;
mod sox;

pub use catalog::{
    all_lexers, find_lexer_by_name, find_lexer_for_filename, find_lexer_for_mimetype,
};
pub use header_value::HeaderValueLexer;
pub use registry::MimeRegistry;
pub use sdp::SdpLexer;
pub use sip::{SipContext, SipLexer};
pub use sox::SoxLexer;

pub use sox_lexer_core::{Lexer, LexerInfo, LexerRegistry, Token, TokenKind, Tokens};
