//! Session Description Protocol (RFC 4566).
//!
//! SDP is line oriented: every line is `<type>=<value>`. The type letter and
//! `=` are classified; the value is opaque apart from embedded addresses,
//! which show up in `o=`, `u=` and `e=` lines.

use std::sync::LazyLock;

use sox_lexer_core::{Lexer, LexerInfo, Rule, RuleFlags, RuleSet, TokenKind, Tokens, ROOT};

static INFO: LexerInfo = LexerInfo {
    name: "SDP",
    aliases: &["sdp"],
    filenames: &["*.sdp"],
    mimetypes: &["application/sdp"],
};

static RULES: LazyLock<RuleSet<()>> = LazyLock::new(|| {
    RuleSet::builder(INFO.name)
        .flags(RuleFlags::MULTI_LINE)
        .state(
            ROOT,
            vec![
                // Blank line, or trailing blanks without a final newline.
                Rule::token(r"[^\S\n]*\n|[^\S\n]+\z", TokenKind::Whitespace),
                Rule::groups(r"([^\r\n])(=)", &[TokenKind::NameClass, TokenKind::Operator])
                    .push("value"),
                // Not a `<type>=` line.
                Rule::token(r"[^\n]*\n?", TokenKind::Text),
            ],
        )
        .state(
            "value",
            vec![
                Rule::token(r"\r?\n", TokenKind::Whitespace).pop(),
                Rule::token(r"sip:[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+", TokenKind::String),
                Rule::token(r"[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+", TokenKind::String),
                Rule::token(".", TokenKind::Literal),
            ],
        )
        .build()
        .unwrap_or_else(|err| panic!("SDP rules: {err}"))
});

/// Lexer for SDP session descriptions.
#[derive(Clone, Copy, Debug, Default)]
pub struct SdpLexer;

impl Lexer for SdpLexer {
    fn info(&self) -> &LexerInfo {
        &INFO
    }

    fn tokens_at<'t>(&self, text: &'t str, base: usize) -> Tokens<'t> {
        Box::new(RULES.tokenize(text, base, ()))
    }
}
