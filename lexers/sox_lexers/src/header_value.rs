//! MIME header values.
//!
//! Used by the SIP lexer for the value part of every header line and folded
//! continuation line. Stateless: entity references and address-like words
//! are picked out, everything else is literal text.

use std::sync::LazyLock;

use sox_lexer_core::{Lexer, LexerInfo, Rule, RuleFlags, RuleSet, TokenKind, Tokens, ROOT};

static INFO: LexerInfo = LexerInfo {
    name: "MIME Header Value",
    aliases: &[],
    filenames: &[],
    mimetypes: &[],
};

static RULES: LazyLock<RuleSet<()>> = LazyLock::new(|| {
    RuleSet::builder(INFO.name)
        .flags(RuleFlags::DOT_ALL)
        .state(
            ROOT,
            vec![
                Rule::token(r"&\S*?;", TokenKind::NameEntity),
                // `[sip:]user@host`
                Rule::token(
                    r"(?:sip:)?[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+",
                    TokenKind::NameNamespace,
                ),
                Rule::token(".", TokenKind::Literal),
            ],
        )
        .build()
        .unwrap_or_else(|err| panic!("header value rules: {err}"))
});

/// Tokenizes a single header value.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeaderValueLexer;

impl Lexer for HeaderValueLexer {
    fn info(&self) -> &LexerInfo {
        &INFO
    }

    fn tokens_at<'t>(&self, text: &'t str, base: usize) -> Tokens<'t> {
        Box::new(RULES.tokenize(text, base, ()))
    }
}
