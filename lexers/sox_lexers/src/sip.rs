//! Session Initiation Protocol (RFC 3261) messages.
//!
//! A message is a start line, header lines, a blank line, then an optional
//! body:
//!
//! ```text
//! root ──start line──▶ headers ──blank line──▶ content
//! ```
//!
//! Header values go to [`HeaderValueLexer`]. The body goes to whatever lexer
//! the [`LexerRegistry`] returns for the message's `Content-Type`, which is
//! remembered in the stream's [`SipContext`] while the headers are scanned.
//! Without a content type, or when the registry has no lexer for it, the body
//! is one `Text` token.

use std::fmt;
use std::sync::{Arc, LazyLock};

use sox_lexer_core::{
    Emitter, Lexer, LexerInfo, LexerRegistry, Rule, RuleFlags, RuleMatch, RuleSet, RuleStream,
    TokenKind, Tokens, ROOT,
};

use crate::{HeaderValueLexer, MimeRegistry};

static INFO: LexerInfo = LexerInfo {
    name: "SIP",
    aliases: &["sip"],
    filenames: &[],
    mimetypes: &[],
};

/// `INVITE sip:bob@biloxi.example.com SIP/2.0`
const REQUEST_LINE: &str = r"([A-Z]+)( +)([^ ]+)( +)(SIP)(/)([0-9]+\.[0-9]+)(\r?\n|$)";
const REQUEST_GROUPS: &[TokenKind] = &[
    TokenKind::NameFunction,
    TokenKind::Text,
    TokenKind::NameNamespace,
    TokenKind::Text,
    TokenKind::KeywordReserved,
    TokenKind::Operator,
    TokenKind::Number,
    TokenKind::Text,
];

/// `SIP/2.0 180 Ringing`
const STATUS_LINE: &str = r"(SIP)(/)([0-9]+\.[0-9]+)( +)([0-9]{3})( +)([^\r\n]+)(\r?\n|$)";
const STATUS_GROUPS: &[TokenKind] = &[
    TokenKind::KeywordReserved,
    TokenKind::Operator,
    TokenKind::Number,
    TokenKind::Text,
    TokenKind::Number,
    TokenKind::Text,
    TokenKind::NameException,
    TokenKind::Text,
];

static RULES: LazyLock<RuleSet<SipContext>> = LazyLock::new(|| {
    RuleSet::builder(INFO.name)
        .flags(RuleFlags::DOT_ALL)
        .state(
            ROOT,
            vec![
                Rule::groups(REQUEST_LINE, REQUEST_GROUPS).push("headers"),
                Rule::groups(STATUS_LINE, STATUS_GROUPS).push("headers"),
                // Not a SIP start line.
                Rule::token(r"[^\n]*\n?", TokenKind::Text),
            ],
        )
        .state(
            "headers",
            vec![
                Rule::callback(r"([^\s:]+)( *)(:)( *)([^\r\n]*)(\r?\n|$)", header_line),
                Rule::callback(r"([\t ]+)([^\r\n]+)(\r?\n|$)", continuation_line),
                Rule::token(r"\r?\n", TokenKind::Text).push("content"),
                Rule::token(r"[^\n]*\n?", TokenKind::Text),
            ],
        )
        .state("content", vec![Rule::callback(".+", body)])
        .build()
        .unwrap_or_else(|err| panic!("SIP rules: {err}"))
});

/// Per-stream state of the SIP lexer.
pub struct SipContext {
    content_type: Option<String>,
    registry: Arc<dyn LexerRegistry>,
}

impl SipContext {
    pub fn new(registry: Arc<dyn LexerRegistry>) -> Self {
        SipContext {
            content_type: None,
            registry,
        }
    }

    /// The body's MIME type, from the last `Content-Type` header seen so far.
    ///
    /// Parameters (`; charset=...`) are stripped.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn set_content_type(&mut self, value: &str) {
        let value = value.trim();
        let mimetype = value.split_once(';').map_or(value, |(head, _)| head.trim());
        self.content_type = (!mimetype.is_empty()).then(|| mimetype.to_owned());
    }
}

impl fmt::Debug for SipContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SipContext")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

fn header_line<'t>(m: &RuleMatch<'t>, cx: &mut SipContext, out: &mut Emitter<'t>) {
    if m.group_text(1).eq_ignore_ascii_case("content-type") {
        cx.set_content_type(m.group_text(5));
    }
    out.group(m, 1, TokenKind::NameAttribute);
    out.group(m, 2, TokenKind::Text);
    out.group(m, 3, TokenKind::Operator);
    out.group(m, 4, TokenKind::Text);
    out.delegate_group(m, 5, &HeaderValueLexer);
    out.group(m, 6, TokenKind::Text);
}

/// A folded header line. Never updates the content type.
fn continuation_line<'t>(m: &RuleMatch<'t>, _cx: &mut SipContext, out: &mut Emitter<'t>) {
    out.group(m, 1, TokenKind::Text);
    out.delegate_group(m, 2, &HeaderValueLexer);
    out.group(m, 3, TokenKind::Text);
}

fn body<'t>(m: &RuleMatch<'t>, cx: &mut SipContext, out: &mut Emitter<'t>) {
    let lexer = cx
        .content_type
        .as_deref()
        .and_then(|mimetype| cx.registry.resolve(mimetype));
    if let Some(lexer) = lexer {
        out.delegate(lexer.as_ref(), m.offset(), m.text());
    } else {
        tracing::debug!(content_type = ?cx.content_type, "SIP body left as plain text");
        out.token(m.offset(), TokenKind::Text, m.text());
    }
}

/// Lexer for SIP requests and responses.
#[derive(Clone)]
pub struct SipLexer {
    registry: Arc<dyn LexerRegistry>,
}

impl SipLexer {
    /// A SIP lexer that looks up body lexers in `registry`.
    pub fn new(registry: Arc<dyn LexerRegistry>) -> Self {
        SipLexer { registry }
    }

    /// Like [`Lexer::tokens_at`], but returns the concrete stream so the
    /// [`SipContext`] can be inspected after (or while) scanning.
    pub fn scan<'t>(&self, text: &'t str, base: usize) -> RuleStream<'t, SipContext> {
        RULES.tokenize(text, base, SipContext::new(Arc::clone(&self.registry)))
    }
}

impl Default for SipLexer {
    /// Body lexers from [`MimeRegistry::standard`].
    fn default() -> Self {
        SipLexer::new(MimeRegistry::shared())
    }
}

impl fmt::Debug for SipLexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SipLexer").finish_non_exhaustive()
    }
}

impl Lexer for SipLexer {
    fn info(&self) -> &LexerInfo {
        &INFO
    }

    fn tokens_at<'t>(&self, text: &'t str, base: usize) -> Tokens<'t> {
        Box::new(self.scan(text, base))
    }
}
