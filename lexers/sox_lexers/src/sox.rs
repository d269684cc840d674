//! SIP over XMPP (`SoX`).
//!
//! An XML stream in which `<sox>` elements carry raw SIP messages. Markup is
//! highlighted much like XML; the content of a `<sox>` element, up to its
//! closing tag, is handed to the [`SipLexer`].

use std::sync::{Arc, LazyLock};

use sox_lexer_core::{
    Emitter, Lexer, LexerInfo, LexerRegistry, Rule, RuleFlags, RuleMatch, RuleSet, TokenKind,
    Tokens, ROOT,
};

use crate::SipLexer;

static INFO: LexerInfo = LexerInfo {
    name: "SoX",
    aliases: &["sox"],
    filenames: &["*.sox"],
    mimetypes: &[],
};

static RULES: LazyLock<RuleSet<SipLexer>> = LazyLock::new(|| {
    RuleSet::builder(INFO.name)
        .flags(RuleFlags::MULTI_LINE | RuleFlags::DOT_ALL)
        .state(
            ROOT,
            vec![
                Rule::token("[^<&]+", TokenKind::Text),
                Rule::token(r"&\S*?;", TokenKind::NameEntity),
                Rule::token(r"<!\[CDATA\[.*?\]\]>", TokenKind::CommentPreproc),
                Rule::token("<!--", TokenKind::Comment).push("comment"),
                Rule::token(r"<\?.*?\?>", TokenKind::CommentPreproc),
                Rule::token("<![^>]*>", TokenKind::CommentPreproc),
                Rule::token(r"<\s*sox\b", TokenKind::NameTag).push("sox"),
                Rule::token(r"<\s*[\w:.-]+", TokenKind::NameTag).push("tag"),
                Rule::token(r"<\s*/\s*[\w:.-]+\s*>", TokenKind::NameTag),
                // Stray `<` or `&`.
                Rule::token(".", TokenKind::Text),
            ],
        )
        .state(
            "comment",
            vec![
                Rule::token("[^-]+", TokenKind::Comment),
                Rule::token("-->", TokenKind::Comment).pop(),
                Rule::token("-", TokenKind::Comment),
            ],
        )
        .state(
            "sox",
            vec![
                Rule::token(r"\s+", TokenKind::Text),
                Rule::token(r"[\w.:-]+\s*=", TokenKind::NameAttribute).push("attr"),
                Rule::callback(r"(\s*>)(\s*)(.*?)(<\s*/\s*sox\s*>|\z)", sox_body).pop(),
                Rule::token(r"/\s*>", TokenKind::NameTag).pop(),
                Rule::token(".", TokenKind::Text),
            ],
        )
        .state(
            "tag",
            vec![
                Rule::token(r"\s+", TokenKind::Text),
                Rule::token(r"[\w.:-]+\s*=", TokenKind::NameAttribute).push("attr"),
                Rule::token(r"/?\s*>", TokenKind::NameTag).pop(),
                // Attribute without a value.
                Rule::token(r"[^\s/>=]+", TokenKind::NameAttribute),
                Rule::token(".", TokenKind::Text),
            ],
        )
        .state(
            "attr",
            vec![
                Rule::token(r"\s+", TokenKind::Text),
                Rule::token(r#"".*?""#, TokenKind::String).pop(),
                Rule::token("'.*?'", TokenKind::String).pop(),
                Rule::token(r"[^\s>]+", TokenKind::String).pop(),
                // `name=` with no value before `>`.
                Rule::token("", TokenKind::String).pop(),
            ],
        )
        .build()
        .unwrap_or_else(|err| panic!("SoX rules: {err}"))
});

/// `>` of the `<sox>` start tag, the SIP message, and `</sox>`.
///
/// An unclosed element runs to the end of input.
fn sox_body<'t>(m: &RuleMatch<'t>, sip: &mut SipLexer, out: &mut Emitter<'t>) {
    out.group(m, 1, TokenKind::NameTag);
    out.group(m, 2, TokenKind::Whitespace);
    out.delegate_group(m, 3, &*sip);
    out.group(m, 4, TokenKind::NameTag);
}

/// Lexer for `SoX` documents.
#[derive(Clone, Debug, Default)]
pub struct SoxLexer {
    sip: SipLexer,
}

impl SoxLexer {
    /// A `SoX` lexer whose embedded SIP lexer looks up body lexers in
    /// `registry`.
    pub fn new(registry: Arc<dyn LexerRegistry>) -> Self {
        SoxLexer {
            sip: SipLexer::new(registry),
        }
    }
}

impl Lexer for SoxLexer {
    fn info(&self) -> &LexerInfo {
        &INFO
    }

    fn tokens_at<'t>(&self, text: &'t str, base: usize) -> Tokens<'t> {
        Box::new(RULES.tokenize(text, base, self.sip.clone()))
    }
}
