//! Object-safe lexer interface and the MIME registry capability.
//!
//! Concrete lexers wrap a `static` [`RuleSet`](crate::RuleSet) and hand out
//! boxed [`RuleStream`](crate::RuleStream)s. Because the returned stream only
//! borrows the input, a lexer can be looked up at run time (for example by the
//! content type of a message body) and driven through `&dyn Lexer`.

use std::sync::Arc;

/// A boxed, lazy token stream borrowing its input.
pub type Tokens<'t> = Box<dyn Iterator<Item = crate::Token<'t>> + 't>;

/// Discovery metadata a host tool uses to find a lexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LexerInfo {
    /// Human-readable name.
    pub name: &'static str,
    /// Short names accepted on the command line.
    pub aliases: &'static [&'static str],
    /// File name globs (`*.sdp`). Only a leading `*` is special.
    pub filenames: &'static [&'static str],
    /// MIME types of documents this lexer understands.
    pub mimetypes: &'static [&'static str],
}

impl LexerInfo {
    /// Case-insensitive alias match.
    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a.eq_ignore_ascii_case(alias))
    }

    /// Case-insensitive MIME type match.
    pub fn has_mimetype(&self, mimetype: &str) -> bool {
        self.mimetypes.iter().any(|m| m.eq_ignore_ascii_case(mimetype))
    }

    /// Does `file_name` (a bare name, not a path) match any filename glob?
    pub fn matches_filename(&self, file_name: &str) -> bool {
        self.filenames
            .iter()
            .any(|pattern| glob_matches(pattern, file_name))
    }
}

fn glob_matches(pattern: &str, file_name: &str) -> bool {
    match pattern.strip_prefix('*') {
        Some(suffix) => file_name
            .len()
            .checked_sub(suffix.len())
            .and_then(|start| file_name.get(start..))
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix)),
        None => pattern.eq_ignore_ascii_case(file_name),
    }
}

/// A tokenizer that can be invoked standalone or as a delegate.
pub trait Lexer: Send + Sync {
    fn info(&self) -> &LexerInfo;

    /// Tokenize `text`, whose first byte sits at `base` in the top-level
    /// input. Every token offset is absolute.
    ///
    /// Each call starts from a fresh state stack and context.
    fn tokens_at<'t>(&self, text: &'t str, base: usize) -> Tokens<'t>;

    /// Tokenize a whole document.
    fn tokens<'t>(&self, text: &'t str) -> Tokens<'t> {
        self.tokens_at(text, 0)
    }
}

/// Maps a MIME type to a lexer able to tokenize that content.
///
/// An unknown type is a normal outcome, not an error: callers fall back to
/// plain text.
pub trait LexerRegistry: Send + Sync {
    fn resolve(&self, mimetype: &str) -> Option<Arc<dyn Lexer>>;
}

/// A registry that knows no content types.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLexers;

impl LexerRegistry for NoLexers {
    fn resolve(&self, _mimetype: &str) -> Option<Arc<dyn Lexer>> {
        None
    }
}
