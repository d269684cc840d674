//! Tokens and token kinds.
//!
//! A [`Token`] classifies one contiguous span of the input. Offsets are byte
//! offsets into the *top-level* input, even when a token was produced by a
//! delegated lexer running over a sub-span.
//!
//! [`TokenKind`] follows the dotted naming scheme used by syntax highlighters
//! (`Name.Class`, `Comment.Preproc`, ...). Every kind knows its parent, so a
//! consumer can style `Keyword.Reserved` by falling back to `Keyword`.

use std::fmt;

/// A classified span of the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Token<'t> {
    /// Byte offset of `text` in the top-level input.
    pub offset: usize,
    pub kind: TokenKind,
    /// The covered input. Never empty.
    pub text: &'t str,
}

impl<'t> Token<'t> {
    #[inline]
    pub fn new(offset: usize, kind: TokenKind, text: &'t str) -> Self {
        Token { offset, kind, text }
    }

    /// Byte offset one past the end of this token.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// Classification tag attached to a token.
///
/// The set is open: new kinds may be added without a breaking change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum TokenKind {
    // Text
    Text,
    Whitespace,

    /// Input no rule of the current state could classify.
    Error,

    // Literals
    Literal,
    String,
    Number,

    Operator,

    // Keywords
    Keyword,
    KeywordReserved,

    // Names
    Name,
    NameAttribute,
    NameClass,
    NameEntity,
    NameException,
    NameFunction,
    NameNamespace,
    NameTag,

    // Comments
    Comment,
    CommentPreproc,
}

impl TokenKind {
    /// Every kind, in declaration order.
    pub const ALL: [TokenKind; 19] = [
        TokenKind::Text,
        TokenKind::Whitespace,
        TokenKind::Error,
        TokenKind::Literal,
        TokenKind::String,
        TokenKind::Number,
        TokenKind::Operator,
        TokenKind::Keyword,
        TokenKind::KeywordReserved,
        TokenKind::Name,
        TokenKind::NameAttribute,
        TokenKind::NameClass,
        TokenKind::NameEntity,
        TokenKind::NameException,
        TokenKind::NameFunction,
        TokenKind::NameNamespace,
        TokenKind::NameTag,
        TokenKind::Comment,
        TokenKind::CommentPreproc,
    ];

    /// Dotted, highlighter-style name of this kind.
    pub const fn name(self) -> &'static str {
        match self {
            TokenKind::Text => "Text",
            TokenKind::Whitespace => "Text.Whitespace",
            TokenKind::Error => "Error",
            TokenKind::Literal => "Literal",
            TokenKind::String => "Literal.String",
            TokenKind::Number => "Literal.Number",
            TokenKind::Operator => "Operator",
            TokenKind::Keyword => "Keyword",
            TokenKind::KeywordReserved => "Keyword.Reserved",
            TokenKind::Name => "Name",
            TokenKind::NameAttribute => "Name.Attribute",
            TokenKind::NameClass => "Name.Class",
            TokenKind::NameEntity => "Name.Entity",
            TokenKind::NameException => "Name.Exception",
            TokenKind::NameFunction => "Name.Function",
            TokenKind::NameNamespace => "Name.Namespace",
            TokenKind::NameTag => "Name.Tag",
            TokenKind::Comment => "Comment",
            TokenKind::CommentPreproc => "Comment.Preproc",
        }
    }

    /// The enclosing kind, or `None` for top-level kinds.
    pub const fn parent(self) -> Option<TokenKind> {
        match self {
            TokenKind::Whitespace => Some(TokenKind::Text),
            TokenKind::String | TokenKind::Number => Some(TokenKind::Literal),
            TokenKind::KeywordReserved => Some(TokenKind::Keyword),
            TokenKind::NameAttribute
            | TokenKind::NameClass
            | TokenKind::NameEntity
            | TokenKind::NameException
            | TokenKind::NameFunction
            | TokenKind::NameNamespace
            | TokenKind::NameTag => Some(TokenKind::Name),
            TokenKind::CommentPreproc => Some(TokenKind::Comment),
            TokenKind::Text
            | TokenKind::Error
            | TokenKind::Literal
            | TokenKind::Operator
            | TokenKind::Keyword
            | TokenKind::Name
            | TokenKind::Comment => None,
        }
    }

    /// Returns `true` if `self` is `ancestor` or nested somewhere below it.
    pub fn is_a(self, ancestor: TokenKind) -> bool {
        let mut kind = Some(self);
        while let Some(k) = kind {
            if k == ancestor {
                return true;
            }
            kind = k.parent();
        }
        false
    }

    /// Look up a kind by its dotted name. Accepts an optional `Token.` prefix.
    pub fn from_name(name: &str) -> Option<TokenKind> {
        let name = name.strip_prefix("Token.").unwrap_or(name);
        TokenKind::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
