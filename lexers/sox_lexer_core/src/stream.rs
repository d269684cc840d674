//! The lazy token stream.
//!
//! [`RuleStream`] drives a [`RuleSet`] over one input span. It owns the state
//! stack, the cursor, the per-stream context, and a queue of produced but not
//! yet consumed output. Input is only examined when the queue runs dry, so a
//! consumer that stops early never pays for the rest of the input.
//!
//! # Delegation
//!
//! A rule action can hand a sub-span to another [`Lexer`] through
//! [`Emitter::delegate`]. The sub-stream is created with the sub-span's
//! absolute offset as its base, so its tokens come out already rebased, and
//! it is queued as a nested iterator: it advances only as the consumer pulls.
//!
//! # Progress
//!
//! - A zero-length match is accepted only if it changes the state stack, and
//!   at most once per cursor position. Otherwise the rule is skipped.
//! - If no rule matches, one character is emitted as [`TokenKind::Error`];
//!   a `\n` additionally resets the stack to the root state.
//! - Popping the root state is a rule table fault. Debug builds panic,
//!   release builds log it and keep the root state.

use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;

use regex::Captures;
use smallvec::{smallvec, SmallVec};

use crate::lexer::{Lexer, Tokens};
use crate::rule::{Action, RuleSet, StateId, Step};
use crate::token::{Token, TokenKind};

/// A successful rule match, with offsets in top-level coordinates.
pub struct RuleMatch<'t> {
    captures: Captures<'t>,
    offset: usize,
}

impl<'t> RuleMatch<'t> {
    /// Absolute offset of the match start.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The whole matched text.
    pub fn text(&self) -> &'t str {
        self.captures.get(0).map_or("", |m| m.as_str())
    }

    /// Capture group `index` with its absolute offset, if it participated.
    pub fn group(&self, index: usize) -> Option<(usize, &'t str)> {
        self.captures
            .get(index)
            .map(|m| (self.offset + m.start(), m.as_str()))
    }

    /// Text of capture group `index`, or `""` if it did not participate.
    pub fn group_text(&self, index: usize) -> &'t str {
        self.captures.get(index).map_or("", |m| m.as_str())
    }
}

impl fmt::Debug for RuleMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleMatch")
            .field("offset", &self.offset)
            .field("text", &self.text())
            .finish()
    }
}

enum Pending<'t> {
    Token(Token<'t>),
    Nested(Tokens<'t>),
}

/// Output queue handed to rule actions.
pub struct Emitter<'t> {
    queue: VecDeque<Pending<'t>>,
}

impl<'t> Emitter<'t> {
    fn new() -> Self {
        Emitter {
            queue: VecDeque::new(),
        }
    }

    /// Queue one token. Empty text is dropped.
    pub fn token(&mut self, offset: usize, kind: TokenKind, text: &'t str) {
        if !text.is_empty() {
            self.queue
                .push_back(Pending::Token(Token::new(offset, kind, text)));
        }
    }

    /// Queue capture group `index` of `m` as one token.
    pub fn group(&mut self, m: &RuleMatch<'t>, index: usize, kind: TokenKind) {
        if let Some((offset, text)) = m.group(index) {
            self.token(offset, kind, text);
        }
    }

    /// Queue the tokens `lexer` produces for `text`, which sits at `offset`
    /// in the top-level input.
    pub fn delegate(&mut self, lexer: &dyn Lexer, offset: usize, text: &'t str) {
        if text.is_empty() {
            return;
        }
        tracing::debug!(
            lexer = lexer.info().name,
            offset,
            len = text.len(),
            "delegating span"
        );
        self.queue
            .push_back(Pending::Nested(lexer.tokens_at(text, offset)));
    }

    /// Delegate capture group `index` of `m` to `lexer`.
    pub fn delegate_group(&mut self, m: &RuleMatch<'t>, index: usize, lexer: &dyn Lexer) {
        if let Some((offset, text)) = m.group(index) {
            self.delegate(lexer, offset, text);
        }
    }

    fn next_token(&mut self) -> Option<Token<'t>> {
        loop {
            match self.queue.pop_front()? {
                Pending::Token(token) => return Some(token),
                Pending::Nested(mut tokens) => {
                    if let Some(token) = tokens.next() {
                        self.queue.push_front(Pending::Nested(tokens));
                        return Some(token);
                    }
                }
            }
        }
    }
}

/// Lazy tokenization of one span by one [`RuleSet`].
pub struct RuleStream<'t, C> {
    rules: &'t RuleSet<C>,
    text: &'t str,
    /// Absolute offset of `text[0]`.
    base: usize,
    /// Cursor into `text`.
    pos: usize,
    stack: SmallVec<[StateId; 8]>,
    cx: C,
    out: Emitter<'t>,
    /// Cursor position of the last zero-length match, if that was the most
    /// recent match.
    empty_at: Option<usize>,
}

impl<'t, C> RuleStream<'t, C> {
    pub fn new(rules: &'t RuleSet<C>, text: &'t str, base: usize, cx: C) -> Self {
        RuleStream {
            rules,
            text,
            base,
            pos: 0,
            stack: smallvec![rules.root()],
            cx,
            out: Emitter::new(),
            empty_at: None,
        }
    }

    /// The per-stream context.
    pub fn context(&self) -> &C {
        &self.cx
    }

    /// Consume the stream, returning its context.
    pub fn into_context(self) -> C {
        self.cx
    }

    /// Name of the state on top of the stack.
    pub fn state(&self) -> &'static str {
        self.rules.state(self.current()).name
    }

    /// Number of states on the stack (at least 1).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn current(&self) -> StateId {
        self.stack.last().copied().unwrap_or(self.rules.root())
    }

    /// Apply the first matching rule of the current state at the cursor.
    fn step(&mut self) {
        let rules = self.rules;
        let text = self.text;
        let state = rules.state(self.current());
        let rest = &text[self.pos..];

        for rule in &state.rules {
            let Some(captures) = rule.regex.captures(rest) else {
                continue;
            };
            let len = captures.get(0).map_or(0, |m| m.end());
            if len == 0 && (rule.next == Step::Stay || self.empty_at == Some(self.pos)) {
                continue;
            }

            let m = RuleMatch {
                captures,
                offset: self.base + self.pos,
            };
            match &rule.action {
                Action::Token(kind) => self.out.token(m.offset(), *kind, m.text()),
                Action::ByGroups(kinds) => {
                    for (index, kind) in kinds.iter().enumerate() {
                        self.out.group(&m, index + 1, *kind);
                    }
                }
                Action::Callback(callback) => callback(&m, &mut self.cx, &mut self.out),
            }

            self.empty_at = (len == 0).then_some(self.pos);
            self.pos += len;
            self.transition(rule.next);
            return;
        }

        self.no_match(state.name);
    }

    fn transition(&mut self, step: Step) {
        match step {
            Step::Stay => {}
            Step::Push(id) => {
                self.stack.push(id);
                tracing::trace!(
                    lexer = self.rules.name(),
                    state = self.rules.state(id).name,
                    depth = self.stack.len(),
                    "push"
                );
            }
            Step::Pop => {
                debug_assert!(
                    self.stack.len() > 1,
                    "state stack underflow in lexer `{}`",
                    self.rules.name()
                );
                if self.stack.len() > 1 {
                    self.stack.pop();
                    tracing::trace!(
                        lexer = self.rules.name(),
                        state = self.state(),
                        depth = self.stack.len(),
                        "pop"
                    );
                } else {
                    tracing::warn!(
                        lexer = self.rules.name(),
                        offset = self.base + self.pos,
                        "pop on root state ignored"
                    );
                }
            }
        }
    }

    fn no_match(&mut self, state: &'static str) {
        let text = self.text;
        let rest = &text[self.pos..];
        let Some(ch) = rest.chars().next() else {
            return;
        };
        let len = ch.len_utf8();
        let offset = self.base + self.pos;
        tracing::debug!(
            lexer = self.rules.name(),
            state,
            offset,
            "no rule matched; emitting error token"
        );

        self.out.token(offset, TokenKind::Error, &rest[..len]);
        if ch == '\n' {
            self.stack.clear();
            self.stack.push(self.rules.root());
        }
        self.pos += len;
        self.empty_at = None;
    }
}

impl<'t, C> Iterator for RuleStream<'t, C> {
    type Item = Token<'t>;

    fn next(&mut self) -> Option<Token<'t>> {
        loop {
            if let Some(token) = self.out.next_token() {
                return Some(token);
            }
            if self.pos >= self.text.len() {
                return None;
            }
            self.step();
        }
    }
}

impl<C> FusedIterator for RuleStream<'_, C> {}

impl<C: fmt::Debug> fmt::Debug for RuleStream<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleStream")
            .field("lexer", &self.rules.name())
            .field("base", &self.base)
            .field("pos", &self.pos)
            .field("state", &self.state())
            .field("depth", &self.depth())
            .field("context", &self.cx)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
