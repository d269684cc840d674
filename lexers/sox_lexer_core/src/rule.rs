//! Rule tables.
//!
//! A lexer is a set of named states, each holding an ordered list of rules.
//! A rule pairs a regex with an [`Action`] and a [`Transition`]. Rules are
//! tried in declaration order and the first one that matches at the cursor
//! wins; there is no longest-match resolution.
//!
//! Tables are written with [`RuleSet::builder`] and compiled once by
//! [`RuleSetBuilder::build`], which validates state references and compiles
//! every pattern.
//!
//! # Anchoring
//!
//! Every pattern is compiled as `\A(?:pattern)` and matched against the
//! unconsumed remainder of the input. `^` and `$` therefore see the remainder,
//! not the whole document: a state that must only fire at line starts has to
//! be entered only at line starts.

use std::fmt;

use bitflags::bitflags;
use regex::{Regex, RegexBuilder};
use rustc_hash::FxHashMap;

use crate::error::LexerDefError;
use crate::stream::{Emitter, RuleMatch, RuleStream};
use crate::token::TokenKind;

/// Name of the state every stream starts in.
pub const ROOT: &str = "root";

bitflags! {
    /// Regex flags applied to every pattern of a rule set.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct RuleFlags: u8 {
        /// `^` and `$` also match at line boundaries.
        const MULTI_LINE = 1 << 0;
        /// `.` also matches `\n`.
        const DOT_ALL = 1 << 1;
    }
}

/// Rule action with side effects.
///
/// Receives the match, the stream's mutable context, and the output queue.
/// May emit any number of tokens (including delegated sub-streams) and may
/// update the context.
pub type Callback<C> = for<'t> fn(&RuleMatch<'t>, &mut C, &mut Emitter<'t>);

/// What a matching rule emits.
pub enum Action<C> {
    /// The whole match as one token.
    Token(TokenKind),
    /// Capture group `i + 1` as a token of kind `kinds[i]`. Empty or
    /// non-participating groups are skipped.
    ByGroups(&'static [TokenKind]),
    Callback(Callback<C>),
}

impl<C> fmt::Debug for Action<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Token(kind) => f.debug_tuple("Token").field(kind).finish(),
            Action::ByGroups(kinds) => f.debug_tuple("ByGroups").field(kinds).finish(),
            Action::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// State change applied after a rule's action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Push(&'static str),
    Pop,
}

/// One uncompiled rule.
#[derive(Debug)]
pub struct Rule<C> {
    pattern: &'static str,
    action: Action<C>,
    next: Transition,
}

impl<C> Rule<C> {
    /// Emit the whole match as `kind`.
    pub fn token(pattern: &'static str, kind: TokenKind) -> Self {
        Rule::new(pattern, Action::Token(kind))
    }

    /// Emit each capture group with its own kind.
    pub fn groups(pattern: &'static str, kinds: &'static [TokenKind]) -> Self {
        Rule::new(pattern, Action::ByGroups(kinds))
    }

    /// Run `callback` on the match.
    pub fn callback(pattern: &'static str, callback: Callback<C>) -> Self {
        Rule::new(pattern, Action::Callback(callback))
    }

    pub fn new(pattern: &'static str, action: Action<C>) -> Self {
        Rule {
            pattern,
            action,
            next: Transition::Stay,
        }
    }

    /// Push `state` after the action runs.
    #[must_use]
    pub fn push(mut self, state: &'static str) -> Self {
        self.next = Transition::Push(state);
        self
    }

    /// Pop the current state after the action runs.
    #[must_use]
    pub fn pop(mut self) -> Self {
        self.next = Transition::Pop;
        self
    }
}

/// Index of a state inside its [`RuleSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct StateId(u32);

/// Resolved transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Stay,
    Push(StateId),
    Pop,
}

pub(crate) struct CompiledRule<C> {
    pub(crate) regex: Regex,
    pub(crate) action: Action<C>,
    pub(crate) next: Step,
}

pub(crate) struct State<C> {
    pub(crate) name: &'static str,
    pub(crate) rules: Vec<CompiledRule<C>>,
}

/// A compiled lexer definition, generic over the per-stream context `C`.
///
/// Immutable once built; built-in lexers keep theirs in a `static`.
pub struct RuleSet<C> {
    name: &'static str,
    states: Vec<State<C>>,
    root: StateId,
}

impl<C> RuleSet<C> {
    /// Start a rule table for the lexer called `name`.
    pub fn builder(name: &'static str) -> RuleSetBuilder<C> {
        RuleSetBuilder {
            name,
            flags: RuleFlags::empty(),
            states: Vec::new(),
        }
    }

    /// Lexer name, used in diagnostics and logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Names of all states, in declaration order.
    pub fn state_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.states.iter().map(|state| state.name)
    }

    /// Tokenize `text` whose first byte sits at `base` in the top-level input.
    ///
    /// The stream is lazy: no input is examined until the first token is
    /// requested.
    pub fn tokenize<'t>(&'t self, text: &'t str, base: usize, cx: C) -> RuleStream<'t, C> {
        RuleStream::new(self, text, base, cx)
    }

    #[inline]
    pub(crate) fn root(&self) -> StateId {
        self.root
    }

    #[inline]
    pub(crate) fn state(&self, id: StateId) -> &State<C> {
        &self.states[id.0 as usize]
    }
}

impl<C> fmt::Debug for RuleSet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("name", &self.name)
            .field("states", &self.state_names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Builder for [`RuleSet`].
#[derive(Debug)]
pub struct RuleSetBuilder<C> {
    name: &'static str,
    flags: RuleFlags,
    states: Vec<(&'static str, Vec<Rule<C>>)>,
}

impl<C> RuleSetBuilder<C> {
    #[must_use]
    pub fn flags(mut self, flags: RuleFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Declare a state and its rules, in priority order.
    #[must_use]
    pub fn state(mut self, name: &'static str, rules: Vec<Rule<C>>) -> Self {
        self.states.push((name, rules));
        self
    }

    /// Resolve state references and compile every pattern.
    pub fn build(self) -> Result<RuleSet<C>, LexerDefError> {
        let lexer = self.name;

        let mut ids: FxHashMap<&'static str, StateId> = FxHashMap::default();
        for (index, &(state, _)) in self.states.iter().enumerate() {
            let id = StateId(u32::try_from(index).unwrap_or(u32::MAX));
            if ids.insert(state, id).is_some() {
                return Err(LexerDefError::DuplicateState { lexer, state });
            }
        }
        let root = *ids.get(ROOT).ok_or(LexerDefError::MissingRoot { lexer })?;

        let flags = self.flags;
        let states = self
            .states
            .into_iter()
            .map(|(state, rules)| {
                let rules = rules
                    .into_iter()
                    .enumerate()
                    .map(|(index, rule)| compile_rule(lexer, state, index, rule, flags, &ids))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(State { name: state, rules })
            })
            .collect::<Result<Vec<_>, LexerDefError>>()?;

        Ok(RuleSet {
            name: lexer,
            states,
            root,
        })
    }
}

fn compile_rule<C>(
    lexer: &'static str,
    state: &'static str,
    index: usize,
    rule: Rule<C>,
    flags: RuleFlags,
    ids: &FxHashMap<&'static str, StateId>,
) -> Result<CompiledRule<C>, LexerDefError> {
    let regex = RegexBuilder::new(&format!(r"\A(?:{})", rule.pattern))
        .multi_line(flags.contains(RuleFlags::MULTI_LINE))
        .dot_matches_new_line(flags.contains(RuleFlags::DOT_ALL))
        .build()
        .map_err(|source| LexerDefError::InvalidPattern {
            lexer,
            state,
            index,
            source,
        })?;

    let next = match rule.next {
        Transition::Stay => Step::Stay,
        Transition::Pop => Step::Pop,
        Transition::Push(target) => match ids.get(target) {
            Some(id) => Step::Push(*id),
            None => {
                return Err(LexerDefError::UnknownState {
                    lexer,
                    state,
                    target,
                })
            }
        },
    };

    Ok(CompiledRule {
        regex,
        action: rule.action,
        next,
    })
}

#[cfg(test)]
mod tests;
