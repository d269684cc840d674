use std::sync::LazyLock;

use pretty_assertions::assert_eq;

use super::*;
use crate::{coverage_gap, LexerInfo, Rule, RuleFlags, ROOT};

fn build<C>(builder: crate::RuleSetBuilder<C>) -> RuleSet<C> {
    builder.build().unwrap_or_else(|err| panic!("{err}"))
}

fn pairs<'t>(tokens: impl IntoIterator<Item = Token<'t>>) -> Vec<(usize, TokenKind, &'t str)> {
    tokens
        .into_iter()
        .map(|token| (token.offset, token.kind, token.text))
        .collect()
}

// A tiny delegate: lowercase words are keywords, anything else is text.
static WORDS: LazyLock<RuleSet<()>> = LazyLock::new(|| {
    build(RuleSet::builder("words").state(
        ROOT,
        vec![
            Rule::token("[a-z]+", TokenKind::Keyword),
            Rule::token("(?s).", TokenKind::Text),
        ],
    ))
});

static WORDS_INFO: LexerInfo = LexerInfo {
    name: "Words",
    aliases: &["words"],
    filenames: &[],
    mimetypes: &["text/x-words"],
};

struct Words;

impl Lexer for Words {
    fn info(&self) -> &LexerInfo {
        &WORDS_INFO
    }

    fn tokens_at<'t>(&self, text: &'t str, base: usize) -> Tokens<'t> {
        Box::new(WORDS.tokenize(text, base, ()))
    }
}

// === Rule order and states ===

#[test]
fn first_matching_rule_wins() {
    let rules = build(RuleSet::<()>::builder("order").state(
        ROOT,
        vec![
            Rule::token("ab", TokenKind::Keyword),
            Rule::token("abc", TokenKind::Name),
            Rule::token("(?s).", TokenKind::Text),
        ],
    ));
    assert_eq!(
        pairs(rules.tokenize("abc", 0, ())),
        vec![(0, TokenKind::Keyword, "ab"), (2, TokenKind::Text, "c")]
    );
}

#[test]
fn push_and_pop_switch_rule_lists() {
    let rules = build(
        RuleSet::<()>::builder("tags")
            .state(
                ROOT,
                vec![
                    Rule::token("<", TokenKind::NameTag).push("tag"),
                    Rule::token("[^<]+", TokenKind::Text),
                ],
            )
            .state(
                "tag",
                vec![
                    Rule::token("[a-z]+", TokenKind::NameTag),
                    Rule::token(r"\s+", TokenKind::Whitespace),
                    Rule::token(">", TokenKind::NameTag).pop(),
                ],
            ),
    );
    let mut stream = rules.tokenize("hi <b >x", 0, ());
    let tokens: Vec<_> = stream.by_ref().collect();
    assert_eq!(
        pairs(tokens),
        vec![
            (0, TokenKind::Text, "hi "),
            (3, TokenKind::NameTag, "<"),
            (4, TokenKind::NameTag, "b"),
            (5, TokenKind::Whitespace, " "),
            (6, TokenKind::NameTag, ">"),
            (7, TokenKind::Text, "x"),
        ]
    );
    assert_eq!(stream.state(), "root");
    assert_eq!(stream.depth(), 1);
}

#[test]
fn by_groups_skips_empty_groups() {
    let rules = build(RuleSet::<()>::builder("groups").state(
        ROOT,
        vec![
            Rule::groups(
                "(a)( *)(=)",
                &[TokenKind::NameClass, TokenKind::Text, TokenKind::Operator],
            ),
            Rule::token("(?s).", TokenKind::Text),
        ],
    ));
    assert_eq!(
        pairs(rules.tokenize("a=", 0, ())),
        vec![(0, TokenKind::NameClass, "a"), (1, TokenKind::Operator, "=")]
    );
}

#[test]
fn flags_apply_to_every_rule() {
    let rules = build(
        RuleSet::<()>::builder("dot-all")
            .flags(RuleFlags::DOT_ALL)
            .state(ROOT, vec![Rule::token(".+", TokenKind::Text)]),
    );
    assert_eq!(
        pairs(rules.tokenize("a\nb", 0, ())),
        vec![(0, TokenKind::Text, "a\nb")]
    );
}

// === Context ===

#[derive(Debug, Default)]
struct WordCount {
    words: usize,
}

fn count_word<'t>(m: &RuleMatch<'t>, cx: &mut WordCount, out: &mut Emitter<'t>) {
    cx.words += 1;
    out.token(m.offset(), TokenKind::Name, m.text());
}

#[test]
fn callbacks_update_stream_context() {
    let rules = build(RuleSet::<WordCount>::builder("count").state(
        ROOT,
        vec![
            Rule::callback("[a-z]+", count_word),
            Rule::token("(?s).", TokenKind::Whitespace),
        ],
    ));
    let mut stream = rules.tokenize("one two three", 0, WordCount::default());
    assert_eq!(stream.by_ref().count(), 5);
    assert_eq!(stream.context().words, 3);
    assert_eq!(stream.into_context().words, 3);
}

#[test]
fn contexts_are_not_shared_between_streams() {
    let rules = build(RuleSet::<WordCount>::builder("count").state(
        ROOT,
        vec![
            Rule::callback("[a-z]+", count_word),
            Rule::token("(?s).", TokenKind::Whitespace),
        ],
    ));
    let mut first = rules.tokenize("a b", 0, WordCount::default());
    first.by_ref().for_each(drop);
    let mut second = rules.tokenize("c", 0, WordCount::default());
    second.by_ref().for_each(drop);
    assert_eq!(first.context().words, 2);
    assert_eq!(second.context().words, 1);
}

// === Delegation ===

fn bracketed<'t>(m: &RuleMatch<'t>, _cx: &mut (), out: &mut Emitter<'t>) {
    out.group(m, 1, TokenKind::Operator);
    out.delegate_group(m, 2, &Words);
    out.group(m, 3, TokenKind::Operator);
}

static BRACKETS: LazyLock<RuleSet<()>> = LazyLock::new(|| {
    build(RuleSet::builder("brackets").state(
        ROOT,
        vec![
            Rule::callback(r"(\[)([^\]]*)(\])", bracketed),
            Rule::token("(?s).", TokenKind::Text),
        ],
    ))
});

#[test]
fn delegated_tokens_are_spliced_in_place() {
    assert_eq!(
        pairs(BRACKETS.tokenize("x[ab cd]y", 0, ())),
        vec![
            (0, TokenKind::Text, "x"),
            (1, TokenKind::Operator, "["),
            (2, TokenKind::Keyword, "ab"),
            (4, TokenKind::Text, " "),
            (5, TokenKind::Keyword, "cd"),
            (7, TokenKind::Operator, "]"),
            (8, TokenKind::Text, "y"),
        ]
    );
}

#[test]
fn delegated_offsets_follow_stream_base() {
    let tokens: Vec<_> = BRACKETS.tokenize("[ab]", 100, ()).collect();
    assert_eq!(
        pairs(tokens.iter().copied()),
        vec![
            (100, TokenKind::Operator, "["),
            (101, TokenKind::Keyword, "ab"),
            (103, TokenKind::Operator, "]"),
        ]
    );
    assert_eq!(coverage_gap("[ab]", 100, &tokens), None);
}

#[test]
fn empty_delegated_span_emits_nothing() {
    assert_eq!(
        pairs(BRACKETS.tokenize("[]", 0, ())),
        vec![(0, TokenKind::Operator, "["), (1, TokenKind::Operator, "]")]
    );
}

// === Laziness ===

#[test]
fn stopping_early_leaves_input_unscanned() {
    let mut stream = WORDS.tokenize("aaa bbb ccc", 0, ());
    let first = stream.next();
    assert_eq!(first, Some(Token::new(0, TokenKind::Keyword, "aaa")));
    assert_eq!(stream.pos, 3);
}

#[test]
fn exhausted_stream_stays_exhausted() {
    let mut stream = WORDS.tokenize("a", 0, ());
    assert!(stream.next().is_some());
    assert_eq!(stream.next(), None);
    assert_eq!(stream.next(), None);
}

#[test]
fn empty_input_yields_no_tokens() {
    assert_eq!(WORDS.tokenize("", 0, ()).count(), 0);
}

// === Progress ===

#[test]
fn zero_length_pop_returns_to_previous_state() {
    let rules = build(
        RuleSet::<()>::builder("attr")
            .state(
                ROOT,
                vec![
                    Rule::token("=", TokenKind::Operator).push("value"),
                    Rule::token("(?s).", TokenKind::Text),
                ],
            )
            .state(
                "value",
                vec![
                    Rule::token("[a-z]+", TokenKind::String).pop(),
                    Rule::token("", TokenKind::Text).pop(),
                ],
            ),
    );
    assert_eq!(
        pairs(rules.tokenize("=1=a", 0, ())),
        vec![
            (0, TokenKind::Operator, "="),
            (1, TokenKind::Text, "1"),
            (2, TokenKind::Operator, "="),
            (3, TokenKind::String, "a"),
        ]
    );
}

#[test]
fn zero_length_rules_never_loop() {
    let rules = build(
        RuleSet::<()>::builder("ping-pong")
            .state(
                ROOT,
                vec![
                    Rule::token("", TokenKind::Text).push("other"),
                    Rule::token("(?s).", TokenKind::Text),
                ],
            )
            .state("other", vec![Rule::token("", TokenKind::Text).pop()]),
    );
    let tokens: Vec<_> = rules.tokenize("xy", 0, ()).collect();
    assert_eq!(coverage_gap("xy", 0, &tokens), None);
    assert_eq!(
        pairs(tokens),
        vec![(0, TokenKind::Error, "x"), (1, TokenKind::Text, "y")]
    );
}

#[test]
fn unmatched_input_becomes_error_tokens() {
    let rules = build(
        RuleSet::<()>::builder("strict").state(ROOT, vec![Rule::token("[a-z]+", TokenKind::Keyword)]),
    );
    assert_eq!(
        pairs(rules.tokenize("ab1é", 0, ())),
        vec![
            (0, TokenKind::Keyword, "ab"),
            (2, TokenKind::Error, "1"),
            (3, TokenKind::Error, "é"),
        ]
    );
}

#[test]
fn unmatched_newline_resets_to_root() {
    let rules = build(
        RuleSet::<()>::builder("reset")
            .state(
                ROOT,
                vec![
                    Rule::token(r"\(", TokenKind::Operator).push("inner"),
                    Rule::token("(?s).", TokenKind::Text),
                ],
            )
            .state("inner", vec![Rule::token("[a-z]", TokenKind::Name)]),
    );
    let mut stream = rules.tokenize("(a\nb", 0, ());
    let tokens: Vec<_> = stream.by_ref().collect();
    assert_eq!(
        pairs(tokens),
        vec![
            (0, TokenKind::Operator, "("),
            (1, TokenKind::Name, "a"),
            (2, TokenKind::Error, "\n"),
            (3, TokenKind::Text, "b"),
        ]
    );
    assert_eq!(stream.depth(), 1);
}

fn over_popping() -> RuleSet<()> {
    build(RuleSet::<()>::builder("over-pop").state(
        ROOT,
        vec![
            Rule::token("x", TokenKind::Text).pop(),
            Rule::token("(?s).", TokenKind::Text),
        ],
    ))
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "state stack underflow")]
fn popping_root_panics_in_debug_builds() {
    let rules = over_popping();
    rules.tokenize("x", 0, ()).for_each(drop);
}

#[test]
#[cfg(not(debug_assertions))]
fn popping_root_is_ignored_in_release_builds() {
    let rules = over_popping();
    let mut stream = rules.tokenize("xy", 0, ());
    assert_eq!(stream.by_ref().count(), 2);
    assert_eq!(stream.state(), "root");
}
