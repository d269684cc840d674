use super::*;

fn text_only(name: &'static str) -> RuleSetBuilder<()> {
    RuleSet::builder(name).state(ROOT, vec![Rule::token(r"(?s).", TokenKind::Text)])
}

// === Validation ===

#[test]
fn builds_minimal_table() {
    let rules = text_only("plain").build();
    assert!(rules.is_ok());
    let rules = rules.unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(rules.name(), "plain");
    assert_eq!(rules.state_names().collect::<Vec<_>>(), vec!["root"]);
}

#[test]
fn missing_root_is_rejected() {
    let err = RuleSet::<()>::builder("rootless")
        .state("value", vec![Rule::token(".", TokenKind::Text)])
        .build()
        .err();
    assert!(matches!(
        err,
        Some(LexerDefError::MissingRoot { lexer: "rootless" })
    ));
}

#[test]
fn duplicate_state_is_rejected() {
    let err = text_only("dup")
        .state(ROOT, vec![Rule::token(".", TokenKind::Text)])
        .build()
        .err();
    assert!(matches!(
        err,
        Some(LexerDefError::DuplicateState { state: "root", .. })
    ));
}

#[test]
fn push_to_undeclared_state_is_rejected() {
    let err = RuleSet::<()>::builder("dangling")
        .state(ROOT, vec![Rule::token("<", TokenKind::NameTag).push("tag")])
        .build()
        .err();
    assert!(matches!(
        err,
        Some(LexerDefError::UnknownState {
            state: "root",
            target: "tag",
            ..
        })
    ));
}

#[test]
fn invalid_pattern_reports_state_and_index() {
    let err = RuleSet::<()>::builder("broken")
        .state(
            ROOT,
            vec![
                Rule::token("a", TokenKind::Text),
                Rule::token("(unclosed", TokenKind::Text),
            ],
        )
        .build()
        .err();
    match err {
        Some(LexerDefError::InvalidPattern { state, index, .. }) => {
            assert_eq!(state, "root");
            assert_eq!(index, 1);
        }
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
}

#[test]
fn error_messages_name_the_lexer() {
    let err = RuleSet::<()>::builder("SDP")
        .state("value", vec![])
        .build()
        .err()
        .map(|err| err.to_string());
    assert_eq!(err.as_deref(), Some("SDP: no `root` state declared"));
}

// === Flags ===

#[test]
fn patterns_are_anchored_at_cursor() {
    let rules = RuleSet::<()>::builder("anchored")
        .state(ROOT, vec![Rule::token("b", TokenKind::Keyword)])
        .build()
        .unwrap_or_else(|err| panic!("{err}"));
    let rule = &rules.state(rules.root()).rules[0];
    assert!(rule.regex.is_match("b"));
    assert!(!rule.regex.is_match("ab"));
}

#[test]
fn dot_all_flag_lets_dot_match_newline() {
    let plain = RuleSet::<()>::builder("plain")
        .state(ROOT, vec![Rule::token(".", TokenKind::Text)])
        .build()
        .unwrap_or_else(|err| panic!("{err}"));
    let dot_all = RuleSet::<()>::builder("dot-all")
        .flags(RuleFlags::DOT_ALL)
        .state(ROOT, vec![Rule::token(".", TokenKind::Text)])
        .build()
        .unwrap_or_else(|err| panic!("{err}"));

    assert!(!plain.state(plain.root()).rules[0].regex.is_match("\n"));
    assert!(dot_all.state(dot_all.root()).rules[0].regex.is_match("\n"));
}

#[test]
fn transitions_resolve_to_state_ids() {
    let rules = RuleSet::<()>::builder("two-states")
        .state(ROOT, vec![Rule::token("<", TokenKind::NameTag).push("tag")])
        .state("tag", vec![Rule::token(">", TokenKind::NameTag).pop()])
        .build()
        .unwrap_or_else(|err| panic!("{err}"));

    let root = rules.state(rules.root());
    assert_eq!(root.rules[0].next, Step::Push(StateId(1)));
    assert_eq!(rules.state(StateId(1)).rules[0].next, Step::Pop);
}
