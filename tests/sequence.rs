//! Stage partitioning and sequence-rule matching.

use jsgram::{Error, Expansion, Rule, SequenceRule, StageKind};

fn info(expansion: Expansion) -> Vec<StageKind> {
    SequenceRule::hidden("test", expansion)
        .unwrap()
        .expansion_sequence_info()
}

#[test]
fn stage_info() {
    use StageKind::{DictationOnly, JsgfOnly};

    assert_eq!(info(Expansion::literal("hello")), [JsgfOnly]);
    assert_eq!(info(Expansion::dictation()), [DictationOnly]);
    assert_eq!(
        info(Expansion::sequence([
            Expansion::literal("hello"),
            Expansion::dictation(),
        ])),
        [JsgfOnly, DictationOnly]
    );
    assert_eq!(
        info(Expansion::sequence([
            Expansion::dictation(),
            Expansion::literal("test"),
            Expansion::dictation(),
        ])),
        [DictationOnly, JsgfOnly, DictationOnly]
    );
}

#[test]
fn adjacent_same_class_content_shares_a_stage() {
    use StageKind::{DictationOnly, JsgfOnly};

    assert_eq!(
        info(Expansion::sequence([
            Expansion::dictation(),
            Expansion::dictation(),
        ])),
        [DictationOnly]
    );
    assert_eq!(
        info(Expansion::sequence([
            Expansion::literal("hello"),
            Expansion::alternative_set(["there", "world"]),
            Expansion::dictation(),
        ])),
        [JsgfOnly, DictationOnly]
    );
}

#[test]
fn repeated_dictation_is_one_dictation_stage() {
    assert_eq!(info(Expansion::repeat(Expansion::dictation())), [
        StageKind::DictationOnly
    ]);
}

#[test]
fn optional_dictation_is_rejected() {
    let result = SequenceRule::hidden("test", Expansion::optional(Expansion::dictation()));
    assert!(matches!(result, Err(Error::Grammar(_))));

    let result = SequenceRule::hidden("test", Expansion::kleene_star(Expansion::dictation()));
    assert!(matches!(result, Err(Error::Grammar(_))));
}

#[test]
fn dictation_as_an_alternative_is_rejected() {
    let result = SequenceRule::hidden(
        "test",
        Expansion::alternative_set([Expansion::literal("hello"), Expansion::dictation()]),
    );
    assert!(matches!(result, Err(Error::Grammar(_))));
}

#[test]
fn repeated_mixed_content_is_rejected() {
    let result = SequenceRule::hidden(
        "test",
        Expansion::repeat(Expansion::sequence([
            Expansion::literal("hello"),
            Expansion::dictation(),
        ])),
    );
    assert!(matches!(result, Err(Error::Grammar(_))));
}

#[test]
fn stage_kind_labels() {
    assert_eq!(StageKind::JsgfOnly.to_string(), "jsgf-only");
    assert_eq!(StageKind::DictationOnly.as_str(), "dictation-only");
}

#[test]
fn advancing_through_stages() {
    let mut rule = SequenceRule::hidden(
        "test",
        Expansion::sequence([Expansion::literal("hello"), Expansion::dictation()]),
    )
    .unwrap();

    assert!(!rule.current_is_dictation_only());
    assert!(rule.has_next_expansion());
    rule.set_next().unwrap();
    assert!(rule.current_is_dictation_only());
    assert!(!rule.has_next_expansion());
    assert_eq!(rule.set_next(), Err(Error::SequenceOverrun(1)));
}

#[test]
fn a_single_stage_cannot_advance() {
    let mut rule = SequenceRule::hidden("test", Expansion::literal("hello")).unwrap();
    assert!(!rule.has_next_expansion());
    assert_eq!(rule.set_next(), Err(Error::SequenceOverrun(0)));
    // A failed advance stays on the current stage.
    assert!(!rule.current_is_dictation_only());
}

#[test]
fn matching_across_stages() {
    let mut rule = SequenceRule::hidden(
        "test",
        Expansion::sequence([
            Expansion::literal("test"),
            Expansion::dictation(),
            Expansion::literal("testing"),
        ]),
    )
    .unwrap();

    assert!(rule.matches("test"));
    assert_eq!(rule.entire_match(), None);
    rule.set_next().unwrap();
    assert!(rule.matches("hello world"));
    rule.set_next().unwrap();
    assert!(rule.matches("testing"));
    assert_eq!(
        rule.entire_match().as_deref(),
        Some("test hello world testing")
    );
}

#[test]
fn stages_keep_their_composite_structure() {
    let mut rule = SequenceRule::hidden(
        "test",
        Expansion::sequence([
            Expansion::literal("test with"),
            Expansion::alternative_set(["lots of", "many"]),
            Expansion::dictation(),
        ]),
    )
    .unwrap();

    assert!(rule.matches("test with lots of"));
    rule.set_next().unwrap();
    assert!(rule.matches("words"));
    assert_eq!(rule.entire_match().as_deref(), Some("test with lots of words"));
}

#[test]
fn each_stage_is_matched_at_most_once() {
    let mut rule = SequenceRule::hidden(
        "test",
        Expansion::sequence([Expansion::literal("hello"), Expansion::dictation()]),
    )
    .unwrap();

    assert!(!rule.refuse_matches());
    assert!(rule.matches("hello"));
    assert!(rule.refuse_matches());
    // Refused, so even matching text reports failure.
    assert!(!rule.matches("hello"));

    rule.set_refuse_matches(false);
    assert!(rule.matches("hello"));

    // Advancing re-enables matching for the new stage.
    rule.set_next().unwrap();
    assert!(!rule.refuse_matches());
    assert!(rule.matches("world"));
}

#[test]
fn a_failed_match_also_refuses_retries() {
    let mut rule = SequenceRule::hidden("test", Expansion::literal("hello")).unwrap();
    assert!(!rule.matches("goodbye"));
    assert!(rule.refuse_matches());
    assert!(!rule.matches("hello"));
}

#[test]
fn compile_renders_only_matchable_fixed_stages() {
    let mut rule = SequenceRule::hidden(
        "test",
        Expansion::sequence([Expansion::literal("test testing"), Expansion::dictation()]),
    )
    .unwrap();

    assert_eq!(rule.compile(), "<test> = test testing;");
    assert!(rule.matches("test testing"));
    // Refused stages render as nothing to hand to a matcher.
    assert_eq!(rule.compile(), "");

    rule.set_next().unwrap();
    // Dictation-only stages have no fixed-grammar form.
    assert_eq!(rule.compile(), "");
}

#[test]
fn compile_after_a_leading_dictation_stage() {
    let mut rule = SequenceRule::hidden(
        "test",
        Expansion::sequence([
            Expansion::dictation(),
            Expansion::literal("test"),
            Expansion::literal("testing"),
        ]),
    )
    .unwrap();

    assert!(rule.current_is_dictation_only());
    assert_eq!(rule.compile(), "");
    rule.set_next().unwrap();
    assert!(!rule.current_is_dictation_only());
    assert_eq!(rule.compile(), "<test> = test testing;");
}

#[test]
fn compile_public() {
    let rule = SequenceRule::public("greet", Expansion::literal("hello world")).unwrap();
    assert_eq!(rule.compile(), "public <greet> = hello world;");
    assert!(rule.visible());
    assert_eq!(rule.name(), "greet");
}

#[test]
fn restart_sequence() {
    let mut rule = SequenceRule::hidden(
        "test",
        Expansion::sequence([Expansion::literal("hello"), Expansion::dictation()]),
    )
    .unwrap();

    assert!(rule.matches("hello"));
    rule.set_next().unwrap();
    assert!(rule.matches("world"));
    assert!(rule.entire_match().is_some());

    rule.restart_sequence();
    assert!(!rule.refuse_matches());
    assert_eq!(rule.entire_match(), None);
    assert!(!rule.current_is_dictation_only());
    assert!(rule.matches("hello"));
}

#[test]
fn graft_simple() {
    let original = Expansion::sequence([Expansion::literal("hello"), Expansion::dictation()]);
    let mut rule = SequenceRule::hidden("test", original.clone()).unwrap();

    assert!(rule.matches("hello"));
    rule.set_next().unwrap();
    assert!(rule.matches("there world"));

    SequenceRule::graft_sequence_matches(&rule, &original);
    assert_eq!(original.current_match().as_deref(), Some("hello there world"));
    assert_eq!(original.children()[0].current_match().as_deref(), Some("hello"));
    assert_eq!(
        original.children()[1].current_match().as_deref(),
        Some("there world")
    );
}

#[test]
fn graft_with_a_shared_stage() {
    let original = Expansion::sequence([Expansion::dictation(), Expansion::dictation()]);
    let mut rule = SequenceRule::hidden("test", original.clone()).unwrap();

    assert!(rule.matches("hello world"));
    SequenceRule::graft_sequence_matches(&rule, &original);
    assert_eq!(original.current_match().as_deref(), Some("hello world"));
    assert_eq!(original.children()[0].current_match().as_deref(), Some("hello"));
    assert_eq!(original.children()[1].current_match().as_deref(), Some("world"));
}

#[test]
fn graft_with_alternatives_and_optionals() {
    let original = Expansion::sequence([
        Expansion::alternative_set(["say", "tell me"]),
        Expansion::optional("please"),
        Expansion::dictation(),
    ]);
    let mut rule = SequenceRule::hidden("test", original.clone()).unwrap();

    assert!(rule.matches("say"));
    rule.set_next().unwrap();
    assert!(rule.matches("the time"));

    SequenceRule::graft_sequence_matches(&rule, &original);
    assert_eq!(original.current_match().as_deref(), Some("say the time"));
    let alternatives = original.children()[0].clone();
    assert_eq!(alternatives.current_match().as_deref(), Some("say"));
    assert_eq!(alternatives.children()[0].current_match().as_deref(), Some("say"));
    assert_eq!(alternatives.children()[1].current_match(), None);
    // The skipped optional grafts back as the empty string.
    let optional = original.children()[1].clone();
    assert_eq!(optional.current_match().as_deref(), Some(""));
}

#[test]
#[should_panic(expected = "structurally equivalent")]
fn graft_rejects_a_mismatched_tree() {
    let rule = SequenceRule::hidden(
        "test",
        Expansion::sequence([Expansion::literal("hello"), Expansion::dictation()]),
    )
    .unwrap();
    SequenceRule::graft_sequence_matches(&rule, &Expansion::literal("hello"));
}

#[test]
fn round_trip_with_a_plain_rule() {
    // The working loop a hybrid recognizer runs: compile the fixed stage,
    // match per stage, then graft everything back onto the source rule.
    let source = Rule::public(
        "dictate",
        Expansion::sequence([Expansion::literal("test"), Expansion::dictation()]),
    );
    let mut sequence = SequenceRule::new(
        source.name(),
        source.visible(),
        source.expansion(),
    )
    .unwrap();

    assert_eq!(sequence.compile(), "public <dictate> = test;");
    assert!(sequence.matches("test"));
    assert!(sequence.has_next_expansion());
    sequence.set_next().unwrap();
    assert!(sequence.current_is_dictation_only());
    assert!(sequence.matches("world"));

    assert_eq!(sequence.entire_match().as_deref(), Some("test world"));
    SequenceRule::graft_sequence_matches(&sequence, &source.expansion());
    assert_eq!(
        source.expansion().current_match().as_deref(),
        Some("test world")
    );
}
