//! The closed set of grammar expansion node kinds.

use crate::rule::Rule;
use std::rc::Rc;

/// The kind of an [`Expansion`](super::Expansion) node.
///
/// Child expansions are owned by the node itself, not by its kind, so the
/// variants only carry kind-specific data: literal text, a reference name,
/// or the referenced rule.
#[derive(Clone, Debug, PartialEq)]
pub enum Kind {
    /// Literal text, matched case-insensitively with flexible whitespace.
    Literal(String),
    /// Ordered concatenation of children.
    Sequence,
    /// Unordered set of mutually exclusive choices.
    AlternativeSet,
    /// Zero-or-one occurrence of a single child.
    OptionalGrouping,
    /// Explicit parenthesization; no quantity change.
    RequiredGrouping,
    /// One-or-more occurrences of a single child.
    Repeat,
    /// Zero-or-more occurrences of a single child.
    KleeneStar,
    /// Non-owning reference to another rule's tree.
    RuleRef(Rc<Rule>),
    /// Unresolved reference to a rule by name.
    NamedRuleRef(String),
    /// The built-in `<NULL>` rule: matches the empty string.
    NullRef,
    /// The built-in `<VOID>` rule: never matches.
    VoidRef,
    /// Free dictation: arbitrary spoken words.
    Dictation,
}

impl Kind {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Kind::Literal(_) => "Literal",
            Kind::Sequence => "Sequence",
            Kind::AlternativeSet => "AlternativeSet",
            Kind::OptionalGrouping => "OptionalGrouping",
            Kind::RequiredGrouping => "RequiredGrouping",
            Kind::Repeat => "Repeat",
            Kind::KleeneStar => "KleeneStar",
            Kind::RuleRef(_) => "RuleRef",
            Kind::NamedRuleRef(_) => "NamedRuleRef",
            Kind::NullRef => "NullRef",
            Kind::VoidRef => "VoidRef",
            Kind::Dictation => "Dictation",
        }
    }
}
