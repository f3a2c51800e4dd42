//! The grammar matching engine.
//!
//! Each node lazily builds one anchored, case-insensitive regex for its
//! whole subtree, with one capture group per node in pre-order. Matching
//! runs the root's regex over whitespace-normalized input and reads the
//! substring each node consumed back out of the capture groups. Rule
//! reference subtrees render without groups; the reference node itself
//! captures the whole referenced match and recursion distributes it into
//! the referenced rule's tree.

use super::{
    expansion::{Expansion, Kind},
    traverse::{TraversalOrder, flat_map_expansion},
};
use regex::Regex;

/// Collapses whitespace runs to single spaces and lowercases, the
/// normalization applied to utterance text before comparison.
pub(crate) fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl Expansion {
    /// Attempts to match the whole of `text` against this tree.
    ///
    /// On success, every node along the derivation records the substring
    /// it consumed (the empty string for optional content the derivation
    /// skipped); on failure all recorded matches are cleared and `false`
    /// is returned. A non-match is an expected outcome, never an error.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.match_normalized(&normalize(text))
    }

    fn match_normalized(&self, input: &str) -> bool {
        self.clear_matches();
        let regex = self.matching_regex();
        let Some(caps) = regex.captures(input) else {
            return false;
        };
        for (index, node) in match_nodes(self).iter().enumerate() {
            if let Some(group) = caps.get(index + 1) {
                let consumed = group.as_str().trim().to_owned();
                if let Some(rule) = node.referenced_rule() {
                    let _ = rule.expansion().match_normalized(&consumed);
                }
                node.set_current_match(Some(consumed));
            } else if node.is_optional() {
                node.set_current_match(Some(String::new()));
            }
        }
        true
    }

    /// Unsets `current_match` on every node of this tree, including
    /// through rule references.
    pub(crate) fn clear_matches(&self) {
        flat_map_expansion(
            self,
            |node| node.set_current_match(None),
            TraversalOrder::PreOrder,
        );
    }

    /// The node's matching pattern, built from its compiled form on first
    /// use and cached. Copies never inherit the cache.
    pub(crate) fn matching_regex(&self) -> Regex {
        if let Some(regex) = self.cached_pattern() {
            return regex;
        }
        let mut source = String::from("(?i)^");
        build_pattern(self, &mut source, true);
        source.push_str(r"\s*$");
        // Pattern text is escaped word lists inside fixed syntax, so the
        // source is always a valid regex.
        let regex = Regex::new(&source).expect("generated pattern is valid");
        self.cache_pattern(regex.clone());
        regex
    }
}

/// The nodes captured by this tree's pattern, in capture group order.
/// Mirrors the group layout of [`build_pattern`]: pre-order, not
/// descending into referenced rules.
fn match_nodes(expansion: &Expansion) -> Vec<Expansion> {
    fn collect(expansion: &Expansion, out: &mut Vec<Expansion>) {
        out.push(expansion.clone());
        if expansion.referenced_rule().is_none() {
            for child in expansion.children() {
                collect(&child, out);
            }
        }
    }
    let mut nodes = Vec::new();
    collect(expansion, &mut nodes);
    nodes
}

fn build_pattern(expansion: &Expansion, out: &mut String, capture: bool) {
    out.push_str(if capture { "(" } else { "(?:" });
    match expansion.kind() {
        Kind::Literal(text) => out.push_str(&words_pattern(&text)),
        Kind::Dictation => out.push_str(r"\s*\S+(?:\s+\S+)*"),
        Kind::Sequence | Kind::RequiredGrouping => {
            for child in expansion.children() {
                build_pattern(&child, out, capture);
            }
        }
        Kind::AlternativeSet => {
            for (index, child) in expansion.children().iter().enumerate() {
                if index > 0 {
                    out.push('|');
                }
                build_pattern(child, out, capture);
            }
        }
        Kind::OptionalGrouping => {
            for child in expansion.children() {
                build_pattern(&child, out, capture);
            }
            out.push('?');
        }
        Kind::KleeneStar => {
            for child in expansion.children() {
                build_pattern(&child, out, capture);
            }
            out.push('*');
        }
        Kind::Repeat => {
            for child in expansion.children() {
                build_pattern(&child, out, capture);
            }
            out.push('+');
        }
        // The referenced tree renders without capture groups; the
        // reference node's own group captures the whole referenced match.
        Kind::RuleRef(rule) => build_pattern(&rule.expansion(), out, false),
        // Unresolved and void references never match.
        Kind::NamedRuleRef(_) | Kind::VoidRef => out.push_str(r"[^\s\S]"),
        // `<NULL>` matches the empty string.
        Kind::NullRef => {}
    }
    out.push(')');
}

fn words_pattern(text: &str) -> String {
    let words = text
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>();
    if words.is_empty() {
        return String::new();
    }
    format!(r"\s*{}", words.join(r"\s+"))
}
