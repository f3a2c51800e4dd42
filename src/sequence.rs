//! The dictation-splitting sequence engine.
//!
//! A fixed-vocabulary grammar matcher cannot match free dictation. A
//! [`SequenceRule`] partitions a rule's expansion into alternating
//! dictation-only and fixed-vocabulary stages, exposes one stage at a time
//! for matching, and reassembles the per-stage matches into the full
//! utterance afterwards.

mod stage;

use self::stage::{Stage, partition_stages};
use super::{
    Error, Result,
    expansion::Expansion,
};
use std::fmt;

/// The classification of one matching stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageKind {
    /// Matched by the fixed grammar.
    JsgfOnly,
    /// Matched by free dictation.
    DictationOnly,
}

impl StageKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StageKind::JsgfOnly => "jsgf-only",
            StageKind::DictationOnly => "dictation-only",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule whose expansion is matched stage by stage.
///
/// Construction validates that the expansion's dictation and
/// fixed-vocabulary parts can be cleanly partitioned ([`Error::Grammar`]
/// otherwise). The source expansion is never mutated: stages are built
/// from detached copies, and [`SequenceRule::graft_sequence_matches`]
/// copies match results back onto a caller-owned tree.
pub struct SequenceRule {
    name: String,
    visible: bool,
    stages: Vec<Stage>,
    current: usize,
    refuse_matches: bool,
}

impl SequenceRule {
    pub fn new(
        name: impl Into<String>,
        visible: bool,
        expansion: impl Into<Expansion>,
    ) -> Result<Self> {
        let stages = partition_stages(&expansion.into())?;
        Ok(SequenceRule {
            name: name.into(),
            visible,
            stages,
            current: 0,
            refuse_matches: false,
        })
    }

    /// Creates a sequence rule visible to other grammars.
    pub fn public(name: impl Into<String>, expansion: impl Into<Expansion>) -> Result<Self> {
        Self::new(name, true, expansion)
    }

    /// Creates a sequence rule private to its grammar.
    pub fn hidden(name: impl Into<String>, expansion: impl Into<Expansion>) -> Result<Self> {
        Self::new(name, false, expansion)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// The synthetic expansion for the stage currently being matched.
    #[must_use]
    pub fn current_expansion(&self) -> Expansion {
        self.stages[self.current].expansion.clone()
    }

    /// Whether a stage follows the current one.
    #[must_use]
    pub fn has_next_expansion(&self) -> bool {
        self.current + 1 < self.stages.len()
    }

    /// Moves to the next stage and clears [`Self::refuse_matches`], since
    /// the new stage has not been attempted yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SequenceOverrun`] when already at the last stage.
    pub fn set_next(&mut self) -> Result<()> {
        if !self.has_next_expansion() {
            return Err(Error::SequenceOverrun(self.current));
        }
        self.current += 1;
        self.refuse_matches = false;
        Ok(())
    }

    /// Whether the current stage is matched by free dictation.
    #[must_use]
    pub fn current_is_dictation_only(&self) -> bool {
        self.stages[self.current].dictation_only
    }

    /// Per-stage classifications, in stage order.
    #[must_use]
    pub fn expansion_sequence_info(&self) -> Vec<StageKind> {
        self.stages
            .iter()
            .map(|stage| {
                if stage.dictation_only {
                    StageKind::DictationOnly
                } else {
                    StageKind::JsgfOnly
                }
            })
            .collect()
    }

    /// Attempts to match `text` against the current stage.
    ///
    /// A stage, once attempted, must not be re-attempted without an
    /// explicit restart: regardless of the outcome, `refuse_matches` is
    /// set, and while it is set this method reports failure without
    /// matching. A failed match does not advance the stage index.
    pub fn matches(&mut self, text: &str) -> bool {
        if self.refuse_matches {
            return false;
        }
        let matched = self.stages[self.current].expansion.matches(text);
        self.refuse_matches = true;
        matched
    }

    /// Whether matching is currently refused. While set, [`Self::matches`]
    /// reports failure and [`Self::compile`] renders nothing.
    #[must_use]
    pub fn refuse_matches(&self) -> bool {
        self.refuse_matches
    }

    /// Manually re-enables or disables matching for the current stage.
    pub fn set_refuse_matches(&mut self, refuse: bool) {
        self.refuse_matches = refuse;
    }

    /// Returns to the first stage, clearing `refuse_matches` and all
    /// recorded stage matches.
    pub fn restart_sequence(&mut self) {
        self.current = 0;
        self.refuse_matches = false;
        for stage in &self.stages {
            stage.expansion.clear_matches();
        }
    }

    /// The whole utterance, once every stage has matched: each stage's
    /// matched text in stage order, joined by single spaces. Absent while
    /// any stage is unmatched.
    #[must_use]
    pub fn entire_match(&self) -> Option<String> {
        let mut parts = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            parts.push(stage.expansion.current_match()?);
        }
        Some(parts.join(" "))
    }

    /// Renders the rule declaration for the current stage, or the empty
    /// string when there is nothing to hand a fixed-grammar matcher:
    /// matching is refused, or the stage is dictation-only.
    #[must_use]
    pub fn compile(&self) -> String {
        let stage = &self.stages[self.current];
        if self.refuse_matches || stage.dictation_only {
            return String::new();
        }
        let body = stage.expansion.compile(false);
        if self.visible {
            format!("public <{}> = {};", self.name, body)
        } else {
            format!("<{}> = {};", self.name, body)
        }
    }

    /// Copies the matches recorded on `rule`'s working stage trees onto
    /// `original`, a structurally equivalent tree the caller owns: leaves
    /// are paired by ordinal position in traversal order, then every
    /// composite's `current_match` is recomputed bottom-up.
    ///
    /// # Panics
    ///
    /// Panics if `original` does not have the same number of leaves as the
    /// expansion `rule` was built from; the correspondence would be
    /// undefined.
    pub fn graft_sequence_matches(rule: &SequenceRule, original: &Expansion) {
        let mut working = Vec::new();
        for stage in &rule.stages {
            working.extend(stage.expansion.leaves());
        }
        let target = original.leaves();
        assert_eq!(
            working.len(),
            target.len(),
            "grafting requires structurally equivalent trees"
        );
        for (from, to) in working.iter().zip(&target) {
            to.set_current_match(from.current_match());
        }
        rebuild_composite_matches(original);
    }
}

impl fmt::Debug for SequenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceRule")
            .field("name", &self.name)
            .field("visible", &self.visible)
            .field("stages", &self.expansion_sequence_info())
            .field("current", &self.current)
            .field("refuse_matches", &self.refuse_matches)
            .finish()
    }
}

/// Recomputes `current_match` on every composite from its children's
/// grafted matches, joining present, non-empty values with single spaces.
fn rebuild_composite_matches(expansion: &Expansion) {
    if expansion.is_leaf() {
        return;
    }
    let children = expansion.traversal_children();
    for child in &children {
        rebuild_composite_matches(child);
    }
    let mut any_matched = false;
    let mut parts = Vec::new();
    for child in &children {
        if let Some(text) = child.current_match() {
            any_matched = true;
            if !text.is_empty() {
                parts.push(text);
            }
        }
    }
    expansion.set_current_match(any_matched.then(|| parts.join(" ")));
}
