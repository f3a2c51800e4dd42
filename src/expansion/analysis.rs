//! Structural relationship queries over ancestor chains.
//!
//! These walk parent links only, so inside a
//! [`JointTreeContext`](crate::JointTreeContext) they see across rule
//! reference boundaries into referenced rules' trees.

use super::{Expansion, Kind};

impl Expansion {
    /// The chain of ancestors from this node's parent up to the root.
    pub(crate) fn ancestors(&self) -> impl Iterator<Item = Expansion> {
        std::iter::successors(self.parent(), |ancestor| ancestor.parent())
    }

    /// Whether an ancestor permits this node's content to be entirely
    /// absent from a match, i.e. some strict ancestor is an
    /// `OptionalGrouping` or `KleeneStar`. A bare optional grouping is not
    /// itself optional.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.ancestors()
            .any(|a| matches!(a.kind(), Kind::OptionalGrouping | Kind::KleeneStar))
    }

    /// Whether some strict ancestor is an `AlternativeSet`. A bare
    /// alternative set is not itself an alternative.
    #[must_use]
    pub fn is_alternative(&self) -> bool {
        self.ancestors()
            .any(|a| matches!(a.kind(), Kind::AlternativeSet))
    }

    /// The nearest ancestor that is a `Repeat` or `KleeneStar`, if any.
    #[must_use]
    pub fn repetition_ancestor(&self) -> Option<Expansion> {
        self.ancestors()
            .find(|a| matches!(a.kind(), Kind::Repeat | Kind::KleeneStar))
    }

    /// Whether `other` occurs strictly above this node. A node is never a
    /// descendant of itself.
    #[must_use]
    pub fn is_descendant_of(&self, other: &Expansion) -> bool {
        self.ancestors().any(|a| a.ptr_eq(other))
    }

    /// Whether this node and `other` can never both appear in one
    /// successful match: they share an `AlternativeSet` ancestor and reach
    /// it through different immediate children. Commutative.
    #[must_use]
    pub fn mutually_exclusive_of(&self, other: &Expansion) -> bool {
        for (set_a, branch_a) in alternative_branches(self) {
            for (set_b, branch_b) in alternative_branches(other) {
                if set_a.ptr_eq(&set_b) && !branch_a.ptr_eq(&branch_b) {
                    return true;
                }
            }
        }
        false
    }
}

/// Collects `(AlternativeSet ancestor, branch child)` pairs along the
/// ancestor chain, where the branch child is the set's immediate child the
/// node is reached through.
fn alternative_branches(node: &Expansion) -> Vec<(Expansion, Expansion)> {
    let mut pairs = Vec::new();
    let mut current = node.clone();
    while let Some(parent) = current.parent() {
        if matches!(parent.kind(), Kind::AlternativeSet) {
            pairs.push((parent.clone(), current));
        }
        current = parent;
    }
    pairs
}
