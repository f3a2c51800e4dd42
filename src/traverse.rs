//! Order-parameterized traversal algorithms over expansion trees.
//!
//! All traversals treat a rule reference as having exactly one implicit
//! child: the referenced rule's root expansion. The reference does not own
//! that tree, but walking through it is what lets whole grammars be
//! analyzed from a single entry expansion.

use super::expansion::Expansion;

/// Whether a node is visited before or after its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalOrder {
    PreOrder,
    PostOrder,
}

/// The nested result of [`map_expansion`]: the mapped value for a node
/// paired with the subresults for its traversal children.
#[derive(Debug, PartialEq, Eq)]
pub struct MappedExpansion<T> {
    pub value: T,
    pub children: Vec<MappedExpansion<T>>,
}

/// Applies `f` to every node, preserving the tree shape in the result.
/// `order` controls whether `f` sees a node before or after its children.
pub fn map_expansion<T, F>(
    expansion: &Expansion,
    mut f: F,
    order: TraversalOrder,
) -> MappedExpansion<T>
where
    F: FnMut(&Expansion) -> T,
{
    map_inner(expansion, &mut f, order)
}

fn map_inner<T>(
    expansion: &Expansion,
    f: &mut impl FnMut(&Expansion) -> T,
    order: TraversalOrder,
) -> MappedExpansion<T> {
    match order {
        TraversalOrder::PreOrder => {
            let value = f(expansion);
            let children = expansion
                .traversal_children()
                .iter()
                .map(|child| map_inner(child, &mut *f, order))
                .collect();
            MappedExpansion { value, children }
        }
        TraversalOrder::PostOrder => {
            let children = expansion
                .traversal_children()
                .iter()
                .map(|child| map_inner(child, &mut *f, order))
                .collect();
            MappedExpansion {
                value: f(expansion),
                children,
            }
        }
    }
}

/// Applies `f` to every node, flattened into a single sequence in
/// traversal order.
pub fn flat_map_expansion<T, F>(expansion: &Expansion, mut f: F, order: TraversalOrder) -> Vec<T>
where
    F: FnMut(&Expansion) -> T,
{
    let mut out = Vec::new();
    flat_map_inner(expansion, &mut f, order, &mut out);
    out
}

fn flat_map_inner<T>(
    expansion: &Expansion,
    f: &mut impl FnMut(&Expansion) -> T,
    order: TraversalOrder,
    out: &mut Vec<T>,
) {
    if order == TraversalOrder::PreOrder {
        out.push(f(expansion));
    }
    for child in expansion.traversal_children() {
        flat_map_inner(&child, f, order, out);
    }
    if order == TraversalOrder::PostOrder {
        out.push(f(expansion));
    }
}

/// The nodes for which `predicate` holds, in traversal order.
pub fn filter_expansion<F>(
    expansion: &Expansion,
    mut predicate: F,
    order: TraversalOrder,
) -> Vec<Expansion>
where
    F: FnMut(&Expansion) -> bool,
{
    let mut out = Vec::new();
    filter_inner(expansion, &mut predicate, order, &mut out);
    out
}

fn filter_inner(
    expansion: &Expansion,
    predicate: &mut impl FnMut(&Expansion) -> bool,
    order: TraversalOrder,
    out: &mut Vec<Expansion>,
) {
    if order == TraversalOrder::PreOrder && predicate(expansion) {
        out.push(expansion.clone());
    }
    for child in expansion.traversal_children() {
        filter_inner(&child, predicate, order, out);
    }
    if order == TraversalOrder::PostOrder && predicate(expansion) {
        out.push(expansion.clone());
    }
}

/// The first node in traversal order satisfying `predicate`. Traversal
/// stops at the accepting node; nodes beyond it are never visited.
pub fn find_expansion<F>(
    expansion: &Expansion,
    mut predicate: F,
    order: TraversalOrder,
) -> Option<Expansion>
where
    F: FnMut(&Expansion) -> bool,
{
    find_inner(expansion, &mut predicate, order)
}

fn find_inner(
    expansion: &Expansion,
    predicate: &mut impl FnMut(&Expansion) -> bool,
    order: TraversalOrder,
) -> Option<Expansion> {
    if order == TraversalOrder::PreOrder && predicate(expansion) {
        return Some(expansion.clone());
    }
    for child in expansion.traversal_children() {
        if let Some(found) = find_inner(&child, predicate, order) {
            return Some(found);
        }
    }
    if order == TraversalOrder::PostOrder && predicate(expansion) {
        return Some(expansion.clone());
    }
    None
}

/// Scoped graft of referenced rules' trees onto the referencing tree.
///
/// On construction, every rule reference in `expansion` (recursively,
/// through nested references) has the referenced rule root's parent
/// pointer reassigned to the referencing node, so parent-link queries such
/// as [`Expansion::mutually_exclusive_of`] see one joined tree. Dropping
/// the context detaches every grafted root again, on every exit path.
pub struct JointTreeContext {
    grafted: Vec<Expansion>,
}

impl JointTreeContext {
    #[must_use]
    pub fn new(expansion: &Expansion) -> Self {
        let mut grafted = Vec::new();
        graft_references(expansion, &mut grafted);
        JointTreeContext { grafted }
    }
}

impl Drop for JointTreeContext {
    fn drop(&mut self) {
        for root in &self.grafted {
            root.set_parent(None);
        }
    }
}

fn graft_references(expansion: &Expansion, grafted: &mut Vec<Expansion>) {
    if let Some(rule) = expansion.referenced_rule() {
        let root = rule.expansion();
        root.set_parent(Some(expansion));
        grafted.push(root.clone());
        graft_references(&root, grafted);
    } else {
        for child in expansion.children() {
            graft_references(&child, grafted);
        }
    }
}
