//! The grammar expansion node model.
//!
//! An [`Expansion`] is a cheap-to-clone handle to a node in a grammar tree.
//! Cloning the handle aliases the node; [`Expansion::deep_copy`] and
//! [`Expansion::shallow_copy`] create new nodes. Parent links are weak, so
//! a tree is owned root-downwards and can be walked in both directions.

mod analysis;
mod compile;
pub mod kind;

pub use self::kind::Kind;

use super::{
    rule::Rule,
    traverse::{TraversalOrder, filter_expansion},
};
use regex::Regex;
use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

pub(crate) struct Inner {
    pub(crate) kind: Kind,
    pub(crate) children: Vec<Expansion>,
    pub(crate) tag: Option<String>,
    pub(crate) parent: Option<Weak<RefCell<Inner>>>,
    pub(crate) current_match: Option<String>,
    pub(crate) pattern: Option<Regex>,
}

/// A node in a grammar expansion tree.
#[derive(Clone)]
pub struct Expansion(Rc<RefCell<Inner>>);

impl Expansion {
    fn new(kind: Kind, children: Vec<Expansion>) -> Self {
        let expansion = Expansion(Rc::new(RefCell::new(Inner {
            kind,
            children,
            tag: None,
            parent: None,
            current_match: None,
            pattern: None,
        })));
        for child in expansion.children() {
            child.set_parent(Some(&expansion));
        }
        expansion
    }

    fn collect<I>(children: I) -> Vec<Expansion>
    where
        I: IntoIterator,
        I::Item: Into<Expansion>,
    {
        children.into_iter().map(Into::into).collect()
    }

    /// Creates a literal text leaf.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(Kind::Literal(text.into()), Vec::new())
    }

    /// Creates an ordered concatenation of child expansions.
    #[must_use]
    pub fn sequence<I>(children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expansion>,
    {
        Self::new(Kind::Sequence, Self::collect(children))
    }

    /// Creates a set of mutually exclusive choices.
    #[must_use]
    pub fn alternative_set<I>(children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expansion>,
    {
        Self::new(Kind::AlternativeSet, Self::collect(children))
    }

    /// Creates an explicitly parenthesized grouping.
    #[must_use]
    pub fn required_grouping<I>(children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expansion>,
    {
        Self::new(Kind::RequiredGrouping, Self::collect(children))
    }

    /// Creates a zero-or-one occurrence of `child`.
    #[must_use]
    pub fn optional(child: impl Into<Expansion>) -> Self {
        Self::new(Kind::OptionalGrouping, vec![child.into()])
    }

    /// Creates a one-or-more repetition of `child`.
    #[must_use]
    pub fn repeat(child: impl Into<Expansion>) -> Self {
        Self::new(Kind::Repeat, vec![child.into()])
    }

    /// Creates a zero-or-more repetition of `child`.
    #[must_use]
    pub fn kleene_star(child: impl Into<Expansion>) -> Self {
        Self::new(Kind::KleeneStar, vec![child.into()])
    }

    /// Creates a non-owning reference to `rule`. The rule's root expansion
    /// never becomes a structural child of the reference.
    #[must_use]
    pub fn rule_ref(rule: &Rc<Rule>) -> Self {
        Self::new(Kind::RuleRef(Rc::clone(rule)), Vec::new())
    }

    /// Creates an unresolved reference to a rule by name.
    #[must_use]
    pub fn named_rule_ref(name: impl Into<String>) -> Self {
        Self::new(Kind::NamedRuleRef(name.into()), Vec::new())
    }

    /// Creates a reference to the built-in `<NULL>` rule, which matches
    /// nothing and always succeeds.
    #[must_use]
    pub fn null_ref() -> Self {
        Self::new(Kind::NullRef, Vec::new())
    }

    /// Creates a reference to the built-in `<VOID>` rule, which never
    /// matches.
    #[must_use]
    pub fn void_ref() -> Self {
        Self::new(Kind::VoidRef, Vec::new())
    }

    /// Creates a free dictation leaf matching arbitrary spoken words.
    #[must_use]
    pub fn dictation() -> Self {
        Self::new(Kind::Dictation, Vec::new())
    }

    /// The node's kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.0.borrow().kind.clone()
    }

    /// The text of a literal leaf, if this node is one.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        match &self.0.borrow().kind {
            Kind::Literal(text) => Some(text.clone()),
            _ => None,
        }
    }

    /// The referenced rule, if this node is a [`Kind::RuleRef`].
    #[must_use]
    pub fn referenced_rule(&self) -> Option<Rc<Rule>> {
        match &self.0.borrow().kind {
            Kind::RuleRef(rule) => Some(Rc::clone(rule)),
            _ => None,
        }
    }

    /// The node's semantic tag, if set.
    #[must_use]
    pub fn tag(&self) -> Option<String> {
        self.0.borrow().tag.clone()
    }

    /// Attaches a semantic tag to this node.
    pub fn set_tag(&self, tag: impl Into<String>) {
        self.0.borrow_mut().tag = Some(tag.into());
    }

    /// The node's owned children, in order. Empty for leaves; a
    /// [`Kind::RuleRef`] owns no children even though traversal sees the
    /// referenced rule's tree through it.
    #[must_use]
    pub fn children(&self) -> Vec<Expansion> {
        self.0.borrow().children.clone()
    }

    /// The single child of a one-child node, if any.
    #[must_use]
    pub fn child(&self) -> Option<Expansion> {
        self.0.borrow().children.first().cloned()
    }

    /// The node's parent, or `None` for a root.
    #[must_use]
    pub fn parent(&self) -> Option<Expansion> {
        self.0
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Expansion)
    }

    pub(crate) fn set_parent(&self, parent: Option<&Expansion>) {
        self.0.borrow_mut().parent = parent.map(|p| Rc::downgrade(&p.0));
    }

    /// The furthest ancestor reachable through parent links.
    #[must_use]
    pub fn root_expansion(&self) -> Expansion {
        let mut root = self.clone();
        while let Some(parent) = root.parent() {
            root = parent;
        }
        root
    }

    /// Whether `self` and `other` are handles to the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Expansion) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Whether this node is a leaf. A [`Kind::RuleRef`] is not a leaf: its
    /// leaves are the referenced rule's leaves.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        let inner = self.0.borrow();
        inner.children.is_empty() && !matches!(inner.kind, Kind::RuleRef(_))
    }

    /// Whether this node is a free dictation leaf.
    #[must_use]
    pub fn is_dictation(&self) -> bool {
        matches!(self.0.borrow().kind, Kind::Dictation)
    }

    /// The leaves of this tree in left-to-right order, passing through rule
    /// references into the referenced rules' trees.
    #[must_use]
    pub fn leaves(&self) -> Vec<Expansion> {
        filter_expansion(self, Expansion::is_leaf, TraversalOrder::PreOrder)
    }

    /// The leaves that follow this leaf in its root expansion's leaf order.
    #[must_use]
    pub fn leaves_after(&self) -> Vec<Expansion> {
        let mut reached = false;
        let mut after = Vec::new();
        for leaf in self.root_expansion().leaves() {
            if leaf.ptr_eq(self) {
                reached = true;
            } else if reached {
                after.push(leaf);
            }
        }
        after
    }

    /// The substring this node consumed in the last successful match, if
    /// any.
    #[must_use]
    pub fn current_match(&self) -> Option<String> {
        self.0.borrow().current_match.clone()
    }

    pub(crate) fn set_current_match(&self, text: Option<String>) {
        self.0.borrow_mut().current_match = text;
    }

    pub(crate) fn cached_pattern(&self) -> Option<Regex> {
        self.0.borrow().pattern.clone()
    }

    pub(crate) fn cache_pattern(&self, pattern: Regex) {
        self.0.borrow_mut().pattern = Some(pattern);
    }

    /// Creates a full copy of this tree: new nodes throughout, with the
    /// copy's parent unset and its matching pattern uncached. A copied
    /// rule reference still points at the original [`Rule`].
    #[must_use]
    pub fn deep_copy(&self) -> Expansion {
        let inner = self.0.borrow();
        let copy = Expansion::new(
            inner.kind.clone(),
            inner.children.iter().map(Expansion::deep_copy).collect(),
        );
        {
            let mut copied = copy.0.borrow_mut();
            copied.tag = inner.tag.clone();
            copied.current_match = inner.current_match.clone();
        }
        copy
    }

    /// Creates a new top node sharing this node's children. The children
    /// keep their original parent; the copy's parent is unset and its
    /// matching pattern uncached.
    #[must_use]
    pub fn shallow_copy(&self) -> Expansion {
        let inner = self.0.borrow();
        Expansion(Rc::new(RefCell::new(Inner {
            kind: inner.kind.clone(),
            children: inner.children.clone(),
            tag: inner.tag.clone(),
            parent: None,
            current_match: inner.current_match.clone(),
            pattern: None,
        })))
    }

    /// The children seen by tree traversal: the owned children, except
    /// that a rule reference contributes the referenced rule's root
    /// expansion as its single implicit child.
    pub(crate) fn traversal_children(&self) -> Vec<Expansion> {
        match &self.0.borrow().kind {
            Kind::RuleRef(rule) => vec![rule.expansion()],
            _ => self.0.borrow().children.clone(),
        }
    }
}

impl From<&str> for Expansion {
    fn from(text: &str) -> Self {
        Expansion::literal(text)
    }
}

impl From<String> for Expansion {
    fn from(text: String) -> Self {
        Expansion::literal(text)
    }
}

impl PartialEq for Expansion {
    /// Recursive structural equality. `AlternativeSet` children compare as
    /// an unordered multiset; all other composites compare in order.
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let a = self.0.borrow();
        let b = other.0.borrow();
        if a.kind != b.kind || a.tag != b.tag {
            return false;
        }
        match a.kind {
            Kind::AlternativeSet => multiset_eq(&a.children, &b.children),
            _ => a.children == b.children,
        }
    }
}

impl Eq for Expansion {}

fn multiset_eq(a: &[Expansion], b: &[Expansion]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    'next: for x in a {
        for (i, y) in b.iter().enumerate() {
            if !used[i] && x == y {
                used[i] = true;
                continue 'next;
            }
        }
        return false;
    }
    true
}

impl fmt::Debug for Expansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        match &inner.kind {
            Kind::Literal(text) => write!(f, "Literal({text:?})"),
            Kind::NamedRuleRef(name) => write!(f, "NamedRuleRef({name:?})"),
            Kind::RuleRef(rule) => write!(f, "RuleRef(<{}>)", rule.name()),
            kind => {
                write!(f, "{}(", kind.name())?;
                for (i, child) in inner.children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{child:?}")?;
                }
                write!(f, ")")
            }
        }
    }
}
