//! Named grammar rules.

use super::expansion::Expansion;
use std::{cell::RefCell, fmt, rc::Rc};

/// A named, visibility-tagged owner of a root expansion.
///
/// Rules are shared behind [`Rc`] so that rule references
/// ([`Expansion::rule_ref`]) can point at them without owning them.
pub struct Rule {
    name: String,
    visible: bool,
    expansion: RefCell<Expansion>,
}

impl Rule {
    /// Creates a rule with the given visibility.
    pub fn new(name: impl Into<String>, visible: bool, expansion: impl Into<Expansion>) -> Rc<Self> {
        Rc::new(Rule {
            name: name.into(),
            visible,
            expansion: RefCell::new(expansion.into()),
        })
    }

    /// Creates a rule visible to other grammars.
    pub fn public(name: impl Into<String>, expansion: impl Into<Expansion>) -> Rc<Self> {
        Self::new(name, true, expansion)
    }

    /// Creates a rule private to its grammar.
    pub fn hidden(name: impl Into<String>, expansion: impl Into<Expansion>) -> Rc<Self> {
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

    /// The rule's root expansion.
    #[must_use]
    pub fn expansion(&self) -> Expansion {
        self.expansion.borrow().clone()
    }

    /// Replaces the rule's root expansion.
    pub fn set_expansion(&self, expansion: impl Into<Expansion>) {
        *self.expansion.borrow_mut() = expansion.into();
    }

    /// Whether `text` matches this rule's expansion. Match results are
    /// recorded on the expansion tree's nodes.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.expansion().matches(text)
    }

    /// Renders the rule declaration: `public <name> = ...;` for visible
    /// rules, `<name> = ...;` for hidden ones.
    #[must_use]
    pub fn compile(&self) -> String {
        let body = self.expansion().compile(false);
        if self.visible {
            format!("public <{}> = {};", self.name, body)
        } else {
            format!("<{}> = {};", self.name, body)
        }
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.visible == other.visible
            && self.expansion() == other.expansion()
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("visible", &self.visible)
            .field("expansion", &self.expansion())
            .finish()
    }
}
