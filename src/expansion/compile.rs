//! JSGF text rendering for expansion trees.

use super::{Expansion, Kind};

impl Expansion {
    /// Renders this tree as JSGF grammar text.
    ///
    /// Tags render as a `{ tag }` segment separated from the preceding
    /// text by one space. Grouping kinds place their own tag inside the
    /// closing parenthesis; quantified kinds place it after the
    /// quantifier; everything else appends it. With `ignore_tags`, no tag
    /// is rendered at any depth.
    #[must_use]
    pub fn compile(&self, ignore_tags: bool) -> String {
        let tag = if ignore_tags { None } else { self.tag() };
        let children = self.children();
        let join = |separator: &str| {
            children
                .iter()
                .map(|child| child.compile(ignore_tags))
                .collect::<Vec<_>>()
                .join(separator)
        };
        match self.kind() {
            Kind::Literal(text) => append_tag(text, tag),
            Kind::Sequence => append_tag(join(" "), tag),
            Kind::AlternativeSet => format!("({})", append_tag(join("|"), tag)),
            Kind::RequiredGrouping => format!("({})", append_tag(join(" "), tag)),
            Kind::OptionalGrouping => append_tag(format!("[{}]", join(" ")), tag),
            Kind::Repeat => append_tag(format!("({})+", join(" ")), tag),
            Kind::KleeneStar => append_tag(format!("({})*", join(" ")), tag),
            Kind::RuleRef(rule) => append_tag(format!("<{}>", rule.name()), tag),
            Kind::NamedRuleRef(name) => append_tag(format!("<{name}>"), tag),
            Kind::NullRef => append_tag("<NULL>".to_owned(), tag),
            Kind::VoidRef => append_tag("<VOID>".to_owned(), tag),
            Kind::Dictation => append_tag("<DICTATION>".to_owned(), tag),
        }
    }
}

fn append_tag(text: String, tag: Option<String>) -> String {
    match tag {
        Some(tag) => format!("{text} {{ {tag} }}"),
        None => text,
    }
}
