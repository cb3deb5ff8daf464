//! Section tree and headline identifiers
//!
//!     The outline mirrors headline nesting. It is built while headlines are parsed:
//!     a new headline becomes a child of the nearest open section whose level is
//!     strictly lower. Sections live in an arena and refer to each other by index;
//!     index 0 is the level-0 root.
//!
//!     [`HeadlineIds`] hands out anchor identifiers. It is the only document-wide table
//!     mutated during structural parsing besides the footnote registry.

use crate::org::ast::Node;
use std::collections::{HashMap, HashSet};

pub type SectionId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub lvl: usize,
    pub parent: Option<SectionId>,
    pub children: Vec<SectionId>,
    /// Index of the headline this section stands for (0 for the root).
    pub headline: usize,
    pub title: Vec<Node>,
    pub id: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    sections: Vec<Section>,
    last: SectionId,
}

impl Default for Outline {
    fn default() -> Self {
        Outline {
            sections: vec![Section {
                lvl: 0,
                parent: None,
                children: Vec::new(),
                headline: 0,
                title: Vec::new(),
                id: String::new(),
                tags: Vec::new(),
            }],
            last: 0,
        }
    }
}

impl Outline {
    pub const ROOT: SectionId = 0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a headline after the most recently added one.
    pub fn add(
        &mut self,
        lvl: usize,
        headline: usize,
        title: Vec<Node>,
        id: String,
        tags: Vec<String>,
    ) -> SectionId {
        let mut parent = self.last;
        while parent != Self::ROOT && self.sections[parent].lvl >= lvl {
            parent = self.sections[parent].parent.unwrap_or(Self::ROOT);
        }
        let section_id = self.sections.len();
        self.sections.push(Section {
            lvl,
            parent: Some(parent),
            children: Vec::new(),
            headline,
            title,
            id,
            tags,
        });
        self.sections[parent].children.push(section_id);
        self.last = section_id;
        section_id
    }

    pub fn section(&self, id: SectionId) -> &Section {
        &self.sections[id]
    }

    pub fn root(&self) -> &Section {
        &self.sections[Self::ROOT]
    }

    /// Number of headlines in the outline.
    pub fn len(&self) -> usize {
        self.sections.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unique anchor identifiers for headlines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlineIds {
    used: HashSet<String>,
    counters: HashMap<String, usize>,
}

impl HeadlineIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `base`, or `base-N` with the next free counter if it is taken.
    pub fn unique(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }
        let counter = self.counters.entry(base.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{base}-{counter}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

fn is_slug_separator(c: char) -> bool {
    matches!(
        c,
        '[' | ']' | '&' | ' ' | '+' | '$' | ',' | ':' | ';' | '=' | '?' | '@' | '"' | '#' | '{'
            | '}' | '|' | '^' | '~' | '`' | '%' | '!' | '\'' | '<' | '>' | '.' | '/' | '('
            | ')' | '*' | '\\' | '\n' | '\t' | '\u{8}' | '\u{b}' | '\u{a0}'
    )
}

/// Lowercase `title`, turn punctuation and whitespace into single hyphens and trim
/// hyphens from both ends.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        let c = if is_slug_separator(c) { '-' } else { c };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(outline: &mut Outline, lvl: usize, n: usize) -> SectionId {
        outline.add(lvl, n, vec![], format!("h{n}"), vec![])
    }

    #[test]
    fn test_nesting() {
        let mut outline = Outline::new();
        let a = add(&mut outline, 1, 1);
        let b = add(&mut outline, 2, 2);
        let c = add(&mut outline, 3, 3);
        let d = add(&mut outline, 2, 4);
        let e = add(&mut outline, 1, 5);
        assert_eq!(outline.root().children, vec![a, e]);
        assert_eq!(outline.section(a).children, vec![b, d]);
        assert_eq!(outline.section(b).children, vec![c]);
        assert_eq!(outline.section(d).parent, Some(a));
        assert_eq!(outline.len(), 5);
    }

    #[test]
    fn test_skipped_levels() {
        let mut outline = Outline::new();
        let a = add(&mut outline, 3, 1);
        let b = add(&mut outline, 1, 2);
        let c = add(&mut outline, 2, 3);
        assert_eq!(outline.root().children, vec![a, b]);
        assert_eq!(outline.section(b).children, vec![c]);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Foo?"), "foo");
        assert_eq!(slugify("  a -- (b) c.d  "), "a-b-c-d");
        assert_eq!(slugify("Ünïcode stays"), "ünïcode-stays");
        assert_eq!(slugify("?!"), "");
    }

    #[test]
    fn test_unique_ids() {
        let mut ids = HeadlineIds::new();
        assert_eq!(ids.unique(&slugify("Foo")), "foo");
        assert_eq!(ids.unique(&slugify("Foo")), "foo-1");
        assert_eq!(ids.unique(&slugify("Foo?")), "foo-2");
    }

    #[test]
    fn test_unique_ids_skip_taken_suffix() {
        let mut ids = HeadlineIds::new();
        ids.unique("a-1");
        assert_eq!(ids.unique("a"), "a");
        assert_eq!(ids.unique("a"), "a-2");
    }
}
