//! Headlines, property drawers and drawers

use super::{Boundary, ParseContext, Parser};
use crate::org::ast::{plain_text, Drawer, Headline, Node, Paragraph, PropertyDrawer};
use crate::org::document::outline::slugify;
use crate::org::token::TokenKind;

impl Parser<'_> {
    pub(super) fn parse_headline(&mut self, start: usize, ctx: &ParseContext<'_>) -> Option<(usize, Node)> {
        let token = &self.tokens[start];
        let lvl = token.lvl;
        let mut text = token.content.clone();

        self.state.headline_count += 1;
        let index = self.state.headline_count;

        let mut status = None;
        let keywords: Vec<String> = self
            .setting("TODO")
            .split(|c: char| c.is_whitespace() || c == '|')
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        for keyword in keywords {
            if let Some(rest) = text.strip_prefix(keyword.as_str()) {
                if rest.starts_with(char::is_whitespace) {
                    text = rest.trim_start().to_string();
                    status = Some(keyword);
                    break;
                }
            }
        }

        let mut priority = None;
        let bytes = text.as_bytes();
        if bytes.len() >= 4
            && bytes.starts_with(b"[#")
            && matches!(bytes[2], b'A' | b'B' | b'C')
            && bytes[3] == b']'
        {
            priority = Some((bytes[2] as char).to_string());
            text = text[4..].trim().to_string();
        }

        let mut tags = Vec::new();
        let split = self
            .patterns
            .tags
            .captures(&text)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()));
        if let Some((rest, tag_list)) = split {
            tags = tag_list
                .split(':')
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            text = rest;
        }

        let title = self.parse_inline(&text);

        let child_ctx = ctx.nest(Boundary::Headline { level: lvl });
        let mut i = start + 1;
        let mut properties = None;
        if !child_ctx.should_stop(&self.tokens, i)
            && self.tokens[i].kind == TokenKind::BeginDrawer
            && self.tokens[i].content == "PROPERTIES"
        {
            if let Some((consumed, Node::PropertyDrawer(drawer))) =
                self.parse_property_drawer(i, &child_ctx)
            {
                properties = Some(drawer);
                i += consumed;
            }
        }

        let base = match properties.as_ref().and_then(|p| p.get("CUSTOM_ID")) {
            Some(custom) if !custom.is_empty() => custom.to_string(),
            _ => {
                let slug = slugify(&plain_text(&title));
                if slug.is_empty() {
                    format!("headline-{index}")
                } else {
                    slug
                }
            }
        };
        let id = self.state.ids.unique(&base);
        self.state
            .outline
            .add(lvl, index, title.clone(), id.clone(), tags.clone());

        let (consumed, children) = self.parse_many(i, &child_ctx);
        i += consumed;

        Some((
            i - start,
            Node::Headline(Headline {
                index,
                lvl,
                status,
                priority,
                properties,
                title,
                tags,
                children,
                id,
            }),
        ))
    }

    pub(super) fn parse_property_drawer(
        &mut self,
        start: usize,
        ctx: &ParseContext<'_>,
    ) -> Option<(usize, Node)> {
        let mut drawer = PropertyDrawer::default();
        let mut i = start + 1;
        while !ctx.should_stop(&self.tokens, i)
            && matches!(self.tokens[i].kind, TokenKind::Text | TokenKind::BeginDrawer)
        {
            let caps = self.patterns.property.captures(self.tokens[i].line())?;
            let key = caps[2].to_uppercase();
            let value = caps.get(4).map_or("", |m| m.as_str()).trim().to_string();
            drawer.properties.push((key, value));
            i += 1;
        }
        if i < self.tokens.len() && self.tokens[i].kind == TokenKind::EndDrawer {
            Some((i + 1 - start, Node::PropertyDrawer(drawer)))
        } else {
            None
        }
    }

    /// `:NAME:` ... `:END:`. A drawer line inside is kept as text; a missing
    /// `:END:` just ends the drawer where its content ends.
    pub(super) fn parse_drawer(&mut self, start: usize, ctx: &ParseContext<'_>) -> Option<(usize, Node)> {
        let name = self.tokens[start].content.clone();
        let child_ctx = ctx.nest(Boundary::Drawer);
        let mut children = Vec::new();
        let mut i = start + 1;
        loop {
            let (consumed, nodes) = self.parse_many(i, &child_ctx);
            i += consumed;
            children.extend(nodes);
            if i < self.tokens.len()
                && !ctx.should_stop(&self.tokens, i)
                && self.tokens[i].kind == TokenKind::BeginDrawer
            {
                let text = format!(":{}:", self.tokens[i].content);
                children.push(Node::Paragraph(Paragraph {
                    children: vec![Node::text(text)],
                }));
                i += 1;
            } else {
                break;
            }
        }
        if i < self.tokens.len()
            && !ctx.should_stop(&self.tokens, i)
            && self.tokens[i].kind == TokenKind::EndDrawer
        {
            i += 1;
        }
        Some((i - start, Node::Drawer(Drawer { name, children })))
    }
}

#[cfg(test)]
mod tests {
    use crate::org::ast::{plain_text, Node};
    use crate::org::parsing::tests::parse;

    fn headline(node: &Node) -> &crate::org::ast::Headline {
        match node {
            Node::Headline(h) => h,
            other => panic!("expected headline, got {other:?}"),
        }
    }

    #[test]
    fn test_status_priority_tags() {
        let (nodes, _) = parse("* TODO [#A] Write the parser :work:urgent:");
        let h = headline(&nodes[0]);
        assert_eq!(h.lvl, 1);
        assert_eq!(h.status.as_deref(), Some("TODO"));
        assert_eq!(h.priority.as_deref(), Some("A"));
        assert_eq!(h.tags, vec!["work", "urgent"]);
        assert_eq!(plain_text(&h.title), "Write the parser");
        assert_eq!(h.id, "write-the-parser");
    }

    #[test]
    fn test_status_must_be_whole_word() {
        let (nodes, _) = parse("* TODOS are fun\n* DONE");
        assert_eq!(headline(&nodes[0]).status, None);
        assert_eq!(headline(&nodes[1]).status, None);
        assert_eq!(plain_text(&headline(&nodes[1]).title), "DONE");
    }

    #[test]
    fn test_custom_todo_keywords() {
        let (nodes, _) = parse("#+TODO: NEXT | CANCELLED\n* NEXT thing");
        assert_eq!(headline(&nodes[1]).status.as_deref(), Some("NEXT"));
    }

    #[test]
    fn test_nesting() {
        let (nodes, state) = parse("* a\ntext\n** b\n*** c\n** d\n* e");
        assert_eq!(nodes.len(), 2);
        let a = headline(&nodes[0]);
        assert_eq!(a.children.len(), 3);
        let b = headline(&a.children[1]);
        assert_eq!(b.children.len(), 1);
        assert_eq!(state.outline.len(), 5);
        assert_eq!(state.outline.root().children.len(), 2);
    }

    #[test]
    fn test_property_drawer_lifted() {
        let (nodes, _) = parse("* a\n:PROPERTIES:\n:CUSTOM_ID: intro\n:empty:\n:END:\nbody");
        let h = headline(&nodes[0]);
        let properties = h.properties.as_ref().unwrap();
        assert_eq!(
            properties.properties,
            vec![
                ("CUSTOM_ID".to_string(), "intro".to_string()),
                ("EMPTY".to_string(), String::new())
            ]
        );
        assert_eq!(h.id, "intro");
        assert_eq!(h.children.len(), 1);
    }

    #[test]
    fn test_unterminated_property_drawer_is_text() {
        let (nodes, _) = parse("* a\n:PROPERTIES:\n:ID: x");
        let h = headline(&nodes[0]);
        assert!(h.properties.is_none());
        assert!(matches!(h.children[0], Node::Paragraph(_)));
    }

    #[test]
    fn test_ids_are_unique() {
        let (nodes, _) = parse("* Foo\n* Foo\n* Foo?\n* ???");
        let ids: Vec<_> = nodes.iter().map(|n| headline(n).id.clone()).collect();
        assert_eq!(ids, vec!["foo", "foo-1", "foo-2", "headline-4"]);
    }

    #[test]
    fn test_drawer() {
        let (nodes, _) = parse(":LOGBOOK:\n- note\n:END:\nafter");
        let Node::Drawer(drawer) = &nodes[0] else {
            panic!("expected drawer, got {nodes:?}");
        };
        assert_eq!(drawer.name, "LOGBOOK");
        assert!(matches!(drawer.children[0], Node::List(_)));
        assert!(matches!(nodes[1], Node::Paragraph(_)));
    }

    #[test]
    fn test_drawer_nested_begin_is_text() {
        let (nodes, _) = parse(":A:\nx\n:B:\ny\n:END:");
        let Node::Drawer(drawer) = &nodes[0] else {
            panic!("expected drawer, got {nodes:?}");
        };
        assert_eq!(nodes.len(), 1);
        assert_eq!(drawer.children.len(), 3);
        assert_eq!(drawer.children[1].plain_text(), ":B:");
    }
}
