//! Plain, ordered and descriptive lists

use super::{is_second_blank_line, Boundary, ParseContext, Parser};
use crate::org::ast::{DescriptiveListItem, List, ListItem, ListKind, Node};

impl Parser<'_> {
    /// Consecutive items at one indentation with the same bullet family.
    pub(super) fn parse_list(&mut self, start: usize, ctx: &ParseContext<'_>) -> Option<(usize, Node)> {
        let lvl = self.tokens[start].lvl;
        let family = ListKind::from_bullet(self.tokens[start].group(2));
        let kind = if family == ListKind::Unordered
            && self.patterns.descriptive.is_match(&self.tokens[start].content)
        {
            ListKind::Descriptive
        } else {
            family
        };

        let mut items = Vec::new();
        let mut i = start;
        while !ctx.should_stop(&self.tokens, i)
            && self.tokens[i].lvl == lvl
            && self.tokens[i].kind.is_list()
            && ListKind::from_bullet(self.tokens[i].group(2)) == family
        {
            let (consumed, item) = self.parse_list_item(i, ctx, kind);
            i += consumed;
            items.push(item);
        }
        Some((i - start, Node::List(List { kind, items })))
    }

    fn parse_list_item(
        &mut self,
        start: usize,
        ctx: &ParseContext<'_>,
        kind: ListKind,
    ) -> (usize, Node) {
        let token = &self.tokens[start];
        let bullet = token.group(2).to_string();
        let min_indent = token.lvl + bullet.len();
        let mut content = token.content.clone();

        let mut status = None;
        let checkbox = self
            .patterns
            .checkbox
            .captures(&content)
            .map(|caps| (caps[1].to_string(), caps[0].len()));
        if let Some((state, len)) = checkbox {
            status = Some(state);
            content = content[len..].to_string();
        }

        let mut term = None;
        let mut base_level = min_indent + 1;
        if kind == ListKind::Descriptive {
            // Details continue at the column after ` :: ` on the bullet line.
            if let Some(m) = self.patterns.descriptive.find(token.line()) {
                base_level = m.start() + 4;
            }
            let marker = self
                .patterns
                .descriptive
                .find(&content)
                .map(|m| (m.start(), m.end()));
            if let Some((begin, end)) = marker {
                term = Some(self.parse_inline(content[..begin].trim()));
                content = content[end..].trim_start().to_string();
            }
        }

        self.retokenize(start, &format!("{}{}", " ".repeat(min_indent), content));

        let item_ctx = ctx
            .nest(Boundary::ListItem { min_indent })
            .with_base_level(base_level);
        let mut children = Vec::new();
        let mut i = start;
        while !item_ctx.should_stop(&self.tokens, i)
            && !(i > start + 1 && is_second_blank_line(&self.tokens, i))
        {
            let (consumed, node) = self.parse_one(i, &item_ctx);
            i += consumed;
            children.push(node);
        }

        let node = if kind == ListKind::Descriptive {
            Node::DescriptiveListItem(DescriptiveListItem {
                bullet,
                status,
                term: term.unwrap_or_default(),
                details: children,
            })
        } else {
            Node::ListItem(ListItem {
                bullet,
                status,
                children,
            })
        };
        (i - start, node)
    }
}
