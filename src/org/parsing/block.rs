//! `#+BEGIN_<name>` blocks and `: ` example lines

use super::{Boundary, ParseContext, Parser};
use crate::org::ast::{is_raw_block, raw_lines, Block, Example, Node, Text};
use crate::org::lexing::parameters::split_parameters;
use crate::org::token::TokenKind;

/// Drop up to `max` leading whitespace bytes.
fn trim_indent_up_to(line: &str, max: usize) -> &str {
    let cut = line
        .char_indices()
        .take_while(|(i, c)| *i < max && c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    &line[cut..]
}

impl Parser<'_> {
    pub(super) fn parse_block(&mut self, start: usize, ctx: &ParseContext<'_>) -> Option<(usize, Node)> {
        let token = &self.tokens[start];
        let name = token.content.clone();
        let lvl = token.lvl;
        let parameters = split_parameters(token.group(3));

        let block_ctx = ctx.detach(Boundary::Block { name: &name });
        let mut i = start + 1;
        let children = if is_raw_block(&name) {
            let mut raw = String::new();
            while !block_ctx.should_stop(&self.tokens, i) {
                raw.push_str(trim_indent_up_to(self.tokens[i].line(), lvl));
                raw.push('\n');
                i += 1;
            }
            let org_source = name == "SRC" && parameters.first().is_some_and(|p| p == "org");
            if name == "EXAMPLE" || org_source {
                raw = self
                    .patterns
                    .unescape
                    .replace_all(&raw, "${1}${2}${3}${4}")
                    .into_owned();
            }
            raw_lines(&raw)
        } else {
            let (consumed, nodes) = self.parse_many(i, &block_ctx);
            i += consumed;
            nodes
        };

        let terminated = i < self.tokens.len()
            && self.tokens[i].kind == TokenKind::EndBlock
            && self.tokens[i].content == name;
        if !terminated {
            return None;
        }
        Some((
            i + 1 - start,
            Node::Block(Block {
                name,
                parameters,
                children,
            }),
        ))
    }

    pub(super) fn parse_example(&mut self, start: usize, ctx: &ParseContext<'_>) -> Option<(usize, Node)> {
        let mut children = Vec::new();
        let mut i = start;
        while !ctx.should_stop(&self.tokens, i) && self.tokens[i].kind == TokenKind::Example {
            children.push(Node::Text(Text::raw(self.tokens[i].content.clone())));
            i += 1;
        }
        Some((i - start, Node::Example(Example { children })))
    }
}
