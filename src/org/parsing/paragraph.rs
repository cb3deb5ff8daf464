//! Paragraphs and comments

use super::{ParseContext, Parser};
use crate::org::ast::{Comment, Node, Paragraph};
use crate::org::token::TokenKind;

impl Parser<'_> {
    /// The first line is always taken, so a paragraph never consumes nothing.
    /// Following lines join until a blank line or a non-text line. Continuation
    /// lines keep whatever indentation they have beyond the context's base level.
    pub(super) fn parse_paragraph(&mut self, start: usize, ctx: &ParseContext<'_>) -> Option<(usize, Node)> {
        let mut lines = vec![self.tokens[start].content.clone()];
        let mut i = start + 1;
        while !ctx.should_stop(&self.tokens, i)
            && self.tokens[i].kind == TokenKind::Text
            && !self.tokens[i].content.is_empty()
        {
            let token = &self.tokens[i];
            let indent = token.lvl.saturating_sub(ctx.base_level);
            lines.push(format!("{}{}", " ".repeat(indent), token.content));
            i += 1;
        }
        let children = self.parse_inline(&lines.join("\n"));
        Some((i - start, Node::Paragraph(Paragraph { children })))
    }

    pub(super) fn parse_comment(&mut self, start: usize) -> Option<(usize, Node)> {
        let content = self.tokens[start].content.clone();
        Some((1, Node::Comment(Comment { content })))
    }
}
