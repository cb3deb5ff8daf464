//! Footnote definitions

use super::{Boundary, ParseContext, Parser};
use crate::org::ast::{FootnoteDefinition, Node};

impl Parser<'_> {
    /// `[fn:name] text` and the lines that follow it. The definition stays in the
    /// tree where it was written and is also registered with the footnotes.
    pub(super) fn parse_footnote_definition(
        &mut self,
        start: usize,
        ctx: &ParseContext<'_>,
    ) -> Option<(usize, Node)> {
        let name = self.tokens[start].content.clone();
        let rest = self.tokens[start].group(3).to_string();
        self.retokenize(start, &rest);

        let definition_ctx = ctx.nest(Boundary::FootnoteDefinition { start });
        let (consumed, children) = self.parse_many(start, &definition_ctx);
        let definition = FootnoteDefinition {
            name,
            children,
            inline: false,
        };
        self.state.footnotes.add_definition(definition.clone());
        Some((consumed, Node::FootnoteDefinition(definition)))
    }
}
