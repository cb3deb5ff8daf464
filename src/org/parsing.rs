//! Structural parser
//!
//!     A recursive-descent parser over the token list. [`Parser::parse_one`] dispatches
//!     on the kind of the current token to one construct parser; [`Parser::parse_many`]
//!     repeats that until the context says stop.
//!
//! Boundaries
//!
//!     Nesting is not described by a grammar. Each construct that has children builds a
//!     [`ParseContext`] for them: its own [`Boundary`] plus a reference to the enclosing
//!     context. A child stops when its own boundary or any ancestor's boundary is hit,
//!     so a list item inside a headline still ends at the next sibling headline.
//!     Blocks are the exception: they detach from their parent and end only at their
//!     matching `#+END_` line.
//!
//! Failure
//!
//!     Construct parsers return `None` when the input does not fit (an unterminated
//!     block, a malformed property drawer). `parse_one` then re-tokenizes the line as
//!     plain text and parses it as a paragraph, which always consumes at least one
//!     line, so parsing is total.

mod block;
mod footnote;
mod headline;
mod keyword;
mod list;
mod paragraph;
mod table;

use crate::org::ast::Node;
use crate::org::config::Configuration;
use crate::org::document::footnotes::Footnotes;
use crate::org::document::outline::{HeadlineIds, Outline};
use crate::org::document::settings::BufferSettings;
use crate::org::inlines::{InlineParser, InlinePatterns};
use crate::org::lexing::{compile, Lexer};
use crate::org::token::{Token, TokenKind};
use regex::Regex;
use std::path::Path;
use tracing::{debug, warn};

/// Where a nested parse has to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary<'n> {
    /// Only the end of input.
    Document,
    /// A headline of the same or a higher level.
    Headline { level: usize },
    /// Another drawer line or a headline.
    Drawer,
    /// The `#+END_<name>` line.
    Block { name: &'n str },
    /// A non-blank line indented less than the item's content.
    ListItem { min_indent: usize },
    /// A second blank line, a headline or the next definition.
    FootnoteDefinition { start: usize },
}

impl Boundary<'_> {
    pub fn is_hit(&self, tokens: &[Token], i: usize) -> bool {
        let t = &tokens[i];
        match *self {
            Boundary::Document => false,
            Boundary::Headline { level } => t.kind == TokenKind::Headline && t.lvl <= level,
            Boundary::Drawer => matches!(
                t.kind,
                TokenKind::BeginDrawer | TokenKind::EndDrawer | TokenKind::Headline
            ),
            Boundary::Block { name } => t.kind == TokenKind::EndBlock && t.content == name,
            Boundary::ListItem { min_indent } => t.lvl < min_indent && !t.is_blank(),
            Boundary::FootnoteDefinition { start } => {
                (i > start + 1 && is_second_blank_line(tokens, i))
                    || matches!(t.kind, TokenKind::Headline | TokenKind::FootnoteDefinition)
            }
        }
    }
}

/// Immutable description of the current nesting, passed down the recursion.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub boundary: Boundary<'a>,
    /// Indentation that paragraph continuation lines are made relative to.
    pub base_level: usize,
    pub parent: Option<&'a ParseContext<'a>>,
}

impl<'a> ParseContext<'a> {
    pub fn root() -> Self {
        ParseContext {
            boundary: Boundary::Document,
            base_level: 0,
            parent: None,
        }
    }

    /// A child context that also honours every boundary of `self`.
    pub fn nest<'b>(&'b self, boundary: Boundary<'b>) -> ParseContext<'b>
    where
        'a: 'b,
    {
        ParseContext {
            boundary,
            base_level: self.base_level,
            parent: Some(self),
        }
    }

    /// A context bounded only by `boundary`.
    pub fn detach<'b>(&self, boundary: Boundary<'b>) -> ParseContext<'b> {
        ParseContext {
            boundary,
            base_level: self.base_level,
            parent: None,
        }
    }

    pub fn with_base_level(mut self, base_level: usize) -> Self {
        self.base_level = base_level;
        self
    }

    pub fn should_stop(&self, tokens: &[Token], i: usize) -> bool {
        i >= tokens.len()
            || self.boundary.is_hit(tokens, i)
            || self.parent.is_some_and(|p| p.should_stop(tokens, i))
    }
}

/// `tokens[i]` is a blank line directly following another blank line.
pub fn is_second_blank_line(tokens: &[Token], i: usize) -> bool {
    i >= 2 && tokens[i - 1].is_blank() && tokens[i].is_blank()
}

/// Document-wide tables filled in while parsing.
#[derive(Debug, Default)]
pub struct ParseState {
    pub footnotes: Footnotes,
    pub outline: Outline,
    pub ids: HeadlineIds,
    pub settings: BufferSettings,
    pub headline_count: usize,
}

/// Patterns used by the construct parsers.
#[derive(Debug, Clone)]
struct Patterns {
    tags: Regex,
    property: Regex,
    checkbox: Regex,
    descriptive: Regex,
    include: Regex,
    unescape: Regex,
    align_cookie: Regex,
    numeric: Regex,
}

impl Patterns {
    fn new() -> Self {
        Patterns {
            tags: compile(r"^(.*?)\s+(:[A-Za-z0-9_@#%:]+:)\s*$"),
            property: compile(r"^(\s*):(\S+):(\s+(.*)$|$)"),
            checkbox: compile(r"^\[( |X|-)\](\s+|$)"),
            descriptive: compile(r"\s::(\s|$)"),
            include: compile(r#"(?i)^"([^"]+)" (src|example|export) (\w+)$"#),
            unescape: compile(r"(^|\n)([ \t]*),([ \t]*)(\*|,\*|#\+|,#\+)"),
            align_cookie: compile(r"^<(l|c|r)?[0-9]*>$"),
            numeric: compile(r"^[-+]?([0-9]+([.,][0-9]*)?|[.,][0-9]+)([eE][-+]?[0-9]+)?$"),
        }
    }
}

/// One parse of one token list.
pub struct Parser<'a> {
    lexer: &'a Lexer,
    config: &'a Configuration,
    path: Option<&'a Path>,
    patterns: Patterns,
    inline_patterns: InlinePatterns,
    tokens: Vec<Token>,
    state: ParseState,
}

impl<'a> Parser<'a> {
    pub fn new(
        lexer: &'a Lexer,
        config: &'a Configuration,
        tokens: Vec<Token>,
        path: Option<&'a Path>,
    ) -> Self {
        Parser {
            lexer,
            config,
            path,
            patterns: Patterns::new(),
            inline_patterns: InlinePatterns::new(),
            tokens,
            state: ParseState::default(),
        }
    }

    /// Parse every token into the top-level node forest.
    pub fn parse(mut self) -> (Vec<Node>, ParseState) {
        debug!(lines = self.tokens.len(), "parsing document");
        let (_, nodes) = self.parse_many(0, &ParseContext::root());
        (nodes, self.state)
    }

    pub fn parse_many(&mut self, start: usize, ctx: &ParseContext<'_>) -> (usize, Vec<Node>) {
        let mut i = start;
        let mut nodes = Vec::new();
        while !ctx.should_stop(&self.tokens, i) {
            let (consumed, node) = self.parse_one(i, ctx);
            i += consumed;
            nodes.push(node);
        }
        (i - start, nodes)
    }

    pub fn parse_one(&mut self, i: usize, ctx: &ParseContext<'_>) -> (usize, Node) {
        let kind = self.tokens[i].kind;
        let is_properties = self.tokens[i].content == "PROPERTIES";
        let parsed = match kind {
            TokenKind::UnorderedList | TokenKind::OrderedList => self.parse_list(i, ctx),
            TokenKind::TableRow | TokenKind::TableSeparator => self.parse_table(i, ctx),
            TokenKind::BeginBlock => self.parse_block(i, ctx),
            TokenKind::BeginDrawer if is_properties => {
                self.parse_property_drawer(i, ctx)
            }
            TokenKind::BeginDrawer => self.parse_drawer(i, ctx),
            TokenKind::Text => self.parse_paragraph(i, ctx),
            TokenKind::Example => self.parse_example(i, ctx),
            TokenKind::HorizontalRule => Some((1, Node::HorizontalRule)),
            TokenKind::Comment => self.parse_comment(i),
            TokenKind::Keyword => self.parse_keyword(i, ctx),
            TokenKind::Headline => self.parse_headline(i, ctx),
            TokenKind::FootnoteDefinition => self.parse_footnote_definition(i, ctx),
            TokenKind::EndDrawer | TokenKind::EndBlock => None,
        };

        match parsed {
            Some((consumed, node)) if consumed > 0 => (consumed, node),
            _ => {
                let line = self.tokens[i].line().to_string();
                warn!(?kind, %line, "could not parse token, falling back to plain text");
                self.tokens[i] = self.lexer.plain_text(&line);
                self.parse_one(i, ctx)
            }
        }
    }

    pub(crate) fn parse_inline(&mut self, text: &str) -> Vec<Node> {
        InlineParser::new(&self.inline_patterns, self.config, &mut self.state.footnotes).parse(text)
    }

    /// Buffer setting, falling back to the configured default.
    fn setting(&self, key: &str) -> &str {
        self.state
            .settings
            .get(key)
            .or_else(|| self.config.default_settings.get(key).map(String::as_str))
            .unwrap_or("")
    }

    /// Re-classify a line in place, e.g. after a list bullet has been blanked out.
    fn retokenize(&mut self, i: usize, line: &str) {
        self.tokens[i] = self.lexer.tokenize(line);
    }
}
