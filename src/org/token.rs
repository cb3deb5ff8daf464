//! Line tokens
//!
//!     Org is line oriented: every input line becomes exactly one [`Token`]. The token
//!     records what kind of line it is, how deeply it is indented and the payload the
//!     structural parser needs. The raw capture groups are kept so parsers can pick up
//!     secondary fields (block parameters, the remainder of a footnote line) and so a
//!     line can be re-tokenized as plain text when a construct fails to parse.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Headline,
    BeginDrawer,
    EndDrawer,
    BeginBlock,
    EndBlock,
    UnorderedList,
    OrderedList,
    TableSeparator,
    TableRow,
    HorizontalRule,
    Keyword,
    Comment,
    FootnoteDefinition,
    Example,
    Text,
}

impl TokenKind {
    pub fn is_list(self) -> bool {
        matches!(self, TokenKind::UnorderedList | TokenKind::OrderedList)
    }

    pub fn is_table(self) -> bool {
        matches!(self, TokenKind::TableRow | TokenKind::TableSeparator)
    }
}

/// One classified source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Leading whitespace length, or the number of stars for headlines.
    pub lvl: usize,
    pub content: String,
    /// Capture groups of the matching pattern; `matches[0]` is the whole line.
    /// Groups that did not participate are empty strings.
    pub matches: Vec<String>,
}

impl Token {
    /// Capture group `i`, or `""` when absent.
    pub fn group(&self, i: usize) -> &str {
        self.matches.get(i).map(String::as_str).unwrap_or("")
    }

    /// The full source line this token was produced from.
    pub fn line(&self) -> &str {
        self.group(0)
    }

    /// A text token whose content is empty.
    pub fn is_blank(&self) -> bool {
        self.kind == TokenKind::Text && self.content.is_empty()
    }
}
