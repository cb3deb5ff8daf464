//! Inline markup
//!
//! Text spans (paragraph contents, headline titles, table cells) are scanned into
//! inline nodes: text, emphasis, sub/superscript, links, footnote references,
//! statistic cookies and line breaks. See [`parser`] for the dispatch rules.

pub mod parser;

pub use parser::{InlineParser, InlinePatterns};
