//! Line tokenizer
//!
//!     Each line is matched against a fixed, prioritized list of patterns. The first
//!     pattern that matches decides the token kind; the catch-all text pattern matches
//!     anything, so tokenization is total.
//!
//!     Priority order:
//!         headline, drawer end/begin, block begin/end, unordered/ordered list item,
//!         table separator/row, horizontal rule, keyword, comment, footnote definition,
//!         example line, text.
//!
//!     The compiled patterns live in a [`Lexer`] value instead of process globals, so
//!     independently configured documents never share state.

pub mod parameters;

use crate::org::token::{Token, TokenKind};
use regex::Regex;
use std::io::BufRead;

/// How the indentation level of a token is derived from its captures.
#[derive(Debug, Clone, Copy)]
enum Level {
    /// Length of capture group 1 (leading whitespace).
    Indent,
    /// Length of capture group 1 (the star run) for headlines.
    Stars,
    /// Always zero.
    Zero,
}

#[derive(Debug, Clone)]
struct LinePattern {
    kind: TokenKind,
    regex: Regex,
    content: usize,
    level: Level,
    uppercase: bool,
}

/// Compiled line patterns.
#[derive(Debug, Clone)]
pub struct Lexer {
    patterns: Vec<LinePattern>,
    text: Regex,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        let pattern = |kind, re: &str, content, level, uppercase| LinePattern {
            kind,
            regex: compile(re),
            content,
            level,
            uppercase,
        };
        let patterns = vec![
            pattern(TokenKind::Headline, r"^([*]+)\s+(.*)", 2, Level::Stars, false),
            pattern(TokenKind::EndDrawer, r"^(\s*):(?i:END):\s*$", 0, Level::Indent, false),
            pattern(TokenKind::BeginDrawer, r"^(\s*):(\S+):\s*$", 2, Level::Indent, true),
            pattern(TokenKind::BeginBlock, r"(?i)^(\s*)#\+BEGIN_(\w+)(.*)", 2, Level::Indent, true),
            pattern(TokenKind::EndBlock, r"(?i)^(\s*)#\+END_(\w+)", 2, Level::Indent, true),
            pattern(TokenKind::UnorderedList, r"^(\s*)([+*-])(\s+(.*)|$)", 4, Level::Indent, false),
            pattern(
                TokenKind::OrderedList,
                r"^(\s*)(([0-9]+|[a-zA-Z])[.)])(\s+(.*)|$)",
                5,
                Level::Indent,
                false,
            ),
            pattern(TokenKind::TableSeparator, r"^(\s*)(\|-[-+|]*)\s*$", 2, Level::Indent, false),
            pattern(TokenKind::TableRow, r"^(\s*)(\|.*)", 2, Level::Indent, false),
            pattern(TokenKind::HorizontalRule, r"^(\s*)-{5,}\s*$", 0, Level::Indent, false),
            pattern(TokenKind::Keyword, r"^(\s*)#\+([^:\s]+):(\s+(.*)|\s*$)", 2, Level::Indent, false),
            pattern(TokenKind::Comment, r"^(\s*)#(.*)", 2, Level::Indent, false),
            pattern(
                TokenKind::FootnoteDefinition,
                r"^\[fn:([\w-]+)\](\s+(.+)|\s*$)",
                1,
                Level::Zero,
                false,
            ),
            pattern(TokenKind::Example, r"^(\s*):(\s(.*)|$)", 3, Level::Indent, false),
        ];
        Lexer {
            patterns,
            text: compile(r"^(\s*)(.*)"),
        }
    }

    /// Classify a single line (without its line terminator).
    pub fn tokenize(&self, line: &str) -> Token {
        for pattern in &self.patterns {
            if let Some(caps) = pattern.regex.captures(line) {
                let matches: Vec<String> = caps
                    .iter()
                    .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                    .collect();
                let lvl = match pattern.level {
                    Level::Indent | Level::Stars => matches[1].len(),
                    Level::Zero => 0,
                };
                let content = if pattern.content == 0 {
                    String::new()
                } else if pattern.uppercase {
                    matches[pattern.content].to_uppercase()
                } else {
                    matches[pattern.content].clone()
                };
                return Token {
                    kind: pattern.kind,
                    lvl,
                    content,
                    matches,
                };
            }
        }
        self.plain_text(line)
    }

    /// Tokenize `line` as text regardless of what it looks like.
    pub fn plain_text(&self, line: &str) -> Token {
        let (indent, rest) = match self.text.captures(line) {
            Some(caps) => (
                caps.get(1).map_or("", |m| m.as_str()),
                caps.get(2).map_or("", |m| m.as_str()),
            ),
            None => ("", line),
        };
        Token {
            kind: TokenKind::Text,
            lvl: indent.len(),
            content: rest.to_string(),
            matches: vec![line.to_string(), indent.to_string(), rest.to_string()],
        }
    }

    /// Tokenize every line of `input`.
    ///
    /// Lines are split on `\n`, a trailing `\r` is dropped and invalid UTF-8 is
    /// replaced rather than rejected.
    pub fn tokenize_all<R: BufRead>(&self, mut input: R) -> std::io::Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            if buf.last() == Some(&b'\n') {
                buf.pop();
            }
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
            tokens.push(self.tokenize(&String::from_utf8_lossy(&buf)));
        }
        Ok(tokens)
    }

    /// Tokenize an in-memory string.
    pub fn tokenize_str(&self, input: &str) -> Vec<Token> {
        input.lines().map(|line| self.tokenize(line)).collect()
    }
}

/// Compile one of the crate's own patterns. They are constants, so failure is a bug.
pub(crate) fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("invalid built-in pattern {pattern:?}: {err}"),
    }
}
