//! Single-pass inline scanner
//!
//!     The scanner walks the text once, keeping the start of pending plain text
//!     (`previous`) and the cursor (`current`). Characters that can open a construct
//!     dispatch to a sub-parser:
//!
//!         ^       superscript
//!         _       subscript, else underline emphasis
//!         * / + = ~   emphasis
//!         [       link, footnote reference or statistic cookie
//!         \       explicit line break
//!         \n      line break
//!         :       autolink (may rewind over the protocol it finds behind the cursor)
//!
//!     Sub-parsers return zero consumption when they do not match; the scanner then
//!     moves on by one character. Nothing is ever re-scanned except the protocol of an
//!     autolink, and only back to `previous`.
//!
//!     Emphasis borders follow org's `org-emphasis-regexp-components`: the opening
//!     marker needs start-of-text or a pre character before it and a non-space after
//!     it; the closing marker needs a non-space before it and end-of-text or a post
//!     character after it.

use crate::org::ast::{
    Emphasis, FootnoteDefinition, FootnoteLink, LineBreak, Node, Paragraph, RegularLink,
    StatisticToken, Text,
};
use crate::org::config::Configuration;
use crate::org::document::footnotes::Footnotes;
use crate::org::lexing::compile;
use regex::Regex;

const PRE_CHARS: &str = "-({'\"";
const POST_CHARS: &str = "-.,:!?;'\")}]";
const URL_CHARS: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~:/?#[]@!$&'()*+,;=%";
const AUTOLINK_PROTOCOLS: &[&str] = &["http", "https", "ftp", "file"];

/// Compiled patterns used by the scanner.
#[derive(Debug, Clone)]
pub struct InlinePatterns {
    footnote: Regex,
    statistic: Regex,
}

impl Default for InlinePatterns {
    fn default() -> Self {
        Self::new()
    }
}

impl InlinePatterns {
    pub fn new() -> Self {
        InlinePatterns {
            footnote: compile(r"^\[fn:([\w-]+?)(:(.*?))?\]"),
            statistic: compile(r"^\[(\d+/\d+|\d+%)\]"),
        }
    }
}

/// Text being scanned, indexed by character with byte offsets alongside.
struct Source<'t> {
    text: &'t str,
    chars: Vec<char>,
    offsets: Vec<usize>,
}

impl<'t> Source<'t> {
    fn new(text: &'t str) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut offsets = Vec::with_capacity(text.len() + 1);
        for (offset, c) in text.char_indices() {
            chars.push(c);
            offsets.push(offset);
        }
        offsets.push(text.len());
        Source {
            text,
            chars,
            offsets,
        }
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn at(&self, i: usize) -> Option<char> {
        self.chars.get(i).copied()
    }

    fn slice(&self, start: usize, end: usize) -> &'t str {
        &self.text[self.offsets[start]..self.offsets[end]]
    }

    fn rest(&self, start: usize) -> &'t str {
        &self.text[self.offsets[start]..]
    }

    /// Character index of the first occurrence of `needle` at or after `start`.
    fn find(&self, start: usize, needle: &str) -> Option<usize> {
        let byte = self.rest(start).find(needle)? + self.offsets[start];
        self.offsets.binary_search(&byte).ok()
    }
}

/// Result of a sub-parser: characters consumed and the node produced.
type Parsed = Option<(usize, Node)>;

/// Inline scanner bound to a document's footnote registry.
pub struct InlineParser<'a> {
    patterns: &'a InlinePatterns,
    footnotes: &'a mut Footnotes,
    max_emphasis_new_lines: usize,
    auto_link: bool,
}

impl<'a> InlineParser<'a> {
    pub fn new(
        patterns: &'a InlinePatterns,
        config: &Configuration,
        footnotes: &'a mut Footnotes,
    ) -> Self {
        InlineParser {
            patterns,
            footnotes,
            max_emphasis_new_lines: config.max_emphasis_new_lines,
            auto_link: config.auto_link,
        }
    }

    pub fn parse(&mut self, text: &str) -> Vec<Node> {
        let source = Source::new(text);
        let mut nodes = Vec::new();
        let (mut previous, mut current) = (0, 0);

        while current < source.len() {
            let (rewind, parsed) = match source.chars[current] {
                '^' => (0, self.parse_sub_or_superscript(&source, current)),
                '_' => (
                    0,
                    self.parse_sub_or_superscript(&source, current)
                        .or_else(|| self.parse_emphasis(&source, current)),
                ),
                '*' | '/' | '=' | '~' | '+' => (0, self.parse_emphasis(&source, current)),
                '[' => (0, self.parse_bracket(&source, current)),
                '\\' => (0, self.parse_explicit_line_break(&source, current)),
                '\n' => (0, self.parse_line_break(&source, current)),
                ':' => match self.parse_auto_link(&source, current, previous) {
                    Some((rewind, consumed, node)) => (rewind, Some((consumed, node))),
                    None => (0, None),
                },
                _ => (0, None),
            };

            match parsed {
                Some((consumed, node)) if consumed > 0 => {
                    let start = current - rewind;
                    if start > previous {
                        nodes.push(Node::text(source.slice(previous, start)));
                    }
                    nodes.push(node);
                    current = start + consumed;
                    previous = current;
                }
                _ => current += 1,
            }
        }

        if previous < source.len() {
            nodes.push(Node::text(source.slice(previous, source.len())));
        }
        nodes
    }

    fn parse_line_break(&self, source: &Source, start: usize) -> Parsed {
        let count = source.chars[start..]
            .iter()
            .take_while(|&&c| c == '\n')
            .count();
        Some((count, Node::LineBreak(LineBreak { count })))
    }

    fn parse_explicit_line_break(&self, source: &Source, start: usize) -> Parsed {
        if start == 0 || source.at(start - 1) == Some('\n') || source.at(start + 1) != Some('\\')
        {
            return None;
        }
        for i in start + 2..source.len() {
            match source.chars[i] {
                '\n' => return Some((i + 1 - start, Node::ExplicitLineBreak)),
                c if c.is_whitespace() => continue,
                _ => return None,
            }
        }
        // Only whitespace up to the end of the text.
        Some((source.len() - start, Node::ExplicitLineBreak))
    }

    fn parse_sub_or_superscript(&self, source: &Source, start: usize) -> Parsed {
        if source.at(start + 1) != Some('{') {
            return None;
        }
        let close = (start + 2..source.len()).find(|&i| matches!(source.chars[i], '}' | '\n'))?;
        if source.chars[close] != '}' {
            return None;
        }
        let kind = format!("{}{{}}", source.chars[start]);
        let content = source.slice(start + 2, close);
        Some((
            close + 1 - start,
            Node::Emphasis(Emphasis {
                kind,
                children: vec![Node::text(content)],
            }),
        ))
    }

    fn parse_bracket(&mut self, source: &Source, start: usize) -> Parsed {
        if source.at(start + 1) == Some('[') {
            return self.parse_regular_link(source, start);
        }
        self.parse_footnote_reference(source, start)
            .or_else(|| self.parse_statistic_token(source, start))
    }

    fn parse_regular_link(&mut self, source: &Source, start: usize) -> Parsed {
        let end = source.find(start + 2, "]]")?;
        let inner = source.slice(start + 2, end);
        let parts: Vec<&str> = inner.split("][").collect();
        let url = parts[0];
        // `[[url][a][b]]` keeps the url and drops the ambiguous description.
        let description = match parts.as_slice() {
            [_, description] => Some(self.parse(description)),
            _ => None,
        };
        if url.is_empty() {
            return None;
        }
        let protocol = url.split_once(':').map(|(p, _)| p).unwrap_or("");
        Some((
            end + 2 - start,
            Node::RegularLink(RegularLink {
                protocol: protocol.to_string(),
                description,
                url: url.to_string(),
                auto_link: false,
            }),
        ))
    }

    fn parse_footnote_reference(&mut self, source: &Source, start: usize) -> Parsed {
        let caps = self.patterns.footnote.captures(source.rest(start))?;
        let whole = caps.get(0)?.as_str();
        let name = caps.get(1)?.as_str().to_string();
        let definition = caps.get(3).map(|m| m.as_str()).unwrap_or("");

        let mut link = FootnoteLink {
            name: name.clone(),
            definition: None,
        };
        if definition.is_empty() {
            self.footnotes.add_reference(&name);
        } else {
            let children = self.parse(definition);
            let definition = FootnoteDefinition {
                name,
                children: vec![Node::Paragraph(Paragraph { children })],
                inline: true,
            };
            self.footnotes.add_definition(definition.clone());
            link.definition = Some(Box::new(definition));
        }
        Some((whole.chars().count(), Node::FootnoteLink(link)))
    }

    fn parse_statistic_token(&self, source: &Source, start: usize) -> Parsed {
        let caps = self.patterns.statistic.captures(source.rest(start))?;
        let whole = caps.get(0)?.as_str();
        let content = caps.get(1)?.as_str().to_string();
        Some((
            whole.chars().count(),
            Node::StatisticToken(StatisticToken { content }),
        ))
    }

    /// Returns `(rewind, consumed, node)`; `rewind` covers the protocol before `:`.
    fn parse_auto_link(
        &self,
        source: &Source,
        start: usize,
        previous: usize,
    ) -> Option<(usize, usize, Node)> {
        if !self.auto_link
            || source.at(start + 1) != Some('/')
            || source.at(start + 2) != Some('/')
        {
            return None;
        }
        let mut protocol_start = start;
        while protocol_start > previous && source.chars[protocol_start - 1].is_alphabetic() {
            protocol_start -= 1;
        }
        if protocol_start > 0 && !source.chars[protocol_start - 1].is_whitespace() {
            return None;
        }
        let protocol = source.slice(protocol_start, start);
        if !AUTOLINK_PROTOCOLS.contains(&protocol) {
            return None;
        }
        let end = (start..source.len())
            .find(|&i| !URL_CHARS.contains(source.chars[i]))
            .unwrap_or(source.len());
        if end - start <= 3 {
            return None;
        }
        let rewind = start - protocol_start;
        let url = source.slice(protocol_start, end);
        Some((
            rewind,
            end - protocol_start,
            Node::RegularLink(RegularLink {
                protocol: protocol.to_string(),
                description: None,
                url: url.to_string(),
                auto_link: true,
            }),
        ))
    }

    fn parse_emphasis(&mut self, source: &Source, start: usize) -> Parsed {
        let marker = source.chars[start];
        if !has_valid_pre_and_border_chars(source, start) {
            return None;
        }
        let mut new_lines = 0;
        let mut i = start + 1;
        while i < source.len() && new_lines <= self.max_emphasis_new_lines {
            if source.chars[i] == '\n' {
                new_lines += 1;
            }
            if source.chars[i] == marker
                && i != start + 1
                && has_valid_post_and_border_chars(source, i)
            {
                let content = source.slice(start + 1, i);
                let children = if marker == '=' || marker == '~' {
                    vec![Node::Text(Text::raw(content))]
                } else {
                    self.parse(content)
                };
                return Some((
                    i + 1 - start,
                    Node::Emphasis(Emphasis {
                        kind: marker.to_string(),
                        children,
                    }),
                ));
            }
            i += 1;
        }
        None
    }
}

fn is_valid_pre_char(c: char) -> bool {
    c.is_whitespace() || PRE_CHARS.contains(c)
}

fn is_valid_post_char(c: char) -> bool {
    c.is_whitespace() || POST_CHARS.contains(c)
}

fn is_valid_border_char(c: char) -> bool {
    !c.is_whitespace()
}

fn has_valid_pre_and_border_chars(source: &Source, i: usize) -> bool {
    source.at(i + 1).map_or(true, is_valid_border_char)
        && (i == 0 || is_valid_pre_char(source.chars[i - 1]))
}

fn has_valid_post_and_border_chars(source: &Source, i: usize) -> bool {
    (i == 0 || is_valid_border_char(source.chars[i - 1]))
        && source.at(i + 1).map_or(true, is_valid_post_char)
}
