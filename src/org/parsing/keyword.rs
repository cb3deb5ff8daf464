//! `#+KEY: value` lines
//!
//! Plain keywords become document settings. `#+CAPTION:` and `#+ATTR_HTML:` attach to
//! the construct that follows them, and `#+INCLUDE:` records a file to be pulled in
//! when the document is written.

use super::{ParseContext, Parser};
use crate::org::ast::{Include, Keyword, Metadata, Node, NodeWithMeta};
use crate::org::lexing::parameters::split_attributes;
use crate::org::token::{Token, TokenKind};
use std::path::PathBuf;
use tracing::warn;

fn keyword_of(token: &Token) -> Keyword {
    Keyword {
        key: token.group(2).to_uppercase(),
        value: token.group(4).trim().to_string(),
    }
}

impl Parser<'_> {
    pub(super) fn parse_keyword(&mut self, start: usize, ctx: &ParseContext<'_>) -> Option<(usize, Node)> {
        let keyword = keyword_of(&self.tokens[start]);
        match keyword.key.as_str() {
            "INCLUDE" => {
                if let Some(include) = self.parse_include(&keyword) {
                    return Some((1, Node::Include(include)));
                }
                warn!(value = %keyword.value, "malformed include, keeping it as a keyword");
            }
            "CAPTION" | "ATTR_HTML" => {
                if let Some(parsed) = self.parse_affiliated(start, ctx) {
                    return Some(parsed);
                }
            }
            _ => {}
        }
        self.state.settings.insert(&keyword.key, &keyword.value);
        Some((1, Node::Keyword(keyword)))
    }

    fn parse_include(&self, keyword: &Keyword) -> Option<Include> {
        let caps = self.patterns.include.captures(&keyword.value)?;
        let mut path = PathBuf::from(&caps[1]);
        if path.is_relative() {
            if let Some(dir) = self.path.and_then(|p| p.parent()) {
                path = dir.join(path);
            }
        }
        Some(Include {
            keyword: keyword.clone(),
            path,
            kind: caps[2].to_uppercase(),
            lang: caps[3].to_string(),
        })
    }

    /// A run of affiliated keywords followed by the construct they describe.
    fn parse_affiliated(&mut self, start: usize, ctx: &ParseContext<'_>) -> Option<(usize, Node)> {
        let mut meta = Metadata::default();
        let mut i = start;
        while !ctx.should_stop(&self.tokens, i) && self.tokens[i].kind == TokenKind::Keyword {
            let keyword = keyword_of(&self.tokens[i]);
            match keyword.key.as_str() {
                "CAPTION" => {
                    let caption = self.parse_inline(&keyword.value);
                    meta.caption.push(caption);
                }
                "ATTR_HTML" => meta.html_attributes.push(split_attributes(&keyword.value)),
                _ => break,
            }
            i += 1;
        }
        if ctx.should_stop(&self.tokens, i) || self.tokens[i].is_blank() {
            return None;
        }
        let (consumed, node) = self.parse_one(i, ctx);
        i += consumed;
        Some((
            i - start,
            Node::NodeWithMeta(NodeWithMeta {
                node: Box::new(node),
                meta,
            }),
        ))
    }
}
