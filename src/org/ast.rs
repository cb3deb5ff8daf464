//! Document tree
//!
//!     The node set is closed: every construct the parser can produce is a variant of
//!     [`Node`], and writers match on it exhaustively. Structural nodes (headlines,
//!     lists, tables, blocks) own their children; inline nodes (text, emphasis, links)
//!     appear inside paragraphs, titles and table cells.
//!
//!     Nodes carry only what the writers need to re-serialize them. Source positions are
//!     not tracked.

use crate::org::error::OrgError;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Node {
    Headline(Headline),
    Block(Block),
    Drawer(Drawer),
    PropertyDrawer(PropertyDrawer),
    List(List),
    ListItem(ListItem),
    DescriptiveListItem(DescriptiveListItem),
    Table(Table),
    TableHeader(TableRow),
    TableRow(TableRow),
    TableSeparator,
    Paragraph(Paragraph),
    Example(Example),
    Text(Text),
    Emphasis(Emphasis),
    LineBreak(LineBreak),
    ExplicitLineBreak,
    StatisticToken(StatisticToken),
    RegularLink(RegularLink),
    FootnoteLink(FootnoteLink),
    FootnoteDefinition(FootnoteDefinition),
    Keyword(Keyword),
    Include(Include),
    Comment(Comment),
    HorizontalRule,
    NodeWithMeta(NodeWithMeta),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    /// 1-based position among all headlines of the document.
    pub index: usize,
    pub lvl: usize,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub properties: Option<PropertyDrawer>,
    pub title: Vec<Node>,
    pub tags: Vec<String>,
    pub children: Vec<Node>,
    /// Anchor identifier, unique within the document.
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    /// Uppercased block name (`SRC`, `QUOTE`, ...).
    pub name: String,
    pub parameters: Vec<String>,
    pub children: Vec<Node>,
}

impl Block {
    /// Blocks whose content is kept verbatim instead of being parsed.
    pub fn is_raw(&self) -> bool {
        is_raw_block(&self.name)
    }
}

pub fn is_raw_block(name: &str) -> bool {
    matches!(name, "SRC" | "EXAMPLE" | "EXPORT")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drawer {
    pub name: String,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PropertyDrawer {
    pub properties: Vec<(String, String)>,
}

impl PropertyDrawer {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListKind {
    Unordered,
    Numbered,
    Lettered,
    Descriptive,
}

impl ListKind {
    /// Kind implied by a bullet (`-`, `1.`, `a)`).
    pub fn from_bullet(bullet: &str) -> Self {
        match bullet.chars().next() {
            Some('-' | '+' | '*') => ListKind::Unordered,
            Some(c) if c.is_ascii_digit() => ListKind::Numbered,
            _ => ListKind::Lettered,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    pub kind: ListKind,
    pub items: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub bullet: String,
    /// Checkbox state: `" "`, `"X"` or `"-"`.
    pub status: Option<String>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveListItem {
    pub bullet: String,
    pub status: Option<String>,
    pub term: Vec<Node>,
    pub details: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Align {
    #[default]
    None,
    Left,
    Right,
    Center,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::None => "",
            Align::Left => "left",
            Align::Right => "right",
            Align::Center => "center",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    /// `TableHeader`, `TableRow` and `TableSeparator` nodes in source order.
    pub rows: Vec<Node>,
    pub alignments: Vec<Align>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub columns: Vec<Vec<Node>>,
    /// Alignment cookie rows (`| <l> | <r> |`) are kept but not exported.
    pub is_special: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Example {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Text {
    pub content: String,
    /// Verbatim text is exported without entity replacement.
    pub raw: bool,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Text {
            content: content.into(),
            raw: false,
        }
    }

    pub fn raw(content: impl Into<String>) -> Self {
        Text {
            content: content.into(),
            raw: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Emphasis {
    /// One of `*`, `/`, `+`, `_`, `=`, `~`, `_{}`, `^{}`.
    pub kind: String,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineBreak {
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticToken {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegularLink {
    pub protocol: String,
    pub description: Option<Vec<Node>>,
    pub url: String,
    pub auto_link: bool,
}

/// What a link points at, judged by protocol and file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Regular,
    Image,
    Video,
}

impl RegularLink {
    pub fn kind(&self) -> LinkKind {
        let local = matches!(self.protocol.as_str(), "" | "file" | "http" | "https");
        if self.description.is_some() || !local {
            return LinkKind::Regular;
        }
        let extension = std::path::Path::new(&self.url)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "png" | "gif" | "jpg" | "jpeg" | "svg" | "tif" | "tiff" => LinkKind::Image,
            "webm" | "mp4" => LinkKind::Video,
            _ => LinkKind::Regular,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FootnoteLink {
    pub name: String,
    pub definition: Option<Box<FootnoteDefinition>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FootnoteDefinition {
    pub name: String,
    pub children: Vec<Node>,
    /// Defined inside a reference (`[fn:name:text]`) rather than on its own line.
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub key: String,
    pub value: String,
}

/// `#+INCLUDE: "file" src go`, resolved when a writer reaches it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Include {
    pub keyword: Keyword,
    pub path: PathBuf,
    /// Uppercased block kind the file content is wrapped in.
    pub kind: String,
    pub lang: String,
}

impl Include {
    /// Read the referenced file and wrap it in a raw block.
    pub fn resolve(&self) -> Result<Node, OrgError> {
        let bytes = std::fs::read(&self.path).map_err(|err| OrgError::Include {
            directive: self.keyword.value.clone(),
            reason: err.to_string(),
        })?;
        let content = String::from_utf8_lossy(&bytes);
        Ok(Node::Block(Block {
            name: self.kind.clone(),
            parameters: vec![self.lang.clone()],
            children: raw_lines(&content),
        }))
    }
}

/// Raw block children: one raw text node per line, separated by line breaks.
pub fn raw_lines(content: &str) -> Vec<Node> {
    let content = content.strip_suffix('\n').unwrap_or(content);
    let mut nodes = Vec::new();
    for (i, line) in content.split('\n').enumerate() {
        if i > 0 {
            nodes.push(Node::LineBreak(LineBreak { count: 1 }));
        }
        if !line.is_empty() {
            nodes.push(Node::Text(Text::raw(line)));
        }
    }
    nodes
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Metadata {
    pub caption: Vec<Vec<Node>>,
    pub html_attributes: Vec<Vec<String>>,
}

/// A node preceded by affiliated keywords (`#+CAPTION:`, `#+ATTR_HTML:`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeWithMeta {
    pub node: Box<Node>,
    pub meta: Metadata,
}

impl Node {
    pub fn text(content: impl Into<String>) -> Node {
        Node::Text(Text::new(content))
    }

    /// Visible text of an inline node, markup stripped.
    pub fn plain_text(&self) -> String {
        match self {
            Node::Text(t) => t.content.clone(),
            Node::Emphasis(e) => plain_text(&e.children),
            Node::RegularLink(l) => match &l.description {
                Some(description) => plain_text(description),
                None => l.url.clone(),
            },
            Node::LineBreak(_) | Node::ExplicitLineBreak => " ".to_string(),
            Node::StatisticToken(s) => format!("[{}]", s.content),
            Node::Paragraph(p) => plain_text(&p.children),
            _ => String::new(),
        }
    }
}

pub fn plain_text(nodes: &[Node]) -> String {
    nodes.iter().map(Node::plain_text).collect()
}
