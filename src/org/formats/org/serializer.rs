//! Canonical org serializer
//!
//!     Every block-level node writes whole lines, each prefixed with the current
//!     indentation and terminated by a newline. Inline nodes write into the current line;
//!     a line break continues on a new line at the current indentation.
//!
//!     Nested content (list item bodies, link descriptions, table cells) is rendered
//!     into a temporary buffer first, so the caller can measure it or strip the leading
//!     indentation before splicing it in.
//!
//!     The output is a fixed point: parsing it again and writing the result yields the
//!     same text. Trailing whitespace at the end of lines is removed in `finish`.

use crate::org::ast::{
    Align, Block, DescriptiveListItem, Drawer, Emphasis, FootnoteDefinition, FootnoteLink,
    Headline, Keyword, ListItem, Node, NodeWithMeta, PropertyDrawer, RegularLink, Table,
};
use crate::org::document::Document;
use crate::org::error::OrgError;
use crate::org::formats::Writer;
use crate::org::lexing::compile;
use regex::Regex;

fn emphasis_borders(kind: &str) -> Option<(&'static str, &'static str)> {
    Some(match kind {
        "*" => ("*", "*"),
        "/" => ("/", "/"),
        "+" => ("+", "+"),
        "_" => ("_", "_"),
        "=" => ("=", "="),
        "~" => ("~", "~"),
        "_{}" => ("_{", "}"),
        "^{}" => ("^{", "}"),
        _ => return None,
    })
}

pub struct OrgWriter {
    /// Column headline tags are right-aligned to. Taken from the document's
    /// configuration when not set explicitly.
    tags_column: Option<usize>,
    indent: String,
    output: String,
    escape: Regex,
    trailing_whitespace: Regex,
}

impl Default for OrgWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl OrgWriter {
    pub fn new() -> Self {
        OrgWriter {
            tags_column: None,
            indent: String::new(),
            output: String::new(),
            escape: compile(r"(^|\n)([ \t]*)(\*|,\*|#\+|,#\+)"),
            trailing_whitespace: compile(r"[\t ]+\n"),
        }
    }

    pub fn with_tags_column(mut self, column: usize) -> Self {
        self.tags_column = Some(column);
        self
    }

    fn write_str(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn nodes_as_string(&mut self, nodes: &[Node]) -> Result<String, OrgError> {
        let saved = std::mem::take(&mut self.output);
        let result = self.write_nodes(nodes);
        let content = std::mem::replace(&mut self.output, saved);
        result.map(|()| content)
    }

    /// Render `nodes` at `indent`, without the indentation of the first line.
    fn indented_as_string(&mut self, indent: String, nodes: &[Node]) -> Result<String, OrgError> {
        let saved = std::mem::replace(&mut self.indent, indent);
        let result = self.nodes_as_string(nodes);
        let indent = std::mem::replace(&mut self.indent, saved);
        result.map(|content| match content.strip_prefix(indent.as_str()) {
            Some(rest) => rest.to_string(),
            None => content,
        })
    }

    fn write_headline(&mut self, headline: &Headline) -> Result<(), OrgError> {
        let mut line = "*".repeat(headline.lvl);
        if let Some(status) = &headline.status {
            line.push(' ');
            line.push_str(status);
        }
        if let Some(priority) = &headline.priority {
            line.push_str(&format!(" [#{priority}]"));
        }
        line.push(' ');
        line.push_str(&self.nodes_as_string(&headline.title)?);

        if !headline.tags.is_empty() {
            let tags = format!(":{}:", headline.tags.join(":"));
            line.push(' ');
            let column = self.tags_column.unwrap_or(77);
            let used = tags.chars().count() + line.chars().count();
            if column > used {
                line.push_str(&" ".repeat(column - used));
            }
            line.push_str(&tags);
        }
        self.write_str(&line);
        self.write_str("\n");

        if let Some(properties) = &headline.properties {
            self.write_property_drawer(properties);
        }
        self.write_nodes(&headline.children)
    }

    fn write_property_drawer(&mut self, drawer: &PropertyDrawer) {
        let indent = self.indent.clone();
        self.write_str(&format!("{indent}:PROPERTIES:\n"));
        for (key, value) in &drawer.properties {
            self.write_str(&format!("{indent}:{key}: {value}\n"));
        }
        self.write_str(&format!("{indent}:END:\n"));
    }

    fn write_drawer(&mut self, drawer: &Drawer) -> Result<(), OrgError> {
        let indent = self.indent.clone();
        self.write_str(&format!("{indent}:{}:\n", drawer.name));
        self.write_nodes(&drawer.children)?;
        self.write_str(&format!("{indent}:END:\n"));
        Ok(())
    }

    fn write_block(&mut self, block: &Block) -> Result<(), OrgError> {
        let indent = self.indent.clone();
        self.write_str(&format!("{indent}#+BEGIN_{}", block.name));
        if !block.parameters.is_empty() {
            self.write_str(" ");
            self.write_str(&block.parameters.join(" "));
        }
        self.write_str("\n");
        if block.is_raw() {
            if !block.children.is_empty() {
                let content = self.nodes_as_string(&block.children)?;
                let org_source = block.name == "SRC"
                    && block.parameters.first().is_some_and(|p| p == "org");
                let content = if block.name == "EXAMPLE" || org_source {
                    self.escape.replace_all(&content, "$1$2,$3").into_owned()
                } else {
                    content
                };
                self.write_str(&indent);
                self.write_str(&content);
                self.write_str("\n");
            }
        } else {
            self.write_nodes(&block.children)?;
        }
        self.write_str(&format!("{indent}#+END_{}\n", block.name));
        Ok(())
    }

    fn write_list_item(&mut self, item: &ListItem) -> Result<(), OrgError> {
        let indent = format!("{}{}", self.indent, " ".repeat(item.bullet.len() + 1));
        let content = self.indented_as_string(indent, &item.children)?;
        let mut line = format!("{}{}", self.indent, item.bullet);
        if let Some(status) = &item.status {
            line.push_str(&format!(" [{status}]"));
        }
        self.write_str(&line);
        self.write_item_body(&content);
        Ok(())
    }

    fn write_descriptive_list_item(&mut self, item: &DescriptiveListItem) -> Result<(), OrgError> {
        let indent = format!("{}{}", self.indent, " ".repeat(item.bullet.len() + 1));
        let details = self.indented_as_string(indent, &item.details)?;
        let mut line = format!("{}{}", self.indent, item.bullet);
        if let Some(status) = &item.status {
            line.push_str(&format!(" [{status}]"));
        }
        if !item.term.is_empty() {
            let term = self.nodes_as_string(&item.term)?;
            line.push_str(&format!(" {term} ::"));
        }
        self.write_str(&line);
        self.write_item_body(&details);
        Ok(())
    }

    fn write_item_body(&mut self, content: &str) {
        if content.is_empty() {
            self.write_str("\n");
        } else if content.starts_with('\n') {
            self.write_str(content);
        } else {
            self.write_str(" ");
            self.write_str(content);
        }
    }

    fn write_table(&mut self, table: &Table) -> Result<(), OrgError> {
        let mut rows: Vec<Option<Vec<String>>> = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            match row {
                Node::TableHeader(r) | Node::TableRow(r) => {
                    let mut cells = Vec::with_capacity(r.columns.len());
                    for column in &r.columns {
                        cells.push(self.nodes_as_string(column)?);
                    }
                    rows.push(Some(cells));
                }
                _ => rows.push(None),
            }
        }

        let columns = rows.iter().flatten().map(Vec::len).max().unwrap_or(0).max(1);
        let mut widths = vec![1; columns];
        for cells in rows.iter().flatten() {
            for (i, cell) in cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        for cells in &rows {
            let mut line = self.indent.clone();
            match cells {
                Some(cells) => {
                    line.push('|');
                    for (i, width) in widths.iter().enumerate() {
                        let cell = cells.get(i).map(String::as_str).unwrap_or("");
                        let align = table.alignments.get(i).copied().unwrap_or_default();
                        line.push(' ');
                        line.push_str(&pad(cell, *width, align));
                        line.push_str(" |");
                    }
                }
                None => {
                    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
                    line.push('|');
                    line.push_str(&dashes.join("+"));
                    line.push('|');
                }
            }
            line.push('\n');
            self.write_str(&line);
        }
        Ok(())
    }

    fn write_footnote_definition(&mut self, definition: &FootnoteDefinition) -> Result<(), OrgError> {
        let content = self.nodes_as_string(&definition.children)?;
        self.write_str(&format!("[fn:{}]", definition.name));
        self.write_item_body(&content);
        Ok(())
    }

    fn write_footnote_link(&mut self, link: &FootnoteLink) -> Result<(), OrgError> {
        self.write_str(&format!("[fn:{}", link.name));
        if let Some(definition) = &link.definition {
            self.write_str(":");
            for child in &definition.children {
                match child {
                    Node::Paragraph(p) => self.write_nodes(&p.children)?,
                    other => self.write_node(other)?,
                }
            }
        }
        self.write_str("]");
        Ok(())
    }

    fn write_regular_link(&mut self, link: &RegularLink) -> Result<(), OrgError> {
        if link.auto_link {
            self.write_str(&link.url);
            return Ok(());
        }
        match &link.description {
            Some(description) => {
                let description = self.nodes_as_string(description)?;
                self.write_str(&format!("[[{}][{}]]", link.url, description));
            }
            None => self.write_str(&format!("[[{}]]", link.url)),
        }
        Ok(())
    }

    fn write_emphasis(&mut self, emphasis: &Emphasis) -> Result<(), OrgError> {
        let (open, close) = emphasis_borders(&emphasis.kind)
            .ok_or_else(|| OrgError::Internal(format!("bad emphasis kind {:?}", emphasis.kind)))?;
        self.write_str(open);
        self.write_nodes(&emphasis.children)?;
        self.write_str(close);
        Ok(())
    }

    fn write_keyword(&mut self, keyword: &Keyword) {
        let indent = self.indent.clone();
        if keyword.value.is_empty() {
            self.write_str(&format!("{indent}#+{}:\n", keyword.key));
        } else {
            self.write_str(&format!("{indent}#+{}: {}\n", keyword.key, keyword.value));
        }
    }

    fn write_node_with_meta(&mut self, node: &NodeWithMeta) -> Result<(), OrgError> {
        for caption in &node.meta.caption {
            let caption = self.nodes_as_string(caption)?;
            let line = format!("{}#+CAPTION: {}\n", self.indent, caption);
            self.write_str(&line);
        }
        for attributes in &node.meta.html_attributes {
            let words: Vec<String> = attributes
                .iter()
                .map(|a| {
                    if a.chars().any(char::is_whitespace) {
                        format!("\"{a}\"")
                    } else {
                        a.clone()
                    }
                })
                .collect();
            let line = format!("{}#+ATTR_HTML: {}\n", self.indent, words.join(" "));
            self.write_str(&line);
        }
        self.write_node(&node.node)
    }
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    let n = width.saturating_sub(cell.chars().count());
    match align {
        Align::Right => format!("{}{}", " ".repeat(n), cell),
        Align::Center => format!("{}{}{}", " ".repeat(n - n / 2), cell, " ".repeat(n / 2)),
        Align::Left | Align::None => format!("{}{}", cell, " ".repeat(n)),
    }
}

impl Writer for OrgWriter {
    fn before(&mut self, doc: &Document) -> Result<(), OrgError> {
        if self.tags_column.is_none() {
            self.tags_column = Some(doc.config().tags_column);
        }
        Ok(())
    }

    fn write_node(&mut self, node: &Node) -> Result<(), OrgError> {
        match node {
            Node::Headline(h) => self.write_headline(h)?,
            Node::Block(b) => self.write_block(b)?,
            Node::Drawer(d) => self.write_drawer(d)?,
            Node::PropertyDrawer(p) => self.write_property_drawer(p),
            Node::List(l) => self.write_nodes(&l.items)?,
            Node::ListItem(item) => self.write_list_item(item)?,
            Node::DescriptiveListItem(item) => self.write_descriptive_list_item(item)?,
            Node::Table(t) => self.write_table(t)?,
            Node::TableHeader(_) | Node::TableRow(_) | Node::TableSeparator => {
                let table = Table {
                    rows: vec![node.clone()],
                    alignments: Vec::new(),
                };
                self.write_table(&table)?;
            }
            Node::Paragraph(p) => {
                let content = match p.children.split_last() {
                    // A break ending the paragraph has no newline of its own.
                    Some((Node::ExplicitLineBreak, rest)) => self.nodes_as_string(rest)? + "\\\\",
                    _ => self.nodes_as_string(&p.children)?,
                };
                if !content.is_empty() && !content.starts_with('\n') {
                    let indent = self.indent.clone();
                    self.write_str(&indent);
                }
                self.write_str(&content);
                self.write_str("\n");
            }
            Node::Example(e) => {
                for child in &e.children {
                    let content = self.nodes_as_string(std::slice::from_ref(child))?;
                    let line = format!("{}: {}\n", self.indent, content);
                    self.write_str(&line);
                }
            }
            Node::Text(t) => self.write_str(&t.content),
            Node::Emphasis(e) => self.write_emphasis(e)?,
            Node::LineBreak(l) => {
                let line = format!("\n{}", self.indent).repeat(l.count);
                self.write_str(&line);
            }
            Node::ExplicitLineBreak => {
                let line = format!("\\\\\n{}", self.indent);
                self.write_str(&line);
            }
            Node::StatisticToken(s) => self.write_str(&format!("[{}]", s.content)),
            Node::RegularLink(l) => self.write_regular_link(l)?,
            Node::FootnoteLink(l) => self.write_footnote_link(l)?,
            Node::FootnoteDefinition(d) => self.write_footnote_definition(d)?,
            Node::Keyword(k) => self.write_keyword(k),
            Node::Include(i) => self.write_keyword(&i.keyword),
            Node::Comment(c) => {
                let line = format!("{}#{}\n", self.indent, c.content);
                self.write_str(&line);
            }
            Node::HorizontalRule => {
                let line = format!("{}-----\n", self.indent);
                self.write_str(&line);
            }
            Node::NodeWithMeta(n) => self.write_node_with_meta(n)?,
        }
        Ok(())
    }

    fn after(&mut self, _doc: &Document) -> Result<(), OrgError> {
        Ok(())
    }

    fn finish(&mut self) -> String {
        let output = std::mem::take(&mut self.output);
        self.trailing_whitespace
            .replace_all(&output, "\n")
            .into_owned()
    }
}
