//! HTML serializer
//!
//!     Writes an HTML fragment for a parsed document: an optional table of contents,
//!     the node forest, then the footnote section. Export options are read from the
//!     document once, in `before`:
//!
//!         toc     table of contents from the outline
//!         e       entity replacement in text
//!         f       footnote references and the footnote section
//!         pri     headline priorities
//!         todo    headline status keywords
//!         tags    headline tags
//!
//!     Headlines carrying one of the `EXCLUDE_TAGS` are left out together with their
//!     subtree, also in the table of contents.
//!
//!     Text is HTML-escaped. Raw block content is rendered with escaping switched off
//!     and handed to the highlighter (source blocks) or escaped once as a whole
//!     (example blocks).

use super::dom;
use super::entities::replace_entities;
use crate::org::ast::{
    Block, DescriptiveListItem, FootnoteDefinition, FootnoteLink, Headline, LinkKind, List,
    ListItem, ListKind, Node, NodeWithMeta, RegularLink, Table, TableRow,
};
use crate::org::document::outline::{Outline, SectionId};
use crate::org::document::Document;
use crate::org::error::OrgError;
use crate::org::formats::Writer;
use crate::org::lexing::compile;
use regex::Regex;
use std::sync::Arc;
use tracing::warn;

/// Source highlighting callback: `(source, language) -> html`.
pub type Highlighter = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Escaped source in a plain `<pre>`.
pub fn default_highlighter() -> Highlighter {
    Arc::new(|source: &str, _lang: &str| {
        format!(
            "<div class=\"highlight\">\n<pre>\n{}\n</pre>\n</div>",
            escape(source)
        )
    })
}

/// Escape `& < > ' "`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            c => out.push(c),
        }
    }
    out
}

fn emphasis_tags(kind: &str) -> Option<(&'static str, &'static str)> {
    Some(match kind {
        "/" => ("<em>", "</em>"),
        "*" => ("<strong>", "</strong>"),
        "+" => ("<del>", "</del>"),
        "~" => ("<code>", "</code>"),
        "=" => ("<code class=\"verbatim\">", "</code>"),
        "_" => ("<span style=\"text-decoration: underline;\">", "</span>"),
        "_{}" => ("<sub>", "</sub>"),
        "^{}" => ("<sup>", "</sup>"),
        _ => return None,
    })
}

fn list_tags(kind: ListKind) -> (&'static str, &'static str) {
    match kind {
        ListKind::Unordered => ("<ul>", "</ul>"),
        ListKind::Numbered | ListKind::Lettered => ("<ol>", "</ol>"),
        ListKind::Descriptive => ("<dl>", "</dl>"),
    }
}

fn checkbox_class(status: &str) -> &'static str {
    match status {
        "X" => "checked",
        "-" => "indeterminate",
        _ => "unchecked",
    }
}

fn is_image_or_video(node: &Node) -> bool {
    matches!(node, Node::RegularLink(l) if l.kind() != LinkKind::Regular)
}

#[derive(Debug, Clone, Copy)]
struct ExportOptions {
    toc: bool,
    entities: bool,
    footnotes: bool,
    priority: bool,
    todo: bool,
    tags: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            toc: true,
            entities: true,
            footnotes: true,
            priority: true,
            todo: true,
            tags: true,
        }
    }
}

#[derive(Debug, Clone)]
struct Patterns {
    anchor: Regex,
}

impl Patterns {
    fn new() -> Self {
        Patterns {
            anchor: compile(r"</?a[^>]*>"),
        }
    }
}

pub struct HtmlWriter {
    output: String,
    highlight: Highlighter,
    escape: bool,
    options: ExportOptions,
    exclude_tags: Vec<String>,
    patterns: Patterns,
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlWriter {
    pub fn new() -> Self {
        HtmlWriter {
            output: String::new(),
            highlight: default_highlighter(),
            escape: true,
            options: ExportOptions::default(),
            exclude_tags: Vec::new(),
            patterns: Patterns::new(),
        }
    }

    pub fn with_highlighter(mut self, highlight: Highlighter) -> Self {
        self.highlight = highlight;
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

    fn is_excluded(&self, tags: &[String]) -> bool {
        tags.iter().any(|tag| self.exclude_tags.contains(tag))
    }

    fn write_outline(&mut self, outline: &Outline) -> Result<(), OrgError> {
        if !self.options.toc || outline.is_empty() {
            return Ok(());
        }
        self.write_str("<nav>\n<ul>\n");
        for &child in &outline.root().children {
            self.write_section(outline, child)?;
        }
        self.write_str("</ul>\n</nav>\n");
        Ok(())
    }

    fn write_section(&mut self, outline: &Outline, id: SectionId) -> Result<(), OrgError> {
        let section = outline.section(id);
        if self.is_excluded(&section.tags) {
            return Ok(());
        }
        let title = self.nodes_as_string(&section.title)?;
        let title = self.patterns.anchor.replace_all(&title, "").into_owned();
        self.write_str(&format!(
            "<li>\n<a href=\"#{}\">{}</a>\n",
            escape(&section.id),
            title
        ));
        if !section.children.is_empty() {
            self.write_str("<ul>\n");
            for &child in &section.children {
                self.write_section(outline, child)?;
            }
            self.write_str("</ul>\n");
        }
        self.write_str("</li>\n");
        Ok(())
    }

    fn write_headline(&mut self, headline: &Headline) -> Result<(), OrgError> {
        if self.is_excluded(&headline.tags) {
            return Ok(());
        }
        let level = headline.lvl.clamp(1, 6);
        self.write_str(&format!("<h{level} id=\"{}\">\n", escape(&headline.id)));
        if self.options.todo {
            if let Some(status) = &headline.status {
                self.write_str(&format!("<span class=\"todo\">{}</span>\n", escape(status)));
            }
        }
        if self.options.priority {
            if let Some(priority) = &headline.priority {
                self.write_str(&format!(
                    "<span class=\"priority\">[{}]</span>\n",
                    escape(priority)
                ));
            }
        }
        self.write_nodes(&headline.title)?;
        if self.options.tags && !headline.tags.is_empty() {
            let tags: Vec<String> = headline
                .tags
                .iter()
                .map(|tag| format!("<span>{}</span>", escape(tag)))
                .collect();
            self.write_str("&#xa0;&#xa0;&#xa0;");
            self.write_str(&format!(
                "<span class=\"tags\">{}</span>",
                tags.join("&#xa0;")
            ));
        }
        self.write_str(&format!("\n</h{level}>\n"));
        self.write_nodes(&headline.children)
    }

    fn write_block(&mut self, block: &Block) -> Result<(), OrgError> {
        let content = if block.is_raw() {
            let saved = std::mem::replace(&mut self.escape, false);
            let content = self.nodes_as_string(&block.children);
            self.escape = saved;
            content?.trim_end().to_string()
        } else {
            self.nodes_as_string(&block.children)?
        };
        let first = block.parameters.first().map(|p| p.to_lowercase());
        match block.name.as_str() {
            "SRC" => {
                let lang = first.as_deref().unwrap_or("text");
                let highlighted = (self.highlight)(&content, lang);
                self.write_str(&highlighted);
                self.write_str("\n");
            }
            "EXAMPLE" => {
                self.write_str(&format!(
                    "<pre class=\"example\">\n{}\n</pre>\n",
                    escape(&content)
                ));
            }
            "EXPORT" => {
                if first.as_deref() == Some("html") {
                    self.write_str(&content);
                    self.write_str("\n");
                }
            }
            "QUOTE" => {
                self.write_str(&format!("<blockquote>\n{content}</blockquote>\n"));
            }
            "CENTER" => {
                self.write_str("<div class=\"center-block\" style=\"text-align: center; margin-left: auto; margin-right: auto;\">\n");
                self.write_str(&content);
                self.write_str("</div>\n");
            }
            name => {
                self.write_str(&format!(
                    "<div class=\"{}-block\">\n{content}</div>\n",
                    escape(&name.to_lowercase())
                ));
            }
        }
        Ok(())
    }

    fn write_list(&mut self, list: &List) -> Result<(), OrgError> {
        let (open, close) = list_tags(list.kind);
        self.write_str(open);
        self.write_str("\n");
        self.write_nodes(&list.items)?;
        self.write_str(close);
        self.write_str("\n");
        Ok(())
    }

    fn write_list_item(&mut self, item: &ListItem) -> Result<(), OrgError> {
        match &item.status {
            Some(status) => self.write_str(&format!("<li class=\"{}\">\n", checkbox_class(status))),
            None => self.write_str("<li>\n"),
        }
        self.write_nodes(&item.children)?;
        self.write_str("</li>\n");
        Ok(())
    }

    fn write_descriptive_list_item(&mut self, item: &DescriptiveListItem) -> Result<(), OrgError> {
        match &item.status {
            Some(status) => self.write_str(&format!("<dt class=\"{}\">\n", checkbox_class(status))),
            None => self.write_str("<dt>\n"),
        }
        if item.term.is_empty() {
            self.write_str("?");
        } else {
            self.write_nodes(&item.term)?;
        }
        self.write_str("\n</dt>\n<dd>\n");
        self.write_nodes(&item.details)?;
        self.write_str("</dd>\n");
        Ok(())
    }

    fn write_table(&mut self, table: &Table) -> Result<(), OrgError> {
        self.write_str("<table>\n");
        let mut body_open = false;
        for row in &table.rows {
            match row {
                Node::TableHeader(r) if !r.is_special => {
                    self.write_str("<thead>\n");
                    self.write_table_row(table, r, "th")?;
                    self.write_str("</thead>\n");
                }
                Node::TableRow(r) if !r.is_special => {
                    if !body_open {
                        self.write_str("<tbody>\n");
                        body_open = true;
                    }
                    self.write_table_row(table, r, "td")?;
                }
                _ => {}
            }
        }
        if !body_open {
            self.write_str("<tbody>\n");
        }
        self.write_str("</tbody>\n</table>\n");
        Ok(())
    }

    fn write_table_row(&mut self, table: &Table, row: &TableRow, tag: &str) -> Result<(), OrgError> {
        self.write_str("<tr>\n");
        for (i, column) in row.columns.iter().enumerate() {
            let align = table.alignments.get(i).copied().unwrap_or_default();
            if align.as_str().is_empty() {
                self.write_str(&format!("<{tag}>"));
            } else {
                self.write_str(&format!("<{tag} class=\"align-{}\">", align.as_str()));
            }
            self.write_nodes(column)?;
            self.write_str(&format!("</{tag}>\n"));
        }
        self.write_str("</tr>\n");
        Ok(())
    }

    fn write_text(&mut self, content: &str, raw: bool) {
        if !self.escape {
            self.write_str(content);
        } else if raw || !self.options.entities {
            self.write_str(&escape(content));
        } else {
            self.write_str(&escape(&replace_entities(content)));
        }
    }

    fn write_footnote_link(&mut self, link: &FootnoteLink) -> Result<(), OrgError> {
        if !self.options.footnotes {
            return Ok(());
        }
        let name = escape(&link.name);
        match &link.definition {
            Some(definition) => {
                self.write_str(&format!("<sup class=\"footnote-reference\">{name}</sup>"));
                self.write_str("<span class=\"footnote-inline\">");
                for child in &definition.children {
                    match child {
                        Node::Paragraph(p) => self.write_nodes(&p.children)?,
                        other => self.write_node(other)?,
                    }
                }
                self.write_str("</span>");
            }
            None => self.write_str(&format!(
                "<sup class=\"footnote-reference\"><a id=\"footnote-reference-{name}\" href=\"#footnote-{name}\">{name}</a></sup>"
            )),
        }
        Ok(())
    }

    fn write_footnotes(&mut self, doc: &Document) -> Result<(), OrgError> {
        let definitions = doc.footnotes().ordered();
        if !self.options.footnotes || definitions.is_empty() {
            return Ok(());
        }
        self.write_str("<div class=\"footnotes\">\n");
        self.write_str("<hr class=\"footnotes-separator\">\n");
        self.write_str(&format!(
            "<h1 class=\"footnotes-title\">{}</h1>\n",
            escape(&doc.footnotes().title)
        ));
        self.write_str("<div class=\"footnote-definitions\">\n");
        for definition in definitions {
            self.write_footnote_definition(definition)?;
        }
        self.write_str("</div>\n</div>\n");
        Ok(())
    }

    fn write_footnote_definition(&mut self, definition: &FootnoteDefinition) -> Result<(), OrgError> {
        let name = escape(&definition.name);
        self.write_str("<div class=\"footnote-definition\">\n");
        self.write_str(&format!(
            "<sup id=\"footnote-{name}\"><a href=\"#footnote-reference-{name}\">{name}</a></sup>\n"
        ));
        self.write_str("<div class=\"footnote-body\">\n");
        self.write_nodes(&definition.children)?;
        self.write_str("</div>\n</div>\n");
        Ok(())
    }

    fn write_regular_link(&mut self, link: &RegularLink) -> Result<(), OrgError> {
        let escaped = escape(&link.url);
        let url = if link.protocol == "file" {
            escaped.strip_prefix("file:").unwrap_or(&escaped).to_string()
        } else {
            escaped
        };
        let description = match &link.description {
            Some(description) => self.nodes_as_string(description)?,
            None => url.clone(),
        };
        let html = match link.kind() {
            LinkKind::Image => format!("<img src=\"{url}\" alt=\"{description}\" title=\"{description}\" />"),
            LinkKind::Video => format!("<video src=\"{url}\" title=\"{description}\">{description}</video>"),
            LinkKind::Regular => format!("<a href=\"{url}\">{description}</a>"),
        };
        self.write_str(&html);
        Ok(())
    }

    fn write_node_with_meta(&mut self, node: &NodeWithMeta) -> Result<(), OrgError> {
        let mut out = match &*node.node {
            Node::Paragraph(p) if p.children.len() == 1 && is_image_or_video(&p.children[0]) => {
                self.nodes_as_string(&p.children)?
            }
            other => self.nodes_as_string(std::slice::from_ref(other))?,
        };
        for attributes in &node.meta.html_attributes {
            out = self.with_html_attributes(&out, attributes) + "\n";
        }
        if !node.meta.caption.is_empty() {
            let mut captions = Vec::with_capacity(node.meta.caption.len());
            for caption in &node.meta.caption {
                captions.push(self.nodes_as_string(caption)?);
            }
            out = format!(
                "<figure>\n{}<figcaption>\n{}\n</figcaption>\n</figure>\n",
                out,
                captions.join(" ")
            );
        }
        self.write_str(&out);
        Ok(())
    }

    /// Add `:key value` pairs to the single element `input` renders to. `class`
    /// and `style` are appended to, other attributes are replaced. Anything that
    /// is not exactly one element is returned unchanged.
    fn with_html_attributes(&self, input: &str, attributes: &[String]) -> String {
        if attributes.len() % 2 != 0 {
            warn!(?attributes, "html attributes must come in key value pairs");
            return input.to_string();
        }
        let fragment = dom::parse_fragment(input.trim());
        let nodes = dom::fragment_nodes(&fragment);
        let [node] = nodes.as_slice() else {
            warn!(%input, count = nodes.len(), "html attributes need exactly one element");
            return input.to_string();
        };
        if !dom::is_element(node) {
            warn!(%input, "no element to attach html attributes to");
            return input.to_string();
        }
        for pair in attributes.chunks(2) {
            dom::merge_attribute(node, pair[0].trim_start_matches(':'), &pair[1]);
        }
        match dom::serialize_node(node) {
            Ok(html) => html,
            Err(err) => {
                warn!(%input, %err, "could not render html attributes");
                input.to_string()
            }
        }
    }
}

impl Writer for HtmlWriter {
    fn before(&mut self, doc: &Document) -> Result<(), OrgError> {
        self.options = ExportOptions {
            toc: doc.get_option("toc"),
            entities: doc.get_option("e"),
            footnotes: doc.get_option("f"),
            priority: doc.get_option("pri"),
            todo: doc.get_option("todo"),
            tags: doc.get_option("tags"),
        };
        self.exclude_tags = doc
            .get("EXCLUDE_TAGS")
            .split_whitespace()
            .map(str::to_string)
            .collect();
        self.write_outline(doc.outline())
    }

    fn write_node(&mut self, node: &Node) -> Result<(), OrgError> {
        match node {
            Node::Headline(h) => self.write_headline(h)?,
            Node::Block(b) => self.write_block(b)?,
            Node::Drawer(d) => self.write_nodes(&d.children)?,
            Node::PropertyDrawer(_) | Node::Comment(_) | Node::FootnoteDefinition(_) => {}
            Node::List(l) => self.write_list(l)?,
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
                if !p.children.is_empty() {
                    self.write_str("<p>");
                    if !matches!(p.children[0], Node::LineBreak(_)) {
                        self.write_str("\n");
                    }
                    self.write_nodes(&p.children)?;
                    self.write_str("\n</p>\n");
                }
            }
            Node::Example(e) => {
                self.write_str("<pre class=\"example\">\n");
                for child in &e.children {
                    self.write_node(child)?;
                    self.write_str("\n");
                }
                self.write_str("</pre>\n");
            }
            Node::Text(t) => self.write_text(&t.content, t.raw),
            Node::Emphasis(e) => {
                let (open, close) = emphasis_tags(&e.kind)
                    .ok_or_else(|| OrgError::Internal(format!("bad emphasis kind {:?}", e.kind)))?;
                self.write_str(open);
                self.write_nodes(&e.children)?;
                self.write_str(close);
            }
            Node::LineBreak(l) => self.write_str(&"\n".repeat(l.count)),
            Node::ExplicitLineBreak => self.write_str("<br>\n"),
            Node::StatisticToken(s) => self.write_str(&format!(
                "<code class=\"statistic\">[{}]</code>",
                escape(&s.content)
            )),
            Node::RegularLink(l) => self.write_regular_link(l)?,
            Node::FootnoteLink(l) => self.write_footnote_link(l)?,
            Node::Keyword(k) => {
                if k.key == "HTML" {
                    self.write_str(&k.value);
                    self.write_str("\n");
                }
            }
            Node::Include(include) => {
                let resolved = include.resolve()?;
                self.write_node(&resolved)?;
            }
            Node::HorizontalRule => self.write_str("<hr>\n"),
            Node::NodeWithMeta(n) => self.write_node_with_meta(n)?,
        }
        Ok(())
    }

    fn after(&mut self, doc: &Document) -> Result<(), OrgError> {
        self.write_footnotes(doc)
    }

    fn finish(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn html(input: &str) -> String {
        let mut doc = Document::new();
        doc.parse_str(input).unwrap();
        doc.write(&mut HtmlWriter::new()).unwrap()
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href='x'>&"#), "&lt;a href=&#39;x&#39;&gt;&amp;");
    }

    #[test]
    fn test_paragraph_with_emphasis() {
        assert_snapshot!(html("Some *bold* and =<code>=."), @r#"
        <p>
        Some <strong>bold</strong> and <code class="verbatim">&lt;code&gt;</code>.
        </p>
        "#);
    }

    #[test]
    fn test_entities_follow_option() {
        assert_eq!(html("a -- b"), "<p>\na – b\n</p>\n");
        assert_eq!(html("#+OPTIONS: e:nil\na -- b"), "<p>\na -- b\n</p>\n");
    }

    #[test]
    fn test_headlines_and_toc() {
        assert_snapshot!(html("* TODO [#A] One :x:\n** Two\n* Three"), @r##"
        <nav>
        <ul>
        <li>
        <a href="#one">One</a>
        <ul>
        <li>
        <a href="#two">Two</a>
        </li>
        </ul>
        </li>
        <li>
        <a href="#three">Three</a>
        </li>
        </ul>
        </nav>
        <h1 id="one">
        <span class="todo">TODO</span>
        <span class="priority">[A]</span>
        One&#xa0;&#xa0;&#xa0;<span class="tags"><span>x</span></span>
        </h1>
        <h2 id="two">
        Two
        </h2>
        <h1 id="three">
        Three
        </h1>
        "##);
    }

    #[test]
    fn test_explicit_line_breaks() {
        assert_eq!(
            html("first line \\\\\nsecond line \\\\  "),
            "<p>\nfirst line <br>\nsecond line <br>\n\n</p>\n"
        );
    }

    #[test]
    fn test_excluded_headline() {
        let out = html("#+OPTIONS: toc:nil\n* Visible\n* Hidden :noexport:\nsecret\n* After");
        assert!(out.contains("Visible"));
        assert!(!out.contains("Hidden"));
        assert!(!out.contains("secret"));
        assert!(out.contains("After"));
    }

    #[test]
    fn test_deep_headline_clamped() {
        let out = html("#+OPTIONS: toc:nil\n******* Deep");
        assert!(out.starts_with("<h6 id=\"deep\">"));
    }

    #[test]
    fn test_table_with_header() {
        assert_snapshot!(html("| a | n |\n|---+---|\n| x | 1 |"), @r#"
        <table>
        <thead>
        <tr>
        <th>a</th>
        <th class="align-right">n</th>
        </tr>
        </thead>
        <tbody>
        <tr>
        <td>x</td>
        <td class="align-right">1</td>
        </tr>
        </tbody>
        </table>
        "#);
    }

    #[test]
    fn test_src_block_uses_highlighter() {
        let mut doc = Document::new();
        doc.parse_str("#+BEGIN_SRC Go\nfmt.Println(\"<hi>\")\n#+END_SRC").unwrap();
        let mut writer = HtmlWriter::new()
            .with_highlighter(Arc::new(|source: &str, lang: &str| format!("[{lang}] {source}")));
        assert_eq!(doc.write(&mut writer).unwrap(), "[go] fmt.Println(\"<hi>\")\n");
        assert_eq!(
            doc.write(&mut HtmlWriter::new()).unwrap(),
            "<div class=\"highlight\">\n<pre>\nfmt.Println(&#34;&lt;hi&gt;&#34;)\n</pre>\n</div>\n"
        );
    }

    #[test]
    fn test_footnotes_section() {
        assert_snapshot!(html("See[fn:a] and[fn:b].\n\n[fn:b] Def B.\n[fn:a] Def A."), @r##"
        <p>
        See<sup class="footnote-reference"><a id="footnote-reference-a" href="#footnote-a">a</a></sup> and<sup class="footnote-reference"><a id="footnote-reference-b" href="#footnote-b">b</a></sup>.
        </p>
        <div class="footnotes">
        <hr class="footnotes-separator">
        <h1 class="footnotes-title">Footnotes</h1>
        <div class="footnote-definitions">
        <div class="footnote-definition">
        <sup id="footnote-a"><a href="#footnote-reference-a">a</a></sup>
        <div class="footnote-body">
        <p>
        Def A.
        </p>
        </div>
        </div>
        <div class="footnote-definition">
        <sup id="footnote-b"><a href="#footnote-reference-b">b</a></sup>
        <div class="footnote-body">
        <p>
        Def B.
        </p>
        </div>
        </div>
        </div>
        </div>
        "##);
    }

    #[test]
    fn test_image_with_caption_and_attributes() {
        assert_snapshot!(html("#+CAPTION: A cat\n#+ATTR_HTML: :alt \"a cat\" :class round\n[[cat.png]]"), @r#"
        <figure>
        <img src="cat.png" alt="a cat" title="cat.png" class="round">
        <figcaption>
        A cat
        </figcaption>
        </figure>
        "#);
    }

    #[test]
    fn test_class_attribute_is_appended() {
        let writer = HtmlWriter::new();
        let out = writer.with_html_attributes(
            "<p class=\"a\">\ntext\n</p>\n",
            &[":class".to_string(), "b".to_string()],
        );
        assert_eq!(out, "<p class=\"a b\">\ntext\n</p>");
    }

    #[test]
    fn test_odd_attribute_count_ignored() {
        let writer = HtmlWriter::new();
        assert_eq!(writer.with_html_attributes("<p>x</p>", &[":a".to_string()]), "<p>x</p>");
    }

    #[test]
    fn test_attributes_on_single_quoted_html() {
        assert_eq!(
            html("#+ATTR_HTML: :class added\n#+HTML: <div data-x='a'>hi</div>"),
            "<div data-x=\"a\" class=\"added\">hi</div>\n"
        );
    }

    #[test]
    fn test_attributes_need_a_single_element() {
        let writer = HtmlWriter::new();
        let pair = [":class".to_string(), "x".to_string()];
        assert_eq!(writer.with_html_attributes("<p>a</p><p>b</p>", &pair), "<p>a</p><p>b</p>");
        assert_eq!(writer.with_html_attributes("plain", &pair), "plain");
    }

    #[test]
    fn test_descriptive_list() {
        assert_snapshot!(html("- term :: details"), @r"
        <dl>
        <dt>
        term
        </dt>
        <dd>
        <p>
        details
        </p>
        </dd>
        </dl>
        ");
    }

    #[test]
    fn test_checkbox_items() {
        let out = html("- [X] done\n- [ ] open\n- [-] partial");
        assert!(out.contains("<li class=\"checked\">"));
        assert!(out.contains("<li class=\"unchecked\">"));
        assert!(out.contains("<li class=\"indeterminate\">"));
    }

    #[test]
    fn test_missing_include_is_error() {
        let mut doc = Document::new();
        doc.parse_str("#+INCLUDE: \"/definitely/missing.go\" src go").unwrap();
        let err = doc.write(&mut HtmlWriter::new()).unwrap_err();
        assert!(
            matches!(err, OrgError::Include { ref directive, .. } if directive == "\"/definitely/missing.go\" src go")
        );
    }
}
