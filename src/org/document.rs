//! Document lifecycle
//!
//!     A [`Document`] is created empty, parsed exactly once and then written any number
//!     of times. Parsing fills the node forest together with the tables collected on the
//!     way: footnotes, the outline and the buffer settings from `#+KEY:` lines.
//!
//!         let mut doc = Document::new();
//!         doc.parse_str("* Hello")?;
//!         let html = doc.write(&mut HtmlWriter::new())?;
//!
//!     Both `parse` and `write` run behind `catch_unwind`, so an invariant violation
//!     inside the parser or a writer is returned as [`OrgError::Internal`] instead of
//!     unwinding into the caller.

pub mod footnotes;
pub mod outline;
pub mod settings;

use crate::org::ast::Node;
use crate::org::config::Configuration;
use crate::org::error::OrgError;
use crate::org::formats::Writer;
use crate::org::lexing::Lexer;
use crate::org::parsing::Parser;
use footnotes::Footnotes;
use outline::Outline;
use settings::{option_value, BufferSettings};
use std::io::{BufReader, Read};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct Document {
    config: Configuration,
    lexer: Lexer,
    path: Option<PathBuf>,
    parsed: bool,
    nodes: Vec<Node>,
    footnotes: Footnotes,
    outline: Outline,
    settings: BufferSettings,
}

impl Default for Document {
    fn default() -> Self {
        Self::with_config(Configuration::default())
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Configuration) -> Self {
        Document {
            config,
            lexer: Lexer::new(),
            path: None,
            parsed: false,
            nodes: Vec::new(),
            footnotes: Footnotes::new(),
            outline: Outline::new(),
            settings: BufferSettings::new(),
        }
    }

    /// Source path, used in diagnostics and to resolve relative includes.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.path = Some(path.into());
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Tokenize and parse `input`. Fails only on I/O errors, on a second call and
    /// on internal panics; malformed markup is never an error.
    pub fn parse<R: Read>(&mut self, input: R) -> Result<&mut Self, OrgError> {
        if self.parsed {
            return Err(OrgError::AlreadyParsed);
        }
        let tokens = self.lexer.tokenize_all(BufReader::new(input))?;
        debug!(path = ?self.path, tokens = tokens.len(), "tokenized document");

        let lexer = &self.lexer;
        let config = &self.config;
        let path = self.path.as_deref();
        let (nodes, state) = panic::catch_unwind(AssertUnwindSafe(|| {
            Parser::new(lexer, config, tokens, path).parse()
        }))
        .map_err(OrgError::from_panic)?;

        self.nodes = nodes;
        self.footnotes = state.footnotes;
        self.outline = state.outline;
        self.settings = state.settings;
        self.parsed = true;
        Ok(self)
    }

    pub fn parse_str(&mut self, input: &str) -> Result<&mut Self, OrgError> {
        self.parse(input.as_bytes())
    }

    /// Run `writer` over the parsed document and return its output.
    pub fn write<W: Writer + ?Sized>(&self, writer: &mut W) -> Result<String, OrgError> {
        if !self.parsed {
            return Err(OrgError::NotParsed);
        }
        panic::catch_unwind(AssertUnwindSafe(|| {
            writer.before(self)?;
            writer.write_nodes(&self.nodes)?;
            writer.after(self)?;
            Ok(writer.finish())
        }))
        .map_err(OrgError::from_panic)?
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn footnotes(&self) -> &Footnotes {
        &self.footnotes
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn settings(&self) -> &BufferSettings {
        &self.settings
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Buffer setting for `key`, else its default, else the empty string.
    pub fn get(&self, key: &str) -> String {
        self.settings
            .get(key)
            .or_else(|| self.config.default_settings.get(key).map(String::as_str))
            .unwrap_or_default()
            .to_string()
    }

    /// Export option from `#+OPTIONS:` (falling back to the default `OPTIONS`).
    /// `t` is true, `nil` is false, anything else is false with a warning.
    pub fn get_option(&self, key: &str) -> bool {
        let value = self
            .settings
            .get("OPTIONS")
            .and_then(|options| option_value(options, key))
            .or_else(|| {
                self.config
                    .default_settings
                    .get("OPTIONS")
                    .and_then(|options| option_value(options, key))
            });
        match value {
            Some("t") => true,
            Some("nil") => false,
            Some(other) => {
                warn!(option = key, value = other, "unsupported option value, treating as nil");
                false
            }
            None => {
                warn!(option = key, "missing option, treating as nil");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::org::formats::Writer;

    struct PanickingWriter;

    impl Writer for PanickingWriter {
        fn before(&mut self, _doc: &Document) -> Result<(), OrgError> {
            Ok(())
        }

        fn write_node(&mut self, _node: &Node) -> Result<(), OrgError> {
            panic!("no case for node");
        }

        fn after(&mut self, _doc: &Document) -> Result<(), OrgError> {
            Ok(())
        }

        fn finish(&mut self) -> String {
            String::new()
        }
    }

    struct CountingWriter(usize);

    impl Writer for CountingWriter {
        fn before(&mut self, _doc: &Document) -> Result<(), OrgError> {
            Ok(())
        }

        fn write_node(&mut self, _node: &Node) -> Result<(), OrgError> {
            self.0 += 1;
            Ok(())
        }

        fn after(&mut self, _doc: &Document) -> Result<(), OrgError> {
            Ok(())
        }

        fn finish(&mut self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_parse_twice_is_an_error() {
        let mut doc = Document::new();
        doc.parse_str("text").unwrap();
        assert!(matches!(doc.parse_str("text"), Err(OrgError::AlreadyParsed)));
    }

    #[test]
    fn test_write_before_parse_is_an_error() {
        let doc = Document::new();
        let result = doc.write(&mut CountingWriter(0));
        assert!(matches!(result, Err(OrgError::NotParsed)));
    }

    #[test]
    fn test_write_many_times() {
        let mut doc = Document::new();
        doc.parse_str("a\n\nb\n-----").unwrap();
        assert_eq!(doc.write(&mut CountingWriter(0)).unwrap(), "3");
        assert_eq!(doc.write(&mut CountingWriter(0)).unwrap(), "3");
    }

    #[test]
    fn test_writer_panic_becomes_error() {
        let mut doc = Document::new();
        doc.parse_str("text").unwrap();
        let result = doc.write(&mut PanickingWriter);
        assert!(matches!(result, Err(OrgError::Internal(ref m)) if m == "no case for node"));
    }

    #[test]
    fn test_invalid_utf8_is_parsed_lossily() {
        let mut doc = Document::new();
        doc.parse(&b"caf\xe9\n"[..]).unwrap();
        assert_eq!(doc.nodes().len(), 1);
    }

    #[test]
    fn test_get_falls_back_to_defaults() {
        let mut doc = Document::new();
        doc.parse_str("#+TITLE: Notes").unwrap();
        assert_eq!(doc.get("TITLE"), "Notes");
        assert_eq!(doc.get("TODO"), "TODO | DONE");
        assert_eq!(doc.get("MISSING"), "");
    }

    #[test]
    fn test_get_option() {
        let mut doc = Document::new();
        doc.parse_str("#+OPTIONS: toc:nil e:maybe").unwrap();
        assert!(!doc.get_option("toc"));
        assert!(!doc.get_option("e"));
        assert!(doc.get_option("f"));
        assert!(!doc.get_option("unknown"));
    }

    #[test]
    fn test_tables_are_moved_into_document() {
        let mut doc = Document::new();
        doc.set_path("notes.org");
        doc.parse_str("* A\n** B\nsee[fn:1]\n* C\n\n[fn:1] note").unwrap();
        assert_eq!(doc.outline().len(), 3);
        assert_eq!(doc.outline().root().children.len(), 2);
        assert_eq!(doc.footnotes().ordered().len(), 1);
        assert_eq!(doc.path(), Some(Path::new("notes.org")));
    }
}
