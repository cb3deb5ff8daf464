//! Export formats selectable by name or by output file

use super::Format;
use crate::org::config::Configuration;
use crate::org::document::Document;
use crate::org::error::OrgError;
use std::path::Path;

/// Export formats in registration order.
#[derive(Default)]
pub struct FormatRegistry {
    formats: Vec<Box<dyn Format>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `org`, `html` and `json`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(super::OrgFormat);
        registry.register(super::HtmlFormat::default());
        registry.register(super::JsonFormat);
        registry
    }

    /// Add a format. One already registered under the same name is replaced in place.
    pub fn register(&mut self, format: impl Format + 'static) {
        let format: Box<dyn Format> = Box::new(format);
        match self.formats.iter().position(|f| f.name() == format.name()) {
            Some(i) => self.formats[i] = format,
            None => self.formats.push(format),
        }
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, OrgError> {
        self.formats
            .iter()
            .find(|f| f.name() == name)
            .map(|f| f.as_ref())
            .ok_or_else(|| OrgError::UnknownFormat(name.to_string()))
    }

    /// The format that writes files like `path`, chosen by extension
    /// (case-insensitive).
    pub fn for_path(&self, path: &Path) -> Result<&dyn Format, OrgError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| OrgError::UnknownFormat(path.display().to_string()))?;
        self.formats
            .iter()
            .find(|f| f.extension().eq_ignore_ascii_case(extension))
            .map(|f| f.as_ref())
            .ok_or_else(|| OrgError::UnknownFormat(extension.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.formats.iter().map(|f| f.name()).collect()
    }

    pub fn export(&self, doc: &Document, name: &str) -> Result<String, OrgError> {
        self.get(name)?.export(doc)
    }

    /// Parse org `source` and export it in one step.
    pub fn convert(
        &self,
        source: &str,
        config: Configuration,
        name: &str,
    ) -> Result<String, OrgError> {
        let format = self.get(name)?;
        let mut doc = Document::with_config(config);
        doc.parse_str(source)?;
        format.export(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::org::ast::Node;
    use crate::org::formats::Writer;

    /// Counts top-level nodes.
    struct CountFormat(&'static str);

    struct CountWriter(usize);

    impl Writer for CountWriter {
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
            format!("{} nodes", self.0)
        }
    }

    impl Format for CountFormat {
        fn name(&self) -> &str {
            self.0
        }

        fn extension(&self) -> &str {
            "count"
        }

        fn writer(&self) -> Box<dyn Writer> {
            Box::new(CountWriter(0))
        }
    }

    #[test]
    fn test_defaults_in_registration_order() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(registry.names(), ["org", "html", "json"]);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = FormatRegistry::with_defaults();
        registry.register(CountFormat("html"));
        registry.register(CountFormat("count"));
        assert_eq!(registry.names(), ["org", "html", "json", "count"]);
        let out = registry
            .convert("a\n\nb", Configuration::default(), "html")
            .unwrap();
        assert_eq!(out, "2 nodes");
    }

    #[test]
    fn test_unknown_format() {
        let registry = FormatRegistry::with_defaults();
        assert!(matches!(
            registry.get("pdf"),
            Err(OrgError::UnknownFormat(name)) if name == "pdf"
        ));
    }

    #[test]
    fn test_for_path() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(registry.for_path(Path::new("out/notes.HTML")).unwrap().name(), "html");
        assert_eq!(registry.for_path(Path::new("tree.json")).unwrap().name(), "json");
        assert!(matches!(
            registry.for_path(Path::new("notes.txt")),
            Err(OrgError::UnknownFormat(ext)) if ext == "txt"
        ));
        assert!(registry.for_path(Path::new("README")).is_err());
    }

    #[test]
    fn test_convert_uses_configuration() {
        let registry = FormatRegistry::with_defaults();
        let config = Configuration {
            tags_column: 12,
            ..Configuration::default()
        };
        let out = registry.convert("* A :t:", config, "org").unwrap();
        assert_eq!(out, "* A      :t:\n");
    }

    #[test]
    fn test_convert_with_empty_registry() {
        let registry = FormatRegistry::new();
        assert!(matches!(
            registry.convert("text", Configuration::default(), "org"),
            Err(OrgError::UnknownFormat(_))
        ));
    }
}
