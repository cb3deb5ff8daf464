//! Output formats
//!
//!     A [`Writer`] walks the node forest of a parsed [`Document`]: `before` once, then
//!     `write_node` for every top-level node (recursing on its own), then `after`, and
//!     finally `finish` hands over the accumulated output. [`Document::write`] drives
//!     that sequence and turns a panic inside a writer into an error.
//!
//!     [`Format`] and [`FormatRegistry`] sit on top of the writers and give each output
//!     a name and a file extension, so callers can pick one from a string or an
//!     output path:
//!
//!         let registry = FormatRegistry::with_defaults();
//!         let html = registry.export(&doc, "html")?;
//!         let same = registry.for_path(Path::new("out.html"))?.export(&doc)?;
//!
//!     Built-in formats: `org` (round trip), `html` (export), `json` (the node tree).

pub mod format;
pub mod html;
pub mod json;
pub mod org;
pub mod registry;

pub use format::Format;
pub use html::{HtmlFormat, HtmlWriter};
pub use json::{JsonFormat, JsonWriter};
pub use org::{OrgFormat, OrgWriter};
pub use registry::FormatRegistry;

use crate::org::ast::Node;
use crate::org::document::Document;
use crate::org::error::OrgError;

/// Tree-walking serializer for a parsed document.
pub trait Writer {
    /// Called once before any node, with the document being written.
    fn before(&mut self, doc: &Document) -> Result<(), OrgError>;

    fn write_node(&mut self, node: &Node) -> Result<(), OrgError>;

    fn write_nodes(&mut self, nodes: &[Node]) -> Result<(), OrgError> {
        for node in nodes {
            self.write_node(node)?;
        }
        Ok(())
    }

    /// Called once after the last node.
    fn after(&mut self, doc: &Document) -> Result<(), OrgError>;

    /// Take the accumulated output, leaving the writer empty.
    fn finish(&mut self) -> String;
}
