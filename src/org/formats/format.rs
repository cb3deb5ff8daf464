//! Named export targets

use crate::org::document::Document;
use crate::org::error::OrgError;
use crate::org::formats::Writer;

/// An export target: the name it is selected by, the extension of the files it
/// produces and a factory for the [`Writer`] that renders it.
pub trait Format: Send + Sync {
    fn name(&self) -> &str;

    /// File extension, without the dot.
    fn extension(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// A fresh writer for a single export.
    fn writer(&self) -> Box<dyn Writer>;

    fn export(&self, doc: &Document) -> Result<String, OrgError> {
        doc.write(&mut *self.writer())
    }
}
