//! JSON dump of the node tree, mostly useful for debugging the parser.

use crate::org::ast::Node;
use crate::org::document::Document;
use crate::org::error::OrgError;
use crate::org::formats::{Format, Writer};
use serde_json::Value;

/// Collects every top-level node as a JSON value and prints them as one
/// pretty-printed array.
#[derive(Debug, Default)]
pub struct JsonWriter {
    nodes: Vec<Value>,
    output: String,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Writer for JsonWriter {
    fn before(&mut self, _doc: &Document) -> Result<(), OrgError> {
        self.nodes.clear();
        Ok(())
    }

    fn write_node(&mut self, node: &Node) -> Result<(), OrgError> {
        self.nodes.push(serde_json::to_value(node)?);
        Ok(())
    }

    fn after(&mut self, _doc: &Document) -> Result<(), OrgError> {
        let nodes = Value::Array(std::mem::take(&mut self.nodes));
        self.output = serde_json::to_string_pretty(&nodes)?;
        Ok(())
    }

    fn finish(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn extension(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Node tree as JSON"
    }

    fn writer(&self) -> Box<dyn Writer> {
        Box::new(JsonWriter::new())
    }
}
