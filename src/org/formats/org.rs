//! Org format: canonical re-serialization of a parsed document.

mod serializer;

pub use serializer::OrgWriter;

use crate::org::formats::{Format, Writer};

pub struct OrgFormat;

impl Format for OrgFormat {
    fn name(&self) -> &str {
        "org"
    }

    fn extension(&self) -> &str {
        "org"
    }

    fn description(&self) -> &str {
        "Org mode markup"
    }

    fn writer(&self) -> Box<dyn Writer> {
        Box::new(OrgWriter::new())
    }
}
