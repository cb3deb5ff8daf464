//! HTML export

mod dom;
pub mod entities;
mod serializer;

pub use serializer::{default_highlighter, escape, Highlighter, HtmlWriter};

use crate::org::formats::{Format, Writer};

/// HTML fragment export. Source blocks go through `highlight`.
pub struct HtmlFormat {
    highlight: Highlighter,
}

impl Default for HtmlFormat {
    fn default() -> Self {
        HtmlFormat {
            highlight: default_highlighter(),
        }
    }
}

impl HtmlFormat {
    pub fn with_highlighter(highlight: Highlighter) -> Self {
        HtmlFormat { highlight }
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn extension(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML fragment"
    }

    fn writer(&self) -> Box<dyn Writer> {
        Box::new(HtmlWriter::new().with_highlighter(self.highlight.clone()))
    }
}
