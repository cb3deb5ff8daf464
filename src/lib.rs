//! # orgmode
//!
//! A parser and exporter for the org markup format.
//!
//! Text goes through a line tokenizer, a recursive-descent structural parser and an
//! inline scanner, and ends up as a [`Document`](org::document::Document) holding a
//! node forest, an outline and a footnote registry. Writers walk that forest:
//! [`OrgWriter`](org::formats::org::OrgWriter) re-emits canonical org markup and
//! [`HtmlWriter`](org::formats::html::HtmlWriter) exports HTML.
//!
//! ```ignore
//! use orgmode::org::document::Document;
//! use orgmode::org::formats::html::HtmlWriter;
//!
//! let mut doc = Document::new();
//! doc.parse_str("* Hello /world/")?;
//! let html = doc.write(&mut HtmlWriter::new())?;
//! ```

pub mod org;

pub use org::document::Document;
pub use org::error::OrgError;
pub use org::formats::{FormatRegistry, Writer};
