//! Editing rendered HTML through an html5ever DOM
//!
//! Used where already-rendered output has to change after the fact, such as
//! merging `#+ATTR_HTML:` attributes into the element a node produced.

use crate::org::error::OrgError;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{ns, parse_document, Attribute, LocalName, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// Parse `html` as the body of an otherwise empty document.
pub fn parse_fragment(html: &str) -> RcDom {
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
    parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .one(wrapped.as_bytes())
}

/// Top-level nodes of a fragment parsed with [`parse_fragment`].
pub fn fragment_nodes(dom: &RcDom) -> Vec<Handle> {
    find_element(&dom.document, "body")
        .map(|body| body.children.borrow().clone())
        .unwrap_or_default()
}

fn find_element(handle: &Handle, name: &str) -> Option<Handle> {
    if let NodeData::Element { name: ref qname, .. } = handle.data {
        if &*qname.local == name {
            return Some(handle.clone());
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, name))
}

pub fn is_element(handle: &Handle) -> bool {
    matches!(handle.data, NodeData::Element { .. })
}

/// Set attribute `key` on an element. `class` and `style` values are appended
/// to an existing value with a space, any other existing value is replaced.
/// Keys compare case-insensitively.
pub fn merge_attribute(handle: &Handle, key: &str, value: &str) {
    let NodeData::Element { ref attrs, .. } = handle.data else {
        return;
    };
    let mut attrs = attrs.borrow_mut();
    let appends = key.eq_ignore_ascii_case("class") || key.eq_ignore_ascii_case("style");
    let existing = attrs
        .iter()
        .position(|attr| (*attr.name.local).eq_ignore_ascii_case(key));
    match existing {
        Some(i) if appends => {
            let merged = format!("{} {}", attrs[i].value, value);
            attrs[i].value = merged.into();
        }
        Some(i) => attrs[i].value = value.into(),
        None => attrs.push(Attribute {
            name: QualName::new(None, ns!(), LocalName::from(key)),
            value: value.into(),
        }),
    }
}

/// Serialize a node together with its subtree.
pub fn serialize_node(handle: &Handle) -> Result<String, OrgError> {
    let mut bytes = Vec::new();
    let serializable: SerializableHandle = handle.clone().into();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    serialize(&mut bytes, &serializable, opts)?;
    String::from_utf8(bytes)
        .map_err(|err| OrgError::Internal(format!("serialized html is not UTF-8: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    // The DOM is returned too: dropping an `RcDom` clears its nodes' children.
    fn single(html: &str) -> (RcDom, Handle) {
        let dom = parse_fragment(html);
        let nodes = fragment_nodes(&dom);
        assert_eq!(nodes.len(), 1, "{html}");
        let node = nodes[0].clone();
        (dom, node)
    }

    #[test]
    fn test_fragment_nodes() {
        let dom = parse_fragment("<p>a</p><p>b</p>");
        assert_eq!(fragment_nodes(&dom).len(), 2);
        let dom = parse_fragment("just text");
        let nodes = fragment_nodes(&dom);
        assert_eq!(nodes.len(), 1);
        assert!(!is_element(&nodes[0]));
    }

    #[test]
    fn test_merge_normalizes_quoting() {
        let (_dom, node) = single("<div data-x='a' hidden>hi</div>");
        merge_attribute(&node, "class", "added");
        assert_eq!(
            serialize_node(&node).unwrap(),
            "<div data-x=\"a\" hidden=\"\" class=\"added\">hi</div>"
        );
    }

    #[test]
    fn test_merge_appends_class_and_style() {
        let (_dom, node) = single("<span class=\"a\" style=\"color: red;\">x</span>");
        merge_attribute(&node, "CLASS", "b");
        merge_attribute(&node, "style", "margin: 0;");
        merge_attribute(&node, "title", "t");
        assert_eq!(
            serialize_node(&node).unwrap(),
            "<span class=\"a b\" style=\"color: red; margin: 0;\" title=\"t\">x</span>"
        );
    }

    #[test]
    fn test_merge_replaces_other_attributes() {
        let (_dom, node) = single("<img src=\"a.png\" alt=\"old\">");
        merge_attribute(&node, "alt", "say \"hi\" & go");
        assert_eq!(
            serialize_node(&node).unwrap(),
            "<img src=\"a.png\" alt=\"say &quot;hi&quot; &amp; go\">"
        );
    }
}
