//! Whole-document behaviour: anchors, footnote ordering, configuration and
//! the guarantee that any input parses and exports without failing.

use orgmode::org::ast::{plain_text, Node};
use orgmode::org::config::Configuration;
use orgmode::org::formats::{FormatRegistry, HtmlWriter, JsonWriter, OrgWriter};
use orgmode::{Document, OrgError};
use proptest::prelude::*;
use std::path::Path;

fn parse(source: &str) -> Document {
    let mut doc = Document::new();
    doc.parse_str(source).unwrap();
    doc
}

#[test]
fn test_headline_ids_are_unique() {
    let doc = parse("* Foo\n* Foo\n* Foo?");
    let outline = doc.outline();
    let ids: Vec<&str> = outline
        .root()
        .children
        .iter()
        .map(|&id| outline.section(id).id.as_str())
        .collect();
    assert_eq!(ids, ["foo", "foo-1", "foo-2"]);

    let html = doc.write(&mut HtmlWriter::new()).unwrap();
    assert!(html.contains("<a href=\"#foo-2\">Foo?</a>"));
    assert!(html.contains("<h1 id=\"foo-1\">"));
}

#[test]
fn test_untitled_headline_falls_back_to_index() {
    let doc = parse("* a\n* ?");
    let outline = doc.outline();
    let last = *outline.root().children.last().unwrap();
    assert_eq!(outline.section(last).id, "headline-2");
}

#[test]
fn test_outline_nesting() {
    let doc = parse("* one\n** two\n*** three\n* four");
    let outline = doc.outline();
    assert_eq!(outline.len(), 4);
    let top: Vec<String> = outline
        .root()
        .children
        .iter()
        .map(|&id| plain_text(&outline.section(id).title))
        .collect();
    assert_eq!(top, ["one", "four"]);
    let one = outline.section(outline.root().children[0]);
    let two = outline.section(one.children[0]);
    assert_eq!(plain_text(&two.title), "two");
    assert_eq!(two.children.len(), 1);
}

#[test]
fn test_footnotes_follow_first_mention() {
    let doc = parse("See[fn:z] and[fn:m].\n\n[fn:m] M.\n\n[fn:z] Z.\n\n[fn:q] Unreferenced.");
    let names: Vec<&str> = doc
        .footnotes()
        .ordered()
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(names, ["z", "m", "q"]);

    let html = doc.write(&mut HtmlWriter::new()).unwrap();
    let z = html.find("id=\"footnote-z\"").unwrap();
    let m = html.find("id=\"footnote-m\"").unwrap();
    let q = html.find("id=\"footnote-q\"").unwrap();
    assert!(z < m && m < q);
}

#[test]
fn test_inline_footnote_is_not_listed() {
    let doc = parse("Text[fn:x:inline body].");
    assert!(doc.footnotes().ordered().is_empty());
    let html = doc.write(&mut HtmlWriter::new()).unwrap();
    assert!(html.contains("<span class=\"footnote-inline\">inline body</span>"));
    assert!(!html.contains("class=\"footnotes\""));
}

#[test]
fn test_configuration_from_yaml() {
    let config = Configuration::from_yaml(
        "tags_column: 20\nauto_link: false\ndefault_settings:\n  OPTIONS: \"toc:nil e:t f:t pri:t todo:t tags:t\"\n",
    )
    .unwrap();
    assert_eq!(config.tags_column, 20);
    assert!(!config.auto_link);
    assert_eq!(config.default_settings["TODO"], "TODO | DONE");

    let mut doc = Document::with_config(config);
    doc.parse_str("* Title :a:\nhttps://example.com").unwrap();
    let org = doc.write(&mut OrgWriter::new()).unwrap();
    assert_eq!(org, format!("* Title{}:a:\nhttps://example.com\n", " ".repeat(10)));

    let html = doc.write(&mut HtmlWriter::new()).unwrap();
    assert!(!html.contains("<nav>"));
    assert!(!html.contains("<a href=\"https://example.com\">"));
}

#[test]
fn test_invalid_configuration() {
    let err = Configuration::from_yaml("tags_column: [").unwrap_err();
    assert!(matches!(err, OrgError::Config(_)));
}

#[test]
fn test_registry_exports() {
    let registry = FormatRegistry::with_defaults();
    let doc = parse("- a\n- b");
    assert_eq!(registry.export(&doc, "org").unwrap(), "- a\n- b\n");
    let html = registry.export(&doc, "html").unwrap();
    assert!(html.starts_with("<ul>\n<li>\n"));
    let json = registry
        .for_path(Path::new("tree.json"))
        .unwrap()
        .export(&doc)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value.is_array());
    assert!(matches!(
        registry.export(&doc, "latex"),
        Err(OrgError::UnknownFormat(_))
    ));
}

#[test]
fn test_tables_keep_node_order() {
    let doc = parse("| a |\n\n# done");
    assert!(matches!(doc.nodes()[0], Node::Table(_)));
    assert!(matches!(doc.nodes().last(), Some(Node::Comment(_))));
}

fn to_org(source: &str) -> String {
    parse(source).write(&mut OrgWriter::new()).unwrap()
}

fn words(max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,8}", 1..=max).prop_map(|w| w.join(" "))
}

fn headline() -> impl Strategy<Value = String> {
    (
        1usize..=3,
        prop::option::of(prop_oneof![Just("TODO"), Just("DONE")]),
        words(3),
        prop::option::of("[a-z]{1,5}"),
    )
        .prop_map(|(level, status, title, tag)| {
            let mut line = "*".repeat(level);
            if let Some(status) = status {
                line.push(' ');
                line.push_str(status);
            }
            line.push(' ');
            line.push_str(&title);
            if let Some(tag) = tag {
                line.push_str(&format!(" :{tag}:"));
            }
            line
        })
}

fn list() -> impl Strategy<Value = String> {
    let item = (
        prop_oneof![Just("-"), Just("+"), Just("1."), Just("a)")],
        prop::option::of(prop_oneof![Just("[ ] "), Just("[X] ")]),
        words(4),
        prop::option::of(words(2)),
    );
    prop::collection::vec(item, 1..=3).prop_map(|items| {
        let bullet = items[0].0;
        items
            .into_iter()
            .map(|(_, checkbox, text, nested)| {
                let mut item = format!("{bullet} {}{text}", checkbox.unwrap_or(""));
                if let Some(nested) = nested {
                    item.push_str(&format!("\n  - {nested}"));
                }
                item
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn descriptive_list() -> impl Strategy<Value = String> {
    prop::collection::vec((words(2), words(3)), 1..=3).prop_map(|items| {
        items
            .into_iter()
            .map(|(term, details)| format!("- {term} :: {details}"))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn table() -> impl Strategy<Value = String> {
    (
        1usize..=3,
        prop::collection::vec(prop::collection::vec("[a-z0-9]{0,6}", 3), 1..=4),
        any::<bool>(),
    )
        .prop_map(|(columns, rows, header)| {
            let rows: Vec<String> = rows
                .iter()
                .map(|cells| format!("| {} |", cells[..columns].join(" | ")))
                .collect();
            if header {
                let mut lines = vec![rows[0].clone(), "|---|".to_string()];
                lines.extend(rows[1..].iter().cloned());
                lines.join("\n")
            } else {
                rows.join("\n")
            }
        })
}

fn block() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("SRC sh"), Just("QUOTE"), Just("EXAMPLE")],
        prop::collection::vec("[a-z ]{0,10}", 0..=3),
    )
        .prop_map(|(kind, lines)| {
            let name = kind.split(' ').next().unwrap_or(kind);
            let mut block = vec![format!("#+BEGIN_{kind}")];
            block.extend(lines);
            block.push(format!("#+END_{name}"));
            block.join("\n")
        })
}

fn footnotes() -> impl Strategy<Value = String> {
    ("[a-z0-9]{1,4}", words(3), words(3))
        .prop_map(|(name, text, note)| format!("{text}[fn:{name}].\n\n[fn:{name}] {note}"))
}

fn structured_document() -> impl Strategy<Value = String> {
    let part = prop_oneof![
        headline(),
        list(),
        descriptive_list(),
        table(),
        block(),
        footnotes(),
        words(6),
    ];
    prop::collection::vec(part, 1..=6).prop_map(|parts| parts.join("\n\n"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_org_export_is_a_fixed_point(source in structured_document()) {
        let once = to_org(&source);
        let twice = to_org(&once);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_any_input_exports(source in "[a-zA-Z0-9 *#+:|\\[\\]/_=~^{}().,<>\\-\t\n]{0,200}") {
        let mut doc = Document::new();
        prop_assert!(doc.parse_str(&source).is_ok());
        prop_assert!(doc.write(&mut OrgWriter::new()).is_ok());
        prop_assert!(doc.write(&mut HtmlWriter::new()).is_ok());
        prop_assert!(doc.write(&mut JsonWriter::new()).is_ok());
    }

    #[test]
    fn prop_org_export_has_no_trailing_whitespace(source in "[a-z *|:\\-\n]{0,120}") {
        let mut doc = Document::new();
        doc.parse_str(&source).unwrap();
        let org = doc.write(&mut OrgWriter::new()).unwrap();
        prop_assert!(!org.contains(" \n"));
    }
}
