//! Tables
//!
//! A header exists when the first row is followed by a separator, or when the
//! table opens with separator, row, separator. Any other arrangement has only
//! body rows, even if separators appear further down.

use super::{ParseContext, Parser};
use crate::org::ast::{plain_text, Align, Node, Table, TableRow};
use crate::org::token::TokenKind;

/// Cells of a `| a | b |` line.
fn split_cells(content: &str) -> Vec<&str> {
    let inner = content.strip_prefix('|').unwrap_or(content);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(str::trim).collect()
}

impl Parser<'_> {
    pub(super) fn parse_table(&mut self, start: usize, ctx: &ParseContext<'_>) -> Option<(usize, Node)> {
        let mut rows = Vec::new();
        let mut i = start;
        while !ctx.should_stop(&self.tokens, i) && self.tokens[i].kind.is_table() {
            let row = if self.tokens[i].kind == TokenKind::TableSeparator {
                Node::TableSeparator
            } else {
                let content = self.tokens[i].content.clone();
                let cells = split_cells(&content);
                let is_special = cells.iter().any(|c| !c.is_empty())
                    && cells
                        .iter()
                        .all(|c| c.is_empty() || self.patterns.align_cookie.is_match(c));
                let columns = cells.iter().map(|cell| self.parse_inline(cell)).collect();
                Node::TableRow(TableRow {
                    columns,
                    is_special,
                })
            };
            rows.push(row);
            i += 1;
        }

        let header_at = match rows.as_slice() {
            [Node::TableRow(_), Node::TableSeparator, ..] => Some(0),
            [Node::TableSeparator, Node::TableRow(_), Node::TableSeparator, ..] => Some(1),
            _ => None,
        };
        if let Some(at) = header_at {
            if let Node::TableRow(row) = rows[at].clone() {
                rows[at] = Node::TableHeader(row);
            }
        }

        let alignments = self.column_alignments(&rows);
        Some((i - start, Node::Table(Table { rows, alignments })))
    }

    /// Alignment cookies win; otherwise a column whose non-empty body cells are
    /// mostly numbers is right-aligned.
    fn column_alignments(&self, rows: &[Node]) -> Vec<Align> {
        let width = rows
            .iter()
            .map(|row| match row {
                Node::TableRow(r) | Node::TableHeader(r) => r.columns.len(),
                _ => 0,
            })
            .max()
            .unwrap_or(0);
        let mut alignments = vec![Align::None; width];
        let mut numeric = vec![0usize; width];
        let mut non_numeric = vec![0usize; width];

        for row in rows {
            match row {
                Node::TableRow(r) if r.is_special => {
                    for (col, cell) in r.columns.iter().enumerate() {
                        let cookie = plain_text(cell);
                        alignments[col] = match cookie.chars().nth(1) {
                            Some('l') => Align::Left,
                            Some('r') => Align::Right,
                            Some('c') => Align::Center,
                            _ => alignments[col],
                        };
                    }
                }
                Node::TableRow(r) => {
                    for (col, cell) in r.columns.iter().enumerate() {
                        let text = plain_text(cell);
                        if text.is_empty() {
                            continue;
                        }
                        if self.patterns.numeric.is_match(&text) {
                            numeric[col] += 1;
                        } else {
                            non_numeric[col] += 1;
                        }
                    }
                }
                _ => {}
            }
        }

        for col in 0..width {
            if alignments[col] == Align::None && numeric[col] > 0 && numeric[col] >= non_numeric[col] {
                alignments[col] = Align::Right;
            }
        }
        alignments
    }
}

#[cfg(test)]
mod tests {
    use super::split_cells;
    use crate::org::ast::{plain_text, Align, Node, Table};
    use crate::org::parsing::tests::parse;

    fn table(node: &Node) -> &Table {
        match node {
            Node::Table(t) => t,
            other => panic!("expected table, got {other:?}"),
        }
    }

    fn kinds(t: &Table) -> Vec<&'static str> {
        t.rows
            .iter()
            .map(|r| match r {
                Node::TableHeader(_) => "header",
                Node::TableRow(_) => "row",
                Node::TableSeparator => "sep",
                _ => "other",
            })
            .collect()
    }

    #[test]
    fn test_split_cells() {
        assert_eq!(split_cells("| a | b |"), vec!["a", "b"]);
        assert_eq!(split_cells("| a || c"), vec!["a", "", "c"]);
        assert_eq!(split_cells("|"), vec![""]);
    }

    #[test]
    fn test_header_row_then_separator() {
        let (nodes, _) = parse("| a | b |\n|---+---|\n| 1 | 2 |");
        assert_eq!(kinds(table(&nodes[0])), vec!["header", "sep", "row"]);
    }

    #[test]
    fn test_header_between_separators() {
        let (nodes, _) = parse("|---|\n| a |\n|---|\n| 1 |");
        assert_eq!(kinds(table(&nodes[0])), vec!["sep", "header", "sep", "row"]);
    }

    #[test]
    fn test_no_header() {
        let (nodes, _) = parse("| a |\n| b |\n|---|\n| c |");
        assert_eq!(kinds(table(&nodes[0])), vec!["row", "row", "sep", "row"]);
    }

    #[test]
    fn test_cells_are_inline_parsed() {
        let (nodes, _) = parse("| *bold* | [[https://x.org][x]] |");
        let Node::TableRow(row) = &table(&nodes[0]).rows[0] else {
            panic!("expected row");
        };
        assert!(matches!(row.columns[0][0], Node::Emphasis(_)));
        assert_eq!(plain_text(&row.columns[1]), "x");
    }

    #[test]
    fn test_numeric_columns_align_right() {
        let (nodes, _) = parse("| name | n |\n|---|\n| a | 1 |\n| b | 2.5 |\n| c | |");
        assert_eq!(table(&nodes[0]).alignments, vec![Align::None, Align::Right]);
    }

    #[test]
    fn test_alignment_cookies() {
        let (nodes, _) = parse("| <c> | <l> | |\n| 1 | 2 | 3 |");
        let t = table(&nodes[0]);
        let Node::TableRow(cookie) = &t.rows[0] else {
            panic!("expected row");
        };
        assert!(cookie.is_special);
        assert_eq!(t.alignments, vec![Align::Center, Align::Left, Align::Right]);
    }
}
