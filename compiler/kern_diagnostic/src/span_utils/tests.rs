#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_table_line_lookup() {
    let source = "line1\nline2\nline3";
    let table = LineOffsetTable::build(source);

    assert_eq!(table.line_count(), 3);
    assert_eq!(table.line_from_offset(0), 1);
    assert_eq!(table.line_from_offset(5), 1);
    assert_eq!(table.line_from_offset(6), 2);
    assert_eq!(table.line_from_offset(12), 3);
}

#[test]
fn test_table_columns_count_chars() {
    let source = "x = \"é\" + y";
    let table = LineOffsetTable::build(source);
    // 'é' is two bytes
    let plus = u32::try_from(source.find('+').unwrap()).unwrap();
    assert_eq!(table.offset_to_line_col(source, plus), (1, 9));
}

#[test]
fn test_line_text_strips_terminator() {
    let source = "a = 1\r\nb = 2\n";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.line_text(source, 1), Some("a = 1"));
    assert_eq!(table.line_text(source, 2), Some("b = 2"));
    assert_eq!(table.line_text(source, 3), Some(""));
    assert_eq!(table.line_text(source, 4), None);
}

#[test]
fn test_line_start_offset_bounds() {
    let table = LineOffsetTable::build("a\nb");
    assert_eq!(table.line_start_offset(0), None);
    assert_eq!(table.line_start_offset(2), Some(2));
    assert_eq!(table.line_start_offset(3), None);
}

#[test]
fn test_line_number_scan_agrees_with_table() {
    let source = "class A:\n    def f(self):\n        pass\n";
    let table = LineOffsetTable::build(source);
    for offset in [0u32, 9, 13, 30, 38] {
        assert_eq!(
            line_number(source, Span::point(offset)),
            table.line_from_offset(offset),
            "offset {offset}"
        );
    }
}

#[test]
fn test_offset_past_end_is_clamped() {
    let source = "ab";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.offset_to_line_col(source, 10), (1, 3));
}
