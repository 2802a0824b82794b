//! Tests for block parsing and segment construction.

use pretty_assertions::assert_eq;

use crate::{parse, resolve, Segment, StyleKind, StyleSpan, StyledText};

fn expect_text(segment: &Segment) -> &StyledText {
    match segment {
        Segment::Text(styled) => styled,
        other => panic!("Expected text segment, got {:?}", other),
    }
}

#[test]
fn test_plain_text_round_trip() {
    let input = "just some plain text\nacross two lines";
    let segments = parse(input);

    assert_eq!(segments.len(), 1);
    let styled = expect_text(&segments[0]);
    assert_eq!(styled.text, input);
    assert!(styled.spans.is_empty());
}

#[test]
fn test_resolver_is_stable_on_plain_text() {
    let styled = resolve("no markers here at all");
    assert_eq!(styled.text, "no markers here at all");
    assert!(styled.spans.is_empty());

    let again = resolve(&styled.text);
    assert_eq!(again, styled);
}

#[test]
fn test_empty_input() {
    assert_eq!(parse(""), vec![]);
    assert_eq!(parse("\n\n"), vec![]);
}

#[test]
fn test_trailing_newline_trimmed() {
    let segments = parse("hello\n");
    assert_eq!(segments.len(), 1);
    assert_eq!(expect_text(&segments[0]).text, "hello");
}

#[test]
fn test_code_fence_round_trip() {
    let segments = parse("```kt\nval x = 1\n```");

    assert_eq!(segments.len(), 1);
    match &segments[0] {
        Segment::CodeBlock { language, code } => {
            assert_eq!(language.as_deref(), Some("kt"));
            assert_eq!(code, "val x = 1");
        }
        other => panic!("Expected code block, got {:?}", other),
    }
}

#[test]
fn test_unterminated_code_fence_flushed() {
    let segments = parse("```\nunclosed code");

    assert_eq!(segments.len(), 1);
    match &segments[0] {
        Segment::CodeBlock { language, code } => {
            assert_eq!(*language, None);
            assert_eq!(code, "unclosed code");
        }
        other => panic!("Expected code block, got {:?}", other),
    }
}

#[test]
fn test_code_block_keeps_markdown_verbatim() {
    let segments = parse("```\n# not a heading\n* not a list\n```");

    match &segments[0] {
        Segment::CodeBlock { code, .. } => {
            assert_eq!(code, "# not a heading\n* not a list");
        }
        other => panic!("Expected code block, got {:?}", other),
    }
}

#[test]
fn test_bold_italic_precedence() {
    let styled = resolve("***hi***");
    assert_eq!(styled.text, "hi");
    assert_eq!(
        styled.spans,
        vec![StyleSpan::new(0, 2, StyleKind::BoldItalic)]
    );
}

#[test]
fn test_table_row_padding() {
    let segments = parse("|A|B|C|\n|---|---|---|\n|x|y|");

    assert_eq!(segments.len(), 1);
    match &segments[0] {
        Segment::Table(table) => {
            assert_eq!(table.headers.len(), 3);
            assert_eq!(table.rows.len(), 1);
            assert_eq!(table.rows[0].len(), 3);
            assert_eq!(table.rows[0][0].text, "x");
            assert_eq!(table.rows[0][1].text, "y");
            assert_eq!(table.rows[0][2].text, "");
        }
        other => panic!("Expected table, got {:?}", other),
    }
}

#[test]
fn test_table_separator_rows_discarded() {
    let segments = parse("| A | B |\n| --- | --- |\n| 1 | 2 |\n|   |\n| 3 | 4 |");

    match &segments[0] {
        Segment::Table(table) => {
            assert_eq!(table.headers[0].text, "A");
            assert_eq!(table.headers[1].text, "B");
            // The whitespace-only row counts as a separator, not data.
            assert_eq!(table.rows.len(), 2);
        }
        other => panic!("Expected table, got {:?}", other),
    }
}

#[test]
fn test_table_cells_resolve_inline_styles() {
    let segments = parse("| **Name** | Value |\n|---|---|\n| `id` | 7 |");

    match &segments[0] {
        Segment::Table(table) => {
            assert_eq!(table.headers[0].text, "Name");
            assert_eq!(
                table.headers[0].spans,
                vec![StyleSpan::new(0, 4, StyleKind::Bold)]
            );
            assert_eq!(table.rows[0][0].text, "id");
            assert_eq!(
                table.rows[0][0].spans,
                vec![StyleSpan::new(0, 2, StyleKind::InlineCode)]
            );
        }
        other => panic!("Expected table, got {:?}", other),
    }
}

#[test]
fn test_blockquote_accumulates_lines() {
    let segments = parse("> first line\n> second line");

    assert_eq!(segments.len(), 1);
    match &segments[0] {
        Segment::Blockquote(styled) => {
            assert_eq!(styled.text, "first line\nsecond line");
        }
        other => panic!("Expected blockquote, got {:?}", other),
    }
}

#[test]
fn test_blockquote_resolves_inline_styles() {
    let segments = parse("> quoting **someone**");

    match &segments[0] {
        Segment::Blockquote(styled) => {
            assert_eq!(styled.text, "quoting someone");
            assert_eq!(styled.spans, vec![StyleSpan::new(8, 15, StyleKind::Bold)]);
        }
        other => panic!("Expected blockquote, got {:?}", other),
    }
}

#[test]
fn test_heading_levels_map_to_tiers() {
    let segments = parse("# One\n###### Six");

    assert_eq!(segments.len(), 1);
    let styled = expect_text(&segments[0]);
    assert_eq!(styled.text, "One\nSix");
    assert_eq!(
        styled.spans,
        vec![
            StyleSpan::new(0, 3, StyleKind::Heading(1)),
            StyleSpan::new(4, 7, StyleKind::Heading(4)),
        ]
    );
}

#[test]
fn test_heading_content_resolves_inline() {
    let segments = parse("## A **bold** title");

    let styled = expect_text(&segments[0]);
    assert_eq!(styled.text, "A bold title");
    assert_eq!(
        styled.spans,
        vec![
            StyleSpan::new(0, 12, StyleKind::Heading(2)),
            StyleSpan::new(2, 6, StyleKind::Bold),
        ]
    );
}

#[test]
fn test_seven_hashes_is_not_a_heading() {
    let segments = parse("####### nope");
    let styled = expect_text(&segments[0]);
    assert_eq!(styled.text, "####### nope");
    assert!(styled.spans.is_empty());
}

#[test]
fn test_list_numbering() {
    let segments = parse("* first\n* second\n* third");

    let styled = expect_text(&segments[0]);
    assert_eq!(styled.text, "1. first\n2. second\n3. third");
}

#[test]
fn test_list_numbering_resets_after_non_list_line() {
    let segments = parse("* first\n* second\na plain line\n* again");

    let styled = expect_text(&segments[0]);
    assert_eq!(styled.text, "1. first\n2. second\na plain line\n1. again");
}

#[test]
fn test_nested_list_markers() {
    let segments = parse("* top\n    * middle\n        * deep\n* next");

    let styled = expect_text(&segments[0]);
    assert_eq!(
        styled.text,
        "1. top\n    \u{2022} middle\n        \u{25e6} deep\n2. next"
    );
}

#[test]
fn test_nested_items_do_not_reset_numbering() {
    let segments = parse("* one\n    * sub\n* two");

    let styled = expect_text(&segments[0]);
    assert_eq!(styled.text, "1. one\n    \u{2022} sub\n2. two");
}

#[test]
fn test_list_item_resolves_inline_styles() {
    let segments = parse("* has **bold** inside");

    let styled = expect_text(&segments[0]);
    assert_eq!(styled.text, "1. has bold inside");
    assert_eq!(styled.spans, vec![StyleSpan::new(7, 11, StyleKind::Bold)]);
}

#[test]
fn test_inline_code_only_line_promoted() {
    let segments = parse("before\n`let x = 1`\nafter");

    assert_eq!(segments.len(), 3);
    assert_eq!(expect_text(&segments[0]).text, "before");
    match &segments[1] {
        Segment::InlineCode { code } => assert_eq!(code, "let x = 1"),
        other => panic!("Expected inline code segment, got {:?}", other),
    }
    assert_eq!(expect_text(&segments[2]).text, "after");
}

#[test]
fn test_inline_code_in_prose_stays_a_span() {
    let segments = parse("use `foo()` here");

    let styled = expect_text(&segments[0]);
    assert_eq!(styled.text, "use foo() here");
    assert_eq!(
        styled.spans,
        vec![StyleSpan::new(4, 9, StyleKind::InlineCode)]
    );
}

#[test]
fn test_underline_and_strikethrough() {
    let styled = resolve("__under__ and ~~gone~~");
    assert_eq!(styled.text, "under and gone");
    assert_eq!(
        styled.spans,
        vec![
            StyleSpan::new(0, 5, StyleKind::Underline),
            StyleSpan::new(10, 14, StyleKind::Strikethrough),
        ]
    );
}

#[test]
fn test_escaped_markers_do_not_match() {
    let segments = parse(r"a \*\*literal\*\* run");
    let styled = expect_text(&segments[0]);
    assert_eq!(styled.text, r"a \*\*literal\*\* run");
    assert!(styled.spans.is_empty());
}

#[test]
fn test_span_invariants_hold_on_a_dense_document() {
    let input = "\
# Title with **bold**
Intro *paragraph* with [a link](https://x.test) and `code`.
* item **one**
* item ~~two~~

> a __quote__ with ***emphasis***
| H1 | *H2* |
|----|----|
| `a` | b |";

    let mut styled_texts = Vec::new();
    for segment in parse(input) {
        match segment {
            Segment::Text(s) | Segment::Blockquote(s) => styled_texts.push(s),
            Segment::Table(table) => {
                styled_texts.extend(table.headers);
                for row in table.rows {
                    styled_texts.extend(row);
                }
            }
            Segment::CodeBlock { .. } | Segment::InlineCode { .. } => {}
        }
    }

    assert!(!styled_texts.is_empty());
    for styled in &styled_texts {
        let len = styled.char_len();
        let mut prev_start = 0;
        for span in &styled.spans {
            assert!(span.start < span.end, "empty span in {:?}", styled);
            assert!(span.end <= len, "span past end in {:?}", styled);
            assert!(span.start >= prev_start, "unsorted spans in {:?}", styled);
            prev_start = span.start;
        }
        // Any two spans either nest or don't touch at all.
        for (i, a) in styled.spans.iter().enumerate() {
            for b in &styled.spans[i + 1..] {
                let nested = (a.start <= b.start && b.end <= a.end)
                    || (b.start <= a.start && a.end <= b.end);
                let disjoint = a.end <= b.start || b.end <= a.start;
                assert!(
                    nested || disjoint,
                    "overlapping siblings {:?} / {:?} in {:?}",
                    a,
                    b,
                    styled
                );
            }
        }
    }
}

#[test]
fn test_mixed_document_order_preserved() {
    let input = "\
intro text
```py
x = 1
```
| A |
|---|
| 1 |
> quoted
closing text";

    let segments = parse(input);

    assert_eq!(segments.len(), 5);
    assert!(matches!(&segments[0], Segment::Text(s) if s.text == "intro text"));
    assert!(matches!(
        &segments[1],
        Segment::CodeBlock { language: Some(l), code } if l == "py" && code == "x = 1"
    ));
    assert!(matches!(&segments[2], Segment::Table(_)));
    assert!(matches!(&segments[3], Segment::Blockquote(s) if s.text == "quoted"));
    assert!(matches!(&segments[4], Segment::Text(s) if s.text == "closing text"));
}

#[test]
fn test_blank_lines_inside_a_text_run_survive() {
    let segments = parse("first paragraph\n\nsecond paragraph");

    assert_eq!(segments.len(), 1);
    assert_eq!(
        expect_text(&segments[0]).text,
        "first paragraph\n\nsecond paragraph"
    );
}

#[test]
fn test_blank_line_before_fence_not_duplicated() {
    let segments = parse("text\n\n```\ncode\n```");

    assert_eq!(segments.len(), 2);
    assert_eq!(expect_text(&segments[0]).text, "text");
}

#[test]
fn test_link_label_styles_nest_inside_link() {
    let styled = resolve("[see **this**](https://x.test)");

    assert_eq!(styled.text, "see this");
    assert_eq!(
        styled.spans,
        vec![
            StyleSpan::new(
                0,
                8,
                StyleKind::Link {
                    url: "https://x.test".to_string()
                }
            ),
            StyleSpan::new(4, 8, StyleKind::Bold),
        ]
    );
}

#[test]
fn test_image_alt_keeps_url_as_metadata() {
    let styled = resolve("![diagram](http://img.test/d.png)");

    assert_eq!(styled.text, "diagram");
    assert_eq!(
        styled.spans,
        vec![StyleSpan::new(
            0,
            7,
            StyleKind::ImageAlt {
                url: "http://img.test/d.png".to_string()
            }
        )]
    );
}

#[test]
fn test_unterminated_table_flushed_at_end_of_input() {
    let segments = parse("| A | B |\n| 1 | 2 |");

    assert_eq!(segments.len(), 1);
    match &segments[0] {
        Segment::Table(table) => {
            assert_eq!(table.headers.len(), 2);
            assert_eq!(table.rows.len(), 1);
        }
        other => panic!("Expected table, got {:?}", other),
    }
}

#[test]
fn test_unterminated_blockquote_flushed_at_end_of_input() {
    let segments = parse("some text\n> trailing quote");

    assert_eq!(segments.len(), 2);
    assert!(matches!(&segments[1], Segment::Blockquote(s) if s.text == "trailing quote"));
}
