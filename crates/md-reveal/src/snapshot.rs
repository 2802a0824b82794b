//! Snapshot types and prefix clipping.

use md_segment::{Segment, StyleSpan, StyledText, Table};

use crate::engine::SessionId;
use crate::highlight::{Highlight, HighlightedCode};

/// One cell of a partially revealed table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableCell {
    /// Not yet reached by the reveal cursor; render a placeholder.
    Pending,
    Revealed(StyledText),
}

/// The revealed prefix of the current segment.
#[derive(Debug, Clone, PartialEq)]
pub enum PartialContent {
    Text(StyledText),
    Blockquote(StyledText),
    Code {
        language: Option<String>,
        highlighted: HighlightedCode,
    },
    InlineCode {
        highlighted: HighlightedCode,
    },
    /// Cells fill left-to-right within a row, rows top-to-bottom, headers
    /// first.
    Table {
        headers: Vec<TableCell>,
        rows: Vec<Vec<TableCell>>,
    },
}

/// A point-in-time view of a reveal stream.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealSnapshot {
    pub session_id: SessionId,
    pub segment_index: usize,
    pub partial: PartialContent,
    /// Set exactly once per segment, in order.
    pub is_segment_complete: bool,
    /// Set on the last snapshot of the stream, whether it completed or was
    /// cancelled.
    pub is_stream_complete: bool,
}

/// Builds the partial view of `segment` with `revealed` characters shown.
pub(crate) fn partial_for(
    segment: &Segment,
    revealed: usize,
    highlighter: &dyn Highlight,
) -> PartialContent {
    match segment {
        Segment::Text(styled) => PartialContent::Text(clip_styled(styled, revealed)),

        Segment::Blockquote(styled) => PartialContent::Blockquote(clip_styled(styled, revealed)),

        Segment::CodeBlock { language, code } => PartialContent::Code {
            language: language.clone(),
            highlighted: highlighter.highlight(char_prefix(code, revealed), language.as_deref()),
        },

        Segment::InlineCode { code } => PartialContent::InlineCode {
            highlighted: highlighter.highlight(char_prefix(code, revealed), None),
        },

        Segment::Table(table) => partial_table(table, revealed),
    }
}

/// Clips `styled` to its first `chars` characters. A span crossing the
/// boundary is truncated, never dropped, so an opened style survives
/// mid-reveal.
pub(crate) fn clip_styled(styled: &StyledText, chars: usize) -> StyledText {
    if chars >= styled.char_len() {
        return styled.clone();
    }
    let text = char_prefix(&styled.text, chars).to_string();
    let spans = styled
        .spans
        .iter()
        .filter(|span| span.start < chars)
        .map(|span| StyleSpan {
            start: span.start,
            end: span.end.min(chars),
            kind: span.kind.clone(),
        })
        .collect();
    StyledText { text, spans }
}

fn partial_table(table: &Table, revealed: usize) -> PartialContent {
    if revealed >= table_char_len(table) {
        // Fully revealed; zero-width cells (header padding) included.
        return PartialContent::Table {
            headers: table
                .headers
                .iter()
                .map(|c| TableCell::Revealed(c.clone()))
                .collect(),
            rows: table
                .rows
                .iter()
                .map(|row| row.iter().map(|c| TableCell::Revealed(c.clone())).collect())
                .collect(),
        };
    }

    let mut remaining = revealed;
    let headers = table
        .headers
        .iter()
        .map(|cell| fill_cell(cell, &mut remaining))
        .collect();
    let rows = table
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| fill_cell(cell, &mut remaining)).collect())
        .collect();
    PartialContent::Table { headers, rows }
}

fn fill_cell(cell: &StyledText, remaining: &mut usize) -> TableCell {
    if *remaining == 0 {
        return TableCell::Pending;
    }
    let len = cell.char_len();
    if *remaining >= len {
        *remaining -= len;
        TableCell::Revealed(cell.clone())
    } else {
        let clipped = clip_styled(cell, *remaining);
        *remaining = 0;
        TableCell::Revealed(clipped)
    }
}

pub(crate) fn table_char_len(table: &Table) -> usize {
    table
        .headers
        .iter()
        .chain(table.rows.iter().flatten())
        .map(StyledText::char_len)
        .sum()
}

fn char_prefix(s: &str, chars: usize) -> &str {
    match s.char_indices().nth(chars) {
        Some((byte, _)) => &s[..byte],
        None => s,
    }
}
