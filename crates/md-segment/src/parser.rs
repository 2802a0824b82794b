//! Line-oriented block parser producing ordered segments.

use crate::inline::resolve;
use crate::segment::{Segment, StyleKind, StyleSpan, StyledText, Table};

/// Parses `input` into an ordered segment list.
///
/// The input is trimmed of trailing whitespace as a whole (never per line),
/// then consumed line by line through four mutually exclusive states:
/// normal text, fenced code, pipe table, blockquote. Unterminated
/// constructs are flushed at end of input rather than rejected.
pub fn parse(input: &str) -> Vec<Segment> {
    let mut parser = Parser::default();
    for line in input.trim_end().split('\n') {
        parser.feed_line(line);
    }
    parser.finish()
}

#[derive(Default)]
struct Parser {
    segments: Vec<Segment>,
    run: TextRun,
    code: Option<CodeAccum>,
    table: Option<TableAccum>,
    quote: Option<Vec<String>>,
    list_counter: u32,
    in_list_run: bool,
}

struct CodeAccum {
    language: Option<String>,
    body: String,
}

#[derive(Default)]
struct TableAccum {
    headers: Option<Vec<StyledText>>,
    rows: Vec<Vec<StyledText>>,
}

impl Parser {
    fn feed_line(&mut self, line: &str) {
        // Inside a fence everything is verbatim until the closing fence.
        if self.code.is_some() {
            if line.trim().starts_with("```") {
                self.flush_code();
            } else if let Some(code) = self.code.as_mut() {
                code.body.push_str(line);
                code.body.push('\n');
            }
            return;
        }

        let trimmed = line.trim();

        if is_table_row(trimmed) {
            self.flush_quote();
            self.flush_run();
            self.in_list_run = false;
            let table = self.table.get_or_insert_with(TableAccum::default);
            let cells = split_cells(trimmed);
            if is_separator_row(&cells) {
                return;
            }
            let cells: Vec<StyledText> = cells.iter().map(|c| resolve(c)).collect();
            if table.headers.is_none() {
                table.headers = Some(cells);
            } else {
                table.rows.push(cells);
            }
            return;
        }
        self.flush_table();

        if let Some(rest) = quote_content(trimmed) {
            self.flush_run();
            self.in_list_run = false;
            self.quote
                .get_or_insert_with(Vec::new)
                .push(rest.to_string());
            return;
        }
        self.flush_quote();

        if let Some(fence_rest) = trimmed.strip_prefix("```") {
            self.flush_run();
            self.in_list_run = false;
            let language = fence_rest.trim();
            self.code = Some(CodeAccum {
                language: (!language.is_empty()).then(|| language.to_string()),
                body: String::new(),
            });
            return;
        }

        self.normal_line(line);
    }

    fn normal_line(&mut self, line: &str) {
        let trimmed = line.trim();

        if let Some((level, content)) = heading_line(trimmed) {
            self.in_list_run = false;
            let mut styled = resolve(content);
            let len = styled.char_len();
            if len > 0 {
                let tier = level.min(4);
                styled
                    .spans
                    .insert(0, StyleSpan::new(0, len, StyleKind::Heading(tier)));
            }
            self.run.push_line(styled);
            return;
        }

        if let Some((indent, content)) = list_item_line(line) {
            let level = (indent.chars().count() / 4 + 1).min(3);
            let marker = match level {
                1 => {
                    self.list_counter = if self.in_list_run {
                        self.list_counter + 1
                    } else {
                        1
                    };
                    format!("{}. ", self.list_counter)
                }
                2 => "\u{2022} ".to_string(),
                _ => "\u{25e6} ".to_string(),
            };
            self.in_list_run = true;
            self.run
                .push_line(resolve(&format!("{indent}{marker}{content}")));
            return;
        }

        self.in_list_run = false;

        if let Some(code) = single_code_run(trimmed) {
            self.flush_run();
            self.segments.push(Segment::InlineCode { code });
            return;
        }

        self.run.push_line(resolve(line));
    }

    fn flush_run(&mut self) {
        let run = std::mem::take(&mut self.run);
        let Some(segment) = run.into_segment() else {
            return;
        };
        self.segments.push(segment);
    }

    fn flush_code(&mut self) {
        let Some(mut code) = self.code.take() else {
            return;
        };
        // Drop the newline the line accumulation left behind.
        if code.body.ends_with('\n') {
            code.body.pop();
        }
        self.segments.push(Segment::CodeBlock {
            language: code.language,
            code: code.body,
        });
    }

    fn flush_table(&mut self) {
        let Some(table) = self.table.take() else {
            return;
        };
        // A run of separator rows with no header produces nothing.
        let Some(headers) = table.headers else {
            return;
        };
        let width = headers.len();
        let rows = table
            .rows
            .into_iter()
            .map(|mut row| {
                while row.len() < width {
                    row.push(StyledText::default());
                }
                row
            })
            .collect();
        self.segments.push(Segment::Table(Table { headers, rows }));
    }

    fn flush_quote(&mut self) {
        let Some(lines) = self.quote.take() else {
            return;
        };
        self.segments
            .push(Segment::Blockquote(resolve(&lines.join("\n"))));
    }

    fn finish(mut self) -> Vec<Segment> {
        // End of input closes whatever is still open; leniency, not an error.
        self.flush_code();
        self.flush_table();
        self.flush_quote();
        self.flush_run();
        self.segments
    }
}

/// Consecutive normal-mode lines accumulating into one text segment.
#[derive(Default)]
struct TextRun {
    text: String,
    spans: Vec<StyleSpan>,
    /// Chars accumulated, the offset base for the next line's spans.
    len: usize,
    started: bool,
}

impl TextRun {
    fn push_line(&mut self, styled: StyledText) {
        if self.started {
            self.text.push('\n');
            self.len += 1;
        }
        self.started = true;
        let added = styled.char_len();
        for span in styled.spans {
            self.spans.push(StyleSpan {
                start: span.start + self.len,
                end: span.end + self.len,
                kind: span.kind,
            });
        }
        self.len += added;
        self.text.push_str(&styled.text);
    }

    fn into_segment(self) -> Option<Segment> {
        if !self.started || self.text.chars().all(|c| c == '\n') {
            return None;
        }
        // Boundary blank lines belong to the adjacent block construct, which
        // manages its own separation; drop them here. Newlines are never
        // inside a span, so only span starts shift.
        let leading = self.text.bytes().take_while(|&b| b == b'\n').count();
        let trailing = self
            .text
            .bytes()
            .rev()
            .take_while(|&b| b == b'\n')
            .count();
        let text = self.text[leading..self.text.len() - trailing].to_string();
        let spans = self
            .spans
            .into_iter()
            .map(|span| StyleSpan {
                start: span.start - leading,
                end: span.end - leading,
                kind: span.kind,
            })
            .collect();
        Some(Segment::Text(StyledText { text, spans }))
    }
}

fn is_table_row(trimmed: &str) -> bool {
    trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

fn split_cells(trimmed: &str) -> Vec<String> {
    trimmed[1..trimmed.len() - 1]
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Separator rows consist only of dashes and spaces; a whitespace-only row
/// matches too and is likewise discarded.
fn is_separator_row(cells: &[String]) -> bool {
    cells
        .iter()
        .all(|cell| cell.chars().all(|c| c == '-' || c == ' '))
}

fn quote_content(trimmed: &str) -> Option<&str> {
    let rest = trimmed.strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// `^#{1,6}\s+(.*)$`, with the hash count mapped to a size tier later.
fn heading_line(trimmed: &str) -> Option<(u8, &str)> {
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &trimmed[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((hashes as u8, rest.trim_start()))
}

/// `^(\s*)\*\s+(.*)`; nesting level comes from the indent width.
fn list_item_line(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start();
    let indent = &line[..line.len() - rest.len()];
    let body = rest.strip_prefix('*')?;
    if !body.starts_with(char::is_whitespace) {
        return None;
    }
    Some((indent, body.trim_start()))
}

/// A line holding exactly one inline code run and nothing else.
fn single_code_run(trimmed: &str) -> Option<String> {
    let inner = trimmed.strip_prefix('`')?.strip_suffix('`')?;
    if inner.is_empty() || inner.contains('`') {
        return None;
    }
    Some(inner.to_string())
}
