//! Inline style resolution: bold, italic, code, links, etc.

use crate::segment::{StyleKind, StyleSpan, StyledText};

/// Resolves inline markers in `text` into a [`StyledText`].
///
/// The scan walks left to right looking for the earliest match; when several
/// patterns could start at the same offset the longer emphasis forms win
/// (`***` before `**` before `*`). Matched content is resolved recursively
/// so styles nest, except inline code and image alt text, which stay
/// literal. A marker preceded by an odd number of backslashes is excluded
/// from the search entirely; the backslash stays in the output text.
///
/// Never fails: text with no (or unterminated) markers comes back unstyled.
pub fn resolve(text: &str) -> StyledText {
    let chars: Vec<char> = text.chars().collect();
    let mut out = Builder::default();
    resolve_into(&chars, &mut out);
    out.finish()
}

#[derive(Default)]
struct Builder {
    text: String,
    /// Chars pushed so far; span offsets are char offsets.
    len: usize,
    spans: Vec<StyleSpan>,
}

impl Builder {
    fn push_chars(&mut self, chars: &[char]) {
        self.text.extend(chars.iter());
        self.len += chars.len();
    }

    fn finish(mut self) -> StyledText {
        // Children are pushed before their parent during recursion; sorting
        // by (start, widest-first) restores parent-before-child order.
        self.spans
            .sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        StyledText {
            text: self.text,
            spans: self.spans,
        }
    }
}

enum MatchKind {
    /// Content range is resolved recursively under this span kind.
    Recurse(StyleKind, usize, usize),
    /// Content range is copied verbatim under this span kind.
    Literal(StyleKind, usize, usize),
}

struct Match {
    /// Index just past the closing marker.
    end: usize,
    kind: MatchKind,
}

fn resolve_into(chars: &[char], out: &mut Builder) {
    let mut i = 0;
    let mut plain_from = 0;

    while i < chars.len() {
        if is_escaped(chars, i) {
            i += 1;
            continue;
        }
        let Some(m) = match_at(chars, i) else {
            i += 1;
            continue;
        };

        out.push_chars(&chars[plain_from..i]);

        match m.kind {
            MatchKind::Recurse(kind, start, stop) => {
                let span_start = out.len;
                resolve_into(&chars[start..stop], out);
                if out.len > span_start {
                    out.spans.push(StyleSpan::new(span_start, out.len, kind));
                }
            }
            MatchKind::Literal(kind, start, stop) => {
                let span_start = out.len;
                out.push_chars(&chars[start..stop]);
                if out.len > span_start {
                    out.spans.push(StyleSpan::new(span_start, out.len, kind));
                }
            }
        }

        i = m.end;
        plain_from = i;
    }

    out.push_chars(&chars[plain_from..]);
}

/// Tries every pattern that can start at `i`, in precedence order.
fn match_at(chars: &[char], i: usize) -> Option<Match> {
    match chars[i] {
        '*' => {
            if let Some((start, stop, end)) = delimited(chars, i, &['*', '*', '*']) {
                return Some(Match {
                    end,
                    kind: MatchKind::Recurse(StyleKind::BoldItalic, start, stop),
                });
            }
            if let Some((start, stop, end)) = delimited(chars, i, &['*', '*']) {
                return Some(Match {
                    end,
                    kind: MatchKind::Recurse(StyleKind::Bold, start, stop),
                });
            }
            if let Some((start, stop, end)) = delimited(chars, i, &['*']) {
                return Some(Match {
                    end,
                    kind: MatchKind::Recurse(StyleKind::Italic, start, stop),
                });
            }
            None
        }

        '_' => {
            let (start, stop, end) = delimited(chars, i, &['_', '_'])?;
            Some(Match {
                end,
                kind: MatchKind::Recurse(StyleKind::Underline, start, stop),
            })
        }

        '~' => {
            let (start, stop, end) = delimited(chars, i, &['~', '~'])?;
            Some(Match {
                end,
                kind: MatchKind::Recurse(StyleKind::Strikethrough, start, stop),
            })
        }

        '`' => {
            let (start, stop, end) = delimited(chars, i, &['`'])?;
            Some(Match {
                end,
                kind: MatchKind::Literal(StyleKind::InlineCode, start, stop),
            })
        }

        '[' => {
            let (label_start, label_stop, url_start, url_stop, end) = bracket_pair(chars, i)?;
            let url: String = chars[url_start..url_stop].iter().collect();
            Some(Match {
                end,
                kind: MatchKind::Recurse(StyleKind::Link { url }, label_start, label_stop),
            })
        }

        '!' => {
            if chars.get(i + 1) != Some(&'[') {
                return None;
            }
            let (alt_start, alt_stop, url_start, url_stop, end) = bracket_pair(chars, i + 1)?;
            let url: String = chars[url_start..url_stop].iter().collect();
            Some(Match {
                end,
                kind: MatchKind::Literal(StyleKind::ImageAlt { url }, alt_start, alt_stop),
            })
        }

        _ => None,
    }
}

/// Matches `marker content marker` at `i` with non-empty content and an
/// unescaped closer. Returns (content_start, content_end, end_after_close).
fn delimited(chars: &[char], i: usize, marker: &[char]) -> Option<(usize, usize, usize)> {
    if !slice_at(chars, i, marker) {
        return None;
    }
    let content_start = i + marker.len();
    let close = find_unescaped(chars, content_start + 1, marker)?;
    Some((content_start, close, close + marker.len()))
}

/// Matches `[label](url)` at `i` (which must point at the `[`), requiring
/// non-empty label and url. Returns
/// (label_start, label_stop, url_start, url_stop, end_after_paren).
fn bracket_pair(chars: &[char], i: usize) -> Option<(usize, usize, usize, usize, usize)> {
    let label_start = i + 1;
    let label_stop = find_unescaped(chars, label_start, &[']'])?;
    if label_stop == label_start {
        return None;
    }
    if chars.get(label_stop + 1) != Some(&'(') {
        return None;
    }
    let url_start = label_stop + 2;
    let url_stop = find_unescaped(chars, url_start, &[')'])?;
    if url_stop == url_start {
        return None;
    }
    Some((label_start, label_stop, url_start, url_stop, url_stop + 1))
}

fn find_unescaped(chars: &[char], from: usize, marker: &[char]) -> Option<usize> {
    let mut j = from;
    while j + marker.len() <= chars.len() {
        if slice_at(chars, j, marker) && !is_escaped(chars, j) {
            return Some(j);
        }
        j += 1;
    }
    None
}

fn slice_at(chars: &[char], i: usize, marker: &[char]) -> bool {
    chars.len() >= i + marker.len() && chars[i..i + marker.len()] == *marker
}

/// A position is escaped when preceded by an odd number of backslashes.
fn is_escaped(chars: &[char], i: usize) -> bool {
    let mut backslashes = 0;
    while backslashes < i && chars[i - backslashes - 1] == '\\' {
        backslashes += 1;
    }
    backslashes % 2 == 1
}
