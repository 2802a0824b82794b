//! Syntax-highlighter seam for code segments.
//!
//! The engine re-highlights the revealed code prefix on every tick through
//! this trait; which colors a lexical class gets is the host's business.

/// Lexical classes a highlighter can assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexClass {
    Keyword,
    StringLit,
    Comment,
    Number,
    Operator,
    TypeName,
}

/// A classified char range of [`HighlightedCode::code`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub class: LexClass,
}

/// Code plus lexical classification, ready for a host to colorize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedCode {
    pub code: String,
    pub spans: Vec<HighlightSpan>,
}

/// Swappable syntax highlighter.
///
/// Called with the revealed prefix only, so implementations must tolerate
/// truncated input (an unclosed string literal, half a keyword).
pub trait Highlight: Send + Sync {
    fn highlight(&self, code: &str, language: Option<&str>) -> HighlightedCode;
}

/// Default highlighter: no classification at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHighlighter;

impl Highlight for PlainHighlighter {
    fn highlight(&self, code: &str, _language: Option<&str>) -> HighlightedCode {
        HighlightedCode {
            code: code.to_string(),
            spans: Vec::new(),
        }
    }
}
