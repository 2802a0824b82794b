//! Parsed segments - the stable output of parsing.

/// The styling applied to one span of a [`StyledText`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleKind {
    Bold,
    Italic,
    BoldItalic,
    Underline,
    Strikethrough,
    InlineCode,
    /// Link label; the span carries the target URL.
    Link { url: String },
    /// Image alt text. The URL is dropped from display but kept here so a
    /// host can still surface it.
    ImageAlt { url: String },
    /// Heading content. Tier 1 is the largest; levels past 4 share tier 4.
    Heading(u8),
}

/// A styled character range. Offsets are **char** offsets into the owning
/// text, the same unit the reveal engine advances in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSpan {
    pub start: usize,
    pub end: usize,
    pub kind: StyleKind,
}

impl StyleSpan {
    pub fn new(start: usize, end: usize, kind: StyleKind) -> Self {
        debug_assert!(start < end);
        Self { start, end, kind }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Text plus inline style spans. Immutable once produced.
///
/// Spans are sorted by `start`; siblings never overlap, and a nested span is
/// fully contained by its parent (parent sorts first on equal starts).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledText {
    pub text: String,
    pub spans: Vec<StyleSpan>,
}

impl StyledText {
    /// Text with no styling at all.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    /// Length in characters, the unit all span offsets use.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A pipe table. Rows shorter than the header are padded with empty cells
/// at parse time; rows longer than it are kept as parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<StyledText>,
    pub rows: Vec<Vec<StyledText>>,
}

/// One top-level structural unit of parsed output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A run of paragraph/heading/list-item lines with inline styling
    /// applied. Heading sizing and list markers are already baked in.
    Text(StyledText),

    /// Fenced code block. Unstyled here; syntax coloring is a pluggable
    /// collaborator on the reveal side.
    CodeBlock {
        language: Option<String>,
        code: String,
    },

    /// An inline code run promoted to its own segment (a line that holds
    /// nothing else), so it can be independently revealed and highlighted.
    InlineCode { code: String },

    Table(Table),

    Blockquote(StyledText),
}
