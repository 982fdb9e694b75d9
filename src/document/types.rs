//! Rendered preview types.

use unicode_width::UnicodeWidthStr;

/// The rendered preview of a markdown source, ready for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    pub(crate) lines: Vec<RenderedLine>,
    pub(crate) headings: Vec<HeadingRef>,
    pub(crate) links: Vec<LinkRef>,
}

impl Preview {
    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn headings(&self) -> &[HeadingRef] {
        &self.headings
    }

    pub fn links(&self) -> &[LinkRef] {
        &self.links
    }

    /// Plain text of every line, mostly useful in tests.
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.content.clone()).collect()
    }
}

/// A single display line of the preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub content: String,
    pub line_type: LineType,
    pub spans: Vec<InlineSpan>,
}

impl RenderedLine {
    pub fn new(content: impl Into<String>, line_type: LineType) -> Self {
        let content = content.into();
        let spans = if content.is_empty() {
            Vec::new()
        } else {
            vec![InlineSpan::new(content.clone(), InlineStyle::default())]
        };
        Self {
            content,
            line_type,
            spans,
        }
    }

    pub fn with_spans(line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        let content = spans.iter().map(|s| s.text.as_str()).collect();
        Self {
            content,
            line_type,
            spans,
        }
    }

    pub fn empty() -> Self {
        Self::new(String::new(), LineType::Empty)
    }

    pub fn width(&self) -> usize {
        self.content.width()
    }
}

/// Block-level kind of a rendered line, used to pick its base style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Heading(u8),
    Paragraph,
    CodeBlock,
    BlockQuote,
    /// List item at a nesting depth (1 = top level)
    ListItem(usize),
    Table,
    HorizontalRule,
    Image,
    Footnote,
    Empty,
}

/// Inline formatting flags for a span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: bool,
    pub fg: Option<InlineColor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    pub text: String,
    pub style: InlineStyle,
}

impl InlineSpan {
    pub fn new(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A heading and the preview line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRef {
    pub level: u8,
    pub text: String,
    pub line: usize,
}

/// A link target and the preview line its text appears on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub text: String,
    pub url: String,
    pub line: usize,
}
