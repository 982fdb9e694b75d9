//! Markdown to preview lines, via comrak.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue, TableAlignment};
use comrak::{Arena, Options, markdown_to_html, parse_document};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::{
    HeadingRef, InlineSpan, InlineStyle, LineType, LinkRef, Preview, RenderedLine,
};
use crate::config::Theme;

const CODE_RIGHT_PADDING: usize = 2;
const QUOTE_PREFIX: &str = "│ ";

/// Render markdown into preview lines wrapped at `width` display columns.
///
/// Never fails: comrak accepts any input and malformed markdown renders as
/// best it can.
///
/// # Example
///
/// ```
/// use markpad::config::Theme;
/// use markpad::document::render;
///
/// let preview = render("# Hello\n\nWorld", 40, Theme::Dark);
/// assert_eq!(preview.headings()[0].text, "Hello");
/// ```
pub fn render(source: &str, width: u16, theme: Theme) -> Preview {
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);

    let mut renderer = Renderer::new(usize::from(width.max(8)), theme);
    renderer.block(root, 0);
    renderer.trim_trailing_empty();
    tracing::debug!(
        source_bytes = source.len(),
        lines = renderer.lines.len(),
        width,
        "document.render"
    );
    Preview {
        lines: renderer.lines,
        headings: renderer.headings,
        links: renderer.links,
    }
}

/// HTML fragment for the same source, with the same extension set as the
/// terminal preview.
pub fn to_html(source: &str) -> String {
    markdown_to_html(source, &create_options())
}

fn create_options() -> Options {
    let mut options = Options::default();

    // GFM
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;

    options.extension.shortcodes = true;
    options.extension.header_ids = Some(String::new());

    options
}

struct Renderer {
    width: usize,
    theme: Theme,
    lines: Vec<RenderedLine>,
    headings: Vec<HeadingRef>,
    links: Vec<LinkRef>,
}

impl Renderer {
    const fn new(width: usize, theme: Theme) -> Self {
        Self {
            width,
            theme,
            lines: Vec::new(),
            headings: Vec::new(),
            links: Vec::new(),
        }
    }

    fn block<'a>(&mut self, node: &'a AstNode<'a>, depth: usize) {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Heading(heading) => {
                self.separate();
                let spans = self.inline_children(node);
                let text: String = spans.iter().map(|s| s.text.as_str()).collect();
                self.headings.push(HeadingRef {
                    level: heading.level,
                    text,
                    line: self.lines.len(),
                });
                let line_type = LineType::Heading(heading.level);
                for line in wrap_spans(&spans, self.width, "", "") {
                    self.lines.push(RenderedLine::with_spans(line_type, line));
                }
                if heading.level <= 2 {
                    let rule = if heading.level == 1 { "═" } else { "─" };
                    let len = self
                        .lines
                        .last()
                        .map_or(0, RenderedLine::width)
                        .clamp(1, self.width);
                    self.lines
                        .push(RenderedLine::new(rule.repeat(len), line_type));
                }
                self.lines.push(RenderedLine::empty());
            }

            NodeValue::Paragraph => {
                if let Some(images) = standalone_images(node) {
                    for (alt, src) in images {
                        let label = if alt.is_empty() { src } else { alt };
                        self.lines
                            .push(RenderedLine::new(format!("[image: {label}]"), LineType::Image));
                    }
                } else {
                    self.paragraph(node, LineType::Paragraph, "", "");
                }
                self.lines.push(RenderedLine::empty());
            }

            NodeValue::CodeBlock(code) => {
                let language = code
                    .info
                    .split_whitespace()
                    .next()
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string);
                self.code_block(language.as_deref(), &code.literal);
                self.lines.push(RenderedLine::empty());
            }

            NodeValue::List(list) => {
                let count = node.children().count();
                let last_number = list.start + count.saturating_sub(1);
                let number_width = last_number.to_string().len();
                let delimiter = match list.delimiter {
                    ListDelimType::Period => '.',
                    ListDelimType::Paren => ')',
                };
                for (i, item) in node.children().enumerate() {
                    let marker = match list.list_type {
                        ListType::Bullet => bullet_for_depth(depth + 1).to_string(),
                        ListType::Ordered => {
                            format!("{:>number_width$}{delimiter}", list.start + i)
                        }
                    };
                    self.list_item(item, depth + 1, &marker);
                }
                if depth == 0 {
                    self.lines.push(RenderedLine::empty());
                }
            }

            NodeValue::BlockQuote => {
                let mut inner = Self::new(self.width.saturating_sub(2).max(4), self.theme);
                for child in node.children() {
                    inner.block(child, depth);
                }
                inner.trim_trailing_empty();
                let base = self.lines.len();
                for mut line in inner.lines {
                    line.spans
                        .insert(0, InlineSpan::new(QUOTE_PREFIX, InlineStyle::default()));
                    line.content.insert_str(0, QUOTE_PREFIX);
                    line.line_type = LineType::BlockQuote;
                    self.lines.push(line);
                }
                self.shift_refs(inner.headings, inner.links, base);
                self.lines.push(RenderedLine::empty());
            }

            NodeValue::ThematicBreak => {
                self.lines
                    .push(RenderedLine::new("─".repeat(self.width), LineType::HorizontalRule));
                self.lines.push(RenderedLine::empty());
            }

            NodeValue::Table(table) => {
                self.table(node, &table.alignments);
                self.lines.push(RenderedLine::empty());
            }

            NodeValue::HtmlBlock(html) => {
                let style = InlineStyle {
                    code: true,
                    ..InlineStyle::default()
                };
                for raw in html.literal.lines() {
                    let spans = vec![InlineSpan::new(raw, style)];
                    for line in wrap_spans(&spans, self.width, "", "") {
                        self.lines.push(RenderedLine::with_spans(LineType::Paragraph, line));
                    }
                }
                self.lines.push(RenderedLine::empty());
            }

            NodeValue::FootnoteDefinition(def) => {
                let label = format!("[^{}]: ", def.name);
                let indent = " ".repeat(label.width());
                let mut first = true;
                for child in node.children() {
                    if matches!(child.data.borrow().value, NodeValue::Paragraph) {
                        let prefix = if first { label.as_str() } else { indent.as_str() };
                        self.paragraph(child, LineType::Footnote, prefix, &indent);
                        first = false;
                    } else {
                        self.block(child, depth);
                    }
                }
                self.lines.push(RenderedLine::empty());
            }

            _ => {
                for child in node.children() {
                    self.block(child, depth);
                }
            }
        }
    }

    fn list_item<'a>(&mut self, item: &'a AstNode<'a>, depth: usize, marker: &str) {
        let marker = match item.data.borrow().value {
            NodeValue::TaskItem(checked) => {
                if checked.is_some() { "☑" } else { "☐" }.to_string()
            }
            _ => marker.to_string(),
        };
        let indent = "  ".repeat(depth.saturating_sub(1));
        let first_prefix = format!("{indent}{marker} ");
        let next_prefix = " ".repeat(first_prefix.width());
        let mut first = true;

        for child in item.children() {
            let value = child.data.borrow().value.clone();
            match value {
                NodeValue::Paragraph => {
                    let prefix = if first { first_prefix.as_str() } else { next_prefix.as_str() };
                    self.paragraph(child, LineType::ListItem(depth), prefix, &next_prefix);
                }
                NodeValue::List(_) => self.block(child, depth),
                _ => {
                    if first {
                        self.lines.push(RenderedLine::new(
                            first_prefix.trim_end().to_string(),
                            LineType::ListItem(depth),
                        ));
                    }
                    self.block(child, depth);
                }
            }
            first = false;
        }
        if first {
            // empty item
            self.lines.push(RenderedLine::new(
                first_prefix.trim_end().to_string(),
                LineType::ListItem(depth),
            ));
        }
    }

    fn paragraph<'a>(
        &mut self,
        node: &'a AstNode<'a>,
        line_type: LineType,
        first_prefix: &str,
        next_prefix: &str,
    ) {
        let start = self.lines.len();
        let mut pending = Vec::new();
        let mut spans = Vec::new();
        collect_inline(node, InlineStyle::default(), &mut spans, &mut pending);
        for (text, url) in pending {
            self.links.push(LinkRef {
                text,
                url,
                line: start,
            });
        }
        for line in wrap_spans(&spans, self.width, first_prefix, next_prefix) {
            self.lines.push(RenderedLine::with_spans(line_type, line));
        }
    }

    fn inline_children<'a>(&mut self, node: &'a AstNode<'a>) -> Vec<InlineSpan> {
        let mut pending = Vec::new();
        let mut spans = Vec::new();
        collect_inline(node, InlineStyle::default(), &mut spans, &mut pending);
        let line = self.lines.len();
        self.links
            .extend(pending.into_iter().map(|(text, url)| LinkRef { text, url, line }));
        spans
    }

    fn code_block(&mut self, language: Option<&str>, literal: &str) {
        let max_inner = self.width.saturating_sub(4 + CODE_RIGHT_PADDING).max(1);
        let content_width = literal
            .lines()
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0)
            .min(max_inner);
        let frame_inner = content_width + 2 + CODE_RIGHT_PADDING;
        let label: String = format!(" {} ", language.unwrap_or("code"))
            .chars()
            .take(frame_inner)
            .collect();
        self.lines.push(RenderedLine::new(
            format!("┌{label}{}┐", "─".repeat(frame_inner.saturating_sub(label.width()))),
            LineType::CodeBlock,
        ));

        for highlighted in crate::highlight::highlight_code(language, literal, self.theme) {
            let body = truncate_spans(&highlighted, content_width);
            let used: usize = body.iter().map(|s| s.text.width()).sum();
            let mut spans = vec![InlineSpan::new("│ ", InlineStyle::default())];
            spans.extend(body);
            spans.push(InlineSpan::new(
                format!("{} │", " ".repeat(content_width - used + CODE_RIGHT_PADDING)),
                InlineStyle::default(),
            ));
            self.lines
                .push(RenderedLine::with_spans(LineType::CodeBlock, spans));
        }

        self.lines.push(RenderedLine::new(
            format!("└{}┘", "─".repeat(frame_inner)),
            LineType::CodeBlock,
        ));
    }

    fn table<'a>(&mut self, node: &'a AstNode<'a>, alignments: &[TableAlignment]) {
        let mut rows: Vec<(bool, Vec<String>)> = Vec::new();
        for row in node.children() {
            let header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
            let cells = row
                .children()
                .map(|cell| {
                    let mut spans = Vec::new();
                    let mut links = Vec::new();
                    collect_inline(cell, InlineStyle::default(), &mut spans, &mut links);
                    spans.iter().map(|s| s.text.as_str()).collect::<String>()
                })
                .collect();
            rows.push((header, cells));
        }
        let columns = rows.iter().map(|(_, c)| c.len()).max().unwrap_or(0);
        if columns == 0 {
            return;
        }

        let mut widths = vec![1usize; columns];
        for (_, cells) in &rows {
            for (i, cell) in cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.width());
            }
        }
        // shrink the widest column until the table fits
        let chrome = 3 * columns + 1;
        while widths.iter().sum::<usize>() + chrome > self.width {
            let Some(widest) = widths
                .iter()
                .enumerate()
                .max_by_key(|(_, w)| **w)
                .map(|(i, _)| i)
            else {
                break;
            };
            if widths[widest] <= 1 {
                break;
            }
            widths[widest] -= 1;
        }

        let border = |left: &str, mid: &str, right: &str| {
            let body: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}", body.join(mid))
        };

        self.lines
            .push(RenderedLine::new(border("┌", "┬", "┐"), LineType::Table));
        for (header, cells) in &rows {
            let mut spans = vec![InlineSpan::new("│", InlineStyle::default())];
            for (i, width) in widths.iter().enumerate() {
                let text = cells.get(i).map_or("", String::as_str);
                let align = alignments.get(i).copied().unwrap_or(TableAlignment::None);
                let style = InlineStyle {
                    strong: *header,
                    ..InlineStyle::default()
                };
                spans.push(InlineSpan::new(" ", InlineStyle::default()));
                spans.push(InlineSpan::new(align_cell(text, *width, align), style));
                spans.push(InlineSpan::new(" │", InlineStyle::default()));
            }
            self.lines.push(RenderedLine::with_spans(LineType::Table, spans));
            if *header {
                self.lines
                    .push(RenderedLine::new(border("├", "┼", "┤"), LineType::Table));
            }
        }
        self.lines
            .push(RenderedLine::new(border("└", "┴", "┘"), LineType::Table));
    }

    fn shift_refs(&mut self, headings: Vec<HeadingRef>, links: Vec<LinkRef>, base: usize) {
        self.headings.extend(headings.into_iter().map(|mut h| {
            h.line += base;
            h
        }));
        self.links.extend(links.into_iter().map(|mut l| {
            l.line += base;
            l
        }));
    }

    /// Leave exactly one blank line before a new block.
    fn separate(&mut self) {
        if self
            .lines
            .last()
            .is_some_and(|l| l.line_type != LineType::Empty)
        {
            self.lines.push(RenderedLine::empty());
        }
    }

    fn trim_trailing_empty(&mut self) {
        while self
            .lines
            .last()
            .is_some_and(|l| l.line_type == LineType::Empty)
        {
            self.lines.pop();
        }
    }
}

const fn bullet_for_depth(depth: usize) -> char {
    match depth % 3 {
        1 => '•',
        2 => '◦',
        _ => '▪',
    }
}

/// Images that make up a whole paragraph, as `(alt, src)` pairs.
fn standalone_images<'a>(node: &'a AstNode<'a>) -> Option<Vec<(String, String)>> {
    let mut images = Vec::new();
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Image(link) => {
                images.push((plain_text(child), link.url.clone()));
            }
            NodeValue::SoftBreak | NodeValue::LineBreak => {}
            NodeValue::Text(t) if t.trim().is_empty() => {}
            _ => return None,
        }
    }
    (!images.is_empty()).then_some(images)
}

fn plain_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut spans = Vec::new();
    let mut links = Vec::new();
    collect_inline(node, InlineStyle::default(), &mut spans, &mut links);
    spans.into_iter().map(|s| s.text).collect()
}

fn collect_inline<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    out: &mut Vec<InlineSpan>,
    links: &mut Vec<(String, String)>,
) {
    for child in node.children() {
        let value = child.data.borrow().value.clone();
        match value {
            NodeValue::Text(text) => push_span(out, &text, style),
            NodeValue::Code(code) => push_span(
                out,
                &code.literal,
                InlineStyle {
                    code: true,
                    ..style
                },
            ),
            NodeValue::Emph => collect_inline(
                child,
                InlineStyle {
                    emphasis: true,
                    ..style
                },
                out,
                links,
            ),
            NodeValue::Strong => collect_inline(
                child,
                InlineStyle {
                    strong: true,
                    ..style
                },
                out,
                links,
            ),
            NodeValue::Strikethrough => collect_inline(
                child,
                InlineStyle {
                    strikethrough: true,
                    ..style
                },
                out,
                links,
            ),
            NodeValue::Link(link) => {
                let start = out.len();
                collect_inline(child, InlineStyle { link: true, ..style }, out, links);
                let text: String = out[start..].iter().map(|s| s.text.as_str()).collect();
                links.push((text, link.url));
            }
            NodeValue::Image(link) => {
                let alt = plain_text(child);
                let label = if alt.is_empty() { link.url } else { alt };
                push_span(
                    out,
                    &format!("[image: {label}]"),
                    InlineStyle {
                        emphasis: true,
                        ..style
                    },
                );
            }
            NodeValue::SoftBreak => push_span(out, " ", style),
            NodeValue::LineBreak => push_span(out, "\n", style),
            NodeValue::HtmlInline(html) => push_span(
                out,
                &html,
                InlineStyle {
                    code: true,
                    ..style
                },
            ),
            NodeValue::FootnoteReference(reference) => push_span(
                out,
                &format!("[^{}]", reference.name),
                InlineStyle { link: true, ..style },
            ),
            NodeValue::ShortCode(short) => push_span(out, &short.emoji, style),
            // block children of list items and table cells are handled by
            // their callers; anything else is flattened
            _ => collect_inline(child, style, out, links),
        }
    }
}

fn push_span(out: &mut Vec<InlineSpan>, text: &str, style: InlineStyle) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = out.last_mut()
        && last.style == style
    {
        last.text.push_str(text);
        return;
    }
    out.push(InlineSpan::new(text, style));
}

/// Greedy word wrap over styled spans.
///
/// `\n` in a span forces a break. Words wider than the line are split by
/// character. Continuation lines start with `next_prefix`.
pub(crate) fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    first_prefix: &str,
    next_prefix: &str,
) -> Vec<Vec<InlineSpan>> {
    let mut wrapper = Wrapper::new(width, first_prefix, next_prefix);
    for span in spans {
        for token in tokenize(&span.text) {
            wrapper.push(token, span.style);
        }
    }
    wrapper.finish()
}

struct Wrapper<'p> {
    width: usize,
    next_prefix: &'p str,
    lines: Vec<Vec<InlineSpan>>,
    current: Vec<InlineSpan>,
    used: usize,
    prefix_width: usize,
}

impl<'p> Wrapper<'p> {
    fn new(width: usize, first_prefix: &str, next_prefix: &'p str) -> Self {
        let mut wrapper = Self {
            width,
            next_prefix,
            lines: Vec::new(),
            current: Vec::new(),
            used: 0,
            prefix_width: 0,
        };
        wrapper.start_line(first_prefix);
        wrapper
    }

    fn start_line(&mut self, prefix: &str) {
        self.current.clear();
        self.used = 0;
        if !prefix.is_empty() {
            push_span(&mut self.current, prefix, InlineStyle::default());
            self.used = prefix.width();
        }
        self.prefix_width = self.used;
    }

    fn break_line(&mut self) {
        let mut line = std::mem::take(&mut self.current);
        if let Some(last) = line.last_mut() {
            let trimmed = last.text.trim_end().len();
            last.text.truncate(trimmed);
            if last.text.is_empty() {
                line.pop();
            }
        }
        self.lines.push(line);
        let prefix = self.next_prefix;
        self.start_line(prefix);
    }

    fn push(&mut self, token: &str, style: InlineStyle) {
        if token == "\n" {
            self.break_line();
            return;
        }
        let is_space = token.chars().all(char::is_whitespace);
        let at_line_start = self.used == self.prefix_width;
        if is_space && at_line_start {
            return;
        }
        let token_width = token.width();
        if self.used + token_width > self.width && !at_line_start {
            self.break_line();
            if is_space {
                return;
            }
        }
        if self.used + token_width <= self.width {
            push_span(&mut self.current, token, style);
            self.used += token_width;
            return;
        }
        // hard-split a word wider than the whole line
        let mut chunk = String::new();
        for ch in token.chars() {
            let w = ch.width().unwrap_or(0);
            if self.used + w > self.width && self.used > self.prefix_width {
                push_span(&mut self.current, &chunk, style);
                chunk.clear();
                self.break_line();
            }
            chunk.push(ch);
            self.used += w;
        }
        push_span(&mut self.current, &chunk, style);
    }

    fn finish(mut self) -> Vec<Vec<InlineSpan>> {
        if self.used > self.prefix_width || self.lines.is_empty() {
            self.break_line();
        }
        self.lines
    }
}

/// Split into runs of whitespace, runs of non-whitespace, and lone `\n`.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (i, ch) in text.char_indices() {
        if ch == '\n' {
            if start < i {
                tokens.push(&text[start..i]);
            }
            tokens.push("\n");
            start = i + 1;
            in_space = None;
            continue;
        }
        let space = ch.is_whitespace();
        if in_space.is_some_and(|s| s != space) {
            tokens.push(&text[start..i]);
            start = i;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

fn truncate_spans(spans: &[InlineSpan], width: usize) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut used = 0;
    for span in spans {
        let mut text = String::new();
        for ch in span.text.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > width {
                break;
            }
            text.push(ch);
            used += w;
        }
        if !text.is_empty() {
            out.push(InlineSpan::new(text, span.style));
        }
        if used >= width {
            break;
        }
    }
    out
}

fn align_cell(text: &str, width: usize, align: TableAlignment) -> String {
    let mut fitted = String::new();
    let mut used = 0;
    let needs_ellipsis = text.width() > width;
    let limit = if needs_ellipsis { width.saturating_sub(1) } else { width };
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > limit {
            break;
        }
        fitted.push(ch);
        used += w;
    }
    if needs_ellipsis {
        fitted.push('…');
        used += 1;
    }
    let pad = width.saturating_sub(used);
    match align {
        TableAlignment::Right => format!("{}{fitted}", " ".repeat(pad)),
        TableAlignment::Center => {
            let left = pad / 2;
            format!("{}{fitted}{}", " ".repeat(left), " ".repeat(pad - left))
        }
        TableAlignment::Left | TableAlignment::None => format!("{fitted}{}", " ".repeat(pad)),
    }
}
