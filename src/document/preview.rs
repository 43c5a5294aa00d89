//! Preview pane layout.
//!
//! Walks the comrak AST of the document and produces styled, wrapped
//! terminal lines. Parsing uses the same options as the HTML renderer so
//! both views agree on what the markdown means.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue};
use comrak::{Arena, parse_document};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::{InlineSpan, InlineStyle, LineType, RenderedLine};
use crate::highlight::Highlighter;
use crate::render::{RenderOptions, comrak_options};

const TAB_WIDTH: usize = 4;

/// The laid-out preview of one version of the document text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewDocument {
    lines: Vec<RenderedLine>,
    width: usize,
    highlighted: bool,
}

impl PreviewDocument {
    /// Lay out `text` for a pane `width` columns wide.
    ///
    /// Code blocks are colored only when `highlighter` is given and knows the
    /// fence language.
    pub fn layout(text: &str, width: usize, highlighter: Option<&Highlighter>) -> Self {
        let _scope = crate::perf::scope("preview.layout");
        let options = comrak_options(&RenderOptions::default());
        let arena = Arena::new();
        let root = parse_document(&arena, text, &options);

        let mut layout = Layout {
            lines: Vec::new(),
            width: width.max(1),
            highlighter,
            highlighted: false,
        };
        layout.children(root, &Context::default());
        while layout
            .lines
            .last()
            .is_some_and(|l| *l.line_type() == LineType::Empty)
        {
            layout.lines.pop();
        }

        Self {
            lines: layout.lines,
            width,
            highlighted: layout.highlighted,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Lines from `offset` to `offset + count`.
    pub fn visible_lines(&self, offset: usize, count: usize) -> Vec<&RenderedLine> {
        self.lines.iter().skip(offset).take(count).collect()
    }

    pub fn line_at(&self, index: usize) -> Option<&RenderedLine> {
        self.lines.get(index)
    }

    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    /// Width the document was laid out for.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Whether any code block was colored by the highlighter.
    pub const fn is_highlighted(&self) -> bool {
        self.highlighted
    }
}

/// Prefixes and line type inherited by nested blocks.
#[derive(Debug, Clone, Default)]
struct Context {
    /// Prefix for the first line of the next block (list markers land here)
    first: String,
    /// Prefix for every other line
    rest: String,
    line_type: Option<LineType>,
    list_depth: usize,
    /// Inside a list item, where blocks are not separated by blank lines
    tight: bool,
}

impl Context {
    fn nested(&self, first: String, rest: String) -> Self {
        Self {
            first,
            rest,
            ..self.clone()
        }
    }

    /// After the first line has been emitted, later blocks use `rest`.
    fn continued(&self) -> Self {
        self.nested(self.rest.clone(), self.rest.clone())
    }
}

struct Layout<'h> {
    lines: Vec<RenderedLine>,
    width: usize,
    highlighter: Option<&'h Highlighter>,
    highlighted: bool,
}

impl Layout<'_> {
    fn children<'a>(&mut self, node: &'a AstNode<'a>, ctx: &Context) {
        let mut ctx = ctx.clone();
        for child in node.children() {
            let before = self.lines.len();
            self.block(child, &ctx);
            if self.lines.len() > before {
                ctx = ctx.continued();
            }
        }
    }

    fn block<'a>(&mut self, node: &'a AstNode<'a>, ctx: &Context) {
        match &node.data.borrow().value {
            NodeValue::Heading(heading) => {
                let mut spans = vec![plain(format!("{} ", "#".repeat(usize::from(heading.level))))];
                spans.extend(inline_spans(node, InlineStyle::default()));
                self.wrapped(spans, ctx, LineType::Heading(heading.level));
                self.separator(ctx);
            }
            NodeValue::Paragraph => {
                let spans = inline_spans(node, InlineStyle::default());
                let line_type = ctx.line_type.unwrap_or(LineType::Paragraph);
                self.wrapped(spans, ctx, line_type);
                self.separator(ctx);
            }
            NodeValue::CodeBlock(code) => {
                let lang = code
                    .info
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_string();
                self.code_block(&code.literal, &lang, ctx);
                self.separator(ctx);
            }
            NodeValue::List(list) => {
                let start = list.start;
                let delimiter = match list.delimiter {
                    ListDelimType::Paren => ')',
                    ListDelimType::Period => '.',
                };
                let count = node.children().count();
                let number_width = (start + count.saturating_sub(1)).to_string().len();
                let depth = ctx.list_depth + 1;
                let mut item_ctx = ctx.clone();
                for (index, item) in node.children().enumerate() {
                    let marker = match list.list_type {
                        ListType::Bullet => "• ".to_string(),
                        ListType::Ordered => {
                            format!("{:>number_width$}{delimiter} ", start + index)
                        }
                    };
                    let marker = match task_state(item) {
                        Some(true) => format!("{marker}☑ "),
                        Some(false) => format!("{marker}☐ "),
                        None => marker,
                    };
                    let pad = " ".repeat(marker.width());
                    let child_ctx = Context {
                        first: format!("{}{marker}", item_ctx.first),
                        rest: format!("{}{pad}", item_ctx.rest),
                        line_type: Some(LineType::ListItem(depth)),
                        list_depth: depth,
                        tight: true,
                    };
                    self.children(item, &child_ctx);
                    item_ctx = item_ctx.continued();
                }
                if ctx.list_depth == 0 {
                    self.separator(&Context::default());
                }
            }
            NodeValue::BlockQuote => {
                let quote_ctx = Context {
                    first: format!("{}│ ", ctx.first),
                    rest: format!("{}│ ", ctx.rest),
                    line_type: Some(LineType::BlockQuote),
                    ..ctx.clone()
                };
                self.children(node, &quote_ctx);
                self.trim_trailing_empty();
                self.separator(ctx);
            }
            NodeValue::ThematicBreak => {
                let avail = self.width.saturating_sub(ctx.first.width()).max(1);
                self.push_line(
                    ctx,
                    LineType::HorizontalRule,
                    vec![plain("─".repeat(avail))],
                    true,
                );
                self.separator(ctx);
            }
            NodeValue::Table(_) => {
                self.table(node, ctx);
                self.separator(ctx);
            }
            // Raw HTML is omitted, matching the sanitized HTML output.
            NodeValue::HtmlBlock(_) => {}
            _ => self.children(node, ctx),
        }
    }

    fn wrapped(&mut self, spans: Vec<InlineSpan>, ctx: &Context, line_type: LineType) {
        let avail = self.width.saturating_sub(ctx.first.width().max(ctx.rest.width()));
        for (index, line) in wrap_spans(&spans, avail.max(1)).into_iter().enumerate() {
            self.push_line(ctx, line_type, line, index == 0);
        }
    }

    fn push_line(
        &mut self,
        ctx: &Context,
        line_type: LineType,
        body: Vec<InlineSpan>,
        first: bool,
    ) {
        let prefix = if first { &ctx.first } else { &ctx.rest };
        let mut spans = Vec::with_capacity(body.len() + 1);
        if !prefix.is_empty() {
            spans.push(plain(prefix.clone()));
        }
        spans.extend(body);
        self.lines.push(RenderedLine::from_spans(line_type, spans));
    }

    /// Blank line after a block, except between blocks of one list item.
    fn separator(&mut self, ctx: &Context) {
        if ctx.tight {
            return;
        }
        if self
            .lines
            .last()
            .is_some_and(|l| *l.line_type() != LineType::Empty)
        {
            let line_type = ctx.line_type.unwrap_or(LineType::Empty);
            if line_type == LineType::BlockQuote && !ctx.rest.is_empty() {
                self.lines.push(RenderedLine::new(
                    ctx.rest.trim_end().to_string(),
                    LineType::BlockQuote,
                ));
            } else {
                self.lines
                    .push(RenderedLine::new(String::new(), LineType::Empty));
            }
        }
    }

    fn trim_trailing_empty(&mut self) {
        while let Some(last) = self.lines.last() {
            let is_blank = *last.line_type() == LineType::Empty
                || (*last.line_type() == LineType::BlockQuote
                    && last.content().trim_start_matches(['│', ' ']).is_empty());
            if !is_blank {
                break;
            }
            self.lines.pop();
        }
    }

    fn code_block(&mut self, literal: &str, lang: &str, ctx: &Context) {
        let source = literal.replace('\t', &" ".repeat(TAB_WIDTH));
        let highlighter = self
            .highlighter
            .filter(|h| !lang.is_empty() && h.supports_language(lang));
        let body: Vec<Vec<InlineSpan>> = match highlighter {
            Some(h) => {
                self.highlighted = true;
                h.highlight_spans(&source, Some(lang))
            }
            None => source
                .lines()
                .map(|line| vec![code_span(line.to_string())])
                .collect(),
        };

        let label = if lang.is_empty() {
            String::new()
        } else {
            format!(" {lang} ")
        };
        let avail = self
            .width
            .saturating_sub(ctx.first.width().max(ctx.rest.width()) + 4)
            .max(1);
        let inner = body
            .iter()
            .map(|spans| spans_width(spans))
            .max()
            .unwrap_or(0)
            .max(label.width())
            .min(avail);

        let top = if label.width() < inner + 2 {
            let fill = inner + 2 - label.width() - 1;
            format!("┌─{label}{}┐", "─".repeat(fill))
        } else {
            format!("┌{}┐", "─".repeat(inner + 2))
        };
        self.push_line(ctx, LineType::CodeBlock, vec![plain(top)], true);

        for spans in body {
            let mut line = vec![plain("│ ".to_string())];
            let clipped = truncate_spans(&spans, inner);
            let pad = inner - spans_width(&clipped);
            line.extend(clipped);
            line.push(plain(format!("{} │", " ".repeat(pad))));
            self.push_line(ctx, LineType::CodeBlock, line, false);
        }

        let bottom = format!("└{}┘", "─".repeat(inner + 2));
        self.push_line(ctx, LineType::CodeBlock, vec![plain(bottom)], false);
    }

    fn table<'a>(&mut self, node: &'a AstNode<'a>, ctx: &Context) {
        let mut rows: Vec<(bool, Vec<String>)> = Vec::new();
        for row in node.children() {
            let NodeValue::TableRow(header) = row.data.borrow().value else {
                continue;
            };
            let cells = row
                .children()
                .map(|cell| {
                    super::types::spans_to_string(&inline_spans(cell, InlineStyle::default()))
                })
                .collect();
            rows.push((header, cells));
        }

        let columns = rows.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for (_, cells) in &rows {
            for (i, cell) in cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.width());
            }
        }

        let mut first = true;
        for (header, cells) in &rows {
            let text = (0..columns)
                .map(|i| {
                    let cell = cells.get(i).map_or("", String::as_str);
                    format!("{cell}{}", " ".repeat(widths[i] - cell.width()))
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            let style = InlineStyle {
                strong: *header,
                ..InlineStyle::default()
            };
            self.push_line(
                ctx,
                LineType::Table,
                vec![InlineSpan::new(text, style)],
                first,
            );
            first = false;
            if *header {
                let rule = widths
                    .iter()
                    .map(|w| "─".repeat(*w))
                    .collect::<Vec<_>>()
                    .join("─┼─");
                self.push_line(ctx, LineType::Table, vec![plain(rule)], false);
            }
        }
    }
}

/// `Some(checked)` for task list items.
fn task_state<'a>(item: &'a AstNode<'a>) -> Option<bool> {
    match &item.data.borrow().value {
        NodeValue::TaskItem(symbol) => Some(symbol.is_some()),
        _ => None,
    }
}

fn plain(text: String) -> InlineSpan {
    InlineSpan::new(text, InlineStyle::default())
}

fn code_span(text: String) -> InlineSpan {
    InlineSpan::new(
        text,
        InlineStyle {
            code: true,
            ..InlineStyle::default()
        },
    )
}

/// Flatten the inline children of `node` into styled spans.
///
/// Line breaks appear as `\n` inside span text.
fn inline_spans<'a>(node: &'a AstNode<'a>, style: InlineStyle) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    for child in node.children() {
        collect_inline(child, style, &mut spans);
    }
    spans
}

fn collect_inline<'a>(node: &'a AstNode<'a>, style: InlineStyle, out: &mut Vec<InlineSpan>) {
    let value = node.data.borrow().value.clone();
    let nested = match value {
        NodeValue::Text(text) => {
            push_merged(out, text, style);
            return;
        }
        NodeValue::Code(code) => {
            push_merged(
                out,
                code.literal,
                InlineStyle {
                    code: true,
                    ..style
                },
            );
            return;
        }
        // Soft breaks become hard breaks, matching the renderer's `breaks` default.
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            push_merged(out, "\n".to_string(), style);
            return;
        }
        NodeValue::Image(image) => {
            let alt = super::types::spans_to_string(&inline_spans(node, style));
            let label = if alt.is_empty() { image.url } else { alt };
            push_merged(
                out,
                format!("[Image: {label}]"),
                InlineStyle {
                    link: true,
                    ..style
                },
            );
            return;
        }
        NodeValue::HtmlInline(_) => return,
        NodeValue::Emph => InlineStyle {
            emphasis: true,
            ..style
        },
        NodeValue::Strong => InlineStyle {
            strong: true,
            ..style
        },
        NodeValue::Strikethrough => InlineStyle {
            strikethrough: true,
            ..style
        },
        NodeValue::Link(_) => InlineStyle { link: true, ..style },
        _ => style,
    };
    for child in node.children() {
        collect_inline(child, nested, out);
    }
}

fn push_merged(out: &mut Vec<InlineSpan>, text: String, style: InlineStyle) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = out.last_mut()
        && last.style() == style
    {
        let merged = format!("{}{text}", last.text());
        *last = InlineSpan::new(merged, style);
        return;
    }
    out.push(InlineSpan::new(text, style));
}

fn spans_width(spans: &[InlineSpan]) -> usize {
    spans.iter().map(|s| s.text().width()).sum()
}

/// Word-wrap spans to `width` columns, honoring embedded `\n` breaks.
///
/// Words longer than the width are split across lines.
pub(crate) fn wrap_spans(spans: &[InlineSpan], width: usize) -> Vec<Vec<InlineSpan>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current: Vec<InlineSpan> = Vec::new();
    let mut current_width = 0;

    for span in spans {
        let style = span.style();
        for (segment_index, segment) in span.text().split('\n').enumerate() {
            if segment_index > 0 {
                lines.push(trim_trailing_space(std::mem::take(&mut current)));
                current_width = 0;
            }
            for token in split_tokens(segment) {
                let token_width = token.width();
                let is_space = token.chars().all(char::is_whitespace);
                if is_space {
                    if current_width == 0 {
                        continue;
                    }
                    if current_width + token_width > width {
                        lines.push(trim_trailing_space(std::mem::take(&mut current)));
                        current_width = 0;
                        continue;
                    }
                    push_merged(&mut current, token.to_string(), style);
                    current_width += token_width;
                    continue;
                }
                if current_width > 0 && current_width + token_width > width {
                    lines.push(trim_trailing_space(std::mem::take(&mut current)));
                    current_width = 0;
                }
                if token_width <= width {
                    push_merged(&mut current, token.to_string(), style);
                    current_width += token_width;
                    continue;
                }
                for ch in token.chars() {
                    let ch_width = ch.width().unwrap_or(0);
                    if current_width + ch_width > width && current_width > 0 {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0;
                    }
                    push_merged(&mut current, ch.to_string(), style);
                    current_width += ch_width;
                }
            }
        }
    }
    lines.push(trim_trailing_space(current));
    lines
}

/// Split into alternating runs of whitespace and non-whitespace.
fn split_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (idx, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|s| s != space) {
            tokens.push(&text[start..idx]);
            start = idx;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

fn trim_trailing_space(mut spans: Vec<InlineSpan>) -> Vec<InlineSpan> {
    while let Some(last) = spans.last() {
        let trimmed = last.text().trim_end();
        if trimmed.len() == last.text().len() {
            break;
        }
        if trimmed.is_empty() {
            spans.pop();
        } else {
            let style = last.style();
            let trimmed = trimmed.to_string();
            spans.pop();
            spans.push(InlineSpan::new(trimmed, style));
            break;
        }
    }
    spans
}

/// Keep at most `max_width` columns of `spans`.
fn truncate_spans(spans: &[InlineSpan], max_width: usize) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut remaining = max_width;
    for span in spans {
        if remaining == 0 {
            break;
        }
        let mut taken = String::new();
        for ch in span.text().chars() {
            let w = ch.width().unwrap_or(0);
            if w > remaining {
                remaining = 0;
                break;
            }
            remaining -= w;
            taken.push(ch);
        }
        if !taken.is_empty() {
            out.push(InlineSpan::new(taken, span.style()));
        }
    }
    out
}
