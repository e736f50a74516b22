//! Markdown → `.docx`.
//!
//! `pulldown-cmark` does the parsing; this module walks its event stream and
//! emits `docx-rs` paragraphs. Block structure maps onto paragraph styles
//! and indentation, inline emphasis onto run properties. Anything Word has
//! no simple equivalent for (raw HTML, footnotes) is dropped; tables are
//! flattened to one tab-separated paragraph per row.

use crate::conversion::ConversionId;
use crate::error::TransformError;
use docx_rs::{BreakType, Docx, Paragraph, Run, RunFonts, Style, StyleType};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
use std::io::Cursor;
use tracing::debug;

const CONVERSION: ConversionId = ConversionId::MarkdownToDocx;
const MONOSPACE: &str = "Courier New";
/// Left indent per nesting level, in twips.
const INDENT_STEP: i32 = 720;

/// `markdown->docx`
pub fn markdown_to_docx(input: &[u8]) -> Result<Vec<u8>, TransformError> {
    let text = std::str::from_utf8(input).map_err(|e| {
        TransformError::encoding(CONVERSION, format!("input is not valid UTF-8: {e}"))
    })?;

    let paragraphs = DocxWriter::default().run(text);
    debug!("Markdown produced {} paragraphs", paragraphs.len());

    let docx = paragraphs
        .into_iter()
        .fold(with_heading_styles(Docx::new()), Docx::add_paragraph);

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| TransformError::encode(CONVERSION, format!("cannot write .docx: {e}")))?;
    Ok(buf.into_inner())
}

fn with_heading_styles(docx: Docx) -> Docx {
    // Half-point sizes for Heading1..Heading6.
    const SIZES: [usize; 6] = [40, 32, 28, 26, 24, 22];
    SIZES.iter().enumerate().fold(docx, |docx, (i, size)| {
        let level = i + 1;
        docx.add_style(
            Style::new(format!("Heading{level}"), StyleType::Paragraph)
                .name(format!("Heading {level}"))
                .size(*size)
                .bold(),
        )
    })
}

fn heading_number(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Open markdown constructs we need to remember until their end event.
#[derive(Debug)]
enum Open {
    Heading,
    Paragraph,
    BlockQuote,
    CodeBlock,
    List,
    Item,
    Emphasis,
    Strong,
    Strikethrough,
    TableRow,
    TableCell,
    Other,
}

#[derive(Debug, Default, Clone, Copy)]
struct RunStyle {
    bold: bool,
    italic: bool,
    strike: bool,
    code: bool,
}

#[derive(Default)]
struct DocxWriter {
    out: Vec<Paragraph>,
    current: Option<Paragraph>,
    stack: Vec<Open>,
    /// Next number for each open ordered list; `None` for bullet lists.
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    heading_style: Option<String>,
    cells_in_row: usize,
}

impl DocxWriter {
    fn run(mut self, text: &str) -> Vec<Paragraph> {
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        for event in Parser::new_ext(text, options) {
            self.event(event);
        }
        self.flush();
        self.out
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(t) => {
                if self.in_code_block() {
                    self.code_text(&t);
                } else {
                    self.push_text(&t, self.style());
                }
            }
            Event::Code(t) => {
                let style = RunStyle {
                    code: true,
                    ..self.style()
                };
                self.push_text(&t, style);
            }
            Event::SoftBreak => self.push_text(" ", self.style()),
            Event::HardBreak => self.add_run(Run::new().add_break(BreakType::TextWrapping)),
            Event::Rule => {
                self.flush();
                self.out.push(Paragraph::new());
            }
            Event::TaskListMarker(done) => {
                self.push_text(if done { "[x] " } else { "[ ] " }, RunStyle::default())
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let open = match tag {
            Tag::Paragraph => {
                // Paragraphs inside a list item continue the item's line.
                if !self.in_item_without_text() {
                    self.flush();
                }
                Open::Paragraph
            }
            Tag::Heading { level, .. } => {
                self.flush();
                self.heading_style = Some(format!("Heading{}", heading_number(level)));
                Open::Heading
            }
            Tag::BlockQuote(..) => {
                self.flush();
                self.quote_depth += 1;
                Open::BlockQuote
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                if let CodeBlockKind::Fenced(lang) = kind {
                    debug!("Code block language: {:?}", lang);
                }
                Open::CodeBlock
            }
            Tag::List(first) => {
                self.flush();
                self.lists.push(first);
                Open::List
            }
            Tag::Item => {
                self.flush();
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "\u{2022} ".to_string(),
                };
                self.push_text(&marker, RunStyle::default());
                Open::Item
            }
            Tag::Emphasis => Open::Emphasis,
            Tag::Strong => Open::Strong,
            Tag::Strikethrough => Open::Strikethrough,
            Tag::TableHead | Tag::TableRow => {
                self.flush();
                self.cells_in_row = 0;
                Open::TableRow
            }
            Tag::TableCell => {
                if self.cells_in_row > 0 {
                    self.add_run(Run::new().add_tab());
                }
                self.cells_in_row += 1;
                Open::TableCell
            }
            _ => Open::Other,
        };
        self.stack.push(open);
    }

    fn end(&mut self) {
        match self.stack.pop() {
            Some(Open::Heading) => {
                self.flush();
                self.heading_style = None;
            }
            Some(Open::BlockQuote) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            Some(Open::List) => {
                self.flush();
                self.lists.pop();
            }
            Some(Open::Paragraph | Open::Item | Open::TableRow | Open::CodeBlock) => self.flush(),
            _ => {}
        }
    }

    fn style(&self) -> RunStyle {
        self.stack.iter().fold(RunStyle::default(), |mut s, open| {
            match open {
                Open::Strong => s.bold = true,
                Open::Emphasis => s.italic = true,
                Open::Strikethrough => s.strike = true,
                _ => {}
            }
            s
        })
    }

    fn in_code_block(&self) -> bool {
        matches!(self.stack.last(), Some(Open::CodeBlock))
    }

    /// Directly inside a list item whose marker line has not been flushed yet.
    fn in_item_without_text(&self) -> bool {
        matches!(self.stack.last(), Some(Open::Item)) && self.current.is_some()
    }

    fn code_text(&mut self, text: &str) {
        let style = RunStyle {
            code: true,
            ..RunStyle::default()
        };
        let mut lines = text.split('\n').peekable();
        while let Some(line) = lines.next() {
            // The block's trailing newline does not start another line.
            if line.is_empty() && lines.peek().is_none() {
                break;
            }
            self.push_text(line, style);
            if lines.peek().is_some() {
                self.flush_keep_empty();
            }
        }
    }

    /// The paragraph being filled, or a fresh one styled for the current
    /// block context.
    fn take_paragraph(&mut self) -> Paragraph {
        if let Some(p) = self.current.take() {
            return p;
        }
        let mut p = Paragraph::new();
        if let Some(style) = &self.heading_style {
            p = p.style(style);
        }
        let indent = self.indent();
        if indent > 0 {
            p = p.indent(Some(indent), None, None, None);
        }
        p
    }

    fn add_run(&mut self, run: Run) {
        let p = self.take_paragraph();
        self.current = Some(p.add_run(run));
    }

    fn indent(&self) -> i32 {
        let lists = self.lists.len().saturating_sub(1);
        let levels = self.quote_depth + lists;
        i32::try_from(levels).unwrap_or(i32::MAX / INDENT_STEP) * INDENT_STEP
    }

    fn push_text(&mut self, text: &str, style: RunStyle) {
        let mut run = Run::new().add_text(text);
        if style.bold {
            run = run.bold();
        }
        if style.italic {
            run = run.italic();
        }
        if style.strike {
            run = run.strike();
        }
        if style.code {
            run = run.fonts(RunFonts::new().ascii(MONOSPACE).hi_ansi(MONOSPACE));
        }
        self.add_run(run);
    }

    fn flush(&mut self) {
        if let Some(p) = self.current.take() {
            self.out.push(p);
        }
    }

    /// Like [`flush`](Self::flush) but keeps blank code lines as paragraphs.
    fn flush_keep_empty(&mut self) {
        let p = self.take_paragraph();
        self.out.push(p);
    }
}
