//! `.docx` → PDF.
//!
//! Only the plain text of each top-level body paragraph survives: runs are
//! concatenated, formatting, images and tables are dropped. Every paragraph
//! becomes one line of Helvetica on a single US-Letter page, starting at
//! [`ORIGIN_X`]/[`ORIGIN_Y`] and moving down by [`LEADING`] per line.
//!
//! There is no wrapping and no pagination. Lines that run past the bottom
//! margin are still emitted (at negative y) and simply fall off the page.
//! Long documents produce a valid but truncated-looking PDF, which is the
//! accepted behaviour of this endpoint.

use crate::conversion::ConversionId;
use crate::error::TransformError;
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use tracing::debug;

const CONVERSION: ConversionId = ConversionId::DocxToPdf;

/// US-Letter in points.
pub const PAGE_WIDTH: i64 = 612;
pub const PAGE_HEIGHT: i64 = 792;
pub const ORIGIN_X: i64 = 100;
pub const ORIGIN_Y: i64 = 750;
pub const LEADING: i64 = 15;
pub const FONT_SIZE: i64 = 12;

/// `docx->pdf`
pub fn docx_to_pdf(input: &[u8]) -> Result<Vec<u8>, TransformError> {
    let lines = paragraph_texts(input)?;
    debug!("Extracted {} paragraphs", lines.len());
    render_lines(&lines)
}

/// Plain text of every top-level paragraph, in document order.
pub fn paragraph_texts(input: &[u8]) -> Result<Vec<String>, TransformError> {
    let docx = docx_rs::read_docx(input)
        .map_err(|e| TransformError::decode(CONVERSION, format!("not a valid .docx file: {e}")))?;

    Ok(docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect())
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    collect_text(&paragraph.children, &mut text);
    text
}

fn collect_text(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) | RunChild::Break(_) => out.push(' '),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => collect_text(&link.children, out),
            _ => {}
        }
    }
}

/// Lay the lines out on one page and serialise the PDF.
pub fn render_lines(lines: &[String]) -> Result<Vec<u8>, TransformError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = Vec::with_capacity(lines.len() * 5);
    for (i, line) in lines.iter().enumerate() {
        let y = ORIGIN_Y - LEADING * i as i64;
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]));
        operations.push(Operation::new("Td", vec![ORIGIN_X.into(), y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(line), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    let content = Content { operations }
        .encode()
        .map_err(|e| TransformError::encode(CONVERSION, format!("cannot encode page content: {e}")))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| TransformError::encode(CONVERSION, format!("cannot write PDF: {e}")))?;
    Ok(buf)
}

/// Standard 14 fonts only cover WinAnsi; Latin-1 maps straight through.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformErrorKind;
    use docx_rs::{Docx, Run};
    use std::io::Cursor;

    fn docx_with(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for p in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*p)));
        }
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    fn text_positions(pdf: &[u8]) -> Vec<(i64, String)> {
        let doc = Document::load_mem(pdf).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);
        let page_id = *pages.values().next().unwrap();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

        let mut y = 0;
        let mut out = Vec::new();
        for op in content.operations {
            match (op.operator.as_str(), op.operands.as_slice()) {
                ("Td", [_, Object::Integer(v)]) => y = *v,
                ("Tj", [Object::String(bytes, _)]) => {
                    out.push((y, String::from_utf8_lossy(bytes).into_owned()))
                }
                _ => {}
            }
        }
        out
    }

    #[test]
    fn extracts_paragraph_text_with_runs_joined() {
        let mut buf = Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Hello, "))
                    .add_run(Run::new().add_text("world").bold()),
            )
            .build()
            .pack(&mut buf)
            .unwrap();
        let texts = paragraph_texts(&buf.into_inner()).unwrap();
        assert_eq!(texts, vec!["Hello, world".to_string()]);
    }

    #[test]
    fn three_paragraphs_three_descending_lines() {
        let pdf = docx_to_pdf(&docx_with(&["First", "Second", "Third"])).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        let lines = text_positions(&pdf);
        assert_eq!(
            lines,
            vec![
                (ORIGIN_Y, "First".to_string()),
                (ORIGIN_Y - LEADING, "Second".to_string()),
                (ORIGIN_Y - 2 * LEADING, "Third".to_string()),
            ]
        );
    }

    #[test]
    fn many_paragraphs_stay_on_one_page() {
        let paragraphs: Vec<String> = (0..200).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = paragraphs.iter().map(String::as_str).collect();
        let pdf = docx_to_pdf(&docx_with(&refs)).unwrap();
        let lines = text_positions(&pdf);
        assert_eq!(lines.len(), 200);
        assert!(lines.last().unwrap().0 < 0);
    }

    #[test]
    fn non_latin_text_is_replaced() {
        assert_eq!(win_ansi("café ✓"), b"caf\xe9 ?".to_vec());
    }

    #[test]
    fn non_docx_is_a_decode_error() {
        let err = docx_to_pdf(b"plain text, not a zip").unwrap_err();
        assert_eq!(err.kind, TransformErrorKind::Decode);
        assert_eq!(err.conversion, ConversionId::DocxToPdf);
    }
}
