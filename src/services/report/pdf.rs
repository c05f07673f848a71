//! PDF 报告
//!
//! A4 纵向，按字符数折行，写满自动换页。
//! 配置了 TrueType 字体时嵌入该字体；否则使用内置 Helvetica / Courier，
//! WinAnsi 编码之外的字符写成 `[U+XXXX]`

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use std::borrow::Cow;
use std::io::BufWriter;

use super::layout::Block;
use crate::error::RenderError;
use crate::models::review::Table;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 20.0;
const TOP: f32 = 280.0;
const BOTTOM: f32 = 20.0;

/// 写入位置和当前页
struct PdfCursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    mono: IndirectFontRef,
    /// 嵌入字体可直接写 Unicode；内置字体只能写 WinAnsi
    unicode: bool,
}

#[derive(Clone, Copy)]
enum Face {
    Regular,
    Bold,
    Italic,
    Mono,
}

fn font_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Pdf(format!("字体加载失败: {e}"))
}

impl PdfCursor {
    fn new(title: &str, font: Option<&[u8]>) -> Result<Self, RenderError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);

        let (regular, bold, italic, mono, unicode) = match font {
            Some(data) => {
                // 单一字体文件，所有字形共用
                let external = doc.add_external_font(data).map_err(font_err)?;
                (external.clone(), external.clone(), external.clone(), external, true)
            }
            None => (
                doc.add_builtin_font(BuiltinFont::Helvetica).map_err(font_err)?,
                doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(font_err)?,
                doc.add_builtin_font(BuiltinFont::HelveticaOblique).map_err(font_err)?,
                doc.add_builtin_font(BuiltinFont::Courier).map_err(font_err)?,
                false,
            ),
        };

        Ok(Self {
            doc,
            layer,
            y: TOP,
            regular,
            bold,
            italic,
            mono,
            unicode,
        })
    }

    fn encode<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.unicode {
            Cow::Borrowed(text)
        } else {
            to_winansi(text)
        }
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = TOP;
    }

    /// 写一行，空间不足时先换页
    fn line(&mut self, text: &str, size: f32, face: Face, indent: f32, advance: f32) {
        if self.y - advance < BOTTOM {
            self.new_page();
        }
        let font = match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
            Face::Italic => &self.italic,
            Face::Mono => &self.mono,
        };
        let text = self.encode(text);
        self.layer
            .use_text(text.as_ref(), size, Mm(MARGIN_LEFT + indent), Mm(self.y), font);
        self.y -= advance;
    }

    fn wrapped(&mut self, text: &str, size: f32, face: Face, indent: f32, max_chars: usize, advance: f32) {
        // 先替换再折行，按实际写出的字符计宽
        let text = self.encode(text).into_owned();
        for raw_line in text.lines() {
            for line in wrap_text(raw_line, max_chars) {
                self.line(&line, size, face, indent, advance);
            }
        }
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn table(&mut self, table: &Table) {
        let header = table.headers.join(" | ");
        self.wrapped(&header, 8.5, Face::Bold, 2.0, 95, 4.5);
        self.line(&"-".repeat(header.chars().count().min(95)), 8.0, Face::Mono, 2.0, 4.0);
        for row in &table.rows {
            self.wrapped(&row.join(" | "), 8.0, Face::Mono, 2.0, 95, 4.0);
        }
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| RenderError::Pdf(format!("保存失败: {e}")))?;
        buf.into_inner()
            .map_err(|e| RenderError::Pdf(format!("缓冲区错误: {e}")))
    }
}

/// 写出 PDF 报告
///
/// `font` 为 TrueType 字体数据，None 时使用内置字体
pub fn render(title: &str, blocks: &[Block], font: Option<&[u8]>) -> Result<Vec<u8>, RenderError> {
    let mut cursor = PdfCursor::new(title, font)?;

    for block in blocks {
        match block {
            Block::Title(text) => {
                cursor.wrapped(text, 16.0, Face::Bold, 0.0, 60, 8.0);
                cursor.gap(2.0);
            }
            Block::Heading(text) => {
                cursor.gap(4.0);
                cursor.wrapped(text, 12.0, Face::Bold, 0.0, 75, 6.5);
            }
            Block::Paragraph(text) => {
                cursor.wrapped(text, 10.0, Face::Regular, 0.0, 90, 4.8);
                cursor.gap(1.5);
            }
            Block::Table(table) => {
                cursor.table(table);
                cursor.gap(2.0);
            }
            Block::Footer(text) => {
                cursor.gap(6.0);
                cursor.wrapped(text, 8.0, Face::Italic, 0.0, 110, 3.8);
            }
        }
    }

    cursor.finish()
}

/// WinAnsiEncoding 中 0x80..=0x9F 段的字符
const WINANSI_EXTRA: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

fn is_winansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}') || WINANSI_EXTRA.contains(c)
}

/// 把内置字体无法编码的字符替换成可见的 `[U+XXXX]`
fn to_winansi(text: &str) -> Cow<'_, str> {
    if text.chars().all(|c| is_winansi(c) || c == '\n') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| {
                if is_winansi(c) || c == '\n' {
                    c.to_string()
                } else {
                    format!("[U+{:04X}]", c as u32)
                }
            })
            .collect(),
    )
}

/// 按字符数折行（按单词边界）
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();
        if current_len + word_len + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
