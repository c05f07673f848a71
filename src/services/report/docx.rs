//! Word 报告（.docx）
//!
//! 只写出最小的 OOXML 包：`[Content_Types].xml`、`_rels/.rels`、`word/document.xml`。
//! 样式直接写在 run 上，不依赖 styles.xml。

use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::layout::Block;
use crate::error::RenderError;
use crate::models::review::Table;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

const DOCUMENT_CLOSE: &str = r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr></w:body></w:document>"#;

/// run 的字体样式
#[derive(Clone, Copy)]
struct RunStyle {
    bold: bool,
    italic: bool,
    /// 字号，单位为半磅
    half_points: u32,
}

const BODY: RunStyle = RunStyle { bold: false, italic: false, half_points: 22 };
const TITLE: RunStyle = RunStyle { bold: true, italic: false, half_points: 36 };
const HEADING: RunStyle = RunStyle { bold: true, italic: false, half_points: 28 };
const FOOTER: RunStyle = RunStyle { bold: false, italic: true, half_points: 18 };
const TABLE_HEADER: RunStyle = RunStyle { bold: true, italic: false, half_points: 20 };
const TABLE_CELL: RunStyle = RunStyle { bold: false, italic: false, half_points: 20 };

fn run(text: &str, style: RunStyle) -> String {
    let mut props = String::new();
    if style.bold {
        props.push_str("<w:b/>");
    }
    if style.italic {
        props.push_str("<w:i/>");
    }
    props.push_str(&format!(r#"<w:sz w:val="{}"/>"#, style.half_points));
    format!(
        r#"<w:r><w:rPr>{}</w:rPr><w:t xml:space="preserve">{}</w:t></w:r>"#,
        props,
        escape(text)
    )
}

fn paragraph(text: &str, style: RunStyle) -> String {
    format!("<w:p>{}</w:p>", run(text, style))
}

/// 多行文本拆成多个段落
fn paragraphs(text: &str, style: RunStyle) -> String {
    text.lines().map(|line| paragraph(line, style)).collect()
}

fn table(table: &Table) -> String {
    let mut xml = String::from(
        r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders></w:tblPr>"#,
    );

    xml.push_str("<w:tblGrid>");
    for _ in &table.headers {
        xml.push_str("<w:gridCol/>");
    }
    xml.push_str("</w:tblGrid>");

    xml.push_str(&table_row(&table.headers, TABLE_HEADER));
    for row in &table.rows {
        xml.push_str(&table_row(row, TABLE_CELL));
    }

    xml.push_str("</w:tbl>");
    // 表格后必须跟一个段落，避免相邻表格被合并
    xml.push_str("<w:p/>");
    xml
}

fn table_row(cells: &[String], style: RunStyle) -> String {
    let cells: String = cells
        .iter()
        .map(|c| format!("<w:tc>{}</w:tc>", paragraph(c, style)))
        .collect();
    format!("<w:tr>{}</w:tr>", cells)
}

/// 生成 word/document.xml
pub fn document_xml(blocks: &[Block]) -> String {
    let mut body = String::from(DOCUMENT_OPEN);

    for block in blocks {
        let xml = match block {
            Block::Title(text) => paragraph(text, TITLE),
            Block::Heading(text) => paragraph(text, HEADING),
            Block::Paragraph(text) => paragraphs(text, BODY),
            Block::Table(t) => table(t),
            Block::Footer(text) => paragraph(text, FOOTER),
        };
        body.push_str(&xml);
    }

    body.push_str(DOCUMENT_CLOSE);
    body
}

/// 写出 .docx 报告
pub fn render(blocks: &[Block]) -> Result<Vec<u8>, RenderError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", ROOT_RELS.to_string()),
        ("word/document.xml", document_xml(blocks)),
    ];

    for (name, content) in parts {
        writer.start_file(name, options)?;
        writer
            .write_all(content.as_bytes())
            .map_err(|e| RenderError::Docx(e.to_string()))?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::report::layout::blocks;
    use crate::services::report::test_support::{sample_report, STRUCTURED_RESPONSE};
    use std::io::Read;

    #[test]
    fn test_special_characters_are_escaped() {
        let xml = document_xml(&[Block::Paragraph("Risk <high> & \"urgent\"".to_string())]);
        assert!(xml.contains("Risk &lt;high&gt; &amp; &quot;urgent&quot;"));
    }

    #[test]
    fn test_docx_package_contains_report_text() {
        let bytes = render(&blocks(&sample_report(STRUCTURED_RESPONSE))).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert!(archive.by_name("[Content_Types].xml").is_ok());
        assert!(archive.by_name("_rels/.rels").is_ok());

        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();

        assert!(xml.contains("Ethics Committee Review Report"));
        assert!(xml.contains("<w:tbl>"));
        assert!(xml.contains("Voluntary participation"));
        assert!(xml.contains("Footer text"));
    }
}
