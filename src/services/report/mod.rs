//! 报告渲染 - 业务能力层
//!
//! - `parser` - 从模型回答中恢复章节和表格
//! - `layout` - 报告的固定块结构
//! - `text` / `docx` / `pdf` - 各格式写出器，只产出字节，不写盘

pub mod docx;
pub mod layout;
pub mod parser;
pub mod pdf;
pub mod text;

pub use layout::{Block, NO_INFORMATION, TABLE_UNAVAILABLE};
pub use parser::{parse_review, parse_table, section_body};

use tracing::debug;

use crate::error::RenderError;
use crate::models::{Report, ReportFormat};

/// 按格式渲染报告
///
/// `pdf_font` 为 TrueType 字体数据，只用于 PDF；None 时使用内置字体
pub fn render_report(
    report: &Report,
    format: ReportFormat,
    pdf_font: Option<&[u8]>,
) -> Result<Vec<u8>, RenderError> {
    let blocks = layout::blocks(report);
    debug!("渲染报告: {} 个块, 格式 {}", blocks.len(), format);

    match format {
        ReportFormat::Text => Ok(text::render(&blocks)),
        ReportFormat::Docx => docx::render(&blocks),
        ReportFormat::Pdf => pdf::render(&report.title, &blocks, pdf_font),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{sample_report, STRUCTURED_RESPONSE};
    use super::*;

    #[test]
    fn test_render_report_dispatches_by_format() {
        let report = sample_report(STRUCTURED_RESPONSE);

        let txt = render_report(&report, ReportFormat::Text, None).unwrap();
        let docx = render_report(&report, ReportFormat::Docx, None).unwrap();
        let pdf = render_report(&report, ReportFormat::Pdf, None).unwrap();

        assert!(String::from_utf8(txt).unwrap().contains("Guideline Compliance"));
        assert!(docx.starts_with(b"PK"));
        assert!(pdf.starts_with(b"%PDF"));
    }
}
