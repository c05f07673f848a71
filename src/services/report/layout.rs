//! 报告的固定结构
//!
//! 标题区 → 文档分类汇总 → 提交清单 → 各审查章节 → 页脚。
//! 结构只在这里定义一次，各格式的写出器只负责把块写进自己的文档模型。

use crate::models::review::{ReportSection, SectionContent, SectionKind, Table};
use crate::models::Report;

/// 章节缺失时的占位文字
pub const NO_INFORMATION: &str = "No information provided.";
/// 表格无法解析时的占位文字
pub const TABLE_UNAVAILABLE: &str = "Compliance table could not be recovered from the response.";

/// 报告中的一个块
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Heading(String),
    Paragraph(String),
    Table(Table),
    Footer(String),
}

/// 展开报告为块序列
pub fn blocks(report: &Report) -> Vec<Block> {
    let mut out = vec![
        Block::Title(report.title.clone()),
        Block::Paragraph(format!("Applicant: {}", report.applicant)),
        Block::Paragraph(format!(
            "Generated: {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S")
        )),
    ];

    out.push(Block::Heading("Document Classification Summary".to_string()));
    if report.documents.is_empty() {
        out.push(Block::Paragraph("No documents were uploaded.".to_string()));
    } else {
        let rows = report
            .documents
            .iter()
            .map(|d| vec![d.filename().to_string(), d.detected_type().to_string()])
            .collect();
        out.push(Block::Table(Table::new(
            vec!["File".to_string(), "Detected Type".to_string()],
            rows,
        )));
    }

    out.push(Block::Heading("Submission Checklist".to_string()));
    let rows = report
        .checklist
        .iter()
        .map(|e| {
            vec![
                e.expected_type.to_string(),
                format!("{:?}", e.requirement),
                e.status.to_string(),
                e.matched_filename.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    out.push(Block::Table(Table::new(
        vec![
            "Document".to_string(),
            "Requirement".to_string(),
            "Status".to_string(),
            "File".to_string(),
        ],
        rows,
    )));

    for section in ReportSection::ALL {
        out.push(Block::Heading(format!(
            "{}. {}",
            section.number(),
            section.heading()
        )));
        out.push(match report.review.section(section) {
            Some(SectionContent::Text(text)) => Block::Paragraph(text.clone()),
            Some(SectionContent::Table(table)) => Block::Table(table.clone()),
            None => Block::Paragraph(placeholder(section).to_string()),
        });
    }

    out.push(Block::Footer(report.footer.clone()));
    out
}

/// 缺失章节的占位文字
pub fn placeholder(section: ReportSection) -> &'static str {
    match section.kind() {
        SectionKind::Prose => NO_INFORMATION,
        SectionKind::Tabular => TABLE_UNAVAILABLE,
    }
}
