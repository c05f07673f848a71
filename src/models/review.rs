//! 审查结果模型
//!
//! 语言模型返回的是自由文本，这里描述从中恢复出的结构。
//! 每个章节都可能缺失，缺失由 `Option` 显式表达，渲染时替换为占位文字。

use serde::Serialize;
use std::collections::BTreeMap;

/// 报告中识别的章节，顺序即渲染顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    DocumentReviewSummary,
    GuidelineCompliance,
    EthicalConcerns,
    Recommendations,
    OverallAssessment,
}

/// 章节内容的形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Prose,
    Tabular,
}

impl ReportSection {
    pub const ALL: [ReportSection; 5] = [
        ReportSection::DocumentReviewSummary,
        ReportSection::GuidelineCompliance,
        ReportSection::EthicalConcerns,
        ReportSection::Recommendations,
        ReportSection::OverallAssessment,
    ];

    /// 章节标题（同时用于提示词和标题匹配）
    pub fn heading(&self) -> &'static str {
        match self {
            ReportSection::DocumentReviewSummary => "Document Review Summary",
            ReportSection::GuidelineCompliance => "Guideline Compliance",
            ReportSection::EthicalConcerns => "Ethical Concerns",
            ReportSection::Recommendations => "Recommendations",
            ReportSection::OverallAssessment => "Overall Assessment",
        }
    }

    /// 章节编号，从 1 开始
    pub fn number(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).map_or(0, |i| i + 1)
    }

    pub fn kind(&self) -> SectionKind {
        match self {
            ReportSection::GuidelineCompliance => SectionKind::Tabular,
            _ => SectionKind::Prose,
        }
    }
}

/// 管道符表格
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// 渲染回管道符表格文本
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&pipe_row(&self.headers));
        out.push('\n');
        let separator: Vec<String> = self.headers.iter().map(|_| "---".to_string()).collect();
        out.push_str(&pipe_row(&separator));
        for row in &self.rows {
            out.push('\n');
            out.push_str(&pipe_row(row));
        }
        out
    }
}

fn pipe_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

/// 恢复出的章节内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SectionContent {
    Text(String),
    Table(Table),
}

/// 一次外部服务调用的结果
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResult {
    pub raw_response: String,
    pub parsed_sections: BTreeMap<ReportSection, SectionContent>,
}

impl ReviewResult {
    pub fn section(&self, section: ReportSection) -> Option<&SectionContent> {
        self.parsed_sections.get(&section)
    }

    /// 成功恢复的章节数
    pub fn recovered_count(&self) -> usize {
        self.parsed_sections.len()
    }
}
