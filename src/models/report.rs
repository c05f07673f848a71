use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::models::checklist::ChecklistEntry;
use crate::models::document::Document;
use crate::models::review::ReviewResult;

/// 报告输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[serde(alias = "txt")]
    Text,
    #[default]
    Docx,
    Pdf,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Docx => "docx",
            ReportFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(ReportFormat::Text),
            "docx" | "word" => Ok(ReportFormat::Docx),
            "pdf" => Ok(ReportFormat::Pdf),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// 最终报告
///
/// 只在内存中存在，渲染完成后由流程层一次性写盘
#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,
    pub applicant: String,
    pub generated_at: DateTime<Local>,
    pub documents: Vec<Document>,
    pub checklist: Vec<ChecklistEntry>,
    pub review: ReviewResult,
    pub footer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str_is_case_insensitive() {
        assert_eq!("PDF".parse::<ReportFormat>().unwrap(), ReportFormat::Pdf);
        assert_eq!("txt".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!(" Docx ".parse::<ReportFormat>().unwrap(), ReportFormat::Docx);
        assert!("odt".parse::<ReportFormat>().is_err());
    }
}
