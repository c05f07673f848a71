use serde::Serialize;
use std::fmt;

use crate::models::document::DocumentType;

/// 清单项是必交还是选交
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Required,
    Optional,
}

/// 清单项状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChecklistStatus {
    #[serde(rename = "ok")]
    OK,
    #[serde(rename = "missing")]
    Missing,
    #[serde(rename = "optional_not_provided")]
    OptionalNotProvided,
}

impl ChecklistStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ChecklistStatus::OK => "OK",
            ChecklistStatus::Missing => "Missing",
            ChecklistStatus::OptionalNotProvided => "Optional - Not Provided",
        }
    }
}

impl fmt::Display for ChecklistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// 提交清单中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistEntry {
    pub expected_type: DocumentType,
    pub requirement: Requirement,
    pub matched_filename: Option<String>,
    pub status: ChecklistStatus,
}

impl ChecklistEntry {
    pub fn matched(expected_type: DocumentType, requirement: Requirement, filename: &str) -> Self {
        Self {
            expected_type,
            requirement,
            matched_filename: Some(filename.to_string()),
            status: ChecklistStatus::OK,
        }
    }

    pub fn unmatched(expected_type: DocumentType, requirement: Requirement) -> Self {
        let status = match requirement {
            Requirement::Required => ChecklistStatus::Missing,
            Requirement::Optional => ChecklistStatus::OptionalNotProvided,
        };
        Self {
            expected_type,
            requirement,
            matched_filename: None,
            status,
        }
    }
}
