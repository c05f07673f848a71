//! 提交清单检查 - 业务能力层

use crate::models::checklist::{ChecklistEntry, ChecklistStatus, Requirement};
use crate::models::document::{Document, DocumentType};

/// 默认必交材料
pub const DEFAULT_REQUIRED: [DocumentType; 3] = [
    DocumentType::ApplicationForm,
    DocumentType::ResearchProposal,
    DocumentType::Questionnaire,
];

/// 默认选交材料
pub const DEFAULT_OPTIONAL: [DocumentType; 2] = [
    DocumentType::InformedConsent,
    DocumentType::RACConfirmationLetter,
];

/// 生成提交清单
///
/// 每个期望类型对每份匹配文档各出一行；无匹配时恰好出一行 Missing / OptionalNotProvided
pub fn check_submission(
    required: &[DocumentType],
    optional: &[DocumentType],
    documents: &[Document],
) -> Vec<ChecklistEntry> {
    let mut entries = Vec::new();

    let groups = [
        (required, Requirement::Required),
        (optional, Requirement::Optional),
    ];

    for (types, requirement) in groups {
        for &expected in types {
            let before = entries.len();
            entries.extend(
                documents
                    .iter()
                    .filter(|doc| doc.detected_type() == expected)
                    .map(|doc| ChecklistEntry::matched(expected, requirement, doc.filename())),
            );
            if entries.len() == before {
                entries.push(ChecklistEntry::unmatched(expected, requirement));
            }
        }
    }

    entries
}

/// 缺失的必交类型
pub fn missing_required(entries: &[ChecklistEntry]) -> Vec<DocumentType> {
    entries
        .iter()
        .filter(|e| e.status == ChecklistStatus::Missing)
        .map(|e| e.expected_type)
        .collect()
}
