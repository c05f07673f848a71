//! 文档分类服务 - 业务能力层
//!
//! 按顺序匹配关键词，第一个命中的规则决定类型。
//! 规则顺序即优先级：同时出现 "questionnaire" 和 "research proposal" 的文本归为问卷。

use tracing::debug;

use crate::models::document::{Document, DocumentType};

/// 一条分类规则
struct Rule {
    /// 任一组内关键词全部出现即命中
    any_of: &'static [&'static [&'static str]],
    label: DocumentType,
}

const RULES: &[Rule] = &[
    Rule {
        any_of: &[&["informed consent"]],
        label: DocumentType::InformedConsent,
    },
    Rule {
        any_of: &[&["questionnaire"], &["survey"]],
        label: DocumentType::Questionnaire,
    },
    Rule {
        any_of: &[&["research proposal"], &["introduction"]],
        label: DocumentType::ResearchProposal,
    },
    Rule {
        any_of: &[&["application"]],
        label: DocumentType::ApplicationForm,
    },
    Rule {
        any_of: &[&["rac", "confirmation"]],
        label: DocumentType::RACConfirmationLetter,
    },
];

/// 对文本进行分类（大小写不敏感的子串匹配）
pub fn classify(text: &str) -> DocumentType {
    let lowered = text.to_lowercase();

    RULES
        .iter()
        .find(|rule| {
            rule.any_of
                .iter()
                .any(|group| group.iter().all(|kw| lowered.contains(kw)))
        })
        .map(|rule| rule.label)
        .unwrap_or(DocumentType::Unknown)
}

/// 提取文本后立即分类，得到不可变的 Document
pub fn classify_document(filename: impl Into<String>, raw_text: impl Into<String>) -> Document {
    let filename = filename.into();
    let raw_text = raw_text.into();
    let detected_type = classify(&raw_text);
    debug!("分类结果: {} -> {}", filename, detected_type);
    Document::new(filename, raw_text, detected_type)
}
