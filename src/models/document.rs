use serde::{Deserialize, Serialize};
use std::fmt;

/// 文档类型（由关键词分类得出）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    ApplicationForm,
    ResearchProposal,
    Questionnaire,
    InformedConsent,
    #[serde(rename = "rac_confirmation_letter")]
    RACConfirmationLetter,
    Unknown,
}

impl DocumentType {
    /// 报告中显示的名称
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::ApplicationForm => "Application Form",
            DocumentType::ResearchProposal => "Research Proposal",
            DocumentType::Questionnaire => "Questionnaire",
            DocumentType::InformedConsent => "Informed Consent",
            DocumentType::RACConfirmationLetter => "RAC Confirmation Letter",
            DocumentType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// 一份已分类的文档
///
/// 每个上传文件或参考文件各创建一次，分类完成后不可修改。
/// 只能经由 `classifier::classify_document` 创建，类型总是由分类规则决定：
///
/// ```compile_fail
/// use ethics_review::models::{Document, DocumentType};
/// let _ = Document::new("a.txt", "informed consent", DocumentType::Questionnaire);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    filename: String,
    #[serde(skip_serializing)]
    raw_text: String,
    detected_type: DocumentType,
}

impl Document {
    pub(crate) fn new(filename: impl Into<String>, raw_text: impl Into<String>, detected_type: DocumentType) -> Self {
        Self {
            filename: filename.into(),
            raw_text: raw_text.into(),
            detected_type,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn detected_type(&self) -> DocumentType {
        self.detected_type
    }

    /// 截取正文前 `max_chars` 个字符（按字符计，不会截断多字节字符）
    pub fn excerpt(&self, max_chars: usize) -> &str {
        match self.raw_text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => &self.raw_text[..byte_idx],
            None => &self.raw_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_counts_chars_not_bytes() {
        let doc = Document::new("a.txt", "ééééé", DocumentType::Unknown);
        assert_eq!(doc.excerpt(3), "ééé");
        assert_eq!(doc.excerpt(10), "ééééé");
        assert_eq!(doc.excerpt(0), "");
    }

    #[test]
    fn test_document_type_deserializes_from_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            types: Vec<DocumentType>,
        }

        let parsed: Wrapper =
            toml::from_str(r#"types = ["application_form", "rac_confirmation_letter"]"#).unwrap();
        assert_eq!(
            parsed.types,
            vec![DocumentType::ApplicationForm, DocumentType::RACConfirmationLetter]
        );
    }
}
