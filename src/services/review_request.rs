//! 审查请求构建 - 业务能力层
//!
//! 把用户文档和参考文档的摘录嵌入固定模板，交给审查模型，只做一次调用

use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::clients::{GenerationSettings, ReviewModel};
use crate::error::{AppError, AppResult, ReviewError};
use crate::models::document::Document;
use crate::models::review::{ReportSection, SectionKind};

const USER_DOCUMENTS_SLOT: &str = "{{user_documents}}";
const REFERENCE_DOCUMENTS_SLOT: &str = "{{reference_documents}}";
const APPLICANT_SLOT: &str = "{{applicant}}";

static SLOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("slot pattern is valid"));

/// 固定的系统消息
pub const SYSTEM_MESSAGE: &str = "You are an assistant to a research ethics committee. \
You review submitted study documents against the committee's reference guidelines \
and answer only with the requested report sections.";

/// 提示词模板
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// 内置模板，按识别的章节标题要求模型作答
    pub fn builtin() -> Self {
        let mut sections = String::new();
        for section in ReportSection::ALL {
            let hint = match section.kind() {
                SectionKind::Tabular => {
                    " (a markdown table with columns: Guideline | Status | Comments)"
                }
                SectionKind::Prose => "",
            };
            sections.push_str(&format!(
                "## {}. {}{}\n",
                section.number(),
                section.heading(),
                hint
            ));
        }

        Self::new(format!(
            "Review the ethics submission of applicant {APPLICANT_SLOT}.\n\n\
             Submitted documents:\n{USER_DOCUMENTS_SLOT}\n\n\
             Reference guidelines:\n{REFERENCE_DOCUMENTS_SLOT}\n\n\
             Assess the submission for completeness and compliance with the reference \
             guidelines. Answer using exactly these headings, in this order:\n{sections}"
        ))
    }

    /// 从文件加载模板，未配置路径时使用内置模板
    pub async fn load(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(p) => {
                let text = tokio::fs::read_to_string(p)
                    .await
                    .map_err(|e| AppError::file_read_failed(p.display().to_string(), e))?;
                debug!("已加载提示词模板: {}", p.display());
                Ok(Self::new(text))
            }
            None => Ok(Self::builtin()),
        }
    }

    /// 填充模板
    ///
    /// 一次扫描完成替换，填入的内容不会被再次展开；未知占位符原样保留
    pub fn render(&self, applicant: &str, user_documents: &str, reference_documents: &str) -> String {
        SLOT.replace_all(&self.text, |caps: &Captures| match &caps[1] {
            "applicant" => applicant.to_string(),
            "user_documents" => user_documents.to_string(),
            "reference_documents" => reference_documents.to_string(),
            _ => caps[0].to_string(),
        })
        .into_owned()
    }
}

/// 拼接文档块：每份文档一个标题（类型 + 文件名）加上前 `max_chars` 个字符
pub fn format_documents(documents: &[Document], max_chars: usize) -> String {
    if documents.is_empty() {
        return "(none)".to_string();
    }

    documents
        .iter()
        .map(|doc| {
            format!(
                "--- {} ({}) ---\n{}\n",
                doc.detected_type(),
                doc.filename(),
                doc.excerpt(max_chars).trim_end()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 审查请求构建器
pub struct ReviewRequestBuilder {
    template: PromptTemplate,
    excerpt_chars: usize,
    settings: GenerationSettings,
}

impl ReviewRequestBuilder {
    pub fn new(template: PromptTemplate, excerpt_chars: usize, settings: GenerationSettings) -> Self {
        Self {
            template,
            excerpt_chars,
            settings,
        }
    }

    /// 构建完整提示词
    pub fn build_prompt(&self, applicant: &str, documents: &[Document], references: &[Document]) -> String {
        let user_block = format_documents(documents, self.excerpt_chars);
        let reference_block = format_documents(references, self.excerpt_chars);
        self.template.render(applicant, &user_block, &reference_block)
    }

    /// 构建并提交请求，失败直接返回错误，不重试
    pub async fn submit(
        &self,
        model: &dyn ReviewModel,
        applicant: &str,
        documents: &[Document],
        references: &[Document],
    ) -> Result<String, ReviewError> {
        let prompt = self.build_prompt(applicant, documents, references);
        info!(
            "🤖 正在请求审查模型 {} (提示词 {} 字符)",
            model.model_name(),
            prompt.chars().count()
        );

        let response = model
            .complete(&prompt, Some(SYSTEM_MESSAGE), self.settings)
            .await?;

        info!("✓ 收到审查结果 ({} 字符)", response.chars().count());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentType;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingModel {
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl ReviewModel for RecordingModel {
        fn model_name(&self) -> &str {
            "recording"
        }

        async fn complete(
            &self,
            user_message: &str,
            _system_message: Option<&str>,
            _settings: GenerationSettings,
        ) -> Result<String, ReviewError> {
            self.prompts.lock().unwrap().push(user_message.to_string());
            if self.fail {
                Err(ReviewError::ApiCallFailed {
                    model: "recording".to_string(),
                    message: "network unreachable".to_string(),
                })
            } else {
                Ok("ok".to_string())
            }
        }
    }

    fn settings() -> GenerationSettings {
        GenerationSettings {
            temperature: 0.3,
            max_tokens: 100,
        }
    }

    #[test]
    fn test_format_documents_truncates_each_document() {
        let long = "x".repeat(2000);
        let docs = vec![Document::new("p.pdf", long, DocumentType::ResearchProposal)];

        let block = format_documents(&docs, 1500);

        assert!(block.starts_with("--- Research Proposal (p.pdf) ---\n"));
        assert_eq!(block.matches('x').count(), 1500);
    }

    #[test]
    fn test_format_documents_empty() {
        assert_eq!(format_documents(&[], 1500), "(none)");
    }

    #[test]
    fn test_builtin_template_lists_every_heading() {
        let prompt = PromptTemplate::builtin().render("Dr. Lee", "DOCS", "REFS");
        for section in ReportSection::ALL {
            assert!(prompt.contains(section.heading()));
        }
        assert!(prompt.contains("Dr. Lee"));
        assert!(prompt.contains("DOCS"));
        assert!(prompt.contains("REFS"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_build_prompt_embeds_documents_and_references() {
        let builder = ReviewRequestBuilder::new(
            PromptTemplate::new("U:{{user_documents}}|R:{{reference_documents}}"),
            5,
            settings(),
        );
        let docs = vec![Document::new("form.txt", "Application text", DocumentType::ApplicationForm)];
        let refs = vec![Document::new("guide.pdf", "Guideline", DocumentType::Unknown)];

        let prompt = builder.build_prompt("A", &docs, &refs);

        assert_eq!(
            prompt,
            "U:--- Application Form (form.txt) ---\nAppli\n|R:--- Unknown (guide.pdf) ---\nGuide\n"
        );
    }

    #[test]
    fn test_filled_values_are_not_expanded_again() {
        let template = PromptTemplate::new("A:{{applicant}}|U:{{user_documents}}|R:{{reference_documents}}|{{other}}");

        let prompt = template.render("{{user_documents}}", "see {{reference_documents}}", "REFS");

        assert_eq!(
            prompt,
            "A:{{user_documents}}|U:see {{reference_documents}}|R:REFS|{{other}}"
        );
    }

    #[test]
    fn test_submit_propagates_service_failure() {
        let model = RecordingModel {
            prompts: Mutex::new(Vec::new()),
            fail: true,
        };
        let builder = ReviewRequestBuilder::new(PromptTemplate::builtin(), 1500, settings());

        let result = tokio_test::block_on(builder.submit(&model, "A", &[], &[]));

        assert!(matches!(result, Err(ReviewError::ApiCallFailed { .. })));
        assert_eq!(model.prompts.lock().unwrap().len(), 1, "no retry");
    }

    #[tokio::test]
    async fn test_load_template_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.txt");
        std::fs::write(&path, "Custom {{user_documents}}").unwrap();

        let template = PromptTemplate::load(Some(&path)).await.unwrap();

        assert_eq!(template.render("", "D", ""), "Custom D");
    }

    #[tokio::test]
    async fn test_load_missing_template_is_file_error() {
        let result = PromptTemplate::load(Some(Path::new("/no/such/template.txt"))).await;
        assert!(matches!(result, Err(AppError::File(_))));
    }
}
