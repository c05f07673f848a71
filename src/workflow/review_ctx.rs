//! 单次运行上下文
//!
//! 每次运行开始时构建，显式传给各个环节，不存在进程级全局状态

use chrono::{DateTime, Local};
use std::fmt::Display;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::document::Document;
use crate::models::loaders::load_reference_documents;
use crate::models::report::ReportFormat;
use crate::services::review_request::PromptTemplate;
use crate::services::text_extractor::ExtractionWarning;

/// 单次运行上下文
#[derive(Debug, Clone)]
pub struct RunContext {
    /// 本次运行使用的配置快照
    pub config: Config,
    /// 申请人（用户填写的姓名）
    pub applicant: String,
    pub format: ReportFormat,
    pub started_at: DateTime<Local>,
    /// 本次运行开始时读取的参考文档
    pub references: Vec<Document>,
    pub reference_warnings: Vec<ExtractionWarning>,
    pub template: PromptTemplate,
    /// PDF 报告嵌入的字体（仅 PDF 格式且配置了字体时读取）
    pub pdf_font: Option<Vec<u8>>,
}

impl RunContext {
    /// 准备上下文：重新读取参考文档目录和提示词模板
    pub async fn prepare(config: &Config, applicant: impl Into<String>, format: ReportFormat) -> AppResult<Self> {
        let template = PromptTemplate::load(config.template_path.as_deref()).await?;
        let reference_set = load_reference_documents(&config.reference_docs_dir).await;

        let pdf_font = match (&config.pdf_font_path, format) {
            (Some(path), ReportFormat::Pdf) => Some(
                tokio::fs::read(path)
                    .await
                    .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?,
            ),
            _ => None,
        };

        Ok(Self {
            config: config.clone(),
            applicant: applicant.into(),
            format,
            started_at: Local::now(),
            references: reference_set.documents,
            reference_warnings: reference_set.warnings,
            template,
            pdf_font,
        })
    }

    /// 默认报告路径：`<output_dir>/ethics_review_<申请人>_<时间>.<扩展名>`
    pub fn default_output_path(&self) -> PathBuf {
        let filename = format!(
            "ethics_review_{}_{}.{}",
            slugify(&self.applicant),
            self.started_at.format("%Y%m%d_%H%M%S"),
            self.format.extension()
        );
        self.config.output_dir.join(filename)
    }
}

impl Display for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[申请人 {} 格式 {} 参考文档 {} 份]",
            self.applicant,
            self.format,
            self.references.len()
        )
    }
}

/// 文件名安全的申请人标识
fn slugify(name: &str) -> String {
    let mut slug = String::new();
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_').to_string();
    if slug.is_empty() {
        "applicant".to_string()
    } else {
        slug
    }
}
