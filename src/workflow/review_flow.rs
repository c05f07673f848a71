//! 审查流程 - 流程层
//!
//! 核心职责：定义"一次审查"的完整处理流程
//!
//! 流程顺序：
//! 1. 提取上传文件文本 → 分类
//! 2. 生成提交清单
//! 3. 构建请求 → 调用审查模型（失败即中止，不生成报告）
//! 4. 解析回答 → 渲染报告 → 写盘

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::clients::{GenerationSettings, ReviewModel};
use crate::error::{AppError, AppResult};
use crate::models::checklist::ChecklistEntry;
use crate::models::document::Document;
use crate::models::report::Report;
use crate::models::review::ReportSection;
use crate::services::classifier::classify_document;
use crate::services::report::{parse_review, render_report};
use crate::services::review_request::ReviewRequestBuilder;
use crate::services::submission_checker::{check_submission, missing_required};
use crate::services::text_extractor::{self, ExtractionWarning};
use crate::utils::logging;
use crate::workflow::review_ctx::RunContext;

/// 一次成功运行的结果
#[derive(Debug, Serialize)]
pub struct ReviewOutcome {
    pub artifact_path: PathBuf,
    pub documents: Vec<Document>,
    pub checklist: Vec<ChecklistEntry>,
    pub warnings: Vec<ExtractionWarning>,
    pub recovered_sections: usize,
}

/// 审查流程
///
/// - 编排 提取 → 分类 → 清单 → 请求 → 渲染
/// - 只依赖 `ReviewModel` 能力，不关心具体的 API 客户端
pub struct ReviewFlow {
    model: Box<dyn ReviewModel>,
}

impl ReviewFlow {
    pub fn new(model: Box<dyn ReviewModel>) -> Self {
        Self { model }
    }

    /// 提取并分类所有上传文件
    pub async fn intake(&self, uploads: &[PathBuf]) -> (Vec<Document>, Vec<ExtractionWarning>) {
        let mut documents = Vec::with_capacity(uploads.len());
        let mut warnings = Vec::new();

        for path in uploads {
            let name = text_extractor::display_name(path);
            let extraction = text_extractor::extract_file(path).await;
            warnings.extend(extraction.warnings);

            let document = classify_document(name, extraction.text);
            info!(
                "📄 {} → {} ({})",
                document.filename(),
                document.detected_type(),
                logging::truncate_text(document.raw_text().trim(), 40)
            );
            documents.push(document);
        }

        (documents, warnings)
    }

    /// 执行一次完整审查
    ///
    /// `output` 为 None 时使用上下文给出的默认路径
    pub async fn run(
        &self,
        ctx: &RunContext,
        uploads: &[PathBuf],
        output: Option<&Path>,
    ) -> AppResult<ReviewOutcome> {
        info!("🔍 开始审查 {}", ctx);

        // ========== 1. 提取与分类 ==========
        let (documents, mut warnings) = self.intake(uploads).await;
        warnings.extend(ctx.reference_warnings.iter().cloned());
        for w in &warnings {
            warn!("⚠️ {}", w);
        }

        // ========== 2. 提交清单 ==========
        let checklist = check_submission(
            &ctx.config.required_types,
            &ctx.config.optional_types,
            &documents,
        );
        logging::log_checklist(&checklist);
        let missing = missing_required(&checklist);
        if !missing.is_empty() {
            warn!("⚠️ 缺少必交材料: {:?}", missing);
        }

        // ========== 3. 请求审查模型 ==========
        let builder = ReviewRequestBuilder::new(
            ctx.template.clone(),
            ctx.config.excerpt_chars,
            GenerationSettings::from_config(&ctx.config),
        );
        let response = builder
            .submit(self.model.as_ref(), &ctx.applicant, &documents, &ctx.references)
            .await
            .map_err(|e| {
                error!("❌ 审查请求失败，本次运行中止: {}", e);
                AppError::Review(e)
            })?;

        // ========== 4. 解析与渲染 ==========
        let review = parse_review(&response);
        let recovered_sections = review.recovered_count();
        info!(
            "✓ 恢复章节 {}/{}",
            recovered_sections,
            ReportSection::ALL.len()
        );

        let report = Report {
            title: ctx.config.report_title.clone(),
            applicant: ctx.applicant.clone(),
            generated_at: ctx.started_at,
            documents,
            checklist,
            review,
            footer: ctx.config.report_footer.clone(),
        };

        let bytes = render_report(&report, ctx.format, ctx.pdf_font.as_deref())?;

        let artifact_path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| ctx.default_output_path());
        write_artifact(&artifact_path, &bytes).await?;

        logging::print_final_stats(
            &artifact_path.display().to_string(),
            recovered_sections,
            ReportSection::ALL.len(),
            warnings.len(),
        );

        Ok(ReviewOutcome {
            artifact_path,
            documents: report.documents,
            checklist: report.checklist,
            warnings,
            recovered_sections,
        })
    }
}

/// 报告一次性写盘
async fn write_artifact(path: &Path, bytes: &[u8]) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::file_write_failed(parent.display().to_string(), e))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
}
