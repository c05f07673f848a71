use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::clients::LlmClient;
use crate::config::Config;
use crate::error::AppError;
use crate::models::report::ReportFormat;
use crate::utils::logging;
use crate::workflow::{ReviewFlow, ReviewOutcome, RunContext};

/// 一次运行的输入（来自命令行）
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub uploads: Vec<PathBuf>,
    pub applicant: String,
    pub format: Option<ReportFormat>,
    pub output: Option<PathBuf>,
}

/// 应用主结构
pub struct App {
    config: Config,
    flow: ReviewFlow,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置校验失败")?;

        let flow = ReviewFlow::new(Box::new(LlmClient::new(&config)));
        Ok(Self { config, flow })
    }

    /// 使用自定义审查流程初始化（不校验 API 密钥）
    pub fn with_flow(config: Config, flow: ReviewFlow) -> Self {
        Self { config, flow }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行一次审查
    ///
    /// 审查服务失败时返回 `AppError::Review`，不会生成报告
    pub async fn run(&self, request: RunRequest) -> Result<ReviewOutcome, AppError> {
        logging::log_startup(&self.config, request.uploads.len());

        let format = request.format.unwrap_or(self.config.output_format);
        let ctx = RunContext::prepare(&self.config, request.applicant, format).await?;
        info!("📚 参考文档: {} 份", ctx.references.len());

        self.flow
            .run(&ctx, &request.uploads, request.output.as_deref())
            .await
    }
}
