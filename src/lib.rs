//! # Ethics Review
//!
//! 伦理委员会材料审查工具：对上传的申请材料分类、核对提交清单，
//! 结合参考文档请求语言模型审查，并把回答渲染成 txt / docx / pdf 报告。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 持有外部资源（LLM API 客户端），只暴露能力
//! - `ReviewModel` - 文本进、文本出的审查模型接口
//! - `LlmClient` - OpenAI 兼容实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个服务只做一件事
//! - `text_extractor` - PDF / TXT 转纯文本（失败降级为警告）
//! - `classifier` - 关键词分类
//! - `submission_checker` - 提交清单
//! - `review_request` - 构建提示词并调用模型
//! - `report` - 解析回答、渲染报告
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次审查"的完整处理流程
//! - `RunContext` - 单次运行上下文（配置快照 + 参考文档 + 申请人）
//! - `ReviewFlow` - 流程编排（提取 → 分类 → 清单 → 请求 → 渲染）
//!
//! ### ④ 应用层（App）
//! - `app` - 校验配置、组装依赖、驱动一次运行

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{App, RunRequest};
pub use clients::{GenerationSettings, LlmClient, ReviewModel};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ChecklistEntry, ChecklistStatus, Document, DocumentType, Report, ReportFormat, ReviewResult};
pub use workflow::{ReviewFlow, ReviewOutcome, RunContext};
