use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 语言模型服务错误
    #[error("审查服务错误: {0}")]
    Review(#[from] ReviewError),
    /// 报告渲染错误
    #[error("报告渲染错误: {0}")]
    Render(#[from] RenderError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 缺少 API 密钥
    #[error("未配置 LLM API 密钥 (请设置 LLM_API_KEY 或配置文件中的 llm_api_key)")]
    MissingApiKey,
    /// 字段取值非法
    #[error("配置项 {field} 取值非法: {reason}")]
    InvalidValue { field: String, reason: String },
    /// 无法识别的输出格式
    #[error("无法识别的报告格式: {0} (可选: txt, docx, pdf)")]
    UnknownFormat(String),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 语言模型服务错误
///
/// 任何一种都会中止本次运行，不重试
#[derive(Debug, Error)]
pub enum ReviewError {
    /// 构建请求失败
    #[error("构建请求失败: {0}")]
    RequestBuild(String),
    /// API 调用失败（网络、鉴权、配额等）
    #[error("LLM API 调用失败 (模型: {model}): {message}")]
    ApiCallFailed { model: String, message: String },
    /// 返回内容为空
    #[error("LLM 返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 报告渲染错误
#[derive(Debug, Error)]
pub enum RenderError {
    /// PDF 生成失败
    #[error("PDF 生成失败: {0}")]
    Pdf(String),
    /// DOCX 打包失败
    #[error("DOCX 打包失败: {0}")]
    Docx(String),
}

impl From<zip::result::ZipError> for RenderError {
    fn from(err: zip::result::ZipError) -> Self {
        RenderError::Docx(err.to_string())
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建 LLM API 调用错误
    pub fn llm_api_failed(model: impl Into<String>, message: impl ToString) -> Self {
        AppError::Review(ReviewError::ApiCallFailed {
            model: model.into(),
            message: message.to_string(),
        })
    }

    /// 面向用户的一行错误信息
    pub fn user_message(&self) -> String {
        match self {
            AppError::Review(_) => format!("❌ 审查请求失败，本次未生成报告: {}", self),
            _ => format!("❌ {}", self),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
