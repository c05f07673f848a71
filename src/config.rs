use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::models::document::DocumentType;
use crate::models::report::ReportFormat;
use crate::services::submission_checker::{DEFAULT_OPTIONAL, DEFAULT_REQUIRED};

/// 默认配置文件名（位于工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "ethics-review.toml";

/// 程序配置
///
/// 加载顺序：默认值 → TOML 文件 → 环境变量 → 命令行参数
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub temperature: f32,
    pub max_tokens: u32,
    // --- 请求构建 ---
    /// 参考文档目录，每次运行开始时重新读取
    pub reference_docs_dir: PathBuf,
    /// 提示词模板文件，不设置时使用内置模板
    pub template_path: Option<PathBuf>,
    /// 每份文档截取的最大字符数
    pub excerpt_chars: usize,
    // --- 提交清单 ---
    pub required_types: Vec<DocumentType>,
    pub optional_types: Vec<DocumentType>,
    // --- 报告输出 ---
    pub output_dir: PathBuf,
    pub output_format: ReportFormat,
    pub report_title: String,
    pub report_footer: String,
    /// PDF 报告使用的 TrueType 字体；不设置时使用内置字体，无法编码的字符写成 `[U+XXXX]`
    pub pdf_font_path: Option<PathBuf>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 实际读取的配置文件（日志初始化后输出）
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 2048,
            reference_docs_dir: PathBuf::from("reference_docs"),
            template_path: None,
            excerpt_chars: 1500,
            required_types: DEFAULT_REQUIRED.to_vec(),
            optional_types: DEFAULT_OPTIONAL.to_vec(),
            output_dir: PathBuf::from("reports"),
            output_format: ReportFormat::default(),
            report_title: "Ethics Committee Review Report".to_string(),
            report_footer: "Generated by the Ethics Review Assistant. This report supports, and does not replace, the committee's own review.".to_string(),
            pdf_font_path: None,
            verbose_logging: false,
            source: None,
        }
    }
}

impl Config {
    /// 从 TOML 文本解析（未出现的字段取默认值）
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::ParseFailed {
            path: origin.to_string(),
            source,
        })
    }

    /// 加载配置
    ///
    /// `path` 为 None 时尝试读取工作目录下的 `ethics-review.toml`，不存在则使用默认值
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let candidate = path
            .map(Path::to_path_buf)
            .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()));

        let base = match candidate {
            Some(p) => {
                let content = std::fs::read_to_string(&p)
                    .map_err(|e| anyhow::anyhow!("无法读取配置文件 {}: {}", p.display(), e))?;
                Self {
                    source: Some(p.clone()),
                    ..Self::from_toml_str(&content, &p.display().to_string())?
                }
            }
            None => Self::default(),
        };

        Ok(base.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// 用环境变量覆盖配置
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    fn with_env_overrides(self, get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            llm_api_key: get("LLM_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: get("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: get("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            reference_docs_dir: get("REFERENCE_DOCS_DIR").map(PathBuf::from).unwrap_or(self.reference_docs_dir),
            output_dir: get("OUTPUT_DIR").map(PathBuf::from).unwrap_or(self.output_dir),
            pdf_font_path: get("PDF_FONT_PATH").map(PathBuf::from).or(self.pdf_font_path),
            verbose_logging: get("VERBOSE_LOGGING").and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            ..self
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.excerpt_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: "excerpt_chars".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature".to_string(),
                reason: format!("{} 不在 [0, 2] 范围内", self.temperature),
            });
        }
        if self.required_types.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "required_types".to_string(),
                reason: "至少需要一个必交类型".to_string(),
            });
        }
        check_type_list("required_types", &self.required_types, &[])?;
        check_type_list("optional_types", &self.optional_types, &self.required_types)?;
        Ok(())
    }
}

/// 清单类型不能是 unknown、不能重复、不能同时出现在另一张列表里
fn check_type_list(field: &str, types: &[DocumentType], other: &[DocumentType]) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        field: field.to_string(),
        reason,
    };

    for (i, t) in types.iter().enumerate() {
        if *t == DocumentType::Unknown {
            return Err(invalid("不能包含 unknown".to_string()));
        }
        if types[..i].contains(t) {
            return Err(invalid(format!("重复的类型: {}", t)));
        }
        if other.contains(t) {
            return Err(invalid(format!("{} 已在必交清单中", t)));
        }
    }
    Ok(())
}
