/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::checklist::{ChecklistEntry, ChecklistStatus};

/// 初始化日志
///
/// `RUST_LOG` 优先；否则 verbose 时为 debug，默认 info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config, upload_count: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 伦理审查报告生成 - {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("📄 待审文件: {} 份", upload_count);
    info!("📚 参考文档目录: {}", config.reference_docs_dir.display());
    info!("🤖 模型: {}", config.llm_model_name);
    match &config.source {
        Some(path) => info!("⚙️ 配置文件: {}", path.display()),
        None => info!("⚙️ 配置文件: 未使用（默认值 + 环境变量）"),
    }
    info!("{}", "=".repeat(60));
}

/// 记录提交清单
pub fn log_checklist(entries: &[ChecklistEntry]) {
    info!("\n{}", "─".repeat(60));
    info!("📋 提交清单");
    for entry in entries {
        let file = entry.matched_filename.as_deref().unwrap_or("-");
        match entry.status {
            ChecklistStatus::Missing => {
                warn!("  ❌ {:<24} {:<24} {}", entry.expected_type, entry.status, file)
            }
            _ => info!("  ✓ {:<24} {:<24} {}", entry.expected_type, entry.status, file),
        }
    }
    info!("{}", "─".repeat(60));
}

/// 打印最终结果
pub fn print_final_stats(artifact: &str, recovered_sections: usize, total_sections: usize, warnings: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 审查完成");
    info!("✅ 恢复章节: {}/{}", recovered_sections, total_sections);
    if warnings > 0 {
        warn!("⚠️ 提取警告: {} 条", warnings);
    }
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", artifact);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

/// 在当前线程捕获 `level` 及以上的日志输出
#[cfg(test)]
pub(crate) fn capture_logs<R>(level: tracing::Level, f: impl FnOnce() -> R) -> (R, String) {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let buffer = Buffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let output = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, output)
}
