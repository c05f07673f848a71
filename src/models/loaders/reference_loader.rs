use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::models::document::Document;
use crate::services::classifier::classify_document;
use crate::services::text_extractor::{self, ExtractionWarning};

/// 参考文档加载结果
#[derive(Debug, Default)]
pub struct ReferenceSet {
    pub documents: Vec<Document>,
    pub warnings: Vec<ExtractionWarning>,
}

/// 读取参考文档目录下所有 PDF / TXT 文件并分类
///
/// 目录不存在时只记录警告，返回空集合；文件按名称排序，保证提示词稳定
pub async fn load_reference_documents(folder: &Path) -> ReferenceSet {
    let mut set = ReferenceSet::default();

    let mut entries = match fs::read_dir(folder).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("⚠️ 参考文档目录不可用 {}: {}", folder.display(), e);
            return set;
        }
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                if path.is_file() && text_extractor::is_supported(&path) {
                    paths.push(path);
                } else {
                    debug!("跳过参考目录中的文件: {}", path.display());
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("⚠️ 读取参考文档目录中断 {}: {}", folder.display(), e);
                break;
            }
        }
    }
    paths.sort();

    for path in paths {
        let name = text_extractor::display_name(&path);
        info!("正在加载参考文档: {}", name);

        let extraction = text_extractor::extract_file(&path).await;
        set.warnings.extend(extraction.warnings);
        set.documents.push(classify_document(name, extraction.text));
    }

    info!("✓ 共加载 {} 份参考文档", set.documents.len());
    set
}
