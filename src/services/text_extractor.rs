//! 文本提取服务 - 业务能力层
//!
//! 只负责"把文件变成纯文本"，任何失败都降级为空文本加一条警告，不向上抛错。
//! 警告由调用方统一输出，这里只记 debug 日志

use std::fmt;
use std::path::Path;
use tracing::debug;

/// 提取过程中产生的非致命警告
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ExtractionWarning {
    pub filename: String,
    pub reason: String,
}

impl ExtractionWarning {
    fn new(filename: &str, reason: impl Into<String>) -> Self {
        Self {
            filename: filename.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.filename, self.reason)
    }
}

/// 单个文件的提取结果
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub text: String,
    pub warnings: Vec<ExtractionWarning>,
}

impl Extraction {
    fn degraded(warning: ExtractionWarning) -> Self {
        debug!("文本提取降级为空文本: {}", warning);
        Self {
            text: String::new(),
            warnings: vec![warning],
        }
    }
}

/// 支持的文件种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Pdf,
    PlainText,
}

fn file_kind(extension: &str) -> Option<FileKind> {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "pdf" => Some(FileKind::Pdf),
        "txt" | "text" | "md" => Some(FileKind::PlainText),
        _ => None,
    }
}

/// 是否为可提取的文件类型
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(file_kind)
        .is_some()
}

/// 从磁盘读取并提取文件文本
pub async fn extract_file(path: &Path) -> Extraction {
    let filename = display_name(path);
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match tokio::fs::read(path).await {
        Ok(bytes) => extract_bytes(&filename, &bytes, extension),
        Err(e) => Extraction::degraded(ExtractionWarning::new(
            &filename,
            format!("无法读取文件: {}", e),
        )),
    }
}

/// 按声明的扩展名从内存中提取文本
pub fn extract_bytes(filename: &str, bytes: &[u8], extension: &str) -> Extraction {
    let mut extraction = match file_kind(extension) {
        Some(FileKind::Pdf) => extract_pdf(filename, bytes),
        Some(FileKind::PlainText) => extract_plain_text(filename, bytes),
        None => {
            return Extraction::degraded(ExtractionWarning::new(
                filename,
                format!("不支持的文件类型: .{}", extension),
            ))
        }
    };

    if extraction.warnings.is_empty() && extraction.text.trim().is_empty() {
        extraction
            .warnings
            .push(ExtractionWarning::new(filename, "未提取到任何文本"));
    }

    debug!("提取完成: {} ({} 字符)", filename, extraction.text.chars().count());
    extraction
}

fn extract_plain_text(filename: &str, bytes: &[u8]) -> Extraction {
    match std::str::from_utf8(bytes) {
        Ok(text) => Extraction {
            text: text.to_string(),
            warnings: Vec::new(),
        },
        Err(e) => Extraction::degraded(ExtractionWarning::new(
            filename,
            format!("文本不是有效的 UTF-8 编码: {}", e),
        )),
    }
}

fn extract_pdf(filename: &str, bytes: &[u8]) -> Extraction {
    // pdf-extract 遇到畸形文件可能 panic，这里一并收拢为警告
    let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes));

    match result {
        Ok(Ok(pages)) => {
            debug!("{}: 共 {} 页", filename, pages.len());
            Extraction {
                text: pages.concat(),
                warnings: Vec::new(),
            }
        }
        Ok(Err(e)) => Extraction::degraded(ExtractionWarning::new(
            filename,
            format!("PDF 解析失败: {}", e),
        )),
        Err(_) => Extraction::degraded(ExtractionWarning::new(filename, "PDF 解析过程中发生异常")),
    }
}

/// 文件名（不含目录）
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::logging::capture_logs;

    /// 用 lopdf 生成一页带文字的 PDF
    fn make_test_pdf(text: &str) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let resources = dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        });

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        });

        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", pages_id);
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_extract_plain_text() {
        let extraction = extract_bytes("a.txt", b"Research Proposal\nIntroduction", "txt");
        assert_eq!(extraction.text, "Research Proposal\nIntroduction");
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let extraction = extract_bytes("A.TXT", b"hello", "TXT");
        assert_eq!(extraction.text, "hello");
    }

    #[test]
    fn test_invalid_utf8_degrades_to_empty_with_warning() {
        let extraction = extract_bytes("bad.txt", &[0xff, 0xfe, 0x41], "txt");
        assert_eq!(extraction.text, "");
        assert_eq!(extraction.warnings.len(), 1);
        assert_eq!(extraction.warnings[0].filename, "bad.txt");
    }

    #[test]
    fn test_unsupported_extension_warns() {
        let extraction = extract_bytes("photo.png", b"\x89PNG", "png");
        assert_eq!(extraction.text, "");
        assert!(extraction.warnings[0].reason.contains("png"));
    }

    #[test]
    fn test_garbage_pdf_degrades_to_empty_with_warning() {
        let extraction = extract_bytes("broken.pdf", b"definitely not a pdf", "pdf");
        assert_eq!(extraction.text, "");
        assert_eq!(extraction.warnings.len(), 1);
    }

    #[test]
    fn test_empty_text_file_gets_warning() {
        let extraction = extract_bytes("empty.txt", b"   \n", "txt");
        assert_eq!(extraction.text, "   \n");
        assert_eq!(extraction.warnings.len(), 1);
    }

    #[test]
    fn test_extract_text_from_pdf() {
        let pdf = make_test_pdf("Informed Consent Form");
        let extraction = extract_bytes("consent.pdf", &pdf, "pdf");
        assert!(
            extraction.text.contains("Informed") || extraction.text.contains("Consent"),
            "unexpected text: {}",
            extraction.text
        );
        assert!(extraction.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_degrades() {
        let extraction = extract_file(Path::new("/definitely/not/here.txt")).await;
        assert_eq!(extraction.text, "");
        assert_eq!(extraction.warnings[0].filename, "here.txt");
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("x/Guide.PDF")));
        assert!(is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("scan.jpg")));
        assert!(!is_supported(Path::new("README")));
    }

    #[test]
    fn test_extraction_leaves_warning_output_to_caller() {
        let (extraction, output) = capture_logs(tracing::Level::WARN, || {
            extract_bytes("notes.docx", b"whatever", "docx")
        });
        assert_eq!(extraction.warnings.len(), 1);
        assert!(output.is_empty(), "unexpected log output: {output}");

        let (extraction, output) =
            capture_logs(tracing::Level::WARN, || extract_bytes("blank.txt", b"  \n", "txt"));
        assert_eq!(extraction.warnings.len(), 1);
        assert!(output.is_empty(), "unexpected log output: {output}");
    }
}
