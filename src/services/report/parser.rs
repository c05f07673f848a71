//! 审查结果解析
//!
//! 从模型的自由文本中恢复章节和管道符表格。
//! 每种结构一个解析函数，返回 `Option`，找不到就是 `None`，从不报错。

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::review::{ReportSection, ReviewResult, SectionContent, SectionKind, Table};

/// 每个章节一条标题匹配规则
///
/// 允许：Markdown `#`、加粗 `**`、编号 `1.` / `1)`、结尾冒号或括号说明
static HEADING_PATTERNS: LazyLock<Vec<(ReportSection, Regex)>> = LazyLock::new(|| {
    ReportSection::ALL
        .iter()
        .map(|section| {
            let pattern = format!(
                r"(?i)^\s*(?:#{{1,6}}\s*)?(?:\*\*)?\s*(?:\d+\s*[.)]\s*)?(?:\*\*)?\s*{}\s*(?:\([^)]*\))?\s*:?\s*(?:\*\*)?\s*:?\s*$",
                regex::escape(section.heading())
            );
            (*section, Regex::new(&pattern).expect("heading pattern is valid"))
        })
        .collect()
});

static SEPARATOR_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:?-+:?$").expect("separator pattern is valid"));

/// 识别一行是否为已知章节标题
pub fn match_heading(line: &str) -> Option<ReportSection> {
    HEADING_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(line))
        .map(|(section, _)| *section)
}

/// 文本中所有标题行：(标题行起始字节, 正文起始字节, 章节)
fn locate_headings(text: &str) -> Vec<(usize, usize, ReportSection)> {
    let mut found = Vec::new();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        if let Some(section) = match_heading(line.trim_end_matches(['\r', '\n'])) {
            found.push((start, offset, section));
        }
    }

    found
}

/// 提取某个章节的正文（到下一个已识别标题或文本结尾）
///
/// 标题不存在或正文为空时返回 None
pub fn section_body(text: &str, section: ReportSection) -> Option<&str> {
    let headings = locate_headings(text);
    let idx = headings.iter().position(|(_, _, s)| *s == section)?;
    let body_start = headings[idx].1;
    let body_end = headings
        .get(idx + 1)
        .map(|(line_start, _, _)| *line_start)
        .unwrap_or(text.len());

    let body = text[body_start..body_end].trim();
    (!body.is_empty()).then_some(body)
}

/// 把一行拆成单元格；不是表格行时返回 None
fn row_cells(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|')?;
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    Some(inner.split('|').map(|c| c.trim().to_string()).collect())
}

fn is_separator(cells: &[String]) -> bool {
    !cells.is_empty() && cells.iter().all(|c| SEPARATOR_CELL.is_match(c))
}

/// 查找第一个管道符表格：表头行、分隔行、至少一行数据
///
/// 分隔行和数据行的列数必须与表头一致；列数不符的数据行或非表格行结束表格。
/// 只有紧跟表头的一行按分隔行处理，之后全为 `-` 的行（如"不适用"）仍是数据
pub fn parse_table(text: &str) -> Option<Table> {
    let lines: Vec<&str> = text.lines().collect();

    for i in 0..lines.len() {
        let Some(headers) = row_cells(lines[i]) else {
            continue;
        };
        if headers.iter().all(|h| h.is_empty()) || is_separator(&headers) {
            continue;
        }

        let separator_ok = lines
            .get(i + 1)
            .and_then(|l| row_cells(l))
            .is_some_and(|sep| sep.len() == headers.len() && is_separator(&sep));
        if !separator_ok {
            continue;
        }

        let rows: Vec<Vec<String>> = lines[i + 2..]
            .iter()
            .map_while(|l| row_cells(l))
            .take_while(|cells| cells.len() == headers.len())
            .collect();

        if rows.is_empty() {
            continue;
        }

        debug!("识别到表格: {} 列 {} 行", headers.len(), rows.len());
        return Some(Table::new(headers, rows));
    }

    None
}

/// 解析模型回答
pub fn parse_review(raw_response: &str) -> ReviewResult {
    let mut parsed_sections = BTreeMap::new();

    for section in ReportSection::ALL {
        let body = section_body(raw_response, section);

        let content = match section.kind() {
            SectionKind::Prose => body.map(|b| SectionContent::Text(b.to_string())),
            SectionKind::Tabular => {
                // 标题缺失时在整段回答中查找表格
                let search_in = if locate_headings(raw_response).iter().any(|(_, _, s)| *s == section) {
                    body
                } else {
                    Some(raw_response)
                };
                search_in.and_then(parse_table).map(SectionContent::Table)
            }
        };

        match content {
            Some(c) => {
                parsed_sections.insert(section, c);
            }
            None => debug!("未能恢复章节: {}", section.heading()),
        }
    }

    ReviewResult {
        raw_response: raw_response.to_string(),
        parsed_sections,
    }
}
