//! 纯文本报告

use super::layout::Block;

/// 写出纯文本报告
pub fn render(blocks: &[Block]) -> Vec<u8> {
    let mut out = String::new();

    for block in blocks {
        match block {
            Block::Title(title) => {
                out.push_str(title);
                out.push('\n');
                out.push_str(&"=".repeat(title.chars().count()));
                out.push_str("\n\n");
            }
            Block::Heading(heading) => {
                out.push('\n');
                out.push_str(heading);
                out.push('\n');
                out.push_str(&"-".repeat(heading.chars().count()));
                out.push_str("\n\n");
            }
            Block::Paragraph(text) => {
                out.push_str(text.trim_end());
                out.push_str("\n\n");
            }
            Block::Table(table) => {
                out.push_str(&table.to_markdown());
                out.push_str("\n\n");
            }
            Block::Footer(text) => {
                out.push_str(&"-".repeat(60));
                out.push('\n');
                out.push_str(text);
                out.push('\n');
            }
        }
    }

    out.into_bytes()
}
