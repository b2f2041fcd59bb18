//! Treeviz formatter for resolved blocks
//!
//! One line per block, nesting drawn with box connectors:
//!
//!   ⧉ 2 blocks
//!   ├─ ▣ core/group ✓
//!   │ └─ ▣ core/paragraph ✓ {"content":"Hi"}
//!   └─ ¶ freeform ✓
//!
//! Icons
//!     Document: ⧉
//!     Block: ▣
//!     Freeform: ¶
//!
//! Markers
//!     ✓ valid, ✗ invalid, ↻n migrated from deprecation n, ⚠ HTML facility error.
//!     Attributes are shown as compact JSON, truncated to 30 characters.

use crate::blocks::ast::ResolvedBlock;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn label(block: &ResolvedBlock) -> String {
    let (icon, name) = match &block.name {
        Some(name) => ("▣", name.as_str()),
        None => ("¶", "freeform"),
    };
    let mut line = format!("{} {} {}", icon, name, if block.is_valid { "✓" } else { "✗" });
    if let Some(index) = block.migrated_from {
        line.push_str(&format!(" ↻{}", index));
    }
    if block.error.is_some() {
        line.push_str(" ⚠");
    }
    if !block.attributes.is_empty() {
        let json = serde_json::Value::Object(block.attributes.clone()).to_string();
        line.push(' ');
        line.push_str(&truncate(&json, 30));
    }
    line
}

pub fn to_treeviz_str(blocks: &[ResolvedBlock]) -> String {
    let noun = if blocks.len() == 1 { "block" } else { "blocks" };
    let mut output = format!("⧉ {} {}\n", blocks.len(), noun);

    let mut stack: Vec<(&ResolvedBlock, String, bool)> = Vec::new();
    push_children(&mut stack, blocks, "");

    while let Some((block, prefix, is_last)) = stack.pop() {
        let connector = if is_last { "└─" } else { "├─" };
        output.push_str(&format!("{}{} {}\n", prefix, connector, label(block)));

        let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        push_children(&mut stack, &block.inner_blocks, &child_prefix);
    }

    output
}

fn push_children<'a>(
    stack: &mut Vec<(&'a ResolvedBlock, String, bool)>,
    children: &'a [ResolvedBlock],
    prefix: &str,
) {
    let count = children.len();
    for (i, child) in children.iter().enumerate().rev() {
        stack.push((child, prefix.to_string(), i + 1 == count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::ast::{Attributes, Delimiters};
    use serde_json::json;

    fn block(name: Option<&str>) -> ResolvedBlock {
        ResolvedBlock {
            name: name.map(str::to_string),
            attributes: Attributes::new(),
            inner_blocks: vec![],
            is_valid: true,
            original_content: String::new(),
            migrated_from: None,
            inner_content: vec![],
            delimiters: Delimiters::default(),
            upgrade: None,
            error: None,
        }
    }

    #[test]
    fn test_tree_layout() {
        let mut paragraph = block(Some("core/paragraph"));
        paragraph.attributes.insert("content".into(), json!("Hi"));
        paragraph.migrated_from = Some(0);
        let mut group = block(Some("core/group"));
        group.inner_blocks = vec![paragraph];
        let mut unknown = block(Some("acme/widget"));
        unknown.is_valid = false;

        let rendered = to_treeviz_str(&[group, unknown, block(None)]);
        let expected = [
            "⧉ 3 blocks",
            "├─ ▣ core/group ✓",
            "│ └─ ▣ core/paragraph ✓ ↻0 {\"content\":\"Hi\"}",
            "├─ ▣ acme/widget ✗",
            "└─ ¶ freeform ✓",
            "",
        ]
        .join("\n");
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_truncates_long_attributes() {
        let mut b = block(Some("core/paragraph"));
        b.attributes
            .insert("content".into(), json!("a very long paragraph body indeed"));
        let rendered = to_treeviz_str(&[b]);
        assert!(rendered.contains("{\"content\":\"a very long paragr..."));
    }
}
