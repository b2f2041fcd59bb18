//! Block serialization
//!
//! Lossless serialization splices every block back from its verbatim delimiters and
//! inner content, so `serialize(parse(x)) == x` for any input, including invalid and
//! unregistered blocks and recovered malformed markup.
//!
//! Canonical serialization differs only for blocks that were migrated to a valid
//! current shape: those are re-emitted with fresh delimiters and the current `save`
//! output. Everything else is written verbatim.
//!
//! All walks use an explicit stack.

use crate::blocks::ast::{Attributes, BlockUpgrade, ResolvedBlock};
use crate::blocks::parsing::RawBlockNode;
use crate::blocks::token::DEFAULT_NAMESPACE;

/// Read access to the source-preserving parts of a block.
pub trait SourceBlock: Sized {
    fn opener(&self) -> &str;
    fn closer(&self) -> Option<&str>;
    fn inner_content(&self) -> &[Option<String>];
    fn inner_blocks(&self) -> &[Self];

    /// Replacement markup for the whole block under canonical serialization.
    fn canonical(&self) -> Option<String> {
        None
    }
}

impl SourceBlock for ResolvedBlock {
    fn opener(&self) -> &str {
        &self.delimiters.opener
    }

    fn closer(&self) -> Option<&str> {
        self.delimiters.closer.as_deref()
    }

    fn inner_content(&self) -> &[Option<String>] {
        &self.inner_content
    }

    fn inner_blocks(&self) -> &[Self] {
        &self.inner_blocks
    }

    fn canonical(&self) -> Option<String> {
        match (&self.name, &self.upgrade) {
            (Some(name), Some(upgrade)) => Some(canonical_block(name, upgrade)),
            _ => None,
        }
    }
}

impl SourceBlock for RawBlockNode {
    fn opener(&self) -> &str {
        &self.delimiters.opener
    }

    fn closer(&self) -> Option<&str> {
        self.delimiters.closer.as_deref()
    }

    fn inner_content(&self) -> &[Option<String>] {
        &self.inner_content
    }

    fn inner_blocks(&self) -> &[Self] {
        &self.inner_blocks
    }
}

enum Emit<'a, B> {
    Text(&'a str),
    Block(&'a B),
}

fn write_blocks<B: SourceBlock>(blocks: &[B], canonical: bool) -> String {
    let mut out = String::new();
    let mut stack: Vec<Emit<'_, B>> = blocks.iter().rev().map(Emit::Block).collect();

    while let Some(item) = stack.pop() {
        let block = match item {
            Emit::Text(text) => {
                out.push_str(text);
                continue;
            }
            Emit::Block(block) => block,
        };

        if canonical {
            if let Some(markup) = block.canonical() {
                out.push_str(&markup);
                continue;
            }
        }

        out.push_str(block.opener());
        if let Some(closer) = block.closer() {
            stack.push(Emit::Text(closer));
        }

        let mut children = block.inner_blocks().iter();
        let mut parts = Vec::with_capacity(block.inner_content().len());
        for chunk in block.inner_content() {
            match chunk {
                Some(text) => parts.push(Emit::Text(text.as_str())),
                None => {
                    if let Some(child) = children.next() {
                        parts.push(Emit::Block(child));
                    }
                }
            }
        }
        stack.extend(parts.into_iter().rev());
    }

    out
}

/// Serialize resolved blocks back to their exact source text.
pub fn serialize(blocks: &[ResolvedBlock]) -> String {
    write_blocks(blocks, false)
}

/// Serialize raw nodes back to their exact source text.
pub fn serialize_raw(nodes: &[RawBlockNode]) -> String {
    write_blocks(nodes, false)
}

/// Serialize resolved blocks, re-emitting migrated blocks in their current form.
pub fn serialize_canonical(blocks: &[ResolvedBlock]) -> String {
    write_blocks(blocks, true)
}

/// Encode attributes as delimiter JSON.
///
/// Sequences that could end the comment or be read as markup are written as unicode
/// escapes, which JSON decoding turns back into the same characters.
pub fn serialize_block_attributes(attributes: &Attributes) -> String {
    let json = serde_json::Value::Object(attributes.clone()).to_string();
    let mut out = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            // Escape pairs are copied whole so `\\` is never read as the start of `\"`.
            '\\' => match chars.next() {
                Some('"') => out.push_str("\\u0022"),
                Some(escaped) => {
                    out.push('\\');
                    out.push(escaped);
                }
                None => out.push('\\'),
            },
            '-' if chars.peek() == Some(&'-') => {
                chars.next();
                out.push_str("\\u002d\\u002d");
            }
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    out
}

/// Block name as written in delimiters: the default namespace is left out.
pub fn delimiter_name(name: &str) -> &str {
    name.strip_prefix(DEFAULT_NAMESPACE)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(name)
}

/// Canonical markup of a block with no nested blocks.
pub fn canonical_block(name: &str, upgrade: &BlockUpgrade) -> String {
    let name = delimiter_name(name);
    let attributes = if upgrade.attributes.is_empty() {
        String::new()
    } else {
        format!("{} ", serialize_block_attributes(&upgrade.attributes))
    };

    if upgrade.content.is_empty() {
        format!("<!-- wp:{} {}/-->", name, attributes)
    } else {
        format!(
            "<!-- wp:{} {}-->\n{}\n<!-- /wp:{} -->",
            name, attributes, upgrade.content, name
        )
    }
}
