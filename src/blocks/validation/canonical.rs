//! Canonical token form of a parsed fragment
//!
//! Two markup strings are equivalent when their canonical token lists are equal.
//! Parsing already erases quote style, attribute name case and void element
//! spelling. On top of that:
//!
//!     - attributes are sorted by name
//!     - `class` tokens are whitespace-collapsed, and sorted when configured
//!     - `style` loses surrounding whitespace and trailing semicolons
//!     - whitespace-only text nodes are dropped under
//!       [WhitespacePolicy::CollapseBetweenElements], except inside preformatted
//!       elements
//!
//! Text with any non-whitespace character is compared exactly.

use crate::blocks::html::{Fragment, NodeId, NodeKind};
use std::fmt;
use wp_block_parser_config::{ValidationConfig, WhitespacePolicy};

/// Elements whose whitespace is content.
const PREFORMATTED: &[&str] = &["pre", "textarea", "script", "style", "listing"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalToken {
    Open {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Close(String),
    Text(String),
    Comment(String),
}

impl fmt::Display for CanonicalToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalToken::Open { name, attrs } => {
                write!(f, "<{}", name)?;
                for (key, value) in attrs {
                    write!(f, " {}=\"{}\"", key, value)?;
                }
                write!(f, ">")
            }
            CanonicalToken::Close(name) => write!(f, "</{}>", name),
            CanonicalToken::Text(text) => write!(f, "{:?}", text),
            CanonicalToken::Comment(text) => write!(f, "<!--{}-->", text),
        }
    }
}

enum Step {
    Enter(NodeId, bool),
    Exit(String),
}

/// Flatten a fragment into canonical tokens.
pub fn canonicalize(fragment: &Fragment, options: &ValidationConfig) -> Vec<CanonicalToken> {
    let mut tokens = Vec::new();
    let mut stack: Vec<Step> = fragment
        .children(fragment.root())
        .iter()
        .rev()
        .map(|&child| Step::Enter(child, false))
        .collect();

    while let Some(step) = stack.pop() {
        let (id, preformatted) = match step {
            Step::Exit(name) => {
                tokens.push(CanonicalToken::Close(name));
                continue;
            }
            Step::Enter(id, preformatted) => (id, preformatted),
        };

        match fragment.kind(id) {
            Some(NodeKind::Element { name, attrs }) => {
                tokens.push(CanonicalToken::Open {
                    name: name.clone(),
                    attrs: canonical_attributes(attrs, options),
                });
                let inside = preformatted || PREFORMATTED.contains(&name.as_str());
                stack.push(Step::Exit(name.clone()));
                stack.extend(
                    fragment
                        .children(id)
                        .iter()
                        .rev()
                        .map(|&child| Step::Enter(child, inside)),
                );
            }
            Some(NodeKind::Text(text)) => {
                let insignificant = options.whitespace == WhitespacePolicy::CollapseBetweenElements
                    && !preformatted
                    && text.chars().all(char::is_whitespace);
                if insignificant {
                    continue;
                }
                match tokens.last_mut() {
                    Some(CanonicalToken::Text(previous)) => previous.push_str(text),
                    _ => tokens.push(CanonicalToken::Text(text.clone())),
                }
            }
            Some(NodeKind::Comment(text)) => tokens.push(CanonicalToken::Comment(text.clone())),
            Some(NodeKind::Root) | None => {}
        }
    }

    tokens
}

fn canonical_attributes(
    attrs: &[(String, String)],
    options: &ValidationConfig,
) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = attrs
        .iter()
        .map(|(name, value)| {
            let value = match name.as_str() {
                "class" => canonical_class(value, options.sort_classes),
                "style" => canonical_style(value),
                _ => value.clone(),
            };
            (name.clone(), value)
        })
        .collect();
    out.sort();
    out
}

fn canonical_class(value: &str, sort: bool) -> String {
    let mut classes: Vec<&str> = value.split_whitespace().collect();
    if sort {
        classes.sort_unstable();
    }
    classes.join(" ")
}

fn canonical_style(value: &str) -> String {
    value
        .trim()
        .trim_end_matches(|c: char| c == ';' || c.is_whitespace())
        .to_string()
}
