//! CSS selector subset
//!
//! Supported syntax:
//!
//!     type and universal      p, *
//!     id and class            #main, .wp-image
//!     attribute presence      [href]
//!     attribute value         [rel=next] [class~=a] [href^=http] [src$=".png"] [alt*=cat]
//!     structural              :first-child, :last-child
//!     combinators             descendant (whitespace), child (>)
//!     selector lists          figure > img, a
//!
//! Names compare case-insensitively for tags and attributes, values compare exactly.

use super::fragment::{Fragment, NodeId};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid selector '{}': {}", self.selector, self.message)
    }
}

impl std::error::Error for SelectorError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals,
    Includes,
    Prefix,
    Suffix,
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrTest {
    name: String,
    op: AttrOp,
    value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
    first_child: bool,
    last_child: bool,
}

/// One complex selector: compounds joined by combinators, left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Selector, SelectorError> {
        let mut alternatives = Vec::new();
        for part in input.split(',') {
            alternatives.push(parse_complex(part).map_err(|message| SelectorError {
                selector: input.to_string(),
                message,
            })?);
        }
        Ok(Selector { alternatives })
    }

    /// Whether the element `id` matches any alternative of the list.
    pub fn matches(&self, fragment: &Fragment, id: NodeId) -> bool {
        self.alternatives
            .iter()
            .any(|complex| match_complex(complex, complex.compounds.len() - 1, fragment, id))
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

fn parse_complex(input: &str) -> Result<Complex, String> {
    let chars: Vec<char> = input.trim().chars().collect();
    if chars.is_empty() {
        return Err("empty selector".to_string());
    }

    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut pos = 0;

    loop {
        let compound = parse_compound(&chars, &mut pos)?;
        compounds.push(compound);

        let had_space = skip_whitespace(&chars, &mut pos);
        if pos >= chars.len() {
            break;
        }
        if chars[pos] == '>' {
            pos += 1;
            skip_whitespace(&chars, &mut pos);
            combinators.push(Combinator::Child);
        } else if had_space {
            combinators.push(Combinator::Descendant);
        } else {
            return Err(format!("unexpected '{}'", chars[pos]));
        }
        if pos >= chars.len() {
            return Err("dangling combinator".to_string());
        }
    }

    Ok(Complex {
        compounds,
        combinators,
    })
}

fn parse_compound(chars: &[char], pos: &mut usize) -> Result<Compound, String> {
    let mut compound = Compound::default();
    let start = *pos;

    if *pos < chars.len() && chars[*pos] == '*' {
        *pos += 1;
    } else if *pos < chars.len() && is_name_char(chars[*pos]) {
        compound.tag = Some(read_name(chars, pos).to_ascii_lowercase());
    }

    while *pos < chars.len() {
        match chars[*pos] {
            '#' => {
                *pos += 1;
                compound.ids.push(require_name(chars, pos, "id")?);
            }
            '.' => {
                *pos += 1;
                compound.classes.push(require_name(chars, pos, "class")?);
            }
            '[' => {
                *pos += 1;
                compound.attrs.push(parse_attr_test(chars, pos)?);
            }
            ':' => {
                *pos += 1;
                match require_name(chars, pos, "pseudo-class")?.as_str() {
                    "first-child" => compound.first_child = true,
                    "last-child" => compound.last_child = true,
                    other => return Err(format!("unsupported pseudo-class ':{}'", other)),
                }
            }
            _ => break,
        }
    }

    if *pos == start {
        return Err("expected a simple selector".to_string());
    }
    Ok(compound)
}

fn parse_attr_test(chars: &[char], pos: &mut usize) -> Result<AttrTest, String> {
    skip_whitespace(chars, pos);
    let name = require_name(chars, pos, "attribute")?.to_ascii_lowercase();
    skip_whitespace(chars, pos);

    let op = match chars.get(*pos) {
        Some(']') => {
            *pos += 1;
            return Ok(AttrTest {
                name,
                op: AttrOp::Exists,
                value: String::new(),
            });
        }
        Some('=') => AttrOp::Equals,
        Some('~') => AttrOp::Includes,
        Some('^') => AttrOp::Prefix,
        Some('$') => AttrOp::Suffix,
        Some('*') => AttrOp::Substring,
        _ => return Err("malformed attribute selector".to_string()),
    };
    *pos += if op == AttrOp::Equals { 1 } else { 2 };
    if op != AttrOp::Equals && chars.get(*pos - 1) != Some(&'=') {
        return Err("malformed attribute operator".to_string());
    }
    skip_whitespace(chars, pos);

    let value = match chars.get(*pos) {
        Some(&quote) if quote == '"' || quote == '\'' => {
            *pos += 1;
            let begin = *pos;
            while *pos < chars.len() && chars[*pos] != quote {
                *pos += 1;
            }
            if *pos >= chars.len() {
                return Err("unterminated attribute value".to_string());
            }
            let value: String = chars[begin..*pos].iter().collect();
            *pos += 1;
            value
        }
        _ => require_name(chars, pos, "attribute value")?,
    };

    skip_whitespace(chars, pos);
    if chars.get(*pos) != Some(&']') {
        return Err("expected ']'".to_string());
    }
    *pos += 1;
    Ok(AttrTest { name, op, value })
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_name(chars: &[char], pos: &mut usize) -> String {
    let begin = *pos;
    while *pos < chars.len() && is_name_char(chars[*pos]) {
        *pos += 1;
    }
    chars[begin..*pos].iter().collect()
}

fn require_name(chars: &[char], pos: &mut usize, what: &str) -> Result<String, String> {
    let name = read_name(chars, pos);
    if name.is_empty() {
        Err(format!("expected {} name", what))
    } else {
        Ok(name)
    }
}

fn skip_whitespace(chars: &[char], pos: &mut usize) -> bool {
    let begin = *pos;
    while *pos < chars.len() && chars[*pos].is_whitespace() {
        *pos += 1;
    }
    *pos > begin
}

fn match_complex(complex: &Complex, index: usize, fragment: &Fragment, id: NodeId) -> bool {
    if !match_compound(&complex.compounds[index], fragment, id) {
        return false;
    }
    if index == 0 {
        return true;
    }
    match complex.combinators[index - 1] {
        Combinator::Child => fragment
            .parent(id)
            .filter(|&p| fragment.is_element(p))
            .map_or(false, |p| match_complex(complex, index - 1, fragment, p)),
        Combinator::Descendant => fragment
            .element_ancestors(id)
            .any(|a| match_complex(complex, index - 1, fragment, a)),
    }
}

fn match_compound(compound: &Compound, fragment: &Fragment, id: NodeId) -> bool {
    let Some(tag) = fragment.tag_name(id) else {
        return false;
    };
    if let Some(expected) = &compound.tag {
        if expected != tag {
            return false;
        }
    }
    if compound
        .ids
        .iter()
        .any(|expected| fragment.attribute(id, "id") != Some(expected.as_str()))
    {
        return false;
    }
    if !compound.classes.is_empty() {
        let classes: Vec<&str> = fragment
            .attribute(id, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default();
        if !compound.classes.iter().all(|c| classes.contains(&c.as_str())) {
            return false;
        }
    }
    if !compound.attrs.iter().all(|test| match_attr(test, fragment, id)) {
        return false;
    }
    if compound.first_child || compound.last_child {
        let siblings = fragment.element_siblings(id);
        if compound.first_child && siblings.first() != Some(&id) {
            return false;
        }
        if compound.last_child && siblings.last() != Some(&id) {
            return false;
        }
    }
    true
}

fn match_attr(test: &AttrTest, fragment: &Fragment, id: NodeId) -> bool {
    let Some(actual) = fragment.attribute(id, &test.name) else {
        return false;
    };
    let expected = test.value.as_str();
    match test.op {
        AttrOp::Exists => true,
        AttrOp::Equals => actual == expected,
        AttrOp::Includes => actual.split_whitespace().any(|word| word == expected),
        AttrOp::Prefix => !expected.is_empty() && actual.starts_with(expected),
        AttrOp::Suffix => !expected.is_empty() && actual.ends_with(expected),
        AttrOp::Substring => !expected.is_empty() && actual.contains(expected),
    }
}
