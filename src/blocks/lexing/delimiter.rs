//! Delimiter decoding
//!
//! Applies the exact delimiter grammar at a `<` found by the scanner and extracts the
//! closing marker, namespace, name, JSON payload and self-closing marker.
//!
//! The grammar is anchored at the start of the text only: [delimiter_len] measures a
//! delimiter at the head of the remaining source, [decode] requires the whole slice to be
//! one delimiter.

use crate::blocks::ast::Attributes;
use crate::blocks::token::{Delimiter, Token, DEFAULT_NAMESPACE};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static DELIMITER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^<!--\s+(?P<closing>/)?wp:(?:(?P<ns>[a-z][a-z0-9_-]*)/)?(?P<name>[a-z][a-z0-9_-]*)(?:\s+(?P<json>\{(?:[^{}]|\{[^{}]*\})*\}))?\s*(?P<selfclose>/)?-->",
    )
    .expect("delimiter grammar is a valid regex")
});

/// Why a delimiter-shaped slice could not become a block token.
#[derive(Debug, Clone, PartialEq)]
pub enum DelimiterError {
    /// The slice does not match the delimiter grammar.
    NoMatch,
    /// The embedded JSON object does not parse.
    InvalidJson(String),
}

impl fmt::Display for DelimiterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelimiterError::NoMatch => write!(f, "not a block delimiter"),
            DelimiterError::InvalidJson(msg) => write!(f, "invalid delimiter JSON: {}", msg),
        }
    }
}

impl std::error::Error for DelimiterError {}

/// Byte length of the delimiter at the start of `text`, if one starts there.
pub fn delimiter_len(text: &str) -> Option<usize> {
    DELIMITER.find(text).map(|m| m.end())
}

/// Decode one delimiter comment into a block token.
pub fn decode(text: &str) -> Result<Token, DelimiterError> {
    let caps = DELIMITER
        .captures(text)
        .filter(|caps| caps.get(0).map(|m| m.end()) == Some(text.len()))
        .ok_or(DelimiterError::NoMatch)?;

    let namespace = caps
        .name("ns")
        .map(|m| m.as_str())
        .unwrap_or(DEFAULT_NAMESPACE);
    let name = format!("{}/{}", namespace, &caps["name"]);

    let attributes = match caps.name("json") {
        Some(json) => Some(parse_attributes(json.as_str())?),
        None => None,
    };

    let delimiter = Delimiter::new(name, attributes);
    let token = if caps.name("closing").is_some() {
        Token::BlockClose(delimiter)
    } else if caps.name("selfclose").is_some() {
        Token::BlockSelfClosing(delimiter)
    } else {
        Token::BlockOpen(delimiter)
    };
    Ok(token)
}

fn parse_attributes(json: &str) -> Result<Attributes, DelimiterError> {
    match serde_json::from_str::<serde_json::Value>(json) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(DelimiterError::InvalidJson(format!(
            "expected an object, found {}",
            other
        ))),
        Err(e) => Err(DelimiterError::InvalidJson(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn delimiter_of(token: &Token) -> &Delimiter {
        token.delimiter().expect("delimiter token")
    }

    #[test]
    fn test_namespace_defaults_to_core() {
        let token = decode("<!-- wp:paragraph -->").unwrap();
        assert!(matches!(token, Token::BlockOpen(_)));
        assert_eq!(delimiter_of(&token).name, "core/paragraph");
        assert_eq!(delimiter_of(&token).attributes, None);
    }

    #[test]
    fn test_explicit_namespace() {
        let token = decode("<!-- wp:acme/widget-2 -->").unwrap();
        assert_eq!(delimiter_of(&token).name, "acme/widget-2");
    }

    #[test]
    fn test_closer() {
        let token = decode("<!-- /wp:core/quote -->").unwrap();
        assert!(matches!(token, Token::BlockClose(_)));
        assert_eq!(delimiter_of(&token).name, "core/quote");
    }

    #[test]
    fn test_self_closing_with_attributes() {
        let token = decode(r#"<!-- wp:separator {"opacity":"css"} /-->"#).unwrap();
        assert!(matches!(token, Token::BlockSelfClosing(_)));
        let attrs = delimiter_of(&token).attributes.clone().unwrap();
        assert_eq!(attrs.get("opacity"), Some(&json!("css")));
    }

    #[test]
    fn test_self_closing_without_space() {
        let token = decode("<!-- wp:separator/-->").unwrap();
        assert!(matches!(token, Token::BlockSelfClosing(_)));
    }

    #[test]
    fn test_closer_with_self_close_marker_is_a_closer() {
        let token = decode("<!-- /wp:separator /-->").unwrap();
        assert!(matches!(token, Token::BlockClose(_)));
    }

    #[test]
    fn test_nested_json_object() {
        let token = decode(r#"<!-- wp:group {"style":{"color":"red"}} -->"#).unwrap();
        let attrs = delimiter_of(&token).attributes.clone().unwrap();
        assert_eq!(attrs.get("style"), Some(&json!({"color": "red"})));
    }

    #[test]
    fn test_invalid_json() {
        let result = decode(r#"<!-- wp:paragraph {"a":} -->"#);
        assert!(matches!(result, Err(DelimiterError::InvalidJson(_))));
    }

    #[test]
    fn test_delimiter_len_stops_at_the_first_terminator() {
        assert_eq!(delimiter_len("<!-- wp:x /--><!-- wp:y /-->"), Some(14));
        assert_eq!(delimiter_len("<!-- wp:p {} -->\n<p>a</p>"), Some(16));
        assert_eq!(delimiter_len("<!--\twp:x\n/-->rest"), Some(14));
        assert_eq!(delimiter_len("<p><!-- wp:x /-->"), None);
        assert_eq!(delimiter_len("<!-- wp:paragraph"), None);
    }

    #[test]
    fn test_trailing_text_is_not_a_delimiter() {
        assert_eq!(decode("<!-- wp:x /--> "), Err(DelimiterError::NoMatch));
    }

    #[test]
    fn test_bad_names_do_not_match() {
        assert_eq!(decode("<!-- wp:Paragraph -->"), Err(DelimiterError::NoMatch));
        assert_eq!(decode("<!-- wp:1col -->"), Err(DelimiterError::NoMatch));
        assert_eq!(decode("<!--wp:paragraph -->"), Err(DelimiterError::NoMatch));
    }
}
