//! Attribute extraction
//!
//! Resolves each declared attribute of a block, in declaration order, from the
//! delimiter JSON or from the block's own markup.
//!
//! Extraction is total. A selector that matches nothing, a selector that does not
//! parse, a value of the wrong type or outside the allowed set: all resolve to the
//! schema default, and to no entry at all when there is no default. The only error is
//! a failure of the HTML facility itself.

use crate::blocks::ast::Attributes;
use crate::blocks::html::{Fragment, FragmentError, HtmlFacility, NodeId, Selector, SerializeScope};
use crate::blocks::registry::{AttributeSchema, AttributeSchemas, AttributeSource, AttributeType};
use serde_json::Value;

/// Extracts attribute values for one block.
pub struct AttributeExtractor<'a> {
    facility: &'a dyn HtmlFacility,
}

impl<'a> AttributeExtractor<'a> {
    pub fn new(facility: &'a dyn HtmlFacility) -> Self {
        AttributeExtractor { facility }
    }

    /// Resolve `schemas` against a block's delimiter JSON and inner HTML.
    ///
    /// The markup is parsed at most once, and only if some schema reads it.
    pub fn extract(
        &self,
        schemas: &AttributeSchemas,
        comment: Option<&Attributes>,
        inner_html: &str,
    ) -> Result<Attributes, FragmentError> {
        let fragment = if schemas.reads_markup() {
            Some(self.facility.parse_fragment(inner_html)?)
        } else {
            None
        };

        let mut attributes = Attributes::new();
        for (name, schema) in schemas.iter() {
            let found = match (&schema.source, &fragment) {
                (AttributeSource::Comment, _) => {
                    comment.and_then(|json| json.get(name)).cloned()
                }
                (AttributeSource::Raw, _) => schema.kind.coerce(inner_html.to_string()),
                (_, Some(fragment)) => self.from_markup(schema, fragment, fragment.root())?,
                (_, None) => None,
            };
            if let Some(value) = admit(schema, found) {
                attributes.insert(name.to_string(), value);
            }
        }
        Ok(attributes)
    }

    /// Resolve schemas against an element of an already parsed fragment.
    fn extract_scoped(
        &self,
        schemas: &AttributeSchemas,
        fragment: &Fragment,
        scope: NodeId,
    ) -> Result<Value, FragmentError> {
        let mut entry = Attributes::new();
        for (name, schema) in schemas.iter() {
            let found = match &schema.source {
                AttributeSource::Comment => None,
                AttributeSource::Raw => {
                    let html = self.facility.serialize(fragment, scope, SerializeScope::Inner)?;
                    schema.kind.coerce(html)
                }
                _ => self.from_markup(schema, fragment, scope)?,
            };
            if let Some(value) = admit(schema, found) {
                entry.insert(name.to_string(), value);
            }
        }
        Ok(Value::Object(entry))
    }

    fn from_markup(
        &self,
        schema: &AttributeSchema,
        fragment: &Fragment,
        scope: NodeId,
    ) -> Result<Option<Value>, FragmentError> {
        let value = match &schema.source {
            AttributeSource::Comment | AttributeSource::Raw => None,
            AttributeSource::Attribute {
                selector,
                attribute,
            } => target(fragment, scope, selector.as_deref()).and_then(|element| {
                let found = fragment.attribute(element, &attribute.to_ascii_lowercase());
                if schema.kind == AttributeType::Boolean {
                    Some(Value::Bool(found.is_some()))
                } else {
                    found.and_then(|raw| schema.kind.coerce(raw.to_string()))
                }
            }),
            AttributeSource::Text { selector } => target(fragment, scope, selector.as_deref())
                .and_then(|element| schema.kind.coerce(fragment.text_content(element))),
            AttributeSource::Html {
                selector,
                multiline,
            } => match target(fragment, scope, selector.as_deref()) {
                Some(element) => {
                    let html = match multiline {
                        Some(tag) => self.multiline_html(fragment, element, tag)?,
                        None => self.facility.serialize(fragment, element, SerializeScope::Inner)?,
                    };
                    schema.kind.coerce(html)
                }
                None => None,
            },
            AttributeSource::Query { selector, query } => match parse_selector(selector) {
                Some(selector) => {
                    let mut items = Vec::new();
                    for element in fragment.select(&selector, scope) {
                        items.push(self.extract_scoped(query, fragment, element)?);
                    }
                    Some(Value::Array(items))
                }
                None => None,
            },
            AttributeSource::Tag { selector } => target(fragment, scope, selector.as_deref())
                .and_then(|element| fragment.tag_name(element))
                .and_then(|tag| schema.kind.coerce(tag.to_string())),
        };
        Ok(value)
    }

    fn multiline_html(
        &self,
        fragment: &Fragment,
        element: NodeId,
        tag: &str,
    ) -> Result<String, FragmentError> {
        let mut html = String::new();
        for &child in fragment.children(element) {
            if fragment.tag_name(child) == Some(tag) {
                html.push_str(&self.facility.serialize(fragment, child, SerializeScope::Outer)?);
            }
        }
        Ok(html)
    }
}

/// Apply type and enum checks, falling back to the default.
fn admit(schema: &AttributeSchema, found: Option<Value>) -> Option<Value> {
    match found {
        Some(value) if schema.admits(&value) => Some(value),
        Some(value) => {
            log::debug!("attribute value {} rejected, using default", value);
            schema.default.clone()
        }
        None => schema.default.clone(),
    }
}

fn target(fragment: &Fragment, scope: NodeId, selector: Option<&str>) -> Option<NodeId> {
    match selector {
        None => Some(scope),
        Some(selector) => parse_selector(selector).and_then(|s| fragment.select_first(&s, scope)),
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            log::debug!("{}", e);
            None
        }
    }
}

/// Resolve `schemas` with the default facility.
pub fn extract_attributes(
    schemas: &AttributeSchemas,
    comment: Option<&Attributes>,
    inner_html: &str,
) -> Result<Attributes, FragmentError> {
    let facility = crate::blocks::html::Html5everFacility::new();
    AttributeExtractor::new(&facility).extract(schemas, comment, inner_html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn comment(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_comment_and_text_sources() {
        let schemas = AttributeSchemas::new()
            .with("dropCap", AttributeSchema::boolean().default_value(false))
            .with(
                "content",
                AttributeSchema::string().source(AttributeSource::text(Some("p"))),
            );
        let json = comment(json!({"dropCap": true}));

        let attrs = extract_attributes(&schemas, Some(&json), "\n<p class=\"has-drop-cap\">Hi</p>\n")
            .unwrap();
        assert_eq!(Value::Object(attrs), json!({"dropCap": true, "content": "Hi"}));
    }

    #[test]
    fn test_missing_target_uses_default_or_nothing() {
        let schemas = AttributeSchemas::new()
            .with(
                "url",
                AttributeSchema::string().source(AttributeSource::attribute(Some("img"), "src")),
            )
            .with(
                "caption",
                AttributeSchema::string()
                    .source(AttributeSource::html(Some("figcaption")))
                    .default_value(""),
            );

        let attrs = extract_attributes(&schemas, None, "<p>no image</p>").unwrap();
        assert_eq!(Value::Object(attrs), json!({"caption": ""}));
    }

    #[test]
    fn test_type_and_enum_mismatch_fall_back() {
        let schemas = AttributeSchemas::new()
            .with("level", AttributeSchema::integer().default_value(2))
            .with(
                "align",
                AttributeSchema::string().enum_values(vec![json!("left"), json!("right")]),
            );
        let json = comment(json!({"level": "three", "align": "center"}));

        let attrs = extract_attributes(&schemas, Some(&json), "").unwrap();
        assert_eq!(Value::Object(attrs), json!({"level": 2}));
    }

    #[test]
    fn test_boolean_attribute_is_presence() {
        let schemas = AttributeSchemas::new().with(
            "controls",
            AttributeSchema::boolean().source(AttributeSource::attribute(Some("video"), "controls")),
        );
        let attrs = extract_attributes(&schemas, None, "<video controls src=\"a.mp4\"></video>").unwrap();
        assert_eq!(attrs.get("controls"), Some(&json!(true)));

        let attrs = extract_attributes(&schemas, None, "<video src=\"a.mp4\"></video>").unwrap();
        assert_eq!(attrs.get("controls"), Some(&json!(false)));
    }

    #[test]
    fn test_numeric_attribute_is_parsed() {
        let schemas = AttributeSchemas::new().with(
            "width",
            AttributeSchema::integer().source(AttributeSource::attribute(Some("img"), "width")),
        );
        let attrs = extract_attributes(&schemas, None, "<img width=\"300\">").unwrap();
        assert_eq!(attrs.get("width"), Some(&json!(300)));
    }

    #[test]
    fn test_query_source() {
        let image = AttributeSchemas::new()
            .with(
                "url",
                AttributeSchema::string().source(AttributeSource::attribute(Some("img"), "src")),
            )
            .with(
                "alt",
                AttributeSchema::string()
                    .source(AttributeSource::attribute(Some("img"), "alt"))
                    .default_value(""),
            );
        let schemas = AttributeSchemas::new().with(
            "images",
            AttributeSchema::array().source(AttributeSource::query("li", image)),
        );
        let html = "<ul><li><img src=\"a.png\" alt=\"A\"></li><li><img src=\"b.png\"></li><li></li></ul>";

        let attrs = extract_attributes(&schemas, None, html).unwrap();
        assert_eq!(
            attrs.get("images"),
            Some(&json!([
                {"url": "a.png", "alt": "A"},
                {"url": "b.png", "alt": ""},
                {"alt": ""}
            ]))
        );
    }

    #[test]
    fn test_html_and_multiline_sources() {
        let schemas = AttributeSchemas::new()
            .with(
                "value",
                AttributeSchema::string().source(AttributeSource::multiline(Some("blockquote"), "p")),
            )
            .with(
                "citation",
                AttributeSchema::string().source(AttributeSource::html(Some("cite"))),
            );
        let html = "<blockquote><p>One</p><p>Two</p><cite>A <em>B</em></cite></blockquote>";

        let attrs = extract_attributes(&schemas, None, html).unwrap();
        assert_eq!(attrs.get("value"), Some(&json!("<p>One</p><p>Two</p>")));
        assert_eq!(attrs.get("citation"), Some(&json!("A <em>B</em>")));
    }

    #[test]
    fn test_tag_and_raw_sources() {
        let schemas = AttributeSchemas::new()
            .with(
                "ordered",
                AttributeSchema::string().source(AttributeSource::tag(Some("ol, ul"))),
            )
            .with("raw", AttributeSchema::string().source(AttributeSource::Raw));
        let html = "<ol><li>x</li></ol>";

        let attrs = extract_attributes(&schemas, None, html).unwrap();
        assert_eq!(attrs.get("ordered"), Some(&json!("ol")));
        assert_eq!(attrs.get("raw"), Some(&json!(html)));
    }

    #[test]
    fn test_invalid_selector_is_a_miss() {
        let schemas = AttributeSchemas::new().with(
            "content",
            AttributeSchema::string()
                .source(AttributeSource::text(Some("p:hover")))
                .default_value("none"),
        );
        let attrs = extract_attributes(&schemas, None, "<p>x</p>").unwrap();
        assert_eq!(attrs.get("content"), Some(&json!("none")));
    }
}
