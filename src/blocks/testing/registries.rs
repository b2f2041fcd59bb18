//! Sample block definitions for tests
//!
//!     A small registry modelled on common content blocks, with enough variety to
//!     exercise every attribute source and the deprecation chain:
//!
//!         core/paragraph   html + comment attributes, two deprecations
//!         core/heading     integer comment attribute with an allowed set
//!         core/quote       multiline html
//!         core/list        comma selector
//!         core/image       attribute sources
//!         core/gallery     query source
//!         core/group       container with no attributes
//!         core/separator   void markup
//!         core/nextpage    empty markup

use crate::blocks::ast::Attributes;
use crate::blocks::registry::{
    AttributeSchema, AttributeSchemas, AttributeSource, BlockType, CallbackError,
    DeprecatedVersion, MapRegistry,
};
use serde_json::{json, Value};

/// Registry holding every sample block.
pub fn sample_registry() -> MapRegistry {
    MapRegistry::new()
        .with(paragraph())
        .with(heading())
        .with(quote())
        .with(list())
        .with(image())
        .with(gallery())
        .with(group())
        .with(separator())
        .with(nextpage())
}

fn text<'a>(attributes: &'a Attributes, key: &str) -> &'a str {
    attributes.get(key).and_then(Value::as_str).unwrap_or("")
}

fn flag(attributes: &Attributes, key: &str) -> bool {
    attributes.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

fn paragraph_schemas() -> AttributeSchemas {
    AttributeSchemas::new()
        .with(
            "content",
            AttributeSchema::string()
                .source(AttributeSource::html(Some("p")))
                .default_value(""),
        )
        .with("dropCap", AttributeSchema::boolean().default_value(false))
}

/// Current paragraph. Older content used a `drop-cap` class (deprecation 0) or an
/// inline alignment style (deprecation 1).
pub fn paragraph() -> BlockType {
    let renamed_class = DeprecatedVersion::new(paragraph_schemas(), |a| {
        let class = if flag(a, "dropCap") {
            " class=\"drop-cap\""
        } else {
            ""
        };
        Ok(format!("<p{}>{}</p>", class, text(a, "content")))
    })
    .with_eligibility(|a| flag(a, "dropCap"));

    let inline_alignment = DeprecatedVersion::new(
        AttributeSchemas::new()
            .with(
                "content",
                AttributeSchema::string()
                    .source(AttributeSource::html(Some("p")))
                    .default_value(""),
            )
            .with("align", AttributeSchema::string()),
        |a| {
            Ok(format!(
                "<p style=\"text-align:{}\">{}</p>",
                escape_attribute(text(a, "align")),
                text(a, "content")
            ))
        },
    )
    .with_eligibility(|a| a.contains_key("align"))
    .with_migrate(|a| {
        let mut migrated = Attributes::new();
        migrated.insert("content".into(), json!(text(a, "content")));
        migrated.insert("dropCap".into(), json!(false));
        Ok(migrated)
    });

    BlockType::new("paragraph", paragraph_schemas(), |a| {
        let class = if flag(a, "dropCap") {
            " class=\"has-drop-cap\""
        } else {
            ""
        };
        Ok(format!("<p{}>{}</p>", class, text(a, "content")))
    })
    .deprecation(renamed_class)
    .deprecation(inline_alignment)
}

pub fn heading() -> BlockType {
    let schemas = AttributeSchemas::new()
        .with(
            "content",
            AttributeSchema::string()
                .source(AttributeSource::html(Some("h1,h2,h3,h4,h5,h6")))
                .default_value(""),
        )
        .with(
            "level",
            AttributeSchema::integer()
                .default_value(2)
                .enum_values((1..=6).map(|n| json!(n)).collect()),
        );
    BlockType::new("heading", schemas, |a| {
        let level = a.get("level").and_then(Value::as_i64).unwrap_or(2);
        Ok(format!("<h{0}>{1}</h{0}>", level, text(a, "content")))
    })
}

pub fn quote() -> BlockType {
    let schemas = AttributeSchemas::new()
        .with(
            "value",
            AttributeSchema::string()
                .source(AttributeSource::multiline(Some("blockquote"), "p"))
                .default_value(""),
        )
        .with(
            "citation",
            AttributeSchema::string()
                .source(AttributeSource::html(Some("cite")))
                .default_value(""),
        );
    BlockType::new("quote", schemas, |a| {
        let citation = match text(a, "citation") {
            "" => String::new(),
            cite => format!("<cite>{}</cite>", cite),
        };
        Ok(format!(
            "<blockquote class=\"wp-block-quote\">{}{}</blockquote>",
            text(a, "value"),
            citation
        ))
    })
}

pub fn list() -> BlockType {
    let schemas = AttributeSchemas::new()
        .with("ordered", AttributeSchema::boolean().default_value(false))
        .with(
            "values",
            AttributeSchema::string()
                .source(AttributeSource::html(Some("ol,ul")))
                .default_value(""),
        );
    BlockType::new("list", schemas, |a| {
        let tag = if flag(a, "ordered") { "ol" } else { "ul" };
        Ok(format!("<{0}>{1}</{0}>", tag, text(a, "values")))
    })
}

fn image_markup(attributes: &Attributes) -> String {
    let src = match attributes.get("url").and_then(Value::as_str) {
        Some(url) => format!(" src=\"{}\"", escape_attribute(url)),
        None => String::new(),
    };
    format!(
        "<img{} alt=\"{}\"/>",
        src,
        escape_attribute(text(attributes, "alt"))
    )
}

pub fn image() -> BlockType {
    let schemas = AttributeSchemas::new()
        .with(
            "url",
            AttributeSchema::string().source(AttributeSource::attribute(Some("img"), "src")),
        )
        .with(
            "alt",
            AttributeSchema::string()
                .source(AttributeSource::attribute(Some("img"), "alt"))
                .default_value(""),
        )
        .with("id", AttributeSchema::integer());
    BlockType::new("image", schemas, |a| {
        Ok(format!(
            "<figure class=\"wp-block-image\">{}</figure>",
            image_markup(a)
        ))
    })
}

pub fn gallery() -> BlockType {
    let item = AttributeSchemas::new()
        .with(
            "url",
            AttributeSchema::string().source(AttributeSource::attribute(None, "src")),
        )
        .with(
            "alt",
            AttributeSchema::string()
                .source(AttributeSource::attribute(None, "alt"))
                .default_value(""),
        );
    let schemas = AttributeSchemas::new()
        .with(
            "images",
            AttributeSchema::array()
                .source(AttributeSource::query("img", item))
                .default_value(json!([])),
        )
        .with("columns", AttributeSchema::integer());
    BlockType::new("gallery", schemas, |a| {
        let images = a
            .get("images")
            .and_then(Value::as_array)
            .ok_or_else(|| CallbackError::new("images must be an array"))?;
        let mut markup = String::from("<figure class=\"wp-block-gallery\">");
        for image in images {
            match image {
                Value::Object(entry) => markup.push_str(&image_markup(entry)),
                _ => return Err(CallbackError::new("gallery entries must be objects")),
            }
        }
        markup.push_str("</figure>");
        Ok(markup)
    })
}

pub fn group() -> BlockType {
    BlockType::new("group", AttributeSchemas::new(), |_| {
        Ok("<div class=\"wp-block-group\"></div>".to_string())
    })
}

pub fn separator() -> BlockType {
    BlockType::new("separator", AttributeSchemas::new(), |_| {
        Ok("<hr class=\"wp-block-separator\"/>".to_string())
    })
}

pub fn nextpage() -> BlockType {
    BlockType::new("nextpage", AttributeSchemas::new(), |_| Ok(String::new()))
}
