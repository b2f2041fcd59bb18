//! Attribute schemas
//!
//! A schema says where an attribute's value comes from and what shape it must have.
//! Values that cannot be found, or come out with the wrong shape, resolve to the
//! schema's default.

use serde_json::Value;

/// Expected JSON shape of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Boolean,
    Number,
    Integer,
    Object,
    Array,
    /// Any value, `null` included.
    Any,
}

impl AttributeType {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Boolean => value.is_boolean(),
            AttributeType::Number => value.is_number(),
            AttributeType::Integer => value.is_i64() || value.is_u64(),
            AttributeType::Object => value.is_object(),
            AttributeType::Array => value.is_array(),
            AttributeType::Any => true,
        }
    }

    /// Convert a string found in markup to this type.
    ///
    /// Numbers are parsed, strings pass through. Booleans, objects and arrays have no
    /// string form.
    pub fn coerce(&self, raw: String) -> Option<Value> {
        match self {
            AttributeType::String | AttributeType::Any => Some(Value::String(raw)),
            AttributeType::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            AttributeType::Integer => raw.trim().parse::<i64>().ok().map(Value::from),
            AttributeType::Boolean | AttributeType::Object | AttributeType::Array => None,
        }
    }
}

/// Where an attribute value is read from.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeSource {
    /// The JSON object of the block's opening delimiter.
    Comment,
    /// An HTML attribute of the first element matching `selector`.
    Attribute {
        selector: Option<String>,
        attribute: String,
    },
    /// Text content of the first matching element, tags stripped.
    Text { selector: Option<String> },
    /// Inner HTML of the first matching element. With `multiline` set to a tag name,
    /// the outer HTML of the element's children with that tag, concatenated.
    Html {
        selector: Option<String>,
        multiline: Option<String>,
    },
    /// One object per matching element, built from nested schemas scoped to it.
    Query {
        selector: String,
        query: AttributeSchemas,
    },
    /// Lower-case tag name of the first matching element.
    Tag { selector: Option<String> },
    /// The block's whole inner HTML, verbatim.
    Raw,
}

impl AttributeSource {
    pub fn attribute(selector: Option<&str>, attribute: &str) -> Self {
        AttributeSource::Attribute {
            selector: selector.map(str::to_string),
            attribute: attribute.to_string(),
        }
    }

    pub fn text(selector: Option<&str>) -> Self {
        AttributeSource::Text {
            selector: selector.map(str::to_string),
        }
    }

    pub fn html(selector: Option<&str>) -> Self {
        AttributeSource::Html {
            selector: selector.map(str::to_string),
            multiline: None,
        }
    }

    pub fn multiline(selector: Option<&str>, tag: &str) -> Self {
        AttributeSource::Html {
            selector: selector.map(str::to_string),
            multiline: Some(tag.to_string()),
        }
    }

    pub fn query(selector: &str, query: AttributeSchemas) -> Self {
        AttributeSource::Query {
            selector: selector.to_string(),
            query,
        }
    }

    pub fn tag(selector: Option<&str>) -> Self {
        AttributeSource::Tag {
            selector: selector.map(str::to_string),
        }
    }

    /// True for sources that need the block's markup parsed.
    pub fn reads_markup(&self) -> bool {
        !matches!(self, AttributeSource::Comment | AttributeSource::Raw)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSchema {
    pub kind: AttributeType,
    pub source: AttributeSource,
    pub default: Option<Value>,
    /// Allowed values; anything else resolves to the default.
    pub enum_values: Option<Vec<Value>>,
}

impl AttributeSchema {
    /// A comment-sourced attribute of the given type, without default.
    pub fn new(kind: AttributeType) -> Self {
        AttributeSchema {
            kind,
            source: AttributeSource::Comment,
            default: None,
            enum_values: None,
        }
    }

    pub fn string() -> Self {
        Self::new(AttributeType::String)
    }

    pub fn boolean() -> Self {
        Self::new(AttributeType::Boolean)
    }

    pub fn number() -> Self {
        Self::new(AttributeType::Number)
    }

    pub fn integer() -> Self {
        Self::new(AttributeType::Integer)
    }

    pub fn object() -> Self {
        Self::new(AttributeType::Object)
    }

    pub fn array() -> Self {
        Self::new(AttributeType::Array)
    }

    pub fn any() -> Self {
        Self::new(AttributeType::Any)
    }

    pub fn source(mut self, source: AttributeSource) -> Self {
        self.source = source;
        self
    }

    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn enum_values(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    /// Whether a candidate value has the declared type and is one of the allowed values.
    pub fn admits(&self, value: &Value) -> bool {
        self.kind.accepts(value)
            && self
                .enum_values
                .as_ref()
                .map_or(true, |allowed| allowed.contains(value))
    }

    /// Whether the attribute is stored in the delimiter comment.
    pub fn is_comment_sourced(&self) -> bool {
        self.source == AttributeSource::Comment
    }
}

/// Ordered attribute schemas of a block type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeSchemas {
    entries: Vec<(String, AttributeSchema)>,
}

impl AttributeSchemas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [AttributeSchemas::insert].
    pub fn with(mut self, name: impl Into<String>, schema: AttributeSchema) -> Self {
        self.insert(name, schema);
        self
    }

    /// Add or replace a schema. A replaced schema keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, schema: AttributeSchema) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = schema,
            None => self.entries.push((name, schema)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeSchema> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, schema)| schema)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeSchema)> {
        self.entries
            .iter()
            .map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reads_markup(&self) -> bool {
        self.entries.iter().any(|(_, s)| s.source.reads_markup())
    }
}
