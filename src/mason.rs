//! Mason hypermedia document model
//!
//! Every response body (success or error) is a Mason document: a JSON object
//! holding the resource's own fields plus the reserved `@namespaces`,
//! `@controls` and `@error` regions. `DocumentBuilder` owns the accumulated
//! key-value structure and serializes it with `build()`; documents nest
//! (collection `items` entries are themselves built with `DocumentBuilder`).

use serde_json::{json, Map, Value};

/// Content type for all response bodies
pub const MASON: &str = "application/vnd.mason+json";

/// Where the `spinrate:` link relations are documented
pub const LINK_RELATIONS_URL: &str = "/spinrate/link-relations#";

pub const USER_PROFILE: &str = "/profiles/user/";
pub const ALBUM_PROFILE: &str = "/profiles/album/";
pub const REVIEW_PROFILE: &str = "/profiles/review/";
pub const ERROR_PROFILE: &str = "/profiles/error/";

/// A single hypermedia control: an `href` plus optional attributes.
///
/// Mason allows more control properties than the ones given setters here, so
/// `attr` accepts anything; no vocabulary check is performed.
#[derive(Debug, Clone)]
pub struct Control {
    href: String,
    attrs: Map<String, Value>,
}

impl Control {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            attrs: Map::new(),
        }
    }

    pub fn method(self, method: &str) -> Self {
        self.attr("method", json!(method))
    }

    pub fn encoding(self, encoding: &str) -> Self {
        self.attr("encoding", json!(encoding))
    }

    pub fn title(self, title: &str) -> Self {
        self.attr("title", json!(title))
    }

    pub fn schema(self, schema: Value) -> Self {
        self.attr("schema", schema)
    }

    /// Mark the href as a URI template (query-parameter placeholders)
    pub fn href_template(self) -> Self {
        self.attr("isHrefTemplate", json!(true))
    }

    /// Attach an arbitrary control attribute
    pub fn attr(mut self, name: &str, value: Value) -> Self {
        self.attrs.insert(name.to_string(), value);
        self
    }

    fn into_value(self) -> Value {
        let mut obj = self.attrs;
        obj.insert("href".to_string(), json!(self.href));
        Value::Object(obj)
    }
}

/// Builder for Mason documents.
///
/// Resource fields are added with `field`; the reserved regions are managed
/// through `add_namespace`, `add_control` and `add_error`. Region inserts are
/// idempotent: adding a namespace prefix or control name again overwrites the
/// previous entry.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    doc: Map<String, Value>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource field (chainable, for construction-time fields)
    pub fn field(mut self, name: &str, value: Value) -> Self {
        self.doc.insert(name.to_string(), value);
        self
    }

    /// Add a resource field to an existing builder
    pub fn set_field(&mut self, name: &str, value: Value) {
        self.doc.insert(name.to_string(), value);
    }

    /// Map a namespace prefix to the URI documenting its link relations
    pub fn add_namespace(&mut self, prefix: &str, uri: &str) {
        let region = self
            .doc
            .entry("@namespaces".to_string())
            .or_insert_with(|| json!({}));
        if let Some(obj) = region.as_object_mut() {
            obj.insert(prefix.to_string(), json!({ "name": uri }));
        }
    }

    /// Attach a control under the given (possibly namespaced) name
    pub fn add_control(&mut self, name: &str, control: Control) {
        let region = self
            .doc
            .entry("@controls".to_string())
            .or_insert_with(|| json!({}));
        if let Some(obj) = region.as_object_mut() {
            obj.insert(name.to_string(), control.into_value());
        }
    }

    /// Set the `@error` region. Only meaningful on the top-level document of
    /// an error response; `details` lands in `@messages`.
    pub fn add_error(&mut self, title: &str, details: Option<&str>) {
        self.doc.insert(
            "@error".to_string(),
            json!({
                "@message": title,
                "@messages": [details],
            }),
        );
    }

    /// Consume the builder, yielding the serializable document
    pub fn build(self) -> Value {
        Value::Object(self.doc)
    }
}
