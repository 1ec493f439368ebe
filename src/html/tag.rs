//! HTML tag descriptors and their string rendering.
//!
//! Attribute values are written verbatim. Nothing is escaped, so callers must
//! hand in strings that are already safe to place inside double quotes.

use crate::config::InjectTarget;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Elements that never receive a closing tag.
const VOID_ELEMENTS: [&str; 7] = ["br", "hr", "img", "input", "param", "meta", "link"];

/// Check whether `tag` is rendered without a closing tag.
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Attribute value in a tag descriptor.
///
/// ```toml
/// attrs = { src = "https://cdn/vue.js", defer = true, crossorigin = false }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Flag(bool),
    Text(String),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// One HTML element to emit.
///
/// `inject_to` is only meaningful on a module's own tag, where it overrides
/// both the module-level and the config-level target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagDescriptor {
    pub tag: String,

    /// Rendered in insertion order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attrs: IndexMap<String, AttrValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TagDescriptor>>,

    #[serde(
        default,
        alias = "injectTo",
        rename(serialize = "injectTo"),
        skip_serializing_if = "Option::is_none"
    )]
    pub inject_to: Option<InjectTarget>,
}

impl TagDescriptor {
    /// Bare element with no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: IndexMap::new(),
            children: None,
            inject_to: None,
        }
    }

    /// Append an attribute, keeping insertion order.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn child(mut self, child: TagDescriptor) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// `<script type="text/javascript" src="...">` for a module bound to a global.
    pub fn script(src: &str) -> Self {
        Self::new("script")
            .attr("type", "text/javascript")
            .attr("src", src)
    }

    /// `<link rel="stylesheet" href="...">` for a module without a global.
    pub fn stylesheet(href: &str) -> Self {
        Self::new("link").attr("rel", "stylesheet").attr("href", href)
    }

    /// Whether this tag is grouped with stylesheets when ordering a bucket.
    #[inline]
    pub fn is_stylesheet(&self) -> bool {
        self.tag == "link"
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render something into HTML markup.
///
/// Implemented for a single descriptor, a slice of descriptors (concatenated
/// without separator) and a bare tag name.
pub trait Render {
    fn render_into(&self, out: &mut String);

    fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }
}

impl Render for TagDescriptor {
    fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            match value {
                AttrValue::Flag(true) => {}
                AttrValue::Flag(false) => out.push_str("=\"false\""),
                AttrValue::Text(text) => {
                    out.push_str("=\"");
                    out.push_str(text);
                    out.push('"');
                }
            }
        }
        out.push('>');

        if let Some(children) = &self.children {
            children.render_into(out);
        }

        if !is_void_element(&self.tag) {
            out.push_str("</");
            out.push_str(&self.tag);
            out.push('>');
        }
    }
}

impl Render for [TagDescriptor] {
    fn render_into(&self, out: &mut String) {
        for tag in self {
            tag.render_into(out);
        }
    }
}

impl Render for Vec<TagDescriptor> {
    fn render_into(&self, out: &mut String) {
        self.as_slice().render_into(out);
    }
}

impl Render for str {
    fn render_into(&self, out: &mut String) {
        TagDescriptor::new(self).render_into(out);
    }
}

// ============================================================================
// Tests
// ============================================================================
