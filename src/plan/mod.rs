//! Injection planning.
//!
//! The plan is computed once from the config and reused for every HTML
//! document the host processes:
//!
//! - [`classify`]: validate modules and split them by target
//! - [`globals`]: module name → global variable table
//! - [`InjectionPlan`]: rendered placeholder markup plus structural tags
//!
//! Inside every bucket `<link>` tags come first, most recently declared
//! first, followed by everything else in declaration order.

pub mod classify;
pub mod globals;

pub use classify::{Classification, classify};
pub use globals::{GlobalBinding, GlobalsMap, ModuleImport};

use crate::config::{ConfigWarning, ExternalModule, ExternalsConfig, Location};
use crate::html::{AttrValue, Render, TagDescriptor};
use crate::log;
use indexmap::IndexMap;
use serde::Serialize;

/// Tag handed to the host for insertion at a fixed document position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralTag {
    pub tag: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub attrs: IndexMap<String, AttrValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TagDescriptor>>,
    pub inject_to: Location,
}

impl StructuralTag {
    fn new(descriptor: TagDescriptor, inject_to: Location) -> Self {
        Self {
            tag: descriptor.tag,
            attrs: descriptor.attrs,
            children: descriptor.children,
            inject_to,
        }
    }

    /// The tag without its position, e.g. for rendering.
    pub fn descriptor(&self) -> TagDescriptor {
        TagDescriptor {
            tag: self.tag.clone(),
            attrs: self.attrs.clone(),
            children: self.children.clone(),
            inject_to: None,
        }
    }
}

/// Resolved output of the config: what to rewrite and what to inject where.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InjectionPlan {
    /// Consumed by the host's externals rewrite.
    pub globals: GlobalsMap,
    /// Placeholder literal → rendered tags, in bucket order.
    pub placeholders: IndexMap<String, Vec<String>>,
    /// Tags for the host's own insertion, in bucket order.
    pub tags: Vec<StructuralTag>,
    #[serde(skip)]
    pub warnings: Vec<ConfigWarning>,
}

impl InjectionPlan {
    /// Classify the configured modules and plan their injection.
    pub fn new(config: ExternalsConfig) -> Self {
        let default = config.default_target();
        Self::from_classification(classify(config.modules, &default))
    }

    pub fn from_classification(classification: Classification) -> Self {
        let Classification {
            globals,
            structural,
            placeholder,
            warnings,
        } = classification;

        let placeholders = placeholder
            .into_iter()
            .filter_map(|item| Some((item.placeholder, resolve_tag(&item.module)?)))
            .fold(IndexMap::<String, Vec<_>>::new(), |mut buckets, (key, tag)| {
                buckets
                    .entry(key)
                    .or_default()
                    .push((tag.is_stylesheet(), tag.render()));
                buckets
            })
            .into_iter()
            .map(|(key, bucket)| (key, stylesheets_first(bucket)))
            .collect();

        let tags = stylesheets_first(structural.into_iter().filter_map(|item| {
            let tag = resolve_tag(&item.module)?;
            Some((tag.is_stylesheet(), StructuralTag::new(tag, item.location)))
        }));

        let plan = Self {
            globals,
            placeholders,
            tags,
            warnings,
        };
        log!(
            "plan";
            "{} globals, {} structural tags, {} placeholders",
            plan.globals.len(),
            plan.tags.len(),
            plan.placeholders.len()
        );
        plan
    }
}

/// The tag a module emits.
///
/// An explicit tag is used as is. A path becomes a `<script>` when the module
/// is bound to a global, otherwise a stylesheet `<link>`.
pub fn resolve_tag(module: &ExternalModule) -> Option<TagDescriptor> {
    match module {
        ExternalModule::Tag { tag, .. } => Some(TagDescriptor {
            inject_to: None,
            ..tag.clone()
        }),
        ExternalModule::Path { import, path, .. } => {
            let is_script = import
                .as_ref()
                .is_some_and(|import| import.binding.variable().is_some());
            Some(if is_script {
                TagDescriptor::script(path)
            } else {
                TagDescriptor::stylesheet(path)
            })
        }
        ExternalModule::GlobalsOnly { .. } => None,
    }
}

/// Stylesheets first in reverse declaration order, then the rest in order.
fn stylesheets_first<T>(items: impl IntoIterator<Item = (bool, T)>) -> Vec<T> {
    let (styles, rest): (Vec<_>, Vec<_>) = items.into_iter().partition(|(is_style, _)| *is_style);
    styles
        .into_iter()
        .rev()
        .chain(rest)
        .map(|(_, item)| item)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InjectTarget, ModuleEntry};

    fn script(name: &str, path: &str, inject_to: Option<&str>) -> ModuleEntry {
        ModuleEntry {
            name: Some(name.into()),
            global: Some(name.to_uppercase()),
            path: Some(path.into()),
            inject_to: inject_to.map(Into::into),
            ..Default::default()
        }
    }

    fn style(path: &str, inject_to: Option<&str>) -> ModuleEntry {
        ModuleEntry {
            path: Some(path.into()),
            inject_to: inject_to.map(Into::into),
            ..Default::default()
        }
    }

    fn plan(modules: Vec<ModuleEntry>) -> InjectionPlan {
        InjectionPlan::new(ExternalsConfig {
            modules,
            ..Default::default()
        })
    }

    fn hrefs(plan: &InjectionPlan) -> Vec<String> {
        plan.tags
            .iter()
            .filter_map(|tag| match tag.attrs.get("href").or_else(|| tag.attrs.get("src")) {
                Some(AttrValue::Text(url)) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_stylesheets_first_ordering() {
        let ordered = stylesheets_first([(false, 1), (true, 2), (false, 3), (true, 4)]);
        assert_eq!(ordered, vec![4, 2, 1, 3]);
    }

    #[test]
    fn test_structural_order() {
        let result = plan(vec![
            script("a", "/a.js", None),
            style("/a.css", None),
            script("b", "/b.js", None),
            style("/b.css", None),
        ]);
        assert_eq!(hrefs(&result), ["/b.css", "/a.css", "/a.js", "/b.js"]);
    }

    #[test]
    fn test_structural_tags_keep_location() {
        let result = plan(vec![
            script("a", "/a.js", Some("body")),
            style("/a.css", Some("head")),
        ]);
        assert_eq!(result.tags[0].inject_to, Location::Head);
        assert_eq!(result.tags[1].inject_to, Location::Body);
        assert!(result.tags.iter().all(|tag| tag.inject_to != Location::HeadPrepend));
    }

    #[test]
    fn test_placeholder_buckets() {
        let result = plan(vec![
            script("a", "/a.js", Some("<!-- js -->")),
            style("/a.css", Some("<!-- css -->")),
            script("b", "/b.js", Some("<!-- js -->")),
            style("/b.css", Some("<!-- css -->")),
        ]);
        assert!(result.tags.is_empty());
        assert_eq!(
            result.placeholders.keys().collect::<Vec<_>>(),
            ["<!-- js -->", "<!-- css -->"]
        );
        assert_eq!(
            result.placeholders["<!-- js -->"],
            [
                r#"<script type="text/javascript" src="/a.js"></script>"#,
                r#"<script type="text/javascript" src="/b.js"></script>"#,
            ]
        );
        assert_eq!(
            result.placeholders["<!-- css -->"],
            [
                r#"<link rel="stylesheet" href="/b.css">"#,
                r#"<link rel="stylesheet" href="/a.css">"#,
            ]
        );
    }

    #[test]
    fn test_explicit_tag_is_used_without_target() {
        let mut tag = TagDescriptor::new("script").attr("src", "/x.js").attr("defer", true);
        tag.inject_to = Some("body".into());
        let result = plan(vec![ModuleEntry {
            tag: Some(tag),
            ..Default::default()
        }]);
        assert_eq!(result.tags.len(), 1);
        assert_eq!(result.tags[0].inject_to, Location::Body);
        assert_eq!(
            result.tags[0].descriptor().render(),
            r#"<script src="/x.js" defer></script>"#
        );
    }

    #[test]
    fn test_explicit_link_tag_counts_as_stylesheet() {
        let preload = TagDescriptor::new("link").attr("rel", "preload").attr("href", "/p.js");
        let result = plan(vec![
            script("a", "/a.js", None),
            ModuleEntry {
                tag: Some(preload),
                ..Default::default()
            },
        ]);
        assert_eq!(result.tags[0].tag, "link");
        assert_eq!(result.tags[1].tag, "script");
    }

    #[test]
    fn test_name_without_global_renders_stylesheet() {
        let result = plan(vec![ModuleEntry {
            name: Some("element-plus/dist/index.css".into()),
            path: Some("https://cdn/ep.css".into()),
            ..Default::default()
        }]);
        assert_eq!(result.tags[0].tag, "link");
        assert_eq!(result.globals["element-plus/dist/index.css"], GlobalBinding::Strip);
    }

    #[test]
    fn test_default_placeholder_target() {
        let result = InjectionPlan::new(ExternalsConfig {
            inject_to: InjectTarget::from("<!-- cdn -->"),
            modules: vec![script("vue", "/vue.js", None)],
            ..Default::default()
        });
        assert!(result.tags.is_empty());
        assert_eq!(result.placeholders["<!-- cdn -->"].len(), 1);
    }

    #[test]
    fn test_structural_tag_serialization() {
        let result = plan(vec![script("vue", "https://cdn/vue.js", None)]);
        let json = serde_json::to_value(&result.tags).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "tag": "script",
                "attrs": {"type": "text/javascript", "src": "https://cdn/vue.js"},
                "injectTo": "head-prepend"
            }])
        );
    }
}
