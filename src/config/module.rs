//! Module entries, inject targets and the activation command.
//!
//! Raw [`ModuleEntry`] values mirror what the user writes. They are checked
//! once by [`ModuleEntry::validate`] and turned into the closed
//! [`ExternalModule`] enum that the planner works with.

use super::error::ConfigWarning;
use crate::html::TagDescriptor;
use crate::log;
use crate::plan::globals::{GlobalBinding, ModuleImport};
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ============================================================================
// Inject targets
// ============================================================================

/// One of the four document positions the host can insert tags at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Location {
    /// End of `<head>`.
    Head,
    /// Start of `<head>` (default).
    #[default]
    HeadPrepend,
    /// End of `<body>`.
    Body,
    /// Start of `<body>`.
    BodyPrepend,
}

impl Location {
    pub const ALL: [Location; 4] = [
        Location::Head,
        Location::HeadPrepend,
        Location::Body,
        Location::BodyPrepend,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Location::Head => "head",
            Location::HeadPrepend => "head-prepend",
            Location::Body => "body",
            Location::BodyPrepend => "body-prepend",
        }
    }

    /// Exact, case-sensitive token match.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|loc| loc.as_str() == token)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a module's tag ends up.
///
/// Any string other than the four location tokens is a literal placeholder
/// that gets replaced in the HTML text.
///
/// ```toml
/// inject_to = "body"
/// inject_to = "<!-- cdn externals -->"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InjectTarget {
    Structural(Location),
    Placeholder(String),
}

impl InjectTarget {
    /// An empty placeholder counts as "not set".
    pub fn non_empty(self) -> Option<Self> {
        match &self {
            InjectTarget::Placeholder(text) if text.is_empty() => None,
            _ => Some(self),
        }
    }
}

impl Default for InjectTarget {
    fn default() -> Self {
        InjectTarget::Structural(Location::default())
    }
}

impl From<String> for InjectTarget {
    fn from(value: String) -> Self {
        match Location::from_token(&value) {
            Some(location) => InjectTarget::Structural(location),
            None => InjectTarget::Placeholder(value),
        }
    }
}

impl From<&str> for InjectTarget {
    fn from(value: &str) -> Self {
        value.to_owned().into()
    }
}

impl From<Location> for InjectTarget {
    fn from(value: Location) -> Self {
        InjectTarget::Structural(value)
    }
}

impl From<InjectTarget> for String {
    fn from(value: InjectTarget) -> Self {
        match value {
            InjectTarget::Structural(location) => location.as_str().to_owned(),
            InjectTarget::Placeholder(text) => text,
        }
    }
}

// ============================================================================
// Activation command
// ============================================================================

/// Which host commands receive structural tags.
///
/// Written as `command = "build"` or `command = true` (build or serve).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActivationCommand {
    #[default]
    Build,
    Always,
}

impl<'de> Deserialize<'de> for ActivationCommand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawCommand {
            Flag(bool),
            Name(String),
        }

        Ok(match RawCommand::deserialize(deserializer)? {
            RawCommand::Flag(true) => ActivationCommand::Always,
            RawCommand::Flag(false) => ActivationCommand::Build,
            RawCommand::Name(name) => {
                if name != "build" {
                    log!("warn"; "unknown command `{name}`, falling back to `build`");
                }
                ActivationCommand::Build
            }
        })
    }
}

impl Serialize for ActivationCommand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ActivationCommand::Build => serializer.serialize_str("build"),
            ActivationCommand::Always => serializer.serialize_bool(true),
        }
    }
}

// ============================================================================
// Module entries
// ============================================================================

/// One external dependency as written in the config.
///
/// # Formats
/// ```toml
/// # Script bound to a global
/// [[modules]]
/// name = "vue"
/// global = "Vue"
/// path = "https://unpkg.com/vue@3/dist/vue.global.prod.js"
///
/// # Stylesheet (no global)
/// [[modules]]
/// path = "https://unpkg.com/element-plus/dist/index.css"
///
/// # Explicit tag at a placeholder
/// [[modules]]
/// inject_to = "<!-- externals -->"
/// tag = { tag = "script", attrs = { src = "https://cdn/a.js", defer = true } }
///
/// # Only rewrite the import, emit nothing
/// [[modules]]
/// name = "axios"
/// global = "axios"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleEntry {
    /// Import specifier (`import x from "<name>"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Global variable the import resolves to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global: Option<String>,

    /// CDN URL, rendered as a `<script>` or `<link>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Explicit tag, used instead of one synthesized from `path`.
    #[serde(alias = "htmlTag", skip_serializing_if = "Option::is_none")]
    pub tag: Option<TagDescriptor>,

    #[serde(alias = "injectTo", skip_serializing_if = "Option::is_none")]
    pub inject_to: Option<InjectTarget>,

    /// Set when the entry in the list couldn't be parsed at all.
    #[serde(skip)]
    pub malformed: bool,
}

/// Validated module: exactly one way of producing markup, or none.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalModule {
    /// Markup synthesized from a CDN path.
    Path {
        import: Option<ModuleImport>,
        path: String,
        inject_to: Option<InjectTarget>,
    },
    /// Markup given as an explicit tag.
    Tag {
        import: Option<ModuleImport>,
        tag: TagDescriptor,
        inject_to: Option<InjectTarget>,
    },
    /// Contributes to the globals table only.
    GlobalsOnly { import: ModuleImport },
}

/// Outcome of validating one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub module: Option<ExternalModule>,
    pub warning: Option<ConfigWarning>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl ModuleEntry {
    /// Check this entry and convert it. `index` is only used in diagnostics.
    ///
    /// Never fails: anomalies come back as a warning, and an entry with
    /// nothing usable yields no module.
    pub fn validate(self, index: usize) -> Validated {
        if self.malformed {
            return Validated {
                module: None,
                warning: Some(ConfigWarning::MalformedEntry { index }),
            };
        }

        let global = non_empty(self.global);
        let import = non_empty(self.name).map(|name| ModuleImport {
            name,
            binding: global.map_or(GlobalBinding::Strip, GlobalBinding::Variable),
        });
        let path = non_empty(self.path);
        let inject_to = self.inject_to.and_then(InjectTarget::non_empty);

        let (module, warning) = match (self.tag, path, import) {
            (Some(tag), path, import) => (
                Some(ExternalModule::Tag {
                    import,
                    tag,
                    inject_to,
                }),
                path.map(|path| ConfigWarning::PathShadowed { index, path }),
            ),
            (None, Some(path), import) => (
                Some(ExternalModule::Path {
                    import,
                    path,
                    inject_to,
                }),
                None,
            ),
            (None, None, Some(import)) => {
                let warning = inject_to.is_some().then(|| ConfigWarning::NoMarkup {
                    index,
                    name: import.name.clone(),
                });
                (Some(ExternalModule::GlobalsOnly { import }), warning)
            }
            (None, None, None) => (None, Some(ConfigWarning::Empty { index })),
        };

        Validated { module, warning }
    }
}

impl ExternalModule {
    pub fn import(&self) -> Option<&ModuleImport> {
        match self {
            ExternalModule::Path { import, .. } | ExternalModule::Tag { import, .. } => {
                import.as_ref()
            }
            ExternalModule::GlobalsOnly { import } => Some(import),
        }
    }

    /// Module-level target, if this module produces markup at all.
    pub fn inject_to(&self) -> Option<&InjectTarget> {
        match self {
            ExternalModule::Path { inject_to, .. } | ExternalModule::Tag { inject_to, .. } => {
                inject_to.as_ref()
            }
            ExternalModule::GlobalsOnly { .. } => None,
        }
    }
}

// ============================================================================
// Lenient module list
// ============================================================================

/// Stand-in for a list element that failed to parse, kept so later entries
/// keep their index.
fn malformed_entry() -> ModuleEntry {
    ModuleEntry {
        malformed: true,
        ..Default::default()
    }
}

/// List element: a module entry, or anything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum ModuleSlot {
    Valid(ModuleEntry),
    Invalid(IgnoredAny),
}

/// Deserialize `modules`, treating anything but a sequence as empty.
///
/// Elements that aren't valid entries are kept as malformed placeholders and
/// reported during classification.
pub(super) fn module_list<'de, D>(deserializer: D) -> Result<Vec<ModuleEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ModuleListVisitor)
}

struct ModuleListVisitor;

impl ModuleListVisitor {
    fn malformed<E: de::Error>(self) -> Result<Vec<ModuleEntry>, E> {
        log!("warn"; "{}", ConfigWarning::MalformedModuleList);
        Ok(Vec::new())
    }
}

impl<'de> Visitor<'de> for ModuleListVisitor {
    type Value = Vec<ModuleEntry>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of modules")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut modules = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(slot) = seq.next_element::<ModuleSlot>()? {
            modules.push(match slot {
                ModuleSlot::Valid(entry) => entry,
                ModuleSlot::Invalid(_) => malformed_entry(),
            });
        }
        Ok(modules)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        self.malformed()
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        self.malformed()
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        self.malformed()
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        self.malformed()
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        self.malformed()
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
        self.malformed()
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        self.malformed()
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        self.malformed()
    }
}

// ============================================================================
// Tests
// ============================================================================
