//! Host-facing plugin surface.
//!
//! [`InjectExternals`] owns the plan built from the config. Each host run
//! opens a [`Session`] for the command it reports; the session answers the
//! two hooks a bundler asks for:
//!
//! - [`Session::build_overrides`]: the externals rewrite, only for `build`
//! - [`Session::transform_index_html`]: placeholder splicing (always) plus
//!   structural tags (only while the activation gate is open)

use crate::config::{ActivationCommand, ExternalsConfig};
use crate::html::splice;
use crate::log;
use crate::plan::{GlobalsMap, InjectionPlan, StructuralTag};
use serde::Serialize;
use std::fmt;

/// Command the host reports for the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HostCommand {
    Build,
    Serve,
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HostCommand::Build => "build",
            HostCommand::Serve => "serve",
        })
    }
}

/// Whether structural tags are handed to the host.
pub const fn gate_open(declared: ActivationCommand, host: HostCommand) -> bool {
    matches!(
        (declared, host),
        (ActivationCommand::Always, _) | (_, HostCommand::Build)
    )
}

/// Partial build configuration returned from the config hook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOverrides<'a> {
    /// Parameter for the host's external-globals rewrite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_globals: Option<&'a GlobalsMap>,
}

/// Result of the document transform hook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HtmlTransform<'a> {
    /// Gate closed: HTML only.
    Html(String),
    /// Gate open: HTML plus tags for the host to insert.
    WithTags {
        html: String,
        tags: &'a [StructuralTag],
    },
}

impl HtmlTransform<'_> {
    pub fn html(&self) -> &str {
        match self {
            HtmlTransform::Html(html) | HtmlTransform::WithTags { html, .. } => html,
        }
    }

    pub fn tags(&self) -> &[StructuralTag] {
        match self {
            HtmlTransform::Html(_) => &[],
            HtmlTransform::WithTags { tags, .. } => tags,
        }
    }
}

/// Plugin instance: the plan is built once and only read afterwards.
#[derive(Debug, Clone)]
pub struct InjectExternals {
    command: ActivationCommand,
    plan: InjectionPlan,
}

impl InjectExternals {
    pub fn new(config: ExternalsConfig) -> Self {
        let command = config.command;
        Self {
            command,
            plan: InjectionPlan::new(config),
        }
    }

    pub fn plan(&self) -> &InjectionPlan {
        &self.plan
    }

    /// Open a session for the command the host reports.
    pub fn session(&self, host: HostCommand) -> Session<'_> {
        let can_inject = gate_open(self.command, host);
        if !can_inject {
            log!("inject"; "structural tags disabled for `{host}`");
        }
        Session {
            plan: &self.plan,
            host,
            can_inject,
        }
    }
}

/// One host run. Borrows the plan; holds no mutable state.
#[derive(Debug, Clone, Copy)]
pub struct Session<'a> {
    plan: &'a InjectionPlan,
    host: HostCommand,
    can_inject: bool,
}

impl<'a> Session<'a> {
    pub fn can_inject(&self) -> bool {
        self.can_inject
    }

    /// Config hook: the externals rewrite applies to `build` only.
    pub fn build_overrides(&self) -> BuildOverrides<'a> {
        BuildOverrides {
            external_globals: (self.host == HostCommand::Build).then_some(&self.plan.globals),
        }
    }

    /// Document hook. Placeholders are spliced regardless of the gate.
    pub fn transform_index_html(&self, html: &str) -> HtmlTransform<'a> {
        let html = splice(html, &self.plan.placeholders);
        if self.can_inject {
            HtmlTransform::WithTags {
                html,
                tags: &self.plan.tags,
            }
        } else {
            HtmlTransform::Html(html)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InjectTarget, ModuleEntry};

    fn config(command: ActivationCommand) -> ExternalsConfig {
        ExternalsConfig {
            command,
            inject_to: InjectTarget::default(),
            modules: vec![
                ModuleEntry {
                    name: Some("vue".into()),
                    global: Some("Vue".into()),
                    path: Some("https://cdn/vue.js".into()),
                    ..Default::default()
                },
                ModuleEntry {
                    path: Some("https://cdn/app.css".into()),
                    inject_to: Some("<!-- css -->".into()),
                    ..Default::default()
                },
            ],
        }
    }

    const HTML: &str = "<head>\n  <!-- css -->\n</head>";
    const SPLICED: &str = concat!(
        "<head>\n",
        "  <link rel=\"stylesheet\" href=\"https://cdn/app.css\">\n",
        "</head>",
    );

    #[test]
    fn test_gate_truth_table() {
        assert!(gate_open(ActivationCommand::Build, HostCommand::Build));
        assert!(!gate_open(ActivationCommand::Build, HostCommand::Serve));
        assert!(gate_open(ActivationCommand::Always, HostCommand::Build));
        assert!(gate_open(ActivationCommand::Always, HostCommand::Serve));
    }

    #[test]
    fn test_build_session_injects() {
        let plugin = InjectExternals::new(config(ActivationCommand::Build));
        let session = plugin.session(HostCommand::Build);
        let result = session.transform_index_html(HTML);
        assert_eq!(result.html(), SPLICED);
        assert_eq!(result.tags().len(), 1);
        assert_eq!(result.tags()[0].tag, "script");
    }

    #[test]
    fn test_serve_session_splices_without_tags() {
        let plugin = InjectExternals::new(config(ActivationCommand::Build));
        let session = plugin.session(HostCommand::Serve);
        assert!(!session.can_inject());
        let result = session.transform_index_html(HTML);
        assert_eq!(result, HtmlTransform::Html(SPLICED.to_string()));
        assert!(result.tags().is_empty());
        assert_eq!(plugin.plan().globals.len(), 1);
    }

    #[test]
    fn test_always_injects_on_serve() {
        let plugin = InjectExternals::new(config(ActivationCommand::Always));
        let result = plugin.session(HostCommand::Serve).transform_index_html(HTML);
        assert_eq!(result.tags().len(), 1);
    }

    #[test]
    fn test_build_overrides_only_for_build() {
        let plugin = InjectExternals::new(config(ActivationCommand::Always));
        let build = plugin.session(HostCommand::Build).build_overrides();
        assert_eq!(build.external_globals.map(|g| g.len()), Some(1));
        assert_eq!(plugin.session(HostCommand::Serve).build_overrides().external_globals, None);
    }

    #[test]
    fn test_plan_reused_across_documents() {
        let plugin = InjectExternals::new(config(ActivationCommand::Build));
        let session = plugin.session(HostCommand::Build);
        let first = session.transform_index_html(HTML);
        let second = session.transform_index_html("<body><!-- css --></body>");
        assert_eq!(first.html(), SPLICED);
        assert_eq!(
            second.html(),
            "<body><link rel=\"stylesheet\" href=\"https://cdn/app.css\"></body>"
        );
        assert_eq!(first.tags(), second.tags());
    }

    #[test]
    fn test_transform_serialization() {
        let plugin = InjectExternals::new(config(ActivationCommand::Build));
        let serve = plugin.session(HostCommand::Serve).transform_index_html("<p></p>");
        assert_eq!(serde_json::to_string(&serve).unwrap(), "\"<p></p>\"");

        let build = plugin.session(HostCommand::Build).build_overrides();
        assert_eq!(
            serde_json::to_string(&build).unwrap(),
            r#"{"externalGlobals":{"vue":"Vue"}}"#
        );
    }
}
