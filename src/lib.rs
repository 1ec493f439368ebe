//! Inject-externals - resolve CDN externals into a globals table and the
//! `<script>`/`<link>` tags that load them.
//!
//! ```ignore
//! let config = ExternalsConfig::from_path(Path::new("externals.toml"))?;
//! let plugin = InjectExternals::new(config);
//! let session = plugin.session(HostCommand::Build);
//! let overrides = session.build_overrides();
//! let output = session.transform_index_html(&html);
//! ```

pub mod config;
pub mod html;
pub mod logger;
pub mod plan;
pub mod plugin;

pub use config::ExternalsConfig;
pub use plan::InjectionPlan;
pub use plugin::{HostCommand, HtmlTransform, InjectExternals, Session};
