//! inject-externals - resolve CDN externals and inject their tags into html.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use inject_externals::plan::StructuralTag;
use inject_externals::{ExternalsConfig, HostCommand, InjectExternals, log};
use serde::Serialize;
use std::{fs, path::Path};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let plugin = InjectExternals::new(load_config(&cli.config)?);

    match &cli.command {
        Commands::Plan => print_json(plugin.plan()),
        Commands::Globals { host } => print_json(&plugin.session(*host).build_overrides()),
        Commands::Inject { html, host, output } => {
            inject(&plugin, html, *host, output.as_deref())
        }
    }
}

/// Load the config file, falling back to defaults when it doesn't exist.
fn load_config(path: &Path) -> Result<ExternalsConfig> {
    if !path.exists() {
        log!("warn"; "`{}` not found, using an empty config", path.display());
        return Ok(ExternalsConfig::default());
    }
    ExternalsConfig::from_path(path)
        .with_context(|| format!("failed to load `{}`", path.display()))
}

/// Run the document transform on one html file.
fn inject(
    plugin: &InjectExternals,
    input: &Path,
    host: HostCommand,
    output: Option<&Path>,
) -> Result<()> {
    let html = fs::read_to_string(input)
        .with_context(|| format!("failed to read `{}`", input.display()))?;
    let result = plugin.session(host).transform_index_html(&html);

    match output {
        Some(output) => {
            fs::write(output, result.html())
                .with_context(|| format!("failed to write `{}`", output.display()))?;
            log!(
                "inject";
                "{} -> {} ({} structural tags)",
                input.display(),
                output.display(),
                result.tags().len()
            );
            print_json(&result.tags())
        }
        None => print_json(&InjectOutput {
            html: result.html(),
            tags: result.tags(),
        }),
    }
}

#[derive(Serialize)]
struct InjectOutput<'a> {
    html: &'a str,
    tags: &'a [StructuralTag],
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
