//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use inject_externals::HostCommand;
use inject_externals::config::defaults;
use std::path::PathBuf;

/// Inject CDN externals into generated html
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Config file (`.toml` or `.json`)
    #[arg(short = 'C', long, default_value = defaults::config_file())]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the resolved plan (globals, placeholder markup, structural tags) as JSON
    Plan,

    /// Print the build overrides the host receives for a command
    Globals {
        /// Command the host is running
        #[arg(long, value_enum, default_value_t = HostCommand::Build)]
        host: HostCommand,
    },

    /// Transform an html document
    Inject {
        /// Input html file
        html: PathBuf,

        /// Command the host is running
        #[arg(long, value_enum, default_value_t = HostCommand::Build)]
        host: HostCommand,

        /// Write the html here and print only the structural tags
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_plan(&self) -> bool {
        matches!(self.command, Commands::Plan)
    }
    pub const fn is_inject(&self) -> bool {
        matches!(self.command, Commands::Inject { .. })
    }
}
