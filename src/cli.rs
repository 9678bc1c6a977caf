//! CLI definitions for Qwikipedia.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Qwikipedia CLI.
#[derive(Parser)]
#[command(name = "qwikipedia")]
#[command(about = "Wiki-style markdown encyclopedia")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (defaults to the user config directory)
    #[arg(short, long, global = true, env = "QWIKIPEDIA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the web server (default)
    Serve(ServeArgs),

    /// Write the default configuration file and create the entries directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Print every entry title
    List,
}

#[derive(Args, Default)]
pub(crate) struct ServeArgs {
    /// Address to listen on
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Directory holding the entry files
    #[arg(long)]
    pub entries: Option<PathBuf>,
}
