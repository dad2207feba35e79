//! CLI argument parsing using clap.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Typed route generation for app-directory projects
#[derive(Parser, Debug)]
#[command(
    name = "routegen",
    version = env!("CARGO_PKG_VERSION"),
    about = "Typed route generation for app-directory projects",
    long_about = "Discover page routes under the app directory, write a typed route \
                  declaration and a link helper, and optionally keep them in sync while \
                  pages are added or removed.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set up .routegen directory with default settings
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Display active settings
    Config,

    /// Generate the route declaration and link helper
    #[command(
        after_help = "Examples:\n  routegen generate\n  routegen generate --watch\n  routegen generate --app-dir app"
    )]
    Generate {
        /// Keep watching the app directory and regenerate on added or removed pages
        #[arg(short, long)]
        watch: bool,

        /// App directory to scan (overrides config)
        #[arg(long)]
        app_dir: Option<PathBuf>,
    },

    /// Print the discovered route map
    Routes {
        /// App directory to scan (overrides config)
        #[arg(long)]
        app_dir: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build an href for a route
    #[command(
        after_help = "Examples:\n  routegen link /about\n  routegen link /blog/[slug] -p slug=hello -q page=2 --hash top"
    )]
    Link {
        /// Route key, e.g. /blog/[slug]
        route: String,

        /// Route parameter as name=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_parser = parse_key_value)]
        query: Vec<(String, String)>,

        /// Fragment appended after '#'
        #[arg(long)]
        hash: Option<String>,

        /// App directory to scan (overrides config)
        #[arg(long)]
        app_dir: Option<PathBuf>,
    },
}

/// Parse a `key=value` argument.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}
