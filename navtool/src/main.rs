use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::info;
use navtool::{
    report::{level_counts, render_active_path, render_tree},
    request::{CurrentOverride, build_request},
};
use navtree::{NavConfig, NavigationTree};

/// Inspect navtree navigation files.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a navigation file against a simulated request.
    Resolve {
        /// Navigation file (`.toml` or `.json`).
        nav: PathBuf,
        /// Request path.
        #[arg(short, long, default_value = "/")]
        path: String,
        /// Request method.
        #[arg(short, long)]
        method: Option<String>,
        /// Request query string.
        #[arg(short, long)]
        query: Option<String>,
        /// Navigation config file (`.toml` or `.json`).
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Current key override for a level, as `LEVEL=KEY`.
        #[arg(long = "current", value_name = "LEVEL=KEY")]
        current: Vec<CurrentOverride>,
        /// Print the active path as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Validate a navigation file.
    Check {
        /// Navigation file (`.toml` or `.json`).
        nav: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Resolve {
            nav,
            path,
            method,
            query,
            config,
            current,
            json,
        } => {
            let config = match config {
                Some(path) => NavConfig::load(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => NavConfig::default(),
            };
            let tree = load_tree(&nav, config)?;
            let request = build_request(&path, method.as_deref(), query.as_deref())?;

            let mut pass = tree.resolve(&request);
            for o in current {
                pass = pass.with_current_key(o.level, o.key);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&pass.snapshot())?);
            } else {
                print!("{}", render_tree(&pass));
                println!("\n{} {}", "active:".bold(), render_active_path(&pass));
            }
        }
        Command::Check { nav } => {
            let tree = load_tree(&nav, NavConfig::default())?;
            for (idx, count) in level_counts(&tree).iter().enumerate() {
                println!("level {}: {count} items", idx + 1);
            }
            println!("{} {}", "ok".green().bold(), nav.display());
        }
    }

    Ok(())
}

fn load_tree(nav: &Path, config: NavConfig) -> Result<NavigationTree> {
    info!("loading navigation from {}", nav.display());
    NavigationTree::load(nav, Arc::new(config))
        .with_context(|| format!("Failed to load navigation {}", nav.display()))
}
