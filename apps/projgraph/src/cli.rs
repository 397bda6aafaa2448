//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "projgraph",
    version,
    about = "Validate project dependency graphs and resolve build settings",
    long_about = "projgraph — lint a workspace's project/target dependency graph and resolve layered build settings before project generation.\n\nConfiguration precedence: CLI > projgraph.toml > defaults.",
    after_help = "Examples:\n  projgraph lint --manifest workspace.toml\n  projgraph lint --output json\n  projgraph settings --project App --target App --configuration Debug",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands for linting and settings resolution.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current projgraph version.")]
    Version,
    /// Lint the dependency graph
    #[command(
        about = "Run graph lint checks",
        long_about = "Load the workspace manifest, build the dependency graph, and report link, configuration, and bundle identifier issues. Any error exits non-zero.",
        after_help = "Examples:\n  projgraph lint\n  projgraph lint --manifest Workspace.yaml --output json"
    )]
    Lint {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Path to the workspace manifest (default: workspace.toml)")]
        manifest: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Resolve build settings for a target
    #[command(
        about = "Print resolved build settings",
        long_about = "Merge project and target settings (xcconfig files, base, per-configuration overrides) into the effective table for each configuration.",
        after_help = "Examples:\n  projgraph settings --project App --target App\n  projgraph settings --project App --target App --configuration Release --output json"
    )]
    Settings {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Path to the workspace manifest (default: workspace.toml)")]
        manifest: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Project name")]
        project: String,
        #[arg(long, help = "Target name (omit for project-level settings)")]
        target: Option<String>,
        #[arg(long, help = "Only this configuration (case-insensitive)")]
        configuration: Option<String>,
    },
}
