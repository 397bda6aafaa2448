//! projgraph CLI binary entry point.
//! Delegates to the library for loading, linting, and settings resolution
//! and prints results.

use clap::Parser;
use projgraph::cli::{Cli, Commands};
use projgraph::config::{self, Effective};
use projgraph::env::{
    FixedToolchain, LocalFileSystem, Toolchain, Version, XcconfigReader, XcodeSelect,
};
use projgraph::error::{Error, Result};
use projgraph::lint::project::StructureLinter;
use projgraph::lint::{GraphLinter, LintOptions};
use projgraph::settings::SettingsResolver;
use projgraph::utils::{error_prefix, info_prefix, note_prefix};
use projgraph::{loader, output};
use std::collections::BTreeMap;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", error_prefix(), err);
    std::process::exit(2);
}

fn resolve(
    repo_root: Option<String>,
    manifest: Option<String>,
    output: Option<String>,
) -> Effective {
    let eff = config::resolve_effective(
        repo_root.as_deref(),
        manifest.as_deref(),
        output.as_deref(),
    );
    // Friendly note if no projgraph config was found
    if !eff.config_found {
        eprintln!(
            "{} {}",
            note_prefix(),
            "No projgraph.toml found; using defaults."
        );
    }
    eff
}

fn toolchain(eff: &Effective) -> Result<Box<dyn Toolchain>> {
    match eff.toolchain_version.as_deref() {
        Some(v) => {
            let version: Version = v.parse()?;
            if eff.output != "json" {
                eprintln!(
                    "{} {}",
                    info_prefix(),
                    format!("Using configured toolchain version {version}")
                );
            }
            Ok(Box::new(FixedToolchain(Some(version))))
        }
        None => Ok(Box::new(XcodeSelect)),
    }
}

fn run_lint(eff: &Effective) -> Result<bool> {
    let graph = loader::load_graph(&eff.manifest, &eff.fetch_marker)?;
    let toolchain = toolchain(eff)?;
    let fs = LocalFileSystem;
    let project_linter = StructureLinter::new(&fs);
    let options = LintOptions {
        min_package_toolchain: eff.min_package_toolchain,
        root: Some(eff.repo_root.clone()),
    };
    let result = GraphLinter::new(&project_linter, &fs, toolchain.as_ref(), options).run(&graph);
    output::print_lint(&result, &eff.output);
    Ok(result.has_errors())
}

fn run_settings(
    eff: &Effective,
    project: &str,
    target: Option<&str>,
    configuration: Option<&str>,
) -> Result<()> {
    let graph = loader::load_graph(&eff.manifest, &eff.fetch_marker)?;
    let unknown = |what: &'static str, name: &str| Error::UnknownReference {
        from: "settings".into(),
        what,
        name: name.to_string(),
    };
    let p = graph
        .projects()
        .iter()
        .find(|p| p.name == project)
        .ok_or_else(|| unknown("project", project))?;
    let t = match target {
        Some(name) => Some(p.target(name).ok_or_else(|| unknown("target", name))?),
        None => None,
    };
    let target_settings = t.and_then(|t| t.settings.as_ref());
    let resolver = SettingsResolver::new(&XcconfigReader);
    let resolved = match configuration {
        Some(name) => {
            let config = SettingsResolver::find_configuration(&p.settings, target_settings, name)?;
            let settings = resolver.resolve(&p.settings, target_settings, &config)?;
            BTreeMap::from([(config, settings)])
        }
        None => resolver.resolve_all(&p.settings, target_settings)?,
    };
    let owner = match t {
        Some(t) => format!("{}/{}", p.name, t.name),
        None => p.name.clone(),
    };
    output::print_settings(&owner, &resolved, &eff.output);
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Lint {
            repo_root,
            manifest,
            output,
        } => {
            let eff = resolve(repo_root, manifest, output);
            match run_lint(&eff) {
                Ok(true) => std::process::exit(1),
                Ok(false) => {}
                Err(e) => fail(e),
            }
        }
        Commands::Settings {
            repo_root,
            manifest,
            output,
            project,
            target,
            configuration,
        } => {
            let eff = resolve(repo_root, manifest, output);
            if let Err(e) = run_settings(
                &eff,
                &project,
                target.as_deref(),
                configuration.as_deref(),
            ) {
                fail(e);
            }
        }
    }
}
