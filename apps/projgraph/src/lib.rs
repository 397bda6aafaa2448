//! projgraph core library.
//!
//! This crate validates a workspace's project/target dependency graph and
//! resolves layered build settings ahead of project generation.
//!
//! High-level modules:
//! - `models`: Lint issue types, project model, and manifest schema.
//! - `graph`: Typed dependency graph with entry nodes and adjacency lookup.
//! - `loader`: Builds a `Graph` from a workspace manifest.
//! - `lint`: Graph linter (link compatibility, static duplication,
//!   configuration consistency, watch bundle ids, environment checks).
//! - `settings`: Build settings resolution per configuration.
//! - `env`: Collaborator traits (filesystem, toolchain, settings files,
//!   project linter) and their default implementations.
//! - `config`: Discovery and effective configuration resolution.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `output`: Human/JSON printers for lint and settings.
//! - `utils`: Supporting helpers.
//! - `error`: Crate error type.
pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod graph;
pub mod lint;
pub mod loader;
pub mod models;
pub mod output;
pub mod settings;
pub mod utils;

pub use error::{Error, Result};
