//! Error types for manifest loading, settings resolution, and collaborators.

use std::path::PathBuf;
use thiserror::Error;

// Display: lowercase, no trailing punctuation, so it composes into
// larger error messages.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("cannot read manifest '{}': {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid manifest '{}': {source}", path.display())]
    ManifestToml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid manifest '{}': {source}", path.display())]
    ManifestYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("{from} references unknown {what} '{name}'")]
    UnknownReference {
        from: String,
        what: &'static str,
        name: String,
    },

    #[error("{owner} declares configuration '{name}' more than once")]
    DuplicateConfiguration { owner: String, name: String },

    #[error("dependency cycle detected: {}", chain.join(" -> "))]
    DependencyCycle { chain: Vec<String> },

    #[error("cannot read settings file '{}': {source}", path.display())]
    SettingsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings file '{}' line {line}: {message}", path.display())]
    SettingsParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("could not determine toolchain version: {0}")]
    Toolchain(String),

    #[error("unknown configuration '{0}'")]
    UnknownConfiguration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
