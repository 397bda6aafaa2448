//! Collaborator interfaces consumed by the linter and the settings
//! resolver, plus their production implementations.
//!
//! - [`FileSystem`]: existence probe for binaries and settings files.
//! - [`Toolchain`]: selected IDE toolchain version.
//! - [`SettingsFileReader`]: parses external key/value settings files.
//! - [`ProjectLinter`]: per-project structural rules.

use crate::error::{Error, Result};
use crate::models::project::{Project, SettingsDictionary};
use crate::models::LintingIssue;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::debug;

pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
}

/// Probes the real filesystem.
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for Version {
    type Err = Error;

    /// Accepts `major`, `major.minor`, or `major.minor.patch`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Toolchain(format!("invalid version '{s}'"));
        let mut parts = s.trim().split('.');
        let mut next = |required: bool| -> Result<u32> {
            match parts.next() {
                Some(p) => p.parse().map_err(|_| invalid()),
                None if required => Err(invalid()),
                None => Ok(0),
            }
        };
        let major = next(true)?;
        let minor = next(false)?;
        let patch = next(false)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::new(major, minor, patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

pub trait Toolchain {
    fn selected_version(&self) -> Result<Version>;
}

/// Asks `xcodebuild -version` for the selected toolchain.
pub struct XcodeSelect;

impl XcodeSelect {
    fn parse_output(stdout: &str) -> Result<Version> {
        stdout
            .lines()
            .find_map(|l| l.trim().strip_prefix("Xcode "))
            .ok_or_else(|| Error::Toolchain("unexpected xcodebuild output".into()))?
            .parse()
    }
}

impl Toolchain for XcodeSelect {
    fn selected_version(&self) -> Result<Version> {
        let out = Command::new("xcodebuild")
            .arg("-version")
            .output()
            .map_err(|e| Error::Toolchain(e.to_string()))?;
        if !out.status.success() {
            return Err(Error::Toolchain(
                String::from_utf8_lossy(&out.stderr).trim().to_string(),
            ));
        }
        let version = Self::parse_output(&String::from_utf8_lossy(&out.stdout))?;
        debug!(%version, "selected toolchain");
        Ok(version)
    }
}

/// A toolchain version known up front (configuration or tests).
pub struct FixedToolchain(pub Option<Version>);

impl Toolchain for FixedToolchain {
    fn selected_version(&self) -> Result<Version> {
        self.0
            .ok_or_else(|| Error::Toolchain("no toolchain selected".into()))
    }
}

pub trait SettingsFileReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<SettingsDictionary>;
}

/// Reads `.xcconfig` files.
///
/// Supports `KEY = VALUE` assignments (optionally `;`-terminated),
/// conditional keys such as `KEY[sdk=iphoneos*]`, `//` comments, and
/// `#include "path"` / `#include? "path"` relative to the including file.
/// Later assignments win.
pub struct XcconfigReader;

fn assignment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*(?:\[[^\]]*\])*)\s*=\s*(.*?)\s*;?$")
            .expect("valid assignment regex")
    })
}

fn include_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^#include(\?)?\s+"([^"]+)"$"#).expect("valid include regex")
    })
}

impl XcconfigReader {
    fn read_into(
        &self,
        path: &Path,
        out: &mut SettingsDictionary,
        stack: &mut HashSet<PathBuf>,
    ) -> Result<()> {
        if !stack.insert(path.to_path_buf()) {
            return Err(Error::SettingsParse {
                path: path.to_path_buf(),
                line: 0,
                message: "recursive #include".into(),
            });
        }
        let src = fs::read_to_string(path).map_err(|source| Error::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        for (idx, raw) in src.lines().enumerate() {
            let line = raw.split("//").next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            if let Some(caps) = include_re().captures(line) {
                let optional = caps.get(1).is_some();
                let base = path.parent().unwrap_or_else(|| Path::new("."));
                let included = base.join(&caps[2]);
                if optional && !included.exists() {
                    continue;
                }
                self.read_into(&included, out, stack)?;
            } else if let Some(caps) = assignment_re().captures(line) {
                out.insert(caps[1].to_string(), caps[2].to_string());
            } else {
                return Err(Error::SettingsParse {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    message: format!("expected KEY = VALUE, found '{line}'"),
                });
            }
        }
        stack.remove(path);
        Ok(())
    }
}

impl SettingsFileReader for XcconfigReader {
    fn read(&self, path: &Path) -> Result<SettingsDictionary> {
        let mut out = SettingsDictionary::new();
        self.read_into(path, &mut out, &mut HashSet::new())?;
        Ok(out)
    }
}

/// Per-project structural rules, run once per project in the graph.
pub trait ProjectLinter {
    fn lint(&self, project: &Project) -> Vec<LintingIssue>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_version_parse_forms() {
        assert_eq!("14".parse::<Version>().unwrap(), Version::new(14, 0, 0));
        assert_eq!("15.2".parse::<Version>().unwrap(), Version::new(15, 2, 0));
        assert_eq!(
            "13.4.1".parse::<Version>().unwrap(),
            Version::new(13, 4, 1)
        );
        assert!("".parse::<Version>().is_err());
        assert!("1.2.3.4".parse::<Version>().is_err());
        assert!("x.1".parse::<Version>().is_err());
    }

    #[test]
    fn test_xcodebuild_output_parsing() {
        let v = XcodeSelect::parse_output("Xcode 15.2\nBuild version 15C500b\n").unwrap();
        assert_eq!(v, Version::new(15, 2, 0));
        assert!(XcodeSelect::parse_output("garbage").is_err());
    }

    #[test]
    fn test_fixed_toolchain_without_version_fails() {
        assert!(FixedToolchain(None).selected_version().is_err());
        assert_eq!(
            FixedToolchain(Some(Version::new(14, 0, 0)))
                .selected_version()
                .unwrap()
                .major,
            14
        );
    }

    #[test]
    fn test_xcconfig_reader_assignments_comments_and_includes() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Shared.xcconfig"),
            "A = shared\nB = shared // trailing\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("Debug.xcconfig"),
            "// header\n#include \"Shared.xcconfig\"\n#include? \"Missing.xcconfig\"\n\nA = debug;\nOTHER_LDFLAGS[sdk=iphoneos*] = -ObjC\n",
        )
        .unwrap();
        let out = XcconfigReader
            .read(&dir.path().join("Debug.xcconfig"))
            .unwrap();
        assert_eq!(out["A"], "debug");
        assert_eq!(out["B"], "shared");
        assert_eq!(out["OTHER_LDFLAGS[sdk=iphoneos*]"], "-ObjC");
    }

    #[test]
    fn test_xcconfig_reader_rejects_garbage_and_missing_files() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("Bad.xcconfig");
        fs::write(&bad, "A = 1\nthis is not valid\n").unwrap();
        match XcconfigReader.read(&bad).unwrap_err() {
            Error::SettingsParse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            XcconfigReader
                .read(&dir.path().join("Nope.xcconfig"))
                .unwrap_err(),
            Error::SettingsRead { .. }
        ));
    }

    #[test]
    fn test_xcconfig_reader_detects_recursive_include() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("A.xcconfig"), "#include \"B.xcconfig\"\n").unwrap();
        fs::write(dir.path().join("B.xcconfig"), "#include \"A.xcconfig\"\n").unwrap();
        assert!(XcconfigReader
            .read(&dir.path().join("A.xcconfig"))
            .is_err());
    }
}
