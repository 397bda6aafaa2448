//! Build settings resolution.
//!
//! Flattens project and target settings into one table per build
//! configuration. Layers, lowest to highest precedence:
//!
//! 1. project xcconfig for the configuration
//! 2. project base
//! 3. project configuration overrides
//! 4. target xcconfig for the configuration
//! 5. target base
//! 6. target configuration overrides
//!
//! A target without settings stops after layer 3. Settings files are read
//! through a [`SettingsFileReader`]; a read failure fails the resolution.

use crate::env::SettingsFileReader;
use crate::error::{Error, Result};
use crate::models::project::{BuildConfiguration, Settings, SettingsDictionary};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

pub struct SettingsResolver<'a> {
    reader: &'a dyn SettingsFileReader,
}

impl<'a> SettingsResolver<'a> {
    pub fn new(reader: &'a dyn SettingsFileReader) -> Self {
        Self { reader }
    }

    /// Union of project and target configuration identifiers, debug
    /// variants first.
    pub fn configurations(project: &Settings, target: Option<&Settings>) -> Vec<BuildConfiguration> {
        let mut all: BTreeSet<BuildConfiguration> =
            project.build_configurations().cloned().collect();
        if let Some(t) = target {
            all.extend(t.build_configurations().cloned());
        }
        all.into_iter().collect()
    }

    /// Find a visible configuration by name, ignoring case.
    pub fn find_configuration(
        project: &Settings,
        target: Option<&Settings>,
        name: &str,
    ) -> Result<BuildConfiguration> {
        Self::configurations(project, target)
            .into_iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownConfiguration(name.to_string()))
    }

    /// Effective settings for `config`.
    pub fn resolve(
        &self,
        project: &Settings,
        target: Option<&Settings>,
        config: &BuildConfiguration,
    ) -> Result<SettingsDictionary> {
        let mut out = SettingsDictionary::new();
        self.apply_layers(&mut out, project, config)?;
        if let Some(t) = target {
            self.apply_layers(&mut out, t, config)?;
        }
        debug!(configuration = %config, keys = out.len(), "settings resolved");
        Ok(out)
    }

    /// Effective settings for every visible configuration.
    pub fn resolve_all(
        &self,
        project: &Settings,
        target: Option<&Settings>,
    ) -> Result<BTreeMap<BuildConfiguration, SettingsDictionary>> {
        Self::configurations(project, target)
            .into_par_iter()
            .map(|config| {
                let resolved = self.resolve(project, target, &config)?;
                Ok((config, resolved))
            })
            .collect()
    }

    /// Apply one owner's file, base, and override layers.
    fn apply_layers(
        &self,
        out: &mut SettingsDictionary,
        settings: &Settings,
        config: &BuildConfiguration,
    ) -> Result<()> {
        let entry = settings.configuration(config);
        if let Some(path) = entry.and_then(|c| c.xcconfig.as_ref()) {
            out.extend(self.reader.read(path)?);
        }
        out.extend(settings.base.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(c) = entry {
            out.extend(c.settings.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Ok(())
    }
}
