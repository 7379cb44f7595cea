//! Printable summaries of a resolved platform and its registry

use serde::Serialize;
use skiff_platform::{Platform, PlatformRegistry};

/// One parsed version
#[derive(Debug, Serialize)]
pub struct VersionReport {
    pub platform: String,
    pub version: String,
    pub major: u32,
    pub minor: u32,
}

/// Detection result for a single environment
#[derive(Debug, Serialize)]
pub struct DetectReport {
    pub platforms: Vec<String>,
    pub versions: Vec<VersionReport>,
    pub width: f64,
    pub height: f64,
    pub portrait: Option<bool>,
    pub dir: String,
    pub lang: String,
    pub ready_trigger: String,
}

impl DetectReport {
    pub fn from_platform(plt: &Platform) -> Self {
        let versions = plt
            .versions()
            .iter()
            .map(|(name, v)| VersionReport {
                platform: name.clone(),
                version: v.str.clone(),
                major: v.major,
                minor: v.minor,
            })
            .collect();

        Self {
            platforms: plt.platforms().to_vec(),
            versions,
            width: plt.width(),
            height: plt.height(),
            portrait: plt.is_portrait(),
            dir: plt.dir().to_string(),
            lang: plt.lang().to_string(),
            ready_trigger: format!("{:?}", plt.ready_trigger()),
        }
    }

    /// Human readable lines
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("platforms: {}", self.platforms.join(" > "))];
        for v in &self.versions {
            lines.push(format!("version:   {} {}", v.platform, v.version));
        }
        lines.push(format!("viewport:  {}x{}", self.width, self.height));
        if let Some(portrait) = self.portrait {
            lines.push(format!(
                "orientation: {}",
                if portrait { "portrait" } else { "landscape" }
            ));
        }
        if !self.dir.is_empty() {
            lines.push(format!("dir:       {}", self.dir));
        }
        if !self.lang.is_empty() {
            lines.push(format!("lang:      {}", self.lang));
        }
        lines.push(format!("ready:     {}", self.ready_trigger));
        lines
    }
}

/// One registry entry
#[derive(Debug, Serialize)]
pub struct RegistryEntry {
    pub name: String,
    pub engine: bool,
    pub superset: Option<String>,
    pub subsets: Vec<String>,
    pub parents: Vec<String>,
    pub settings: Vec<String>,
}

pub fn registry_entries(registry: &PlatformRegistry) -> Vec<RegistryEntry> {
    registry
        .iter()
        .map(|(name, config)| RegistryEntry {
            name: name.to_string(),
            engine: config.is_engine,
            superset: config.superset.clone(),
            subsets: config.subsets.clone(),
            parents: registry
                .subset_parents(name)
                .into_iter()
                .map(str::to_string)
                .collect(),
            settings: config.settings.keys().cloned().collect(),
        })
        .collect()
}
