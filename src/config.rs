//! Defaults configuration
//!
//! Callers can tune the template directory and per-topology diagram extents
//! through a small TOML file. A built-in document supplies the same defaults
//! the host application uses for freshly inserted diagrams.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::package::Extent;
use crate::Topology;

/// Errors that can occur when loading a defaults file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read defaults file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse defaults TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Unknown topology in defaults file: {0}")]
    UnknownTopology(String),
}

/// Resolved defaults: template directory and per-topology extents
#[derive(Debug, Clone)]
pub struct Defaults {
    pub template_dir: PathBuf,
    extents: HashMap<Topology, Extent>,
}

/// TOML structure for deserializing defaults
#[derive(Deserialize)]
struct TomlDefaults {
    templates: Option<TomlTemplates>,
    #[serde(default)]
    extents: HashMap<String, TomlExtent>,
}

#[derive(Deserialize)]
struct TomlTemplates {
    dir: Option<PathBuf>,
}

#[derive(Deserialize)]
struct TomlExtent {
    width_emu: u64,
    height_emu: u64,
}

/// Built-in defaults matching the host's own footprint for new diagrams
const DEFAULT_CONFIG: &str = r#"
[templates]
dir = "templates"

[extents]
list = { width_emu = 5486400, height_emu = 3200400 }
process = { width_emu = 5486400, height_emu = 3200400 }
hierarchy = { width_emu = 5486400, height_emu = 4000000 }
cycle = { width_emu = 5486400, height_emu = 4000000 }
pyramid = { width_emu = 5486400, height_emu = 4000000 }
radial = { width_emu = 5486400, height_emu = 4000000 }
"#;

impl Default for Defaults {
    fn default() -> Self {
        Self::from_str(DEFAULT_CONFIG).expect("built-in defaults are valid")
    }
}

impl Defaults {
    /// Load defaults from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse defaults from TOML text
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlDefaults = toml::from_str(content)?;
        let mut extents = HashMap::new();
        for (name, extent) in parsed.extents {
            let topology: Topology = name
                .parse()
                .map_err(|_| ConfigError::UnknownTopology(name))?;
            extents.insert(
                topology,
                Extent {
                    width_emu: extent.width_emu,
                    height_emu: extent.height_emu,
                },
            );
        }
        Ok(Defaults {
            template_dir: parsed
                .templates
                .and_then(|t| t.dir)
                .unwrap_or_else(|| PathBuf::from("templates")),
            extents,
        })
    }

    /// The default extent for one topology
    pub fn extent(&self, topology: Topology) -> Extent {
        self.extents
            .get(&topology)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults_cover_all_topologies() {
        let defaults = Defaults::default();
        for topology in Topology::ALL {
            let extent = defaults.extent(topology);
            assert!(extent.width_emu > 0 && extent.height_emu > 0);
        }
        assert_eq!(defaults.extent(Topology::List).height_emu, 3_200_400);
        assert_eq!(defaults.extent(Topology::Pyramid).height_emu, 4_000_000);
    }

    #[test]
    fn test_partial_file_falls_back() {
        let defaults = Defaults::from_str(
            r#"
[extents]
process = { width_emu = 1000, height_emu = 2000 }
"#,
        )
        .expect("should parse");
        assert_eq!(defaults.extent(Topology::Process).width_emu, 1000);
        // Unconfigured topologies fall back to the built-in footprint
        assert_eq!(
            defaults.extent(Topology::Cycle),
            Extent::default()
        );
        assert_eq!(defaults.template_dir, PathBuf::from("templates"));
    }

    #[test]
    fn test_unknown_topology_rejected() {
        let err = Defaults::from_str(
            r#"
[extents]
venn = { width_emu = 1, height_emu = 1 }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTopology(_)));
    }
}
