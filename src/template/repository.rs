//! Repository of template bundles, one archive per topology

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::debug;

use crate::Topology;

use super::{TemplateBundle, TemplateError};

/// Loads and caches template bundles from a directory of `.docx` archives
///
/// Loading takes `&mut self`; once every topology a caller needs has been
/// loaded (`warm_up`), the repository is read-only and can be shared behind
/// `&self` across synthesis calls operating on independent containers.
#[derive(Debug, Default)]
pub struct TemplateRepository {
    base_dir: PathBuf,
    cache: HashMap<Topology, TemplateBundle>,
}

impl TemplateRepository {
    /// Create a repository rooted at a template directory
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            cache: HashMap::new(),
        }
    }

    /// Path of the archive backing one topology
    pub fn bundle_path(&self, topology: Topology) -> PathBuf {
        self.base_dir.join(format!("{}.docx", topology.as_str()))
    }

    /// Load (or fetch from cache) the bundle for a topology
    pub fn load(&mut self, topology: Topology) -> Result<&TemplateBundle, TemplateError> {
        if !self.cache.contains_key(&topology) {
            let path = self.bundle_path(topology);
            if !path.exists() {
                return Err(TemplateError::NotFound {
                    topology: topology.as_str().to_string(),
                    path,
                });
            }
            let bytes = std::fs::read(&path).map_err(|e| TemplateError::Archive {
                topology: topology.as_str().to_string(),
                message: format!("{}: {e}", path.display()),
            })?;
            let bundle = TemplateBundle::from_archive_bytes(topology, &bytes)?;
            debug!("loaded template bundle for '{}'", topology.as_str());
            self.cache.insert(topology, bundle);
        }
        Ok(&self.cache[&topology])
    }

    /// Register a bundle parsed from in-memory archive bytes
    ///
    /// Used by tests and by callers that embed their templates instead of
    /// shipping a template directory.
    pub fn insert_from_bytes(
        &mut self,
        topology: Topology,
        bytes: &[u8],
    ) -> Result<(), TemplateError> {
        let bundle = TemplateBundle::from_archive_bytes(topology, bytes)?;
        self.cache.insert(topology, bundle);
        Ok(())
    }

    /// Fetch an already-loaded bundle
    pub fn get(&self, topology: Topology) -> Option<&TemplateBundle> {
        self.cache.get(&topology)
    }

    /// Load every supported topology up front
    pub fn warm_up(&mut self) -> Result<(), TemplateError> {
        for topology in Topology::ALL {
            self.load(topology)?;
        }
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
