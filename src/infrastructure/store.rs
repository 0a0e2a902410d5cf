//! JSON file tree store
//!
//! Persists the tree as a single JSON document:
//! `{ "courses": [ { "name", "modules": [ { "name", "units": [ { "name", "cheatsheet" } ] } ] } ] }`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::StoreConfig;
use crate::domain::Tree;
use crate::infrastructure::traits::{FileSystem, TreeStore};

/// Tree store backed by one JSON file.
pub struct JsonFileStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    options: StoreConfig,
}

impl JsonFileStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>, options: StoreConfig) -> Self {
        Self {
            fs,
            path: path.into(),
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Previous state kept when backups are enabled.
    pub fn backup_path(&self) -> PathBuf {
        sibling(&self.path, "bak")
    }

    fn temp_path(&self) -> PathBuf {
        sibling(&self.path, "tmp")
    }
}

/// `<path>.<suffix>` next to `path`.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

impl TreeStore for JsonFileStore {
    fn load(&self) -> ApplicationResult<Tree> {
        if !self.fs.exists(&self.path) {
            debug!("load: {} does not exist, empty tree", self.path.display());
            return Ok(Tree::default());
        }
        let content = self
            .fs
            .read_to_string(&self.path)
            .with_path_context("read tree", &self.path)?;
        if content.trim().is_empty() {
            return Ok(Tree::default());
        }
        let tree: Tree = serde_json::from_str(&content).map_err(|e| ApplicationError::Store {
            message: format!("invalid tree data in {}: {}", self.path.display(), e),
        })?;
        debug!(
            "load: {} courses from {}",
            tree.courses.len(),
            self.path.display()
        );
        Ok(tree)
    }

    fn save(&self, tree: &Tree) -> ApplicationResult<()> {
        let json = if self.options.pretty {
            serde_json::to_string_pretty(tree)
        } else {
            serde_json::to_string(tree)
        }
        .map_err(|e| ApplicationError::Store {
            message: format!("serialize tree: {}", e),
        })?;

        self.fs
            .ensure_parent(&self.path)
            .with_path_context("create data directory for", &self.path)?;

        if self.options.backup && self.fs.exists(&self.path) {
            let backup = self.backup_path();
            trace!("save: backup to {}", backup.display());
            self.fs
                .copy(&self.path, &backup)
                .with_path_context("back up tree", &backup)?;
        }

        // Write beside the target, then rename over it.
        let tmp = self.temp_path();
        self.fs
            .write(&tmp, &json)
            .with_path_context("write tree", &tmp)?;
        if let Err(e) = self.fs.rename(&tmp, &self.path) {
            let _ = self.fs.remove_file(&tmp);
            return Err::<(), _>(e).with_path_context("replace tree", &self.path);
        }
        debug!(
            "save: {} courses to {}",
            tree.courses.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_path_when_building_siblings_then_suffix_is_appended() {
        assert_eq!(
            sibling(Path::new("/data/cheatsheets.json"), "bak"),
            PathBuf::from("/data/cheatsheets.json.bak")
        );
    }
}
