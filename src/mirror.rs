//! A session backed by a local directory of YANG files.
//!
//! Useful for offline runs and for replaying a device's schema set that was
//! previously exported with `--save-dir`.

use std::path::PathBuf;

use tracing::trace;

use crate::error::SessionError;
use crate::session::SchemaSession;
use crate::types::{CatalogEntry, YANG_FORMAT};

/// File extension of YANG source files.
const YANG_EXTENSION: &str = "yang";

/// Serves `<module>.yang` and `<module>@<revision>.yang` files as a device.
#[derive(Debug, Clone)]
pub struct DirectorySession {
    root: PathBuf,
}

impl DirectorySession {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// All YANG files in the directory with their parsed names, sorted by
    /// file name.
    fn scan(&self) -> Result<Vec<(CatalogEntry, PathBuf)>, SessionError> {
        let dir = std::fs::read_dir(&self.root).map_err(|e| {
            SessionError::Transport(format!("cannot read {}: {}", self.root.display(), e))
        })?;

        let mut files = Vec::new();
        for item in dir {
            let item = item.map_err(|e| {
                SessionError::Transport(format!("cannot read {}: {}", self.root.display(), e))
            })?;
            let path = item.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(YANG_EXTENSION) {
                continue;
            }
            if let Some(entry) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(parse_file_stem)
            {
                files.push((entry, path));
            }
        }
        files.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(files)
    }
}

/// Split `module@revision` into a catalog entry.
fn parse_file_stem(stem: &str) -> Option<CatalogEntry> {
    let (name, revision) = match stem.split_once('@') {
        Some((name, revision)) => (name, Some(revision)),
        None => (stem, None),
    };
    if name.is_empty() {
        return None;
    }
    let entry = CatalogEntry::new(name).format(YANG_FORMAT);
    Some(match revision {
        Some(revision) if !revision.is_empty() => entry.version(revision),
        _ => entry,
    })
}

impl SchemaSession for DirectorySession {
    fn list_schemas(&mut self) -> Result<Vec<CatalogEntry>, SessionError> {
        Ok(self.scan()?.into_iter().map(|(entry, _)| entry).collect())
    }

    fn fetch_schema(&mut self, identifier: &str) -> Result<String, SessionError> {
        // Latest revision wins; an unrevisioned file sorts lowest.
        let path = self
            .scan()?
            .into_iter()
            .filter(|(entry, _)| entry.identifier == identifier)
            .max_by(|a, b| a.0.version.cmp(&b.0.version))
            .map(|(_, path)| path)
            .ok_or_else(|| SessionError::Rpc {
                tag: "invalid-value".into(),
                message: format!("no such schema: {}", identifier),
            })?;

        trace!(path = %path.display(), "reading schema file");
        std::fs::read_to_string(&path)
            .map_err(|e| SessionError::Transport(format!("cannot read {}: {}", path.display(), e)))
    }
}
