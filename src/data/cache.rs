use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::loader::{load_file, LoadError};
use super::model::CleanedTable;

/// Identity of a file on disk at a point in time.
///
/// Path plus length alone cannot tell a same-size rewrite apart, so a
/// signature without a modification time never counts as a match.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Signature {
    path: PathBuf,
    modified: Option<SystemTime>,
    len: u64,
}

impl Signature {
    fn of(path: &Path) -> Result<Self, LoadError> {
        let meta = std::fs::metadata(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Signature {
            path: path.to_path_buf(),
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }

    fn matches(&self, other: &Signature) -> bool {
        self.modified.is_some() && self == other
    }
}

/// Remembers the last successfully loaded table.
///
/// A hit requires the same path, modification time and length; anything
/// else reloads, including files whose modification time is unavailable.
/// Failed loads are never cached.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<(Signature, Arc<CleanedTable>)>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: &Path) -> Result<Arc<CleanedTable>, LoadError> {
        let signature = match Signature::of(path) {
            Ok(sig) => sig,
            Err(e) => {
                self.entry = None;
                return Err(e);
            }
        };

        if let Some((cached, table)) = &self.entry {
            if cached.matches(&signature) {
                log::debug!("Reusing cached table for {}", path.display());
                return Ok(Arc::clone(table));
            }
        }

        self.entry = None;
        let table = Arc::new(load_file(path)?);
        self.entry = Some((signature, Arc::clone(&table)));
        Ok(table)
    }
}
