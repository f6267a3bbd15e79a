use std::fs;
use std::path::{Path, PathBuf};

use super::r#trait::{PersistenceError, PersistenceGateway, Snapshot};

/// Stores the snapshot as pretty-printed JSON in a single file.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileGateway {
    path: PathBuf,
}

impl JsonFileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PersistenceGateway for JsonFileGateway {
    fn load(&self) -> Result<Snapshot, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PersistenceError::Missing);
            }
            Err(e) => return Err(self.io_error(e)),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.temp_path();
        fs::write(&tmp, bytes).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}
