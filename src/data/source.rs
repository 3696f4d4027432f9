use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

const VERSION_FILE: &str = "last-update.txt";

/// Supplier of raw tables.
pub trait DataSource: Send + Sync {
    /// JSON text of table `name`, e.g. `syllables` or `FG`.
    fn load_table(&self, name: &str) -> Result<String>;

    /// Text of the data version stamp, if the source has one.
    fn load_version(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Tables stored as `<root>/<name>.json`, with the version stamp in
/// `<root>/last-update.txt`.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirSource { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DataSource for DirSource {
    fn load_table(&self, name: &str) -> Result<String> {
        let path = self.root.join(format!("{name}.json"));
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                log::info!("read table `{name}` from {}", path.display());
                Ok(text)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Err(Error::MissingTable { table: name.to_string() }),
            Err(source) => Err(Error::Io { table: name.to_string(), source }),
        }
    }

    fn load_version(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(self.root.join(VERSION_FILE)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::Io { table: VERSION_FILE.to_string(), source }),
        }
    }
}

/// Tables held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<String, String>,
    version: Option<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn with_version(mut self, text: impl Into<String>) -> Self {
        self.version = Some(text.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.tables.insert(name.into(), text.into());
    }
}

impl DataSource for MemorySource {
    fn load_table(&self, name: &str) -> Result<String> {
        self.tables.get(name).cloned().ok_or_else(|| Error::MissingTable { table: name.to_string() })
    }

    fn load_version(&self) -> Result<Option<String>> {
        Ok(self.version.clone())
    }
}
