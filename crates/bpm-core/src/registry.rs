//! The installed-package registry.
//!
//! A JSON array of `{name, version}` objects. Loading is tolerant: a missing or
//! unreadable file yields an empty registry. Every mutation goes through
//! [`InstalledRegistry::update`], which persists immediately and rolls the
//! in-memory state back if the write fails, so memory and disk never diverge.

use std::io::Write;
use std::path::{Path, PathBuf};

use bpm_schema::{InstalledEntry, PackageName};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct InstalledRegistry {
    path: PathBuf,
    entries: Vec<InstalledEntry>,
}

impl InstalledRegistry {
    /// Load the registry at `path`. Never fails.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(
                    "Registry {} is corrupt ({e}), starting empty",
                    path.display()
                );
                Vec::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read registry {}: {e}", path.display());
                Vec::new()
            }
        };
        Self { path, entries }
    }

    pub fn entries(&self) -> &[InstalledEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&InstalledEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names of every installed package, in registry order.
    pub fn names(&self) -> Vec<PackageName> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Replace the entry with the same name, or append. Returns `true` if an
    /// existing entry was updated.
    pub fn upsert(&mut self, entry: InstalledEntry) -> bool {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.name == entry.name) {
            existing.version = entry.version;
            true
        } else {
            self.entries.push(entry);
            false
        }
    }

    /// Remove and return the entry for `name`.
    pub fn remove(&mut self, name: &str) -> Option<InstalledEntry> {
        let idx = self.entries.iter().position(|e| e.name == name)?;
        Some(self.entries.remove(idx))
    }

    /// Write the registry to disk atomically.
    pub fn save(&self) -> Result<(), RegistryError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let json = serde_json::to_vec_pretty(&self.entries)?;
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Apply `f` and persist. If saving fails the entries are restored to
    /// their state before `f` ran.
    pub fn update<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> Result<T, RegistryError> {
        let snapshot = self.entries.clone();
        let out = f(self);
        if let Err(e) = self.save() {
            self.entries = snapshot;
            return Err(e);
        }
        Ok(out)
    }
}
