// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Where the static airport, territory and continent documents come from.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const AIRPORTS_RESOURCE: &str = "airports.json";
pub const TERRITORIES_RESOURCE: &str = "territories.json";
pub const CONTINENTS_RESOURCE: &str = "continents.json";

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Returns the raw JSON text of a named document.
pub trait DocumentSource: Send + Sync {
    fn read(&self, resource: &str) -> Result<String, SourceError>;
}

/// Reads documents from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSource for DirectorySource {
    fn read(&self, resource: &str) -> Result<String, SourceError> {
        let path = self.root.join(resource);
        if !path.exists() {
            return Err(SourceError::NotFound(path.display().to_string()));
        }
        log::debug!("[Source] Reading {:?}", path);
        Ok(fs::read_to_string(path)?)
    }
}

/// In-memory documents keyed by resource name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, resource: &str, json: impl Into<String>) -> Self {
        self.documents.insert(resource.to_string(), json.into());
        self
    }

    pub fn insert(&mut self, resource: &str, json: impl Into<String>) {
        self.documents.insert(resource.to_string(), json.into());
    }
}

impl DocumentSource for MemorySource {
    fn read(&self, resource: &str) -> Result<String, SourceError> {
        self.documents
            .get(resource)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(resource.to_string()))
    }
}

/// Sample documents compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl DocumentSource for EmbeddedSource {
    fn read(&self, resource: &str) -> Result<String, SourceError> {
        let text = match resource {
            AIRPORTS_RESOURCE => include_str!("../data/airports.json"),
            TERRITORIES_RESOURCE => include_str!("../data/territories.json"),
            CONTINENTS_RESOURCE => include_str!("../data/continents.json"),
            other => return Err(SourceError::NotFound(other.to_string())),
        };
        Ok(text.to_string())
    }
}
