//! Configuration store for agent, task and input documents
//!
//! Documents are YAML files with one top-level mapping from entry name to a
//! record. They are read through a [`DocumentSource`], checked by the
//! validator registered for their [`DocumentKind`] and cached until
//! [`ConfigStore::clear`] is called.

use crate::core::error::PipelineError;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Pipeline inputs handed to the execution engine
pub type PipelineInputs = HashMap<String, serde_json::Value>;

/// Kind of configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Agent records: role, goal, backstory
    Agents,
    /// Task records: description, expected_output
    Tasks,
    /// Free-form run inputs (no validator)
    Inputs,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Agents => "agents",
            DocumentKind::Tasks => "tasks",
            DocumentKind::Inputs => "inputs",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where raw document text comes from
pub trait DocumentSource: Send + Sync {
    /// Read the raw text of a document
    fn read(&self, name: &str) -> Result<String, PipelineError>;

    /// Human-readable location of a document, used in error messages
    fn locate(&self, name: &str) -> String;
}

/// Reads documents from files below a base directory
#[derive(Debug, Clone)]
pub struct FileSource {
    base_dir: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl DocumentSource for FileSource {
    fn read(&self, name: &str) -> Result<String, PipelineError> {
        let path = self.base_dir.join(name);
        if !path.exists() {
            return Err(PipelineError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        std::fs::read_to_string(&path).map_err(|e| PipelineError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn locate(&self, name: &str) -> String {
        self.base_dir.join(name).display().to_string()
    }
}

/// Structural check run on a freshly parsed document
pub trait DocumentValidator: Send + Sync {
    /// Validate the parsed document, failing on the first problem found
    fn validate(&self, document: &str, root: &Value) -> Result<(), PipelineError>;
}

/// Requires `role`, `goal` and `backstory` on every agent entry
#[derive(Debug, Default, Clone, Copy)]
pub struct AgentsValidator;

impl AgentsValidator {
    pub const REQUIRED_FIELDS: [&'static str; 3] = ["role", "goal", "backstory"];
}

impl DocumentValidator for AgentsValidator {
    fn validate(&self, document: &str, root: &Value) -> Result<(), PipelineError> {
        require_fields(document, root, "agent", &Self::REQUIRED_FIELDS)
    }
}

/// Requires `description` and `expected_output` on every task entry
#[derive(Debug, Default, Clone, Copy)]
pub struct TasksValidator;

impl TasksValidator {
    pub const REQUIRED_FIELDS: [&'static str; 2] = ["description", "expected_output"];
}

impl DocumentValidator for TasksValidator {
    fn validate(&self, document: &str, root: &Value) -> Result<(), PipelineError> {
        require_fields(document, root, "task", &Self::REQUIRED_FIELDS)
    }
}

fn require_fields(
    document: &str,
    root: &Value,
    entry_label: &str,
    required: &[&str],
) -> Result<(), PipelineError> {
    let entries = root.as_mapping().ok_or_else(|| {
        PipelineError::invalid_document(
            document,
            format!("{entry_label} configuration must be a mapping"),
        )
    })?;

    for (key, record) in entries {
        let entry = key_to_string(key);
        let record = record.as_mapping().ok_or_else(|| {
            PipelineError::invalid_entry(
                document,
                &entry,
                None,
                format!("{entry_label} '{entry}' must be a mapping"),
            )
        })?;

        for field in required {
            if !record.contains_key(*field) {
                return Err(PipelineError::invalid_entry(
                    document,
                    &entry,
                    Some(field),
                    format!("{entry_label} '{entry}' is missing required field '{field}'"),
                ));
            }
        }
    }

    Ok(())
}

fn key_to_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// A parsed configuration document
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    kind: DocumentKind,
    name: String,
    root: Value,
}

impl ConfigDocument {
    pub fn new(kind: DocumentKind, name: impl Into<String>, root: Value) -> Self {
        Self {
            kind,
            name: name.into(),
            root,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry names in document order
    pub fn entry_names(&self) -> Vec<String> {
        self.root
            .as_mapping()
            .map(|m| m.keys().map(key_to_string).collect())
            .unwrap_or_default()
    }

    /// Record stored under an entry name, if it is a mapping
    pub fn entry(&self, name: &str) -> Option<&Mapping> {
        self.root.get(name).and_then(Value::as_mapping)
    }

    /// Read a string field of an entry, falling back to `default`
    ///
    /// A missing entry, a missing field and a non-string value all resolve
    /// to the default.
    pub fn field(&self, entry: &str, key: &str, default: &str) -> String {
        self.entry(entry)
            .and_then(|record| record.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| default.to_string())
    }

    /// Convert a top-level section into pipeline inputs
    pub fn section_as_inputs(&self, section: &str) -> Option<PipelineInputs> {
        let mapping = self.root.get(section)?.as_mapping()?;
        let inputs = mapping
            .iter()
            .filter_map(|(k, v)| {
                serde_json::to_value(v)
                    .ok()
                    .map(|value| (key_to_string(k), value))
            })
            .collect();
        Some(inputs)
    }
}

/// Snapshot of the cache contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheInfo {
    pub cached: Vec<String>,
    pub size: usize,
}

type CacheKey = (DocumentKind, String);

/// Loads, validates and caches configuration documents
pub struct ConfigStore {
    source: Box<dyn DocumentSource>,
    validators: HashMap<DocumentKind, Box<dyn DocumentValidator>>,
    cache: Mutex<HashMap<CacheKey, Arc<ConfigDocument>>>,
}

impl ConfigStore {
    /// Create a store with the agents and tasks validators registered
    pub fn new(source: impl DocumentSource + 'static) -> Self {
        let mut store = Self {
            source: Box::new(source),
            validators: HashMap::new(),
            cache: Mutex::new(HashMap::new()),
        };
        store.register_validator(DocumentKind::Agents, AgentsValidator);
        store.register_validator(DocumentKind::Tasks, TasksValidator);
        store
    }

    /// Create a store reading YAML files from a directory
    pub fn from_dir<P: AsRef<Path>>(base_dir: P) -> Self {
        Self::new(FileSource::new(base_dir))
    }

    /// Register (or replace) the validator for a document kind
    pub fn register_validator(
        &mut self,
        kind: DocumentKind,
        validator: impl DocumentValidator + 'static,
    ) {
        self.validators.insert(kind, Box::new(validator));
    }

    /// Load a document, returning the cached copy when present
    pub fn load(&self, kind: DocumentKind, name: &str) -> Result<Arc<ConfigDocument>, PipelineError> {
        let key = (kind, name.to_string());
        if let Some(doc) = self.lock_cache().get(&key) {
            return Ok(Arc::clone(doc));
        }

        debug!("Loading {} document {}", kind, self.source.locate(name));
        let text = self.source.read(name)?;
        let root: Value = serde_yaml::from_str(&text).map_err(|e| PipelineError::ConfigParse {
            path: self.source.locate(name),
            message: e.to_string(),
        })?;

        if let Some(validator) = self.validators.get(&kind) {
            validator.validate(name, &root)?;
        }

        let doc = Arc::new(ConfigDocument::new(kind, name, root));
        self.lock_cache().insert(key, Arc::clone(&doc));
        Ok(doc)
    }

    pub fn agents(&self, name: &str) -> Result<Arc<ConfigDocument>, PipelineError> {
        self.load(DocumentKind::Agents, name)
    }

    pub fn tasks(&self, name: &str) -> Result<Arc<ConfigDocument>, PipelineError> {
        self.load(DocumentKind::Tasks, name)
    }

    pub fn inputs(&self, name: &str) -> Result<Arc<ConfigDocument>, PipelineError> {
        self.load(DocumentKind::Inputs, name)
    }

    /// Drop every cached document
    pub fn clear(&self) {
        self.lock_cache().clear();
    }

    pub fn cache_info(&self) -> CacheInfo {
        let cache = self.lock_cache();
        let mut cached: Vec<String> = cache
            .keys()
            .map(|(kind, name)| format!("{}:{}", kind, name))
            .collect();
        cached.sort();
        CacheInfo {
            size: cached.len(),
            cached,
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<ConfigDocument>>> {
        // A poisoned cache still holds fully inserted documents
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("cache", &self.cache_info())
            .finish()
    }
}
