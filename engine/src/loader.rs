//! Domain payload loading with request coalescing.
//!
//! A [`DomainLoader`] memoizes one result per domain path. Concurrent calls
//! for the same path block on a single in-flight fetch and share its result;
//! later calls observe the cached value without touching the source again.
//! Failures are handed to every waiting caller and then evicted, so the next
//! call retries.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use bkb_model::text::strip_script_assignment;
use bkb_model::{DomainData, DomainIndex};
use walkdir::WalkDir;

use crate::error::LoadError;

/// Payload file names tried inside a domain directory, in order.
pub const PAYLOAD_FILES: &[&str] = &["data.json", "data.js"];

/// Hierarchy index file names tried under a root, in order.
pub const INDEX_FILES: &[&str] = &["domains.json", "domains.js"];

/// Where domain payload text comes from.
pub trait DomainSource: Send + Sync {
    /// Returns the raw payload text for a domain path.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the payload does not exist or cannot be read.
    fn fetch(&self, domain_path: &str) -> Result<String, LoadError>;
}

/// Reads `<root>/<domain path>/data.json`, falling back to `data.js`.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the first payload file that exists for the domain path.
    #[must_use]
    pub fn payload_path(&self, domain_path: &str) -> Option<PathBuf> {
        let dir = domain_path
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |dir, part| dir.join(part));
        PAYLOAD_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }
}

impl DomainSource for FsSource {
    fn fetch(&self, domain_path: &str) -> Result<String, LoadError> {
        let path = self
            .payload_path(domain_path)
            .ok_or_else(|| LoadError::UnknownDomain(domain_path.to_string()))?;
        fs::read_to_string(&path).map_err(|e| LoadError::Io {
            path,
            message: e.to_string(),
        })
    }
}

/// Parses payload text, accepting the `window.X = {...};` script form.
///
/// # Errors
///
/// Returns [`LoadError::EmptyPayload`] for blank or `null` payloads and
/// [`LoadError::Parse`] for malformed JSON.
pub fn parse_payload(domain_path: &str, text: &str) -> Result<DomainData, LoadError> {
    let body = strip_script_assignment(text).trim();
    if body.is_empty() || body == "null" {
        return Err(LoadError::EmptyPayload(domain_path.to_string()));
    }
    DomainData::from_json_str(body).map_err(|e| LoadError::Parse {
        domain: domain_path.to_string(),
        message: e.to_string(),
    })
}

type Slot = Arc<OnceLock<Result<Arc<DomainData>, LoadError>>>;

/// Memoizing, coalescing loader over a [`DomainSource`].
pub struct DomainLoader<S> {
    source: S,
    slots: Mutex<HashMap<String, Slot>>,
}

impl<S: DomainSource> DomainLoader<S> {
    /// Creates a loader with an empty cache.
    pub fn new(source: S) -> Self {
        Self {
            source,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the underlying source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Loads a domain, sharing any in-flight or completed load of the same
    /// path.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`] of the fetch or parse. The failure is not
    /// cached.
    pub fn load(&self, domain_path: &str) -> Result<Arc<DomainData>, LoadError> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(domain_path.to_string()).or_default())
        };

        let result = slot
            .get_or_init(|| {
                tracing::debug!(domain = domain_path, "fetching domain payload");
                self.source
                    .fetch(domain_path)
                    .and_then(|text| parse_payload(domain_path, &text))
                    .map(Arc::new)
            })
            .clone();

        match &result {
            Ok(data) => tracing::info!(
                domain = domain_path,
                concepts = data.concepts.len(),
                relationships = data.relationships.len(),
                "domain loaded"
            ),
            Err(e) => {
                tracing::warn!(domain = domain_path, error = %e, "domain load failed");
                let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
                if slots.get(domain_path).is_some_and(|s| Arc::ptr_eq(s, &slot)) {
                    slots.remove(domain_path);
                }
            }
        }
        result
    }

    /// True when a successful load of the path is cached.
    #[must_use]
    pub fn is_cached(&self, domain_path: &str) -> bool {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .get(domain_path)
            .and_then(|slot| slot.get())
            .is_some_and(Result::is_ok)
    }
}

/// Lists every domain path below `root` that holds a payload file, sorted.
///
/// Paths use `/` separators relative to `root`. Unreadable directory entries
/// are skipped.
#[must_use]
pub fn discover_domains(root: &Path) -> Vec<String> {
    let mut found: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.file_name()
                    .to_str()
                    .is_some_and(|name| PAYLOAD_FILES.contains(&name))
        })
        .filter_map(|e| {
            let dir = e.path().parent()?.strip_prefix(root).ok()?;
            let parts: Vec<String> = dir
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            (!parts.is_empty()).then(|| parts.join("/"))
        })
        .collect();
    found.sort();
    found.dedup();
    found
}

/// Reads the domain hierarchy index under `root`, or `None` when the root has
/// no index file.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when an index file exists but cannot be read and
/// [`LoadError::Parse`] when it is not a valid index.
pub fn read_index(root: &Path) -> Result<Option<DomainIndex>, LoadError> {
    let Some(path) = INDEX_FILES.iter().map(|f| root.join(f)).find(|p| p.is_file()) else {
        return Ok(None);
    };
    let text = fs::read_to_string(&path).map_err(|e| LoadError::Io {
        path: path.clone(),
        message: e.to_string(),
    })?;
    let index = DomainIndex::from_json_str(&text).map_err(|e| LoadError::Parse {
        domain: path.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::info!(path = %path.display(), domains = index.domains().len(), "read domain index");
    Ok(Some(index))
}
