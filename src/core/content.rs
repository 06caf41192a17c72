//=========================================================================
// Content Contract
//=========================================================================
//
// Interface to the external asset loader.
//
// Loadable entities request assets by path and keep the returned opaque
// handles. Each scene registry owns exactly one loader, so unloading a
// screen releases everything its entities loaded in one call.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};

use log::debug;
use thiserror::Error;

//=== AssetHandle =========================================================

/// Opaque reference to a loaded asset (texture, font, sound...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetHandle(u64);

impl AssetHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

//=== ContentError ========================================================

/// Failures reported by a content loader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// No asset exists at the requested path.
    #[error("asset not found: {0}")]
    NotFound(String),

    /// The loader found the asset but could not decode or upload it.
    #[error("failed to load '{path}': {reason}")]
    Failed { path: String, reason: String },
}

//=== ContentLoader =======================================================

/// Loads assets on behalf of entities and screens.
pub trait ContentLoader {
    /// Loads (or returns the cached handle for) the asset at `path`.
    fn load(&mut self, path: &str) -> Result<AssetHandle, ContentError>;

    /// Releases every asset loaded through this loader.
    fn unload(&mut self);
}

//=== MemoryContent =======================================================

/// In-memory loader that hands out sequential handles.
///
/// With no catalog every path loads. With a catalog, only listed paths
/// load and anything else fails with [`ContentError::NotFound`]. Repeated
/// loads of one path return the same handle until [`ContentLoader::unload`].
#[derive(Debug, Default)]
pub struct MemoryContent {
    catalog: Option<HashSet<String>>,
    loaded: HashMap<String, AssetHandle>,
    next_handle: u64,
}

impl MemoryContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            catalog: Some(paths.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Number of distinct assets currently loaded.
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_loaded(&self, path: &str) -> bool {
        self.loaded.contains_key(path)
    }
}

impl ContentLoader for MemoryContent {
    fn load(&mut self, path: &str) -> Result<AssetHandle, ContentError> {
        if let Some(&handle) = self.loaded.get(path) {
            return Ok(handle);
        }

        if let Some(catalog) = &self.catalog {
            if !catalog.contains(path) {
                return Err(ContentError::NotFound(path.to_string()));
            }
        }

        self.next_handle += 1;
        let handle = AssetHandle::new(self.next_handle);
        self.loaded.insert(path.to_string(), handle);
        Ok(handle)
    }

    fn unload(&mut self) {
        debug!("Unloading {} cached assets", self.loaded.len());
        self.loaded.clear();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
