//! User preferences
//!
//! Holds the favourite-band selection and the onboarding flag. Saving a
//! band selection always marks onboarding as completed.
//!
//! Two stores are provided:
//! - [`MemoryPreferences`]: process-local, used by tests and one-shot runs
//! - [`FilePreferences`]: a JSON document on disk, replaced atomically on
//!   every write

use crate::error::PreferencesError;
use async_trait::async_trait;
use parking_lot::RwLock;
use rand::seq::IteratorRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Stored user preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Favourite bands, kept sorted and unique
    pub selected_bands: BTreeSet<String>,
    /// Whether the user finished onboarding
    pub onboarding_completed: bool,
}

impl Preferences {
    /// Preferences after saving `bands`
    #[must_use]
    pub fn with_bands<I, S>(mut self, bands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_bands = bands
            .into_iter()
            .map(Into::into)
            .map(|band: String| band.trim().to_string())
            .filter(|band| !band.is_empty())
            .collect();
        self.onboarding_completed = true;
        self
    }

    /// Whether any band is selected
    #[inline]
    #[must_use]
    pub fn has_bands(&self) -> bool {
        !self.selected_bands.is_empty()
    }
}

/// Pick one band uniformly at random
#[must_use]
pub fn pick_band<R: Rng + ?Sized>(bands: &BTreeSet<String>, rng: &mut R) -> Option<String> {
    bands.iter().choose(rng).cloned()
}

/// Persistent preference storage
#[async_trait]
pub trait PreferencesStore: Send + Sync {
    /// Current preferences
    async fn read(&self) -> Result<Preferences, PreferencesError>;

    /// Replace the band selection and mark onboarding completed
    async fn save_bands(&self, bands: Vec<String>) -> Result<Preferences, PreferencesError>;

    /// Selected bands
    async fn selected_bands(&self) -> Result<BTreeSet<String>, PreferencesError> {
        Ok(self.read().await?.selected_bands)
    }

    /// Whether onboarding has been completed
    async fn onboarding_completed(&self) -> Result<bool, PreferencesError> {
        Ok(self.read().await?.onboarding_completed)
    }
}

/// In-memory preferences
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    inner: RwLock<Preferences>,
}

impl MemoryPreferences {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store with bands already selected
    #[must_use]
    pub fn with_bands<I, S>(bands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: RwLock::new(Preferences::default().with_bands(bands)),
        }
    }
}

#[async_trait]
impl PreferencesStore for MemoryPreferences {
    async fn read(&self) -> Result<Preferences, PreferencesError> {
        Ok(self.inner.read().clone())
    }

    async fn save_bands(&self, bands: Vec<String>) -> Result<Preferences, PreferencesError> {
        let mut guard = self.inner.write();
        *guard = std::mem::take(&mut *guard).with_bands(bands);
        Ok(guard.clone())
    }
}

/// JSON-file preferences
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    /// Create store backed by `path`; the file is created on first save
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PreferencesError::io_error(parent, e))?;
        }

        let json = serde_json::to_vec_pretty(preferences)?;
        let tmp = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| PreferencesError::io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| PreferencesError::io_error(&self.path, e))?;

        Ok(())
    }
}

#[async_trait]
impl PreferencesStore for FilePreferences {
    async fn read(&self) -> Result<Preferences, PreferencesError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Preferences::default());
            }
            Err(e) => return Err(PreferencesError::io_error(&self.path, e)),
        };

        serde_json::from_slice(&bytes).map_err(|source| PreferencesError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    async fn save_bands(&self, bands: Vec<String>) -> Result<Preferences, PreferencesError> {
        let preferences = self.read().await?.with_bands(bands);
        self.write(&preferences).await?;
        tracing::debug!(
            path = %self.path.display(),
            bands = preferences.selected_bands.len(),
            "preferences saved"
        );
        Ok(preferences)
    }
}
