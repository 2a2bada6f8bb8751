use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use twiliokit::ApplicationState;

// ============================================================================
// State Structures
// ============================================================================

/// Everything switchboard remembers between runs
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StateFile {
    /// Last time the state was updated
    pub last_updated: DateTime<Utc>,

    /// Last known state of each managed application, by manifest name
    #[serde(default)]
    pub applications: BTreeMap<String, ApplicationState>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            last_updated: Utc::now(),
            applications: BTreeMap::new(),
        }
    }
}

// ============================================================================
// StateFile Implementation
// ============================================================================

impl StateFile {
    /// Load state from disk, or return default if file doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("State file does not exist, using default state");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;

        let state: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;

        log::debug!(
            "Loaded state for {} application(s) from {}",
            state.applications.len(),
            path.display()
        );
        Ok(state)
    }

    /// Save state to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create state directory: {}", dir.display())
            })?;
        }

        let content = toml::to_string_pretty(&self).context("Failed to serialize state to TOML")?;

        fs::write(path, &content)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;

        log::debug!("Saved state to {}", path.display());
        Ok(())
    }

    /// Update the last_updated timestamp and save
    pub fn touch(&mut self, path: &Path) -> Result<()> {
        self.last_updated = Utc::now();
        self.save(path)
    }

    // ========================================================================
    // Application State Helpers
    // ========================================================================

    pub fn get(&self, name: &str) -> Option<&ApplicationState> {
        self.applications.get(name)
    }

    /// Record the state of an application after a successful call
    pub fn set(&mut self, name: &str, state: ApplicationState) {
        self.applications.insert(name.to_string(), state);
    }

    /// Drop an application, returning what was recorded
    pub fn forget(&mut self, name: &str) -> Option<ApplicationState> {
        self.applications.remove(name)
    }

    /// Recorded applications that are no longer in the manifest
    pub fn orphans<'a, I>(&self, manifest_names: I) -> Vec<&str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wanted: Vec<&str> = manifest_names.into_iter().collect();
        self.applications
            .keys()
            .map(String::as_str)
            .filter(|name| !wanted.contains(name))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
