//! Command implementations
//!
//! - `status` - Show what is managed and what apply would do
//! - `diff` - Preview field-level changes
//! - `apply` - Converge Twilio to the manifest
//! - `destroy` - Delete one application

pub mod apply;
pub mod destroy;
pub mod diff;
pub mod status;

use anyhow::Result;
use declarative::ConfirmCallback;
use std::path::PathBuf;
use twiliokit::{ApplicationParams, ApplicationState};

use crate::Context;
use crate::config::Manifest;
use crate::paths;
use crate::state::StateFile;

/// Manifest and state loaded for one command
pub struct Session {
    pub manifest: Manifest,
    pub manifest_path: PathBuf,
    pub state: StateFile,
    pub state_path: PathBuf,
}

impl Session {
    /// Load the manifest and state named by the global flags
    pub fn load(ctx: &Context) -> Result<Self> {
        let manifest_path = paths::manifest_file(ctx.manifest.as_deref())?;
        let state_path = paths::state_file(ctx.state.as_deref())?;
        Self::open(manifest_path, state_path)
    }

    pub fn open(manifest_path: PathBuf, state_path: PathBuf) -> Result<Self> {
        let manifest = Manifest::load(&manifest_path)?;
        let state = StateFile::load(&state_path)?;
        Ok(Self {
            manifest,
            manifest_path,
            state,
            state_path,
        })
    }

    /// Stored state entries whose names left the manifest
    pub fn orphans(&self) -> Vec<&str> {
        self.state.orphans(self.manifest.names())
    }

    /// Desired fields and stored state for each selected application
    pub fn targets(
        &self,
        name: Option<&str>,
    ) -> Result<Vec<(&str, &ApplicationParams, Option<&ApplicationState>)>> {
        Ok(self
            .manifest
            .select(name)?
            .into_iter()
            .map(|(name, params)| (name, params, self.state.get(name)))
            .collect())
    }
}

/// Short form of a stored state for display
pub fn describe(state: Option<&ApplicationState>) -> String {
    match state.and_then(|s| s.sid.as_deref()) {
        Some(sid) => sid.to_string(),
        None => "not created".to_string(),
    }
}

/// Interactive confirmation through a terminal prompt
pub struct PromptConfirm;

impl ConfirmCallback for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;

        Ok(confirmed)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    pub(crate) const MANIFEST: &str = r#"
[applications.support-line]
friendly_name = "Support line"
voice_url = "https://example.com/voice"

[applications.alerts]
sms_url = "https://example.com/sms"
"#;

    /// A session over a temp dir holding `manifest` and no state yet
    pub(crate) fn session(manifest: &str) -> (TempDir, Session) {
        let dir = TempDir::new().unwrap();
        let manifest_path = dir.path().join("switchboard.toml");
        fs::write(&manifest_path, manifest).unwrap();
        let session = Session::open(manifest_path, dir.path().join("state.toml")).unwrap();
        (dir, session)
    }

    #[test]
    fn test_targets_pair_manifest_with_state() {
        let (_dir, mut session) = session(MANIFEST);
        session.state.set(
            "alerts",
            ApplicationState {
                sid: Some("AP1".into()),
                ..ApplicationState::default()
            },
        );

        let targets = session.targets(None).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(describe(targets[0].2), "AP1");
        assert_eq!(describe(targets[1].2), "not created");
    }

    #[test]
    fn test_orphans() {
        let (_dir, mut session) = session(MANIFEST);
        session.state.set("retired", ApplicationState::default());
        assert_eq!(session.orphans(), vec!["retired"]);
    }

    #[test]
    fn test_missing_manifest_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = Session::open(dir.path().join("none.toml"), dir.path().join("state.toml"));
        assert!(result.is_err());
    }
}
