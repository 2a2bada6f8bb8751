//! Manifest loading: provider credentials and desired applications.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use twiliokit::{ApplicationParams, Credentials, DEFAULT_API_BASE, RestBackend};

/// On-disk format of a manifest, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Toml,
    Json,
}

impl ManifestFormat {
    /// Detect the format from a path. Anything other than `.json` is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }
}

/// Provider section of the manifest.
///
/// Every value is shell-expanded before use, so secrets can be written as
/// `${TWILIO_AUTH_TOKEN}`. Unset values fall back to the `TWILIO_*`
/// environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,
    /// Override for the API base URL (proxies, test servers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ProviderConfig {
    /// Resolve credentials from this section and the environment.
    pub fn credentials(&self) -> Result<Credentials> {
        let credentials = Credentials::resolve(
            expand_value("account_sid", self.account_sid.as_deref())?,
            expand_value("auth_token", self.auth_token.as_deref())?,
            expand_value("api_key", self.api_key.as_deref())?,
            expand_value("api_secret", self.api_secret.as_deref())?,
        )?;
        Ok(credentials)
    }

    /// API base URL, expanded, or the public Twilio API.
    pub fn api_base(&self) -> Result<String> {
        Ok(expand_value("api_base", self.api_base.as_deref())?
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string()))
    }

    /// Build the REST backend this section describes.
    pub fn backend(&self) -> Result<RestBackend> {
        let base = self.api_base()?;
        log::debug!("Using Twilio API base {base}");
        Ok(RestBackend::with_api_base(self.credentials()?, base))
    }
}

/// Expand `~` and `$VAR` in a manifest value.
fn expand_value(key: &str, value: Option<&str>) -> Result<Option<String>> {
    value
        .map(|v| {
            shellexpand::full(v)
                .map(|s| s.into_owned())
                .with_context(|| format!("Failed to expand provider.{key}"))
        })
        .transpose()
}

/// The desired state: provider settings plus applications by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub applications: BTreeMap<String, ApplicationParams>,
}

impl Manifest {
    /// Load a manifest, TOML or JSON by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read manifest {}", path.display()))?;
        let format = ManifestFormat::from_path(path);
        let manifest = Self::parse(&content, format)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))?;
        log::debug!(
            "Loaded {} application(s) from {} ({})",
            manifest.applications.len(),
            path.display(),
            format.extension()
        );
        Ok(manifest)
    }

    pub fn parse(content: &str, format: ManifestFormat) -> Result<Self> {
        Ok(match format {
            ManifestFormat::Toml => toml::from_str(content)?,
            ManifestFormat::Json => serde_json::from_str(content)?,
        })
    }

    /// Applications to act on: the named one, or all of them.
    pub fn select(&self, name: Option<&str>) -> Result<Vec<(&str, &ApplicationParams)>> {
        match name {
            Some(name) => match self.applications.get_key_value(name) {
                Some((key, params)) => Ok(vec![(key.as_str(), params)]),
                None => bail!("Application '{name}' is not in the manifest"),
            },
            None => Ok(self
                .applications
                .iter()
                .map(|(k, v)| (k.as_str(), v))
                .collect()),
        }
    }

    /// Names of all applications in the manifest.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.applications.keys().map(String::as_str)
    }
}
