//! Core types for Twilio Applications.
//!
//! - [`ApplicationParams`]: the caller-managed field set sent on create/update
//! - [`Application`]: the resource as returned by the API
//! - [`Credentials`]: account SID plus the Basic auth pair

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use declarative::{Diffable, FieldChange};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Fields of a Twilio Application that switchboard manages.
///
/// An unset field is left to Twilio: it is not sent on create or update and
/// it is not compared when deciding whether the application changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_fallback_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_fallback_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_callback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_callback_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_caller_id_lookup: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_fallback_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_fallback_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_status_callback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_status_callback: Option<String>,
}

/// One managed field: config name, API parameter name, rendered value.
struct Entry {
    field: &'static str,
    param: &'static str,
    value: Option<String>,
}

impl ApplicationParams {
    /// Number of managed fields.
    pub const FIELD_COUNT: usize = 15;

    /// The full field list in API order.
    fn entries(&self) -> [Entry; Self::FIELD_COUNT] {
        fn entry(field: &'static str, param: &'static str, value: Option<&String>) -> Entry {
            Entry {
                field,
                param,
                value: value.cloned(),
            }
        }

        [
            entry("friendly_name", "FriendlyName", self.friendly_name.as_ref()),
            entry("api_version", "ApiVersion", self.api_version.as_ref()),
            entry("voice_url", "VoiceUrl", self.voice_url.as_ref()),
            entry("voice_method", "VoiceMethod", self.voice_method.as_ref()),
            entry(
                "voice_fallback_url",
                "VoiceFallbackUrl",
                self.voice_fallback_url.as_ref(),
            ),
            entry(
                "voice_fallback_method",
                "VoiceFallbackMethod",
                self.voice_fallback_method.as_ref(),
            ),
            entry("status_callback", "StatusCallback", self.status_callback.as_ref()),
            entry(
                "status_callback_method",
                "StatusCallbackMethod",
                self.status_callback_method.as_ref(),
            ),
            Entry {
                field: "voice_caller_id_lookup",
                param: "VoiceCallerIdLookup",
                value: self.voice_caller_id_lookup.map(|b| b.to_string()),
            },
            entry("sms_url", "SmsUrl", self.sms_url.as_ref()),
            entry("sms_method", "SmsMethod", self.sms_method.as_ref()),
            entry("sms_fallback_url", "SmsFallbackUrl", self.sms_fallback_url.as_ref()),
            entry(
                "sms_fallback_method",
                "SmsFallbackMethod",
                self.sms_fallback_method.as_ref(),
            ),
            entry(
                "sms_status_callback",
                "SmsStatusCallback",
                self.sms_status_callback.as_ref(),
            ),
            entry(
                "message_status_callback",
                "MessageStatusCallback",
                self.message_status_callback.as_ref(),
            ),
        ]
    }

    /// Form parameters for a create or update request.
    ///
    /// Unset fields are omitted.
    #[must_use]
    pub fn form_pairs(&self) -> Vec<(&'static str, String)> {
        self.entries()
            .into_iter()
            .filter_map(|e| e.value.map(|v| (e.param, v)))
            .collect()
    }

    /// Whether every field set in `desired` has the same value here.
    #[must_use]
    pub fn covers(&self, desired: &Self) -> bool {
        self.changes(desired).is_empty()
    }

    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Diffable for ApplicationParams {
    fn changes(&self, desired: &Self) -> Vec<FieldChange> {
        self.entries()
            .into_iter()
            .zip(desired.entries())
            .filter(|(_, want)| want.value.is_some())
            .filter_map(|(have, want)| {
                FieldChange::between(have.field, have.value.as_ref(), want.value.as_ref())
            })
            .collect()
    }
}

/// A Twilio Application as returned by the REST API.
///
/// Only the attributes switchboard records are decoded; everything else in
/// the response is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub sid: String,
    #[serde(default)]
    pub account_sid: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub date_updated: Option<String>,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub voice_url: Option<String>,
    #[serde(default)]
    pub voice_method: Option<String>,
    #[serde(default)]
    pub voice_fallback_url: Option<String>,
    #[serde(default)]
    pub voice_fallback_method: Option<String>,
    #[serde(default)]
    pub status_callback: Option<String>,
    #[serde(default)]
    pub status_callback_method: Option<String>,
    #[serde(default)]
    pub voice_caller_id_lookup: Option<bool>,
    #[serde(default)]
    pub sms_url: Option<String>,
    #[serde(default)]
    pub sms_method: Option<String>,
    #[serde(default)]
    pub sms_fallback_url: Option<String>,
    #[serde(default)]
    pub sms_fallback_method: Option<String>,
    #[serde(default)]
    pub sms_status_callback: Option<String>,
    #[serde(default)]
    pub message_status_callback: Option<String>,
}

impl Application {
    /// The managed fields echoed back by the API.
    #[must_use]
    pub fn params(&self) -> ApplicationParams {
        ApplicationParams {
            friendly_name: self.friendly_name.clone(),
            api_version: self.api_version.clone(),
            voice_url: self.voice_url.clone(),
            voice_method: self.voice_method.clone(),
            voice_fallback_url: self.voice_fallback_url.clone(),
            voice_fallback_method: self.voice_fallback_method.clone(),
            status_callback: self.status_callback.clone(),
            status_callback_method: self.status_callback_method.clone(),
            voice_caller_id_lookup: self.voice_caller_id_lookup,
            sms_url: self.sms_url.clone(),
            sms_method: self.sms_method.clone(),
            sms_fallback_url: self.sms_fallback_url.clone(),
            sms_fallback_method: self.sms_fallback_method.clone(),
            sms_status_callback: self.sms_status_callback.clone(),
            message_status_callback: self.message_status_callback.clone(),
        }
    }

    /// Build an application echoing `params`, as the API would.
    #[must_use]
    pub fn echo(sid: impl Into<String>, params: &ApplicationParams) -> Self {
        Self {
            sid: sid.into(),
            friendly_name: params.friendly_name.clone(),
            api_version: params.api_version.clone(),
            voice_url: params.voice_url.clone(),
            voice_method: params.voice_method.clone(),
            voice_fallback_url: params.voice_fallback_url.clone(),
            voice_fallback_method: params.voice_fallback_method.clone(),
            status_callback: params.status_callback.clone(),
            status_callback_method: params.status_callback_method.clone(),
            voice_caller_id_lookup: params.voice_caller_id_lookup,
            sms_url: params.sms_url.clone(),
            sms_method: params.sms_method.clone(),
            sms_fallback_url: params.sms_fallback_url.clone(),
            sms_fallback_method: params.sms_fallback_method.clone(),
            sms_status_callback: params.sms_status_callback.clone(),
            message_status_callback: params.message_status_callback.clone(),
            ..Self::default()
        }
    }
}

/// Environment variable holding the account SID.
pub const ENV_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
/// Environment variable holding the account auth token.
pub const ENV_AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";
/// Environment variable holding an API key SID.
pub const ENV_API_KEY: &str = "TWILIO_API_KEY";
/// Environment variable holding an API key secret.
pub const ENV_API_SECRET: &str = "TWILIO_API_SECRET";

/// Credentials for the Twilio REST API.
///
/// Requests are addressed by account SID and authenticated with HTTP Basic,
/// either as account SID + auth token or as API key SID + secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    account_sid: String,
    username: String,
    secret: String,
}

impl Credentials {
    /// Authenticate with the account's auth token.
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        let account_sid = account_sid.into();
        Self {
            username: account_sid.clone(),
            account_sid,
            secret: auth_token.into(),
        }
    }

    /// Authenticate with an API key pair on behalf of `account_sid`.
    pub fn with_api_key(
        account_sid: impl Into<String>,
        key_sid: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            username: key_sid.into(),
            secret: key_secret.into(),
        }
    }

    /// Resolve credentials from explicit values, falling back to the environment.
    ///
    /// An API key pair wins over an auth token when both are present.
    pub fn resolve(
        account_sid: Option<String>,
        auth_token: Option<String>,
        api_key: Option<String>,
        api_secret: Option<String>,
    ) -> Result<Self> {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

        let account_sid = non_empty(account_sid)
            .or_else(|| env(ENV_ACCOUNT_SID))
            .ok_or_else(|| Error::MissingCredentials(format!("{ENV_ACCOUNT_SID} is not set")))?;

        let api_key = non_empty(api_key).or_else(|| env(ENV_API_KEY));
        let api_secret = non_empty(api_secret).or_else(|| env(ENV_API_SECRET));
        if let (Some(key), Some(secret)) = (api_key, api_secret) {
            log::debug!("Authenticating with API key {key}");
            return Ok(Self::with_api_key(account_sid, key, secret));
        }

        let auth_token = non_empty(auth_token)
            .or_else(|| env(ENV_AUTH_TOKEN))
            .ok_or_else(|| {
                Error::MissingCredentials(format!(
                    "neither {ENV_AUTH_TOKEN} nor {ENV_API_KEY}/{ENV_API_SECRET} is set"
                ))
            })?;

        Ok(Self::new(account_sid, auth_token))
    }

    /// Resolve credentials from the environment only.
    pub fn from_env() -> Result<Self> {
        Self::resolve(None, None, None, None)
    }

    /// The account requests are addressed to.
    #[must_use]
    pub fn account_sid(&self) -> &str {
        &self.account_sid
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn basic_auth(&self) -> String {
        let raw = format!("{}:{}", self.username, self.secret);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_sid", &self.account_sid)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}
