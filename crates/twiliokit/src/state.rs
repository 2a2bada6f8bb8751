//! Stored state of a managed Twilio Application.

use declarative::Stored;
use serde::{Deserialize, Serialize};

use crate::types::{Application, ApplicationParams};

/// Last known state of an application, persisted between runs.
///
/// `Default` is the state before any successful create: no `sid` and no
/// fields. A state with fields but no `sid` comes from a run that never
/// completed and is treated as not yet created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_updated: Option<String>,
    /// Field values echoed by the last successful create or update.
    #[serde(default, skip_serializing_if = "ApplicationParams::is_empty")]
    pub fields: ApplicationParams,
}

impl ApplicationState {
    /// Whether a live application is recorded.
    #[must_use]
    pub fn is_managed(&self) -> bool {
        self.sid.is_some()
    }
}

impl Stored for ApplicationState {
    type Fields = ApplicationParams;
    type Resource = Application;

    fn id(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    fn fields(&self) -> &ApplicationParams {
        &self.fields
    }

    fn absorb(&mut self, app: Application) {
        self.fields = app.params();
        self.sid = Some(app.sid);
        self.account_sid = app.account_sid;
        self.auth_token = app.auth_token;
        self.uri = app.uri;
        self.date_created = app.date_created;
        self.date_updated = app.date_updated;
    }

    /// Only fields set in `desired` are compared; the `sid` never is.
    fn matches(&self, desired: &ApplicationParams) -> bool {
        self.fields.covers(desired)
    }
}
