//! Backends that execute application calls.
//!
//! Every backend implements [`declarative::Provider`] for Twilio
//! Applications. The primary implementation is [`rest::RestBackend`], which
//! talks to the Twilio REST API.
//!
//! # Testing
//!
//! Use [`MockBackend`] for testing without network access:
//!
//! ```
//! use declarative::{reconcile, ApplyResult};
//! use twiliokit::{ApplicationParams, ApplicationState, MockBackend};
//!
//! let mock = MockBackend::new();
//! let desired = ApplicationParams {
//!     friendly_name: Some("Support line".to_string()),
//!     ..ApplicationParams::default()
//! };
//!
//! let out = reconcile(&mock, &desired, None::<ApplicationState>).unwrap();
//! assert_eq!(out.result, ApplyResult::Created);
//! assert_eq!(mock.calls().len(), 1);
//! ```

pub mod rest;

use crate::error::{Error, Result};
use crate::types::{Application, ApplicationParams};
use declarative::Provider;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// A provider for Twilio Applications.
///
/// Blanket-implemented for every [`Provider`] with the Twilio field set,
/// response, and error types, so callers can write a single bound.
pub trait Backend:
    Provider<Fields = ApplicationParams, Resource = Application, Error = Error>
{
}

impl<T> Backend for T where
    T: Provider<Fields = ApplicationParams, Resource = Application, Error = Error>
{
}

/// A call recorded by [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `create` with the submitted fields.
    Create(ApplicationParams),
    /// `update` of the given sid with the submitted fields.
    Update(String, ApplicationParams),
    /// `remove` of the given sid.
    Remove(String),
}

/// Mock backend for testing without network access.
///
/// Records every call. By default it echoes the submitted fields back with
/// a generated sid; [`MockBackend::returning`] fixes the response and
/// [`MockBackend::failing`] makes every call fail.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    calls: Arc<Mutex<Vec<Call>>>,
    response: Option<Application>,
    failure: Option<Error>,
    next_sid: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Create a mock that echoes submitted fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that answers every create and update with `response`.
    #[must_use]
    pub fn returning(response: Application) -> Self {
        Self {
            response: Some(response),
            ..Self::default()
        }
    }

    /// Create a mock whose every call fails with `error`.
    #[must_use]
    pub fn failing(error: Error) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// All calls made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn respond(&self, sid: Option<&str>, params: &ApplicationParams) -> Application {
        if let Some(response) = &self.response {
            return response.clone();
        }
        let sid = match sid {
            Some(sid) => sid.to_string(),
            None => {
                let n = self.next_sid.fetch_add(1, Ordering::SeqCst) + 1;
                format!("AP{n:032}")
            }
        };
        Application {
            date_created: Some("Thu, 01 Jan 2026 00:00:00 +0000".to_string()),
            date_updated: Some("Thu, 01 Jan 2026 00:00:00 +0000".to_string()),
            ..Application::echo(sid, params)
        }
    }
}

impl Provider for MockBackend {
    type Fields = ApplicationParams;
    type Resource = Application;
    type Error = Error;

    fn create(&self, fields: &ApplicationParams) -> Result<Application> {
        self.record(Call::Create(fields.clone()))?;
        Ok(self.respond(None, fields))
    }

    fn update(&self, id: &str, fields: &ApplicationParams) -> Result<Application> {
        self.record(Call::Update(id.to_string(), fields.clone()))?;
        Ok(self.respond(Some(id), fields))
    }

    fn remove(&self, id: &str) -> Result<()> {
        self.record(Call::Remove(id.to_string()))
    }
}
