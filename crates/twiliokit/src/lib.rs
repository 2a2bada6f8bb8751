//! # twiliokit
//!
//! Pure Rust binding for managing Twilio Applications declaratively.
//!
//! This crate provides:
//! - The managed field set ([`ApplicationParams`]) and the API resource ([`Application`])
//! - Persisted state ([`ApplicationState`]) that plugs into [`declarative::reconcile`]
//! - A blocking REST backend over `ureq` and an in-memory mock backend
//!
//! ## Example
//!
//! ```no_run
//! use declarative::{reconcile, ApplyResult};
//! use twiliokit::{ApplicationParams, ApplicationState, Credentials, RestBackend};
//!
//! let backend = RestBackend::new(Credentials::from_env().expect("credentials"));
//! let desired = ApplicationParams {
//!     friendly_name: Some("Support line".to_string()),
//!     voice_url: Some("https://example.com/voice".to_string()),
//!     voice_method: Some("POST".to_string()),
//!     ..ApplicationParams::default()
//! };
//!
//! // First run creates; later runs update only when fields changed.
//! let out = reconcile(&backend, &desired, None::<ApplicationState>).expect("apply failed");
//! assert_eq!(out.result, ApplyResult::Created);
//! println!("Managing {}", out.state.sid.unwrap_or_default());
//! ```

#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod state;
pub mod types;

pub use backend::rest::{DEFAULT_API_BASE, RestBackend};
pub use backend::{Backend, Call, MockBackend};
pub use error::{Error, ErrorCategory, Result};
pub use state::ApplicationState;
pub use types::{
    Application, ApplicationParams, Credentials, ENV_ACCOUNT_SID, ENV_API_KEY, ENV_API_SECRET,
    ENV_AUTH_TOKEN,
};
