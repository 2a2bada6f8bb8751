//! # Declarative
//!
//! Reconciliation of a single remote resource against last-known state.
//!
//! Given a desired field set and the state saved after the previous run,
//! the reconciler makes exactly one of: no call, one create call, or one
//! update call, and folds the provider's response back into the state.
//!
//! ## Core Concepts
//!
//! - **Provider**: Creates, updates, and removes the remote resource
//! - **Stored**: The persisted snapshot (id plus last applied fields)
//! - **Action**: The planned call (`NoChange`, `Create`, `Update`)
//! - **ResourceDiff**: Field-level preview of what apply would send
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{reconcile, remove, ApplyResult};
//!
//! // First run: nothing stored yet, so this creates
//! let out = reconcile(&client, &desired, None::<MyState>)?;
//! assert_eq!(out.result, ApplyResult::Created);
//!
//! // Same inputs again: no provider call
//! let out = reconcile(&client, &desired, Some(out.state))?;
//! assert_eq!(out.result, ApplyResult::NoChange);
//!
//! // Tear down by stored id
//! remove(&client, &out.state)?;
//! ```
//!
//! The lifecycle is `absent -> create -> present -> update* -> remove -> absent`.
//! Nothing is retried; provider errors reach the caller unchanged.

pub mod context;
pub mod diff;
pub mod executor;
pub mod planner;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use context::{AutoConfirm, AutoDecline, ConfirmCallback};
pub use diff::{DiffSummary, Diffable, FieldChange, ResourceDiff};
pub use executor::{Reconciled, reconcile, remove};
pub use planner::plan;
pub use resource::{Provider, Stored};
pub use types::{Action, ApplyResult, ExecuteOptions, ExecuteSummary};
