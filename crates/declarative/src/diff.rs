//! Diff computation for resources

use crate::planner::plan;
use crate::resource::Stored;
use crate::types::Action;
use serde::Serialize;

/// A single field whose stored value differs from the desired one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    /// Field name as written in configuration
    pub field: &'static str,
    /// Stored value, `None` when unset
    pub from: Option<String>,
    /// Desired value, `None` when unset
    pub to: Option<String>,
}

impl FieldChange {
    /// Build a change if `from` and `to` differ
    pub fn between<T: ToString + PartialEq>(
        field: &'static str,
        from: Option<&T>,
        to: Option<&T>,
    ) -> Option<Self> {
        if from == to {
            return None;
        }
        Some(Self {
            field,
            from: from.map(ToString::to_string),
            to: to.map(ToString::to_string),
        })
    }
}

/// Field sets that can report which of their fields differ
pub trait Diffable {
    /// Fields of `self` (stored) that differ from `desired`
    fn changes(&self, desired: &Self) -> Vec<FieldChange>;
}

/// A diff between stored and desired state of a resource
#[derive(Debug, Clone, Serialize)]
pub struct ResourceDiff {
    /// Name the resource is declared under
    pub name: String,
    /// The call apply would make
    #[serde(flatten)]
    pub action: Action,
    /// Field-level changes
    pub changes: Vec<FieldChange>,
}

impl ResourceDiff {
    /// Compute a diff, returning None if no changes are needed
    pub fn compute<S>(name: &str, desired: &S::Fields, stored: Option<&S>) -> Option<Self>
    where
        S: Stored,
        S::Fields: Diffable + Default,
    {
        let action = plan(desired, stored);
        if !action.is_change() {
            return None;
        }

        let changes = match stored {
            Some(state) => state.fields().changes(desired),
            None => S::Fields::default().changes(desired),
        };

        Some(Self {
            name: name.to_string(),
            action,
            changes,
        })
    }

    /// Check if this diff represents an addition
    pub fn is_addition(&self) -> bool {
        matches!(self.action, Action::Create)
    }

    /// Check if this diff represents a modification
    pub fn is_modification(&self) -> bool {
        matches!(self.action, Action::Update { .. })
    }
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiffSummary {
    /// Number of resources to create
    pub additions: usize,
    /// Number of resources to update
    pub modifications: usize,
    /// Number of stored resources no longer declared
    pub removals: usize,
}

impl DiffSummary {
    /// Create a summary from a list of diffs and the count of orphaned entries
    pub fn from_diffs(diffs: &[ResourceDiff], orphaned: usize) -> Self {
        let mut summary = Self {
            removals: orphaned,
            ..Self::default()
        };
        for diff in diffs {
            if diff.is_addition() {
                summary.additions += 1;
            } else if diff.is_modification() {
                summary.modifications += 1;
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.modifications
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}
