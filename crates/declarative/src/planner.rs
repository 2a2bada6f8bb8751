//! Planner - decides which provider call a reconciliation needs

use crate::resource::Stored;
use crate::types::Action;

/// Decide the single action that converges `stored` to `desired`
///
/// - stored state present and fields equal: [`Action::NoChange`]
/// - no stored state, or stored state without an id: [`Action::Create`]
/// - stored id with differing fields: [`Action::Update`]
///
/// The identifier never takes part in the equality check, so a state
/// whose fields match is unchanged even when it carries no id.
pub fn plan<S: Stored>(desired: &S::Fields, stored: Option<&S>) -> Action {
    let Some(stored) = stored else {
        return Action::Create;
    };

    if stored.matches(desired) {
        return Action::NoChange;
    }

    match stored.id() {
        Some(id) => Action::Update { id: id.to_string() },
        None => Action::Create,
    }
}
