//! Execution - issues the planned provider call and folds the response back

use crate::planner::plan;
use crate::resource::{Provider, Stored};
use crate::types::{Action, ApplyResult};

/// Outcome of a reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled<S> {
    /// State to persist
    pub state: S,
    /// What happened
    pub result: ApplyResult,
}

/// Converge a resource to `desired` with at most one provider call
///
/// # Arguments
/// * `provider` - Client used for the create or update call
/// * `desired` - Full desired field set
/// * `stored` - State recorded by the previous run, `None` on first run
///
/// # Returns
/// The state to persist and whether it was created, modified, or left alone.
/// Provider errors are returned as-is; nothing is retried.
pub fn reconcile<P, S>(
    provider: &P,
    desired: &P::Fields,
    stored: Option<S>,
) -> Result<Reconciled<S>, P::Error>
where
    P: Provider,
    S: Stored<Fields = P::Fields, Resource = P::Resource>,
{
    let action = plan(desired, stored.as_ref());
    log::debug!("Planned action: {}", action.verb());

    match (action, stored) {
        (Action::NoChange, Some(state)) => Ok(Reconciled {
            state,
            result: ApplyResult::NoChange,
        }),
        (Action::Update { id }, Some(mut state)) => {
            let resource = provider.update(&id, desired)?;
            state.absorb(resource);
            log::info!("Updated resource {id}");
            Ok(Reconciled {
                state,
                result: ApplyResult::Modified,
            })
        }
        // plan only yields NoChange or Update when a state exists
        (_, _) => {
            let resource = provider.create(desired)?;
            let mut state = S::default();
            state.absorb(resource);
            log::info!("Created resource {}", state.id().unwrap_or("<no id>"));
            Ok(Reconciled {
                state,
                result: ApplyResult::Created,
            })
        }
    }
}

/// Delete the resource recorded in `stored`
///
/// Returns [`ApplyResult::Removed`] after a successful provider call. A
/// state without an id has nothing to delete and returns
/// [`ApplyResult::NoChange`] without calling the provider. Callers clear
/// their stored state after a successful removal.
pub fn remove<P, S>(provider: &P, stored: &S) -> Result<ApplyResult, P::Error>
where
    P: Provider,
    S: Stored,
{
    let Some(id) = stored.id() else {
        log::debug!("No resource id recorded, nothing to remove");
        return Ok(ApplyResult::NoChange);
    };

    provider.remove(id)?;
    log::info!("Removed resource {id}");
    Ok(ApplyResult::Removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    struct Fields {
        name: String,
        url: String,
    }

    #[derive(Debug, Clone)]
    struct Response {
        id: String,
        fields: Fields,
        stamp: String,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct State {
        id: Option<String>,
        fields: Option<Fields>,
        stamp: Option<String>,
    }

    // `fields()` needs a reference even when nothing is stored
    static EMPTY: Fields = Fields {
        name: String::new(),
        url: String::new(),
    };

    impl Stored for State {
        type Fields = Fields;
        type Resource = Response;

        fn id(&self) -> Option<&str> {
            self.id.as_deref()
        }

        fn fields(&self) -> &Fields {
            self.fields.as_ref().unwrap_or(&EMPTY)
        }

        fn absorb(&mut self, resource: Response) {
            self.id = Some(resource.id);
            self.fields = Some(resource.fields);
            self.stamp = Some(resource.stamp);
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create(Fields),
        Update(String, Fields),
        Remove(String),
    }

    /// Records every call and answers with a fixed id
    #[derive(Default)]
    struct RecordingProvider {
        calls: RefCell<Vec<Call>>,
        fail: bool,
    }

    impl RecordingProvider {
        fn failing() -> Self {
            Self {
                calls: RefCell::default(),
                fail: true,
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    impl Provider for RecordingProvider {
        type Fields = Fields;
        type Resource = Response;
        type Error = String;

        fn create(&self, fields: &Fields) -> Result<Response, String> {
            self.calls.borrow_mut().push(Call::Create(fields.clone()));
            if self.fail {
                return Err("create rejected".into());
            }
            Ok(Response {
                id: "sid".into(),
                fields: fields.clone(),
                stamp: "created".into(),
            })
        }

        fn update(&self, id: &str, fields: &Fields) -> Result<Response, String> {
            self.calls
                .borrow_mut()
                .push(Call::Update(id.to_string(), fields.clone()));
            if self.fail {
                return Err("update rejected".into());
            }
            Ok(Response {
                id: id.to_string(),
                fields: fields.clone(),
                stamp: "updated".into(),
            })
        }

        fn remove(&self, id: &str) -> Result<(), String> {
            self.calls.borrow_mut().push(Call::Remove(id.to_string()));
            if self.fail {
                return Err("remove rejected".into());
            }
            Ok(())
        }
    }

    fn desired() -> Fields {
        Fields {
            name: "hello".into(),
            url: "foo".into(),
        }
    }

    #[test]
    fn test_unchanged_state_makes_no_call() {
        let provider = RecordingProvider::default();
        let stored = State {
            id: Some("sid".into()),
            fields: Some(desired()),
            stamp: Some("old".into()),
        };

        let out = reconcile(&provider, &desired(), Some(stored.clone())).unwrap();

        assert!(provider.calls().is_empty());
        assert_eq!(out.result, ApplyResult::NoChange);
        assert_eq!(out.state, stored);
    }

    #[test]
    fn test_first_run_creates_once() {
        let provider = RecordingProvider::default();

        let out = reconcile::<_, State>(&provider, &desired(), None).unwrap();

        assert_eq!(provider.calls(), vec![Call::Create(desired())]);
        assert_eq!(out.result, ApplyResult::Created);
        assert_eq!(out.state.id.as_deref(), Some("sid"));
        assert_eq!(out.state.stamp.as_deref(), Some("created"));
    }

    #[test]
    fn test_incomplete_previous_run_creates() {
        let provider = RecordingProvider::default();

        let out = reconcile(&provider, &desired(), Some(State::default())).unwrap();

        assert_eq!(provider.calls(), vec![Call::Create(desired())]);
        assert_eq!(out.result, ApplyResult::Created);
    }

    #[test]
    fn test_changed_fields_update_by_stored_id() {
        let provider = RecordingProvider::default();
        let stored = State {
            id: Some("sid".into()),
            ..State::default()
        };

        let out = reconcile(&provider, &desired(), Some(stored)).unwrap();

        assert_eq!(
            provider.calls(),
            vec![Call::Update("sid".into(), desired())]
        );
        assert_eq!(out.result, ApplyResult::Modified);
        assert_eq!(out.state.fields, Some(desired()));
        assert_eq!(out.state.stamp.as_deref(), Some("updated"));
    }

    #[test]
    fn test_provider_error_propagates_unchanged() {
        let provider = RecordingProvider::failing();
        let stored = State {
            id: Some("sid".into()),
            ..State::default()
        };

        let err = reconcile(&provider, &desired(), Some(stored)).unwrap_err();
        assert_eq!(err, "update rejected");

        let err = reconcile::<_, State>(&provider, &desired(), None).unwrap_err();
        assert_eq!(err, "create rejected");
        assert_eq!(provider.calls().len(), 2);
    }

    #[test]
    fn test_remove_addresses_stored_id() {
        let provider = RecordingProvider::default();
        let stored = State {
            id: Some("sid".into()),
            fields: Some(desired()),
            stamp: None,
        };

        let result = remove(&provider, &stored).unwrap();

        assert_eq!(result, ApplyResult::Removed);
        assert_eq!(provider.calls(), vec![Call::Remove("sid".into())]);
    }

    #[test]
    fn test_remove_without_id_skips_provider() {
        let provider = RecordingProvider::default();

        let result = remove(&provider, &State::default()).unwrap();

        assert_eq!(result, ApplyResult::NoChange);
        assert!(provider.calls().is_empty());
    }

    #[test]
    fn test_remove_error_propagates() {
        let provider = RecordingProvider::failing();
        let stored = State {
            id: Some("sid".into()),
            ..State::default()
        };

        assert_eq!(remove(&provider, &stored).unwrap_err(), "remove rejected");
    }
}
