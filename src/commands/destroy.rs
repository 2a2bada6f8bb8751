use anyhow::{Context as _, Result};
use declarative::{ApplyResult, AutoConfirm, ConfirmCallback, remove};
use twiliokit::{Backend, ErrorCategory};

use super::{PromptConfirm, Session};
use crate::Context;
use crate::ui;

pub fn run(ctx: &Context, name: &str, yes: bool) -> Result<()> {
    let mut session = Session::load(ctx)?;
    let backend = session.manifest.provider.backend()?;

    if yes {
        execute(&backend, &mut session, name, &mut AutoConfirm)?;
    } else {
        execute(&backend, &mut session, name, &mut PromptConfirm)?;
    }
    Ok(())
}

/// Delete `name` by its recorded sid and forget it
pub fn execute<B, C>(
    backend: &B,
    session: &mut Session,
    name: &str,
    confirm: &mut C,
) -> Result<ApplyResult>
where
    B: Backend,
    C: ConfirmCallback,
{
    let Some(stored) = session.state.get(name).cloned() else {
        ui::warn(&format!("No state recorded for '{name}', nothing to destroy"));
        return Ok(ApplyResult::NoChange);
    };

    let Some(sid) = stored.sid.clone() else {
        // Never created; the entry carries nothing worth keeping
        session.state.forget(name);
        session.state.touch(&session.state_path)?;
        ui::warn(&format!("'{name}' was never created, cleared its state"));
        return Ok(ApplyResult::NoChange);
    };

    if !confirm.confirm(&format!("Delete '{name}' ({sid}) from Twilio?"))? {
        ui::info("Aborted");
        return Ok(ApplyResult::Skipped {
            reason: "declined".to_string(),
        });
    }

    let result = match remove(backend, &stored) {
        Ok(result) => {
            ui::success(&format!("Deleted '{name}' ({sid})"));
            result
        }
        Err(err) if err.category() == ErrorCategory::NotFound => {
            ui::warn(&format!(
                "'{name}' ({sid}) no longer exists in Twilio, clearing its state"
            ));
            ApplyResult::NoChange
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to delete '{name}' ({sid})"));
        }
    };

    session.state.forget(name);
    session.state.touch(&session.state_path)?;

    if session.manifest.applications.contains_key(name) {
        ui::dim(&format!(
            "'{name}' is still in the manifest, the next apply will create it again"
        ));
    }
    Ok(result)
}
