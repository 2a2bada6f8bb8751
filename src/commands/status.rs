use anyhow::Result;
use declarative::plan;
use twiliokit::ApplicationState;

use super::{Session, describe};
use crate::Context;
use crate::ui;

pub fn run(ctx: &Context, name: Option<&str>) -> Result<()> {
    let session = Session::load(ctx)?;
    let pending = report(ctx, &session, name)?;

    if !ctx.quiet {
        println!();
        if pending == 0 {
            ui::success("Everything matches the manifest");
        } else {
            ui::info(&format!(
                "{pending} application(s) out of date, run 'switchboard apply'"
            ));
        }
    }
    Ok(())
}

/// Print one line per application; returns how many need a call
fn report(ctx: &Context, session: &Session, name: Option<&str>) -> Result<usize> {
    ui::header("Switchboard Status");
    if ctx.verbose > 0 {
        ui::kv("manifest", &session.manifest_path.display().to_string());
        ui::kv("state", &session.state_path.display().to_string());
    }
    println!();

    let mut pending = 0;
    for (app, desired, stored) in session.targets(name)? {
        let action = plan::<ApplicationState>(desired, stored);
        if action.is_change() {
            pending += 1;
        }
        ui::action(app, &action);
        ui::kv("sid", &describe(stored));
        if ctx.verbose > 0 {
            if let Some(updated) = stored.and_then(|s| s.date_updated.as_deref()) {
                ui::kv("updated", updated);
            }
        }
    }

    if name.is_none() {
        for orphan in session.orphans() {
            let sid = session.state.get(orphan).and_then(|s| s.sid.as_deref());
            ui::orphan(orphan, sid);
        }
    }

    Ok(pending)
}
