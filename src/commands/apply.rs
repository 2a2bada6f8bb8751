use anyhow::{Result, bail};
use colored::Colorize;
use declarative::{
    ApplyResult, AutoConfirm, ConfirmCallback, DiffSummary, ExecuteOptions, ExecuteSummary,
    reconcile,
};
use twiliokit::Backend;

use super::{PromptConfirm, Session, diff};
use crate::Context;
use crate::ui;

pub fn run(ctx: &Context, name: Option<&str>, dry_run: bool, yes: bool) -> Result<()> {
    let mut session = Session::load(ctx)?;
    let backend = session.manifest.provider.backend()?;
    let opts = ExecuteOptions {
        dry_run,
        assume_yes: yes,
    };

    let summary = if opts.assume_yes {
        execute(&backend, &mut session, name, &opts, &mut AutoConfirm)?
    } else {
        execute(&backend, &mut session, name, &opts, &mut PromptConfirm)?
    };

    if !ctx.quiet && summary.total() > 0 {
        print_summary(&summary);
    }
    if !summary.is_success() {
        bail!("{} application(s) failed", summary.failed);
    }
    Ok(())
}

/// Reconcile every selected application against `backend`
///
/// State is saved after each successful change, so a failure part way through
/// keeps everything already applied.
pub fn execute<B, C>(
    backend: &B,
    session: &mut Session,
    name: Option<&str>,
    opts: &ExecuteOptions,
    confirm: &mut C,
) -> Result<ExecuteSummary>
where
    B: Backend,
    C: ConfirmCallback,
{
    // 1. Plan
    let (diffs, orphaned) = diff::compute(session, name)?;
    let pending: Vec<String> = diffs.iter().map(|d| d.name.clone()).collect();
    let plan = DiffSummary::from_diffs(&diffs, orphaned.len());

    if pending.is_empty() {
        ui::success("No changes, Twilio matches the manifest");
        return Ok(ExecuteSummary::default());
    }

    // 2. Show
    diff::print_diffs(&diffs, &orphaned);
    println!();
    println!(
        "  {} {} to create, {} to update",
        "→".cyan(),
        plan.additions,
        plan.modifications
    );

    if opts.dry_run {
        println!();
        println!("  {} Dry run - no changes made", "ℹ".blue());
        return Ok(ExecuteSummary::default());
    }

    // 3. Confirm (unless --yes)
    if !opts.assume_yes && !confirm.confirm("Apply these changes?")? {
        println!();
        println!("  {} Aborted", "✗".red());
        return Ok(ExecuteSummary {
            skipped: pending.len(),
            ..ExecuteSummary::default()
        });
    }

    // 4. Execute one call per application, persisting as we go
    let mut summary = ExecuteSummary::default();
    for app in &pending {
        let Some(desired) = session.manifest.applications.get(app) else {
            continue;
        };
        let stored = session.state.get(app).cloned();

        let result = match reconcile(backend, desired, stored) {
            Ok(out) if out.result.is_change() => {
                let sid = out.state.sid.clone().unwrap_or_default();
                session.state.set(app, out.state);
                // The entry stays in memory, so a later save in this run still records it
                match session.state.touch(&session.state_path) {
                    Ok(()) => {
                        let verb = match out.result {
                            ApplyResult::Created => "created",
                            _ => "updated",
                        };
                        ui::success(&format!("{app}: {verb} ({sid})"));
                        out.result
                    }
                    Err(err) => {
                        log::warn!("{app} is live as {sid} but its state was not saved");
                        ui::error(&format!("{app}: applied as {sid} but not saved: {err:#}"));
                        ApplyResult::Failed {
                            error: format!("{err:#}"),
                        }
                    }
                }
            }
            Ok(out) => {
                ui::success(&format!("{app}: unchanged"));
                out.result
            }
            Err(err) => {
                ui::error(&format!("{app}: {err}"));
                ui::dim(err.category().advice());
                ApplyResult::Failed {
                    error: err.to_string(),
                }
            }
        };
        summary.add_result(&result);
    }

    Ok(summary)
}

/// Print execution summary
fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.is_success() {
        println!("  {} Applications applied successfully!", "✓".green().bold());
    } else {
        println!("  {} Applications applied with errors", "⚠".yellow().bold());
    }

    if summary.created > 0 {
        println!("    • {} created", summary.created);
    }
    if summary.modified > 0 {
        println!("    • {} updated", summary.modified);
    }
    if summary.skipped > 0 {
        println!("    • {} skipped", summary.skipped);
    }
    if summary.failed > 0 {
        println!("    • {} {}", summary.failed, "failed".red());
    }
}
