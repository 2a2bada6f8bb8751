use anyhow::Result;
use colored::Colorize;
use declarative::{DiffSummary, ResourceDiff};
use serde::Serialize;
use twiliokit::ApplicationState;

use super::Session;
use crate::Context;
use crate::ui;

/// Machine-readable form of `switchboard diff --json`
#[derive(Serialize)]
struct DiffReport<'a> {
    diffs: &'a [ResourceDiff],
    orphaned: &'a [&'a str],
    summary: DiffSummary,
}

pub fn run(ctx: &Context, name: Option<&str>, json: bool) -> Result<()> {
    let session = Session::load(ctx)?;
    let (diffs, orphaned) = compute(&session, name)?;
    let summary = DiffSummary::from_diffs(&diffs, orphaned.len());

    if json {
        let report = DiffReport {
            diffs: &diffs,
            orphaned: &orphaned,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !summary.has_changes() {
        ui::success("No changes, Twilio matches the manifest");
        return Ok(());
    }

    print_diffs(&diffs, &orphaned);
    print_summary(&summary);
    Ok(())
}

/// Diffs for the selected applications plus orphaned state names
///
/// Orphans are only reported when no single application is selected.
pub fn compute<'a>(
    session: &'a Session,
    name: Option<&str>,
) -> Result<(Vec<ResourceDiff>, Vec<&'a str>)> {
    let diffs = session
        .targets(name)?
        .into_iter()
        .filter_map(|(app, desired, stored)| {
            ResourceDiff::compute::<ApplicationState>(app, desired, stored)
        })
        .collect();
    let orphaned = if name.is_none() {
        session.orphans()
    } else {
        Vec::new()
    };
    Ok((diffs, orphaned))
}

pub fn print_diffs(diffs: &[ResourceDiff], orphaned: &[&str]) {
    println!();
    for diff in diffs {
        ui::action(&diff.name, &diff.action);
        for change in &diff.changes {
            ui::field_change(change);
        }
    }
    for name in orphaned {
        ui::orphan(name, None);
    }
}

fn print_summary(summary: &DiffSummary) {
    println!();
    println!(
        "  {} to create, {} to update, {} orphaned",
        summary.additions.to_string().green(),
        summary.modifications.to_string().yellow(),
        summary.removals.to_string().red()
    );
    if summary.removals > 0 {
        ui::dim("Orphaned applications are left in place; use 'switchboard destroy NAME'");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{MANIFEST, session};
    use declarative::Action;
    use twiliokit::ApplicationParams;

    #[test]
    fn test_diff_without_state_creates_all() {
        let (_dir, session) = session(MANIFEST);
        let (diffs, orphaned) = compute(&session, None).unwrap();

        assert_eq!(diffs.len(), 2);
        assert!(diffs.iter().all(ResourceDiff::is_addition));
        assert!(orphaned.is_empty());

        let support = diffs.iter().find(|d| d.name == "support-line").unwrap();
        let fields: Vec<_> = support.changes.iter().map(|c| c.field).collect();
        assert_eq!(fields, vec!["friendly_name", "voice_url"]);
    }

    #[test]
    fn test_diff_reports_changed_field_only() {
        let (_dir, mut session) = session(MANIFEST);
        session.state.set(
            "support-line",
            ApplicationState {
                sid: Some("AP1".into()),
                fields: ApplicationParams {
                    friendly_name: Some("Support line".into()),
                    voice_url: Some("https://old.example.com/voice".into()),
                    ..ApplicationParams::default()
                },
                ..ApplicationState::default()
            },
        );

        let (diffs, _) = compute(&session, Some("support-line")).unwrap();

        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].action, Action::Update { id: "AP1".into() });
        assert_eq!(diffs[0].changes.len(), 1);
        assert_eq!(diffs[0].changes[0].field, "voice_url");
        assert_eq!(
            diffs[0].changes[0].from.as_deref(),
            Some("https://old.example.com/voice")
        );
    }

    #[test]
    fn test_orphans_only_without_selection() {
        let (_dir, mut session) = session(MANIFEST);
        session.state.set("retired", ApplicationState::default());

        let (_, all) = compute(&session, None).unwrap();
        let (_, one) = compute(&session, Some("alerts")).unwrap();

        assert_eq!(all, vec!["retired"]);
        assert!(one.is_empty());
    }

    #[test]
    fn test_json_report_shape() {
        let (_dir, session) = session(MANIFEST);
        let (diffs, orphaned) = compute(&session, Some("alerts")).unwrap();
        let report = DiffReport {
            diffs: &diffs,
            orphaned: &orphaned,
            summary: DiffSummary::from_diffs(&diffs, orphaned.len()),
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["diffs"][0]["name"], "alerts");
        assert_eq!(value["diffs"][0]["action"], "create");
        assert_eq!(value["summary"]["additions"], 1);
    }
}
