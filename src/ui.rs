use colored::Colorize;
use declarative::{Action, FieldChange};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print the planned action for an application
pub fn action(name: &str, action: &Action) {
    let marker = match action {
        Action::NoChange => "=".dimmed(),
        Action::Create => "+".green().bold(),
        Action::Update { .. } => "~".yellow().bold(),
    };
    println!("{marker} {name} {}", format!("({})", action.verb()).dimmed());
}

/// Print one field-level change
pub fn field_change(change: &FieldChange) {
    let from = change.from.as_deref().unwrap_or("(unset)");
    let to = change.to.as_deref().unwrap_or("(unset)");
    println!("    {}: {} → {}", change.field, from.red(), to.green());
}

/// Print an application recorded in state but gone from the manifest
pub fn orphan(name: &str, sid: Option<&str>) {
    println!(
        "{} {} {}",
        "-".red().bold(),
        name,
        format!("(orphaned, sid {})", sid.unwrap_or("none")).dimmed()
    );
}
