use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declarative lifecycle management for Twilio applications", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Manifest file (default: <config dir>/switchboard.toml)
    #[arg(long, global = true, env = "SWITCHBOARD_MANIFEST")]
    pub manifest: Option<String>,

    /// State file (default: <state dir>/state.toml)
    #[arg(long, global = true, env = "SWITCHBOARD_STATE")]
    pub state: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show managed applications and their pending actions
    Status(TargetArgs),

    /// Show field-level changes apply would make
    Diff(DiffArgs),

    /// Create or update applications to match the manifest
    Apply(ApplyArgs),

    /// Delete an application and forget its state
    Destroy(DestroyArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct TargetArgs {
    /// Only this application
    pub name: Option<String>,
}

#[derive(Parser)]
pub struct DiffArgs {
    /// Only this application
    pub name: Option<String>,

    /// Print the diff as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Only this application
    pub name: Option<String>,

    /// Dry run - show what would be done
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Parser)]
pub struct DestroyArgs {
    /// Application to delete
    pub name: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}
