use clap::{Args, Parser, Subcommand};
use restrain::workflows::session::SessionSource;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Restrain Developers",
    version,
    about = "Restrain CLI - evaluate, inspect and checkpoint restraint scoring functions over particle models.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to evaluate restraints in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate the total score, and optionally derivatives, of a session.
    Score(ScoreArgs),
    /// Print the static info exported by each restraint of a session.
    Info(InputArgs),
    /// Write a checkpoint of a session that can be restored later.
    Checkpoint(CheckpointArgs),
}

/// Where to load the session from; exactly one source is required.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Path to a TOML scene file describing particles and restraints.
    #[arg(short, long, value_name = "PATH")]
    pub scene: Option<PathBuf>,

    /// Path to a JSON checkpoint written by the `checkpoint` command.
    #[arg(long, value_name = "PATH")]
    pub checkpoint: Option<PathBuf>,
}

impl InputArgs {
    pub fn source(&self) -> Option<SessionSource> {
        match (&self.scene, &self.checkpoint) {
            (Some(scene), None) => Some(SessionSource::Scene(scene.clone())),
            (None, Some(checkpoint)) => Some(SessionSource::Checkpoint(checkpoint.clone())),
            _ => None,
        }
    }
}

/// Arguments for the `score` subcommand.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Also compute and print per-particle derivatives.
    #[arg(short, long)]
    pub derivatives: bool,

    /// Global weight applied to every restraint.
    #[arg(short, long, value_name = "FLOAT", default_value_t = 1.0)]
    pub weight: f64,
}

/// Arguments for the `checkpoint` subcommand.
#[derive(Args, Debug)]
pub struct CheckpointArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Path for the output checkpoint file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}
