use std::path::PathBuf;

use clap::Parser;

const EXAMPLES: &str = "EXAMPLES:
  1. Display current in-progress JOB events.
     batchwatch myminio/ KwSysDpxcBU9FNhGkn2dCf
  2. Print one JSON record per second until the job finishes.
     batchwatch --json myminio/ KwSysDpxcBU9FNhGkn2dCf";

/// Summarize batch job events on an object storage server in real time.
#[derive(Debug, Parser)]
#[command(name = "batchwatch", version, after_help = EXAMPLES)]
pub(crate) struct Cli {
    /// Server alias from the config file (e.g. `myminio/`) or an http(s) URL.
    pub target: String,

    /// Identifier of the batch job to watch.
    pub job_id: String,

    /// Emit one JSON record per metrics tick instead of the live display.
    #[arg(long)]
    pub json: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Alias configuration file.
    #[arg(long, value_name = "PATH", env = "BATCHWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log at debug level.
    #[arg(long)]
    pub debug: bool,
}
