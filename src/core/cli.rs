use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// All relative paths will be interpreted relative to this directory.
    /// All child processes will be run in this directory.
    #[arg(long, global = true)]
    pub cwd: Option<String>,

    /// Logging level (overrides env/config). One of: trace, debug, info, warn, error
    #[arg(long = "log.level", global = true)]
    pub log_level: Option<String>,

    /// Logging color control: "on" to force colors, "off" to disable; omit for auto
    #[arg(long = "log.color", global = true)]
    pub log_color: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a mutation testing campaign against the given targets
    Run(RunArgs),

    /// Generate and list mutants for a target without running tests
    Mutants(MutantsArgs),

    /// List the mutatees a target resolves to, or every known class/method
    Targets(TargetsArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Target specification(s): `Class`, `Class.method` (associated
    /// function) or `Class#method` (method taking self).
    #[arg(value_name = "TARGET", required = true)]
    pub targets: Vec<String>,

    /// Source file(s) or directories to load.
    /// Directories are walked recursively for .rs files.
    #[arg(long = "src", value_name = "PATH", default_value = "src")]
    pub sources: Vec<String>,

    /// Test command for all mutants.
    /// Replaces config [test].cmd if provided.
    #[arg(long = "test.cmd")]
    pub test_cmd: Option<String>,

    /// Test timeout in seconds.
    /// Replaces config [test].timeout if provided.
    #[arg(long = "test.timeout")]
    pub test_timeout: Option<u32>,

    /// Seed for the random-literal operator's value source.
    /// Replaces config [run].seed if provided.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the baseline run of the unmutated test suite
    #[arg(long)]
    pub no_baseline: bool,

    /// Output format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}

/// Arguments for the mutants command
#[derive(Parser, Debug)]
pub struct MutantsArgs {
    /// Target specification(s) to generate mutants for
    #[arg(value_name = "TARGET", required = true)]
    pub targets: Vec<String>,

    /// Source file(s) or directories to load
    #[arg(long = "src", value_name = "PATH", default_value = "src")]
    pub sources: Vec<String>,

    /// Seed for the random-literal operator's value source
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}

/// Arguments for the targets command
#[derive(Parser, Debug)]
pub struct TargetsArgs {
    /// Target specification to resolve (omit to list every class)
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Source file(s) or directories to load
    #[arg(long = "src", value_name = "PATH", default_value = "src")]
    pub sources: Vec<String>,

    /// Output format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}
