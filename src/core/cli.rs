use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// All relative paths will be interpreted relative to this directory.
    /// The coverage tool will be run in this directory.
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
    /// Write an example configuration file
    Init,

    /// Build coverage-vs-time curves with confidence bounds for fuzzing campaigns
    Analyze(AnalyzeArgs),

    /// Annotate a single coverage file and print its line coverage
    Extract(ExtractArgs),

    /// Print various information about the workspace
    Print {
        #[command(subcommand)]
        command: PrintArgs,
    },
}

/// Arguments for the analyze command
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Campaign directories.
    /// A directory containing config.json is analyzed as a single run.
    /// Otherwise each of its *.out subdirectories is a repeated run of one configuration.
    #[arg(value_name = "DIR", required = true)]
    pub dirs: Vec<String>,

    /// Coverage tool executable.
    /// Replaces config [tool].cmd if provided.
    #[arg(long = "tool.cmd")]
    pub tool_cmd: Option<String>,

    /// Rebuild series from existing vlt_cum_cov.csv files instead of running the coverage tool
    #[arg(long)]
    pub from_csv: bool,

    /// How to handle entries whose discovery times go backwards: "reject" or "sort".
    /// Replaces config [analysis].order if provided.
    #[arg(long)]
    pub order: Option<String>,

    /// Output format: "table" (default), "json", or "csv"
    #[arg(long, default_value = "table")]
    pub format: String,

    /// Write json/csv output to this file instead of stdout
    #[arg(long)]
    pub output: Option<String>,

    /// Hide per-run progress bars
    #[arg(long)]
    pub quiet: bool,
}

/// Arguments for the extract command
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Coverage data file to annotate
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Coverage tool executable.
    /// Replaces config [tool].cmd if provided.
    #[arg(long = "tool.cmd")]
    pub tool_cmd: Option<String>,

    /// Output format: "table" (default), "json", or "csv"
    #[arg(long, default_value = "table")]
    pub format: String,
}

/// Arguments for the print command
#[derive(Subcommand, Debug)]
pub enum PrintArgs {
    /// Print the effective global configuration
    Config(PrintConfigArgs),
}

/// Arguments for the print config subcommand
#[derive(Parser, Debug)]
pub struct PrintConfigArgs {
    /// Output format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}
