use crate::config::{CliOverrides, Config, ServiceEntry};
use crate::converter::Strategy;
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "objectify")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert service files from named function exports to a single exported object")]
#[command(
    long_about = "Objectify rewrites JavaScript service files that export independent functions \
                  into one exported object literal whose methods are those functions. \
                  Imports and setup code above the first export are kept as they are."
)]
#[command(after_help = "EXAMPLES:\n  \
    objectify\n  \
    objectify --base-dir web/src/services --service user-service.js=userService\n  \
    objectify --strategy structural --backup --dry-run\n  \
    objectify --config objectify.toml --output-format json")]
pub struct Cli {
    /// Directory that service file names are resolved against
    #[arg(short = 'd', long, env = "OBJECTIFY_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Service to convert as FILE=OBJECT_NAME (repeatable, replaces the configured list)
    #[arg(short, long = "service", value_name = "FILE=NAME", value_parser = ServiceEntry::parse)]
    pub services: Vec<ServiceEntry>,

    /// How function boundaries are located
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Spaces added in front of each method line
    #[arg(long, value_name = "WIDTH")]
    pub indent: Option<usize>,

    /// Keep a copy of each original file as <file>.bak
    #[arg(long)]
    pub backup: bool,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are printed)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Convert in memory and report, without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Split at every line starting with `export function`
    Heuristic,
    /// Follow braces, strings, templates and comments
    Structural,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Heuristic => Strategy::Heuristic,
            StrategyArg::Structural => Strategy::Structural,
        }
    }
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        let entries = if self.services.is_empty() {
            None
        } else {
            Some(self.services.clone())
        };

        CliOverrides::new()
            .with_base_directory(self.base_dir.clone())
            .with_entries(entries)
            .with_strategy(self.strategy.map(Strategy::from))
            .with_indent_width(self.indent)
            .with_backup(self.backup)
    }
}
