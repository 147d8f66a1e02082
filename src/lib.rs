pub mod batch;
pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod logging;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat, StrategyArg};
pub use config::{CliOverrides, Config, ConversionConfig, ServiceEntry, ServicesConfig};
pub use error::{ObjectifyError, Result, UserFriendlyError};

// Core functionality re-exports
pub use batch::{BatchReport, BatchRunner, BatchSummary, FileReport, FileStatus};
pub use converter::{Conversion, Converter, ExportMatch, SafeWriter, Strategy, WriteOutcome};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;
use tracing::debug;

/// Main library interface for converting a batch of service files
pub struct Objectify {
    config: Config,
    dry_run: bool,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl Objectify {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        // Progress output would interleave with JSON lines on stdout.
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            dry_run: false,
            output_formatter,
            progress_manager,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Create an Objectify instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
            .with_dry_run(cli_args.dry_run))
    }

    /// Convert every configured service file in order.
    ///
    /// Only setup problems are returned as errors. Per-file failures are
    /// recorded in the report and the remaining files are still processed.
    pub fn run_batch(&self) -> Result<BatchReport> {
        let converter = Converter::new()?
            .with_strategy(self.config.conversion.strategy)
            .with_indent_width(self.config.conversion.indent_width);
        let writer = SafeWriter::new()
            .with_dry_run(self.dry_run)
            .with_backup(self.config.conversion.backup);

        let entries = self.config.resolved_entries();
        debug!(
            base_directory = %self.config.services.base_directory.display(),
            files = entries.len(),
            strategy = %converter.strategy(),
            "starting batch"
        );

        if self.dry_run {
            self.output_formatter
                .info("Dry run: files will be converted in memory only");
        }
        self.output_formatter.start_operation(&format!(
            "Converting {} service files in {}",
            entries.len(),
            self.config.services.base_directory.display()
        ));

        let pb = self.progress_manager.create_batch_progress(entries.len() as u64);
        let report = BatchRunner::new(&converter, &writer).run(&entries, |file| {
            self.progress_manager
                .suspend(|| self.output_formatter.print_file_status(file));
            ui::progress::update_batch_progress(&pb, file);
        });

        let summary = report.summary();
        ui::progress::finish_progress_with_summary(
            &pb,
            &format!("Converted {} of {} files", summary.converted, summary.total),
            report.duration,
        );

        Ok(report)
    }

    /// Write the default configuration as a starting point.
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::default().save_to_file(output_path)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &ObjectifyError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Convert a single source string with default settings.
pub fn convert_source(source: &str, object_name: &str) -> Result<Conversion> {
    Converter::new()?.convert_source(source, object_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(dir: &Path, entries: Vec<ServiceEntry>) -> Config {
        let mut config = Config::default();
        config.services.base_directory = dir.to_path_buf();
        config.services.entries = entries;
        config
    }

    #[test]
    fn test_objectify_creation() {
        let objectify = Objectify::new(Config::default(), OutputMode::Human, 1, false);
        assert_eq!(objectify.config().services.entries.len(), 14);
        assert_eq!(objectify.output_formatter().mode(), OutputMode::Human);
    }

    #[test]
    fn test_run_batch_converts_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("tag-service.js"),
            "import { api } from './api.js';\n\nexport function list() {\n  return api.get('/tags');\n}\n\nexport async function remove(id) {\n  return api.delete(`/tags/${id}`);\n}\n",
        )
        .unwrap();

        let config = config_for(
            temp_dir.path(),
            vec![
                ServiceEntry::new("tag-service.js", "tagService"),
                ServiceEntry::new("gone-service.js", "goneService"),
            ],
        );
        let objectify = Objectify::new(config, OutputMode::Plain, 0, true);
        let report = objectify.run_batch().unwrap();

        let summary = report.summary();
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.not_found, 1);

        let converted = fs::read_to_string(temp_dir.path().join("tag-service.js")).unwrap();
        assert!(converted.starts_with("import { api } from './api.js';\n\nexport const tagService = {\n"));
        assert!(converted.contains("  list() {"));
        assert!(converted.contains("  async remove(id) {"));
        assert!(converted.ends_with("};\n"));
    }

    #[test]
    fn test_run_batch_dry_run() {
        let temp_dir = TempDir::new().unwrap();
        let original = "export function ping() {\n  return true;\n}\n";
        fs::write(temp_dir.path().join("status-service.js"), original).unwrap();

        let config = config_for(
            temp_dir.path(),
            vec![ServiceEntry::new("status-service.js", "statusService")],
        );
        let objectify = Objectify::new(config, OutputMode::Plain, 0, true).with_dry_run(true);
        let report = objectify.run_batch().unwrap();

        assert!(report.dry_run);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("status-service.js")).unwrap(),
            original
        );
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        let result = Objectify::generate_sample_config(&config_path);
        assert!(result.is_ok());

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[services]"));
        assert!(content.contains("[conversion]"));
        assert!(Config::load_from_file(&config_path).is_ok());
    }

    #[test]
    fn test_convert_source_helper() {
        let conversion = convert_source("export function a() {}\n", "aService").unwrap();
        assert_eq!(conversion.export_count(), 1);

        assert!(matches!(
            convert_source("export function a() {}\n", "a-service"),
            Err(ObjectifyError::InvalidIdentifier { .. })
        ));
    }
}
