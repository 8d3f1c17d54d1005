pub mod cli;
pub mod config;
pub mod error;
pub mod experiment;
pub mod extractor;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{Config, ExperimentConfig, FileMode, MemberSpec};
pub use error::{Result, UserFriendlyError, VerunpackError};

// Core functionality re-exports
pub use experiment::{Experiment, MemberPatterns, MemberSelector};
pub use extractor::{Dtg, DtgParser, ExperimentReport, MemberReport, UnpackOutcome, UnpackReport, Unpacker};
pub use scanner::{filter_by_mode, ArchiveFile, ArchiveScanner, ScanResult};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};
use std::time::Instant;

/// Main library interface: owns the configuration and the UI plumbing and
/// drives the scan/unpack pipeline across all configured experiments.
pub struct VerUnpack {
    config: Config,
    dry_run: bool,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl VerUnpack {
    pub fn new(
        config: Config,
        dry_run: bool,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
    ) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            dry_run,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// No signal handler registration; handlers are process-global and tests
    /// would collide on them.
    #[cfg(test)]
    pub fn new_for_test(config: Config, dry_run: bool) -> Self {
        Self {
            config,
            dry_run,
            output_formatter: OutputFormatter::new(OutputMode::Plain, 0, true),
            progress_manager: ProgressManager::new(false),
            shutdown: GracefulShutdown::new_for_test(),
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(
            config,
            cli_args.dry_run,
            output_mode,
            cli_args.verbose,
            cli_args.quiet,
        )
    }

    /// Unpack every experiment in config order. Stops at the first fatal
    /// error; scan warnings accumulate in the report instead.
    pub fn run(&self) -> Result<UnpackReport> {
        let start_time = Instant::now();
        let mut report = UnpackReport::new(self.config.verdir.clone(), self.dry_run);

        self.shutdown.check_shutdown()?;

        let operation = if self.dry_run {
            "Unpacking verification archives (dry run)"
        } else {
            "Unpacking verification archives"
        };
        self.output_formatter.start_operation(operation);

        for (name, settings) in &self.config.experiments {
            self.shutdown.check_shutdown()?;

            let experiment = Experiment::resolve(name, settings, self.dry_run)?;

            self.output_formatter.print_separator();
            for line in experiment.describe().lines() {
                self.output_formatter.action(line);
            }

            let experiment_report = self.process_experiment(&experiment, &mut report.warnings)?;
            report.experiments.push(experiment_report);
        }

        report.duration = start_time.elapsed();
        Ok(report)
    }

    fn process_experiment(
        &self,
        experiment: &Experiment,
        warnings: &mut Vec<String>,
    ) -> Result<ExperimentReport> {
        let target_root = experiment.target_root(&self.config.verdir);
        let unpacker = Unpacker::new(experiment.mode, experiment.dry_run)?;

        let mut members = Vec::new();
        for selector in experiment.members.selectors() {
            self.shutdown.check_shutdown()?;
            members.push(self.process_member(experiment, &unpacker, &target_root, selector, warnings)?);
        }

        Ok(ExperimentReport {
            name: experiment.name.clone(),
            archive_root: experiment.archive_root.clone(),
            mode: experiment.mode.to_string(),
            members,
        })
    }

    fn process_member(
        &self,
        experiment: &Experiment,
        unpacker: &Unpacker,
        target_root: &Path,
        selector: MemberSelector<'_>,
        warnings: &mut Vec<String>,
    ) -> Result<MemberReport> {
        let scanner = ArchiveScanner::for_fragment(selector.fragment)?;
        let scan = scanner.scan(&experiment.archive_root);

        for warning in &scan.warnings {
            self.output_formatter.warning(warning);
        }
        warnings.extend(scan.warnings);

        let archives = filter_by_mode(scan.files, experiment.mode);

        let mut member_report = MemberReport::new(selector.dir_name);
        member_report.files_found = archives.len();

        if archives.is_empty() {
            self.output_formatter.info(&format!(
                "No {} archives under {} for '{}'",
                experiment.mode,
                experiment.archive_root.display(),
                selector.dir_name,
            ));
            return Ok(member_report);
        }

        let member_target = member_target_dir(target_root, selector.dir_name);
        let progress = self
            .progress_manager
            .create_archive_progress(archives.len() as u64);
        let member_start = Instant::now();

        for archive in &archives {
            self.shutdown.check_shutdown()?;

            let outcome = unpacker.unpack(archive, &member_target)?;
            self.progress_manager.suspend(|| {
                self.report_outcome(archive, &outcome);
            });

            match outcome {
                UnpackOutcome::Extracted { .. } => member_report.extracted += 1,
                UnpackOutcome::SkippedExisting { .. } => member_report.skipped += 1,
                UnpackOutcome::Planned { .. } => member_report.planned += 1,
            }
            progress.inc(1);
        }

        ui::progress::finish_progress_with_summary(
            &progress,
            &format!(
                "{}: {} unpacked, {} already present",
                if selector.dir_name.is_empty() {
                    experiment.name.as_str()
                } else {
                    selector.dir_name
                },
                member_report.extracted + member_report.planned,
                member_report.skipped,
            ),
            member_start.elapsed(),
        );

        Ok(member_report)
    }

    fn report_outcome(&self, archive: &ArchiveFile, outcome: &UnpackOutcome) {
        match outcome {
            UnpackOutcome::Extracted { destination } => {
                self.output_formatter.action(&format!(
                    "Unpack {} to {}",
                    archive.display_path(),
                    destination.display()
                ));
            }
            UnpackOutcome::SkippedExisting {
                destination,
                existing,
            } => {
                self.output_formatter.action(&format!(
                    "Found {} existing files for {} in {}, skipping",
                    existing,
                    archive.filename,
                    destination.display()
                ));
            }
            UnpackOutcome::Planned { destination } => {
                self.output_formatter.action(&format!(
                    "Would unpack {} to {}",
                    archive.display_path(),
                    destination.display()
                ));
            }
        }
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(VerunpackError::Io)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    pub fn handle_error(&self, error: &VerunpackError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// `<target_root>/<member>`, or the root itself when there is no member split.
fn member_target_dir(target_root: &Path, dir_name: &str) -> PathBuf {
    if dir_name.is_empty() {
        target_root.to_path_buf()
    } else {
        target_root.join(dir_name)
    }
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
