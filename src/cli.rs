use crate::config::Config;
use crate::error::{Result, VerunpackError};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "verunpack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Unpack vfld/vobs verification archives")]
#[command(
    long_about = "Verunpack scans experiment archive trees for date-stamped vfld/vobs \
                  tar.gz bundles and extracts them into a date-partitioned output \
                  directory, skipping bundles that were already unpacked."
)]
#[command(after_help = "EXAMPLES:\n  \
    verunpack -c unpack.yml\n  \
    verunpack -c unpack.yml -d\n  \
    verunpack -c unpack.yml --output-format json -q\n  \
    verunpack --generate-config -c sample.yml\n")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, required_unless_present = "generate_config")]
    pub config: Option<PathBuf>,

    /// Dry run: report what would be created and unpacked without touching anything
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate a sample configuration file
    #[arg(long, help = "Write a sample YAML configuration file and exit")]
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

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let path = self.config.as_ref().ok_or_else(|| VerunpackError::Config {
            message: "no configuration file given (use -c)".to_string(),
        })?;

        let config = Config::load_from_file(path)?;
        config.validate()?;

        Ok(config)
    }

    /// Destination for --generate-config; -c names the file when given.
    pub fn config_output_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from("verunpack.yml"))
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
