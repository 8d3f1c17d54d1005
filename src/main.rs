use clap::error::ErrorKind;
use clap::Parser;
use std::process;
use verunpack::{Cli, OutputFormatter, OutputMode, UserFriendlyError, VerUnpack, VerunpackError};

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    // try_parse instead of parse: a bare invocation must print usage and
    // exit 1, not clap's default 2. --help and --version still exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    print!("{}", err);
                    0
                }
                _ => {
                    eprint!("{}", err);
                    1
                }
            };
        }
    };

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let app = match VerUnpack::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    match app.run() {
        Ok(report) => {
            app.output_formatter().print_run_report(&report);
            0
        }
        Err(e) => {
            app.handle_error(&e);

            match e {
                VerunpackError::Cancelled => 130, // Interrupted (SIGINT)
                _ => 1,
            }
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli.config_output_path();

    match VerUnpack::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path.display());
            println!("\nTo use this configuration:");
            println!("  verunpack -c {}", config_path.display());
            println!("\nEdit the file to point at your experiment archives.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &VerunpackError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.yml");

        let cli = Cli::try_parse_from([
            "verunpack",
            "--generate-config",
            "-c",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);
        assert!(config_path.exists());

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("verdir:"));
        assert!(content.contains("experiments:"));
    }

    #[test]
    fn test_generate_config_into_missing_directory_fails() {
        let cli = Cli::try_parse_from([
            "verunpack",
            "--generate-config",
            "-c",
            "/no/such/dir/sample.yml",
        ])
        .unwrap();

        assert_eq!(handle_generate_config(&cli), 1);
    }
}
