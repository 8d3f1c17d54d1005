use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerunpackError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Archive directory does not exist: {path}")]
    ArchiveRootMissing { experiment: String, path: String },

    #[error("Filename does not carry a {expected}-digit timestamp: {name}")]
    MalformedFilename { name: String, expected: usize },

    #[error("Failed to extract {path}: {message}")]
    Archive { path: String, message: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for VerunpackError {
    fn user_message(&self) -> String {
        match self {
            VerunpackError::ConfigNotFound { path } => {
                format!("Could not find config file: {}", path)
            }
            VerunpackError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            VerunpackError::ArchiveRootMissing { experiment, path } => {
                format!(
                    "Archive directory for experiment '{}' does not exist: {}",
                    experiment, path
                )
            }
            VerunpackError::MalformedFilename { name, expected } => {
                format!(
                    "Archive name '{}' does not end in a {}-digit timestamp before .tar.gz",
                    name, expected
                )
            }
            VerunpackError::Archive { path, message } => {
                format!("Failed to extract {}: {}", path, message)
            }
            VerunpackError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            VerunpackError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            VerunpackError::ConfigNotFound { .. } => Some(
                "Pass the path to a YAML config with -c, or create one with --generate-config."
                    .to_string(),
            ),
            VerunpackError::Config { .. } => Some(
                "Check the config syntax: top-level 'verdir' plus an 'experiments' mapping of \
                 name -> {input_path, members, is_vfld}."
                    .to_string(),
            ),
            VerunpackError::ArchiveRootMissing { .. } => Some(
                "Verify the experiment's input_path; the tool looks for \
                 <input_path>/[<name>/]archive/extract and falls back to <input_path> itself."
                    .to_string(),
            ),
            VerunpackError::MalformedFilename { .. } => Some(
                "Archive names must end in <yyyymmddhh>.tar.gz for vfld or <yyyymmdd>.tar.gz \
                 for vobs."
                    .to_string(),
            ),
            VerunpackError::Archive { .. } => Some(
                "The archive may be truncated or not a gzip tarball; re-fetch it and run again."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for VerunpackError {
    fn from(error: serde_yaml::Error) -> Self {
        VerunpackError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VerunpackError>;
