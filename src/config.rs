use crate::error::{Result, VerunpackError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Output root for extracted verification files.
    pub verdir: PathBuf,
    #[serde(default)]
    pub experiments: IndexMap<String, ExperimentConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExperimentConfig {
    pub input_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<MemberSpec>,
    #[serde(default = "default_is_vfld")]
    pub is_vfld: bool,
}

/// Member selection as it appears in the YAML: a single fragment, an explicit
/// list, or a mapping of label to directory name. An empty list requests
/// auto-discovery of mbrNNN directories under the archive root.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum MemberSpec {
    Single(String),
    List(Vec<String>),
    Named(IndexMap<String, String>),
}

fn default_is_vfld() -> bool {
    true
}

/// Verification file family encoded in archive names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Vfld,
    Vobs,
}

impl FileMode {
    pub fn from_is_vfld(is_vfld: bool) -> Self {
        if is_vfld {
            FileMode::Vfld
        } else {
            FileMode::Vobs
        }
    }

    /// The token carried in matching filenames.
    pub fn token(&self) -> &'static str {
        match self {
            FileMode::Vfld => "vfld",
            FileMode::Vobs => "vobs",
        }
    }

    /// Digit count of the trailing timestamp: yyyymmddhh for vfld,
    /// yyyymmdd for vobs.
    pub fn dtg_width(&self) -> usize {
        match self {
            FileMode::Vfld => 10,
            FileMode::Vobs => 8,
        }
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(VerunpackError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| VerunpackError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| VerunpackError::Config {
                message: format!("Failed to parse config file {}: {}", path.display(), e),
            })?;

        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self).map_err(|e| VerunpackError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| VerunpackError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.verdir.as_os_str().is_empty() {
            return Err(VerunpackError::Config {
                message: "'verdir' must not be empty".to_string(),
            });
        }

        for (name, experiment) in &self.experiments {
            if experiment.input_path.as_os_str().is_empty() {
                return Err(VerunpackError::Config {
                    message: format!("experiment '{}' has an empty input_path", name),
                });
            }
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        "\
# Output root for extracted verification files
verdir: /data/verification

# Experiments to unpack, in run order
experiments:
  cy46h1:
    # Archive location; the tool looks for
    # <input_path>/[<name>/]archive/extract and falls back to <input_path>.
    input_path: /data/archive/cy46h1
    # members:
    #   omitted            match every archive under the root
    #   []                 auto-discover mbrNNN member directories
    #   [mbr001, mbr002]   explicit member directories
    #   {ctrl: mbr000}     label -> directory-name mapping
    members: []
    # false switches from vfld (hourly) to vobs (daily) archives
    is_vfld: true
"
        .to_string()
    }
}
