use crate::config::FileMode;
use crate::error::{Result, VerunpackError};
use regex::Regex;
use std::path::PathBuf;

/// Date-time-group carried in an archive filename: yyyymmddhh for vfld,
/// yyyymmdd for vobs. Components stay zero-padded strings; they are path
/// segments, not numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dtg {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: Option<String>,
}

impl Dtg {
    /// The full digit string, the idempotence key for existing output.
    pub fn digits(&self) -> String {
        let mut digits = format!("{}{}{}", self.year, self.month, self.day);
        if let Some(ref hour) = self.hour {
            digits.push_str(hour);
        }
        digits
    }

    /// Relative destination below the member target directory. The hour is
    /// not a path component even when present; it only disambiguates
    /// archives within one day via the digit string.
    pub fn date_path(&self) -> PathBuf {
        PathBuf::from(&self.year).join(&self.month).join(&self.day)
    }
}

/// Pulls the trailing timestamp out of archive filenames for one mode.
pub struct DtgParser {
    mode: FileMode,
    tail: Regex,
    groups: Regex,
}

impl DtgParser {
    pub fn new(mode: FileMode) -> Result<Self> {
        let width = mode.dtg_width();
        let tail = Regex::new(&format!(r"(\d{{{}}})\.tar\.gz$", width)).map_err(internal)?;
        let groups = match mode {
            FileMode::Vfld => Regex::new(r"^(\d{4})(\d{2})(\d{2})(\d{2})$"),
            FileMode::Vobs => Regex::new(r"^(\d{4})(\d{2})(\d{2})$"),
        }
        .map_err(internal)?;

        Ok(Self { mode, tail, groups })
    }

    pub fn parse(&self, filename: &str) -> Result<Dtg> {
        let malformed = || VerunpackError::MalformedFilename {
            name: filename.to_string(),
            expected: self.mode.dtg_width(),
        };

        let digits = self
            .tail
            .captures(filename)
            .and_then(|c| c.get(1))
            .ok_or_else(malformed)?
            .as_str();

        let groups = self.groups.captures(digits).ok_or_else(malformed)?;
        let part = |i: usize| groups.get(i).map(|m| m.as_str().to_string());

        Ok(Dtg {
            year: part(1).ok_or_else(malformed)?,
            month: part(2).ok_or_else(malformed)?,
            day: part(3).ok_or_else(malformed)?,
            hour: match self.mode {
                FileMode::Vfld => Some(part(4).ok_or_else(malformed)?),
                FileMode::Vobs => None,
            },
        })
    }
}

fn internal(error: regex::Error) -> VerunpackError {
    VerunpackError::Config {
        message: format!("invalid timestamp pattern: {}", error),
    }
}
