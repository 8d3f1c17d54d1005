use crate::config::FileMode;
use crate::error::{Result, VerunpackError};
use crate::extractor::dtg::DtgParser;
use crate::scanner::ArchiveFile;
use flate2::read::GzDecoder;
use std::fs;
use std::path::{Path, PathBuf};

/// What happened (or would happen) to one archive.
#[derive(Debug, Clone, PartialEq)]
pub enum UnpackOutcome {
    Extracted {
        destination: PathBuf,
    },
    /// Output for this dtg already exists; nothing was touched.
    SkippedExisting {
        destination: PathBuf,
        existing: usize,
    },
    /// Dry run: extraction was due but suppressed.
    Planned {
        destination: PathBuf,
    },
}

/// Idempotent tar.gz extraction into `<member-target>/<yyyy>/<mm>/<dd>/`.
pub struct Unpacker {
    mode: FileMode,
    dry_run: bool,
    parser: DtgParser,
}

impl Unpacker {
    pub fn new(mode: FileMode, dry_run: bool) -> Result<Self> {
        Ok(Self {
            mode,
            dry_run,
            parser: DtgParser::new(mode)?,
        })
    }

    pub fn unpack(&self, archive: &ArchiveFile, member_target: &Path) -> Result<UnpackOutcome> {
        let dtg = self.parser.parse(&archive.filename)?;
        let destination = member_target.join(dtg.date_path());

        let existing = count_existing_output(&destination, self.mode, &dtg.digits());
        if existing > 0 {
            return Ok(UnpackOutcome::SkippedExisting {
                destination,
                existing,
            });
        }

        if self.dry_run {
            return Ok(UnpackOutcome::Planned { destination });
        }

        fs::create_dir_all(&destination)?;
        self.extract_archive(&archive.source_path, &destination)?;

        Ok(UnpackOutcome::Extracted { destination })
    }

    fn extract_archive(&self, source: &Path, destination: &Path) -> Result<()> {
        let file = fs::File::open(source)?;
        let mut archive = tar::Archive::new(GzDecoder::new(file));

        archive
            .unpack(destination)
            .map_err(|e| VerunpackError::Archive {
                path: source.display().to_string(),
                message: e.to_string(),
            })
    }
}

/// Idempotence probe: entries in the destination whose name starts with the
/// mode token and contains the full dtg digit string. A destination that
/// does not exist (or cannot be read) counts as no output.
fn count_existing_output(destination: &Path, mode: FileMode, digits: &str) -> usize {
    let entries = match fs::read_dir(destination) {
        Ok(entries) => entries,
        Err(_) => return 0,
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(mode.token()) && name.contains(digits))
        .count()
}
