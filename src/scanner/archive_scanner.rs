use crate::config::FileMode;
use crate::error::{Result, VerunpackError};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone)]
pub struct ArchiveFile {
    pub source_path: PathBuf,
    /// Path relative to the scanned root, keeping subdirectory prefixes.
    pub relative_path: PathBuf,
    pub filename: String,
}

impl ArchiveFile {
    pub fn display_path(&self) -> String {
        self.relative_path.display().to_string()
    }
}

#[derive(Debug, Default)]
pub struct ScanResult {
    pub files: Vec<ArchiveFile>,
    /// Soft failures: unreadable directories are reported here, never as errors.
    pub warnings: Vec<String>,
}

/// Recursive scan for `<anything><fragment><8-or-10 digits>.tar.gz` files.
pub struct ArchiveScanner {
    pattern: Regex,
}

impl ArchiveScanner {
    pub fn for_fragment(fragment: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"{}(\d{{10}}|\d{{8}})\.tar\.gz$",
            regex::escape(fragment)
        ))
        .map_err(|e| VerunpackError::Config {
            message: format!("invalid member fragment '{}': {}", fragment, e),
        })?;

        Ok(Self { pattern })
    }

    pub fn scan<P: AsRef<Path>>(&self, root: P) -> ScanResult {
        let root = root.as_ref();
        let mut result = ScanResult::default();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    result.warnings.push(format!("Could not read {}", describe_walk_error(&err, root)));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let filename = match entry.file_name().to_str() {
                Some(name) => name,
                None => continue,
            };

            if !self.pattern.is_match(filename) {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_path_buf();

            result.files.push(ArchiveFile {
                source_path: entry.path().to_path_buf(),
                relative_path,
                filename: filename.to_string(),
            });
        }

        result.files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        result
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn describe_walk_error(err: &walkdir::Error, root: &Path) -> String {
    match err.path() {
        Some(path) => path.display().to_string(),
        None => root.display().to_string(),
    }
}

/// Post-scan mode filter: keeps files whose relative path carries the mode
/// token. Narrower than the scan regex, which admits both timestamp widths;
/// the substring check is what finally separates vfld from vobs sets.
pub fn filter_by_mode(files: Vec<ArchiveFile>, mode: FileMode) -> Vec<ArchiveFile> {
    files
        .into_iter()
        .filter(|f| f.relative_path.to_string_lossy().contains(mode.token()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_scan_matches_suffix_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        touch(&root.join("vfld2024031512.tar.gz"));
        touch(&root.join("vobs20240315.tar.gz"));
        touch(&root.join("vfld202403.tar.gz"));
        touch(&root.join("vfld2024031512.tar"));
        touch(&root.join("vfld2024031512.tar.gz.part"));
        touch(&root.join("notes.txt"));

        let scanner = ArchiveScanner::for_fragment("").unwrap();
        let result = scanner.scan(root);

        let names: Vec<&str> = result.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, ["vfld2024031512.tar.gz", "vobs20240315.tar.gz"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_recurses_with_relative_prefixes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("2024/03")).unwrap();
        touch(&root.join("2024/03/vfld2024031500.tar.gz"));
        touch(&root.join("vfld2024031512.tar.gz"));

        let scanner = ArchiveScanner::for_fragment("").unwrap();
        let result = scanner.scan(root);

        let relative: Vec<String> = result.files.iter().map(|f| f.display_path()).collect();
        assert_eq!(
            relative,
            ["2024/03/vfld2024031500.tar.gz", "vfld2024031512.tar.gz"]
        );
    }

    #[test]
    fn test_scan_skips_hidden_entries() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join(".stash")).unwrap();
        touch(&root.join(".stash/vfld2024031500.tar.gz"));
        touch(&root.join(".vfld2024031506.tar.gz"));
        touch(&root.join("vfld2024031512.tar.gz"));

        let scanner = ArchiveScanner::for_fragment("").unwrap();
        let result = scanner.scan(root);

        let names: Vec<&str> = result.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, ["vfld2024031512.tar.gz"]);
    }

    #[test]
    fn test_fragment_filters_filenames() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        touch(&root.join("vfldexpmbr0012024031512.tar.gz"));
        touch(&root.join("vfldexpmbr0022024031512.tar.gz"));
        touch(&root.join("vfldexp2024031512.tar.gz"));

        let scanner = ArchiveScanner::for_fragment("mbr001").unwrap();
        let result = scanner.scan(root);

        let names: Vec<&str> = result.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, ["vfldexpmbr0012024031512.tar.gz"]);
    }

    #[test]
    fn test_unreadable_root_soft_fails() {
        let scanner = ArchiveScanner::for_fragment("").unwrap();
        let result = scanner.scan(Path::new("/no/such/archive"));

        assert!(result.files.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("/no/such/archive"));
    }

    #[test]
    fn test_mode_filter_on_relative_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        touch(&root.join("vfld2024031512.tar.gz"));
        touch(&root.join("vobs20240315.tar.gz"));

        let scanner = ArchiveScanner::for_fragment("").unwrap();
        let all = scanner.scan(root).files;

        let vfld = filter_by_mode(all.clone(), FileMode::Vfld);
        assert_eq!(vfld.len(), 1);
        assert_eq!(vfld[0].filename, "vfld2024031512.tar.gz");

        let vobs = filter_by_mode(all, FileMode::Vobs);
        assert_eq!(vobs.len(), 1);
        assert_eq!(vobs[0].filename, "vobs20240315.tar.gz");
    }
}
