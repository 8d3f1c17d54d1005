use crate::config::{ExperimentConfig, FileMode, MemberSpec};
use crate::error::{Result, VerunpackError};
use crate::scanner::find_member_dirs;
use indexmap::IndexMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Resolved member selection. The config-level `MemberSpec` collapses here:
/// no spec means no fragment filter, an empty list triggers auto-discovery,
/// and a mapping keeps its directory-name values in config order.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberPatterns {
    NoFilter,
    Explicit(Vec<String>),
    Named(IndexMap<String, String>),
}

/// One scan/unpack unit: the filename fragment to scan for and the
/// subdirectory the matches are unpacked under. Identical for everything
/// except the no-filter case, where both are empty.
#[derive(Debug, Clone, Copy)]
pub struct MemberSelector<'a> {
    pub fragment: &'a str,
    pub dir_name: &'a str,
}

impl MemberPatterns {
    pub fn selectors(&self) -> Vec<MemberSelector<'_>> {
        match self {
            MemberPatterns::NoFilter => vec![MemberSelector {
                fragment: "",
                dir_name: "",
            }],
            MemberPatterns::Explicit(members) => members
                .iter()
                .map(|m| MemberSelector {
                    fragment: m,
                    dir_name: m,
                })
                .collect(),
            // Keys are labels only; the directory name doubles as the
            // scan fragment, matching the list case.
            MemberPatterns::Named(map) => map
                .values()
                .map(|dir| MemberSelector {
                    fragment: dir,
                    dir_name: dir,
                })
                .collect(),
        }
    }
}

impl fmt::Display for MemberPatterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberPatterns::NoFilter => f.write_str("(all files)"),
            MemberPatterns::Explicit(members) => f.write_str(&members.join(", ")),
            MemberPatterns::Named(map) => {
                let pairs: Vec<String> =
                    map.iter().map(|(k, v)| format!("{} -> {}", k, v)).collect();
                f.write_str(&pairs.join(", "))
            }
        }
    }
}

/// One experiment with its archive root resolved and members settled.
/// Construction fails when no archive directory exists; everything is
/// immutable afterwards, including the dry-run flag.
#[derive(Debug, Clone)]
pub struct Experiment {
    pub name: String,
    pub archive_root: PathBuf,
    pub members: MemberPatterns,
    pub mode: FileMode,
    pub dry_run: bool,
}

impl Experiment {
    pub fn resolve(name: &str, settings: &ExperimentConfig, dry_run: bool) -> Result<Self> {
        let archive_root = resolve_archive_root(name, &settings.input_path).ok_or_else(|| {
            VerunpackError::ArchiveRootMissing {
                experiment: name.to_string(),
                path: settings.input_path.display().to_string(),
            }
        })?;

        let members = resolve_members(settings.members.as_ref(), &archive_root);

        Ok(Self {
            name: name.to_string(),
            archive_root,
            members,
            mode: FileMode::from_is_vfld(settings.is_vfld),
            dry_run,
        })
    }

    /// Output root for this experiment: `verdir` itself when the experiment
    /// name is already part of the verdir path, `verdir/<name>` otherwise.
    pub fn target_root(&self, verdir: &Path) -> PathBuf {
        if verdir.to_string_lossy().contains(self.name.as_str()) {
            verdir.to_path_buf()
        } else {
            verdir.join(&self.name)
        }
    }

    /// Banner printed before each experiment is processed.
    pub fn describe(&self) -> String {
        format!(
            "{:<20} : {}\n{:<20} : {}\n{:<20} : {}",
            "Experiment name",
            self.name,
            "Archive",
            self.archive_root.display(),
            "Member patterns",
            self.members,
        )
    }
}

/// Try `<input_path>/[<name>/]archive/extract`, then `<input_path>` itself.
/// The `<name>` segment is inserted only when the experiment name is not
/// already part of the input path.
fn resolve_archive_root(name: &str, input_path: &Path) -> Option<PathBuf> {
    let candidate = if input_path.to_string_lossy().contains(name) {
        input_path.join("archive").join("extract")
    } else {
        input_path.join(name).join("archive").join("extract")
    };

    if candidate.exists() {
        return Some(candidate);
    }
    if input_path.exists() {
        return Some(input_path.to_path_buf());
    }
    None
}

fn resolve_members(spec: Option<&MemberSpec>, archive_root: &Path) -> MemberPatterns {
    match spec {
        None => MemberPatterns::NoFilter,
        Some(MemberSpec::Single(member)) => MemberPatterns::Explicit(vec![member.clone()]),
        Some(MemberSpec::List(members)) if members.is_empty() => {
            let discovered = find_member_dirs(archive_root);
            if discovered.is_empty() {
                MemberPatterns::NoFilter
            } else {
                MemberPatterns::Explicit(discovered)
            }
        }
        Some(MemberSpec::List(members)) => MemberPatterns::Explicit(members.clone()),
        Some(MemberSpec::Named(map)) => MemberPatterns::Named(map.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn settings(input_path: &Path, members: Option<MemberSpec>, is_vfld: bool) -> ExperimentConfig {
        ExperimentConfig {
            input_path: input_path.to_path_buf(),
            members,
            is_vfld,
        }
    }

    #[test]
    fn test_archive_root_prefers_extract_subtree() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("exp1");
        fs::create_dir_all(input.join("archive/extract")).unwrap();

        let exp = Experiment::resolve("exp1", &settings(&input, None, true), false).unwrap();
        assert_eq!(exp.archive_root, input.join("archive/extract"));
    }

    #[test]
    fn test_archive_root_inserts_name_when_absent_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("data");
        fs::create_dir_all(input.join("exp1/archive/extract")).unwrap();

        let exp = Experiment::resolve("exp1", &settings(&input, None, true), false).unwrap();
        assert_eq!(exp.archive_root, input.join("exp1/archive/extract"));
    }

    #[test]
    fn test_archive_root_falls_back_to_input_path() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("exp1");
        fs::create_dir_all(&input).unwrap();

        let exp = Experiment::resolve("exp1", &settings(&input, None, true), false).unwrap();
        assert_eq!(exp.archive_root, input);
    }

    #[test]
    fn test_missing_archive_root_is_an_error() {
        let result = Experiment::resolve(
            "exp1",
            &settings(Path::new("/no/such/exp1"), None, true),
            false,
        );
        assert!(matches!(
            result,
            Err(VerunpackError::ArchiveRootMissing { .. })
        ));
    }

    #[test]
    fn test_no_member_spec_means_no_filter() {
        let temp_dir = TempDir::new().unwrap();
        let exp =
            Experiment::resolve("exp1", &settings(temp_dir.path(), None, true), false).unwrap();

        assert_eq!(exp.members, MemberPatterns::NoFilter);
        let selectors = exp.members.selectors();
        assert_eq!(selectors.len(), 1);
        assert_eq!(selectors[0].fragment, "");
        assert_eq!(selectors[0].dir_name, "");
    }

    #[test]
    fn test_empty_list_discovers_members() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("mbr001")).unwrap();
        fs::create_dir(temp_dir.path().join("mbr002")).unwrap();
        fs::create_dir(temp_dir.path().join("notes")).unwrap();

        let exp = Experiment::resolve(
            "exp1",
            &settings(temp_dir.path(), Some(MemberSpec::List(Vec::new())), true),
            false,
        )
        .unwrap();

        assert_eq!(
            exp.members,
            MemberPatterns::Explicit(vec!["mbr001".to_string(), "mbr002".to_string()])
        );
    }

    #[test]
    fn test_empty_discovery_falls_back_to_no_filter() {
        let temp_dir = TempDir::new().unwrap();

        let exp = Experiment::resolve(
            "exp1",
            &settings(temp_dir.path(), Some(MemberSpec::List(Vec::new())), true),
            false,
        )
        .unwrap();

        assert_eq!(exp.members, MemberPatterns::NoFilter);
    }

    #[test]
    fn test_scalar_member_becomes_single_pattern() {
        let temp_dir = TempDir::new().unwrap();

        let exp = Experiment::resolve(
            "exp1",
            &settings(
                temp_dir.path(),
                Some(MemberSpec::Single("mbr007".to_string())),
                true,
            ),
            false,
        )
        .unwrap();

        assert_eq!(
            exp.members,
            MemberPatterns::Explicit(vec!["mbr007".to_string()])
        );
    }

    #[test]
    fn test_named_mapping_uses_directory_values() {
        let mut map = IndexMap::new();
        map.insert("ctrl".to_string(), "mbr000".to_string());
        map.insert("pert".to_string(), "mbr001".to_string());

        let patterns = MemberPatterns::Named(map);
        let selectors = patterns.selectors();

        assert_eq!(selectors.len(), 2);
        assert_eq!(selectors[0].fragment, "mbr000");
        assert_eq!(selectors[0].dir_name, "mbr000");
        assert_eq!(selectors[1].dir_name, "mbr001");
    }

    #[test]
    fn test_target_root_embedding() {
        let temp_dir = TempDir::new().unwrap();
        let exp =
            Experiment::resolve("exp1", &settings(temp_dir.path(), None, false), true).unwrap();

        assert_eq!(exp.mode, FileMode::Vobs);
        assert!(exp.dry_run);
        assert_eq!(
            exp.target_root(Path::new("/ver/exp1")),
            PathBuf::from("/ver/exp1")
        );
        assert_eq!(
            exp.target_root(Path::new("/ver")),
            PathBuf::from("/ver/exp1")
        );
    }

    #[test]
    fn test_describe_mentions_name_and_patterns() {
        let temp_dir = TempDir::new().unwrap();
        let exp = Experiment::resolve(
            "exp1",
            &settings(
                temp_dir.path(),
                Some(MemberSpec::List(vec!["mbr001".to_string()])),
                true,
            ),
            false,
        )
        .unwrap();

        let banner = exp.describe();
        assert!(banner.contains("exp1"));
        assert!(banner.contains("mbr001"));
    }
}
