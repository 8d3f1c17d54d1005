use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Final run summary, printable in all output modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnpackReport {
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub verdir: PathBuf,
    pub dry_run: bool,
    pub experiments: Vec<ExperimentReport>,
    /// Soft scan failures; these never abort a run.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub name: String,
    pub archive_root: PathBuf,
    pub mode: String,
    pub members: Vec<MemberReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberReport {
    /// Member directory name; empty when the experiment has no member split.
    pub member: String,
    pub files_found: usize,
    pub extracted: usize,
    pub skipped: usize,
    /// Extractions a dry run would have performed.
    pub planned: usize,
}

impl MemberReport {
    pub fn new<S: Into<String>>(member: S) -> Self {
        Self {
            member: member.into(),
            files_found: 0,
            extracted: 0,
            skipped: 0,
            planned: 0,
        }
    }
}

impl UnpackReport {
    pub fn new(verdir: PathBuf, dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            duration: Duration::from_secs(0),
            verdir,
            dry_run,
            experiments: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn total_found(&self) -> usize {
        self.member_totals(|m| m.files_found)
    }

    pub fn total_extracted(&self) -> usize {
        self.member_totals(|m| m.extracted)
    }

    pub fn total_skipped(&self) -> usize {
        self.member_totals(|m| m.skipped)
    }

    pub fn total_planned(&self) -> usize {
        self.member_totals(|m| m.planned)
    }

    fn member_totals<F: Fn(&MemberReport) -> usize>(&self, field: F) -> usize {
        self.experiments
            .iter()
            .flat_map(|e| e.members.iter())
            .map(field)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_across_experiments() {
        let mut report = UnpackReport::new(PathBuf::from("/ver"), false);

        let mut m1 = MemberReport::new("mbr001");
        m1.files_found = 4;
        m1.extracted = 3;
        m1.skipped = 1;

        let mut m2 = MemberReport::new("");
        m2.files_found = 2;
        m2.extracted = 2;

        report.experiments.push(ExperimentReport {
            name: "exp1".to_string(),
            archive_root: PathBuf::from("/a"),
            mode: "vfld".to_string(),
            members: vec![m1],
        });
        report.experiments.push(ExperimentReport {
            name: "exp2".to_string(),
            archive_root: PathBuf::from("/b"),
            mode: "vobs".to_string(),
            members: vec![m2],
        });

        assert_eq!(report.total_found(), 6);
        assert_eq!(report.total_extracted(), 5);
        assert_eq!(report.total_skipped(), 1);
        assert_eq!(report.total_planned(), 0);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = UnpackReport::new(PathBuf::from("/ver"), true);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"dry_run\":true"));
        assert!(json.contains("\"experiments\":[]"));
    }
}
