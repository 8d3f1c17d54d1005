use std::path::Path;

/// Scan the immediate entries of `root` for member directories named
/// `mbr` followed by exactly three digits. Hidden entries are skipped.
/// An unreadable root yields an empty list, like the archive scan itself.
pub fn find_member_dirs(root: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut members: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !name.starts_with('.') && is_member_name(name))
        .collect();

    members.sort();
    members
}

fn is_member_name(name: &str) -> bool {
    name.strip_prefix("mbr")
        .is_some_and(|rest| rest.len() == 3 && rest.bytes().all(|b| b.is_ascii_digit()))
}
