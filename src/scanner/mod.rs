pub mod archive_scanner;
pub mod member_discovery;

pub use archive_scanner::{filter_by_mode, ArchiveFile, ArchiveScanner, ScanResult};
pub use member_discovery::find_member_dirs;
