//! Package file selection from matched files.

use crate::model::MatchedFile;

/// Extensions accepted as a packaged artifact.
const PACKAGE_EXTENSIONS: &[&str] = &[
    ".jar", ".ear", ".war", ".zip", ".gz", ".tar", ".xz", ".lz", ".bz2", ".7z", ".rar", ".cpio",
    ".Z", ".lz4", ".lha", ".arj", ".rpm", ".deb", ".dmg", ".whl",
];

/// Path of the first matched file, if it looks like a package archive.
#[must_use]
pub fn select_package_file(files: &[MatchedFile]) -> Option<String> {
    let path = &files.first()?.file_path.path;
    PACKAGE_EXTENSIONS
        .iter()
        .any(|ext| path.ends_with(ext))
        .then(|| path.clone())
}
