use std::path::{Path, PathBuf};

use crate::reference::ImageReference;

/// Converts a repository name into a file stem.
/// Path separators and registry port separators are replaced with dashes
pub fn artifact_stem(repository: &str) -> String {
    repository.replace(['/', ':'], "-")
}

/// `<output_dir>/<stem>.tar`, or just `<stem>.tar` for an empty `output_dir`
pub fn archive_path(output_dir: &Path, reference: &ImageReference) -> PathBuf {
    output_dir.join(format!("{}.tar", artifact_stem(reference.repository())))
}

/// `<output_dir>/<stem>.manifest.txt`
pub fn manifest_path(output_dir: &Path, reference: &ImageReference) -> PathBuf {
    output_dir.join(format!(
        "{}.manifest.txt",
        artifact_stem(reference.repository())
    ))
}
