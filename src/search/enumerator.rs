use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::extractors::is_supported_extension;

/// Collect every supported file below the given folders.
///
/// Entries that are not directories are skipped, as are subtrees that cannot
/// be read; neither aborts the walk.
pub fn enumerate_files(folders: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for folder in folders {
        if !folder.is_dir() {
            log::debug!("Skipping {:?}: not a directory", folder);
            continue;
        }
        collect_supported(folder, &mut files);
    }

    files
}

fn collect_supported(root: &Path, files: &mut Vec<PathBuf>) {
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Skipping unreadable entry under {:?}: {}", root, e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let supported = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(is_supported_extension);
        if supported {
            files.push(entry.into_path());
        }
    }
}
