use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use itertools::Itertools;
use log::{debug, info, warn};

/// Extract the first archive entry whose name contains `target` into
/// `out_dir`, preserving the entry name. Returns the path written, or
/// `None` when no entry matches.
pub fn extract_first_match<R: Read + Seek>(
    reader: R,
    target: &str,
    out_dir: &Path,
) -> Result<Option<PathBuf>> {
    let mut archive = zip::ZipArchive::new(reader)?;

    // `file_names` holds a shared borrow on the archive while `by_name`
    // needs a mutable one, so collect the names up front.
    let names = archive.file_names().map(String::from).collect_vec();
    for fname in names {
        if !fname.contains(target) {
            continue;
        }
        debug!("zip, got a match: {}", &fname);
        let mut entry = archive.by_name(&fname)?;
        let Some(rel_path) = entry.enclosed_name() else {
            warn!("Entry '{}' escapes the output directory, skipping", &fname);
            continue;
        };
        let out_path = out_dir.join(rel_path);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf)?;
        let mut rawfile = std::fs::File::create(&out_path)?;
        rawfile.write_all(&buf)?;
        return Ok(Some(out_path));
    }

    Ok(None)
}

/// Open a zip container on disk and extract the first entry matching
/// `target` into `out_dir`. A missing entry is a normal outcome reported
/// as `false`; an unreadable container is an error.
pub fn extract_target_from_zipfile(
    zip_path: &Path,
    target: &str,
    out_dir: &Path,
) -> Result<bool> {
    let file = std::fs::File::open(zip_path)?;
    match extract_first_match(file, target, out_dir)? {
        Some(out_path) => {
            info!(
                "File '{}' extracted successfully from '{}'",
                out_path.display(),
                zip_path.display()
            );
            Ok(true)
        }
        None => {
            info!("File '{}' not found in '{}'", target, zip_path.display());
            Ok(false)
        }
    }
}
