use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::zipfile;

/// Name of the manifest entry found at the top level of every snapshot.
pub const INDEX_LISTING: &str = "snapshot_file_list.txt";

/// Archives for the second instance of a "2011" core carry a `_2011_part`
/// qualifier in their name; a target naming `2011` must only match inside
/// such an archive. Targets without `2011` are never ambiguous.
pub fn second_core_correct_zip(target: &str, nested_zip_name: &str) -> bool {
    !target.contains("2011") || nested_zip_name.contains("_2011_part")
}

/// A header line names a nested archive; every other line is an entry
/// belonging to the nearest preceding header.
fn is_archive_header(line: &str) -> bool {
    line.starts_with("BTS") && line.trim().ends_with(".zip:")
}

/// Walk the index listing and name the nested archive holding the first
/// entry that contains `target`, honoring the second-core rule. `None`
/// means the snapshot does not carry such an entry.
pub fn resolve_nested_archive<'a>(listing: &'a str, target: &str) -> Option<&'a str> {
    let mut nested_zip_name: Option<&str> = None;
    for line in listing.lines() {
        if is_archive_header(line) {
            nested_zip_name = line.trim().split(':').next();
        } else if line.contains(target)
            && second_core_correct_zip(target, nested_zip_name.unwrap_or(""))
        {
            // A match before the first header has no archive to belong
            // to; the caller reports that as not found.
            return nested_zip_name;
        }
    }
    None
}

/// Find, via the index listing, the nested archive holding an entry whose
/// name contains `target`, and extract that one entry into `out_dir`.
///
/// Returns `false` when the snapshot simply does not carry such an entry.
/// Some hardware variants legitimately lack whole target families (no pm
/// files, for instance), so the caller treats this as routine.
pub fn extract_target_from_snapshot(
    snapshot_zip_path: &Path,
    target: &str,
    out_dir: &Path,
) -> Result<bool> {
    std::fs::create_dir_all(out_dir)?;

    let file = std::fs::File::open(snapshot_zip_path)
        .with_context(|| format!("Failed to open snapshot {}", snapshot_zip_path.display()))?;
    let mut snapshot = zip::ZipArchive::new(file)
        .with_context(|| format!("Snapshot {} is not a readable zip", snapshot_zip_path.display()))?;

    let mut listing = String::new();
    snapshot
        .by_name(INDEX_LISTING)
        .context("Snapshot has no index listing")?
        .read_to_string(&mut listing)
        .context("Failed to read the index listing")?;

    let Some(nested_zip_name) = resolve_nested_archive(&listing, target).map(String::from) else {
        info!("File containing '{}' not found in snapshot.", target);
        return Ok(false);
    };
    debug!("Found nested zip {}", &nested_zip_name);

    // A zip entry reader cannot seek, so pull the nested archive fully
    // into memory before opening it as an archive of its own.
    let mut compressed = Vec::new();
    snapshot
        .by_name(&nested_zip_name)
        .with_context(|| {
            format!(
                "Index names '{}' but the snapshot does not carry it",
                &nested_zip_name
            )
        })?
        .read_to_end(&mut compressed)?;

    match zipfile::extract_first_match(std::io::Cursor::new(compressed), target, out_dir)? {
        Some(out_path) => {
            info!(
                "File '{}' containing '{}' extracted successfully.",
                out_path.display(),
                target
            );
            Ok(true)
        }
        None => {
            warn!("File containing '{}' not found in nested zip.", target);
            Ok(false)
        }
    }
}
