use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::debug;

/// Decompress a single-file `.xz` artifact into `out_dir`.
///
/// An `.xz` artifact wraps exactly one stream, so there is no entry name
/// to match against: the whole stream is read into memory and written out
/// under the artifact's own name with the `.xz` suffix stripped.
pub fn extract_xz_to_path(xz_path: &Path, out_dir: &Path) -> Result<PathBuf> {
    let artifact_name = xz_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Bad artifact path: {}", xz_path.display()))?;
    let log_name = artifact_name
        .strip_suffix(".xz")
        .ok_or_else(|| anyhow!("Artifact '{}' does not carry the .xz suffix", artifact_name))?;

    let file = std::fs::File::open(xz_path)
        .with_context(|| format!("Failed to open artifact {}", xz_path.display()))?;
    let mut decompressor = xz2::read::XzDecoder::new(file);
    let mut buf = Vec::new();
    decompressor
        .read_to_end(&mut buf)
        .with_context(|| format!("Failed to decompress {}", xz_path.display()))?;

    let out_path = out_dir.join(log_name);
    std::fs::write(&out_path, &buf)?;
    debug!("xz, decompressed {} into {}", artifact_name, out_path.display());
    Ok(out_path)
}
