use std::path::{Path, PathBuf};

use anyhow::Result;
use itertools::Itertools;
use log::{debug, info};

pub mod snapshot;
pub mod xzfile;
pub mod zipfile;

#[cfg(test)]
mod testutil;

/// Compressed runtime log carried inside the `*_runtime.zip` and
/// `*_syslog.zip` containers.
pub const RUNTIME_LOG_ARTIFACT: &str = "runtime_BTSOM.log.xz";
/// Compressed startup log carried inside the `*_startup.zip` and
/// `*_syslog.zip` containers.
pub const STARTUP_LOG_ARTIFACT: &str = "startup_BTSOM.log.xz";

/// Output groups and the index substrings extracted into each. The names
/// come from the snapshot export format and are matched verbatim.
pub const CORE_GROUPS: &[(&str, &[&str])] = &[
    ("1011_logs", &["1011_im", "1011_runtime.zip", "1011_startup.zip"]),
    ("2011_logs", &["2011_im", "2011_runtime.zip", "2011_startup.zip"]),
    ("1011_pm_1", &["1011_pm_1_im_snapshot", "1011_pm_1_syslog"]),
    ("1011_pm_2", &["1011_pm_2_im_snapshot", "1011_pm_2_syslog"]),
    ("2011_pm_1", &["2011_pm_1_im_snapshot", "2011_pm_1_syslog"]),
    ("2011_pm_2", &["2011_pm_2_im_snapshot", "2011_pm_2_syslog"]),
];

/// One extraction run: which snapshot to read and where the output tree
/// goes. Passed down explicitly so path construction never leans on
/// process-wide state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub snapshot_path: PathBuf,
    pub run_root: PathBuf,
}

impl RunConfig {
    pub fn group_dir(&self, group: &str) -> PathBuf {
        self.run_root.join(group)
    }
}

/// Process one snapshot end to end: pull every catalogued target out of
/// the snapshot into its group directory, then unpack the log containers
/// that landed in each directory.
pub fn run_snapshot(conf: &RunConfig) -> Result<()> {
    for (group, targets) in CORE_GROUPS {
        let out_dir = conf.group_dir(group);
        debug!("Extracting group {} into {}", group, out_dir.display());
        for target in targets.iter() {
            snapshot::extract_target_from_snapshot(&conf.snapshot_path, target, &out_dir)?;
        }
    }

    for (group, _) in CORE_GROUPS {
        unpack_group(&conf.group_dir(group))?;
    }

    Ok(())
}

/// Second-stage pass over one group directory: every log container that
/// the first stage dropped here is opened and its compressed log pulled
/// out and inflated.
pub fn unpack_group(dir: &Path) -> Result<()> {
    let names = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .sorted()
        .collect_vec();

    for name in &names {
        if name.contains("_runtime.zip") {
            extract_log_and_clear(RUNTIME_LOG_ARTIFACT, dir, name, true)?;
        }
        if name.contains("_startup.zip") {
            extract_log_and_clear(STARTUP_LOG_ARTIFACT, dir, name, true)?;
        }
        if name.contains("_syslog.zip") {
            // A syslog container holds both logs. The source must survive
            // the first pass so the second one can read it too.
            extract_log_and_clear(RUNTIME_LOG_ARTIFACT, dir, name, false)?;
            extract_log_and_clear(STARTUP_LOG_ARTIFACT, dir, name, true)?;
        }
    }

    Ok(())
}

/// Pull `artifact` out of the `source` container sitting in `dir`,
/// inflate it next to it, and drop the intermediate `.xz` file. With
/// `remove_source` the container itself goes too; a container already
/// removed by an earlier pass is fine.
pub fn extract_log_and_clear(
    artifact: &str,
    dir: &Path,
    source: &str,
    remove_source: bool,
) -> Result<()> {
    let source_path = dir.join(source);
    if zipfile::extract_target_from_zipfile(&source_path, artifact, dir)? {
        let xz_path = dir.join(artifact);
        xzfile::extract_xz_to_path(&xz_path, dir)?;
        std::fs::remove_file(&xz_path)?;
    }

    if remove_source {
        if let Err(e) = std::fs::remove_file(&source_path) {
            info!(
                "Tried to remove absent file {}: {}",
                source_path.display(),
                e
            );
        }
    }

    Ok(())
}
