//! Write-then-rename handling for the SQLite output file.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::config::PackagePaths;

/// Final output path plus the `.tmp` sibling the result is written to first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TempOutput {
    final_path: PathBuf,
    temp_path: PathBuf,
}

/// `-wal` and `-shm` files SQLite keeps beside `db`.
fn sidecars(db: &Path) -> [PathBuf; 2] {
    let mut wal = db.as_os_str().to_owned();
    wal.push("-wal");
    let mut shm = db.as_os_str().to_owned();
    shm.push("-shm");
    [PathBuf::from(wal), PathBuf::from(shm)]
}

fn remove_sidecars(db: &Path) {
    for path in sidecars(db) {
        let _ = fs::remove_file(path);
    }
}

impl TempOutput {
    pub fn for_output(output: &Path) -> Self {
        let default_name = PackagePaths::get().output_filename();
        let name = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| default_name.to_string());
        let dir = output.parent().unwrap_or(Path::new("."));
        TempOutput {
            final_path: output.to_path_buf(),
            temp_path: dir.join(format!("{name}.tmp")),
        }
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    /// Clear what an interrupted run left behind: the temp DB and its sidecars.
    pub fn prepare(&self) -> Result<()> {
        remove_sidecars(&self.temp_path);
        if self.temp_path.exists() {
            fs::remove_file(&self.temp_path).with_context(|| {
                format!("remove stale temp output {}", self.temp_path.display())
            })?;
        }
        Ok(())
    }

    /// Move the finished temp DB over the final path. The connection must be closed first.
    pub fn commit(&self) -> Result<()> {
        fs::rename(&self.temp_path, &self.final_path).with_context(|| {
            format!(
                "rename {} -> {}",
                self.temp_path.display(),
                self.final_path.display()
            )
        })?;
        remove_sidecars(&self.temp_path);
        Ok(())
    }
}
