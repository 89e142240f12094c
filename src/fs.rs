use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Name of the directory for user-tunable per-package parameter files.
const USER_PARAMETERS_DIR: &str = "user_parameters";
/// Name of the directory reference databases are unpacked into.
const EXTERNAL_DB_DIR: &str = "external_db";

/// File operations on the pipeline working directory go through this
/// struct, which also owns the layout of the files we emit there.
#[derive(Debug)]
pub struct Fs {
    work_dir: PathBuf,
}

impl Fs {
    pub fn new(work_dir: &Path) -> Self {
        Self {
            work_dir: work_dir.to_path_buf(),
        }
    }

    /// Create the auxiliary directories the emitted pipeline expects
    /// next to its configuration. Idempotent.
    pub fn ensure_layout(&self) -> Result<()> {
        for dir in [self.user_parameters_dir(), self.external_db_dir()] {
            if !dir.is_dir() {
                log::info!("creating {dir:?}");
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("creating directory {dir:?}"))?;
            }
        }
        Ok(())
    }

    pub fn user_parameters_dir(&self) -> PathBuf {
        self.work_dir.join(USER_PARAMETERS_DIR)
    }

    pub fn external_db_dir(&self) -> PathBuf {
        self.work_dir.join(EXTERNAL_DB_DIR)
    }

    /// Path of the emitted configuration file.
    pub fn config_path(&self, unit: bool) -> PathBuf {
        let name = if unit { "config_unit.yaml" } else { "config.yaml" };
        self.work_dir.join(name)
    }

    /// Path of the emitted workflow-definition file.
    pub fn pipeline_path(&self, unit: bool) -> PathBuf {
        let name = if unit { "pipeline_unit.smk" } else { "pipeline.smk" };
        self.work_dir.join(name)
    }

    /// Write entire str to a file.
    pub fn write_file(&self, path: &Path, text: &str) -> Result<()> {
        std::fs::write(path, text).with_context(|| format!("writing {path:?}"))?;
        Ok(())
    }

    /// Read entire file into a String.
    pub fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("reading {path:?}"))
    }
}
