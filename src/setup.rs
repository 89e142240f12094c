use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("can't read setup file")]
    Io(#[from] std::io::Error),
    #[error("can't parse setup file")]
    Parse(#[from] serde_yaml::Error),
    #[error("setup file lists no samples")]
    NoSamples,
    #[error("working directory \"{0}\" does not exist")]
    WorkDirMissing(String),
}

/// The pipeline setup file: which samples to process and where the
/// configured pipeline lives.
#[derive(Debug, Deserialize)]
pub struct Setup {
    pub samples: Vec<String>,
    pub work_dir: PathBuf,
}

impl Setup {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        let setup: Setup = serde_yaml::from_str(&text)?;
        if setup.samples.is_empty() {
            return Err(Error::NoSamples);
        }
        if !setup.work_dir.is_dir() {
            return Err(Error::WorkDirMissing(
                setup.work_dir.to_string_lossy().into_owned(),
            ));
        }
        log::debug!(
            "setup: {} samples, work dir {:?}",
            setup.samples.len(),
            setup.work_dir
        );
        Ok(setup)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_setup() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("setup.yaml");
        std::fs::write(
            &path,
            format!(
                "samples:\n  - sample_a\n  - sample_b\nwork_dir: {}\n",
                dir.path().display()
            ),
        )?;
        let setup = Setup::load(&path)?;
        assert_eq!(setup.samples, vec!["sample_a", "sample_b"]);
        assert_eq!(setup.work_dir, dir.path());
        Ok(())
    }

    #[test]
    fn test_empty_samples_rejected() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("setup.yaml");
        std::fs::write(
            &path,
            format!("samples: []\nwork_dir: {}\n", dir.path().display()),
        )?;
        assert!(matches!(Setup::load(&path), Err(Error::NoSamples)));
        Ok(())
    }

    #[test]
    fn test_missing_work_dir_rejected() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("setup.yaml");
        std::fs::write(&path, "samples: [s]\nwork_dir: /no/such/dir\n")?;
        assert!(matches!(Setup::load(&path), Err(Error::WorkDirMissing(_))));
        Ok(())
    }
}
