use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_yaml::Value;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("configuration file {0:?} does not exist; run the workflow or unit command first")]
    ConfigMissing(PathBuf),
    #[error("configuration file has no integer \"threads\" key")]
    NoThreadsKey,
}

/// Scheduler options for one submission-script generation run.
#[derive(Debug)]
pub struct SlurmOpts {
    pub unit: bool,
    pub threads: usize,
    pub memory_gb: usize,
    pub partition: Option<String>,
    pub mail_type: Option<String>,
    pub mail_user: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub output_script: PathBuf,
    pub db_output_script: PathBuf,
    pub sample_list: PathBuf,
}

/// Threads given to the database-setup job; downloads and indexing gain
/// little from more.
const DB_SETUP_THREADS: usize = 7;

/// Utility for building the contents of a SLURM submission script.
/// Reads like [`crate::emit::PipelineFileBuilder`]: it fills a String
/// reference held internally.
#[derive(Debug)]
pub struct SlurmScriptBuilder<'a> {
    strbuf: &'a mut String,
}

impl<'a> SlurmScriptBuilder<'a> {
    pub fn new(strbuf: &'a mut String) -> Self {
        Self { strbuf }
    }
}

impl SlurmScriptBuilder<'_> {
    /// shebang and the directives every job carries
    pub fn write_prefix(&mut self, job_name: &str, threads: usize, memory_gb: usize) {
        self.strbuf.clear();
        self.strbuf.push_str("#!/bin/bash\n\n");
        self.write_directive("job-name", &format!("\"{job_name}\""));
        self.write_directive("time", "96:00:00");
        self.write_directive("cpus-per-task", &threads.to_string());
        self.write_directive("mem", &format!("{memory_gb}G"));
    }

    /// one task per sample, driven by the scheduler's array index
    pub fn write_array(&mut self, samples_number: usize) {
        self.write_directive("array", &format!("1-{samples_number}"));
    }

    /// directives that only appear when the user asked for them
    pub fn write_optional_directives(&mut self, opts: &SlurmOpts) {
        if let Some(dir) = &opts.log_dir {
            let pattern = dir.join("slurm-%A_%a.out");
            self.write_directive("output", &pattern.to_string_lossy());
        }
        if let Some(partition) = &opts.partition {
            self.write_directive("partition", partition);
        }
        if let Some(mail_type) = &opts.mail_type {
            self.write_directive("mail-type", mail_type);
        }
        if let Some(mail_user) = &opts.mail_user {
            self.write_directive("mail-user", mail_user);
        }
    }

    /// pick this task's sample from the list file, then run the engine
    /// on it
    pub fn write_pipeline_body(&mut self, pipeline: &Path, sample_list: &Path, threads: usize) {
        self.strbuf.push_str("\nsingle_sample=\"$(tail -n +$SLURM_ARRAY_TASK_ID ");
        self.strbuf.push_str(&sample_list.to_string_lossy());
        self.strbuf.push_str(" | head -n1)\"\n\n");
        self.write_engine_call(pipeline, threads, Some("$single_sample"), None);
    }

    /// database setup runs once, with no array and a fixed thread
    /// count, against the db-setup target the module rule files provide
    pub fn write_db_body(&mut self, pipeline: &Path) {
        self.strbuf.push('\n');
        self.write_engine_call(pipeline, DB_SETUP_THREADS, None, Some("setup_external_db"));
    }

    fn write_engine_call(
        &mut self,
        pipeline: &Path,
        threads: usize,
        sample: Option<&str>,
        target: Option<&str>,
    ) {
        self.strbuf.push_str("snakemake --use-conda --cores ");
        self.strbuf.push_str(&threads.to_string());
        if let Some(sample) = sample {
            self.strbuf.push_str(" --config samples=");
            self.strbuf.push_str(sample);
        }
        self.strbuf.push_str(" -s ");
        self.strbuf.push_str(&pipeline.to_string_lossy());
        if let Some(target) = target {
            self.strbuf.push(' ');
            self.strbuf.push_str(target);
        }
        self.strbuf.push('\n');
    }

    fn write_directive(&mut self, key: &str, value: &str) {
        self.strbuf.push_str("#SBATCH --");
        self.strbuf.push_str(key);
        self.strbuf.push('=');
        self.strbuf.push_str(value);
        self.strbuf.push('\n');
    }
}

/// Render the array-job submission script for the configured pipeline.
pub fn render_pipeline_script(opts: &SlurmOpts, samples_number: usize, pipeline: &Path) -> String {
    let mut strbuf = String::with_capacity(512);
    let mut builder = SlurmScriptBuilder::new(&mut strbuf);
    builder.write_prefix("mgpipe", opts.threads, opts.memory_gb);
    builder.write_array(samples_number);
    builder.write_optional_directives(opts);
    builder.write_pipeline_body(pipeline, &opts.sample_list, opts.threads);
    strbuf
}

/// Render the one-shot database-setup script.
pub fn render_db_script(opts: &SlurmOpts, db_pipeline: &Path) -> String {
    let mut strbuf = String::with_capacity(512);
    let mut builder = SlurmScriptBuilder::new(&mut strbuf);
    builder.write_prefix("mgpipe_db", DB_SETUP_THREADS, opts.memory_gb);
    builder.write_optional_directives(opts);
    builder.write_db_body(db_pipeline);
    strbuf
}

/// Serialize the sample list, one per line, for the array script's
/// `tail | head` lookup.
pub fn render_sample_list(samples: &[String]) -> String {
    let mut out = String::with_capacity(samples.len() * 16);
    for sample in samples {
        out.push_str(sample);
        out.push('\n');
    }
    out
}

/// Overwrite the `threads` value in an already-emitted configuration
/// file when it differs from the requested one. The submission script
/// and the engine configuration must agree on the thread count.
pub fn update_threads(config_path: &Path, threads: usize) -> Result<()> {
    if !config_path.is_file() {
        return Err(Error::ConfigMissing(config_path.to_path_buf()).into());
    }
    let text = std::fs::read_to_string(config_path)
        .with_context(|| format!("reading {config_path:?}"))?;
    let mut config: serde_yaml::Mapping =
        serde_yaml::from_str(&text).context("parsing configuration file")?;

    let current = config
        .get("threads")
        .and_then(Value::as_u64)
        .ok_or(Error::NoThreadsKey)?;
    if current == threads as u64 {
        return Ok(());
    }

    log::info!("overwriting threads in {config_path:?}: {current} -> {threads}");
    config.insert("threads".into(), Value::from(threads as u64));
    let text = serde_yaml::to_string(&config).context("serializing configuration file")?;
    std::fs::write(config_path, text).with_context(|| format!("writing {config_path:?}"))?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn opts() -> SlurmOpts {
        SlurmOpts {
            unit: false,
            threads: 16,
            memory_gb: 64,
            partition: None,
            mail_type: None,
            mail_user: None,
            log_dir: None,
            output_script: PathBuf::from("slurm_pipeline.sh"),
            db_output_script: PathBuf::from("slurm_setup_db.sh"),
            sample_list: PathBuf::from("/wd/samples.txt"),
        }
    }

    #[test]
    fn test_pipeline_script_minimal() {
        let script = render_pipeline_script(&opts(), 3, Path::new("/wd/pipeline.smk"));
        assert!(script.starts_with("#!/bin/bash"));
        assert!(script.contains("#SBATCH --cpus-per-task=16"));
        assert!(script.contains("#SBATCH --mem=64G"));
        assert!(script.contains("#SBATCH --array=1-3"));
        assert!(script.contains("tail -n +$SLURM_ARRAY_TASK_ID /wd/samples.txt"));
        assert!(script.contains("--cores 16 --config samples=$single_sample -s /wd/pipeline.smk"));
        // nothing optional was requested
        assert!(!script.contains("--partition"));
        assert!(!script.contains("--mail-type"));
        assert!(!script.contains("--output"));
    }

    #[test]
    fn test_pipeline_script_optional_directives() {
        let mut opts = opts();
        opts.partition = Some("compute".to_owned());
        opts.mail_type = Some("END,FAIL".to_owned());
        opts.mail_user = Some("user@example.org".to_owned());
        opts.log_dir = Some(PathBuf::from("/wd/logs"));
        let script = render_pipeline_script(&opts, 1, Path::new("/wd/pipeline.smk"));
        assert!(script.contains("#SBATCH --partition=compute"));
        assert!(script.contains("#SBATCH --mail-type=END,FAIL"));
        assert!(script.contains("#SBATCH --mail-user=user@example.org"));
        assert!(script.contains("#SBATCH --output=/wd/logs/slurm-%A_%a.out"));
    }

    #[test]
    fn test_db_script_has_no_array() {
        let script = render_db_script(&opts(), Path::new("/wd/pipeline.smk"));
        assert!(!script.contains("--array"));
        assert!(script.contains("--cores 7 -s /wd/pipeline.smk setup_external_db"));
    }

    #[test]
    fn test_render_sample_list() {
        let samples = vec!["a".to_owned(), "b".to_owned()];
        assert_eq!(render_sample_list(&samples), "a\nb\n");
    }

    #[test]
    fn test_update_threads_rewrites_differing_value() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = dir.path().join("config.yaml");
        std::fs::write(&config, "threads: 8\nwork_dir: /wd\n")?;

        update_threads(&config, 8)?;
        let unchanged = std::fs::read_to_string(&config)?;
        assert!(unchanged.contains("threads: 8"));

        update_threads(&config, 32)?;
        let patched: serde_yaml::Mapping =
            serde_yaml::from_str(&std::fs::read_to_string(&config)?)?;
        assert_eq!(patched.get("threads").and_then(Value::as_u64), Some(32));
        assert_eq!(
            patched.get("work_dir").and_then(Value::as_str),
            Some("/wd")
        );
        Ok(())
    }

    #[test]
    fn test_update_threads_missing_config() {
        let err = update_threads(Path::new("/no/such/config.yaml"), 8);
        assert!(err.is_err());
    }
}
