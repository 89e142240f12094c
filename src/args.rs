use clap::{Parser, Subcommand};

const CMD_NAME: &str = "mgp";
const DEFAULT_CATALOG: &str = "packages.json";
const DEFAULT_SETUP: &str = "setup.yaml";

/// Stores our command-line args format.
#[derive(Parser)]
#[command(name = CMD_NAME, version, about = None, long_about = None)]
pub struct Args {
    /// Package catalog file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CATALOG)]
    #[arg(env = "MGPIPE_CATALOG")]
    pub catalog: String,

    /// Pipeline setup file (sample list and working directory)
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_SETUP)]
    #[arg(env = "MGPIPE_SETUP")]
    pub setup: String,

    /// Print additional debugging info (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the full pipeline interactively
    Workflow {
        /// Module to start the configuration from (default: the first
        /// module in the catalog order)
        #[arg(short, long, value_name = "MODULE")]
        from: Option<String>,

        /// Threads available to each pipeline job
        #[arg(short, long, value_name = "N", default_value_t = 8)]
        threads: usize,
    },

    /// Configure a single module against an already-run pipeline
    Unit {
        /// Module to configure
        #[arg(short, long, value_name = "MODULE")]
        module: String,

        /// Threads available to the module's job
        #[arg(short, long, value_name = "N", default_value_t = 8)]
        threads: usize,
    },

    /// Generate cluster submission scripts for an emitted configuration
    Slurm {
        /// Target the single-module configuration (config_unit.yaml)
        #[arg(short, long)]
        unit: bool,

        /// Threads requested per array job
        #[arg(short, long, value_name = "N", default_value_t = 8)]
        threads: usize,

        /// Memory per job, in gigabytes
        #[arg(short, long, value_name = "GB", default_value_t = 64)]
        memory: usize,

        /// Scheduler partition to submit to
        #[arg(short, long, value_name = "NAME")]
        partition: Option<String>,

        /// Mail event type(s) to notify on
        #[arg(long, value_name = "TYPE")]
        mail_type: Option<String>,

        /// Mail address to notify
        #[arg(long, value_name = "ADDR")]
        mail_user: Option<String>,

        /// Directory for scheduler log files
        #[arg(short, long, value_name = "DIR")]
        log_dir: Option<String>,

        /// Path of the generated submission script
        #[arg(short, long, value_name = "FILE", default_value = "slurm_pipeline.sh")]
        output_script: String,

        /// Path of the generated database-setup script
        #[arg(long, value_name = "FILE", default_value = "slurm_setup_db.sh")]
        db_output_script: String,

        /// Path of the generated one-sample-per-line file
        #[arg(long, value_name = "FILE", default_value = "samples.txt")]
        sample_list: String,
    },
}
