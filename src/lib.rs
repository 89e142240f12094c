/// High-level command line app
mod app;
/// Definition of command-line args
mod args;
/// Config and workflow-definition emission
mod emit;
/// Filesystem operations on the work dir
mod fs;
/// Combined command-line and defaults-applied run settings
mod settings;
/// The pipeline setup file
mod setup;
/// Cluster submission script generation
mod slurm;
/// Text UI
mod ui;
/// Shipped parameter validators
mod validators;

// exported for tests:
pub use app::App;
pub use args::{Args, Command};
pub use settings::Settings;

/// Run the command-line app.
pub fn run() -> Result<(), anyhow::Error> {
    use clap::Parser;
    let args = Args::parse();

    // INTERPRET SETTINGS ///////////////
    let settings: Settings = args.try_into()?;

    let log_level = match settings.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    simple_logging::log_to_stderr(log_level);

    // RUN THE THING /////////////////
    let app = App::new(settings);
    let mut ui = ui::Ui::new();
    app.run(&mut ui)?;

    Ok(())
}
