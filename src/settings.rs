use std::path::PathBuf;

use anyhow::Result;

use crate::args::{Args, Command};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("setup file \"{0}\" does not exist")]
    SetupNotFound(String),
}

/// Settings are like Args, except all the logic has
/// been applied so e.g. defaults are added in.
#[derive(Debug)]
pub struct Settings {
    pub catalog: PathBuf,
    pub setup: PathBuf,
    pub verbose: u8,
    pub cmd: Command,
}

impl TryFrom<Args> for Settings {
    type Error = anyhow::Error;
    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let mut setup = PathBuf::from(&args.setup);
        if setup.exists() {
            setup = setup.canonicalize()?;
        } else {
            return Err(Error::SetupNotFound(args.setup).into());
        }

        // the catalog is only read by workflow/unit; its existence is
        // checked when it is loaded.
        let catalog = PathBuf::from(&args.catalog);

        Ok(Self {
            catalog,
            setup,
            verbose: args.verbose,
            cmd: args.cmd,
        })
    }
}
