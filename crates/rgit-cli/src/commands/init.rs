use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rgit_repository::Repository;

use crate::Cli;

#[derive(Args)]
pub struct InitArgs {
    /// Directory to create the repository in
    directory: Option<PathBuf>,
}

pub fn run(args: &InitArgs, _cli: &Cli) -> Result<i32> {
    let target = match &args.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    let repo = Repository::init(&target)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(
        out,
        "Initialized empty Git repository in {}",
        repo.git_dir().display()
    )?;

    Ok(0)
}
