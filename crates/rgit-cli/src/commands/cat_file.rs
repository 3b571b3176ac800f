use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Args;
use rgit_hash::ObjectId;

use super::open_repo;
use crate::Cli;

#[derive(Args)]
pub struct CatFileArgs {
    /// Pretty-print the object content
    #[arg(short = 'p')]
    pretty: bool,

    /// Object id
    #[arg(value_name = "object")]
    object: String,
}

pub fn run(args: &CatFileArgs, _cli: &Cli) -> Result<i32> {
    if !args.pretty {
        bail!("only -p output is supported");
    }

    let repo = open_repo()?;
    let oid = ObjectId::from_hex(&args.object)?;
    let obj = repo.read_object(&oid)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(&obj.data)?;

    Ok(0)
}
