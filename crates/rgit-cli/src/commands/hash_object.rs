use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rgit_hash::Hasher;
use rgit_object::{Object, ObjectType};

use super::open_repo;
use crate::Cli;

#[derive(Args)]
pub struct HashObjectArgs {
    /// Actually write the object into the object database
    #[arg(short = 'w')]
    write: bool,

    /// File to hash
    #[arg(value_name = "file")]
    file: PathBuf,
}

pub fn run(args: &HashObjectArgs, _cli: &Cli) -> Result<i32> {
    let data = std::fs::read(&args.file)?;

    let oid = if args.write {
        let repo = open_repo()?;
        repo.write_object(&Object::new(ObjectType::Blob, data))?
    } else {
        Hasher::hash_object(ObjectType::Blob.as_str(), &data)?
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", oid.to_hex())?;

    Ok(0)
}
