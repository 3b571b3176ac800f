use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Args;
use rgit_hash::ObjectId;
use rgit_object::{ObjectType, Tree};

use super::open_repo;
use crate::Cli;

#[derive(Args)]
pub struct LsTreeArgs {
    /// Show only entry names
    #[arg(long)]
    name_only: bool,

    /// Tree id
    #[arg(value_name = "tree")]
    tree: String,
}

pub fn run(args: &LsTreeArgs, _cli: &Cli) -> Result<i32> {
    if !args.name_only {
        bail!("only --name-only output is supported");
    }

    let repo = open_repo()?;
    let oid = ObjectId::from_hex(&args.tree)?;
    let obj = repo.read_object(&oid)?;
    if obj.obj_type != ObjectType::Tree {
        bail!("not a tree object: {} is a {}", args.tree, obj.obj_type);
    }

    let tree = Tree::parse(&obj.data)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for entry in tree.iter() {
        out.write_all(&entry.name)?;
        writeln!(out)?;
    }

    Ok(0)
}
