use std::io::{self, Write};

use anyhow::{bail, Result};
use bstr::BString;
use clap::Args;
use rgit_hash::ObjectId;
use rgit_object::{Commit, GitDate, Object, ObjectType, Signature};

use super::open_repo;
use crate::Cli;

#[derive(Args)]
pub struct CommitTreeArgs {
    /// Tree object id
    #[arg(value_name = "tree")]
    tree: String,

    /// Parent commit id
    #[arg(short = 'p', value_name = "parent")]
    parent: Option<String>,

    /// Commit message
    #[arg(short = 'm', value_name = "message")]
    message: String,
}

pub fn run(args: &CommitTreeArgs, _cli: &Cli) -> Result<i32> {
    let repo = open_repo()?;

    let tree = ObjectId::from_hex(&args.tree)?;
    if !repo.contains(&tree) {
        bail!("not a valid object name: {}", args.tree);
    }

    let parent = args
        .parent
        .as_deref()
        .map(ObjectId::from_hex)
        .transpose()?;

    let commit = Commit {
        tree,
        parent,
        author: Signature::placeholder(GitDate::now()),
        message: BString::from(args.message.as_str()),
    };

    let obj = Object::new(ObjectType::Commit, commit.serialize_content());
    let oid = repo.write_object(&obj)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", oid.to_hex())?;

    Ok(0)
}
