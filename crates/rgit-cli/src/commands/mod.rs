pub mod cat_file;
pub mod clone;
pub mod commit_tree;
pub mod hash_object;
pub mod init;
pub mod ls_tree;
pub mod write_tree;

use anyhow::Result;
use clap::Subcommand;

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty Git repository
    Init(init::InitArgs),
    /// Provide content for repository objects
    CatFile(cat_file::CatFileArgs),
    /// Compute object ID and optionally create a blob from a file
    HashObject(hash_object::HashObjectArgs),
    /// Create a tree object from the current directory
    WriteTree(write_tree::WriteTreeArgs),
    /// List the contents of a tree object
    LsTree(ls_tree::LsTreeArgs),
    /// Create a new commit object
    CommitTree(commit_tree::CommitTreeArgs),
    /// Clone a repository into a new directory
    Clone(clone::CloneArgs),
}

pub fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Init(args) => init::run(args, &cli),
        Commands::CatFile(args) => cat_file::run(args, &cli),
        Commands::HashObject(args) => hash_object::run(args, &cli),
        Commands::WriteTree(args) => write_tree::run(args, &cli),
        Commands::LsTree(args) => ls_tree::run(args, &cli),
        Commands::CommitTree(args) => commit_tree::run(args, &cli),
        Commands::Clone(args) => clone::run(args, &cli),
    }
}

/// Open the repository in the current directory.
pub fn open_repo() -> Result<rgit_repository::Repository> {
    Ok(rgit_repository::Repository::open(".")?)
}
