use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use rgit_object::Object;
use rgit_pack::{decode_pack, delta};
use rgit_protocol::{fetch, HttpClient};
use rgit_repository::Repository;

use crate::Cli;

#[derive(Args)]
pub struct CloneArgs {
    /// Repository URL
    #[arg(value_name = "url")]
    repository: String,

    /// Destination directory
    #[arg(value_name = "directory")]
    dest_dir: Option<PathBuf>,
}

/// Clone over smart HTTP: discover refs, negotiate a pack for the first
/// advertised ref, decode it, persist every object, then resolve the
/// pending ref-deltas against their stored bases.
///
/// Every step is strictly sequential and fail-fast; an aborted clone
/// leaves whatever objects were already persisted, which is safe to throw
/// away (or resume over) because object identity is content-derived.
pub fn run(args: &CloneArgs, _cli: &Cli) -> Result<i32> {
    let dest = match &args.dest_dir {
        Some(dir) => dir.clone(),
        None => infer_directory(&args.repository)?,
    };

    if dest.exists() {
        bail!("destination path '{}' already exists", dest.display());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Cloning into '{}'...", dest.display())?;

    let client = HttpClient::new(&args.repository)?;
    let refs = fetch::discover_refs(&client)?;

    let repo = Repository::init(&dest)?;

    let Some(head) = refs.first() else {
        writeln!(out, "warning: You appear to have cloned an empty repository.")?;
        return Ok(0);
    };

    let pack = fetch::request_pack(&client, &[head.oid])?;
    let decoded = decode_pack(&pack)?;

    writeln!(
        out,
        "remote: Enumerating objects: {}, done.",
        decoded.objects.len() + decoded.deltas.len()
    )?;

    let total = decoded.objects.len();
    for (i, packed) in decoded.objects.iter().enumerate() {
        repo.write_object(&Object::new(packed.obj_type, packed.data.clone()))?;
        writeln!(out, "Receiving objects: ({},{total}), done.", i + 1)?;
    }

    // Deltas come last: each base is either a whole object persisted above
    // or the result of an earlier delta in pack order.
    let delta_total = decoded.deltas.len();
    for (i, pending) in decoded.deltas.iter().enumerate() {
        let base = repo
            .read_object(&pending.base)
            .with_context(|| format!("delta base {} is not in the pack", pending.base))?;
        let target = delta::apply_delta(&base.data, &pending.data)?;
        repo.write_object(&Object::new(base.obj_type, target))?;
        writeln!(out, "Receiving deltas: ({},{delta_total}), done.", i + 1)?;
    }

    Ok(0)
}

/// Derive the local directory name from the URL's last path segment,
/// trimming any trailing slash and `.git` suffix.
fn infer_directory(url: &str) -> Result<PathBuf> {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed.rsplit('/').next().unwrap_or("");
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() || name.contains(':') {
        bail!("could not infer a directory name from '{url}'");
    }
    Ok(PathBuf::from(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_directory_from_url() {
        for url in [
            "https://example.com/user/repo",
            "https://example.com/user/repo.git",
            "https://example.com/user/repo.git/",
            "http://example.com/repo/",
        ] {
            let dir = infer_directory(url).unwrap();
            assert!(dir == PathBuf::from("repo"), "{url} -> {}", dir.display());
        }
    }

    #[test]
    fn rejects_urls_without_a_path() {
        assert!(infer_directory("https://").is_err());
        assert!(infer_directory("").is_err());
    }
}
