use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::{RepoError, Repository, GIT_DIR_NAME};

/// What HEAD points at in a fresh repository.
const HEAD_CONTENT: &str = "ref: refs/heads/main\n";

/// Create the `.git` layout under `root`: `objects/`, `refs/`, and HEAD.
///
/// Not idempotent: an existing `.git` fails with `AlreadyExists`. A silent
/// re-init would hand callers a store they wrongly believe fresh.
pub(crate) fn init_repository(root: &Path) -> Result<Repository, RepoError> {
    fs::create_dir_all(root)?;

    let git_dir = root.join(GIT_DIR_NAME);
    fs::create_dir(&git_dir).map_err(|e| match e.kind() {
        ErrorKind::AlreadyExists => RepoError::AlreadyExists(git_dir.clone()),
        _ => RepoError::Io(e),
    })?;

    fs::create_dir(git_dir.join("objects"))?;
    fs::create_dir(git_dir.join("refs"))?;
    fs::write(git_dir.join("HEAD"), HEAD_CONTENT)?;

    Ok(Repository::from_parts(root.to_path_buf(), git_dir))
}
