use std::path::PathBuf;

use rgit_hash::ObjectId;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("repository already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("object not found: {0}")]
    NotFound(ObjectId),

    #[error(transparent)]
    Store(#[from] rgit_store::StoreError),

    #[error(transparent)]
    Object(#[from] rgit_object::ObjectError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
