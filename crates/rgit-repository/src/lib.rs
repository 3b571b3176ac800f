//! Repository layout, initialization, and the recursive tree builder.
//!
//! A [`Repository`] is an explicit handle over one `.git` directory; every
//! operation goes through a handle rather than ambient state, so multiple
//! repositories can coexist in one process (clone works on a fresh local
//! root while talking to a remote).

mod error;
mod init;
mod tree_builder;

pub use error::RepoError;

use std::path::{Path, PathBuf};

use rgit_hash::ObjectId;
use rgit_object::Object;
use rgit_store::ObjectStore;

/// Name of the repository metadata directory.
pub const GIT_DIR_NAME: &str = ".git";

/// A handle to one local repository.
pub struct Repository {
    /// Working directory root.
    root: PathBuf,
    /// The `.git` directory under the root.
    git_dir: PathBuf,
    /// Loose object store under `.git/objects`.
    store: ObjectStore,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .field("git_dir", &self.git_dir)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Initialize a new repository at `root`.
    ///
    /// Fails with [`RepoError::AlreadyExists`] when `root/.git` is already
    /// present; re-initializing is intentionally not a no-op.
    pub fn init(root: impl AsRef<Path>) -> Result<Self, RepoError> {
        init::init_repository(root.as_ref())
    }

    /// Open an existing repository at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, RepoError> {
        let root = root.as_ref().to_path_buf();
        let git_dir = root.join(GIT_DIR_NAME);
        if !git_dir.is_dir() {
            return Err(RepoError::NotARepository(root));
        }
        Ok(Self::from_parts(root, git_dir))
    }

    pub(crate) fn from_parts(root: PathBuf, git_dir: PathBuf) -> Self {
        let store = ObjectStore::open(git_dir.join("objects"));
        Self {
            root,
            git_dir,
            store,
        }
    }

    /// Working directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the `.git` directory.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// The underlying loose object store.
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Read an object by id; a missing object is [`RepoError::NotFound`].
    pub fn read_object(&self, oid: &ObjectId) -> Result<Object, RepoError> {
        self.store.read(oid)?.ok_or(RepoError::NotFound(*oid))
    }

    /// Write an object to the store, returning its id.
    pub fn write_object(&self, obj: &Object) -> Result<ObjectId, RepoError> {
        Ok(self.store.write(obj)?)
    }

    /// Whether the store holds an object with this id.
    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.store.contains(oid)
    }
}
