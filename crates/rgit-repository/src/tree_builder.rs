//! Recursive tree construction from a directory.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use bstr::BString;
use rgit_hash::ObjectId;
use rgit_object::{FileMode, Object, ObjectType, Tree, TreeEntry};

use crate::{RepoError, Repository, GIT_DIR_NAME};

impl Repository {
    /// Snapshot a directory as a tree object, writing every blob and
    /// subtree to the store, and return the root tree id.
    ///
    /// Children are written post-order: a tree cannot be framed until its
    /// entries have ids. The `.git` directory is skipped. Entries sort by
    /// name bytes before framing, so identical directory contents hash
    /// identically regardless of filesystem iteration order. Any failure
    /// aborts the walk; blobs already written stay behind as harmless
    /// orphans.
    pub fn write_tree(&self, dir: impl AsRef<Path>) -> Result<ObjectId, RepoError> {
        self.write_tree_inner(dir.as_ref())
    }

    fn write_tree_inner(&self, dir: &Path) -> Result<ObjectId, RepoError> {
        let mut tree = Tree::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            if name == GIT_DIR_NAME {
                continue;
            }

            let (mode, oid) = if entry.file_type()?.is_dir() {
                (FileMode::Tree, self.write_tree_inner(&entry.path())?)
            } else {
                let content = fs::read(entry.path())?;
                let oid = self
                    .store()
                    .write(&Object::new(ObjectType::Blob, content))?;
                (FileMode::Regular, oid)
            };

            tree.entries.push(TreeEntry {
                mode,
                name: name_bytes(&name),
                oid,
            });
        }

        tree.sort();
        let obj = Object::new(ObjectType::Tree, tree.serialize_content());
        Ok(self.store().write(&obj)?)
    }
}

fn name_bytes(name: &OsStr) -> BString {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        BString::from(name.as_bytes())
    }
    #[cfg(not(unix))]
    {
        BString::from(name.to_string_lossy().into_owned())
    }
}
