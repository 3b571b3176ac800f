use std::cmp::Ordering;

use bstr::{BStr, BString, ByteSlice};
use rgit_hash::ObjectId;

use crate::ObjectError;

/// File mode for tree entries.
///
/// This implementation writes only `Tree` and `Regular` entries, but
/// parsing accepts every mode real repositories contain so fetched trees
/// round-trip unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// Regular file (100644)
    Regular,
    /// Executable file (100755)
    Executable,
    /// Symbolic link (120000)
    Symlink,
    /// Git submodule link (160000)
    Gitlink,
    /// Subdirectory (040000)
    Tree,
}

impl FileMode {
    /// Parse from octal ASCII bytes (e.g., `b"100644"` or `b"40000"`).
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        let raw = parse_octal(s)
            .ok_or_else(|| ObjectError::InvalidFileMode(String::from_utf8_lossy(s).into()))?;
        match raw {
            0o100644 => Ok(Self::Regular),
            0o100755 => Ok(Self::Executable),
            0o120000 => Ok(Self::Symlink),
            0o160000 => Ok(Self::Gitlink),
            0o040000 => Ok(Self::Tree),
            _ => Err(ObjectError::InvalidFileMode(
                String::from_utf8_lossy(s).into(),
            )),
        }
    }

    /// Serialize to octal ASCII bytes.
    ///
    /// Directories are written with the leading zero (`040000`).
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Regular => b"100644",
            Self::Executable => b"100755",
            Self::Symlink => b"120000",
            Self::Gitlink => b"160000",
            Self::Tree => b"040000",
        }
    }

    /// Get the raw numeric value.
    pub fn raw(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Gitlink => 0o160000,
            Self::Tree => 0o40000,
        }
    }

    /// Is this a tree (directory) entry?
    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree)
    }

    /// Is this a blob (file) entry?
    pub fn is_blob(&self) -> bool {
        matches!(self, Self::Regular | Self::Executable)
    }
}

/// Parse an octal ASCII string to u32.
fn parse_octal(s: &[u8]) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut val: u32 = 0;
    for &b in s {
        if !(b'0'..=b'7').contains(&b) {
            return None;
        }
        val = val.checked_mul(8)?.checked_add(u32::from(b - b'0'))?;
    }
    Some(val)
}

/// A single entry in a git tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: BString,
    pub oid: ObjectId,
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeEntry {
    /// Entries order by name bytes ascending.
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

/// A git tree object, a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse tree content from binary format.
    ///
    /// Each entry is: `<mode-ascii> <name>\0<20 oid bytes>`
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < content.len() {
            // Parse mode (octal ASCII until space).
            let space_pos = content[pos..]
                .iter()
                .position(|&b| b == b' ')
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: "missing space after mode".into(),
                })?
                + pos;

            let mode = FileMode::from_bytes(&content[pos..space_pos]).map_err(|_| {
                ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: "invalid mode".into(),
                }
            })?;

            // Parse name (until null byte).
            let name_start = space_pos + 1;
            let null_pos = content[name_start..]
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: name_start,
                    reason: "missing null after name".into(),
                })?
                + name_start;

            let name = BString::from(&content[name_start..null_pos]);

            // Parse id (raw bytes after null).
            let oid_start = null_pos + 1;
            let oid_len = ObjectId::LEN;
            if oid_start + oid_len > content.len() {
                return Err(ObjectError::InvalidTreeEntry {
                    offset: oid_start,
                    reason: "truncated object id".into(),
                });
            }

            let oid = ObjectId::from_bytes(&content[oid_start..oid_start + oid_len])?;

            entries.push(TreeEntry { mode, name, oid });
            pos = oid_start + oid_len;
        }

        Ok(Self { entries })
    }

    /// Serialize tree content to binary format.
    ///
    /// Entries are written sorted by name so identical directory contents
    /// always hash identically.
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut sorted = self.entries.clone();
        sorted.sort();

        let mut out = Vec::new();
        for entry in &sorted {
            out.extend_from_slice(entry.mode.as_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.oid.as_bytes());
        }
        out
    }

    /// Sort entries in canonical order.
    pub fn sort(&mut self) {
        self.entries.sort();
    }

    /// Lookup an entry by name.
    pub fn find(&self, name: &BStr) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name.as_bstr() == name)
    }

    /// Iterate entries.
    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Object, ObjectType};

    fn oid(hex: &str) -> ObjectId {
        ObjectId::from_hex(hex).unwrap()
    }

    const HELLO_BLOB: &str = "3b18e512dba79e4c8300dd08aeb37f8e728b8dad";

    #[test]
    fn file_mode_from_bytes() {
        assert_eq!(FileMode::from_bytes(b"100644").unwrap(), FileMode::Regular);
        assert_eq!(
            FileMode::from_bytes(b"100755").unwrap(),
            FileMode::Executable
        );
        assert_eq!(FileMode::from_bytes(b"120000").unwrap(), FileMode::Symlink);
        assert_eq!(FileMode::from_bytes(b"160000").unwrap(), FileMode::Gitlink);
        assert_eq!(FileMode::from_bytes(b"40000").unwrap(), FileMode::Tree);
        assert_eq!(FileMode::from_bytes(b"040000").unwrap(), FileMode::Tree);
    }

    #[test]
    fn file_mode_rejects_garbage() {
        assert!(FileMode::from_bytes(b"").is_err());
        assert!(FileMode::from_bytes(b"10x644").is_err());
        assert!(FileMode::from_bytes(b"777777").is_err());
    }

    #[test]
    fn file_mode_serializes_with_leading_zero() {
        assert_eq!(FileMode::Tree.as_bytes(), b"040000");
        assert_eq!(FileMode::Regular.as_bytes(), b"100644");
    }

    #[test]
    fn parse_single_entry() {
        let mut content = Vec::new();
        content.extend_from_slice(b"100644 hello.txt\0");
        content.extend_from_slice(oid(HELLO_BLOB).as_bytes());

        let tree = Tree::parse(&content).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.entries[0].mode, FileMode::Regular);
        assert_eq!(tree.entries[0].name, "hello.txt");
        assert_eq!(tree.entries[0].oid, oid(HELLO_BLOB));
    }

    #[test]
    fn parse_accepts_short_dir_mode() {
        let mut content = Vec::new();
        content.extend_from_slice(b"40000 sub\0");
        content.extend_from_slice(oid(HELLO_BLOB).as_bytes());

        let tree = Tree::parse(&content).unwrap();
        assert_eq!(tree.entries[0].mode, FileMode::Tree);
    }

    #[test]
    fn parse_truncated_oid() {
        let content = b"100644 a\0shortid";
        let err = Tree::parse(content).unwrap_err();
        assert!(matches!(err, ObjectError::InvalidTreeEntry { .. }));
    }

    #[test]
    fn parse_missing_null() {
        let err = Tree::parse(b"100644 noterm").unwrap_err();
        assert!(matches!(
            err,
            ObjectError::InvalidTreeEntry { offset: 7, .. }
        ));
    }

    #[test]
    fn serialize_sorts_by_name() {
        let tree = Tree {
            entries: vec![
                TreeEntry {
                    mode: FileMode::Regular,
                    name: BString::from("zebra.txt"),
                    oid: oid(HELLO_BLOB),
                },
                TreeEntry {
                    mode: FileMode::Tree,
                    name: BString::from("alpha"),
                    oid: oid(HELLO_BLOB),
                },
            ],
        };
        let content = tree.serialize_content();
        let parsed = Tree::parse(&content).unwrap();
        assert_eq!(parsed.entries[0].name, "alpha");
        assert_eq!(parsed.entries[1].name, "zebra.txt");
    }

    #[test]
    fn roundtrip_preserves_modes() {
        let tree = Tree {
            entries: vec![
                TreeEntry {
                    mode: FileMode::Executable,
                    name: BString::from("run.sh"),
                    oid: oid(HELLO_BLOB),
                },
                TreeEntry {
                    mode: FileMode::Symlink,
                    name: BString::from("link"),
                    oid: oid(HELLO_BLOB),
                },
            ],
        };
        let parsed = Tree::parse(&tree.serialize_content()).unwrap();
        assert_eq!(
            parsed.find(BStr::new("run.sh")).unwrap().mode,
            FileMode::Executable
        );
        assert_eq!(parsed.find(BStr::new("link")).unwrap().mode, FileMode::Symlink);
    }

    #[test]
    fn known_tree_id() {
        // One entry: hello.txt pointing at the "hello world\n" blob.
        let tree = Tree {
            entries: vec![TreeEntry {
                mode: FileMode::Regular,
                name: BString::from("hello.txt"),
                oid: oid(HELLO_BLOB),
            }],
        };
        let obj = Object::new(ObjectType::Tree, tree.serialize_content());
        assert_eq!(
            obj.id().unwrap().to_hex(),
            "68aba62e560c0ebc3396e8ae9335232cd93a3f60"
        );
    }

    #[test]
    fn known_nested_tree_id() {
        let sub = Tree {
            entries: vec![TreeEntry {
                mode: FileMode::Regular,
                name: BString::from("inner.txt"),
                oid: oid(HELLO_BLOB),
            }],
        };
        let sub_id = Object::new(ObjectType::Tree, sub.serialize_content())
            .id()
            .unwrap();
        assert_eq!(sub_id.to_hex(), "40614b3c492fbbad156f82b53cbf6c85f0ab123f");

        let readme = Object::new(ObjectType::Blob, b"docs\n".to_vec()).id().unwrap();
        let root = Tree {
            entries: vec![
                TreeEntry {
                    mode: FileMode::Tree,
                    name: BString::from("sub"),
                    oid: sub_id,
                },
                TreeEntry {
                    mode: FileMode::Regular,
                    name: BString::from("README.md"),
                    oid: readme,
                },
            ],
        };
        let obj = Object::new(ObjectType::Tree, root.serialize_content());
        assert_eq!(
            obj.id().unwrap().to_hex(),
            "74bc8c845ba632a4fb3373822c5141a0214d7eaf"
        );
    }

    #[test]
    fn empty_tree_serializes_empty() {
        assert!(Tree::new().serialize_content().is_empty());
        assert!(Tree::parse(b"").unwrap().is_empty());
    }
}
