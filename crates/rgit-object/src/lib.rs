//! Git object model: framing, trees, commits, and signatures.
//!
//! An object on disk is `"<type> <size>\0<content>"`; its id is the SHA-1
//! of that exact byte sequence. This crate keeps objects raw (`Object`
//! holds the content bytes untouched) and parses trees and commits on
//! demand, so objects received from other implementations round-trip
//! byte-for-byte.

mod commit;
pub mod header;
mod signature;
mod tree;

pub use commit::Commit;
pub use signature::{GitDate, Signature};
pub use tree::{FileMode, Tree, TreeEntry};

use bstr::BString;
use rgit_hash::{HashError, Hasher, ObjectId};

/// Errors produced by object operations.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("invalid object type: {0}")]
    InvalidType(BString),

    #[error("invalid object header: {0}")]
    InvalidHeader(String),

    #[error("object length mismatch: header declares {expected} bytes, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("invalid tree entry at offset {offset}: {reason}")]
    InvalidTreeEntry { offset: usize, reason: String },

    #[error("invalid commit: missing '{field}' header")]
    MissingCommitField { field: &'static str },

    #[error("invalid file mode: {0}")]
    InvalidFileMode(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// The four types of git objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectType {
    /// Parse from the type string in object headers.
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        match s {
            b"blob" => Ok(Self::Blob),
            b"tree" => Ok(Self::Tree),
            b"commit" => Ok(Self::Commit),
            b"tag" => Ok(Self::Tag),
            _ => Err(ObjectError::InvalidType(BString::from(s))),
        }
    }

    /// The canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Tag => "tag",
        }
    }

    /// The canonical byte representation.
    pub fn as_bytes(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ObjectType {
    type Err = ObjectError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

/// A git object: its type tag and its raw content bytes.
///
/// Content is never reinterpreted; `cat-file` style consumers get the
/// payload exactly as it was hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub obj_type: ObjectType,
    pub data: Vec<u8>,
}

impl Object {
    pub fn new(obj_type: ObjectType, data: Vec<u8>) -> Self {
        Self { obj_type, data }
    }

    /// Parse from framed bytes (header + content).
    ///
    /// The declared size must equal the actual content length exactly.
    pub fn parse(framed: &[u8]) -> Result<Self, ObjectError> {
        let hdr = header::Header::parse(framed)?;
        let content = &framed[hdr.len..];
        if content.len() != hdr.content_size {
            return Err(ObjectError::LengthMismatch {
                expected: hdr.content_size,
                actual: content.len(),
            });
        }
        Ok(Self {
            obj_type: hdr.obj_type,
            data: content.to_vec(),
        })
    }

    /// Serialize to canonical framed format (header + content).
    pub fn serialize(&self) -> Vec<u8> {
        let hdr = header::Header::encode(self.obj_type, self.data.len());
        let mut out = Vec::with_capacity(hdr.len() + self.data.len());
        out.extend_from_slice(&hdr);
        out.extend_from_slice(&self.data);
        out
    }

    /// Compute the id by hashing the framed form.
    pub fn id(&self) -> Result<ObjectId, HashError> {
        Hasher::hash_object(self.obj_type.as_str(), &self.data)
    }

    /// Size of the content (excluding header).
    pub fn content_size(&self) -> usize {
        self.data.len()
    }
}
