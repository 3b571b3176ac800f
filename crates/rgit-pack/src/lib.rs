//! Packfile decoding and delta application.
//!
//! Packfiles are the wire format for fetch: a 12-byte header followed by
//! zlib-compressed object records. This crate decodes a whole pack linearly
//! in memory, collecting whole objects and ref-delta records for the caller
//! to resolve against its store.

pub mod delta;
pub mod entry;

mod decode;

pub use decode::{decode_pack, DecodedPack};

use rgit_hash::ObjectId;
use rgit_object::ObjectType;

/// Errors that can occur while decoding a pack.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("invalid pack header: {0}")]
    InvalidHeader(String),

    #[error("unsupported pack version: {0}")]
    UnsupportedVersion(u32),

    #[error("invalid object type {code} at offset {offset}")]
    InvalidType { code: u8, offset: u64 },

    #[error("unsupported object type {code} at offset {offset}")]
    UnsupportedType { code: u8, offset: u64 },

    #[error("size mismatch at offset {offset}: header declares {expected} bytes, inflated {actual}")]
    SizeMismatch {
        offset: u64,
        expected: usize,
        actual: usize,
    },

    #[error("invalid delta at offset {offset}: {reason}")]
    InvalidDelta { offset: u64, reason: String },

    #[error("corrupt pack entry at offset {0}")]
    CorruptEntry(u64),
}

/// Type of a packed object entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackEntryType {
    Commit,
    Tree,
    Blob,
    Tag,
    /// Delta referencing its base by id.
    RefDelta { base: ObjectId },
}

/// A whole object read from a pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedObject {
    pub obj_type: ObjectType,
    pub data: Vec<u8>,
}

/// A ref-delta record awaiting application against its base object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelta {
    /// Id of the base object the delta applies to.
    pub base: ObjectId,
    /// Raw delta instruction stream.
    pub data: Vec<u8>,
}

/// Pack format constants.
pub const PACK_SIGNATURE: &[u8; 4] = b"PACK";
pub const PACK_VERSION: u32 = 2;
pub const PACK_HEADER_SIZE: usize = 12;
