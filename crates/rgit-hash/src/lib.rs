//! Object identity and SHA-1 computation for the rgit implementation.
//!
//! Provides the `ObjectId` content address used as the key of every object
//! store and protocol exchange, plus hex encoding/decoding and a streaming
//! hasher.

mod error;
pub mod hasher;
pub mod hex;
mod oid;

pub use error::HashError;
pub use hasher::Hasher;
pub use oid::ObjectId;
