use std::fs;
use std::io::Read;

use flate2::read::ZlibDecoder;
use rgit_hash::ObjectId;
use rgit_object::Object;

use crate::{ObjectStore, StoreError};

impl ObjectStore {
    /// Check if an object exists in the store.
    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).is_file()
    }

    /// Read an object by id.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` if the object exists but is corrupt.
    pub fn read(&self, oid: &ObjectId) -> Result<Option<Object>, StoreError> {
        match self.read_raw(oid)? {
            Some(framed) => Ok(Some(Object::parse(&framed)?)),
            None => Ok(None),
        }
    }

    /// Read the full framed bytes (`"<type> <size>\0<content>"`) of an
    /// object by id.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    pub fn read_raw(&self, oid: &ObjectId) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.object_path(oid);
        let compressed = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut decoder = ZlibDecoder::new(&compressed[..]);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| StoreError::Decompress {
                oid: oid.to_hex(),
                source: e,
            })?;

        Ok(Some(decompressed))
    }
}
