//! The framing prefix every stored object carries: `"<type> <size>\0"`.

use crate::{ObjectError, ObjectType};

/// A decoded framing prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub obj_type: ObjectType,
    /// Declared content length in bytes.
    pub content_size: usize,
    /// Bytes the prefix occupies, null terminator included.
    pub len: usize,
}

impl Header {
    /// Decode the prefix at the start of framed object bytes.
    pub fn parse(data: &[u8]) -> Result<Self, ObjectError> {
        let null_pos = data
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| ObjectError::InvalidHeader("missing null terminator".into()))?;

        let mut fields = data[..null_pos].splitn(2, |&b| b == b' ');
        let type_bytes = fields.next().unwrap_or_default();
        let size_bytes = fields
            .next()
            .ok_or_else(|| ObjectError::InvalidHeader("missing space in header".into()))?;

        let obj_type = ObjectType::from_bytes(type_bytes)?;
        let content_size: usize = std::str::from_utf8(size_bytes)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                ObjectError::InvalidHeader(format!(
                    "invalid size: {}",
                    String::from_utf8_lossy(size_bytes)
                ))
            })?;

        Ok(Self {
            obj_type,
            content_size,
            len: null_pos + 1,
        })
    }

    /// Render the prefix for an object of the given type and content size.
    pub fn encode(obj_type: ObjectType, content_size: usize) -> Vec<u8> {
        format!("{obj_type} {content_size}\0").into_bytes()
    }
}
