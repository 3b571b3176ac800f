use bstr::BString;
use rgit_hash::ObjectId;

use crate::signature::Signature;
use crate::ObjectError;

/// A git commit object.
///
/// Commits written by this implementation carry at most one parent and a
/// single author signature. Headers other than `tree`, `parent`, and
/// `author` (a committer line, a GPG signature) are skipped on parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Id of the root tree.
    pub tree: ObjectId,
    /// Parent commit id (None for a root commit).
    pub parent: Option<ObjectId>,
    /// Author identity and timestamp.
    pub author: Signature,
    /// Commit message, stored without the trailing newline.
    pub message: BString,
}

impl Commit {
    /// Parse commit content from raw bytes (no object header).
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut tree: Option<ObjectId> = None;
        let mut parent: Option<ObjectId> = None;
        let mut author: Option<Signature> = None;

        let mut pos = 0;
        let data = content;

        // Parse headers (lines before the blank line).
        loop {
            if pos >= data.len() {
                break;
            }

            // A blank line separates headers from message.
            if data[pos] == b'\n' {
                pos += 1;
                break;
            }

            let line_end = data[pos..]
                .iter()
                .position(|&b| b == b'\n')
                .map(|p| p + pos)
                .unwrap_or(data.len());

            let line = &data[pos..line_end];

            // Parse "key value" format.
            if let Some(space_pos) = line.iter().position(|&b| b == b' ') {
                let key = &line[..space_pos];
                let value = &line[space_pos + 1..];

                match key {
                    b"tree" => {
                        let hex = std::str::from_utf8(value)
                            .map_err(|_| ObjectError::InvalidHeader("non-UTF8 tree id".into()))?;
                        tree = Some(ObjectId::from_hex(hex)?);
                    }
                    b"parent" => {
                        if parent.is_some() {
                            return Err(ObjectError::InvalidHeader(
                                "more than one parent header".into(),
                            ));
                        }
                        let hex = std::str::from_utf8(value).map_err(|_| {
                            ObjectError::InvalidHeader("non-UTF8 parent id".into())
                        })?;
                        parent = Some(ObjectId::from_hex(hex)?);
                    }
                    b"author" => {
                        author = Some(Signature::parse(value.into())?);
                    }
                    _ => {
                        // Unknown header: skip it along with any continuation
                        // lines (multi-line values start with a space).
                        let mut next = line_end + 1;
                        while next < data.len() && data[next] == b' ' {
                            let cont_end = data[next..]
                                .iter()
                                .position(|&b| b == b'\n')
                                .map(|p| p + next)
                                .unwrap_or(data.len());
                            next = cont_end + 1;
                        }
                        pos = next;
                        continue;
                    }
                }
            }

            pos = line_end + 1;
        }

        let tree = tree.ok_or(ObjectError::MissingCommitField { field: "tree" })?;
        let author = author.ok_or(ObjectError::MissingCommitField { field: "author" })?;

        // Message, minus the trailing newline serialization adds.
        let message = &data[pos..];
        let message = message.strip_suffix(b"\n").unwrap_or(message);

        Ok(Self {
            tree,
            parent,
            author,
            message: BString::from(message),
        })
    }

    /// Serialize commit content to bytes (no object header).
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut out = Vec::new();

        out.extend_from_slice(b"tree ");
        out.extend_from_slice(self.tree.to_hex().as_bytes());
        out.push(b'\n');

        if let Some(ref parent) = self.parent {
            out.extend_from_slice(b"parent ");
            out.extend_from_slice(parent.to_hex().as_bytes());
            out.push(b'\n');
        }

        out.extend_from_slice(b"author ");
        out.extend_from_slice(&self.author.to_bytes());
        out.push(b'\n');

        // Blank line, then the message with its trailing newline.
        out.push(b'\n');
        out.extend_from_slice(&self.message);
        out.push(b'\n');

        out
    }

    /// Is this a root commit? (no parent)
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
