//! Reference advertisement parsing.
//!
//! The `info/refs` response body is pkt-line framed: a service
//! announcement line, a flush, then one `<40-hex> <refname>` line per
//! advertised ref (the first carries capabilities after a NUL), then a
//! terminating flush.

use bstr::BString;
use rgit_hash::ObjectId;

use crate::pktline::{PktLine, PktLineReader};
use crate::ProtocolError;

/// The service this client speaks.
pub const UPLOAD_PACK_SERVICE: &str = "git-upload-pack";

/// A reference advertised by a remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    pub oid: ObjectId,
    pub name: BString,
}

/// Parse a full `info/refs` advertisement body.
///
/// An advertisement with no ref lines (an empty remote repository)
/// yields an empty list.
pub fn parse_advertisement(body: &[u8]) -> Result<Vec<RemoteRef>, ProtocolError> {
    let mut reader = PktLineReader::new(body);

    // The first line announces the service.
    let first = match reader.read_pkt()? {
        PktLine::Data(data) => data,
        PktLine::Flush => {
            return Err(ProtocolError::Violation(
                "advertisement starts with a flush packet".into(),
            ));
        }
    };
    check_service_line(strip_newline(&first))?;

    let mut refs = Vec::new();
    let mut past_announcement_flush = false;
    let mut first_ref_line = true;

    loop {
        match reader.read_pkt()? {
            PktLine::Flush => {
                // The announcement section ends with its own flush before
                // the ref list begins.
                if past_announcement_flush {
                    break;
                }
                past_announcement_flush = true;
            }
            PktLine::Data(data) => {
                let mut line = strip_newline(&data);

                if first_ref_line {
                    first_ref_line = false;
                    // Capabilities trail the first ref line after a NUL.
                    if let Some(nul_pos) = line.iter().position(|&b| b == 0) {
                        line = &line[..nul_pos];
                    }
                }

                if let Some(remote_ref) = parse_ref_line(line)? {
                    refs.push(remote_ref);
                }
            }
        }
    }

    Ok(refs)
}

/// Validate the `# service=...` announcement line.
fn check_service_line(line: &[u8]) -> Result<(), ProtocolError> {
    if !line.starts_with(b"#") {
        return Err(ProtocolError::Violation(format!(
            "malformed service announcement: {}",
            String::from_utf8_lossy(line)
        )));
    }

    let expected = format!("# service={}", UPLOAD_PACK_SERVICE);
    if line != expected.as_bytes() {
        return Err(ProtocolError::Violation(format!(
            "remote advertises wrong service: {}",
            String::from_utf8_lossy(line)
        )));
    }

    Ok(())
}

/// Parse a single ref line: `<40-hex-oid> <refname>`.
///
/// Returns `None` for the capabilities placeholder an empty repository
/// advertises (`<zero-id> capabilities^{}`).
fn parse_ref_line(line: &[u8]) -> Result<Option<RemoteRef>, ProtocolError> {
    if line.is_empty() {
        return Ok(None);
    }

    let space_pos = line.iter().position(|&b| b == b' ').ok_or_else(|| {
        ProtocolError::Violation(format!(
            "invalid ref line (no space): {}",
            String::from_utf8_lossy(line)
        ))
    })?;

    let oid_hex = &line[..space_pos];
    let refname = &line[space_pos + 1..];

    let oid_str = std::str::from_utf8(oid_hex)
        .map_err(|_| ProtocolError::Violation("invalid UTF-8 in advertised id".into()))?;

    let oid = ObjectId::from_hex(oid_str).map_err(|e| {
        ProtocolError::Violation(format!("invalid id in ref advertisement: {}", e))
    })?;

    if oid.is_null() && refname == b"capabilities^{}" {
        return Ok(None);
    }

    Ok(Some(RemoteRef {
        oid,
        name: BString::from(refname),
    }))
}

/// Trim one trailing newline; pkt-line text lines conventionally end
/// with one.
fn strip_newline(data: &[u8]) -> &[u8] {
    data.strip_suffix(b"\n").unwrap_or(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pktline::PktLineWriter;

    const HEAD_OID: &str = "3b18e512dba79e4c8300dd08aeb37f8e728b8dad";
    const MAIN_OID: &str = "93b493a513c90360929bce2e862e285767d627f7";

    fn advertisement(ref_lines: &[&str]) -> Vec<u8> {
        let mut writer = PktLineWriter::new(Vec::new());
        writer.write_text("# service=git-upload-pack").unwrap();
        writer.write_flush().unwrap();
        for line in ref_lines {
            writer.write_text(line).unwrap();
        }
        writer.write_flush().unwrap();
        writer.into_inner()
    }

    #[test]
    fn parse_two_refs() {
        let caps_line = format!("{HEAD_OID} HEAD\0multi_ack side-band-64k");
        let main_line = format!("{MAIN_OID} refs/heads/main");
        let body = advertisement(&[&caps_line, &main_line]);

        let refs = parse_advertisement(&body).unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].oid.to_hex(), HEAD_OID);
        assert_eq!(refs[0].name, "HEAD");
        assert_eq!(refs[1].oid.to_hex(), MAIN_OID);
        assert_eq!(refs[1].name, "refs/heads/main");
    }

    #[test]
    fn capabilities_only_stripped_from_first_line() {
        let first = format!("{HEAD_OID} HEAD\0agent=git/2.40");
        let second = format!("{MAIN_OID} refs/heads/main");
        let body = advertisement(&[&first, &second]);

        let refs = parse_advertisement(&body).unwrap();
        assert_eq!(refs[0].name, "HEAD");
        assert_eq!(refs[1].name, "refs/heads/main");
    }

    #[test]
    fn empty_repository_yields_no_refs() {
        let line = format!("{} capabilities^{{}}\0multi_ack", "0".repeat(40));
        let body = advertisement(&[&line]);
        assert!(parse_advertisement(&body).unwrap().is_empty());
    }

    #[test]
    fn no_ref_lines_at_all() {
        let body = advertisement(&[]);
        assert!(parse_advertisement(&body).unwrap().is_empty());
    }

    #[test]
    fn rejects_wrong_service() {
        let mut writer = PktLineWriter::new(Vec::new());
        writer.write_text("# service=git-receive-pack").unwrap();
        writer.write_flush().unwrap();
        writer.write_flush().unwrap();

        let err = parse_advertisement(&writer.into_inner()).unwrap_err();
        assert!(matches!(err, ProtocolError::Violation(_)));
    }

    #[test]
    fn rejects_missing_announcement() {
        let mut writer = PktLineWriter::new(Vec::new());
        writer
            .write_text(&format!("{MAIN_OID} refs/heads/main"))
            .unwrap();
        writer.write_flush().unwrap();
        writer.write_flush().unwrap();

        let err = parse_advertisement(&writer.into_inner()).unwrap_err();
        assert!(matches!(err, ProtocolError::Violation(_)));
    }

    #[test]
    fn rejects_bad_oid() {
        let body = advertisement(&["nothex refs/heads/main"]);
        let err = parse_advertisement(&body).unwrap_err();
        assert!(matches!(err, ProtocolError::Violation(_)));
    }

    #[test]
    fn rejects_truncated_body() {
        let mut body = advertisement(&[&format!("{MAIN_OID} refs/heads/main")]);
        body.truncate(body.len() - 6);
        assert!(parse_advertisement(&body).is_err());
    }
}
