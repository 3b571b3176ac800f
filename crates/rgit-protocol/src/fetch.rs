//! Fetch negotiation: discover refs, then request a pack.

use rgit_hash::ObjectId;

use crate::http::HttpClient;
use crate::pktline::PktLineWriter;
use crate::refs::{parse_advertisement, RemoteRef};
use crate::ProtocolError;

/// The acknowledgment line a server sends before the pack payload when
/// no common objects were negotiated.
const NAK_LINE: &[u8] = b"0008NAK\n";

/// Discover the references a remote advertises.
pub fn discover_refs(client: &HttpClient) -> Result<Vec<RemoteRef>, ProtocolError> {
    let body = client.info_refs()?;
    parse_advertisement(&body)
}

/// Build the upload-pack request body: one `want` line per id, a flush,
/// and a `done` line.
pub fn build_fetch_request(wants: &[ObjectId]) -> Result<Vec<u8>, ProtocolError> {
    let mut writer = PktLineWriter::new(Vec::new());
    for oid in wants {
        writer.write_text(&format!("want {}", oid))?;
    }
    writer.write_flush()?;
    writer.write_text("done")?;
    Ok(writer.into_inner())
}

/// Negotiate a pack for the wanted ids and return its raw bytes.
///
/// With no `have` lines in the request the server always answers `NAK`
/// followed by the pack; any other prefix means it is not speaking the
/// protocol we expect.
pub fn request_pack(client: &HttpClient, wants: &[ObjectId]) -> Result<Vec<u8>, ProtocolError> {
    let request = build_fetch_request(wants)?;
    let response = client.upload_pack(request)?;

    if !response.starts_with(NAK_LINE) {
        let prefix_len = response.len().min(NAK_LINE.len());
        return Err(ProtocolError::UnexpectedResponse(format!(
            "expected NAK, got {:?}",
            String::from_utf8_lossy(&response[..prefix_len])
        )));
    }

    Ok(response[NAK_LINE.len()..].to_vec())
}
