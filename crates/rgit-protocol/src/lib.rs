//! Smart HTTP protocol client.
//!
//! Implements the fetch side of the git smart protocol over HTTP:
//! pkt-line framing, the `info/refs` reference advertisement, and the
//! `upload-pack` want/done negotiation that yields a pack payload.

pub mod fetch;
pub mod pktline;
pub mod refs;

mod http;

pub use http::HttpClient;
pub use refs::RemoteRef;

/// Errors that can occur during protocol operations.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid pkt-line: {0}")]
    InvalidPktLine(String),

    #[error("protocol violation: {0}")]
    Violation(String),

    #[error("unsupported transport: {0}")]
    UnsupportedTransport(String),

    #[error("unexpected server response: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
