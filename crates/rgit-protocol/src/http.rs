use crate::ProtocolError;

/// The content type a smart server must use for the ref advertisement.
const ADVERTISEMENT_CONTENT_TYPE: &str = "application/x-git-upload-pack-advertisement";

/// Blocking HTTP client for the smart protocol endpoints of one remote.
#[derive(Debug)]
pub struct HttpClient {
    /// Repository base URL without a trailing slash.
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpClient {
    /// Create a client for the given repository URL.
    ///
    /// Only `http` and `https` URLs are supported; there is no dumb
    /// protocol or ssh fallback.
    pub fn new(url: &str) -> Result<Self, ProtocolError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ProtocolError::UnsupportedTransport(format!(
                "unsupported url scheme: {}",
                url
            )));
        }

        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        })
    }

    /// The repository base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the reference advertisement:
    /// `GET {base}/info/refs?service=git-upload-pack`.
    ///
    /// The response must carry status 200 or 304 and the exact smart
    /// advertisement content type, otherwise the remote is talking the
    /// dumb protocol (or is not a git server at all) and we bail.
    pub fn info_refs(&self) -> Result<Vec<u8>, ProtocolError> {
        let url = format!(
            "{}/info/refs?service={}",
            self.base_url,
            crate::refs::UPLOAD_PACK_SERVICE
        );
        let response = self.client.get(&url).send()?;

        let status = response.status().as_u16();
        if status != 200 && status != 304 {
            return Err(ProtocolError::UnsupportedTransport(format!(
                "info/refs returned HTTP {}",
                status
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !content_type.eq_ignore_ascii_case(ADVERTISEMENT_CONTENT_TYPE) {
            return Err(ProtocolError::UnsupportedTransport(format!(
                "smart protocol not supported: content type {:?}",
                content_type
            )));
        }

        Ok(response.bytes()?.to_vec())
    }

    /// Send a negotiation request: `POST {base}/git-upload-pack`.
    ///
    /// Returns the raw response body (NAK line plus pack payload).
    pub fn upload_pack(&self, request: Vec<u8>) -> Result<Vec<u8>, ProtocolError> {
        let url = format!("{}/{}", self.base_url, crate::refs::UPLOAD_PACK_SERVICE);
        let response = self
            .client
            .post(&url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-git-upload-pack-request",
            )
            .header(
                reqwest::header::ACCEPT,
                "application/x-git-upload-pack-result",
            )
            .body(request)
            .send()?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(ProtocolError::UnexpectedResponse(format!(
                "upload-pack returned HTTP {}",
                status
            )));
        }

        Ok(response.bytes()?.to_vec())
    }
}
