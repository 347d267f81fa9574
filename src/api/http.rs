//! Request dispatch for VictoriaMetrics Cloud API calls
//!
//! One routine serves every endpoint: it joins the path onto the base URL,
//! attaches the API key, sends the request, classifies the status and hands a
//! non-empty success body to the decode function chosen by the caller.

use super::client::Client;
use crate::error::{Error, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

/// Header carrying the API key on every request
pub const ACCESS_TOKEN_HEADER: &str = "X-VM-Cloud-Access";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and drops control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = match body.char_indices().nth(MAX_LOG_BODY_LENGTH) {
        Some((cut, _)) => format!("{}... [truncated, {} bytes total]", &body[..cut], body.len()),
        None => body.to_string(),
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Request payload
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Serialized JSON, sent with `Content-Type: application/json`
    Json(Vec<u8>),
    /// Raw text sent as-is (rule file contents)
    Text(String),
}

impl RequestBody {
    /// Serialize `value` as a JSON body; `what` names the payload in errors
    pub fn json<T: Serialize>(value: &T, what: &'static str) -> Result<Self> {
        serde_json::to_vec(value)
            .map(Self::Json)
            .map_err(|source| Error::Encode { what, source })
    }
}

/// Parse the body as JSON into `T`
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(Error::Decode)
}

/// Return the body verbatim as text; invalid UTF-8 is an error, never
/// replaced
pub fn decode_text(body: &[u8]) -> Result<String> {
    String::from_utf8(body.to_vec()).map_err(Error::InvalidText)
}

/// Ignore the body
pub fn discard(_body: &[u8]) -> Result<()> {
    Ok(())
}

impl Client {
    /// Build the absolute URL for `path`, escaping each segment on its own.
    ///
    /// `.` and `..` are rejected: the URL parser would drop them and the
    /// request would reach a different resource.
    pub fn endpoint(&self, path: &[&str]) -> Result<Url> {
        if let Some(segment) = path.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(Error::invalid_argument(format!(
                "invalid path segment: {:?}",
                segment
            )));
        }

        let mut url = self.parsed_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl {
                url: self.base_url.clone(),
                reason: "cannot be a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    /// Execute one API call.
    ///
    /// Non-2xx responses fail with [`Error::UnexpectedStatus`] carrying the
    /// raw body. A successful empty body yields `T::default()` without calling
    /// `decode`. Transport failures are returned as-is, never retried.
    pub async fn execute<T, D>(
        &self,
        method: Method,
        body: Option<RequestBody>,
        path: &[&str],
        decode: D,
    ) -> Result<T>
    where
        T: Default,
        D: FnOnce(&[u8]) -> Result<T>,
    {
        let url = self.endpoint(path)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, url)
            .header(ACCESS_TOKEN_HEADER, &self.api_key);

        request = match body {
            Some(RequestBody::Json(bytes)) => request
                .header(CONTENT_TYPE, "application/json")
                .body(bytes),
            Some(RequestBody::Text(text)) => request.body(text),
            None => request,
        };

        let response = request.send().await.map_err(|source| Error::Transport {
            context: "failed to send request",
            source,
        })?;

        // Reading consumes the response, so the connection is released on
        // every path below
        let status = response.status();
        let bytes = response.bytes().await.map_err(|source| Error::Transport {
            context: "failed to read response body",
            source,
        })?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        if bytes.is_empty() {
            return Ok(T::default());
        }

        decode(&bytes)
    }
}
