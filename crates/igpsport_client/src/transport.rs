//! Request headers and response body decoding.
//!
//! reqwest is built without its own decompression features, so the
//! `Content-Encoding` header of every response reaches [`decode_body`]
//! untouched. Only gzip and brotli are unwrapped; any other encoding is
//! passed through as raw bytes.

use crate::{IgpsportError, TransportError};
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use std::io::Read;

/// Encodings advertised to the service. Limited to the ones
/// [`decode_body`] can undo.
pub const ACCEPT_ENCODING: &str = "gzip, br";

const SERVICE_HEADERS: &[(&str, &str)] = &[
    ("accept", "application/json, text/plain, */*"),
    ("accept-language", "zh-Hans"),
    ("cache-control", "no-cache"),
    ("dnt", "1"),
    ("hasloading", "true"),
    ("origin", "https://app.zh.igpsport.com"),
    ("pragma", "no-cache"),
    ("qiwu-app-version", "1.0.0"),
    ("referer", "https://app.zh.igpsport.com/"),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-site"),
    ("timezone", "Asia/Shanghai"),
    (
        "user-agent",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36",
    ),
];

/// Fixed header set sent on every authenticated API call. The token is sent
/// verbatim in `Authorization` and marked sensitive.
pub fn service_headers(auth_token: &SecretString) -> Result<HeaderMap, IgpsportError> {
    let mut headers = HeaderMap::with_capacity(SERVICE_HEADERS.len() + 2);
    for &(name, value) in SERVICE_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers.insert(
        header::ACCEPT_ENCODING,
        HeaderValue::from_static(ACCEPT_ENCODING),
    );
    let mut auth = HeaderValue::from_str(auth_token.expose_secret())
        .map_err(|_| IgpsportError::Config("auth token is not a valid header value".into()))?;
    auth.set_sensitive(true);
    headers.insert(header::AUTHORIZATION, auth);
    Ok(headers)
}

/// Undo the response `Content-Encoding`.
pub fn decode_body(content_encoding: Option<&str>, raw: Bytes) -> Result<Bytes, TransportError> {
    let encoding = content_encoding.map(str::trim).unwrap_or_default();
    if encoding.eq_ignore_ascii_case("gzip") {
        let mut out = Vec::with_capacity(raw.len() * 4);
        flate2::read::GzDecoder::new(raw.as_ref())
            .read_to_end(&mut out)
            .map_err(|source| TransportError::Decompress {
                encoding: "gzip",
                source,
            })?;
        Ok(Bytes::from(out))
    } else if encoding.eq_ignore_ascii_case("br") {
        let mut out = Vec::with_capacity(raw.len() * 4);
        brotli::Decompressor::new(raw.as_ref(), 4096)
            .read_to_end(&mut out)
            .map_err(|source| TransportError::Decompress {
                encoding: "br",
                source,
            })?;
        Ok(Bytes::from(out))
    } else {
        Ok(raw)
    }
}

/// [`TransportError::Status`] carrying the first 256 characters of `body`.
pub fn status_error(status: StatusCode, body: &[u8]) -> TransportError {
    TransportError::Status {
        status: status.as_u16(),
        body: String::from_utf8_lossy(body).chars().take(256).collect(),
    }
}

/// Read a response to completion and decode it without judging the status.
///
/// An error body that fails to decode is returned raw so the status still
/// reaches the caller.
pub async fn read_response(resp: reqwest::Response) -> Result<(StatusCode, Bytes), TransportError> {
    let status = resp.status();
    let encoding = resp
        .headers()
        .get(header::CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let raw = resp.bytes().await?;
    match decode_body(encoding.as_deref(), raw.clone()) {
        Ok(body) => Ok((status, body)),
        Err(_) if !status.is_success() => Ok((status, raw)),
        Err(err) => Err(err),
    }
}

/// Read a response to completion: non-success statuses become
/// [`TransportError::Status`], successful bodies are decoded.
pub async fn read_body(resp: reqwest::Response) -> Result<Bytes, TransportError> {
    let (status, body) = read_response(resp).await?;
    if !status.is_success() {
        return Err(status_error(status, &body));
    }
    Ok(body)
}
