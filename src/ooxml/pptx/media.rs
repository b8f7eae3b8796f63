//! Image sources and their resolution to bytes.
//!
//! Slides only record *where* an image comes from. The bytes are fetched
//! once, at export, through a [`MediaResolver`].

use crate::common::error::{Error, Result};
use crate::ooxml::opc::constants::content_type;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::future::Future;
use std::path::PathBuf;

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A local file
    Path(PathBuf),
    /// A remote resource (needs the `remote-media` feature)
    Url(String),
    /// Inline base64: `mime;base64,DATA`, `base64,DATA` or bare `DATA`
    Data(String),
}

impl MediaSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    pub fn data(data: impl Into<String>) -> Self {
        Self::Data(data.into())
    }

    /// Human-readable location used in error messages.
    pub fn location(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
            Self::Data(_) => "inline data".to_string(),
        }
    }

    /// File extension for the stored media part.
    ///
    /// Falls back to `png` when the source says nothing usable.
    pub fn extension(&self) -> String {
        let ext = match self {
            Self::Path(path) => path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase),
            Self::Url(url) => {
                let path = url.split(['?', '#']).next().unwrap_or("");
                let name = path.rsplit('/').next().unwrap_or("");
                name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase())
            },
            Self::Data(data) => split_data_header(data)
                .0
                .and_then(|mime| mime.strip_prefix("image/"))
                .map(|sub| match sub {
                    "svg+xml" => "svg".to_string(),
                    "jpeg" => "jpg".to_string(),
                    other => other.to_ascii_lowercase(),
                }),
        };

        match ext {
            Some(ext) if content_type::for_image_extension(&ext).is_some() => ext,
            _ => "png".to_string(),
        }
    }

    /// Content type of the stored media part.
    pub fn content_type(&self) -> &'static str {
        content_type::for_image_extension(&self.extension()).unwrap_or(content_type::PNG)
    }
}

/// Split an inline payload into its optional MIME type and the base64 body.
fn split_data_header(data: &str) -> (Option<&str>, &str) {
    let data = data.strip_prefix("data:").unwrap_or(data);
    match data.split_once(',') {
        Some((header, body)) => {
            let mime = header
                .split(';')
                .next()
                .filter(|m| !m.is_empty() && *m != "base64");
            (mime, body)
        },
        None => (None, data),
    }
}

/// Decode an inline base64 payload.
pub fn decode_inline(data: &str) -> Result<Vec<u8>> {
    let (_, body) = split_data_header(data);
    let body: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(STANDARD.decode(body)?)
}

/// Turns a [`MediaSource`] into bytes during export.
pub trait MediaResolver {
    fn resolve(&self, source: &MediaSource) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Reads paths with `tokio::fs`, decodes inline data, and fetches URLs with
/// `reqwest` when the `remote-media` feature is on.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMediaResolver;

impl MediaResolver for DefaultMediaResolver {
    fn resolve(&self, source: &MediaSource) -> impl Future<Output = Result<Vec<u8>>> + Send {
        async move {
            let bytes = match source {
                MediaSource::Path(path) => {
                    tokio::fs::read(path)
                        .await
                        .map_err(|e| Error::MediaResolution {
                            location: path.display().to_string(),
                            reason: e.to_string(),
                        })?
                },
                MediaSource::Url(url) => fetch_url(url).await?,
                MediaSource::Data(data) => decode_inline(data)?,
            };
            log::trace!(bytes = bytes.len(); "Resolved media {}", source.location());
            Ok(bytes)
        }
    }
}

#[cfg(feature = "remote-media")]
async fn fetch_url(url: &str) -> Result<Vec<u8>> {
    let failure = |e: reqwest::Error| Error::MediaResolution {
        location: url.to_string(),
        reason: e.to_string(),
    };
    let response = reqwest::get(url)
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(failure)?;
    let body = response.bytes().await.map_err(failure)?;
    Ok(body.to_vec())
}

#[cfg(not(feature = "remote-media"))]
async fn fetch_url(url: &str) -> Result<Vec<u8>> {
    Err(Error::MediaResolution {
        location: url.to_string(),
        reason: "remote media requires the `remote-media` feature".to_string(),
    })
}
