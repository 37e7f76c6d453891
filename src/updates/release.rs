//! Release metadata lookup and asset selection.
//!
//! Requests go through [`HttpTransport`] so the workflow can be driven
//! against a mock server or an in-memory fake.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

use super::error::UpdateError;
use super::version::VERSION;

/// Media type requested from the GitHub releases API.
pub const GITHUB_JSON: &str = "application/vnd.github+json";

/// Release information as published by GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Release tag (e.g. "v0.2.0").
    pub tag_name: String,

    /// Downloadable files, in the order the API lists them.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

impl Release {
    /// Tag with any leading `v` removed.
    pub fn version(&self) -> &str {
        self.tag_name.strip_prefix('v').unwrap_or(&self.tag_name)
    }
}

/// Status and body of a completed HTTP request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into [`UpdateError::HttpStatus`].
    pub fn error_for_status(self, url: &str) -> Result<Self, UpdateError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(UpdateError::HttpStatus {
                url: url.to_string(),
                status: self.status,
                body: String::from_utf8_lossy(&self.body).into_owned(),
            })
        }
    }
}

/// Performs blocking GET requests.
///
/// Implementations own any timeout or cancellation policy; a timeout is
/// reported as [`UpdateError::Network`] like any other transport failure.
pub trait HttpTransport {
    fn get(&self, url: &str, accept: Option<&str>) -> Result<HttpResponse, UpdateError>;
}

/// Production transport backed by a blocking reqwest client.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(format!("aw/{}", VERSION))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str, accept: Option<&str>) -> Result<HttpResponse, UpdateError> {
        let network = |e: reqwest::Error| UpdateError::Network {
            url: url.to_string(),
            source: Box::new(e),
        };

        let mut request = self.client.get(url);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        let response = request.send().map_err(network)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(network)?.to_vec();
        debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(HttpResponse { status, body })
    }
}

/// Fetch the latest release from the metadata endpoint.
pub fn fetch_latest_release(
    transport: &dyn HttpTransport,
    url: &str,
) -> Result<Release, UpdateError> {
    debug!("Fetching latest release from: {}", url);
    let response = transport.get(url, Some(GITHUB_JSON))?.error_for_status(url)?;
    let release: Release = serde_json::from_slice(&response.body)?;
    debug!(
        "Latest release {} with {} asset(s)",
        release.tag_name,
        release.assets.len()
    );
    Ok(release)
}

/// Archive name published for a platform, e.g. `aw_linux_amd64.tar.gz`.
pub fn asset_name(binary: &str, os: &str, arch: &str) -> String {
    format!("{}_{}_{}.tar.gz", binary, os, arch)
}

/// Find the download URL of the archive for `os`/`arch`.
///
/// Names must match exactly; the first match wins.
pub fn find_asset_url<'a>(
    release: &'a Release,
    binary: &str,
    os: &str,
    arch: &str,
) -> Result<&'a str, UpdateError> {
    let expected = asset_name(binary, os, arch);
    release
        .assets
        .iter()
        .find(|a| a.name == expected)
        .map(|a| a.browser_download_url.as_str())
        .ok_or_else(|| UpdateError::AssetNotFound {
            os: os.to_string(),
            arch: arch.to_string(),
        })
}

/// OS and architecture labels used in release asset names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Platform of the running binary.
    pub fn current() -> Self {
        Self::from_rust(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Translate Rust target names to the release naming scheme.
    pub fn from_rust(os: &str, arch: &str) -> Self {
        let os = match os {
            "macos" => "darwin",
            other => other,
        };
        let arch = match arch {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            "x86" => "386",
            other => other,
        };
        Self::new(os, arch)
    }
}
