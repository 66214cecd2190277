//! REST API client for the apilink `/api/v0` endpoints.
//!
//! Every enveloped operation reads the response body, decodes the
//! [`Envelope`], and turns a non-`ok` status into [`ApiError::Rejected`].
//! The backend ships rejection envelopes under assorted HTTP status codes,
//! so the envelope — not the status code — is what decides success. Payload
//! decoding fails closed: a schema mismatch is an error, never a partially
//! populated record.

use std::time::Duration;

use serde::Deserialize;

use vulink_core::types::{Image, Link, LinkRecord};
use vulink_core::validate::{self, ValidationError, NAME_MIN_LEN};

use crate::envelope::Envelope;

/// Default request timeout when none is configured.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default backend base URL for local development.
const DEFAULT_BASE_URL: &str = "http://localhost:5341";

/// Connection settings for a [`LinkApi`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `http://localhost:5341`.
    pub base_url: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build a config with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                 |
    /// |-----------------------|-------------------------|
    /// | `VULINK_API_URL`      | `http://localhost:5341` |
    /// | `VULINK_TIMEOUT_SECS` | `30`                    |
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("VULINK_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let timeout_secs: u64 = std::env::var("VULINK_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("VULINK_TIMEOUT_SECS must be a valid u64");

        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Errors from the apilink REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-`ok` envelope.
    #[error("backend rejected request (status `{status}`)")]
    Rejected {
        /// Envelope status value, e.g. `fail`.
        status: String,
        /// Backend-supplied reason, when present.
        message: Option<String>,
    },

    /// The HTTP request itself failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the JSON shape the operation expects.
    #[error("malformed response payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// A client-side rule rejected the input before any request was issued.
    #[error("invalid name: {0}")]
    InvalidName(#[from] ValidationError),
}

/// HTTP client for a single apilink backend.
pub struct LinkApi {
    client: reqwest::Client,
    base_url: String,
}

/// Payload of `link/read`.
#[derive(Debug, Deserialize)]
struct ReadLinkData {
    contents: String,
}

/// Payload of `image/list`: bare filenames.
#[derive(Debug, Deserialize)]
struct ImageListData {
    images: Vec<String>,
}

impl LinkApi {
    /// Create a new API client from connection settings.
    pub fn new(config: ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            base_url: config.base_url,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across consoles).
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Backend base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full link catalog as flat [`Link`] records.
    pub async fn list_links(&self) -> Result<Vec<Link>, ApiError> {
        let envelope = self.get_envelope("link/list", &[]).await?;
        let records: Vec<LinkRecord> = Self::payload(envelope)?;
        Ok(records.into_iter().map(Link::from).collect())
    }

    /// Fetch the image catalog.
    pub async fn list_images(&self) -> Result<Vec<Image>, ApiError> {
        let envelope = self.get_envelope("image/list", &[]).await?;
        let data: ImageListData = Self::payload(envelope)?;
        Ok(data.images.into_iter().map(Image::from_file).collect())
    }

    /// Read the raw textual definition of one link.
    ///
    /// `structured` requests the configuration-language representation
    /// (`type=toml`) instead of the link's native one.
    pub async fn read_link_content(
        &self,
        file: &str,
        structured: bool,
    ) -> Result<String, ApiError> {
        let mut query = vec![("link", file)];
        if structured {
            query.push(("type", "toml"));
        }

        let envelope = self.get_envelope("link/read", &query).await?;
        let data: ReadLinkData = Self::payload(envelope)?;
        Ok(data.contents)
    }

    /// Create a new link definition.
    pub async fn write_link(&self, file: &str, content: &str) -> Result<(), ApiError> {
        self.post_form("link/write", file, content).await
    }

    /// Overwrite an existing link definition.
    pub async fn update_link(&self, file: &str, content: &str) -> Result<(), ApiError> {
        self.post_form("link/update", file, content).await
    }

    /// Enable one link.
    pub async fn enable_link(&self, file: &str) -> Result<(), ApiError> {
        self.get_acknowledged("link/enable", &[("link", file)]).await
    }

    /// Disable one link.
    pub async fn disable_link(&self, file: &str) -> Result<(), ApiError> {
        self.get_acknowledged("link/disable", &[("link", file)]).await
    }

    /// Set a link's enabled flag.
    ///
    /// Enable and disable are two distinct backend endpoints, not one
    /// parameterized call; this dispatcher keeps that policy in one place.
    pub async fn set_link_enabled(&self, file: &str, enabled: bool) -> Result<(), ApiError> {
        if enabled {
            self.enable_link(file).await
        } else {
            self.disable_link(file).await
        }
    }

    /// Delete one link definition.
    pub async fn delete_link(&self, file: &str) -> Result<(), ApiError> {
        self.get_acknowledged("link/delete", &[("link", file)]).await
    }

    /// Instruct the backend to re-scan its link definitions from storage.
    pub async fn reload_links(&self) -> Result<(), ApiError> {
        self.get_acknowledged("link/reload", &[]).await
    }

    /// Delete one uploaded image.
    pub async fn delete_image(&self, file: &str) -> Result<(), ApiError> {
        self.get_acknowledged("image/delete", &[("file", file)]).await
    }

    /// Upload a PNG image under the given display name.
    ///
    /// The name is checked against the naming rules before any bytes are
    /// transmitted; an invalid name never reaches the network.
    pub async fn upload_image(&self, name: &str, file_bytes: Vec<u8>) -> Result<(), ApiError> {
        validate::validate_name(name, NAME_MIN_LEN, false)?;

        let part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(format!("{name}.png"))
            .mime_str("image/png")?;
        let form = reqwest::multipart::Form::new()
            .text("image_name", name.to_string())
            .part("image_file", part);

        let response = self
            .client
            .post(self.url("image/upload"))
            .multipart(form)
            .send()
            .await?;

        Self::parse_envelope(response).await.map(|_| ())
    }

    /// Fetch the raw bytes of an uploaded image.
    ///
    /// This endpoint serves the image directly, without the envelope.
    pub async fn fetch_image(&self, file: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(self.url("image/get"))
            .query(&[("file", file)])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}/api/v0/{path}", self.base_url)
    }

    /// GET an enveloped endpoint and return the decoded envelope.
    async fn get_envelope(&self, path: &str, query: &[(&str, &str)]) -> Result<Envelope, ApiError> {
        let response = self.client.get(self.url(path)).query(query).send().await?;
        Self::parse_envelope(response).await
    }

    /// GET an enveloped endpoint where only the acknowledgement matters.
    async fn get_acknowledged(&self, path: &str, query: &[(&str, &str)]) -> Result<(), ApiError> {
        self.get_envelope(path, query).await.map(|_| ())
    }

    /// POST a link filename/contents form to an enveloped endpoint.
    async fn post_form(&self, path: &str, file: &str, content: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .form(&[("link_filename", file), ("link_contents", content)])
            .send()
            .await?;

        Self::parse_envelope(response).await.map(|_| ())
    }

    /// Read a response body, decode the envelope, and reject non-`ok`
    /// statuses. The HTTP status code is deliberately ignored for enveloped
    /// endpoints; the backend encodes failure in the envelope.
    async fn parse_envelope(response: reqwest::Response) -> Result<Envelope, ApiError> {
        let body = response.text().await?;
        let envelope: Envelope = serde_json::from_str(&body)?;

        if !envelope.is_ok() {
            return Err(ApiError::Rejected {
                status: envelope.status,
                message: envelope.message,
            });
        }

        Ok(envelope)
    }

    /// Decode an envelope's `data` payload into the expected type.
    fn payload<T: serde::de::DeserializeOwned>(envelope: Envelope) -> Result<T, ApiError> {
        let data = envelope.data.unwrap_or(serde_json::Value::Null);
        Ok(serde_json::from_value(data)?)
    }
}
