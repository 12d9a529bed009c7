//! RingCentral REST client for the compliance export endpoints
//!
//! Implements [`ComplianceExportApi`] on top of `reqwest`. The create and
//! status calls carry a bearer token; the content download does not. The
//! token travels as an `access_token` query parameter on the content URL
//! instead, the way the vendor's own SDK builds download links.

use super::api::ComplianceExportApi;
use super::auth::PasswordGrantAuth;
use super::models::{ApiErrorResponse, CreateExportRequest, ExportTaskResponse};
use crate::config::PlatformConfig;
use crate::domain::{ExportTask, GlipError, PlatformError, Result, TaskId};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

/// Path of the export-create endpoint; the status endpoint appends `/{taskId}`
pub const DATA_EXPORT_PATH: &str = "/restapi/v1.0/glip/data-export";

/// Prefix added to relative URIs that don't name an API family themselves
const API_PREFIX: &str = "/restapi/v1.0";

/// Relative URI prefixes that already name an API family
const KNOWN_PREFIXES: [&str; 3] = ["/restapi", "/media", "/scim"];

/// Platform REST client
///
/// # Example
///
/// ```no_run
/// use glip_export::adapters::platform::PlatformClient;
/// use glip_export::config::PlatformConfig;
///
/// # async fn example() -> glip_export::domain::Result<()> {
/// let client = PlatformClient::connect(PlatformConfig::default()).await?;
/// println!("connected to {}", client.base_url());
/// # Ok(())
/// # }
/// ```
pub struct PlatformClient {
    server_url: String,
    client: Client,
    auth: PasswordGrantAuth,
}

impl PlatformClient {
    /// Create a client without contacting the server
    ///
    /// # Errors
    ///
    /// Returns [`GlipError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: PlatformConfig) -> Result<Self> {
        let server_url = config.server_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            tracing::warn!(
                server_url = %server_url,
                "TLS certificate verification is DISABLED. Only use this against test servers."
            );
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            GlipError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        let auth = PasswordGrantAuth::new(client.clone(), config);

        Ok(Self {
            server_url,
            client,
            auth,
        })
    }

    /// Create a client and authenticate immediately
    ///
    /// # Errors
    ///
    /// Returns an authentication or connection error if the password grant
    /// fails.
    pub async fn connect(config: PlatformConfig) -> Result<Self> {
        let client = Self::new(config)?;
        client.auth.authenticate().await?;
        tracing::info!(server_url = %client.server_url, "Authenticated against platform");
        Ok(client)
    }

    /// Base URL of the platform server
    pub fn base_url(&self) -> &str {
        &self.server_url
    }

    /// Whether a non-expired access token is cached
    pub async fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated().await
    }

    fn task_url(&self, task_id: &TaskId) -> String {
        format!("{}{}/{}", self.server_url, DATA_EXPORT_PATH, task_id)
    }

    async fn bearer(&self) -> Result<String> {
        let token = self.auth.access_token().await?;
        Ok(format!("Bearer {}", token.expose_secret().as_str()))
    }

    async fn parse_task(response: Response) -> Result<ExportTask> {
        let body: ExportTaskResponse = response.json().await.map_err(|e| {
            GlipError::Platform(PlatformError::InvalidResponse(format!(
                "Failed to parse export task: {e}"
            )))
        })?;
        body.to_domain()
    }
}

/// Turn a non-success response into a platform error
async fn error_for_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = ApiErrorResponse::describe(&body);
    Err(GlipError::Platform(PlatformError::from_status(
        status.as_u16(),
        message,
    )))
}

/// Resolve a dataset URI into a fully qualified download URL
///
/// - absolute `http(s)://` URIs are kept as they are
/// - relative URIs are joined to the server URL, with `/restapi/v1.0` in
///   front unless they already start with a known API prefix
/// - `access_token` is appended as a query parameter
///
/// # Examples
///
/// ```
/// use glip_export::adapters::platform::client::resolve_content_url;
///
/// let url = resolve_content_url(
///     "https://platform.ringcentral.com",
///     "/glip/data-export/t-1/datasets/1",
///     "tok",
/// ).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://platform.ringcentral.com/restapi/v1.0/glip/data-export/t-1/datasets/1?access_token=tok"
/// );
/// ```
pub fn resolve_content_url(server_url: &str, content_uri: &str, access_token: &str) -> Result<Url> {
    let content_uri = content_uri.trim();
    let has_scheme = content_uri.starts_with("http://") || content_uri.starts_with("https://");

    let full = if has_scheme {
        content_uri.to_string()
    } else {
        let path = if content_uri.starts_with('/') {
            content_uri.to_string()
        } else {
            format!("/{content_uri}")
        };
        let prefix = if KNOWN_PREFIXES.iter().any(|p| path.starts_with(p)) {
            ""
        } else {
            API_PREFIX
        };
        format!("{}{prefix}{path}", server_url.trim_end_matches('/'))
    };

    let mut url = Url::parse(&full).map_err(|e| {
        GlipError::Download(format!("Invalid content URI '{content_uri}': {e}"))
    })?;
    url.query_pairs_mut().append_pair("access_token", access_token);
    Ok(url)
}

#[async_trait]
impl ComplianceExportApi for PlatformClient {
    async fn create_export_task(&self, request: &CreateExportRequest) -> Result<ExportTask> {
        let url = format!("{}{}", self.server_url, DATA_EXPORT_PATH);

        tracing::debug!(
            url = %url,
            time_from = %request.time_from,
            time_to = %request.time_to,
            contacts = request.contacts.len(),
            chat_ids = request.chat_ids.len(),
            "Creating export task"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer().await?)
            .json(request)
            .send()
            .await
            .map_err(PlatformError::from)?;

        Self::parse_task(error_for_status(response).await?).await
    }

    async fn get_export_task(&self, task_id: &TaskId) -> Result<ExportTask> {
        let url = self.task_url(task_id);

        tracing::debug!(url = %url, task_id = %task_id, "Fetching export task status");

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.bearer().await?)
            .send()
            .await
            .map_err(PlatformError::from)?;

        let response = error_for_status(response).await.map_err(|e| match e {
            GlipError::Platform(PlatformError::TaskNotFound(msg)) => GlipError::Platform(
                PlatformError::TaskNotFound(format!("{task_id}: {msg}")),
            ),
            other => other,
        })?;

        Self::parse_task(response).await
    }

    async fn fetch_content(&self, content_uri: &str) -> Result<Vec<u8>> {
        let token = self.auth.access_token().await?;
        let url = resolve_content_url(&self.server_url, content_uri, token.expose_secret().as_str())?;

        // The query string carries the token; never log it.
        tracing::debug!(
            host = url.host_str().unwrap_or_default(),
            path = url.path(),
            "Downloading dataset content"
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(PlatformError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GlipError::Download(format!(
                "content endpoint returned {status}: {}",
                ApiErrorResponse::describe(&body)
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GlipError::Download(format!("Failed to read content body: {e}")))?;

        Ok(bytes.to_vec())
    }

    fn server_url(&self) -> &str {
        &self.server_url
    }
}
