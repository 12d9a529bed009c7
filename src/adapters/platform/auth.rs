//! OAuth 2.0 password-grant authentication
//!
//! The platform issues short-lived bearer tokens from
//! `POST /restapi/oauth/token`. The app identifies itself with HTTP Basic
//! credentials (`client_id:client_secret`) and the user with the
//! resource-owner password grant (`username`, optional `extension`,
//! `password`).
//!
//! Tokens are cached in memory behind a mutex. An expired token is refreshed
//! with the refresh token when one was issued, otherwise a new password grant
//! is performed.

use super::models::{ApiErrorResponse, TokenResponse};
use crate::config::{secret_string, PlatformConfig, SecretString};
use crate::domain::{GlipError, PlatformError, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use tokio::sync::Mutex;

/// Path of the token endpoint, relative to the server URL
pub const TOKEN_PATH: &str = "/restapi/oauth/token";

/// Tokens are treated as expired this many seconds before their real expiry
const EXPIRY_SKEW_SECONDS: i64 = 60;

/// Cached token state
#[derive(Default)]
struct TokenState {
    access_token: Option<SecretString>,
    refresh_token: Option<SecretString>,
    token_expiry: Option<DateTime<Utc>>,
}

impl TokenState {
    fn valid_token(&self, now: DateTime<Utc>) -> Option<SecretString> {
        match (&self.access_token, self.token_expiry) {
            (Some(token), Some(expiry)) if now < expiry => Some(token.clone()),
            _ => None,
        }
    }
}

/// Form body for the password grant
#[derive(Serialize)]
struct PasswordGrantRequest<'a> {
    grant_type: &'static str,
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    extension: Option<&'a str>,
    password: &'a str,
}

/// Form body for the refresh grant
#[derive(Serialize)]
struct RefreshGrantRequest<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
}

/// Password-grant authenticator with an in-memory token cache
pub struct PasswordGrantAuth {
    token_url: String,
    client: Client,
    config: PlatformConfig,
    state: Mutex<TokenState>,
}

impl PasswordGrantAuth {
    /// Create an authenticator; no request is made until a token is needed
    pub fn new(client: Client, config: PlatformConfig) -> Self {
        let token_url = format!("{}{}", config.server_url.trim_end_matches('/'), TOKEN_PATH);
        Self {
            token_url,
            client,
            config,
            state: Mutex::new(TokenState::default()),
        }
    }

    /// Return a valid access token, acquiring or refreshing one if needed
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::AuthenticationFailed`] if the platform rejects
    /// the credentials, or a connection error if it cannot be reached.
    pub async fn access_token(&self) -> Result<SecretString> {
        let mut state = self.state.lock().await;
        if let Some(token) = state.valid_token(Utc::now()) {
            return Ok(token);
        }

        let refresh_token = state.refresh_token.take();
        let response = match refresh_token {
            Some(refresh) => match self.refresh_grant(&refresh).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(error = %e, "Token refresh failed, falling back to password grant");
                    self.password_grant().await?
                }
            },
            None => self.password_grant().await?,
        };

        let token_expiry = token_expiry(Utc::now(), response.expires_in)?;
        let access_token = secret_string(response.access_token);

        state.access_token = Some(access_token.clone());
        state.refresh_token = response.refresh_token.map(secret_string);
        state.token_expiry = Some(token_expiry);

        tracing::info!(
            expires_at = %token_expiry,
            has_refresh_token = state.refresh_token.is_some(),
            "Acquired platform access token"
        );

        Ok(access_token)
    }

    /// Authenticate eagerly so bad credentials fail before any export work
    pub async fn authenticate(&self) -> Result<()> {
        self.access_token().await.map(|_| ())
    }

    /// Whether a non-expired token is cached
    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.valid_token(Utc::now()).is_some()
    }

    fn basic_auth_header(&self) -> String {
        let credentials = format!(
            "{}:{}",
            self.config.client_id,
            self.config.client_secret.expose_secret().as_str()
        );
        format!(
            "Basic {}",
            general_purpose::STANDARD.encode(credentials.as_bytes())
        )
    }

    async fn password_grant(&self) -> Result<TokenResponse> {
        tracing::debug!(
            token_url = %self.token_url,
            username = %self.config.username,
            has_extension = self.config.extension().is_some(),
            "Requesting access token with password grant"
        );

        let body = PasswordGrantRequest {
            grant_type: "password",
            username: &self.config.username,
            extension: self.config.extension(),
            password: self.config.password.expose_secret().as_str(),
        };

        self.request_token(&body).await
    }

    async fn refresh_grant(&self, refresh_token: &SecretString) -> Result<TokenResponse> {
        tracing::debug!(token_url = %self.token_url, "Refreshing access token");

        let body = RefreshGrantRequest {
            grant_type: "refresh_token",
            refresh_token: refresh_token.expose_secret().as_str(),
        };

        self.request_token(&body).await
    }

    async fn request_token<T: Serialize + ?Sized>(&self, body: &T) -> Result<TokenResponse> {
        let response = self
            .client
            .post(&self.token_url)
            .header("Authorization", self.basic_auth_header())
            .form(body)
            .send()
            .await
            .map_err(|e| {
                GlipError::Platform(PlatformError::ConnectionFailed(format!(
                    "Failed to request access token: {e}"
                )))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GlipError::Platform(PlatformError::AuthenticationFailed(
                format!(
                    "token request failed with status {status}: {}",
                    ApiErrorResponse::describe(&body)
                ),
            )));
        }

        response.json::<TokenResponse>().await.map_err(|e| {
            GlipError::Platform(PlatformError::InvalidResponse(format!(
                "Failed to parse token response: {e}"
            )))
        })
    }
}

/// Expiry instant of a token issued at `now`, less the skew
fn token_expiry(now: DateTime<Utc>, expires_in: u64) -> Result<DateTime<Utc>> {
    i64::try_from(expires_in)
        .ok()
        .and_then(|secs| secs.checked_sub(EXPIRY_SKEW_SECONDS))
        .and_then(ChronoDuration::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            GlipError::Platform(PlatformError::InvalidResponse(format!(
                "token response has an out of range expires_in: {expires_in}"
            )))
        })
}
