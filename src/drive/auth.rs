//! Service-account OAuth2 for the Drive API.
//!
//! Flow: sign an RS256 JWT with the key from the service-account JSON file,
//! exchange it at the account's `token_uri` for a bearer token, cache the
//! token and refresh it shortly before it expires.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::debug;

use crate::types::{AppError, AppResult};

/// Full Drive access; folder creation needs more than `drive.file`.
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

const TOKEN_LIFETIME_SECS: u64 = 3600;

/// Service account credentials from the JSON key file.
#[derive(Debug, Clone, Deserialize)]
struct ServiceAccountCredentials {
    /// The service account email (used as issuer in the JWT).
    client_email: String,

    /// The private key in PEM format.
    private_key: String,

    /// Where to exchange the JWT for an access token.
    token_uri: String,
}

#[derive(Debug, Serialize)]
struct JwtClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    expires_at: SystemTime,
}

/// Authenticator handling the OAuth2 JWT-bearer exchange.
#[derive(Clone)]
pub struct ServiceAccountAuth {
    credentials: Arc<ServiceAccountCredentials>,
    client: reqwest::Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl ServiceAccountAuth {
    /// Load credentials from a JSON key file path.
    pub async fn from_file(path: &str) -> AppResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Auth(format!("read credentials file {path}: {e}")))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> AppResult<Self> {
        let credentials: ServiceAccountCredentials = serde_json::from_str(json)
            .map_err(|e| AppError::Auth(format!("parse service-account key: {e}")))?;
        Ok(Self {
            credentials: Arc::new(credentials),
            client: reqwest::Client::new(),
            cached_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Email the destination folder must be shared with.
    pub fn client_email(&self) -> &str {
        &self.credentials.client_email
    }

    /// Get a valid access token, refreshing if necessary.
    pub async fn access_token(&self) -> AppResult<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > SystemTime::now() + Duration::from_secs(60) {
                    return Ok(token.token.clone());
                }
            }
        }

        let response = self.fetch_new_token().await?;
        let token = response.access_token.clone();

        {
            let mut cached = self.cached_token.write().await;
            // Refresh a bit early rather than racing the expiry.
            let lifetime = response.expires_in.saturating_sub(5 * 60).max(60);
            *cached = Some(CachedToken {
                token: response.access_token,
                expires_at: SystemTime::now() + Duration::from_secs(lifetime),
            });
        }

        Ok(token)
    }

    async fn fetch_new_token(&self) -> AppResult<TokenResponse> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::Internal(format!("system clock before epoch: {e}")))?
            .as_secs();

        let claims = JwtClaims {
            iss: self.credentials.client_email.clone(),
            scope: DRIVE_SCOPE.to_string(),
            aud: self.credentials.token_uri.clone(),
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };

        let header = Header::new(Algorithm::RS256);
        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())
            .map_err(|e| AppError::Auth(format!("invalid private key: {e}")))?;
        let assertion = encode(&header, &claims, &key)
            .map_err(|e| AppError::Auth(format!("sign token request: {e}")))?;

        debug!(
            email = %self.credentials.client_email,
            "exchanging signed JWT for access token"
        );

        let response = self
            .client
            .post(&self.credentials.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Transient(format!("token endpoint unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!(
                "token exchange rejected ({status}): {body}"
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AppError::Auth(format!("decode token response: {e}")))
    }
}
