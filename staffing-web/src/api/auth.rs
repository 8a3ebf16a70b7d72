//! Service-account authentication
//!
//! Signs a short-lived RS256 assertion with the service account's private key
//! and exchanges it at the key's token endpoint for a bearer token. The token
//! is cached and shared by every request until it is close to expiry.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, Header};
use tokio::sync::RwLock;

use super::error::StoreError;
use super::models::{AssertionClaims, ServiceAccountKey, TokenInfo, TokenResponse};

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Hands out access tokens for one service account
pub struct AuthManager {
    key: ServiceAccountKey,
    http: reqwest::Client,
    token: RwLock<Option<TokenInfo>>,
}

impl AuthManager {
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Self {
        Self {
            key,
            http,
            token: RwLock::new(None),
        }
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Current access token, fetching a new one when the cached token is
    /// missing or about to expire
    pub async fn access_token(&self) -> Result<String, StoreError> {
        {
            let cached = self.token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expiring(Utc::now()) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let mut cached = self.token.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expiring(Utc::now()) {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String, StoreError> {
        let signing_key = self.key.signing_key().map_err(|e| StoreError::Auth {
            message: format!("invalid private key: {}", e),
        })?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SPREADSHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&header, &claims, &signing_key).map_err(|e| StoreError::Auth {
            message: format!("failed to sign assertion: {}", e),
        })
    }

    async fn request_token(&self) -> Result<TokenInfo, StoreError> {
        let now = Utc::now();
        let assertion = self.assertion(now)?;

        log::debug!("Requesting access token for {}", self.key.client_email);
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Auth {
                message: format!("token endpoint returned {}: {}", status.as_u16(), body),
            });
        }

        let token: TokenResponse = response.json().await?;
        log::info!(
            "Obtained access token for {} (expires in {}s)",
            self.key.client_email,
            token.expires_in
        );
        Ok(TokenInfo::from_response(token, now))
    }
}
