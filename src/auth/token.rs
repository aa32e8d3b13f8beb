//! Bearer token exchange for service account keys

use crate::auth::ServiceAccountKey;
use crate::error::{DoctorError, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Scope every diagnostic script requests
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// A short-lived bearer token with its expiration
#[derive(Clone)]
pub struct Token {
    /// The access token value
    pub access_token: String,
    /// Expiration time, when the provider reported one
    pub expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Token {
    /// Whether the token can still be used.
    ///
    /// Tokens expiring within 2 minutes count as stale.
    pub fn is_valid(&self) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => Utc::now() < expires_at - chrono::Duration::seconds(120),
            None => true,
        }
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

/// Mints bearer tokens from a service account key.
///
/// Single attempt per call, no caching: a failed exchange is an authentication
/// error that aborts the whole invocation.
#[derive(Debug, Clone)]
pub struct TokenProvider {
    key: ServiceAccountKey,
    http_client: reqwest::Client,
}

impl TokenProvider {
    /// Create a provider for the given key
    pub fn new(key: ServiceAccountKey, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| DoctorError::config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { key, http_client })
    }

    /// The key this provider signs with
    pub fn key(&self) -> &ServiceAccountKey {
        &self.key
    }

    /// Exchange a signed JWT assertion for a bearer token
    pub async fn fetch(&self, scope: &str) -> Result<Token> {
        let assertion = self.sign_assertion(scope)?;

        let response = self
            .http_client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
            .send()
            .await
            .map_err(|e| DoctorError::auth(format!("Token exchange request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DoctorError::auth(format!(
                "Token exchange rejected ({}): {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| DoctorError::auth(format!("Invalid token response: {}", e)))?;

        Ok(Token {
            access_token: token_response.access_token,
            expires_at: token_response
                .expires_in
                .map(|secs| Utc::now() + chrono::Duration::seconds(secs)),
        })
    }

    fn sign_assertion(&self, scope: &str) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + 3600,
        };

        let mut header = Header::new(Algorithm::RS256);
        if !self.key.private_key_id.is_empty() {
            header.kid = Some(self.key.private_key_id.clone());
        }

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| DoctorError::auth(format!("Invalid private key material: {}", e)))?;

        jsonwebtoken::encode(&header, &claims, &encoding_key)
            .map_err(|e| DoctorError::auth(format!("Failed to sign token assertion: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_validity_window() {
        let mut token = Token {
            access_token: "t".to_string(),
            expires_at: None,
        };
        assert!(token.is_valid());

        token.expires_at = Some(Utc::now() + chrono::Duration::hours(1));
        assert!(token.is_valid());

        // Within the 2-minute staleness buffer
        token.expires_at = Some(Utc::now() + chrono::Duration::seconds(30));
        assert!(!token.is_valid());

        token.expires_at = Some(Utc::now() - chrono::Duration::hours(1));
        assert!(!token.is_valid());

        token.access_token = String::new();
        token.expires_at = None;
        assert!(!token.is_valid());
    }
}
