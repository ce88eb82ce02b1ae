//! Service account authentication
//!
//! Signs a JWT assertion with the service account key and exchanges it for a
//! short-lived bearer token (OAuth 2.0 JWT bearer grant).

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{ServiceAccountKey, TokenResponse};

#[cfg(test)]
mod tests;

/// Read-only Drive scope
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_MINS: i64 = 60;

/// JWT claims for the token request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Build the assertion claims for a key
pub fn build_claims(key: &ServiceAccountKey, scope: &str, now: DateTime<Utc>) -> Claims {
    Claims {
        iss: key.client_email.clone(),
        scope: scope.to_string(),
        aud: key.token_uri.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(ASSERTION_LIFETIME_MINS)).timestamp(),
    }
}

/// Sign claims with the key's RSA private key (RS256)
pub fn sign_assertion(key: &ServiceAccountKey, claims: &Claims) -> Result<String> {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .context("Invalid service account private key")?;

    encode(&header, claims, &encoding_key).context("Failed to sign token assertion")
}

/// Exchange a signed assertion for an access token
pub async fn fetch_access_token(http: &Client, key: &ServiceAccountKey) -> Result<String> {
    let claims = build_claims(key, DRIVE_READONLY_SCOPE, Utc::now());
    let assertion = sign_assertion(key, &claims)?;

    debug!(issuer = %key.client_email, "requesting drive access token");

    let response = http
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await
        .context("Token request failed")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("Token exchange failed: HTTP {}: {}", status.as_u16(), body);
    }

    let token: TokenResponse = response
        .json()
        .await
        .context("Invalid token response")?;
    Ok(token.access_token)
}
