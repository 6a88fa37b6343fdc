//! Google Sheets row store.
//!
//! Speaks the Sheets v4 REST API directly with `reqwest`. Authentication is
//! the standard service-account flow: sign a short-lived RS256 assertion
//! with the account's private key, exchange it for an access token, cache
//! the token until shortly before it expires. The cache is an availability
//! optimization only - it holds no session state.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::instrument;

use async_trait::async_trait;
use branchboard_core::RetailEntry;

use crate::config::SheetsConfig;

use super::{RowStore, StoreError};

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Appends cover the whole table; the API finds the first free row.
const APPEND_RANGE: &str = "Sheet1!A:G";
/// Reads skip the header row.
const READ_RANGE: &str = "Sheet1!A2:G";

/// Assertion lifetime requested from the token endpoint.
const ASSERTION_TTL_SECONDS: i64 = 3600;
/// Refresh the cached access token this many seconds before it expires.
const TOKEN_EXPIRY_SLACK_SECONDS: i64 = 60;

/// Google Sheets v4 client implementing [`RowStore`].
#[derive(Clone)]
pub struct SheetsStore {
    inner: Arc<SheetsStoreInner>,
}

struct SheetsStoreInner {
    client: reqwest::Client,
    spreadsheet_id: String,
    service_account_email: String,
    signing_key: EncodingKey,
    token: RwLock<Option<CachedToken>>,
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    /// Unix seconds after which the token must not be reused.
    expires_at: i64,
}

/// Claims of the service-account assertion.
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
    expires_in: i64,
}

/// Body of a `values:append` call.
#[derive(Serialize)]
struct AppendRequest<'a> {
    values: [&'a [String]; 1],
}

/// Body of a `values.get` response.
#[derive(Deserialize)]
struct ValueRange {
    /// Absent entirely when the range holds no data.
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetsStore {
    /// Create a Sheets-backed row store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Credentials`] if the service-account private
    /// key is not a parseable RSA PEM. This is checked here, at startup,
    /// so a broken credential path refuses to serve instead of failing on
    /// the first request.
    pub fn new(config: &SheetsConfig) -> Result<Self, StoreError> {
        let signing_key = EncodingKey::from_rsa_pem(config.private_key_pem.expose_secret().as_bytes())
            .map_err(|e| StoreError::Credentials(format!("service account key: {e}")))?;

        Ok(Self {
            inner: Arc::new(SheetsStoreInner {
                client: reqwest::Client::new(),
                spreadsheet_id: config.spreadsheet_id.clone(),
                service_account_email: config.service_account_email.clone(),
                signing_key,
                token: RwLock::new(None),
            }),
        })
    }

    /// Return a usable access token, minting one if the cache is empty or
    /// about to expire.
    async fn access_token(&self) -> Result<String, StoreError> {
        let now = chrono::Utc::now().timestamp();

        if let Some(cached) = self.inner.token.read().await.as_ref()
            && cached.expires_at - TOKEN_EXPIRY_SLACK_SECONDS > now
        {
            return Ok(cached.access_token.clone());
        }

        let minted = self.mint_token(now).await?;
        let access_token = minted.access_token.clone();
        *self.inner.token.write().await = Some(minted);
        Ok(access_token)
    }

    async fn mint_token(&self, now: i64) -> Result<CachedToken, StoreError> {
        let claims = AssertionClaims {
            iss: &self.inner.service_account_email,
            scope: SHEETS_SCOPE,
            aud: TOKEN_URL,
            iat: now,
            exp: now + ASSERTION_TTL_SECONDS,
        };
        let assertion = encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.inner.signing_key,
        )
        .map_err(|e| StoreError::Credentials(format!("assertion signing: {e}")))?;

        let response = self
            .inner
            .client
            .post(TOKEN_URL)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::TokenExchange(format!(
                "status {status}: {body}"
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + token.expires_in,
        })
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        // Auth errors from the store mean misconfigured credentials, not a
        // caller problem; keep them distinguishable in diagnostics.
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Credentials(format!(
                "store rejected credentials (status {status}): {message}"
            )));
        }
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl RowStore for SheetsStore {
    #[instrument(skip(self, entry), fields(branch = %entry.branch))]
    async fn append(&self, entry: &RetailEntry) -> Result<(), StoreError> {
        let token = self.access_token().await?;
        let row = entry.to_row();
        let url = format!(
            "{SHEETS_API_BASE}/{}/values/{APPEND_RANGE}:append",
            self.inner.spreadsheet_id
        );

        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&AppendRequest {
                values: [row.as_slice()],
            })
            .send()
            .await?;

        Self::check_status(response).await?;
        tracing::debug!("appended ledger row");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn read_rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
        let token = self.access_token().await?;
        let url = format!(
            "{SHEETS_API_BASE}/{}/values/{READ_RANGE}",
            self.inner.spreadsheet_id
        );

        let response = self.inner.client.get(url).bearer_auth(token).send().await?;
        let range: ValueRange = Self::check_status(response).await?.json().await?;
        tracing::debug!(rows = range.values.len(), "read ledger rows");
        Ok(range.values)
    }
}
