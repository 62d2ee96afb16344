// https://firebase.google.com/docs/reference/fcm/rest/v1/projects.messages/send

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

pub mod models;

use futures::stream::{self, StreamExt};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub use crate::models::{
    AndroidConfig, AndroidNotification, AndroidPriority, ApnsConfig, ApnsPayload, Aps,
    BatchResponse, Message, Notification, SendResponse, ServiceAccountKey,
};
use crate::models::{
    ErrorEnvelope, JwtClaims, SendRequest, SendResponseBody, TokenResponse,
};

const MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
/// In-flight sends per multicast
const MAX_CONCURRENT_SENDS: usize = 100;

/// FCM error codes (`google.firebase.fcm.v1.FcmError.ErrorCode`), falling back
/// to the canonical RPC status when no FCM detail is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    Unregistered,
    InvalidArgument,
    SenderIdMismatch,
    QuotaExceeded,
    Unavailable,
    Internal,
    ThirdPartyAuthError,
    Other(String),
}

impl ErrorCode {
    fn parse(code: &str) -> Self {
        match code {
            "UNREGISTERED" | "NOT_FOUND" => ErrorCode::Unregistered,
            "INVALID_ARGUMENT" => ErrorCode::InvalidArgument,
            "SENDER_ID_MISMATCH" | "PERMISSION_DENIED" => ErrorCode::SenderIdMismatch,
            "QUOTA_EXCEEDED" | "RESOURCE_EXHAUSTED" => ErrorCode::QuotaExceeded,
            "UNAVAILABLE" => ErrorCode::Unavailable,
            "INTERNAL" => ErrorCode::Internal,
            "THIRD_PARTY_AUTH_ERROR" | "UNAUTHENTICATED" => ErrorCode::ThirdPartyAuthError,
            other => ErrorCode::Other(other.to_string()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FcmError {
    #[error("FCM auth error: {0}")]
    Auth(String),
    #[error("FCM network error: {0}")]
    Network(String),
    #[error("FCM API error {status} ({code:?}): {message}")]
    Api {
        status: u16,
        code: ErrorCode,
        message: String,
    },
    #[error("FCM parse error: {0}")]
    Parse(String),
}

impl FcmError {
    /// Admin-SDK style code, e.g. `messaging/registration-token-not-registered`.
    pub fn messaging_code(&self) -> &'static str {
        match self {
            FcmError::Api { code, message, .. } => match code {
                ErrorCode::Unregistered => "messaging/registration-token-not-registered",
                ErrorCode::InvalidArgument if message.contains("registration token") => {
                    "messaging/invalid-registration-token"
                }
                ErrorCode::InvalidArgument => "messaging/invalid-argument",
                ErrorCode::SenderIdMismatch => "messaging/mismatched-credential",
                ErrorCode::QuotaExceeded => "messaging/message-rate-exceeded",
                ErrorCode::Unavailable => "messaging/server-unavailable",
                ErrorCode::Internal => "messaging/internal-error",
                ErrorCode::ThirdPartyAuthError => "messaging/third-party-auth-error",
                ErrorCode::Other(_) => "messaging/unknown-error",
            },
            FcmError::Auth(_) => "app/invalid-credential",
            FcmError::Network(_) => "app/network-error",
            FcmError::Parse(_) => "messaging/unknown-error",
        }
    }

    /// True when the token can never be delivered to again.
    pub fn is_invalid_token(&self) -> bool {
        matches!(
            self.messaging_code(),
            "messaging/registration-token-not-registered" | "messaging/invalid-registration-token"
        )
    }

    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => {
                let detail_code = envelope
                    .error
                    .details
                    .iter()
                    .find_map(|d| d.error_code.clone());
                let code = detail_code
                    .or(envelope.error.status)
                    .map(|c| ErrorCode::parse(&c))
                    .unwrap_or_else(|| ErrorCode::Other(status.to_string()));
                FcmError::Api {
                    status,
                    code,
                    message: envelope.error.message,
                }
            }
            Err(_) => FcmError::Api {
                status,
                code: ErrorCode::Other(status.to_string()),
                message: body.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub enum Credentials {
    /// Mint short-lived OAuth tokens from a service account key.
    ServiceAccount(ServiceAccountKey),
    /// A pre-minted OAuth access token (local development).
    AccessToken(String),
}

#[derive(Debug, Clone)]
pub struct FcmOptions {
    pub project_id: String,
    pub credentials: Credentials,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct FcmService {
    options: FcmOptions,
    client: Client,
    base_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl FcmService {
    pub fn new(options: FcmOptions) -> Self {
        Self {
            options,
            client: Client::new(),
            base_url: "https://fcm.googleapis.com".to_string(),
            token: Mutex::new(None),
        }
    }

    /// Read a service account key file and build a service for its project.
    pub fn from_service_account_file(
        path: &str,
        project_id: Option<String>,
    ) -> Result<Self, FcmError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| FcmError::Auth(format!("cannot read {}: {}", path, e)))?;
        let key: ServiceAccountKey = serde_json::from_str(&raw)
            .map_err(|e| FcmError::Auth(format!("invalid service account key: {}", e)))?;
        let project_id = project_id
            .or_else(|| key.project_id.clone())
            .ok_or_else(|| FcmError::Auth("no project id configured".to_string()))?;

        Ok(Self::new(FcmOptions {
            project_id,
            credentials: Credentials::ServiceAccount(key),
        }))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn project_id(&self) -> &str {
        &self.options.project_id
    }

    /// Send one message. Returns the message resource name.
    pub async fn send(&self, message: &Message) -> Result<String, FcmError> {
        let access_token = self.access_token().await?;
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.base_url, self.options.project_id
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .json(&SendRequest { message })
            .send()
            .await
            .map_err(|e| FcmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "FCM send failed");
            return Err(FcmError::from_response(status.as_u16(), &body));
        }

        let body: SendResponseBody = response
            .json()
            .await
            .map_err(|e| FcmError::Parse(e.to_string()))?;
        debug!(name = %body.name, "FCM message sent");
        Ok(body.name)
    }

    /// Send the same message to every token concurrently; one response per
    /// token, in input order.
    ///
    /// Only an authentication failure aborts the whole batch; per-token
    /// failures are reported in the returned [`BatchResponse`].
    pub async fn send_each_for_multicast(
        &self,
        tokens: &[String],
        message: &Message,
    ) -> Result<BatchResponse, FcmError> {
        // Mint once up front so the concurrent sends share the cached token
        self.access_token().await?;

        let sends: Vec<_> = tokens
            .iter()
            .map(|token| async move {
                let result = self.send(&message.to_token(token)).await;
                SendResponse {
                    token: token.clone(),
                    result,
                }
            })
            .collect();
        let responses = stream::iter(sends)
            .buffered(MAX_CONCURRENT_SENDS)
            .collect()
            .await;
        Ok(BatchResponse { responses })
    }

    async fn access_token(&self) -> Result<String, FcmError> {
        let key = match &self.options.credentials {
            Credentials::AccessToken(token) => return Ok(token.clone()),
            Credentials::ServiceAccount(key) => key,
        };

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        let minted = self.mint_token(key).await?;
        // Refresh a minute early so in-flight sends never carry an expired token.
        let lifetime = Duration::from_secs(minted.expires_in.saturating_sub(60));
        let value = minted.access_token;
        *cached = Some(CachedToken {
            value: value.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(value)
    }

    async fn mint_token(&self, key: &ServiceAccountKey) -> Result<TokenResponse, FcmError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| FcmError::Auth(e.to_string()))?
            .as_secs();
        let claims = JwtClaims {
            iss: &key.client_email,
            scope: MESSAGING_SCOPE,
            aud: &key.token_uri,
            iat: now,
            exp: now + 3600,
        };
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| FcmError::Auth(format!("invalid private key: {}", e)))?;
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .map_err(|e| FcmError::Auth(format!("cannot sign assertion: {}", e)))?;

        let response = self
            .client
            .post(&key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FcmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "OAuth token exchange failed");
            return Err(FcmError::Auth(format!("token endpoint returned {}", status)));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| FcmError::Parse(e.to_string()))
    }
}
