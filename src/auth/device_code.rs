use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::claims::decode_claims;
use super::session::Session;
use crate::errors::CatalogError;

pub const AUTHORITY: &str = "https://login.microsoftonline.com";

/// The single permission the catalog needs.
pub const INCIDENT_READ_SCOPE: &str = "https://graph.microsoft.com/SecurityIncident.Read.All";

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Extra wait the token endpoint asks for with `slow_down`.
const SLOW_DOWN_STEP: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCodeResponse {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub expires_in: u64,
    #[serde(default = "default_interval")]
    pub interval: u64,
    pub message: Option<String>,
}

fn default_interval() -> u64 {
    5
}

impl DeviceCodeResponse {
    /// Instruction text shown to the user.
    pub fn prompt(&self) -> String {
        self.message.clone().unwrap_or_else(|| {
            format!(
                "To sign in, open {} and enter the code {}",
                self.verification_uri, self.user_code
            )
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    scope: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// What to do after a token poll comes back with an error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Pending,
    SlowDown,
    Failed,
}

pub fn classify_poll_error(code: &str) -> PollOutcome {
    match code {
        "authorization_pending" => PollOutcome::Pending,
        "slow_down" => PollOutcome::SlowDown,
        _ => PollOutcome::Failed,
    }
}

/// OAuth 2.0 device authorization grant against the Microsoft identity
/// platform.
pub struct DeviceCodeAuthenticator {
    client: Client,
    authority: String,
    tenant: String,
    client_id: String,
    scope: String,
}

impl DeviceCodeAuthenticator {
    pub fn new(tenant: &str, client_id: &str) -> Self {
        Self {
            client: Client::new(),
            authority: AUTHORITY.to_string(),
            tenant: tenant.to_string(),
            client_id: client_id.to_string(),
            scope: INCIDENT_READ_SCOPE.to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/oauth2/v2.0/{}", self.authority, self.tenant, path)
    }

    async fn request_device_code(&self) -> Result<DeviceCodeResponse, CatalogError> {
        let resp = self
            .client
            .post(self.endpoint("devicecode"))
            .form(&[("client_id", self.client_id.as_str()), ("scope", self.scope.as_str())])
            .send()
            .await
            .map_err(|e| CatalogError::Authentication(format!("Device code request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body: Option<TokenErrorResponse> = resp.json().await.ok();
            let detail = body
                .and_then(|b| b.error_description.or(Some(b.error)))
                .unwrap_or_else(|| "no detail".into());
            return Err(CatalogError::Authentication(format!(
                "Device code request rejected ({}): {}",
                status, detail
            )));
        }

        resp.json()
            .await
            .map_err(|e| CatalogError::Authentication(format!("Invalid device code response: {}", e)))
    }

    async fn poll_token(&self, code: &DeviceCodeResponse) -> Result<TokenResponse, CatalogError> {
        let deadline = Utc::now() + chrono::Duration::seconds(code.expires_in as i64);
        let mut interval = Duration::from_secs(code.interval);

        loop {
            tokio::time::sleep(interval).await;
            if Utc::now() >= deadline {
                return Err(CatalogError::Authentication("Device code expired before sign-in completed".into()));
            }

            let resp = self
                .client
                .post(self.endpoint("token"))
                .form(&[
                    ("grant_type", DEVICE_CODE_GRANT),
                    ("client_id", self.client_id.as_str()),
                    ("device_code", code.device_code.as_str()),
                ])
                .send()
                .await
                .map_err(|e| CatalogError::Authentication(format!("Token request failed: {}", e)))?;

            if resp.status().is_success() {
                return resp
                    .json()
                    .await
                    .map_err(|e| CatalogError::Authentication(format!("Invalid token response: {}", e)));
            }

            let err: TokenErrorResponse = resp
                .json()
                .await
                .map_err(|e| CatalogError::Authentication(format!("Invalid token error response: {}", e)))?;

            match classify_poll_error(&err.error) {
                PollOutcome::Pending => debug!("Waiting for user sign-in"),
                PollOutcome::SlowDown => {
                    interval += SLOW_DOWN_STEP;
                    debug!(interval_secs = interval.as_secs(), "Token endpoint asked to slow down");
                }
                PollOutcome::Failed => {
                    return Err(CatalogError::Authentication(
                        err.error_description.unwrap_or(err.error),
                    ));
                }
            }
        }
    }

    /// Run the full flow. `on_prompt` receives the device code so the caller
    /// can show the sign-in instructions.
    pub async fn establish_session<F>(&self, on_prompt: F) -> Result<Session, CatalogError>
    where
        F: FnOnce(&DeviceCodeResponse),
    {
        info!(tenant = %self.tenant, scope = %self.scope, "Starting device code sign-in");
        let code = self.request_device_code().await?;
        on_prompt(&code);

        let token = self.poll_token(&code).await?;
        let claims = decode_claims(&token.access_token).unwrap_or_default();

        let scopes = match claims.scopes() {
            s if !s.is_empty() => s,
            _ => token
                .scope
                .as_deref()
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        };
        let account = claims.account().unwrap_or("unknown").to_string();
        let tenant_id = claims.tid.clone().unwrap_or_else(|| "unknown".to_string());

        info!(account = %account, tenant_id = %tenant_id, "Signed in");
        Ok(Session::new(
            token.access_token,
            account,
            tenant_id,
            scopes,
            Utc::now() + chrono::Duration::seconds(token.expires_in),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_poll_error() {
        assert_eq!(classify_poll_error("authorization_pending"), PollOutcome::Pending);
        assert_eq!(classify_poll_error("slow_down"), PollOutcome::SlowDown);
        assert_eq!(classify_poll_error("expired_token"), PollOutcome::Failed);
        assert_eq!(classify_poll_error("authorization_declined"), PollOutcome::Failed);
    }

    #[test]
    fn test_endpoint_uses_tenant() {
        let auth = DeviceCodeAuthenticator::new("organizations", "client-123");
        assert_eq!(
            auth.endpoint("devicecode"),
            "https://login.microsoftonline.com/organizations/oauth2/v2.0/devicecode"
        );
    }

    #[test]
    fn test_device_code_prompt_fallback() {
        let code: DeviceCodeResponse = serde_json::from_str(
            r#"{"device_code":"dc","user_code":"ABCD-EFGH","verification_uri":"https://microsoft.com/devicelogin","expires_in":900}"#,
        )
        .unwrap();
        assert_eq!(code.interval, 5);
        assert_eq!(
            code.prompt(),
            "To sign in, open https://microsoft.com/devicelogin and enter the code ABCD-EFGH"
        );
    }
}
