use data_encoding::BASE64URL_NOPAD;
use serde::Deserialize;
use tracing::debug;

/// Identity claims read from an access token payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    pub upn: Option<String>,
    pub preferred_username: Option<String>,
    pub unique_name: Option<String>,
    pub tid: Option<String>,
    pub scp: Option<String>,
}

impl TokenClaims {
    pub fn account(&self) -> Option<&str> {
        self.upn
            .as_deref()
            .or(self.preferred_username.as_deref())
            .or(self.unique_name.as_deref())
    }

    pub fn scopes(&self) -> Vec<String> {
        self.scp
            .as_deref()
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Decode the payload segment of a JWT without verifying it. The token is
/// only inspected for display; the API does the real validation. Opaque
/// tokens yield `None`.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = match BASE64URL_NOPAD.decode(payload.trim_end_matches('=').as_bytes()) {
        Ok(b) => b,
        Err(e) => {
            debug!(error = %e, "Access token payload is not base64url");
            return None;
        }
    };
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            BASE64URL_NOPAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#),
            BASE64URL_NOPAD.encode(payload.as_bytes())
        )
    }

    #[test]
    fn test_decode_claims() {
        let token = token_with(
            r#"{"upn":"analyst@contoso.com","tid":"b3c1","scp":"SecurityIncident.Read.All User.Read"}"#,
        );
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.account(), Some("analyst@contoso.com"));
        assert_eq!(claims.tid.as_deref(), Some("b3c1"));
        assert_eq!(claims.scopes(), vec!["SecurityIncident.Read.All", "User.Read"]);
    }

    #[test]
    fn test_account_falls_back_to_preferred_username() {
        let claims = decode_claims(&token_with(r#"{"preferred_username":"guest@fabrikam.com"}"#)).unwrap();
        assert_eq!(claims.account(), Some("guest@fabrikam.com"));
        assert!(claims.scopes().is_empty());
    }

    #[test]
    fn test_opaque_token_has_no_claims() {
        assert!(decode_claims("EwBwA8l6BAAU").is_none());
        assert!(decode_claims("a.!!!.c").is_none());
    }
}
