//! OAuth token kept in a file, refreshed when about to expire.

use std::{
    cell::RefCell,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::destination::error::DestinationError;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// refresh this many seconds before the token actually expires
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// unix seconds, 0 when unknown
    #[serde(default)]
    pub expires_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
}

impl OAuthToken {
    pub fn is_expiring(&self, now: i64) -> bool {
        self.expires_at - now < EXPIRY_MARGIN_SECS
    }

    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }

    fn apply(&mut self, refreshed: RefreshResponse, now: i64) {
        self.access_token = refreshed.access_token;
        self.expires_at = now + refreshed.expires_in;
        self.expires_in = Some(refreshed.expires_in);
        if let Some(scope) = refreshed.scope {
            self.scope = Some(scope);
        }
        if let Some(token_type) = refreshed.token_type {
            self.token_type = token_type;
        }
    }
}

/// Token backed by its file. Refreshed tokens are written back.
pub struct TokenStore {
    path: PathBuf,
    credentials: OAuthCredentials,
    token: RefCell<OAuthToken>,
}

impl TokenStore {
    pub fn load(path: &Path, credentials: OAuthCredentials) -> Result<Self, DestinationError> {
        let token_error = |reason: String| DestinationError::TokenFile {
            path: path.to_path_buf(),
            reason,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| token_error(e.to_string()))?;
        let token: OAuthToken =
            serde_json::from_str(&contents).map_err(|e| token_error(e.to_string()))?;

        Ok(Self {
            path: path.to_path_buf(),
            credentials,
            token: RefCell::new(token),
        })
    }

    /// Value for the `Authorization` header, refreshing the token first if needed.
    pub fn authorization(&self, agent: &ureq::Agent) -> Result<String, DestinationError> {
        let now = chrono::Utc::now().timestamp();
        if self.token.borrow().is_expiring(now) {
            self.refresh(agent, now)?;
        }
        Ok(self.token.borrow().authorization())
    }

    fn refresh(&self, agent: &ureq::Agent, now: i64) -> Result<(), DestinationError> {
        log::info!("Refreshing OAuth access token");
        let refresh_token = self.token.borrow().refresh_token.clone();
        let response = agent.post(TOKEN_URL).send_form(&[
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
        ]);
        let refreshed: RefreshResponse = match response {
            Ok(response) => response.into_json()?,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(DestinationError::TokenRefresh(format!("{status}: {body}")));
            }
            Err(e) => return Err(e.into()),
        };

        let mut token = self.token.borrow_mut();
        token.apply(refreshed, now);
        let json = serde_json::to_string_pretty(&*token)
            .map_err(|e| DestinationError::Malformed(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn token(expires_at: i64) -> OAuthToken {
        OAuthToken {
            access_token: "ya29.access".into(),
            refresh_token: "1//refresh".into(),
            token_type: "Bearer".into(),
            scope: Some("https://www.googleapis.com/auth/youtube".into()),
            expires_at,
            expires_in: Some(3599),
        }
    }

    #[test]
    fn test_expiry_margin() {
        let t = token(1_000);
        assert!(!t.is_expiring(900));
        assert!(t.is_expiring(941));
        assert!(t.is_expiring(2_000));
    }

    #[test]
    fn test_authorization_header() {
        assert_eq!(token(0).authorization(), "Bearer ya29.access");
    }

    #[test]
    fn test_apply_refresh() {
        let mut t = token(0);
        t.apply(
            RefreshResponse {
                access_token: "ya29.new".into(),
                expires_in: 3600,
                scope: None,
                token_type: Some("Bearer".into()),
            },
            500,
        );
        assert_eq!(t.access_token, "ya29.new");
        assert_eq!(t.expires_at, 4_100);
        assert_eq!(t.refresh_token, "1//refresh");
        assert!(t.scope.is_some());
    }

    #[test]
    fn test_load_token_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("oauth.json");
        std::fs::write(
            &path,
            r#"{"access_token": "a", "refresh_token": "r", "expires_at": 1700000000, "scope": "s", "token_type": "Bearer", "expires_in": 3599}"#,
        )?;
        let credentials = OAuthCredentials {
            client_id: "id".into(),
            client_secret: "secret".into(),
        };

        let store = TokenStore::load(&path, credentials)?;

        assert_eq!(store.token.borrow().expires_at, 1_700_000_000);
        Ok(())
    }

    #[test]
    fn test_missing_token_file() {
        let credentials = OAuthCredentials {
            client_id: "id".into(),
            client_secret: "secret".into(),
        };
        let result = TokenStore::load(Path::new("/nonexistent/oauth.json"), credentials);
        assert!(matches!(result, Err(DestinationError::TokenFile { .. })));
    }
}
