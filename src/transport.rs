//! Request-ready HTTP client bound to one base address and one credential.
//!
//! A [`TransportClient`] is built per operation: building it resolves the
//! credential exactly once, and the client is dropped when the call finishes.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::{normalize_token, CredentialProvider};
use crate::config::ApiConfig;
use crate::error::{PickwiseError, Result};

pub struct TransportClient {
    http: Client,
    base_url: String,
    headers: HeaderMap,
}

impl TransportClient {
    /// Fetch a token and build a client carrying it.
    ///
    /// A failed token fetch fails the build; there is no retry here.
    pub async fn build(credentials: &dyn CredentialProvider, config: &ApiConfig) -> Result<Self> {
        let token = credentials.token().await.map_err(|e| match e {
            PickwiseError::Credential(_) => e,
            other => PickwiseError::Credential(other.to_string()),
        })?;
        let token = normalize_token(token);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = token.as_deref() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                PickwiseError::Credential("token contains invalid header characters".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(headers.clone())
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| PickwiseError::Internal(format!("failed to build HTTP client: {}", e)))?;

        debug!(
            base_url = config.base(),
            authenticated = token.is_some(),
            "transport client ready"
        );

        Ok(Self {
            http,
            base_url: config.base().to_string(),
            headers,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers attached to every request from this client
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn is_authenticated(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let mut req = self.http.get(self.url(path));
        if !query.is_empty() {
            req = req.query(query);
        }
        self.send(Method::GET, path, req).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let req = self.http.post(self.url(path)).json(body);
        self.send(Method::POST, path, req).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        req: RequestBuilder,
    ) -> Result<T> {
        let context = format!("{} {}", method, path);
        debug!("{}", context);

        let resp = req.send().await.map_err(|e| {
            warn!("{} transport failure: {}", context, e);
            PickwiseError::RequestFailed {
                context: context.clone(),
                status: e.status().map(|s| s.as_u16()),
                body: None,
            }
        })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            warn!("{} body read failed: {}", context, e);
            PickwiseError::RequestFailed {
                context: context.clone(),
                status: Some(status.as_u16()),
                body: None,
            }
        })?;

        if !status.is_success() {
            warn!("{} failed: status={} body={}", context, status, text);
            return Err(PickwiseError::RequestFailed {
                context,
                status: Some(status.as_u16()),
                body: Some(text),
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            warn!("{} returned malformed JSON: {}", context, e);
            PickwiseError::RequestFailed {
                context,
                status: Some(status.as_u16()),
                body: None,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MockCredentialProvider;

    #[tokio::test]
    async fn test_build_attaches_bearer_token() {
        let mut creds = MockCredentialProvider::new();
        creds
            .expect_token()
            .times(1)
            .returning(|| Ok(Some("tok-123".to_string())));

        let client = TransportClient::build(&creds, &ApiConfig::default())
            .await
            .unwrap();

        assert!(client.is_authenticated());
        assert_eq!(client.headers()[AUTHORIZATION], "Bearer tok-123");
        assert_eq!(client.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_missing_or_blank_token_omits_authorization() {
        for token in [None, Some(String::new()), Some("  ".to_string())] {
            let mut creds = MockCredentialProvider::new();
            creds.expect_token().times(1).return_once(move || Ok(token));

            let client = TransportClient::build(&creds, &ApiConfig::default())
                .await
                .unwrap();
            assert!(!client.is_authenticated());
            assert_eq!(client.headers()[CONTENT_TYPE], "application/json");
        }
    }

    #[tokio::test]
    async fn test_credential_failure_fails_build() {
        let mut creds = MockCredentialProvider::new();
        creds
            .expect_token()
            .times(1)
            .returning(|| Err(PickwiseError::Internal("provider offline".to_string())));

        let err = TransportClient::build(&creds, &ApiConfig::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, PickwiseError::Credential(ref m) if m.contains("provider offline")));
    }

    #[tokio::test]
    async fn test_invalid_token_characters_rejected() {
        let mut creds = MockCredentialProvider::new();
        creds
            .expect_token()
            .returning(|| Ok(Some("bad\ntoken".to_string())));

        let result = TransportClient::build(&creds, &ApiConfig::default()).await;
        assert!(matches!(result, Err(PickwiseError::Credential(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_request_failed() {
        let creds = crate::auth::StaticToken::anonymous();
        let mut config = ApiConfig::with_base_url("http://127.0.0.1:9");
        config.timeout_ms = 500;
        config.connect_timeout_ms = 200;

        let client = TransportClient::build(&creds, &config).await.unwrap();
        let err = client
            .get::<serde_json::Value>("/auth/verify", &[])
            .await
            .unwrap_err();

        match err {
            PickwiseError::RequestFailed { status, body, context } => {
                assert_eq!(status, None);
                assert_eq!(body, None);
                assert_eq!(context, "GET /auth/verify");
            }
            other => panic!("expected RequestFailed, got {:?}", other),
        }
    }
}
