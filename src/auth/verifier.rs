use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use crate::config;

/// Yes/no oracle for an identity/secret pair. The system never stores or
/// hashes passwords itself.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, email: &str, password: &str) -> bool;
}

/// Client for the external authenticator service.
///
/// One POST per call with a hard timeout; HTTP 200 is the only acceptance
/// signal. Any other status, transport error, or timeout is a final
/// rejection for that call. No retries.
pub struct AuthenticatorClient {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl AuthenticatorClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            timeout,
        }
    }

    pub fn from_config() -> Self {
        let auth = &config::config().authenticator;
        Self::new(auth.url.clone(), Duration::from_secs(auth.timeout_secs))
    }
}

#[async_trait]
impl CredentialVerifier for AuthenticatorClient {
    async fn verify(&self, email: &str, password: &str) -> bool {
        // Empty credentials never reach the wire
        if email.is_empty() || password.is_empty() {
            return false;
        }

        let payload = json!({ "email": email, "password": password });

        match self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
        {
            Ok(resp) => resp.status() == reqwest::StatusCode::OK,
            Err(err) => {
                tracing::warn!("authenticator call failed, rejecting: {}", err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_credentials_are_rejected_without_a_call() {
        // Unroutable URL: a network attempt would error loudly rather than 200
        let client = AuthenticatorClient::new("http://127.0.0.1:9", Duration::from_secs(1));
        assert!(!client.verify("", "secret").await);
        assert!(!client.verify("a@x.com", "").await);
        assert!(!client.verify("", "").await);
    }

    #[tokio::test]
    async fn transport_failure_is_a_rejection() {
        // Discard port: connection refused, which must read as "no"
        let client = AuthenticatorClient::new("http://127.0.0.1:9", Duration::from_secs(1));
        assert!(!client.verify("a@x.com", "secret").await);
    }

    #[tokio::test]
    async fn timeout_is_a_rejection_not_a_retry() {
        // Authenticator that accepts the connection but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client =
            AuthenticatorClient::new(format!("http://{}", addr), Duration::from_millis(200));
        let started = std::time::Instant::now();
        assert!(!client.verify("a@x.com", "secret").await);
        // One bounded attempt, no second try
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
