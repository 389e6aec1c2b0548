//! HTTP adapter for an external automation driver
//!
//! The driver process runs the browser automation and exposes a small JSON
//! API. Commands go out through this client; the driver pushes lifecycle
//! events back to `POST /api/client/events`.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{Contact, MessagingClient, SendOptions, SentMessage};
use crate::types::{AccountInfo, ClientError, ClientResult};

#[derive(Debug, Deserialize)]
struct ReadyResponse {
    ready: bool,
}

#[derive(Debug, Deserialize)]
struct RegisteredResponse {
    registered: bool,
}

/// [`MessagingClient`] backed by a driver reachable over HTTP
pub struct DriverClient {
    http: Client,
    base_url: String,
    data_path: PathBuf,
}

impl DriverClient {
    pub fn new(base_url: impl Into<String>, data_path: impl Into<PathBuf>) -> ClientResult<Self> {
        let http = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            data_path: data_path.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Rejected(format!("{}: {}", status, body)))
    }
}

#[async_trait]
impl MessagingClient for DriverClient {
    async fn initialize(&self) -> ClientResult<()> {
        let response = self
            .http
            .post(self.url("/session/initialize"))
            .json(&json!({ "dataPath": self.data_path }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn destroy(&self) -> ClientResult<()> {
        let response = self.http.post(self.url("/session/destroy")).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn send_message(
        &self,
        chat_id: &str,
        body: &str,
        options: SendOptions,
    ) -> ClientResult<SentMessage> {
        let response = self
            .http
            .post(self.url("/messages"))
            .json(&json!({ "chatId": chat_id, "body": body, "options": options }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn account_info(&self) -> ClientResult<AccountInfo> {
        let response = self.http.get(self.url("/session/info")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn is_ready(&self) -> bool {
        let result = async {
            let response = self.http.get(self.url("/session/state")).send().await?;
            let state: ReadyResponse = Self::check(response).await?.json().await?;
            Ok::<_, ClientError>(state.ready)
        }
        .await;

        match result {
            Ok(ready) => ready,
            Err(e) => {
                tracing::debug!(error = %e, "driver state probe failed");
                false
            }
        }
    }

    async fn is_registered_user(&self, chat_id: &str) -> ClientResult<bool> {
        let path = format!("/users/{}/registered", urlencoding::encode(chat_id));
        let response = self.http.get(self.url(&path)).send().await?;
        let body: RegisteredResponse = Self::check(response).await?.json().await?;
        Ok(body.registered)
    }

    async fn contact(&self, chat_id: &str) -> ClientResult<Option<Contact>> {
        let path = format!("/contacts/{}", urlencoding::encode(chat_id));
        let response = self.http.get(self.url(&path)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(Self::check(response).await?.json().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = DriverClient::new("http://127.0.0.1:9230/", "./wa_data").unwrap();
        assert_eq!(client.url("/session/state"), "http://127.0.0.1:9230/session/state");
    }

    #[tokio::test]
    async fn test_unreachable_driver_is_not_ready() {
        // Port 9 (discard) is not expected to run an HTTP server
        let client = DriverClient::new("http://127.0.0.1:9", "./wa_data").unwrap();
        assert!(!client.is_ready().await);
        assert!(client.initialize().await.is_err());
    }
}
