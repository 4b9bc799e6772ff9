use std::time::Duration;

use chitchat_chats::{Chat, User};
use chitchat_config::{ApiConfig, EndpointConfig};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{ChatDirectory, DirectoryError};
use crate::auth::AuthToken;

/// Directory backed by the chat backend's REST API.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: Client,
    base_url: String,
    auth_header: String,
    endpoints: EndpointConfig,
}

#[derive(Serialize)]
struct AccessChatBody<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
}

impl HttpDirectory {
    pub fn new(config: &ApiConfig) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_header: config.auth_header.clone(),
            endpoints: config.endpoints.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorised(&self, request: RequestBuilder, token: &AuthToken) -> RequestBuilder {
        request.header(self.auth_header.as_str(), token.expose())
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, DirectoryError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            debug!(status = status.as_u16(), "directory request rejected");
            return Err(DirectoryError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

impl ChatDirectory for HttpDirectory {
    async fn search_users(&self, query: &str, token: &AuthToken) -> Result<Vec<User>, DirectoryError> {
        let request = self
            .client
            .get(self.url(&self.endpoints.search_users))
            .query(&[("search", query)]);

        Self::send(self.authorised(request, token)).await
    }

    async fn access_or_create_chat(
        &self,
        target_user_id: &str,
        token: &AuthToken,
    ) -> Result<Chat, DirectoryError> {
        let request = self
            .client
            .post(self.url(&self.endpoints.access_chat))
            .json(&AccessChatBody {
                user_id: target_user_id,
            });

        Self::send(self.authorised(request, token)).await
    }

    async fn fetch_chats(&self, token: &AuthToken) -> Result<Vec<Chat>, DirectoryError> {
        let request = self.client.get(self.url(&self.endpoints.fetch_chats));

        Self::send(self.authorised(request, token)).await
    }
}
