use crate::config::{Config, parse_server_url};
use crate::error::DeleteError;
use crate::models::{Cluster, ClusterList};
use anyhow::{Context, Result};
use reqwest::header::HeaderValue;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

pub const CLUSTERS_PATH: &str = "/api/clusters_mgmt/v1/clusters";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// API path of a single limited support reason. Both IDs are inserted as given.
pub fn limited_support_reason_path(cluster_id: &str, reason_id: &str) -> String {
    format!("{CLUSTERS_PATH}/{cluster_id}/limited_support_reasons/{reason_id}")
}

#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub path: String,
    pub url: Url,
}

#[derive(Debug, Clone)]
pub struct DeleteResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl DeleteResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Authenticated session against the OCM API.
///
/// Nothing is sent on construction. Dropping the value drops the underlying
/// `reqwest::Client` and its connection pool; the `Drop` impl only traces it.
pub struct OcmConnection {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) token: String,
}

impl OcmConnection {
    pub fn new(config: &Config) -> Result<Self> {
        let token = config.token()?;
        let base_url = config.api_url()?;
        Self::build(base_url, token)
    }

    pub fn new_with_token(server: &str, token: String) -> Result<Self> {
        let base_url = parse_server_url(server)?;
        Self::build(base_url, token)
    }

    fn build(base_url: Url, token: String) -> Result<Self> {
        let header = HeaderValue::from_str(&format!("Bearer {token}"))
            .context("Can't build connection: token is not a valid header value")?;
        header
            .to_str()
            .context("Can't build connection: token must be visible ASCII")?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .user_agent(USER_AGENT)
            .build()
            .context("Can't build connection")?;

        tracing::debug!(
            url = %base_url,
            token = %Self::mask_token(&token),
            "connection ready"
        );

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn mask_token(token: &str) -> String {
        if token.is_empty() {
            "No token provided".to_string()
        } else if token.chars().count() > 12 {
            let len = token.chars().count();
            let head: String = token.chars().take(8).collect();
            let tail: String = token.chars().skip(len - 4).collect();
            format!("{head}...{tail}")
        } else {
            "***".to_string()
        }
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        tracing::debug!(%status, url = %response.url(), "received response");

        if status.is_success() {
            response
                .json::<T>()
                .await
                .context("Failed to parse response")
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            anyhow::bail!(
                "Authentication failed. Token used: {}",
                Self::mask_token(&self.token)
            )
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Request failed with status {}: {}", status, error_text)
        }
    }

    /// Resolve `key` to a cluster. The internal ID is tried first, then the
    /// cluster name and external ID, which must match exactly one cluster.
    pub async fn get_cluster(&self, key: &str) -> Result<Cluster> {
        if key.is_empty() {
            anyhow::bail!("Cluster ID must not be empty")
        }
        if key.contains('/') {
            anyhow::bail!("Cluster ID must not contain '/': '{}'", key)
        }

        let mut url = self.base_url.clone();
        url.set_path(&format!("{CLUSTERS_PATH}/{key}"));
        tracing::debug!(%url, "GET cluster");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(cluster = key, "not an internal ID, searching");
            return self.search_cluster(key).await;
        }

        self.handle_response(response).await
    }

    async fn search_cluster(&self, key: &str) -> Result<Cluster> {
        let mut url = self.base_url.clone();
        url.set_path(CLUSTERS_PATH);

        let quoted = key.replace('\'', "''");
        let search = format!("(id = '{quoted}' or external_id = '{quoted}' or name = '{quoted}')");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(&[("search", search.as_str())])
            .send()
            .await?;

        let list: ClusterList = self.handle_response(response).await?;
        let ClusterList { mut items, total } = list;
        match items.len() {
            0 => anyhow::bail!("No cluster found for '{}'", key),
            1 => Ok(items.remove(0)),
            n => anyhow::bail!(
                "'{}' matches {} clusters, use the internal cluster ID",
                key,
                total.unwrap_or(n as u64)
            ),
        }
    }

    pub fn delete_request(
        &self,
        cluster: &Cluster,
        reason_id: &str,
    ) -> Result<DeleteRequest, DeleteError> {
        let path = limited_support_reason_path(&cluster.id, reason_id);

        if cluster.id.is_empty() || reason_id.is_empty() {
            return Err(DeleteError::PathConstruction {
                path,
                reason: "cluster ID and limited support reason ID must not be empty".to_string(),
            });
        }
        if self.base_url.cannot_be_a_base() {
            return Err(DeleteError::PathConstruction {
                path,
                reason: format!("'{}' cannot carry a path", self.base_url),
            });
        }

        let mut url = self.base_url.clone();
        url.set_path(&path);
        Ok(DeleteRequest { path, url })
    }

    pub async fn send(&self, request: DeleteRequest) -> Result<DeleteResponse, DeleteError> {
        tracing::debug!(url = %request.url, "DELETE limited support reason");

        let response = self
            .client
            .delete(request.url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(%status, bytes = body.len(), "delete response received");

        Ok(DeleteResponse { status, body })
    }
}

impl Drop for OcmConnection {
    fn drop(&mut self) {
        tracing::debug!(url = %self.base_url, "closing connection");
    }
}
