//! Read-only client for the business API that owns customer and settings
//! records.

use crate::credit::{CustomerCredit, CustomerQuery, GeneralSettings};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("invalid API base URL '{0}'")]
    InvalidBaseUrl(String),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

pub struct RemoteCatalog {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteCatalog {
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = reqwest::Url::parse(trimmed)
            .map_err(|_| RemoteError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            return Err(RemoteError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|source| RemoteError::Transport {
                url: trimmed.to_string(),
                source,
            })?;

        Ok(Self {
            base_url: trimmed.to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn customers_url(&self) -> String {
        format!("{}/api/clientes", self.base_url)
    }

    pub fn settings_url(&self) -> String {
        format!("{}/api/configuracoes", self.base_url)
    }

    /// Fetches the customer listing, letting the API apply `query`.
    pub async fn customers(&self, query: &CustomerQuery) -> Result<Vec<CustomerCredit>, RemoteError> {
        let url = self.customers_url();
        let params = listing_params(query);
        debug!(%url, ?params, "fetching customers");

        let request = self.client.get(&url).query(&params);
        self.fetch_json(url, request).await
    }

    pub async fn settings(&self) -> Result<GeneralSettings, RemoteError> {
        let url = self.settings_url();
        debug!(%url, "fetching general settings");
        let request = self.client.get(&url);
        self.fetch_json(url, request).await
    }

    async fn fetch_json<T>(&self, url: String, request: reqwest::RequestBuilder) -> Result<T, RemoteError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = match request.send().await {
            Ok(response) => response,
            Err(source) => {
                warn!(%url, error = %source, "remote request failed");
                return Err(RemoteError::Transport { url, source });
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "remote request rejected");
            return Err(RemoteError::Status { url, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| RemoteError::Decode { url, source })
    }
}

pub(crate) fn listing_params(query: &CustomerQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(active) = query.active {
        params.push(("apenasAtivos", active.to_string()));
    }
    if let Some(debtors) = query.debtors {
        params.push(("devedores", debtors.to_string()));
    }
    if let Some(order) = query.order_by {
        params.push(("orderBy", order.key().to_string()));
    }
    if let Some(name) = query
        .name_contains
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
    {
        params.push(("nomeContains", name.to_string()));
    }
    params
}
