//! [`ChainApi`] over the chain node's HTTP API

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use super::chain_api::{Account, ChainApi, TableRowsQuery};
use crate::error::ChainApiError;

const USER_AGENT: &str = concat!("infradidresolver/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct TableRows {
    rows: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct AccountName<'a> {
    account_name: &'a str,
}

/// Reads the chain through `POST {endpoint}/v1/chain/*`
#[derive(Debug, Clone)]
pub struct HttpChainApi {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpChainApi {
    /// `endpoint` must be an absolute http(s) URL of a chain node
    pub fn new(endpoint: &str) -> Result<Self, ChainApiError> {
        let endpoint = Url::parse(endpoint)?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ChainApiError::Scheme(endpoint.scheme().to_string()));
        }
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post<B, R>(&self, method: &str, body: &B) -> Result<R, ChainApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!(
            "{}/v1/chain/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            method
        );
        log::trace!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChainApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ChainApi for HttpChainApi {
    type Error = ChainApiError;

    async fn get_table_rows(
        &self,
        query: &TableRowsQuery,
    ) -> Result<Vec<serde_json::Value>, Self::Error> {
        let rows: TableRows = self.post("get_table_rows", query).await?;
        Ok(rows.rows)
    }

    async fn get_account(&self, name: &str) -> Result<Account, Self::Error> {
        self.post("get_account", &AccountName { account_name: name })
            .await
    }
}
