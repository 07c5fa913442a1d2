//! Read-only REST client for a Cosmos SDK chain

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use neutron_harness_core::poll::BlockWaiter;
use neutron_harness_core::types::{BlockWaitConfig, ChainEndpoint};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, trace};
use url::Url;

use crate::error::ChainError;
use crate::types::{
    BalanceResponse, Coin, LatestBlockResponse, RegisteredQuery, RegisteredQueryResponse,
    SmartQueryResponse,
};

/// REST (LCD) client for one chain
///
/// Cloning is cheap and clones share the underlying connection pool, so one
/// client can back any number of concurrent pollers.
#[derive(Debug, Clone)]
pub struct RestChainClient {
    http: reqwest::Client,
    base: Url,
    chain_id: String,
    blocks: BlockWaitConfig,
}

impl RestChainClient {
    pub fn new(endpoint: &ChainEndpoint, blocks: BlockWaitConfig) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(endpoint.request_timeout())
            .user_agent(concat!("neutron-harness/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base: normalize_base(&endpoint.rest_url)?,
            chain_id: endpoint.chain_id.clone(),
            blocks,
        })
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn block_wait(&self) -> &BlockWaitConfig {
        &self.blocks
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ChainError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<R: DeserializeOwned>(&self, url: Url) -> Result<R, ChainError> {
        trace!(chain = %self.chain_id, url = %url, "GET");
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ChainError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| ChainError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Height of the latest committed block
    pub async fn latest_height(&self) -> Result<u64, ChainError> {
        let url = self.endpoint(&["cosmos", "base", "tendermint", "v1beta1", "blocks", "latest"])?;
        let response: LatestBlockResponse = self.get_json(url).await?;
        Ok(response.block.header.height)
    }

    /// Wait until at least `blocks` new blocks have been committed, returning
    /// the height that was reached
    ///
    /// Failed height reads while waiting are logged and retried until the
    /// configured timeout; only the initial read must succeed.
    pub async fn wait_for_blocks(&self, blocks: u64) -> Result<u64, ChainError> {
        let start = self.latest_height().await?;
        if blocks == 0 {
            return Ok(start);
        }

        let target = start + blocks;
        let deadline = Instant::now() + self.blocks.timeout();
        let mut current = start;

        loop {
            tokio::time::sleep(self.blocks.poll_interval()).await;

            match self.latest_height().await {
                Ok(height) if height >= target => {
                    trace!(chain = %self.chain_id, start, height, "blocks produced");
                    return Ok(height);
                }
                Ok(height) => current = height,
                Err(err) => {
                    debug!(chain = %self.chain_id, error = %err, "latest height unavailable")
                }
            }

            if Instant::now() >= deadline {
                return Err(ChainError::BlockTimeout {
                    start,
                    target,
                    current,
                    timeout_secs: self.blocks.timeout_secs,
                });
            }
        }
    }

    /// Run a CosmWasm smart query against `contract`
    pub async fn query_contract_smart<Q, R>(&self, contract: &str, msg: &Q) -> Result<R, ChainError>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let encoded = STANDARD.encode(serde_json::to_vec(msg).map_err(ChainError::Encode)?);
        let url = self.endpoint(&[
            "cosmwasm", "wasm", "v1", "contract", contract, "smart", &encoded,
        ])?;
        let response: SmartQueryResponse<R> = self.get_json(url).await?;
        Ok(response.data)
    }

    /// Look up an interchain query registered with the `interchainqueries` module
    pub async fn registered_query(&self, query_id: u64) -> Result<RegisteredQuery, ChainError> {
        let mut url = self.endpoint(&["neutron", "interchainqueries", "registered_query"])?;
        url.query_pairs_mut()
            .append_pair("query_id", &query_id.to_string());
        let response: RegisteredQueryResponse = self.get_json(url).await?;
        Ok(response.registered_query)
    }

    /// Bank balance of `address` in `denom`
    pub async fn balance(&self, address: &str, denom: &str) -> Result<Coin, ChainError> {
        let mut url = self.endpoint(&["cosmos", "bank", "v1beta1", "balances", address, "by_denom"])?;
        url.query_pairs_mut().append_pair("denom", denom);
        let response: BalanceResponse = self.get_json(url).await?;
        Ok(response.balance)
    }
}

#[async_trait]
impl BlockWaiter for RestChainClient {
    type Error = ChainError;

    async fn wait_blocks(&self, blocks: u64) -> Result<(), ChainError> {
        self.wait_for_blocks(blocks).await.map(|_| ())
    }
}

/// Parse the configured REST URL, making sure joined paths keep any prefix
fn normalize_base(raw: &str) -> Result<Url, ChainError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
