//! Chain connection using subxt.
//!
//! One `ChainConnection` owns exactly one WebSocket RPC session. There is no
//! endpoint fallback, pooling or retry: a failed handshake is returned to the
//! caller as-is.

use crate::error::ChainError;
use fellows_core::ChainRole;
use std::future::Future;
use std::time::Duration;

use subxt::backend::rpc::RpcClient;
use subxt::{OnlineClient, PolkadotConfig};

/// A live session to one chain endpoint.
pub struct ChainConnection {
    role: ChainRole,
    endpoint: String,
    rpc_client: RpcClient,
    client: OnlineClient<PolkadotConfig>,
    query_timeout: Option<Duration>,
}

impl ChainConnection {
    /// Open a session to `endpoint` and download its metadata.
    pub async fn connect(role: ChainRole, endpoint: &str) -> Result<Self, ChainError> {
        tracing::info!("Creating client for {} via {}", role, endpoint);

        let rpc_client = RpcClient::from_url(endpoint).await.map_err(|e| {
            tracing::warn!("Failed to connect to {}: {}", endpoint, e);
            ChainError::Connection(format!("{}: {}", endpoint, e))
        })?;

        let client = OnlineClient::<PolkadotConfig>::from_rpc_client(rpc_client.clone())
            .await
            .map_err(|e| {
                tracing::warn!("Failed to create client from {}: {}", endpoint, e);
                ChainError::Connection(format!("{}: {}", endpoint, e))
            })?;

        tracing::info!("Connected to {} via {}", role, endpoint);

        Ok(Self {
            role,
            endpoint: endpoint.to_string(),
            rpc_client,
            client,
            query_timeout: None,
        })
    }

    /// Apply a timeout to every state query made through this connection.
    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Which chain this connection was opened for.
    pub fn role(&self) -> ChainRole {
        self.role
    }

    /// Endpoint URL this connection was opened against.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get the underlying subxt client.
    pub fn client(&self) -> &OnlineClient<PolkadotConfig> {
        &self.client
    }

    /// Get the genesis hash.
    pub fn genesis_hash(&self) -> [u8; 32] {
        self.client.genesis_hash().0
    }

    /// Chain name as reported by the node.
    pub async fn chain_name(&self) -> Result<String, ChainError> {
        self.run_query(async {
            self.rpc_client
                .request::<String>("system_chain", subxt::ext::subxt_rpcs::rpc_params![])
                .await
                .map_err(|e| ChainError::Rpc(e.to_string()))
        })
        .await
    }

    /// Number of the latest finalized block.
    pub async fn finalized_height(&self) -> Result<u32, ChainError> {
        self.run_query(async {
            // at_latest() follows the finalized head
            let block = self.client.blocks().at_latest().await?;
            Ok(block.number())
        })
        .await
    }

    /// Runtime spec version the metadata was fetched for.
    pub fn spec_version(&self) -> u32 {
        self.client.runtime_version().spec_version
    }

    /// Run a query, bounded by the configured timeout if any.
    pub(crate) async fn run_query<T, F>(&self, query: F) -> Result<T, ChainError>
    where
        F: Future<Output = Result<T, ChainError>>,
    {
        match self.query_timeout {
            Some(limit) => tokio::time::timeout(limit, query)
                .await
                .map_err(|_| ChainError::Timeout(limit))?,
            None => query.await,
        }
    }

    /// Close the session.
    pub fn close(self) {
        tracing::info!("Closing connection to {} ({})", self.role, self.endpoint);
        // Dropping the last client handle shuts the WebSocket down
        drop(self);
    }
}

impl std::fmt::Debug for ChainConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainConnection")
            .field("role", &self.role)
            .field("endpoint", &self.endpoint)
            .field("query_timeout", &self.query_timeout)
            .finish()
    }
}
