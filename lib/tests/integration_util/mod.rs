//! Shared setup code for integration tests
use std::{collections::HashMap, future::Future, sync::Once, time::Duration};

use async_trait::async_trait;
use futures::future::FutureExt;
use jsonrpsee::{
    server::Server,
    ws_client::{WsClient, WsClientBuilder},
};
use lib_infradidresolver::{
    chain_api::{Account, Authority, ChainApi, KeyWeight, Permission, TableRowsQuery},
    rpc::DidResolverMethods,
    DidResolverServer, InfraDidResolver, NetworkConfiguration, NetworkRegistry,
};
use serde_json::Value;
use tokio::time::timeout as timeout_tokio;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub const NETWORK: &str = "local";
pub const REGISTRY: &str = "reg1";

static INIT: Once = Once::new();

pub(crate) fn init_logging() {
    INIT.call_once(|| {
        let fmt = fmt::layer().compact();
        Registry::default()
            .with(EnvFilter::from_default_env())
            .with(fmt)
            .init()
    })
}

#[derive(Debug, thiserror::Error)]
#[error("no such account {0}")]
pub struct UnknownAccount(String);

/// Chain state served to the resolver under test, table rows are keyed by `(table, lower_bound)`
#[derive(Debug, Clone, Default)]
pub struct Chain {
    rows: HashMap<(String, String), Vec<Value>>,
    accounts: HashMap<String, Account>,
}

impl Chain {
    pub fn row(mut self, table: &str, lower_bound: &str, row: Value) -> Self {
        self.rows
            .entry((table.to_string(), lower_bound.to_string()))
            .or_default()
            .push(row);
        self
    }

    /// An account whose `active` permission is the single key `key`
    pub fn account(mut self, name: &str, key: &str) -> Self {
        self.accounts.insert(
            name.to_string(),
            Account {
                account_name: name.to_string(),
                permissions: vec![Permission {
                    perm_name: "active".into(),
                    parent: "owner".into(),
                    required_auth: Authority {
                        threshold: 1,
                        keys: vec![KeyWeight {
                            key: key.to_string(),
                            weight: 1,
                        }],
                    },
                }],
            },
        );
        self
    }
}

#[async_trait]
impl ChainApi for Chain {
    type Error = UnknownAccount;

    async fn get_table_rows(&self, query: &TableRowsQuery) -> Result<Vec<Value>, Self::Error> {
        assert_eq!(query.code, REGISTRY);
        assert_eq!(query.scope, REGISTRY);
        Ok(self
            .rows
            .get(&(query.table.clone(), query.lower_bound.clone()))
            .cloned()
            .unwrap_or_default())
    }

    async fn get_account(&self, name: &str) -> Result<Account, Self::Error> {
        self.accounts
            .get(name)
            .cloned()
            .ok_or_else(|| UnknownAccount(name.to_string()))
    }
}

/// Test harness for using a WebSockets Server
/// Optionally provide a timeout [`std::time::Duration`] deadline by which the test must
/// finish.
///
/// # Panics
///
/// If `fun` panics, the test will end upon reaching `timeout`. Default timeout is one second.
pub async fn with_client<F, R, T>(chain: Chain, timeout: Option<Duration>, fun: F) -> T
where
    F: FnOnce(WsClient) -> R + 'static,
    R: Future<Output = T> + FutureExt + Send + 'static,
{
    init_logging();

    let networks = NetworkRegistry::configure(
        &[NetworkConfiguration {
            network_id: NETWORK.into(),
            registry_contract: REGISTRY.into(),
            rpc_endpoint: "http://127.0.0.1:8888".into(),
        }],
        |_| Ok::<_, UnknownAccount>(chain.clone()),
    )
    .unwrap();
    let resolver = InfraDidResolver::from(networks);

    let server = Server::builder().build("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();
    let handle = server.start(DidResolverMethods::new(resolver).into_rpc());

    let client = WsClientBuilder::default()
        .build(&format!("ws://{addr}"))
        .await
        .unwrap();

    // cant catch_unwind b/c jsonrpsee uses tokio mpsc which is !UnwindSafe, so we wrap with a
    // timeout.
    // If we panic in the closure without the timeout or catch_unwind, we never return and the
    // server will never stop, hanging our tests.
    let result = timeout_tokio(timeout.unwrap_or(Duration::from_secs(1)), fun(client)).await;

    handle.stop().unwrap();
    handle.stopped().await;

    if result.is_err() {
        log::debug!("Test timed out due to panic, or running too long.");
    }
    result.unwrap()
}
