//! did:infra resolver library
//!
//! This library provides resolvers for did:infra DIDs according to the W3C [specification](https://www.w3.org/TR/did-core/#abstract).
//! did:infra identifiers come in two families:
//!
//! * `did:infra:<network-id>:<account-name>` and `did:infra:<network-id>:<public-key>` DIDs of
//!   the account-based chain, resolved by [`InfraDidResolver`] from the chain's DID registry
//!   contract.
//! * `did:infra:<network-id>:<ss58-address>` DIDs of the SS58 chain, resolved by
//!   [`InfraSs58Resolver`] from the chain's DID module.
//!
//! Provided functions include parsing did:infra identifiers, resolving them, and constructing
//! did:infra documents and associated metadata.
//!
//! # Examples
//!
//! ## Instantiating the [`InfraDidResolver`] struct
//! An [`InfraDidResolver`] requires, for every network it resolves, the account of the deployed
//! DID registry contract and the HTTP endpoint of a chain node.
//!
//! Once instantiated, DID Documents may be built by resolving DIDs.
//! ```rust, no_run
//! use lib_infradidresolver::{InfraDidResolver, NetworkConfiguration, ResolverOptions};
//!
//! # tokio_test::block_on(async {
//! let options = ResolverOptions {
//!     networks: vec![NetworkConfiguration {
//!         network_id: "01".into(),
//!         registry_contract: "infradidregi".into(),
//!         rpc_endpoint: "http://localhost:8888".into(),
//!     }],
//!     no_revocation_check: false,
//! };
//! let resolver = InfraDidResolver::new(&options).unwrap();
//!
//! let result = resolver
//!     .resolve_did("did:infra:01:PUB_K1_7nxEa8qHEiy34dpuYH4yE2zRWaAoeT1gsdTnh8n5ikapZZrzjx")
//!     .await;
//! assert!(!result.is_error());
//! # })
//! ```
//!
//! # Cargo Feature Flags
//!
//! `server` enables the JSON-RPC server api for did:infra resolution
//!
//! `client` enables the JSON-RPC client for the did:infra server
//!
//! ### Using the Server
//! ``` no_run
//! # #[cfg(feature = "server")]
//! # {
//! use jsonrpsee::server::Server;
//! use lib_infradidresolver::{
//!     rpc::DidResolverMethods, DidResolverServer, InfraDidResolver, ResolverOptions,
//! };
//!
//! # tokio_test::block_on(async {
//! let options: ResolverOptions = serde_json::from_str(r#"{
//!     "networks": [{
//!         "networkId": "01",
//!         "registryContract": "infradidregi",
//!         "rpcEndpoint": "http://localhost:8888"
//!     }]
//! }"#).unwrap();
//! let resolver = InfraDidResolver::new(&options).unwrap();
//! let server = Server::builder().build("127.0.0.1:0").await.unwrap();
//!
//! let handle = server.start(DidResolverMethods::new(resolver).into_rpc());
//! handle.stopped().await;
//! # })
//! # }
//! ```
//!
//! ### Using the Client
//!
//! ```no_run
//! # #[cfg(feature = "client")]
//! # {
//! use jsonrpsee::ws_client::WsClientBuilder;
//! use lib_infradidresolver::DidResolverClient;
//!
//! # tokio_test::block_on(async {
//! let client = WsClientBuilder::default().build("ws://127.0.0.1:9999").await.unwrap();
//! let result = client.resolve_did("did:infra:01:infraacc1".into()).await.unwrap();
//! # })
//! # }
//! ```

pub mod config;
pub mod error;
mod resolver;
pub mod types;
mod util;

#[cfg(any(feature = "server", feature = "client"))]
pub mod rpc;

pub use crate::config::{ConfiguredNetwork, NetworkConfiguration, NetworkRegistry, ResolverOptions};
pub use crate::resolver::{
    chain_api, did_module, HttpChainApi, InfraDidResolver, InfraSs58Resolver, MethodResolver,
    ResolvedDocument, Ss58ResolveOptions, MAX_KEY_ID, METHOD_NAME, REVOKED_PUB_KEY_DID_NONCE,
};

#[cfg(feature = "server")]
pub use rpc::DidResolverServer;

#[cfg(feature = "client")]
pub use rpc::DidResolverClient;
