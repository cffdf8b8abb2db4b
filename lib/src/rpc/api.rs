//! Trait Interface Definitions for did:infra JSON-RPC

use crate::types::DidResolutionResult;

use jsonrpsee::{proc_macros::rpc, types::ErrorObjectOwned};

/// Decentralized Identifier JSON-RPC Interface Methods
#[cfg_attr(
    all(feature = "server", not(feature = "client")),
    rpc(server, namespace = "did")
)]
#[cfg_attr(
    all(feature = "client", not(feature = "server")),
    rpc(client, namespace = "did")
)]
#[cfg_attr(
    all(feature = "server", feature = "client"),
    rpc(server, client, namespace = "did")
)]
pub trait DidResolver {
    /// Resolve a did:infra identifier. Resolution failures are reported in the
    /// `didResolutionMetadata` of the result, never as a JSON-RPC error.
    #[method(name = "resolveDid")]
    async fn resolve_did(&self, did: String) -> Result<DidResolutionResult, ErrorObjectOwned>;
}
