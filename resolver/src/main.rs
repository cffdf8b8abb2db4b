//! ## Endpoint Documentation: `did_resolveDid`
//!
//! ### Overview
//!
//! The `did_resolveDid` endpoint receives a did:infra identifier and returns its DID resolution
//! result in JSON format: the DID document, the resolution metadata and the document metadata.
//!
//! Every network the gateway serves is given as `networkId,registryContract,rpcEndpoint`, with
//! `--network` or the `INFRA_NETWORKS` environment variable.
//!
//! ### Endpoint
//!
//! ```text
//! POST
//! ```
//!
//! ### Request Format
//!
//! The request is a JSON-RPC call with a single parameter, `did`.
//!
//! - `did` (string, required): `did:infra:<network-id>:<account-name or public key>`
//!
//! ### Response Format
//!
//! Example Response:
//! ```json
//! {
//!   "didResolutionMetadata": { "contentType": "application/did+ld+json" },
//!   "didDocument": {
//!     "@context": "https://www.w3.org/ns/did/v1",
//!     "id": "did:infra:01:PUB_K1_7nxEa8qHEiy34dpuYH4yE2zRWaAoeT1gsdTnh8n5ikapZZrzjx",
//!     "verificationMethod": [
//!       {
//!         "id": "did:infra:01:PUB_K1_7nxEa8qHEiy34dpuYH4yE2zRWaAoeT1gsdTnh8n5ikapZZrzjx#controller",
//!         "type": "EcdsaSecp256k1VerificationKey2019",
//!         "controller": "did:infra:01:PUB_K1_7nxEa8qHEiy34dpuYH4yE2zRWaAoeT1gsdTnh8n5ikapZZrzjx",
//!         "publicKeyHex": "037e84547231650e816a32eb5b79028e71ac7459bbcd8e81e6697ac9022e64a407"
//!       }
//!     ],
//!     "authentication": [
//!       "did:infra:01:PUB_K1_7nxEa8qHEiy34dpuYH4yE2zRWaAoeT1gsdTnh8n5ikapZZrzjx#controller"
//!     ]
//!   },
//!   "didDocumentMetadata": {}
//! }
//! ```
//!
//! ### Error Handling
//!
//! Resolution errors are reported in `didResolutionMetadata`, the document is then `null`.
//!
//! Example Error Response:
//! ```json
//! {
//!   "didResolutionMetadata": {
//!     "error": "unknownNetwork",
//!     "message": "no chain network configured for network identifier 99"
//!   },
//!   "didDocument": null,
//!   "didDocumentMetadata": {}
//! }
//! ```
//!
//! ### Security and Authentication
//!
//! - The endpoint is open access.
//!
//! ### Example
//!
//! ```bash
//! curl -H "Content-Type: application/json" -d '{"id":1, "jsonrpc":"2.0", "method":"did_resolveDid", "params": { "did":"did:infra:01:infraacc1"} }' http://localhost:8080
//! ```
//!
//! ### Support
//!
//! Please refer to the DID specification: [DID](https://www.w3.org/TR/did-core/)

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use lib_infradidresolver::{
    rpc::DidResolverMethods, DidResolverServer, InfraDidResolver, ResolverOptions,
};

use jsonrpsee::server::Server;

mod argenv;

/// Entrypoint for the did:infra Gateway
pub async fn run() -> Result<()> {
    init_logging();
    load_env()?;
    let opts = argenv::parse_args();

    let server_host = host_from(opts.host, opts.port);
    let server = Server::builder().build(server_host).await?;
    let addr = server.local_addr()?;

    let options = ResolverOptions {
        networks: opts.networks,
        no_revocation_check: opts.no_revocation_check,
    };
    for network in &options.networks {
        log::info!(
            "Serving network {} with registry {} at {}",
            network.network_id,
            network.registry_contract,
            network.rpc_endpoint
        );
    }
    let resolver = InfraDidResolver::new(&options).context(format!(
        "Unable to create a resolver for {} network(s)",
        options.networks.len()
    ))?;

    let handle = server.start(DidResolverMethods::new(resolver).into_rpc());

    log::info!("Server Started at {addr}");
    handle.stopped().await;
    Ok(())
}

fn load_env() -> Result<()> {
    match dotenvy::dotenv_override() {
        Ok(path) => {
            log::debug!("Env file {} was loaded successfully", path.display());
        }
        Err(err) => {
            log::info!("env file(s) not loaded : {err}");
        }
    };
    Ok(())
}

fn host_from(host: String, port: u16) -> String {
    format!("{}:{}", host, port)
}

fn init_logging() {
    let fmt = fmt::layer().compact();
    Registry::default()
        .with(EnvFilter::from_default_env())
        .with(fmt)
        .init()
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_from() {
        assert_eq!(host_from(String::from("abc"), 123), "abc:123");
        assert_eq!(host_from(String::from("abc"), 0), "abc:0");
    }
}
