//! Interface Implementations for did:infra JSON-RPC

use async_trait::async_trait;
use jsonrpsee::types::ErrorObjectOwned;

use super::api::*;
use crate::{resolver::MethodResolver, types::DidResolutionResult};

/// Read-only methods for the did:infra JSON-RPC
pub struct DidResolverMethods<R> {
    resolver: R,
}

/// The implementation of the JSON-RPC trait, [`DidResolverServer`].
impl<R: MethodResolver> DidResolverMethods<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl<R: MethodResolver + 'static> DidResolverServer for DidResolverMethods<R> {
    async fn resolve_did(&self, did: String) -> Result<DidResolutionResult, ErrorObjectOwned> {
        log::debug!("did_resolveDid called");
        Ok(self.resolver.resolve(&did).await)
    }
}
