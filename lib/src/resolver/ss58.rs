//! Resolver for did:infra identifiers of the SS58 chain

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use super::{
    did_module::{DidModuleApi, OnChainDidDetail},
    MethodResolver,
};
use crate::{
    error::{DidError, ResolverError},
    types::{Address, CurrentDocument, Did, DidResolutionResult, Ss58Builder},
};

/// Highest DID key id whose BBS+ key slot is looked up
pub const MAX_KEY_ID: u32 = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, SmartDefault, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ss58ResolveOptions {
    /// merge in BBS+ keys stored under the DID's unused key indices
    #[default(true)]
    #[serde(default = "default_true")]
    pub bbs_plus_keys: bool,
}

fn default_true() -> bool {
    true
}

/// A resolver for did:infra identifiers whose local id is an SS58 address (or its `0x` hex form),
/// reading the chain's DID module.
pub struct InfraSs58Resolver<A> {
    api: A,
    options: Ss58ResolveOptions,
}

impl<A> From<A> for InfraSs58Resolver<A> {
    fn from(api: A) -> Self {
        Self {
            api,
            options: Ss58ResolveOptions::default(),
        }
    }
}

impl<A: DidModuleApi> InfraSs58Resolver<A> {
    pub fn new(api: A, options: Ss58ResolveOptions) -> Self {
        Self { api, options }
    }

    /// Whether `did` is a well-formed SS58 did:infra identifier
    pub fn validate(did: &str) -> bool {
        Did::parse_ss58(did).is_ok()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn resolve_did(&self, did: &str) -> DidResolutionResult {
        match self.resolve_document(did).await {
            Ok(document) => DidResolutionResult::resolved(document, false),
            Err(e) => {
                log::debug!("resolution of {} failed: {}", did, e);
                DidResolutionResult::failed(&e)
            }
        }
    }

    /// Build the document of `did`. An address the DID module has no record of resolves to its
    /// off-chain document.
    pub async fn resolve_document(&self, did: &str) -> Result<CurrentDocument, ResolverError> {
        let parsed = Did::parse(did)?;
        let address = Address::from_str(&parsed.local_id).map_err(DidError::Address)?;
        let mut builder = Ss58Builder::new(&parsed, &address);

        let detail = match self.did_detail(&address).await {
            Ok(detail) => detail,
            Err(ResolverError::NotFound(_)) => {
                log::debug!("{} is not on chain, building its off-chain document", did);
                return Ok(builder.off_chain());
            }
            Err(e) => return Err(e),
        };

        if let Some(iri) = self
            .api
            .attestation(&address)
            .await
            .map_err(client)?
            .and_then(|attestation| attestation.iri)
        {
            builder.attests_iri(&iri);
        }

        if detail.active_controllers > 0 {
            for entry in self.api.controllers(&address).await.map_err(client)? {
                ensure_subject(&entry.controlled, &address)?;
                builder.controller(&entry.controller);
            }
        }

        for entry in self.api.service_endpoints(&address).await.map_err(client)? {
            ensure_subject(&entry.did, &address)?;
            builder.service_endpoint(&entry.id, &entry.endpoint)?;
        }

        if detail.last_key_id > 0 {
            for entry in self.api.keys(&address).await.map_err(client)? {
                ensure_subject(&entry.did, &address)?;
                builder.key(entry.index, &entry.key.public_key, entry.key.ver_rels)?;
            }
        }

        if self.options.bbs_plus_keys {
            self.merge_bbs_plus_keys(&mut builder, &address, &detail)
                .await?;
        }

        Ok(builder.build())
    }

    async fn did_detail(&self, address: &Address) -> Result<OnChainDidDetail, ResolverError> {
        self.api
            .did_detail(address)
            .await
            .map_err(client)?
            .ok_or_else(|| ResolverError::NotFound(address.to_ss58()))
    }

    /// BBS+ keys share the key index space of the DID, the indices without a DID module key may
    /// hold one.
    async fn merge_bbs_plus_keys(
        &self,
        builder: &mut Ss58Builder,
        address: &Address,
        detail: &OnChainDidDetail,
    ) -> Result<(), ResolverError> {
        if detail.last_key_id as usize <= builder.key_count() {
            return Ok(());
        }
        if detail.last_key_id > MAX_KEY_ID {
            return Err(ResolverError::KeyIdLimit {
                found: detail.last_key_id,
                max: MAX_KEY_ID,
            });
        }

        let missing = (1..=detail.last_key_id)
            .filter(|index| !builder.has_key(*index))
            .map(|index| (*address, index))
            .collect::<Vec<_>>();
        log::trace!("looking up {} BBS+ keys of {}", missing.len(), address);

        let keys = self.api.bbs_plus_keys(&missing).await.map_err(client)?;
        if keys.len() != missing.len() {
            return Err(ResolverError::Client(format!(
                "BBS+ key lookup answered {} of {} requested keys",
                keys.len(),
                missing.len()
            )));
        }
        for ((_, index), key) in missing.iter().zip(keys) {
            if let Some(key) = key {
                builder.bbs_plus_key(*index, &key)?;
                log::debug!("merged BBS+ key {} of {}", index, address);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<A: DidModuleApi> MethodResolver for InfraSs58Resolver<A> {
    async fn resolve(&self, did: &str) -> DidResolutionResult {
        self.resolve_did(did).await
    }
}

fn client<E: std::error::Error>(e: E) -> ResolverError {
    ResolverError::Client(e.to_string())
}

fn ensure_subject(found: &Address, queried: &Address) -> Result<(), ResolverError> {
    if found != queried {
        return Err(ResolverError::ConsistencyViolation {
            found: found.to_ss58(),
            queried: queried.to_ss58(),
        });
    }
    Ok(())
}
