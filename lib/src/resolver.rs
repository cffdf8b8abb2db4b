//! DID Identity Resolvers
pub mod chain_api;
pub mod did_module;
mod http;
mod ss58;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use self::chain_api::{
    AccountDidAttributeRow, ChainApi, IndexKeyType, PubKeyDidOwnerRow, PubKeyDidRow,
    TableRowsQuery, ACCOUNT_DID_ATTRIBUTE_TABLE, PUB_KEY_DID_OWNER_TABLE, PUB_KEY_DID_TABLE,
};
use crate::{
    config::{ConfiguredNetwork, NetworkRegistry, ResolverOptions},
    error::{ConfigError, ResolverError},
    types::{
        Did, DidResolutionResult, InfraBuilder, KeyAlgorithm, KeyRecord, LegacyDocument, Subject,
    },
};

pub use http::HttpChainApi;
pub use ss58::{InfraSs58Resolver, Ss58ResolveOptions, MAX_KEY_ID};

/// The DID method both resolvers are registered under
pub const METHOD_NAME: &str = "infra";

/// `nonce` of a `pubkeydid` row whose DID has been revoked
pub const REVOKED_PUB_KEY_DID_NONCE: u64 = 65535;

/// A resolver for one DID method, the shape a DID router dispatches to.
/// Resolution never fails, errors are reported in the [`DidResolutionResult`].
#[async_trait]
pub trait MethodResolver: Send + Sync {
    fn method(&self) -> &'static str {
        METHOD_NAME
    }

    async fn resolve(&self, did: &str) -> DidResolutionResult;
}

/// A document of the account-based chain and whether its DID was revoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDocument {
    pub document: LegacyDocument,
    pub deactivated: bool,
}

/// A resolver for account and public-key did:infra identifiers, reading the DID registry contract
/// of the network named in the identifier.
pub struct InfraDidResolver<C> {
    networks: NetworkRegistry<C>,
    no_revocation_check: bool,
}

impl<C> From<NetworkRegistry<C>> for InfraDidResolver<C> {
    fn from(networks: NetworkRegistry<C>) -> Self {
        Self {
            networks,
            no_revocation_check: false,
        }
    }
}

impl InfraDidResolver<HttpChainApi> {
    /// Instantiate a resolver reading each configured network over HTTP
    pub fn new(options: &ResolverOptions) -> Result<Self, ConfigError> {
        let networks = NetworkRegistry::connect(&options.networks)?;
        Ok(Self::from(networks).no_revocation_check(options.no_revocation_check))
    }
}

impl<C: ChainApi> InfraDidResolver<C> {
    /// Skip revocation checks, revoked public-key DIDs resolve as active
    pub fn no_revocation_check(mut self, no_revocation_check: bool) -> Self {
        self.no_revocation_check = no_revocation_check;
        self
    }

    pub fn networks(&self) -> &NetworkRegistry<C> {
        &self.networks
    }

    /// Resolve a did:infra identifier
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn resolve_did(&self, did: &str) -> DidResolutionResult {
        match Did::parse(did) {
            Ok(parsed) => self.resolve_parsed(did, &parsed).await,
            Err(e) => DidResolutionResult::failed(&e.into()),
        }
    }

    /// Resolve a did:infra identifier from the part following `did:infra:`
    pub async fn resolve_method_specific_id(
        &self,
        did: &str,
        method_specific_id: &str,
    ) -> DidResolutionResult {
        match Did::from_method_specific_id(did, method_specific_id) {
            Ok(parsed) => self.resolve_parsed(did, &parsed).await,
            Err(e) => DidResolutionResult::failed(&e.into()),
        }
    }

    async fn resolve_parsed(&self, did: &str, parsed: &Did) -> DidResolutionResult {
        let Some(network) = self.networks.get(&parsed.network_id) else {
            return DidResolutionResult::failed(&ResolverError::UnknownNetwork(
                parsed.network_id.clone(),
            ));
        };

        let resolved = match parsed.subject() {
            Subject::PublicKey(key) => self.resolve_public_key_did(did, key, network).await,
            Subject::Account(name) => self.resolve_account_did(did, name, network).await,
        };

        match resolved {
            Ok(ResolvedDocument {
                document,
                deactivated,
            }) => DidResolutionResult::resolved(document, deactivated),
            Err(e) => {
                log::debug!("resolution of {} failed: {}", did, e);
                DidResolutionResult::failed(&e)
            }
        }
    }

    /// Resolve the DID of `public_key`. A key the registry has no row for resolves to a
    /// document with the key itself as controller.
    pub async fn resolve_public_key_did(
        &self,
        did: &str,
        public_key: &str,
        network: &ConfiguredNetwork<C>,
    ) -> Result<ResolvedDocument, ResolverError> {
        let mut controller_key = k1_key(public_key)?;
        let mut builder = InfraBuilder::new(did);
        let mut deactivated = false;

        let query = TableRowsQuery::registry(&network.registry_contract, PUB_KEY_DID_TABLE)
            .index(2, IndexKeyType::Sha256)
            .exactly(controller_key.index())
            .limit(1);
        let row = fetch_rows::<_, PubKeyDidRow>(network, &query)
            .await?
            .into_iter()
            .next();

        if let Some(row) = row {
            log::trace!("{} has registry row pkid {}", did, row.pkid);
            builder.attributes(&row.attr);

            if let Some(owner) = self.owner_key(network, row.pkid).await? {
                log::debug!("{} is controlled by owner key {}", did, owner);
                controller_key = owner;
            }

            if row.nonce == REVOKED_PUB_KEY_DID_NONCE {
                if self.no_revocation_check {
                    log::debug!("{} is revoked, revocation check disabled", did);
                } else {
                    log::debug!("{} is revoked", did);
                    deactivated = true;
                }
            }
        }

        builder.controller_key(controller_key);
        Ok(ResolvedDocument {
            document: builder.build(),
            deactivated,
        })
    }

    /// The owner key overriding the controller of the public-key DID `pkid`
    async fn owner_key(
        &self,
        network: &ConfiguredNetwork<C>,
        pkid: u64,
    ) -> Result<Option<KeyRecord>, ResolverError> {
        let query = TableRowsQuery::registry(&network.registry_contract, PUB_KEY_DID_OWNER_TABLE)
            .index(1, IndexKeyType::I64)
            .lower_bound(pkid.to_string())
            .limit(1);
        let row = fetch_rows::<_, PubKeyDidOwnerRow>(network, &query)
            .await?
            .into_iter()
            .next();

        match row {
            // the lower bound matches the next pkid when this one has no owner
            Some(row) if row.pkid == pkid => Ok(Some(k1_key(&row.owner_pk)?)),
            _ => Ok(None),
        }
    }

    /// Resolve the DID of the account `account_name`. The controller key is the key of the
    /// account's `active` permission, omitted unless that permission is a single key authority.
    pub async fn resolve_account_did(
        &self,
        did: &str,
        account_name: &str,
        network: &ConfiguredNetwork<C>,
    ) -> Result<ResolvedDocument, ResolverError> {
        let account = network
            .client
            .get_account(account_name)
            .await
            .map_err(|e| ResolverError::Client(e.to_string()))?;

        let mut builder = InfraBuilder::new(did);
        match account.active_key() {
            Some(key) => builder.controller_key(k1_key(key)?),
            None => log::warn!(
                "active permission of {} is not a single key authority, omitting controller key",
                account_name
            ),
        }

        let query =
            TableRowsQuery::registry(&network.registry_contract, ACCOUNT_DID_ATTRIBUTE_TABLE)
                .index(1, IndexKeyType::Name)
                .exactly(account_name)
                .limit(1);
        let row = fetch_rows::<_, AccountDidAttributeRow>(network, &query)
            .await?
            .into_iter()
            .next();
        if let Some(row) = row {
            builder.attributes(&row.attr);
        }

        Ok(ResolvedDocument {
            document: builder.build(),
            deactivated: false,
        })
    }
}

#[async_trait]
impl<C: ChainApi> MethodResolver for InfraDidResolver<C> {
    async fn resolve(&self, did: &str) -> DidResolutionResult {
        self.resolve_did(did).await
    }
}

/// Decodes a chain key string, only secp256k1 keys control a DID
fn k1_key(key: &str) -> Result<KeyRecord, ResolverError> {
    let key: KeyRecord = key.parse()?;
    if key.algorithm != KeyAlgorithm::K1 {
        return Err(ResolverError::UnsupportedKeyType(key.algorithm.to_string()));
    }
    Ok(key)
}

async fn fetch_rows<C: ChainApi, R: DeserializeOwned>(
    network: &ConfiguredNetwork<C>,
    query: &TableRowsQuery,
) -> Result<Vec<R>, ResolverError> {
    log::trace!(
        "reading {} of {}, bounds {:?}..{:?}",
        query.table,
        query.code,
        query.lower_bound,
        query.upper_bound
    );
    let rows = network
        .client
        .get_table_rows(query)
        .await
        .map_err(|e| ResolverError::Client(e.to_string()))?;
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(ResolverError::from))
        .collect()
}
