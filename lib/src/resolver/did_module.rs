//! Read interface of the SS58 chain's DID module, and the records it stores.
//!
//! The storage layout follows the chain's `did` pallet: a detail record per DID, double maps of
//! keys, controllers and service endpoints keyed by the DID, the attestation pallet's IRI and the
//! BBS+ pallet's public keys keyed by `(did, index)`.

use std::fmt;

use async_trait::async_trait;

use crate::types::{Address, VerificationRelationship};

/// Counters the DID module keeps for an on-chain DID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OnChainDidDetail {
    pub nonce: u64,
    /// the largest key index ever assigned to this DID
    pub last_key_id: u32,
    pub active_controller_keys: u32,
    pub active_controllers: u32,
}

/// A public key as stored by the DID module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    Sr25519([u8; 32]),
    Ed25519([u8; 32]),
    Secp256k1(Vec<u8>),
    X25519([u8; 32]),
}

impl PublicKey {
    pub fn name(&self) -> &'static str {
        match self {
            PublicKey::Sr25519(_) => "Sr25519",
            PublicKey::Ed25519(_) => "Ed25519",
            PublicKey::Secp256k1(_) => "Secp256k1",
            PublicKey::X25519(_) => "X25519",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DidKey {
    pub public_key: PublicKey,
    pub ver_rels: VerificationRelationship,
}

/// One entry of the `did_keys` double map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DidKeyEntry {
    pub did: Address,
    pub index: u32,
    pub key: DidKey,
}

/// One entry of the `did_controllers` double map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerEntry {
    pub controlled: Address,
    pub controller: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpointRecord {
    /// bitflags, `1` is `LinkedDomains`
    pub types: u32,
    pub origins: Vec<Vec<u8>>,
}

/// One entry of the `did_service_endpoints` double map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpointEntry {
    pub did: Address,
    pub id: Vec<u8>,
    pub endpoint: ServiceEndpointRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attestation {
    pub priority: u64,
    pub iri: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveType {
    Bls12381,
    Bn254,
}

impl fmt::Display for CurveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveType::Bls12381 => write!(f, "Bls12381"),
            CurveType::Bn254 => write!(f, "Bn254"),
        }
    }
}

/// A public key of the BBS+ module, stored under the same `(did, index)` key space as the DID
/// module's keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BbsPlusPublicKey {
    pub bytes: Vec<u8>,
    pub curve_type: CurveType,
    /// the `(did, index)` of the signature params this key was generated with
    pub params_ref: Option<(Address, u32)>,
}

/// Storage reads of the DID module used during resolution
#[async_trait]
pub trait DidModuleApi: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// `None` when the DID was never written on chain
    async fn did_detail(&self, did: &Address) -> Result<Option<OnChainDidDetail>, Self::Error>;

    async fn attestation(&self, did: &Address) -> Result<Option<Attestation>, Self::Error>;

    async fn controllers(&self, did: &Address) -> Result<Vec<ControllerEntry>, Self::Error>;

    async fn service_endpoints(
        &self,
        did: &Address,
    ) -> Result<Vec<ServiceEndpointEntry>, Self::Error>;

    async fn keys(&self, did: &Address) -> Result<Vec<DidKeyEntry>, Self::Error>;

    /// Reads all of `keys` in one round trip, the result has one entry per requested key
    async fn bbs_plus_keys(
        &self,
        keys: &[(Address, u32)],
    ) -> Result<Vec<Option<BbsPlusPublicKey>>, Self::Error>;
}
