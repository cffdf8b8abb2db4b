//! did:infra documents of the SS58 chain.
//! [`Ss58Builder`] assembles a [`CurrentDocument`] out of the records the chain's DID module
//! stores for an address: controllers, `#keys-N` entries with their verification
//! relationships, `LinkedDomains` service endpoints and the attestation IRI.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use super::*;
use crate::resolver::did_module::{BbsPlusPublicKey, CurveType, PublicKey, ServiceEndpointRecord};

/// The only service endpoint type the DID module stores
pub const LINKED_DOMAINS: u32 = 0b0001;

/// The verification relationships of an on-chain key, one bit each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct VerificationRelationship(pub u16);

impl VerificationRelationship {
    pub const AUTHENTICATION: u16 = 0b0001;
    pub const ASSERTION: u16 = 0b0010;
    pub const CAPABILITY_INVOCATION: u16 = 0b0100;
    pub const KEY_AGREEMENT: u16 = 0b1000;
    pub const ALL_SIGNING: u16 =
        Self::AUTHENTICATION | Self::ASSERTION | Self::CAPABILITY_INVOCATION;

    /// authentication, assertion and capability invocation
    pub const fn all_signing() -> Self {
        Self(Self::ALL_SIGNING)
    }

    pub const fn is_authentication(self) -> bool {
        self.0 & Self::AUTHENTICATION != 0
    }

    pub const fn is_assertion(self) -> bool {
        self.0 & Self::ASSERTION != 0
    }

    pub const fn is_capability_invocation(self) -> bool {
        self.0 & Self::CAPABILITY_INVOCATION != 0
    }

    pub const fn is_key_agreement(self) -> bool {
        self.0 & Self::KEY_AGREEMENT != 0
    }

    pub const fn with_authentication(self) -> Self {
        Self(self.0 | Self::AUTHENTICATION)
    }

    pub const fn with_assertion(self) -> Self {
        Self(self.0 | Self::ASSERTION)
    }

    pub const fn with_capability_invocation(self) -> Self {
        Self(self.0 | Self::CAPABILITY_INVOCATION)
    }

    pub const fn with_key_agreement(self) -> Self {
        Self(self.0 | Self::KEY_AGREEMENT)
    }
}

impl From<u16> for VerificationRelationship {
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Key {
    key_type: KeyType,
    bytes: Vec<u8>,
    relationship: VerificationRelationship,
}

/// Builder for SS58 DID documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ss58Builder {
    context: Vec<Url>,
    id: String,
    qualifier: String,
    address: Address,
    controller: Vec<String>,
    keys: BTreeMap<u32, Key>,
    attests_iri: Option<String>,
    service: Vec<Service>,
}

impl Ss58Builder {
    /// Starts the document of `address`. The document id is `did` itself, unless the identifier
    /// used the raw `0x` hex form, which is re-encoded to SS58.
    pub fn new(did: &Did, address: &Address) -> Self {
        let id = if did.local_id.starts_with("0x") {
            did.with_local_id(address.to_ss58()).to_string()
        } else {
            did.to_string()
        };
        Self {
            context: vec![Url::parse(DID_CONTEXT).expect("DID context is a valid URL")],
            id,
            qualifier: did.qualifier(),
            address: *address,
            controller: Vec::new(),
            keys: BTreeMap::new(),
            attests_iri: None,
            service: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set `ATTESTS_IRI`, the bytes are read as UTF-8
    pub fn attests_iri(&mut self, iri: &[u8]) {
        self.attests_iri = Some(String::from_utf8_lossy(iri).into_owned());
    }

    pub fn controller(&mut self, controller: &Address) {
        self.controller
            .push(format!("{}:{}", self.qualifier, controller.to_ss58()));
    }

    /// Add the on-chain key `#keys-<index>`
    pub fn key(
        &mut self,
        index: u32,
        public_key: &PublicKey,
        relationship: VerificationRelationship,
    ) -> Result<(), ResolverError> {
        let (key_type, bytes) = match public_key {
            PublicKey::Sr25519(bytes) => (KeyType::Sr25519VerificationKey2020, bytes.to_vec()),
            PublicKey::Ed25519(bytes) => (KeyType::Ed25519VerificationKey2018, bytes.to_vec()),
            other => return Err(ResolverError::UnsupportedKeyType(other.name().to_string())),
        };
        self.keys.insert(
            index,
            Key {
                key_type,
                bytes,
                relationship,
            },
        );
        Ok(())
    }

    /// Add a BBS+ key stored outside the DID module, granted assertion only
    pub fn bbs_plus_key(
        &mut self,
        index: u32,
        key: &BbsPlusPublicKey,
    ) -> Result<(), ResolverError> {
        if key.curve_type != CurveType::Bls12381 {
            return Err(ResolverError::UnsupportedCurve(key.curve_type.to_string()));
        }
        self.keys.insert(
            index,
            Key {
                key_type: KeyType::Bls12381G2VerificationKeyDock2022,
                bytes: key.bytes.clone(),
                relationship: VerificationRelationship::default().with_assertion(),
            },
        );
        Ok(())
    }

    pub fn has_key(&self, index: u32) -> bool {
        self.keys.contains_key(&index)
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Add a service endpoint, only `LinkedDomains` endpoints are supported
    pub fn service_endpoint(
        &mut self,
        id: &[u8],
        endpoint: &ServiceEndpointRecord,
    ) -> Result<(), ResolverError> {
        if endpoint.types != LINKED_DOMAINS {
            return Err(ResolverError::UnsupportedServiceType(endpoint.types));
        }
        let origins = endpoint
            .origins
            .iter()
            .map(|origin| String::from_utf8_lossy(origin).into_owned())
            .collect();
        self.service.push(Service {
            id: String::from_utf8_lossy(id).into_owned(),
            service_type: ServiceType::LinkedDomains,
            service_endpoint: ServiceEndpoint::Origins(origins),
        });
        Ok(())
    }

    /// The document of an address the DID module has no record of. Its account key is the only
    /// key and the DID controls itself.
    pub fn off_chain(mut self) -> CurrentDocument {
        self.keys.clear();
        self.keys.insert(
            1,
            Key {
                key_type: KeyType::Sr25519VerificationKey2020,
                bytes: self.address.as_bytes().to_vec(),
                relationship: VerificationRelationship::all_signing(),
            },
        );
        self.controller = vec![self.id.clone()];
        self.service.clear();
        self.attests_iri = None;
        self.build()
    }

    /// Build the DID Document, keys and relationship references ordered by key index
    pub fn build(self) -> CurrentDocument {
        let mut verification_method = Vec::with_capacity(self.keys.len());
        let mut authentication = Vec::new();
        let mut assertion_method = Vec::new();
        let mut key_agreement = Vec::new();
        let mut capability_invocation = Vec::new();

        for (index, key) in &self.keys {
            let id = with_fragment(&self.id, &format!("keys-{index}"));
            if key.relationship.is_authentication() {
                authentication.push(id.clone());
            }
            if key.relationship.is_assertion() {
                assertion_method.push(id.clone());
            }
            if key.relationship.is_capability_invocation() {
                capability_invocation.push(id.clone());
            }
            if key.relationship.is_key_agreement() {
                key_agreement.push(id.clone());
            }
            verification_method.push(VerificationMethod {
                id,
                verification_type: key.key_type,
                controller: self.id.clone(),
                verification_properties: VerificationMethodProperties::PublicKeyBase58 {
                    public_key_base58: bs58::encode(&key.bytes).into_string(),
                },
            });
        }

        CurrentDocument {
            context: self.context,
            id: self.id,
            controller: self.controller,
            verification_method,
            authentication,
            assertion_method,
            key_agreement,
            capability_invocation,
            attests_iri: self.attests_iri,
            service: self.service,
        }
    }
}
