//! Type Definitions adhering to the [DID Specification](https://www.w3.org/TR/did-core/#abstract)
//! for both families of did:infra documents.

mod did;
mod did_parser;
mod infra;
mod keys;
mod ss58;

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

pub use did::*;
pub use did_parser::*;
pub use infra::*;
pub use keys::*;
pub use ss58::*;

use crate::error::ResolverError;

/// The DID core context, shared by both document families
pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// Content type reported in the resolution metadata of a resolved document
pub const DID_LD_JSON: &str = "application/did+ld+json";

/// A resolved did:infra document.
///
/// The account-based chain and the SS58 chain produce documents of different shapes: the
/// former uses a single `#controller` key and a plain string `@context`, the latter one
/// `#keys-N` entry per on-chain key and an array `@context`. Both are kept as-is.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum DidDocument {
    Legacy(LegacyDocument),
    Current(CurrentDocument),
}

impl DidDocument {
    pub fn id(&self) -> &str {
        match self {
            DidDocument::Legacy(doc) => &doc.id,
            DidDocument::Current(doc) => &doc.id,
        }
    }

    pub fn as_legacy(&self) -> Option<&LegacyDocument> {
        match self {
            DidDocument::Legacy(doc) => Some(doc),
            DidDocument::Current(_) => None,
        }
    }

    pub fn as_current(&self) -> Option<&CurrentDocument> {
        match self {
            DidDocument::Current(doc) => Some(doc),
            DidDocument::Legacy(_) => None,
        }
    }
}

impl From<LegacyDocument> for DidDocument {
    fn from(doc: LegacyDocument) -> Self {
        DidDocument::Legacy(doc)
    }
}

impl From<CurrentDocument> for DidDocument {
    fn from(doc: CurrentDocument) -> Self {
        DidDocument::Current(doc)
    }
}

/// Document for account and public-key identifiers, built by [`InfraBuilder`]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LegacyDocument {
    #[serde(rename = "@context")]
    pub context: Url,
    pub id: String,
    #[serde(default, rename = "verificationMethod")]
    pub verification_method: Vec<VerificationMethod>,
    #[serde(default)]
    pub authentication: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<Service>,
}

/// Document for SS58 address identifiers, built by [`Ss58Builder`]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CurrentDocument {
    #[serde(rename = "@context")]
    pub context: Vec<Url>,
    pub id: String,
    #[serde(default)]
    pub controller: Vec<String>,
    #[serde(default, rename = "verificationMethod", alias = "publicKey")]
    pub verification_method: Vec<VerificationMethod>,
    #[serde(default)]
    pub authentication: Vec<String>,
    #[serde(default, rename = "assertionMethod")]
    pub assertion_method: Vec<String>,
    #[serde(default, rename = "keyAgreement")]
    pub key_agreement: Vec<String>,
    #[serde(default, rename = "capabilityInvocation")]
    pub capability_invocation: Vec<String>,
    #[serde(default, rename = "ATTESTS_IRI")]
    pub attests_iri: Option<String>,
    #[serde(default)]
    pub service: Vec<Service>,
}

/// Represents a service associated with a DID.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Service {
    /// The unique identifier of the service.
    pub id: String,
    /// The type of the service (e.g., messaging, linked domains, etc.).
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    /// Where the service can be reached.
    #[serde(rename = "serviceEndpoint")]
    pub service_endpoint: ServiceEndpoint,
}

/// A single endpoint written as an attribute value, or the list of origins of a
/// `LinkedDomains` service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ServiceEndpoint {
    Uri(String),
    Origins(Vec<String>),
}

/// Represents different types of services associated with a DID.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum ServiceType {
    /// Type given to `svc` attributes that don't name one
    Agent,
    Messaging,
    /// The only service type stored by the SS58 did module
    LinkedDomains,
    /// Other Service type, not directly supported
    Other(String),
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::Agent => write!(f, "AgentService"),
            ServiceType::Messaging => write!(f, "MessagingService"),
            ServiceType::LinkedDomains => write!(f, "LinkedDomains"),
            ServiceType::Other(other) => write!(f, "{}", other),
        }
    }
}

impl From<String> for ServiceType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "AgentService" => ServiceType::Agent,
            "MessagingService" => ServiceType::Messaging,
            "LinkedDomains" => ServiceType::LinkedDomains,
            _ => ServiceType::Other(s),
        }
    }
}

impl<'a> From<&'a str> for ServiceType {
    fn from(s: &'a str) -> Self {
        ServiceType::from(s.to_string())
    }
}

impl From<ServiceType> for String {
    fn from(t: ServiceType) -> Self {
        t.to_string()
    }
}

/// Describes a method for verifying a DID.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VerificationMethod {
    /// The unique identifier of the verification method, a DID URL with a fragment.
    pub id: String,
    /// The type of the verification method (e.g., cryptographic key type).
    #[serde(rename = "type")]
    pub verification_type: KeyType,
    /// The DID of the controller for this verification method.
    pub controller: String,
    /// the public key and its encoding
    #[serde(flatten)]
    pub verification_properties: VerificationMethodProperties,
}

/// Public key material of a [`VerificationMethod`]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum VerificationMethodProperties {
    /// Public key encoded as hex
    PublicKeyHex {
        #[serde(rename = "publicKeyHex")]
        public_key_hex: String,
    },
    /// Public key encoded as base58
    PublicKeyBase58 {
        #[serde(rename = "publicKeyBase58")]
        public_key_base58: String,
    },
}

/// Verification method types emitted by did:infra, from the [DID Specification Registries](https://www.w3.org/TR/did-spec-registries/#verification-method-types)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum KeyType {
    EcdsaSecp256k1VerificationKey2019,
    Ed25519VerificationKey2018,
    Sr25519VerificationKey2020,
    Bls12381G2VerificationKeyDock2022,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::EcdsaSecp256k1VerificationKey2019 => write!(f, "Secp256k1"),
            KeyType::Ed25519VerificationKey2018 => write!(f, "Ed25519"),
            KeyType::Sr25519VerificationKey2020 => write!(f, "Sr25519"),
            KeyType::Bls12381G2VerificationKeyDock2022 => write!(f, "Bls12381G2"),
        }
    }
}

/// An attribute row name of the DID registry contract, returned from [`parse_attribute`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// `svc[/<type>]`
    Service(ServiceType),
    /// any other tag, kept for forward compatibility but not interpreted
    Other(String),
}

/// Value of `error` in [`DidResolutionMetadata`]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ResolutionErrorCode {
    InvalidDid,
    UnknownNetwork,
    NotFound,
}

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct DidDocumentMetadata {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deactivated: bool,
}

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct DidResolutionMetadata {
    #[serde(default, rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResolutionErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DidResolutionResult {
    #[serde(rename = "didResolutionMetadata")]
    pub resolution_metadata: DidResolutionMetadata,
    #[serde(rename = "didDocument")]
    pub document: Option<DidDocument>,
    #[serde(default, rename = "didDocumentMetadata")]
    pub metadata: DidDocumentMetadata,
}

impl DidResolutionResult {
    /// A successful resolution of `document`
    pub fn resolved(document: impl Into<DidDocument>, deactivated: bool) -> Self {
        Self {
            resolution_metadata: DidResolutionMetadata {
                content_type: Some(DID_LD_JSON.to_string()),
                ..Default::default()
            },
            document: Some(document.into()),
            metadata: DidDocumentMetadata { deactivated },
        }
    }

    /// A failed resolution, the document is always `null`
    pub fn failed(err: &ResolverError) -> Self {
        Self {
            resolution_metadata: DidResolutionMetadata {
                error: Some(err.code()),
                message: Some(err.to_string()),
                ..Default::default()
            },
            document: None,
            metadata: DidDocumentMetadata::default(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.resolution_metadata.error.is_some()
    }
}

/// Join a DID and a fragment into a DID URL
pub(crate) fn with_fragment(did: &str, fragment: &str) -> String {
    format!("{did}#{fragment}")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::DidError;
    use serde_json::json;

    #[test]
    fn test_serialization_of_legacy_document() {
        let did = "did:infra:01:PUB_K1_7nxEa8qHEiy34dpuYH4yE2zRWaAoeT1gsdTnh8n5ikapZZrzjx";
        let sample_did = json!({
            "@context": "https://www.w3.org/ns/did/v1",
            "id": did,
            "verificationMethod": [
                {
                    "id": format!("{did}#controller"),
                    "type": "EcdsaSecp256k1VerificationKey2019",
                    "controller": did,
                    "publicKeyHex": "037e84547231650e816a32eb5b79028e71ac7459bbcd8e81e6697ac9022e64a407"
                }
            ],
            "authentication": [format!("{did}#controller")],
            "service": [
                {
                    "id": format!("{did}#service-1"),
                    "type": "MessagingService",
                    "serviceEndpoint": "https://infradid.com/pk/3/mysvcr4"
                }
            ]
        });
        let doc: DidDocument = serde_json::from_value(sample_did.clone()).unwrap();
        let legacy = doc.as_legacy().unwrap();
        assert_eq!(legacy.service[0].service_type, ServiceType::Messaging);
        assert_eq!(
            legacy.service[0].service_endpoint,
            ServiceEndpoint::Uri("https://infradid.com/pk/3/mysvcr4".into())
        );
        assert_eq!(doc.id(), did);
        assert_eq!(serde_json::to_value(doc).unwrap(), sample_did);
    }

    #[test]
    fn test_serialization_of_current_document() {
        let did = "did:infra:02:5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";
        let sample_did = json!({
            "@context": ["https://www.w3.org/ns/did/v1"],
            "id": did,
            "controller": [did],
            "verificationMethod": [
                {
                    "id": format!("{did}#keys-1"),
                    "type": "Ed25519VerificationKey2018",
                    "controller": did,
                    "publicKeyBase58": "8GJHdnKzb7cW4ZENVpfeYWbPeKEhTGLbfRnbavB53gqY"
                }
            ],
            "authentication": [format!("{did}#keys-1")],
            "assertionMethod": [],
            "keyAgreement": [],
            "capabilityInvocation": [],
            "ATTESTS_IRI": null,
            "service": [
                {
                    "id": "linked-1",
                    "type": "LinkedDomains",
                    "serviceEndpoint": ["https://infradid.com"]
                }
            ]
        });
        let doc: DidDocument = serde_json::from_value(sample_did.clone()).unwrap();
        let current = doc.as_current().unwrap();
        assert_eq!(current.service[0].service_type, ServiceType::LinkedDomains);
        assert!(doc.as_legacy().is_none());
        assert_eq!(serde_json::to_value(doc).unwrap(), sample_did);
    }

    #[test]
    fn test_resolution_result_envelopes() {
        let err = ResolverError::Did(DidError::MissingNetwork("did:infra:abc".into()));
        let failed = DidResolutionResult::failed(&err);
        assert!(failed.is_error());
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({
                "didResolutionMetadata": {
                    "error": "invalidDid",
                    "message": "invalid did, needs network identifier part and id part (did:infra:abc)"
                },
                "didDocument": null,
                "didDocumentMetadata": {}
            })
        );

        let err = ResolverError::UnknownNetwork("99".into());
        assert_eq!(
            DidResolutionResult::failed(&err).resolution_metadata.error,
            Some(ResolutionErrorCode::UnknownNetwork)
        );
        let err = ResolverError::UnsupportedCurve("Bn254".into());
        assert_eq!(
            DidResolutionResult::failed(&err).resolution_metadata.error,
            Some(ResolutionErrorCode::NotFound)
        );
    }

    #[test]
    fn test_deactivated_only_serialized_when_set() {
        let meta = DidDocumentMetadata { deactivated: false };
        assert_eq!(serde_json::to_value(meta).unwrap(), json!({}));
        let meta = DidDocumentMetadata { deactivated: true };
        assert_eq!(
            serde_json::to_value(meta).unwrap(),
            json!({ "deactivated": true })
        );
    }

    #[test]
    fn test_service_type_round_trips_through_strings() {
        assert_eq!(String::from(ServiceType::Agent), "AgentService");
        assert_eq!(ServiceType::from("MessagingService"), ServiceType::Messaging);
        assert_eq!(
            ServiceType::from("HubService"),
            ServiceType::Other("HubService".into())
        );
    }

    #[test]
    fn test_keytype_to_str() {
        assert_eq!(
            KeyType::EcdsaSecp256k1VerificationKey2019.to_string(),
            "Secp256k1"
        );
        assert_eq!(KeyType::Ed25519VerificationKey2018.to_string(), "Ed25519");
        assert_eq!(KeyType::Sr25519VerificationKey2020.to_string(), "Sr25519");
        assert_eq!(
            KeyType::Bls12381G2VerificationKeyDock2022.to_string(),
            "Bls12381G2"
        );
    }
}
