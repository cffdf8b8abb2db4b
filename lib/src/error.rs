use thiserror::Error;

use crate::types::ResolutionErrorCode;

/// Errors originating from resolution with the [`InfraDidResolver`](crate::InfraDidResolver)
/// or the [`InfraSs58Resolver`](crate::InfraSs58Resolver)
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error(transparent)]
    Did(#[from] DidError),
    #[error("no chain network configured for network identifier {0}")]
    UnknownNetwork(String),
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error("unsupported public key type {0}")]
    UnsupportedKeyType(String),
    #[error("Curve type should have been Bls12381 but was {0}")]
    UnsupportedCurve(String),
    #[error("Only \"LinkedDomains\" supported as service endpoint type for now but found {0}")]
    UnsupportedServiceType(u32),
    #[error("DID {found} was found to be different than queried DID {queried}")]
    ConsistencyViolation { found: String, queried: String },
    #[error("DID key id {found} exceeds the supported maximum {max}")]
    KeyIdLimit { found: u32, max: u32 },
    #[error("DID {0} does not exist on chain")]
    NotFound(String),
    #[error("Malformed table row, {0}")]
    Row(#[from] serde_json::Error),
    #[error("{0}")]
    Client(String),
}

impl ResolverError {
    /// The `error` value reported in the resolution metadata for this error.
    pub fn code(&self) -> ResolutionErrorCode {
        match self {
            ResolverError::Did(_) => ResolutionErrorCode::InvalidDid,
            ResolverError::UnknownNetwork(_) => ResolutionErrorCode::UnknownNetwork,
            _ => ResolutionErrorCode::NotFound,
        }
    }
}

/// Errors originating from the parsing of a did:infra identifier, [`Did`](crate::types::Did)
#[derive(Error, Debug, PartialEq)]
pub enum DidError {
    #[error("Parsing of did:infra failed, {0}")]
    Parse(#[from] peg::error::ParseError<peg::str::LineCol>),
    #[error("invalid did, needs network identifier part and id part ({0})")]
    MissingNetwork(String),
    #[error("The identifier must be 32 bytes and valid SS58 string, {0}")]
    Address(KeyError),
}

/// Errors originating from decoding a public key or an on-chain address.
#[derive(Error, Debug, PartialEq)]
pub enum KeyError {
    #[error("unrecognized public key format {0}")]
    Format(String),
    #[error(transparent)]
    Base58(#[from] bs58::decode::Error),
    #[error(transparent)]
    Hex(#[from] hex::FromHexError),
    #[error("expected {expected} bytes, found {found}")]
    Length { expected: usize, found: usize },
    #[error("checksum doesn't match")]
    Checksum,
    #[error("unsupported SS58 address prefix {0}")]
    Prefix(u8),
}

/// Errors raised while configuring networks, see [`NetworkRegistry`](crate::NetworkRegistry)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("InfraDIDResolver requires a provider configuration for at least one network")]
    NoNetworks,
    #[error("Chain network configuration for {0} was provided more than once")]
    Duplicate(String),
    #[error("expected `networkId,registryContract,rpcEndpoint`, found `{0}`")]
    Descriptor(String),
    #[error("Chain network configuration for {id} was attempted but no valid configuration was provided")]
    Network {
        id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Errors originating from the HTTP chain API adapter, [`HttpChainApi`](crate::HttpChainApi)
#[derive(Error, Debug)]
pub enum ChainApiError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error("chain api endpoint must be http(s), found `{0}`")]
    Scheme(String),
    #[error("chain api responded with {status}: {body}")]
    Status { status: u16, body: String },
}
