//! The did:infra identifier, `did:infra:<network-id>:<local-id>`

use std::fmt;

use smart_default::SmartDefault;

use super::{parse_infra_did, parse_method_specific_id, parse_ss58_did, Address};
use crate::error::DidError;

/// Local ids starting with one of these are public-key identifiers, everything else names an account
pub const PUBLIC_KEY_PREFIXES: [&str; 3] = ["PUB_K1_", "PUB_R1_", "EOS"];

/// A parsed did:infra identifier. returned by [`parse_infra_did`]
#[derive(Debug, Clone, PartialEq, Eq, SmartDefault)]
pub struct Did {
    pub method: Method,
    pub network_id: String,
    pub local_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, SmartDefault)]
pub enum Method {
    #[default]
    Infra,
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::Infra => "infra",
        }
    }
}

/// What the local id of an account-chain [`Did`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject<'a> {
    /// an EOSIO public key string
    PublicKey(&'a str),
    /// an account name
    Account(&'a str),
}

impl Did {
    /// Parses a did:infra identifier.
    ///
    /// # Examples
    /// ```
    /// use lib_infradidresolver::types::Did;
    ///
    /// let did = Did::parse("did:not:01:abc").unwrap_err();
    /// assert_eq!(did.to_string(), "Parsing of did:infra failed, error at 1:5: expected one of \"infra\", the only supported method is `infra`");
    ///
    /// let did = Did::parse("did:infra:01:infraacc1").unwrap();
    /// assert_eq!(did.network_id, "01");
    /// ```
    pub fn parse<S: AsRef<str>>(input: S) -> Result<Self, DidError> {
        Ok(parse_infra_did(input.as_ref())?)
    }

    /// Parses the part of `did` following `did:infra:`, as handed over by an outer DID router.
    pub fn from_method_specific_id(did: &str, method_specific_id: &str) -> Result<Self, DidError> {
        parse_method_specific_id(method_specific_id)
            .map_err(|_| DidError::MissingNetwork(did.to_string()))
    }

    /// Parses and validates a did:infra identifier whose local id must be an SS58 address.
    pub fn parse_ss58<S: AsRef<str>>(input: S) -> Result<(Self, Address), DidError> {
        let did = parse_ss58_did(input.as_ref())?;
        let address = did.local_id.parse().map_err(DidError::Address)?;
        Ok((did, address))
    }

    /// `did:infra:<network-id>`, the prefix shared by every DID of the network
    pub fn qualifier(&self) -> String {
        format!("did:{}:{}", self.method.as_str(), self.network_id)
    }

    /// A DID on the same network with a different local id
    pub fn with_local_id<S: Into<String>>(&self, local_id: S) -> Did {
        Did {
            local_id: local_id.into(),
            ..self.clone()
        }
    }

    pub fn subject(&self) -> Subject<'_> {
        if PUBLIC_KEY_PREFIXES
            .iter()
            .any(|prefix| self.local_id.starts_with(prefix))
        {
            Subject::PublicKey(&self.local_id)
        } else {
            Subject::Account(&self.local_id)
        }
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.qualifier(), self.local_id)
    }
}
