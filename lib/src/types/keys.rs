//! Public key and address encodings found in did:infra identifiers and on chain.

use std::{fmt, str::FromStr};

use blake2::{Blake2b512, Digest as _};
use ripemd::{Digest as _, Ripemd160};

use super::did_parser::parse_chain_key;
use crate::error::KeyError;

/// Length of a compressed secp256k1 / secp256r1 public key
pub const COMPRESSED_KEY_LENGTH: usize = 33;
const CHAIN_KEY_CHECKSUM_LENGTH: usize = 4;

/// Length of an SS58 account id
pub const ADDRESS_LENGTH: usize = 32;
/// The generic substrate network prefix, used for every address this crate encodes
pub const SS58_PREFIX: u8 = 42;
const SS58_CHECKSUM_LENGTH: usize = 2;
const SS58_HASH_PREFIX: &[u8] = b"SS58PRE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    K1,
    R1,
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAlgorithm::K1 => write!(f, "K1"),
            KeyAlgorithm::R1 => write!(f, "R1"),
        }
    }
}

/// How the checksum of a chain key string is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyChecksum {
    /// `ripemd160(key || suffix)`, the `PUB_<suffix>_` format
    Suffixed(&'static str),
    /// `ripemd160(key)`, the `EOS` format
    Legacy,
}

impl KeyChecksum {
    fn compute(&self, key: &[u8]) -> [u8; CHAIN_KEY_CHECKSUM_LENGTH] {
        let mut hasher = Ripemd160::new();
        hasher.update(key);
        if let KeyChecksum::Suffixed(suffix) = self {
            hasher.update(suffix.as_bytes());
        }
        let digest = hasher.finalize();
        let mut checksum = [0u8; CHAIN_KEY_CHECKSUM_LENGTH];
        checksum.copy_from_slice(&digest[..CHAIN_KEY_CHECKSUM_LENGTH]);
        checksum
    }
}

/// A decoded public key and the algorithm it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyRecord {
    pub algorithm: KeyAlgorithm,
    pub data: Vec<u8>,
}

impl KeyRecord {
    pub fn new(algorithm: KeyAlgorithm, data: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm,
            data: data.into(),
        }
    }

    /// Lowercase hex of the key bytes
    pub fn to_hex(&self) -> String {
        hex::encode(&self.data)
    }

    /// Lowercase hex of the key bytes without their leading byte, the secondary index of the
    /// `pubkeydid` table.
    pub fn index(&self) -> String {
        hex::encode(self.data.get(1..).unwrap_or_default())
    }
}

impl FromStr for KeyRecord {
    type Err = KeyError;

    /// Decodes `PUB_K1_`, `PUB_R1_` and legacy `EOS` strings, verifying the checksum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (algorithm, checksum, data) =
            parse_chain_key(s).map_err(|_| KeyError::Format(s.to_string()))?;
        let raw = bs58::decode(data).into_vec()?;

        let expected = COMPRESSED_KEY_LENGTH + CHAIN_KEY_CHECKSUM_LENGTH;
        if raw.len() != expected {
            return Err(KeyError::Length {
                expected,
                found: raw.len(),
            });
        }
        let (key, found) = raw.split_at(COMPRESSED_KEY_LENGTH);
        if checksum.compute(key) != found {
            return Err(KeyError::Checksum);
        }
        Ok(KeyRecord::new(algorithm, key))
    }
}

impl fmt::Display for KeyRecord {
    /// `PUB_K1_` / `PUB_R1_` string of the key
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.algorithm {
            KeyAlgorithm::K1 => "K1",
            KeyAlgorithm::R1 => "R1",
        };
        let mut raw = self.data.clone();
        raw.extend_from_slice(&KeyChecksum::Suffixed(suffix).compute(&self.data));
        write!(f, "PUB_{}_{}", suffix, bs58::encode(raw).into_string())
    }
}

/// A 32 byte account id of the SS58 chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; ADDRESS_LENGTH]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// SS58 encoding with [`SS58_PREFIX`]
    pub fn to_ss58(&self) -> String {
        let mut raw = Vec::with_capacity(1 + ADDRESS_LENGTH + SS58_CHECKSUM_LENGTH);
        raw.push(SS58_PREFIX);
        raw.extend_from_slice(&self.0);
        let checksum = ss58_hash(&raw);
        raw.extend_from_slice(&checksum[..SS58_CHECKSUM_LENGTH]);
        bs58::encode(raw).into_string()
    }

    /// Decodes an SS58 address of any simple (one byte) or full (two byte) network prefix
    pub fn from_ss58(s: &str) -> Result<Self, KeyError> {
        let raw = bs58::decode(s).into_vec()?;
        let prefix_length = match raw.first().copied() {
            Some(0..=63) => 1,
            Some(64..=127) => 2,
            Some(prefix) => return Err(KeyError::Prefix(prefix)),
            None => {
                return Err(KeyError::Length {
                    expected: 1 + ADDRESS_LENGTH + SS58_CHECKSUM_LENGTH,
                    found: 0,
                })
            }
        };

        let expected = prefix_length + ADDRESS_LENGTH + SS58_CHECKSUM_LENGTH;
        if raw.len() != expected {
            return Err(KeyError::Length {
                expected,
                found: raw.len(),
            });
        }
        let (body, checksum) = raw.split_at(raw.len() - SS58_CHECKSUM_LENGTH);
        if ss58_hash(body)[..SS58_CHECKSUM_LENGTH] != *checksum {
            return Err(KeyError::Checksum);
        }

        let mut address = [0u8; ADDRESS_LENGTH];
        address.copy_from_slice(&body[prefix_length..]);
        Ok(Address(address))
    }

    /// Decodes a `0x` prefixed, 32 byte hex string
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))?;
        let address: [u8; ADDRESS_LENGTH] =
            bytes.as_slice().try_into().map_err(|_| KeyError::Length {
                expected: ADDRESS_LENGTH,
                found: bytes.len(),
            })?;
        Ok(Address(address))
    }
}

fn ss58_hash(data: &[u8]) -> Vec<u8> {
    Blake2b512::new()
        .chain_update(SS58_HASH_PREFIX)
        .chain_update(data)
        .finalize()
        .to_vec()
}

impl FromStr for Address {
    type Err = KeyError;

    /// Accepts both the SS58 form and the raw `0x` hex form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("0x") {
            Address::from_hex(s)
        } else {
            Address::from_ss58(s)
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ss58())
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Address(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "PUB_K1_7nxEa8qHEiy34dpuYH4yE2zRWaAoeT1gsdTnh8n5ikapZZrzjx";
    const KEY_HEX: &str = "037e84547231650e816a32eb5b79028e71ac7459bbcd8e81e6697ac9022e64a407";

    const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
    const ALICE_HEX: &str = "d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d";

    #[test]
    fn test_decode_k1_key() {
        let key: KeyRecord = KEY.parse().unwrap();
        assert_eq!(key.algorithm, KeyAlgorithm::K1);
        assert_eq!(key.to_hex(), KEY_HEX);
        assert_eq!(key.index(), &KEY_HEX[2..]);
        assert_eq!(key.to_string(), KEY);
    }

    #[test]
    fn test_decode_legacy_key() {
        let key: KeyRecord = "EOS7nxEa8qHEiy34dpuYH4yE2zRWaAoeT1gsdTnh8n5ikapcB74Kw"
            .parse()
            .unwrap();
        assert_eq!(key.algorithm, KeyAlgorithm::K1);
        assert_eq!(key.to_hex(), KEY_HEX);
        // the legacy form re-encodes to the modern form
        assert_eq!(key.to_string(), KEY);

        let key: KeyRecord = "EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV"
            .parse()
            .unwrap();
        assert_eq!(
            key.to_hex(),
            "02c0ded2bc1f1305fb0faac5e6c03ee3a1924234985427b6167ca569d13df435cf"
        );
    }

    #[test]
    fn test_decode_r1_key() {
        let key: KeyRecord = "PUB_R1_7nxEa8qHEiy34dpuYH4yE2zRWaAoeT1gsdTnh8n5ikapb9skdx"
            .parse()
            .unwrap();
        assert_eq!(key.algorithm, KeyAlgorithm::R1);
        assert_eq!(key.to_hex(), KEY_HEX);
    }

    #[test]
    fn test_bad_checksum() {
        let err = "PUB_K1_6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5BLDWuZ"
            .parse::<KeyRecord>()
            .unwrap_err();
        assert_eq!(err, KeyError::Checksum);

        // a K1 checksum doesn't validate an R1 key
        let err = "PUB_R1_7nxEa8qHEiy34dpuYH4yE2zRWaAoeT1gsdTnh8n5ikapZZrzjx"
            .parse::<KeyRecord>()
            .unwrap_err();
        assert_eq!(err, KeyError::Checksum);
    }

    #[test]
    fn test_bad_format() {
        assert!(matches!(
            "PUB_K1_".parse::<KeyRecord>(),
            Err(KeyError::Format(_))
        ));
        assert!(matches!(
            "infraacc1".parse::<KeyRecord>(),
            Err(KeyError::Format(_))
        ));
        assert!(matches!(
            "PUB_K1_7nxEa8qHEiy34".parse::<KeyRecord>(),
            Err(KeyError::Length { expected: 37, .. })
        ));
    }

    #[test]
    fn test_ss58_encoding() {
        let address = Address::from_hex(&format!("0x{ALICE_HEX}")).unwrap();
        assert_eq!(address.to_ss58(), ALICE);
        assert_eq!(Address::from_ss58(ALICE).unwrap(), address);
        assert_eq!(ALICE.parse::<Address>().unwrap(), address);

        assert_eq!(
            Address([0u8; 32]).to_string(),
            "5C4hrfjw9DjXZTzV3MwzrrAr9P1MJhSrvWGWqi1eSuyUpnhM"
        );
    }

    #[test]
    fn test_ss58_rejects_bad_addresses() {
        // last character changed
        assert_eq!(
            Address::from_ss58("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQZ"),
            Err(KeyError::Checksum)
        );
        assert_eq!(
            Address::from_ss58("3ao2HkZyNi2FvgNtDU5xRJ4bj4ocN"),
            Err(KeyError::Length {
                expected: 35,
                found: 21
            })
        );
        assert_eq!(Address::from_ss58("5Grwva"), Err(KeyError::Prefix(0xa7)));
        assert!(matches!(
            Address::from_ss58("0GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY"),
            Err(KeyError::Base58(_))
        ));
        assert!(matches!(
            Address::from_hex("0xd43593"),
            Err(KeyError::Length {
                expected: 32,
                found: 3
            })
        ));
    }
}
