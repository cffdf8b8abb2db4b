//! Read interface of the account-based chain, and the rows of the DID registry contract.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use smart_default::SmartDefault;

use crate::types::AttributeRecord;

/// Table of public-key DIDs, searched by the sha256 secondary index of the key
pub const PUB_KEY_DID_TABLE: &str = "pubkeydid";
/// Table of owner keys overriding the controller of a public-key DID, keyed by `pkid`
pub const PUB_KEY_DID_OWNER_TABLE: &str = "pkdidowner";
/// Table of account DID attributes, keyed by account name
pub const ACCOUNT_DID_ATTRIBUTE_TABLE: &str = "accdidattr";

/// The permission whose key controls an account DID
pub const ACTIVE_PERMISSION: &str = "active";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKeyType {
    I64,
    Name,
    Sha256,
}

/// Parameters of `get_table_rows`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SmartDefault)]
pub struct TableRowsQuery {
    #[default(true)]
    pub json: bool,
    pub code: String,
    pub scope: String,
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_position: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_type: Option<IndexKeyType>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub lower_bound: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub upper_bound: String,
    #[default(10)]
    pub limit: u32,
}

impl TableRowsQuery {
    /// A query of `table` in the registry contract's own scope
    pub fn registry(contract: &str, table: &str) -> Self {
        Self {
            code: contract.to_string(),
            scope: contract.to_string(),
            table: table.to_string(),
            ..Default::default()
        }
    }

    pub fn index(mut self, position: u8, key_type: IndexKeyType) -> Self {
        self.index_position = Some(position);
        self.key_type = Some(key_type);
        self
    }

    pub fn lower_bound(mut self, bound: impl Into<String>) -> Self {
        self.lower_bound = bound.into();
        self
    }

    /// Sets both bounds, matching `key` only
    pub fn exactly(mut self, key: impl Into<String>) -> Self {
        self.lower_bound = key.into();
        self.upper_bound = self.lower_bound.clone();
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// Row of [`PUB_KEY_DID_TABLE`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PubKeyDidRow {
    #[serde(deserialize_with = "number_or_string")]
    pub pkid: u64,
    #[serde(deserialize_with = "number_or_string")]
    pub nonce: u64,
    #[serde(default)]
    pub attr: Vec<AttributeRecord>,
}

/// Row of [`PUB_KEY_DID_OWNER_TABLE`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PubKeyDidOwnerRow {
    #[serde(deserialize_with = "number_or_string")]
    pub pkid: u64,
    pub owner_pk: String,
}

/// Row of [`ACCOUNT_DID_ATTRIBUTE_TABLE`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountDidAttributeRow {
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub attr: Vec<AttributeRecord>,
}

/// 64 bit table fields may be rendered either as JSON numbers or as strings
fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        String(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::String(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Result of `get_account`, only the fields used to find the controller key
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub perm_name: String,
    #[serde(default)]
    pub parent: String,
    pub required_auth: Authority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    pub threshold: u32,
    #[serde(default)]
    pub keys: Vec<KeyWeight>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyWeight {
    pub key: String,
    pub weight: u16,
}

impl Account {
    /// The key of the `active` permission, if it is a plain single key authority
    /// (threshold 1, exactly one key of weight 1).
    pub fn active_key(&self) -> Option<&str> {
        let active = self
            .permissions
            .iter()
            .find(|p| p.perm_name == ACTIVE_PERMISSION)?;
        let auth = &active.required_auth;
        match auth.keys.as_slice() {
            [only] if auth.threshold == 1 && only.weight == 1 => Some(only.key.as_str()),
            _ => None,
        }
    }
}

/// Chain reads used during resolution
#[async_trait]
pub trait ChainApi: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// The `rows` of a `get_table_rows` call, still as JSON
    async fn get_table_rows(
        &self,
        query: &TableRowsQuery,
    ) -> Result<Vec<serde_json::Value>, Self::Error>;

    async fn get_account(&self, name: &str) -> Result<Account, Self::Error>;
}
