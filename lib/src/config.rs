//! Network configuration of the account-based chain resolver

use std::{collections::HashMap, error::Error, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, resolver::HttpChainApi};

/// A chain network DIDs of the form `did:infra:<networkId>:*` are resolved against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfiguration {
    pub network_id: String,
    /// account of the DID registry contract
    pub registry_contract: String,
    pub rpc_endpoint: String,
}

impl FromStr for NetworkConfiguration {
    type Err = ConfigError;

    /// Parses `networkId,registryContract,rpcEndpoint`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split(',').map(str::trim).collect::<Vec<_>>();
        match parts.as_slice() {
            [network_id, registry_contract, rpc_endpoint]
                if parts.iter().all(|part| !part.is_empty()) =>
            {
                Ok(Self {
                    network_id: network_id.to_string(),
                    registry_contract: registry_contract.to_string(),
                    rpc_endpoint: rpc_endpoint.to_string(),
                })
            }
            _ => Err(ConfigError::Descriptor(s.to_string())),
        }
    }
}

/// Options of the [`InfraDidResolver`](crate::InfraDidResolver)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverOptions {
    #[serde(default)]
    pub networks: Vec<NetworkConfiguration>,
    /// report revoked public-key DIDs as active
    #[serde(default)]
    pub no_revocation_check: bool,
}

/// A configured network: the chain client and the registry contract to query
#[derive(Debug, Clone)]
pub struct ConfiguredNetwork<C> {
    pub client: C,
    pub registry_contract: String,
}

/// Read-only map of network id to [`ConfiguredNetwork`]
#[derive(Debug, Clone)]
pub struct NetworkRegistry<C> {
    networks: HashMap<String, ConfiguredNetwork<C>>,
}

impl<C> NetworkRegistry<C> {
    /// Builds the registry, creating the client of each network with `connect`.
    /// Fails on an empty list, a repeated network id, or a client that can't be created.
    pub fn configure<F, E>(
        networks: &[NetworkConfiguration],
        mut connect: F,
    ) -> Result<Self, ConfigError>
    where
        F: FnMut(&NetworkConfiguration) -> Result<C, E>,
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        if networks.is_empty() {
            return Err(ConfigError::NoNetworks);
        }

        let mut configured = HashMap::with_capacity(networks.len());
        for network in networks {
            if configured.contains_key(&network.network_id) {
                return Err(ConfigError::Duplicate(network.network_id.clone()));
            }
            let client = connect(network).map_err(|e| ConfigError::Network {
                id: network.network_id.clone(),
                source: e.into(),
            })?;
            log::debug!(
                "network {} uses registry {} at {}",
                network.network_id,
                network.registry_contract,
                network.rpc_endpoint
            );
            configured.insert(
                network.network_id.clone(),
                ConfiguredNetwork {
                    client,
                    registry_contract: network.registry_contract.clone(),
                },
            );
        }
        Ok(Self {
            networks: configured,
        })
    }

    pub fn get(&self, network_id: &str) -> Option<&ConfiguredNetwork<C>> {
        self.networks.get(network_id)
    }

    pub fn network_ids(&self) -> impl Iterator<Item = &str> {
        self.networks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

impl NetworkRegistry<HttpChainApi> {
    /// A registry reading every network over HTTP
    pub fn connect(networks: &[NetworkConfiguration]) -> Result<Self, ConfigError> {
        Self::configure(networks, |network| HttpChainApi::new(&network.rpc_endpoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn network(id: &str) -> NetworkConfiguration {
        NetworkConfiguration {
            network_id: id.into(),
            registry_contract: "infradidregi".into(),
            rpc_endpoint: "http://localhost:8888".into(),
        }
    }

    #[test]
    fn test_options_deserialize_camel_case() {
        let options: ResolverOptions = serde_json::from_value(json!({
            "networks": [{
                "networkId": "01",
                "registryContract": "infradidregi",
                "rpcEndpoint": "http://localhost:8888"
            }],
            "noRevocationCheck": true
        }))
        .unwrap();
        assert_eq!(options.networks, vec![network("01")]);
        assert!(options.no_revocation_check);

        let options: ResolverOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options, ResolverOptions::default());
    }

    #[test]
    fn test_descriptor() {
        assert_eq!(
            "01, infradidregi ,http://localhost:8888"
                .parse::<NetworkConfiguration>()
                .unwrap(),
            network("01")
        );
        assert!(matches!(
            "01,infradidregi".parse::<NetworkConfiguration>(),
            Err(ConfigError::Descriptor(_))
        ));
        assert!(matches!(
            "01,,http://localhost:8888".parse::<NetworkConfiguration>(),
            Err(ConfigError::Descriptor(_))
        ));
    }

    #[test]
    fn test_configure() {
        let registry = NetworkRegistry::connect(&[network("01"), network("02")]).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("01").unwrap().registry_contract, "infradidregi");
        assert!(registry.get("03").is_none());

        let mut ids = registry.network_ids().collect::<Vec<_>>();
        ids.sort();
        assert_eq!(ids, vec!["01", "02"]);
    }

    #[test]
    fn test_configure_errors() {
        assert!(matches!(
            NetworkRegistry::connect(&[]),
            Err(ConfigError::NoNetworks)
        ));
        assert!(matches!(
            NetworkRegistry::connect(&[network("01"), network("01")]),
            Err(ConfigError::Duplicate(id)) if id == "01"
        ));

        let mut bad = network("02");
        bad.rpc_endpoint = "ftp://localhost".into();
        assert!(matches!(
            NetworkRegistry::connect(&[network("01"), bad]),
            Err(ConfigError::Network { id, .. }) if id == "02"
        ));
    }
}
