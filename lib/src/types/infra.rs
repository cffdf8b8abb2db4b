//! did:infra documents of the account-based chain.
//! This module offers [`InfraBuilder`], which assembles a [`LegacyDocument`] from the controller
//! key and the attribute rows the DID registry contract stores for an account or a public key.

use serde::{Deserialize, Serialize};
use url::Url;

use super::*;

/// One `{key, value}` attribute row of the DID registry contract
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AttributeRecord {
    #[serde(alias = "first")]
    pub key: String,
    #[serde(alias = "second")]
    pub value: String,
}

impl AttributeRecord {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// DID Infra Builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfraBuilder {
    context: Url,
    id: String,
    controller_key: Option<KeyRecord>,
    service: Vec<Service>,
    service_count: usize,
}

impl InfraBuilder {
    pub fn new(did: impl Into<String>) -> Self {
        Self {
            context: Url::parse(DID_CONTEXT).expect("DID context is a valid URL"),
            id: did.into(),
            controller_key: None,
            service: Vec::new(),
            service_count: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set the key published as `#controller`. Without one the document has no verification
    /// method and no authentication entry.
    pub fn controller_key(&mut self, key: KeyRecord) {
        self.controller_key = Some(key);
    }

    /// Add the attribute rows of the registry, in row order.
    /// Only `svc` attributes are interpreted, see [`parse_attribute`].
    pub fn attributes<'a, I>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = &'a AttributeRecord>,
    {
        for attribute in attributes {
            self.attribute(attribute);
        }
    }

    pub fn attribute(&mut self, attribute: &AttributeRecord) {
        let parsed = parse_attribute(&attribute.key)
            .unwrap_or_else(|_| Attribute::Other(attribute.key.clone()));
        match parsed {
            Attribute::Service(service_type) => self.service(service_type, &attribute.value),
            Attribute::Other(tag) => log::trace!("ignoring `{}` attribute of {}", tag, self.id),
        }
    }

    /// Add an external service to the document.
    /// The endpoint is the value of the attribute, kept as written.
    pub fn service(&mut self, service_type: ServiceType, endpoint: &str) {
        self.service_count += 1;
        self.service.push(Service {
            id: with_fragment(&self.id, &format!("service-{}", self.service_count)),
            service_type,
            service_endpoint: ServiceEndpoint::Uri(endpoint.to_string()),
        });
    }

    /// Build the DID Document
    pub fn build(self) -> LegacyDocument {
        let mut verification_method = Vec::new();
        let mut authentication = Vec::new();

        if let Some(key) = self.controller_key {
            let controller = with_fragment(&self.id, "controller");
            verification_method.push(VerificationMethod {
                id: controller.clone(),
                verification_type: KeyType::EcdsaSecp256k1VerificationKey2019,
                controller: self.id.clone(),
                verification_properties: VerificationMethodProperties::PublicKeyHex {
                    public_key_hex: key.to_hex(),
                },
            });
            authentication.push(controller);
        }

        LegacyDocument {
            context: self.context,
            id: self.id,
            verification_method,
            authentication,
            service: self.service,
        }
    }
}
