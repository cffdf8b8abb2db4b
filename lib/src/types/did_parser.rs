//! Parsing Expression Grammer (PEG) parsing rules for parts of a did:infra identifier

use crate::types::*;

pub use did_infra_attribute_parser::attribute as parse_attribute;
pub use did_infra_parser::infra_did as parse_infra_did;
pub use did_infra_parser::method_specific_id as parse_method_specific_id;
pub use did_infra_parser::ss58_did as parse_ss58_did;
pub(crate) use chain_key_parser::public_key as parse_chain_key;

peg::parser! {
    grammar did_infra_parser() for str {
        /// parses a full did:infra identifier
        ///
        /// # Example
        /// ```rust
        /// use lib_infradidresolver::types::{Did, Method, parse_infra_did};
        /// let parsed = parse_infra_did("did:infra:01:infraaccount1").unwrap();
        /// assert_eq!(
        ///    parsed,
        ///    Did {
        ///        method: Method::Infra,
        ///        network_id: "01".to_string(),
        ///        local_id: "infraaccount1".to_string(),
        ///   });
        /// ```
        pub rule infra_did() -> Did
            = "did:" method:method() ":" did:method_specific_id() { Did { method, ..did } }

        /// parses the `<network-id>:<local-id>` part of a did:infra identifier
        pub rule method_specific_id() -> Did
            = network_id:segment() ":" local_id:segment() {
                Did { method: Method::Infra, network_id, local_id }
            }

        /// parses a did:infra identifier whose local id is an SS58 address
        pub rule ss58_did() -> Did
            = "did:" method:method() ":" network_id:segment() ":" local_id:ss58_address() {
                Did { method, network_id, local_id }
            }

        rule method() -> Method
            = "infra" { Method::Infra } / expected!("the only supported method is `infra`")

        rule segment() -> String
            = s:$([^ ':']+) { s.to_string() } / expected!("a network identifier part and an id part")

        rule ss58_address() -> String
            = s:$(['5' | 'K' | 'L'] base58()*<47>) { s.to_string() }
            / expected!("a 32 byte SS58 address")

        rule base58() = ['1'..='9' | 'A'..='H' | 'J'..='N' | 'P'..='Z' | 'a'..='k' | 'm'..='z']
    }
}

peg::parser! {
    grammar chain_key_parser() for str {
        rule base58() = ['1'..='9' | 'A'..='H' | 'J'..='N' | 'P'..='Z' | 'a'..='k' | 'm'..='z']

        rule data() -> &'input str
            = $(base58()+)

        /// Splits a chain public key string into its algorithm, checksum flavour and base58 data
        pub rule public_key() -> (KeyAlgorithm, KeyChecksum, &'input str)
            = "PUB_K1_" d:data() { (KeyAlgorithm::K1, KeyChecksum::Suffixed("K1"), d) }
            / "PUB_R1_" d:data() { (KeyAlgorithm::R1, KeyChecksum::Suffixed("R1"), d) }
            / "EOS" d:data() { (KeyAlgorithm::K1, KeyChecksum::Legacy, d) }
            / expected!("a `PUB_K1_`, `PUB_R1_` or legacy `EOS` public key")
    }
}

peg::parser! {
    grammar did_infra_attribute_parser() for str {
        rule segment() -> &'input str
            = $([^ '/']+)

        rule rest() = ("/" [_]*)?

        // `svc/` and `svc//x` carry an empty type, which is `AgentService` too
        rule service() -> ServiceType
            = "svc" !([^ '/']) ty:("/" t:segment() { t })? rest() {
                ty.map(ServiceType::from).unwrap_or(ServiceType::Agent)
            }

        /// Parses the key of a DID registry attribute row
        ///
        /// `svc/[ServiceType]` adds a service, the type defaulting to `AgentService`. Rows with
        /// any other leading tag are returned as [`Attribute::Other`].
        pub rule attribute() -> Attribute
            = svc:service() { Attribute::Service(svc) }
            / tag:$([^ '/']*) rest() { Attribute::Other(tag.to_string()) }
    }
}
