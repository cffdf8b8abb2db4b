mod integration_util;

use anyhow::Result;
use integration_util::{with_client, Chain, NETWORK};
use serde_json::json;

#[cfg(test)]
mod it {
    use lib_infradidresolver::{
        chain_api::{ACCOUNT_DID_ATTRIBUTE_TABLE, PUB_KEY_DID_OWNER_TABLE, PUB_KEY_DID_TABLE},
        rpc::DidResolverClient,
        types::{ResolutionErrorCode, ServiceEndpoint, ServiceType},
    };

    use super::*;

    const KEY: &str = "PUB_K1_7nxEa8qHEiy34dpuYH4yE2zRWaAoeT1gsdTnh8n5ikapZZrzjx";
    const KEY_HEX: &str = "037e84547231650e816a32eb5b79028e71ac7459bbcd8e81e6697ac9022e64a407";
    const KEY_INDEX: &str = "7e84547231650e816a32eb5b79028e71ac7459bbcd8e81e6697ac9022e64a407";
    const OWNER: &str = "PUB_K1_7pM9qiBuHWF6WqRSjPTMfVYKV5ZFRavK4PkUq4oFhqi9Z46mWc";
    const OWNER_HEX: &str = "0381af4c86c0ece471450fbd2a2f268e73c09dab06b495a9277caf44a7c9c9db3f";

    fn did(local_id: &str) -> String {
        format!("did:infra:{NETWORK}:{local_id}")
    }

    #[tokio::test]
    pub async fn test_unregistered_public_key() -> Result<()> {
        with_client(Chain::default(), None, |client| async move {
            let did = did(KEY);
            let result = client.resolve_did(did.clone()).await?;
            assert_eq!(
                serde_json::to_value(&result)?,
                json!({
                    "didResolutionMetadata": { "contentType": "application/did+ld+json" },
                    "didDocument": {
                        "@context": "https://www.w3.org/ns/did/v1",
                        "id": did,
                        "verificationMethod": [{
                            "id": format!("{did}#controller"),
                            "type": "EcdsaSecp256k1VerificationKey2019",
                            "controller": did,
                            "publicKeyHex": KEY_HEX
                        }],
                        "authentication": [format!("{did}#controller")]
                    },
                    "didDocumentMetadata": {}
                })
            );
            Ok(())
        })
        .await
    }

    #[tokio::test]
    pub async fn test_public_key_with_service() -> Result<()> {
        let chain = Chain::default().row(
            PUB_KEY_DID_TABLE,
            KEY_INDEX,
            json!({
                "pkid": 3,
                "pk": KEY,
                "nonce": 1,
                "attr": [{"key": "svc/MessagingService", "value": "https://infradid.com/pk/3/mysvcr4"}]
            }),
        );
        with_client(chain, None, |client| async move {
            let did = did(KEY);
            let result = client.resolve_did(did.clone()).await?;
            let document = serde_json::to_value(result.document.unwrap())?;
            assert_eq!(
                document["service"],
                json!([{
                    "id": format!("{did}#service-1"),
                    "type": "MessagingService",
                    "serviceEndpoint": "https://infradid.com/pk/3/mysvcr4"
                }])
            );
            assert_eq!(serde_json::to_value(&result.metadata)?, json!({}));
            Ok(())
        })
        .await
    }

    #[tokio::test]
    pub async fn test_revoked_public_key_with_owner() -> Result<()> {
        let chain = Chain::default()
            .row(
                PUB_KEY_DID_TABLE,
                KEY_INDEX,
                json!({"pkid": "7", "nonce": 65535, "attr": []}),
            )
            .row(
                PUB_KEY_DID_OWNER_TABLE,
                "7",
                json!({"pkid": 7, "owner_pk": OWNER}),
            );
        with_client(chain, None, |client| async move {
            let result = client.resolve_did(did(KEY)).await?;
            assert!(result.metadata.deactivated);
            let document = result.document.unwrap();
            let document = document.as_legacy().unwrap();
            assert_eq!(
                serde_json::to_value(&document.verification_method[0])?["publicKeyHex"],
                OWNER_HEX
            );
            Ok(())
        })
        .await
    }

    #[tokio::test]
    pub async fn test_account() -> Result<()> {
        let chain = Chain::default().account("infraacc1", OWNER).row(
            ACCOUNT_DID_ATTRIBUTE_TABLE,
            "infraacc1",
            json!({
                "account": "infraacc1",
                "attr": [{"key": "svc/LinkedDomains", "value": "https://infradid.com"}]
            }),
        );
        with_client(chain, None, |client| async move {
            let did = did("infraacc1");
            let result = client.resolve_did(did.clone()).await?;
            let document = result.document.unwrap();
            let document = document.as_legacy().unwrap();
            assert_eq!(document.id, did);
            assert_eq!(document.authentication, vec![format!("{did}#controller")]);
            assert_eq!(document.service[0].service_type, ServiceType::LinkedDomains);
            assert_eq!(
                document.service[0].service_endpoint,
                ServiceEndpoint::Uri("https://infradid.com".into())
            );
            Ok(())
        })
        .await
    }

    #[tokio::test]
    pub async fn test_resolution_errors() -> Result<()> {
        with_client(Chain::default(), None, |client| async move {
            let result = client.resolve_did("did:infra:infraacc1".into()).await?;
            assert_eq!(
                result.resolution_metadata.error,
                Some(ResolutionErrorCode::InvalidDid)
            );
            assert!(result.document.is_none());

            let result = client
                .resolve_did("did:infra:mainnet:infraacc1".into())
                .await?;
            assert_eq!(
                result.resolution_metadata.error,
                Some(ResolutionErrorCode::UnknownNetwork)
            );

            let result = client.resolve_did(did("nobody")).await?;
            assert_eq!(
                serde_json::to_value(&result)?,
                json!({
                    "didResolutionMetadata": {
                        "error": "notFound",
                        "message": "no such account nobody"
                    },
                    "didDocument": null,
                    "didDocumentMetadata": {}
                })
            );
            Ok(())
        })
        .await
    }
}
