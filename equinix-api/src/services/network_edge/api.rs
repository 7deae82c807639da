use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{ErrorContext, PublicKeysApi};
use crate::types::{PublicKey, PublicKeyRequest};

use super::NetworkEdgeClient;

#[async_trait]
impl PublicKeysApi for NetworkEdgeClient {
    async fn get_public_key(&self, id: &str) -> Result<PublicKey> {
        self.get(&format!("/publicKeys/{id}"), ErrorContext::for_resource(id))
            .await
    }

    async fn create_public_key(&self, req: &PublicKeyRequest) -> Result<PublicKey> {
        self.post("/publicKeys", req).await
    }

    async fn delete_public_key(&self, id: &str) -> Result<()> {
        self.delete(&format!("/publicKeys/{id}"), ErrorContext::for_resource(id))
            .await
    }
}
