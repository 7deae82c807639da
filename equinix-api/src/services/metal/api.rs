use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{ErrorContext, SshKeysApi};
use crate::types::{SshKey, SshKeyInput};

use super::MetalClient;

#[async_trait]
impl SshKeysApi for MetalClient {
    async fn get_ssh_key(&self, id: &str) -> Result<SshKey> {
        self.get(&format!("/ssh-keys/{id}"), ErrorContext::for_resource(id))
            .await
    }

    async fn create_ssh_key(&self, req: &SshKeyInput) -> Result<SshKey> {
        self.post("/ssh-keys", req).await
    }

    async fn update_ssh_key(&self, id: &str, req: &SshKeyInput) -> Result<SshKey> {
        self.put(
            &format!("/ssh-keys/{id}"),
            req,
            ErrorContext::for_resource(id),
        )
        .await
    }

    async fn delete_ssh_key(&self, id: &str) -> Result<()> {
        self.delete(&format!("/ssh-keys/{id}"), ErrorContext::for_resource(id))
            .await
    }
}
