use crate::cloudinary::{CloudinaryClient, ResourceType, UploadFile};
use crate::publisher_trait::{PublishedArtifact, Publisher};
use async_trait::async_trait;
use captioner_core::{PublishError, StorageConfig};
use std::collections::BTreeMap;

/// Publishes artifacts as raw Cloudinary assets.
pub struct CloudinaryPublisher {
    client: CloudinaryClient,
}

impl CloudinaryPublisher {
    pub fn new(client: CloudinaryClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self, PublishError> {
        Ok(Self::new(CloudinaryClient::from_config(config)?))
    }
}

#[async_trait]
impl Publisher for CloudinaryPublisher {
    fn name(&self) -> &str {
        "cloudinary"
    }

    async fn publish(&self, artifact_id: &str, body: &[u8]) -> Result<PublishedArtifact, PublishError> {
        let mut params = BTreeMap::new();
        params.insert("public_id".to_string(), artifact_id.to_string());
        params.insert("overwrite".to_string(), "true".to_string());

        let file_name = artifact_id.rsplit('/').next().unwrap_or(artifact_id).to_string();

        tracing::info!(
            artifact_id = %artifact_id,
            cloud = %self.client.cloud_name(),
            bytes = body.len(),
            "uploading raw asset"
        );
        let response = self
            .client
            .upload(
                ResourceType::Raw,
                params,
                UploadFile::Bytes {
                    file_name,
                    data: body.to_vec(),
                },
            )
            .await?;

        let location = response
            .secure_url
            .unwrap_or_else(|| self.client.raw_asset_url(&response.public_id));

        Ok(PublishedArtifact {
            artifact_id: response.public_id,
            location,
        })
    }
}
