//! Minimal client for the Cloudinary upload API.
//!
//! Only signed uploads are supported: every request carries `api_key`,
//! `timestamp` and a SHA-1 `signature` over the remaining parameters.

use crate::uploader::{MediaUploader, UploadedMedia};
use async_trait::async_trait;
use captioner_core::{PublishError, StorageConfig};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Parameters that are sent but never part of the signed payload.
const UNSIGNED_PARAMS: &[&str] = &["file", "api_key", "resource_type", "cloud_name"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Raw,
    Video,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Raw => "raw",
            ResourceType::Video => "video",
        }
    }
}

pub enum UploadFile {
    Bytes { file_name: String, data: Vec<u8> },
    /// A remote URL the service fetches itself.
    Url(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub public_id: String,
    #[serde(default)]
    pub secure_url: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Compute the request signature: SHA-1 hex of the sorted `key=value` pairs
/// joined with `&`, followed directly by the API secret.
pub fn api_sign_request(params: &BTreeMap<String, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .filter(|(k, v)| !v.is_empty() && !UNSIGNED_PARAMS.contains(&k.as_str()))
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    api_url: String,
    delivery_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryClient {
    pub fn from_config(config: &StorageConfig) -> Result<Self, PublishError> {
        let api_key = required(config.api_key.as_deref(), "api_key")?;
        let api_secret = required(config.api_secret.as_deref(), "api_secret")?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                PublishError::InitializationFailed(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            delivery_url: config.delivery_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloud_name.clone(),
            api_key,
            api_secret,
        })
    }

    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }

    pub fn upload_url(&self, resource_type: ResourceType) -> String {
        format!(
            "{}/{}/{}/upload",
            self.api_url,
            self.cloud_name,
            resource_type.as_str()
        )
    }

    pub fn raw_asset_url(&self, public_id: &str) -> String {
        format!("{}/{}/raw/upload/{}", self.delivery_url, self.cloud_name, public_id)
    }

    /// Perform one signed upload. Non-2xx answers become [`PublishError::Rejected`].
    pub async fn upload(
        &self,
        resource_type: ResourceType,
        mut params: BTreeMap<String, String>,
        file: UploadFile,
    ) -> Result<UploadResponse, PublishError> {
        params.insert("timestamp".to_string(), unix_timestamp().to_string());
        let signature = api_sign_request(&params, &self.api_secret);

        let mut form = Form::new();
        for (key, value) in params {
            form = form.text(key, value);
        }
        form = form
            .text("api_key", self.api_key.clone())
            .text("signature", signature);
        form = match file {
            UploadFile::Bytes { file_name, data } => {
                form.part("file", Part::bytes(data).file_name(file_name))
            }
            UploadFile::Url(url) => form.text("file", url),
        };

        let url = self.upload_url(resource_type);
        tracing::debug!(%url, "sending signed upload");

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PublishError::PublishFailed(format!("{url}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PublishError::PublishFailed(format!("failed to read upload response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| PublishError::PublishFailed(format!("unexpected upload response: {e}")))
    }
}

fn required(value: Option<&str>, field: &str) -> Result<String, PublishError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(PublishError::InitializationFailed(format!(
            "missing '{field}' in storage config"
        ))),
    }
}

#[async_trait]
impl MediaUploader for CloudinaryClient {
    async fn upload_video_from_url(
        &self,
        source_url: &str,
        media_id: &str,
    ) -> Result<UploadedMedia, PublishError> {
        let mut params = BTreeMap::new();
        params.insert("public_id".to_string(), media_id.to_string());
        params.insert("overwrite".to_string(), "true".to_string());
        params.insert("auto_transcription".to_string(), "true".to_string());

        tracing::info!(media_id = %media_id, %source_url, "uploading source video");
        let response = self
            .upload(ResourceType::Video, params, UploadFile::Url(source_url.to_string()))
            .await?;

        Ok(UploadedMedia {
            public_id: response.public_id,
            secure_url: response.secure_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> StorageConfig {
        StorageConfig {
            cloud_name: "acme".to_string(),
            api_key: Some("key".to_string()),
            api_secret: Some("secret".to_string()),
            ..StorageConfig::default()
        }
    }

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_sign_request_matches_documented_example() {
        let p = params(&[
            ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop"),
            ("public_id", "sample_image"),
            ("timestamp", "1315060510"),
        ]);
        assert_eq!(
            api_sign_request(&p, "abcd"),
            "bfd09f95f331f558cbd1320e67aa8d488770583e"
        );
    }

    #[test]
    fn test_sign_request_skips_unsigned_and_empty_params() {
        let with_extras = params(&[
            ("api_key", "key"),
            ("file", "ignored"),
            ("overwrite", "true"),
            ("public_id", "demo_en.vtt"),
            ("resource_type", "raw"),
            ("tags", ""),
            ("timestamp", "1700000000"),
        ]);
        assert_eq!(
            api_sign_request(&with_extras, "secret"),
            "380b58f30d2be08844e8b79837affbe8cabfccdd"
        );
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let config = StorageConfig {
            api_secret: None,
            ..storage()
        };
        match CloudinaryClient::from_config(&config) {
            Err(PublishError::InitializationFailed(msg)) => assert!(msg.contains("api_secret")),
            _ => panic!("expected InitializationFailed"),
        }
    }

    #[test]
    fn test_from_config_rejects_blank_key() {
        let config = StorageConfig {
            api_key: Some("   ".to_string()),
            ..storage()
        };
        assert!(CloudinaryClient::from_config(&config).is_err());
    }

    #[test]
    fn test_upload_and_asset_urls() {
        let client = CloudinaryClient::from_config(&storage()).unwrap();
        assert_eq!(client.cloud_name(), "acme");
        assert_eq!(
            client.upload_url(ResourceType::Raw),
            "https://api.cloudinary.com/v1_1/acme/raw/upload"
        );
        assert_eq!(
            client.upload_url(ResourceType::Video),
            "https://api.cloudinary.com/v1_1/acme/video/upload"
        );
        assert_eq!(
            client.raw_asset_url("clip_en.vtt"),
            "https://res.cloudinary.com/acme/raw/upload/clip_en.vtt"
        );
    }
}
