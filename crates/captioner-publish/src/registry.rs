use crate::cloudinary_publisher::CloudinaryPublisher;
use crate::file_publisher::FilePublisher;
use crate::publisher_trait::Publisher;
use captioner_core::{PublishError, StorageConfig};
use std::collections::HashMap;

/// Builds a publisher from the storage account and the plugin's own `[publisher]` table.
pub type PublisherFactory =
    fn(&StorageConfig, &toml::Value) -> Result<Box<dyn Publisher>, PublishError>;

pub struct PublisherRegistry {
    factories: HashMap<String, PublisherFactory>,
}

fn cloudinary_factory(
    storage: &StorageConfig,
    _config: &toml::Value,
) -> Result<Box<dyn Publisher>, PublishError> {
    Ok(Box::new(CloudinaryPublisher::from_config(storage)?))
}

fn file_factory(
    _storage: &StorageConfig,
    config: &toml::Value,
) -> Result<Box<dyn Publisher>, PublishError> {
    Ok(Box::new(FilePublisher::from_config(config)?))
}

impl PublisherRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("cloudinary", cloudinary_factory);
        registry.register("file", file_factory);
        registry
    }

    pub fn register(&mut self, name: &str, factory: PublisherFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(
        &self,
        name: &str,
        storage: &StorageConfig,
        config: &toml::Value,
    ) -> Result<Box<dyn Publisher>, PublishError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| PublishError::NotFound(name.to_string()))?;
        factory(storage, config)
    }

    pub fn list_publishers(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for PublisherRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> toml::Value {
        toml::Value::Table(Default::default())
    }

    fn path_config(path: &str) -> toml::Value {
        toml::Value::Table({
            let mut t = toml::map::Map::new();
            t.insert("path".to_string(), toml::Value::String(path.to_string()));
            t
        })
    }

    #[test]
    fn test_registry_create_file_returns_correct_name() {
        let registry = PublisherRegistry::new();
        let publisher = registry
            .create("file", &StorageConfig::default(), &path_config("/tmp/captions"))
            .unwrap();
        assert_eq!(publisher.name(), "file");
    }

    #[test]
    fn test_registry_create_cloudinary_with_credentials() {
        let registry = PublisherRegistry::new();
        let storage = StorageConfig {
            api_key: Some("key".to_string()),
            api_secret: Some("secret".to_string()),
            ..StorageConfig::default()
        };
        let publisher = registry.create("cloudinary", &storage, &empty()).unwrap();
        assert_eq!(publisher.name(), "cloudinary");
    }

    #[test]
    fn test_registry_create_cloudinary_without_credentials_fails() {
        let registry = PublisherRegistry::new();
        let result = registry.create("cloudinary", &StorageConfig::default(), &empty());
        assert!(matches!(result, Err(PublishError::InitializationFailed(_))));
    }

    #[test]
    fn test_registry_create_unknown_returns_error() {
        let registry = PublisherRegistry::new();
        match registry.create("nope", &StorageConfig::default(), &empty()) {
            Err(PublishError::NotFound(name)) => assert_eq!(name, "nope"),
            _ => panic!("expected NotFound error"),
        }
    }

    #[test]
    fn test_registry_register_custom_publisher() {
        let mut registry = PublisherRegistry::new();
        registry.register("local", file_factory);
        let publisher = registry
            .create("local", &StorageConfig::default(), &path_config("/tmp/x"))
            .unwrap();
        // FilePublisher backs the custom name, so the plugin name is still "file"
        assert_eq!(publisher.name(), "file");
    }

    #[test]
    fn test_registry_list_publishers() {
        let registry = PublisherRegistry::new();
        let names = registry.list_publishers();
        assert!(names.contains(&"cloudinary"));
        assert!(names.contains(&"file"));
    }
}
