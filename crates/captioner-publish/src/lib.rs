pub mod cloudinary;
pub mod cloudinary_publisher;
pub mod file_publisher;
pub mod publisher_trait;
pub mod registry;
pub mod uploader;

pub use cloudinary::{api_sign_request, CloudinaryClient, ResourceType, UploadFile, UploadResponse};
pub use cloudinary_publisher::CloudinaryPublisher;
pub use file_publisher::FilePublisher;
pub use publisher_trait::{PublishedArtifact, Publisher};
pub use registry::{PublisherFactory, PublisherRegistry};
pub use uploader::{MediaUploader, UploadedMedia};
