//! Object store port and its implementations
//!
//! The pipeline talks to the remote store through the [`ObjectStore`] trait:
//! one `put` per asset, blocking, public-read. Implementations:
//! - [`S3Store`] - AWS S3 via the official SDK
//! - [`MemoryStore`] - in-memory fake for tests

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;

use crate::config::Config;
use crate::error::{FerryError, FerryResult};

/// Destination for deployed assets.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Human-readable destination name for output
    fn location(&self) -> String;

    /// Store one object under `key`, publicly readable.
    async fn put(&self, key: &str, content: Vec<u8>) -> FerryResult<()>;
}

/// Content type for a destination key, by extension.
///
/// The store serves assets straight to browsers, so the common static-site
/// types need to be right; anything unrecognized is an opaque download.
pub fn content_type_for(key: &str) -> &'static str {
    match key.rsplit('.').next() {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("xml") => "application/xml",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// S3-backed object store.
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Authenticate against S3 and verify the bucket is reachable.
    ///
    /// One `HeadBucket` round-trip up front means bad credentials or a wrong
    /// bucket name abort the run before any object is written. Retries are
    /// disabled: a failed upload aborts the whole deploy.
    pub async fn connect(config: &Config) -> FerryResult<Self> {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "ferry-env",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled())
            .load()
            .await;
        let client = Client::new(&sdk_config);

        client
            .head_bucket()
            .bucket(&config.bucket)
            .send()
            .await
            .map_err(|e| FerryError::Connection {
                bucket: config.bucket.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
        })
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn location(&self) -> String {
        format!("s3://{}", self.bucket)
    }

    async fn put(&self, key: &str, content: Vec<u8>) -> FerryResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .acl(ObjectCannedAcl::PublicRead)
            .content_type(content_type_for(key))
            .body(ByteStream::from(content))
            .send()
            .await
            .map_err(|e| FerryError::Upload {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

/// In-memory object store for tests.
///
/// Records every stored object; can be told to reject a specific key to
/// exercise the fail-fast path.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    fail_on: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any `put` for exactly this key.
    pub fn failing_on(key: impl Into<String>) -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            fail_on: Some(key.into()),
        }
    }

    /// Snapshot of everything stored so far.
    pub fn objects(&self) -> BTreeMap<String, Vec<u8>> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn location(&self) -> String {
        "memory://".to_string()
    }

    async fn put(&self, key: &str, content: Vec<u8>) -> FerryResult<()> {
        if self.fail_on.as_deref() == Some(key) {
            return Err(FerryError::Upload {
                key: key.to_string(),
                message: "injected failure".to_string(),
            });
        }
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), content);
        Ok(())
    }
}
