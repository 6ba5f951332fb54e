use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutMultipartOptions, PutOptions,
    PutPayload, Result as ObjectResult, WriteMultipart,
};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Read buffer for streaming a local file into a multipart upload.
const READ_CHUNK_BYTES: usize = 1024 * 1024;
/// Parts in flight per upload. Each part buffers 5 MiB.
const MAX_CONCURRENT_PARTS: usize = 4;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    cdn_base_url: Option<String>,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `cdn_base_url` - Optional CDN distribution in front of the bucket; public URLs use it when set
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        cdn_base_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::with_store(
            Arc::new(store),
            bucket,
            region,
            endpoint_url,
            cdn_base_url,
        ))
    }

    fn with_store(
        store: Arc<dyn ObjectStore>,
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        cdn_base_url: Option<String>,
    ) -> Self {
        S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
            cdn_base_url: cdn_base_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    async fn put_with_content_type(
        &self,
        storage_key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        let size = bytes.len() as u64;
        let location = ObjectPath::from(storage_key.to_string());
        let start = std::time::Instant::now();

        let options = PutOptions {
            attributes: content_type_attributes(content_type),
            ..Default::default()
        };

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(bytes), options)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    /// Stream `source` into a multipart upload; memory use is bounded by the part
    /// size times [`MAX_CONCURRENT_PARTS`], whatever the file size.
    async fn put_file_multipart(
        &self,
        storage_key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<u64> {
        let location = ObjectPath::from(storage_key.to_string());
        let mut file = tokio::fs::File::open(source).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to open {}: {}", source.display(), e))
        })?;

        let options = PutMultipartOptions {
            attributes: content_type_attributes(content_type),
            ..Default::default()
        };
        let upload = self
            .store
            .put_multipart_opts(&location, options)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        let mut writer = WriteMultipart::new(upload);

        let mut buf = vec![0u8; READ_CHUNK_BYTES];
        let mut size: u64 = 0;
        loop {
            let read = match file.read(&mut buf).await {
                Ok(0) => break,
                Ok(read) => read,
                Err(e) => {
                    abort_upload(writer, storage_key).await;
                    return Err(StorageError::UploadFailed(format!(
                        "Failed to read {}: {}",
                        source.display(),
                        e
                    )));
                }
            };
            if let Err(e) = writer.wait_for_capacity(MAX_CONCURRENT_PARTS).await {
                abort_upload(writer, storage_key).await;
                return Err(StorageError::UploadFailed(e.to_string()));
            }
            writer.write(&buf[..read]);
            size += read as u64;
        }

        writer
            .finish()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        Ok(size)
    }
}

async fn abort_upload(writer: WriteMultipart, storage_key: &str) {
    if let Err(e) = writer.abort().await {
        tracing::warn!(error = %e, key = %storage_key, "Failed to abort S3 multipart upload");
    }
}

fn content_type_attributes(content_type: &str) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert(Attribute::ContentType, content_type.to_string().into());
    attributes
}

/// Public URL for an object.
///
/// Preference order: CDN distribution, custom endpoint (path-style), standard AWS host.
fn object_url(
    cdn_base_url: Option<&str>,
    endpoint_url: Option<&str>,
    bucket: &str,
    region: &str,
    key: &str,
) -> String {
    if let Some(cdn) = cdn_base_url {
        format!("{}/{}", cdn, key)
    } else if let Some(endpoint) = endpoint_url {
        format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
    } else {
        format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        self.put_with_content_type(storage_key, Bytes::from(data), content_type)
            .await?;
        Ok(self.public_url(storage_key))
    }

    async fn upload_file(
        &self,
        storage_key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<String> {
        let start = std::time::Instant::now();

        let size = self
            .put_file_multipart(storage_key, source, content_type)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 multipart upload failed"
                );
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 multipart upload successful"
        );

        Ok(self.public_url(storage_key))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let location = ObjectPath::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        match result {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    fn public_url(&self, storage_key: &str) -> String {
        object_url(
            self.cdn_base_url.as_deref(),
            self.endpoint_url.as_deref(),
            &self.bucket,
            &self.region,
            storage_key,
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
