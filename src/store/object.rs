//! S3-compatible object store backend over plain HTTP
//!
//! Uses path-style addressing (`{endpoint}/{bucket}/{key}`). Authentication
//! is an optional bearer token; request signing is expected to be handled by
//! a gateway in front of the bucket.

use super::backend::{StorageBackend, StorageError, StorageErrorCode, StorageInfo};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;

pub struct ObjectStoreBackend {
    client: Client,
    endpoint: String,
    bucket: String,
    key: String,
    token: Option<String>,
}

impl ObjectStoreBackend {
    /// # Errors
    /// Returns a network error if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::new(StorageErrorCode::Network, e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            key: key.into(),
            token,
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn put_object(&self, key: &str, body: &str) -> Result<(), StorageError> {
        let req = self
            .client
            .put(self.object_url(key))
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body.to_string());
        let resp = self.authorize(req).send().await.map_err(network)?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(status_error("PUT", key, resp.status()))
        }
    }
}

fn network(err: reqwest::Error) -> StorageError {
    StorageError::new(StorageErrorCode::Network, err.to_string())
}

fn status_error(method: &str, key: &str, status: StatusCode) -> StorageError {
    StorageError::new(
        StorageErrorCode::Status,
        format!("{method} {key} returned {status}"),
    )
}

#[async_trait]
impl StorageBackend for ObjectStoreBackend {
    fn info(&self) -> StorageInfo {
        StorageInfo {
            provider: "s3",
            kind: "object_store",
            location: self.object_url(&self.key),
        }
    }

    async fn get(&self) -> Result<Option<String>, StorageError> {
        let req = self.client.get(self.object_url(&self.key));
        let resp = self.authorize(req).send().await.map_err(network)?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => resp.text().await.map(Some).map_err(network),
            s => Err(status_error("GET", &self.key, s)),
        }
    }

    async fn put(&self, document: &str) -> Result<(), StorageError> {
        self.put_object(&self.key, document).await
    }

    async fn put_backup(&self, stamp: &str, document: &str) -> Result<String, StorageError> {
        let key = format!("backups/words-backup-{stamp}.txt");
        self.put_object(&key, document).await?;
        Ok(format!("{}/{}", self.bucket, key))
    }

    async fn probe(&self) -> Result<(), StorageError> {
        let req = self.client.head(self.object_url(&self.key));
        let resp = self.authorize(req).send().await.map_err(network)?;
        // A missing object still proves the bucket is reachable.
        if resp.status().is_success() || resp.status() == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(status_error("HEAD", &self.key, resp.status()))
        }
    }
}
