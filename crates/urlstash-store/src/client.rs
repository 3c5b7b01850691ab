//! HTTP client for the remote store contract.
//!
//! Folder creation is a `PUT` that answers `201 Created` with the new
//! node's id under `data.id`; file upload is a `PUT` carrying the raw
//! bytes. Both are scoped by the session cookie credential, the project
//! id, and a `/`-delimited destination path whose first segment names the
//! storage provider.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url, header::COOKIE};
use serde_json::Value;
use urlstash_core::{RemoteKind, RemoteNode, RemoteStore, RemoteStoreFactory, StoreError, StoreResult};

/// Name of the session cookie forwarded to the store.
const SESSION_COOKIE: &str = "osf";

/// Remote store client bound to one job's credential and project.
pub struct HttpStore {
    client: Client,
    base_url: Url,
    project_id: String,
    cookie: String,
}

impl HttpStore {
    /// Construct a client for the given store endpoint, project, and
    /// session cookie.
    #[must_use]
    pub fn new(client: Client, base_url: Url, project_id: &str, cookie: &str) -> Self {
        Self {
            client,
            base_url,
            project_id: project_id.to_string(),
            cookie: cookie.to_string(),
        }
    }

    fn cookie_header(&self) -> String {
        format!("{SESSION_COOKIE}={}", self.cookie)
    }

    /// Resolve a destination path into the provider-scoped endpoint URL.
    fn endpoint(&self, destination: &str) -> StoreResult<Url> {
        let mut segments = destination.split('/');
        let provider = segments
            .next()
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| StoreError::InvalidDestination {
                destination: destination.to_string(),
            })?;

        let mut path = format!(
            "/v1/resources/{}/providers/{provider}/",
            self.project_id
        );
        let rest = segments.collect::<Vec<_>>().join("/");
        path.push_str(&rest);

        let mut url = self.base_url.clone();
        url.set_path(&path);
        Ok(url)
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn create_folder(&self, parent: &str, name: &str) -> StoreResult<RemoteNode> {
        let url = self.endpoint(parent)?;
        let response = self
            .client
            .put(url)
            .header(COOKIE, self.cookie_header())
            .query(&[("kind", "folder"), ("name", name)])
            .send()
            .await
            .map_err(|source| StoreError::Request {
                operation: "create_folder",
                source: Box::new(source),
            })?;

        if response.status() != StatusCode::CREATED {
            return Err(StoreError::UnexpectedStatus {
                operation: "create_folder",
                status: response.status().as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|source| StoreError::Request {
                operation: "create_folder",
                source: Box::new(source),
            })?;
        let remote_id = body
            .get("data")
            .and_then(|data| data.get("id"))
            .and_then(Value::as_str)
            .ok_or(StoreError::MalformedResponse {
                operation: "create_folder",
                reason: "missing data.id",
            })?;

        Ok(RemoteNode {
            kind: RemoteKind::Folder,
            remote_id: remote_id.to_string(),
        })
    }

    async fn upload_file(&self, parent: &str, name: &str, local: &Path) -> StoreResult<()> {
        let url = self.endpoint(parent)?;
        let file = tokio::fs::File::open(local)
            .await
            .map_err(|source| StoreError::Request {
                operation: "upload_file",
                source: Box::new(source),
            })?;

        let response = self
            .client
            .put(url)
            .header(COOKIE, self.cookie_header())
            .query(&[("kind", "file"), ("name", name)])
            .body(reqwest::Body::from(file))
            .send()
            .await
            .map_err(|source| StoreError::Request {
                operation: "upload_file",
                source: Box::new(source),
            })?;

        if !response.status().is_success() {
            return Err(StoreError::UnexpectedStatus {
                operation: "upload_file",
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}

/// Factory producing per-job [`HttpStore`] handles over one shared
/// connection pool.
pub struct HttpStoreFactory {
    client: Client,
    base_url: Url,
}

impl HttpStoreFactory {
    /// Construct a factory for the given store endpoint.
    #[must_use]
    pub const fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

impl RemoteStoreFactory for HttpStoreFactory {
    fn for_job(&self, cookie: &str, project_id: &str) -> Arc<dyn RemoteStore> {
        Arc::new(HttpStore::new(
            self.client.clone(),
            self.base_url.clone(),
            project_id,
            cookie,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;

    fn store_for(server: &MockServer) -> Result<HttpStore> {
        Ok(HttpStore::new(
            Client::new(),
            server.base_url().parse()?,
            "ab12c",
            "secret-cookie",
        ))
    }

    #[tokio::test]
    async fn create_folder_extracts_remote_id() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/v1/resources/ab12c/providers/osfstorage/")
                    .query_param("kind", "folder")
                    .query_param("name", "sub")
                    .header("cookie", "osf=secret-cookie");
                then.status(201)
                    .json_body(json!({"data": {"id": "osfstorage/5a9de111"}}));
            })
            .await;

        let store = store_for(&server)?;
        let node = store.create_folder("osfstorage/", "sub").await?;
        mock.assert_async().await;
        assert_eq!(node.kind, RemoteKind::Folder);
        assert_eq!(node.remote_id, "osfstorage/5a9de111");
        Ok(())
    }

    #[tokio::test]
    async fn create_folder_routes_nested_destinations() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/v1/resources/ab12c/providers/osfstorage/5a9de111")
                    .query_param("kind", "folder")
                    .query_param("name", "deeper");
                then.status(201)
                    .json_body(json!({"data": {"id": "osfstorage/0ff1ce"}}));
            })
            .await;

        let store = store_for(&server)?;
        let node = store.create_folder("osfstorage/5a9de111", "deeper").await?;
        mock.assert_async().await;
        assert_eq!(node.remote_id, "osfstorage/0ff1ce");
        Ok(())
    }

    #[tokio::test]
    async fn create_folder_rejects_non_created_status() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path_includes("/providers/osfstorage/");
                then.status(409);
            })
            .await;

        let store = store_for(&server)?;
        let err = store
            .create_folder("osfstorage/", "sub")
            .await
            .expect_err("conflict must fail");
        assert!(matches!(
            err,
            StoreError::UnexpectedStatus {
                operation: "create_folder",
                status: 409,
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn create_folder_rejects_missing_id() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path_includes("/providers/osfstorage/");
                then.status(201).json_body(json!({"data": {}}));
            })
            .await;

        let store = store_for(&server)?;
        let err = store
            .create_folder("osfstorage/", "sub")
            .await
            .expect_err("missing id must fail");
        assert!(matches!(err, StoreError::MalformedResponse { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn upload_file_sends_raw_bytes() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/v1/resources/ab12c/providers/osfstorage/")
                    .query_param("kind", "file")
                    .query_param("name", "a.txt")
                    .header("cookie", "osf=secret-cookie")
                    .body("alpha");
                then.status(201);
            })
            .await;

        let dir = tempfile::tempdir()?;
        let local = dir.path().join("a.txt");
        std::fs::write(&local, "alpha")?;

        let store = store_for(&server)?;
        store.upload_file("osfstorage/", "a.txt", &local).await?;
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn upload_file_streams_larger_payloads() -> Result<()> {
        let server = MockServer::start_async().await;
        // Large enough to span several body chunks on the wire.
        let payload = "chunk".repeat(100_000);
        let expected = payload.clone();
        let mock = server
            .mock_async(move |when, then| {
                when.method(PUT)
                    .path("/v1/resources/ab12c/providers/osfstorage/")
                    .query_param("kind", "file")
                    .query_param("name", "big.bin")
                    .body(expected);
                then.status(201);
            })
            .await;

        let dir = tempfile::tempdir()?;
        let local = dir.path().join("big.bin");
        std::fs::write(&local, &payload)?;

        let store = store_for(&server)?;
        store.upload_file("osfstorage/", "big.bin", &local).await?;
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn upload_file_missing_local_file_errors() -> Result<()> {
        let server = MockServer::start_async().await;
        let store = store_for(&server)?;
        let err = store
            .upload_file(
                "osfstorage/",
                "ghost.txt",
                Path::new("urlstash-definitely-missing.txt"),
            )
            .await
            .expect_err("absent local file must fail");
        assert!(matches!(
            err,
            StoreError::Request {
                operation: "upload_file",
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn empty_destination_is_rejected() -> Result<()> {
        let server = MockServer::start_async().await;
        let store = store_for(&server)?;
        let err = store
            .create_folder("", "sub")
            .await
            .expect_err("empty destination must fail");
        assert!(matches!(err, StoreError::InvalidDestination { .. }));
        Ok(())
    }
}
