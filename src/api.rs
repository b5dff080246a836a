// API client module: a small blocking HTTP client for the project import
// endpoints of a GitLab-compatible server. One `reqwest` client is built
// up front and reused for every upload and status poll.

use crate::error::{ImportError, ImportResult};
use crate::models::{ImportCreated, ImportRequest, ImportStatus};
use reqwest::blocking::{multipart, Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::time::Duration;
use tracing::info;

const PRIVATE_TOKEN: &str = "private-token";

/// Holds the reqwest blocking client, the server base URL and the personal
/// access token sent with every call.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
    debug: bool,
}

impl ApiClient {
    /// Build a client for `base_url` (e.g. `https://gitlab.example.com`).
    /// With `debug` set, raw and decoded response bodies are logged.
    pub fn new(base_url: &str, token: &str, debug: bool) -> ImportResult<Self> {
        // Imports of large archives can take a while to upload, so no
        // overall request timeout.
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| ImportError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            debug,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an `/api/v4` resource.
    pub fn endpoint(&self, resource: &str) -> String {
        format!("{}/api/v4/{}", self.base_url, resource.trim_start_matches('/'))
    }

    fn auth_headers(&self) -> ImportResult<HeaderMap> {
        let value = HeaderValue::from_str(&self.token)
            .map_err(|e| ImportError::Request(format!("invalid PRIVATE-TOKEN value: {e}")))?;
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(PRIVATE_TOKEN), value);
        Ok(headers)
    }

    /// Upload an exported project archive to `/projects/import`.
    pub fn import_project(&self, request: &ImportRequest) -> ImportResult<ImportCreated> {
        let url = self.endpoint("projects/import");
        let form = build_import_form(request)?;

        let res = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .multipart(form)
            .send()
            .map_err(|source| ImportError::Transport { url: url.clone(), source })?;
        self.read_json(&url, "Import", res)
    }

    /// Fetch the import status of project `project_id`.
    pub fn import_status(&self, project_id: u64) -> ImportResult<ImportStatus> {
        let url = self.endpoint(&format!("projects/{project_id}/import"));
        let res = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .map_err(|source| ImportError::Transport { url: url.clone(), source })?;
        self.read_json(&url, "Status", res)
    }

    fn read_json<T: DeserializeOwned + Debug>(&self, url: &str, label: &str, res: Response) -> ImportResult<T> {
        let status = res.status();
        let body = res.text().map_err(|source| ImportError::BodyRead {
            url: url.to_string(),
            source,
        })?;
        if self.debug {
            info!("{label} response ({status}): {body}");
        }

        if !status.is_success() {
            return Err(ImportError::Api { status, body });
        }

        let record = match serde_json::from_str::<T>(&body) {
            Ok(record) => record,
            Err(source) => return Err(ImportError::Decode { body, source }),
        };
        if self.debug {
            info!("{label} decoded: {record:?}");
        }
        Ok(record)
    }
}

/// Multipart form for an import upload: the archive as a `file` part, the
/// destination `path`, the `namespace` when one is set, and the archive
/// location again as a plain `file` text field.
pub fn build_import_form(request: &ImportRequest) -> ImportResult<multipart::Form> {
    let bytes = std::fs::read(&request.archive).map_err(|source| ImportError::ArchiveOpen {
        path: request.archive.clone(),
        source,
    })?;
    let file_name = request
        .archive
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| request.archive.display().to_string());

    let part = multipart::Part::bytes(bytes)
        .file_name(file_name)
        .mime_str("application/octet-stream")
        .map_err(|e| ImportError::Request(format!("invalid archive MIME type: {e}")))?;

    let mut form = multipart::Form::new()
        .part("file", part)
        .text("path", request.path.clone());
    if let Some(namespace) = request.namespace() {
        form = form.text("namespace", namespace.to_string());
    }
    Ok(form.text("file", request.archive.display().to_string()))
}
