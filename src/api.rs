// API client module: the vendor file-storage endpoint seen through the
// `FileStore` trait, plus a small blocking HTTP implementation of it that
// talks to the OpenAI Files API.

use crate::config::Config;
use reqwest::blocking::{multipart, Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Purpose tag used for every file this tool manages.
pub const ASSISTANTS_PURPOSE: &str = "assistants";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{action} failed: {status} - {message}")]
    Status {
        action: &'static str,
        status: StatusCode,
        message: String,
    },
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

/// Metadata the vendor keeps for each stored file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub bytes: Option<u64>,
    pub created_at: i64,
    pub filename: String,
    pub purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// One page of a file listing. `has_more` is set when the vendor holds
/// further pages that were not fetched.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FileList {
    pub data: Vec<FileRecord>,
    #[serde(default)]
    pub has_more: bool,
}

/// Acknowledgement returned by a delete call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DeleteAck {
    pub id: String,
    #[serde(default)]
    pub deleted: bool,
}

/// The three remote calls the menu needs. Implementations hold no copy of
/// the remote set; every `list` is a fresh snapshot.
pub trait FileStore {
    /// Upload the file at `path` tagged with `purpose`.
    fn upload(&self, path: &Path, purpose: &str) -> Result<FileRecord, ApiError>;

    /// Fetch the first page of files tagged with `purpose`.
    fn list(&self, purpose: &str) -> Result<FileList, ApiError>;

    /// Delete the file with the given id.
    fn delete(&self, id: &str) -> Result<DeleteAck, ApiError>;
}

/// Blocking client for the OpenAI Files API. The credential and optional
/// organization/project headers are attached to every request.
#[derive(Clone)]
pub struct OpenAiFiles {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiFiles {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .default_headers(Self::default_headers(config)?)
            .build()?;
        Ok(OpenAiFiles {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn default_headers(config: &Config) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        if let Some(org) = &config.organization {
            headers.insert("openai-organization", HeaderValue::from_str(org)?);
        }
        if let Some(project) = &config.project {
            headers.insert("openai-project", HeaderValue::from_str(project)?);
        }
        Ok(headers)
    }

    fn files_url(&self) -> String {
        format!("{}/files", self.base_url)
    }

    /// Turn a non-2xx response into `ApiError::Status`, preferring the
    /// vendor's `error.message` over the raw body.
    fn check(res: Response, action: &'static str) -> Result<Response, ApiError> {
        let status = res.status();
        debug!(action, %status, "files endpoint responded");
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        Err(ApiError::Status {
            action,
            status,
            message,
        })
    }
}

impl FileStore for OpenAiFiles {
    fn upload(&self, path: &Path, purpose: &str) -> Result<FileRecord, ApiError> {
        let open_err = |source| ApiError::Open {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(open_err)?;
        let len = file.metadata().map_err(open_err)?.len();
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".into());
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        let part = multipart::Part::reader_with_length(file, len)
            .file_name(file_name)
            .mime_str(mime.as_ref())?;
        let form = multipart::Form::new()
            .text("purpose", purpose.to_string())
            .part("file", part);

        debug!(path = %path.display(), purpose, bytes = len, "uploading file");
        let res = self.client.post(self.files_url()).multipart(form).send()?;
        Ok(Self::check(res, "Upload")?.json()?)
    }

    fn list(&self, purpose: &str) -> Result<FileList, ApiError> {
        debug!(purpose, "listing files");
        let res = self
            .client
            .get(self.files_url())
            .query(&[("purpose", purpose)])
            .send()?;
        Ok(Self::check(res, "List")?.json()?)
    }

    fn delete(&self, id: &str) -> Result<DeleteAck, ApiError> {
        debug!(id, "deleting file");
        let url = format!("{}/{}", self.files_url(), id);
        let res = self.client.delete(url).send()?;
        let ack: DeleteAck = Self::check(res, "Delete")?.json()?;
        if !ack.deleted {
            warn!(id = %ack.id, "vendor did not confirm deletion");
        }
        Ok(ack)
    }
}
