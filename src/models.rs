// Records exchanged with the project import API.
// Response records tolerate missing and `null` fields: anything the server
// leaves out decodes to its empty value, so a sparse body such as
// `{"id":42,"import_status":"scheduled"}` is still a valid status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// One upload to perform: where the archive comes from and where the
/// project should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    /// Destination group. `None` or blank means the token owner's namespace.
    pub namespace: Option<String>,
    pub path: String,
    pub archive: PathBuf,
}

impl ImportRequest {
    pub fn new(namespace: Option<String>, path: impl Into<String>, archive: impl Into<PathBuf>) -> Self {
        ImportRequest {
            namespace,
            path: path.into(),
            archive: archive.into(),
        }
    }

    /// The namespace to send, if any. Blank values are treated as absent.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace
            .as_deref()
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
    }
}

/// Follow-up links returned with a freshly created import.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportLinks {
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub web_url: String,
}

/// Response of `POST /api/v4/projects/import`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportCreated {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name_with_namespace: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path_with_namespace: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub export_status: String,
    #[serde(rename = "_links", default, deserialize_with = "null_as_default")]
    pub links: ImportLinks,
}

/// Response of `GET /api/v4/projects/:id/import`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name_with_namespace: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path_with_namespace: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub import_status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub correlation_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub failed_relations: Vec<FailedRelation>,
}

impl ImportStatus {
    pub fn state(&self) -> ImportState {
        ImportState::from_status(&self.import_status)
    }
}

/// A relation the server could not rebuild while importing.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FailedRelation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exception_class: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exception_message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relation_name: String,
}

/// Coarse view of the free-form `import_status` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportState {
    Finished,
    Failed,
    /// The server sent no status at all, or the literal `nil`.
    Empty,
    /// Anything else (`scheduled`, `started`, `regeneration_in_progress`, ...).
    InProgress(String),
}

impl ImportState {
    pub fn from_status(status: &str) -> Self {
        match status {
            "finished" => ImportState::Finished,
            "failed" => ImportState::Failed,
            "" | "nil" => ImportState::Empty,
            other => ImportState::InProgress(other.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ImportState::InProgress(_))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
