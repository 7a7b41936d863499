//! JSON-lines request/response types for `pdf-sorter serve`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sorter_core::models::{ByteRange, MoveRequest};
use sorter_core::SorterError;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    ScanDirectory {
        path: PathBuf,
    },
    Preview {
        path: PathBuf,
    },
    AllPages {
        path: PathBuf,
    },
    PageCount {
        path: PathBuf,
    },
    PreviewImage {
        path: PathBuf,
    },
    ValidateFolder {
        path: PathBuf,
    },
    MovePdf(MoveRequest),
    Undo {
        sorted_path: PathBuf,
        #[serde(default)]
        backup_path: Option<PathBuf>,
        original_folder: PathBuf,
    },
    Pdf {
        path: PathBuf,
        #[serde(default)]
        range: Option<ByteRange>,
    },
    PickFolder,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    #[serde(default)]
    pub id: Option<u64>,
    /// HTTP-style status code.
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    pub fn ok(body: Value) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: Value) -> Self {
        Self {
            id: None,
            status,
            body: Some(body),
            error: None,
        }
    }

    pub fn failure(status: u16, kind: &str, message: impl Into<String>) -> Self {
        Self {
            id: None,
            status,
            body: None,
            error: Some(ErrorBody {
                kind: kind.to_string(),
                message: message.into(),
                backup_path: None,
            }),
        }
    }

    pub fn from_error(status: u16, err: &SorterError) -> Self {
        let mut resp = Self::failure(status, err.kind(), err.to_string());
        if let Some(body) = resp.error.as_mut() {
            body.backup_path = err.backup_path().cloned();
        }
        resp
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Splits a request line into its optional `id` and the request itself.
pub fn parse_line(line: &str) -> (Option<u64>, Result<Request, String>) {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return (None, Err(format!("invalid json: {}", e))),
    };
    let id = value.get("id").and_then(Value::as_u64);
    let req = serde_json::from_value(value).map_err(|e| format!("invalid request: {}", e));
    (id, req)
}
