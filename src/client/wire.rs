//! JSON bodies exchanged with master and volume nodes
//!
//! Bodies are parsed into a generic JSON object first so that a missing
//! field and a field of the wrong type surface as distinct errors.

use serde_json::{Map, Value};

use crate::common::utils::{excerpt, node_url};
use crate::common::{Error, Operation, Result};

/// Longest payload excerpt embedded in a decode error
const PAYLOAD_EXCERPT: usize = 256;

/// Upload location handed out by `GET /dir/assign`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLocation {
    /// File identifier reserved for the upload
    pub fid: String,
    /// Address clients upload to
    pub public_url: String,
    /// Address inside the cluster, when the master reports one
    pub url: Option<String>,
    /// Number of fids reserved by this assignment
    pub count: Option<u64>,
}

impl UploadLocation {
    pub fn decode(body: &[u8]) -> Result<Self> {
        let op = Operation::Assign;
        let obj = decode_object(op, body)?;

        if let Some(reason) = optional_str(&obj, "error").filter(|e| !e.is_empty()) {
            return Err(Error::Assign(reason));
        }

        Ok(Self {
            fid: required_str(op, &obj, "fid")?,
            public_url: required_str(op, &obj, "publicUrl")?,
            url: optional_str(&obj, "url"),
            count: obj.get("count").and_then(Value::as_u64),
        })
    }

    /// `http://<publicUrl>/<fid>`
    pub fn upload_url(&self) -> String {
        node_url(&self.public_url, &self.fid)
    }
}

/// Receipt returned by a volume after a `201 Created` upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResponse {
    pub fid: String,
    pub name: Option<String>,
    pub size: Option<u64>,
    pub etag: Option<String>,
}

impl UploadResponse {
    pub fn decode(body: &[u8]) -> Result<Self> {
        let op = Operation::Store;
        let obj = decode_object(op, body)?;

        Ok(Self {
            fid: required_str(op, &obj, "fid")?,
            name: optional_str(&obj, "name"),
            size: obj.get("size").and_then(Value::as_u64),
            etag: optional_str(&obj, "eTag"),
        })
    }
}

fn decode_object(operation: Operation, body: &[u8]) -> Result<Map<String, Value>> {
    let malformed = || Error::MalformedJson {
        operation,
        payload: excerpt(body, PAYLOAD_EXCERPT),
    };

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(obj)) => Ok(obj),
        Ok(_) => Err(malformed()),
        Err(e) => {
            tracing::debug!(%operation, error = %e, "response is not valid JSON");
            Err(malformed())
        }
    }
}

fn required_str(
    operation: Operation,
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<String> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(Error::MissingField { operation, field }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(Error::InvalidFieldType {
            operation,
            field,
            found: json_type(other),
        }),
    }
}

fn optional_str(obj: &Map<String, Value>, field: &str) -> Option<String> {
    obj.get(field).and_then(Value::as_str).map(str::to_string)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
