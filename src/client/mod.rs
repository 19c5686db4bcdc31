//! Object store client
//!
//! Three round-trip operations against a SeaweedFS-style cluster:
//! - `store`: negotiate a location with the master, then upload to the volume
//! - `fetch`: download an object from the volume by fid
//! - `delete`: remove an object from the volume by fid
//!
//! There is no retry, caching or request timeout. Wrap calls in
//! `tokio::time::timeout` when a deadline is needed.

pub mod wire;

pub use wire::{UploadLocation, UploadResponse};

use bytes::{Bytes, BytesMut};
use reqwest::{multipart, Client, Response, StatusCode};
use tracing::{debug, info, warn};

use crate::common::utils::{node_url, ASSIGN_PATH};
use crate::common::{ClientConfig, Error, Operation, Result};

/// Content type of the uploaded file part
const UPLOAD_CONTENT_TYPE: &str = "application/octet-stream";

/// Client for a master/volume object store
#[derive(Debug, Clone)]
pub struct WeedClient {
    config: ClientConfig,
    http: Client,
}

impl WeedClient {
    /// Create a client from an explicit configuration.
    ///
    /// Addresses are not validated; a bad address fails the first request
    /// that uses it.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .map_err(Error::HttpClient)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Store `data` under the advisory file `name`, returning the fid
    pub async fn store(&self, name: &str, data: impl Into<Bytes>) -> Result<String> {
        let data: Bytes = data.into();
        let location = self.assign().await?;
        let url = location.upload_url();
        debug!(%url, name, size = data.len(), "uploading object");

        let part = multipart::Part::stream(data)
            .file_name(name.to_string())
            .mime_str(UPLOAD_CONTENT_TYPE)
            .map_err(|e| Error::transport(Operation::Store, e))?;
        let form = multipart::Form::new().part("file", part);

        let resp = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::transport(Operation::Store, e))?;

        let resp = expect_status(Operation::Store, resp, StatusCode::CREATED, true).await?;
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::transport(Operation::Store, e))?;
        let receipt = UploadResponse::decode(&body)?;

        if receipt.fid != location.fid {
            warn!(
                assigned = %location.fid,
                returned = %receipt.fid,
                "volume returned a different fid"
            );
        }
        info!(fid = %receipt.fid, name, "object stored");
        Ok(receipt.fid)
    }

    /// Fetch the full body of the object identified by `fid`
    pub async fn fetch(&self, fid: &str) -> Result<Bytes> {
        let url = node_url(&self.config.volume, fid);
        debug!(%url, "fetching object");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport(Operation::Fetch, e))?;
        let resp = expect_status(Operation::Fetch, resp, StatusCode::OK, false).await?;

        let data = match self.config.max_body_bytes {
            None => resp
                .bytes()
                .await
                .map_err(|e| Error::transport(Operation::Fetch, e))?,
            Some(limit) => read_limited(resp, limit).await?,
        };
        debug!(fid, size = data.len(), "object fetched");
        Ok(data)
    }

    /// Delete the object identified by `fid`
    pub async fn delete(&self, fid: &str) -> Result<()> {
        let url = node_url(&self.config.volume, fid);
        debug!(%url, "deleting object");

        let resp = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| Error::transport(Operation::Delete, e))?;
        expect_status(Operation::Delete, resp, StatusCode::OK, false).await?;

        info!(fid, "object deleted");
        Ok(())
    }

    /// Ask the master for a fresh upload location.
    ///
    /// Each call reserves a new fid on the master; `store` calls this once
    /// per upload and never reuses the result.
    pub async fn assign(&self) -> Result<UploadLocation> {
        let url = node_url(&self.config.master, ASSIGN_PATH);
        debug!(%url, "requesting upload location");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport(Operation::Assign, e))?;
        let resp = expect_status(Operation::Assign, resp, StatusCode::OK, true).await?;
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::transport(Operation::Assign, e))?;

        let location = UploadLocation::decode(&body)?;
        debug!(fid = %location.fid, public_url = %location.public_url, "location assigned");
        Ok(location)
    }
}

/// Fail with `UnexpectedStatus` unless `resp` carries `expected`.
///
/// With `with_body` the response body is read into the error for diagnosis.
async fn expect_status(
    operation: Operation,
    resp: Response,
    expected: StatusCode,
    with_body: bool,
) -> Result<Response> {
    let status = resp.status();
    if status == expected {
        return Ok(resp);
    }

    let body = if with_body {
        // the status is the error; an unreadable body just leaves it empty
        Some(resp.text().await.unwrap_or_default())
    } else {
        None
    };
    warn!(%operation, %status, "unexpected status");
    Err(Error::UnexpectedStatus {
        operation,
        status,
        body,
    })
}

async fn read_limited(mut resp: Response, limit: u64) -> Result<Bytes> {
    if resp.content_length().is_some_and(|len| len > limit) {
        return Err(Error::BodyTooLarge { limit });
    }

    let mut buf = BytesMut::new();
    while let Some(chunk) = resp
        .chunk()
        .await
        .map_err(|e| Error::transport(Operation::Fetch, e))?
    {
        if (buf.len() + chunk.len()) as u64 > limit {
            return Err(Error::BodyTooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}
