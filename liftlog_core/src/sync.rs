//! Best-effort remote sync of the two data blobs.
//!
//! The remote store speaks a small JSON protocol: `GET /api/me` answers the
//! signed-in identity, and `GET`/`PUT /api/data?file=<name>` read and write
//! whole blobs. Blob content travels as a JSON string inside the envelope,
//! so the remote never needs to understand the schema. Authentication is an
//! opaque session cookie taken from the config. Last write wins; there are
//! no retries and no partial-write rollback.

use crate::config::SyncConfig;
use crate::store::{TYPES_FILE, WORKOUTS_FILE};
use crate::types::{ExerciseType, Workout};
use crate::{Error, Result};
use reqwest::blocking::Client;
use reqwest::header::COOKIE;
use serde::{Deserialize, Serialize};

/// Envelope for blob reads
#[derive(Debug, Deserialize)]
struct DataResponse {
    ok: bool,
    #[serde(default)]
    content: Option<String>,
}

/// Envelope for blob writes
#[derive(Debug, Serialize)]
struct DataRequest<'a> {
    content: &'a str,
}

/// Result of an auth check; `ok: false` covers every failure mode
#[derive(Debug, Deserialize)]
pub struct AuthStatus {
    pub ok: bool,
    #[serde(default)]
    pub login: Option<String>,
}

impl AuthStatus {
    fn signed_out() -> Self {
        Self {
            ok: false,
            login: None,
        }
    }
}

/// Blocking client for the remote store
pub struct SyncClient {
    client: Client,
    base_url: String,
    session_cookie: String,
}

impl SyncClient {
    /// Build a client from the sync section of the config
    ///
    /// Errors when the section is incomplete; sync is strictly opt-in.
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        let base_url = config.api_base_url.clone().ok_or_else(|| {
            Error::Sync("sync is not configured: set [sync] api_base_url in config.toml".into())
        })?;
        let session_cookie = config.session_cookie.clone().ok_or_else(|| {
            Error::Sync("sync is not configured: set [sync] session_cookie in config.toml".into())
        })?;

        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_cookie,
        })
    }

    /// Ask the remote who we are signed in as
    ///
    /// Network failures and non-OK statuses read as signed out, never as
    /// errors.
    pub fn check_auth(&self) -> AuthStatus {
        let url = format!("{}/api/me", self.base_url);
        let response = self
            .client
            .get(url)
            .header(COOKIE, &self.session_cookie)
            .send();

        match response {
            Ok(r) if r.status().is_success() => {
                r.json().unwrap_or_else(|_| AuthStatus::signed_out())
            }
            _ => AuthStatus::signed_out(),
        }
    }

    /// Fetch both blobs from the remote
    pub fn pull(&self) -> Result<(Vec<ExerciseType>, Vec<Workout>)> {
        let types = self.fetch_blob::<Vec<ExerciseType>>(TYPES_FILE)?;
        let workouts = self.fetch_blob::<Vec<Workout>>(WORKOUTS_FILE)?;
        Ok((types, workouts))
    }

    /// Push both blobs to the remote, types first
    ///
    /// Two sequential PUTs; a failure of the second leaves the first in
    /// place on the remote (last write wins, no rollback).
    pub fn push(&self, types: &[ExerciseType], workouts: &[Workout]) -> Result<()> {
        self.put_blob(TYPES_FILE, &serde_json::to_string_pretty(types)?)?;
        self.put_blob(WORKOUTS_FILE, &serde_json::to_string_pretty(workouts)?)?;
        Ok(())
    }

    fn fetch_blob<T: serde::de::DeserializeOwned + Default>(&self, file: &str) -> Result<T> {
        let url = format!("{}/api/data?file={}", self.base_url, file);
        let response = self
            .client
            .get(url)
            .header(COOKIE, &self.session_cookie)
            .send()?
            .error_for_status()?;

        let envelope: DataResponse = response.json()?;
        decode_blob(envelope)
    }

    fn put_blob(&self, file: &str, content: &str) -> Result<()> {
        let url = format!("{}/api/data?file={}", self.base_url, file);
        self.client
            .put(url)
            .header(COOKIE, &self.session_cookie)
            .json(&DataRequest { content })
            .send()?
            .error_for_status()?;

        tracing::info!("Pushed {} to remote", file);
        Ok(())
    }
}

/// Decode a blob envelope; a not-ok or empty envelope yields the default
fn decode_blob<T: serde::de::DeserializeOwned + Default>(envelope: DataResponse) -> Result<T> {
    if !envelope.ok {
        return Ok(T::default());
    }
    let content = envelope.content.unwrap_or_default();
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(&content)?)
}
