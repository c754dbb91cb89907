//! Blocking HTTP implementation of the remote catalog and playlist APIs.
//!
//! Every call is a form POST of `method=<name>` plus parameters to the
//! configured endpoint, authorized with a pre-issued bearer token. Replies
//! use the envelope `{"status": "ok", "result": ...}`.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::errors::{Result, SyncError};
use crate::models::{PlaylistContents, PlaylistSummary, SearchQuery, SearchResults};
use crate::remote::{Catalog, PlaylistService, Session};

/// Remote adapter backed by `ureq`.
pub struct HttpService {
    agent: ureq::Agent,
    api_base: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct OwnedPlaylists {
    #[serde(default)]
    owned: Vec<PlaylistSummary>,
}

#[derive(Deserialize)]
struct CreatedPlaylist {
    key: String,
}

impl HttpService {
    pub fn new(api_base: &str, token: Option<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        Self {
            agent,
            api_base: api_base.trim().to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.api_base,
            config.access_token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn call(&self, method: &str, params: &[(&str, &str)]) -> Result<Value> {
        let token = self.token.as_deref().ok_or(SyncError::NotAuthenticated)?;
        let mut form: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 1);
        form.push(("method", method));
        form.extend_from_slice(params);

        debug!("POST {} method={}", self.api_base, method);
        let response = self
            .agent
            .post(&self.api_base)
            .set("Authorization", &format!("Bearer {token}"))
            .send_form(&form)
            .map_err(|err| SyncError::remote(method, err))?;
        let body: Value = response
            .into_json()
            .map_err(|err| SyncError::remote(method, format!("response parse failed: {err}")))?;
        unwrap_envelope(method, body)
    }

    fn call_as<T: DeserializeOwned>(&self, method: &str, params: &[(&str, &str)]) -> Result<T> {
        let result = self.call(method, params)?;
        serde_json::from_value(result)
            .map_err(|err| SyncError::remote(method, format!("unexpected result shape: {err}")))
    }
}

/// Extract `result` from an `ok` envelope, or turn the envelope into an error.
fn unwrap_envelope(method: &str, body: Value) -> Result<Value> {
    let status = body.get("status").and_then(Value::as_str).unwrap_or_default();
    if status != "ok" {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("remote returned an error");
        return Err(SyncError::remote(method, message));
    }
    Ok(body.get("result").cloned().unwrap_or(Value::Null))
}

impl Catalog for HttpService {
    fn search(&self, query: &SearchQuery) -> Result<SearchResults> {
        let match_any = query.match_any.to_string();
        self.call_as(
            "search",
            &[
                ("query", query.text.as_str()),
                ("types", query.kind.as_str()),
                ("match_any", match_any.as_str()),
            ],
        )
    }
}

impl PlaylistService for HttpService {
    fn list_owned_playlists(&self) -> Result<Vec<PlaylistSummary>> {
        let playlists: OwnedPlaylists = self.call_as("getPlaylists", &[])?;
        Ok(playlists.owned)
    }

    fn fetch_with_tracks(&self, playlist_key: &str) -> Result<PlaylistContents> {
        let mut by_key: HashMap<String, PlaylistContents> =
            self.call_as("get", &[("keys", playlist_key), ("extras", "tracks")])?;
        by_key
            .remove(playlist_key)
            .ok_or_else(|| SyncError::remote("get", format!("playlist {playlist_key} missing from reply")))
    }

    fn remove_tracks_at(
        &self,
        playlist_key: &str,
        start: usize,
        count: usize,
        track_keys: &[String],
    ) -> Result<()> {
        let start = start.to_string();
        let count = count.to_string();
        let tracks = track_keys.join(",");
        self.call(
            "removeFromPlaylist",
            &[
                ("playlist", playlist_key),
                ("index", start.as_str()),
                ("count", count.as_str()),
                ("tracks", tracks.as_str()),
            ],
        )?;
        Ok(())
    }

    fn append_tracks(&self, playlist_key: &str, track_keys: &[String]) -> Result<()> {
        let tracks = track_keys.join(",");
        self.call(
            "addToPlaylist",
            &[("playlist", playlist_key), ("tracks", tracks.as_str())],
        )?;
        Ok(())
    }

    fn create_playlist(
        &self,
        name: &str,
        description: &str,
        track_keys: &[String],
    ) -> Result<String> {
        let tracks = track_keys.join(",");
        let created: CreatedPlaylist = self.call_as(
            "createPlaylist",
            &[
                ("name", name),
                ("description", description),
                ("tracks", tracks.as_str()),
            ],
        )?;
        Ok(created.key)
    }
}

impl Session for HttpService {
    fn authenticated(&self) -> bool {
        if self.token.is_none() {
            return false;
        }
        match self.call("currentUser", &[]) {
            Ok(user) => !user.is_null(),
            Err(err) => {
                warn!("Authentication check failed: {}", err);
                false
            }
        }
    }
}
