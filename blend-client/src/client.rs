//! Identifier Resolver and Persistence Client
//!
//! One save performs exactly one create or update request, preceded by at
//! most one Get-latest lookup when the session does not know its record yet.
//! No timeouts or retries: a failure is reported to the caller at once.

use blend_common::api::{ErrorResponse, SaveResponse, BLEND_PATH, LATEST_PATH};
use blend_common::{BlendId, BlendSnapshot};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};

use crate::error::SaveError;
use crate::session::{ResolvePolicy, SaveSession};

const USER_AGENT: &str = concat!("blend-client/", env!("CARGO_PKG_VERSION"));

/// Whether a save created a record or updated the session's record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAction {
    Created,
    Updated,
}

/// Successful save, confirmed by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub id: BlendId,
    pub action: SaveAction,
}

impl fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Saved to database (id: {})", self.id)
    }
}

/// HTTP client for the blend API
pub struct BlendClient {
    http: reqwest::Client,
    api_base: Url,
    policy: ResolvePolicy,
}

impl BlendClient {
    /// Client for a server root such as `http://127.0.0.1:5000`; the API
    /// lives under `<server>/api`.
    pub fn new(server: &str, policy: ResolvePolicy) -> Result<Self, SaveError> {
        let mut api_base =
            Url::parse(server).map_err(|e| SaveError::InvalidServerUrl(format!("{}: {}", server, e)))?;
        if api_base.cannot_be_a_base() {
            return Err(SaveError::InvalidServerUrl(server.to_string()));
        }
        if let Ok(mut segments) = api_base.path_segments_mut() {
            segments.pop_if_empty().push("api");
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SaveError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_base,
            policy,
        })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// API URL for a route such as `/blend/latest`
    pub(crate) fn endpoint(&self, path: &str) -> Url {
        self.url_for(path.split('/').filter(|s| !s.is_empty()))
    }

    /// API URL from raw segments; each segment is percent-encoded
    fn url_for<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Ask the server for the latest record's id
    ///
    /// `Ok(None)` only when the server says there is no record (404).
    pub async fn fetch_latest_id(&self) -> Result<Option<BlendId>, SaveError> {
        let response = self
            .http
            .get(self.endpoint(LATEST_PATH))
            .send()
            .await
            .map_err(|e| SaveError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SaveError::Rejected {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SaveError::MalformedResponse(e.to_string()))?;

        match body.get("_id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => Ok(Some(BlendId::new(id))),
            _ => Err(SaveError::MalformedResponse(
                "latest record has no _id".to_string(),
            )),
        }
    }

    /// The id this session should update, if any
    ///
    /// A cached id short-circuits without any request. Otherwise the latest
    /// record is looked up and, when found, cached in the session. Lookup
    /// failures follow the client's [`ResolvePolicy`].
    pub async fn resolve(&self, session: &mut SaveSession) -> Result<Option<BlendId>, SaveError> {
        if let Some(id) = session.blend_id() {
            return Ok(Some(id.clone()));
        }

        match self.fetch_latest_id().await {
            Ok(Some(id)) => {
                debug!(id = %id, "Resolved latest blend");
                session.remember(id.clone());
                Ok(Some(id))
            }
            Ok(None) => {
                debug!("No blend stored yet");
                Ok(None)
            }
            Err(e) => match self.policy {
                ResolvePolicy::Lenient => {
                    warn!("Latest blend lookup failed, saving as new: {}", e);
                    Ok(None)
                }
                ResolvePolicy::Strict => Err(SaveError::Resolve(e.to_string())),
            },
        }
    }

    /// Create or update the session's blend with this snapshot
    ///
    /// On success the session remembers the server-confirmed id; on failure
    /// it is left as it was. An update the server answers with 404 means the
    /// record is gone: the session forgets it and the snapshot is created as
    /// a new blend instead.
    pub async fn save(
        &self,
        session: &mut SaveSession,
        snapshot: &BlendSnapshot,
    ) -> Result<SaveOutcome, SaveError> {
        let target = self.resolve(session).await?;

        let outcome = match (self.submit(target.as_ref(), snapshot).await, &target) {
            (Err(SaveError::Rejected { status: 404, .. }), Some(stale)) => {
                warn!(id = %stale, "Blend no longer exists, saving as new");
                session.forget();
                self.submit(None, snapshot).await?
            }
            (result, _) => result?,
        };

        session.remember(outcome.id.clone());
        info!(id = %outcome.id, action = ?outcome.action, "Blend saved");

        Ok(outcome)
    }

    /// One create (no target) or update request
    async fn submit(
        &self,
        target: Option<&BlendId>,
        snapshot: &BlendSnapshot,
    ) -> Result<SaveOutcome, SaveError> {
        let (request, action) = match target {
            Some(id) => (
                self.http.put(self.url_for(["blend", id.as_str()])),
                SaveAction::Updated,
            ),
            None => (self.http.post(self.endpoint(BLEND_PATH)), SaveAction::Created),
        };

        let response = request
            .json(snapshot)
            .send()
            .await
            .map_err(|e| SaveError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            warn!(status = status.as_u16(), "Save rejected: {}", message);
            return Err(SaveError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let confirmed = response
            .json::<SaveResponse>()
            .await
            .ok()
            .and_then(|body| body.id);

        let id = match (confirmed, target) {
            (Some(confirmed), Some(target)) if &confirmed != target => {
                warn!(sent = %target, confirmed = %confirmed, "Server confirmed a different blend id");
                confirmed
            }
            (Some(confirmed), _) => confirmed,
            (None, Some(target)) => target.clone(),
            (None, None) => {
                return Err(SaveError::MalformedResponse(
                    "create response carried no id".to_string(),
                ))
            }
        };

        Ok(SaveOutcome { id, action })
    }
}

/// Human-readable message from an error response; falls back to the status
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => format!("HTTP {}", status.as_u16()),
    }
}
