//! Degreed client
//!
//! Uses the OAuth password grant. Course imports and completions need
//! different scopes, so each scope keeps its own session. Sessions are
//! created on first use.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use channelsync_common::time::Clock;
use channelsync_common::{AccessToken, CredentialSession, SessionState};
use channelsync_core::ChannelApiClient;
use channelsync_domain::constants::{DEGREED_COMPLETION_SCOPE, DEGREED_CONTENT_SCOPE};
use channelsync_domain::{DegreedCredentials, GlobalChannelConfiguration, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use tracing::debug;

use super::oauth::access_token_from_response;
use crate::http::HttpClient;

pub struct DegreedClient {
    http: HttpClient,
    credentials: DegreedCredentials,
    oauth_url: String,
    completion_url: String,
    course_url: String,
    content_session: CredentialSession,
    completion_session: CredentialSession,
    clock: Arc<dyn Clock>,
}

impl DegreedClient {
    pub fn new(
        credentials: DegreedCredentials,
        global: &GlobalChannelConfiguration,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        let base_url = credentials.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            http,
            oauth_url: format!("{base_url}{}", global.oauth_api_path),
            completion_url: format!("{base_url}{}", global.completion_status_api_path),
            course_url: format!("{base_url}{}", global.course_api_path),
            credentials,
            content_session: CredentialSession::new(Arc::clone(&clock)),
            completion_session: CredentialSession::new(Arc::clone(&clock)),
            clock,
        })
    }

    pub async fn content_session_state(&self) -> SessionState {
        self.content_session.state().await
    }

    pub async fn completion_session_state(&self) -> SessionState {
        self.completion_session.state().await
    }

    async fn request_token(&self, scope: &str) -> Result<AccessToken> {
        let form = [
            ("grant_type", "password"),
            ("username", self.credentials.user_id.as_str()),
            ("password", self.credentials.user_password.as_str()),
            ("scope", scope),
        ];

        let request = self
            .http
            .request(Method::POST, &self.oauth_url)
            .basic_auth(&self.credentials.key, Some(&self.credentials.secret))
            .form(&form);

        let (status, text) = self.http.send_for_text(request).await?;
        debug!(status, scope, "Degreed token response");
        access_token_from_response(status, &text, self.clock.now())
    }

    async fn post_json(&self, url: &str, session: &CredentialSession, scope: &str, payload: &str) -> Result<(u16, String)> {
        let bearer = session.bearer(|| self.request_token(scope)).await?;
        let request = self
            .http
            .request(Method::POST, url)
            .bearer_auth(bearer)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_string());
        let (status, body) = self.http.send_for_text(request).await?;
        if status == 401 {
            debug!(status, scope, "Degreed request unauthorized; dropping cached session");
            session.invalidate().await;
        }
        Ok((status, body))
    }
}

#[async_trait]
impl ChannelApiClient for DegreedClient {
    /// The learner id travels inside the payload envelope.
    async fn send_completion_status(&self, _remote_user_id: &str, payload: &str) -> Result<(u16, String)> {
        self.post_json(&self.completion_url, &self.completion_session, DEGREED_COMPLETION_SCOPE, payload)
            .await
    }

    async fn send_course_import(&self, payload: &str) -> Result<(u16, String)> {
        self.post_json(&self.course_url, &self.content_session, DEGREED_CONTENT_SCOPE, payload).await
    }
}
