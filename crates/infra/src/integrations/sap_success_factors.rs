//! SAP SuccessFactors OCN client
//!
//! Course imports use a shared session token for the configured admin user.
//! Completion posts mint a fresh token scoped to the learner being reported.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use channelsync_common::time::Clock;
use channelsync_common::{AccessToken, CredentialSession, SessionState};
use channelsync_core::ChannelApiClient;
use channelsync_domain::constants::{SAP_LEARNER_USER_TYPE, SAP_RESOURCE_TYPE};
use channelsync_domain::{GlobalChannelConfiguration, Result, SapSuccessFactorsCredentials};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use super::oauth::access_token_from_response;
use crate::http::HttpClient;

pub struct SapSuccessFactorsClient {
    http: HttpClient,
    credentials: SapSuccessFactorsCredentials,
    oauth_url: String,
    completion_url: String,
    course_url: String,
    session: CredentialSession,
    clock: Arc<dyn Clock>,
}

impl SapSuccessFactorsClient {
    /// Build a client and establish its shared session.
    ///
    /// Fails when the token exchange for the configured admin user fails.
    pub async fn connect(
        credentials: SapSuccessFactorsCredentials,
        global: &GlobalChannelConfiguration,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        let base_url = credentials.base_url.trim_end_matches('/').to_string();

        let client = Self {
            http,
            oauth_url: format!("{base_url}{}", global.oauth_api_path),
            completion_url: format!("{base_url}{}", global.completion_status_api_path),
            course_url: format!("{base_url}{}", global.course_api_path),
            credentials,
            session: CredentialSession::new(Arc::clone(&clock)),
            clock,
        };

        client.session_bearer().await?;
        info!(company_id = %client.credentials.company_id, "SAP SuccessFactors session established");
        Ok(client)
    }

    pub async fn session_state(&self) -> SessionState {
        self.session.state().await
    }

    async fn request_token(&self, user_id: &str, user_type: &str) -> Result<AccessToken> {
        let body = json!({
            "grant_type": "client_credentials",
            "scope": {
                "userId": user_id,
                "companyId": self.credentials.company_id,
                "userType": user_type,
                "resourceType": SAP_RESOURCE_TYPE,
            }
        });

        let request = self
            .http
            .request(Method::POST, &self.oauth_url)
            .basic_auth(&self.credentials.key, Some(&self.credentials.secret))
            .json(&body);

        let (status, text) = self.http.send_for_text(request).await?;
        debug!(status, user_type, "SAP SuccessFactors token response");
        access_token_from_response(status, &text, self.clock.now())
    }

    async fn session_bearer(&self) -> Result<String> {
        self.session
            .bearer(|| self.request_token(&self.credentials.user_id, &self.credentials.user_type))
            .await
    }

    async fn post_json(&self, url: &str, bearer: &str, payload: &str) -> Result<(u16, String)> {
        let request = self
            .http
            .request(Method::POST, url)
            .bearer_auth(bearer)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_string());
        self.http.send_for_text(request).await
    }
}

#[async_trait]
impl ChannelApiClient for SapSuccessFactorsClient {
    async fn send_completion_status(&self, remote_user_id: &str, payload: &str) -> Result<(u16, String)> {
        let token = self.request_token(remote_user_id, SAP_LEARNER_USER_TYPE).await?;
        self.post_json(&self.completion_url, token.secret(), payload).await
    }

    async fn send_course_import(&self, payload: &str) -> Result<(u16, String)> {
        let bearer = self.session_bearer().await?;
        let (status, body) = self.post_json(&self.course_url, &bearer, payload).await?;
        if status == 401 {
            debug!(status, "Course import unauthorized; dropping cached session");
            self.session.invalidate().await;
        }
        Ok((status, body))
    }
}
