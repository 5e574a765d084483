//! HTTP client for the Tasklane task-management API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests: it attaches the stored bearer token to outgoing calls and,
//! when the server rejects an access token, silently refreshes the
//! session and resubmits the request exactly once.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::auth::{CredentialPair, TokenStore};
use crate::models::{CreatedUser, NewTask, Registration, Task, TaskUpdate, User};

use super::response::Envelope;
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Response payload carrying only the id of a created or updated resource.
#[derive(Debug, serde::Deserialize)]
struct IdPayload {
    id: String,
}

/// Client for the Tasklane API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<TokenStore>,
    /// Serializes refresh attempts so concurrent 401s share one refresh.
    refresh_gate: Arc<tokio::sync::Mutex<()>>,
}

impl ApiClient {
    /// Create a new API client against the given base URL.
    pub fn new(base_url: impl Into<String>, tokens: Arc<TokenStore>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
            refresh_gate: Arc::new(tokio::sync::Mutex::new(())),
        })
    }

    /// Whether a session is currently stored.
    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }

    /// Access the underlying token store.
    pub fn token_store(&self) -> &TokenStore {
        &self.tokens
    }

    // ========================================================================
    // Dispatch core
    // ========================================================================

    /// Send a request, attaching the current access token if one is stored.
    ///
    /// On a 401 the session is refreshed and the request is resubmitted
    /// exactly once with the new token; the `retried` flag makes the
    /// resubmission ineligible for further refresh, so a request can
    /// never loop. Every other failure propagates unchanged.
    async fn dispatch<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut retried = false;

        loop {
            let attempt_token = self.tokens.access_token();

            let mut request = self.http.request(method.clone(), &url);
            if let Some(ref token) = attempt_token {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;

            if response.status() == StatusCode::UNAUTHORIZED
                && !retried
                && self.tokens.refresh_token().is_some()
            {
                retried = true;
                debug!(path, "Access token rejected, refreshing session");
                self.refresh_session(attempt_token).await?;
                continue;
            }

            return Self::check_response(response).await;
        }
    }

    /// Exchange the stored refresh token for a new credential pair.
    ///
    /// Concurrent callers are coalesced: the gate admits one refresh at a
    /// time, and a caller that waited while another refresh completed
    /// observes the replaced token and skips its own exchange. The
    /// transport call goes out directly rather than through `dispatch`,
    /// so a failing refresh can never trigger another refresh cycle.
    async fn refresh_session(&self, stale_access: Option<String>) -> Result<(), ApiError> {
        let _gate = self.refresh_gate.lock().await;

        if self.tokens.access_token() != stale_access {
            // Another request already refreshed while we waited.
            return Ok(());
        }

        let refresh_token = self
            .tokens
            .refresh_token()
            .ok_or(ApiError::SessionExpired)?;

        let url = format!("{}/authentications", self.base_url);
        let response = self
            .http
            .put(&url)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Token refresh rejected");
            // A rejected refresh token means the session is gone; other
            // failures (5xx, connectivity) keep their own shape. All are
            // terminal - the original request is not resubmitted.
            return Err(match ApiError::from_status(status, &body) {
                ApiError::Unauthorized | ApiError::Validation(_) | ApiError::NotFound(_) => {
                    ApiError::SessionExpired
                }
                other => other,
            });
        }

        let envelope: Envelope<CredentialPair> = response.json().await?;
        self.tokens.store(envelope.payload);
        debug!("Session refreshed");
        Ok(())
    }

    /// Check if a response is successful, unwrapping the envelope payload.
    async fn check_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            let envelope: Envelope<T> = serde_json::from_str(&body)
                .map_err(|e| ApiError::InvalidResponse(format!("Malformed envelope: {}", e)))?;
            Ok(envelope.payload)
        } else {
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.dispatch::<T, serde_json::Value>(Method::GET, path, None)
            .await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(Method::POST, path, Some(body)).await
    }

    async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(Method::PUT, path, Some(body)).await
    }

    async fn delete<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(Method::DELETE, path, body).await
    }

    // ===== Authentication =====

    /// Create a new account.
    pub async fn sign_up(&self, registration: &Registration) -> Result<CreatedUser, ApiError> {
        self.post("/users", registration).await
    }

    /// Sign in and store the returned credential pair.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let pair: CredentialPair = self
            .post(
                "/authentications",
                &json!({ "email": email, "password": password }),
            )
            .await?;
        self.tokens.store(pair);
        debug!("Signed in");
        Ok(())
    }

    /// Revoke the session server-side and clear local credentials.
    ///
    /// Local credentials are cleared even when revocation fails; the
    /// revocation error is still returned.
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        let Some(refresh_token) = self.tokens.refresh_token() else {
            // Nothing to revoke; clearing an empty store is a no-op.
            self.tokens.clear();
            return Ok(());
        };

        let result: Result<serde_json::Value, ApiError> = self
            .delete(
                "/authentications",
                Some(&json!({ "refresh_token": refresh_token })),
            )
            .await;

        self.tokens.clear();
        debug!("Signed out");
        result.map(|_| ())
    }

    /// Fetch the authenticated user's profile.
    pub async fn profile(&self) -> Result<User, ApiError> {
        self.get("/authentications").await
    }

    // ===== Tasks =====

    /// Fetch all tasks for the authenticated user.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.get("/tasks").await
    }

    /// Fetch a single task by id.
    pub async fn get_task(&self, task_id: &str) -> Result<Task, ApiError> {
        self.get(&format!("/tasks/{}", task_id)).await
    }

    /// Create a task, returning the new task's id.
    pub async fn create_task(&self, task: &NewTask) -> Result<String, ApiError> {
        let payload: IdPayload = self.post("/tasks", task).await?;
        Ok(payload.id)
    }

    /// Update a task, returning the task's id.
    pub async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> Result<String, ApiError> {
        let payload: IdPayload = self.put(&format!("/tasks/{}", task_id), update).await?;
        Ok(payload.id)
    }

    /// Delete a task.
    pub async fn delete_task(&self, task_id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .delete::<_, serde_json::Value>(&format!("/tasks/{}", task_id), None)
            .await?;
        Ok(())
    }

    /// Mark a task complete or reopen it.
    ///
    /// The API has no dedicated completion endpoint; completion is an
    /// update carrying the task's unchanged content fields.
    pub async fn set_task_completed(
        &self,
        task: &Task,
        completed: bool,
    ) -> Result<String, ApiError> {
        let mut update = TaskUpdate::from_task(task);
        update.is_completed = completed;
        self.update_task(&task.id, &update).await
    }
}
