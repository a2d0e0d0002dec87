use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;

use crate::errors::Result;
use crate::gateway::{ApiResponse, Credentials, FinanceApiTrait, LoginResponse};
use crate::session::{
    Session, SessionHandle, SessionStore, SESSION_TOKEN_KEY, SESSION_USER_ID_KEY,
};

/// Sign-in flow: exchanges credentials for a token and keeps the session
/// handle and its persisted copy in step.
pub struct SessionService {
    api: Arc<dyn FinanceApiTrait>,
    store: Arc<dyn SessionStore>,
    session: SessionHandle,
}

impl SessionService {
    pub fn new(
        api: Arc<dyn FinanceApiTrait>,
        store: Arc<dyn SessionStore>,
        session: SessionHandle,
    ) -> Self {
        Self {
            api,
            store,
            session,
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Loads the persisted session into the handle. A stored token without a
    /// user id still counts as signed in.
    pub async fn restore(&self) -> Result<Session> {
        let token = self.store.get_value(SESSION_TOKEN_KEY).await?;
        let session = match token.filter(|t| !t.is_empty()) {
            Some(token) => {
                let user_id = self.store.get_value(SESSION_USER_ID_KEY).await?;
                Session::new(token, user_id)
            }
            None => Session::default(),
        };
        debug!(
            "[Session] Restored session (authenticated={}, has_user_id={})",
            session.is_authenticated(),
            session.user_id.is_some()
        );
        self.session.replace(session.clone());
        Ok(session)
    }

    pub async fn register(&self, credentials: &Credentials) -> ApiResponse<Value> {
        self.api.register(credentials).await
    }

    /// Signs in; on success the token and user id are persisted and published
    /// to the session handle.
    pub async fn login(&self, credentials: &Credentials) -> ApiResponse<LoginResponse> {
        let response = self.api.login(credentials).await;
        let token = response
            .data
            .as_ref()
            .and_then(|body| body.token.clone())
            .filter(|t| !t.is_empty());

        let token = match (response.success, token) {
            (true, Some(token)) => token,
            (true, None) => {
                warn!("[Session] Login succeeded without a token in the response");
                return ApiResponse {
                    success: false,
                    message: "Login response did not include a token".to_string(),
                    data: response.data,
                };
            }
            (false, _) => return response,
        };

        let user_id = response
            .data
            .as_ref()
            .and_then(|body| body.user_id.clone())
            .filter(|id| !id.is_empty());

        self.persist(&token, user_id.as_deref()).await;
        self.session.replace(Session::new(token, user_id));
        info!("[Session] Signed in");
        response
    }

    /// Clears the session handle and the persisted credential.
    pub async fn logout(&self) {
        self.session.clear();
        for key in [SESSION_TOKEN_KEY, SESSION_USER_ID_KEY] {
            if let Err(err) = self.store.delete_value(key).await {
                warn!("[Session] Failed to delete '{}': {}", key, err);
            }
        }
        info!("[Session] Signed out");
    }

    async fn persist(&self, token: &str, user_id: Option<&str>) {
        if let Err(err) = self.store.set_value(SESSION_TOKEN_KEY, token).await {
            warn!("[Session] Failed to persist token: {}", err);
        }
        let result = match user_id {
            Some(id) => self.store.set_value(SESSION_USER_ID_KEY, id).await,
            None => self.store.delete_value(SESSION_USER_ID_KEY).await,
        };
        if let Err(err) = result {
            warn!("[Session] Failed to persist user id: {}", err);
        }
    }
}
