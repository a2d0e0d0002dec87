//! Session credential shared by the gateway and the reconciler.

use std::sync::{Arc, RwLock};

/// Persistence key of the bearer token.
pub const SESSION_TOKEN_KEY: &str = "token";
/// Persistence key of the signed-in user id.
pub const SESSION_USER_ID_KEY: &str = "_id";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user_id: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            token: Some(token.into()),
            user_id,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Cloneable handle to one session, passed to collaborators at construction.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn token(&self) -> Option<String> {
        self.snapshot().token.filter(|t| !t.is_empty())
    }

    pub fn user_id(&self) -> Option<String> {
        self.snapshot().user_id.filter(|id| !id.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    pub fn replace(&self, session: Session) {
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = session;
    }

    pub fn clear(&self) {
        self.replace(Session::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let handle = SessionHandle::default();
        let other = handle.clone();
        handle.replace(Session::new("tok", Some("u-1".to_string())));

        assert_eq!(other.token().as_deref(), Some("tok"));
        assert_eq!(other.user_id().as_deref(), Some("u-1"));
        assert!(other.is_authenticated());

        other.clear();
        assert!(!handle.is_authenticated());
        assert_eq!(handle.token(), None);
    }

    #[test]
    fn empty_token_is_not_authenticated() {
        let handle = SessionHandle::new(Session::new("", None));
        assert!(!handle.is_authenticated());
        assert_eq!(handle.token(), None);
    }
}
