//! Login/logout lifecycle and route-guard decisions.
//!
//! # Design
//! `Session` is the only writer of the token store. It shares the store with
//! the `ApiClient` that reads it, so after `login` the next
//! authorization-requiring request carries the new token, and after `logout`
//! none does. The client itself never writes the token.

use std::io;

use thiserror::Error;
use tracing::info;

use crate::api::Api;
use crate::error::ApiError;
use crate::token::{TokenSource, TokenStore};
use crate::transport::Transport;
use crate::types::User;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const ADMIN_PATH: &str = "/admin";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to persist session token: {0}")]
    Store(#[from] io::Error),
}

/// Outcome of checking a session against a protected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    RedirectToLogin,
    RedirectToDashboard,
}

impl Access {
    pub fn redirect_path(self) -> Option<&'static str> {
        match self {
            Access::Granted => None,
            Access::RedirectToLogin => Some(LOGIN_PATH),
            Access::RedirectToDashboard => Some(DASHBOARD_PATH),
        }
    }
}

pub struct Session<S> {
    store: S,
    user: Option<User>,
}

impl<S: TokenStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store, user: None }
    }

    /// Pick up the session a store kept from an earlier run. Without both a
    /// token and a remembered user the session starts anonymous.
    pub fn restore(store: S) -> Self {
        let user = store.token().and_then(|_| store.remembered_user());
        if let Some(user) = &user {
            info!(user_id = user.id, "session restored");
        }
        Self { store, user }
    }

    /// Resume with a user the caller already knows. The token is whatever
    /// the store already holds.
    pub fn resume(store: S, user: User) -> Self {
        Self {
            store,
            user: Some(user),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// Log in and keep the returned token and user. On failure the session
    /// is left as it was.
    pub fn login<T, R>(&mut self, api: &Api<T, R>, email: &str, password: &str) -> Result<&User, SessionError>
    where
        T: Transport,
        R: TokenSource,
    {
        let response = api.login(email, password)?;
        self.store.store(&response.token)?;
        self.store.remember_user(&response.user)?;
        info!(user_id = response.user.id, role = ?response.user.role, "logged in");
        Ok(self.user.insert(response.user))
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.store.clear()?;
        if let Some(user) = self.user.take() {
            info!(user_id = user.id, "logged out");
        }
        Ok(())
    }

    /// Where to send the user right after login.
    pub fn landing(&self) -> Option<&'static str> {
        self.user
            .as_ref()
            .map(|user| if user.is_admin() { ADMIN_PATH } else { DASHBOARD_PATH })
    }

    /// Route guard: anonymous visitors go to login, non-admins are kept out
    /// of admin-only views.
    pub fn guard(&self, admin_only: bool) -> Access {
        match &self.user {
            None => Access::RedirectToLogin,
            Some(user) if admin_only && !user.is_admin() => Access::RedirectToDashboard,
            Some(_) => Access::Granted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiClient;
    use crate::http::{HttpRequest, HttpResponse};
    use crate::operation::Operation;
    use crate::token::{FileTokenStore, MemoryTokenStore};
    use crate::transport::TransportError;
    use crate::types::Role;

    fn user(role: Role) -> User {
        User {
            id: 1,
            name: "Ana".to_string(),
            email: "a@b.com".to_string(),
            role,
            status: true,
            nickname: "ana".to_string(),
            birth_date: "1990-01-01".to_string(),
        }
    }

    fn login_server(req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap_or("{}")).unwrap();
        let (status, body) = if body["senha"] == "x" {
            let user = serde_json::to_value(user(Role::User)).unwrap();
            (200, serde_json::json!({"token": "T", "user": user}).to_string())
        } else {
            (401, String::new())
        };
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }

    #[test]
    fn login_stores_token_for_the_client() {
        let store = MemoryTokenStore::new();
        let api = Api::new(ApiClient::new("http://localhost:3000", store.clone()), login_server);
        let mut session = Session::new(store);

        let user = session.login(&api, "a@b.com", "x").unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(
            api.client().build_list_users().header("authorization"),
            Some("Bearer T")
        );
        assert_eq!(session.landing(), Some(DASHBOARD_PATH));
    }

    #[test]
    fn failed_login_leaves_session_untouched() {
        let store = MemoryTokenStore::new();
        store.store("old").unwrap();
        let api = Api::new(ApiClient::new("http://localhost:3000", store.clone()), login_server);
        let mut session = Session::new(store.clone());

        let err = session.login(&api, "a@b.com", "wrong").unwrap_err();
        assert!(matches!(err, SessionError::Api(ApiError::Failed(Operation::Login))));
        assert_eq!(store.token().as_deref(), Some("old"));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn logout_clears_token_and_user() {
        let store = MemoryTokenStore::new();
        store.store("T").unwrap();
        let mut session = Session::resume(store.clone(), user(Role::Admin));

        session.logout().unwrap();
        assert_eq!(store.token(), None);
        assert!(session.user().is_none());
        assert_eq!(session.landing(), None);
    }

    #[test]
    fn login_survives_a_restart_with_a_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        let store = FileTokenStore::new(&path);
        let api = Api::new(ApiClient::new("http://localhost:3000", store.clone()), login_server);
        Session::new(store).login(&api, "a@b.com", "x").unwrap();

        let restored = Session::restore(FileTokenStore::new(&path));
        assert_eq!(restored.user(), Some(&user(Role::User)));
        assert_eq!(restored.store().token().as_deref(), Some("T"));
        assert_eq!(restored.guard(false), Access::Granted);
        assert_eq!(restored.landing(), Some(DASHBOARD_PATH));
    }

    #[test]
    fn restore_needs_token_and_user() {
        let store = MemoryTokenStore::new();
        assert!(!Session::restore(store.clone()).is_authenticated());

        store.remember_user(&user(Role::Admin)).unwrap();
        assert!(!Session::restore(store.clone()).is_authenticated());

        store.store("T").unwrap();
        assert!(Session::restore(store.clone()).is_admin());

        let mut session = Session::restore(store.clone());
        session.logout().unwrap();
        assert!(!Session::restore(store).is_authenticated());
    }

    #[test]
    fn guard_decisions() {
        let anonymous = Session::new(MemoryTokenStore::new());
        assert_eq!(anonymous.guard(false), Access::RedirectToLogin);
        assert_eq!(anonymous.guard(true).redirect_path(), Some(LOGIN_PATH));

        let member = Session::resume(MemoryTokenStore::new(), user(Role::User));
        assert_eq!(member.guard(false), Access::Granted);
        assert_eq!(member.guard(true), Access::RedirectToDashboard);

        let admin = Session::resume(MemoryTokenStore::new(), user(Role::Admin));
        assert_eq!(admin.guard(true), Access::Granted);
        assert!(admin.is_admin());
        assert_eq!(admin.landing(), Some(ADMIN_PATH));
    }
}
