//! Auth state container.
//!
//! [`AuthState`] is a reducer over [`AuthAction`], whose variants mirror the
//! lifecycle of an async login: pending, fulfilled, rejected. [`AuthStore`]
//! drives those transitions around the network call and keeps the cached
//! bearer session in step with the state.

use std::sync::Arc;

use innomart_core::{AuthSession, Email, User};
use secrecy::SecretString;
use tracing::{info, warn};

use crate::api::AuthApi;
use crate::error::ApiError;
use crate::token::{StoredSession, TokenStore, TokenStoreError};

/// Authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// The logged-in user. Present only after a successful login.
    pub user: Option<User>,
    /// A login or registration is in flight.
    pub loading: bool,
    /// Message from the last failed attempt.
    pub error: Option<String>,
}

/// Transitions accepted by [`AuthState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    LoginPending,
    LoginFulfilled(User),
    LoginRejected(String),
    Logout,
}

impl AuthState {
    /// Apply one transition.
    pub fn apply(&mut self, action: AuthAction) {
        match action {
            AuthAction::LoginPending => {
                self.loading = true;
                self.error = None;
            }
            AuthAction::LoginFulfilled(user) => {
                self.user = Some(user);
                self.loading = false;
                self.error = None;
            }
            AuthAction::LoginRejected(message) => {
                self.user = None;
                self.loading = false;
                self.error = Some(message);
            }
            AuthAction::Logout => *self = Self::default(),
        }
    }

    /// Whether a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Drives [`AuthState`] against the auth endpoints and the token store.
pub struct AuthStore<A> {
    state: AuthState,
    api: A,
    tokens: Arc<dyn TokenStore>,
}

impl<A: AuthApi> AuthStore<A> {
    /// Create a logged-out store.
    pub fn new(api: A, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            state: AuthState::default(),
            api,
            tokens,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &AuthState {
        &self.state
    }

    /// Rehydrate the user from a previously cached session.
    ///
    /// # Errors
    ///
    /// Returns an error if the cached session cannot be read.
    pub fn restore(&mut self) -> Result<Option<&User>, TokenStoreError> {
        if let Some(session) = self.tokens.load()? {
            self.state.apply(AuthAction::LoginFulfilled(session.user));
        }
        Ok(self.state.user.as_ref())
    }

    /// Log in with email and password.
    ///
    /// On failure the server's message is stored unchanged in
    /// [`AuthState::error`], the user is absent and any previously cached
    /// session is cleared. Never retried.
    pub async fn login_user(&mut self, email: &str, password: &SecretString) -> &AuthState {
        self.state.apply(AuthAction::LoginPending);

        let result = match Email::parse(email) {
            Ok(email) => self.api.login(&email, password).await,
            Err(e) => Err(ApiError::Status {
                status: 400,
                message: e.to_string(),
            }),
        };
        self.settle(result)
    }

    /// Register a new account and log it in.
    ///
    /// Same transitions as [`Self::login_user`].
    pub async fn register_user(
        &mut self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> &AuthState {
        self.state.apply(AuthAction::LoginPending);

        let name = name.trim();
        let result = if name.is_empty() {
            Err(ApiError::Status {
                status: 400,
                message: "name cannot be empty".to_string(),
            })
        } else {
            match Email::parse(email) {
                Ok(email) => self.api.register(name, &email, password).await,
                Err(e) => Err(ApiError::Status {
                    status: 400,
                    message: e.to_string(),
                }),
            }
        };
        self.settle(result)
    }

    /// Clear the user and the cached token. No network call; safe without a
    /// prior login.
    pub fn logout(&mut self) -> &AuthState {
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "Failed to clear cached session");
        }
        self.state.apply(AuthAction::Logout);
        info!("Logged out");
        &self.state
    }

    /// Resolve a pending login/registration.
    fn settle(&mut self, result: Result<AuthSession, ApiError>) -> &AuthState {
        match result {
            Ok(session) => {
                let stored = StoredSession {
                    token: SecretString::from(session.token),
                    user: session.user.clone(),
                };
                match self.tokens.save(&stored) {
                    Ok(()) => {
                        info!(user_id = %session.user.id, "Logged in");
                        self.state.apply(AuthAction::LoginFulfilled(session.user));
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to cache session");
                        self.forget_session();
                        self.state.apply(AuthAction::LoginRejected(e.to_string()));
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.forget_session();
                self.state.apply(AuthAction::LoginRejected(e.user_message()));
            }
        }
        &self.state
    }

    /// A rejected attempt drops any earlier session so the cached token never
    /// outlives the user in [`AuthState`].
    fn forget_session(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "Failed to clear cached session");
        }
    }
}
