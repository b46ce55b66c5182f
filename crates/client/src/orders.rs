//! Order history for the logged-in user.

use innomart_core::OrderSummary;
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::OrderApi;
use crate::auth::AuthState;

/// Shown when the history is requested without a logged-in user.
pub const PROFILE_LOGIN_PROMPT: &str = "Please log in to view your profile.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrdersError {
    #[error("{}", PROFILE_LOGIN_PROMPT)]
    LoginRequired,

    /// The request failed; carries the server's message.
    #[error("{0}")]
    Failed(String),
}

/// The caller's past orders.
#[derive(Debug)]
pub struct OrderHistory<O> {
    api: O,
    orders: Vec<OrderSummary>,
    loading: bool,
    error: Option<String>,
}

impl<O: OrderApi + Sync> OrderHistory<O> {
    pub const fn new(api: O) -> Self {
        Self {
            api,
            orders: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// Fetch `GET /orders/myorders`, replacing anything loaded before.
    ///
    /// # Errors
    ///
    /// [`OrdersError::LoginRequired`] without a user, [`OrdersError::Failed`]
    /// when the request fails. Previously loaded orders are kept on failure.
    pub async fn load(&mut self, auth: &AuthState) -> Result<&[OrderSummary], OrdersError> {
        if !auth.is_authenticated() {
            self.error = Some(PROFILE_LOGIN_PROMPT.to_string());
            return Err(OrdersError::LoginRequired);
        }

        self.loading = true;
        self.error = None;
        let result = self.api.my_orders().await;
        self.loading = false;

        match result {
            Ok(orders) => {
                debug!(count = orders.len(), "order history loaded");
                self.orders = orders;
                Ok(&self.orders)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load order history");
                let message = e.user_message();
                self.error = Some(message.clone());
                Err(OrdersError::Failed(message))
            }
        }
    }

    #[must_use]
    pub fn orders(&self) -> &[OrderSummary] {
        &self.orders
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
