//! Checkout orchestrator.
//!
//! Turns the cart, a logged-in user and a completed [`CheckoutForm`] into a
//! single order-creation call. The cart is cleared only when the server
//! confirms the order; on failure everything stays as it was so the same form
//! can be submitted again.

use innomart_core::{OrderId, OrderRequest, PaymentMethod, ShippingAddress, ShippingAddressError};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::api::OrderApi;
use crate::auth::AuthState;
use crate::cart::CartState;

/// Shown when checkout is attempted without a logged-in user.
pub const LOGIN_PROMPT: &str = "Please log in to proceed with checkout.";

/// Shown for any failed submission.
pub const GENERIC_FAILURE: &str = "An error occurred while placing your order. Please try again.";

/// Logged when the server answers success without an order document.
pub const INVALID_RESPONSE: &str = "Invalid response from server";

/// Where the front end navigates after a confirmed order.
pub const CONFIRMATION_PATH: &str = "/order-confirmation";

/// Checkout failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// No user is logged in. Nothing was submitted.
    #[error("{}", LOGIN_PROMPT)]
    LoginRequired,

    /// The submission failed; the cart is untouched.
    #[error("{0}")]
    Failed(String),
}

/// A completed checkout form.
///
/// Constructing one enforces the required shipping fields. The idempotency
/// key is fixed for the lifetime of the form, so resubmitting the same form
/// after a failure cannot create a second order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutForm {
    pub shipping: ShippingAddress,
    pub payment_method: PaymentMethod,
    idempotency_key: Uuid,
}

impl CheckoutForm {
    /// Build a form from an already validated address.
    #[must_use]
    pub fn new(shipping: ShippingAddress, payment_method: PaymentMethod) -> Self {
        Self {
            shipping,
            payment_method,
            idempotency_key: Uuid::new_v4(),
        }
    }

    /// Build a form from raw field values.
    ///
    /// # Errors
    ///
    /// Returns the first shipping field left blank.
    pub fn from_fields(
        address: &str,
        city: &str,
        postal_code: &str,
        country: &str,
        payment_method: PaymentMethod,
    ) -> Result<Self, ShippingAddressError> {
        let shipping = ShippingAddress::new(address, city, postal_code, country)?;
        Ok(Self::new(shipping, payment_method))
    }

    /// Key sent with every submission of this form.
    #[must_use]
    pub const fn idempotency_key(&self) -> Uuid {
        self.idempotency_key
    }
}

/// A confirmed order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    /// The order document returned by the server.
    pub order: serde_json::Value,
    /// The order's id, when the document carries one.
    pub order_id: Option<OrderId>,
    /// Total that was submitted.
    pub total_price: Decimal,
    /// Navigation target after success.
    pub redirect_to: &'static str,
}

/// Submits orders through an [`OrderApi`].
#[derive(Debug)]
pub struct Checkout<O> {
    api: O,
    error: Option<String>,
}

impl<O: OrderApi + Sync> Checkout<O> {
    pub const fn new(api: O) -> Self {
        Self { api, error: None }
    }

    /// Message from the last failed submission.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit the current cart as an order.
    ///
    /// Issues exactly one order-creation call. An empty cart is submitted
    /// with a total of zero.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::LoginRequired`] when no user is logged in, otherwise
    /// [`CheckoutError::Failed`] with the generic failure message. The cart
    /// is cleared only on success.
    #[instrument(skip_all, fields(lines = cart.line_count(), payment = %form.payment_method))]
    pub async fn submit_order(
        &mut self,
        cart: &mut CartState,
        auth: &AuthState,
        form: &CheckoutForm,
    ) -> Result<OrderConfirmation, CheckoutError> {
        if !auth.is_authenticated() {
            self.error = Some(LOGIN_PROMPT.to_string());
            return Err(CheckoutError::LoginRequired);
        }
        self.error = None;

        let request = OrderRequest::from_cart(
            cart.items(),
            form.shipping.clone(),
            form.payment_method,
        );

        let response = match self.api.create_order(&request, form.idempotency_key()).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Order submission failed");
                return Err(self.fail());
            }
        };

        let order_id = response.order_id();
        let Some(order) = response.order else {
            warn!(reason = INVALID_RESPONSE, "Order submission failed");
            return Err(self.fail());
        };

        cart.clear_cart();
        info!(
            order_id = order_id.as_ref().map(OrderId::as_str),
            total = %request.total_price,
            "Order placed"
        );

        Ok(OrderConfirmation {
            order,
            order_id,
            total_price: request.total_price,
            redirect_to: CONFIRMATION_PATH,
        })
    }

    fn fail(&mut self) -> CheckoutError {
        self.error = Some(GENERIC_FAILURE.to_string());
        CheckoutError::Failed(GENERIC_FAILURE.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use innomart_core::{CartItem, OrderSummary, Price, ProductId, User, UserId};

    use super::*;
    use crate::api::CreateOrderResponse;
    use crate::auth::AuthAction;
    use crate::error::ApiError;

    /// Order endpoint answering from a queue of scripted responses.
    #[derive(Default)]
    struct FakeOrders {
        responses: Mutex<Vec<Result<CreateOrderResponse, ApiError>>>,
        submitted: Mutex<Vec<(OrderRequest, Uuid)>>,
    }

    impl FakeOrders {
        fn answering(responses: Vec<Result<CreateOrderResponse, ApiError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                submitted: Mutex::default(),
            }
        }

        fn submitted(&self) -> Vec<(OrderRequest, Uuid)> {
            self.submitted.lock().unwrap().clone()
        }
    }

    impl OrderApi for FakeOrders {
        async fn create_order(
            &self,
            order: &OrderRequest,
            idempotency_key: Uuid,
        ) -> Result<CreateOrderResponse, ApiError> {
            self.submitted
                .lock()
                .unwrap()
                .push((order.clone(), idempotency_key));
            self.responses.lock().unwrap().remove(0)
        }

        async fn my_orders(&self) -> Result<Vec<OrderSummary>, ApiError> {
            Ok(Vec::new())
        }
    }

    fn confirmed() -> Result<CreateOrderResponse, ApiError> {
        Ok(CreateOrderResponse {
            order: Some(serde_json::json!({"_id": "ord-1", "totalPrice": 30.5})),
        })
    }

    fn server_error() -> Result<CreateOrderResponse, ApiError> {
        Err(ApiError::Status {
            status: 500,
            message: "database unavailable".to_string(),
        })
    }

    fn logged_in() -> AuthState {
        let mut auth = AuthState::default();
        auth.apply(AuthAction::LoginFulfilled(User {
            id: UserId::new("u1"),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }));
        auth
    }

    fn cart() -> CartState {
        let mut cart = CartState::new();
        cart.add_to_cart(CartItem {
            id: ProductId::new("a"),
            name: "Lamp".to_string(),
            price: Price::from_cents(1250).unwrap(),
            image: String::new(),
            quantity: 2,
        });
        cart.add_to_cart(CartItem {
            id: ProductId::new("b"),
            name: "Bulb".to_string(),
            price: Price::from_cents(550).unwrap(),
            image: String::new(),
            quantity: 1,
        });
        cart
    }

    fn form() -> CheckoutForm {
        CheckoutForm::from_fields("1 Main St", "Springfield", "12345", "US", PaymentMethod::PayPal)
            .unwrap()
    }

    #[test]
    fn test_form_requires_shipping_fields() {
        let err = CheckoutForm::from_fields("1 Main St", "  ", "12345", "US", PaymentMethod::Stripe)
            .unwrap_err();
        assert_eq!(err.to_string(), "shipping city is required");
    }

    #[tokio::test]
    async fn test_success_clears_cart() {
        let mut checkout = Checkout::new(FakeOrders::answering(vec![confirmed()]));
        let mut cart = cart();
        let form = form();

        let confirmation = checkout
            .submit_order(&mut cart, &logged_in(), &form)
            .await
            .unwrap();

        assert!(cart.is_empty());
        assert_eq!(confirmation.redirect_to, "/order-confirmation");
        assert_eq!(confirmation.order_id, Some(OrderId::new("ord-1")));
        assert_eq!(confirmation.total_price, Decimal::new(3050, 2));
        assert!(checkout.error().is_none());

        let submitted = checkout.api.submitted();
        assert_eq!(submitted.len(), 1);
        let (request, key) = &submitted[0];
        assert_eq!(request.order_items.len(), 2);
        assert_eq!(request.items_price, Decimal::new(3050, 2));
        assert_eq!(request.total_price, request.items_price);
        assert_eq!(request.shipping_price, Decimal::ZERO);
        assert_eq!(request.tax_price, Decimal::ZERO);
        assert_eq!(*key, form.idempotency_key());
    }

    #[tokio::test]
    async fn test_login_required() {
        let mut checkout = Checkout::new(FakeOrders::default());
        let mut cart = cart();

        let err = checkout
            .submit_order(&mut cart, &AuthState::default(), &form())
            .await
            .unwrap_err();

        assert_eq!(err, CheckoutError::LoginRequired);
        assert_eq!(err.to_string(), LOGIN_PROMPT);
        assert_eq!(cart.line_count(), 2);
        assert!(checkout.api.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_cart_and_reuses_key() {
        let mut checkout =
            Checkout::new(FakeOrders::answering(vec![server_error(), confirmed()]));
        let mut cart = cart();
        let form = form();
        let auth = logged_in();

        let err = checkout
            .submit_order(&mut cart, &auth, &form)
            .await
            .unwrap_err();
        assert_eq!(err, CheckoutError::Failed(GENERIC_FAILURE.to_string()));
        assert_eq!(checkout.error(), Some(GENERIC_FAILURE));
        assert_eq!(cart.line_count(), 2);

        checkout.submit_order(&mut cart, &auth, &form).await.unwrap();
        assert!(cart.is_empty());
        assert!(checkout.error().is_none());

        let keys: Vec<Uuid> = checkout.api.submitted().into_iter().map(|(_, k)| k).collect();
        assert_eq!(keys, vec![form.idempotency_key(); 2]);
    }

    #[tokio::test]
    async fn test_missing_order_is_failure() {
        let mut checkout = Checkout::new(FakeOrders::answering(vec![Ok(
            CreateOrderResponse::default(),
        )]));
        let mut cart = cart();

        let err = checkout
            .submit_order(&mut cart, &logged_in(), &form())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), GENERIC_FAILURE);
        assert_eq!(cart.line_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_cart_submits_zero_total() {
        let mut checkout = Checkout::new(FakeOrders::answering(vec![confirmed()]));
        let mut cart = CartState::new();

        let confirmation = checkout
            .submit_order(&mut cart, &logged_in(), &form())
            .await
            .unwrap();
        assert_eq!(confirmation.total_price, Decimal::ZERO);

        let (request, _) = &checkout.api.submitted()[0];
        assert!(request.order_items.is_empty());
        assert_eq!(request.total_price, Decimal::ZERO);
    }

    #[test]
    fn test_forms_get_distinct_keys() {
        assert_ne!(form().idempotency_key(), form().idempotency_key());
    }
}
