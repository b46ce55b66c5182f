//! Checkout and order history commands.

use innomart_client::checkout::CheckoutForm;
use innomart_core::{PaymentMethod, format_amount};
use tracing::info;

use super::{CliError, Context};

/// Submit the saved cart as an order.
///
/// The cart file is rewritten only after a confirmed order, which empties it.
pub async fn checkout(
    ctx: &mut Context,
    address: &str,
    city: &str,
    postal_code: &str,
    country: &str,
    payment: PaymentMethod,
) -> Result<(), CliError> {
    let form = CheckoutForm::from_fields(address, city, postal_code, country, payment)?;
    let confirmation = ctx.store.place_order(&form).await?;
    ctx.save_cart()?;

    info!(
        "Order {} placed, total {}",
        confirmation
            .order_id
            .as_ref()
            .map_or("(no id)", |id| id.as_str()),
        format_amount(confirmation.total_price)
    );
    info!("Continue at {}", confirmation.redirect_to);
    Ok(())
}

/// Print the logged-in user's past orders.
pub async fn history(ctx: &Context) -> Result<(), CliError> {
    let mut history = ctx.store.order_history();
    let orders = history.load(ctx.store.auth()).await?;

    if orders.is_empty() {
        info!("No orders yet");
        return Ok(());
    }
    for order in orders {
        info!(
            "{}  {}  {:>10}  paid: {}  delivered: {}",
            order.id,
            order.created_at.format("%Y-%m-%d"),
            format_amount(order.total_price),
            if order.is_paid { "yes" } else { "no" },
            if order.is_delivered { "yes" } else { "no" },
        );
    }
    Ok(())
}
