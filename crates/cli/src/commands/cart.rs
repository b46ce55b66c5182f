//! Cart commands. Every mutation is saved to the state directory.

use innomart_core::{ProductId, format_amount};
use tracing::{info, warn};

use super::{CliError, Context};

/// Print the cart lines and total.
pub fn show(ctx: &Context) {
    let cart = ctx.store.cart();
    if cart.is_empty() {
        info!("Your cart is empty");
        return;
    }

    for line in cart.items() {
        info!(
            "{:<10} {:>3} x {:>10} = {:>10}  {}",
            line.id,
            line.quantity,
            line.price,
            format_amount(line.line_total()),
            line.name
        );
    }
    info!(
        "{} line(s), {} item(s), total {}",
        cart.line_count(),
        cart.total_quantity(),
        cart.display_total()
    );
}

pub async fn add(ctx: &mut Context, id: &ProductId, quantity: i64) -> Result<(), CliError> {
    let product = ctx.store.add_product_to_cart(id, quantity).await?;
    ctx.save_cart()?;
    info!("Added {} x {} to cart", quantity, product.name);
    show(ctx);
    Ok(())
}

pub fn update(ctx: &mut Context, id: &ProductId, quantity: i64) -> Result<(), CliError> {
    if ctx.store.cart().get(id).is_none() {
        warn!("{id} is not in the cart");
        return Ok(());
    }
    ctx.store.cart_mut().update_quantity(id, quantity);
    ctx.save_cart()?;
    show(ctx);
    Ok(())
}

pub fn remove(ctx: &mut Context, id: &ProductId) -> Result<(), CliError> {
    ctx.store.cart_mut().remove_from_cart(id);
    ctx.save_cart()?;
    show(ctx);
    Ok(())
}

pub fn clear(ctx: &mut Context) -> Result<(), CliError> {
    ctx.store.cart_mut().clear_cart();
    ctx.save_cart()?;
    info!("Cart cleared");
    Ok(())
}
