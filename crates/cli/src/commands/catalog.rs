//! Catalog browsing commands.

use innomart_core::{Product, ProductId};
use tracing::info;

use super::{CliError, Context};

/// Walk the product feed and print every product loaded.
///
/// Products fetched before a failure are still printed.
pub async fn list(ctx: &Context, max_pages: Option<u32>) -> Result<(), CliError> {
    let mut feed = ctx.store.product_feed();
    let pages = feed.run_to_end(max_pages).await;

    for product in feed.products() {
        info!("{}", format_line(product));
    }
    info!(
        "{} products from {} page(s){}",
        feed.products().len(),
        pages,
        if feed.has_more() { ", more available" } else { "" }
    );

    match feed.error() {
        Some(message) => Err(CliError::Feed(message.to_string())),
        None => Ok(()),
    }
}

/// Print a single product from the backend.
pub async fn show(ctx: &Context, id: &ProductId) -> Result<(), CliError> {
    let product = ctx.store.api().product(id).await?;
    info!("{}", format_line(&product));
    if !product.short_description.is_empty() {
        info!("  {}", product.short_description);
    }
    info!("  {}", product.image);
    Ok(())
}

fn format_line(product: &Product) -> String {
    format!(
        "{:<10} {:>10}  {}",
        product.object_id, product.sale_price, product.name
    )
}
