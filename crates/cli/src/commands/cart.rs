//! Cart and checkout.

use std::io::Write;

use clap::Subcommand;
use shopfront_core::ProductId;
use shopfront_storefront::screens::catalog::ADDED_TO_CART;
use shopfront_storefront::screens::{CartScreen, ProductDetailScreen};

use super::{CliError, Context, loaded};
use crate::render;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart with prices
    Show,
    /// Add one unit of a product
    Add { product_id: String },
    /// Change the quantity of a line
    Update { product_id: String, quantity: u32 },
    /// Remove a line
    Remove { product_id: String },
    /// Place an order for the whole cart
    Checkout {
        #[arg(short, long)]
        address: String,
    },
}

pub async fn run(ctx: &Context, out: &mut impl Write, action: CartAction) -> Result<(), CliError> {
    if let CartAction::Add { product_id } = action {
        let mut screen =
            ProductDetailScreen::new(&ctx.client, &ctx.session, ProductId::new(product_id));
        let message = screen.add_to_cart().await;
        if message != ADDED_TO_CART {
            return Err(CliError::Failed(message.to_string()));
        }
        writeln!(out, "{message}")?;
        return Ok(());
    }

    let mut screen = CartScreen::new(&ctx.client, &ctx.session)?;
    screen.load().await;
    loaded(screen.state())?;

    match action {
        CartAction::Add { .. } | CartAction::Show => {}
        CartAction::Update {
            product_id,
            quantity,
        } => {
            screen
                .update_quantity(&ProductId::new(product_id), quantity)
                .await?;
        }
        CartAction::Remove { product_id } => {
            screen.remove_item(&ProductId::new(product_id)).await?;
        }
        CartAction::Checkout { address } => {
            screen.address = address;
            let receipt = screen.place_order().await?;
            if let Some(banner) = screen.banner() {
                writeln!(out, "{banner}")?;
            }
            if let Some(order) = &receipt.order {
                writeln!(out, "Order {} ({})", order.id, order.status)?;
            }
            writeln!(out, "Amount: {}", receipt.amount.display(ctx.currency()))?;
            if receipt.uncleared.is_empty() {
                return Ok(());
            }
        }
    }

    if let Some(view) = screen.view(ctx.currency()) {
        render::cart(out, &view)?;
    }
    Ok(())
}
