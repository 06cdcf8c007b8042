//! Admin console commands.
//!
//! Every command requires an admin session; shoppers get "Access denied"
//! before any request is sent.

use std::io::Write;

use clap::Subcommand;
use shopfront_admin::{DashboardScreen, OrdersScreen, ProductStatsScreen, UsersScreen};
use shopfront_core::{OrderId, OrderStatus, UserId};
use tracing::warn;

use super::{CliError, Context, loaded, no_banner};
use crate::render;

#[derive(Subcommand)]
pub enum AdminAction {
    /// Store counters and recent orders
    Dashboard,
    /// List users
    Users,
    /// Show one user
    User { id: String },
    /// Edit a user; omitted fields keep their current value
    UserEdit {
        id: String,

        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Grant or revoke admin rights
        #[arg(long)]
        admin: Option<bool>,
    },
    /// Delete a user
    UserDelete { id: String },
    /// List orders
    Orders,
    /// Show one order
    Order { id: String },
    /// Change an order's status
    OrderStatus {
        id: String,

        /// pending, processing, shipped, delivered or cancelled
        status: OrderStatus,
    },
    /// Low stock and category statistics
    ProductStats,
}

pub async fn run(ctx: &Context, out: &mut impl Write, action: AdminAction) -> Result<(), CliError> {
    let access = ctx.admin_access()?;
    let currency = ctx.currency();

    match action {
        AdminAction::Dashboard => {
            let mut screen = DashboardScreen::new(&ctx.client, &ctx.session, access);
            screen.load().await;
            loaded(screen.state())?;
            if let Some(view) = screen.view(currency) {
                render::dashboard(out, &view)?;
            }
        }
        AdminAction::Users => {
            let mut screen = UsersScreen::new(&ctx.client, &ctx.session, access);
            screen.load().await;
            loaded(screen.list().state())?;
            render::user_rows(out, &screen.rows())?;
        }
        AdminAction::User { id } => {
            let screen = UsersScreen::new(&ctx.client, &ctx.session, access);
            let row = screen.fetch_user(&UserId::new(id)).await?;
            render::user_rows(out, &[row])?;
        }
        AdminAction::UserEdit {
            id,
            username,
            email,
            admin,
        } => {
            let id = UserId::new(id);
            let mut screen = UsersScreen::new(&ctx.client, &ctx.session, access);
            screen.load().await;
            loaded(screen.list().state())?;

            let mut form = screen
                .edit_form(&id)
                .ok_or_else(|| CliError::Failed(format!("User {id} not found")))?;
            if let Some(username) = username {
                form.username = username;
            }
            if let Some(email) = email {
                form.email = email;
            }
            if let Some(admin) = admin {
                form.is_admin = admin;
            }

            screen.edit(&id, &form).await;
            no_banner(screen.list().banner())?;
            let rows: Vec<_> = screen.rows().into_iter().filter(|row| row.id == id).collect();
            render::user_rows(out, &rows)?;
        }
        AdminAction::UserDelete { id } => {
            let id = UserId::new(id);
            let mut screen = UsersScreen::new(&ctx.client, &ctx.session, access);
            screen.load().await;
            loaded(screen.list().state())?;
            screen.delete(&id).await;
            no_banner(screen.list().banner())?;
            writeln!(out, "User {id} deleted")?;
        }
        AdminAction::Orders => {
            let mut screen = OrdersScreen::new(&ctx.client, &ctx.session, access);
            screen.load().await;
            loaded(screen.list().state())?;
            render::order_rows(out, &screen.rows(currency))?;
        }
        AdminAction::Order { id } => {
            let screen = OrdersScreen::new(&ctx.client, &ctx.session, access);
            let view = screen.fetch_detail(&OrderId::new(id), currency).await?;
            render::order_detail(out, &view)?;
        }
        AdminAction::OrderStatus { id, status } => {
            let id = OrderId::new(id);
            let mut screen = OrdersScreen::new(&ctx.client, &ctx.session, access);
            screen.update_status(&id, status).await?;
            writeln!(out, "Order {id} updated to {status}")?;
            if let Some(message) = screen.list().banner() {
                warn!(%message, "Order list could not be reloaded");
            } else if let Some(view) = screen.detail(&id, currency) {
                render::order_detail(out, &view)?;
            }
        }
        AdminAction::ProductStats => {
            let mut screen = ProductStatsScreen::new(&ctx.client, &ctx.session, access);
            screen.load().await;
            loaded(screen.state())?;
            if let Some(view) = screen.view(currency) {
                render::product_stats(out, &view)?;
            }
        }
    }
    Ok(())
}
