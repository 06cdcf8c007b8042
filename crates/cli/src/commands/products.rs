//! Catalog browsing and admin product management.

use std::io::Write;

use clap::{Args, Subcommand};
use shopfront_core::ProductId;
use shopfront_storefront::api::ProductQuery;
use shopfront_storefront::screens::{
    EditorMode, ProductDetailScreen, ProductEditorScreen, ProductListScreen,
};

use super::{CliError, Context, loaded, no_banner};
use crate::render;

#[derive(Subcommand)]
pub enum ProductAction {
    /// List the catalog
    List {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Newest products first
        #[arg(long)]
        new: bool,
    },
    /// Show one product
    Show { id: String },
    /// Add a product (admin)
    Add(ProductFields),
    /// Edit a product; omitted fields keep their current value (admin)
    Edit {
        id: String,

        #[command(flatten)]
        fields: ProductFields,
    },
    /// Make a product visible to shoppers (admin)
    Activate { id: String },
    /// Hide a product from shoppers (admin)
    Deactivate { id: String },
    /// Delete a product (admin)
    Delete { id: String },
}

/// Product form fields as command-line options.
#[derive(Args)]
pub struct ProductFields {
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    desc: Option<String>,

    /// Image URL
    #[arg(long)]
    img: Option<String>,

    #[arg(long)]
    price: Option<String>,

    #[arg(long)]
    stock: Option<String>,

    /// Comma-separated categories
    #[arg(long)]
    categories: Option<String>,

    #[arg(long)]
    size: Option<String>,

    #[arg(long)]
    color: Option<String>,
}

pub async fn run(ctx: &Context, out: &mut impl Write, action: ProductAction) -> Result<(), CliError> {
    match action {
        ProductAction::List { category, new } => {
            let query = ProductQuery {
                category,
                newest: new,
            };
            let mut screen = ProductListScreen::new(&ctx.client, &ctx.session, query);
            screen.load().await;
            loaded(screen.list().state())?;
            render::product_cards(out, &screen.cards(ctx.currency()))?;
        }
        ProductAction::Show { id } => {
            let mut screen = ProductDetailScreen::new(&ctx.client, &ctx.session, ProductId::new(id));
            screen.load().await;
            loaded(screen.state())?;
            if let Some(view) = screen.view(ctx.currency()) {
                render::product_detail(out, &view)?;
            }
        }
        ProductAction::Add(fields) => {
            let mut screen =
                ProductEditorScreen::new(&ctx.client, &ctx.session, ctx.admin_access()?, EditorMode::Add);
            fields.apply(&mut screen);
            let message = screen.submit().await?;
            writeln!(out, "{message}")?;
        }
        ProductAction::Edit { id, fields } => {
            let mode = EditorMode::Edit(ProductId::new(id));
            let mut screen =
                ProductEditorScreen::new(&ctx.client, &ctx.session, ctx.admin_access()?, mode);
            screen.load().await;
            loaded(screen.state())?;
            fields.apply(&mut screen);
            let message = screen.submit().await?;
            writeln!(out, "{message}")?;
        }
        ProductAction::Activate { id } => set_active(ctx, out, &id, true).await?,
        ProductAction::Deactivate { id } => set_active(ctx, out, &id, false).await?,
        ProductAction::Delete { id } => {
            let id = ProductId::new(id);
            let mut screen =
                ProductListScreen::new(&ctx.client, &ctx.session, ProductQuery::default());
            screen.delete(&id).await?;
            no_banner(screen.list().banner())?;
            writeln!(out, "Product {id} deleted")?;
        }
    }
    Ok(())
}

async fn set_active(
    ctx: &Context,
    out: &mut impl Write,
    id: &str,
    active: bool,
) -> Result<(), CliError> {
    let id = ProductId::new(id);
    let mut screen = ProductListScreen::new(&ctx.client, &ctx.session, ProductQuery::default());
    screen.set_active(&id, active).await?;
    no_banner(screen.list().banner())?;

    let card = screen
        .cards(ctx.currency())
        .into_iter()
        .find(|card| card.id == id);
    match card {
        Some(card) => render::product_cards(out, std::slice::from_ref(&card))?,
        None => writeln!(out, "Product {id} updated")?,
    }
    Ok(())
}

impl ProductFields {
    fn apply(self, screen: &mut ProductEditorScreen) {
        let form = &mut screen.form;
        let text_fields = [
            (self.title, &mut form.title),
            (self.desc, &mut form.desc),
            (self.img, &mut form.img),
            (self.price, &mut form.price),
            (self.stock, &mut form.stock),
            (self.size, &mut form.size),
            (self.color, &mut form.color),
        ];
        for (value, field) in text_fields {
            if let Some(value) = value {
                *field = value;
            }
        }
        if let Some(categories) = self.categories {
            form.set_categories(&categories);
        }
    }
}
