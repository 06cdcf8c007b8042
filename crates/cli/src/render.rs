//! Plain-text rendering of screen views.

use std::io::{self, Write};

use shopfront_admin::{
    Badge, DashboardView, OrderDetailView, OrderRowView, ProductStatsView, UserRowView,
};
use shopfront_core::User;
use shopfront_storefront::screens::{CartView, ProductCardView, ProductDetailView};

fn badge(badge: &Badge) -> String {
    format!("[{}]", badge.label)
}

pub fn product_cards(out: &mut impl Write, cards: &[ProductCardView]) -> io::Result<()> {
    if cards.is_empty() {
        return writeln!(out, "No products found");
    }
    for card in cards {
        writeln!(out, "{}  {}  {}", card.id, card.title, card.price)?;
        if !card.summary.is_empty() {
            writeln!(out, "    {}", card.summary)?;
        }
        if !card.categories.is_empty() {
            writeln!(out, "    categories: {}", card.categories.join(", "))?;
        }
        if let (Some(status), Some(stock)) = (card.status, card.stock) {
            writeln!(out, "    status: {status}  stock: {stock}")?;
        }
    }
    Ok(())
}

pub fn product_detail(out: &mut impl Write, view: &ProductDetailView) -> io::Result<()> {
    writeln!(out, "{}", view.title)?;
    writeln!(out, "price: {}", view.price)?;
    if !view.categories.is_empty() {
        writeln!(out, "categories: {}", view.categories.join(", "))?;
    }
    if let Some(size) = &view.size {
        writeln!(out, "size: {size}")?;
    }
    if let Some(color) = &view.color {
        writeln!(out, "color: {color}")?;
    }
    if !view.img.is_empty() {
        writeln!(out, "image: {}", view.img)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", view.desc)
}

pub fn cart(out: &mut impl Write, view: &CartView) -> io::Result<()> {
    if view.is_empty() {
        return writeln!(out, "Your cart is empty");
    }
    for line in &view.lines {
        writeln!(
            out,
            "{}  {} x {} = {}",
            line.title, line.quantity, line.unit_price, line.subtotal
        )?;
    }
    writeln!(out, "Items: {}", view.item_count)?;
    writeln!(out, "Total: {}", view.total)?;
    if let Some(warning) = &view.warning {
        writeln!(out, "Warning: {warning}")?;
    }
    Ok(())
}

pub fn user(out: &mut impl Write, user: &User) -> io::Result<()> {
    writeln!(out, "{} <{}>  {}", user.username, user.email, user.role_label())
}

pub fn dashboard(out: &mut impl Write, view: &DashboardView) -> io::Result<()> {
    writeln!(out, "Users:    {}", view.total_users)?;
    writeln!(out, "Products: {}", view.total_products)?;
    writeln!(out, "Orders:   {}", view.total_orders)?;
    writeln!(out, "Revenue:  {}", view.total_revenue)?;
    writeln!(out)?;
    writeln!(out, "Recent orders")?;
    order_rows(out, &view.recent_orders)
}

pub fn order_rows(out: &mut impl Write, rows: &[OrderRowView]) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "No orders");
    }
    for row in rows {
        writeln!(
            out,
            "{:<8}  {:<16}  {:>12}  {:<12}  {}",
            row.short_id,
            row.customer,
            row.amount,
            badge(&row.status),
            row.date
        )?;
    }
    Ok(())
}

pub fn order_detail(out: &mut impl Write, view: &OrderDetailView) -> io::Result<()> {
    writeln!(out, "Order {}  {}", view.row.id, badge(&view.row.status))?;
    writeln!(out, "Date:     {}", view.row.date)?;
    writeln!(out, "Amount:   {}", view.row.amount)?;
    writeln!(out, "Address:  {}", view.address)?;
    writeln!(out, "Customer: {} <{}>", view.customer_username, view.customer_email)?;
    writeln!(out)?;
    for line in &view.lines {
        writeln!(
            out,
            "{}  {} x {} = {}",
            line.title, line.quantity, line.unit_price, line.subtotal
        )?;
    }
    Ok(())
}

pub fn user_rows(out: &mut impl Write, rows: &[UserRowView]) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "No users");
    }
    for row in rows {
        writeln!(
            out,
            "{}  {:<16}  {:<28}  {:<8}  {}",
            row.id,
            row.username,
            row.email,
            badge(&row.role),
            row.joined
        )?;
    }
    Ok(())
}

pub fn product_stats(out: &mut impl Write, view: &ProductStatsView) -> io::Result<()> {
    writeln!(out, "Total products: {}", view.total_products)?;
    writeln!(out)?;
    writeln!(out, "Low stock")?;
    if view.low_stock.is_empty() {
        writeln!(out, "  No low stock products")?;
    }
    for product in &view.low_stock {
        writeln!(
            out,
            "  {:<24}  {:>6}  {}",
            product.title,
            badge(&product.stock),
            product.price
        )?;
    }
    writeln!(out)?;
    writeln!(out, "By category")?;
    if view.by_category.is_empty() {
        writeln!(out, "  No category data available")?;
    }
    for entry in &view.by_category {
        writeln!(out, "  {:<24}  {}", entry.category, entry.count)?;
    }
    Ok(())
}
