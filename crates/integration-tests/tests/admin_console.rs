//! Admin dashboard, user and order tables, and product statistics.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::json;
use shopfront_admin::{DashboardScreen, OrdersScreen, ProductStatsScreen, UsersScreen};
use shopfront_core::{BadgeColor, CurrencyCode, OrderId, OrderStatus, UserId};
use shopfront_integration_tests::FakeBackend;
use shopfront_storefront::access::AdminAccess;
use shopfront_storefront::api::ApiClient;
use shopfront_storefront::session::Session;

/// Sign in the admin `root` and return what admin screens need.
async fn admin(backend: &FakeBackend) -> (ApiClient, Session, AdminAccess) {
    backend.add_account("root", "hunter2", true);
    let (client, _store, session) = backend.login("root", "hunter2").await;
    let access = session.capabilities().admin_access().unwrap();
    (client, session, access)
}

#[tokio::test]
async fn test_dashboard_view() {
    let backend = FakeBackend::start().await;
    let (client, session, access) = admin(&backend).await;
    let ana = backend.add_account("ana", "secret", false);
    backend.add_product("A", "Desk Lamp", 24.5, 7, &["Home"]);
    backend.add_order(&ana, &[("A", 2)], 49.0, "pending");
    backend.add_order(&ana, &[("A", 1)], 24.5, "delivered");

    let mut screen = DashboardScreen::new(&client, &session, access);
    screen.load().await;
    let view = screen.view(CurrencyCode::USD).unwrap();
    assert_eq!(view.total_users, 2);
    assert_eq!(view.total_products, 1);
    assert_eq!(view.total_orders, 2);
    assert_eq!(view.total_revenue, "$73.50");

    let newest = view.recent_orders.first().unwrap();
    assert_eq!(newest.customer, "ana");
    assert_eq!(newest.status.label, "Delivered");
    assert_eq!(newest.status.color, BadgeColor::Success);
    assert_eq!(newest.date, "2024-06-01");
}

#[tokio::test]
async fn test_dashboard_failure() {
    let backend = FakeBackend::start().await;
    let (client, session, access) = admin(&backend).await;
    backend.fail(
        Method::GET,
        "/admin/dashboard",
        StatusCode::OK,
        json!({"success": false}),
    );

    let mut screen = DashboardScreen::new(&client, &session, access);
    screen.load().await;
    assert_eq!(
        screen.state().error(),
        Some("Failed to fetch dashboard statistics")
    );
    assert!(screen.view(CurrencyCode::USD).is_none());
}

#[tokio::test]
async fn test_user_edit_patches_in_place() {
    let backend = FakeBackend::start().await;
    let (client, session, access) = admin(&backend).await;
    let ana = UserId::new(backend.add_account("ana", "secret", false));
    backend.add_account("bo", "pw", false);

    let mut screen = UsersScreen::new(&client, &session, access);
    screen.load().await;

    let mut form = screen.edit_form(&ana).unwrap();
    form.email = "ana@shop.example".to_string();
    form.is_admin = true;
    screen.edit(&ana, &form).await;
    assert!(screen.list().banner().is_none());

    let rows = screen.rows();
    let usernames: Vec<_> = rows.iter().map(|row| row.username.as_str()).collect();
    assert_eq!(usernames, ["root", "ana", "bo"]);
    let edited = rows.get(1).unwrap();
    assert_eq!(edited.email, "ana@shop.example");
    assert_eq!(edited.role.label, "Admin");
    assert_eq!(edited.role.color, BadgeColor::Primary);
    assert_eq!(edited.joined, "2024-05-01");

    let puts = backend.requests_to(&Method::PUT, &format!("/admin/users/{ana}"));
    assert_eq!(
        puts.first().unwrap().body,
        Some(json!({"username": "ana", "email": "ana@shop.example", "isAdmin": true}))
    );
    assert_eq!(backend.requests_to(&Method::GET, "/admin/users").len(), 1);
}

#[tokio::test]
async fn test_fetch_single_user() {
    let backend = FakeBackend::start().await;
    let (client, session, access) = admin(&backend).await;
    let ana = UserId::new(backend.add_account("ana", "secret", false));

    let screen = UsersScreen::new(&client, &session, access);
    let row = screen.fetch_user(&ana).await.unwrap();
    assert_eq!(row.id, ana);
    assert_eq!(row.username, "ana");
    assert_eq!(row.email, "ana@example.com");
    assert_eq!(row.role.label, "User");
    assert_eq!(row.joined, "2024-05-01");

    let gets = backend.requests_to(&Method::GET, &format!("/admin/users/{ana}"));
    assert_eq!(gets.len(), 1);
    assert!(backend.requests_to(&Method::GET, "/admin/users").is_empty());

    let missing = screen.fetch_user(&UserId::new("nobody")).await.unwrap_err();
    assert_eq!(missing.status(), Some(404));
    assert_eq!(missing.user_message("Failed to fetch user"), "User not found");
}

#[tokio::test]
async fn test_user_delete_refetches() {
    let backend = FakeBackend::start().await;
    let (client, session, access) = admin(&backend).await;
    let ana = UserId::new(backend.add_account("ana", "secret", false));
    backend.add_account("bo", "pw", false);

    let mut screen = UsersScreen::new(&client, &session, access);
    screen.load().await;
    screen.delete(&ana).await;

    assert!(screen.list().banner().is_none());
    let usernames: Vec<_> = screen.rows().into_iter().map(|row| row.username).collect();
    assert_eq!(usernames, ["root", "bo"]);
    assert_eq!(backend.requests_to(&Method::GET, "/admin/users").len(), 2);
}

#[tokio::test]
async fn test_user_delete_failure_keeps_table() {
    let backend = FakeBackend::start().await;
    let (client, session, access) = admin(&backend).await;
    let ana = UserId::new(backend.add_account("ana", "secret", false));
    backend.fail(
        Method::DELETE,
        &format!("/admin/users/{ana}"),
        StatusCode::FORBIDDEN,
        json!({"success": false, "message": "Cannot delete this user"}),
    );

    let mut screen = UsersScreen::new(&client, &session, access);
    screen.load().await;
    screen.delete(&ana).await;

    assert_eq!(screen.list().banner(), Some("Cannot delete this user"));
    assert_eq!(screen.rows().len(), 2);
    assert_eq!(backend.requests_to(&Method::GET, "/admin/users").len(), 1);
}

#[tokio::test]
async fn test_order_status_update_refetches() {
    let backend = FakeBackend::start().await;
    let (client, session, access) = admin(&backend).await;
    let ana = backend.add_account("ana", "secret", false);
    backend.add_product("A", "Desk Lamp", 24.5, 7, &["Home"]);
    let order = OrderId::new(backend.add_order(&ana, &[("A", 2)], 49.0, "pending"));

    let mut screen = OrdersScreen::new(&client, &session, access);
    screen.load().await;
    assert_eq!(
        screen.rows(CurrencyCode::USD).first().unwrap().status.label,
        "Pending"
    );

    screen
        .update_status(&order, OrderStatus::Shipped)
        .await
        .unwrap();
    assert!(screen.list().banner().is_none());

    let puts = backend.requests_to(&Method::PUT, &format!("/admin/orders/{order}/status"));
    assert_eq!(puts.first().unwrap().body, Some(json!({"status": "shipped"})));
    assert_eq!(backend.requests_to(&Method::GET, "/admin/orders").len(), 2);

    let detail = screen.detail(&order, CurrencyCode::USD).unwrap();
    assert_eq!(detail.row.status.label, "Shipped");
    assert_eq!(detail.row.amount, "$49.00");
    assert_eq!(detail.customer_username, "ana");
}

#[tokio::test]
async fn test_order_status_failure_sets_banner() {
    let backend = FakeBackend::start().await;
    let (client, session, access) = admin(&backend).await;

    let mut screen = OrdersScreen::new(&client, &session, access);
    screen.load().await;
    let err = screen
        .update_status(&OrderId::new("missing"), OrderStatus::Cancelled)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(screen.list().banner(), Some("Order not found"));
    assert_eq!(backend.requests_to(&Method::GET, "/admin/orders").len(), 1);
}

#[tokio::test]
async fn test_order_status_succeeds_when_refetch_fails() {
    let backend = FakeBackend::start().await;
    let (client, session, access) = admin(&backend).await;
    let ana = backend.add_account("ana", "secret", false);
    let order = OrderId::new(backend.add_order(&ana, &[], 0.0, "pending"));
    backend.fail(
        Method::GET,
        "/admin/orders",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"success": false, "message": "Database unavailable"}),
    );

    // Never loaded, as a one-shot command would use it.
    let mut screen = OrdersScreen::new(&client, &session, access);
    screen
        .update_status(&order, OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(screen.list().banner(), Some("Database unavailable"));
    assert!(screen.detail(&order, CurrencyCode::USD).is_none());

    let puts = backend.requests_to(&Method::PUT, &format!("/admin/orders/{order}/status"));
    assert_eq!(puts.len(), 1);
    assert_eq!(backend.requests_to(&Method::GET, "/admin/orders").len(), 1);
}

#[tokio::test]
async fn test_fetch_order_detail() {
    let backend = FakeBackend::start().await;
    let (client, session, access) = admin(&backend).await;
    let ana = backend.add_account("ana", "secret", false);
    backend.add_product("A", "Desk Lamp", 24.5, 7, &["Home"]);
    let order = OrderId::new(backend.add_order(&ana, &[("A", 2), ("GONE", 1)], 49.0, "processing"));

    let screen = OrdersScreen::new(&client, &session, access);
    let detail = screen.fetch_detail(&order, CurrencyCode::USD).await.unwrap();
    assert_eq!(detail.address, "1 Test Street");
    assert_eq!(detail.customer_email, "ana@example.com");
    assert_eq!(detail.row.status.color, BadgeColor::Info);

    let lamp = detail.lines.first().unwrap();
    assert_eq!(lamp.title, "Desk Lamp");
    assert_eq!(lamp.unit_price, "$24.50");
    assert_eq!(lamp.subtotal, "$49.00");

    let gone = detail.lines.get(1).unwrap();
    assert_eq!(gone.title, "N/A");
    assert_eq!(gone.subtotal, "$0.00");

    let missing = screen
        .fetch_detail(&OrderId::new("missing"), CurrencyCode::USD)
        .await
        .unwrap_err();
    assert_eq!(missing.status(), Some(404));
}

#[tokio::test]
async fn test_product_stats_view() {
    let backend = FakeBackend::start().await;
    let (client, session, access) = admin(&backend).await;
    backend.add_product("A", "Desk Lamp", 24.5, 7, &["Home"]);
    backend.add_product("B", "Rust in Action", 39.99, 0, &["Books"]);
    backend.add_product("C", "Yoga Mat", 19.0, 12, &["Sports", "Home"]);
    backend.add_product("D", "Mystery Box", 5.0, 30, &[]);

    let mut screen = ProductStatsScreen::new(&client, &session, access);
    screen.load().await;
    let view = screen.view(CurrencyCode::USD).unwrap();
    assert_eq!(view.total_products, 4);

    let low: Vec<_> = view
        .low_stock
        .iter()
        .map(|p| (p.title.as_str(), p.stock.label.as_str(), p.stock.color))
        .collect();
    assert_eq!(
        low,
        [
            ("Rust in Action", "0", BadgeColor::Error),
            ("Desk Lamp", "7", BadgeColor::Warning),
        ]
    );

    let categories: Vec<_> = view
        .by_category
        .iter()
        .map(|c| (c.category.as_str(), c.count))
        .collect();
    assert_eq!(
        categories,
        [("N/A", 1), ("Books", 1), ("Home", 2), ("Sports", 1)]
    );
}

#[tokio::test]
async fn test_shopper_token_is_refused_by_admin_endpoints() {
    let backend = FakeBackend::start().await;
    backend.add_account("ana", "secret", false);
    let (client, _store, session) = backend.login("ana", "secret").await;
    assert!(session.capabilities().admin_access().is_err());

    let err = session.client(&client).list_users().await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.user_message("Failed to fetch users"), "Admin access required");
}
