//! Cart hydration, totals and order placement against the fake backend.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::json;
use shopfront_core::{CurrencyCode, Price, ProductId};
use shopfront_integration_tests::FakeBackend;
use shopfront_storefront::screens::cart::ORDER_PLACED;
use shopfront_storefront::screens::{CartScreen, CheckoutError};
use shopfront_storefront::session::Session;

/// Sign in shopper `ana` with the given catalog and cart, and load the cart.
async fn shopper_with_cart(
    backend: &FakeBackend,
    products: &[(&str, f64)],
    cart: &[(&str, u32)],
) -> (String, CartScreen) {
    let user_id = backend.add_account("ana", "secret", false);
    for (id, price) in products {
        backend.add_product(id, &format!("Product {id}"), *price, 5, &["Home"]);
    }
    backend.set_cart(&user_id, cart);

    let (client, _store, session) = backend.login("ana", "secret").await;
    let mut screen = CartScreen::new(&client, &session).unwrap();
    screen.load().await;
    (user_id, screen)
}

#[tokio::test]
async fn test_checkout_scenario() {
    let backend = FakeBackend::start().await;
    let (user_id, mut screen) = shopper_with_cart(&backend, &[("A", 50.0)], &[("A", 2)]).await;

    assert_eq!(screen.total().amount, Price::from_cents(10000));
    let view = screen.view(CurrencyCode::USD).unwrap();
    assert_eq!(view.total, "$100.00");
    assert_eq!(view.item_count, 2);
    assert!(view.warning.is_none());

    screen.address = "221B".to_string();
    let receipt = screen.place_order().await.unwrap();
    assert_eq!(receipt.amount, Price::from_cents(10000));
    assert!(receipt.uncleared.is_empty());

    let orders = backend.requests_to(&Method::POST, "/order/createOrder");
    assert_eq!(orders.len(), 1);
    let body = orders.first().unwrap().body.clone().unwrap();
    assert_eq!(body["products"], json!([{"productId": "A", "quantity": 2}]));
    assert_eq!(body["amount"].as_f64(), Some(100.0));
    assert_eq!(body["address"], "221B");
    assert_eq!(body["userId"], user_id.as_str());

    assert!(screen.view(CurrencyCode::USD).unwrap().is_empty());
    assert!(backend.cart_of(&user_id).is_empty());
    assert_eq!(screen.banner(), Some(ORDER_PLACED));
    assert!(screen.order_placed());
}

#[tokio::test]
async fn test_address_is_trimmed() {
    let backend = FakeBackend::start().await;
    let (_, mut screen) = shopper_with_cart(&backend, &[("A", 10.0)], &[("A", 1)]).await;

    screen.address = "  221B Baker Street \n".to_string();
    screen.place_order().await.unwrap();

    let orders = backend.requests_to(&Method::POST, "/order/createOrder");
    let body = orders.first().unwrap().body.clone().unwrap();
    assert_eq!(body["address"], "221B Baker Street");
}

#[tokio::test]
async fn test_blank_address_sends_no_request() {
    let backend = FakeBackend::start().await;
    let (user_id, mut screen) = shopper_with_cart(&backend, &[("A", 50.0)], &[("A", 2)]).await;

    screen.address = "   ".to_string();
    let err = screen.place_order().await.unwrap_err();
    assert!(matches!(err, CheckoutError::AddressRequired));
    assert_eq!(screen.banner(), Some("Please enter a delivery address."));

    assert!(backend.requests_to(&Method::POST, "/order/createOrder").is_empty());
    assert_eq!(backend.cart_of(&user_id).len(), 1);
    assert_eq!(screen.view(CurrencyCode::USD).unwrap().lines.len(), 1);
}

#[tokio::test]
async fn test_missing_product_is_priced_at_zero() {
    let backend = FakeBackend::start().await;
    let (_, screen) =
        shopper_with_cart(&backend, &[("A", 50.0)], &[("A", 2), ("GONE", 3)]).await;

    assert!(screen.state().ready().is_some());
    let total = screen.total();
    assert_eq!(total.amount, Price::from_cents(10000));
    assert_eq!(total.unpriced, vec![ProductId::new("GONE")]);

    let view = screen.view(CurrencyCode::USD).unwrap();
    let missing = view.lines.get(1).unwrap();
    assert_eq!(missing.title, "Product ID: GONE");
    assert_eq!(missing.subtotal, "$0.00");
    assert!(!missing.priced);
    assert!(view.warning.is_some());
}

#[tokio::test]
async fn test_user_without_cart_sees_empty_cart() {
    let backend = FakeBackend::start().await;
    backend.add_account("ana", "secret", false);
    let (client, _store, session) = backend.login("ana", "secret").await;

    let mut screen = CartScreen::new(&client, &session).unwrap();
    screen.load().await;
    let view = screen.view(CurrencyCode::USD).unwrap();
    assert!(view.is_empty());
    assert_eq!(view.total, "$0.00");

    screen.address = "221B".to_string();
    assert!(matches!(
        screen.place_order().await,
        Err(CheckoutError::EmptyCart)
    ));
}

#[tokio::test]
async fn test_rejected_order_keeps_cart() {
    let backend = FakeBackend::start().await;
    let (user_id, mut screen) = shopper_with_cart(&backend, &[("A", 50.0)], &[("A", 2)]).await;
    backend.fail(
        Method::POST,
        "/order/createOrder",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"success": false, "message": "Payment service unavailable"}),
    );

    screen.address = "221B".to_string();
    let err = screen.place_order().await.unwrap_err();
    assert_eq!(err.to_string(), "Payment service unavailable");
    assert_eq!(screen.banner(), Some("Payment service unavailable"));
    assert!(!screen.order_placed());

    assert_eq!(screen.view(CurrencyCode::USD).unwrap().lines.len(), 1);
    assert_eq!(backend.cart_of(&user_id).len(), 1);
    assert!(
        backend
            .requests_to(&Method::DELETE, "/cart/deleteCartItem/A")
            .is_empty()
    );
}

#[tokio::test]
async fn test_partial_clear_after_order() {
    let backend = FakeBackend::start().await;
    let (user_id, mut screen) = shopper_with_cart(
        &backend,
        &[("A", 10.0), ("B", 5.0)],
        &[("A", 1), ("B", 2)],
    )
    .await;
    backend.fail(
        Method::DELETE,
        "/cart/deleteCartItem/B",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({}),
    );

    screen.address = "221B".to_string();
    let receipt = screen.place_order().await.unwrap();
    assert_eq!(receipt.amount, Price::from_cents(2000));
    assert_eq!(receipt.uncleared, vec![ProductId::new("B")]);
    assert_eq!(
        screen.banner(),
        Some("Order placed successfully! 1 item(s) could not be removed from your cart.")
    );

    let view = screen.view(CurrencyCode::USD).unwrap();
    let remaining: Vec<_> = view.lines.iter().map(|l| l.product_id.as_str()).collect();
    assert_eq!(remaining, ["B"]);
    assert_eq!(backend.cart_of(&user_id), vec![("B".to_string(), 2)]);
}

#[tokio::test]
async fn test_update_and_remove_lines() {
    let backend = FakeBackend::start().await;
    let (user_id, mut screen) = shopper_with_cart(
        &backend,
        &[("A", 10.0), ("B", 5.0)],
        &[("A", 1), ("B", 1)],
    )
    .await;

    screen.update_quantity(&ProductId::new("A"), 3).await.unwrap();
    assert_eq!(screen.total().amount, Price::from_cents(3500));
    assert_eq!(backend.cart_of(&user_id).first(), Some(&("A".to_string(), 3)));

    screen.remove_item(&ProductId::new("B")).await.unwrap();
    let view = screen.view(CurrencyCode::USD).unwrap();
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.total, "$30.00");

    let removal = backend.requests_to(&Method::DELETE, "/cart/deleteCartItem/B");
    let query = removal.first().unwrap().query.clone().unwrap();
    assert_eq!(query, format!("userId={user_id}"));
}

#[tokio::test]
async fn test_failed_update_sets_banner() {
    let backend = FakeBackend::start().await;
    let (_, mut screen) = shopper_with_cart(&backend, &[("A", 10.0)], &[("A", 1)]).await;

    let err = screen
        .update_quantity(&ProductId::new("NOT-IN-CART"), 2)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(screen.banner(), Some("Item not in cart"));
    assert_eq!(screen.total().amount, Price::from_cents(1000));
}

#[tokio::test]
async fn test_anonymous_cannot_open_cart() {
    let backend = FakeBackend::start().await;
    assert!(CartScreen::new(&backend.client(), &Session::anonymous()).is_err());
    assert!(backend.requests().is_empty());
}
