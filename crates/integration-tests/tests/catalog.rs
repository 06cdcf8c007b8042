//! Product list mutations, product detail and the product editor.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::json;
use shopfront_core::{CurrencyCode, Price, Product, ProductId};
use shopfront_integration_tests::FakeBackend;
use shopfront_storefront::api::ProductQuery;
use shopfront_storefront::screens::catalog::{ADDED_TO_CART, ADMINS_CANNOT_ADD, PLEASE_LOGIN};
use shopfront_storefront::screens::product_form::{PRODUCT_ADDED, PRODUCT_UPDATED};
use shopfront_storefront::screens::{
    EditorMode, FormError, ProductDetailScreen, ProductEditorScreen, ProductListScreen,
};
use shopfront_storefront::session::Session;

fn seed_catalog(backend: &FakeBackend) {
    backend.add_product("A", "Desk Lamp", 24.5, 7, &["Home"]);
    backend.add_product("B", "Rust in Action", 39.99, 3, &["Books"]);
    backend.add_product("C", "Yoga Mat", 19.0, 12, &["Sports"]);
}

fn ids(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.id.as_str()).collect()
}

async fn admin_catalog(backend: &FakeBackend) -> ProductListScreen {
    backend.add_account("root", "hunter2", true);
    seed_catalog(backend);
    let (client, _store, session) = backend.login("root", "hunter2").await;
    let mut screen = ProductListScreen::new(&client, &session, ProductQuery::default());
    screen.load().await;
    screen
}

#[tokio::test]
async fn test_toggle_active_preserves_order_and_fields() {
    let backend = FakeBackend::start().await;
    let mut screen = admin_catalog(&backend).await;
    let before = screen.list().items().to_vec();
    assert!(before.iter().all(|p| p.active));

    screen.set_active(&ProductId::new("B"), false).await.unwrap();
    assert!(screen.list().banner().is_none());

    let after = screen.list().items();
    assert_eq!(ids(after), ["A", "B", "C"]);
    for (old, new) in before.iter().zip(after) {
        let expected = Product {
            active: old.id.as_str() != "B",
            ..old.clone()
        };
        assert_eq!(new, &expected);
    }

    let toggles = backend.requests_to(&Method::PUT, "/products/updateProductStatus/B");
    assert_eq!(toggles.first().unwrap().body, Some(json!({"active": false})));

    let cards = screen.cards(CurrencyCode::USD);
    let card = cards.get(1).unwrap();
    assert_eq!(card.status, Some("Inactive"));
    assert_eq!(card.toggle_label, Some("Activate"));

    screen.set_active(&ProductId::new("B"), true).await.unwrap();
    assert_eq!(screen.list().items(), before.as_slice());
}

#[tokio::test]
async fn test_shopper_cannot_toggle_or_delete() {
    let backend = FakeBackend::start().await;
    seed_catalog(&backend);
    backend.add_account("ana", "secret", false);
    let (client, _store, session) = backend.login("ana", "secret").await;

    let mut screen = ProductListScreen::new(&client, &session, ProductQuery::default());
    screen.load().await;
    assert!(screen.set_active(&ProductId::new("A"), false).await.is_err());
    assert!(screen.delete(&ProductId::new("A")).await.is_err());

    let mutations = backend
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::PUT || r.method == Method::DELETE)
        .count();
    assert_eq!(mutations, 0);

    let card = screen.cards(CurrencyCode::USD).into_iter().next().unwrap();
    assert!(card.can_add_to_cart);
    assert!(card.status.is_none());
}

#[tokio::test]
async fn test_delete_removes_exactly_one() {
    let backend = FakeBackend::start().await;
    let mut screen = admin_catalog(&backend).await;

    screen.delete(&ProductId::new("B")).await.unwrap();
    assert!(screen.list().banner().is_none());
    assert_eq!(ids(screen.list().items()), ["A", "C"]);
    assert_eq!(
        backend
            .requests_to(&Method::GET, "/products/getAllProducts")
            .len(),
        2
    );
}

#[tokio::test]
async fn test_failed_delete_keeps_list() {
    let backend = FakeBackend::start().await;
    let mut screen = admin_catalog(&backend).await;
    backend.fail(
        Method::DELETE,
        "/products/deleteProduct/B",
        StatusCode::CONFLICT,
        json!({"success": false, "message": "Product has open orders"}),
    );

    screen.delete(&ProductId::new("B")).await.unwrap();
    assert_eq!(screen.list().banner(), Some("Product has open orders"));
    assert_eq!(ids(screen.list().items()), ["A", "B", "C"]);
    assert_eq!(
        backend
            .requests_to(&Method::GET, "/products/getAllProducts")
            .len(),
        1
    );
}

#[tokio::test]
async fn test_delete_of_unknown_product_shows_fallback_free_message() {
    let backend = FakeBackend::start().await;
    let mut screen = admin_catalog(&backend).await;

    screen.delete(&ProductId::new("Z")).await.unwrap();
    assert_eq!(screen.list().banner(), Some("Product not found"));
    assert_eq!(screen.list().items().len(), 3);
}

#[tokio::test]
async fn test_list_query_parameters() {
    let backend = FakeBackend::start().await;
    seed_catalog(&backend);
    let query = ProductQuery {
        category: Some("Books".to_string()),
        newest: true,
    };

    let mut screen = ProductListScreen::new(&backend.client(), &Session::anonymous(), query);
    screen.load().await;
    assert_eq!(ids(screen.list().items()), ["B"]);

    let request = backend.requests().into_iter().next().unwrap();
    assert_eq!(request.query.as_deref(), Some("category=Books&new=true"));
    assert!(request.authorization.is_none());
}

#[tokio::test]
async fn test_product_detail() {
    let backend = FakeBackend::start().await;
    seed_catalog(&backend);

    let mut screen =
        ProductDetailScreen::new(&backend.client(), &Session::anonymous(), ProductId::new("A"));
    screen.load().await;
    let view = screen.view(CurrencyCode::USD).unwrap();
    assert_eq!(view.title, "Desk Lamp");
    assert_eq!(view.price, "$24.50");
    assert!(view.can_add_to_cart);

    assert_eq!(screen.add_to_cart().await, PLEASE_LOGIN);
    assert!(backend.requests_to(&Method::POST, "/cart/addCartItem").is_empty());

    let mut missing =
        ProductDetailScreen::new(&backend.client(), &Session::anonymous(), ProductId::new("Z"));
    missing.load().await;
    assert_eq!(missing.state().error(), Some("Product not found"));
}

#[tokio::test]
async fn test_shopper_adds_to_cart() {
    let backend = FakeBackend::start().await;
    seed_catalog(&backend);
    let user_id = backend.add_account("ana", "secret", false);
    let (client, _store, session) = backend.login("ana", "secret").await;

    let mut screen = ProductListScreen::new(&client, &session, ProductQuery::default());
    screen.load().await;
    assert_eq!(screen.add_to_cart(&ProductId::new("C")).await, ADDED_TO_CART);
    assert_eq!(screen.cart_message(), Some(ADDED_TO_CART));

    let adds = backend.requests_to(&Method::POST, "/cart/addCartItem");
    let add = adds.first().unwrap();
    assert_eq!(
        add.body,
        Some(json!({"userId": user_id, "products": [{"productId": "C", "quantity": 1}]}))
    );
    assert_eq!(
        add.authorization.as_deref(),
        Some(format!("Bearer token-{user_id}").as_str())
    );
    assert_eq!(backend.cart_of(&user_id), vec![("C".to_string(), 1)]);
}

#[tokio::test]
async fn test_admin_add_to_cart_sends_nothing() {
    let backend = FakeBackend::start().await;
    let mut list = admin_catalog(&backend).await;
    assert_eq!(list.add_to_cart(&ProductId::new("A")).await, ADMINS_CANNOT_ADD);

    let (client, _store, session) = backend.login("root", "hunter2").await;
    let mut detail = ProductDetailScreen::new(&client, &session, ProductId::new("B"));
    assert_eq!(detail.add_to_cart().await, ADMINS_CANNOT_ADD);

    assert!(backend.requests_to(&Method::POST, "/cart/addCartItem").is_empty());
}

#[tokio::test]
async fn test_editor_add_then_edit() {
    let backend = FakeBackend::start().await;
    backend.add_account("root", "hunter2", true);
    let (client, _store, session) = backend.login("root", "hunter2").await;
    let access = session.capabilities().admin_access().unwrap();

    let mut editor = ProductEditorScreen::new(&client, &session, access, EditorMode::Add);
    editor.form.title = "Tea Pot".to_string();
    editor.form.desc = "Holds six cups".to_string();
    editor.form.img = "https://img.example.com/teapot.png".to_string();
    editor.form.price = "18.00".to_string();
    editor.form.stock = "4".to_string();
    editor.form.set_categories("Home");
    editor.form.color = "white".to_string();
    assert_eq!(editor.submit().await.unwrap(), PRODUCT_ADDED);

    let created = backend.store().products.first().cloned().unwrap();
    assert_eq!(created["title"], "Tea Pot");
    assert_eq!(created["color"], "White");
    assert!(created.get("size").is_none());
    let id = ProductId::new(created["_id"].as_str().unwrap());

    let mut editor = ProductEditorScreen::new(&client, &session, access, EditorMode::Edit(id.clone()));
    editor.load().await;
    assert_eq!(editor.form.title, "Tea Pot");
    editor.form.price = "21.50".to_string();
    assert_eq!(editor.submit().await.unwrap(), PRODUCT_UPDATED);

    let mut detail = ProductDetailScreen::new(&client, &session, id);
    detail.load().await;
    assert_eq!(detail.state().ready().unwrap().price, Price::from_cents(2150));
}

#[tokio::test]
async fn test_editor_validation_sends_nothing() {
    let backend = FakeBackend::start().await;
    backend.add_account("root", "hunter2", true);
    let (client, _store, session) = backend.login("root", "hunter2").await;
    let access = session.capabilities().admin_access().unwrap();
    let before = backend.requests().len();

    let mut editor = ProductEditorScreen::new(&client, &session, access, EditorMode::Add);
    editor.form.title = "Tea Pot".to_string();
    assert!(matches!(
        editor.submit().await,
        Err(FormError::MissingRequired)
    ));
    assert_eq!(backend.requests().len(), before);
}
