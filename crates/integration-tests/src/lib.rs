//! Integration tests for Shopfront.
//!
//! The tests drive the real client and screens against [`FakeBackend`], an
//! in-process `axum` server bound to `127.0.0.1:0` that mirrors the backend's
//! REST contract. Every test gets its own backend with its own data.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_session` - Login, logout, session storage and bearer injection
//! - `catalog` - Product list mutations and the product editor
//! - `cart_checkout` - Cart hydration, totals and order placement
//! - `admin_console` - Dashboard, users, orders and product statistics

#![allow(clippy::unused_async, clippy::missing_panics_doc)]

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::body::{Body, to_bytes};
use axum::extract::{Path, Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{Map, Value, json};
use shopfront_storefront::api::ApiClient;
use shopfront_storefront::config::ClientConfig;
use shopfront_storefront::services::auth::AuthService;
use shopfront_storefront::session::{MemoryStorage, Session, SessionStore};

type Reply = (StatusCode, Json<Value>);

/// A request as the backend received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path below `/api`, e.g. `/cart/addCartItem`.
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

/// A registered account.
#[derive(Debug, Clone)]
pub struct Account {
    pub user: Value,
    pub password: String,
    pub help_text: String,
}

impl Account {
    fn id(&self) -> &str {
        self.user["_id"].as_str().unwrap_or_default()
    }

    fn username(&self) -> &str {
        self.user["username"].as_str().unwrap_or_default()
    }

    fn is_admin(&self) -> bool {
        self.user["isAdmin"].as_bool().unwrap_or(false)
    }
}

/// Backend data plus everything the tests want to inspect.
#[derive(Debug, Default)]
pub struct Store {
    pub accounts: Vec<Account>,
    pub products: Vec<Value>,
    /// Cart lines per user id, in insertion order.
    pub carts: HashMap<String, Vec<(String, u32)>>,
    /// Orders with bare `userId`/`productId` references.
    pub orders: Vec<Value>,
    pub requests: Vec<RecordedRequest>,
    /// Responses forced for `(method, path)`, checked before routing.
    pub failures: HashMap<(Method, String), (StatusCode, Value)>,
    next_id: u64,
}

impl Store {
    fn new_id(&mut self) -> String {
        self.next_id += 1;
        format!("{:024x}", self.next_id)
    }

    fn account_by_token(&self, headers: &HeaderMap) -> Option<&Account> {
        let token = headers
            .get(AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer token-")?;
        self.accounts.iter().find(|account| account.id() == token)
    }

    fn product_index(&self, id: &str) -> Option<usize> {
        self.products.iter().position(|p| p["_id"] == id)
    }

    /// Join customer and product records into an order, as the admin
    /// endpoints do.
    fn populate(&self, order: &Value) -> Value {
        let mut order = order.clone();
        let user_id = order["userId"].as_str().map(ToString::to_string);
        if let Some(user_id) = user_id {
            order["userId"] = self
                .accounts
                .iter()
                .find(|account| account.id() == user_id)
                .map_or(Value::Null, |account| {
                    json!({
                        "_id": account.id(),
                        "username": account.username(),
                        "email": account.user["email"],
                    })
                });
        }
        if let Some(lines) = order["products"].as_array_mut() {
            for line in lines {
                let product_id = line["productId"].as_str().map(ToString::to_string);
                if let Some(product) = product_id
                    .and_then(|id| self.product_index(&id))
                    .and_then(|index| self.products.get(index))
                {
                    line["productId"] = json!({
                        "_id": product["_id"],
                        "title": product["title"],
                        "price": product["price"],
                    });
                }
            }
        }
        order
    }
}

type Shared = Arc<Mutex<Store>>;

fn lock(shared: &Shared) -> MutexGuard<'_, Store> {
    shared.lock().expect("fake backend state poisoned")
}

/// In-process stand-in for the storefront backend.
pub struct FakeBackend {
    addr: SocketAddr,
    store: Shared,
}

impl FakeBackend {
    /// Bind to an ephemeral port and start serving.
    pub async fn start() -> Self {
        let store = Shared::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let app = router(store.clone());
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake backend stopped");
        });

        Self { addr, store }
    }

    /// Client configuration pointing at this backend.
    pub fn config(&self) -> ClientConfig {
        let url = format!("http://{}/api", self.addr);
        ClientConfig::from_lookup(|key| (key == "SHOPFRONT_API_URL").then(|| url.clone()))
            .expect("Fake backend URL is valid")
    }

    /// An unauthenticated client for this backend.
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config()).expect("Failed to build client")
    }

    /// Direct access to the backend data.
    pub fn store(&self) -> MutexGuard<'_, Store> {
        lock(&self.store)
    }

    /// Register an account and return its user id.
    pub fn add_account(&self, username: &str, password: &str, is_admin: bool) -> String {
        let mut store = self.store();
        let id = store.new_id();
        store.accounts.push(Account {
            user: json!({
                "_id": id,
                "username": username,
                "email": format!("{username}@example.com"),
                "isAdmin": is_admin,
                "createdAt": "2024-05-01T10:00:00.000Z",
            }),
            password: password.to_string(),
            help_text: format!("{username}'s first pet"),
        });
        id
    }

    /// Add a product with the given id.
    pub fn add_product(&self, id: &str, title: &str, price: f64, stock: u32, categories: &[&str]) {
        self.store().products.push(json!({
            "_id": id,
            "title": title,
            "desc": format!("About {title}"),
            "img": format!("https://img.example.com/{id}.png"),
            "price": price,
            "stock": stock,
            "categories": categories,
            "active": true,
        }));
    }

    /// Replace a user's cart.
    pub fn set_cart(&self, user_id: &str, items: &[(&str, u32)]) {
        let items = items
            .iter()
            .map(|(product_id, quantity)| ((*product_id).to_string(), *quantity))
            .collect();
        self.store().carts.insert(user_id.to_string(), items);
    }

    /// Cart lines currently stored for a user.
    pub fn cart_of(&self, user_id: &str) -> Vec<(String, u32)> {
        self.store().carts.get(user_id).cloned().unwrap_or_default()
    }

    /// Add an order with bare references and return its id.
    pub fn add_order(&self, user_id: &str, items: &[(&str, u32)], amount: f64, status: &str) -> String {
        let mut store = self.store();
        let id = store.new_id();
        let products: Vec<Value> = items
            .iter()
            .map(|(product_id, quantity)| json!({"productId": product_id, "quantity": quantity}))
            .collect();
        store.orders.push(json!({
            "_id": id,
            "userId": user_id,
            "products": products,
            "amount": amount,
            "address": "1 Test Street",
            "status": status,
            "createdAt": "2024-06-01T12:00:00.000Z",
        }));
        id
    }

    /// Answer `method path` with `status` and `body` until cleared.
    pub fn fail(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.store()
            .failures
            .insert((method, path.to_string()), (status, body));
    }

    pub fn clear_failures(&self) {
        self.store().failures.clear();
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.store().requests.clone()
    }

    /// Requests received for `method path`.
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<RecordedRequest> {
        self.store()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    /// Log in through the auth service with in-memory storage.
    pub async fn login(&self, username: &str, password: &str) -> (ApiClient, SessionStore, Session) {
        let client = self.client();
        let store = SessionStore::new(MemoryStorage::new());
        let session = AuthService::new(&client, &store)
            .login(&shopfront_core::Credentials {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await
            .expect("Login against fake backend failed");
        (client, store, session)
    }
}

// =============================================================================
// Router
// =============================================================================

fn router(store: Shared) -> Router {
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/forgotPassword", post(forgot_password))
        .route("/products/getAllProducts", get(list_products))
        .route("/products/getProduct/{id}", get(get_product))
        .route("/products/addProducts", post(add_product))
        .route("/products/editProduct/{id}", put(edit_product))
        .route("/products/updateProductStatus/{id}", put(update_product_status))
        .route("/products/deleteProduct/{id}", delete(delete_product))
        .route("/cart/getCartitem/{user_id}", get(get_cart))
        .route("/cart/addCartItem", post(add_cart_item))
        .route("/cart/updateCart/{user_id}", put(update_cart))
        .route("/cart/deleteCartItem/{product_id}", delete(delete_cart_item))
        .route("/order/createOrder", post(create_order))
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/users", get(list_users))
        .route(
            "/admin/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/admin/orders", get(list_orders))
        .route("/admin/orders/{id}", get(get_order))
        .route("/admin/orders/{id}/status", put(update_order_status))
        .route("/admin/products/stats", get(product_stats));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(store.clone(), record))
        .with_state(store)
}

/// Record every request, then apply any forced failure.
async fn record(State(store): State<Shared>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let path = parts
        .uri
        .path()
        .strip_prefix("/api")
        .unwrap_or_else(|| parts.uri.path())
        .to_string();

    let failure = {
        let mut store = lock(&store);
        store.requests.push(RecordedRequest {
            method: parts.method.clone(),
            path: path.clone(),
            query: parts.uri.query().map(ToString::to_string),
            authorization: parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
            body: serde_json::from_slice(&bytes).ok(),
        });
        store.failures.get(&(parts.method.clone(), path)).cloned()
    };

    if let Some((status, body)) = failure {
        return (status, Json(body)).into_response();
    }
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

// =============================================================================
// Responses
// =============================================================================

fn ok(data: Value) -> Reply {
    (StatusCode::OK, Json(json!({"success": true, "data": data})))
}

fn ok_empty() -> Reply {
    (StatusCode::OK, Json(json!({"success": true})))
}

fn fail(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({"success": false, "message": message})))
}

fn require_user(store: &Store, headers: &HeaderMap) -> Result<(), Reply> {
    store
        .account_by_token(headers)
        .map(|_| ())
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Not authorized, token failed"))
}

fn require_admin(store: &Store, headers: &HeaderMap) -> Result<(), Reply> {
    match store.account_by_token(headers) {
        Some(account) if account.is_admin() => Ok(()),
        Some(_) => Err(fail(StatusCode::FORBIDDEN, "Admin access required")),
        None => Err(fail(StatusCode::UNAUTHORIZED, "Not authorized, token failed")),
    }
}

fn field<'a>(body: &'a Value, name: &str) -> &'a str {
    body[name].as_str().unwrap_or_default()
}

// =============================================================================
// Auth
// =============================================================================

async fn login(State(store): State<Shared>, Json(body): Json<Value>) -> Reply {
    let store = lock(&store);
    let account = store.accounts.iter().find(|account| {
        account.username() == field(&body, "username") && account.password == field(&body, "password")
    });
    match account {
        Some(account) => {
            let mut data = account.user.clone();
            data["accessToken"] = json!(format!("token-{}", account.id()));
            ok(data)
        }
        None => fail(StatusCode::UNAUTHORIZED, "Invalid username or password"),
    }
}

async fn register(State(store): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut store = lock(&store);
    let username = field(&body, "username");
    if store.accounts.iter().any(|a| a.username() == username) {
        return fail(StatusCode::BAD_REQUEST, "User already exists");
    }
    let id = store.new_id();
    store.accounts.push(Account {
        user: json!({
            "_id": id,
            "username": username,
            "email": body["email"],
            "isAdmin": false,
        }),
        password: field(&body, "password").to_string(),
        help_text: String::new(),
    });
    (StatusCode::CREATED, Json(json!({"success": true})))
}

async fn forgot_password(State(store): State<Shared>, Json(body): Json<Value>) -> Reply {
    let mut store = lock(&store);
    let account = store.accounts.iter_mut().find(|a| {
        a.username() == field(&body, "username") && a.help_text == field(&body, "helpText")
    });
    match account {
        Some(account) => {
            account.password = field(&body, "password").to_string();
            ok_empty()
        }
        None => fail(StatusCode::BAD_REQUEST, "Invalid username or help text"),
    }
}

// =============================================================================
// Products
// =============================================================================

async fn list_products(
    State(store): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    let store = lock(&store);
    let mut products: Vec<Value> = store
        .products
        .iter()
        .filter(|p| {
            query.get("category").is_none_or(|category| {
                p["categories"]
                    .as_array()
                    .is_some_and(|cats| cats.iter().any(|c| c == category.as_str()))
            })
        })
        .cloned()
        .collect();
    if query.get("new").is_some_and(|v| v == "true") {
        products.reverse();
    }
    ok(Value::Array(products))
}

async fn get_product(State(store): State<Shared>, Path(id): Path<String>) -> Reply {
    let store = lock(&store);
    match store.product_index(&id).and_then(|i| store.products.get(i)) {
        Some(product) => (StatusCode::OK, Json(json!({"product": product}))),
        None => fail(StatusCode::NOT_FOUND, "Product not found"),
    }
}

async fn add_product(
    State(store): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = lock(&store);
    if let Err(reply) = require_admin(&store, &headers) {
        return reply;
    }
    let mut product = body;
    product["_id"] = json!(store.new_id());
    product["active"] = json!(true);
    store.products.push(product.clone());
    (StatusCode::CREATED, Json(product))
}

async fn edit_product(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = lock(&store);
    if let Err(reply) = require_admin(&store, &headers) {
        return reply;
    }
    let Some(product) = store.products.iter_mut().find(|p| p["_id"] == id.as_str()) else {
        return fail(StatusCode::NOT_FOUND, "Product not found");
    };
    if let (Some(product), Value::Object(changes)) = (product.as_object_mut(), body) {
        product.extend(changes);
    }
    ok(product.clone())
}

async fn update_product_status(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = lock(&store);
    if let Err(reply) = require_admin(&store, &headers) {
        return reply;
    }
    let Some(product) = store.products.iter_mut().find(|p| p["_id"] == id.as_str()) else {
        return fail(StatusCode::NOT_FOUND, "Product not found");
    };
    product["active"] = body["active"].clone();
    ok(product.clone())
}

async fn delete_product(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    let mut store = lock(&store);
    if let Err(reply) = require_admin(&store, &headers) {
        return reply;
    }
    match store.product_index(&id) {
        Some(index) => {
            store.products.remove(index);
            ok_empty()
        }
        None => fail(StatusCode::NOT_FOUND, "Product not found"),
    }
}

// =============================================================================
// Cart and orders
// =============================================================================

fn cart_json(user_id: &str, items: &[(String, u32)]) -> Value {
    let products: Vec<Value> = items
        .iter()
        .map(|(product_id, quantity)| json!({"productId": product_id, "quantity": quantity}))
        .collect();
    json!({"userId": user_id, "products": products})
}

async fn get_cart(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Reply {
    let store = lock(&store);
    if let Err(reply) = require_user(&store, &headers) {
        return reply;
    }
    let carts: Vec<Value> = store
        .carts
        .get(&user_id)
        .map(|items| cart_json(&user_id, items))
        .into_iter()
        .collect();
    ok(Value::Array(carts))
}

async fn add_cart_item(
    State(store): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = lock(&store);
    if let Err(reply) = require_user(&store, &headers) {
        return reply;
    }
    let user_id = field(&body, "userId").to_string();
    let cart = store.carts.entry(user_id).or_default();
    for line in body["products"].as_array().into_iter().flatten() {
        let product_id = field(line, "productId").to_string();
        let quantity = line["quantity"]
            .as_u64()
            .and_then(|q| u32::try_from(q).ok())
            .unwrap_or(1);
        match cart.iter_mut().find(|(id, _)| *id == product_id) {
            Some((_, existing)) => *existing += quantity,
            None => cart.push((product_id, quantity)),
        }
    }
    ok_empty()
}

async fn update_cart(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = lock(&store);
    if let Err(reply) = require_user(&store, &headers) {
        return reply;
    }
    let product_id = field(&body, "productId");
    let quantity = body["quantity"]
        .as_u64()
        .and_then(|q| u32::try_from(q).ok())
        .unwrap_or(0);
    let line = store
        .carts
        .get_mut(&user_id)
        .and_then(|cart| cart.iter_mut().find(|(id, _)| id == product_id));
    match line {
        Some((_, existing)) => {
            *existing = quantity;
            ok_empty()
        }
        None => fail(StatusCode::NOT_FOUND, "Item not in cart"),
    }
}

async fn delete_cart_item(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    let mut store = lock(&store);
    if let Err(reply) = require_user(&store, &headers) {
        return reply;
    }
    let user_id = query.get("userId").cloned().unwrap_or_default();
    if let Some(cart) = store.carts.get_mut(&user_id) {
        cart.retain(|(id, _)| *id != product_id);
    }
    ok_empty()
}

async fn create_order(
    State(store): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = lock(&store);
    if let Err(reply) = require_user(&store, &headers) {
        return reply;
    }
    let mut order = body;
    order["_id"] = json!(store.new_id());
    order["status"] = json!("pending");
    order["createdAt"] = json!("2024-06-02T09:30:00.000Z");
    store.orders.push(order.clone());
    (StatusCode::CREATED, Json(json!({"success": true, "data": order})))
}

// =============================================================================
// Admin
// =============================================================================

async fn dashboard(State(store): State<Shared>, headers: HeaderMap) -> Reply {
    let store = lock(&store);
    if let Err(reply) = require_admin(&store, &headers) {
        return reply;
    }
    let revenue: f64 = store.orders.iter().filter_map(|o| o["amount"].as_f64()).sum();
    let recent: Vec<Value> = store
        .orders
        .iter()
        .rev()
        .take(5)
        .map(|order| store.populate(order))
        .collect();
    ok(json!({
        "totalUsers": store.accounts.len(),
        "totalProducts": store.products.len(),
        "totalOrders": store.orders.len(),
        "totalRevenue": revenue,
        "recentOrders": recent,
    }))
}

async fn list_users(State(store): State<Shared>, headers: HeaderMap) -> Reply {
    let store = lock(&store);
    if let Err(reply) = require_admin(&store, &headers) {
        return reply;
    }
    ok(Value::Array(store.accounts.iter().map(|a| a.user.clone()).collect()))
}

async fn get_user(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    let store = lock(&store);
    if let Err(reply) = require_admin(&store, &headers) {
        return reply;
    }
    match store.accounts.iter().find(|a| a.id() == id) {
        Some(account) => ok(account.user.clone()),
        None => fail(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn update_user(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = lock(&store);
    if let Err(reply) = require_admin(&store, &headers) {
        return reply;
    }
    let Some(account) = store.accounts.iter_mut().find(|a| a.id() == id) else {
        return fail(StatusCode::NOT_FOUND, "User not found");
    };
    for key in ["username", "email", "isAdmin"] {
        if let Some(value) = body.get(key) {
            account.user[key] = value.clone();
        }
    }
    ok(account.user.clone())
}

async fn delete_user(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    let mut store = lock(&store);
    if let Err(reply) = require_admin(&store, &headers) {
        return reply;
    }
    let before = store.accounts.len();
    store.accounts.retain(|a| a.id() != id);
    if store.accounts.len() == before {
        return fail(StatusCode::NOT_FOUND, "User not found");
    }
    ok_empty()
}

async fn list_orders(State(store): State<Shared>, headers: HeaderMap) -> Reply {
    let store = lock(&store);
    if let Err(reply) = require_admin(&store, &headers) {
        return reply;
    }
    ok(Value::Array(
        store.orders.iter().map(|order| store.populate(order)).collect(),
    ))
}

async fn get_order(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    let store = lock(&store);
    if let Err(reply) = require_admin(&store, &headers) {
        return reply;
    }
    match store.orders.iter().find(|o| o["_id"] == id.as_str()) {
        Some(order) => ok(store.populate(order)),
        None => fail(StatusCode::NOT_FOUND, "Order not found"),
    }
}

async fn update_order_status(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = lock(&store);
    if let Err(reply) = require_admin(&store, &headers) {
        return reply;
    }
    let Some(order) = store.orders.iter_mut().find(|o| o["_id"] == id.as_str()) else {
        return fail(StatusCode::NOT_FOUND, "Order not found");
    };
    order["status"] = body["status"].clone();
    let order = order.clone();
    ok(store.populate(&order))
}

async fn product_stats(State(store): State<Shared>, headers: HeaderMap) -> Reply {
    let store = lock(&store);
    if let Err(reply) = require_admin(&store, &headers) {
        return reply;
    }
    let mut low_stock: Vec<Value> = store
        .products
        .iter()
        .filter(|p| p["stock"].as_u64().unwrap_or(0) < 10)
        .map(|p| json!({"_id": p["_id"], "title": p["title"], "stock": p["stock"], "price": p["price"]}))
        .collect();
    low_stock.sort_by_key(|p| p["stock"].as_u64().unwrap_or(0));

    let mut by_category: BTreeMap<Option<String>, u64> = BTreeMap::new();
    for product in &store.products {
        let categories: Vec<&str> = product["categories"]
            .as_array()
            .map(|cats| cats.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        if categories.is_empty() {
            *by_category.entry(None).or_default() += 1;
        }
        for category in categories {
            *by_category.entry(Some(category.to_string())).or_default() += 1;
        }
    }
    let by_category: Vec<Value> = by_category
        .into_iter()
        .map(|(category, count)| json!({"_id": category, "count": count}))
        .collect();

    let mut data = Map::new();
    data.insert("totalProducts".to_string(), json!(store.products.len()));
    data.insert("lowStockProducts".to_string(), Value::Array(low_stock));
    data.insert("productsByCategory".to_string(), Value::Array(by_category));
    ok(Value::Object(data))
}
