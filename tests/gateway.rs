//! Session gate and catalog lookups through the running gateway.

use order_gateway::catalog::{Catalog, RowTable};
use serde_json::{json, Value};

mod common;

fn catalog() -> Catalog {
    let mut catalog = Catalog::empty();
    catalog.products = RowTable::from_rows(
        "products",
        "product_id",
        vec![
            json!({ "product_id": 12, "name": "kettle" }),
            json!({ "product_id": 3, "name": "mug" }),
        ],
    )
    .unwrap();
    catalog.users =
        RowTable::from_rows("users", "user_id", vec![json!({ "user_id": 5, "name": "pim" })]).unwrap();
    catalog
}

#[tokio::test]
async fn test_order_page_requires_session() {
    let (gateway, shutdown) = common::start_gateway(common::test_config(), Catalog::empty()).await;
    let client = common::client();

    let res = client.get(format!("http://{}/order", gateway)).send().await.unwrap();
    assert_eq!(res.status(), 307);
    assert_eq!(res.headers()["location"], "/login?from=%2Forder");

    let res = client
        .get(format!("http://{}/order", gateway))
        .header("cookie", "auth=ok")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.text().await.unwrap().contains("/api/order"));

    let res = client.get(format!("http://{}/login", gateway)).send().await.unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
}

#[tokio::test]
async fn test_order_api_is_not_gated() {
    let (gateway, shutdown) = common::start_gateway(common::test_config(), Catalog::empty()).await;

    let res = common::client()
        .post(format!("http://{}/api/order", gateway))
        .json(&json!({ "a": 1 }))
        .send()
        .await
        .unwrap();
    // No base URL configured: a client error, not a redirect.
    assert_eq!(res.status(), 400);

    shutdown.trigger();
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let mut config = common::test_config();
    config.auth.username = "operator".into();
    config.auth.password = "s3cret".into();
    let (gateway, shutdown) = common::start_gateway(config, Catalog::empty()).await;
    let client = common::client();
    let url = format!("http://{}/api/login", gateway);

    let res = client
        .post(&url)
        .json(&json!({ "username": "operator", "password": "s3cret" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let cookie = res.headers()["set-cookie"].to_str().unwrap().to_string();
    assert!(cookie.starts_with("auth=ok;"));
    assert!(cookie.contains("HttpOnly"));
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "success": true }));

    let res = client
        .post(&url)
        .json(&json!({ "username": "operator", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
    assert!(!res.headers().contains_key("set-cookie"));

    // Parseable JSON with missing or mistyped fields is a failed login.
    for body in [json!({ "username": "operator" }), json!({}), json!({ "username": 1, "password": null })] {
        let res = client.post(&url).json(&body).send().await.unwrap();
        assert_eq!(res.status(), 401, "body {}", body);
        assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "Invalid credentials" }));
    }

    let res = client.post(&url).body("nope").send().await.unwrap();
    assert_eq!(res.status(), 400);

    shutdown.trigger();
}

#[tokio::test]
async fn test_catalog_lookups() {
    let (gateway, shutdown) = common::start_gateway(common::test_config(), catalog()).await;
    let client = common::client();

    let all: Value = client
        .get(format!("http://{}/api/products", gateway))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all[0]["product_id"], 3);
    assert_eq!(all[1]["product_id"], 12);

    let res = client.get(format!("http://{}/api/products/12", gateway)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Value>().await.unwrap()["name"], "kettle");

    let res = client.get(format!("http://{}/api/products/99", gateway)).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "Product not found" }));

    let res = client.get(format!("http://{}/api/users/5", gateway)).send().await.unwrap();
    assert_eq!(res.json::<Value>().await.unwrap()["name"], "pim");

    let res = client.get(format!("http://{}/api/users/6", gateway)).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "error": "User not found" }));

    shutdown.trigger();
}

#[tokio::test]
async fn test_product_echo() {
    let (gateway, shutdown) = common::start_gateway(common::test_config(), Catalog::empty()).await;
    let client = common::client();
    let url = format!("http://{}/api/products", gateway);

    let res = client.post(&url).json(&json!({ "x": [1, 2] })).send().await.unwrap();
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "body": { "x": [1, 2] } }));

    let res = client
        .post(&url)
        .header("content-type", "text/plain")
        .body("hello")
        .send()
        .await
        .unwrap();
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "body": "hello" }));

    shutdown.trigger();
}

#[tokio::test]
async fn test_body_limit() {
    let mut config = common::test_config();
    config.listener.max_body_bytes = 64;
    let (gateway, shutdown) = common::start_gateway(config, Catalog::empty()).await;

    let res = common::client()
        .post(format!("http://{}/api/order", gateway))
        .header("content-type", "application/json")
        .body(format!("{{\"pad\":\"{}\"}}", "x".repeat(256)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 413);

    shutdown.trigger();
}
