//! Full HTTP roundtrips against a bound dashboard server.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;
use tokio::net::TcpListener;

use rusty_listings::data::model::{ProductRecord, ProductTable};
use rusty_listings::server::router;
use rusty_listings::state::Dashboard;
use rusty_listings::view::ViewSettings;

async fn spawn_server() -> SocketAddr {
    let table = ProductTable::from_records(vec![
        ProductRecord::new("Phone A", 4_000.0, 4.5),
        ProductRecord::new("Phone B", 10_000.0, 4.8),
        ProductRecord::new("Phone C", 20_000.0, 5.0),
    ]);
    let dashboard = Arc::new(Dashboard::new(table, ViewSettings::default(), 1000.0));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(dashboard)).await.unwrap();
    });
    addr
}

async fn get_json(url: String) -> (reqwest::StatusCode, Value) {
    let resp = reqwest::get(url).await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn serves_the_page_and_health() {
    let addr = spawn_server().await;

    let page = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert!(page.status().is_success());
    assert!(page.text().await.unwrap().contains("price-distribution"));

    let (status, body) = get_json(format!("http://{addr}/health")).await;
    assert!(status.is_success());
    assert_eq!(body["records"], 3);
}

#[tokio::test]
async fn controls_describe_the_widgets() {
    let addr = spawn_server().await;
    let (_, body) = get_json(format!("http://{addr}/api/controls")).await;
    assert_eq!(body["price_min"], 4000.0);
    assert_eq!(body["price_max"], 20000.0);
    assert_eq!(body["price_step"], 1000.0);
    assert_eq!(body["rating_options"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn views_for_filtered_input() {
    let addr = spawn_server().await;
    let (status, body) = get_json(format!(
        "http://{addr}/api/views?price_min=5000&price_max=15000&min_rating=4.0&seq=7"
    ))
    .await;

    assert!(status.is_success());
    assert_eq!(body["generation"], 7);
    assert_eq!(body["matched"], 1);
    assert_eq!(body["scatter"]["points"][0]["name"], "Phone B");
    assert_eq!(body["top_table"]["rows"][0]["price_text"], "KSh 10,000");
    assert!(body["table_html"].as_str().unwrap().contains("Phone B"));
}

#[tokio::test]
async fn empty_result_is_a_normal_response() {
    let addr = spawn_server().await;
    let (status, body) = get_json(format!(
        "http://{addr}/api/views?price_min=21000&price_max=30000&seq=2"
    ))
    .await;

    assert!(status.is_success());
    assert_eq!(body["matched"], 0);
    assert_eq!(body["histogram"]["bins"].as_array().unwrap().len(), 0);
    assert_eq!(body["top_table"]["rows"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn defaults_to_everything() {
    let addr = spawn_server().await;
    let (_, body) = get_json(format!("http://{addr}/api/views")).await;
    assert_eq!(body["matched"], 3);
    assert_eq!(body["histogram"]["bins"].as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn negative_rating_is_rejected() {
    let addr = spawn_server().await;
    let (status, body) = get_json(format!("http://{addr}/api/views?min_rating=-1&seq=3")).await;
    assert_eq!(status, reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("minimum rating"));
    assert_eq!(body["seq"], 3);
    assert_eq!(body["views"]["matched"], 0);
    assert!(body["views"]["scatter"]["points"].as_array().unwrap().is_empty());
    assert!(body["views"]["top_table"]["rows"].as_array().unwrap().is_empty());
}
