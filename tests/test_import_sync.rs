//! End-to-end spreadsheet import test:
//! 1) Boot the API against DATABASE_URL with an empty plant collection.
//! 2) Register + login to obtain a bearer token.
//! 3) Create one plant over REST, then import a workbook that updates it
//!    and adds a new row with id=0.
//! 4) Re-import with only the first plant and verify the full-replace
//!    delete of the other one.

use rand::Rng;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

use smart_garden_api::{transport, GardenService, WeatherClient};

fn workbook_bytes(rows: &[(i32, &str, &str, i32)]) -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("GardenData").unwrap();
    for (col, header) in ["ID", "Name", "Location", "Humidity"].iter().enumerate() {
        sheet.write(0, col as u16, *header).unwrap();
    }
    for (i, (id, name, location, humidity)) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write(r, 0, *id).unwrap();
        sheet.write(r, 1, *name).unwrap();
        sheet.write(r, 2, *location).unwrap();
        sheet.write(r, 3, *humidity).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_import_full_replace_over_http() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let base_url = "http://127.0.0.1:3103";
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let garden = GardenService::new().await?;
    // Start from an empty collection so counts are deterministic.
    sqlx::query("DELETE FROM plants").execute(garden.pool()).await?;

    let state = transport::http::AppState {
        garden: Arc::new(Mutex::new(garden)),
        weather: Arc::new(WeatherClient::new()),
    };
    let router = transport::http::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:3103").await?;
    let server = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    // Wait for the server to be ready
    for _ in 0..30 {
        match tokio::net::TcpStream::connect("127.0.0.1:3103").await {
            Ok(_) => break,
            Err(_) => tokio::time::sleep(tokio::time::Duration::from_millis(100)).await,
        }
    }

    // --- Auth: register + login ---
    let username = format!("gardener_{}", rand::thread_rng().gen::<u32>());
    let register = client
        .post(format!("{}/auth/register", base_url))
        .json(&json!({ "username": username, "password": "hunter2" }))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert!(register["success"].as_bool().unwrap_or(false));

    let login = client
        .post(format!("{}/auth/login", base_url))
        .json(&json!({ "username": username, "password": "hunter2" }))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let token = login["data"]["token"].as_str().unwrap().to_string();

    // Plant routes reject requests without a token.
    let unauthorized = client.get(format!("{}/plants", base_url)).send().await?;
    assert_eq!(unauthorized.status(), 401);

    // --- Seed one plant over REST ---
    let created = client
        .post(format!("{}/plants", base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Rose", "location": "Yard", "required_humidity": 40 }))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let rose_id = created["data"]["plant"]["id"].as_i64().unwrap() as i32;

    // --- Import: update Rose, create Tulip (id=0 means no identity) ---
    let bytes = workbook_bytes(&[(rose_id, "Rose", "Yard", 55), (0, "Tulip", "Bed", 30)]);
    let import = client
        .put(format!("{}/plants/import", base_url))
        .bearer_auth(&token)
        .body(bytes)
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(import["created"].as_u64(), Some(1));
    assert_eq!(import["updated"].as_u64(), Some(1));
    assert_eq!(import["deleted"].as_u64(), Some(0));

    let listing = client
        .get(format!("{}/plants", base_url))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let plants = listing["data"]["plants"].as_array().unwrap();
    assert_eq!(plants.len(), 2);
    let rose = plants
        .iter()
        .find(|p| p["id"].as_i64() == Some(rose_id as i64))
        .unwrap();
    assert_eq!(rose["required_humidity"].as_i64(), Some(55));

    // --- Second import with only Rose: Tulip must be deleted ---
    let bytes = workbook_bytes(&[(rose_id, "Rose", "Yard", 55)]);
    let import = client
        .put(format!("{}/plants/import", base_url))
        .bearer_auth(&token)
        .body(bytes)
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(import["created"].as_u64(), Some(0));
    assert_eq!(import["updated"].as_u64(), Some(1));
    assert_eq!(import["deleted"].as_u64(), Some(1));

    // --- Empty upload is rejected before touching the store ---
    let empty = client
        .put(format!("{}/plants/import", base_url))
        .bearer_auth(&token)
        .body(Vec::<u8>::new())
        .send()
        .await?;
    assert_eq!(empty.status(), 400);

    let listing = client
        .get(format!("{}/plants", base_url))
        .bearer_auth(&token)
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(listing["data"]["plants"].as_array().unwrap().len(), 1);

    server.abort();
    let _ = server.await;
    Ok(())
}
