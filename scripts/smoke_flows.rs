use std::time::Instant;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

async fn call(client: &Client, base_url: &str, label: &str, path: &str, body: Value) {
    println!("📝 {}", label);
    let start = Instant::now();

    let response = client.post(format!("{}{}", base_url, path)).json(&body).send().await;
    let elapsed = start.elapsed().as_millis();

    match response {
        Ok(resp) if resp.status().is_success() => {
            let value: Value = resp.json().await.unwrap_or_default();
            println!("⏱️  {}ms", elapsed);
            println!("{}\n", serde_json::to_string_pretty(&value).unwrap_or_default());
        }
        Ok(resp) => {
            let status = resp.status();
            let message = resp
                .json::<ErrorBody>()
                .await
                .map(|e| e.message)
                .unwrap_or_default();
            println!("❌ {} {}\n", status, message);
        }
        Err(e) => println!("❌ Request failed: {}. Is the server running?\n", e),
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let base_url = std::env::var("SMOKE_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
    let client = Client::new();

    println!("\n🧪 Smoke testing flows against {}\n", base_url);

    match client.get(format!("{}/api/health", base_url)).send().await {
        Ok(resp) => println!("✅ Health: {}\n", resp.text().await.unwrap_or_default()),
        Err(e) => {
            println!("❌ Server unreachable: {}", e);
            return;
        }
    }

    call(
        &client,
        &base_url,
        "Scam detection",
        "/api/scam/detect",
        json!({ "message": "Congratulations! You have won a free iPhone, click here to claim." }),
    )
    .await;

    call(
        &client,
        &base_url,
        "Fake news cross-verification",
        "/api/news/verify",
        json!({ "news_report": "Polling booths across the state will close at noon on election day." }),
    )
    .await;

    call(
        &client,
        &base_url,
        "Translation (Hindi to English)",
        "/api/translate",
        json!({ "text": "मुझे कॉल आया", "source_language": "Hindi" }),
    )
    .await;
}
