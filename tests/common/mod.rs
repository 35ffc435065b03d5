//! Common test utilities and helpers

use agllm_core::{AppConfig, ConfigArgs, LlmConfig, OllamaClient};
use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Request bodies received by a stub endpoint
pub type Received = Arc<Mutex<Vec<Value>>>;

/// Start a stub `/api/generate` endpoint answering every request with
/// `status` and `body`; returns its base URL and the captured requests
pub async fn spawn_generate_stub(status: StatusCode, body: Value) -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&received);

    let app = Router::new().route(
        "/api/generate",
        post(move |Json(request): Json<Value>| {
            let captured = Arc::clone(&captured);
            let body = body.clone();
            async move {
                captured.lock().unwrap().push(request);
                (status, Json(body))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), received)
}

/// Create a home directory with `logs/studentcode` populated from `files`
pub fn create_test_home(files: &[(&str, &str)]) -> TempDir {
    let home = TempDir::new().expect("Failed to create temp dir");
    let code_dir = home.path().join("logs").join("studentcode");
    std::fs::create_dir_all(&code_dir).unwrap();

    for (rel, contents) in files {
        let path = code_dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    home
}

/// Configuration rooted at `home`, pointed at `host`
pub fn test_config(home: &Path, host: &str) -> AppConfig {
    AppConfig::from_args_with_home(
        ConfigArgs {
            ollama_host: Some(host.to_string()),
            model: Some("test-model".to_string()),
            ..Default::default()
        },
        home,
    )
}

/// Ollama client for `config` with a short timeout
pub fn test_client(config: &AppConfig) -> OllamaClient {
    let mut llm = LlmConfig::from_app_config(config);
    llm.timeout = std::time::Duration::from_secs(10);
    OllamaClient::new(llm).expect("Failed to create test client")
}
