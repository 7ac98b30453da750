#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use proposal_api::auth::CredentialService;
use proposal_api::config::AppConfig;
use proposal_api::database::DatabaseManager;
use proposal_api::state::AppState;

/// An in-process server with its own in-memory database.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
    /// Handle on the server's own storage, e.g. to close it mid-test
    pub database: DatabaseManager,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register an analyst and return the new id.
    pub async fn create_analyst(&self, full_name: &str, login_name: &str, password: &str) -> Result<i64> {
        let res = self
            .client
            .post(self.url("/api/analysts"))
            .json(&json!({
                "fullName": full_name,
                "loginName": login_name,
                "password": password
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create analyst returned {}", res.status());
        let body = res.json::<Value>().await?;
        body["data"]["id"].as_i64().context("missing analyst id")
    }

    /// Submit a proposal and return the new id.
    pub async fn create_proposal(&self, payload: Value) -> Result<i64> {
        let res = self.client.post(self.url("/api/proposals")).json(&payload).send().await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create proposal returned {}", res.status());
        let body = res.json::<Value>().await?;
        body["data"]["id"].as_i64().context("missing proposal id")
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    let config = AppConfig::testing();
    let database = DatabaseManager::connect(&config.database).await?;
    let credentials = CredentialService::new(config.security.password_cost).await?;
    let app = proposal_api::app(AppState::new(database.clone(), credentials), &config);

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        database,
        handle,
    })
}

pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

pub fn days_from_today(days: i64) -> String {
    (chrono::Local::now().date_naive() + chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}
