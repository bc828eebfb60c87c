use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

static SERVER: OnceLock<TestServer> = OnceLock::new();
static SCHEMA: OnceLock<bool> = OnceLock::new();

const DEFAULT_SUPERUSER_EMAIL: &str = "admin@jamuslims.com";
const DEFAULT_SUPERUSER_PASSWORD: &str = "changeme";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Cargo builds the binary before integration tests run
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_directory-api"));
        cmd.arg("serve")
            .env("API_PORT", port.to_string())
            .env("APP_ENV", "development")
            .env("DATABASE_CONNECTION_TIMEOUT", "5")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL from .env
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline { break; }
            let url = format!("{}/health", self.base_url);
            match client.get(&url).send().await {
                Ok(resp) => {
                    // Ready once /health answers, with or without a database
                    if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                        return Ok(());
                    }
                }
                Err(_) => {}
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    // Use stable get_or_init and convert init errors into a panic with context.
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(45)).await?;
    Ok(server)
}


/// Superuser credentials shared by `init-db` and the login helpers.
pub fn superuser_credentials() -> (String, String) {
    dotenvy::dotenv().ok();
    let email = std::env::var("FIRST_SUPERUSER_EMAIL").unwrap_or_else(|_| DEFAULT_SUPERUSER_EMAIL.to_string());
    let password =
        std::env::var("FIRST_SUPERUSER_PASSWORD").unwrap_or_else(|_| DEFAULT_SUPERUSER_PASSWORD.to_string());
    (email, password)
}

/// Whether the spawned server reports a reachable database.
pub async fn database_available(server: &TestServer) -> Result<bool> {
    let res = reqwest::get(format!("{}/health", server.base_url)).await?;
    Ok(res.status() == StatusCode::OK)
}

/// Run `init-db` once per test binary: schema plus the first superuser.
pub fn init_database() -> Result<()> {
    let ok = *SCHEMA.get_or_init(|| {
        let (email, password) = superuser_credentials();
        Command::new(env!("CARGO_BIN_EXE_directory-api"))
            .arg("init-db")
            .env("APP_ENV", "development")
            .env("DATABASE_CONNECTION_TIMEOUT", "5")
            .env("FIRST_SUPERUSER_EMAIL", email)
            .env("FIRST_SUPERUSER_PASSWORD", password)
            .stdin(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    });
    anyhow::ensure!(ok, "init-db failed");
    Ok(())
}

/// Start the server, initialize the schema and log in as the first superuser.
/// Returns `None` when no database is reachable.
pub async fn authenticated_client() -> Result<Option<ApiClient>> {
    let server = ensure_server().await?;
    if !database_available(server).await? {
        eprintln!("database unavailable, skipping");
        return Ok(None);
    }
    init_database()?;

    let (email, password) = superuser_credentials();
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/v1/auth/login", server.base_url))
        .form(&[("username", email.as_str()), ("password", password.as_str())])
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed with {}", res.status());

    let body = res.json::<Value>().await?;
    let token = body["data"]["access_token"].as_str().context("login response without access_token")?.to_string();
    Ok(Some(ApiClient { client, base_url: server.base_url.clone(), token }))
}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    /// GET an `/api/v1` path and return the `data` payload.
    pub async fn get(&self, path: &str) -> Result<Value> {
        let res = self
            .client
            .get(format!("{}/api/v1{}", self.base_url, path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::data(res, StatusCode::OK).await
    }

    /// POST JSON to an `/api/v1` path, expecting 201, and return the `data` payload.
    pub async fn create(&self, path: &str, body: &Value) -> Result<Value> {
        let res = self
            .client
            .post(format!("{}/api/v1{}", self.base_url, path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Self::data(res, StatusCode::CREATED).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        let res = self
            .client
            .delete(format!("{}/api/v1{}", self.base_url, path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::data(res, StatusCode::OK).await
    }

    async fn data(res: reqwest::Response, expected: StatusCode) -> Result<Value> {
        let status = res.status();
        let body = res.json::<Value>().await?;
        anyhow::ensure!(status == expected, "expected {}, got {}: {}", expected, status, body);
        anyhow::ensure!(body["success"] == true, "not a success envelope: {}", body);
        Ok(body["data"].clone())
    }
}

/// Suffix that keeps seeded names unique across runs.
pub fn unique_suffix() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{}-{:09}", std::process::id(), nanos % 1_000_000_000)
}
