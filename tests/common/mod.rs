use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::StatusCode;

use drinks_api::auth::Claims;

// Keep these in sync with the env handed to the spawned server
pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_ISSUER: &str = "drinks-api-tests";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    _child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/drinks-api");
        cmd.env("DRINKS_API_PORT", port.to_string())
            .env("DATABASE_URL", "sqlite::memory:")
            .env("DATABASE_MAX_CONNECTIONS", "1")
            .env("JWT_SECRET", TEST_SECRET)
            .env("JWT_ISSUER", TEST_ISSUER)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            base_url,
            _child: child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Mint a token signed with the test secret carrying the given permissions.
pub fn mint_token(permissions: &[&str], expires_in_secs: i64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_secs() as i64;

    let claims = Claims {
        iss: TEST_ISSUER.to_string(),
        aud: None,
        permissions: permissions.iter().map(|s| s.to_string()).collect(),
        exp: now + expires_in_secs,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("token encoding")
}

/// Token carrying every scope the API knows about.
#[allow(dead_code)]
pub fn full_access_token() -> String {
    mint_token(
        &[
            "get:drinks-detail",
            "post:drinks",
            "patch:drinks",
            "delete:drinks",
        ],
        3600,
    )
}
