#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use accounts_api::config::AppConfig;
use accounts_api::database::DatabaseManager;
use accounts_api::state::AppState;

/// One server per test: its own port and its own in-memory database
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
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

    pub async fn signup(&self, username: Option<&str>, email: &str, password: &str) -> Result<Response> {
        let mut body = json!({ "email": email, "password": password });
        if let Some(username) = username {
            body["username"] = json!(username);
        }
        Ok(self.client.post(self.url("/signup")).json(&body).send().await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    pub async fn logout(&self, cookie: Option<&str>) -> Result<Response> {
        let mut request = self.client.post(self.url("/logout"));
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        Ok(request.send().await?)
    }

    pub async fn list_users(&self, cookie: Option<&str>) -> Result<(StatusCode, Value)> {
        let mut request = self.client.get(self.url("/users"));
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        let res = request.send().await?;
        let status = res.status();
        Ok((status, res.json().await?))
    }

    /// Sign up and log in, returning the session cookie pair
    pub async fn logged_in(&self, username: &str, email: &str, password: &str) -> Result<String> {
        let res = self.signup(Some(username), email, password).await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "signup failed: {}", res.status());
        let res = self.login(email, password).await?;
        anyhow::ensure!(res.status() == StatusCode::ACCEPTED, "login failed: {}", res.status());
        session_cookie(&res).context("login did not set a session cookie")
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    let config = AppConfig::for_tests();
    let pool = DatabaseManager::connect(&config.database).await?;
    DatabaseManager::migrate(&pool).await?;
    let state = AppState::new(&config, pool)?;
    let app = accounts_api::app(state, &config);

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    // Redirects are asserted on, not followed
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        client,
        handle,
    })
}

/// `name=value` part of the response's Set-Cookie header, ready to send back
pub fn session_cookie(res: &Response) -> Option<String> {
    let header = res.headers().get(SET_COOKIE)?.to_str().ok()?;
    header.split(';').next().map(|pair| pair.trim().to_string())
}
