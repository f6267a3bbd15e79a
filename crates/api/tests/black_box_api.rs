use std::net::SocketAddr;

use cryptotasks_api::app::{build_app, services};
use cryptotasks_api::config::AppConfig;
use cryptotasks_infra::SessionSweeperHandle;
use reqwest::StatusCode;
use reqwest::header::LOCATION;

const SESSION_HEADER: &str = "x-session-token";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    _sweeper: SessionSweeperHandle,
    data_dir: tempfile::TempDir,
}

impl TestServer {
    async fn spawn(admins: &[&str]) -> Self {
        let data_dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_file: data_dir.path().join("data.json"),
            admins: admins.iter().map(|s| s.to_string()).collect(),
            ..AppConfig::default()
        };

        // Same router as prod, bound to an ephemeral port.
        let (services, sweeper) = services::build_services(config);
        let app = build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .unwrap();
        });

        Self {
            base_url,
            handle,
            _sweeper: sweeper,
            data_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn location(res: &reqwest::Response) -> &str {
    res.headers().get(LOCATION).unwrap().to_str().unwrap()
}

async fn register(client: &reqwest::Client, srv: &TestServer, username: &str) -> String {
    let res = client
        .post(srv.url("/api/register"))
        .form(&[("username", username), ("password", "pw"), ("email", "x@example.com")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/account");
    res.headers()
        .get(SESSION_HEADER)
        .expect("session token header")
        .to_str()
        .unwrap()
        .to_string()
}

async fn tap(client: &reqwest::Client, srv: &TestServer, token: Option<&str>) -> serde_json::Value {
    let mut req = client.post(srv.url("/api/tap-action"));
    if let Some(token) = token {
        req = req.bearer_auth(token);
    }
    let res = req.send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

async fn stats(client: &reqwest::Client, srv: &TestServer) -> serde_json::Value {
    client
        .get(srv.url("/api/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn(&[]).await;
    let res = client().get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn only_page_routes_are_tracked() {
    let srv = TestServer::spawn(&[]).await;
    let client = client();

    for path in ["/", "/contacts", "/info"] {
        let res = client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "GET {path}");
    }
    client.get(srv.url("/api/get-balance")).send().await.unwrap();
    client.get(srv.url("/health")).send().await.unwrap();

    let body = stats(&client, &srv).await;
    assert_eq!(body["total_visitors"], 3);
    assert_eq!(body["unique_visitors"], 1);
    assert_eq!(body["online_now"], 1);
    assert_eq!(body["active_sessions"], 1);
}

#[tokio::test]
async fn register_then_tap_twice() {
    let srv = TestServer::spawn(&[]).await;
    let client = client();
    let token = register(&client, &srv, "carol").await;

    assert_eq!(tap(&client, &srv, Some(&token)).await["balance"], 0.1);
    let body = tap(&client, &srv, Some(&token)).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["balance"], 0.2);

    let account: serde_json::Value = client
        .get(srv.url("/account"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(account["user"]["username"], "carol");
    assert_eq!(account["user"]["balance"], 50.0);
    assert_eq!(account["stats"]["total_earned"], 50.2);

    let balance: serde_json::Value = client
        .get(srv.url("/api/get-balance"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(balance["balance"], 0.2);
}

#[tokio::test]
async fn tap_requires_a_session() {
    let srv = TestServer::spawn(&[]).await;
    let client = client();

    let body = tap(&client, &srv, None).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("authentication"));

    let body = tap(&client, &srv, Some("5b0f6a4e-2c1d-4f7a-9a57-3c9f0b1d2e3f")).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn protected_pages_redirect_to_login() {
    let srv = TestServer::spawn(&[]).await;
    let client = client();

    for path in ["/account", "/tap"] {
        let res = client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/login");
    }
}

#[tokio::test]
async fn duplicate_registration_redirects_with_error() {
    let srv = TestServer::spawn(&[]).await;
    let client = client();
    register(&client, &srv, "alice").await;

    let res = client
        .post(srv.url("/api/register"))
        .form(&[("username", "alice"), ("password", "other")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/register?error=exists");
    assert!(res.headers().get(SESSION_HEADER).is_none());

    let page: serde_json::Value = client
        .get(srv.url("/register?error=exists"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["has_error"], true);
}

#[tokio::test]
async fn blank_username_registration_redirects_with_error() {
    let srv = TestServer::spawn(&[]).await;
    let client = client();

    let res = client
        .post(srv.url("/api/register"))
        .form(&[("username", ""), ("password", "pw")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/register?error=invalid");
    assert!(res.headers().get(SESSION_HEADER).is_none());

    let home: serde_json::Value = client
        .get(srv.url("/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(home["logged_in"], false);
    assert_eq!(home["stats"]["total_users"], 0);
}

#[tokio::test]
async fn login_rejects_empty_password() {
    let srv = TestServer::spawn(&[]).await;
    let client = client();
    register(&client, &srv, "bob").await;

    let res = client
        .post(srv.url("/api/login"))
        .form(&[("username", "bob"), ("password", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login?error=1");

    let res = client
        .post(srv.url("/api/login"))
        .form(&[("username", "bob"), ("password", "x")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/account");
    let token = res.headers().get(SESSION_HEADER).unwrap().to_str().unwrap().to_string();

    let home: serde_json::Value = client
        .get(srv.url("/"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(home["logged_in"], true);
    assert_eq!(home["user"]["username"], "bob");
    assert_eq!(home["stats"]["total_users"], 1);
}

#[tokio::test]
async fn sessions_are_per_client() {
    let srv = TestServer::spawn(&[]).await;
    let client = client();
    let alice = register(&client, &srv, "alice").await;
    let bob = register(&client, &srv, "bob").await;

    let res = client
        .post(srv.url("/api/logout"))
        .bearer_auth(&alice)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");

    assert_eq!(tap(&client, &srv, Some(&alice)).await["success"], false);
    assert_eq!(tap(&client, &srv, Some(&bob)).await["success"], true);
}

#[tokio::test]
async fn reset_balance_requires_admin() {
    let srv = TestServer::spawn(&["root"]).await;
    let client = client();
    let player = register(&client, &srv, "player").await;
    let root = register(&client, &srv, "root").await;
    tap(&client, &srv, Some(&player)).await;

    let res = client.post(srv.url("/api/reset-balance")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(srv.url("/api/reset-balance"))
        .bearer_auth(&player)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .post(srv.url("/api/reset-balance"))
        .bearer_auth(&root)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);

    let balance: serde_json::Value = client
        .get(srv.url("/api/get-balance"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(balance["balance"], 0.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_taps_over_http() {
    let srv = TestServer::spawn(&[]).await;
    let client = client();
    let token = register(&client, &srv, "dana").await;

    let mut tasks = Vec::new();
    for _ in 0..50 {
        let client = client.clone();
        let url = srv.url("/api/tap-action");
        let token = token.clone();
        tasks.push(tokio::spawn(async move {
            let res = client.post(url).bearer_auth(token).send().await.unwrap();
            let body: serde_json::Value = res.json().await.unwrap();
            assert_eq!(body["success"], true);
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }

    let balance: serde_json::Value = client
        .get(srv.url("/api/get-balance"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(balance["balance"], 5.0);
}

#[tokio::test]
async fn mutations_are_written_to_the_data_file() {
    let srv = TestServer::spawn(&[]).await;
    let client = client();
    let token = register(&client, &srv, "eve").await;
    tap(&client, &srv, Some(&token)).await;

    let raw = std::fs::read(srv.data_dir.path().join("data.json")).unwrap();
    let saved: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(saved["users"]["eve"]["total_earned"], 50.1);
    assert_eq!(saved["tap_balance"], 0.1);
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let srv = TestServer::spawn(&[]).await;
    let res = client().get(srv.url("/api/tap-action")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}
