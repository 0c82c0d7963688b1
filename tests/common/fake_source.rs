//! In-process fake of the community data source.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// What the fake answers for one facet.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    Garbage,
}

#[derive(Debug, Clone)]
pub struct FakeCommunity {
    pub about: Reply,
    pub rules: Reply,
    pub hot: Reply,
}

impl FakeCommunity {
    pub fn new(description: &str, subscribers: u64, upvotes: &[i64]) -> Self {
        let children: Vec<Value> = upvotes
            .iter()
            .enumerate()
            .map(|(i, &score)| {
                json!({
                    "kind": "t3",
                    "data": {
                        "title": format!("{description} post {i}"),
                        "score": score,
                        "num_comments": i,
                        "permalink": format!("/r/x/comments/{i}/"),
                        "stickied": false
                    }
                })
            })
            .collect();

        Self {
            about: Reply::Json(json!({
                "kind": "t5",
                "data": {
                    "public_description": description,
                    "subscribers": subscribers,
                    "accounts_active": subscribers / 100
                }
            })),
            rules: Reply::Json(json!({
                "rules": [
                    { "short_name": "No spam", "description": "Self-promotion limited to Fridays" }
                ]
            })),
            hot: Reply::Json(json!({ "kind": "Listing", "data": { "children": children } })),
        }
    }

    pub fn with_about(mut self, reply: Reply) -> Self {
        self.about = reply;
        self
    }

    pub fn with_rules(mut self, reply: Reply) -> Self {
        self.rules = reply;
        self
    }

    pub fn with_hot(mut self, reply: Reply) -> Self {
        self.hot = reply;
        self
    }
}

/// One request seen by the fake.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub query: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Clone, Default)]
struct FakeState {
    communities: Arc<HashMap<String, FakeCommunity>>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

#[derive(Clone, Copy)]
enum Endpoint {
    About,
    Rules,
    Hot,
}

pub struct FakeSource {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _handle: JoinHandle<()>,
}

impl FakeSource {
    pub async fn spawn(communities: Vec<(&str, FakeCommunity)>) -> std::io::Result<Self> {
        let state = FakeState {
            communities: Arc::new(
                communities
                    .into_iter()
                    .map(|(name, c)| (name.to_string(), c))
                    .collect(),
            ),
            seen: Arc::new(Mutex::new(Vec::new())),
        };
        let seen = state.seen.clone();

        let app = Router::new()
            .route("/r/{name}/about.json", get(about))
            .route("/r/{name}/about/rules.json", get(rules))
            .route("/r/{name}/hot.json", get(hot))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Ok(Self {
            addr,
            seen,
            shutdown_tx: Some(shutdown_tx),
            _handle: handle,
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.seen.lock().iter().map(|r| r.path.clone()).collect()
    }
}

impl Drop for FakeSource {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn about(
    State(state): State<FakeState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    respond(&state, &name, Endpoint::About, format!("/r/{name}/about.json"), None, &headers)
}

async fn rules(
    State(state): State<FakeState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    respond(&state, &name, Endpoint::Rules, format!("/r/{name}/about/rules.json"), None, &headers)
}

async fn hot(
    State(state): State<FakeState>,
    Path(name): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    respond(&state, &name, Endpoint::Hot, format!("/r/{name}/hot.json"), query, &headers)
}

fn respond(
    state: &FakeState,
    name: &str,
    endpoint: Endpoint,
    path: String,
    query: Option<String>,
    headers: &HeaderMap,
) -> Response {
    state.seen.lock().push(SeenRequest {
        path,
        query,
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let Some(community) = state.communities.get(name) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let reply = match endpoint {
        Endpoint::About => &community.about,
        Endpoint::Rules => &community.rules,
        Endpoint::Hot => &community.hot,
    };

    match reply {
        Reply::Json(body) => axum::Json(body.clone()).into_response(),
        Reply::Status(code) => StatusCode::from_u16(*code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Reply::Garbage => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            "{not json",
        )
            .into_response(),
    }
}
