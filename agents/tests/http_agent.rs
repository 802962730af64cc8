//! Drives `HttpAgent` against a real local agent server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use agents::{AgentClientConfig, HttpAgent};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use types::{
    Agent, AgentError, AllSpeeches, AllVotes, GamePhase, PlayerContext, PlayerInfo, Role,
    RoleContext, StartGameParams,
};
use uuid::Uuid;

#[derive(Clone)]
struct Flaky {
    hits: Arc<AtomicUsize>,
    failures: usize,
    failure: StatusCode,
    body: Value,
}

impl Flaky {
    fn new(failures: usize, failure: StatusCode, body: Value) -> Self {
        Self {
            hits: Arc::new(AtomicUsize::new(0)),
            failures,
            failure,
            body,
        }
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn flaky(State(state): State<Flaky>) -> Response {
    let hit = state.hits.fetch_add(1, Ordering::SeqCst);
    if hit < state.failures {
        (state.failure, "not now").into_response()
    } else {
        Json(state.body.clone()).into_response()
    }
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server crashed");
    });
    format!("http://{addr}")
}

async fn serve_flaky(path: &str, state: Flaky) -> String {
    serve(Router::new().route(path, post(flaky)).with_state(state)).await
}

fn fast_config() -> AgentClientConfig {
    AgentClientConfig {
        timeout_secs: 5,
        max_attempts: 3,
        start_game_attempts: 1,
        initial_backoff_ms: 5,
        backoff_multiplier: 2,
        max_backoff_ms: 20,
    }
}

fn context() -> PlayerContext {
    PlayerContext {
        round: 1,
        current_phase: GamePhase::Day,
        alive_players: vec![
            PlayerInfo { id: 1, is_alive: true },
            PlayerInfo { id: 2, is_alive: true },
        ],
        all_speeches: AllSpeeches::new(),
        all_votes: AllVotes::new(),
        role: RoleContext::Plain {},
    }
}

fn start_params() -> StartGameParams {
    StartGameParams {
        game_id: Uuid::new_v4(),
        role: Role::Werewolf,
        player_id: 1,
        teammates: vec![4],
    }
}

#[tokio::test]
async fn test_transient_errors_are_retried_until_success() {
    let state = Flaky::new(
        2,
        StatusCode::SERVICE_UNAVAILABLE,
        json!({"speech": "I am a humble villager"}),
    );
    let url = serve_flaky("/api/player/speak", state.clone()).await;
    let agent = HttpAgent::new(1, url, fast_config()).unwrap();

    let response = agent.speak(&context()).await.expect("Third attempt succeeds");
    assert_eq!(response["speech"], "I am a humble villager");
    assert_eq!(state.hits(), 3);
}

#[tokio::test]
async fn test_rate_limiting_is_transient() {
    let state = Flaky::new(
        1,
        StatusCode::TOO_MANY_REQUESTS,
        json!({"target": 2, "reason": "quiet"}),
    );
    let url = serve_flaky("/api/player/vote", state.clone()).await;
    let agent = HttpAgent::new(1, url, fast_config()).unwrap();

    let response = agent.vote(&context()).await.unwrap();
    assert_eq!(response["target"], 2);
    assert_eq!(state.hits(), 2);
}

#[tokio::test]
async fn test_client_errors_abort_without_retry() {
    for status in [
        StatusCode::BAD_REQUEST,
        StatusCode::UNAUTHORIZED,
        StatusCode::NOT_FOUND,
        StatusCode::UNPROCESSABLE_ENTITY,
    ] {
        let state = Flaky::new(usize::MAX, status, Value::Null);
        let url = serve_flaky("/api/player/vote", state.clone()).await;
        let agent = HttpAgent::new(1, url, fast_config()).unwrap();

        let err = agent.vote(&context()).await.unwrap_err();
        assert!(
            matches!(err, AgentError::Status { status: s, .. } if s == status.as_u16()),
            "{err}"
        );
        assert_eq!(state.hits(), 1, "{status}");
    }
}

#[tokio::test]
async fn test_retry_budget_is_bounded() {
    let state = Flaky::new(usize::MAX, StatusCode::INTERNAL_SERVER_ERROR, Value::Null);
    let url = serve_flaky("/api/player/use-ability", state.clone()).await;
    let agent = HttpAgent::new(1, url, fast_config()).unwrap();

    assert!(agent.use_ability(&context()).await.is_err());
    assert_eq!(state.hits(), 3);
}

#[tokio::test]
async fn test_start_game_fails_fast() {
    let state = Flaky::new(usize::MAX, StatusCode::BAD_GATEWAY, Value::Null);
    let url = serve_flaky("/api/player/start-game", state.clone()).await;
    let agent = HttpAgent::new(1, url, fast_config()).unwrap();

    assert!(agent.start_game(&start_params()).await.is_err());
    assert_eq!(state.hits(), 1);
}

#[tokio::test]
async fn test_start_game_sends_camel_case_body_and_accepts_empty_ack() {
    let received: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let sink = received.clone();
    let router = Router::new().route(
        "/api/player/start-game",
        post(move |Json(body): Json<Value>| async move {
            *sink.lock().unwrap() = Some(body);
            StatusCode::OK
        }),
    );
    let url = serve(router).await;
    let agent = HttpAgent::new(1, url, fast_config()).unwrap();
    let params = start_params();

    agent.start_game(&params).await.expect("Empty ack is fine");

    let body = received.lock().unwrap().clone().expect("Body was received");
    assert_eq!(
        body,
        json!({
            "gameId": params.game_id.to_string(),
            "role": "werewolf",
            "playerId": 1,
            "teammates": [4],
        })
    );
}

#[tokio::test]
async fn test_malformed_json_is_permanent() {
    let router = Router::new().route(
        "/api/player/speak",
        post(|| async { (StatusCode::OK, "{not json") }),
    );
    let url = serve(router).await;
    let agent = HttpAgent::new(1, url, fast_config()).unwrap();

    let err = agent.speak(&context()).await.unwrap_err();
    assert!(matches!(err, AgentError::Decode(_)), "{err}");
}

#[tokio::test]
async fn test_unreachable_agent_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let agent = HttpAgent::new(1, format!("http://{addr}"), fast_config()).unwrap();

    let err = agent.speak(&context()).await.unwrap_err();
    assert!(matches!(err, AgentError::Transport { .. }), "{err}");
}
