mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use common::app_state;
use common::ScriptedModel;
use common::ScriptedRetriever;
use ragchat::api::build_router;
use ragchat::api::AppState;
use tower::ServiceExt;

fn router(state: &AppState) -> Router {
    build_router(state.clone(), false)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn new_session(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(Request::builder().method("POST").uri("/api/sessions").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["session_id"]
        .as_str()
        .unwrap()
        .to_string()
}

fn default_state() -> AppState {
    app_state(
        Arc::new(ScriptedRetriever::default()),
        Arc::new(ScriptedModel::new(&["He", "llo"])),
    )
}

#[tokio::test]
async fn test_index_page() {
    let app = router(&default_state());
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("<title>Chat demo</title>"));
    assert!(html.contains("What's up?"));
}

#[tokio::test]
async fn test_index_page_restores_session_transcript() {
    let state = default_state();
    let app = router(&state);

    let html = body_text(app.clone().oneshot(get("/")).await.unwrap()).await;
    assert!(html.contains("sessionStorage.getItem(SESSION_KEY)"));
    assert!(html.contains("/api/sessions/${saved}/messages"));

    // The replay path: a known session returns its turns, an expired one is 404
    let session_id = new_session(&app).await;
    let replay = app
        .clone()
        .oneshot(get(&format!("/api/sessions/{session_id}/messages")))
        .await
        .unwrap();
    assert_eq!(replay.status(), StatusCode::OK);
    let replay = body_json(replay).await;
    assert_eq!(replay["success"], true);
    assert_eq!(replay["data"]["messages"].as_array().unwrap().len(), 0);

    let expired = app
        .oneshot(get("/api/sessions/no-such-session/messages"))
        .await
        .unwrap();
    assert_eq!(expired.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(expired).await["success"], false);
}

#[tokio::test]
async fn test_health_and_options() {
    let app = router(&default_state());

    let health = body_json(app.clone().oneshot(get("/api/health")).await.unwrap()).await;
    assert_eq!(health["success"], true);
    assert_eq!(health["data"]["status"], "healthy");

    let options = body_json(app.oneshot(get("/api/options")).await.unwrap()).await;
    let specs = options["data"].as_array().unwrap();
    assert_eq!(specs.len(), 9);
    assert_eq!(specs[0]["key"], "use_vector_search");
    assert_eq!(specs[1]["default"], 5);
    assert_eq!(specs[4]["default"], 0.3);
}

#[tokio::test]
async fn test_chat_streams_fragments_then_done() {
    let state = default_state();
    let app = router(&state);
    let session_id = new_session(&app).await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/sessions/{session_id}/chat"),
            serde_json::json!({"prompt": "What is new in 23ai?"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let body = body_text(response).await;
    let first = body.find("\"message\":\"He\"").unwrap();
    let second = body.find("\"message\":\"Hello\"").unwrap();
    let done = body.find("event: done").unwrap();
    assert!(first < second && second < done);
    assert_eq!(body.matches("event: fragment").count(), 2);

    let messages = body_json(
        app.oneshot(get(&format!("/api/sessions/{session_id}/messages")))
            .await
            .unwrap(),
    )
    .await;
    let turns = messages["data"]["messages"].as_array().unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0]["role"], "user");
    assert_eq!(turns[1]["role"], "assistant");
    assert_eq!(turns[1]["content"], "Hello");
}

#[tokio::test]
async fn test_chat_uses_request_options() {
    let retriever = Arc::new(ScriptedRetriever::default());
    let model = Arc::new(ScriptedModel::new(&["ok"]));
    let state = app_state(retriever.clone(), model.clone());
    let app = router(&state);
    let session_id = new_session(&app).await;

    let mut options = serde_json::to_value(ragchat::options::ChatOptions::default()).unwrap();
    options["fetch_k"] = serde_json::json!(20);
    let response = app
        .oneshot(post_json(
            &format!("/api/sessions/{session_id}/chat"),
            serde_json::json!({"prompt": "q", "options": options}),
        ))
        .await
        .unwrap();
    body_text(response).await;

    assert_eq!(*retriever.calls.lock().unwrap(), [20]);
    assert!(model.prompts.lock().unwrap()[0].contains("Oracle Database 23ai supports vector search."));
}

#[tokio::test]
async fn test_partial_options_keep_server_defaults() {
    let retriever = Arc::new(ScriptedRetriever::default());
    let mut state = app_state(retriever.clone(), Arc::new(ScriptedModel::new(&["ok"])));
    state.defaults.fetch_k = 7;
    let app = router(&state);
    let session_id = new_session(&app).await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/sessions/{session_id}/chat"),
            serde_json::json!({"prompt": "q", "options": {"temperature": 0.5}}),
        ))
        .await
        .unwrap();
    assert!(body_text(response).await.contains("event: done"));
    assert_eq!(*retriever.calls.lock().unwrap(), [7]);

    let rejected = app
        .oneshot(post_json(
            &format!("/api/sessions/{session_id}/chat"),
            serde_json::json!({"prompt": "q", "options": {"fetch_k": "lots"}}),
        ))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_error_event_on_retrieval_failure() {
    let state = app_state(
        Arc::new(ScriptedRetriever {
            fail: true,
            ..ScriptedRetriever::default()
        }),
        Arc::new(ScriptedModel::new(&["never"])),
    );
    let app = router(&state);
    let session_id = new_session(&app).await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/sessions/{session_id}/chat"),
            serde_json::json!({"prompt": "q"}),
        ))
        .await
        .unwrap();
    let body = body_text(response).await;
    assert!(body.contains("event: error"));
    assert!(body.contains("\"kind\":\"retrieval\""));
    assert!(!body.contains("event: done"));

    let messages = body_json(
        app.oneshot(get(&format!("/api/sessions/{session_id}/messages")))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(messages["data"]["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_chat_rejections() {
    let state = default_state();
    let app = router(&state);

    let unknown = app
        .clone()
        .oneshot(post_json("/api/sessions/missing/chat", serde_json::json!({"prompt": "q"})))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let session_id = new_session(&app).await;
    let uri = format!("/api/sessions/{session_id}/chat");

    let invalid = app
        .clone()
        .oneshot(post_json(
            &uri,
            serde_json::json!({"prompt": "q", "options": {"temperature": 1.5}}),
        ))
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(invalid).await["success"], false);

    let empty = app
        .clone()
        .oneshot(post_json(&uri, serde_json::json!({"prompt": "  "})))
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let session = state.sessions.get_session(&session_id).unwrap();
    let _held = session.lock().await;
    let busy = app
        .oneshot(post_json(&uri, serde_json::json!({"prompt": "q"})))
        .await
        .unwrap();
    assert_eq!(busy.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_session() {
    let state = default_state();
    let app = router(&state);
    let session_id = new_session(&app).await;

    let delete = |id: String| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/sessions/{id}"))
            .body(Body::empty())
            .unwrap()
    };

    let first = app.clone().oneshot(delete(session_id.clone())).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(state.sessions.session_count(), 0);

    let second = app.oneshot(delete(session_id)).await.unwrap();
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
}
