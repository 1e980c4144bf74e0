//! Integration tests driving a real server over HTTP and WebSocket.

use std::{net::SocketAddr, time::Duration};

use formpulse_server::{
    config::ServerConfig,
    ui::{AppState, Server},
};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    time::timeout,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// In-process server bound to a free port; shut down on drop.
struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    http: reqwest::Client,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, signal) = oneshot::channel::<()>();
        let server = Server::new(AppState::in_memory(&ServerConfig::default()));
        tokio::spawn(async move {
            server
                .serve_with_shutdown(listener, async {
                    let _ = signal.await;
                })
                .await
                .unwrap();
        });

        TestServer {
            addr,
            shutdown: Some(shutdown),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn connect(&self) -> (WsStream, String) {
        let (mut ws, _) = connect_async(format!("ws://{}/ws", self.addr))
            .await
            .unwrap();
        let connected = next_json(&mut ws).await;
        assert_eq!(connected["type"], "connected");
        let client_id = connected["client_id"].as_str().unwrap().to_string();
        (ws, client_id)
    }

    async fn create_form(&self, body: Value) -> Value {
        let response = self
            .http
            .post(self.url("/api/forms"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.unwrap()
    }

    async fn submit(&self, form_id: &str, answers: Value) -> reqwest::Response {
        self.http
            .post(self.url(&format!("/api/forms/{}/responses", form_id)))
            .header("user-agent", "integration-test")
            .json(&json!({ "responses": answers }))
            .send()
            .await
            .unwrap()
    }

    async fn health(&self) -> Value {
        self.http
            .get(self.url("/api/health"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    /// Poll `/api/health` until `predicate` holds; WS control messages are applied asynchronously.
    async fn wait_for_health(&self, predicate: impl Fn(&Value) -> bool) -> Value {
        for _ in 0..100 {
            let health = self.health().await;
            if predicate(&health) {
                return health;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("health condition not reached: {}", self.health().await);
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn next_json(ws: &mut WsStream) -> Value {
    loop {
        let msg = timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for a message")
            .expect("connection ended")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn send_json(ws: &mut WsStream, value: Value) {
    ws.send(Message::Text(value.to_string().into())).await.unwrap();
}

/// `true` when the server closes the connection within the timeout.
async fn wait_for_close(ws: &mut WsStream) -> bool {
    let result = timeout(Duration::from_secs(5), async {
        loop {
            match ws.next().await {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    result.is_ok()
}

fn survey_body(status: &str) -> Value {
    json!({
        "title": "Customer Survey",
        "description": "Tell us about yourself",
        "status": status,
        "fields": [
            { "id": "age", "type": "number", "label": "Age", "order": 0 },
            { "id": "score", "type": "rating", "label": "Score", "order": 1 },
            { "id": "topics", "type": "checkbox", "label": "Topics", "options": ["a", "b"], "order": 2 }
        ]
    })
}

#[tokio::test]
async fn test_connected_ack_carries_unique_client_ids() {
    // テスト項目: 接続直後に connected が届き、client_id は接続ごとに異なる
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let (_ws1, id1) = server.connect().await;
    let (_ws2, id2) = server.connect().await;

    // then (期待する結果):
    assert!(!id1.is_empty());
    assert_ne!(id1, id2);
    server
        .wait_for_health(|health| health["connections"] == 2)
        .await;
}

#[tokio::test]
async fn test_subscriber_receives_analytics_update_on_submission() {
    // テスト項目: 回答の送信で、購読中のダッシュボードに最新の集計が届く
    // given (前提条件):
    let server = TestServer::start().await;
    let form = server.create_form(survey_body("published")).await;
    let form_id = form["id"].as_str().unwrap().to_string();

    let (mut ws, _) = server.connect().await;
    send_json(&mut ws, json!({ "type": "join-analytics", "formId": form_id })).await;
    server.wait_for_health(|health| health["rooms"] == 1).await;

    // when (操作):
    let response = server
        .submit(
            &form_id,
            json!({ "age": 30, "score": 4, "topics": ["a", "b"] }),
        )
        .await;

    // then (期待する結果):
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    let update = next_json(&mut ws).await;
    assert_eq!(update["type"], "analytics-update");
    assert_eq!(update["form_id"], form_id.as_str());
    assert!(update["timestamp"].as_str().unwrap().ends_with('Z'));

    let analytics = &update["analytics"];
    assert_eq!(analytics["form_title"], "Customer Survey");
    assert_eq!(analytics["total_responses"], 1);
    let fields = analytics["field_analytics"].as_array().unwrap();
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0]["field_id"], "age");
    assert_eq!(fields[0]["data"]["average"], 30.0);
    assert_eq!(fields[1]["data"]["distribution"]["4"], 1);
    assert_eq!(fields[2]["field_type"], "checkbox");
    assert_eq!(fields[2]["data"]["distribution"]["b"], 1);
}

#[tokio::test]
async fn test_snake_case_form_id_and_unknown_messages() {
    // テスト項目: form_id 表記でも参加でき、未知のメッセージは無視されて接続が維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let form = server.create_form(survey_body("published")).await;
    let form_id = form["id"].as_str().unwrap().to_string();
    let (mut ws, _) = server.connect().await;

    // when (操作):
    send_json(&mut ws, json!({ "type": "ping" })).await;
    send_json(&mut ws, json!({ "formId": form_id })).await;
    send_json(&mut ws, json!({ "type": "join-analytics", "formId": "" })).await;
    send_json(&mut ws, json!({ "type": "join-analytics", "form_id": form_id })).await;
    server.wait_for_health(|health| health["rooms"] == 1).await;
    server.submit(&form_id, json!({ "age": 41 })).await;

    // then (期待する結果):
    let update = next_json(&mut ws).await;
    assert_eq!(update["type"], "analytics-update");
    assert_eq!(update["analytics"]["total_responses"], 1);
}

#[tokio::test]
async fn test_malformed_frame_closes_connection_and_cleans_up() {
    // テスト項目: JSON として読めないフレームで接続が閉じられ、ルームとレジストリから除去される
    // given (前提条件):
    let server = TestServer::start().await;
    let form = server.create_form(survey_body("published")).await;
    let form_id = form["id"].as_str().unwrap().to_string();
    let (mut ws, _) = server.connect().await;
    send_json(&mut ws, json!({ "type": "join-analytics", "formId": form_id })).await;
    server.wait_for_health(|health| health["rooms"] == 1).await;

    // when (操作):
    ws.send(Message::Text("this is not json".into())).await.unwrap();

    // then (期待する結果):
    assert!(wait_for_close(&mut ws).await);
    server
        .wait_for_health(|health| health["connections"] == 0 && health["rooms"] == 0)
        .await;
}

#[tokio::test]
async fn test_leave_stops_updates() {
    // テスト項目: leave-analytics 後は集計が届かず、空のルームは削除される
    // given (前提条件):
    let server = TestServer::start().await;
    let form = server.create_form(survey_body("published")).await;
    let form_id = form["id"].as_str().unwrap().to_string();
    let (mut ws, _) = server.connect().await;
    send_json(&mut ws, json!({ "type": "join-analytics", "formId": form_id })).await;
    server.wait_for_health(|health| health["rooms"] == 1).await;

    // when (操作):
    send_json(&mut ws, json!({ "type": "leave-analytics", "formId": form_id })).await;
    server.wait_for_health(|health| health["rooms"] == 0).await;
    server.submit(&form_id, json!({ "age": 20 })).await;

    // then (期待する結果):
    let received = timeout(Duration::from_millis(300), ws.next()).await;
    assert!(received.is_err(), "unexpected message: {:?}", received);
}

#[tokio::test]
async fn test_form_update_is_broadcast() {
    // テスト項目: フォームの更新が form-update として購読者に届く
    // given (前提条件):
    let server = TestServer::start().await;
    let form = server.create_form(survey_body("draft")).await;
    let form_id = form["id"].as_str().unwrap().to_string();
    let (mut ws, _) = server.connect().await;
    send_json(&mut ws, json!({ "type": "join-analytics", "formId": form_id })).await;
    server.wait_for_health(|health| health["rooms"] == 1).await;

    let mut changed = survey_body("published");
    changed["title"] = json!("Customer Survey 2026");

    // when (操作):
    let response = server
        .http
        .put(server.url(&format!("/api/forms/{}", form_id)))
        .json(&changed)
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let update = next_json(&mut ws).await;
    assert_eq!(update["type"], "form-update");
    assert_eq!(update["form"]["title"], "Customer Survey 2026");
    assert_eq!(update["form"]["status"], "published");
}

#[tokio::test]
async fn test_http_surface() {
    // テスト項目: 下書きへの回答拒否、回答一覧（新しい順）、集計取得、不正な入力
    // given (前提条件):
    let server = TestServer::start().await;
    let draft = server.create_form(survey_body("draft")).await;
    let published = server.create_form(survey_body("published")).await;
    let draft_id = draft["id"].as_str().unwrap();
    let form_id = published["id"].as_str().unwrap();

    // when (操作) / then (期待する結果):
    let rejected = server.submit(draft_id, json!({ "age": 1 })).await;
    assert_eq!(rejected.status(), reqwest::StatusCode::NOT_FOUND);

    let missing = server.submit("no-such-form", json!({ "age": 1 })).await;
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

    let invalid = server
        .http
        .post(server.url("/api/forms"))
        .json(&json!({ "title": " ", "fields": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), reqwest::StatusCode::BAD_REQUEST);

    for age in [25, 30, 35] {
        let accepted = server.submit(form_id, json!({ "age": age })).await;
        assert_eq!(accepted.status(), reqwest::StatusCode::CREATED);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    server.submit(form_id, json!({ "age": "bad" })).await;

    let responses: Value = server
        .http
        .get(server.url(&format!("/api/forms/{}/responses", form_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let responses = responses.as_array().unwrap();
    assert_eq!(responses.len(), 4);
    assert_eq!(responses[0]["responses"]["age"], "bad");
    assert_eq!(responses[0]["user_agent"], "integration-test");
    assert_eq!(responses[0]["ip_address"], "127.0.0.1");

    let analytics: Value = server
        .http
        .get(server.url(&format!("/api/forms/{}/analytics", form_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(analytics["total_responses"], 4);
    let age = &analytics["field_analytics"][0];
    assert_eq!(age["response_count"], 4);
    assert_eq!(age["data"]["response_count"], 3);
    assert_eq!(age["data"]["average"], 30.0);
    assert_eq!(age["data"]["min"], 25.0);
    assert_eq!(age["data"]["max"], 35.0);
}

#[tokio::test]
async fn test_listed_responses_echo_submitted_json() {
    // テスト項目: 回答一覧の responses は、集計できない値を含めて送信した JSON と一致する
    // given (前提条件):
    let server = TestServer::start().await;
    let form = server.create_form(survey_body("published")).await;
    let form_id = form["id"].as_str().unwrap();
    let submitted = json!({ "n": 42, "obj": { "x": 1 }, "mix": [1, "z"] });

    // when (操作):
    let accepted = server.submit(form_id, submitted.clone()).await;
    let responses: Value = server
        .http
        .get(server.url(&format!("/api/forms/{}/responses", form_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(accepted.status(), reqwest::StatusCode::CREATED);
    assert_eq!(responses[0]["responses"], submitted);
}

#[tokio::test]
async fn test_list_forms_by_status() {
    // テスト項目: フォーム一覧は更新の新しい順で、status で絞り込め、未知の status は 400 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let first = server.create_form(survey_body("published")).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = server.create_form(survey_body("draft")).await;

    let list = |query: &'static str| {
        let request = server.http.get(server.url(&format!("/api/forms{}", query)));
        async move { request.send().await.unwrap() }
    };

    // when (操作):
    let all: Value = list("").await.json().await.unwrap();
    let published: Value = list("?status=published").await.json().await.unwrap();
    let unknown = list("?status=archived").await;

    // then (期待する結果):
    assert_eq!(all["count"], 2);
    assert_eq!(all["forms"][0]["id"], second["id"]);
    assert_eq!(all["forms"][1]["id"], first["id"]);
    assert_eq!(published["count"], 1);
    assert_eq!(published["forms"][0]["id"], first["id"]);
    assert_eq!(unknown.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_public_share_url_flow() {
    // テスト項目: 共有 URL で公開フォームの取得と回答ができ、下書きに戻すと 404 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let draft = server.create_form(survey_body("draft")).await;
    assert!(draft.get("share_url").is_none());
    let form = server.create_form(survey_body("published")).await;
    let form_id = form["id"].as_str().unwrap().to_string();
    let share_url = form["share_url"].as_str().unwrap().to_string();
    let (mut ws, _) = server.connect().await;
    send_json(&mut ws, json!({ "type": "join-analytics", "formId": form_id })).await;
    server.wait_for_health(|health| health["rooms"] == 1).await;
    let public_url = server.url(&format!("/api/public/forms/{}", share_url));

    // when (操作):
    let fetched: Value = server
        .http
        .get(&public_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let submitted = server
        .http
        .post(format!("{}/responses", public_url))
        .json(&json!({ "responses": { "score": 5 } }))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(fetched["id"], form_id.as_str());
    assert_eq!(submitted.status(), reqwest::StatusCode::CREATED);
    let body: Value = submitted.json().await.unwrap();
    assert_eq!(body["form_id"], form_id.as_str());
    let update = next_json(&mut ws).await;
    assert_eq!(update["type"], "analytics-update");
    assert_eq!(update["analytics"]["total_responses"], 1);

    server
        .http
        .put(server.url(&format!("/api/forms/{}", form_id)))
        .json(&survey_body("draft"))
        .send()
        .await
        .unwrap();
    let hidden = server.http.get(&public_url).send().await.unwrap();
    assert_eq!(hidden.status(), reqwest::StatusCode::NOT_FOUND);
    let unknown = server
        .http
        .post(server.url("/api/public/forms/does-not-exist/responses"))
        .json(&json!({ "responses": { "score": 1 } }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), reqwest::StatusCode::NOT_FOUND);
}
